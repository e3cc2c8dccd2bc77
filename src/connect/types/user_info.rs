use std::collections::{HashMap, HashSet};

use super::Privilege;

#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Badge {
    pub name: String,
    pub level: u16,
}

pub(crate) fn parse_tags(tags_string: &str) -> HashMap<String, String> {
    tags_string
        .split(';')
        .filter_map(|key_val_pair| {
            let mut key_val_split = key_val_pair.splitn(2, '=');
            let key = key_val_split.next().filter(|key| !key.is_empty())?;
            Some((
                key.to_owned(),
                key_val_split.next().unwrap_or_default().to_owned(),
            ))
        })
        .collect()
}

pub(crate) fn get_badges(tags: &HashMap<String, String>) -> HashSet<Badge> {
    match tags.get("badges") {
        Some(badges) if !badges.is_empty() => badges
            .split(',')
            .filter_map(|s| {
                let mut splt = s.split('/');
                let name = splt.next().filter(|name| !name.is_empty())?;
                Some(Badge {
                    name: name.to_owned(),
                    level: splt.next().and_then(|s| s.parse().ok()).unwrap_or(0),
                })
            })
            .collect(),
        _ => HashSet::default(),
    }
}

/// Privilege carried by the message tags alone. Channel ownership by
/// identity is decided by the caller.
pub(crate) fn privilege_from_tags(tags: &HashMap<String, String>) -> Option<Privilege> {
    let badges = get_badges(tags);
    if badges.iter().any(|badge| badge.name == "broadcaster") {
        Some(Privilege::Owner)
    } else if badges.iter().any(|badge| badge.name == "moderator")
        || tags.get("mod").map(String::as_str) == Some("1")
    {
        Some(Privilege::Moderator)
    } else {
        None
    }
}
