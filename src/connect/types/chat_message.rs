/// Elevated role of a chat message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Privilege {
    Moderator,
    Owner,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: String,
    pub text: String,
    pub privilege: Option<Privilege>,
}

impl ChatMessage {
    pub fn new(sender: &str, text: &str, privilege: Option<Privilege>) -> Self {
        Self {
            sender: sender.to_owned(),
            text: text.to_owned(),
            privilege,
        }
    }

    pub fn is_privileged(&self) -> bool {
        self.privilege.is_some()
    }
}
