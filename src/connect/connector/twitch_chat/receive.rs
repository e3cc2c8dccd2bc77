use crate::connect::{
    types::{parse_tags, privilege_from_tags},
    ChatMessage, Privilege,
};
use log::warn;
use std::collections::HashMap;

// well above the longest line the server sends
const MAX_PENDING_BYTES: usize = 8 * 1024;
const END_OF_NAMES: &str = "366";
const END_OF_NAMES_TEXT: &str = ":End of /NAMES list";

#[derive(Debug, PartialEq)]
pub enum ReceiveEvent {
    /// `PING :<server>`; carries the server token to echo back.
    Ping(String),
    EndOfNames,
    ChatMessage(ChatMessage),
}

impl ReceiveEvent {
    /// Parses one protocol line. Lines the bot has no use for yield `None`.
    pub fn parse_from_message(message: &str, channel_owner: &str) -> Option<Self> {
        if let Some(server) = message.strip_prefix("PING ") {
            return Some(ReceiveEvent::Ping(
                server.strip_prefix(':').unwrap_or(server).to_owned(),
            ));
        }

        // @badge-info=;badges=;color=;display-name=carkhy;mod=0 :carkhy!carkhy@carkhy.tmi.twitch.tv PRIVMSG #captaincallback :backseating
        let (tags, rest) = match message.strip_prefix('@') {
            Some(tagged) => {
                let (tags, rest) = tagged.split_once(' ')?;
                (parse_tags(tags), rest)
            }
            None => (HashMap::default(), message),
        };
        let (source, rest) = rest.strip_prefix(':')?.split_once(' ')?;
        let (verb, params) = rest.split_once(' ')?;

        match verb {
            // :bot.tmi.twitch.tv 366 bot #channel :End of /NAMES list
            END_OF_NAMES if params.ends_with(END_OF_NAMES_TEXT) => Some(ReceiveEvent::EndOfNames),
            "PRIVMSG" => {
                let sender = parse_sender(source)?;
                let (channel, text) = params.split_once(" :")?;
                if channel.len() < 2 || !channel.starts_with('#') {
                    return None;
                }
                let privilege = if sender.eq_ignore_ascii_case(channel_owner) {
                    Some(Privilege::Owner)
                } else {
                    privilege_from_tags(&tags)
                };
                Some(ReceiveEvent::ChatMessage(ChatMessage::new(
                    sender,
                    text.trim(),
                    privilege,
                )))
            }
            _ => None,
        }
    }
}

/// Extracts the user from `nick!user@nick.host`, requiring the identity to
/// repeat consistently in every part.
fn parse_sender(source: &str) -> Option<&str> {
    enum ParsingState {
        Nick,
        User,
        Host,
    }
    use ParsingState::*;

    let mut state = Nick;
    let mut nick = &source[0..0];
    let mut marker = 0;

    for (i, codepoint) in source.char_indices() {
        match state {
            Nick => match codepoint {
                '!' if i == 0 => return None,
                '!' => {
                    nick = &source[..i];
                    marker = i + 1;
                    state = User;
                }
                c if !is_word_char(c) => return None,
                _ => (),
            },
            User => {
                if codepoint == '@' {
                    if &source[marker..i] != nick {
                        return None;
                    }
                    marker = i + 1;
                    state = Host;
                }
            }
            Host => {
                if codepoint == '.' {
                    return (&source[marker..i] == nick).then_some(nick);
                }
            }
        }
    }
    None
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Reassembles CRLF-delimited lines from arbitrary read chunks.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
    // the head of the next line was dropped for being too long
    truncated: bool,
}

impl LineBuffer {
    /// Appends `chunk` and drains every complete line. A trailing partial
    /// line stays buffered until its terminator arrives, unless it outgrows
    /// the buffer, in which case the whole line is discarded.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);
        let mut lines = Vec::new();
        while let Some(end) = self.pending.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.pending.drain(..=end).collect();
            if std::mem::take(&mut self.truncated) {
                continue;
            }
            let line = String::from_utf8_lossy(&raw);
            let line = line.trim_end_matches(['\r', '\n']);
            if !line.is_empty() {
                lines.push(line.to_owned());
            }
        }
        if self.pending.len() > MAX_PENDING_BYTES {
            warn!("Dropping a line longer than {} bytes", MAX_PENDING_BYTES);
            self.pending.clear();
            self.truncated = true;
        }
        lines
    }
}
