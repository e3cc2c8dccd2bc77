use dotenv::dotenv;
use std::{env, path::PathBuf, str::FromStr, time::Duration};
use thiserror::Error;

const DEFAULT_CHAT_HOST: &str = "irc.chat.twitch.tv";
const DEFAULT_CHAT_PORT: u16 = 6667;
const DEFAULT_VIEWER_POLL_SECONDS: u64 = 60;
const DEFAULT_RECONNECT_DELAY_SECONDS: u64 = 10;
const DEFAULT_HIGHLIGHT_FILE: &str = "timestamps.txt";
const DEFAULT_JOKE_SUBREDDIT: &str = "jokes";

const REQUIRED_VARS: [&str; 6] = [
    "BOT_CHANNEL_NAME",
    "CHANNEL_NAME",
    "USER_ID",
    "CHAT_OAUTH",
    "API_CLIENT_ID",
    "API_OAUTH",
];

#[derive(Debug, Clone)]
pub struct AppConfig {
    bot_user_name: String,
    channel_name: String,
    user_id: String,
    chat_oauth: String,
    api_client_id: String,
    api_oauth: String,
    chat_host: String,
    chat_port: u16,
    emote_interval: Option<Duration>,
    viewer_poll_interval: Option<Duration>,
    highlight_file: PathBuf,
    now_playing_file: Option<PathBuf>,
    joke_subreddit: String,
    reconnect_delay: Duration,
}

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Missing required environment variables {}", .0.join(", "))]
    MissingVars(Vec<String>),
    #[error("Invalid value {value:?} for environment variable {name}")]
    InvalidVar { name: String, value: String },
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, AppConfigError> {
    match lookup(name) {
        Some(value) => value.trim().parse().map_err(|_| AppConfigError::InvalidVar {
            name: name.to_owned(),
            value,
        }),
        None => Ok(default),
    }
}

/// Zero disables the interval.
fn interval(duration: Duration) -> Option<Duration> {
    (!duration.is_zero()).then_some(duration)
}

impl AppConfig {
    /// Reads the environment, after loading a `.env` file if there is one.
    pub fn new() -> Result<AppConfig, AppConfigError> {
        dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<AppConfig, AppConfigError> {
        let missing: Vec<String> = REQUIRED_VARS
            .iter()
            .copied()
            .filter(|name| lookup(*name).map_or(true, |value| value.trim().is_empty()))
            .map(String::from)
            .collect();
        if !missing.is_empty() {
            return Err(AppConfigError::MissingVars(missing));
        }
        let required = |name: &str| lookup(name).unwrap_or_default().trim().to_owned();

        let emote_minutes: f64 = parse_var(&lookup, "EMOTE_FREQ_MINUTES", 0.0)?;
        if !emote_minutes.is_finite() || !(0.0..=1e6).contains(&emote_minutes) {
            return Err(AppConfigError::InvalidVar {
                name: "EMOTE_FREQ_MINUTES".to_owned(),
                value: emote_minutes.to_string(),
            });
        }

        Ok(AppConfig {
            bot_user_name: required("BOT_CHANNEL_NAME").to_lowercase(),
            channel_name: required("CHANNEL_NAME").to_lowercase(),
            user_id: required("USER_ID"),
            chat_oauth: required("CHAT_OAUTH"),
            api_client_id: required("API_CLIENT_ID"),
            api_oauth: required("API_OAUTH"),
            chat_host: lookup("CHAT_HOST").unwrap_or_else(|| DEFAULT_CHAT_HOST.to_owned()),
            chat_port: parse_var(&lookup, "CHAT_PORT", DEFAULT_CHAT_PORT)?,
            emote_interval: interval(Duration::from_secs_f64(emote_minutes * 60.0)),
            viewer_poll_interval: interval(Duration::from_secs(parse_var(
                &lookup,
                "VIEWER_POLL_SECONDS",
                DEFAULT_VIEWER_POLL_SECONDS,
            )?)),
            highlight_file: lookup("HIGHLIGHT_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_HIGHLIGHT_FILE)),
            now_playing_file: lookup("NOW_PLAYING_FILE").map(PathBuf::from),
            joke_subreddit: lookup("JOKE_SUBREDDIT")
                .unwrap_or_else(|| DEFAULT_JOKE_SUBREDDIT.to_owned()),
            reconnect_delay: Duration::from_secs(parse_var(
                &lookup,
                "RECONNECT_DELAY_SECONDS",
                DEFAULT_RECONNECT_DELAY_SECONDS,
            )?),
        })
    }

    /// Login of the bot account, provided by BOT_CHANNEL_NAME.
    pub fn bot_user_name(&self) -> &str {
        self.bot_user_name.as_ref()
    }

    /// Channel to join, provided by CHANNEL_NAME. Its owner has every privilege.
    pub fn channel_name(&self) -> &str {
        self.channel_name.as_ref()
    }

    /// Numeric id of the channel owner, provided by USER_ID.
    pub fn user_id(&self) -> &str {
        self.user_id.as_ref()
    }

    pub fn chat_oauth(&self) -> &str {
        self.chat_oauth.as_ref()
    }

    pub fn api_client_id(&self) -> &str {
        self.api_client_id.as_ref()
    }

    pub fn api_oauth(&self) -> &str {
        self.api_oauth.as_ref()
    }

    pub fn chat_host(&self) -> &str {
        self.chat_host.as_ref()
    }

    pub fn chat_port(&self) -> u16 {
        self.chat_port
    }

    /// How often to post a random emote, `None` when disabled.
    pub fn emote_interval(&self) -> Option<Duration> {
        self.emote_interval
    }

    /// How often to poll the viewer list, `None` when disabled.
    pub fn viewer_poll_interval(&self) -> Option<Duration> {
        self.viewer_poll_interval
    }

    pub fn highlight_file(&self) -> &PathBuf {
        &self.highlight_file
    }

    pub fn now_playing_file(&self) -> Option<PathBuf> {
        self.now_playing_file.clone()
    }

    pub fn joke_subreddit(&self) -> &str {
        self.joke_subreddit.as_ref()
    }

    /// First wait before reconnecting; doubled for every connect attempt
    /// that fails before joining.
    pub fn reconnect_delay(&self) -> Duration {
        self.reconnect_delay
    }
}
