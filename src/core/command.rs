use crate::{api::ApiError, connect::ConnectorError, handle::PyramidRequest, handle::CommandHandler};
use std::{fmt, sync::Arc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommandError {
    /// Shown to the chat user as-is.
    #[error("{0}")]
    Usage(String),
    #[error("API call failed: {0}")]
    Api(#[from] ApiError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Connector(#[from] ConnectorError),
}

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Command !{0} is registered twice")]
    DuplicateCommand(String),
}

/// Arguments as handed to a handler, shaped by its [`ArgumentMode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandArgs {
    None,
    Text(String),
    Tokens(Vec<String>),
    Pyramid(PyramidRequest),
}

pub type ArgumentParser = fn(&str) -> Result<CommandArgs, CommandError>;

#[derive(Clone, Copy)]
pub enum ArgumentMode {
    None,
    RawText,
    SplitTokens,
    Custom(ArgumentParser),
}

impl ArgumentMode {
    pub fn parse(&self, rest: &str) -> Result<CommandArgs, CommandError> {
        match self {
            Self::None => Ok(CommandArgs::None),
            Self::RawText => Ok(CommandArgs::Text(rest.trim().to_owned())),
            Self::SplitTokens => Ok(CommandArgs::Tokens(
                rest.split_whitespace().map(String::from).collect(),
            )),
            Self::Custom(parser) => parser(rest),
        }
    }
}

impl fmt::Debug for ArgumentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::RawText => write!(f, "RawText"),
            Self::SplitTokens => write!(f, "SplitTokens"),
            Self::Custom(_) => write!(f, "Custom"),
        }
    }
}

#[derive(Clone)]
pub struct CommandSpec {
    pub name: String,
    pub handler: Arc<dyn CommandHandler>,
    pub argument_mode: ArgumentMode,
    pub requires_privilege: bool,
}

impl CommandSpec {
    pub fn new(name: &str, handler: Arc<dyn CommandHandler>) -> Self {
        Self {
            name: name.to_owned(),
            handler,
            argument_mode: ArgumentMode::None,
            requires_privilege: false,
        }
    }

    pub fn with_arguments(mut self, argument_mode: ArgumentMode) -> Self {
        self.argument_mode = argument_mode;
        self
    }

    pub fn privileged(mut self) -> Self {
        self.requires_privilege = true;
        self
    }
}

/// The command table. Built once at startup, read-only afterwards.
#[derive(Clone, Default)]
pub struct CommandRegistry {
    commands: Vec<CommandSpec>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, spec: CommandSpec) -> Result<(), RegistryError> {
        if self.get(&spec.name).is_some() {
            return Err(RegistryError::DuplicateCommand(spec.name));
        }
        self.commands.push(spec);
        Ok(())
    }

    /// Case-sensitive lookup.
    pub fn get(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.iter().find(|spec| spec.name == name)
    }

    /// Names in registration order. Privileged commands are only listed
    /// to privileged users.
    pub fn names_visible_to(&self, privileged: bool) -> Vec<&str> {
        self.commands
            .iter()
            .filter(|spec| privileged || !spec.requires_privilege)
            .map(|spec| spec.name.as_str())
            .collect()
    }
}
