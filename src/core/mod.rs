mod bot;
mod cache;
mod command;
mod dispatcher;
mod scheduler;

pub use bot::ChatBot;
pub use cache::{DrawCache, DrawMode};
pub use command::{
    ArgumentMode, CommandArgs, CommandError, CommandRegistry, CommandSpec, RegistryError,
};
pub use dispatcher::Dispatcher;
pub use scheduler::ScheduledTask;
