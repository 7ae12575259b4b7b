pub mod challenge_commands;
pub mod command_context;
pub mod command_handler;
pub mod handlers;
pub mod user_commands;

pub use command_context::CommandContext;
pub use command_handler::{Command, CommandHandler};
