//! Process execution and platform detection.

pub mod command;
pub mod platform;

pub use command::{
    display_command, execute, execute_streaming, CommandOptions, CommandResult,
    OutputLine,
};
pub use platform::{is_ci, is_interactive, is_terminal};
