//! User interface components.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for interactive terminal usage
//! - [`NonInteractiveUI`] for CI/headless environments
//! - [`SilentUI`] for nested operations whose output is not revealed
//! - Spinners and tables
//!
//! # Example
//!
//! ```
//! use deckhand::ui::{create_ui, OutputMode};
//!
//! // Use non-interactive mode for testability
//! let mut ui = create_ui(false, OutputMode::Quiet);
//! ui.show_header("Install");
//! ui.success("Install finished");
//! ```

pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod silent;
pub mod spinner;
pub mod table;
pub mod terminal;
pub mod theme;

pub use mock::{MockSpinner, MockUI};
pub use non_interactive::NonInteractiveUI;
pub use output::OutputMode;
pub use silent::SilentUI;
pub use spinner::ProgressSpinner;
pub use table::Table;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, DeckhandTheme};

use crate::shell::OutputLine;

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Display a notice about something that was not done.
    fn skipped(&mut self, msg: &str);

    /// Start a spinner for an operation.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    /// Announce that a pipeline step is about to run.
    ///
    /// Modes without per-step progress drop the notice.
    fn step_started(&mut self, msg: &str) {
        if self.output_mode().shows_progress() {
            self.message(msg);
        }
    }

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// Show one line of revealed step output.
    fn step_output(&mut self, line: &OutputLine);

    /// Show a rendered table.
    fn show_table(&mut self, table: &Table) {
        self.message(&table.render());
    }

    /// Check if running in interactive mode.
    fn is_interactive(&self) -> bool;
}

/// Handle for controlling a spinner.
pub trait SpinnerHandle {
    /// Update the spinner message.
    fn set_message(&mut self, msg: &str);

    /// Mark the operation as successful.
    fn finish_success(&mut self, msg: &str);

    /// Mark the operation as failed.
    fn finish_error(&mut self, msg: &str);
}
