//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion.
//!
//! # Example
//!
//! ```
//! use deckhand::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//!
//! // Use ui in code under test...
//! ui.message("Starting install");
//! ui.success("Done!");
//!
//! // Assert on captured interactions
//! assert!(ui.messages().contains(&"Starting install".to_string()));
//! assert!(ui.successes().contains(&"Done!".to_string()));
//! ```

use crate::shell::OutputLine;

use super::{OutputMode, SpinnerHandle, UserInterface};

/// Kind of a captured UI interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Captured {
    Message,
    Success,
    Warning,
    Error,
    Skipped,
    Header,
    Spinner,
    Output,
}

/// Mock UI implementation for testing.
///
/// Captures every interaction, both per kind and in one ordered transcript.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    interactive: bool,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    skipped: Vec<String>,
    headers: Vec<String>,
    spinners: Vec<String>,
    started: Vec<String>,
    output: Vec<OutputLine>,
    transcript: Vec<(Captured, String)>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new MockUI with a specific output mode.
    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Set whether this UI reports itself as interactive.
    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    /// Get all captured messages.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Get all captured success messages.
    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    /// Get all captured warnings.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Get all captured errors.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Get all captured skip notices.
    pub fn skipped_notices(&self) -> &[String] {
        &self.skipped
    }

    /// Get all captured headers.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Get all spinner messages that were started.
    pub fn spinners(&self) -> &[String] {
        &self.spinners
    }

    /// Get all revealed step output lines.
    pub fn output_lines(&self) -> &[OutputLine] {
        &self.output
    }

    /// Every interaction in the order it happened.
    pub fn transcript(&self) -> &[(Captured, String)] {
        &self.transcript
    }

    /// Check if a message containing the given text was shown.
    pub fn has_message(&self, msg: &str) -> bool {
        self.messages.iter().any(|m| m.contains(msg))
    }

    /// Check if a success message containing the given text was shown.
    pub fn has_success(&self, msg: &str) -> bool {
        self.successes.iter().any(|m| m.contains(msg))
    }

    /// Check if an error containing the given text was shown.
    pub fn has_error(&self, msg: &str) -> bool {
        self.errors.iter().any(|m| m.contains(msg))
    }

    /// Check if a warning containing the given text was shown.
    pub fn has_warning(&self, msg: &str) -> bool {
        self.warnings.iter().any(|m| m.contains(msg))
    }

    /// Check if a skip notice containing the given text was shown.
    pub fn has_skipped(&self, msg: &str) -> bool {
        self.skipped.iter().any(|m| m.contains(msg))
    }

    /// Get every step start notice, whether or not the mode shows it.
    pub fn started(&self) -> &[String] {
        &self.started
    }

    /// Clear all captured interactions.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.successes.clear();
        self.warnings.clear();
        self.errors.clear();
        self.skipped.clear();
        self.headers.clear();
        self.spinners.clear();
        self.started.clear();
        self.output.clear();
        self.transcript.clear();
    }

    fn record(&mut self, kind: Captured, text: &str) {
        self.transcript.push((kind, text.to_string()));
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
        self.record(Captured::Message, msg);
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
        self.record(Captured::Success, msg);
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
        self.record(Captured::Warning, msg);
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
        self.record(Captured::Error, msg);
    }

    fn skipped(&mut self, msg: &str) {
        self.skipped.push(msg.to_string());
        self.record(Captured::Skipped, msg);
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        self.spinners.push(message.to_string());
        self.record(Captured::Spinner, message);
        Box::new(MockSpinner::new())
    }

    fn step_started(&mut self, msg: &str) {
        self.started.push(msg.to_string());
        if self.mode.shows_progress() {
            self.message(msg);
        }
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
        self.record(Captured::Header, title);
    }

    fn step_output(&mut self, line: &OutputLine) {
        self.output.push(line.clone());
        self.record(Captured::Output, &line.to_string());
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

/// Mock spinner that captures finish messages.
#[derive(Debug, Default)]
pub struct MockSpinner {
    messages: Vec<String>,
    finish_message: Option<String>,
    status: Option<SpinnerStatus>,
}

/// Status of a mock spinner when finished.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpinnerStatus {
    /// Finished successfully.
    Success,
    /// Finished with error.
    Error,
}

impl MockSpinner {
    /// Create a new mock spinner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all messages set during spinning.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Get the final finish message.
    pub fn finish_message(&self) -> Option<&str> {
        self.finish_message.as_deref()
    }

    /// Get the final status.
    pub fn status(&self) -> Option<SpinnerStatus> {
        self.status
    }
}

impl SpinnerHandle for MockSpinner {
    fn set_message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn finish_success(&mut self, msg: &str) {
        self.finish_message = Some(msg.to_string());
        self.status = Some(SpinnerStatus::Success);
    }

    fn finish_error(&mut self, msg: &str) {
        self.finish_message = Some(msg.to_string());
        self.status = Some(SpinnerStatus::Error);
    }
}
