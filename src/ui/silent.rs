//! UI that discards everything.
//!
//! Nested operations run against this UI unless their output is revealed,
//! so an install run only reports its own steps.

use crate::shell::OutputLine;

use super::{OutputMode, SpinnerHandle, UserInterface};

/// UI that writes nothing.
#[derive(Debug, Default)]
pub struct SilentUI;

impl SilentUI {
    /// Create a silent UI.
    pub fn new() -> Self {
        Self
    }
}

impl UserInterface for SilentUI {
    fn output_mode(&self) -> OutputMode {
        OutputMode::Silent
    }

    fn message(&mut self, _msg: &str) {}

    fn success(&mut self, _msg: &str) {}

    fn warning(&mut self, _msg: &str) {}

    fn error(&mut self, _msg: &str) {}

    fn skipped(&mut self, _msg: &str) {}

    fn start_spinner(&mut self, _message: &str) -> Box<dyn SpinnerHandle> {
        Box::new(SilentSpinner)
    }

    fn show_header(&mut self, _title: &str) {}

    fn step_output(&mut self, _line: &OutputLine) {}

    fn is_interactive(&self) -> bool {
        false
    }
}

struct SilentSpinner;

impl SpinnerHandle for SilentSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, _msg: &str) {}

    fn finish_error(&mut self, _msg: &str) {}
}
