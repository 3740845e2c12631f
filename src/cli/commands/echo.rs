//! Echo command implementation.
//!
//! The hidden `deckhand echo` command exists so install pipelines can be
//! exercised without side effects: it optionally waits, then succeeds or
//! fails on request.

use std::thread;
use std::time::Duration;

use crate::cli::args::EchoArgs;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The echo command implementation.
pub struct EchoCommand {
    args: EchoArgs,
}

impl EchoCommand {
    /// Create a new echo command.
    pub fn new(args: EchoArgs) -> Self {
        Self { args }
    }
}

impl Command for EchoCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if self.args.wait > 0 {
            let mut spinner = ui.start_spinner(&format!("Waiting {}s", self.args.wait));
            thread::sleep(Duration::from_secs(self.args.wait));
            spinner.finish_success(&format!("Waited {}s", self.args.wait));
        }

        if self.args.error {
            ui.error("Echo finished with an error");
            return Ok(CommandResult::failure(1));
        }

        ui.success("Echo finished");
        Ok(CommandResult::success())
    }
}
