//! Shared display helpers for pipeline commands.
//!
//! These helpers are used by `install`, `exec`, `filesystem`, `validate`
//! and `list` so that headers and step lines render the same everywhere.

use crate::config::OnError;
use crate::runner::PipelineKind;
use crate::ui::UserInterface;

/// Header shown before a pipeline runs, e.g. `Install [prod]`.
pub fn pipeline_title(kind: PipelineKind, environment: &str) -> String {
    format!("{} [{}]", kind.title(), environment)
}

/// Show the header for a pipeline run.
pub fn show_pipeline_header(ui: &mut dyn UserInterface, kind: PipelineKind, environment: &str) {
    ui.show_header(&pipeline_title(kind, environment));
}

/// Short name of an error policy.
pub fn on_error_label(on_error: OnError) -> &'static str {
    match on_error {
        OnError::None => "none",
        OnError::Stop => "stop",
        OnError::Propagate => "propagate",
    }
}

/// One listing line: priority, policy and label.
pub fn step_line(priority: i64, on_error: OnError, label: &str) -> String {
    format!("  [{:>3}] {:<9} {}", priority, on_error_label(on_error), label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;

    #[test]
    fn title_includes_environment() {
        assert_eq!(pipeline_title(PipelineKind::Install, "prod"), "Install [prod]");
        assert_eq!(pipeline_title(PipelineKind::Listing, "dev"), "List [dev]");
    }

    #[test]
    fn header_goes_through_ui() {
        let mut ui = MockUI::new();
        show_pipeline_header(&mut ui, PipelineKind::Exec, "staging");
        assert_eq!(ui.headers(), &["Exec [staging]".to_string()]);
    }

    #[test]
    fn step_line_shows_priority_and_policy() {
        assert_eq!(
            step_line(10, OnError::Stop, "echo hi"),
            "  [ 10] stop      echo hi"
        );
    }
}
