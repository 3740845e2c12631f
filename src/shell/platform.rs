//! Platform and environment detection.

/// Check if running in a CI environment.
///
/// Used by `main()` to pick the non-interactive UI.
/// Checks common CI environment variables: `CI`, `GITHUB_ACTIONS`,
/// `GITLAB_CI`, `CIRCLECI`, `TRAVIS`, `JENKINS_URL`.
pub fn is_ci() -> bool {
    ["CI", "GITHUB_ACTIONS", "GITLAB_CI", "CIRCLECI", "TRAVIS", "JENKINS_URL"]
        .iter()
        .any(|var| std::env::var_os(var).is_some())
}

/// Whether stdout is attached to a terminal.
pub fn is_terminal() -> bool {
    console::Term::stdout().is_term()
}

/// Whether a decorated, spinner-capable UI should be used.
pub fn is_interactive() -> bool {
    is_terminal() && !is_ci()
}
