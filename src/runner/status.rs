//! Canonical exit status space.

use serde::{Serialize, Serializer};

/// Integer status produced by a step or a whole pipeline.
///
/// `0`, `1` and `2` have names; any other code is carried verbatim so that
/// meaningful step exit codes survive all the way to the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExitStatus {
    /// Everything worked.
    #[default]
    Success,
    /// Generic failure.
    Failure,
    /// Invalid usage, unknown environment, or misconfiguration.
    Invalid,
    /// Any other code, passed through untouched.
    Other(i32),
}

impl ExitStatus {
    /// Numeric value of the status.
    pub fn code(&self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
            Self::Invalid => 2,
            Self::Other(code) => *code,
        }
    }

    /// Whether this is [`ExitStatus::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Status of a finished child process.
    ///
    /// A process killed by a signal has no exit code and counts as a
    /// generic failure.
    pub fn from_process(status: std::process::ExitStatus) -> Self {
        status.code().map_or(Self::Failure, Self::from)
    }
}

impl From<i32> for ExitStatus {
    fn from(code: i32) -> Self {
        match code {
            0 => Self::Success,
            1 => Self::Failure,
            2 => Self::Invalid,
            other => Self::Other(other),
        }
    }
}

impl From<ExitStatus> for i32 {
    fn from(status: ExitStatus) -> Self {
        status.code()
    }
}

impl std::fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Serialize for ExitStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_codes_round_trip() {
        assert_eq!(ExitStatus::from(0), ExitStatus::Success);
        assert_eq!(ExitStatus::from(1), ExitStatus::Failure);
        assert_eq!(ExitStatus::from(2), ExitStatus::Invalid);
        assert_eq!(ExitStatus::Invalid.code(), 2);
    }

    #[test]
    fn other_codes_pass_through() {
        assert_eq!(ExitStatus::from(127), ExitStatus::Other(127));
        assert_eq!(ExitStatus::from(-3).code(), -3);
    }

    #[test]
    fn only_zero_is_success() {
        assert!(ExitStatus::Success.is_success());
        assert!(!ExitStatus::Other(42).is_success());
        assert_eq!(ExitStatus::default(), ExitStatus::Success);
    }

    #[cfg(unix)]
    #[test]
    fn from_process_uses_exit_code() {
        let status = std::process::Command::new("sh")
            .args(["-c", "exit 3"])
            .status()
            .unwrap();
        assert_eq!(ExitStatus::from_process(status), ExitStatus::Other(3));
    }
}
