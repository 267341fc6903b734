//! Exit codes for the `choc` CLI.
//!
//! Ranges:
//! - 0-9: computation finished (read the outcome from the code)
//! - 10-19: caller errors (bad arguments or settings)
//! - 20-29: internal errors

use choc_config::ValidationError;

use crate::error::IntervalError;

/// Stable process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Interval computed and covered.
    Success = 0,

    /// No hypothesis on the grid covers the observation.
    NoCoverage = 1,

    /// Invalid argument or physical parameter.
    ArgsError = 10,

    /// Settings file unreadable, malformed, or inconsistent.
    SettingsError = 11,

    /// Unexpected failure (bug).
    InternalError = 20,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Codes below 10 mean the computation ran to completion.
    pub fn is_operational(self) -> bool {
        (self as i32) < 10
    }

    pub fn is_user_error(self) -> bool {
        (10..20).contains(&(self as i32))
    }

    pub fn code_name(self) -> &'static str {
        match self {
            ExitCode::Success => "OK",
            ExitCode::NoCoverage => "OK_NO_COVERAGE",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::SettingsError => "ERR_SETTINGS",
            ExitCode::InternalError => "ERR_INTERNAL",
        }
    }

    /// Map an engine error onto the exit code contract.
    pub fn for_error(err: &IntervalError) -> Self {
        match err {
            IntervalError::Config(e) if !matches!(e, ValidationError::InvalidValue { .. }) => {
                ExitCode::SettingsError
            }
            e if e.is_invalid_parameter() => ExitCode::ArgsError,
            _ => ExitCode::InternalError,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code as u8)
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::NoCoverage.as_i32(), 1);
        assert_eq!(ExitCode::ArgsError.as_i32(), 10);
        assert_eq!(ExitCode::SettingsError.as_i32(), 11);
        assert_eq!(ExitCode::InternalError.as_i32(), 20);
    }

    #[test]
    fn ranges() {
        assert!(ExitCode::NoCoverage.is_operational());
        assert!(ExitCode::SettingsError.is_user_error());
        assert!(!ExitCode::InternalError.is_user_error());
        assert_eq!(ExitCode::NoCoverage.to_string(), "OK_NO_COVERAGE (1)");
    }

    #[test]
    fn error_mapping() {
        let bad_value: IntervalError = ValidationError::InvalidValue {
            field: "cl".into(),
            message: "out of range".into(),
        }
        .into();
        assert_eq!(ExitCode::for_error(&bad_value), ExitCode::ArgsError);

        let parse: IntervalError = ValidationError::ParseError("eof".into()).into();
        assert_eq!(ExitCode::for_error(&parse), ExitCode::SettingsError);

        let numeric = IntervalError::NumericFailure("nan".into());
        assert_eq!(ExitCode::for_error(&numeric), ExitCode::ArgsError);
    }
}
