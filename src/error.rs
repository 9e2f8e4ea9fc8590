//! Failures reported by the matching engine.
//!
//! Errors come in two tiers. Per-spec errors are produced while a single spec
//! consumes its tokens and are surfaced through
//! [`ParseResult::match_with_error`][crate::ParseResult::match_with_error].
//! Structural errors are detected by the parser itself, outside of any one
//! spec. Both end the parse immediately.
use std::ffi::OsStr;

use thiserror::Error;

/// Exit code for any user-facing parse failure.
pub const EXIT_USAGE: i32 = 1;
/// Exit code for an invocation the engine cannot make sense of at all.
pub const EXIT_INTERNAL: i32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// The token is not a textual representation of the target type.
    #[error("Invalid value for '{name}': '{input}'.")]
    InvalidValue { name: String, input: String },
    /// A prefix of the token converted but trailing characters remain.
    #[error("Could not completely convert value for '{name}': '{input}' (incomplete conversion).")]
    IncompleteConversion { name: String, input: String },
    /// An option marker with nothing after it.
    #[error("No value provided: '{0}'")]
    MissingValue(String),
    /// The value converted, but the option's validation hook refused it.
    #[error("Invalid value for '{name}': '{input}'. Expected {expected}.")]
    RejectedValue { name: String, input: String, expected: String },

    #[error("Unknown option '{0}'")]
    UnknownOption(String),
    #[error("Unsupported argument(s): {}", .0.join(" "))]
    UnsupportedArguments(Vec<String>),
    #[error("Wrong number of value(s) for required parameter '{usage}'.  Expected {expected}, got {got}")]
    WrongNumberOfValues { usage: String, expected: &'static str, got: usize },
    #[error("internal error: empty token sequence")]
    EmptyTokens,
}

impl Error {
    pub(crate) fn invalid_value(name: &str, input: &OsStr) -> Self {
        Self::InvalidValue { name: name.into(), input: input.to_string_lossy().into_owned() }
    }

    pub(crate) fn incomplete_conversion(name: &str, input: &OsStr) -> Self {
        Self::IncompleteConversion { name: name.into(), input: input.to_string_lossy().into_owned() }
    }

    pub(crate) fn missing_value(token: &OsStr) -> Self {
        Self::MissingValue(token.to_string_lossy().into_owned())
    }

    /// Whether this error was raised by the parser rather than by a single spec.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::UnknownOption(_)
                | Self::UnsupportedArguments(_)
                | Self::WrongNumberOfValues { .. }
                | Self::EmptyTokens
        )
    }

    /// The process exit code this error maps to.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::EmptyTokens => EXIT_INTERNAL,
            _ => EXIT_USAGE,
        }
    }
}

/// A spec was built in a way that can never parse anything.
///
/// This is a programming error and is raised when the spec is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("At least one choice must be specified.")]
    NoChoices,
}

#[test]
fn messages() {
    let err = Error::incomplete_conversion("value", "23tail".as_ref());
    assert_eq!(
        err.to_string(),
        "Could not completely convert value for 'value': '23tail' (incomplete conversion)."
    );
    assert!(!err.is_structural());

    let err = Error::UnsupportedArguments(vec!["200".into(), "300".into()]);
    assert_eq!(err.to_string(), "Unsupported argument(s): 200 300");
    assert!(err.is_structural());
    assert_eq!(err.exit_code(), EXIT_USAGE);

    assert_eq!(Error::EmptyTokens.exit_code(), EXIT_INTERNAL);
}
