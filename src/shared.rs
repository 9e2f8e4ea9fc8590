//! Vocabulary spoken between specs and the parser.
use crate::Error;

/// How many positional tokens an [`Argument`][crate::Argument] accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nargs {
    /// Exactly one.
    One,
    /// Zero or more.
    ZeroOrMore,
    /// At least one.
    OneOrMore,
}

impl Nargs {
    /// Human readable expected count, used in "wrong number" reports.
    #[must_use]
    pub fn expected(self) -> &'static str {
        match self {
            Self::One => "1",
            Self::ZeroOrMore => ">= 0",
            Self::OneOrMore => ">= 1",
        }
    }

    /// Whether `count` values satisfy this arity.
    #[must_use]
    pub fn is_satisfied_by(self, count: usize) -> bool {
        match self {
            Self::One => count == 1,
            Self::ZeroOrMore => true,
            Self::OneOrMore => count >= 1,
        }
    }
}

/// The outcome of offering the remaining tokens to one spec.
///
/// A spec that declines the tokens never carries an error, which is why there
/// is no public constructor taking both parts.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct ParseResult {
    matched: bool,
    error: Option<Error>,
}

impl ParseResult {
    pub fn no_match() -> Self {
        Self { matched: false, error: None }
    }

    pub fn matched_ok() -> Self {
        Self { matched: true, error: None }
    }

    /// The spec claimed the leading token(s) but could not use them.
    pub fn match_with_error(error: Error) -> Self {
        Self { matched: true, error: Some(error) }
    }

    #[must_use]
    pub fn matched(&self) -> bool {
        self.matched
    }

    #[must_use]
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    #[must_use]
    pub fn error_msg(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    pub(crate) fn into_error(self) -> Option<Error> {
        self.error
    }
}

impl From<crate::Result<()>> for ParseResult {
    fn from(ret: crate::Result<()>) -> Self {
        match ret {
            Ok(()) => Self::matched_ok(),
            Err(err) => Self::match_with_error(err),
        }
    }
}

#[test]
fn parse_result_states() {
    let r = ParseResult::no_match();
    assert!(!r.matched());
    assert_eq!(r.error_msg(), None);

    let r = ParseResult::matched_ok();
    assert!(r.matched());
    assert!(r.error().is_none());

    let r = ParseResult::match_with_error(Error::MissingValue("-o".into()));
    assert!(r.matched());
    assert_eq!(r.error_msg().as_deref(), Some("No value provided: '-o'"));
}

#[test]
fn nargs_counts() {
    assert!(Nargs::One.is_satisfied_by(1));
    assert!(!Nargs::One.is_satisfied_by(0));
    assert!(!Nargs::One.is_satisfied_by(2));
    assert!(Nargs::ZeroOrMore.is_satisfied_by(0));
    assert!(!Nargs::OneOrMore.is_satisfied_by(0));
    assert!(Nargs::OneOrMore.is_satisfied_by(3));
    assert_eq!(Nargs::OneOrMore.expected(), ">= 1");
}
