//! Named specs: flags, valued options and constrained choices.
use std::ffi::{OsStr, OsString};
use std::fmt;

use os_str_bytes::OsStrBytesExt;

use crate::error::ConfigError;
use crate::spec::{OptionSpec, Spec};
use crate::values::{FromToken, convert};
use crate::{Error, ParseResult, Result, Tokens, help};

/// A boolean switch such as `-v|--verbose`.
#[derive(Debug, Clone)]
pub struct Flag {
    short: String,
    long: String,
    help: String,
    is_set: bool,
}

impl Flag {
    pub fn new(short: impl Into<String>, long: impl Into<String>, help: impl Into<String>) -> Self {
        Self { short: short.into(), long: long.into(), help: help.into(), is_set: false }
    }

    /// Start out set (or not). There is no way to unset a flag from the
    /// command line, use an `Opt<bool>` for that.
    #[must_use]
    pub fn with_default(mut self, is_set: bool) -> Self {
        self.is_set = is_set;
        self
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        self.is_set
    }
}

impl Spec for Flag {
    fn usage(&self) -> String {
        help::flag_usage(&self.short, &self.long)
    }

    fn help(&self) -> String {
        help::block(&help::flag_title(&self.short, &self.long), &self.help)
    }

    fn parse(&mut self, tokens: &mut Tokens) -> ParseResult {
        let hit = tokens.front().is_some_and(|t| t == self.short.as_str() || t == self.long.as_str());
        if !hit {
            return ParseResult::no_match();
        }
        tokens.pop_front();
        self.is_set = true;
        ParseResult::matched_ok()
    }
}

impl OptionSpec for Flag {
    fn short_name(&self) -> &str {
        &self.short
    }

    fn long_name(&self) -> &str {
        &self.long
    }
}

/// The validation hook of an [`Opt`], run after a value converted successfully.
pub trait Validate<T>: 'static {
    fn valid_value(&self, value: &T) -> bool;

    /// What an accepted value looks like, for rejection messages.
    fn expected(&self) -> String {
        "a value accepted by this option".into()
    }

    /// Extra text appended to the option's help.
    fn describe(&self) -> Option<String> {
        None
    }
}

/// The default hook. Every converted value is fine.
#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptAny;

impl<T> Validate<T> for AcceptAny {
    fn valid_value(&self, _: &T) -> bool {
        true
    }
}

/// Validate with a plain predicate.
#[derive(Clone, Copy)]
pub struct Predicate<F>(pub F);

impl<F> fmt::Debug for Predicate<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

impl<T, F: Fn(&T) -> bool + 'static> Validate<T> for Predicate<F> {
    fn valid_value(&self, value: &T) -> bool {
        (self.0)(value)
    }
}

/// Membership in a fixed, non-empty set of strings, ignoring case.
#[derive(Debug, Clone)]
pub struct OneOf {
    choices: Vec<String>,
}

impl OneOf {
    pub fn new<I>(choices: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item: Into<String>>,
    {
        let choices: Vec<String> = choices.into_iter().map(Into::into).collect();
        if choices.is_empty() {
            return Err(ConfigError::NoChoices);
        }
        Ok(Self { choices })
    }

    /// The allowed values, as they were declared.
    #[must_use]
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    fn quoted(&self) -> String {
        let quoted: Vec<String> = self.choices.iter().map(|c| format!("'{c}'")).collect();
        quoted.join(", ")
    }
}

impl Validate<String> for OneOf {
    fn valid_value(&self, value: &String) -> bool {
        let value = value.to_lowercase();
        self.choices.iter().any(|c| c.to_lowercase() == value)
    }

    fn expected(&self) -> String {
        format!("one of ({})", self.quoted())
    }

    fn describe(&self) -> Option<String> {
        Some(format!("  Valid values (case-insensitive): ({})", self.quoted()))
    }
}

/// An option carrying a single value, such as `-o|--output FILE`.
///
/// Matches when the front token equals the short name or starts with the long
/// name. The value is either inlined as `--long=VALUE` or taken from the next
/// token.
#[derive(Debug, Clone)]
pub struct Opt<T, V = AcceptAny> {
    short: String,
    long: String,
    help: String,
    value: T,
    validator: V,
}

impl<T: FromToken + Default> Opt<T> {
    pub fn new(short: impl Into<String>, long: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            short: short.into(),
            long: long.into(),
            help: help.into(),
            value: T::default(),
            validator: AcceptAny,
        }
    }
}

impl<T: FromToken, V: Validate<T>> Opt<T, V> {
    /// The value reported if the option never appears.
    #[must_use]
    pub fn with_default(mut self, value: T) -> Self {
        self.value = value;
        self
    }

    /// Replace the validation hook.
    pub fn with_validator<W: Validate<T>>(self, validator: W) -> Opt<T, W> {
        let Self { short, long, help, value, validator: _ } = self;
        Opt { short, long, help, value, validator }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn validator(&self) -> &V {
        &self.validator
    }

    /// `Some(value)` for a `--long=value` token, `None` for any other form.
    fn inline_value<'t>(&self, token: &'t OsStr) -> Option<&'t OsStr> {
        token.strip_prefix(self.long.as_str())?.strip_prefix('=')
    }

    /// Value errors always name the option by its long name, whichever form
    /// was typed.
    fn take_value(&mut self, token: &OsStr, tokens: &mut Tokens) -> Result<()> {
        let raw: OsString = match self.inline_value(token) {
            Some(v) if v.is_empty() => return Err(Error::missing_value(token)),
            Some(v) => v.to_owned(),
            None => tokens.pop_front().ok_or_else(|| Error::missing_value(token))?,
        };

        let value = convert::<T>(&self.long, &raw)?;
        if !self.validator.valid_value(&value) {
            return Err(Error::RejectedValue {
                name: self.long.clone(),
                input: raw.to_string_lossy().into_owned(),
                expected: self.validator.expected(),
            });
        }
        self.value = value;
        Ok(())
    }
}

impl<T: FromToken, V: Validate<T>> Spec for Opt<T, V> {
    fn usage(&self) -> String {
        help::option_usage(&self.short, &self.long)
    }

    fn help(&self) -> String {
        let title = help::option_title(&self.short, &self.long);
        match self.validator.describe() {
            Some(extra) => help::block(&title, &format!("{}{extra}", self.help)),
            None => help::block(&title, &self.help),
        }
    }

    fn parse(&mut self, tokens: &mut Tokens) -> ParseResult {
        let hit = tokens
            .front()
            .is_some_and(|t| t == self.short.as_str() || t.starts_with(self.long.as_str()));
        if !hit {
            return ParseResult::no_match();
        }
        let Some(token) = tokens.pop_front() else { return ParseResult::no_match() };
        self.take_value(&token, tokens).into()
    }
}

impl<T: FromToken, V: Validate<T>> OptionSpec for Opt<T, V> {
    fn short_name(&self) -> &str {
        &self.short
    }

    fn long_name(&self) -> &str {
        &self.long
    }
}

/// A string option restricted to a set of values, compared case-insensitively.
///
/// The stored value keeps the case it was given on the command line.
#[derive(Debug, Clone)]
pub struct Choice(Opt<String, OneOf>);

impl Choice {
    /// Fails right away if `choices` is empty.
    pub fn new<I>(
        short: impl Into<String>,
        long: impl Into<String>,
        help: impl Into<String>,
        choices: I,
    ) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item: Into<String>>,
    {
        let one_of = OneOf::new(choices)?;
        Ok(Self(Opt::new(short, long, help).with_validator(one_of)))
    }

    #[must_use]
    pub fn with_default(self, value: impl Into<String>) -> Self {
        Self(self.0.with_default(value.into()))
    }

    pub fn value(&self) -> &String {
        self.0.value()
    }

    pub fn choices(&self) -> &[String] {
        self.0.validator().choices()
    }
}

impl Spec for Choice {
    fn usage(&self) -> String {
        self.0.usage()
    }

    fn help(&self) -> String {
        self.0.help()
    }

    fn parse(&mut self, tokens: &mut Tokens) -> ParseResult {
        self.0.parse(tokens)
    }
}

impl OptionSpec for Choice {
    fn short_name(&self) -> &str {
        self.0.short_name()
    }

    fn long_name(&self) -> &str {
        self.0.long_name()
    }
}

#[cfg(test)]
fn queue(args: &[&str]) -> std::collections::VecDeque<OsString> {
    args.iter().map(OsString::from).collect()
}

#[test]
fn flag_matches_exact_names_only() {
    let mut flag = Flag::new("-v", "--verbose", "Be loud.");
    let mut q = queue(&["--verbose-ish"]);
    assert!(!flag.parse(Tokens::from_queue(&mut q)).matched());
    assert_eq!(q.len(), 1);

    let mut q = queue(&["-v", "--verbose"]);
    let tokens = Tokens::from_queue(&mut q);
    assert!(flag.parse(tokens).matched());
    assert!(flag.parse(tokens).matched());
    assert!(tokens.is_empty());
    assert!(flag.is_set());

    let mut q = queue(&[]);
    assert!(!Flag::new("-v", "--verbose", "").parse(Tokens::from_queue(&mut q)).matched());
}

#[test]
fn option_value_forms() {
    let mut opt = Opt::<String>::new("-o", "--output", "Where to write.");
    let mut q = queue(&["--output=a.txt", "-o", "b.txt", "--output", "c d.txt"]);
    let tokens = Tokens::from_queue(&mut q);

    assert_eq!(opt.parse(tokens), ParseResult::matched_ok());
    assert_eq!(opt.value(), "a.txt");
    assert_eq!(opt.parse(tokens), ParseResult::matched_ok());
    assert_eq!(opt.value(), "b.txt");
    assert_eq!(opt.parse(tokens), ParseResult::matched_ok());
    assert_eq!(opt.value(), "c d.txt");
    assert!(tokens.is_empty());
}

#[test]
fn option_missing_value() {
    let mut opt = Opt::<String>::new("-o", "--output", "");
    let mut q = queue(&["--output="]);
    let ret = opt.parse(Tokens::from_queue(&mut q));
    assert_eq!(ret.error(), Some(&Error::MissingValue("--output=".into())));

    let mut q = queue(&["-o"]);
    let ret = opt.parse(Tokens::from_queue(&mut q));
    assert_eq!(ret.error(), Some(&Error::MissingValue("-o".into())));
    assert_eq!(opt.value(), "");
}

#[test]
fn option_conversion_and_validation() {
    let mut opt = Opt::<i32>::new("-n", "--num-lines", "").with_validator(Predicate(|n: &i32| *n > 0));
    let mut q = queue(&["-n", "x", "-n", "0", "--num-lines=12"]);
    let tokens = Tokens::from_queue(&mut q);

    let err = opt.parse(tokens).error_msg().unwrap();
    assert_eq!(err, "Invalid value for '--num-lines': 'x'.");
    assert!(matches!(opt.parse(tokens).error(), Some(Error::RejectedValue { .. })));
    assert!(opt.parse(tokens).error().is_none());
    assert_eq!(*opt.value(), 12);
}

#[test]
fn value_errors_name_the_long_option() {
    for args in [&["-j", "x"][..], &["--jobs", "x"], &["--jobs=x"]] {
        let mut opt = Opt::<u8>::new("-j", "--jobs", "");
        let mut q = queue(args);
        let err = opt.parse(Tokens::from_queue(&mut q)).error_msg().unwrap();
        assert_eq!(err, "Invalid value for '--jobs': 'x'.", "{args:?}");
    }
}

#[test]
fn choice_ignores_case() {
    assert_eq!(Choice::new("-c", "--choice", "", Vec::<String>::new()).unwrap_err(), ConfigError::NoChoices);

    let mut choice = Choice::new("-c", "--choice", "Pick.", ["first", "SECOND", "third"]).unwrap();
    let mut q = queue(&["-c", "sEcOnD", "-c", "fourth"]);
    let tokens = Tokens::from_queue(&mut q);
    assert!(choice.parse(tokens).error().is_none());
    assert_eq!(choice.value(), "sEcOnD");

    let err = choice.parse(tokens).error_msg().unwrap();
    assert!(err.starts_with("Invalid value for '--choice': 'fourth'."), "{err}");
    assert!(choice.help().contains("('first', 'SECOND', 'third')"));
}
