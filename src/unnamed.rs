use crate::spec::{PositionalSpec, Spec};
use crate::values::{FromToken, convert};
use crate::{Nargs, ParseResult, Tokens, help};

/// A positional argument, accumulating one value per matched token.
///
/// With [`Nargs::One`] the spec stops matching once it holds a value, so the
/// next positional spec gets its turn. The variable arities never stop
/// matching while tokens remain: a `ZeroOrMore` or `OneOrMore` spec registered
/// before another positional starves it, unless an option interrupts the run.
#[derive(Debug, Clone)]
pub struct Argument<T> {
    name: String,
    nargs: Nargs,
    help: String,
    values: Vec<T>,
}

impl<T: FromToken> Argument<T> {
    pub fn new(name: impl Into<String>, nargs: Nargs, help: impl Into<String>) -> Self {
        Self { name: name.into(), nargs, help: help.into(), values: Vec::new() }
    }

    /// Matched values, in command line order.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn nargs(&self) -> Nargs {
        self.nargs
    }

    pub fn num_values(&self) -> usize {
        self.values.len()
    }

    /// Whether enough values were matched for the arity.
    pub fn is_complete(&self) -> bool {
        self.nargs.is_satisfied_by(self.values.len())
    }

    /// Consume the spec, keeping only its values.
    pub fn into_values(self) -> Vec<T> {
        self.values
    }
}

impl<T: FromToken> Spec for Argument<T> {
    fn usage(&self) -> String {
        help::arg_usage(&self.name, self.nargs)
    }

    fn help(&self) -> String {
        help::block(&self.usage(), &self.help)
    }

    fn parse(&mut self, tokens: &mut Tokens) -> ParseResult {
        if self.nargs == Nargs::One && !self.values.is_empty() {
            return ParseResult::no_match();
        }
        let Some(token) = tokens.pop_front() else { return ParseResult::no_match() };
        match convert::<T>(&self.name, &token) {
            Ok(v) => {
                self.values.push(v);
                ParseResult::matched_ok()
            }
            Err(err) => ParseResult::match_with_error(err),
        }
    }
}

impl<T: FromToken> PositionalSpec for Argument<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn nargs(&self) -> Nargs {
        self.nargs
    }

    fn num_values(&self) -> usize {
        Argument::num_values(self)
    }

    fn is_complete(&self) -> bool {
        Argument::is_complete(self)
    }
}

#[cfg(test)]
fn queue(args: &[&str]) -> std::collections::VecDeque<std::ffi::OsString> {
    args.iter().map(Into::into).collect()
}

#[test]
fn one_takes_a_single_value() {
    let mut arg = Argument::<i32>::new("value", Nargs::One, "A value.");
    assert!(!arg.is_complete());

    let mut q = queue(&["1", "200"]);
    let tokens = Tokens::from_queue(&mut q);
    assert!(arg.parse(tokens).matched());
    assert!(!arg.parse(tokens).matched());
    assert_eq!(tokens.len(), 1);
    assert_eq!(arg.values(), [1]);
    assert_eq!(arg.num_values(), 1);
    assert!(arg.is_complete());
}

#[test]
fn variable_arity_is_greedy() {
    let mut arg = Argument::<f64>::new("any", Nargs::ZeroOrMore, "");
    assert!(arg.is_complete());

    let mut q = queue(&["1", "2.5", "-3"]);
    let tokens = Tokens::from_queue(&mut q);
    while arg.parse(tokens).matched() {}
    assert_eq!(arg.values(), [1.0, 2.5, -3.0]);

    let mut some = Argument::<i32>::new("some", Nargs::OneOrMore, "");
    assert!(!some.is_complete());
    let mut q = queue(&["7"]);
    assert!(some.parse(Tokens::from_queue(&mut q)).matched());
    assert!(some.is_complete());
}

#[test]
fn conversion_failure_still_consumes() {
    let mut arg = Argument::<i32>::new("value", Nargs::OneOrMore, "");
    let mut q = queue(&["not a number", "2"]);
    let tokens = Tokens::from_queue(&mut q);
    let ret = arg.parse(tokens);
    assert!(ret.matched());
    assert_eq!(ret.error_msg().as_deref(), Some("Invalid value for 'value': 'not a number'."));
    assert_eq!(tokens.len(), 1);
    assert!(arg.values().is_empty());
}
