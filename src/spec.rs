//! The capability set shared by every kind of spec.
use std::any::Any;

use crate::{Nargs, ParseResult, Tokens};

/// Type erasure helper so registries of `dyn Spec` can hand back concrete specs.
#[doc(hidden)]
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A registered description of something on the command line, together with
/// the value(s) it has accumulated.
pub trait Spec: AsAny {
    /// The bracketed form shown in the usage line.
    fn usage(&self) -> String;

    /// The detailed help block.
    fn help(&self) -> String;

    /// Try to consume tokens from the front of `tokens`.
    ///
    /// A spec must leave `tokens` untouched when it returns
    /// [`ParseResult::no_match`].
    fn parse(&mut self, tokens: &mut Tokens) -> ParseResult;
}

/// Specs matched by name: flags, options and choices.
pub trait OptionSpec: Spec {
    fn short_name(&self) -> &str;
    fn long_name(&self) -> &str;
}

/// Specs matched by position.
pub trait PositionalSpec: Spec {
    fn name(&self) -> &str;

    fn nargs(&self) -> Nargs;

    fn num_values(&self) -> usize;

    /// Whether enough values were matched. Only meaningful after parsing.
    fn is_complete(&self) -> bool {
        self.nargs().is_satisfied_by(self.num_values())
    }
}
