//! *Declarative command line argument specs and the engine that matches them.*
//!
//! Register typed specs on an [`ArgumentParser`]: boolean [`Flag`]s, valued
//! [`Opt`]ions, case-insensitive [`Choice`]s and positional [`Argument`]s with
//! an arity ([`Nargs`]). Then hand the parser the raw tokens once. It decides
//! which spec consumes which tokens, converts and validates the values, and
//! either leaves the values on the specs or reports an error with the usage
//! and an exit code.
//!
//! ```
//! use argspec::{ArgumentParser, Nargs};
//!
//! let mut parser = ArgumentParser::with_writers("Add numbers.", Vec::new(), Vec::new());
//! let verbose = parser.flag("-v", "--verbose", "Show the work.");
//! let values = parser.argument::<i64>("values", Nargs::OneOrMore, "Numbers to add.");
//!
//! parser.parse_args(["add", "1", "-v", "2", "3"]).unwrap();
//! assert!(!parser.should_exit());
//! assert!(parser[verbose].is_set());
//! assert_eq!(parser[values].values(), [1, 2, 3]);
//! ```
//!
//! Errors never abort the process. Check [`ArgumentParser::should_exit`] and
//! exit with [`ArgumentParser::exit_code`] yourself.
#![forbid(unsafe_code)]

mod error;
mod help;
mod named;
mod runtime;
mod shared;
mod spec;
mod tokens;
mod unnamed;
mod values;

pub use crate::error::{ConfigError, EXIT_INTERNAL, EXIT_USAGE, Error};
pub use crate::named::{AcceptAny, Choice, Flag, OneOf, Opt, Predicate, Validate};
pub use crate::runtime::{ArgumentParser, Handle};
pub use crate::shared::{Nargs, ParseResult};
pub use crate::spec::{OptionSpec, PositionalSpec, Spec};
pub use crate::tokens::Tokens;
pub use crate::unnamed::Argument;
pub use crate::values::{FromToken, convert};

pub type Result<T, E = Error> = std::result::Result<T, E>;
