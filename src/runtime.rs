use std::collections::VecDeque;
use std::ffi::OsString;
use std::fmt;
use std::io::{self, Stderr, Stdout, Write};
use std::marker::PhantomData;
use std::ops::Index;
use std::sync::atomic::{AtomicU64, Ordering};

use os_str_bytes::OsStrBytesExt;

use crate::error::ConfigError;
use crate::spec::{OptionSpec, PositionalSpec, Spec};
use crate::values::FromToken;
use crate::{Argument, Choice, Error, Flag, Nargs, Opt, ParseResult, Tokens, help};

const HELP_TEXT: &str = "Show this help message and exit.";

static NEXT_PARSER_ID: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Registry {
    Named,
    Positional,
}

/// A typed reference to a spec owned by an [`ArgumentParser`].
///
/// Use it to read the spec back after parsing, via [`ArgumentParser::get`] or
/// by indexing the parser.
pub struct Handle<S> {
    parser: u64,
    registry: Registry,
    index: usize,
    _marker: PhantomData<fn() -> S>,
}

impl<S> Handle<S> {
    fn new(parser: u64, registry: Registry, index: usize) -> Self {
        Self { parser, registry, index, _marker: PhantomData }
    }
}

impl<S> Clone for Handle<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for Handle<S> {}

impl<S> fmt::Debug for Handle<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("parser", &self.parser)
            .field("registry", &self.registry)
            .field("index", &self.index)
            .finish()
    }
}

/// Why the consumption loop stopped before running out of tokens.
enum Stop {
    Help,
    Failed(Error),
}

/// Owns the registered specs and matches a token sequence against them.
///
/// Help goes to `out`, every error report goes to `err`. A parser is meant to
/// parse once: positional specs only ever append, so a second call would add
/// to the values of the first.
pub struct ArgumentParser<O = Stdout, E = Stderr> {
    id: u64,
    description: String,
    invoked_as: String,
    options: Vec<Box<dyn OptionSpec>>,
    positionals: Vec<Box<dyn PositionalSpec>>,
    help_flag: Handle<Flag>,
    exit_code: Option<i32>,
    out: O,
    err: E,
}

impl ArgumentParser {
    /// A parser writing to the process' stdout and stderr.
    pub fn new(description: impl Into<String>) -> Self {
        Self::with_writers(description, io::stdout(), io::stderr())
    }
}

impl<O, E> fmt::Debug for ArgumentParser<O, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgumentParser")
            .field("id", &self.id)
            .field("description", &self.description)
            .field("invoked_as", &self.invoked_as)
            .field("options", &self.options.len())
            .field("positionals", &self.positionals.len())
            .field("exit_code", &self.exit_code)
            .finish_non_exhaustive()
    }
}

impl<O, E> ArgumentParser<O, E> {
    /// Read a spec back. `None` if the handle came from another parser.
    pub fn get<S: Spec>(&self, handle: Handle<S>) -> Option<&S> {
        if handle.parser != self.id {
            return None;
        }
        let any = match handle.registry {
            Registry::Named => {
                let spec: &dyn OptionSpec = &**self.options.get(handle.index)?;
                spec.as_any()
            }
            Registry::Positional => {
                let spec: &dyn PositionalSpec = &**self.positionals.get(handle.index)?;
                spec.as_any()
            }
        };
        any.downcast_ref()
    }

    /// The implicit `-h|--help` flag, always the first option.
    pub fn help_flag(&self) -> Handle<Flag> {
        self.help_flag
    }

    /// The first token of the last parse.
    pub fn invoked_as(&self) -> &str {
        &self.invoked_as
    }

    /// Whether the caller should terminate, with [`Self::exit_code`].
    pub fn should_exit(&self) -> bool {
        self.exit_code.is_some()
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code.unwrap_or(0)
    }

    pub fn out(&self) -> &O {
        &self.out
    }

    pub fn err(&self) -> &E {
        &self.err
    }

    pub fn into_writers(self) -> (O, E) {
        (self.out, self.err)
    }

    /// The usage line followed by the help of every spec, options first.
    pub fn usage(&self) -> String {
        let mut out = String::new();
        let usages: Vec<String> = self
            .options
            .iter()
            .map(|spec| spec.usage())
            .chain(self.positionals.iter().map(|spec| spec.usage()))
            .collect();
        help::render_usage_line(&mut out, &self.invoked_as, usages.iter().map(String::as_str));

        let blocks: Vec<String> = self.options.iter().map(|spec| spec.help()).collect();
        help::render_section(&mut out, "Options", blocks.iter().map(String::as_str));
        let blocks: Vec<String> = self.positionals.iter().map(|spec| spec.help()).collect();
        help::render_section(&mut out, "Arguments", blocks.iter().map(String::as_str));
        out
    }

    /// The description followed by the usage block, as printed for `--help`.
    pub fn help(&self) -> String {
        format!("{}\n{}", self.description, self.usage())
    }

    /// The first exit code recorded during a parse sticks.
    fn set_exit(&mut self, code: i32) {
        self.exit_code.get_or_insert(code);
    }

    fn help_requested(&self) -> bool {
        self.get(self.help_flag).is_some_and(Flag::is_set)
    }

    /// Offer the front tokens to each option, then to each positional.
    fn consume(&mut self, tokens: &mut Tokens) -> Result<(), Stop> {
        while !tokens.is_empty() {
            let ret = match offer(&mut self.options, tokens) {
                Some(ret) => Some(ret),
                None => offer(&mut self.positionals, tokens),
            };
            let Some(ret) = ret else { return Err(Stop::Failed(unmatched(tokens))) };
            if let Some(err) = ret.into_error() {
                return Err(Stop::Failed(err));
            }
            // Help wins over anything that is still missing.
            if self.help_requested() {
                return Err(Stop::Help);
            }
        }
        Ok(())
    }

    /// The first positional without enough values, if any.
    fn incomplete(&self) -> Option<Error> {
        let spec = self.positionals.iter().find(|spec| !spec.is_complete())?;
        Some(Error::WrongNumberOfValues {
            usage: spec.usage(),
            expected: spec.nargs().expected(),
            got: spec.num_values(),
        })
    }
}

impl<O: Write, E: Write> ArgumentParser<O, E> {
    /// A parser writing help to `out` and errors to `err`.
    pub fn with_writers(description: impl Into<String>, out: O, err: E) -> Self {
        let help = Flag::new("-h", "--help", HELP_TEXT);
        let id = NEXT_PARSER_ID.fetch_add(1, Ordering::Relaxed);
        Self {
            id,
            description: description.into(),
            invoked_as: String::new(),
            options: vec![Box::new(help)],
            positionals: Vec::new(),
            help_flag: Handle::new(id, Registry::Named, 0),
            exit_code: None,
            out,
            err,
        }
    }

    /// Register a named spec. Registration order is matching precedence.
    pub fn add_option<S: OptionSpec>(&mut self, spec: S) -> Handle<S> {
        self.options.push(Box::new(spec));
        Handle::new(self.id, Registry::Named, self.options.len() - 1)
    }

    /// Register a positional spec. Registration order is matching precedence.
    pub fn add_arg<S: PositionalSpec>(&mut self, spec: S) -> Handle<S> {
        self.positionals.push(Box::new(spec));
        Handle::new(self.id, Registry::Positional, self.positionals.len() - 1)
    }

    pub fn flag(
        &mut self,
        short: impl Into<String>,
        long: impl Into<String>,
        help: impl Into<String>,
    ) -> Handle<Flag> {
        self.add_option(Flag::new(short, long, help))
    }

    pub fn option<T: FromToken + Default>(
        &mut self,
        short: impl Into<String>,
        long: impl Into<String>,
        help: impl Into<String>,
    ) -> Handle<Opt<T>> {
        self.add_option(Opt::new(short, long, help))
    }

    pub fn choice<I>(
        &mut self,
        short: impl Into<String>,
        long: impl Into<String>,
        help: impl Into<String>,
        choices: I,
    ) -> Result<Handle<Choice>, ConfigError>
    where
        I: IntoIterator<Item: Into<String>>,
    {
        Ok(self.add_option(Choice::new(short, long, help, choices)?))
    }

    pub fn argument<T: FromToken>(
        &mut self,
        name: impl Into<String>,
        nargs: Nargs,
        help: impl Into<String>,
    ) -> Handle<Argument<T>> {
        self.add_arg(Argument::new(name, nargs, help))
    }

    /// Parse `args`, whose first item is the name the program was invoked as.
    ///
    /// Parse failures are not returned: they are reported to the error sink
    /// and recorded for [`Self::should_exit`] and [`Self::exit_code`]. Only a
    /// failure to write a report is an `Err`.
    pub fn parse_args<I, T>(&mut self, args: I) -> io::Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let mut queue: VecDeque<OsString> = args.into_iter().map(Into::into).collect();
        let Some(arg0) = queue.pop_front() else {
            return self.show_error(&Error::EmptyTokens);
        };
        self.invoked_as = arg0.to_string_lossy().into_owned();
        tracing::debug!(invoked_as = %self.invoked_as, tokens = queue.len(), "parsing arguments");

        let tokens = Tokens::from_queue(&mut queue);
        match self.consume(tokens) {
            Err(Stop::Help) => self.show_help(),
            Err(Stop::Failed(err)) => self.show_error(&err),
            Ok(()) => match self.incomplete() {
                Some(err) => self.show_error(&err),
                None => {
                    tracing::debug!("arguments parsed");
                    Ok(())
                }
            },
        }
    }

    /// Parse the arguments of the current process.
    pub fn parse_env(&mut self) -> io::Result<()> {
        self.parse_args(std::env::args_os())
    }

    /// Report `err` followed by the usage block, and record its exit code.
    ///
    /// Also usable after parsing, for checks the specs cannot express.
    pub fn show_error(&mut self, err: &Error) -> io::Result<()> {
        tracing::debug!(%err, structural = err.is_structural(), "parse failed");
        self.set_exit(err.exit_code());
        let report = format!("Error: {err}\n{}", self.usage());
        self.err.write_all(report.as_bytes())?;
        self.err.flush()
    }

    fn show_help(&mut self) -> io::Result<()> {
        tracing::debug!("help requested");
        self.set_exit(0);
        let report = self.help();
        self.out.write_all(report.as_bytes())?;
        self.out.flush()
    }
}

impl<S: Spec, O, E> Index<Handle<S>> for ArgumentParser<O, E> {
    type Output = S;

    /// Panics if the handle came from another parser.
    fn index(&self, handle: Handle<S>) -> &S {
        match self.get(handle) {
            Some(spec) => spec,
            None => panic!("{handle:?} does not belong to this parser"),
        }
    }
}

/// First-match-wins over `specs`, in registration order.
fn offer<S: Spec + ?Sized>(specs: &mut [Box<S>], tokens: &mut Tokens) -> Option<ParseResult> {
    for (idx, spec) in specs.iter_mut().enumerate() {
        let ret = spec.parse(tokens);
        if ret.matched() {
            tracing::trace!(idx, usage = %spec.usage(), error = ret.error().is_some(), "spec matched");
            return Some(ret);
        }
    }
    None
}

/// The error for a front token nobody wanted.
fn unmatched(tokens: &mut Tokens) -> Error {
    if let Some(t) = tokens.front().filter(|t| t.starts_with('-')) {
        return Error::UnknownOption(t.to_string_lossy().into_owned());
    }
    let rest = tokens.drain().map(|t| t.to_string_lossy().into_owned()).collect();
    Error::UnsupportedArguments(rest)
}
