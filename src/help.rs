//! Usage and help text layout.
//!
//! Usage forms are part of the observable contract: `[-v|--verbose]` for
//! flags, `[-o|--output OUTPUT]` for options and, for positionals, `NAME`,
//! `[NAME ...]` or `NAME [NAME ...]` depending on their arity.
use crate::Nargs;

const TITLE_INDENT: &str = "    ";
const BODY_INDENT: &str = "        ";

/// `-s|--long`, or just the name when both are the same.
pub(crate) fn names(short: &str, long: &str) -> String {
    if short == long { short.into() } else { format!("{short}|{long}") }
}

/// The placeholder shown for an option's value: its long name without
/// leading dashes, upper-cased.
pub(crate) fn value_name(long: &str) -> String {
    long.trim_start_matches('-').to_uppercase()
}

pub(crate) fn flag_title(short: &str, long: &str) -> String {
    names(short, long)
}

pub(crate) fn option_title(short: &str, long: &str) -> String {
    format!("{} {}", names(short, long), value_name(long))
}

pub(crate) fn flag_usage(short: &str, long: &str) -> String {
    format!("[{}]", flag_title(short, long))
}

pub(crate) fn option_usage(short: &str, long: &str) -> String {
    format!("[{}]", option_title(short, long))
}

pub(crate) fn arg_usage(name: &str, nargs: Nargs) -> String {
    let placeholder = name.to_uppercase();
    match nargs {
        Nargs::One => placeholder,
        Nargs::ZeroOrMore => format!("[{placeholder} ...]"),
        Nargs::OneOrMore => format!("{placeholder} [{placeholder} ...]"),
    }
}

/// A title line followed by the indented description.
pub(crate) fn block(title: &str, help: &str) -> String {
    format!("{TITLE_INDENT}{title}\n{BODY_INDENT}{help}")
}

/// The usage line, `Usage: <invoked-as> <options...> <positionals...>`.
pub(crate) fn render_usage_line<'a>(
    out: &mut String,
    invoked_as: &str,
    usages: impl IntoIterator<Item = &'a str>,
) {
    out.push_str("Usage: ");
    out.push_str(invoked_as);
    for usage in usages {
        out.push(' ');
        out.push_str(usage);
    }
    out.push('\n');
}

/// A titled section of help blocks. Nothing is written for an empty section.
pub(crate) fn render_section<'a>(
    out: &mut String,
    title: &str,
    blocks: impl IntoIterator<Item = &'a str>,
) {
    let mut blocks = blocks.into_iter().peekable();
    if blocks.peek().is_none() {
        return;
    }
    out.push_str(title);
    out.push_str(":\n");
    for b in blocks {
        out.push_str(b);
        out.push('\n');
    }
}

#[test]
fn usage_forms() {
    assert_eq!(flag_usage("-v", "--verbose"), "[-v|--verbose]");
    assert_eq!(flag_usage("--long-only", "--long-only"), "[--long-only]");
    assert_eq!(option_usage("-o", "--output"), "[-o|--output OUTPUT]");
    assert_eq!(option_usage("--42", "--42"), "[--42 42]");
    assert_eq!(arg_usage("one", Nargs::One), "ONE");
    assert_eq!(arg_usage("any", Nargs::ZeroOrMore), "[ANY ...]");
    assert_eq!(arg_usage("some", Nargs::OneOrMore), "SOME [SOME ...]");
}

#[test]
fn help_block_layout() {
    assert_eq!(block("-v|--verbose", "Be loud."), "    -v|--verbose\n        Be loud.");

    let mut out = String::new();
    render_section(&mut out, "Arguments", std::iter::empty());
    assert!(out.is_empty());
    render_section(&mut out, "Arguments", ["    X\n        An x."]);
    assert_eq!(out, "Arguments:\n    X\n        An x.\n");
}
