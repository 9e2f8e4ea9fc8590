use std::io::{self, Write};
use std::path::PathBuf;

use argspec::{
    ArgumentParser, Choice, ConfigError, Error, Flag, Nargs, Opt, OptionSpec, PositionalSpec, Predicate,
};

type TestParser = ArgumentParser<Vec<u8>, Vec<u8>>;

const DESCRIPTION: &str = "Parse some stuff.";

fn parser() -> TestParser {
    ArgumentParser::with_writers(DESCRIPTION, Vec::new(), Vec::new())
}

fn stdout(p: &TestParser) -> String {
    String::from_utf8(p.out().clone()).unwrap()
}

fn stderr(p: &TestParser) -> String {
    String::from_utf8(p.err().clone()).unwrap()
}

#[track_caller]
fn parse(p: &mut TestParser, args: &[&str], should_exit: bool, exit_code: i32) {
    p.parse_args(args).unwrap();
    assert_eq!(p.should_exit(), should_exit, "stderr: {}", stderr(p));
    assert_eq!(p.exit_code(), exit_code, "stderr: {}", stderr(p));
}

#[test]
fn empty_invocation() {
    let mut p = parser();
    p.parse_args(Vec::<String>::new()).unwrap();
    assert!(p.should_exit());
    assert_eq!(p.exit_code(), 2);
    assert!(stderr(&p).contains("internal error: empty token sequence"));
    assert!(stdout(&p).is_empty());
}

#[test]
fn help_short_circuits_missing_positionals() {
    let mut p = parser();
    let value = p.argument::<i32>("value", Nargs::One, "A value.");
    parse(&mut p, &["<exe>", "--help"], true, 0);

    let out = stdout(&p);
    assert!(out.starts_with(DESCRIPTION));
    assert!(out.contains("Usage: <exe> [-h|--help] VALUE"));
    assert!(stderr(&p).is_empty());
    assert!(!p[value].is_complete());
    assert!(p[p.help_flag()].is_set());
}

#[test]
fn help_stops_consuming() {
    let mut p = parser();
    let verbose = p.flag("-v", "--verbose", "Be verbose.");
    parse(&mut p, &["<exe>", "-h", "-v", "--bogus"], true, 0);
    assert!(!p[verbose].is_set());
    assert!(stderr(&p).is_empty());
}

#[test]
fn invoke_no_args() {
    let mut p = parser();
    let flag = p.flag("-v", "--verbose", "Show a lot of detail.");
    let output = p.option::<PathBuf>("-o", "--output", "Where to write the output.");
    let inputs = p.argument::<f64>("values_to_add", Nargs::One, "Values to add together.");
    parse(&mut p, &["<exe>"], true, 1);

    assert!(!p[flag].is_set());
    assert_eq!(p[output].value(), &PathBuf::new());
    assert!(p[inputs].values().is_empty());
    let err = stderr(&p);
    assert!(err.contains("Wrong number"));
    assert!(err.contains("VALUES_TO_ADD"));
    assert!(err.contains("Expected 1, got 0"));
}

#[test]
fn default_flags_and_options() {
    let mut p = parser();
    let flag = p.flag("-v", "--verbose", "Show a lot of detail");
    let set = p.add_option(Flag::new("-s", "-s", "Short flag.").with_default(true));
    let output = p.option::<PathBuf>("-o", "--output", "Where to write the output");
    let lines = p.add_option(Opt::<u32>::new("-n", "--num-lines", "Lines.").with_default(10));
    let x = p.argument::<i32>("x", Nargs::One, "X value.");
    parse(&mut p, &["<exe>", "42"], false, 0);

    assert!(!p[flag].is_set());
    assert!(p[set].is_set());
    assert_eq!(p[output].value(), &PathBuf::new());
    assert_eq!(*p[lines].value(), 10);
    assert_eq!(p[x].values(), [42]);
    assert!(stdout(&p).is_empty());
    assert!(stderr(&p).is_empty());
}

#[test]
fn option_forms_are_equivalent() {
    for args in [
        &["<exe>", "-o", "foo_bar.txt"][..],
        &["<exe>", "--output", "foo_bar.txt"],
        &["<exe>", "--output=foo_bar.txt"],
    ] {
        let mut p = parser();
        let output = p.option::<PathBuf>("-o", "--output", "Where to write the output");
        parse(&mut p, args, false, 0);
        assert_eq!(p[output].value(), &PathBuf::from("foo_bar.txt"));
    }
}

#[test]
fn option_missing_value() {
    for args in [&["<exe>", "-o"][..], &["<exe>", "--output"], &["<exe>", "--output="]] {
        let mut p = parser();
        let output = p.option::<PathBuf>("-o", "--output", "Where to write the output");
        parse(&mut p, args, true, 1);
        assert_eq!(p[output].value(), &PathBuf::new());
        assert!(stderr(&p).contains("No value provided"));
    }
}

#[test]
fn empty_inline_value_is_not_followed() {
    let mut p = parser();
    let output = p.option::<String>("-o", "--output", "Where to write the output");
    let required = p.argument::<String>("required_value", Nargs::One, "A required value");
    parse(&mut p, &["<exe>", "--output=", "the required value"], true, 1);

    assert_eq!(p[output].value(), "");
    assert!(p[required].values().is_empty());
    assert!(stderr(&p).contains("No value provided: '--output='"));
}

#[test]
fn invalid_option_value() {
    let mut p = parser();
    p.option::<i32>("-n", "--num-lines", "no. lines of output");
    let verbose = p.flag("-v", "--verbose", "");
    parse(&mut p, &["<exe>", "-n", "not a number", "-v"], true, 1);

    assert!(stderr(&p).contains("Invalid value for '--num-lines': 'not a number'."));
    assert!(!p[verbose].is_set(), "parsing stops at the first error");
}

#[test]
fn rejected_option_value() {
    let mut p = parser();
    let jobs = p.add_option(Opt::<u8>::new("-j", "--jobs", "Workers.").with_validator(Predicate(|n: &u8| *n > 0)));
    parse(&mut p, &["<exe>", "--jobs=0"], true, 1);

    assert_eq!(*p[jobs].value(), 0);
    assert!(stderr(&p).contains("Invalid value for '--jobs': '0'."));
}

#[test]
fn unknown_option() {
    let mut p = parser();
    p.option::<PathBuf>("-o", "--output", "Where to write the output");
    parse(&mut p, &["<exe>", "--number", "42"], true, 1);

    let err = stderr(&p);
    assert!(err.contains("Unknown option"));
    assert!(err.contains("--number"));
    assert!(!err.contains("42"));
    assert!(stdout(&p).is_empty());
}

#[test]
fn dash_tokens_go_to_positionals_first() {
    let mut p = parser();
    let numbers = p.argument::<i32>("numbers", Nargs::ZeroOrMore, "");
    parse(&mut p, &["<exe>", "-5", "6"], false, 0);
    assert_eq!(p[numbers].values(), [-5, 6]);

    let mut p = parser();
    parse(&mut p, &["<exe>", "-5"], true, 1);
    assert!(stderr(&p).contains("Unknown option '-5'"));
}

#[test]
fn flags_may_repeat() {
    let mut p = parser();
    let verbose = p.flag("-v", "--verbose", "");
    parse(&mut p, &["<exe>", "-v", "--verbose", "-v"], false, 0);
    assert!(p[verbose].is_set());
}

#[test]
fn positional_one() {
    let mut p = parser();
    let value = p.argument::<i32>("value", Nargs::One, "value");
    parse(&mut p, &["<exe>", "1"], false, 0);
    assert!(p[value].is_complete());
    assert_eq!(p[value].values(), [1]);

    let mut p = parser();
    let value = p.argument::<i32>("value", Nargs::One, "value");
    parse(&mut p, &["<exe>"], true, 1);
    assert!(!p[value].is_complete());
    assert!(stderr(&p).contains("Wrong number"));
    assert!(stderr(&p).contains("VALUE"));

    let mut p = parser();
    let value = p.argument::<i32>("value", Nargs::One, "value");
    parse(&mut p, &["<exe>", "1", "200", "300"], true, 1);
    assert!(p[value].is_complete());
    assert_eq!(p[value].values(), [1]);
    assert!(stderr(&p).contains("Unsupported argument(s): 200 300"));

    let mut p = parser();
    p.argument::<i32>("value", Nargs::One, "value");
    parse(&mut p, &["<exe>", "not a number"], true, 1);
    assert!(stderr(&p).contains("'not a number'"));
}

#[test]
fn positional_one_or_more() {
    let mut p = parser();
    let value = p.argument::<i32>("value", Nargs::OneOrMore, "value");
    parse(&mut p, &["<exe>", "1", "2", "3", "4"], false, 0);
    assert!(p[value].is_complete());
    assert_eq!(p[value].values(), [1, 2, 3, 4]);

    let mut p = parser();
    let value = p.argument::<i32>("value", Nargs::OneOrMore, "value");
    parse(&mut p, &["<exe>"], true, 1);
    assert!(!p[value].is_complete());
    assert!(stderr(&p).contains("Expected >= 1, got 0"));

    let mut p = parser();
    let value = p.argument::<i32>("value", Nargs::OneOrMore, "value");
    parse(&mut p, &["<exe>", "1", "2", "not a number", "4"], true, 1);
    assert_eq!(p[value].values(), [1, 2]);
    assert!(stderr(&p).contains("'not a number'"));
}

#[test]
fn positional_zero_or_more() {
    let mut p = parser();
    let value = p.argument::<i32>("value", Nargs::ZeroOrMore, "value");
    parse(&mut p, &["<exe>"], false, 0);
    assert!(p[value].is_complete());
    assert!(p[value].values().is_empty());

    let mut p = parser();
    let value = p.argument::<i32>("value", Nargs::ZeroOrMore, "value");
    parse(&mut p, &["<exe>", "1", "2", "3", "4"], false, 0);
    assert_eq!(p[value].values(), [1, 2, 3, 4]);
}

#[test]
fn options_interleave_with_positionals() {
    let mut p = parser();
    let verbose = p.flag("-v", "--verbose", "");
    let output = p.option::<String>("-o", "--output", "");
    let src = p.argument::<String>("src", Nargs::One, "");
    let dst = p.argument::<String>("dst", Nargs::One, "");
    parse(&mut p, &["<exe>", "a", "-o", "out", "b", "--verbose"], false, 0);

    assert!(p[verbose].is_set());
    assert_eq!(p[output].value(), "out");
    assert_eq!(p[src].values(), ["a"]);
    assert_eq!(p[dst].values(), ["b"]);
}

#[test]
fn variable_arity_starves_later_positionals() {
    let mut p = parser();
    let first = p.argument::<i32>("first", Nargs::OneOrMore, "");
    let second = p.argument::<i32>("second", Nargs::One, "");
    parse(&mut p, &["<exe>", "1", "2"], true, 1);

    assert_eq!(p[first].values(), [1, 2]);
    assert!(p[second].values().is_empty());
    assert!(stderr(&p).contains("'SECOND'"));
}

#[test]
fn only_first_incomplete_positional_is_reported() {
    let mut p = parser();
    p.argument::<String>("first", Nargs::One, "");
    p.argument::<String>("second", Nargs::OneOrMore, "");
    parse(&mut p, &["<exe>"], true, 1);

    let err = stderr(&p);
    assert_eq!(err.matches("Error:").count(), 1);
    assert!(err.contains("parameter 'FIRST'"));
    assert!(!err.contains("parameter 'SECOND"));
}

#[test]
fn incomplete_conversions() {
    for token in ["23tail", "23.5"] {
        let mut p = parser();
        p.option::<String>("-s", "--sval", "a string value");
        p.argument::<i32>("value", Nargs::ZeroOrMore, "value");
        parse(&mut p, &["<exe>", token], true, 1);

        let err = stderr(&p);
        assert!(err.contains("Could not completely convert"), "{err}");
        assert!(err.contains("incomplete conversion"), "{err}");
        assert!(!err.contains("Invalid value"), "{err}");
    }
}

#[test]
fn multi_word_string() {
    let mut p = parser();
    let sval = p.option::<String>("-s", "--sval", "a string value");
    parse(&mut p, &["<exe>", "--sval", "word after word"], false, 0);
    assert_eq!(p[sval].value(), "word after word");
}

#[test]
fn choice_is_case_insensitive() {
    let mut p = parser();
    let choice = p.choice("-c", "--choice", "Pick one.", ["first", "SECOND", "third"]).unwrap();
    parse(&mut p, &["<exe>", "-c", "sEcOnD"], false, 0);
    assert_eq!(p[choice].value(), "sEcOnD");

    let mut p = parser();
    let choice = p.choice("-c", "--choice", "Pick one.", ["first", "SECOND", "third"]).unwrap();
    parse(&mut p, &["<exe>", "--choice=Third"], false, 0);
    assert_eq!(p[choice].value(), "Third");
}

#[test]
fn choice_rejects_unknown_values() {
    let mut p = parser();
    let choice = p.choice("-c", "--choice", "Pick one.", ["first", "second"]).unwrap();
    parse(&mut p, &["<exe>", "-c", "fourth"], true, 1);

    assert_eq!(p[choice].value(), "");
    assert!(stderr(&p).contains("Invalid value for '--choice': 'fourth'."));
}

#[test]
fn empty_choice_fails_at_construction() {
    let mut p = parser();
    let err = p.choice("-c", "--choice", "Pick one.", Vec::<&str>::new()).unwrap_err();
    assert_eq!(err, ConfigError::NoChoices);
    assert!(Choice::new("-c", "--choice", "", Vec::<String>::new()).is_err());
}

#[test]
fn first_exit_code_sticks() {
    let mut p = parser();
    p.argument::<i32>("value", Nargs::One, "");
    parse(&mut p, &["<exe>"], true, 1);

    p.show_error(&Error::EmptyTokens).unwrap();
    assert_eq!(p.exit_code(), 1);
    assert_eq!(stderr(&p).matches("Error:").count(), 2);
}

#[test]
fn show_error_after_success() {
    let mut p = parser();
    let low = p.option::<i32>("-l", "--low", "");
    let high = p.option::<i32>("-H", "--high", "");
    parse(&mut p, &["<exe>", "-l", "5", "-H", "2"], false, 0);

    if p[low].value() > p[high].value() {
        let err = Error::InvalidValue { name: "--high".into(), input: p[high].value().to_string() };
        p.show_error(&err).unwrap();
    }
    assert!(p.should_exit());
    assert_eq!(p.exit_code(), 1);
    assert!(stderr(&p).starts_with("Error: Invalid value for '--high': '2'.\nUsage: <exe>"));
}

#[test]
fn handles_are_per_parser() {
    let mut a = parser();
    a.flag("-a", "--alpha", "");
    let beta = a.flag("-b", "--beta", "");
    let mut b = parser();
    b.flag("-x", "--xray", "");
    b.flag("-y", "--yankee", "");

    // Same registry slot and spec type, but another parser.
    assert!(b.get(beta).is_none());
    assert!(b.get(a.help_flag()).is_none());
    assert!(b.get(b.help_flag()).is_some());
    assert_eq!(a.get(beta).map(|f| f.long_name()), Some("--beta"));
}

#[test]
#[should_panic(expected = "does not belong to this parser")]
fn indexing_with_a_foreign_handle_panics() {
    let mut a = parser();
    let flag = a.flag("-v", "--verbose", "");
    let mut b = parser();
    b.flag("-v", "--verbose", "");
    let _ = b[flag].is_set();
}

#[test]
fn specs_read_back_after_parse() {
    let mut p = parser();
    let color = p.choice("-c", "--color", "Paint it.", ["red", "Green"]).unwrap();
    let files = p.argument::<String>("files", Nargs::OneOrMore, "Input files.");
    parse(&mut p, &["./prog", "a", "--color=GREEN", "b"], false, 0);

    assert_eq!(p.invoked_as(), "./prog");
    assert_eq!(p[color].choices(), ["red", "Green"]);
    assert_eq!((p[color].short_name(), p[color].long_name()), ("-c", "--color"));
    assert_eq!(p[files].name(), "files");
    assert_eq!(p[files].clone().into_values(), ["a", "b"]);
}

#[cfg(unix)]
#[test]
fn non_utf8_tokens() {
    use std::ffi::{OsStr, OsString};
    use std::os::unix::ffi::OsStrExt;

    fn os(b: &[u8]) -> OsString {
        OsStr::from_bytes(b).to_os_string()
    }

    let mut p = parser();
    let output = p.option::<PathBuf>("-o", "--output", "");
    p.parse_args([os(b"<exe>"), os(b"--output=\xFFa")]).unwrap();
    assert!(!p.should_exit(), "stderr: {}", stderr(&p));
    assert_eq!(p[output].value().as_os_str(), OsStr::from_bytes(b"\xFFa"));

    let mut p = parser();
    let sval = p.option::<String>("-s", "--sval", "");
    p.parse_args([os(b"<exe>"), os(b"-s"), os(b"\xFE")]).unwrap();
    assert_eq!(p.exit_code(), 1);
    assert!(stderr(&p).contains("Invalid value for '--sval'"));
    assert_eq!(p[sval].value(), "");

    let mut p = parser();
    p.parse_args([os(b"<exe>"), os(b"-\xFF")]).unwrap();
    assert_eq!(p.exit_code(), 1);
    assert!(stderr(&p).contains("Unknown option '-\u{FFFD}'"));
}

/// A sink that refuses every write.
struct Broken;

impl Write for Broken {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn write_failures_keep_the_exit_disposition() {
    let mut p = ArgumentParser::with_writers(DESCRIPTION, Broken, Broken);
    let err = p.parse_args(["<exe>", "--bogus"]).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    assert!(p.should_exit());
    assert_eq!(p.exit_code(), 1);

    let mut p = ArgumentParser::with_writers(DESCRIPTION, Broken, Vec::new());
    assert!(p.parse_args(["<exe>", "--help"]).is_err());
    assert!(p.should_exit());
    assert_eq!(p.exit_code(), 0);
    assert!(p.err().is_empty());
}
