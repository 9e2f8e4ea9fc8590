use std::path::PathBuf;

use argspec::{Argument, ArgumentParser, Flag, Nargs, Opt};
use expect_test::{Expect, expect};

type TestParser = ArgumentParser<Vec<u8>, Vec<u8>>;

/// A parser where most of the usage decorations show up.
fn kitchen_sink() -> TestParser {
    let mut p = ArgumentParser::with_writers("Parse some stuff.", Vec::new(), Vec::new());
    p.add_option(Flag::new("-s", "-s", "Short flag.").with_default(true));
    p.add_option(Flag::new("-l", "--long", "Long flag."));
    // Only a long name: pass it twice.
    p.add_option(Flag::new("--long-only", "--long-only", "I have only a long name."));
    p.add_option(Opt::<bool>::new("--42", "--42", "Whether or not to show the answer."));
    p.add_option(Opt::<PathBuf>::new("-o", "--output", "Where to write the output."));
    p.choice("-c", "--color", "Paint it.", ["red", "Green"]).unwrap();

    // Nothing stops impossible positional sequences: "some" leaves nothing for "any".
    p.add_arg(Argument::<String>::new("one", Nargs::One, "One arg."));
    p.add_arg(Argument::<i32>::new("some", Nargs::OneOrMore, "One or more."));
    p.add_arg(Argument::<f64>::new("any", Nargs::ZeroOrMore, "Any."));
    p
}

#[track_caller]
fn assert_out(mut p: TestParser, args: &[&str], stdout: Expect, stderr: Expect) {
    p.parse_args(args).unwrap();
    let (out, err) = p.into_writers();
    stdout.assert_eq(&String::from_utf8(out).unwrap());
    stderr.assert_eq(&String::from_utf8(err).unwrap());
}

#[test]
fn long_help() {
    assert_out(
        kitchen_sink(),
        &["me", "--help"],
        expect![[r#"
            Parse some stuff.
            Usage: me [-h|--help] [-s] [-l|--long] [--long-only] [--42 42] [-o|--output OUTPUT] [-c|--color COLOR] ONE SOME [SOME ...] [ANY ...]
            Options:
                -h|--help
                    Show this help message and exit.
                -s
                    Short flag.
                -l|--long
                    Long flag.
                --long-only
                    I have only a long name.
                --42 42
                    Whether or not to show the answer.
                -o|--output OUTPUT
                    Where to write the output.
                -c|--color COLOR
                    Paint it.  Valid values (case-insensitive): ('red', 'Green')
            Arguments:
                ONE
                    One arg.
                SOME [SOME ...]
                    One or more.
                [ANY ...]
                    Any.
        "#]],
        expect![[""]],
    );
}

#[test]
fn error_report() {
    let mut p = ArgumentParser::with_writers("Example program", Vec::new(), Vec::new());
    p.flag("-v", "--verbose", "Be verbose.");
    assert_out(
        p,
        &["me", "-x"],
        expect![[""]],
        expect![[r#"
            Error: Unknown option '-x'
            Usage: me [-h|--help] [-v|--verbose]
            Options:
                -h|--help
                    Show this help message and exit.
                -v|--verbose
                    Be verbose.
        "#]],
    );
}

#[test]
fn wrong_number_report() {
    let mut p = ArgumentParser::with_writers("Add things.", Vec::new(), Vec::new());
    p.argument::<f64>("values_to_add", Nargs::OneOrMore, "Values to add together.");
    assert_out(
        p,
        &["add"],
        expect![[""]],
        expect![[r#"
            Error: Wrong number of value(s) for required parameter 'VALUES_TO_ADD [VALUES_TO_ADD ...]'.  Expected >= 1, got 0
            Usage: add [-h|--help] VALUES_TO_ADD [VALUES_TO_ADD ...]
            Options:
                -h|--help
                    Show this help message and exit.
            Arguments:
                VALUES_TO_ADD [VALUES_TO_ADD ...]
                    Values to add together.
        "#]],
    );
}

#[test]
fn usage_before_parse() {
    let p = kitchen_sink();
    let usage = p.usage();
    assert!(usage.starts_with("Usage:  [-h|--help] [-s]"), "{usage}");
    assert!(p.help().starts_with("Parse some stuff.\nUsage:"));
}
