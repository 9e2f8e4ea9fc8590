use argspec::ArgumentParser;

fn main() -> std::io::Result<()> {
    let mut parser = ArgumentParser::new("Example program");
    let verbose = parser.flag("-v", "--verbose", "Be verbose.");

    parser.parse_env()?;
    if parser.should_exit() {
        std::process::exit(parser.exit_code());
    }

    if parser[verbose].is_set() {
        println!("Here is some verbose output.");
    }
    Ok(())
}
