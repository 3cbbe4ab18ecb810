//! Command-line interface for jsonfold
//!
//! Usage:
//!   jsonfold format `<path>` [--compact] [--entry `<rule>`] [--config `<file>`]  - Parse and print a document
//!   jsonfold check `<path>` [--entry `<rule>`] [--config `<file>`]              - Report whether a document parses
//!   jsonfold grammar [--config `<file>`]                                     - Print the grammar in use
//!
//! `-v` logs parser activity to stderr, `-vv` adds per-slot tracing.

use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing::Level;

use jsonfold::actions::ConfigurationError;
use jsonfold::config::{JsonfoldConfig, Loader};
use jsonfold::writer::Writer;
use jsonfold::{JsonParser, ParseError};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Setup(#[from] ConfigurationError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("cannot render output: {0}")]
    Render(#[from] serde_json::Error),
}

fn main() {
    let matches = cli().get_matches();
    init_tracing(matches.get_count("verbose"));

    if let Err(e) = run(&matches) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn cli() -> Command {
    let path = Arg::new("path")
        .help("Path to the JSON document")
        .required(true)
        .index(1);
    let entry = Arg::new("entry")
        .long("entry")
        .short('e')
        .help("Grammar rule the whole document must match (Object, Array, Value)");
    let config = Arg::new("config")
        .long("config")
        .short('c')
        .help("TOML file layered over the built-in defaults");

    Command::new("jsonfold")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Parse JSON documents through reentrant semantic actions")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log parser activity to stderr (repeat for more detail)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("format")
                .about("Parse a document and print it back as JSON")
                .arg(path.clone())
                .arg(
                    Arg::new("compact")
                        .long("compact")
                        .help("Print on a single line")
                        .action(ArgAction::SetTrue),
                )
                .arg(entry.clone())
                .arg(config.clone()),
        )
        .subcommand(
            Command::new("check")
                .about("Report whether a document parses")
                .arg(path)
                .arg(entry)
                .arg(config.clone()),
        )
        .subcommand(
            Command::new("grammar")
                .about("Print the grammar rules in use")
                .arg(config),
        )
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(matches: &ArgMatches) -> Result<(), CliError> {
    match matches.subcommand() {
        Some(("format", sub)) => handle_format_command(sub),
        Some(("check", sub)) => handle_check_command(sub),
        Some(("grammar", sub)) => handle_grammar_command(sub),
        _ => unreachable!(),
    }
}

/// Layer `--config`, `--entry` and `--compact` over the defaults
fn load_config(sub: &ArgMatches) -> Result<JsonfoldConfig, CliError> {
    let mut loader = Loader::new();
    if let Some(file) = sub.get_one::<String>("config") {
        loader = loader.with_file(file);
    }
    if let Ok(Some(entry)) = sub.try_get_one::<String>("entry") {
        loader = loader.entry_rule(entry)?;
    }
    if let Ok(Some(true)) = sub.try_get_one::<bool>("compact") {
        loader = loader.compacted(true)?;
    }
    Ok(loader.build()?)
}

fn handle_format_command(sub: &ArgMatches) -> Result<(), CliError> {
    let config = load_config(sub)?;
    let mut parser = JsonParser::with_config(&config.parser)?;
    let path = required_path(sub);

    let node = parser.read_file(path)?;
    let text = Writer::from_config(&config.writer).write(&node)?;
    println!("{}", text);
    Ok(())
}

fn handle_check_command(sub: &ArgMatches) -> Result<(), CliError> {
    let config = load_config(sub)?;
    let mut parser = JsonParser::with_config(&config.parser)?;
    let path = required_path(sub);

    parser.read_file(path)?;
    println!("ok");
    Ok(())
}

fn handle_grammar_command(sub: &ArgMatches) -> Result<(), CliError> {
    let config = load_config(sub)?;
    let parser = JsonParser::with_config(&config.parser)?;
    print!("{}", parser.grammar());
    Ok(())
}

fn required_path(sub: &ArgMatches) -> &str {
    // required by clap
    sub.get_one::<String>("path").map_or("", String::as_str)
}
