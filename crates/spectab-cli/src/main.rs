//! `spectab` command-line tool
//!
//! Validates and normalizes specification documents stored as JSON files.
//! Exit status: 0 accepted, 1 rejected (error printed as JSON), 2 for I/O
//! or usage errors.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

mod commands;
mod logging;

use commands::Outcome;

fn cli() -> Command {
    let file = || {
        Arg::new("file")
            .required(true)
            .value_parser(value_parser!(PathBuf))
            .help("Specification document (JSON), or - for stdin")
    };

    Command::new("spectab")
        .version(spectab_engine::VERSION)
        .about("Validate and normalize product specification tables")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Engine configuration (TOML)"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .default_value("info")
                .help("Default log filter when RUST_LOG is unset"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .subcommand(
            Command::new("validate")
                .about("Check a document and print a summary")
                .arg(file()),
        )
        .subcommand(
            Command::new("normalize")
                .about("Print the canonical form of a document")
                .arg(file())
                .arg(
                    Arg::new("pretty")
                        .long("pretty")
                        .action(ArgAction::SetTrue)
                        .help("Pretty-print the output"),
                ),
        )
}

/// Matches of the chosen subcommand, where global flags are guaranteed to
/// land whichever side of it they were given on
fn innermost(matches: &ArgMatches) -> &ArgMatches {
    matches.subcommand().map_or(matches, |(_, sub)| sub)
}

fn run(matches: &ArgMatches) -> anyhow::Result<Outcome> {
    let config = innermost(matches).get_one::<PathBuf>("config");
    let engine = commands::load_engine(config.map(PathBuf::as_path))?;

    match matches.subcommand() {
        Some(("validate", args)) => {
            let file = args
                .get_one::<PathBuf>("file")
                .ok_or_else(|| anyhow::anyhow!("missing <file>"))?;
            commands::validate(&engine, file)
        }
        Some(("normalize", args)) => {
            let file = args
                .get_one::<PathBuf>("file")
                .ok_or_else(|| anyhow::anyhow!("missing <file>"))?;
            commands::normalize(&engine, file, args.get_flag("pretty"))
        }
        Some((other, _)) => anyhow::bail!("unknown command '{other}'"),
        None => anyhow::bail!("no command given"),
    }
}

fn main() -> ExitCode {
    let matches = cli().get_matches();

    let globals = innermost(&matches);
    let level = globals
        .get_one::<String>("log-level")
        .map_or("info", String::as_str);
    if let Err(e) = logging::init_tracing(level, globals.get_flag("log-json")) {
        eprintln!("warning: {e}");
    }

    match run(&matches) {
        Ok(Outcome::Accepted(out)) => {
            println!("{out}");
            ExitCode::SUCCESS
        }
        Ok(Outcome::Rejected(out)) => {
            println!("{out}");
            ExitCode::from(1)
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
