//! `askew` — analyze a project's component sources.

use std::path::PathBuf;
use std::process;

use clap::{Arg, ArgAction, Command};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let matches = Command::new("askew")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Askew component compiler (semantic analyzer)")
        .arg(
            Arg::new("root")
                .value_name("DIR")
                .default_value(".")
                .help("Project root to scan for .askew/.asite sources"),
        )
        .arg(
            Arg::new("dump-ir")
                .long("dump-ir")
                .action(ArgAction::SetTrue)
                .help("Print the analyzed IR as JSON"),
        )
        .get_matches();

    let root = matches
        .get_one::<String>("root")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    if let Err(err) = askew_compiler_cli::run(&root, matches.get_flag("dump-ir")) {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}
