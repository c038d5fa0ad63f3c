//! devport CLI - Launch a dev server on the first free port
//!
//! Scans upward from a start port for a TCP port nobody is listening on,
//! records it in `.dev_port`, exports it as `PORT` and hands execution to
//! the server program.

mod commands;
mod logging;

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use devport_core::ProbeStrategy;

#[derive(Parser, Debug)]
#[command(name = "devport")]
#[command(author, version, about = "Launch a dev server on the first free port")]
#[command(propagate_version = true, args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    launch: LaunchArgs,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

/// Options shared by everything that scans for a port.
#[derive(Args, Debug, Clone, Default)]
struct SelectArgs {
    /// First candidate port (an empty value counts as unset)
    #[arg(short, long, env = "PORT", value_parser = parse_start_port)]
    port: Option<StartPort>,

    /// Number of ports to scan past the first candidate
    #[arg(short, long, value_name = "N")]
    window: Option<u16>,

    /// How to decide whether a port is free (auto, table, bind)
    #[arg(long, value_name = "STRATEGY")]
    probe: Option<ProbeStrategy>,

    /// Project file (default: devport.json)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
}

impl SelectArgs {
    fn start_port(&self) -> Option<u16> {
        self.port.and_then(|p| p.0)
    }
}

/// Start port as given on the command line or in `PORT`.
///
/// `None` when the value is empty, so `PORT=` behaves like an unset `PORT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StartPort(Option<u16>);

fn parse_start_port(value: &str) -> Result<StartPort, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(StartPort(None));
    }

    match value.parse::<u16>() {
        Ok(0) => Err("port must be between 1 and 65535".to_string()),
        Ok(port) => Ok(StartPort(Some(port))),
        Err(e) => Err(e.to_string()),
    }
}

#[derive(Args, Debug, Clone, Default)]
struct LaunchArgs {
    #[command(flatten)]
    select: SelectArgs,

    /// Where to record the selected port (default: .dev_port)
    #[arg(long, value_name = "PATH")]
    state_file: Option<PathBuf>,

    /// Spawn the server and wait for it instead of replacing this process
    #[arg(long)]
    no_exec: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Select a port, record it and launch the server (default)
    Run {
        #[command(flatten)]
        launch: LaunchArgs,

        /// Server command; `{port}` in any argument is replaced by the port
        #[arg(last = true, value_name = "COMMAND")]
        target: Vec<String>,
    },

    /// Print the port that would be selected, without launching anything
    Scan {
        #[command(flatten)]
        select: SelectArgs,
    },

    /// Show the recorded port and whether something listens on it
    #[command(alias = "st")]
    Status {
        /// State file to read (default: .dev_port)
        #[arg(long, value_name = "PATH")]
        state_file: Option<PathBuf>,

        /// How to decide whether the port is in use (auto, table, bind)
        #[arg(long, value_name = "STRATEGY")]
        probe: Option<ProbeStrategy>,

        /// Project file (default: devport.json)
        #[arg(short, long, value_name = "PATH")]
        config: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Some(Commands::Run { launch, target }) => commands::run::run(launch, target).await,
        Some(Commands::Scan { select }) => commands::scan::run(select, cli.json).await,
        Some(Commands::Status {
            state_file,
            probe,
            config,
        }) => commands::status::run(state_file, probe, config, cli.json).await,
        None => commands::run::run(cli.launch, Vec::new()).await,
    };

    let code = match result {
        Ok(code) => code,
        Err(err) => commands::report(&err),
    };
    std::process::exit(code);
}
