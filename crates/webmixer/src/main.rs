//! webmixer — HTTP API and CLI for the simple mixer controls of one ALSA card.
//!
//! `webmixer serve` exposes the controls as JSON; the other subcommands read,
//! update, or parse offline without starting the server.

use std::path::PathBuf;

use clap::Parser;

mod cli;
mod server;

#[derive(Parser)]
#[command(
    name = "webmixer",
    version,
    about = "HTTP API and CLI for ALSA hardware mixer controls"
)]
struct Args {
    /// Output as JSON (for controls, set, parse, config)
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this config file instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// ALSA card index (overrides the config file)
    #[arg(long, global = true)]
    card: Option<u32>,

    /// Path to the amixer binary (overrides the config file)
    #[arg(long, global = true, value_name = "PATH")]
    amixer: Option<String>,

    #[command(subcommand)]
    command: cli::Command,
}

fn main() {
    let args = Args::parse();

    let serving = matches!(args.command, cli::Command::Serve { .. });
    let default_filter = if args.verbose {
        "debug"
    } else if serving {
        "info"
    } else {
        "warn"
    };
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));
    if !serving {
        logger.format_timestamp(None).format_target(false);
    }
    logger.init();

    let options = cli::GlobalOptions {
        json: args.json,
        config_path: args.config,
        card: args.card,
        amixer: args.amixer,
    };

    if let Err(e) = cli::run(args.command, &options) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
