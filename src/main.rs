mod cmd;
mod command;
mod config;
mod error;
mod softap;
mod ui;
mod util;
mod wext;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use cmd::ApArgs;
use config::Config;
use softap::BssAction;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use ui::UX;

/// Configure and control driver-level SoftAP mode.
#[derive(Parser)]
#[command(name = "softapctl", version, about)]
struct Cli {
    /// Config file (toml, json or yaml); defaults to /etc/softapctl/softapctl.toml if present
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// More diagnostics on stderr (-v info, -vv debug, -vvv trace); RUST_LOG wins
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Disable colored status output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Send the AP configuration to the driver
    Set {
        /// Interface exposing the driver private commands (e.g. eth0)
        iface: String,
        #[command(flatten)]
        ap: ApArgs,
    },
    /// Print the AP configuration command without sending it
    Encode {
        #[command(flatten)]
        ap: ApArgs,
        /// Mask the KEY value
        #[arg(long)]
        redact: bool,
    },
    /// Start the access-point BSS
    Start { iface: String },
    /// Stop the access-point BSS
    Stop { iface: String },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let ui = UX::new(!cli.no_color);

    match run(&cli, &ui) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ui.error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, ui: &UX) -> Result<()> {
    let cfg = Config::load_or_default(cli.config.as_deref())?;

    match &cli.command {
        Command::Set { iface, ap } => cmd::set::run_set(ui, &cfg, iface, ap),
        Command::Encode { ap, redact } => cmd::encode::run_encode(&cfg, ap, *redact),
        Command::Start { iface } => {
            cmd::lifecycle::run_bss(ui, &cfg.driver, iface, BssAction::Start)
        }
        Command::Stop { iface } => cmd::lifecycle::run_bss(ui, &cfg.driver, iface, BssAction::Stop),
    }
}
