mod backup;
mod common;
mod doctor;
mod ui;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::ui::prelude::*;

/// homesync main parser
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Activate debug mode
    #[arg(short, long, global = true)]
    debug: bool,

    /// Path to the backup config file
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output format for console events
    #[arg(long, global = true, value_enum, default_value = "text")]
    output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Mirror the home folder to the backup drive, then bisync it with the cloud remote
    Run {
        /// Pass --dry-run to rsync and rclone
        #[arg(long)]
        dry_run: bool,
    },

    /// Inspect or create the backup configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Check that everything a backup run needs is in place
    Doctor,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Print the configuration and the paths it resolves to
    Show,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    ui::init(cli.output, !cli.no_color);
    ui::set_debug_mode(cli.debug);

    let config = cli.config.as_deref();
    let result = match &cli.command {
        // Schedulers invoke the binary without arguments
        None => backup::commands::run_backup(config, false),
        Some(Commands::Run { dry_run }) => backup::commands::run_backup(config, *dry_run),
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show => backup::commands::show_config(config).map(|_| 0),
            ConfigCommands::Init { force } => {
                backup::commands::init_config(config, *force).map(|_| 0)
            }
        },
        Some(Commands::Doctor) => run_doctor(config),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            emit(Level::Error, "homesync.error", &format!("Error: {e:#}"), None);
            std::process::exit(1);
        }
    }
}

fn run_doctor(config: Option<&std::path::Path>) -> anyhow::Result<i32> {
    let resolved = backup::commands::load_config(config)?.resolve();
    let results = doctor::run_all_checks(&doctor::backup_checks(&resolved));
    doctor::print_results(&results);
    Ok(if results.iter().all(|r| r.status.is_success()) {
        0
    } else {
        1
    })
}
