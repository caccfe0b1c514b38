//! `contacts` executable.
//!
//! # Responsibility
//! - Start the contacts web server with env config plus flag overrides.
//! - Keep `ping`/`version` probes for quick linkage checks.

use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use contacts_web::config::Config;

#[derive(Parser, Debug)]
#[command(name = "contacts")]
#[command(about = "Contacts manager server")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the web app
    Serve {
        /// Listen port, overrides CONTACTS_PORT
        #[arg(short, long)]
        port: Option<u16>,

        /// SQLite file path or `:memory:`, overrides CONTACTS_DB_PATH
        #[arg(long, value_name = "PATH")]
        db: Option<String>,

        /// Log directory, overrides CONTACTS_LOG_DIR
        #[arg(long, value_name = "DIR")]
        log_dir: Option<PathBuf>,
    },
    /// Print the core ping response
    Ping,
    /// Print the core version
    Version,
}

#[tokio::main]
async fn main() -> ExitCode {
    match Cli::parse().command {
        Command::Serve { port, db, log_dir } => serve(port, db, log_dir).await,
        Command::Ping => {
            println!("contacts_core ping={}", contacts_core::ping());
            ExitCode::SUCCESS
        }
        Command::Version => {
            println!("contacts_core version={}", contacts_core::core_version());
            ExitCode::SUCCESS
        }
    }
}

async fn serve(port: Option<u16>, db: Option<String>, log_dir: Option<PathBuf>) -> ExitCode {
    let mut config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("contacts: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(db) = db {
        config.db_path = db;
    }
    if let Some(log_dir) = log_dir {
        config.log_dir = log_dir;
    }

    match contacts_web::start_server(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("contacts: {err}");
            ExitCode::FAILURE
        }
    }
}
