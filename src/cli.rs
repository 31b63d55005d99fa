use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{Config, ConfigError};
use crate::progression::ScanOutcome;

#[derive(Debug, Parser)]
#[command(name = "cyberqr", version, about = "CyberQR state engine and report endpoint")]
pub struct Cli {
    /// Config file (default: ~/.config/cyberqr/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the report submission endpoint
    Serve {
        /// Bind address, overrides server.bind_addr
        #[arg(long)]
        bind: Option<String>,
        /// Reports file, overrides reports.path
        #[arg(long)]
        reports: Option<PathBuf>,
    },
    /// Replay scan results through a fresh store and print the final state
    Session {
        /// Scan outcomes in order: safe | malicious
        #[arg(value_parser = parse_scan)]
        scans: Vec<ScanOutcome>,
        /// Display name for the session user
        #[arg(long, default_value = "Guest")]
        name: String,
    },
}

fn parse_scan(value: &str) -> Result<ScanOutcome, String> {
    value.parse().map_err(|e: crate::error::StoreError| e.to_string())
}

impl Cli {
    /// Load the config file named on the command line, or the default one.
    pub fn load_config(&self) -> Result<Config, ConfigError> {
        match &self.config {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        }
    }
}
