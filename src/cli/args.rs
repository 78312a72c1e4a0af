//! Command-line argument definitions.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

use crate::error::Result;
use crate::infrastructure::Config;

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Tonmarket - TON ledger, binary prediction markets and withdrawals.
#[derive(Parser, Debug)]
#[command(name = "tonmarket")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve JSON-lines requests on stdin, replies on stdout
    Run(RunArgs),

    /// Manage the configuration file
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Show a user's balance
    Balance(BalanceArgs),

    /// Credit a user's balance (operator top-up)
    Credit(CreditArgs),
}

/// Subcommands for `tonmarket config`
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Write a documented config template
    Init(InitArgs),
    /// Show the effective configuration
    Show(ConfigPathArg),
    /// Validate configuration file
    Validate(ConfigPathArg),
}

/// Shared argument for commands that only need a config path.
#[derive(Args, Debug, Default)]
pub struct ConfigPathArg {
    /// Path to configuration file (default: config.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl ConfigPathArg {
    /// Load the named file, or `config.toml` if present, or the defaults.
    ///
    /// Environment overrides apply in every case.
    pub fn load(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::load(path),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Config::load(DEFAULT_CONFIG_PATH),
            None => Config::parse_toml(""),
        }
    }

    /// Path shown to the operator.
    #[must_use]
    pub fn display(&self) -> String {
        match &self.config {
            Some(path) => path.display().to_string(),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => DEFAULT_CONFIG_PATH.to_string(),
            None => "(defaults)".to_string(),
        }
    }
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: ConfigPathArg,

    /// Override log level (debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty
    #[arg(long)]
    pub json_logs: bool,

    /// Do not settle expired markets in the background
    #[arg(long)]
    pub no_sweep: bool,
}

/// Arguments for the `config init` subcommand.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Where to write the template
    #[arg(default_value = DEFAULT_CONFIG_PATH)]
    pub path: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `balance` subcommand.
#[derive(Args, Debug)]
pub struct BalanceArgs {
    #[command(flatten)]
    pub config: ConfigPathArg,

    /// User identifier
    pub user: String,
}

/// Arguments for the `credit` subcommand.
#[derive(Args, Debug)]
pub struct CreditArgs {
    #[command(flatten)]
    pub config: ConfigPathArg,

    /// User identifier
    pub user: String,

    /// Amount in TON
    pub amount: Decimal,
}
