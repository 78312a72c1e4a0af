//! Command-line interface definitions.

pub mod account;
pub mod args;
pub mod config;
pub mod dispatch;
pub mod output;
pub mod run;

pub use args::{
    BalanceArgs, Cli, Commands, ConfigCommand, ConfigPathArg, CreditArgs, InitArgs, RunArgs,
    DEFAULT_CONFIG_PATH,
};
pub use dispatch::dispatch;
