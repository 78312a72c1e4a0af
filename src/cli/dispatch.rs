//! Routes a parsed [`Cli`] to its handler.

use crate::cli::{account, config, run, Cli, Commands, ConfigCommand};
use crate::error::Result;

/// Run the selected command.
pub async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run(args) => run::execute(&args).await,
        Commands::Config(ConfigCommand::Init(args)) => config::execute_init(&args.path, args.force),
        Commands::Config(ConfigCommand::Show(args)) => config::execute_show(&args),
        Commands::Config(ConfigCommand::Validate(args)) => config::execute_validate(&args),
        Commands::Balance(args) => account::execute_balance(&args).await,
        Commands::Credit(args) => account::execute_credit(&args).await,
    }
}
