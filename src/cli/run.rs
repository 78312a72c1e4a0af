//! Handler for the `run` command.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::BufReader;
use tokio::signal;
use tracing::info;

use crate::adapter::inbound::jsonl::JsonLinesServer;
use crate::application::SettlementSweeper;
use crate::cli::RunArgs;
use crate::error::Result;
use crate::infrastructure::bootstrap::build_engine;
use crate::port::inbound::api::RequestHandler;

/// Execute the run command.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let mut config = args.config.load()?;

    if let Some(ref level) = args.log_level {
        config.logging.level = level.clone();
    }
    if args.json_logs {
        config.logging.format = "json".to_string();
    }
    if args.no_sweep {
        config.settlement.sweep_enabled = false;
    }
    config.init_logging();

    let engine = Arc::new(build_engine(&config)?);
    info!(
        assets = ?config.markets.assets,
        store = ?config.store.backend,
        fee_rate = %config.withdrawal.fee_rate,
        "tonmarket starting"
    );

    let sweeper = config.settlement.sweep_enabled.then(|| {
        SettlementSweeper::new(
            engine.markets().clone(),
            Duration::from_secs(config.settlement.sweep_interval_secs),
        )
        .start()
    });

    let handler: Arc<dyn RequestHandler> = engine.clone();
    let server = JsonLinesServer::new(handler);
    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    let outcome = tokio::select! {
        result = server.serve(stdin, stdout) => result.map(|stats| {
            info!(requests = stats.requests, failures = stats.failures, "Request stream ended");
        }),
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received");
            Ok(())
        }
    };

    if let Some(sweeper) = sweeper {
        sweeper.shutdown().await;
    }
    info!("tonmarket stopped");
    outcome
}
