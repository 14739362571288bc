//! Console runner entry point
//!
//! Run with:
//! ```bash
//! cargo run -p reel-console -- demos/seed.json
//! ```
//!
//! Configuration is loaded from environment variables. The seed file is the
//! first argument, or `SEED_FILE` when no argument is given.

use std::path::PathBuf;

use reel_common::{try_init_tracing_with_config, AppConfig, AppError, ErrorResponse, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = %e, "Console runner failed");
        let rendered = ErrorResponse::from(&e);
        match serde_json::to_string_pretty(&rendered) {
            Ok(json) => eprintln!("{json}"),
            Err(_) => eprintln!("{e}"),
        }
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let config = AppConfig::from_env()?;

    if let Err(e) = try_init_tracing_with_config(&TracingConfig::from(&config.telemetry)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        name = %config.app.name,
        "Configuration loaded"
    );

    let seed_path = std::env::args().nth(1).map(PathBuf::from);
    let reports = reel_console::run(config, seed_path).await?;

    for report in &reports {
        let json = serde_json::to_string_pretty(report).map_err(AppError::internal)?;
        println!("{json}");
    }

    info!(dashboards = reports.len(), "Dashboards rendered");
    Ok(())
}
