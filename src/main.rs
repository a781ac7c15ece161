mod bot;
mod config;
mod error;
mod geo;
mod import;
mod store;
mod tracker;
mod utils;

use std::sync::Arc;

use anyhow::Result;
use config::Config;
use tracker::AttendanceTracker;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "attendance_bot=info,poise=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    let tracker = Arc::new(AttendanceTracker::new(
        config.time_source.frame(),
        config.grace(),
    ));

    // Optional employee seed file
    if let Some(path) = &config.employee_csv {
        let data = std::fs::read(path)?;
        let rows = import::parse_employee_csv(&data)?;
        let summary = tracker.directory.bulk_register(rows);
        tracing::info!("Seeded {} employee(s) from {}", summary.registered.len(), path);
        for (name, reason) in &summary.rejected {
            tracing::warn!("Skipped seed row '{}': {}", name, reason);
        }
    }

    // Create and start the bot
    let mut client = bot::create_bot(config, tracker).await?;

    tracing::info!("Starting Discord bot...");

    if let Err(why) = client.start().await {
        tracing::error!("Client error: {:?}", why);
    }

    Ok(())
}
