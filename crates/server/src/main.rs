//! calwatch-server binary: the poll loop plus a liveness endpoint.

mod api;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::Notify;
use tracing::{info, warn};

use calwatch_core::config;
use calwatch_engine::{Scheduler, SchedulerConfig};
use calwatch_notify::{Notifier, TelegramNotifier};
use calwatch_source::InvestingSource;

const STARTUP_MESSAGE: &str =
    "🚀 Calendar watcher is up and monitoring the economic calendar.";

// ── CLI ─────────────────────────────────────────────────────────────

/// Watches the economic calendar for high-impact events and sends
/// Telegram reminders and a daily digest.
#[derive(Parser, Debug)]
#[command(name = "calwatch-server", version, about)]
struct Cli {
    /// Poll interval in seconds (overrides CHECK_INTERVAL).
    #[arg(long)]
    interval: Option<u64>,

    /// Local hour (0-23) for the daily digest (overrides DAILY_ALERT_HOUR).
    #[arg(long)]
    digest_hour: Option<u32>,

    /// Liveness endpoint port (overrides PORT).
    #[arg(long)]
    port: Option<u16>,
}

// ── main ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    config::load_dotenv();
    let config = calwatch_core::Config::from_env();

    let interval_secs = cli.interval.unwrap_or(config.poll.interval_secs);
    let digest_hour = cli.digest_hour.unwrap_or(config.poll.digest_hour).min(23);
    let port = cli.port.unwrap_or(config.server.port);

    let notifier = TelegramNotifier::new(
        config.telegram.bot_token.clone(),
        config.telegram.chat_id.clone(),
        config.telegram.thread_id,
    )?;
    let source = InvestingSource::new(
        config.source.calendar_url.clone(),
        config.source.utc_offset_hours,
    )?;
    let utc_offset = source.offset();

    // One Notify per consumer, signalled with notify_one, so a shutdown
    // arriving while either task is busy is held as a permit.
    let scheduler_shutdown = Arc::new(Notify::new());
    let server_shutdown = Arc::new(Notify::new());

    // Liveness endpoint, independent of the poll loop.
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "liveness endpoint listening");
    let server = {
        let shutdown = server_shutdown.clone();
        tokio::spawn(async move {
            axum::serve(listener, api::build_router())
                .with_graceful_shutdown(async move { shutdown.notified().await })
                .await
        })
    };

    // Announce startup; a delivery failure here is not fatal.
    if let Err(e) = notifier.send(STARTUP_MESSAGE).await {
        warn!(error = %e, "startup announcement failed");
    }

    let scheduler = Scheduler::new(
        source,
        notifier,
        SchedulerConfig {
            poll_interval: Duration::from_secs(interval_secs),
            digest_hour,
            utc_offset,
        },
    );
    let scheduler_task = tokio::spawn(scheduler.run(scheduler_shutdown.clone()));

    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");
    scheduler_shutdown.notify_one();
    server_shutdown.notify_one();

    scheduler_task.await?;
    server.await??;
    info!("calwatch-server exited cleanly");

    Ok(())
}
