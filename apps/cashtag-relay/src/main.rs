//! Cashtag Relay Binary
//!
//! Starts the stream-to-chat relay.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p cashtag-relay
//! ```
//!
//! # Environment Variables
//!
//! ## Required
//! - `TWITTER_BEARER_TOKEN`: Bearer token for the rule and stream endpoints
//! - `TELEGRAM_BOT_TOKEN`: Bot token for the delivery endpoint
//! - `TELEGRAM_CHAT_ID`: Destination chat identifier
//!
//! ## Optional
//! - `RELAY_TRACKED_AUTHORS`: Comma-separated author handles (default: the
//!   reference list)
//! - `RELAY_EXTRA_AUTHORS`: Comma-separated handles appended to the tracked
//!   list
//! - `RELAY_STREAM_COOLDOWN_SECS`: Reconnect cool-down (default: 10)
//! - `RELAY_RATE_LIMIT_DELAY_SECS`: Delay between rate-limited connects
//!   (default: 10)
//! - `RELAY_MAX_CONNECT_ATTEMPTS`: Attempts before a rate-limited connect
//!   gives up (default: 5)
//! - `RELAY_RESTART_DELAY_SECS`: Delay before restarting the
//!   synchronize-and-stream cycle (default: 10)
//! - `RELAY_CONNECT_TIMEOUT_SECS`: Connect timeout (default: 10)
//! - `RELAY_REQUEST_TIMEOUT_SECS`: Rule/delivery request timeout
//!   (default: 30)
//! - `RELAY_API_BASE_URL`, `RELAY_TELEGRAM_BASE_URL`: Endpoint overrides
//! - `RUST_LOG`: Log level (default: info)

use cashtag_relay::infrastructure::telemetry;
use cashtag_relay::{
    ChatTarget, DesiredRuleSet, RelayConfig, RelayService, RetryConfig, RuleClient,
    RuleSynchronizer, StreamConsumer, StreamConsumerConfig, TelegramNotifier, Transformer,
};
use tokio::signal;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use std::time::Duration;

/// Capacity of the stream event channel.
const EVENT_CHANNEL_CAPACITY: usize = 256;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real deployments use the environment.
    dotenvy::dotenv().ok();

    telemetry::init();

    tracing::info!("starting cashtag relay");

    let config = RelayConfig::from_env()?;
    log_config(&config);

    let shutdown = CancellationToken::new();
    tokio::spawn(await_shutdown(shutdown.clone()));

    run(config, shutdown).await?;

    tracing::info!("cashtag relay stopped");
    Ok(())
}

/// Supervise the synchronize-and-stream cycle until shutdown.
///
/// Each cycle fully replaces the remote rule set, then runs the stream
/// consumer until it fails. Failures restart the whole cycle after a fixed
/// delay; there is no permanently fatal path once configuration loads.
async fn run(config: RelayConfig, shutdown: CancellationToken) -> anyhow::Result<()> {
    let call_client = reqwest::Client::builder()
        .connect_timeout(config.connect_timeout)
        .timeout(config.request_timeout)
        .build()?;

    // The streaming read blocks indefinitely between lines; it gets a
    // connect timeout but no total request timeout.
    let stream_client = reqwest::Client::builder()
        .connect_timeout(config.connect_timeout)
        .build()?;

    let rule_client = RuleClient::new(
        call_client.clone(),
        &config.api_base_url,
        config.credentials.bearer_token().to_string(),
    );
    let synchronizer = RuleSynchronizer::new(rule_client);

    let notifier = TelegramNotifier::new(
        call_client,
        &config.telegram_base_url,
        config.credentials.bot_token(),
    );
    let relay = RelayService::new(
        Transformer::new(ChatTarget::new(config.chat_id.clone())),
        notifier,
    );

    let desired = DesiredRuleSet::from_authors(&config.tracked_authors);

    loop {
        if shutdown.is_cancelled() {
            break;
        }

        if let Err(e) = synchronizer.synchronize(&desired).await {
            tracing::error!(error = %e, "rule synchronization failed");
            if !sleep_or_cancel(config.restart_delay, &shutdown).await {
                break;
            }
            continue;
        }

        let mut consumer_config = StreamConsumerConfig::new(
            &config.api_base_url,
            config.credentials.bearer_token().to_string(),
        );
        consumer_config.cooldown = config.stream.cooldown;
        consumer_config.retry = RetryConfig {
            delay: config.stream.rate_limit_delay,
            max_attempts: config.stream.max_connect_attempts,
        };

        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let consumer = StreamConsumer::new(
            consumer_config,
            stream_client.clone(),
            events_tx,
            shutdown.clone(),
        );
        let consumer_task = tokio::spawn(async move { consumer.run().await });

        // Drain events until the consumer drops its sender.
        relay.run(events_rx).await;

        match consumer_task.await {
            Ok(Ok(())) => break, // Graceful: cancelled.
            Ok(Err(e)) => tracing::error!(error = %e, "stream terminated"),
            Err(e) => tracing::error!(error = %e, "stream task panicked"),
        }

        if !sleep_or_cancel(config.restart_delay, &shutdown).await {
            break;
        }
        tracing::info!("restarting synchronize-and-stream cycle");
    }

    Ok(())
}

/// Log the parsed configuration.
fn log_config(config: &RelayConfig) {
    tracing::info!(
        tracked_authors = config.tracked_authors.len(),
        cooldown_secs = config.stream.cooldown.as_secs(),
        rate_limit_delay_secs = config.stream.rate_limit_delay.as_secs(),
        max_connect_attempts = config.stream.max_connect_attempts,
        restart_delay_secs = config.restart_delay.as_secs(),
        "configuration loaded"
    );
    tracing::debug!(
        api_base_url = %config.api_base_url,
        telegram_base_url = %config.telegram_base_url,
        "endpoint bases"
    );
}

/// Sleep unless cancelled first; `false` when cancelled.
async fn sleep_or_cancel(delay: Duration, shutdown: &CancellationToken) -> bool {
    tokio::select! {
        () = shutdown.cancelled() => false,
        () = tokio::time::sleep(delay) => true,
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT), then cancel the token.
#[allow(clippy::expect_used)]
async fn await_shutdown(shutdown: CancellationToken) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, initiating shutdown");
        }
    }

    shutdown.cancel();
}
