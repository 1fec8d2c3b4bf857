mod cli;
mod config;
mod terminal;

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::Parser;
use tracing::{info, warn};

use datebook_connector::{EventSource, FileSource, HttpSource};
use datebook_core::{load_dotenv, Config, DeliveryMode, SystemClock};
use datebook_notify::{
    Capability, CapabilityGate, Dispatcher, FixedCapability, LogSink, WebhookSink,
};
use datebook_rules::{events_occurring_on, upcoming, ReminderRunner, ReminderScheduler};

use crate::cli::{CliArgs, Command};
use crate::terminal::{Terminal, TerminalPrompt};

#[tokio::main]
async fn main() -> Result<()> {
    load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();
    let config = config::resolve(&args)?;
    let terminal = Terminal::new();

    if let Err(e) = run(&args.command, &config, &terminal).await {
        terminal.print_error(&format!("{e:#}"))?;
        std::process::exit(1);
    }
    Ok(())
}

async fn run(command: &Command, config: &Config, terminal: &Terminal) -> Result<()> {
    let source = build_source(config)?;
    let today = Local::now().date_naive();

    match command {
        Command::On { date } => {
            let events = load_snapshot(source.as_ref()).await?;
            terminal.print_day(*date, &events_occurring_on(&events, *date))
        }
        Command::Today => {
            let events = load_snapshot(source.as_ref()).await?;
            terminal.print_day(today, &events_occurring_on(&events, today))
        }
        Command::Upcoming { days } => {
            let events = load_snapshot(source.as_ref()).await?;
            terminal.print_upcoming(&upcoming(&events, today, *days))
        }
        Command::Watch => watch(source, config).await,
    }
}

async fn load_snapshot(source: &dyn EventSource) -> Result<Vec<datebook_core::Event>> {
    source
        .snapshot()
        .await
        .with_context(|| format!("failed to load events from {} source", source.source_name()))
}

/// Source selection: a local file wins over the store URL.
fn build_source(config: &Config) -> Result<Arc<dyn EventSource>> {
    if let Some(path) = &config.events_file {
        return Ok(Arc::new(FileSource::new(path)));
    }
    if let Some(url) = &config.events_url {
        let source = HttpSource::new(url.clone(), config.http_timeout)
            .context("failed to build event store client")?;
        return Ok(Arc::new(source));
    }
    bail!("no event source configured: set DATEBOOK_EVENTS_FILE or DATEBOOK_EVENTS_URL")
}

fn build_dispatcher(config: &Config) -> Result<Dispatcher> {
    match &config.webhook_url {
        Some(url) => {
            let mut sink = WebhookSink::new(url.clone(), config.http_timeout)
                .context("failed to build webhook sink")?;
            if let Some(method) = &config.webhook_method {
                sink = sink
                    .with_method(method)
                    .context("invalid DATEBOOK_WEBHOOK_METHOD")?;
            }
            for (name, value) in &config.webhook_headers {
                sink = sink.with_header(name.clone(), value.clone());
            }
            Ok(Dispatcher::single(sink))
        }
        None => Ok(Dispatcher::single(LogSink)),
    }
}

async fn build_capability(mode: DeliveryMode) -> Arc<dyn Capability> {
    match mode {
        DeliveryMode::Granted => Arc::new(FixedCapability::granted()),
        DeliveryMode::Denied => Arc::new(FixedCapability::denied()),
        DeliveryMode::Prompt => {
            let gate = Arc::new(CapabilityGate::new(TerminalPrompt));
            let state = gate.request_grant().await;
            if !state.is_granted() {
                warn!(%state, "reminder delivery not granted, matches will only be logged");
            }
            gate
        }
    }
}

async fn watch(source: Arc<dyn EventSource>, config: &Config) -> Result<()> {
    config.log_summary();

    let dispatcher = build_dispatcher(config)?;
    let capability = build_capability(config.delivery).await;
    let scheduler = ReminderScheduler::new(source, dispatcher, capability, SystemClock);

    let handle = ReminderRunner::spawn(scheduler, config.tick_interval);
    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;

    info!("shutdown requested");
    if let Some(scheduler) = handle.stop().await {
        let ledger = scheduler.ledger();
        let delivered = ledger.iter().filter(|r| r.delivered).count();
        info!(
            delivered,
            failed = ledger.len() - delivered,
            "reminder scheduler stopped"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn webhook_config() -> Config {
        Config {
            webhook_url: Some("https://hooks.example/x".to_string()),
            webhook_method: Some("put".to_string()),
            webhook_headers: vec![("X-Api-Key".to_string(), "k1".to_string())],
            ..Config::default()
        }
    }

    #[test]
    fn dispatcher_uses_webhook_settings() {
        let dispatcher = build_dispatcher(&webhook_config()).unwrap();
        assert_eq!(dispatcher.len(), 1);
    }

    #[test]
    fn bad_webhook_method_is_an_error() {
        let config = Config {
            webhook_method: Some("NOT A METHOD".to_string()),
            ..webhook_config()
        };
        assert!(build_dispatcher(&config).is_err());
    }

    #[test]
    fn log_sink_without_webhook() {
        assert_eq!(build_dispatcher(&Config::default()).unwrap().len(), 1);
    }

    #[test]
    fn missing_source_is_an_error() {
        assert!(build_source(&Config::default()).is_err());
    }
}
