use std::time::Duration;

use anyhow::{Context, Result};
use datebook_core::Config;

use crate::cli::CliArgs;

/// Resolve the runtime config: environment first, then command-line flags.
pub fn resolve(args: &CliArgs) -> Result<Config> {
    let config = Config::from_env().context("invalid DATEBOOK_* environment")?;
    Ok(apply_flags(config, args))
}

fn apply_flags(mut config: Config, args: &CliArgs) -> Config {
    if let Some(url) = &args.events_url {
        config.events_url = Some(url.clone());
    }
    if let Some(path) = &args.events_file {
        config.events_file = Some(path.clone());
    }
    if let Some(url) = &args.webhook_url {
        config.webhook_url = Some(url.clone());
    }
    if let Some(secs) = args.tick_secs.filter(|s| *s > 0) {
        config.tick_interval = Duration::from_secs(secs);
    }
    if let Some(mode) = args.delivery {
        config.delivery = mode;
    }
    config
}
