use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use datebook_core::DeliveryMode;

/// Reminders for one-off, monthly and yearly events.
///
/// Query commands print matching events and exit. `watch` keeps running and
/// sends one alert per event occurrence until interrupted. Flags override the
/// matching `DATEBOOK_*` environment variables, which `Config` reads.
#[derive(Parser, Debug)]
#[command(name = "datebook", about = "Date reminders for recurring events")]
pub struct CliArgs {
    /// Event store list endpoint
    #[arg(long, global = true)]
    pub events_url: Option<String>,

    /// Local JSON file of events (takes precedence over --events-url)
    #[arg(long, global = true)]
    pub events_file: Option<PathBuf>,

    /// Webhook receiving alerts (alerts are logged when unset)
    #[arg(long, global = true)]
    pub webhook_url: Option<String>,

    /// Seconds between scheduler ticks
    #[arg(long, global = true)]
    pub tick_secs: Option<u64>,

    /// Delivery capability: granted, denied or prompt
    #[arg(long, global = true)]
    pub delivery: Option<DeliveryMode>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List events occurring on a date
    On {
        /// Date as YYYY-MM-DD
        date: NaiveDate,
    },
    /// List events occurring today
    Today,
    /// List upcoming occurrences
    Upcoming {
        /// Window length in days, starting today
        #[arg(long, default_value_t = 30)]
        days: u32,
    },
    /// Run the reminder scheduler until Ctrl-C
    Watch,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_on_with_date() {
        let args = CliArgs::try_parse_from(["datebook", "on", "2024-03-15"]).unwrap();
        assert_eq!(
            args.command,
            Command::On {
                date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
            }
        );
    }

    #[test]
    fn rejects_bad_date() {
        assert!(CliArgs::try_parse_from(["datebook", "on", "2024-02-30"]).is_err());
    }

    #[test]
    fn upcoming_defaults_to_thirty_days() {
        let args = CliArgs::try_parse_from(["datebook", "upcoming"]).unwrap();
        assert_eq!(args.command, Command::Upcoming { days: 30 });
    }

    #[test]
    fn global_flags_after_subcommand() {
        let args = CliArgs::try_parse_from([
            "datebook",
            "watch",
            "--delivery",
            "prompt",
            "--tick-secs",
            "60",
        ])
        .unwrap();
        assert_eq!(args.command, Command::Watch);
        assert_eq!(args.delivery, Some(DeliveryMode::Prompt));
        assert_eq!(args.tick_secs, Some(60));
    }
}
