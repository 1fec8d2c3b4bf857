use std::io::{self, Write};

use anyhow::Result;
use chrono::NaiveDate;
use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use datebook_core::Event;
use datebook_notify::GrantPrompt;
use datebook_rules::Upcoming;
use tracing::warn;

/// Color scheme for terminal output.
struct Colors;

impl Colors {
    const DATE: Color = Color::Cyan;
    const TITLE: Color = Color::Green;
    const MUTED: Color = Color::DarkGrey;
    const PROMPT: Color = Color::Yellow;
    const ERROR: Color = Color::Red;
}

/// Plain-line output for query commands.
pub struct Terminal;

impl Terminal {
    pub fn new() -> Self {
        Self
    }

    /// Print the events occurring on `date`.
    pub fn print_day(&self, date: NaiveDate, events: &[&Event]) -> Result<()> {
        let mut stdout = io::stdout();
        if events.is_empty() {
            execute!(
                stdout,
                SetForegroundColor(Colors::MUTED),
                Print(format!("No events on {date}.\n")),
                ResetColor,
            )?;
        }
        for event in events {
            self.print_line(&mut stdout, date, event)?;
        }
        stdout.flush()?;
        Ok(())
    }

    /// Print upcoming occurrences, soonest first.
    pub fn print_upcoming(&self, items: &[Upcoming<'_>]) -> Result<()> {
        let mut stdout = io::stdout();
        if items.is_empty() {
            execute!(
                stdout,
                SetForegroundColor(Colors::MUTED),
                Print("No upcoming events.\n"),
                ResetColor,
            )?;
        }
        for item in items {
            self.print_line(&mut stdout, item.date, item.event)?;
        }
        stdout.flush()?;
        Ok(())
    }

    fn print_line(&self, out: &mut impl Write, date: NaiveDate, event: &Event) -> Result<()> {
        execute!(
            out,
            SetForegroundColor(Colors::DATE),
            Print(format!("{date}  ")),
            SetForegroundColor(Colors::TITLE),
            Print(&event.title),
            SetForegroundColor(Colors::MUTED),
            Print(format!("  [{}]", describe(event))),
            ResetColor,
        )?;
        if let Some(description) = &event.description {
            execute!(out, Print(format!("  {description}")))?;
        }
        execute!(out, Print("\n"))?;
        Ok(())
    }

    /// Print an error message.
    pub fn print_error(&self, msg: &str) -> Result<()> {
        let mut stderr = io::stderr();
        execute!(
            stderr,
            SetForegroundColor(Colors::ERROR),
            Print(format!("Error: {msg}\n")),
            ResetColor,
        )?;
        Ok(())
    }
}

/// Short label such as `monthly` or `once, muted`.
fn describe(event: &Event) -> String {
    let kind = event.recurrence.as_str();
    if event.alerting_enabled {
        kind.to_string()
    } else {
        format!("{kind}, muted")
    }
}

/// Asks on the terminal whether reminders may be delivered.
pub struct TerminalPrompt;

impl TerminalPrompt {
    fn ask_blocking() -> io::Result<bool> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::PROMPT),
            Print("Allow datebook to send reminders? [y/N] "),
            ResetColor,
        )?;
        stdout.flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        Ok(is_yes(&input))
    }
}

#[async_trait::async_trait]
impl GrantPrompt for TerminalPrompt {
    async fn ask(&self) -> bool {
        match tokio::task::spawn_blocking(Self::ask_blocking).await {
            Ok(Ok(answer)) => answer,
            Ok(Err(e)) => {
                warn!(error = %e, "could not read delivery prompt answer");
                false
            }
            Err(e) => {
                warn!(error = %e, "delivery prompt task failed");
                false
            }
        }
    }
}

fn is_yes(input: &str) -> bool {
    matches!(input.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
