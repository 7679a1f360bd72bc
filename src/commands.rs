//! Line commands accepted on stdin by the binary.

use std::io::{self, BufRead};

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tokio::sync::mpsc;

use crate::engine::EngineEvent;

#[derive(Parser, Debug)]
#[command(name = "", no_binary_name = true)]
struct InnerCli {
    #[command(subcommand)]
    command: InnerCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
enum InnerCommand {
    /// Dismisses every notification with the given id.
    Dismiss { id: String },

    /// Presses the clear button.
    Clear,

    /// Cycles the theme preference.
    Theme,

    /// Changes the ambient color scheme.
    Ambient { scheme: AmbientScheme },

    /// Toggles the notifications drawer.
    Notifications,

    /// Toggles the preferences drawer.
    Preferences,

    /// Clicks outside both drawers.
    Outside,

    /// Stops the engine and exits.
    #[command(alias = "exit")]
    Quit,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmbientScheme {
    Dark,
    Light,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Forward an event to the engine.
    Engine(EngineEvent),
    /// Publish a new ambient color-scheme value.
    Ambient { prefers_dark: bool },
    Quit,
}

const INGEST_PREFIX: &str = "ingest";
const LINE_CHANNEL_CAPACITY: usize = 16;

/// Forward the lines of `reader` from a detached thread. The runtime never
/// waits on the thread; it ends at EOF or once the receiver is dropped.
pub fn spawn_line_reader<R>(reader: R) -> mpsc::Receiver<io::Result<String>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(LINE_CHANNEL_CAPACITY);
    std::thread::spawn(move || {
        for line in reader.lines() {
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Parse one input line. Blank lines yield `Ok(None)`.
///
/// `ingest` takes the rest of the line verbatim as a JSON payload, so it
/// needs no quoting.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    if let Some(rest) = line.strip_prefix(INGEST_PREFIX) {
        if rest.is_empty() || rest.starts_with(char::is_whitespace) {
            let payload = rest.trim();
            if payload.is_empty() {
                return Err(anyhow!("ingest needs a JSON payload"));
            }
            return Ok(Some(Command::Engine(EngineEvent::Payload(
                payload.to_string(),
            ))));
        }
    }

    let args = shlex::split(line)
        .unwrap_or_else(|| line.split_whitespace().map(String::from).collect());
    let cli = InnerCli::try_parse_from(args).map_err(|e| anyhow!("{}", e.render()))?;

    let command = match cli.command {
        InnerCommand::Dismiss { id } => Command::Engine(EngineEvent::Dismiss(id)),
        InnerCommand::Clear => Command::Engine(EngineEvent::Clear),
        InnerCommand::Theme => Command::Engine(EngineEvent::ToggleTheme),
        InnerCommand::Ambient { scheme } => Command::Ambient {
            prefers_dark: scheme == AmbientScheme::Dark,
        },
        InnerCommand::Notifications => Command::Engine(EngineEvent::ToggleNotifications),
        InnerCommand::Preferences => Command::Engine(EngineEvent::TogglePreferences),
        InnerCommand::Outside => Command::Engine(EngineEvent::ClickOutside),
        InnerCommand::Quit => Command::Quit,
    };
    Ok(Some(command))
}
