use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{error, info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use notification_center::commands::{parse_command, spawn_line_reader, Command};
use notification_center::config::{AppConfig, CliConfig, FileConfig};
use notification_center::push::PushClient;
use notification_center::{
    Engine, EngineHandle, KeyValueStore, SqliteKeyValueStore, TracingRenderSink,
};

fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to a TOML config file. Values in it override command line flags.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Path to the SQLite state file. State is kept in memory when omitted.
    #[clap(long, value_parser = parse_path)]
    pub db_path: Option<PathBuf>,

    /// URL of the notification event stream.
    #[clap(long)]
    pub stream_url: Option<String>,

    /// Seconds to wait before reconnecting to the stream.
    #[clap(long, default_value_t = 5)]
    pub reconnect_delay_secs: u64,

    /// Length of the attention animation in milliseconds.
    #[clap(long)]
    pub attention_duration_ms: Option<u64>,

    /// Start with a dark ambient color scheme.
    #[clap(long)]
    pub prefers_dark: bool,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            db_path: self.db_path.clone(),
            stream_url: self.stream_url.clone(),
            reconnect_delay_secs: self.reconnect_delay_secs,
            attention_duration_ms: self.attention_duration_ms,
            prefers_dark: self.prefers_dark,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    let store: Arc<dyn KeyValueStore> = match &config.db_path {
        Some(path) => {
            info!("Opening SQLite state store at {:?}...", path);
            Arc::new(SqliteKeyValueStore::new(path)?)
        }
        None => {
            info!("No state file configured, keeping state in memory");
            Arc::new(SqliteKeyValueStore::in_memory()?)
        }
    };

    let (ambient_tx, ambient_rx) = watch::channel(config.prefers_dark);
    let engine = Engine::new(
        store,
        Arc::new(TracingRenderSink),
        config.prefers_dark,
        config.attention_duration,
    );
    let (handle, engine_task) = engine.spawn(ambient_rx);

    let push_task = config.stream_url.clone().map(|url| {
        info!("Streaming notifications from {}", url);
        let client = PushClient::new(url, config.reconnect_delay);
        tokio::spawn(client.run(handle.clone()))
    });

    let lines = spawn_line_reader(std::io::BufReader::new(std::io::stdin()));

    tokio::select! {
        result = read_commands(lines, handle, ambient_tx) => {
            if let Err(e) = result {
                error!("Command reader failed: {:#}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => info!("Interrupted, shutting down"),
    }

    if let Some(task) = push_task {
        task.abort();
    }
    // The engine stops once the last handle is gone.
    if let Err(e) = engine_task.await {
        error!("Engine task failed: {}", e);
    }
    Ok(())
}

async fn read_commands(
    mut lines: mpsc::Receiver<std::io::Result<String>>,
    handle: EngineHandle,
    ambient: watch::Sender<bool>,
) -> Result<()> {
    while let Some(line) = lines.recv().await {
        let line = line.context("Failed to read stdin")?;
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                warn!("{}", e);
                continue;
            }
        };

        match command {
            Command::Engine(event) => handle.send(event).await?,
            Command::Ambient { prefers_dark } => {
                ambient.send_replace(prefers_dark);
            }
            Command::Quit => break,
        }
    }
    Ok(())
}
