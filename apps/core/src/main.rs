// ChatDigest console host
// Feeds stdin chat lines into the summary engine and prints what it publishes.

use anyhow::Context;
use chatdigest_core::{ChannelSink, Settings, SinkEvent, SummaryEngine};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "chatdigest=info,chatdigest_core=info";
const CONSOLE_PLATFORM: &str = "console";

#[derive(Parser, Debug)]
#[command(name = "chatdigest", about = "Windowed chat summarizer fed from stdin")]
struct Args {
    /// JSON settings file (camelCase keys, e.g. {"intervalMinutes": 2})
    #[arg(long, env = "CHATDIGEST_SETTINGS")]
    settings: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

/// One parsed stdin line.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Chat {
        platform: &'a str,
        username: &'a str,
        text: &'a str,
    },
    Summarize,
    Clear,
    Status,
    Reload,
    Quit,
    Unknown,
}

/// Parses `user: text`, `[platform] user: text`, or a `/command`.
fn parse_line(line: &str) -> Input<'_> {
    let line = line.trim();
    match line {
        "/summarize" => return Input::Summarize,
        "/clear" => return Input::Clear,
        "/status" => return Input::Status,
        "/reload" => return Input::Reload,
        "/quit" | "/exit" => return Input::Quit,
        _ if line.starts_with('/') => return Input::Unknown,
        _ => {}
    }

    let (platform, rest) = match line.strip_prefix('[').and_then(|r| r.split_once(']')) {
        Some((platform, rest)) => (platform.trim(), rest.trim_start()),
        None => (CONSOLE_PLATFORM, line),
    };
    match rest.split_once(':') {
        Some((username, text)) => Input::Chat {
            platform,
            username: username.trim(),
            text: text.trim(),
        },
        None => Input::Unknown,
    }
}

fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.log_json);

    let settings = Settings::load(args.settings.as_deref()).context("loading settings")?;
    info!(
        interval_minutes = settings.interval_minutes,
        categories = ?settings.categories,
        "Starting ChatDigest"
    );

    let (sink, mut events) = ChannelSink::new();
    let engine = SummaryEngine::start(settings, Arc::new(sink));

    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                SinkEvent::SummaryText(text) => println!("{}\n", text),
                SinkEvent::StructuredBuckets(payload) => println!("buckets> {}\n", payload),
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("reading stdin")?,
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                None
            }
        };
        let Some(line) = line else { break };

        match parse_line(&line) {
            Input::Chat {
                platform,
                username,
                text,
            } => engine.ingest(username, text, platform, username),
            Input::Summarize => {
                if engine.force_summarize().await?.is_none() {
                    println!("(nothing to summarize)");
                }
            }
            Input::Clear => {
                let dropped = engine.clear_buffer().await?;
                println!("(cleared {} messages)", dropped);
            }
            Input::Status => {
                let status = engine.status().await?;
                println!("{}", serde_json::to_string(&status)?);
            }
            Input::Reload => match Settings::load(args.settings.as_deref()) {
                Ok(settings) => engine.configuration_changed(settings).await?,
                Err(e) => warn!(error = %e, "Settings reload failed, keeping current settings"),
            },
            Input::Quit => break,
            Input::Unknown => {
                println!("(expected `user: text`, `[platform] user: text` or /summarize /clear /status /reload /quit)")
            }
        }
    }

    engine.stop().await?;
    drop(engine);
    if let Err(e) = printer.await {
        error!("Output task failed: {}", e);
    }
    Ok(())
}
