mod feed;

use std::time::Duration;

use canvas::calibration::{GRID_HEIGHT, GRID_WIDTH, grid_document, marker_document};
use canvas::engine::EngineCore;
use canvas::inbox::DocumentPoster;
use canvas::message::Routed;
use canvas::render::{CaptureFilter, RenderReport};
use canvas::style::{StyleDefaults, StyleError};
use canvas::surface::Author;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::time::MissedTickBehavior;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Style(#[from] StyleError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("script line {line}: {source}")]
    Script { line: usize, source: serde_json::Error },
    #[error("feed reader failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Parser, Debug)]
#[command(name = "overlay", about = "Screen annotation overlay driver")]
struct Cli {
    /// JSON file overriding the style defaults.
    #[arg(long, env = "OVERLAY_STYLE")]
    style: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render documents and assistant messages from a line-delimited feed.
    Replay(ReplayCommand),
    /// Drive the drawing tools from a line-delimited script and print what was drawn.
    Script(ScriptCommand),
    /// Print the calibration grid document.
    Grid {
        #[arg(long, default_value_t = GRID_WIDTH)]
        width: u32,
        #[arg(long, default_value_t = GRID_HEIGHT)]
        height: u32,
    },
    /// Print the numbered marker document.
    Markers,
}

#[derive(Args, Debug)]
struct ReplayCommand {
    /// Feed file, or `-` for stdin.
    #[arg(default_value = "-")]
    input: String,

    /// Only accept messages for this session.
    #[arg(long, env = "OVERLAY_SESSION")]
    session: Option<String>,

    #[arg(long, env = "OVERLAY_PUMP_INTERVAL_MS", default_value_t = 50)]
    pump_interval_ms: u64,

    /// Print everything on the surface as a document when done.
    #[arg(long)]
    capture: bool,
}

#[derive(Args, Debug)]
struct ScriptCommand {
    /// Script file, or `-` for stdin.
    #[arg(default_value = "-")]
    input: String,
}

#[derive(Debug, Default)]
struct FeedStats {
    lines: usize,
    documents: usize,
    replies: usize,
    rejected: usize,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let style = match &cli.style {
        Some(path) => StyleDefaults::from_json(&tokio::fs::read_to_string(path).await?)?,
        None => StyleDefaults::default(),
    };

    match cli.command {
        Command::Replay(args) => replay(style, args).await,
        Command::Script(args) => script(style, &args.input).await,
        Command::Grid { width, height } => print_json(&grid_document(width, height)),
        Command::Markers => print_json(&marker_document()),
    }
}

async fn replay(style: StyleDefaults, args: ReplayCommand) -> Result<(), CliError> {
    let mut core = EngineCore::new(style);
    let reader = open_input(&args.input).await?;
    let mut feed = tokio::spawn(read_feed(reader, args.session, core.poster()));

    let mut interval = tokio::time::interval(Duration::from_millis(args.pump_interval_ms.max(1)));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut totals = RenderReport::default();
    let stats = loop {
        tokio::select! {
            _ = interval.tick() => absorb(&mut totals, core.pump()),
            joined = &mut feed => break joined??,
        }
    };
    // Documents posted after the last tick.
    absorb(&mut totals, core.pump());

    tracing::info!(
        lines = stats.lines,
        documents = stats.documents,
        replies = stats.replies,
        rejected = stats.rejected,
        rendered = totals.added.len(),
        skipped = totals.skipped,
        "replay finished"
    );

    if args.capture {
        print_json(&core.capture(CaptureFilter::All))?;
    }
    Ok(())
}

fn absorb(totals: &mut RenderReport, report: RenderReport) {
    if !report.added.is_empty() || report.skipped > 0 {
        tracing::debug!(added = report.added.len(), skipped = report.skipped, "pumped");
    }
    totals.added.extend(report.added);
    totals.skipped += report.skipped;
}

async fn read_feed(
    reader: Box<dyn AsyncBufRead + Unpin + Send>,
    session: Option<String>,
    poster: DocumentPoster,
) -> Result<FeedStats, CliError> {
    let mut stats = FeedStats::default();
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        stats.lines += 1;
        let routed = match feed::parse_feed_line(&line, session.as_deref()) {
            Ok(routed) => routed,
            Err(e) => {
                tracing::warn!(line = stats.lines, error = %e, "rejected feed line");
                stats.rejected += 1;
                continue;
            }
        };
        if let Some(text) = routed.text() {
            tracing::info!(line = stats.lines, %text, "assistant reply");
            stats.replies += 1;
        }
        if let Routed::Document(document) | Routed::Both { document, .. } = routed {
            if !poster.post(document) {
                break;
            }
            stats.documents += 1;
        }
    }
    Ok(stats)
}

async fn script(style: StyleDefaults, input: &str) -> Result<(), CliError> {
    let mut raw = String::new();
    open_input(input).await?.read_to_string(&mut raw).await?;

    let mut core = EngineCore::new(style);
    for (index, line) in raw.lines().enumerate() {
        let step = feed::parse_script_line(line).map_err(|source| CliError::Script { line: index + 1, source })?;
        let Some(step) = step else {
            continue;
        };
        let actions = feed::apply_step(&mut core, step);
        tracing::debug!(line = index + 1, ?actions, "step applied");
    }

    print_json(&core.capture(CaptureFilter::Only(Author::Local)))
}

async fn open_input(input: &str) -> Result<Box<dyn AsyncBufRead + Unpin + Send>, CliError> {
    if input == "-" {
        return Ok(Box::new(BufReader::new(tokio::io::stdin())));
    }
    let file = tokio::fs::File::open(input).await?;
    Ok(Box::new(BufReader::new(file)))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
