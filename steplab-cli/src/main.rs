//! StepLab CLI: fetch bars and replay scripted sessions headlessly.
//!
//! Commands:
//! - `fetch`: download bars for a symbol, print a summary, optionally save CSV
//! - `replay`: run a session from a scripted key sequence (`L`, `S`, `N`)

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use steplab_core::config::{ConfigOverrides, SessionConfig, SourceConfig};
use steplab_core::data::csv_import::write_bars;
use steplab_core::data::Interval;
use steplab_core::rng::session_rng;
use steplab_core::session::{
    load_series, Clicks, Session, SessionState, StepView, ViewOutput,
};

#[derive(Parser)]
#[command(
    name = "steplab",
    version,
    about = "StepLab CLI: step-by-step intraday trading replay"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch bars and print a summary.
    Fetch {
        #[command(flatten)]
        source: SourceArgs,

        /// Write the bars to this CSV file.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replay a scripted session.
    Replay {
        #[command(flatten)]
        source: SourceArgs,

        /// Comma-separated keys: L (long), S (short), N (next step).
        #[arg(long, default_value = "")]
        events: String,

        /// Print the final chart as JSON instead of one line per step.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Path to a TOML session config.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ticker symbol (e.g., BTC-USD).
    #[arg(long)]
    symbol: Option<String>,

    /// Weeks of history to fetch.
    #[arg(long)]
    weeks: Option<u32>,

    /// Bar interval: 1m, 5m, 15m, 30m, 1h.
    #[arg(long)]
    interval: Option<Interval>,

    /// Exclusive end date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Seed for the anchor and synthetic data.
    #[arg(long)]
    seed: Option<u64>,

    /// Use a seeded random walk instead of Yahoo Finance.
    #[arg(long, default_value_t = false, conflicts_with = "csv")]
    synthetic: bool,

    /// Read bars from a CSV file instead of Yahoo Finance.
    #[arg(long)]
    csv: Option<PathBuf>,
}

impl SourceArgs {
    fn resolve(self) -> Result<SessionConfig> {
        let base = SessionConfig::load_or_default(self.config.as_deref())?;
        let source = if self.synthetic {
            let seed = self.seed.or(base.seed).unwrap_or(0);
            Some(SourceConfig::Synthetic { seed })
        } else {
            self.csv.map(|path| SourceConfig::Csv { path })
        };
        let config = base.with_overrides(ConfigOverrides {
            symbol: self.symbol,
            weeks: self.weeks,
            end_date: self.end,
            interval: self.interval,
            seed: self.seed,
            source,
        })?;
        Ok(config)
    }
}

/// One scripted key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    Long,
    Short,
    Next,
}

fn parse_events(script: &str) -> Result<Vec<Key>> {
    script
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|token| match token.to_ascii_uppercase().as_str() {
            "L" | "LONG" => Ok(Key::Long),
            "S" | "SHORT" => Ok(Key::Short),
            "N" | "NEXT" => Ok(Key::Next),
            other => bail!("unknown event '{other}'; expected L, S or N"),
        })
        .collect()
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("STEPLAB_LOG")
        .or_else(|_| tracing_subscriber::EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch { source, out } => run_fetch(source.resolve()?, out),
        Commands::Replay {
            source,
            events,
            json,
        } => run_replay(source.resolve()?, &events, json),
    }
}

fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

fn run_fetch(config: SessionConfig, out: Option<PathBuf>) -> Result<()> {
    let provider = config.source.provider()?;
    let series = load_series(provider.as_ref(), &config, today())
        .with_context(|| format!("fetching {}", config.symbol))?;

    let (Some(first), Some(last)) = (series.first_timestamp(), series.last_timestamp()) else {
        bail!("no bars returned for {}", config.symbol);
    };
    println!("Symbol:   {}", series.symbol());
    println!("Interval: {}", series.interval());
    println!("Bars:     {}", series.len());
    println!("From:     {first}");
    println!("To:       {last}");

    if let Some(path) = out {
        let file = std::fs::File::create(&path)
            .with_context(|| format!("creating {}", path.display()))?;
        write_bars(file, series.bars())?;
        println!("Saved to: {}", path.display());
    }
    Ok(())
}

fn run_replay(config: SessionConfig, script: &str, json: bool) -> Result<()> {
    let keys = parse_events(script)?;
    let provider = config.source.provider()?;
    let series = load_series(provider.as_ref(), &config, today())
        .with_context(|| format!("fetching {}", config.symbol))?;

    let mut rng = session_rng(config.seed, &config.symbol);
    let session = Session::new(Arc::new(series), config.rules(), &mut rng)?;

    let (mut state, mut view) = session.start();
    if !json {
        println!("anchor {}", session.anchor().format("%Y-%m-%d %H:%M"));
        print_transition("init", &state, Some(&view), session.is_finished(&state));
    }

    let mut clicks = Clicks::default();
    for key in keys {
        let label = match key {
            Key::Long => {
                clicks.long += 1;
                "L"
            }
            Key::Short => {
                clicks.short += 1;
                "S"
            }
            Key::Next => {
                clicks.next_step += 1;
                "N"
            }
        };
        let out = session.step(&state, clicks);
        state = out.state;
        let updated = match out.view {
            ViewOutput::Updated(next) => {
                view = next;
                true
            }
            ViewOutput::Unchanged => false,
        };
        if !json {
            print_transition(label, &state, updated.then_some(&view), out.next_step_disabled);
        }
    }

    if json {
        let chart = session.render(&view);
        println!("{}", serde_json::to_string_pretty(&chart)?);
    }
    Ok(())
}

/// One line per transition; `view` is `None` when the step was ignored.
fn print_transition(label: &str, state: &SessionState, view: Option<&StepView>, done: bool) {
    let position = match state.entry() {
        Some(entry) => format!("{}@{:.2}", entry.direction, entry.price),
        None => "flat".to_string(),
    };
    match view {
        Some(view) => println!(
            "{label:<4} step={} window=[{} .. {}] last={} position={} {}{}",
            state.step_count(),
            view.window.start.format("%m-%d %H:%M"),
            view.window.end.format("%m-%d %H:%M"),
            view.last_price
                .map(|p| format!("{p:.2}"))
                .unwrap_or_else(|| "n/a".into()),
            position,
            view.pnl_text(),
            if done { " [done]" } else { "" },
        ),
        None => println!(
            "{label:<4} step={} unchanged (step limit reached)",
            state.step_count()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_event_scripts() {
        assert_eq!(
            parse_events("L,N, n short").unwrap(),
            vec![Key::Long, Key::Next, Key::Next, Key::Short]
        );
        assert!(parse_events("").unwrap().is_empty());
        assert!(parse_events("L,X").is_err());
    }

    #[test]
    fn synthetic_flag_selects_seeded_source() {
        let args = SourceArgs {
            config: None,
            symbol: Some("ETH-USD".into()),
            weeks: None,
            interval: None,
            end: None,
            seed: Some(8),
            synthetic: true,
            csv: None,
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.symbol, "ETH-USD");
        assert_eq!(config.source, SourceConfig::Synthetic { seed: 8 });
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
