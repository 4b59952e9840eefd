//! StepLab TUI: pick a random moment in the last week of intraday bars,
//! choose Long or Short, and step the window forward to watch the P&L.

use std::fs::{self, File};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use steplab_core::config::{ConfigOverrides, SessionConfig, SourceConfig};
use steplab_core::data::Interval;
use steplab_core::rng::session_rng;
use steplab_core::session::{load_series, Session};
use steplab_tui::{handle_key, ui, AppState};

#[derive(Parser)]
#[command(name = "steplab-tui", version, about = "Step-by-step intraday trading replay")]
struct Args {
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

impl Args {
    fn into_config(self) -> Result<SessionConfig> {
        let base = SessionConfig::load_or_default(self.config.as_deref())?;
        let source = if self.synthetic {
            let seed = self.seed.or(base.seed).unwrap_or(0);
            Some(SourceConfig::Synthetic { seed })
        } else {
            self.csv.map(|path| SourceConfig::Csv { path })
        };
        Ok(base.with_overrides(ConfigOverrides {
            symbol: self.symbol,
            weeks: self.weeks,
            end_date: self.end,
            interval: self.interval,
            seed: self.seed,
            source,
        })?)
    }
}

/// Log to a file: the terminal belongs to the UI.
fn init_tracing() -> Result<PathBuf> {
    let dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("steplab");
    fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join("steplab-tui.log");
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;

    let filter = tracing_subscriber::EnvFilter::try_from_env("STEPLAB_LOG")
        .or_else(|_| tracing_subscriber::EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(path)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_path = init_tracing()?;
    let config = args.into_config()?;

    // Blocking fetch before the terminal is taken over, so errors print plainly.
    let provider = config.source.provider()?;
    let today = chrono::Utc::now().date_naive();
    let series = load_series(provider.as_ref(), &config, today)
        .with_context(|| format!("fetching {}", config.symbol))?;
    let mut rng = session_rng(config.seed, &config.symbol);
    let session = Session::new(Arc::new(series), config.rules(), &mut rng)?;
    tracing::info!(log = %log_path.display(), "starting UI");

    let mut app = AppState::new(session);

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Some(pnl) = app.view().pnl {
        println!("{pnl}");
    }
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                handle_key(app, key);
            }
        }

        if !app.running {
            break;
        }
    }
    Ok(())
}
