//! Integration tests for the data pipeline: config → provider → series → session.

use std::sync::Arc;

use chrono::NaiveDate;
use steplab_core::config::{SessionConfig, SourceConfig};
use steplab_core::data::csv_import::{read_bars, write_bars};
use steplab_core::data::{DataError, DataProvider, Interval, SyntheticProvider};
use steplab_core::rng::session_rng;
use steplab_core::session::{load_series, Clicks, Session, SessionError, SessionState};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn synthetic_config(seed: u64) -> SessionConfig {
    SessionConfig {
        end_date: Some(date(2024, 3, 8)),
        seed: Some(seed),
        source: SourceConfig::Synthetic { seed },
        ..SessionConfig::default()
    }
}

#[test]
fn synthetic_config_builds_a_full_week() {
    let config = synthetic_config(9);
    let provider = config.source.provider().unwrap();
    let series = load_series(provider.as_ref(), &config, date(2030, 1, 1)).unwrap();

    assert_eq!(series.len(), 7 * 96);
    assert_eq!(series.symbol(), "BTC-USD");
    assert_eq!(
        series.first_timestamp().unwrap().date_naive(),
        date(2024, 3, 1)
    );
    assert_eq!(
        series.last_timestamp().unwrap().date_naive(),
        date(2024, 3, 7)
    );
    assert!(series.sma()[..19].iter().all(Option::is_none));
    assert!(series.sma()[19].is_some());
}

#[test]
fn seeded_sessions_replay_identically() {
    let config = synthetic_config(21);
    let provider = config.source.provider().unwrap();
    let series = Arc::new(load_series(provider.as_ref(), &config, date(2030, 1, 1)).unwrap());

    let run = || {
        let mut rng = session_rng(config.seed, &config.symbol);
        let session = Session::new(Arc::clone(&series), config.rules(), &mut rng).unwrap();
        let mut state = SessionState::new();
        let mut outs = Vec::new();
        for clicks in [
            Clicks::default(),
            Clicks { long: 1, short: 0, next_step: 0 },
            Clicks { long: 1, short: 0, next_step: 1 },
            Clicks { long: 1, short: 0, next_step: 2 },
        ] {
            let out = session.step(&state, clicks);
            state = out.state.clone();
            outs.push(out.view);
        }
        (session.anchor(), outs)
    };

    assert_eq!(run(), run());
}

#[test]
fn csv_export_feeds_csv_provider() {
    let bars = SyntheticProvider::new(4).generate(date(2024, 3, 1), date(2024, 3, 3), Interval::M15);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bars.csv");
    write_bars(std::fs::File::create(&path).unwrap(), &bars).unwrap();

    let reread = read_bars(std::fs::File::open(&path).unwrap()).unwrap();
    assert_eq!(reread.len(), bars.len());

    let config = SessionConfig {
        weeks: 1,
        end_date: Some(date(2024, 3, 3)),
        source: SourceConfig::Csv { path: path.clone() },
        ..SessionConfig::default()
    };
    let provider = config.source.provider().unwrap();
    assert_eq!(provider.name(), "csv");
    let series = load_series(provider.as_ref(), &config, date(2030, 1, 1)).unwrap();
    assert_eq!(series.len(), 2 * 96);
}

#[test]
fn range_without_bars_is_an_error() {
    let config = SessionConfig {
        end_date: Some(date(2024, 3, 8)),
        ..SessionConfig::default()
    };
    let provider = SyntheticProvider::new(1);
    let result = provider.fetch(&config.symbol, date(2024, 3, 8), date(2024, 3, 8), Interval::M15);
    assert!(matches!(result, Err(DataError::NoBarsInRange { .. })));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    std::fs::write(&path, "time,open,high,low,close\n").unwrap();
    let csv_config = SessionConfig {
        source: SourceConfig::Csv { path },
        ..config
    };
    let provider = csv_config.source.provider().unwrap();
    let err = load_series(provider.as_ref(), &csv_config, date(2030, 1, 1)).unwrap_err();
    assert!(matches!(err, SessionError::Data(DataError::NoBarsInRange { .. })));
}
