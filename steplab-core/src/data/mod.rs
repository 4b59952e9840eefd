//! Market data: providers, canonicalization, interval handling.

pub mod canonicalize;
pub mod csv_import;
pub mod interval;
pub mod provider;
pub mod synthetic;
pub mod yahoo;

pub use canonicalize::{canonicalize, sort_dedup};
pub use csv_import::CsvProvider;
pub use interval::{Interval, ParseIntervalError};
pub use provider::{DataError, DataProvider, FetchResult};
pub use synthetic::SyntheticProvider;
pub use yahoo::YahooProvider;
