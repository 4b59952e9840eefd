//! Domain types for StepLab

pub mod bar;
pub mod position;
pub mod series;

pub use bar::Bar;
pub use position::{Direction, Entry, PnL};
pub use series::{Series, Signal};
