//! Domain types for tasignal

pub mod bar;
pub mod series;
pub mod signal;

pub use bar::{Bar, Field};
pub use series::BarSeries;
pub use signal::{Signal, Trend};
