//! Domain types: bars, price series and lookback periods.

pub mod bar;
pub mod series;

pub use bar::Bar;
pub use series::{Period, PriceSeries, SeriesError};
