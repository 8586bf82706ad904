//! Crate error type.

use chrono::NaiveDate;

/// Top-level error type for perfseries.
///
/// Missing data (isolated NaN values) is never an error; it flows through
/// transformations as NaN. These variants cover structurally invalid
/// computations only.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeriesError {
    #[error("series index must be strictly increasing: {date} repeats or precedes its predecessor")]
    NonMonotonicIndex { date: NaiveDate },

    #[error("periods_per_year must be positive, got {value}")]
    InvalidPeriodicity { value: f64 },

    #[error("length mismatch: {dates} dates for {values} values")]
    LengthMismatch { dates: usize, values: usize },

    #[error("operation requires at least {required} observations, series has {actual}")]
    DegenerateSeries { required: usize, actual: usize },

    #[error("range {start} to {end} selected no observations")]
    EmptyRange { start: NaiveDate, end: NaiveDate },

    #[error("undefined ratio at {date}: denominator {denominator}")]
    UndefinedRatio { date: NaiveDate, denominator: f64 },

    #[error("drawdown limit must be non-positive, got {value}")]
    InvalidLimit { value: f64 },

    #[error("quantile must lie in [0, 1], got {value}")]
    InvalidQuantile { value: f64 },

    #[error("rolling window span must exceed 1, got {value}")]
    InvalidSpan { value: f64 },

    #[error("cannot estimate periods per year: no calendar year holds any observations")]
    PeriodicityUndefined,
}
