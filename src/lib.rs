//! perfseries — performance analytics over timestamped return series.
//!
//! A return series compounds into an account curve, from which drawdowns,
//! bear-market intervals, recovery times and summary statistics derive.
//! Sub-period extraction, recombination and frequency resampling operate on
//! the same date-indexed containers.

pub mod compound;
pub mod drawdown;
pub mod error;
pub mod periodicity;
pub mod resample;
pub mod series;
pub mod stats;
pub mod streak;
pub mod subperiod;
