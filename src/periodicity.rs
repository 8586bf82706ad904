//! Periods-per-year estimation from an irregular date index.

use crate::series::Observation;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

/// Estimate periods per year as the median count of non-NaN observations per
/// calendar year.
///
/// Years with no observations are discarded; when more than two qualifying
/// years remain, the first and last are also discarded as presumptively
/// partial. Degrades gracefully on short histories: one or two qualifying
/// years give the median of what is available, and an empty set gives NaN,
/// which callers must handle.
pub fn annual_median(points: &[Observation]) -> f64 {
    annual_median_by(points, |date| date.year())
}

/// [`annual_median`] with an explicit year-grouping function, for calendars
/// whose year boundary is not the civil January 1st.
pub fn annual_median_by<F>(points: &[Observation], year_of: F) -> f64
where
    F: Fn(NaiveDate) -> i32,
{
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for obs in points {
        if !obs.value.is_nan() {
            *counts.entry(year_of(obs.date)).or_insert(0) += 1;
        }
    }

    let mut per_year: Vec<usize> = counts.into_values().collect();
    if per_year.len() > 2 {
        per_year.remove(0);
        per_year.pop();
    }

    median(&per_year)
}

fn median(counts: &[usize]) -> f64 {
    if counts.is_empty() {
        return f64::NAN;
    }
    let mut sorted: Vec<usize> = counts.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid] as f64
    } else {
        (sorted[mid - 1] + sorted[mid]) as f64 / 2.0
    }
}
