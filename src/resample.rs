//! Frequency conversion by compounding through the account curve.

use crate::compound::account_curve;
use crate::error::SeriesError;
use crate::periodicity::annual_median;
use crate::series::{Observation, ReturnSeries};
use chrono::{Datelike, NaiveDate};

/// Target sampling frequency for [`resample`]. Weeks are ISO weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Annual,
}

impl Frequency {
    fn bucket_key(self, date: NaiveDate) -> (i32, u32) {
        match self {
            Frequency::Daily => (date.year(), date.ordinal()),
            Frequency::Weekly => {
                let week = date.iso_week();
                (week.year(), week.week())
            }
            Frequency::Monthly => (date.year(), date.month()),
            Frequency::Quarterly => (date.year(), (date.month() - 1) / 3),
            Frequency::Annual => (date.year(), 0),
        }
    }
}

/// Convert a return series to a new frequency.
///
/// The account curve is bucketed by the target frequency and each bucket
/// keeps its endpoint value (the last non-NaN curve level, labeled with the
/// bucket's last observation date) — compounding needs endpoints, never a
/// mean or sum. A synthetic anchor of exactly 1 sits one calendar day before
/// the first bucket, so the first bucket's return is measured against a true
/// baseline; the anchor row is dropped from the output. The new
/// `periods_per_year` is re-estimated from the resampled index rather than
/// assumed from the frequency, since bucket boundaries need not be regular.
///
/// A bucket with no finite curve value stays NaN and propagates as a data
/// gap. A finite non-positive bucket endpoint makes the following ratio
/// undefined and fails with [`SeriesError::UndefinedRatio`].
pub fn resample(
    returns: &ReturnSeries,
    frequency: Frequency,
) -> Result<ReturnSeries, SeriesError> {
    if returns.is_empty() {
        return Err(SeriesError::DegenerateSeries {
            required: 1,
            actual: 0,
        });
    }

    let curve = account_curve(returns);
    let buckets = bucket_endpoints(curve.points(), frequency);

    // Anchor value 1.0 one day before the first bucket label.
    let mut prev = 1.0_f64;
    let mut points = Vec::with_capacity(buckets.len());
    for bucket in buckets {
        let value = if bucket.value.is_nan() || prev.is_nan() {
            f64::NAN
        } else if prev <= 0.0 {
            return Err(SeriesError::UndefinedRatio {
                date: bucket.date,
                denominator: prev,
            });
        } else {
            (bucket.value - prev) / prev
        };
        points.push(Observation {
            date: bucket.date,
            value,
        });
        prev = bucket.value;
    }

    let periods_per_year = annual_median(&points);
    if !periods_per_year.is_finite() {
        return Err(SeriesError::PeriodicityUndefined);
    }

    ReturnSeries::new(returns.name(), points, periods_per_year)
}

fn bucket_endpoints(points: &[Observation], frequency: Frequency) -> Vec<Observation> {
    let mut buckets: Vec<Observation> = Vec::new();
    let mut current: Option<((i32, u32), Observation)> = None;

    for obs in points {
        let key = frequency.bucket_key(obs.date);
        match current.as_mut() {
            Some((open_key, endpoint)) if *open_key == key => {
                endpoint.date = obs.date;
                if !obs.value.is_nan() {
                    endpoint.value = obs.value;
                }
            }
            _ => {
                if let Some((_, endpoint)) = current.take() {
                    buckets.push(endpoint);
                }
                current = Some((key, *obs));
            }
        }
    }
    if let Some((_, endpoint)) = current {
        buckets.push(endpoint);
    }

    buckets
}
