//! Compounding engine: account curves and compound-return scalars.

use crate::error::SeriesError;
use crate::series::{Observation, ReturnSeries, TimeSeries, DAYS_PER_YEAR};

/// Cumulative compounding price-index: `c_i = prod_{k<=i} (1 + r_k)`, with an
/// implicit 1 before the first observation.
///
/// A return of exactly -1 drives the curve to 0, which then propagates
/// multiplicatively. NaN returns leave a NaN at their own position; the
/// running product carries on past them unchanged.
pub fn account_curve(returns: &ReturnSeries) -> TimeSeries {
    let mut points = Vec::with_capacity(returns.len());
    let mut level = 1.0_f64;
    for obs in returns.points() {
        if obs.value.is_nan() {
            points.push(Observation {
                date: obs.date,
                value: f64::NAN,
            });
        } else {
            level *= 1.0 + obs.value;
            points.push(Observation {
                date: obs.date,
                value: level,
            });
        }
    }
    TimeSeries::from_points(returns.name(), points)
}

/// Total compounded return over the whole series: final curve value minus 1.
///
/// A NaN final return yields NaN (a trailing data gap, preserved rather than
/// substituted).
pub fn cum_return(returns: &ReturnSeries) -> Result<f64, SeriesError> {
    let curve = account_curve(returns);
    let last = curve.last().ok_or(SeriesError::DegenerateSeries {
        required: 1,
        actual: 0,
    })?;
    Ok(last.value - 1.0)
}

/// Cumulative return expressed as a per-period compounding average.
///
/// `quote_fraction_of_year` sets the quoting period (1.0 annual, 1/12
/// monthly). With `upsample_partial_periods` off, a track record shorter than
/// the quoting period is not extrapolated: the quote period is clamped down
/// to the actual span, so the result degrades to the plain cumulative return.
pub fn average_return(
    returns: &ReturnSeries,
    quote_fraction_of_year: f64,
    upsample_partial_periods: bool,
) -> Result<f64, SeriesError> {
    let days = returns.track_record_days();
    if days == 0 {
        return Err(SeriesError::DegenerateSeries {
            required: 2,
            actual: returns.len(),
        });
    }
    let years = days as f64 / DAYS_PER_YEAR;

    let mut quote_fraction = quote_fraction_of_year;
    if !upsample_partial_periods && years / quote_fraction < 1.0 {
        quote_fraction = quote_fraction.min(years);
    }

    let num_periods = years / quote_fraction;

    let total_gross = cum_return(returns)? + 1.0;
    Ok(total_gross.powf(1.0 / num_periods) - 1.0)
}

/// Inverse of [`account_curve`]: period returns implied by curve levels, with
/// a unit anchor before the first point.
pub fn returns_from_curve(curve: &TimeSeries) -> Vec<f64> {
    let mut prev = 1.0_f64;
    let mut out = Vec::with_capacity(curve.len());
    for obs in curve.points() {
        out.push((obs.value - prev) / prev);
        prev = obs.value;
    }
    out
}
