//! Full-sample statistics and the summary struct consumed by display layers.

use crate::compound;
use crate::drawdown::{self, Recovery};
use crate::error::SeriesError;
use crate::resample::{self, Frequency};
use crate::series::{Interval, Observation, ReturnSeries, TimeSeries};
use crate::subperiod;
use chrono::NaiveDate;

/// Sample standard deviation of all finite returns, scaled to the quoting
/// period: `std * sqrt(quote_fraction_of_year * periods_per_year)`.
pub fn vol(returns: &ReturnSeries, quote_fraction_of_year: f64) -> Result<f64, SeriesError> {
    let finite: Vec<f64> = returns
        .points()
        .iter()
        .map(|obs| obs.value)
        .filter(|value| !value.is_nan())
        .collect();
    if finite.len() < 2 {
        return Err(SeriesError::DegenerateSeries {
            required: 2,
            actual: finite.len(),
        });
    }

    let n = finite.len() as f64;
    let mean = finite.iter().sum::<f64>() / n;
    let variance = finite.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);

    let quote_periods = quote_fraction_of_year * returns.periods_per_year();
    Ok(variance.sqrt() * quote_periods.sqrt())
}

/// Rolling volatility with exponentially decaying observation weights,
/// scaled to the quoting period like [`vol`].
///
/// `span` sets the decay as `alpha = 2 / (span + 1)`, the usual EMA
/// convention; it must exceed 1 so the unbiased variance is defined. Weights
/// keep decaying through NaN gaps, and the output is NaN wherever the input
/// is (a gap has no volatility) and over the warmup before a second finite
/// observation arrives. The variance carries the standard reliability-weight
/// bias correction.
pub fn rolling_vol(
    returns: &ReturnSeries,
    span: f64,
    quote_fraction_of_year: f64,
) -> Result<TimeSeries, SeriesError> {
    if !(span > 1.0) {
        return Err(SeriesError::InvalidSpan { value: span });
    }
    let decay = 1.0 - 2.0 / (span + 1.0);
    let scale = (quote_fraction_of_year * returns.periods_per_year()).sqrt();

    let mut sum_w = 0.0_f64;
    let mut sum_w2 = 0.0_f64;
    let mut sum_wx = 0.0_f64;
    let mut sum_wxx = 0.0_f64;
    let mut seen = 0usize;

    let mut points = Vec::with_capacity(returns.len());
    for obs in returns.points() {
        sum_w *= decay;
        sum_w2 *= decay * decay;
        sum_wx *= decay;
        sum_wxx *= decay;
        if !obs.value.is_nan() {
            sum_w += 1.0;
            sum_w2 += 1.0;
            sum_wx += obs.value;
            sum_wxx += obs.value * obs.value;
            seen += 1;
        }

        let value = if obs.value.is_nan() || seen < 2 {
            f64::NAN
        } else {
            let mean = sum_wx / sum_w;
            let biased = (sum_wxx / sum_w - mean * mean).max(0.0);
            let correction = sum_w * sum_w / (sum_w * sum_w - sum_w2);
            (biased * correction).sqrt() * scale
        };
        points.push(Observation {
            date: obs.date,
            value,
        });
    }

    Ok(TimeSeries::from_points(returns.name(), points))
}

/// Average return over volatility, both quoted for the same period — the
/// simplified industry definition with no risk-free leg.
pub fn sharpe_ratio(
    returns: &ReturnSeries,
    quote_fraction_of_year: f64,
    upsample_partial_periods: bool,
) -> Result<f64, SeriesError> {
    let avg = compound::average_return(returns, quote_fraction_of_year, upsample_partial_periods)?;
    let avg_vol = vol(returns, quote_fraction_of_year)?;
    Ok(avg / avg_vol)
}

/// Value-at-risk sampled from the historic return distribution.
///
/// With `frequency` set, returns are resampled first so the VaR is quoted at
/// that cadence. With `mirror`, the quantile is taken over the negated
/// absolute returns. The quantile uses linear interpolation between order
/// statistics; values outside [0, 1] are rejected rather than saturated to
/// the sample extremes.
pub fn value_at_risk(
    returns: &ReturnSeries,
    quantile: f64,
    frequency: Option<Frequency>,
    mirror: bool,
) -> Result<f64, SeriesError> {
    if !(0.0..=1.0).contains(&quantile) {
        return Err(SeriesError::InvalidQuantile { value: quantile });
    }

    let resampled;
    let source = match frequency {
        Some(frequency) => {
            resampled = resample::resample(returns, frequency)?;
            &resampled
        }
        None => returns,
    };

    let mut values: Vec<f64> = source
        .points()
        .iter()
        .map(|obs| obs.value)
        .filter(|value| !value.is_nan())
        .map(|value| if mirror { -value.abs() } else { value })
        .collect();
    if values.is_empty() {
        return Err(SeriesError::DegenerateSeries {
            required: 1,
            actual: 0,
        });
    }

    values.sort_unstable_by(|a, b| a.total_cmp(b));
    let position = quantile * (values.len() - 1) as f64;
    let lo = position.floor() as usize;
    let hi = position.ceil() as usize;
    let fraction = position - lo as f64;
    Ok(values[lo] + (values[hi] - values[lo]) * fraction)
}

/// Headline performance figures in one pass: the structured contract for an
/// external display layer. Every field is a plain value or an explicit
/// sentinel; nothing is silently substituted.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceSummary {
    pub name: String,
    pub cum_return: f64,
    pub annual_return: f64,
    pub annual_vol: f64,
    pub sharpe_ratio: f64,
    pub worst_drawdown: f64,
    pub worst_drawdown_date: NaiveDate,
    pub recovery_from_worst: Recovery,
    pub longest_drawdown_days: i64,
    pub longest_drawdown_end: NaiveDate,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub track_record_years: f64,
}

impl PerformanceSummary {
    pub fn compute(returns: &ReturnSeries) -> Result<Self, SeriesError> {
        let first = returns.first().ok_or(SeriesError::DegenerateSeries {
            required: 2,
            actual: 0,
        })?;
        let start_date = first.date;
        // len >= 1 is established; the scalar ops below enforce their own
        // stricter minimums.
        let end_date = returns.points()[returns.len() - 1].date;

        let dd = returns.drawdowns();
        let worst_drawdown_date = drawdown::date_of_worst(&dd)?;
        let worst_drawdown = dd
            .points()
            .iter()
            .map(|obs| obs.value)
            .filter(|value| !value.is_nan())
            .fold(f64::INFINITY, f64::min);
        let recovery_from_worst = drawdown::days_to_recover(&dd, worst_drawdown_date);

        let mut longest_drawdown_days = 0;
        let mut longest_drawdown_end = start_date;
        for point in drawdown::drawdown_days(&dd) {
            if point.days > longest_drawdown_days {
                longest_drawdown_days = point.days;
                longest_drawdown_end = point.date;
            }
        }

        let annual_return = compound::average_return(returns, 1.0, false)?;
        let annual_vol = vol(returns, 1.0)?;

        Ok(PerformanceSummary {
            name: returns.name().to_string(),
            cum_return: compound::cum_return(returns)?,
            annual_return,
            annual_vol,
            sharpe_ratio: annual_return / annual_vol,
            worst_drawdown,
            worst_drawdown_date,
            recovery_from_worst,
            longest_drawdown_days,
            longest_drawdown_end,
            start_date,
            end_date,
            track_record_years: returns.track_record_length(1.0),
        })
    }
}

/// Summarize each extracted sub-period independently. Ranges selecting no
/// observations are skipped.
pub fn period_summaries(
    returns: &ReturnSeries,
    ranges: &[Interval],
    within: bool,
    label: subperiod::PeriodLabel,
) -> Result<Vec<PerformanceSummary>, SeriesError> {
    let extracted = subperiod::period_returns(returns, ranges, within, true, label)?;
    extracted.iter().map(PerformanceSummary::compute).collect()
}

/// Order-dependent aggregates safe to compute on a recombined series.
///
/// The time-scaled fields (annual return, annual volatility, Sharpe, track
/// record) of the `within`/`without` legs reflect the synthetic trailing
/// index a recombined series carries, not real calendar time.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedSummary {
    pub name: String,
    pub cum_return: f64,
    pub annual_return: f64,
    pub annual_vol: f64,
    pub sharpe_ratio: f64,
    pub track_record_years: f64,
}

impl CombinedSummary {
    pub fn compute(returns: &ReturnSeries, name: &str) -> Result<Self, SeriesError> {
        let annual_return = compound::average_return(returns, 1.0, false)?;
        let annual_vol = vol(returns, 1.0)?;
        Ok(CombinedSummary {
            name: name.to_string(),
            cum_return: compound::cum_return(returns)?,
            annual_return,
            annual_vol,
            sharpe_ratio: annual_return / annual_vol,
            track_record_years: returns.track_record_length(1.0),
        })
    }
}

/// Three-way comparison: the full sample, the recombined observations inside
/// the ranges, and the recombined observations outside them.
pub fn combined_comparison(
    returns: &ReturnSeries,
    ranges: &[Interval],
) -> Result<(CombinedSummary, CombinedSummary, CombinedSummary), SeriesError> {
    let all = CombinedSummary::compute(returns, "all")?;
    let inside = subperiod::periods_combined(returns, ranges, true)?;
    let within = CombinedSummary::compute(&inside, "within")?;
    let outside = subperiod::periods_combined(returns, ranges, false)?;
    let without = CombinedSummary::compute(&outside, "without")?;
    Ok((all, within, without))
}
