//! Date-indexed series containers shared by every analytic.

use crate::compound;
use crate::drawdown::{self, Recovery};
use crate::error::SeriesError;
use crate::resample::{self, Frequency};
use chrono::NaiveDate;

/// Average calendar days in a year, used to convert track-record spans into
/// fractions of a year.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// A single dated value. NaN marks a missing observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

/// An inclusive date range. Endpoints may be supplied in either order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Interval {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Interval { start, end }
    }

    /// Earlier of the two endpoints.
    pub fn lo(&self) -> NaiveDate {
        self.start.min(self.end)
    }

    /// Later of the two endpoints.
    pub fn hi(&self) -> NaiveDate {
        self.start.max(self.end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.lo() <= date && date <= self.hi()
    }
}

/// A value-only derived series: account curves, drawdown series.
///
/// Always produced from an already-ordered source, so the strictly increasing
/// date invariant holds by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    pub name: String,
    points: Vec<Observation>,
}

impl TimeSeries {
    pub(crate) fn from_points(name: impl Into<String>, points: Vec<Observation>) -> Self {
        TimeSeries {
            name: name.into(),
            points,
        }
    }

    pub fn points(&self) -> &[Observation] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&Observation> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Observation> {
        self.points.last()
    }

    /// Observations whose dates fall inside the interval, endpoints inclusive.
    pub fn slice_range(&self, interval: &Interval) -> &[Observation] {
        let lo = self.points.partition_point(|p| p.date < interval.lo());
        let hi = self.points.partition_point(|p| p.date <= interval.hi());
        &self.points[lo..hi]
    }
}

/// An ordered, date-indexed sequence of period-over-period fractional returns
/// tagged with its sampling cadence in periods per year.
///
/// Invariants: dates strictly increasing, `periods_per_year` positive and
/// fixed at construction. Every transformation returns a new instance; only
/// [`ReturnSeries::resample`] may carry a different periodicity, re-estimated
/// from the resampled index.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSeries {
    name: String,
    points: Vec<Observation>,
    periods_per_year: f64,
}

impl ReturnSeries {
    pub fn new(
        name: impl Into<String>,
        points: Vec<Observation>,
        periods_per_year: f64,
    ) -> Result<Self, SeriesError> {
        if !(periods_per_year > 0.0) {
            return Err(SeriesError::InvalidPeriodicity {
                value: periods_per_year,
            });
        }
        validate_dates(&points)?;
        Ok(ReturnSeries {
            name: name.into(),
            points,
            periods_per_year,
        })
    }

    /// Build from parallel date/value slices, checking compatibility up front.
    pub fn from_parts(
        name: impl Into<String>,
        dates: Vec<NaiveDate>,
        values: Vec<f64>,
        periods_per_year: f64,
    ) -> Result<Self, SeriesError> {
        if dates.len() != values.len() {
            return Err(SeriesError::LengthMismatch {
                dates: dates.len(),
                values: values.len(),
            });
        }
        let points = dates
            .into_iter()
            .zip(values)
            .map(|(date, value)| Observation { date, value })
            .collect();
        Self::new(name, points, periods_per_year)
    }

    /// Re-wrap transformed values as a series with the source's name and
    /// periodicity. This is the one sanctioned way a derived result inherits
    /// `periods_per_year`.
    pub fn with_same_periodicity(
        points: Vec<Observation>,
        source: &ReturnSeries,
    ) -> Result<Self, SeriesError> {
        Self::new(source.name.clone(), points, source.periods_per_year)
    }

    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn periods_per_year(&self) -> f64 {
        self.periods_per_year
    }

    pub fn points(&self) -> &[Observation] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&Observation> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Observation> {
        self.points.last()
    }

    /// Observations falling inside the interval, endpoints inclusive, as a
    /// new series with the same name and periodicity.
    pub fn slice(&self, interval: &Interval) -> Result<ReturnSeries, SeriesError> {
        let kept = self
            .points
            .iter()
            .filter(|obs| interval.contains(obs.date))
            .copied()
            .collect();
        Self::with_same_periodicity(kept, self)
    }

    /// Scale every return by a constant (for leverage or sign flips).
    /// NaN gaps stay NaN.
    pub fn mul(&self, factor: f64) -> Result<ReturnSeries, SeriesError> {
        self.map_values(|value| value * factor)
    }

    /// Divide every return by a constant. NaN gaps stay NaN.
    pub fn div(&self, divisor: f64) -> Result<ReturnSeries, SeriesError> {
        self.map_values(|value| value / divisor)
    }

    /// Shift values by `periods` positions along the unchanged index, leaving
    /// NaN in the vacated slots. Positive shifts move values toward later
    /// dates, negative toward earlier ones.
    pub fn shift(&self, periods: i64) -> Result<ReturnSeries, SeriesError> {
        let len = self.points.len() as i64;
        let points = self
            .points
            .iter()
            .enumerate()
            .map(|(i, obs)| {
                let source = i as i64 - periods;
                Observation {
                    date: obs.date,
                    value: if (0..len).contains(&source) {
                        self.points[source as usize].value
                    } else {
                        f64::NAN
                    },
                }
            })
            .collect();
        Self::with_same_periodicity(points, self)
    }

    fn map_values<F>(&self, f: F) -> Result<ReturnSeries, SeriesError>
    where
        F: Fn(f64) -> f64,
    {
        let points = self
            .points
            .iter()
            .map(|obs| Observation {
                date: obs.date,
                value: f(obs.value),
            })
            .collect();
        Self::with_same_periodicity(points, self)
    }

    /// Calendar days between the first and last observation. Zero for series
    /// shorter than two observations.
    pub fn track_record_days(&self) -> i64 {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => (last.date - first.date).num_days(),
            _ => 0,
        }
    }

    /// Track-record span in units of `quote_fraction_of_year` years
    /// (1.0 for years, 1.0/12.0 for months).
    pub fn track_record_length(&self, quote_fraction_of_year: f64) -> f64 {
        let days_per_period = DAYS_PER_YEAR * quote_fraction_of_year;
        self.track_record_days() as f64 / days_per_period
    }

    /// Cumulative compounding price-index of the returns, starting implicitly
    /// at 1 before the first observation.
    pub fn account_curve(&self) -> TimeSeries {
        compound::account_curve(self)
    }

    /// Rolling percentage decline from the running peak of the account curve.
    pub fn drawdowns(&self) -> TimeSeries {
        drawdown::drawdowns(&self.account_curve())
    }

    /// Peak-to-trough drawdown episodes at least as deep as `limit`.
    pub fn bear_periods(&self, limit: f64) -> Result<Vec<Interval>, SeriesError> {
        drawdown::trough_dates(&self.drawdowns(), limit)
    }

    /// Total compounded return over the whole series.
    pub fn cum_return(&self) -> Result<f64, SeriesError> {
        compound::cum_return(self)
    }

    /// Cumulative return expressed as a per-period compounding average.
    pub fn average_return(
        &self,
        quote_fraction_of_year: f64,
        upsample_partial_periods: bool,
    ) -> Result<f64, SeriesError> {
        compound::average_return(self, quote_fraction_of_year, upsample_partial_periods)
    }

    /// Time from the worst drawdown's trough back to the prior peak.
    pub fn recovery_from_worst(&self) -> Result<Recovery, SeriesError> {
        let dd = self.drawdowns();
        let worst = drawdown::date_of_worst(&dd)?;
        Ok(drawdown::days_to_recover(&dd, worst))
    }

    /// Convert to a new frequency, compounding through the account curve.
    pub fn resample(&self, frequency: Frequency) -> Result<ReturnSeries, SeriesError> {
        resample::resample(self, frequency)
    }
}

fn validate_dates(points: &[Observation]) -> Result<(), SeriesError> {
    for pair in points.windows(2) {
        if pair[1].date <= pair[0].date {
            return Err(SeriesError::NonMonotonicIndex { date: pair[1].date });
        }
    }
    Ok(())
}
