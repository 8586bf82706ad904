//! Sub-period extraction and recombination over date ranges.

use crate::error::SeriesError;
use crate::series::{Interval, Observation, ReturnSeries};
use chrono::NaiveDate;

/// How an extracted sub-period series is named.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodLabel {
    /// Name from the range's start endpoint as supplied.
    Start,
    /// Name from the range's end endpoint as supplied.
    End,
    /// Keep the parent series' name.
    Inherit,
}

/// Mark each date as inside (or, with `within == false`, outside) one
/// inclusive range.
pub fn in_range(dates: &[NaiveDate], range: &Interval, within: bool) -> Vec<(NaiveDate, bool)> {
    dates
        .iter()
        .map(|&date| (date, range.contains(date) == within))
        .collect()
}

/// Mark each date against the union of ranges: with `within` set, true means
/// inside at least one range; otherwise true means outside every range.
pub fn in_ranges(dates: &[NaiveDate], ranges: &[Interval], within: bool) -> Vec<(NaiveDate, bool)> {
    dates
        .iter()
        .map(|&date| {
            let inside = ranges.iter().any(|range| range.contains(date));
            (date, inside == within)
        })
        .collect()
}

/// Extract one series per range, each sliced by that single range's own mask
/// (not the union).
///
/// A range selecting nothing is dropped when `skip_blanks`, otherwise the
/// extraction fails with [`SeriesError::EmptyRange`]. Each output keeps the
/// parent's periodicity and is named per `label`.
pub fn period_returns(
    series: &ReturnSeries,
    ranges: &[Interval],
    within: bool,
    skip_blanks: bool,
    label: PeriodLabel,
) -> Result<Vec<ReturnSeries>, SeriesError> {
    let mut out = Vec::with_capacity(ranges.len());
    for range in ranges {
        let kept: Vec<Observation> = series
            .points()
            .iter()
            .filter(|obs| range.contains(obs.date) == within)
            .copied()
            .collect();

        if kept.is_empty() {
            if skip_blanks {
                continue;
            }
            return Err(SeriesError::EmptyRange {
                start: range.lo(),
                end: range.hi(),
            });
        }

        let extracted = ReturnSeries::with_same_periodicity(kept, series)?;
        let extracted = match label {
            PeriodLabel::Start => extracted.renamed(range.start.to_string()),
            PeriodLabel::End => extracted.renamed(range.end.to_string()),
            PeriodLabel::Inherit => extracted,
        };
        out.push(extracted);
    }
    Ok(out)
}

/// Blank out (NaN) every observation not selected by the union mask, keeping
/// the full index.
pub fn keep_ranges(series: &ReturnSeries, ranges: &[Interval], within: bool) -> Vec<Observation> {
    series
        .points()
        .iter()
        .map(|obs| {
            let inside = ranges.iter().any(|range| range.contains(obs.date));
            Observation {
                date: obs.date,
                value: if inside == within { obs.value } else { f64::NAN },
            }
        })
        .collect()
}

/// Splice the observations selected by the union mask into one dense series.
///
/// The K surviving values are re-timestamped onto the last K dates of the
/// original index, so the result is contiguous in position while its
/// timestamps carry no calendar meaning. Any time-dependent statistic
/// (track-record length, annualization) computed on the result is
/// meaningless; only order-dependent aggregates (cumulative return,
/// volatility) remain valid.
pub fn periods_combined(
    series: &ReturnSeries,
    ranges: &[Interval],
    within: bool,
) -> Result<ReturnSeries, SeriesError> {
    let survivors: Vec<f64> = keep_ranges(series, ranges, within)
        .into_iter()
        .map(|obs| obs.value)
        .filter(|value| !value.is_nan())
        .collect();

    let tail_start = series.len() - survivors.len();
    let points: Vec<Observation> = series.points()[tail_start..]
        .iter()
        .zip(survivors)
        .map(|(obs, value)| Observation {
            date: obs.date,
            value,
        })
        .collect();

    ReturnSeries::with_same_periodicity(points, series)
}
