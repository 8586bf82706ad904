//! Drawdown tracking: decline from running peak, duration counters, recovery.

use crate::error::SeriesError;
use crate::series::{Interval, Observation, TimeSeries};
use crate::streak::streak_intervals;
use chrono::NaiveDate;

/// Whether a drawdown has returned to its prior peak within the data.
///
/// `NotRecovered` is a legitimate result, not an error: the series may simply
/// still be underwater at the end of the sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    Recovered { days: i64 },
    NotRecovered,
}

/// A rolling days-in-drawdown count at one observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationPoint {
    pub date: NaiveDate,
    pub days: i64,
}

/// Rolling percentage decline from the running peak of an account curve:
/// `d_i = c_i / max(c_0..c_i) - 1`. Zero means a new peak; the first
/// observation is a peak by construction, so the series maximum is always
/// exactly 0. NaN curve values yield NaN drawdowns and do not move the peak.
pub fn drawdowns(curve: &TimeSeries) -> TimeSeries {
    let mut points = Vec::with_capacity(curve.len());
    let mut peak = f64::NEG_INFINITY;
    for obs in curve.points() {
        if obs.value.is_nan() {
            points.push(Observation {
                date: obs.date,
                value: f64::NAN,
            });
            continue;
        }
        if obs.value > peak {
            peak = obs.value;
        }
        points.push(Observation {
            date: obs.date,
            value: obs.value / peak - 1.0,
        });
    }
    TimeSeries::from_points(curve.name.clone(), points)
}

/// Rolling count of calendar days spent in the current drawdown.
///
/// Resets to 0 wherever the drawdown is exactly 0, otherwise accumulates the
/// elapsed days since the previous observation. The first observation is
/// always 0: there is nothing to measure against.
pub fn drawdown_days(drawdowns: &TimeSeries) -> Vec<DurationPoint> {
    let points = drawdowns.points();
    let mut out: Vec<DurationPoint> = Vec::with_capacity(points.len());
    for (i, obs) in points.iter().enumerate() {
        let days = if i == 0 || obs.value == 0.0 {
            0
        } else {
            let elapsed = (obs.date - points[i - 1].date).num_days();
            out[i - 1].days + elapsed
        };
        out.push(DurationPoint {
            date: obs.date,
            days,
        });
    }
    out
}

/// Most recent date at which the minimum drawdown occurs. A trough revisited
/// at the same depth reports the later date.
pub fn date_of_worst(drawdowns: &TimeSeries) -> Result<NaiveDate, SeriesError> {
    let mut worst: Option<(f64, NaiveDate)> = None;
    for obs in drawdowns.points() {
        if obs.value.is_nan() {
            continue;
        }
        match worst {
            Some((value, _)) if obs.value > value => {}
            _ => worst = Some((obs.value, obs.date)),
        }
    }
    worst
        .map(|(_, date)| date)
        .ok_or(SeriesError::DegenerateSeries {
            required: 1,
            actual: 0,
        })
}

/// Days from `from` until the drawdown first returns to exactly 0 at or
/// after `from`.
pub fn days_to_recover(drawdowns: &TimeSeries, from: NaiveDate) -> Recovery {
    for obs in drawdowns.points() {
        if obs.date >= from && obs.value == 0.0 {
            return Recovery::Recovered {
                days: (obs.date - from).num_days(),
            };
        }
    }
    Recovery::NotRecovered
}

/// Peak-to-trough episodes at least as deep as `limit`.
///
/// Streaks of negative drawdown are filtered to those whose minimum is at or
/// below `limit`, and each is reported as (episode start, latest date of the
/// episode minimum). The trough, not the recovery, dates the episode's end;
/// downstream consumers rely on trough-dated intervals.
pub fn trough_dates(
    drawdowns: &TimeSeries,
    limit: f64,
) -> Result<Vec<Interval>, SeriesError> {
    if limit > 0.0 {
        return Err(SeriesError::InvalidLimit { value: limit });
    }

    let mask: Vec<(NaiveDate, bool)> = drawdowns
        .points()
        .iter()
        .map(|obs| (obs.date, obs.value < 0.0))
        .collect();

    let mut out = Vec::new();
    for streak in streak_intervals(&mask, false) {
        let cut = drawdowns.slice_range(&streak);
        let min = cut
            .iter()
            .map(|obs| obs.value)
            .filter(|v| !v.is_nan())
            .fold(f64::INFINITY, f64::min);
        if min <= limit {
            let trough = cut
                .iter()
                .filter(|obs| obs.value == min)
                .map(|obs| obs.date)
                .next_back();
            if let Some(trough) = trough {
                out.push(Interval::new(streak.start, trough));
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::ReturnSeries;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn daily_curve(values: &[f64]) -> TimeSeries {
        let points = values
            .iter()
            .enumerate()
            .map(|(i, &value)| Observation {
                date: date(2024, 1, 1) + chrono::Duration::days(i as i64),
                value,
            })
            .collect();
        TimeSeries::from_points("test", points)
    }

    fn daily_drawdown_series(values: &[f64]) -> TimeSeries {
        daily_curve(values)
    }

    #[test]
    fn drawdowns_worked_example() {
        let curve = daily_curve(&[1.10, 0.88, 0.968, 1.0164]);
        let dd = drawdowns(&curve);
        let expected = [0.0, -0.2, -0.12, -0.076];
        for (obs, want) in dd.points().iter().zip(expected) {
            assert!((obs.value - want).abs() < 1e-9, "{} != {}", obs.value, want);
        }
    }

    #[test]
    fn drawdowns_max_is_zero() {
        let curve = daily_curve(&[0.9, 0.8, 0.85, 0.95, 1.2, 1.1]);
        let dd = drawdowns(&curve);
        let max = dd
            .points()
            .iter()
            .map(|obs| obs.value)
            .fold(f64::NEG_INFINITY, f64::max);
        assert!((max - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn drawdowns_nan_does_not_move_peak() {
        let curve = daily_curve(&[1.0, f64::NAN, 0.9]);
        let dd = drawdowns(&curve);
        assert!((dd.points()[0].value - 0.0).abs() < f64::EPSILON);
        assert!(dd.points()[1].value.is_nan());
        assert!((dd.points()[2].value - (-0.1)).abs() < 1e-12);
    }

    #[test]
    fn drawdown_days_daily_example() {
        let dd = daily_drawdown_series(&[0.0, -0.1, -0.1, 0.0, -0.05, 0.0]);
        let days: Vec<i64> = drawdown_days(&dd).iter().map(|p| p.days).collect();
        assert_eq!(days, vec![0, 1, 2, 0, 1, 0]);
    }

    #[test]
    fn drawdown_days_accumulates_calendar_gaps() {
        let points = vec![
            Observation {
                date: date(2024, 1, 1),
                value: 0.0,
            },
            Observation {
                date: date(2024, 2, 1),
                value: -0.05,
            },
            Observation {
                date: date(2024, 3, 1),
                value: -0.02,
            },
        ];
        let dd = TimeSeries::from_points("test", points);
        let days: Vec<i64> = drawdown_days(&dd).iter().map(|p| p.days).collect();
        assert_eq!(days, vec![0, 31, 60]);
    }

    #[test]
    fn date_of_worst_takes_latest_occurrence() {
        let dd = daily_drawdown_series(&[0.0, -0.2, -0.1, -0.2, 0.0]);
        assert_eq!(date_of_worst(&dd).unwrap(), date(2024, 1, 4));
    }

    #[test]
    fn date_of_worst_empty_is_degenerate() {
        let dd = daily_drawdown_series(&[]);
        assert!(matches!(
            date_of_worst(&dd),
            Err(SeriesError::DegenerateSeries { .. })
        ));
    }

    #[test]
    fn days_to_recover_finds_first_zero_after_start() {
        let dd = daily_drawdown_series(&[0.0, -0.1, -0.2, -0.05, 0.0]);
        let recovery = days_to_recover(&dd, date(2024, 1, 3));
        assert_eq!(recovery, Recovery::Recovered { days: 2 });
    }

    #[test]
    fn days_to_recover_still_underwater() {
        let dd = daily_drawdown_series(&[0.0, -0.1, -0.2, -0.05]);
        let recovery = days_to_recover(&dd, date(2024, 1, 3));
        assert_eq!(recovery, Recovery::NotRecovered);
    }

    #[test]
    fn recovery_from_worst_composes() {
        // Curve peaks, troughs on day 3, recovers on day 5.
        let values = [0.0, -0.1, -0.1, 0.1, 0.15];
        let points: Vec<Observation> = values
            .iter()
            .enumerate()
            .map(|(i, &value)| Observation {
                date: date(2024, 1, 1) + chrono::Duration::days(i as i64),
                value,
            })
            .collect();
        let series = ReturnSeries::new("test", points, 252.0).unwrap();
        // Worst trough on 2024-01-03 (curve 0.81), recovery when curve first
        // reaches a new running peak: 0.81 * 1.1 * 1.15 = 1.02465 on day 5.
        assert_eq!(
            series.recovery_from_worst().unwrap(),
            Recovery::Recovered { days: 2 }
        );
    }

    #[test]
    fn trough_dates_reports_start_to_trough() {
        let dd = daily_drawdown_series(&[0.0, -0.05, -0.30, -0.10, 0.0, -0.02]);
        let periods = trough_dates(&dd, -0.2).unwrap();
        // One qualifying episode: starts day 2, trough (not recovery) day 3.
        assert_eq!(periods, vec![Interval::new(date(2024, 1, 2), date(2024, 1, 3))]);
    }

    #[test]
    fn trough_dates_filters_shallow_episodes() {
        let dd = daily_drawdown_series(&[0.0, -0.05, 0.0, -0.30, 0.0]);
        let periods = trough_dates(&dd, -0.2).unwrap();
        assert_eq!(periods, vec![Interval::new(date(2024, 1, 4), date(2024, 1, 4))]);
    }

    #[test]
    fn trough_dates_revisited_trough_uses_latest_date() {
        let dd = daily_drawdown_series(&[0.0, -0.3, -0.1, -0.3, -0.2]);
        let periods = trough_dates(&dd, 0.0).unwrap();
        assert_eq!(periods, vec![Interval::new(date(2024, 1, 2), date(2024, 1, 4))]);
    }

    #[test]
    fn trough_dates_rejects_positive_limit() {
        let dd = daily_drawdown_series(&[0.0, -0.1]);
        assert_eq!(
            trough_dates(&dd, 0.1).unwrap_err(),
            SeriesError::InvalidLimit { value: 0.1 }
        );
    }

    #[test]
    fn trough_dates_unterminated_episode_included() {
        let dd = daily_drawdown_series(&[0.0, -0.1, -0.4]);
        let periods = trough_dates(&dd, -0.2).unwrap();
        assert_eq!(periods, vec![Interval::new(date(2024, 1, 2), date(2024, 1, 3))]);
    }
}
