//! Property tests for the core invariants.

mod common;

use common::*;
use perfseries::compound::{account_curve, returns_from_curve};
use perfseries::drawdown::{drawdown_days, drawdowns};
use perfseries::series::Interval;
use perfseries::streak::streak_intervals;
use perfseries::subperiod::{in_ranges, periods_combined};
use proptest::prelude::*;

proptest! {
    /// Reconstructing returns from the account curve (with the implicit unit
    /// anchor) reproduces the original returns to float tolerance.
    #[test]
    fn compounding_round_trip(values in prop::collection::vec(-0.9f64..1.0, 1..60)) {
        let series = daily_returns("prop", date(2024, 1, 1), &values);
        let recovered = returns_from_curve(&account_curve(&series));
        for (got, want) in recovered.iter().zip(&values) {
            prop_assert!((got - want).abs() < 1e-9, "{got} != {want}");
        }
    }

    /// The maximum drawdown value is always exactly 0: the first observation
    /// is a peak by construction.
    #[test]
    fn drawdown_peak_invariant(values in prop::collection::vec(-0.5f64..0.5, 1..60)) {
        let series = daily_returns("prop", date(2024, 1, 1), &values);
        let dd = drawdowns(&account_curve(&series));
        let max = dd
            .points()
            .iter()
            .map(|obs| obs.value)
            .fold(f64::NEG_INFINITY, f64::max);
        prop_assert_eq!(max, 0.0);
        prop_assert!(dd.points().iter().all(|obs| obs.value > -1.0));
    }

    /// With the first row allowed to open a streak, every true position lies
    /// in exactly one interval and every interval covers only true positions.
    #[test]
    fn streak_detection_coverage(bits in prop::collection::vec(any::<bool>(), 0..60)) {
        let mask: Vec<_> = bits
            .iter()
            .enumerate()
            .map(|(i, &on)| (date(2024, 1, 1) + chrono::Duration::days(i as i64), on))
            .collect();
        let intervals = streak_intervals(&mask, true);

        for pair in intervals.windows(2) {
            prop_assert!(pair[0].end < pair[1].start);
        }

        let mut covered = 0usize;
        for &(d, on) in &mask {
            let hits = intervals.iter().filter(|iv| iv.contains(d)).count();
            if on {
                prop_assert_eq!(hits, 1, "true at {} in {} intervals", d, hits);
                covered += 1;
            } else {
                prop_assert_eq!(hits, 0, "false at {} inside an interval", d);
            }
        }
        prop_assert_eq!(covered, bits.iter().filter(|&&b| b).count());
    }

    /// The duration counter is zero exactly where the drawdown is zero and
    /// strictly increases inside an underwater run of daily observations.
    #[test]
    fn duration_counter_resets_and_grows(values in prop::collection::vec(-0.3f64..0.3, 2..60)) {
        let series = daily_returns("prop", date(2024, 1, 1), &values);
        let dd = drawdowns(&account_curve(&series));
        let days = drawdown_days(&dd);

        prop_assert_eq!(days[0].days, 0);
        for (i, point) in days.iter().enumerate().skip(1) {
            if dd.points()[i].value == 0.0 {
                prop_assert_eq!(point.days, 0);
            } else {
                prop_assert_eq!(point.days, days[i - 1].days + 1);
            }
        }
    }

    /// Recombination keeps exactly the union-masked values, in order, on a
    /// dense trailing index.
    #[test]
    fn recombination_preserves_masked_values(
        values in prop::collection::vec(-0.2f64..0.2, 4..60),
        offsets in prop::collection::vec((0usize..60, 0usize..20), 1..4),
    ) {
        let series = daily_returns("prop", date(2024, 1, 1), &values);
        let ranges: Vec<Interval> = offsets
            .iter()
            .map(|&(start, span)| {
                Interval::new(
                    date(2024, 1, 1) + chrono::Duration::days(start as i64),
                    date(2024, 1, 1) + chrono::Duration::days((start + span) as i64),
                )
            })
            .collect();

        let dates: Vec<_> = series.points().iter().map(|obs| obs.date).collect();
        let mask = in_ranges(&dates, &ranges, true);
        let expected: Vec<f64> = series
            .points()
            .iter()
            .zip(&mask)
            .filter(|&(_, &(_, keep))| keep)
            .map(|(obs, _)| obs.value)
            .collect();

        let combined = periods_combined(&series, &ranges, true).unwrap();
        prop_assert_eq!(combined.len(), expected.len());
        for (obs, want) in combined.points().iter().zip(&expected) {
            prop_assert_eq!(obs.value, *want);
        }
        // The synthetic index is the tail of the original index.
        let tail = &dates[dates.len() - combined.len()..];
        for (obs, want) in combined.points().iter().zip(tail) {
            prop_assert_eq!(obs.date, *want);
        }
    }
}
