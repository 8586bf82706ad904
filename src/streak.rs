//! Streak detection over date-indexed boolean sequences.

use crate::series::Interval;
use chrono::NaiveDate;

/// Find the maximal contiguous runs of `true` in a date-indexed mask.
///
/// A false-to-true transition starts a streak; the streak ends on the last
/// `true` before the next `false`. A run still open at the end of the
/// sequence is closed at the last index. The first observation starts a
/// streak only when `first_row_starts_streak` is set and the value is true;
/// without the flag a run already in progress at the start of the window is
/// skipped whole, so starts and ends always pair.
///
/// Output is chronological and non-overlapping.
pub fn streak_intervals(
    mask: &[(NaiveDate, bool)],
    first_row_starts_streak: bool,
) -> Vec<Interval> {
    let mut intervals = Vec::new();
    let mut start: Option<NaiveDate> = None;

    for (i, &(date, on)) in mask.iter().enumerate() {
        let starts = if i == 0 {
            first_row_starts_streak && on
        } else {
            on && !mask[i - 1].1
        };
        if starts {
            start = Some(date);
        }

        let last = i + 1 == mask.len();
        if on && (last || !mask[i + 1].1) {
            if let Some(s) = start.take() {
                intervals.push(Interval::new(s, date));
            }
        }
    }

    intervals
}
