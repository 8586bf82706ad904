#![allow(dead_code)]

use chrono::NaiveDate;
use perfseries::series::{Observation, ReturnSeries};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn daily_returns(name: &str, start: NaiveDate, values: &[f64]) -> ReturnSeries {
    let points = values
        .iter()
        .enumerate()
        .map(|(i, &value)| Observation {
            date: start + chrono::Duration::days(i as i64),
            value,
        })
        .collect();
    ReturnSeries::new(name, points, 365.0).unwrap()
}

pub fn monthly_returns(name: &str, start_year: i32, values: &[f64]) -> ReturnSeries {
    let points = values
        .iter()
        .enumerate()
        .map(|(i, &value)| Observation {
            date: date(start_year + i as i32 / 12, (i % 12) as u32 + 1, 28),
            value,
        })
        .collect();
    ReturnSeries::new(name, points, 12.0).unwrap()
}

/// Daily series holding `value` every day for `count` days.
pub fn flat_daily(name: &str, start: NaiveDate, count: usize, value: f64) -> ReturnSeries {
    let values = vec![value; count];
    daily_returns(name, start, &values)
}
