//! Date-stamp helpers for snapshot and chart file names.

use chrono::NaiveDate;

use crate::types::Venue;

/// Formats a date as `YYYY-MM-DD`.
pub fn date_stamp(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// File name of the snapshot for a date, e.g. `2025-07-14.json`.
pub fn snapshot_file_name(date: NaiveDate) -> String {
    format!("{}.json", date_stamp(date))
}

/// File name of a venue chart, e.g. `2025-07-14_newton.png`.
pub fn chart_file_name(date: NaiveDate, venue: Venue) -> String {
    format!("{}_{}.png", date_stamp(date), venue.slug())
}

/// The calendar day before `date`, saturating at the earliest representable day.
pub fn previous_day(date: NaiveDate) -> NaiveDate {
    date.pred_opt().unwrap_or(date)
}
