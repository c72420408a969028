//! Derived spending metrics computed from a snapshot of expense records.
//!
//! Every function here is a pure recomputation over its input. Nothing is
//! cached, so results always match the record set they were handed.
use crate::core::expense::{Category, Expense};
use chrono::{DateTime, NaiveDate, TimeZone};
use std::collections::BTreeMap;
use tracing::debug;

/// Sums the amounts of all records created on the reference's calendar day.
///
/// Record timestamps are converted into the reference's time zone before
/// truncating to a day, so passing `Local::now()` yields "today in local time".
/// Records whose date cannot be parsed are skipped.
pub fn daily_total<Tz: TimeZone>(records: &[Expense], reference: &DateTime<Tz>) -> f64 {
    let day = reference.date_naive();
    let tz = reference.timezone();
    records
        .iter()
        .filter(|expense| falls_on(expense, day, &tz))
        .fold(0.0, |total, expense| total + expense.amount)
}

/// Number of records created on the reference's calendar day.
pub fn count_on_day<Tz: TimeZone>(records: &[Expense], reference: &DateTime<Tz>) -> usize {
    let day = reference.date_naive();
    let tz = reference.timezone();
    records
        .iter()
        .filter(|expense| falls_on(expense, day, &tz))
        .count()
}

fn falls_on<Tz: TimeZone>(expense: &Expense, day: NaiveDate, tz: &Tz) -> bool {
    match expense.timestamp() {
        Some(ts) => ts.with_timezone(tz).date_naive() == day,
        None => {
            debug!(
                "Skipping expense {} with unparseable date: {}",
                expense.id, expense.date
            );
            false
        }
    }
}

/// Total spent per category. Categories with no records are omitted.
pub fn category_totals(records: &[Expense]) -> BTreeMap<Category, f64> {
    records.iter().fold(BTreeMap::new(), |mut totals, expense| {
        *totals.entry(expense.category).or_insert(0.0) += expense.amount;
        totals
    })
}

/// Fraction of the daily goal consumed, clamped to `[0, 1]`.
///
/// A goal of zero (or below) counts as already exceeded and yields `1.0`.
pub fn budget_ratio(daily_total: f64, goal: f64) -> f64 {
    if goal <= 0.0 || goal.is_nan() {
        return 1.0;
    }
    let ratio = daily_total / goal;
    if ratio.is_nan() {
        return 0.0;
    }
    ratio.clamp(0.0, 1.0)
}

pub fn is_over_budget(daily_total: f64, goal: f64) -> bool {
    daily_total > goal
}

/// Records ordered newest first. Records with unparseable dates go last,
/// keeping their relative order. The input slice is left untouched.
pub fn sorted_newest_first(records: &[Expense]) -> Vec<&Expense> {
    let mut sorted: Vec<&Expense> = records.iter().collect();
    sorted.sort_by(|a, b| match (a.timestamp(), b.timestamp()) {
        (Some(ta), Some(tb)) => tb.cmp(&ta),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    sorted
}
