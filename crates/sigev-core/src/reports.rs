//! # Revenue Reports
//!
//! Calendar-bucketed revenue aggregation over recorded sales.
//!
//! ## Monthly Earnings
//! ```text
//! Sales ───► parse timestamp ───► bucket by (month, year) ───► 6 buckets
//!             │                                                 oldest → newest
//!             └── unparseable / empty: excluded, never misfiled
//! ```
//!
//! Timestamps arrive as wire strings in whichever format the server
//! produced for that record. Parsing is lenient (several known formats)
//! and a sale that matches none of them is dropped from the report
//! rather than counted into a wrong month.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

use crate::money::Money;
use crate::types::Sale;
use crate::TRAILING_MONTHS;

/// Spanish short month labels, indexed by `month0`.
pub const SHORT_MONTHS: [&str; 12] = [
    "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
];

// =============================================================================
// Month Bucket
// =============================================================================

/// One month's aggregated revenue.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthBucket {
    /// Short Spanish label ("Ene".."Dic").
    pub label: &'static str,

    /// Calendar month, 1..=12.
    pub month: u32,

    /// Calendar year.
    pub year: i32,

    /// Sum of sale totals that fall in this month.
    pub total: Money,

    /// Number of sales counted.
    pub count: usize,
}

impl MonthBucket {
    fn empty(month: u32, year: i32) -> Self {
        MonthBucket {
            label: SHORT_MONTHS[(month - 1) as usize],
            month,
            year,
            total: Money::zero(),
            count: 0,
        }
    }
}

// =============================================================================
// Timestamp Parsing
// =============================================================================

/// Parses a wire timestamp into a calendar date, trying the formats the
/// server is known to emit. Returns `None` for anything unrecognized.
fn parse_wire_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

// =============================================================================
// Monthly Earnings
// =============================================================================

/// Aggregates sales into the trailing [`TRAILING_MONTHS`] calendar months
/// ending at `today`'s month.
///
/// Buckets come back oldest first, so the last bucket is always the
/// current month. Sales outside the window, or with a timestamp no known
/// format matches, are excluded.
pub fn monthly_earnings(sales: &[Sale], today: NaiveDate) -> Vec<MonthBucket> {
    let mut buckets: Vec<MonthBucket> = Vec::with_capacity(TRAILING_MONTHS);

    // Walk backwards from the current month, then reverse.
    let mut month = today.month();
    let mut year = today.year();
    for _ in 0..TRAILING_MONTHS {
        buckets.push(MonthBucket::empty(month, year));
        if month == 1 {
            month = 12;
            year -= 1;
        } else {
            month -= 1;
        }
    }
    buckets.reverse();

    for sale in sales {
        let Some(date) = parse_wire_date(sale.effective_timestamp()) else {
            continue;
        };
        if let Some(bucket) = buckets
            .iter_mut()
            .find(|b| b.month == date.month() && b.year == date.year())
        {
            bucket.total += sale.total;
            bucket.count += 1;
        }
    }

    buckets
}

/// Revenue of the current month: the last bucket of
/// [`monthly_earnings`], or zero when there are no buckets.
pub fn current_month_total(buckets: &[MonthBucket]) -> Money {
    buckets.last().map(|b| b.total).unwrap_or_else(Money::zero)
}

// =============================================================================
// Unit Tests
// =============================================================================
