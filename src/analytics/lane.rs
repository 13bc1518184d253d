//! Monthly rate and volume history for one origin/destination lane.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::period::trailing_month_buckets;
use super::Weighted;
use crate::records::{Booking, BookingLine, Quotation};

/// Origin/destination filter. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lane {
    pub origin: String,
    pub destination: String,
}

impl Lane {
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
        }
    }

    /// True when neither end is constrained.
    pub fn is_open(&self) -> bool {
        self.origin.trim().is_empty() && self.destination.trim().is_empty()
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let end = |s: &str| if s.trim().is_empty() { "*".to_string() } else { s.trim().to_string() };
        write!(f, "{} -> {}", end(&self.origin), end(&self.destination))
    }
}

/// What to do with booking lines that carry no origin or destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnlabeledBookings {
    /// A missing field is not checked, so the line counts toward any lane.
    #[default]
    Count,
    /// A missing field fails any non-empty filter on that field.
    Exclude,
}

/// Case-insensitive substring match of a line's ends against the lane.
pub fn matches_lane(origin: &str, destination: &str, lane: &Lane) -> bool {
    field_contains(origin, &lane.origin) && field_contains(destination, &lane.destination)
}

fn field_contains(field: &str, filter: &str) -> bool {
    let filter = filter.trim();
    filter.is_empty() || field.to_lowercase().contains(&filter.to_lowercase())
}

fn booking_line_on_lane(line: &BookingLine, lane: &Lane, policy: UnlabeledBookings) -> bool {
    let check = |field: Option<&str>, filter: &str| match field {
        Some(value) => field_contains(value, filter),
        None => policy == UnlabeledBookings::Count || filter.trim().is_empty(),
    };
    check(line.origin.as_deref(), &lane.origin) && check(line.destination.as_deref(), &lane.destination)
}

/// One month of lane history.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneAggregatePoint {
    pub month: String,
    pub key: String,
    pub avg_sell: f64,
    pub avg_cost: f64,
    pub volume: f64,
}

pub struct LaneQuery<'a, Tz: TimeZone> {
    pub quotations: &'a [Quotation],
    pub bookings: &'a [Booking],
    pub lane: &'a Lane,
    pub months: i32,
    /// "Now". Records without a usable timestamp are placed here.
    pub reference: DateTime<Tz>,
    pub unlabeled_bookings: UnlabeledBookings,
}

/// Aggregate quotation rates and booking volume per trailing month.
///
/// The output has one point per bucket of
/// `trailing_month_buckets(reference, months)`, in the same order.
pub fn aggregate_lane<Tz: TimeZone>(query: &LaneQuery<'_, Tz>) -> Vec<LaneAggregatePoint> {
    let now = query.reference.with_timezone(&Utc);
    let quotes: Vec<(DateTime<Utc>, &Quotation)> = query
        .quotations
        .iter()
        .map(|q| (q.recorded_at().unwrap_or(now), q))
        .collect();
    let bookings: Vec<(DateTime<Utc>, &Booking)> = query
        .bookings
        .iter()
        .map(|b| (b.recorded_at().unwrap_or(now), b))
        .collect();

    let points: Vec<LaneAggregatePoint> = trailing_month_buckets(&query.reference, query.months)
        .into_iter()
        .map(|bucket| {
            let mut sell = Weighted::default();
            let mut cost = Weighted::default();
            for (_, quote) in quotes.iter().filter(|(at, _)| bucket.contains(at)) {
                for line in &quote.lines {
                    if !matches_lane(line.origin(), line.destination(), query.lane) {
                        continue;
                    }
                    sell.add(line.effective_sell(), line.qty());
                    cost.add(line.effective_cost(), line.qty());
                }
            }

            let volume: f64 = bookings
                .iter()
                .filter(|(at, _)| bucket.contains(at))
                .flat_map(|(_, booking)| booking.lines.iter())
                .filter(|line| booking_line_on_lane(line, query.lane, query.unlabeled_bookings))
                .map(BookingLine::qty)
                .sum();

            LaneAggregatePoint {
                month: bucket.label,
                key: bucket.key,
                avg_sell: sell.average(),
                avg_cost: cost.average(),
                volume,
            }
        })
        .collect();

    debug!(
        lane = %query.lane,
        months = points.len(),
        quotations = quotes.len(),
        bookings = bookings.len(),
        "aggregated lane history"
    );
    points
}
