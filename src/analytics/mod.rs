//! Rate-history analytics over quotation and booking snapshots.
//!
//! Everything here is a pure function of its inputs: callers pass in the
//! record slices and the reference instant, and get derived tables back.

pub mod customers;
pub mod lane;
pub mod matcher;
pub mod period;
pub mod ros;

pub use customers::{summarize_by_customer, CustomerQuery, CustomerRow, IdentitySource, NO_CUSTOMER};
pub use lane::{aggregate_lane, matches_lane, Lane, LaneAggregatePoint, LaneQuery, UnlabeledBookings};
pub use matcher::{matches_allowed, matches_allowed_with, resolve_customer_identity, MatchRules};
pub use period::{trailing_month_buckets, window_span, MonthBucket};
pub use ros::{ros_band, ros_percent, RosBand};

/// Running Σ(value × qty) and Σqty for a quantity-weighted mean.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Weighted {
    total: f64,
    qty: f64,
}

impl Weighted {
    pub(crate) fn add(&mut self, value: f64, qty: f64) {
        self.total += value * qty;
        self.qty += qty;
    }

    /// Rounded to cents; zero when no quantity was seen.
    pub(crate) fn average(&self) -> f64 {
        if self.qty == 0.0 {
            return 0.0;
        }
        round2(self.total / self.qty)
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
