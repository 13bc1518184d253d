pub mod analytics;
pub mod config;
pub mod error;
pub mod records;
pub mod seed;

pub use analytics::{
    aggregate_lane, matches_allowed, matches_lane, resolve_customer_identity, ros_band,
    summarize_by_customer, trailing_month_buckets, CustomerQuery, CustomerRow, Lane,
    LaneAggregatePoint, LaneQuery, MonthBucket, RosBand,
};
pub use config::Config;
pub use error::{FreightError, Result};
pub use records::{Booking, BookingLine, LineItem, Quotation};
