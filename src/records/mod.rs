mod booking;
pub mod lenient;
mod quotation;

pub use booking::{Booking, BookingLine};
pub use quotation::{InquirySnapshot, LineItem, QuoteTotals, Quotation};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// Decode a snapshot collection.
///
/// A top level that is not an array is an empty collection. Elements that do
/// not decode as `T` are skipped.
pub fn decode_collection<T: DeserializeOwned>(value: Value, kind: &str) -> Vec<T> {
    let Value::Array(items) = value else {
        warn!(kind, "snapshot is not an array, treating it as empty");
        return Vec::new();
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(kind, index, error = %e, "skipping undecodable record");
                None
            }
        })
        .collect()
}
