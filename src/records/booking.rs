use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::lenient;

/// A booked leg. Lane fields are optional; older bookings omit them.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct BookingLine {
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub qty: Option<f64>,
}

impl BookingLine {
    pub fn qty(&self) -> f64 {
        self.qty.unwrap_or(1.0)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::timestamp", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::timestamp", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::timestamp", skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::records")]
    pub lines: Vec<BookingLine>,
}

impl Booking {
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        self.created_at.or(self.updated_at).or(self.date)
    }
}
