//! Demo snapshot used by `freight init --demo`.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::analytics::{trailing_month_buckets, Lane};
use crate::records::{Booking, BookingLine, LineItem, Quotation};

const DEMO_MONTHS: i32 = 7;
const DEMO_CUSTOMERS: [&str; 3] = ["ACE Logistics", "Blue Whale Shipping", "Harbor Freight Co"];

/// Seven months of one-line quotations on `lane`, ending at the month of
/// `reference`, plus one booking per month.
///
/// Month `i` (oldest first) quotes qty 1 at sell `2100 + 10i` with margin
/// rising from 320 to 330.
pub fn demo_snapshot<Tz: TimeZone>(reference: &DateTime<Tz>, lane: &Lane) -> (Vec<Quotation>, Vec<Booking>) {
    let mut quotations = Vec::new();
    let mut bookings = Vec::new();

    for (i, bucket) in trailing_month_buckets(reference, DEMO_MONTHS).iter().enumerate() {
        let at = mid_month(&bucket.start.with_timezone(&Utc));
        let step = i as f64;

        quotations.push(Quotation {
            id: Some(format!("Q-DEMO-{:03}", i + 1)),
            customer: Some(DEMO_CUSTOMERS[i % DEMO_CUSTOMERS.len()].to_string()),
            created_at: Some(at),
            lines: vec![LineItem {
                origin: Some(lane.origin.clone()),
                destination: Some(lane.destination.clone()),
                qty: Some(1.0),
                sell: Some(2100.0 + 10.0 * step),
                discount: Some(0.0),
                margin: Some(320.0 + (step * 10.0 / (DEMO_MONTHS - 1) as f64).round()),
            }],
            ..Default::default()
        });

        bookings.push(Booking {
            id: Some(format!("B-DEMO-{:03}", i + 1)),
            created_at: Some(at),
            lines: vec![BookingLine {
                origin: Some(lane.origin.clone()),
                destination: Some(lane.destination.clone()),
                qty: Some(2.0 + (i % 3) as f64),
            }],
            ..Default::default()
        });
    }

    (quotations, bookings)
}

fn mid_month(start: &DateTime<Utc>) -> DateTime<Utc> {
    *start + Duration::days(14) + Duration::hours(12)
}
