//! Per-customer rate summary over the whole trailing window.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use super::lane::{matches_lane, Lane};
use super::matcher::resolve_customer_identity;
use super::period::{trailing_month_buckets, window_span};
use super::Weighted;
use crate::records::Quotation;

/// Row label for quotations without a customer.
pub const NO_CUSTOMER: &str = "—";

/// Which customer name a summary row is keyed by.
///
/// `Customer` reads only the `customer` field, so quotations that carry
/// their name in `customerName`, `customerCode` or the inquiry snapshot are
/// grouped under [`NO_CUSTOMER`]. `Resolved` uses the same fallback chain as
/// the allowed-customer matcher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentitySource {
    #[default]
    Customer,
    Resolved,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRow {
    pub customer: String,
    /// Number of matching quotation lines.
    pub quotes: usize,
    pub avg_sell: f64,
    pub last_quoted: DateTime<Utc>,
}

pub struct CustomerQuery<'a, Tz: TimeZone> {
    pub quotations: &'a [Quotation],
    pub lane: &'a Lane,
    pub months: i32,
    pub reference: DateTime<Tz>,
    pub identity: IdentitySource,
}

struct Tally {
    quotes: usize,
    sell: Weighted,
    last_quoted: DateTime<Utc>,
}

fn customer_key(quote: &Quotation, identity: IdentitySource) -> String {
    let name = match identity {
        IdentitySource::Customer => quote.customer.as_deref().map(str::trim).unwrap_or("").to_string(),
        IdentitySource::Resolved => resolve_customer_identity(quote),
    };
    if name.is_empty() {
        NO_CUSTOMER.to_string()
    } else {
        name
    }
}

/// Summarize quoted lines on a lane by customer, busiest customer first.
///
/// Unlike [`aggregate_lane`](super::aggregate_lane) the trailing months are
/// treated as one span rather than bucketed individually.
pub fn summarize_by_customer<Tz: TimeZone>(query: &CustomerQuery<'_, Tz>) -> Vec<CustomerRow> {
    let buckets = trailing_month_buckets(&query.reference, query.months);
    let Some((start, end)) = window_span(&buckets) else {
        return Vec::new();
    };
    // Same half-open test as MonthBucket::contains
    let end = end + Duration::milliseconds(1);
    let now = query.reference.with_timezone(&Utc);

    let mut tallies: BTreeMap<String, Tally> = BTreeMap::new();
    for quote in query.quotations {
        let at = quote.recorded_at().unwrap_or(now);
        if at < start || at >= end {
            continue;
        }
        for line in &quote.lines {
            if !matches_lane(line.origin(), line.destination(), query.lane) {
                continue;
            }
            let tally = tallies
                .entry(customer_key(quote, query.identity))
                .or_insert_with(|| Tally {
                    quotes: 0,
                    sell: Weighted::default(),
                    last_quoted: at,
                });
            tally.quotes += 1;
            tally.sell.add(line.effective_sell(), line.qty());
            tally.last_quoted = tally.last_quoted.max(at);
        }
    }

    let mut rows: Vec<CustomerRow> = tallies
        .into_iter()
        .map(|(customer, tally)| CustomerRow {
            customer,
            quotes: tally.quotes,
            avg_sell: tally.sell.average(),
            last_quoted: tally.last_quoted,
        })
        .collect();
    // Stable sort keeps the map's name order among equal counts.
    rows.sort_by(|a, b| b.quotes.cmp(&a.quotes));

    debug!(lane = %query.lane, customers = rows.len(), "summarized customers");
    rows
}
