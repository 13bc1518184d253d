//! Trailing calendar-month windows.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

/// One calendar month in the reference time zone, inclusive on both ends.
#[derive(Debug, Clone)]
pub struct MonthBucket<Tz: TimeZone> {
    /// `YYYY-MM`
    pub key: String,
    /// e.g. `Mar 2025`
    pub label: String,
    pub start: DateTime<Tz>,
    /// Last millisecond of the month.
    pub end: DateTime<Tz>,
}

impl<Tz: TimeZone> MonthBucket<Tz> {
    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        let start = self.start.with_timezone(&Utc);
        let end = self.end.with_timezone(&Utc) + Duration::milliseconds(1);
        *instant >= start && *instant < end
    }
}

/// Build `n` month buckets, oldest first, the last one holding `reference`.
///
/// `n <= 0` yields no buckets. Range checking beyond that is left to callers.
pub fn trailing_month_buckets<Tz: TimeZone>(reference: &DateTime<Tz>, n: i32) -> Vec<MonthBucket<Tz>> {
    if n <= 0 {
        return Vec::new();
    }

    let tz = reference.timezone();
    let local = reference.naive_local();
    let anchor = month_index(local.year(), local.month());

    (0..n)
        .rev()
        .map(|back| {
            let index = anchor - back;
            let start = month_start(&tz, index);
            let end = month_start(&tz, index + 1) - Duration::milliseconds(1);
            let (year, month) = split_month_index(index);
            MonthBucket {
                key: format!("{year:04}-{month:02}"),
                label: first_day(index).format("%b %Y").to_string(),
                start,
                end,
            }
        })
        .collect()
}

/// The single span `[first.start, last.end]` covered by a bucket run.
pub fn window_span<Tz: TimeZone>(buckets: &[MonthBucket<Tz>]) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let first = buckets.first()?;
    let last = buckets.last()?;
    Some((first.start.with_timezone(&Utc), last.end.with_timezone(&Utc)))
}

fn month_index(year: i32, month: u32) -> i32 {
    year * 12 + month as i32 - 1
}

fn split_month_index(index: i32) -> (i32, u32) {
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

fn first_day(index: i32) -> NaiveDate {
    let (year, month) = split_month_index(index);
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
}

fn month_start<Tz: TimeZone>(tz: &Tz, index: i32) -> DateTime<Tz> {
    let midnight = first_day(index).and_time(NaiveTime::MIN);
    // Zones that skip midnight on a DST change have no local 00:00.
    tz.from_local_datetime(&midnight)
        .earliest()
        .unwrap_or_else(|| tz.from_utc_datetime(&midnight))
}
