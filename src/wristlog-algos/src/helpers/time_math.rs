use chrono::{DateTime, FixedOffset, NaiveDate, TimeDelta};
use wristlog_types::Timestamp;

/// Calendar day a timestamp falls on, in the given offset.
pub fn day_of(timestamp: Timestamp, offset: FixedOffset) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp, 0).map(|t| t.with_timezone(&offset).date_naive())
}

/// First second of `day` in the given offset.
pub fn day_start(day: NaiveDate, offset: FixedOffset) -> Option<Timestamp> {
    let midnight = day.and_hms_opt(0, 0, 0)?;
    Some(midnight.and_utc().timestamp() - i64::from(offset.local_minus_utc()))
}

/// Inclusive `[first, last]` second range of `day`.
pub fn day_range(day: NaiveDate, offset: FixedOffset) -> Option<(Timestamp, Timestamp)> {
    let start = day_start(day, offset)?;
    let end = day_start(day.succ_opt()?, offset)? - 1;
    Some((start, end))
}

pub fn shift_days(day: NaiveDate, days: i64) -> Option<NaiveDate> {
    day.checked_add_signed(TimeDelta::days(days))
}
