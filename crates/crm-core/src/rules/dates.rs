use crate::error::CoreError;
use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Utc};

/// Width of the "birthday this week" window, inclusive of both ends.
pub const BIRTHDAY_WINDOW_DAYS: i64 = 7;

pub fn local_today(now_utc: i64, local_offset: FixedOffset) -> Result<NaiveDate, CoreError> {
    let now = DateTime::<Utc>::from_timestamp(now_utc, 0).ok_or(CoreError::InvalidTimestamp)?;
    Ok(now.with_timezone(&local_offset).date_naive())
}

/// Moves a birthday into `year`, keeping month and day.
///
/// Feb 29 rolls over to Mar 1 in non-leap years.
pub fn reanchor_birthday(birthday: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, birthday.month(), birthday.day()).or_else(|| {
        NaiveDate::from_ymd_opt(year, birthday.month(), 1)?
            .checked_add_signed(Duration::days(i64::from(birthday.day()) - 1))
    })
}

pub fn birthday_window_end(today: NaiveDate) -> NaiveDate {
    today
        .checked_add_signed(Duration::days(BIRTHDAY_WINDOW_DAYS))
        .unwrap_or(NaiveDate::MAX)
}

/// True when the birthday, moved into the current year, falls in
/// `[today, today + 7 days]`.
///
/// The window never wraps into the next year: in late December a January
/// birthday does not match.
pub fn is_birthday_this_week(birthday: Option<NaiveDate>, today: NaiveDate) -> bool {
    let Some(birthday) = birthday else {
        return false;
    };
    let Some(anchored) = reanchor_birthday(birthday, today.year()) else {
        return false;
    };
    anchored >= today && anchored <= birthday_window_end(today)
}
