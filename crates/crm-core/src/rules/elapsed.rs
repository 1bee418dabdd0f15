pub const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Whole days between two instants, rounding any partial day up.
pub fn elapsed_days_ceil(then_utc: i64, now_utc: i64) -> i64 {
    let diff = now_utc.abs_diff(then_utc);
    let days = diff.div_ceil(SECONDS_PER_DAY as u64);
    i64::try_from(days).unwrap_or(i64::MAX)
}

pub fn describe_elapsed(then_utc: Option<i64>, now_utc: i64) -> String {
    let Some(then) = then_utc else {
        return "Unknown".to_string();
    };
    match elapsed_days_ceil(then, now_utc) {
        0 => "Today".to_string(),
        1 => "1 day ago".to_string(),
        days => format!("{days} days ago"),
    }
}
