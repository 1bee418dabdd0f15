pub mod dates;
pub mod elapsed;

pub use dates::{
    birthday_window_end, is_birthday_this_week, local_today, reanchor_birthday,
    BIRTHDAY_WINDOW_DAYS,
};
pub use elapsed::{describe_elapsed, elapsed_days_ceil, SECONDS_PER_DAY};
