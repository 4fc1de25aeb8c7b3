//! Hard caps, checked before any lock is taken.

use crate::model::Day;

pub const MAX_ROOMS: usize = 100_000;
pub const MAX_BOOKINGS_PER_ROOM: usize = 10_000;
pub const MAX_NAME_LEN: usize = 256;
pub const MAX_METHOD_LEN: usize = 64;

/// Longest bookable stay, in nights.
pub const MAX_STAY_NIGHTS: i64 = 365;

/// Accepted calendar range: 1970-01-01 up to roughly year 2169.
pub const MIN_VALID_DAY: Day = 0;
pub const MAX_VALID_DAY: Day = 73_000;

/// Widest availability query window, in days.
pub const MAX_QUERY_WINDOW_DAYS: i64 = 1_095;
