//! Wall clock, monotonic clock, and broken-down local time

/// Broken-down local time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LocalTime {
    pub year: i16,
    /// 1..=12
    pub month: u8,
    /// 1..=31
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    /// Monday = 0 .. Sunday = 6
    pub weekday: u8,
    /// 0-based day of the year
    pub day_of_year: u16,
}

const DAY_NAMES: [&str; 7] = [
    "MONDAY",
    "TUESDAY",
    "WEDNESDAY",
    "THURSDAY",
    "FRIDAY",
    "SATURDAY",
    "SUNDAY",
];

impl LocalTime {
    /// Uppercase English day name
    pub fn day_name(&self) -> &'static str {
        DAY_NAMES[(self.weekday % 7) as usize]
    }

    /// Saturday or Sunday
    pub fn is_weekend(&self) -> bool {
        self.weekday >= 5
    }

    /// Days in the current month, leap-aware
    pub fn days_in_month(&self) -> u8 {
        days_in_month(self.year, self.month)
    }

    /// Days in the current year
    pub fn days_in_year(&self) -> u16 {
        if is_leap_year(self.year) {
            366
        } else {
            365
        }
    }
}

/// Gregorian leap year rule
pub fn is_leap_year(year: i16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Days in `month` (1..=12) of `year`
pub fn days_in_month(year: i16, month: u8) -> u8 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Source of local wall-clock time
pub trait WallClock {
    /// Current local time, or `None` while the clock has never been set
    fn local_time(&self) -> Option<LocalTime>;
}

impl<T: WallClock + ?Sized> WallClock for &T {
    fn local_time(&self) -> Option<LocalTime> {
        (**self).local_time()
    }
}

/// Monotonic millisecond counter since boot
///
/// Every due check and deadline in the state model is measured on this
/// clock, never on the wall clock, so a time sync cannot make them jump.
pub trait Monotonic {
    fn now_ms(&self) -> u64;
}

impl<T: Monotonic + ?Sized> Monotonic for &T {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}
