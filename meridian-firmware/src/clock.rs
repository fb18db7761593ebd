//! Wall clock and monotonic clock
//!
//! Wall time is kept as the Unix time of boot: a sync stores the offset
//! between the NTP answer and the embassy uptime, and every read adds the
//! current uptime back. Local time comes from the configured POSIX TZ rule.

use defmt::*;
use embassy_time::Instant;
use jiff::tz::TimeZone;
use jiff::Timestamp;
use portable_atomic::{AtomicI64, Ordering};

use meridian_core::traits::{LocalTime, Monotonic, WallClock};

/// Milliseconds since boot
#[derive(Debug, Clone, Copy, Default)]
pub struct Uptime;

impl Monotonic for Uptime {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}

/// NTP-disciplined local clock
pub struct SystemClock {
    /// Unix milliseconds at boot (0 = never set)
    boot_unix_ms: AtomicI64,
    zone: TimeZone,
}

impl SystemClock {
    /// Clock for the POSIX TZ `rule`, falling back to UTC if it is invalid
    pub fn new(rule: &str) -> Self {
        let zone = match TimeZone::posix(rule) {
            Ok(zone) => zone,
            Err(_) => {
                warn!("Invalid timezone rule '{}', using UTC", rule);
                TimeZone::UTC
            }
        };
        Self {
            boot_unix_ms: AtomicI64::new(0),
            zone,
        }
    }

    /// Set the clock from a Unix timestamp in milliseconds
    pub fn set_unix_ms(&self, unix_ms: i64) {
        let uptime = Instant::now().as_millis() as i64;
        self.boot_unix_ms
            .store((unix_ms - uptime).max(1), Ordering::Release);
    }

    /// Current Unix time in milliseconds, if the clock has been set
    pub fn unix_ms(&self) -> Option<i64> {
        match self.boot_unix_ms.load(Ordering::Acquire) {
            0 => None,
            boot => Some(boot + Instant::now().as_millis() as i64),
        }
    }
}

impl WallClock for SystemClock {
    fn local_time(&self) -> Option<LocalTime> {
        let now = Timestamp::from_millisecond(self.unix_ms()?).ok()?;
        let dt = self.zone.to_datetime(now);
        Some(LocalTime {
            year: dt.year(),
            month: dt.month() as u8,
            day: dt.day() as u8,
            hour: dt.hour() as u8,
            minute: dt.minute() as u8,
            second: dt.second() as u8,
            weekday: dt.weekday().to_monday_zero_offset() as u8,
            day_of_year: (dt.day_of_year() - 1) as u16,
        })
    }
}
