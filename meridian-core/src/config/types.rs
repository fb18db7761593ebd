//! Configuration type definitions
//!
//! `ClockConfig` is what the firmware persists to flash as postcard-serialized
//! binary data. `Timing` holds the compile-time intervals shared by every task.

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Current config layout version
pub const CONFIG_VERSION: u8 = 1;

/// Maximum POSIX TZ string length
pub const MAX_TIMEZONE_LEN: usize = 64;

/// Maximum NTP host name length
pub const MAX_SERVER_LEN: usize = 48;

/// Maximum WiFi SSID length (802.11 limit)
pub const MAX_SSID_LEN: usize = 32;

/// Maximum WPA2 passphrase length
pub const MAX_PASSWORD_LEN: usize = 64;

/// Default timezone (Central European Time with DST)
pub const DEFAULT_TIMEZONE: &str = "CET-1CEST,M3.5.0,M10.5.0/3";

/// Default preferred NTP server
pub const DEFAULT_NTP_SERVER: &str = "pool.ntp.org";

/// Selectable clock face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FaceKind {
    #[default]
    Classic,
    Orbit,
    BauhausLight,
    BauhausDark,
    BauhausAuto,
}

impl FaceKind {
    /// All faces in cycling order
    pub const ALL: [FaceKind; 5] = [
        FaceKind::Classic,
        FaceKind::Orbit,
        FaceKind::BauhausLight,
        FaceKind::BauhausDark,
        FaceKind::BauhausAuto,
    ];

    /// The face that follows this one when cycling
    pub fn next(self) -> Self {
        match self {
            FaceKind::Classic => FaceKind::Orbit,
            FaceKind::Orbit => FaceKind::BauhausLight,
            FaceKind::BauhausLight => FaceKind::BauhausDark,
            FaceKind::BauhausDark => FaceKind::BauhausAuto,
            FaceKind::BauhausAuto => FaceKind::Classic,
        }
    }

    /// Config file name of the face
    pub fn as_str(self) -> &'static str {
        match self {
            FaceKind::Classic => "classic",
            FaceKind::Orbit => "orbit",
            FaceKind::BauhausLight => "bauhaus_light",
            FaceKind::BauhausDark => "bauhaus_dark",
            FaceKind::BauhausAuto => "bauhaus_auto",
        }
    }

    /// Parse a config file name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

/// Persisted clock configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClockConfig {
    /// Layout version, bumped on incompatible changes
    pub version: u8,
    /// POSIX TZ rule, e.g. `CET-1CEST,M3.5.0,M10.5.0/3`
    pub timezone: String<MAX_TIMEZONE_LEN>,
    /// Preferred NTP server, tried before the fallbacks
    pub ntp_server: String<MAX_SERVER_LEN>,
    /// Active clock face
    pub face: FaceKind,
    /// WiFi network name (empty = not configured)
    pub wifi_ssid: String<MAX_SSID_LEN>,
    /// WiFi passphrase (empty = open network)
    pub wifi_password: String<MAX_PASSWORD_LEN>,
}

impl ClockConfig {
    /// Whether WiFi credentials have been provided
    pub fn is_wifi_configured(&self) -> bool {
        !self.wifi_ssid.is_empty()
    }

    /// Configured timezone rule
    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    /// Configured preferred NTP server
    pub fn ntp_server(&self) -> &str {
        &self.ntp_server
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        let mut timezone = String::new();
        let _ = timezone.push_str(DEFAULT_TIMEZONE);
        let mut ntp_server = String::new();
        let _ = ntp_server.push_str(DEFAULT_NTP_SERVER);

        Self {
            version: CONFIG_VERSION,
            timezone,
            ntp_server,
            face: FaceKind::default(),
            wifi_ssid: String::new(),
            wifi_password: String::new(),
        }
    }
}

/// Task periods and policy intervals, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    /// Minimum time between successful time syncs
    pub sync_interval_ms: u64,
    /// Minimum time between reconnect attempts
    pub reconnect_interval_ms: u64,
    /// How long a pending reset waits for confirmation
    pub reset_timeout_ms: u64,
    /// Lifetime of a transient status message
    pub status_message_ms: u64,
    /// Blink phase period, also the render period
    pub blink_interval_ms: u64,
    /// Sync task polling period
    pub sync_check_ms: u64,
    /// Link monitor polling period
    pub link_check_ms: u64,
    /// Time-source polls per server
    pub sync_poll_attempts: u8,
    /// Delay between time-source polls
    pub sync_poll_delay_ms: u32,
}

impl Timing {
    pub const DEFAULT: Self = Self {
        sync_interval_ms: 60 * 60 * 1000,
        reconnect_interval_ms: 30_000,
        reset_timeout_ms: 30_000,
        status_message_ms: 3_000,
        blink_interval_ms: 400,
        sync_check_ms: 1_000,
        link_check_ms: 5_000,
        sync_poll_attempts: 10,
        sync_poll_delay_ms: 500,
    };
}

impl Default for Timing {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Button classification thresholds, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonTiming {
    /// Raw level must be stable this long to count
    pub debounce_ms: u64,
    /// Window for the second click of a double-click
    pub click_ms: u64,
    /// Hold time that turns a press into a long press
    pub long_press_ms: u64,
    /// Polling period of the button task
    pub poll_ms: u64,
}

impl ButtonTiming {
    pub const DEFAULT: Self = Self {
        debounce_ms: 50,
        click_ms: 400,
        long_press_ms: 800,
        poll_ms: 10,
    };
}

impl Default for ButtonTiming {
    fn default() -> Self {
        Self::DEFAULT
    }
}
