//! Minimal parser for the embedded `clock.toml`
//!
//! Handles only the subset the clock configuration needs. It is NOT a TOML
//! implementation.
//!
//! Supported:
//! - `[wifi]`, `[time]` and `[display]` section headers
//! - `key = "value"` string pairs (quotes optional for bare words)
//! - Comments (`# ...`), also trailing a value
//!
//! Keys that are absent keep their `ClockConfig::default()` value.

use heapless::String;

use super::types::{ClockConfig, FaceKind};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Line is not a `key = value` pair, or the value is malformed
    InvalidValue,
    /// Key is not valid in the current section
    UnknownKey,
    /// Value does not fit the field's capacity
    TooLong,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Wifi,
    Time,
    Display,
}

/// Parse configuration text on top of the built-in defaults
pub fn parse_config(input: &str) -> Result<ClockConfig, ParseError> {
    let mut config = ClockConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidValue)?;
        let value = parse_string(value)?;
        apply_value(&mut config, section, key, value)?;
    }

    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "wifi" => Ok(Section::Wifi),
        "time" => Ok(Section::Time),
        "display" => Ok(Section::Display),
        _ => Err(ParseError::InvalidSection),
    }
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Strip a trailing comment unless the '#' sits inside quotes
    let value = match value.find('#') {
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

fn parse_string(value: &str) -> Result<&str, ParseError> {
    if value.starts_with('"') {
        if value.len() >= 2 && value.ends_with('"') {
            Ok(&value[1..value.len() - 1])
        } else {
            Err(ParseError::InvalidValue)
        }
    } else {
        Ok(value)
    }
}

fn set<const N: usize>(field: &mut String<N>, value: &str) -> Result<(), ParseError> {
    *field = String::try_from(value).map_err(|_| ParseError::TooLong)?;
    Ok(())
}

fn apply_value(
    config: &mut ClockConfig,
    section: Section,
    key: &str,
    value: &str,
) -> Result<(), ParseError> {
    match (section, key) {
        (Section::Wifi, "ssid") => set(&mut config.wifi_ssid, value),
        (Section::Wifi, "password") => set(&mut config.wifi_password, value),
        (Section::Time, "timezone") => set(&mut config.timezone, value),
        (Section::Time, "ntp_server") => set(&mut config.ntp_server, value),
        (Section::Display, "face") => {
            config.face = FaceKind::from_name(value).ok_or(ParseError::InvalidValue)?;
            Ok(())
        }
        _ => Err(ParseError::UnknownKey),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::{DEFAULT_NTP_SERVER, DEFAULT_TIMEZONE};

    const SAMPLE: &str = r#"
# Meridian defaults
[wifi]
ssid = "workshop"
password = "hunter22"   # trailing comment

[time]
timezone = "EST5EDT,M3.2.0,M11.1.0"
ntp_server = time.nist.gov

[display]
face = "bauhaus_auto"
"#;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(SAMPLE).unwrap();
        assert_eq!(config.wifi_ssid.as_str(), "workshop");
        assert_eq!(config.wifi_password.as_str(), "hunter22");
        assert_eq!(config.timezone(), "EST5EDT,M3.2.0,M11.1.0");
        assert_eq!(config.ntp_server(), "time.nist.gov");
        assert_eq!(config.face, FaceKind::BauhausAuto);
        assert!(config.is_wifi_configured());
    }

    #[test]
    fn test_missing_keys_keep_defaults() {
        let config = parse_config("[display]\nface = \"orbit\"\n").unwrap();
        assert_eq!(config.face, FaceKind::Orbit);
        assert_eq!(config.timezone(), DEFAULT_TIMEZONE);
        assert_eq!(config.ntp_server(), DEFAULT_NTP_SERVER);
        assert!(!config.is_wifi_configured());
    }

    #[test]
    fn test_hash_inside_quotes_is_kept() {
        let config = parse_config("[wifi]\npassword = \"a#b\"\n").unwrap();
        assert_eq!(config.wifi_password.as_str(), "a#b");
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_config("[network]\n"), Err(ParseError::InvalidSection));
        assert_eq!(parse_config("ssid = \"x\"\n"), Err(ParseError::UnknownKey));
        assert_eq!(parse_config("[wifi]\nssid\n"), Err(ParseError::InvalidValue));
        assert_eq!(
            parse_config("[display]\nface = \"digital\"\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[wifi]\nssid = \"unterminated\n"),
            Err(ParseError::InvalidValue)
        );

        let long = "[wifi]\nssid = \"0123456789012345678901234567890123456789\"\n";
        assert_eq!(parse_config(long), Err(ParseError::TooLong));
    }
}
