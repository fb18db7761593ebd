//! Build script for meridian-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates clock.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Face names accepted in `[display] face`
const FACES: [&str; 5] = [
    "classic",
    "orbit",
    "bauhaus_light",
    "bauhaus_dark",
    "bauhaus_auto",
];

/// (section, key, max length) of every accepted setting
const KEYS: [(&str, &str, usize); 5] = [
    ("wifi", "ssid", 32),
    ("wifi", "password", 64),
    ("time", "timezone", 64),
    ("time", "ntp_server", 48),
    ("display", "face", 16),
];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths and scripts
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate clock.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=clock.toml");

    let config_path = Path::new("clock.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: clock.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds clock.toml as its default configuration.    ║\n\
            ║  Please create one in the meridian-firmware directory.           ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read clock.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in clock.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_keys(&config, &mut errors);
    validate_face(&config, &mut errors);
    validate_timezone(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid clock configuration                              ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=clock.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Every key must be known, a string, and fit its field
fn validate_keys(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(root) = config.as_table() else {
        return;
    };

    for (section, value) in root {
        let Some(table) = value.as_table() else {
            errors.push(format!("'{}' must be a [section]", section));
            continue;
        };
        if !KEYS.iter().any(|(s, _, _)| *s == section.as_str()) {
            errors.push(format!("unknown section [{}]", section));
            continue;
        }

        for (key, value) in table {
            let Some((_, _, max_len)) = KEYS
                .iter()
                .find(|(s, k, _)| *s == section.as_str() && *k == key.as_str())
            else {
                errors.push(format!("[{}] unknown key '{}'", section, key));
                continue;
            };
            match value.as_str() {
                Some(text) if text.len() > *max_len => {
                    errors.push(format!("[{}] {} longer than {} bytes", section, key, max_len));
                }
                Some(text) if text.contains('"') => {
                    errors.push(format!("[{}] {} must not contain quotes", section, key));
                }
                Some(_) => {}
                None => errors.push(format!("[{}] {} must be a string", section, key)),
            }
        }
    }
}

/// `[display] face` must name a known face
fn validate_face(config: &toml::Value, errors: &mut Vec<String>) {
    if let Some(face) = config
        .get("display")
        .and_then(|d| d.get("face"))
        .and_then(|f| f.as_str())
    {
        if !FACES.contains(&face) {
            errors.push(format!("[display] face must be one of {}", FACES.join(", ")));
        }
    }
}

/// `[time] timezone` must start with a zone abbreviation, plain or `<quoted>`
fn validate_timezone(config: &toml::Value, errors: &mut Vec<String>) {
    if let Some(tz) = config
        .get("time")
        .and_then(|t| t.get("timezone"))
        .and_then(|t| t.as_str())
    {
        let abbreviation = tz
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .count();
        if abbreviation < 3 && !tz.starts_with('<') {
            errors.push(format!("[time] timezone '{}' is not a POSIX TZ rule", tz));
        }
    }
}
