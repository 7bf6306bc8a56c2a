//! Build script for thermoportal-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates secrets.toml and exports it to the firmware as env vars

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Secrets file, kept out of version control
const SECRETS_FILE: &str = "secrets.toml";

/// Template used when no secrets file exists
const SECRETS_EXAMPLE_FILE: &str = "secrets.example.toml";

fn main() {
    setup_linker();
    export_secrets();
}

/// Set up linker search paths for memory.x
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

/// Validate the secrets file and pass its values to the firmware
fn export_secrets() {
    println!("cargo:rerun-if-changed={}", SECRETS_FILE);
    println!("cargo:rerun-if-changed={}", SECRETS_EXAMPLE_FILE);

    let path = if Path::new(SECRETS_FILE).exists() {
        Path::new(SECRETS_FILE)
    } else {
        println!(
            "cargo:warning={} not found, building with {} placeholders",
            SECRETS_FILE, SECRETS_EXAMPLE_FILE
        );
        Path::new(SECRETS_EXAMPLE_FILE)
    };

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read {:<42}║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                path.display(),
                e
            );
        }
    };

    let secrets: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in secrets file                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    let ssid = required_string(&secrets, "wifi", "ssid", &mut errors);
    let password = required_string(&secrets, "wifi", "password", &mut errors);
    let api_key = required_string(&secrets, "weather", "api_key", &mut errors);

    if let Some(ssid) = &ssid {
        if ssid.len() > 32 {
            errors.push("[wifi] ssid must be at most 32 bytes".to_string());
        }
    }
    if let Some(key) = &api_key {
        if !key.chars().all(|c| c.is_ascii_alphanumeric()) {
            errors.push("[weather] api_key must be alphanumeric".to_string());
        }
    }

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid secrets file                                     ║\n\
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

    // Validation above guarantees all three are present
    let (Some(ssid), Some(password), Some(api_key)) = (ssid, password, api_key) else {
        unreachable!();
    };
    println!("cargo:rustc-env=THERMOPORTAL_WIFI_SSID={}", ssid);
    println!("cargo:rustc-env=THERMOPORTAL_WIFI_PASSWORD={}", password);
    println!("cargo:rustc-env=THERMOPORTAL_API_KEY={}", api_key);
}

/// Look up a non-empty string at `[section] key`
fn required_string(
    secrets: &toml::Value,
    section: &str,
    key: &str,
    errors: &mut Vec<String>,
) -> Option<String> {
    match secrets.get(section).and_then(|s| s.get(key)) {
        Some(toml::Value::String(value)) if value.is_empty() => {
            errors.push(format!("[{}] {} must not be empty", section, key));
            None
        }
        // rustc-env values end at the first newline
        Some(toml::Value::String(value)) if value.chars().any(char::is_control) => {
            errors.push(format!(
                "[{}] {} must not contain control characters",
                section, key
            ));
            None
        }
        Some(toml::Value::String(value)) => Some(value.clone()),
        Some(_) => {
            errors.push(format!("[{}] {} must be a string", section, key));
            None
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            None
        }
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.chars().count() > 64 {
                format!("{}...", line.chars().take(61).collect::<String>())
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
