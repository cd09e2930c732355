// Privacy Sentinel platform paths
// Linux:   $XDG_CONFIG_HOME/privacy-sentinel or ~/.config/privacy-sentinel
// macOS:   ~/Library/Application Support/PrivacySentinel
// Windows: %APPDATA%/PrivacySentinel

use std::env;
use std::path::PathBuf;

/// Environment variable that overrides the configuration directory on every platform.
pub const CONFIG_DIR_ENV: &str = "SENTINEL_CONFIG_DIR";

#[cfg_attr(target_os = "windows", allow(dead_code))]
fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// Returns the configuration directory, honoring `SENTINEL_CONFIG_DIR`.
pub fn get_config_dir() -> PathBuf {
    if let Ok(dir) = env::var(CONFIG_DIR_ENV) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    default_config_dir()
}

#[cfg(target_os = "linux")]
fn default_config_dir() -> PathBuf {
    match env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join("privacy-sentinel"),
        _ => home_dir().join(".config").join("privacy-sentinel"),
    }
}

#[cfg(target_os = "macos")]
fn default_config_dir() -> PathBuf {
    home_dir()
        .join("Library")
        .join("Application Support")
        .join("PrivacySentinel")
}

#[cfg(target_os = "windows")]
fn default_config_dir() -> PathBuf {
    let appdata = env::var("APPDATA")
        .unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
    PathBuf::from(appdata).join("PrivacySentinel")
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
fn default_config_dir() -> PathBuf {
    home_dir().join(".privacy-sentinel")
}
