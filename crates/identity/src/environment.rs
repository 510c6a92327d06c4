//! Host environment capture.
//!
//! Two distinct views of the machine live here. [`HostSnapshot`] holds the
//! non-synthetic facts (platform, architecture, timezone, tool versions)
//! that get frozen into a profile when it is generated. [`RealIdentity`]
//! holds the real identifying values that must never leave the process and
//! that the request rewriter searches for.

use mirage_core::ProfileConfig;
use serde::{Deserialize, Serialize};

/// Facts read from the host at profile generation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostSnapshot {
    /// Conventional platform name (`win32`, `darwin`, `linux`).
    pub platform: String,
    /// Conventional architecture name (`x64`, `arm64`, `ia32`).
    pub arch: String,
    pub timezone: String,
    pub locale: String,
    pub editor_version: String,
    pub runtime_version: String,
    pub package_manager_version: String,
    pub extension_version: String,
    /// Wall clock at capture, Unix milliseconds.
    pub captured_at_ms: u64,
}

impl HostSnapshot {
    /// Capture the current host, taking tool versions from config.
    pub fn capture(config: &ProfileConfig) -> Self {
        Self {
            platform: platform_name(std::env::consts::OS).to_string(),
            arch: arch_name(std::env::consts::ARCH).to_string(),
            timezone: std::env::var("TZ")
                .ok()
                .filter(|tz| !tz.trim().is_empty())
                .unwrap_or_else(|| "UTC".to_string()),
            locale: config.locale.clone(),
            editor_version: config.editor_version.clone(),
            runtime_version: config.runtime_version.clone(),
            package_manager_version: config.package_manager_version.clone(),
            extension_version: config.extension_version.clone(),
            captured_at_ms: mirage_core::now_ms(),
        }
    }
}

fn platform_name(os: &str) -> &str {
    match os {
        "windows" => "win32",
        "macos" => "darwin",
        "" => "win32",
        other => other,
    }
}

fn arch_name(arch: &str) -> &str {
    match arch {
        "x86_64" => "x64",
        "aarch64" => "arm64",
        "x86" => "ia32",
        "" => "x64",
        other => other,
    }
}

/// Real identifying values of the host machine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RealIdentity {
    pub hostname: String,
    pub username: String,
    pub home_dir: String,
    /// Raw values of user-identifying environment variables (`USER`, `USERNAME`).
    pub env_users: Vec<String>,
}

impl RealIdentity {
    /// Detect from the running host. Missing values stay empty and are
    /// skipped by substitution.
    pub fn detect() -> Self {
        let hostname = hostname::get()
            .map(|h| h.to_string_lossy().into_owned())
            .unwrap_or_default();

        let env_users: Vec<String> = ["USER", "USERNAME"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .filter(|v| !v.is_empty())
            .collect();

        let username = env_users.first().cloned().unwrap_or_default();
        let home_dir = mirage_core::config::home_dir().to_string_lossy().into_owned();

        Self {
            hostname,
            username,
            home_dir,
            env_users,
        }
    }
}
