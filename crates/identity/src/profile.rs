//! Identity profile model.
//!
//! A profile is the full bundle of synthetic identifiers derived from one
//! seed. Every synthetic field is `synth::derive(seed, "-<field>")`; host
//! facts come from a [`HostSnapshot`] frozen at generation time. Given the
//! same seed and snapshot, derivation is field-for-field identical.

use crate::environment::HostSnapshot;
use crate::synth::{derive, shape};
use serde::{Deserialize, Serialize};

const INODE_SPACE: u64 = 10_000_000;
const BOOT_WINDOW_MS: u64 = 86_400_000;
const PROCESS_WINDOW_MS: u64 = 3_600_000;

/// The complete synthetic identity of one installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityProfile {
    /// Root seed every synthetic value traces back to.
    pub seed: String,
    /// Generation time, Unix milliseconds.
    pub created_at: u64,
    pub identifiers: Identifiers,
    pub system: SystemInfo,
    pub filesystem: FilesystemInfo,
    pub hardware: HardwareIds,
    pub software: SoftwareInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identifiers {
    pub machine_id: String,
    pub telemetry_dev_device_id: String,
    pub os_machine_id: String,
    pub user_data_machine_id: String,
    pub session_id: String,
    pub request_id: String,
    pub random_hash: String,
    pub system_data_directory_uuid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    pub platform: String,
    pub arch: String,
    pub hostname: String,
    pub username: String,
    pub os_release: String,
    pub kernel_version: String,
    pub timezone: String,
    pub locale: String,
}

/// Inode-like integers reported for well-known directories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilesystemInfo {
    pub home_directory_ino: u64,
    pub project_root_ino: u64,
    pub user_data_path_ino: u64,
    pub system_data_directory_ino: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiosIds {
    pub vendor: String,
    pub version: String,
    pub serial: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseboardIds {
    pub manufacturer: String,
    pub model: String,
    pub serial: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpuIds {
    pub vendor: String,
    pub model: String,
    pub device_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardwareIds {
    pub bios_info: BiosIds,
    pub baseboard_info: BaseboardIds,
    pub mac_addresses: Vec<String>,
    pub memory_module_serials: Vec<String>,
    pub usb_device_ids: Vec<String>,
    pub audio_device_ids: Vec<String>,
    pub disk_serials: Vec<String>,
    pub gpu_info: GpuIds,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftwareInfo {
    pub editor: String,
    pub runtime: String,
    pub package_manager: String,
    pub extension_version: String,
    /// Synthetic boot time, Unix milliseconds.
    pub system_boot_time: u64,
    /// Synthetic process start time, Unix milliseconds.
    pub process_start_time: u64,
}

/// Number of fields per profile group, as reported by the stats surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCounts {
    pub identifiers: usize,
    pub system: usize,
    pub filesystem: usize,
    pub hardware: usize,
    pub software: usize,
}

fn os_release_for(platform: &str) -> (&'static str, &'static str) {
    match platform {
        "darwin" => ("22.6.0", "Darwin Kernel Version 22.6.0"),
        "linux" => ("5.15.0-91-generic", "5.15.0-91-generic #101-Ubuntu"),
        _ => ("10.0.19045", "10.0.19045.3693"),
    }
}

impl IdentityProfile {
    /// Derive a full profile from a seed and a host snapshot.
    pub fn derive(seed: &str, host: &HostSnapshot) -> Self {
        let uuid = |field: &str| derive(seed, field).uuid();
        let compact = |field: &str, len: usize| derive(seed, field).compact(len);
        let (os_release, kernel_version) = os_release_for(&host.platform);

        let identifiers = Identifiers {
            machine_id: uuid("-machine"),
            telemetry_dev_device_id: uuid("-telemetry"),
            os_machine_id: uuid("-os"),
            user_data_machine_id: uuid("-userdata"),
            session_id: uuid("-session"),
            request_id: uuid("-request"),
            random_hash: uuid("-hash"),
            system_data_directory_uuid: uuid("-systemdir"),
        };

        let system = SystemInfo {
            platform: host.platform.clone(),
            arch: host.arch.clone(),
            hostname: format!("DESKTOP-{}", compact("-host", 8)),
            username: format!("user-{}", compact("-user", 8)),
            os_release: os_release.to_string(),
            kernel_version: kernel_version.to_string(),
            timezone: host.timezone.clone(),
            locale: host.locale.clone(),
        };

        let filesystem = FilesystemInfo {
            home_directory_ino: derive(seed, "-ino-home").bounded(INODE_SPACE),
            project_root_ino: derive(seed, "-ino-project").bounded(INODE_SPACE),
            user_data_path_ino: derive(seed, "-ino-userdata").bounded(INODE_SPACE),
            system_data_directory_ino: derive(seed, "-ino-systemdir").bounded(INODE_SPACE),
        };

        let hardware = HardwareIds {
            bios_info: BiosIds {
                vendor: "American Megatrends Inc.".to_string(),
                version: format!("2.{}", derive(seed, "-bios-version").bounded(100)),
                serial: compact("-bios", 12),
            },
            baseboard_info: BaseboardIds {
                manufacturer: "ASUSTeK COMPUTER INC.".to_string(),
                model: format!("PRIME-{}", compact("-board", 6)),
                serial: compact("-baseboard", 12),
            },
            mac_addresses: vec![derive(seed, "-mac1").mac(), derive(seed, "-mac2").mac()],
            memory_module_serials: vec![compact("-mem1", 12), compact("-mem2", 12)],
            usb_device_ids: vec![compact("-usb1", 8), compact("-usb2", 8)],
            audio_device_ids: vec![compact("-audio", 8)],
            disk_serials: vec![compact("-disk", 12)],
            gpu_info: GpuIds {
                vendor: "NVIDIA Corporation".to_string(),
                model: "GeForce RTX 3070".to_string(),
                device_id: compact("-gpu", 8),
            },
        };

        let created_at = host.captured_at_ms;
        let software = SoftwareInfo {
            editor: host.editor_version.clone(),
            runtime: host.runtime_version.clone(),
            package_manager: host.package_manager_version.clone(),
            extension_version: host.extension_version.clone(),
            system_boot_time: created_at
                .saturating_sub(derive(seed, "-boot").bounded(BOOT_WINDOW_MS)),
            process_start_time: created_at
                .saturating_sub(derive(seed, "-process").bounded(PROCESS_WINDOW_MS)),
        };

        Self {
            seed: seed.to_string(),
            created_at,
            identifiers,
            system,
            filesystem,
            hardware,
            software,
        }
    }

    /// Truncated machine id safe for logs and status output.
    pub fn short_id(&self) -> String {
        let id = &self.identifiers.machine_id;
        format!("{}...", &id[..id.len().min(8)])
    }

    pub fn field_counts(&self) -> FieldCounts {
        FieldCounts {
            identifiers: 8,
            system: 8,
            filesystem: 4,
            hardware: 8,
            software: 6,
        }
    }

    /// Short BLAKE3 digest of the canonical JSON form.
    ///
    /// Two profiles with the same fingerprint are field-for-field identical
    /// for practical purposes; the value itself reveals nothing useful.
    pub fn fingerprint(&self) -> String {
        let canonical = serde_json::to_vec(self).unwrap_or_default();
        let digest = blake3::hash(&canonical);
        hex::encode(&digest.as_bytes()[..8])
    }

    /// Check every synthetic identifier against its expected shape.
    pub fn check_shapes(&self) -> Result<(), String> {
        let ids = &self.identifiers;
        let uuids = [
            ("machineId", &ids.machine_id),
            ("telemetryDevDeviceId", &ids.telemetry_dev_device_id),
            ("osMachineId", &ids.os_machine_id),
            ("userDataMachineId", &ids.user_data_machine_id),
            ("sessionId", &ids.session_id),
            ("requestId", &ids.request_id),
            ("randomHash", &ids.random_hash),
            ("systemDataDirectoryUuid", &ids.system_data_directory_uuid),
        ];
        for (name, value) in uuids {
            if !shape::is_uuid_v4(value) {
                return Err(format!("{} is not a UUID: {:?}", name, value));
            }
        }

        let hw = &self.hardware;
        if hw.mac_addresses.is_empty() || !hw.mac_addresses.iter().all(|m| shape::is_mac(m)) {
            return Err("macAddresses malformed".to_string());
        }

        let serials = hw
            .memory_module_serials
            .iter()
            .chain(&hw.disk_serials)
            .chain(std::iter::once(&hw.bios_info.serial))
            .chain(std::iter::once(&hw.baseboard_info.serial));
        for serial in serials {
            if !shape::is_hex_serial(serial, 12) {
                return Err(format!("serial malformed: {:?}", serial));
            }
        }

        let short_ids = hw
            .usb_device_ids
            .iter()
            .chain(&hw.audio_device_ids)
            .chain(std::iter::once(&hw.gpu_info.device_id));
        for id in short_ids {
            if !shape::is_hex_serial(id, 8) {
                return Err(format!("device id malformed: {:?}", id));
            }
        }

        if self.system.hostname.is_empty() || self.system.username.is_empty() {
            return Err("hostname/username empty".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> HostSnapshot {
        HostSnapshot {
            platform: "linux".to_string(),
            arch: "x64".to_string(),
            timezone: "Europe/Berlin".to_string(),
            locale: "en-US".to_string(),
            editor_version: "1.85.2".to_string(),
            runtime_version: "v18.17.0".to_string(),
            package_manager_version: "9.6.7".to_string(),
            extension_version: "0.525.0".to_string(),
            captured_at_ms: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_derive_is_deterministic() {
        let a = IdentityProfile::derive("seed-alpha", &snapshot());
        let b = IdentityProfile::derive("seed-alpha", &snapshot());
        assert_eq!(a, b);
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_different_seeds_diverge() {
        let a = IdentityProfile::derive("seed-alpha", &snapshot());
        let b = IdentityProfile::derive("seed-beta", &snapshot());
        assert_ne!(a.identifiers.machine_id, b.identifiers.machine_id);
        assert_ne!(a.system.hostname, b.system.hostname);
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_shapes_valid() {
        let profile = IdentityProfile::derive("seed-alpha", &snapshot());
        profile.check_shapes().unwrap();
        assert!(profile.system.hostname.starts_with("DESKTOP-"));
        assert_eq!(profile.system.hostname.len(), "DESKTOP-".len() + 8);
        assert!(profile.system.username.starts_with("user-"));
        assert!(profile.hardware.baseboard_info.model.starts_with("PRIME-"));
    }

    #[test]
    fn test_host_facts_frozen() {
        let profile = IdentityProfile::derive("seed-alpha", &snapshot());
        assert_eq!(profile.system.platform, "linux");
        assert_eq!(profile.system.os_release, "5.15.0-91-generic");
        assert_eq!(profile.system.timezone, "Europe/Berlin");
        assert_eq!(profile.software.runtime, "v18.17.0");
    }

    #[test]
    fn test_synthetic_times_precede_creation() {
        let profile = IdentityProfile::derive("seed-alpha", &snapshot());
        assert!(profile.software.system_boot_time <= profile.created_at);
        assert!(profile.created_at - profile.software.system_boot_time < BOOT_WINDOW_MS);
        assert!(profile.created_at - profile.software.process_start_time < PROCESS_WINDOW_MS);
    }

    #[test]
    fn test_inodes_bounded() {
        let fs = IdentityProfile::derive("seed-alpha", &snapshot()).filesystem;
        for ino in [
            fs.home_directory_ino,
            fs.project_root_ino,
            fs.user_data_path_ino,
            fs.system_data_directory_ino,
        ] {
            assert!(ino < INODE_SPACE);
        }
    }

    #[test]
    fn test_json_uses_camel_case() {
        let profile = IdentityProfile::derive("seed-alpha", &snapshot());
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json["identifiers"]["machineId"].is_string());
        assert!(json["hardware"]["macAddresses"].is_array());
        assert!(json["filesystem"]["homeDirectoryIno"].is_u64());
    }

    #[test]
    fn test_short_id_truncates() {
        let profile = IdentityProfile::derive("seed-alpha", &snapshot());
        let short = profile.short_id();
        assert_eq!(short.len(), 11);
        assert!(profile.identifiers.machine_id.starts_with(&short[..8]));
    }
}
