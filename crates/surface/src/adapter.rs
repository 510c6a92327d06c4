//! Telemetry surface adapter.
//!
//! Answers `query(surface, args)` from the bound identity and hardware
//! profiles. The host decides where these calls come from; nothing here
//! assumes how interception is installed.
//!
//! Three calling conventions share one computation:
//!
//! - [`TelemetrySurface::query`] returns the value directly
//! - [`TelemetrySurface::query_with_callback`] computes now and delivers
//!   from a spawned task, never inline on the caller's stack
//! - [`TelemetrySurface::query_deferred`] returns an already-resolved future

use crate::error::{SurfaceError, SurfaceResult};
use crate::name::Surface;
use crate::report::*;
use chrono::{SecondsFormat, Utc};
use mirage_hardware::HardwareProfile;
use mirage_identity::{IdentityProfile, RealIdentity};
use mirage_policy::Substitutions;
use rand::Rng;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::future::Ready;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Body served in place of SSH key material.
pub const SSH_PLACEHOLDER: &str = "# Fake SSH file\n";

const SSH_MARKERS: [&str; 3] = [".ssh", "known_hosts", "id_rsa"];

const TOOL_VERSIONS: [(&str, &str); 32] = [
    ("openssl", "1.1.1f"),
    ("systemOpenssl", "1.1.1f"),
    ("systemOpensslLib", "OpenSSL 1.1.1f"),
    ("v8", "9.4.146.24-node.20"),
    ("yarn", "1.22.19"),
    ("pm2", "5.2.2"),
    ("gulp", "4.0.2"),
    ("grunt", "1.5.3"),
    ("git", "2.34.1"),
    ("tsc", "4.9.4"),
    ("mysql", "8.0.32"),
    ("redis", "6.2.6"),
    ("mongodb", "5.0.15"),
    ("apache", "2.4.52"),
    ("nginx", "1.18.0"),
    ("php", "8.1.2"),
    ("docker", "20.10.21"),
    ("postfix", "3.6.4"),
    ("postgresql", "14.6"),
    ("perl", "5.34.0"),
    ("python", "3.10.6"),
    ("python3", "3.10.6"),
    ("pip", "22.0.2"),
    ("pip3", "22.0.2"),
    ("java", "11.0.17"),
    ("gcc", "11.3.0"),
    ("virtualbox", "6.1.38"),
    ("bash", "5.1.16"),
    ("zsh", "5.8.1"),
    ("fish", "3.3.1"),
    ("powershell", "7.2.8"),
    ("dotnet", "6.0.404"),
];

/// Query answerer bound to one identity profile.
#[derive(Debug, Clone)]
pub struct TelemetrySurface {
    profile: Arc<IdentityProfile>,
    hardware: Arc<HardwareProfile>,
    real: RealIdentity,
    substitutions: Substitutions,
}

impl TelemetrySurface {
    pub fn new(hardware: Arc<HardwareProfile>, real: RealIdentity) -> Self {
        let profile = hardware.profile().clone();
        let substitutions = Substitutions::new(&real, &profile);
        Self {
            profile,
            hardware,
            real,
            substitutions,
        }
    }

    pub fn profile(&self) -> &Arc<IdentityProfile> {
        &self.profile
    }

    pub fn hardware(&self) -> &Arc<HardwareProfile> {
        &self.hardware
    }

    /// Answer one surface query by name.
    pub fn query(&self, name: &str, args: &Value) -> SurfaceResult<Value> {
        let surface: Surface = name.parse()?;
        debug!(surface = %surface, "Surface query");
        self.query_surface(surface, args)
    }

    pub fn query_surface(&self, surface: Surface, args: &Value) -> SurfaceResult<Value> {
        let hw = &self.hardware;
        match surface {
            Surface::System => to_value(hw.system()),
            Surface::Bios => to_value(hw.bios()),
            Surface::Baseboard => to_value(hw.baseboard()),
            Surface::Chassis => to_value(hw.chassis()),
            Surface::Cpu => to_value(hw.cpu()),
            Surface::CpuFlags => Ok(Value::String(hw.cpu_flags())),
            Surface::CpuCache => to_value(hw.cpu_cache()),
            Surface::CpuCurrentSpeed => to_value(hw.cpu_current_speed()),
            Surface::CpuTemperature => to_value(hw.cpu_temperature()),
            Surface::Mem => to_value(hw.memory()),
            Surface::MemLayout => to_value(hw.memory_layout()),
            Surface::DiskLayout | Surface::BlockDevices => to_value(hw.disk_layout()),
            Surface::DisksIo => to_value(hw.disks_io()),
            Surface::NetworkInterfaces => to_value(self.network_interfaces()),
            Surface::OsInfo => to_value(self.os_info()),
            Surface::Uuid => to_value(self.uuid()),
            Surface::Versions => to_value(self.versions()),
            Surface::Users => to_value(self.users()),
            Surface::Processes => to_value(self.processes()),
            Surface::Services => Ok(Value::Array(Vec::new())),
            Surface::Time => to_value(self.time()),
            Surface::GetAllData => to_value(self.all_data()),
            Surface::Hostname => Ok(Value::String(self.hostname())),
            Surface::UserInfo => to_value(self.user_info(args)),
            Surface::Stat => to_value(self.stat(args)?),
            Surface::ReadFile => to_value(self.read_file(args)?),
        }
    }

    /// Compute now, deliver later. The callback runs on a spawned task, never
    /// inline on the caller's stack. On a current-thread runtime that means
    /// it runs after this call returns and the calling task yields. On a
    /// multi-thread runtime another worker may pick the task up while this
    /// call is still returning, so callers there must not rely on ordering
    /// beyond "not inline".
    pub fn query_with_callback<F>(
        &self,
        name: &str,
        args: &Value,
        callback: F,
    ) -> SurfaceResult<JoinHandle<()>>
    where
        F: FnOnce(SurfaceResult<Value>) + Send + 'static,
    {
        let handle =
            tokio::runtime::Handle::try_current().map_err(|_| SurfaceError::NoRuntime)?;
        let result = self.query(name, args);
        Ok(handle.spawn(async move {
            tokio::task::yield_now().await;
            callback(result);
        }))
    }

    /// Pre-resolved future for async callers.
    pub fn query_deferred(&self, name: &str, args: &Value) -> Ready<SurfaceResult<Value>> {
        std::future::ready(self.query(name, args))
    }

    pub fn hostname(&self) -> String {
        self.profile.system.hostname.clone()
    }

    pub fn network_interfaces(&self) -> Vec<NetworkInterface> {
        let mut rng = rand::thread_rng();
        let ip4 = format!("192.168.1.{}", rng.gen_range(100..150));
        let ip6 = format!(
            "fe80::{:04x}:{:04x}",
            rng.gen::<u16>(),
            rng.gen::<u16>()
        );
        let mac = self
            .profile
            .hardware
            .mac_addresses
            .first()
            .cloned()
            .unwrap_or_default();

        vec![NetworkInterface {
            iface: "Ethernet".to_string(),
            iface_name: "Ethernet".to_string(),
            ip4,
            ip4subnet: "255.255.255.0".to_string(),
            ip6,
            mac,
            internal: false,
            is_virtual: false,
            operstate: "up".to_string(),
            kind: "wired".to_string(),
            duplex: "full".to_string(),
            mtu: 1500,
            speed: 1000,
            dhcp: true,
            dns_suffix: "local".to_string(),
            ieee8021x_auth: "Not required".to_string(),
            ieee8021x_state: "Not required".to_string(),
        }]
    }

    pub fn os_info(&self) -> OsInfo {
        let system = &self.profile.system;
        let distro = match system.platform.as_str() {
            "win32" => "Windows 10",
            "darwin" => "macOS",
            _ => "Ubuntu",
        };
        OsInfo {
            platform: system.platform.clone(),
            distro: distro.to_string(),
            release: system.os_release.clone(),
            codename: String::new(),
            kernel: system.kernel_version.clone(),
            arch: system.arch.clone(),
            hostname: system.hostname.clone(),
            fqdn: format!("{}.local", system.hostname),
            codepage: "UTF-8".to_string(),
            logofile: String::new(),
            serial: self.profile.identifiers.os_machine_id.clone(),
            build: system.os_release.clone(),
            servicepack: String::new(),
        }
    }

    pub fn uuid(&self) -> UuidInfo {
        UuidInfo {
            os: self.profile.identifiers.os_machine_id.clone(),
            hardware: self.profile.identifiers.machine_id.clone(),
            macs: self.profile.hardware.mac_addresses.clone(),
        }
    }

    pub fn versions(&self) -> Versions {
        Versions {
            kernel: self.profile.system.kernel_version.clone(),
            node: self.profile.software.runtime.clone(),
            npm: self.profile.software.package_manager.clone(),
            tools: TOOL_VERSIONS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    pub fn users(&self) -> Vec<UserSession> {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let command = match self.profile.system.platform.as_str() {
            "win32" => "explorer.exe",
            "darwin" => "loginwindow",
            _ => "gnome-session",
        };
        vec![UserSession {
            user: self.profile.system.username.clone(),
            tty: "console".to_string(),
            date: now.clone(),
            time: now,
            ip: String::new(),
            command: command.to_string(),
        }]
    }

    pub fn processes(&self) -> ProcessSummary {
        let mut rng = rand::thread_rng();
        ProcessSummary {
            all: rng.gen_range(100..300),
            running: rng.gen_range(20..70),
            blocked: 0,
            sleeping: rng.gen_range(80..230),
            unknown: 0,
            list: Vec::new(),
        }
    }

    pub fn time(&self) -> TimeInfo {
        let current = mirage_core::now_ms();
        let boot = self.profile.software.system_boot_time;
        TimeInfo {
            current,
            uptime: current.saturating_sub(boot) / 1000,
            timezone: self.profile.system.timezone.clone(),
            timezone_name: self.profile.system.timezone.clone(),
        }
    }

    pub fn all_data(&self) -> AllData {
        let hw = &self.hardware;
        let system = &self.profile.system;
        AllData {
            system: hw.system(),
            bios: hw.bios(),
            baseboard: hw.baseboard(),
            chassis: hw.chassis(),
            cpu: hw.cpu(),
            mem: hw.memory(),
            mem_layout: hw.memory_layout(),
            disk_layout: hw.disk_layout(),
            os_info: OsSummary {
                platform: system.platform.clone(),
                hostname: system.hostname.clone(),
                arch: system.arch.clone(),
            },
            uuid: UuidSummary {
                os: self.profile.identifiers.os_machine_id.clone(),
                hardware: self.profile.identifiers.machine_id.clone(),
            },
        }
    }

    /// Real user info with the username and home directory swapped for the
    /// profile's. The home directory goes through the same whole-token
    /// substitution as outbound requests. `uid`, `gid` and `shell` pass
    /// through from `args`.
    pub fn user_info(&self, args: &Value) -> UserInfo {
        let username = self.profile.system.username.clone();
        let homedir = if self.real.home_dir.is_empty() {
            self.default_home(&username)
        } else {
            self.substitutions.apply(&self.real.home_dir).0
        };

        UserInfo {
            username,
            homedir,
            uid: args.get("uid").and_then(Value::as_i64),
            gid: args.get("gid").and_then(Value::as_i64),
            shell: args.get("shell").and_then(Value::as_str).map(str::to_string),
        }
    }

    fn default_home(&self, username: &str) -> String {
        match self.profile.system.platform.as_str() {
            "win32" => format!("C:\\Users\\{}", username),
            "darwin" => format!("/Users/{}", username),
            _ => format!("/home/{}", username),
        }
    }

    /// Replace the inode of well-known directories with the profile value.
    pub fn stat(&self, args: &Value) -> SurfaceResult<StatResult> {
        let path = required_path(Surface::Stat, args)?;
        let fs = &self.profile.filesystem;

        let synthetic = if path.contains("home") || path.contains("Users") {
            Some(fs.home_directory_ino)
        } else if path.contains("userData") {
            Some(fs.user_data_path_ino)
        } else if path.contains("project") || path.contains("workspace") {
            Some(fs.project_root_ino)
        } else {
            None
        };

        Ok(match synthetic {
            Some(ino) => StatResult {
                path,
                ino: Some(ino),
                replaced: true,
            },
            None => StatResult {
                ino: args.get("ino").and_then(Value::as_u64),
                path,
                replaced: false,
            },
        })
    }

    /// SSH material is never read; everything else is left to the host.
    pub fn read_file(&self, args: &Value) -> SurfaceResult<ReadFileResult> {
        let path = required_path(Surface::ReadFile, args)?;
        if SSH_MARKERS.iter().any(|marker| path.contains(marker)) {
            info!("SSH file access intercepted");
            return Ok(ReadFileResult {
                path,
                intercepted: true,
                content: Some(SSH_PLACEHOLDER.to_string()),
            });
        }
        Ok(ReadFileResult {
            path,
            intercepted: false,
            content: None,
        })
    }
}

fn to_value<T: Serialize>(value: T) -> SurfaceResult<Value> {
    Ok(serde_json::to_value(value)?)
}

fn required_path(surface: Surface, args: &Value) -> SurfaceResult<String> {
    args.get("path")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| SurfaceError::InvalidArguments {
            surface: surface.as_str(),
            reason: "missing string field `path`".to_string(),
        })
}
