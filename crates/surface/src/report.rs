//! Result shapes for the OS, network and filesystem surfaces. Hardware
//! shapes live in `mirage_hardware::report`.

use mirage_hardware::{
    BaseboardReport, BiosReport, ChassisReport, CpuReport, DiskReport, MemoryModuleReport,
    MemoryReport, SystemReport,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterface {
    pub iface: String,
    pub iface_name: String,
    pub ip4: String,
    pub ip4subnet: String,
    pub ip6: String,
    pub mac: String,
    pub internal: bool,
    #[serde(rename = "virtual")]
    pub is_virtual: bool,
    pub operstate: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub duplex: String,
    pub mtu: u32,
    pub speed: u32,
    pub dhcp: bool,
    pub dns_suffix: String,
    pub ieee8021x_auth: String,
    pub ieee8021x_state: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OsInfo {
    pub platform: String,
    pub distro: String,
    pub release: String,
    pub codename: String,
    pub kernel: String,
    pub arch: String,
    pub hostname: String,
    pub fqdn: String,
    pub codepage: String,
    pub logofile: String,
    pub serial: String,
    pub build: String,
    pub servicepack: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UuidInfo {
    pub os: String,
    pub hardware: String,
    pub macs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Versions {
    pub kernel: String,
    pub node: String,
    pub npm: String,
    /// Tool versions that carry no identity.
    #[serde(flatten)]
    pub tools: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub user: String,
    pub tty: String,
    pub date: String,
    pub time: String,
    pub ip: String,
    pub command: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSummary {
    pub all: u32,
    pub running: u32,
    pub blocked: u32,
    pub sleeping: u32,
    pub unknown: u32,
    pub list: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeInfo {
    /// Unix milliseconds.
    pub current: u64,
    /// Seconds since the profile's boot time.
    pub uptime: u64,
    pub timezone: String,
    pub timezone_name: String,
}

/// Reduced OS block used inside [`AllData`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsSummary {
    pub platform: String,
    pub hostname: String,
    pub arch: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UuidSummary {
    pub os: String,
    pub hardware: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllData {
    pub system: SystemReport,
    pub bios: BiosReport,
    pub baseboard: BaseboardReport,
    pub chassis: ChassisReport,
    pub cpu: CpuReport,
    pub mem: MemoryReport,
    pub mem_layout: Vec<MemoryModuleReport>,
    pub disk_layout: Vec<DiskReport>,
    pub os_info: OsSummary,
    pub uuid: UuidSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub username: String,
    pub homedir: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gid: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shell: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatResult {
    pub path: String,
    pub ino: Option<u64>,
    /// Whether `ino` was replaced with a profile value.
    pub replaced: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadFileResult {
    pub path: String,
    /// When false the host performs the real read.
    pub intercepted: bool,
    pub content: Option<String>,
}
