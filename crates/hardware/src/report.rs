//! Sensor-shaped results returned by the hardware profile.
//!
//! Field names follow the vocabulary consumers of system-information
//! queries already expect, hence the camelCase and the few odd renames.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemReport {
    pub manufacturer: String,
    pub model: String,
    pub version: String,
    pub serial: String,
    pub uuid: String,
    pub sku: String,
    pub family: String,
    #[serde(rename = "virtual")]
    pub is_virtual: bool,
    pub virtual_host: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiosReport {
    pub vendor: String,
    pub version: String,
    pub release_date: String,
    pub revision: String,
    pub serial: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseboardReport {
    pub manufacturer: String,
    pub model: String,
    pub version: String,
    pub serial: String,
    pub asset_tag: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChassisReport {
    pub manufacturer: String,
    pub model: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub version: String,
    pub serial: String,
    pub asset_tag: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuCache {
    pub l1d: u64,
    pub l1i: u64,
    pub l2: u64,
    pub l3: u64,
}

impl Default for CpuCache {
    fn default() -> Self {
        Self {
            l1d: 32_768,
            l1i: 32_768,
            l2: 262_144,
            l3: 16_777_216,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuReport {
    pub manufacturer: String,
    pub brand: String,
    pub vendor: String,
    pub family: String,
    pub model: String,
    pub stepping: String,
    pub revision: String,
    pub voltage: String,
    pub speed: f64,
    pub speed_min: f64,
    pub speed_max: f64,
    pub governor: String,
    pub cores: u32,
    pub physical_cores: u32,
    pub processors: u32,
    pub socket: String,
    pub flags: String,
    pub virtualization: bool,
    pub cache: CpuCache,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CpuSpeedReport {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuTemperatureReport {
    pub main: u32,
    pub cores: Vec<u32>,
    pub max: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryReport {
    pub total: u64,
    pub free: u64,
    pub used: u64,
    pub active: u64,
    pub available: u64,
    pub buffers: u64,
    pub cached: u64,
    pub slab: u64,
    pub buffcache: u64,
    pub swaptotal: u64,
    pub swapused: u64,
    pub swapfree: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryModuleReport {
    pub size: u64,
    pub bank: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub clock_speed: u32,
    pub form_factor: String,
    pub manufacturer: String,
    pub part_num: String,
    pub serial_num: String,
    pub voltage_configured: f64,
    pub voltage_min: f64,
    pub voltage_max: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskReport {
    pub device: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub vendor: String,
    pub size: u64,
    pub bytes_per_sector: u32,
    pub total_cylinders: u64,
    pub total_heads: u32,
    pub total_sectors: u64,
    pub total_tracks: u64,
    pub tracks_per_cylinder: u32,
    pub sectors_per_track: u32,
    pub firmware_revision: String,
    pub serial_num: String,
    pub interface_type: String,
    pub smart_status: String,
    pub temperature: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisksIoReport {
    #[serde(rename = "rIO")]
    pub r_io: u64,
    #[serde(rename = "wIO")]
    pub w_io: u64,
    #[serde(rename = "tIO")]
    pub t_io: u64,
    #[serde(rename = "rIO_sec")]
    pub r_io_sec: u64,
    #[serde(rename = "wIO_sec")]
    pub w_io_sec: u64,
    #[serde(rename = "tIO_sec")]
    pub t_io_sec: u64,
}
