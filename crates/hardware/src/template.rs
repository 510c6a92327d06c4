//! Hardware template descriptors.
//!
//! A template is one internally consistent machine: the CPU, firmware,
//! board, chassis and memory that would plausibly ship together. Every
//! field defaults so a partial catalog entry still loads.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HardwareTemplate {
    pub cpu: CpuTemplate,
    pub bios: BiosTemplate,
    pub baseboard: BaseboardTemplate,
    pub chassis: ChassisTemplate,
    pub memory: MemoryTemplate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CpuTemplate {
    pub manufacturer: String,
    pub brand: String,
    pub family: String,
    pub model: String,
    pub stepping: String,
    pub revision: String,
    pub voltage: String,
    /// GHz
    pub speed: f64,
    pub speed_min: f64,
    pub speed_max: f64,
    pub cores: u32,
    pub physical_cores: u32,
    pub processors: u32,
    pub socket: String,
    /// Space-separated capability flags.
    pub flags: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BiosTemplate {
    pub vendor: String,
    pub version: String,
    pub release_date: String,
    pub revision: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BaseboardTemplate {
    pub manufacturer: String,
    pub model: String,
    pub version: String,
    pub asset_tag: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChassisTemplate {
    pub manufacturer: String,
    pub model: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub version: String,
    pub asset_tag: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MemoryTemplate {
    /// Bytes
    pub total: u64,
    pub modules: Vec<MemoryModuleTemplate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MemoryModuleTemplate {
    /// Bytes
    pub size: u64,
    #[serde(rename = "type")]
    pub kind: String,
    /// MHz
    pub clock_speed: u32,
    pub manufacturer: String,
}

impl HardwareTemplate {
    /// Minimal template used when no catalog document is available.
    pub fn fallback() -> Self {
        const EIGHT_GIB: u64 = 8_589_934_592;
        Self {
            cpu: CpuTemplate {
                manufacturer: "Intel".to_string(),
                brand: "Core i5".to_string(),
                cores: 4,
                physical_cores: 4,
                processors: 1,
                speed: 2.5,
                ..CpuTemplate::default()
            },
            bios: BiosTemplate {
                vendor: "Default BIOS Vendor".to_string(),
                ..BiosTemplate::default()
            },
            baseboard: BaseboardTemplate {
                manufacturer: "Default Board Manufacturer".to_string(),
                ..BaseboardTemplate::default()
            },
            chassis: ChassisTemplate {
                kind: "Desktop".to_string(),
                ..ChassisTemplate::default()
            },
            memory: MemoryTemplate {
                total: EIGHT_GIB,
                modules: vec![MemoryModuleTemplate {
                    size: EIGHT_GIB,
                    kind: "DDR4".to_string(),
                    ..MemoryModuleTemplate::default()
                }],
            },
        }
    }
}
