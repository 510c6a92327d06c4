//! Hardware profile synthesizer.
//!
//! Binds one catalog template to an identity profile and answers the
//! per-subsystem hardware queries. Identity-bound fields (serials, UUIDs)
//! come from the profile or from `derive(machine_id, ..)` and never change
//! between calls. Inherently dynamic readings (memory usage, temperatures,
//! I/O counters) are jittered from a thread RNG on every call; deriving them
//! from the seed would make the readings themselves a stable fingerprint.

use crate::catalog::HardwareCatalog;
use crate::report::*;
use crate::template::HardwareTemplate;
use mirage_identity::{derive, IdentityProfile};
use rand::Rng;
use std::sync::Arc;
use tracing::info;

const MAX_CPU_TEMPERATURE: u32 = 85;

/// A template bound to one identity profile for that profile's lifetime.
#[derive(Debug, Clone)]
pub struct HardwareProfile {
    profile: Arc<IdentityProfile>,
    template_name: String,
    template: HardwareTemplate,
}

impl HardwareProfile {
    /// Select the template for `profile` from `catalog` and bind it.
    pub fn bind(profile: Arc<IdentityProfile>, catalog: &HardwareCatalog) -> Self {
        let (name, template) = catalog.select(&profile.identifiers.machine_id);
        info!(
            identity = %profile.short_id(),
            template = name,
            "Hardware template bound"
        );
        Self {
            template_name: name.to_string(),
            template: template.clone(),
            profile,
        }
    }

    pub fn template_name(&self) -> &str {
        &self.template_name
    }

    pub fn template(&self) -> &HardwareTemplate {
        &self.template
    }

    pub fn profile(&self) -> &Arc<IdentityProfile> {
        &self.profile
    }

    /// Serial stable for this profile, keyed by a component name.
    fn component_serial(&self, component: &str) -> String {
        derive(&self.profile.identifiers.machine_id, component).hex_serial(12)
    }

    pub fn system(&self) -> SystemReport {
        let board = &self.template.baseboard;
        let machine_id = &self.profile.identifiers.machine_id;
        SystemReport {
            manufacturer: board.manufacturer.clone(),
            model: board.model.clone(),
            version: board.version.clone(),
            serial: self.profile.hardware.baseboard_info.serial.clone(),
            uuid: machine_id.clone(),
            sku: format!("SKU-{}", &machine_id[..machine_id.len().min(8)]),
            family: self.template.chassis.kind.clone(),
            is_virtual: false,
            virtual_host: String::new(),
        }
    }

    pub fn bios(&self) -> BiosReport {
        let bios = &self.template.bios;
        BiosReport {
            vendor: bios.vendor.clone(),
            version: bios.version.clone(),
            release_date: bios.release_date.clone(),
            revision: bios.revision.clone(),
            serial: self.profile.hardware.bios_info.serial.clone(),
        }
    }

    pub fn baseboard(&self) -> BaseboardReport {
        let board = &self.template.baseboard;
        BaseboardReport {
            manufacturer: board.manufacturer.clone(),
            model: board.model.clone(),
            version: board.version.clone(),
            serial: self.profile.hardware.baseboard_info.serial.clone(),
            asset_tag: board.asset_tag.clone(),
        }
    }

    pub fn chassis(&self) -> ChassisReport {
        let chassis = &self.template.chassis;
        ChassisReport {
            manufacturer: chassis.manufacturer.clone(),
            model: chassis.model.clone(),
            kind: chassis.kind.clone(),
            version: chassis.version.clone(),
            serial: self.component_serial("chassis"),
            asset_tag: chassis.asset_tag.clone(),
        }
    }

    pub fn cpu(&self) -> CpuReport {
        let cpu = &self.template.cpu;
        let speed = self.cpu_current_speed();
        CpuReport {
            manufacturer: cpu.manufacturer.clone(),
            brand: cpu.brand.clone(),
            vendor: cpu.manufacturer.clone(),
            family: cpu.family.clone(),
            model: cpu.model.clone(),
            stepping: cpu.stepping.clone(),
            revision: cpu.revision.clone(),
            voltage: cpu.voltage.clone(),
            speed: speed.avg,
            speed_min: speed.min,
            speed_max: speed.max,
            governor: "performance".to_string(),
            cores: cpu.cores,
            physical_cores: cpu.physical_cores,
            processors: cpu.processors,
            socket: cpu.socket.clone(),
            flags: cpu.flags.clone(),
            virtualization: true,
            cache: CpuCache::default(),
        }
    }

    pub fn cpu_flags(&self) -> String {
        self.template.cpu.flags.clone()
    }

    pub fn cpu_cache(&self) -> CpuCache {
        CpuCache::default()
    }

    /// Nominal clock speeds. Missing bounds collapse onto the base speed.
    pub fn cpu_current_speed(&self) -> CpuSpeedReport {
        let cpu = &self.template.cpu;
        let or_base = |v: f64| if v > 0.0 { v } else { cpu.speed };
        CpuSpeedReport {
            avg: cpu.speed,
            min: or_base(cpu.speed_min),
            max: or_base(cpu.speed_max),
        }
    }

    pub fn cpu_temperature(&self) -> CpuTemperatureReport {
        let mut rng = rand::thread_rng();
        CpuTemperatureReport {
            main: rng.gen_range(45..65),
            cores: (0..self.template.cpu.cores)
                .map(|_| rng.gen_range(40..65))
                .collect(),
            max: MAX_CPU_TEMPERATURE,
        }
    }

    pub fn memory(&self) -> MemoryReport {
        let total = self.template.memory.total;
        let load: f64 = rand::thread_rng().gen_range(0.3..0.7);
        let used = (total as f64 * load) as u64;
        let share = |fraction: f64| (used as f64 * fraction) as u64;
        MemoryReport {
            total,
            free: total - used,
            used,
            active: used,
            available: total - used,
            buffers: share(0.1),
            cached: share(0.2),
            slab: share(0.05),
            buffcache: share(0.3),
            swaptotal: total,
            swapused: 0,
            swapfree: total,
        }
    }

    pub fn memory_layout(&self) -> Vec<MemoryModuleReport> {
        self.template
            .memory
            .modules
            .iter()
            .enumerate()
            .map(|(index, module)| {
                let derived = self.component_serial(&format!("mem{}", index));
                let serial_num = self
                    .profile
                    .hardware
                    .memory_module_serials
                    .get(index)
                    .cloned()
                    .unwrap_or_else(|| derived.clone());
                MemoryModuleReport {
                    size: module.size,
                    bank: format!("BANK {}", index),
                    kind: module.kind.clone(),
                    clock_speed: module.clock_speed,
                    form_factor: "DIMM".to_string(),
                    manufacturer: module.manufacturer.clone(),
                    part_num: format!("{}-{}", module.manufacturer, derived),
                    serial_num,
                    voltage_configured: 1.2,
                    voltage_min: 1.2,
                    voltage_max: 1.2,
                }
            })
            .collect()
    }

    pub fn disk_layout(&self) -> Vec<DiskReport> {
        let serial_num = self
            .profile
            .hardware
            .disk_serials
            .first()
            .cloned()
            .unwrap_or_else(|| self.component_serial("disk0"));
        vec![DiskReport {
            device: "/dev/sda".to_string(),
            kind: "SSD".to_string(),
            name: "Samsung SSD 980 PRO 1TB".to_string(),
            vendor: "Samsung".to_string(),
            size: 1_000_204_886_016,
            bytes_per_sector: 512,
            total_cylinders: 121_601,
            total_heads: 255,
            total_sectors: 1_953_525_168,
            total_tracks: 31_008_255,
            tracks_per_cylinder: 255,
            sectors_per_track: 63,
            firmware_revision: "5B2QGXA7".to_string(),
            serial_num,
            interface_type: "NVMe".to_string(),
            smart_status: "Ok".to_string(),
            temperature: rand::thread_rng().gen_range(35..55),
        }]
    }

    pub fn disks_io(&self) -> DisksIoReport {
        let mut rng = rand::thread_rng();
        DisksIoReport {
            r_io: rng.gen_range(0..1000),
            w_io: rng.gen_range(0..1000),
            t_io: rng.gen_range(0..2000),
            r_io_sec: rng.gen_range(0..100),
            w_io_sec: rng.gen_range(0..100),
            t_io_sec: rng.gen_range(0..200),
        }
    }
}
