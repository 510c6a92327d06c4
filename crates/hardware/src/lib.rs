//! Synthetic hardware for Mirage identities.
//!
//! A [`HardwareCatalog`] holds named, internally consistent machine
//! templates. A [`HardwareProfile`] binds one of them to an identity profile
//! (selected by hashing the machine id) and answers hardware queries with
//! template descriptors, profile-bound serials and per-call sensor jitter.

pub mod catalog;
pub mod report;
pub mod synthesizer;
pub mod template;

pub use catalog::{CatalogError, HardwareCatalog, FALLBACK_TEMPLATE};
pub use report::{
    BaseboardReport, BiosReport, ChassisReport, CpuCache, CpuReport, CpuSpeedReport,
    CpuTemperatureReport, DiskReport, DisksIoReport, MemoryModuleReport, MemoryReport,
    SystemReport,
};
pub use synthesizer::HardwareProfile;
pub use template::{
    BaseboardTemplate, BiosTemplate, ChassisTemplate, CpuTemplate, HardwareTemplate,
    MemoryModuleTemplate, MemoryTemplate,
};
