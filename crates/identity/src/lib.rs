//! Synthetic machine identity for the Mirage system.
//!
//! This crate derives a self-consistent bundle of synthetic identifiers
//! (UUIDs, hostname, username, hardware serials, MAC addresses, inode
//! numbers) from a single root seed and manages its persisted lifecycle.
//!
//! # Core Concepts
//!
//! - **Seed**: opaque root string minted once per installation
//! - **Derivation**: every field is a pure function of `(seed, discriminator)`
//! - **Profile**: the frozen result, identical across restarts
//! - **Store**: load-or-create, save and reset of the one persisted profile
//!
//! # Guarantees
//!
//! - Same seed and host snapshot give a field-for-field identical profile
//! - Every identifier matches the syntactic shape of the value it stands in for
//! - Persistence failures never escape the store lifecycle

pub mod environment;
pub mod error;
pub mod profile;
pub mod store;
pub mod synth;

pub use environment::{HostSnapshot, RealIdentity};
pub use error::{IdentityError, IdentityResult};
pub use profile::{
    BaseboardIds, BiosIds, FieldCounts, FilesystemInfo, GpuIds, HardwareIds, IdentityProfile,
    Identifiers, SoftwareInfo, SystemInfo,
};
pub use store::IdentityStore;
pub use synth::{derive, generate_seed, rolling_hash, DerivedValue};
