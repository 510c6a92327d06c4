//! Identity-revealing query surfaces answered from a Mirage profile.
//!
//! Hardware, OS, network and filesystem queries are resolved by name
//! through [`TelemetrySurface`]. Results are JSON values in the field
//! vocabulary system-information consumers expect.

pub mod adapter;
pub mod error;
pub mod name;
pub mod report;

pub use adapter::{TelemetrySurface, SSH_PLACEHOLDER};
pub use error::{SurfaceError, SurfaceResult};
pub use name::Surface;
pub use report::{
    AllData, NetworkInterface, OsInfo, OsSummary, ProcessSummary, ReadFileResult, StatResult,
    TimeInfo, UserInfo, UserSession, UuidInfo, UuidSummary, Versions,
};
