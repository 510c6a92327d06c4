//! Surface names.

use crate::error::SurfaceError;
use std::fmt;
use std::str::FromStr;

/// Every identity-revealing query the adapter answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    System,
    Bios,
    Baseboard,
    Chassis,
    Cpu,
    CpuFlags,
    CpuCache,
    CpuCurrentSpeed,
    CpuTemperature,
    Mem,
    MemLayout,
    DiskLayout,
    BlockDevices,
    DisksIo,
    NetworkInterfaces,
    OsInfo,
    Uuid,
    Versions,
    Users,
    Processes,
    Services,
    Time,
    GetAllData,
    Hostname,
    UserInfo,
    Stat,
    ReadFile,
}

impl Surface {
    pub const ALL: [Surface; 27] = [
        Surface::System,
        Surface::Bios,
        Surface::Baseboard,
        Surface::Chassis,
        Surface::Cpu,
        Surface::CpuFlags,
        Surface::CpuCache,
        Surface::CpuCurrentSpeed,
        Surface::CpuTemperature,
        Surface::Mem,
        Surface::MemLayout,
        Surface::DiskLayout,
        Surface::BlockDevices,
        Surface::DisksIo,
        Surface::NetworkInterfaces,
        Surface::OsInfo,
        Surface::Uuid,
        Surface::Versions,
        Surface::Users,
        Surface::Processes,
        Surface::Services,
        Surface::Time,
        Surface::GetAllData,
        Surface::Hostname,
        Surface::UserInfo,
        Surface::Stat,
        Surface::ReadFile,
    ];

    /// Name as callers spell it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Surface::System => "system",
            Surface::Bios => "bios",
            Surface::Baseboard => "baseboard",
            Surface::Chassis => "chassis",
            Surface::Cpu => "cpu",
            Surface::CpuFlags => "cpuFlags",
            Surface::CpuCache => "cpuCache",
            Surface::CpuCurrentSpeed => "cpuCurrentSpeed",
            Surface::CpuTemperature => "cpuTemperature",
            Surface::Mem => "mem",
            Surface::MemLayout => "memLayout",
            Surface::DiskLayout => "diskLayout",
            Surface::BlockDevices => "blockDevices",
            Surface::DisksIo => "disksIO",
            Surface::NetworkInterfaces => "networkInterfaces",
            Surface::OsInfo => "osInfo",
            Surface::Uuid => "uuid",
            Surface::Versions => "versions",
            Surface::Users => "users",
            Surface::Processes => "processes",
            Surface::Services => "services",
            Surface::Time => "time",
            Surface::GetAllData => "getAllData",
            Surface::Hostname => "hostname",
            Surface::UserInfo => "userInfo",
            Surface::Stat => "stat",
            Surface::ReadFile => "readFile",
        }
    }

    /// Results that vary between calls even for one profile.
    pub fn is_jittered(&self) -> bool {
        matches!(
            self,
            Surface::CpuTemperature
                | Surface::Mem
                | Surface::DiskLayout
                | Surface::BlockDevices
                | Surface::DisksIo
                | Surface::NetworkInterfaces
                | Surface::Users
                | Surface::Processes
                | Surface::Time
                | Surface::GetAllData
        )
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Surface {
    type Err = SurfaceError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Surface::ALL
            .iter()
            .copied()
            .find(|surface| surface.as_str() == name)
            .ok_or_else(|| SurfaceError::UnknownSurface(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for surface in Surface::ALL {
            assert_eq!(surface.as_str().parse::<Surface>().unwrap(), surface);
        }
    }

    #[test]
    fn test_names_are_case_sensitive() {
        assert!("disksIO".parse::<Surface>().is_ok());
        assert!(matches!(
            "disksio".parse::<Surface>(),
            Err(SurfaceError::UnknownSurface(_))
        ));
        assert!("CPU".parse::<Surface>().is_err());
    }
}
