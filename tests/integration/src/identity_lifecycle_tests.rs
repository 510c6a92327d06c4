//! Persistence round trips and reset through the session.

use crate::test_utils::{init_test_logging, TestEnv};
use mirage_core::ProfileConfig;
use mirage_identity::{synth::shape, HostSnapshot, IdentityProfile, IdentityStore};
use serde_json::Value;

#[test]
fn test_profile_survives_restart() {
    init_test_logging();
    let env = TestEnv::new();

    let first = env.session().get_profile();
    let second = env.session().get_profile();

    assert_eq!(*first, *second);
    assert_eq!(first.fingerprint(), second.fingerprint());
}

#[test]
fn test_save_then_load_has_no_drift() {
    let env = TestEnv::new();
    let host = HostSnapshot::capture(&ProfileConfig::default());
    let profile = IdentityProfile::derive("round-trip-seed", &host);

    let store = IdentityStore::new(env.profile_path());
    store.save(&profile).unwrap();

    let mut reopened = IdentityStore::new(env.profile_path());
    let loaded = reopened.load_or_create(&host);
    assert_eq!(loaded, profile);
}

#[test]
fn test_corrupt_file_regenerates() {
    let env = TestEnv::new();
    std::fs::create_dir_all(env.profile_path().parent().unwrap()).unwrap();
    std::fs::write(env.profile_path(), "{ not json").unwrap();

    let session = env.session();
    let profile = session.get_profile();
    assert!(profile.check_shapes().is_ok());

    let raw = std::fs::read_to_string(env.profile_path()).unwrap();
    let persisted: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(persisted["seed"], Value::String(profile.seed.clone()));
}

#[test]
fn test_reset_changes_every_identity_value() {
    let env = TestEnv::new();
    let mut session = env.session();
    let before = session.get_profile();

    let after = session.reset_identity();

    assert_ne!(after.identifiers.machine_id, before.identifiers.machine_id);
    assert_ne!(after.system.hostname, before.system.hostname);
    assert_ne!(after.hardware.bios_info.serial, before.hardware.bios_info.serial);
    assert_ne!(after.hardware.baseboard_info.serial, before.hardware.baseboard_info.serial);
    assert_ne!(after.hardware.disk_serials, before.hardware.disk_serials);
    assert_ne!(after.hardware.memory_module_serials, before.hardware.memory_module_serials);
    assert_ne!(after.hardware.mac_addresses, before.hardware.mac_addresses);

    // The reset profile is what the next session loads.
    drop(session);
    assert_eq!(*env.session().get_profile(), *after);
}

#[test]
fn test_reset_profile_keeps_shapes() {
    let env = TestEnv::new();
    let mut session = env.session();
    let profile = session.reset_identity();

    assert!(profile.check_shapes().is_ok());
    assert!(shape::is_uuid_v4(&profile.identifiers.machine_id));
    assert!(profile.hardware.mac_addresses.iter().all(|m| shape::is_mac(m)));
}
