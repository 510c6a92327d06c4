//! Integration tests for the identity lifecycle.
//!
//! These tests validate the persisted identity across simulated restarts:
//! - First run creates and persists a profile
//! - Later runs load it unchanged
//! - Reset replaces every synthetic field and re-persists

use mirage_core::ProfileConfig;
use mirage_identity::synth::shape;
use mirage_identity::{HostSnapshot, IdentityProfile, IdentityStore};

fn host() -> HostSnapshot {
    HostSnapshot::capture(&ProfileConfig::default())
}

#[test]
fn test_profile_survives_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("identity-profile.json");

    let first = IdentityStore::new(&path).load_or_create(&host());
    for _ in 0..3 {
        let again = IdentityStore::new(&path).load_or_create(&host());
        assert_eq!(first, again);
    }
}

#[test]
fn test_persisted_seed_rederives_same_profile() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("identity-profile.json");

    let profile = IdentityStore::new(&path).load_or_create(&host());

    // The frozen host facts plus the seed reproduce every field.
    let frozen = HostSnapshot {
        platform: profile.system.platform.clone(),
        arch: profile.system.arch.clone(),
        timezone: profile.system.timezone.clone(),
        locale: profile.system.locale.clone(),
        editor_version: profile.software.editor.clone(),
        runtime_version: profile.software.runtime.clone(),
        package_manager_version: profile.software.package_manager.clone(),
        extension_version: profile.software.extension_version.clone(),
        captured_at_ms: profile.created_at,
    };
    assert_eq!(IdentityProfile::derive(&profile.seed, &frozen), profile);
}

#[test]
fn test_reset_changes_all_serials() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("identity-profile.json");
    let mut store = IdentityStore::new(&path);

    let before = store.load_or_create(&host());
    let after = store.reset(&host());

    assert_ne!(before.identifiers.machine_id, after.identifiers.machine_id);
    assert_ne!(before.system.hostname, after.system.hostname);
    assert_ne!(before.hardware.bios_info.serial, after.hardware.bios_info.serial);
    assert_ne!(
        before.hardware.baseboard_info.serial,
        after.hardware.baseboard_info.serial
    );
    assert_ne!(before.hardware.disk_serials, after.hardware.disk_serials);
    assert_ne!(
        before.hardware.memory_module_serials,
        after.hardware.memory_module_serials
    );

    assert!(shape::is_uuid_v4(&after.identifiers.machine_id));
    after.check_shapes().unwrap();

    let reloaded = IdentityStore::new(&path).load_or_create(&host());
    assert_eq!(reloaded, after);
}
