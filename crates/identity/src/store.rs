//! Load-or-create-and-persist lifecycle for the installation's profile.
//!
//! One JSON file per installation. Absence, parse failure or a profile that
//! fails shape checks all lead to regeneration; write failures are logged and
//! the in-memory profile remains authoritative for the session.

use crate::environment::HostSnapshot;
use crate::error::{IdentityError, IdentityResult};
use crate::profile::IdentityProfile;
use crate::synth::generate_seed;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Owner of the identity seed and its persisted profile.
#[derive(Debug)]
pub struct IdentityStore {
    path: PathBuf,
    current: Option<IdentityProfile>,
    persisted: bool,
}

impl IdentityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            current: None,
            persisted: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The profile produced by the last `load_or_create` or `reset`.
    pub fn current(&self) -> Option<&IdentityProfile> {
        self.current.as_ref()
    }

    /// Whether the current profile is known to be on disk. False after a
    /// failed write, when the session runs on the in-memory profile.
    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    /// Return the persisted profile unchanged, or synthesize and persist a new one.
    pub fn load_or_create(&mut self, host: &HostSnapshot) -> IdentityProfile {
        match self.load() {
            Ok(Some(profile)) => {
                info!(
                    path = %self.path.display(),
                    identity = %profile.short_id(),
                    hostname = %profile.system.hostname,
                    "Loaded existing identity profile"
                );
                self.current = Some(profile.clone());
                self.persisted = true;
                return profile;
            }
            Ok(None) => {
                info!(path = %self.path.display(), "No identity profile found, generating");
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to load identity profile, generating a new one"
                );
            }
        }

        let profile = IdentityProfile::derive(&generate_seed(), host);
        self.persist_or_warn(&profile);
        info!(
            identity = %profile.short_id(),
            hostname = %profile.system.hostname,
            username = %profile.system.username,
            "Generated new identity profile"
        );
        self.current = Some(profile.clone());
        profile
    }

    /// Read the persisted profile. `Ok(None)` when no file exists.
    pub fn load(&self) -> IdentityResult<Option<IdentityProfile>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(&self.path)
            .map_err(|e| IdentityError::persistence(&self.path, e))?;
        let profile: IdentityProfile = serde_json::from_str(&raw)?;
        profile.check_shapes().map_err(IdentityError::Corrupt)?;
        Ok(Some(profile))
    }

    /// Serialize the profile to the store path, creating the directory if absent.
    pub fn save(&self, profile: &IdentityProfile) -> IdentityResult<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                std::fs::create_dir_all(dir).map_err(|e| IdentityError::persistence(dir, e))?;
            }
        }

        let json = serde_json::to_string_pretty(profile)?;
        std::fs::write(&self.path, json).map_err(|e| IdentityError::persistence(&self.path, e))?;
        debug!(path = %self.path.display(), "Identity profile saved");
        Ok(())
    }

    /// Discard the current seed and derive, persist and return a fresh profile.
    pub fn reset(&mut self, host: &HostSnapshot) -> IdentityProfile {
        let previous_seed = self.current.as_ref().map(|p| p.seed.clone());
        let mut seed = generate_seed();
        while Some(&seed) == previous_seed.as_ref() {
            seed = generate_seed();
        }

        let profile = IdentityProfile::derive(&seed, host);
        self.persist_or_warn(&profile);
        info!(
            identity = %profile.short_id(),
            hostname = %profile.system.hostname,
            username = %profile.system.username,
            "Identity profile reset"
        );
        self.current = Some(profile.clone());
        profile
    }

    fn persist_or_warn(&mut self, profile: &IdentityProfile) {
        match self.save(profile) {
            Ok(()) => self.persisted = true,
            Err(e) => {
                self.persisted = false;
                warn!(
                    error = %e,
                    "Failed to persist identity profile, continuing with in-memory profile"
                );
            }
        }
    }
}
