//! Shared fixtures for cross-crate tests.

use mirage_core::MirageConfig;
use mirage_identity::RealIdentity;
use mirage_policy::{OutboundRequest, Response, Transport, TransportError};
use mirage_session::Session;
use std::path::PathBuf;
use tempfile::TempDir;

/// Path of the catalog shipped in `config/`.
pub fn shipped_catalog_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../config/hardware-templates.json")
}

/// A fixed "real" identity so substitution results are predictable.
pub fn test_real_identity() -> RealIdentity {
    RealIdentity {
        hostname: "dev-box-01".to_string(),
        username: "jordan".to_string(),
        home_dir: "/home/jordan".to_string(),
        env_users: vec!["jordan".to_string()],
    }
}

/// Isolated store directory plus a config pointing at it.
pub struct TestEnv {
    pub dir: TempDir,
    pub config: MirageConfig,
}

impl TestEnv {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let mut config = MirageConfig::default();
        config.store.directory = dir.path().join("store");
        config.catalog.path = shipped_catalog_path();
        Self { dir, config }
    }

    pub fn profile_path(&self) -> PathBuf {
        self.config.profile_path()
    }

    pub fn session(&self) -> Session {
        Session::start_with(self.config.clone(), test_real_identity())
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Transport that records forwarded requests and answers 200.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    pub sent: Vec<OutboundRequest>,
}

impl Transport for RecordingTransport {
    fn send(&mut self, request: OutboundRequest) -> Result<Response, TransportError> {
        self.sent.push(request);
        Ok(Response {
            status: 200,
            headers: Vec::new(),
            body: "{}".to_string(),
        })
    }
}

/// Install a test subscriber once; later calls are no-ops.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("debug")
        .try_init();
}
