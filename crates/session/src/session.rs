//! The session context.
//!
//! One [`Session`] owns everything bound to the current identity: the
//! store, the profile, the hardware binding, the rewriter and the query
//! surface. Resetting the identity rebuilds all of them inside one
//! `&mut self` call, so no caller can observe a half-rebound session.

use crate::error::DispatchResult;
use crate::status::{ComponentStatus, ProfileSummary, SessionState, SessionStats, SessionStatus};
use mirage_core::MirageConfig;
use mirage_hardware::{HardwareCatalog, HardwareProfile};
use mirage_identity::{HostSnapshot, IdentityProfile, IdentityStore, RealIdentity};
use mirage_policy::{
    Decision, InterceptionStats, OutboundRequest, Payload, RequestRewriter, Response, Routed,
    Transport,
};
use mirage_surface::{SurfaceResult, TelemetrySurface};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Components derived from one identity profile.
#[derive(Debug, Clone)]
struct Binding {
    profile: Arc<IdentityProfile>,
    hardware: Arc<HardwareProfile>,
    rewriter: RequestRewriter,
    surface: TelemetrySurface,
}

impl Binding {
    fn new(
        profile: IdentityProfile,
        catalog: &HardwareCatalog,
        config: &MirageConfig,
        real: &RealIdentity,
    ) -> Self {
        let profile = Arc::new(profile);
        let hardware = Arc::new(HardwareProfile::bind(profile.clone(), catalog));
        let rewriter = RequestRewriter::from_config(&config.policy, profile.clone(), real);
        let surface = TelemetrySurface::new(hardware.clone(), real.clone());
        Self {
            profile,
            hardware,
            rewriter,
            surface,
        }
    }
}

pub struct Session {
    config: MirageConfig,
    store: IdentityStore,
    catalog: HardwareCatalog,
    real: RealIdentity,
    binding: Binding,
    stats: InterceptionStats,
    state: SessionState,
    started_at: u64,
}

impl Session {
    /// Start with the real identity detected from the running host.
    pub fn start(config: MirageConfig) -> Self {
        Self::start_with(config, RealIdentity::detect())
    }

    /// Start with an explicit real identity.
    pub fn start_with(config: MirageConfig, real: RealIdentity) -> Self {
        let started_at = mirage_core::now_ms();
        let mut store = IdentityStore::new(config.profile_path());
        let host = HostSnapshot::capture(&config.profile);
        let profile = store.load_or_create(&host);
        let catalog = HardwareCatalog::load_or_fallback(&config.catalog.path);
        let binding = Binding::new(profile, &catalog, &config, &real);

        info!(
            identity = %binding.profile.short_id(),
            hostname = %binding.profile.system.hostname,
            template = %binding.hardware.template_name(),
            "Session started"
        );

        Self {
            config,
            store,
            catalog,
            real,
            binding,
            stats: InterceptionStats::new(),
            state: SessionState::Running,
            started_at,
        }
    }

    pub fn config(&self) -> &MirageConfig {
        &self.config
    }

    pub fn get_profile(&self) -> Arc<IdentityProfile> {
        self.binding.profile.clone()
    }

    pub fn hardware(&self) -> &HardwareProfile {
        &self.binding.hardware
    }

    pub fn surface(&self) -> &TelemetrySurface {
        &self.binding.surface
    }

    pub fn rewriter(&self) -> &RequestRewriter {
        &self.binding.rewriter
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn get_status(&self) -> SessionStatus {
        let profile = &self.binding.profile;
        SessionStatus {
            version: env!("CARGO_PKG_VERSION").to_string(),
            status: self.state,
            started_at: self.started_at,
            uptime_ms: mirage_core::now_ms().saturating_sub(self.started_at),
            profile: ProfileSummary {
                identity_id: profile.short_id(),
                hostname: profile.system.hostname.clone(),
                username: profile.system.username.clone(),
                hardware_template: self.binding.hardware.template_name().to_string(),
                fingerprint: profile.fingerprint(),
            },
            components: ComponentStatus {
                identity_store: self.store.current().is_some(),
                hardware_profile: Arc::ptr_eq(self.binding.hardware.profile(), profile),
                request_rewriter: Arc::ptr_eq(self.binding.rewriter.profile(), profile),
                telemetry_surface: Arc::ptr_eq(self.binding.surface.profile(), profile),
                catalog_templates: self.catalog.len(),
                persisted: self.store.is_persisted(),
            },
        }
    }

    pub fn get_stats(&self) -> SessionStats {
        SessionStats {
            network: self.stats,
            profile: self.binding.profile.field_counts(),
        }
    }

    /// Re-seed, persist and rebind every dependent component.
    pub fn reset_identity(&mut self) -> Arc<IdentityProfile> {
        let previous = self.binding.profile.short_id();
        let host = HostSnapshot::capture(&self.config.profile);
        let profile = self.store.reset(&host);
        self.binding = Binding::new(profile, &self.catalog, &self.config, &self.real);

        info!(
            previous = %previous,
            identity = %self.binding.profile.short_id(),
            template = %self.binding.hardware.template_name(),
            "Session rebound to new identity"
        );
        self.binding.profile.clone()
    }

    /// Reload the persisted profile and rebuild every component.
    pub fn restart(&mut self) {
        let host = HostSnapshot::capture(&self.config.profile);
        let profile = self.store.load_or_create(&host);
        self.catalog = HardwareCatalog::load_or_fallback(&self.config.catalog.path);
        self.binding = Binding::new(profile, &self.catalog, &self.config, &self.real);
        self.state = SessionState::Running;
        info!(identity = %self.binding.profile.short_id(), "Session restarted");
    }

    pub fn shutdown(&mut self) {
        self.state = SessionState::Shutdown;
        info!(
            total = self.stats.total,
            intercepted = self.stats.intercepted,
            "Session shut down"
        );
    }

    pub fn query(&self, surface: &str, args: &Value) -> SurfaceResult<Value> {
        self.binding.surface.query(surface, args)
    }

    pub fn classify(&self, destination: &str, payload: &Payload) -> Decision {
        self.binding.rewriter.engine().classify(destination, payload)
    }

    /// Classify and rewrite without sending. Counts toward statistics.
    pub fn route(&mut self, request: OutboundRequest) -> Routed {
        self.binding.rewriter.route(request, &mut self.stats)
    }

    /// Route a request and hand forwarded ones to the host transport.
    pub fn dispatch<T>(&mut self, request: OutboundRequest, transport: &mut T) -> DispatchResult<Response>
    where
        T: Transport + ?Sized,
    {
        match self.route(request) {
            Routed::Forward { decision, request } => {
                debug!(host = %request.host(), decision = %decision, "Forwarding request");
                Ok(transport.send(request)?)
            }
            Routed::ShortCircuit { response, .. } => Ok(response),
        }
    }
}
