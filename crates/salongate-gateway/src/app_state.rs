//! Shared application state for the salongate gateway.
//!
//! Everything here is compiled once at startup and read-only afterwards.
//! Startup errors are returned, not panicked.

use std::sync::Arc;

use salongate_core::error::Result;
use salongate_core::tenant::TenantRegistry;

use crate::auth::JwtRoleResolver;
use crate::config::{BypassScope, GatewayConfig, Secrets};
use crate::obs::metrics::GatewayMetrics;
use crate::policy::{Authorizer, ServiceBypass};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    metrics: Arc<GatewayMetrics>,
}

struct AppStateInner {
    cfg: GatewayConfig,
    tenants: TenantRegistry,
    authorizer: Authorizer,
}

impl AppState {
    /// Build application state with secrets read from the environment.
    pub fn new(cfg: GatewayConfig) -> Result<Self> {
        let secrets = Secrets::from_env(&cfg);
        Self::with_secrets(cfg, secrets)
    }

    pub fn with_secrets(cfg: GatewayConfig, secrets: Secrets) -> Result<Self> {
        // 1) Tenant table
        let tenants = TenantRegistry::new(cfg.tenants.clone())?;

        // 2) Identity
        let resolver = JwtRoleResolver::new(&cfg.auth, secrets.jwt_secret.as_deref());
        if !resolver.has_secret() {
            tracing::warn!(
                env = %cfg.auth.jwt_secret_env,
                "no jwt secret configured; every caller will be treated as guest"
            );
        }

        // 3) Service bypass
        let scope = cfg.service_bypass.scope()?;
        if scope == BypassScope::All {
            tracing::warn!("service_bypass covers every permission (\"*\"); prefer an explicit list");
        }
        let bypass = ServiceBypass::new(
            cfg.service_bypass.header_name()?,
            secrets.service_secret,
            scope,
        );
        if !cfg.service_bypass.permissions.is_empty() && !bypass.is_armed() {
            tracing::warn!(
                env = %cfg.service_bypass.secret_env,
                "service_bypass permissions configured but secret missing; bypass disabled"
            );
        }

        // 4) Role table
        let metrics = Arc::new(GatewayMetrics::default());
        let authorizer = Authorizer::new(
            cfg.rbac.role_table(),
            Arc::new(resolver),
            bypass,
            Arc::clone(&metrics),
        );

        tracing::info!(
            tenants = tenants.len(),
            default = %tenants.default_tenant().slug,
            "tenant table loaded"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                tenants,
                authorizer,
            }),
            metrics,
        })
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn tenants(&self) -> &TenantRegistry {
        &self.inner.tenants
    }

    pub fn authorizer(&self) -> &Authorizer {
        &self.inner.authorizer
    }

    pub fn metrics(&self) -> Arc<GatewayMetrics> {
        Arc::clone(&self.metrics)
    }
}
