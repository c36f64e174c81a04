//! Gateway config loader (strict parsing) and startup secrets.

pub mod schema;

use std::env;
use std::fs;

use salongate_core::error::{GateError, Result};

pub use schema::{
    AuthSection, BypassScope, GatewayConfig, GatewaySection, RbacSection, ServiceBypassSection,
};

pub fn load_from_file(path: &str) -> Result<GatewayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| GateError::Internal(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<GatewayConfig> {
    let cfg: GatewayConfig = serde_yaml::from_str(s)
        .map_err(|e| GateError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Secrets read once at startup. Kept out of the YAML file.
#[derive(Clone, Default)]
pub struct Secrets {
    pub jwt_secret: Option<String>,
    pub service_secret: Option<String>,
}

impl Secrets {
    pub fn from_env(cfg: &GatewayConfig) -> Self {
        Self {
            jwt_secret: non_empty_env(&cfg.auth.jwt_secret_env),
            service_secret: non_empty_env(&cfg.service_bypass.secret_env),
        }
    }
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("service_secret", &self.service_secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}
