use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;

use axum::http::HeaderName;
use serde::Deserialize;
use salongate_core::error::{GateError, Result};
use salongate_core::rbac::{Permission, Role, RolePermissions};
use salongate_core::tenant::{TenantConfig, TenantRegistry};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    #[serde(default)]
    pub auth: AuthSection,

    #[serde(default)]
    pub service_bypass: ServiceBypassSection,

    #[serde(default)]
    pub rbac: RbacSection,

    #[serde(default)]
    pub tenants: Vec<TenantConfig>,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(GateError::UnsupportedVersion);
        }
        if self.tenants.is_empty() {
            return Err(GateError::BadRequest("tenants must not be empty".into()));
        }

        self.gateway.validate()?;
        self.service_bypass.validate()?;

        // Registry construction enforces default/slug invariants.
        TenantRegistry::new(self.tenants.clone())?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|_| {
            GateError::BadRequest(format!(
                "gateway.listen must be a valid socket address: {}",
                self.listen
            ))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}

/// Bearer-token verification settings. The secret itself comes from the
/// environment variable named here.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthSection {
    #[serde(default = "default_jwt_secret_env")]
    pub jwt_secret_env: String,

    #[serde(default)]
    pub issuer: Option<String>,

    #[serde(default = "default_leeway_secs")]
    pub leeway_secs: u64,
}

impl Default for AuthSection {
    fn default() -> Self {
        Self {
            jwt_secret_env: default_jwt_secret_env(),
            issuer: None,
            leeway_secs: default_leeway_secs(),
        }
    }
}

fn default_jwt_secret_env() -> String {
    "SALONGATE_JWT_SECRET".into()
}
fn default_leeway_secs() -> u64 {
    30
}

/// Service-to-service escape hatch. Only the listed permissions can be
/// bypassed; an empty list disables it.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceBypassSection {
    #[serde(default = "default_bypass_header")]
    pub header: String,

    #[serde(default = "default_bypass_secret_env")]
    pub secret_env: String,

    /// Permission names, or `"*"` for every permission.
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl Default for ServiceBypassSection {
    fn default() -> Self {
        Self {
            header: default_bypass_header(),
            secret_env: default_bypass_secret_env(),
            permissions: Vec::new(),
        }
    }
}

/// Compiled bypass scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BypassScope {
    All,
    Only(HashSet<Permission>),
}

impl ServiceBypassSection {
    pub fn validate(&self) -> Result<()> {
        self.header_name()?;
        self.scope()?;
        Ok(())
    }

    pub fn header_name(&self) -> Result<HeaderName> {
        HeaderName::from_bytes(self.header.to_ascii_lowercase().as_bytes()).map_err(|_| {
            GateError::BadRequest(format!(
                "service_bypass.header is not a valid header name: {}",
                self.header
            ))
        })
    }

    pub fn scope(&self) -> Result<BypassScope> {
        if self.permissions.iter().any(|p| p == "*") {
            return Ok(BypassScope::All);
        }
        let perms = self
            .permissions
            .iter()
            .map(|p| {
                p.parse::<Permission>().map_err(|_| {
                    GateError::BadRequest(format!("service_bypass.permissions: unknown permission {p}"))
                })
            })
            .collect::<Result<HashSet<_>>>()?;
        Ok(BypassScope::Only(perms))
    }
}

fn default_bypass_header() -> String {
    "x-internal-secret".into()
}
fn default_bypass_secret_env() -> String {
    "INTERNAL_SERVICE_KEY".into()
}

/// Optional replacement for the built-in role table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RbacSection {
    #[serde(default)]
    pub roles: Option<HashMap<Role, Vec<Permission>>>,
}

impl RbacSection {
    pub fn role_table(&self) -> RolePermissions {
        match &self.roles {
            Some(roles) => RolePermissions::from_map(roles.clone()),
            None => RolePermissions::builtin(),
        }
    }
}
