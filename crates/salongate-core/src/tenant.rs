//! Tenant table and host-based resolution.
//!
//! Every tenant enumerates the hostnames it answers for. Hosts are compared
//! after [`normalize_host`], by exact equality only (no suffix or wildcard
//! matching). The table is built once and is read-only afterwards.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{GateError, Result};

/// Static configuration for one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TenantConfig {
    /// Unique short identifier (e.g. `instylehairboutique`).
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Hostnames that resolve to this tenant (apex, www, preview domains).
    #[serde(default)]
    pub domains: Vec<String>,
    /// Path prefix under which the tenant's pages are served.
    #[serde(default)]
    pub route: String,
    /// Backend endpoint for the tenant's data operations.
    pub api_base_url: String,
    /// Marks the fallback (platform) tenant.
    #[serde(default)]
    pub default: bool,
}

impl TenantConfig {
    /// Map a public request path onto this tenant's route prefix.
    ///
    /// Tenants with an empty route (the platform site) keep the path as is,
    /// as do paths already under the prefix.
    pub fn rewrite_path(&self, path: &str) -> String {
        let route = self.route.trim_matches('/');
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };
        if route.is_empty() {
            return path;
        }

        let prefix = format!("/{route}");
        if path == prefix || path.starts_with(&format!("{prefix}/")) {
            return path;
        }
        format!("{prefix}{path}")
    }
}

/// Internal, asset, and API paths skip tenant rewriting.
pub fn is_passthrough_path(path: &str) -> bool {
    path.starts_with("/_next") || path.starts_with("/api") || path.contains('.')
}

/// Canonical form of a `Host` header value.
///
/// Lower-cases, strips a single trailing dot, strips a `:port` suffix, and
/// strips a single leading `www.`. A dot exposed by the port (`host.:443`)
/// goes too. Total: malformed input just yields a partial or empty string.
/// Bracketed IPv6 literals keep their brackets.
pub fn normalize_host(host: &str) -> String {
    let mut h = host.trim().to_lowercase();
    if h.ends_with('.') {
        h.pop();
    }

    let mut had_port = false;
    if h.starts_with('[') {
        if let Some(end) = h.find(']') {
            had_port = end + 1 < h.len();
            h.truncate(end + 1);
        }
    } else if let Some((name, port)) = h.rsplit_once(':') {
        // Only one colon and a numeric suffix counts as a port.
        if !name.contains(':') && port.bytes().all(|b| b.is_ascii_digit()) {
            h = name.to_string();
            had_port = true;
        }
    }

    if had_port && h.ends_with('.') {
        h.pop();
    }
    match h.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => h,
    }
}

/// Immutable tenant table with a precomputed host index.
#[derive(Debug, Clone)]
pub struct TenantRegistry {
    tenants: Vec<Arc<TenantConfig>>,
    by_host: HashMap<String, Arc<TenantConfig>>,
    by_slug: HashMap<String, Arc<TenantConfig>>,
    default: Arc<TenantConfig>,
}

impl TenantRegistry {
    /// Build the registry. Requires a non-empty table, unique slugs, and
    /// exactly one default tenant.
    ///
    /// A normalized domain listed by several tenants belongs to the first
    /// one in table order.
    pub fn new(tenants: Vec<TenantConfig>) -> Result<Self> {
        if tenants.is_empty() {
            return Err(GateError::BadRequest("tenants must not be empty".into()));
        }

        let mut defaults = tenants.iter().filter(|t| t.default);
        let default_slug = match (defaults.next(), defaults.next()) {
            (Some(t), None) => t.slug.clone(),
            (None, _) => {
                return Err(GateError::BadRequest(
                    "exactly one tenant must be marked default (found none)".into(),
                ))
            }
            (Some(a), Some(b)) => {
                return Err(GateError::BadRequest(format!(
                    "exactly one tenant must be marked default (found {} and {})",
                    a.slug, b.slug
                )))
            }
        };

        let tenants: Vec<Arc<TenantConfig>> = tenants.into_iter().map(Arc::new).collect();

        let mut by_slug = HashMap::with_capacity(tenants.len());
        let mut by_host: HashMap<String, Arc<TenantConfig>> = HashMap::new();
        for t in &tenants {
            if t.slug.is_empty() {
                return Err(GateError::BadRequest("tenant slug must not be empty".into()));
            }
            if by_slug.insert(t.slug.clone(), Arc::clone(t)).is_some() {
                return Err(GateError::BadRequest(format!("duplicate tenant slug: {}", t.slug)));
            }

            let mut seen = HashSet::new();
            for raw in &t.domains {
                let host = normalize_host(raw);
                if host.is_empty() || !seen.insert(host.clone()) {
                    continue;
                }
                match by_host.entry(host) {
                    Entry::Occupied(owner) => {
                        tracing::warn!(
                            domain = %owner.key(),
                            owner = %owner.get().slug,
                            ignored = %t.slug,
                            "domain listed by more than one tenant; first wins"
                        );
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(Arc::clone(t));
                    }
                }
            }
        }

        let default = by_slug
            .get(&default_slug)
            .cloned()
            .ok_or_else(|| GateError::Internal("default tenant vanished".into()))?;

        Ok(Self {
            tenants,
            by_host,
            by_slug,
            default,
        })
    }

    /// Tenant for a `Host` header value, if one lists it.
    pub fn match_host(&self, host: &str) -> Option<&Arc<TenantConfig>> {
        let host = normalize_host(host);
        if host.is_empty() {
            return None;
        }
        self.by_host.get(&host)
    }

    /// Tenant for a `Host` header value; the default tenant when the host is
    /// absent, empty, or unknown. Never fails.
    pub fn resolve_by_host(&self, host: Option<&str>) -> &Arc<TenantConfig> {
        host.and_then(|h| self.match_host(h))
            .unwrap_or(&self.default)
    }

    /// Exact slug lookup. Absence is reported, never defaulted.
    pub fn resolve_by_slug(&self, slug: &str) -> Option<&Arc<TenantConfig>> {
        self.by_slug.get(slug)
    }

    pub fn default_tenant(&self) -> &Arc<TenantConfig> {
        &self.default
    }

    pub fn len(&self) -> usize {
        self.tenants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tenants.is_empty()
    }
}
