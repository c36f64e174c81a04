use std::sync::Arc;

use axum::http::{HeaderMap, HeaderName};
use subtle::ConstantTimeEq;
use salongate_core::rbac::{Permission, Role, RolePermissions};
use salongate_core::tenant::TenantConfig;

use crate::auth::{Identity, RoleResolver};
use crate::config::BypassScope;
use crate::obs::metrics::GatewayMetrics;

/// Outcome of a permission gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Granted { role: Role },
    /// Role lacks the permission but a trusted service secret was presented.
    ServiceBypass,
    Denied { role: Role },
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        !matches!(self, AccessDecision::Denied { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            AccessDecision::Granted { .. } => "granted",
            AccessDecision::ServiceBypass => "bypass",
            AccessDecision::Denied { .. } => "denied",
        }
    }
}

/// Shared-secret header check for internal callers.
///
/// Fails closed: without a non-empty secret nothing matches.
pub struct ServiceBypass {
    header: HeaderName,
    secret: Option<String>,
    scope: BypassScope,
}

impl ServiceBypass {
    pub fn new(header: HeaderName, secret: Option<String>, scope: BypassScope) -> Self {
        Self {
            header,
            secret: secret.filter(|s| !s.is_empty()),
            scope,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.secret.is_some() && self.scope != BypassScope::Only(Default::default())
    }

    pub fn covers(&self, permission: Permission) -> bool {
        match &self.scope {
            BypassScope::All => true,
            BypassScope::Only(perms) => perms.contains(&permission),
        }
    }

    pub fn matches(&self, headers: &HeaderMap, permission: Permission) -> bool {
        let Some(expected) = &self.secret else {
            return false;
        };
        if !self.covers(permission) {
            return false;
        }
        headers
            .get(&self.header)
            .is_some_and(|v| v.as_bytes().ct_eq(expected.as_bytes()).into())
    }
}

/// Role-based gate. Construct once at startup, then share via `AppState`.
pub struct Authorizer {
    table: RolePermissions,
    resolver: Arc<dyn RoleResolver>,
    bypass: ServiceBypass,
    metrics: Arc<GatewayMetrics>,
}

impl Authorizer {
    pub fn new(
        table: RolePermissions,
        resolver: Arc<dyn RoleResolver>,
        bypass: ServiceBypass,
        metrics: Arc<GatewayMetrics>,
    ) -> Self {
        Self {
            table,
            resolver,
            bypass,
            metrics,
        }
    }

    pub fn table(&self) -> &RolePermissions {
        &self.table
    }

    pub fn has_permission(&self, role: Role, permission: Permission) -> bool {
        self.table.has_permission(role, permission)
    }

    /// Verified identity; rejected credentials degrade to guest.
    pub fn identify(&self, headers: &HeaderMap, tenant: &TenantConfig) -> Identity {
        match self.resolver.identify(headers, tenant) {
            Ok(identity) => identity,
            Err(rejection) => {
                tracing::debug!(tenant = %tenant.slug, reason = %rejection, "credentials rejected; caller treated as guest");
                self.metrics
                    .identity_rejections
                    .inc(&[("reason", rejection.as_str())]);
                Identity::guest()
            }
        }
    }

    pub fn user_role(&self, headers: &HeaderMap, tenant: &TenantConfig) -> Role {
        self.identify(headers, tenant).role
    }

    /// Role check only; the service bypass is not consulted.
    pub fn authorize(&self, headers: &HeaderMap, tenant: &TenantConfig, permission: Permission) -> bool {
        self.has_permission(self.user_role(headers, tenant), permission)
    }

    /// Full gate: role check, then the service bypass.
    pub fn decide(
        &self,
        headers: &HeaderMap,
        tenant: &TenantConfig,
        permission: Permission,
    ) -> AccessDecision {
        let role = self.user_role(headers, tenant);

        let decision = if self.has_permission(role, permission) {
            AccessDecision::Granted { role }
        } else if self.bypass.matches(headers, permission) {
            tracing::info!(tenant = %tenant.slug, %permission, "service bypass accepted");
            AccessDecision::ServiceBypass
        } else {
            tracing::debug!(tenant = %tenant.slug, %role, %permission, "permission denied");
            AccessDecision::Denied { role }
        };

        self.metrics.authz_decisions.inc(&[
            ("permission", permission.as_str()),
            ("outcome", decision.label()),
        ]);
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn bypass(secret: Option<&str>, scope: BypassScope) -> ServiceBypass {
        ServiceBypass::new(
            HeaderName::from_static("x-internal-secret"),
            secret.map(str::to_string),
            scope,
        )
    }

    fn headers_with(secret: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert("x-internal-secret", secret.parse().unwrap());
        h
    }

    #[test]
    fn bypass_requires_exact_secret() {
        let b = bypass(Some("s3cret"), BypassScope::All);
        assert!(b.matches(&headers_with("s3cret"), Permission::PaymentsRefund));
        assert!(!b.matches(&headers_with("s3cre"), Permission::PaymentsRefund));
        assert!(!b.matches(&headers_with("s3cret!"), Permission::PaymentsRefund));
        assert!(!b.matches(&HeaderMap::new(), Permission::PaymentsRefund));
    }

    #[test]
    fn bypass_fails_closed_without_secret() {
        let b = bypass(None, BypassScope::All);
        assert!(!b.matches(&headers_with(""), Permission::ServicesRead));
        let empty = bypass(Some(""), BypassScope::All);
        assert!(!empty.matches(&headers_with(""), Permission::ServicesRead));
        assert!(!empty.is_armed());
        let unscoped = bypass(Some("k"), BypassScope::Only(HashSet::new()));
        assert!(!unscoped.is_armed());
        assert!(!unscoped.matches(&headers_with("k"), Permission::ServicesRead));
    }

    #[test]
    fn bypass_honours_scope() {
        let b = bypass(
            Some("k"),
            BypassScope::Only(HashSet::from([Permission::BookingsCreate])),
        );
        assert!(b.is_armed());
        assert!(b.matches(&headers_with("k"), Permission::BookingsCreate));
        assert!(!b.matches(&headers_with("k"), Permission::PaymentsRefund));
    }

    #[test]
    fn decision_labels() {
        assert!(AccessDecision::ServiceBypass.is_allowed());
        assert!(!AccessDecision::Denied { role: Role::Guest }.is_allowed());
        assert_eq!(AccessDecision::Granted { role: Role::Admin }.label(), "granted");
    }
}
