use std::fmt;

use axum::http::{header::AUTHORIZATION, HeaderMap, HeaderValue};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use salongate_core::error::{GateError, Result};
use salongate_core::rbac::Role;
use salongate_core::tenant::TenantConfig;

use crate::config::AuthSection;

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User id.
    pub sub: String,
    /// Role name (`admin`, `staff`, `customer`, `guest`).
    pub role: String,
    /// Tenant slug the session belongs to. `None` means platform-wide.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
    pub exp: u64,
}

/// Verified caller identity for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub role: Role,
    pub subject: Option<String>,
    pub tenant: Option<String>,
}

impl Identity {
    pub fn guest() -> Self {
        Self {
            role: Role::Guest,
            subject: None,
            tenant: None,
        }
    }
}

/// Why presented credentials were not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Header present but not `Bearer <token>`.
    Malformed,
    /// No verification secret configured.
    NoSecret,
    /// Bad signature, claims, or encoding.
    Invalid,
    Expired,
    UnknownRole,
    /// Token scoped to another tenant.
    TenantMismatch,
}

impl Rejection {
    pub fn as_str(self) -> &'static str {
        match self {
            Rejection::Malformed => "malformed",
            Rejection::NoSecret => "no_secret",
            Rejection::Invalid => "invalid",
            Rejection::Expired => "expired",
            Rejection::UnknownRole => "unknown_role",
            Rejection::TenantMismatch => "tenant_mismatch",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Rejection> for GateError {
    fn from(r: Rejection) -> Self {
        GateError::AuthFailed(r.as_str().to_string())
    }
}

/// Derives the caller's identity from request credentials.
///
/// No credentials is a guest, not an error. `Err` means credentials were
/// presented and refused; callers decide how to degrade.
pub trait RoleResolver: Send + Sync {
    fn identify(
        &self,
        headers: &HeaderMap,
        tenant: &TenantConfig,
    ) -> std::result::Result<Identity, Rejection>;
}

/// HS256 bearer-token resolver.
pub struct JwtRoleResolver {
    key: Option<DecodingKey>,
    validation: Validation,
}

impl JwtRoleResolver {
    pub fn new(auth: &AuthSection, secret: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = auth.leeway_secs;
        match &auth.issuer {
            Some(iss) => {
                validation.set_issuer(&[iss]);
                validation.set_required_spec_claims(&["exp", "sub", "iss"]);
            }
            None => validation.set_required_spec_claims(&["exp", "sub"]),
        }

        Self {
            key: secret.map(|s| DecodingKey::from_secret(s.as_bytes())),
            validation,
        }
    }

    pub fn has_secret(&self) -> bool {
        self.key.is_some()
    }
}

impl RoleResolver for JwtRoleResolver {
    fn identify(
        &self,
        headers: &HeaderMap,
        tenant: &TenantConfig,
    ) -> std::result::Result<Identity, Rejection> {
        let Some(raw) = headers.get(AUTHORIZATION) else {
            return Ok(Identity::guest());
        };
        let token = bearer_token(raw).ok_or(Rejection::Malformed)?;
        let key = self.key.as_ref().ok_or(Rejection::NoSecret)?;

        let claims = jsonwebtoken::decode::<SessionClaims>(token, key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => Rejection::Expired,
                _ => Rejection::Invalid,
            })?;

        let role: Role = claims.role.parse().map_err(|_| Rejection::UnknownRole)?;
        if let Some(scoped) = &claims.tenant {
            if scoped != &tenant.slug {
                return Err(Rejection::TenantMismatch);
            }
        }

        Ok(Identity {
            role,
            subject: Some(claims.sub),
            tenant: claims.tenant,
        })
    }
}

/// Token part of an `Authorization: Bearer <token>` header.
pub fn bearer_token(value: &HeaderValue) -> Option<&str> {
    let s = value.to_str().ok()?;
    let (scheme, token) = s.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Sign session claims with the shared HS256 secret.
pub fn issue_session_token(secret: &str, claims: &SessionClaims) -> Result<String> {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| GateError::Internal(format!("token encode failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_parsing() {
        let ok = HeaderValue::from_static("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&ok), Some("abc.def.ghi"));
        let lower = HeaderValue::from_static("bearer   tok ");
        assert_eq!(bearer_token(&lower), Some("tok"));
        assert_eq!(bearer_token(&HeaderValue::from_static("Basic dXNlcg==")), None);
        assert_eq!(bearer_token(&HeaderValue::from_static("Bearer")), None);
        assert_eq!(bearer_token(&HeaderValue::from_static("Bearer ")), None);
    }

    #[test]
    fn rejection_maps_to_auth_failed() {
        let err: GateError = Rejection::Expired.into();
        assert_eq!(err.client_code().as_str(), "AUTH_FAILED");
        assert!(err.to_string().contains("expired"));
    }
}
