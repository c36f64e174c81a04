//! Caller identity: bearer-token verification and role derivation.

pub mod identity;

pub use identity::{
    bearer_token, issue_session_token, Identity, JwtRoleResolver, Rejection, RoleResolver,
    SessionClaims,
};
