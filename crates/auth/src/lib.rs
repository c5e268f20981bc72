//! `timeportal-auth`: pure authorization and token boundary.
//!
//! This crate is intentionally decoupled from storage, rendering and
//! navigation.

pub mod authorize;
pub mod badge;
pub mod claims;
pub mod credential;
pub mod matrix;
pub mod permissions;
pub mod roles;

pub use authorize::{
    AuthorizationExplanation, AuthzError, DenialKind, authorize, authorize_all, authorize_any,
    authorize_role, explain_authorization,
};
pub use badge::{RoleBadge, role_badge, role_description};
pub use claims::{
    MalformedReason, TokenClaims, TokenStatus, TokenValidationError, decode_claims, is_expired,
    token_status, validate_token,
};
pub use credential::{Credential, LoginRejected, LoginResponse, UserRecord};
pub use matrix::{PermissionMatrix, has_all, has_any, has_permission, role_has_permission};
pub use permissions::Permission;
pub use roles::{Role, UnknownRole};
