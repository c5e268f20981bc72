use serde::Serialize;
use thiserror::Error;

use crate::matrix::PermissionMatrix;
use crate::{Permission, Role};

/// Why a role/permission requirement was not met.
///
/// Not an exceptional condition: guards turn these into redirects and gates
/// into hidden elements. The error form exists for logging and audit.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: role '{role}' is missing permission '{permission}'")]
    MissingPermission { role: Role, permission: String },

    #[error("forbidden: role '{role}' holds none of {required:?}")]
    MissingAnyPermission { role: Role, required: Vec<String> },

    #[error("forbidden: role '{role}' is not one of {allowed:?}")]
    RoleNotAllowed { role: Role, allowed: Vec<Role> },
}

/// Authorize a single permission against the standard matrix.
///
/// - No IO
/// - No panics
pub fn authorize(role: Role, required: &Permission) -> Result<(), AuthzError> {
    if PermissionMatrix::standard().has_permission(role, required) {
        Ok(())
    } else {
        Err(AuthzError::MissingPermission {
            role,
            permission: required.as_str().to_string(),
        })
    }
}

/// Succeeds if at least one permission is held. An empty list never succeeds.
pub fn authorize_any(role: Role, required: &[Permission]) -> Result<(), AuthzError> {
    if PermissionMatrix::standard().has_any(role, required) {
        Ok(())
    } else {
        Err(AuthzError::MissingAnyPermission {
            role,
            required: required.iter().map(|p| p.as_str().to_string()).collect(),
        })
    }
}

/// Succeeds if every permission is held; reports the first one missing.
pub fn authorize_all(role: Role, required: &[Permission]) -> Result<(), AuthzError> {
    required.iter().try_for_each(|p| authorize(role, p))
}

/// Succeeds if `role` is one of `allowed`. An empty allow-list admits nobody.
pub fn authorize_role(role: Role, allowed: &[Role]) -> Result<(), AuthzError> {
    if allowed.contains(&role) {
        Ok(())
    } else {
        Err(AuthzError::RoleNotAllowed {
            role,
            allowed: allowed.to_vec(),
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Authorization Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Detailed explanation of an authorization decision.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationExplanation {
    /// The permission that was being checked.
    pub required_permission: String,

    pub role: Role,

    pub granted: bool,

    /// Human-readable reason for the decision.
    pub reason: String,

    /// Everything the role holds, sorted.
    pub effective_permissions: Vec<String>,

    /// If denied, this explains what was missing.
    pub denial_reason: Option<DenialReason>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DenialReason {
    pub kind: DenialKind,
    pub message: String,
    /// Roles that would be granted the permission.
    pub granting_roles: Vec<Role>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    MissingPermission,
    UnknownPermission,
}

/// Explain why an authorization decision was made (or would be made).
pub fn explain_authorization(role: Role, required: &Permission) -> AuthorizationExplanation {
    let matrix = PermissionMatrix::standard();
    let required_str = required.as_str();
    let effective_permissions: Vec<String> = matrix
        .permissions_for(role)
        .map(|p| p.as_str().to_string())
        .collect();

    if matrix.has_permission(role, required) {
        return AuthorizationExplanation {
            required_permission: required_str.to_string(),
            role,
            granted: true,
            reason: format!("role '{role}' holds permission '{required_str}'"),
            effective_permissions,
            denial_reason: None,
        };
    }

    let granting_roles: Vec<Role> = Role::ALL
        .into_iter()
        .filter(|r| matrix.has_permission(*r, required))
        .collect();

    let (kind, message) = if granting_roles.is_empty() {
        (
            DenialKind::UnknownPermission,
            format!("no role holds permission '{required_str}'"),
        )
    } else {
        (
            DenialKind::MissingPermission,
            format!(
                "permission '{required_str}' requires one of: {}",
                granting_roles
                    .iter()
                    .map(Role::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        )
    };

    AuthorizationExplanation {
        required_permission: required_str.to_string(),
        role,
        granted: false,
        reason: format!("role '{role}' does not hold permission '{required_str}'"),
        effective_permissions,
        denial_reason: Some(DenialReason {
            kind,
            message,
            granting_roles,
        }),
    }
}
