//! Static role→permission table.
//!
//! # Invariants
//! - Total over [`Role::ALL`]; every role maps to a non-empty set.
//! - `admin ⊇ dispatcher ⊇ user` (privilege only grows up the ladder).
//!
//! Every query fails closed: a role missing from a matrix holds nothing.

use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

use timeportal_core::{DomainError, DomainResult};

use crate::{Permission, Role};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionMatrix {
    grants: HashMap<Role, BTreeSet<Permission>>,
}

impl PermissionMatrix {
    /// The portal's role table, built once per process.
    pub fn standard() -> &'static PermissionMatrix {
        static STANDARD: OnceLock<PermissionMatrix> = OnceLock::new();
        STANDARD.get_or_init(|| {
            Self::from_grants(Role::ALL.into_iter().map(|role| (role, role_grants(role))))
        })
    }

    /// Build a matrix from explicit grants. Repeated roles are merged.
    pub fn from_grants<I, P>(grants: I) -> Self
    where
        I: IntoIterator<Item = (Role, P)>,
        P: IntoIterator<Item = Permission>,
    {
        let mut table: HashMap<Role, BTreeSet<Permission>> = HashMap::new();
        for (role, perms) in grants {
            table.entry(role).or_default().extend(perms);
        }
        Self { grants: table }
    }

    /// Permissions held by `role`, sorted by name.
    pub fn permissions_for(&self, role: Role) -> impl Iterator<Item = &Permission> + '_ {
        self.grants.get(&role).into_iter().flatten()
    }

    pub fn has_permission(&self, role: Role, permission: &Permission) -> bool {
        self.grants
            .get(&role)
            .is_some_and(|perms| perms.contains(permission))
    }

    /// True iff at least one of `permissions` is held. False for an empty list.
    pub fn has_any(&self, role: Role, permissions: &[Permission]) -> bool {
        permissions.iter().any(|p| self.has_permission(role, p))
    }

    /// True iff every one of `permissions` is held. True for an empty list.
    pub fn has_all(&self, role: Role, permissions: &[Permission]) -> bool {
        permissions.iter().all(|p| self.has_permission(role, p))
    }

    /// Check totality, non-emptiness and monotonic escalation.
    pub fn validate(&self) -> DomainResult<()> {
        for role in Role::ALL {
            match self.grants.get(&role) {
                None => {
                    return Err(DomainError::invariant(format!(
                        "role '{role}' has no entry in the permission matrix"
                    )));
                }
                Some(perms) if perms.is_empty() => {
                    return Err(DomainError::invariant(format!(
                        "role '{role}' maps to an empty permission set"
                    )));
                }
                Some(_) => {}
            }
        }

        for pair in Role::ALL.windows(2) {
            let (lower, higher) = (pair[0], pair[1]);
            if let Some(missing) = self
                .permissions_for(lower)
                .find(|p| !self.has_permission(higher, p))
            {
                return Err(DomainError::invariant(format!(
                    "role '{higher}' lacks permission '{missing}' held by '{lower}'"
                )));
            }
        }

        Ok(())
    }
}

fn role_grants(role: Role) -> Vec<Permission> {
    match role {
        Role::User => user_grants(),
        Role::Dispatcher => dispatcher_grants(),
        Role::Admin => admin_grants(),
    }
}

fn user_grants() -> Vec<Permission> {
    vec![
        Permission::VIEW_OWN_ENTRIES,
        Permission::CREATE_ENTRIES,
        Permission::EDIT_OWN_ENTRIES,
        Permission::VIEW_OWN_REPORTS,
        Permission::USE_CHAT,
    ]
}

fn dispatcher_grants() -> Vec<Permission> {
    let mut grants = user_grants();
    grants.extend([
        Permission::VIEW_ALL_USERS,
        Permission::MANAGE_USERS,
        Permission::VIEW_ALL_ENTRIES,
        Permission::EDIT_ALL_ENTRIES,
        Permission::VIEW_REPORTS,
        Permission::EXPORT_REPORTS,
        Permission::SEND_SMS,
    ]);
    grants
}

fn admin_grants() -> Vec<Permission> {
    let mut grants = dispatcher_grants();
    grants.extend([
        Permission::DELETE_USERS,
        Permission::MANAGE_ROLES,
        Permission::DELETE_ENTRIES,
        Permission::MANAGE_SETTINGS,
        Permission::VIEW_AUDIT_LOG,
    ]);
    grants
}

/// `has_permission` against the standard matrix.
pub fn has_permission(role: Role, permission: &Permission) -> bool {
    PermissionMatrix::standard().has_permission(role, permission)
}

/// `has_any` against the standard matrix.
pub fn has_any(role: Role, permissions: &[Permission]) -> bool {
    PermissionMatrix::standard().has_any(role, permissions)
}

/// `has_all` against the standard matrix.
pub fn has_all(role: Role, permissions: &[Permission]) -> bool {
    PermissionMatrix::standard().has_all(role, permissions)
}

/// Permission check for a role name that has not been parsed yet.
///
/// Unknown role names (including the UI-only `client`) hold nothing.
pub fn role_has_permission(role: &str, permission: &Permission) -> bool {
    match role.parse::<Role>() {
        Ok(role) => has_permission(role, permission),
        Err(err) => {
            tracing::debug!(%err, permission = %permission, "denying permission to unknown role");
            false
        }
    }
}
