//! Inline enforcement: toggles local visibility, never navigates.

use timeportal_auth::{Permission, PermissionMatrix};

use crate::state::AuthState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Still loading; render nothing at all.
    Nothing,
    Fallback,
    Children,
}

/// A conditional-render gate.
///
/// With no permissions configured the gate is a pass-through for any
/// signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionGate {
    permissions: Vec<Permission>,
    require_all: bool,
}

impl PermissionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn permission(mut self, permission: Permission) -> Self {
        self.permissions.push(permission);
        self
    }

    pub fn permissions(mut self, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.permissions.extend(permissions);
        self
    }

    /// Require every listed permission instead of any one.
    pub fn require_all(mut self, require_all: bool) -> Self {
        self.require_all = require_all;
        self
    }

    pub fn evaluate(&self, state: &AuthState) -> GateDecision {
        if state.is_loading {
            return GateDecision::Nothing;
        }
        let Some(role) = state.role() else {
            return GateDecision::Fallback;
        };
        if self.permissions.is_empty() {
            return GateDecision::Children;
        }

        let matrix = PermissionMatrix::standard();
        let allowed = if self.require_all {
            matrix.has_all(role, &self.permissions)
        } else {
            matrix.has_any(role, &self.permissions)
        };

        if allowed {
            GateDecision::Children
        } else {
            GateDecision::Fallback
        }
    }

    pub fn shows_children(&self, state: &AuthState) -> bool {
        self.evaluate(state) == GateDecision::Children
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timeportal_auth::{Credential, Role, UserRecord};

    fn signed_in(role: Role) -> AuthState {
        AuthState::authenticated(Credential::new(
            "h.p.s",
            UserRecord {
                id: "1".to_string(),
                name: "Jo".to_string(),
                email: "jo@example.com".to_string(),
                role,
            },
        ))
    }

    #[test]
    fn nothing_while_loading() {
        let gate = PermissionGate::new().permission(Permission::USE_CHAT);
        assert_eq!(gate.evaluate(&AuthState::loading()), GateDecision::Nothing);
    }

    #[test]
    fn fallback_without_user() {
        assert_eq!(
            PermissionGate::new().evaluate(&AuthState::signed_out()),
            GateDecision::Fallback
        );
    }

    #[test]
    fn unguarded_gate_passes_through() {
        assert_eq!(
            PermissionGate::new().evaluate(&signed_in(Role::User)),
            GateDecision::Children
        );
    }

    #[test]
    fn user_cannot_see_user_directory() {
        let gate = PermissionGate::new().permission(Permission::VIEW_ALL_USERS);
        assert_eq!(gate.evaluate(&signed_in(Role::User)), GateDecision::Fallback);
    }

    #[test]
    fn dispatcher_sees_user_management() {
        let gate = PermissionGate::new().permission(Permission::MANAGE_USERS);
        assert_eq!(gate.evaluate(&signed_in(Role::Dispatcher)), GateDecision::Children);
    }

    #[test]
    fn require_all_versus_any() {
        let perms = [Permission::MANAGE_USERS, Permission::DELETE_USERS];
        let any = PermissionGate::new().permissions(perms.clone());
        let all = PermissionGate::new().permissions(perms).require_all(true);

        assert!(any.shows_children(&signed_in(Role::Dispatcher)));
        assert!(!all.shows_children(&signed_in(Role::Dispatcher)));
        assert!(all.shows_children(&signed_in(Role::Admin)));
    }
}
