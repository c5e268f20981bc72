//! Presentational role badges.

use serde::Serialize;

use crate::Role;

/// Label and CSS classes for a role badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoleBadge {
    pub label: &'static str,
    pub class: &'static str,
}

pub fn role_badge(role: Role) -> RoleBadge {
    match role {
        Role::Admin => RoleBadge {
            label: "Administrator",
            class: "role-badge bg-red-100 text-red-800",
        },
        Role::Dispatcher => RoleBadge {
            label: "Dispatcher",
            class: "role-badge bg-blue-100 text-blue-800",
        },
        Role::User => RoleBadge {
            label: "User",
            class: "role-badge bg-green-100 text-green-800",
        },
    }
}

pub fn role_description(role: Role) -> &'static str {
    match role {
        Role::Admin => "Full access, including user deletion, role management and settings",
        Role::Dispatcher => "Manages users and time entries across the team, exports reports",
        Role::User => "Tracks and edits their own time entries",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_role_has_a_distinct_badge() {
        let labels: std::collections::HashSet<_> =
            Role::ALL.into_iter().map(|r| role_badge(r).label).collect();
        assert_eq!(labels.len(), Role::ALL.len());
    }

    #[test]
    fn admin_badge() {
        let badge = role_badge(Role::Admin);
        assert_eq!(badge.label, "Administrator");
        assert!(badge.class.starts_with("role-badge"));
    }
}
