use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Permission identifier.
///
/// Permissions are named capability strings (e.g. `"manage_users"`). The
/// portal's known permissions are available as associated constants; any
/// other name is simply held by no role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub const VIEW_OWN_ENTRIES: Permission = Permission::from_static("view_own_entries");
    pub const CREATE_ENTRIES: Permission = Permission::from_static("create_entries");
    pub const EDIT_OWN_ENTRIES: Permission = Permission::from_static("edit_own_entries");
    pub const VIEW_OWN_REPORTS: Permission = Permission::from_static("view_own_reports");
    pub const USE_CHAT: Permission = Permission::from_static("use_chat");

    pub const VIEW_ALL_USERS: Permission = Permission::from_static("view_all_users");
    pub const MANAGE_USERS: Permission = Permission::from_static("manage_users");
    pub const VIEW_ALL_ENTRIES: Permission = Permission::from_static("view_all_entries");
    pub const EDIT_ALL_ENTRIES: Permission = Permission::from_static("edit_all_entries");
    pub const VIEW_REPORTS: Permission = Permission::from_static("view_reports");
    pub const EXPORT_REPORTS: Permission = Permission::from_static("export_reports");
    pub const SEND_SMS: Permission = Permission::from_static("send_sms");

    pub const DELETE_USERS: Permission = Permission::from_static("delete_users");
    pub const MANAGE_ROLES: Permission = Permission::from_static("manage_roles");
    pub const DELETE_ENTRIES: Permission = Permission::from_static("delete_entries");
    pub const MANAGE_SETTINGS: Permission = Permission::from_static("manage_settings");
    pub const VIEW_AUDIT_LOG: Permission = Permission::from_static("view_audit_log");

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Permission {
    fn from(value: &'static str) -> Self {
        Self::from_static(value)
    }
}

impl From<String> for Permission {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn borrowed_and_owned_compare_equal() {
        assert_eq!(Permission::MANAGE_USERS, Permission::new("manage_users".to_string()));
        assert_eq!(Permission::from("use_chat"), Permission::USE_CHAT);
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&Permission::SEND_SMS).unwrap();
        assert_eq!(json, "\"send_sms\"");
        let back: Permission = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Permission::SEND_SMS);
    }
}
