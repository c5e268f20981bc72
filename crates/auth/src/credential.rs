//! Session credential model and the login service's response shape.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Role;

/// User record issued by the login service.
///
/// Opaque to this engine except for `role`. The service emits `_id`;
/// the persisted form always writes `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Bearer token plus the user it was issued to.
///
/// Replaced wholesale on re-login and deleted wholesale on logout; never
/// mutated field by field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub token: String,
    pub user: UserRecord,
}

impl Credential {
    pub fn new(token: impl Into<String>, user: UserRecord) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    /// Extract the credential from a login response.
    pub fn from_login_response(response: LoginResponse) -> Result<Self, LoginRejected> {
        if !response.success {
            return Err(LoginRejected(
                response
                    .message
                    .unwrap_or_else(|| "login failed".to_string()),
            ));
        }

        match (response.token, response.user) {
            (Some(token), Some(user)) if !token.is_empty() => Ok(Self { token, user }),
            _ => Err(LoginRejected(
                "login response is missing token or user".to_string(),
            )),
        }
    }
}

/// Response body of the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<UserRecord>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("login rejected: {0}")]
pub struct LoginRejected(pub String);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_underscore_id() {
        let user: UserRecord = serde_json::from_value(json!({
            "_id": "64f0c2",
            "name": "Dana",
            "email": "dana@example.com",
            "role": "dispatcher"
        }))
        .unwrap();
        assert_eq!(user.id, "64f0c2");
        assert_eq!(user.role, Role::Dispatcher);

        let persisted = serde_json::to_value(&user).unwrap();
        assert_eq!(persisted["id"], "64f0c2");
        assert!(persisted.get("_id").is_none());
    }

    #[test]
    fn client_role_does_not_parse() {
        let result = serde_json::from_value::<UserRecord>(json!({
            "id": "1",
            "name": "Casey",
            "email": "casey@example.com",
            "role": "client"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn successful_response_yields_credential() {
        let response: LoginResponse = serde_json::from_value(json!({
            "success": true,
            "token": "h.p.s",
            "user": { "id": "7", "name": "Ari", "email": "ari@example.com", "role": "admin" }
        }))
        .unwrap();

        let credential = Credential::from_login_response(response).unwrap();
        assert_eq!(credential.token, "h.p.s");
        assert_eq!(credential.role(), Role::Admin);
    }

    #[test]
    fn unsuccessful_response_is_rejected() {
        let response: LoginResponse = serde_json::from_value(json!({
            "success": false,
            "message": "Invalid credentials"
        }))
        .unwrap();

        let err = Credential::from_login_response(response).unwrap_err();
        assert_eq!(err, LoginRejected("Invalid credentials".to_string()));
    }

    #[test]
    fn success_without_token_is_rejected() {
        let response = LoginResponse {
            success: true,
            token: Some(String::new()),
            user: None,
            message: None,
        };
        assert!(Credential::from_login_response(response).is_err());
    }
}
