use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub role: String,
}

/// The signed-in user as mirrored under the `user` session key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserRecord {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Parsed outcome of a successful login.
///
/// The auth service has shipped several response shapes, so extraction is
/// tolerant: `access_token` falls back to `token`, `refresh_token` to
/// `refreshToken`, and the username to nested `user` fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AuthSession {
    pub user: UserRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl AuthSession {
    /// Extract a session from whatever the auth endpoint returned, using
    /// `fallback_username` (the submitted login name) as the last resort.
    pub fn from_response(body: &Value, fallback_username: &str) -> Self {
        let token = body
            .get("access_token")
            .or_else(|| body.get("token"))
            .and_then(Value::as_str)
            .map(str::to_string);
        let refresh_token = body
            .get("refresh_token")
            .or_else(|| body.get("refreshToken"))
            .and_then(Value::as_str)
            .map(str::to_string);

        let nested = body.get("user");
        let username = body
            .get("username")
            .and_then(Value::as_str)
            .or_else(|| nested.and_then(|u| u.get("username")).and_then(Value::as_str))
            .or_else(|| nested.and_then(|u| u.get("email")).and_then(Value::as_str))
            .or_else(|| nested.and_then(Value::as_str))
            .unwrap_or(fallback_username)
            .to_string();
        let role = body
            .get("role")
            .and_then(Value::as_str)
            .or_else(|| nested.and_then(|u| u.get("role")).and_then(Value::as_str))
            .map(str::to_string);

        Self {
            user: UserRecord { username, role },
            token,
            refresh_token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extracts_snake_case_tokens() {
        let session = AuthSession::from_response(
            &json!({
                "message": "ok",
                "username": "admin",
                "role": "reviewer",
                "access_token": "at-1",
                "refresh_token": "rt-1"
            }),
            "fallback",
        );
        assert_eq!(session.user.username, "admin");
        assert_eq!(session.user.role.as_deref(), Some("reviewer"));
        assert_eq!(session.token.as_deref(), Some("at-1"));
        assert_eq!(session.refresh_token.as_deref(), Some("rt-1"));
    }

    #[test]
    fn test_falls_back_to_legacy_token_fields() {
        let session = AuthSession::from_response(
            &json!({
                "token": "legacy",
                "refreshToken": "legacy-r",
                "user": { "username": "nested" }
            }),
            "fallback",
        );
        assert_eq!(session.token.as_deref(), Some("legacy"));
        assert_eq!(session.refresh_token.as_deref(), Some("legacy-r"));
        assert_eq!(session.user.username, "nested");
    }

    #[test]
    fn test_uses_submitted_username_as_last_resort() {
        let session = AuthSession::from_response(&json!({ "access_token": "t" }), "typed-in");
        assert_eq!(session.user.username, "typed-in");
        assert!(session.user.role.is_none());
    }
}
