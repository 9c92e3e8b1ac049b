use salvo::http::StatusCode;
use salvo::oapi::{self, EndpointOutRegister, ToSchema};
use salvo::prelude::*;
use serde::Serialize;

use crate::core::entities::models::User;

use super::room_response::format_timestamp;

#[derive(Debug, Serialize, ToSchema, Clone, PartialEq)]
pub struct PreferencesResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferences: Option<PreferencesResponse>,
}

#[derive(Debug, Serialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
#[salvo(schema(example = json!(
    {
        "id": "alice",
        "email": "alice@example.com",
        "profile": {
            "displayName": "Alice",
            "preferences": { "theme": "dark" }
        },
        "createdAt": "2025-06-01T12:00:00.000Z",
        "updatedAt": "2025-06-02T08:30:00.000Z",
        "lastLoginAt": "2025-06-02T08:30:00.000Z"
    }
)))]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileResponse>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let preferences = (user.theme.is_some() || user.notifications.is_some()).then(|| {
            PreferencesResponse {
                theme: user.theme,
                notifications: user.notifications,
            }
        });

        let profile = (user.display_name.is_some() || user.bio.is_some() || preferences.is_some())
            .then(|| ProfileResponse {
                display_name: user.display_name,
                bio: user.bio,
                preferences,
            });

        Self {
            id: user.id,
            email: user.email,
            profile,
            created_at: format_timestamp(user.created_at),
            updated_at: format_timestamp(user.updated_at),
            last_login_at: user.last_login_at.map(format_timestamp),
        }
    }
}

#[async_trait]
impl Writer for UserResponse {
    async fn write(self, _req: &mut Request, _depot: &mut Depot, res: &mut Response) {
        res.status_code(StatusCode::OK);
        res.render(Json(self));
    }
}

impl EndpointOutRegister for UserResponse {
    fn register(components: &mut oapi::Components, operation: &mut oapi::Operation) {
        operation.responses.insert(
            StatusCode::OK.as_str(),
            oapi::Response::new("OK")
                .add_content("application/json", UserResponse::to_schema(components)),
        );
    }
}

#[derive(Debug, Serialize, ToSchema, Clone, PartialEq)]
#[salvo(schema(example = json!({"success": true, "message": "Profile updated"})))]
pub struct ProfileUpdatedResponse {
    pub success: bool,
    pub message: String,
}

impl Default for ProfileUpdatedResponse {
    fn default() -> Self {
        Self {
            success: true,
            message: "Profile updated".to_string(),
        }
    }
}

#[async_trait]
impl Writer for ProfileUpdatedResponse {
    async fn write(self, _req: &mut Request, _depot: &mut Depot, res: &mut Response) {
        res.status_code(StatusCode::OK);
        res.render(Json(self));
    }
}

impl EndpointOutRegister for ProfileUpdatedResponse {
    fn register(components: &mut oapi::Components, operation: &mut oapi::Operation) {
        operation.responses.insert(
            StatusCode::OK.as_str(),
            oapi::Response::new("OK").add_content(
                "application/json",
                ProfileUpdatedResponse::to_schema(components),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn user() -> User {
        let at = DateTime::from_timestamp(1_748_779_200, 0).unwrap().naive_utc();
        User {
            id: "alice".to_string(),
            email: "alice@example.com".to_string(),
            display_name: None,
            bio: None,
            theme: None,
            notifications: None,
            created_at: at,
            updated_at: at,
            last_login_at: None,
        }
    }

    #[test]
    fn test_user_without_profile_omits_it() {
        let body = serde_json::to_value(UserResponse::from(user())).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "id": "alice",
                "email": "alice@example.com",
                "createdAt": "2025-06-01T12:00:00.000Z",
                "updatedAt": "2025-06-01T12:00:00.000Z"
            })
        );
    }

    #[test]
    fn test_profile_nests_preferences() {
        let user = User {
            display_name: Some("Alice".to_string()),
            notifications: Some(false),
            ..user()
        };

        let body = serde_json::to_value(UserResponse::from(user)).unwrap();

        assert_eq!(
            body["profile"],
            serde_json::json!({
                "displayName": "Alice",
                "preferences": { "notifications": false }
            })
        );
    }
}
