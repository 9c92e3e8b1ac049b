use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use validator_derive::Validate;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    System,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, Default, PartialEq)]
pub struct PreferencesDto {
    pub theme: Option<Theme>,
    pub notifications: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDto {
    #[validate(length(max = 100, message = "Display name must be at most 100 characters"))]
    pub display_name: Option<String>,
    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    pub bio: Option<String>,
    pub preferences: Option<PreferencesDto>,
}

/// Replaces the caller's profile. A missing or null `profile` is rejected.
#[derive(Debug, Serialize, Deserialize, ToSchema, Validate, Clone, Default)]
#[salvo(schema(example = json!(
    {
        "profile": {
            "displayName": "Alice",
            "bio": "Horror movies only",
            "preferences": { "theme": "dark", "notifications": true }
        }
    }
)))]
pub struct UpdateProfileDto {
    #[validate(nested)]
    pub profile: Option<ProfileDto>,
}
