use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use validator_derive::Validate;

use super::room_settings_dto::RoomSettingsDto;

/// Owner edit of a room. Absent fields are left unchanged.
#[derive(Debug, Serialize, Deserialize, ToSchema, Validate, Clone, Default)]
#[serde(rename_all = "camelCase")]
#[salvo(schema(example = json!(
    {
        "name": "Movie Night (late)",
        "maxParticipants": 12,
        "settings": { "autoStart": false }
    }
)))]
pub struct UpdateRoomDto {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
    #[validate(range(min = 1, message = "Max participants must be at least 1"))]
    pub max_participants: Option<i32>,
    pub video_url: Option<String>,
    pub settings: Option<RoomSettingsDto>,
}
