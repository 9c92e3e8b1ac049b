use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use validator_derive::Validate;

use super::room_settings_dto::RoomSettingsDto;

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate, Clone)]
#[serde(rename_all = "camelCase")]
#[salvo(schema(example = json!(
    {
        "name": "Movie Night",
        "description": "Friday classics",
        "isPublic": true,
        "maxParticipants": 10,
        "videoUrl": "https://example.com/film.mp4",
        "settings": {
            "allowGuests": true,
            "requireApproval": false,
            "autoStart": true
        }
    }
)))]
pub struct CreateRoomDto {
    pub name: String,
    pub description: Option<String>,
    pub is_public: Option<bool>,
    #[validate(range(min = 1, message = "Max participants must be at least 1"))]
    pub max_participants: Option<i32>,
    pub video_url: Option<String>,
    pub settings: Option<RoomSettingsDto>,
}
