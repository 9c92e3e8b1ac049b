use chrono::{NaiveDateTime, SecondsFormat};
use salvo::http::StatusCode;
use salvo::oapi::{self, EndpointOutRegister, ToSchema};
use salvo::prelude::*;
use serde::Serialize;

use crate::core::entities::models::{Room, RoomSettings};

#[derive(Debug, Serialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomResponse {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub owner_id: String,
    pub is_public: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_participants: Option<i32>,
    pub current_participants: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    pub settings: RoomSettingsResponse,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomSettingsResponse {
    pub allow_guests: bool,
    pub require_approval: bool,
    pub auto_start: bool,
}

impl From<RoomSettings> for RoomSettingsResponse {
    fn from(settings: RoomSettings) -> Self {
        Self {
            allow_guests: settings.allow_guests,
            require_approval: settings.require_approval,
            auto_start: settings.auto_start,
        }
    }
}

/// RFC 3339 in UTC with millisecond precision, e.g. `2025-01-31T18:04:05.120Z`.
pub fn format_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp
        .and_utc()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl From<Room> for RoomResponse {
    fn from(room: Room) -> Self {
        let settings = room.settings().into();

        Self {
            id: room.id,
            name: room.name,
            description: room.description,
            owner_id: room.owner_id,
            is_public: room.is_public,
            max_participants: room.max_participants,
            current_participants: room.current_participants,
            video_url: room.video_url,
            settings,
            created_at: format_timestamp(room.created_at),
            updated_at: format_timestamp(room.updated_at),
        }
    }
}

#[async_trait]
impl Writer for RoomResponse {
    async fn write(self, _req: &mut Request, _depot: &mut Depot, res: &mut Response) {
        res.status_code(StatusCode::OK);
        res.render(Json(self));
    }
}

impl EndpointOutRegister for RoomResponse {
    fn register(components: &mut oapi::Components, operation: &mut oapi::Operation) {
        operation.responses.insert(
            StatusCode::OK.as_str(),
            oapi::Response::new("OK")
                .add_content("application/json", RoomResponse::to_schema(components)),
        );
    }
}

/// A freshly created room, rendered with `201 Created`.
#[derive(Debug, Clone)]
pub struct CreatedRoomResponse(pub RoomResponse);

#[async_trait]
impl Writer for CreatedRoomResponse {
    async fn write(self, _req: &mut Request, _depot: &mut Depot, res: &mut Response) {
        res.status_code(StatusCode::CREATED);
        res.render(Json(self.0));
    }
}

impl EndpointOutRegister for CreatedRoomResponse {
    fn register(components: &mut oapi::Components, operation: &mut oapi::Operation) {
        operation.responses.insert(
            StatusCode::CREATED.as_str(),
            oapi::Response::new("Created")
                .add_content("application/json", RoomResponse::to_schema(components)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn sample_room() -> Room {
        let created = DateTime::from_timestamp(1_700_000_000, 120_000_000)
            .unwrap()
            .naive_utc();
        Room {
            id: "V1StGXR8_Z5jdHi6B-myT".to_string(),
            name: "Movie Night".to_string(),
            description: None,
            owner_id: "user-1".to_string(),
            is_public: false,
            max_participants: Some(4),
            current_participants: 1,
            video_url: Some("https://example.com/film.mp4".to_string()),
            allow_guests: true,
            require_approval: false,
            auto_start: true,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_timestamps_are_display_ready() {
        let response = RoomResponse::from(sample_room());
        assert_eq!(response.created_at, "2023-11-14T22:13:20.120Z");
        assert_eq!(response.updated_at, response.created_at);
    }

    #[test]
    fn test_serializes_camel_case_with_nested_settings() {
        let json = serde_json::to_value(RoomResponse::from(sample_room())).unwrap();

        assert_eq!(json["ownerId"], "user-1");
        assert_eq!(json["isPublic"], false);
        assert_eq!(json["maxParticipants"], 4);
        assert_eq!(json["currentParticipants"], 1);
        assert_eq!(json["videoUrl"], "https://example.com/film.mp4");
        assert_eq!(json["settings"]["allowGuests"], true);
        assert_eq!(json["settings"]["requireApproval"], false);
        assert_eq!(json["settings"]["autoStart"], true);
        assert!(json.get("description").is_none());
    }
}
