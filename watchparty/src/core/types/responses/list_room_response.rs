use salvo::http::StatusCode;
use salvo::oapi::{self, EndpointOutRegister, ToSchema};
use salvo::prelude::*;
use serde::Serialize;

use super::room_response::RoomResponse;

#[derive(Debug, Serialize, ToSchema, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ListRoomResponse {
    pub rooms: Vec<RoomResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub has_more: bool,
}

#[async_trait]
impl Writer for ListRoomResponse {
    async fn write(self, _req: &mut Request, _depot: &mut Depot, res: &mut Response) {
        res.status_code(StatusCode::OK);
        res.render(Json(self));
    }
}

impl EndpointOutRegister for ListRoomResponse {
    fn register(components: &mut oapi::Components, operation: &mut oapi::Operation) {
        operation.responses.insert(
            StatusCode::OK.as_str(),
            oapi::Response::new("OK")
                .add_content("application/json", ListRoomResponse::to_schema(components)),
        );
    }
}

/// Rooms owned by one user, rendered as a bare JSON array.
#[derive(Debug, Serialize, ToSchema, Clone)]
#[serde(transparent)]
pub struct OwnedRoomsResponse(pub Vec<RoomResponse>);

#[async_trait]
impl Writer for OwnedRoomsResponse {
    async fn write(self, _req: &mut Request, _depot: &mut Depot, res: &mut Response) {
        res.status_code(StatusCode::OK);
        res.render(Json(self));
    }
}

impl EndpointOutRegister for OwnedRoomsResponse {
    fn register(components: &mut oapi::Components, operation: &mut oapi::Operation) {
        operation.responses.insert(
            StatusCode::OK.as_str(),
            oapi::Response::new("OK")
                .add_content("application/json", OwnedRoomsResponse::to_schema(components)),
        );
    }
}
