use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};

use crate::core::{
    dtos::{
        common::room_filter_dto::RoomFilterDto,
        room::{create_room_dto::CreateRoomDto, update_room_dto::UpdateRoomDto},
    },
    types::{
        errors::{general::GeneralError, room_error::RoomError},
        identity::Identity,
        responses::{
            confirmation_response::ConfirmationResponse,
            list_room_response::ListRoomResponse,
            room_response::{CreatedRoomResponse, RoomResponse},
        },
    },
    utils::jwt_utils::JwtUtils,
};

use super::service::{DefaultRoomService, RoomService};

pub fn get_room_router(jwt_utils: JwtUtils) -> Router {
    let public_router = Router::with_hoop(jwt_utils.optional_auth_middleware()).get(get_rooms);

    let protected_router = Router::with_hoop(jwt_utils.auth_middleware())
        .post(create_room)
        .push(
            Router::with_path("{room_id}")
                .get(get_room_by_id)
                .put(update_room)
                .delete(delete_room),
        )
        .push(Router::with_path("{room_id}/join").post(join_room))
        .push(Router::with_path("{room_id}/leave").post(leave_room));

    Router::with_path("rooms")
        .push(public_router)
        .push(protected_router)
}

pub(crate) fn room_service(depot: &Depot) -> Result<&DefaultRoomService, RoomError> {
    depot
        .obtain::<DefaultRoomService>()
        .map_err(|_| GeneralError::MissingState("RoomService".to_string()).into())
}

pub(crate) fn caller(depot: &Depot) -> Result<Identity, RoomError> {
    Identity::from_depot(depot)
        .cloned()
        .ok_or(RoomError::Unauthenticated)
}

/// Lists public rooms, plus the caller's own private rooms when a valid
/// token is supplied.
#[endpoint(tags("room"), status_codes(200, 400, 500))]
async fn get_rooms(
    _res: &mut Response,
    filter: RoomFilterDto,
    depot: &mut Depot,
) -> Result<ListRoomResponse, RoomError> {
    let room_service = room_service(depot)?;
    let viewer = Identity::from_depot(depot);

    let rooms = room_service.get_rooms(filter, viewer).await?;

    Ok(rooms)
}

/// Creates a new room owned by the caller
#[endpoint(tags("room"), status_codes(201, 400, 401, 500))]
async fn create_room(
    _res: &mut Response,
    data: JsonBody<CreateRoomDto>,
    depot: &mut Depot,
) -> Result<CreatedRoomResponse, RoomError> {
    let room_service = room_service(depot)?;
    let caller = caller(depot)?;

    let room = room_service.create_room(data.0, &caller).await?;

    Ok(CreatedRoomResponse(room))
}

/// Fetches a room by id
#[endpoint(tags("room"), status_codes(200, 400, 401, 403, 404, 500))]
async fn get_room_by_id(
    _res: &mut Response,
    room_id: PathParam<String>,
    depot: &mut Depot,
) -> Result<RoomResponse, RoomError> {
    let room_service = room_service(depot)?;
    let caller = caller(depot)?;

    let room = room_service
        .get_room_by_id(&room_id.into_inner(), &caller)
        .await?;

    Ok(room)
}

/// Updates an existing room. Owner only.
#[endpoint(tags("room"), status_codes(200, 400, 401, 403, 404, 500))]
async fn update_room(
    _res: &mut Response,
    room_id: PathParam<String>,
    data: JsonBody<UpdateRoomDto>,
    depot: &mut Depot,
) -> Result<RoomResponse, RoomError> {
    let room_service = room_service(depot)?;
    let caller = caller(depot)?;

    let room = room_service
        .update_room(data.0, &room_id.into_inner(), &caller)
        .await?;

    Ok(room)
}

/// Deletes a room. Owner only.
#[endpoint(tags("room"), status_codes(200, 400, 401, 403, 404, 500))]
async fn delete_room(
    _res: &mut Response,
    room_id: PathParam<String>,
    depot: &mut Depot,
) -> Result<ConfirmationResponse, RoomError> {
    let room_service = room_service(depot)?;
    let caller = caller(depot)?;

    room_service
        .delete_room(&room_id.into_inner(), &caller)
        .await?;

    Ok(ConfirmationResponse::new("Room deleted successfully"))
}

/// Takes a participant slot in a room
#[endpoint(tags("room"), status_codes(200, 400, 401, 403, 404, 500))]
async fn join_room(
    _res: &mut Response,
    room_id: PathParam<String>,
    depot: &mut Depot,
) -> Result<RoomResponse, RoomError> {
    let room_service = room_service(depot)?;
    let caller = caller(depot)?;

    let room = room_service
        .join_room(&room_id.into_inner(), &caller)
        .await?;

    Ok(room)
}

/// Gives a participant slot back
#[endpoint(tags("room"), status_codes(200, 400, 401, 404, 500))]
async fn leave_room(
    _res: &mut Response,
    room_id: PathParam<String>,
    depot: &mut Depot,
) -> Result<ConfirmationResponse, RoomError> {
    let room_service = room_service(depot)?;
    let caller = caller(depot)?;

    room_service
        .leave_room(&room_id.into_inner(), &caller)
        .await?;

    Ok(ConfirmationResponse::new("Successfully left the room"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_requires_identity() {
        let depot = Depot::new();
        assert_eq!(caller(&depot), Err(RoomError::Unauthenticated));
    }

    #[test]
    fn test_missing_service_is_internal_error() {
        let depot = Depot::new();
        let err = room_service(&depot).err();
        assert_eq!(
            err.map(|e| e.status_code()),
            Some(StatusCode::INTERNAL_SERVER_ERROR)
        );
    }

    #[test]
    fn test_caller_reads_injected_identity() {
        let mut depot = Depot::new();
        let identity = Identity {
            id: "alice".to_string(),
            email: "alice@example.com".to_string(),
        };
        depot.inject(identity.clone());

        assert_eq!(caller(&depot), Ok(identity));
    }
}
