use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};

use crate::{
    core::{
        dtos::user::update_profile_dto::UpdateProfileDto,
        types::{
            errors::{general::GeneralError, room_error::RoomError, user_error::UserError},
            identity::Identity,
            responses::{
                list_room_response::OwnedRoomsResponse,
                user_response::{ProfileUpdatedResponse, UserResponse},
            },
        },
        utils::jwt_utils::JwtUtils,
    },
    features::room::{
        router::{caller, room_service},
        service::RoomService,
    },
};

use super::service::{DefaultUserService, UserService};

pub fn get_user_router(jwt_utils: JwtUtils) -> Router {
    Router::with_hoop(jwt_utils.auth_middleware())
        .path("users")
        .push(Router::with_path("me").get(get_me).put(update_me))
        .push(Router::with_path("{user_id}/rooms").get(get_rooms_by_owner))
}

fn user_service(depot: &Depot) -> Result<&DefaultUserService, UserError> {
    depot
        .obtain::<DefaultUserService>()
        .map_err(|_| GeneralError::MissingState("UserService".to_string()).into())
}

fn current_user(depot: &Depot) -> Result<Identity, UserError> {
    Identity::from_depot(depot)
        .cloned()
        .ok_or(UserError::Unauthenticated)
}

/// Returns the caller's user record and profile
#[endpoint(tags("user"), status_codes(200, 401, 500))]
async fn get_me(_res: &mut Response, depot: &mut Depot) -> Result<UserResponse, UserError> {
    let user_service = user_service(depot)?;
    let caller = current_user(depot)?;

    let user = user_service.get_me(&caller).await?;

    Ok(user)
}

/// Replaces the caller's profile
#[endpoint(tags("user"), status_codes(200, 400, 401, 404, 500))]
async fn update_me(
    _res: &mut Response,
    data: JsonBody<UpdateProfileDto>,
    depot: &mut Depot,
) -> Result<ProfileUpdatedResponse, UserError> {
    let user_service = user_service(depot)?;
    let caller = current_user(depot)?;

    user_service.update_profile(data.0, &caller).await?;

    Ok(ProfileUpdatedResponse::default())
}

/// Lists every room owned by the caller, newest first
#[endpoint(tags("user"), status_codes(200, 401, 403, 500))]
async fn get_rooms_by_owner(
    _res: &mut Response,
    user_id: PathParam<String>,
    depot: &mut Depot,
) -> Result<OwnedRoomsResponse, RoomError> {
    let room_service = room_service(depot)?;
    let caller = caller(depot)?;

    let rooms = room_service
        .get_rooms_by_owner(&user_id.into_inner(), &caller)
        .await?;

    Ok(OwnedRoomsResponse(rooms))
}
