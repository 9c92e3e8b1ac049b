use salvo::http::StatusCode;
use salvo::oapi::{self, EndpointOutRegister, ToSchema};
use salvo::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use super::general::GeneralError;

use super::{BadRequestError, ForbiddenError, InternalError, NotFoundError, UnauthorizedError};

#[derive(Debug, Error, ToSchema, Serialize, Clone, PartialEq)]
pub enum RoomError {
    #[error("Invalid room ID: {0}")]
    InvalidRoomId(String),

    #[error("{0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthenticated,

    #[error("{0}")]
    Forbidden(String),

    #[error("Room with ID {0} not found")]
    RoomNotFound(String),

    #[error("Room {0} is full")]
    RoomFull(String),

    #[error("An unexpected error occurred in room: {0}")]
    UnexpectedError(String),

    #[error("General error: {0}")]
    General(#[from] GeneralError),
}

impl RoomError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RoomError::InvalidRoomId(_) | RoomError::Validation(_) | RoomError::RoomFull(_) => {
                StatusCode::BAD_REQUEST
            }
            RoomError::Unauthenticated => StatusCode::UNAUTHORIZED,
            RoomError::Forbidden(_) => StatusCode::FORBIDDEN,
            RoomError::RoomNotFound(_) => StatusCode::NOT_FOUND,
            RoomError::UnexpectedError(_) | RoomError::General(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show to the client. Internal failures are masked.
    pub fn public_message(&self) -> String {
        match self {
            RoomError::UnexpectedError(_) | RoomError::General(_) => {
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for RoomError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let reasons = errs
                    .iter()
                    .map(|err| {
                        err.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| err.code.to_string())
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{field}: {reasons}")
            })
            .collect::<Vec<_>>();
        fields.sort();

        RoomError::Validation(fields.join("; "))
    }
}

#[async_trait]
impl Writer for RoomError {
    async fn write(self, _req: &mut Request, _depot: &mut Depot, res: &mut Response) {
        let status = self.status_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("room request failed: {}", self);
        }

        res.status_code(status);
        res.render(Json(serde_json::json!({ "message": self.public_message() })));
    }
}

impl EndpointOutRegister for RoomError {
    fn register(components: &mut oapi::Components, operation: &mut oapi::Operation) {
        operation.responses.insert(
            StatusCode::BAD_REQUEST.as_str(),
            oapi::Response::new("Invalid input, invalid room id or room is full")
                .add_content("application/json", BadRequestError::to_schema(components)),
        );
        operation.responses.insert(
            StatusCode::UNAUTHORIZED.as_str(),
            oapi::Response::new("Missing or invalid bearer token")
                .add_content("application/json", UnauthorizedError::to_schema(components)),
        );
        operation.responses.insert(
            StatusCode::FORBIDDEN.as_str(),
            oapi::Response::new("Caller is not allowed to access the room")
                .add_content("application/json", ForbiddenError::to_schema(components)),
        );
        operation.responses.insert(
            StatusCode::NOT_FOUND.as_str(),
            oapi::Response::new("Room not found")
                .add_content("application/json", NotFoundError::to_schema(components)),
        );
        operation.responses.insert(
            StatusCode::INTERNAL_SERVER_ERROR.as_str(),
            oapi::Response::new("Unexpected or general error")
                .add_content("application/json", InternalError::to_schema(components)),
        );
    }
}
