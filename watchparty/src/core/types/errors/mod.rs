use salvo::oapi::ToSchema;
use serde::Serialize;

pub mod general;
pub mod room_error;
pub mod user_error;

#[derive(Debug, ToSchema, Serialize)]
#[salvo(schema(example = json!({"message": ""})))]
struct NotFoundError {
    message: String,
}

#[derive(Debug, ToSchema, Serialize)]
#[salvo(schema(example = json!({"message": ""})))]
struct BadRequestError {
    message: String,
}

#[derive(Debug, ToSchema, Serialize)]
#[salvo(schema(example = json!({"message": ""})))]
struct UnauthorizedError {
    message: String,
}

#[derive(Debug, ToSchema, Serialize)]
#[salvo(schema(example = json!({"message": ""})))]
struct ForbiddenError {
    message: String,
}

#[derive(Debug, ToSchema, Serialize)]
#[salvo(schema(example = json!({"message": "Internal server error"})))]
struct InternalError {
    message: String,
}
