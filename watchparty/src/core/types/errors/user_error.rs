use salvo::http::StatusCode;
use salvo::oapi::{self, EndpointOutRegister, ToSchema};
use salvo::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use validator::{ValidationErrors, ValidationErrorsKind};

use super::general::GeneralError;

use super::{BadRequestError, InternalError, NotFoundError, UnauthorizedError};

#[derive(Debug, Error, ToSchema, Serialize, Clone, PartialEq)]
pub enum UserError {
    #[error("{0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthenticated,

    #[error("User not found")]
    UserNotFound(String),

    #[error("An unexpected error occurred in user: {0}")]
    UnexpectedError(String),

    #[error("General error: {0}")]
    General(#[from] GeneralError),
}

impl UserError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            UserError::Validation(_) => StatusCode::BAD_REQUEST,
            UserError::Unauthenticated => StatusCode::UNAUTHORIZED,
            UserError::UserNotFound(_) => StatusCode::NOT_FOUND,
            UserError::UnexpectedError(_) | UserError::General(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn public_message(&self) -> String {
        match self {
            UserError::UnexpectedError(_) | UserError::General(_) => {
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        }
    }
}

// Nested profile fields are reported by path, e.g. `profile.bio`.
fn collect_reasons(prefix: &str, errors: &ValidationErrors, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };

        match kind {
            ValidationErrorsKind::Field(errs) => {
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
                out.push(format!("{path}: {reasons}"));
            }
            ValidationErrorsKind::Struct(inner) => collect_reasons(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_reasons(&format!("{path}[{index}]"), inner, out);
                }
            }
        }
    }
}

impl From<ValidationErrors> for UserError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = Vec::new();
        collect_reasons("", &errors, &mut fields);
        fields.sort();

        UserError::Validation(fields.join("; "))
    }
}

#[async_trait]
impl Writer for UserError {
    async fn write(self, _req: &mut Request, _depot: &mut Depot, res: &mut Response) {
        let status = self.status_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("user request failed: {}", self);
        }

        res.status_code(status);
        res.render(Json(serde_json::json!({ "message": self.public_message() })));
    }
}

impl EndpointOutRegister for UserError {
    fn register(components: &mut oapi::Components, operation: &mut oapi::Operation) {
        operation.responses.insert(
            StatusCode::BAD_REQUEST.as_str(),
            oapi::Response::new("Invalid profile data")
                .add_content("application/json", BadRequestError::to_schema(components)),
        );
        operation.responses.insert(
            StatusCode::UNAUTHORIZED.as_str(),
            oapi::Response::new("Missing or invalid bearer token")
                .add_content("application/json", UnauthorizedError::to_schema(components)),
        );
        operation.responses.insert(
            StatusCode::NOT_FOUND.as_str(),
            oapi::Response::new("User not found")
                .add_content("application/json", NotFoundError::to_schema(components)),
        );
        operation.responses.insert(
            StatusCode::INTERNAL_SERVER_ERROR.as_str(),
            oapi::Response::new("Unexpected or general error")
                .add_content("application/json", InternalError::to_schema(components)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;
    use validator_derive::Validate as DeriveValidate;

    #[derive(DeriveValidate)]
    struct Inner {
        #[validate(length(max = 3, message = "too long"))]
        bio: String,
    }

    #[derive(DeriveValidate)]
    struct Outer {
        #[validate(nested)]
        profile: Inner,
    }

    #[test]
    fn test_status_codes_follow_error_taxonomy() {
        assert_eq!(
            UserError::Validation("profile".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            UserError::Unauthenticated.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            UserError::UserNotFound("alice".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            UserError::from(GeneralError::DbConnectionError).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_does_not_echo_the_user_id() {
        let err = UserError::UserNotFound("alice".into());
        assert_eq!(err.public_message(), "User not found");

        let err = UserError::UnexpectedError("connection reset".into());
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[test]
    fn test_nested_validation_errors_are_reported_by_path() {
        let value = Outer {
            profile: Inner {
                bio: "four".to_string(),
            },
        };

        let err = UserError::from(value.validate().unwrap_err());

        assert_eq!(err, UserError::Validation("profile.bio: too long".into()));
    }
}
