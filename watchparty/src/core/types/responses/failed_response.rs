use salvo::oapi::ToSchema;
use serde::Serialize;

/// Body rendered by middleware that short-circuits a request.
#[derive(Debug, Serialize, ToSchema)]
pub struct FailedResponse {
    pub message: String,
}
