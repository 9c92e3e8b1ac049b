use salvo::{Depot, oapi::ToSchema};
use serde::{Deserialize, Serialize};

/// Verified caller, attached to the request by the auth middleware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Identity {
    pub id: String,
    pub email: String,
}

impl Identity {
    pub fn from_depot(depot: &Depot) -> Option<&Identity> {
        depot.obtain::<Identity>().ok()
    }
}
