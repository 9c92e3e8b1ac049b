use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use salvo::Handler;
use salvo::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::debug;

use crate::core::env::app_env::AppEnv;
use crate::core::types::identity::Identity;
use crate::core::types::responses::failed_response::FailedResponse;

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub id: String,
    #[serde(default)]
    pub email: String,
    pub exp: i64,
}

#[derive(Debug, Clone)]
pub struct JwtUtils {
    secret_key: String,
    token_duration: time::Duration,
}

impl JwtUtils {
    pub fn new(env: AppEnv) -> Self {
        Self {
            secret_key: env.jwt.jwt_token,
            token_duration: time::Duration::seconds(env.jwt.token_expires_in_seconds),
        }
    }

    /// Mints a token for `identity`. Tokens are normally issued by the
    /// identity provider; this is used by tests and local tooling.
    pub fn generate_token(&self, identity: &Identity) -> Result<String, jsonwebtoken::errors::Error> {
        let exp = OffsetDateTime::now_utc() + self.token_duration;

        let claims = JwtClaims {
            id: identity.id.clone(),
            email: identity.email.clone(),
            exp: exp.unix_timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret_key.as_bytes()),
        )
    }

    pub fn decode_token(&self, token: &str) -> Result<JwtClaims, jsonwebtoken::errors::Error> {
        let token_data = decode::<JwtClaims>(
            token,
            &DecodingKey::from_secret(self.secret_key.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    /// Resolves an `Authorization` header value into a caller identity.
    pub fn resolve_identity(&self, header: Option<&str>) -> Result<Identity, &'static str> {
        let header = header.ok_or("Missing bearer token")?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or("Authorization scheme must be Bearer")?
            .trim();

        if token.is_empty() {
            return Err("Missing bearer token");
        }

        let claims = self
            .decode_token(token)
            .map_err(|_| "Failed to decode token")?;

        if claims.id.is_empty() {
            return Err("Token has no subject");
        }

        Ok(Identity {
            id: claims.id,
            email: claims.email,
        })
    }

    /// Rejects the request with 401 unless it carries a valid bearer token.
    pub fn auth_middleware(&self) -> impl Handler {
        #[handler]
        async fn middleware(
            req: &mut Request,
            depot: &mut Depot,
            res: &mut Response,
            ctrl: &mut FlowCtrl,
        ) {
            let header = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok());

            let Ok(jwt_utils) = depot.obtain::<JwtUtils>() else {
                res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
                ctrl.skip_rest();
                return;
            };

            match jwt_utils.resolve_identity(header) {
                Ok(identity) => {
                    depot.inject(identity);
                }
                Err(reason) => {
                    res.status_code(StatusCode::UNAUTHORIZED);
                    res.render(Json(FailedResponse {
                        message: reason.to_string(),
                    }));
                    ctrl.skip_rest();
                }
            }
        }
        middleware
    }

    /// Attaches the caller identity when a valid token is present and lets
    /// anonymous requests through untouched.
    pub fn optional_auth_middleware(&self) -> impl Handler {
        #[handler]
        async fn middleware(req: &mut Request, depot: &mut Depot) {
            let header = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok());

            let identity = match depot.obtain::<JwtUtils>() {
                Ok(jwt_utils) if header.is_some() => jwt_utils.resolve_identity(header),
                _ => return,
            };

            match identity {
                Ok(identity) => {
                    depot.inject(identity);
                }
                Err(reason) => debug!("continuing anonymously: {}", reason),
            }
        }
        middleware
    }
}
