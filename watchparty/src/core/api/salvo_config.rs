use salvo::{
    catcher::Catcher,
    cors::{Any, Cors},
    http::Method,
    oapi::{
        Info, License, SecurityRequirement, SecurityScheme,
        security::{Http, HttpAuthScheme},
    },
    prelude::*,
    rate_limiter::{BasicQuota, FixedGuard, MokaStore, RateLimiter, RemoteIpIssuer},
};
use tracing::error;

use crate::{
    core::{
        database::db::{DbPool, establish_connection},
        env::app_env::AppEnv,
        types::responses::failed_response::FailedResponse,
        utils::jwt_utils::JwtUtils,
    },
    features::{
        room::{repository::RoomRepositoryImpl, router::get_room_router, service::RoomServiceImpl},
        user::{
            repository::UserRepositoryImpl, router::get_user_router, service::UserServiceImpl,
        },
    },
};

#[endpoint(tags("system"))]
async fn health_check(res: &mut Response) {
    res.render("Watch party room service is running");
}

#[handler]
async fn set_services(depot: &mut Depot, res: &mut Response, ctrl: &mut FlowCtrl) {
    let Ok(pool) = depot.obtain::<DbConnection>() else {
        error!("DbConnection is not registered in the request depot");
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        res.render(Json(FailedResponse {
            message: "Internal server error".to_string(),
        }));
        ctrl.skip_rest();
        return;
    };

    let room_repository = RoomRepositoryImpl::new(pool.0.clone());
    let room_service = RoomServiceImpl::new(room_repository);

    let user_repository = UserRepositoryImpl::new(pool.0.clone());
    let user_service = UserServiceImpl::new(user_repository);

    depot.inject(room_service);
    depot.inject(user_service);
}

pub fn get_salvo_service(env: &AppEnv) -> Service {
    let pool = establish_connection(env);

    let limiter = RateLimiter::new(
        FixedGuard::new(),
        MokaStore::new(),
        RemoteIpIssuer,
        BasicQuota::per_second(env.rate_limit_per_second),
    );

    let cors = Cors::new()
        .allow_origin(Any)
        .allow_methods(vec![
            Method::GET,
            Method::POST,
            Method::DELETE,
            Method::PUT,
            Method::OPTIONS,
        ])
        .allow_headers(vec!["Authorization", "Content-Type"])
        .into_handler();

    let router = Router::new()
        .hoop(limiter)
        .push(api_router(env, DbConnection(pool)));

    let doc_info = Info::new("Watch Party Room Service API", "1.0.0")
        .description("Create, share and join watch-together rooms.")
        .license(License::new("Apache-2.0"));
    let http_auth_schema = Http::new(HttpAuthScheme::Bearer)
        .bearer_format("JWT")
        .description("jsonwebtoken");
    let security_scheme = SecurityScheme::Http(http_auth_schema);
    let security_requirement = SecurityRequirement::new("BearerAuth", ["*"]);
    let doc = OpenApi::new("Watch Party Room Service API", "1.0.0")
        .info(doc_info)
        .add_security_scheme("BearerAuth", security_scheme)
        .security([security_requirement])
        .merge_router(&router);

    let router = Router::new()
        .push(doc.into_router("/api-doc/openapi.json"))
        .push(SwaggerUi::new("/api-doc/openapi.json").into_router("docs"))
        .push(router);

    Service::new(router)
        .hoop(cors)
        .catcher(Catcher::default().hoop(handle404))
}

fn api_router(env: &AppEnv, db_connection: DbConnection) -> Router {
    let jwt_utils = JwtUtils::new(env.clone());

    let health_router = Router::new().path("health-check").get(health_check);
    let room_router = get_room_router(jwt_utils.clone());
    let user_router = get_user_router(jwt_utils.clone());

    Router::with_path(env.api_prefix.clone())
        .hoop(Logger::new())
        .hoop(affix_state::inject(db_connection))
        .hoop(affix_state::inject(jwt_utils))
        .hoop(CatchPanic::new())
        .hoop(CachingHeaders::new())
        .hoop(Compression::new().min_length(1024))
        .hoop(set_services)
        .push(room_router)
        .push(user_router)
        .push(health_router)
}

#[handler]
async fn handle404(res: &mut Response, ctrl: &mut FlowCtrl) {
    if StatusCode::NOT_FOUND == res.status_code.unwrap_or(StatusCode::NOT_FOUND) {
        res.render(Json(FailedResponse {
            message: "Not Found".to_string(),
        }));
        ctrl.skip_rest();
    }
}

#[derive(Debug, Clone)]
pub struct DbConnection(pub DbPool);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::env::app_env::{DbUri, JwtConfig};
    use diesel::{
        PgConnection,
        r2d2::{ConnectionManager, Pool},
    };
    use salvo::test::{ResponseExt, TestClient};

    fn test_env() -> AppEnv {
        AppEnv {
            app_port: 0,
            api_prefix: "api".to_string(),
            db_uri: DbUri("postgres://localhost:1/unused".to_string()),
            db_max_connections: 1,
            jwt: JwtConfig {
                jwt_token: "secret".to_string(),
                token_expires_in_seconds: 3600,
            },
            rate_limit_per_second: 1000,
        }
    }

    // Lazily connecting pool: none of these routes reach the database.
    fn test_service() -> Service {
        let manager = ConnectionManager::<PgConnection>::new("postgres://localhost:1/unused");
        let pool = Pool::builder().build_unchecked(manager);

        Service::new(Router::new().push(api_router(&test_env(), DbConnection(pool))))
            .catcher(Catcher::default().hoop(handle404))
    }

    #[tokio::test]
    async fn test_health_check() {
        let service = test_service();

        let mut res = TestClient::get("http://127.0.0.1:5800/api/health-check")
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(
            res.take_string().await.unwrap(),
            "Watch party room service is running"
        );
    }

    #[tokio::test]
    async fn test_protected_routes_require_token() {
        let service = test_service();

        let res = TestClient::post("http://127.0.0.1:5800/api/rooms")
            .json(&serde_json::json!({ "name": "Movie Night" }))
            .send(&service)
            .await;
        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        let res = TestClient::get("http://127.0.0.1:5800/api/users/me")
            .send(&service)
            .await;
        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
    }

    fn token_for(id: &str) -> String {
        JwtUtils::new(test_env())
            .generate_token(&crate::core::types::identity::Identity {
                id: id.to_string(),
                email: format!("{id}@example.com"),
            })
            .unwrap()
    }

    #[tokio::test]
    async fn test_profile_update_requires_token() {
        let service = test_service();

        let res = TestClient::put("http://127.0.0.1:5800/api/users/me")
            .json(&serde_json::json!({ "profile": { "displayName": "Alice" } }))
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn test_profile_update_without_profile_is_bad_request() {
        let service = test_service();

        let mut res = TestClient::put("http://127.0.0.1:5800/api/users/me")
            .bearer_auth(token_for("alice"))
            .json(&serde_json::json!({}))
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        let body: serde_json::Value = res.take_json().await.unwrap();
        assert_eq!(body["message"], "Invalid profile data");
    }

    #[tokio::test]
    async fn test_profile_update_with_non_object_profile_is_bad_request() {
        let service = test_service();

        let res = TestClient::put("http://127.0.0.1:5800/api/users/me")
            .bearer_auth(token_for("alice"))
            .json(&serde_json::json!({ "profile": 5 }))
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn test_malformed_room_id_is_rejected_before_the_store() {
        let service = test_service();
        let res = TestClient::get("http://127.0.0.1:5800/api/rooms/not-a-room")
            .bearer_auth(token_for("alice"))
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let service = test_service();

        let res = TestClient::get("http://127.0.0.1:5800/nowhere")
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }
}
