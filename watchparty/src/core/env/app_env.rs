use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct AppEnv {
    pub app_port: u16,
    pub api_prefix: String,
    pub db_uri: DbUri,
    pub db_max_connections: u32,
    pub jwt: JwtConfig,
    pub rate_limit_per_second: usize,
}

#[derive(Debug, Clone)]
pub struct DbUri(pub String);

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub jwt_token: String,
    pub token_expires_in_seconds: i64,
}

impl Default for AppEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl AppEnv {
    pub fn new() -> Self {
        dotenv().ok();

        Self {
            app_port: Self::get_env("APP_PORT", 3000),
            api_prefix: Self::get_str_env("API_PREFIX", "api".to_owned()),
            db_uri: DbUri(env::var("DATABASE_URL").expect("DATABASE_URL must be set")),
            db_max_connections: Self::get_env("DATABASE_MAX_CONNECTIONS", 16),
            jwt: JwtConfig {
                jwt_token: env::var("AUTH_JWT_SECRET").expect("AUTH_JWT_SECRET must be set"),
                token_expires_in_seconds: Self::get_env("AUTH_JWT_TOKEN_EXPIRES_IN", 86_400), // a day
            },
            rate_limit_per_second: Self::get_env("RATE_LIMIT_PER_SECOND", 200),
        }
    }

    fn get_env<T: std::str::FromStr>(var: &str, default: T) -> T {
        env::var(var)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn get_str_env(var: &str, default: String) -> String {
        env::var(var)
            .ok()
            .map(|v| v.trim().trim_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
    }
}
