use salvo::prelude::*;
use tracing_subscriber::EnvFilter;
use watchparty::core::{api::salvo_config::get_salvo_service, env::app_env::AppEnv};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let env = AppEnv::new();
    let http_addr = format!("0.0.0.0:{}", env.app_port);

    let service = get_salvo_service(&env);

    let acceptor = TcpListener::new(http_addr.clone()).bind().await;
    let server = Server::new(acceptor);
    let handle = server.handle();

    // Graceful shutdown handler
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl_c: {}", err);
            return;
        }
        tracing::info!("Signal received, shutting down gracefully...");
        handle.stop_graceful(None);
    });

    tracing::info!("Listening on {}", http_addr);
    server.serve(service).await;

    Ok(())
}
