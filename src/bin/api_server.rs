// src/bin/api_server.rs

use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use karma_tech::transport;
use karma_tech::CommentStore;
use karma_tech::Config;
use karma_tech::KarmaTokenClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Arc::new(Config::from_env()?);

    tracing::info!("connecting to the database");
    let store = Arc::new(CommentStore::connect(&config).await?);

    // The wallet connector is optional: without the chain env vars the
    // service still serves profiles, comments and sessions.
    let chain = match KarmaTokenClient::from_config(&config)? {
        Some(client) => {
            tracing::info!(
                program_id = %client.program_id(),
                mint = %client.mint_address(),
                admin = %client.admin_pubkey(),
                "wallet connector ready"
            );
            Some(Arc::new(client))
        }
        None => {
            tracing::warn!(
                "SOLANA_RPC_URL / KARMA_PROGRAM_ID not set; balance, mint and payout routes will answer 500"
            );
            None
        }
    };

    let app_state = transport::http::AppState {
        store,
        chain,
        config: config.clone(),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let app = transport::http::create_router(app_state)
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()),
        )
        .layer(cors);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "API server listening");
    tracing::info!("Swagger UI available at /swagger-ui");

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received, exiting");
        }
    }

    Ok(())
}
