//! Entry point for the `wish-gateway` HTTP server.

use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use wish_gateway::{config::Settings, routes::create_router, state::AppState};
use wish_store::WishStore;
use wish_upload::{SignatureCheck, UploadPipeline};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = match Settings::load() {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "refusing to start");
            std::process::exit(1);
        }
    };

    if settings.upload.signature_check == SignatureCheck::Disabled {
        warn!(
            "upload signature check is disabled; uploads are accepted without content inspection"
        );
    }

    let state = AppState::new(
        Arc::new(WishStore::new()),
        Arc::new(UploadPipeline::new(settings.upload)),
        settings.secret.len(),
    );
    let app = create_router(state);

    let listener = match tokio::net::TcpListener::bind(&settings.listen_addr).await {
        Ok(l) => l,
        Err(e) => {
            error!(addr = %settings.listen_addr, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };

    info!(
        addr = %settings.listen_addr,
        max_upload_bytes = settings.upload.max_size,
        "wish-gateway listening"
    );

    if let Err(e) = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await {
        error!(error = %e, "server error");
        std::process::exit(1);
    }
    info!("wish-gateway stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
