use std::env;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;

use lexora_backend::core::logging;
use lexora_backend::server::router;
use lexora_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let state = AppState::initialize()?;
    logging::init(&state.paths);

    state.seed_if_empty().await;

    let port = env::var("LEXORA_PORT")
        .or_else(|_| env::var("PORT"))
        .ok()
        .and_then(|val| val.parse::<u16>().ok())
        .unwrap_or(8000);
    let bind_addr = format!("127.0.0.1:{}", port);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    let addr = listener.local_addr()?;
    tracing::info!("Listening on {}", addr);

    let app: Router = router::router(state);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
