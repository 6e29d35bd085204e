use std::sync::Arc;

use chess_trainer_core::{StockfishEngine, TrainerConfig, TrainingSession};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod routes;

pub struct AppState<G> {
    pub session: TrainingSession<G>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match TrainerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };
    let bind = config.bind.clone();

    let session = match TrainingSession::<StockfishEngine>::start(config) {
        Ok(session) => session,
        Err(e) => {
            error!(error = %e, "cannot start training session");
            std::process::exit(1);
        }
    };

    let state = Arc::new(AppState { session });
    let app = routes::router(Arc::clone(&state));

    let listener = match tokio::net::TcpListener::bind(&bind).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, %bind, "failed to bind");
            std::process::exit(1);
        }
    };
    info!("Server running at http://{}", bind);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "server error");
    }

    state.session.shutdown().await;
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
