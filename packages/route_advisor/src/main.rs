use std::process::ExitCode;
use std::sync::Arc;

use axum::serve;
use route_advisor::api::{AppState, app};
use route_advisor::common::config::ServerConfig;
use route_advisor::loading::network::load_network;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "unable to listen for shutdown signal");
    }
    info!("shutting down");
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let graph = match load_network(config.network_path.as_deref()) {
        Ok(graph) => graph,
        Err(err) => {
            error!(error = %err, "unable to load road network");
            return ExitCode::FAILURE;
        }
    };

    if config.costs.is_risk_clamped(&graph) {
        warn!(
            configured = config.costs.average_risk(),
            used = graph.min_risk(),
            "average risk exceeds the lowest road risk, using the lower value"
        );
    }

    let state = AppState {
        graph: Arc::new(graph),
        costs: config.costs,
    };

    let listener = match tokio::net::TcpListener::bind(&config.addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(addr = %config.addr, error = %err, "unable to bind");
            return ExitCode::FAILURE;
        }
    };
    info!(addr = %config.addr, "route advisor listening");

    if let Err(err) = serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %err, "server error");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
