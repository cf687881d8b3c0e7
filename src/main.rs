mod config;
mod errors;
mod feeds;
mod report;
mod server;
mod state;
mod strategy;

use crate::config::{AppConfig, StrategyConfig};
use crate::errors::{CondorError, CondorResult};
use crate::feeds::MarketDataSource;
use crate::state::{AppState, CalculationRequest, ComparisonRequest};
use std::sync::Arc;

const USAGE: &str = "usage: condor_strikes [calc|compare|info|serve]";

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout carries only the rendered report
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mode = std::env::args().nth(1).unwrap_or_else(|| "calc".to_string());

    let cfg = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("config error: {e}");
            std::process::exit(1);
        }
    };
    let strategy_cfg = StrategyConfig::default();

    let source = match feeds::from_config(&cfg) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("data source error: {e}");
            std::process::exit(1);
        }
    };

    let result = match mode.as_str() {
        "calc" => run_calc(&cfg, &strategy_cfg, source.as_ref()).await,
        "compare" => run_compare(&cfg, &strategy_cfg, source.as_ref()).await,
        "info" => {
            print!("{}", report::render_system_info(&strategy_cfg, &cfg));
            Ok(())
        }
        "serve" => run_server(cfg, strategy_cfg, source).await,
        other => Err(CondorError::Config(format!("unknown mode '{other}'; {USAGE}"))),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "calculation failed");
        std::process::exit(1);
    }
}

/// One calculation using the request parameters from the environment.
async fn run_calc(
    cfg: &AppConfig,
    strategy_cfg: &StrategyConfig,
    source: &dyn MarketDataSource,
) -> CondorResult<()> {
    let request = CalculationRequest {
        wing_width: cfg.wing_width,
        horizon: Some(cfg.horizon.clone()),
        buffer_points: Some(cfg.buffer_points),
        target_date: cfg.target_date.clone(),
    };

    let calc =
        strategy::calculate_from_source(source, &request, strategy_cfg, strategy::today_utc())
            .await?;
    print!("{}", report::render_calculation(&calc));
    Ok(())
}

async fn run_compare(
    cfg: &AppConfig,
    strategy_cfg: &StrategyConfig,
    source: &dyn MarketDataSource,
) -> CondorResult<()> {
    let request = ComparisonRequest {
        horizon: Some(cfg.horizon.clone()),
        buffer_points: Some(cfg.buffer_points),
    };

    let (snapshot, rows) = strategy::compare_from_source(source, &request, strategy_cfg).await?;
    print!("{}", report::render_comparison(&snapshot, &rows));
    Ok(())
}

async fn run_server(
    cfg: AppConfig,
    strategy_cfg: StrategyConfig,
    source: Arc<dyn MarketDataSource>,
) -> CondorResult<()> {
    let port = cfg.server_port;
    let app_state = AppState::new(cfg, strategy_cfg, source);

    let app = axum::Router::new()
        .route("/api/condor", axum::routing::get(server::routes::get_condor))
        .route("/api/compare", axum::routing::get(server::routes::get_compare))
        .route("/api/config", axum::routing::get(server::routes::get_config))
        .route("/api/counters", axum::routing::get(server::routes::get_counters))
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .with_state(app_state);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| CondorError::Config(format!("bind {addr}: {e}")))?;

    tracing::info!("server listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| CondorError::Network(format!("server: {e}")))
}
