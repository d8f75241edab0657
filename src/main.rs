use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use chrono::{Local, NaiveDateTime};
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use serde_json::json;
use shopgreen::config::AppConfig;
use shopgreen::directory::{
    directory_router, resolve_availability, Availability, DirectoryService, MemoryFavoriteStore,
    MemoryShopRepository, RawWeeklySchedule, ShopStatus, VerificationTier, WeeklySchedule,
};
use shopgreen::error::AppError;
use shopgreen::telemetry;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "ShopGreen Directory",
    about = "Run the shop directory service or inspect a schedule from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Resolve the display status for an opening-hours file
    Status(StatusArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct StatusArgs {
    /// Opening-hours JSON file in the wire format
    #[arg(long)]
    hours: PathBuf,
    /// Evaluation instant (YYYY-MM-DDTHH:MM), defaults to now
    #[arg(long, value_parser = parse_datetime)]
    at: Option<NaiveDateTime>,
    /// Project the shop as still unverified
    #[arg(long)]
    unverified: bool,
}

#[derive(Debug, Serialize)]
struct StatusReport {
    at: NaiveDateTime,
    tier: VerificationTier,
    status: ShopStatus,
    availability: Availability,
    hours: String,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Status(args) => run_status(args),
    }
}

fn parse_datetime(raw: &str) -> Result<NaiveDateTime, String> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DDTHH:MM ({err})"))
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let repository = Arc::new(MemoryShopRepository::new());
    let favorites = Arc::new(MemoryFavoriteStore::new());
    let service = Arc::new(DirectoryService::new(repository, favorites, config.engine));

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(directory_router(service))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "shop directory service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_status(args: StatusArgs) -> Result<(), AppError> {
    let StatusArgs {
        hours,
        at,
        unverified,
    } = args;

    let contents = std::fs::read_to_string(&hours)?;
    let raw: RawWeeklySchedule = serde_json::from_str(&contents)
        .map_err(|err| AppError::InvalidInput(format!("cannot parse {}: {err}", hours.display())))?;

    let at = at.unwrap_or_else(|| Local::now().naive_local());
    let tier = if unverified {
        VerificationTier::Unverified
    } else {
        VerificationTier::Verified
    };

    let report = build_status_report(&raw, at, tier)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&report)
            .map_err(|err| AppError::InvalidInput(err.to_string()))?
    );
    Ok(())
}

fn build_status_report(
    raw: &RawWeeklySchedule,
    at: NaiveDateTime,
    tier: VerificationTier,
) -> Result<StatusReport, AppError> {
    let schedule = WeeklySchedule::from_raw(raw)
        .map_err(shopgreen::directory::DirectoryServiceError::from)?;

    Ok(StatusReport {
        at,
        tier,
        status: shopgreen::directory::project_status(tier, Some(&schedule), at),
        availability: resolve_availability(&schedule, at),
        hours: schedule.format_for_display(),
    })
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
