use axum::{
    Router,
    extract::{
        Json, Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;

use crate::core::{
    CombinedSeries, DerivedSummary, ParameterField, Scenario, ScenarioParameters, ScenarioStore,
    StoreError, StoreMode, derived_summary, limits, project,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliMode {
    Single,
    Quadrant,
}

impl From<CliMode> for StoreMode {
    fn from(value: CliMode) -> Self {
        match value {
            CliMode::Single => StoreMode::Single,
            CliMode::Quadrant => StoreMode::Quadrant,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiMode {
    Single,
    #[serde(alias = "quadrants", alias = "four")]
    Quadrant,
}

impl From<ApiMode> for CliMode {
    fn from(value: ApiMode) -> Self {
        match value {
            ApiMode::Single => CliMode::Single,
            ApiMode::Quadrant => CliMode::Quadrant,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
enum ApiField {
    #[serde(alias = "start_age", alias = "start-age")]
    StartAge,
    #[serde(alias = "end_age", alias = "end-age")]
    EndAge,
    #[serde(alias = "annual_contribution", alias = "contribution")]
    AnnualContribution,
    #[serde(alias = "interest_rate", alias = "rate")]
    InterestRate,
}

impl From<ApiField> for ParameterField {
    fn from(value: ApiField) -> Self {
        match value {
            ApiField::StartAge => ParameterField::StartAge,
            ApiField::EndAge => ParameterField::EndAge,
            ApiField::AnnualContribution => ParameterField::AnnualContribution,
            ApiField::InterestRate => ParameterField::InterestRate,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
enum ResponseMode {
    Single,
    Quadrant,
}

impl From<StoreMode> for ResponseMode {
    fn from(value: StoreMode) -> Self {
        match value {
            StoreMode::Single => ResponseMode::Single,
            StoreMode::Quadrant => ResponseMode::Quadrant,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectPayload {
    start_age: Option<u32>,
    end_age: Option<u32>,
    annual_contribution: Option<f64>,
    interest_rate: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct EditPayload {
    field: ApiField,
    value: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ResetPayload {
    mode: Option<ApiMode>,
}

#[derive(Parser, Debug)]
#[command(
    name = "networth",
    about = "Net worth projection over an 80-year horizon (single or four-scenario comparison)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the JSON API backed by an in-memory scenario store
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
        #[arg(long, value_enum, default_value_t = CliMode::Quadrant)]
        mode: CliMode,
    },
    /// Project one parameter set and print it as JSON
    Project(ProjectArgs),
    /// Print the seeded scenarios and their combined series as JSON
    Show {
        #[arg(long, value_enum, default_value_t = CliMode::Quadrant)]
        mode: CliMode,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    #[arg(
        long,
        default_value_t = 25,
        help = "Simulated year of the first contribution"
    )]
    start_age: u32,
    #[arg(
        long,
        default_value_t = 58,
        help = "Simulated year of the last contribution (inclusive)"
    )]
    end_age: u32,
    #[arg(long, default_value_t = 10000.0)]
    annual_contribution: f64,
    #[arg(
        long,
        default_value_t = 7.0,
        help = "Annual growth in percent, e.g. 7"
    )]
    interest_rate: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared session state. One lock serialises edits so a reader never sees
/// parameters and a series from different versions.
#[derive(Clone)]
pub struct AppState {
    store: Arc<RwLock<ScenarioStore>>,
}

impl AppState {
    pub fn new(mode: StoreMode) -> Self {
        Self {
            store: Arc::new(RwLock::new(ScenarioStore::initialize(mode))),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScenarioView {
    name: String,
    parameters: ScenarioParameters,
    values: Vec<f64>,
    summary: DerivedSummary,
}

impl From<&Scenario> for ScenarioView {
    fn from(scenario: &Scenario) -> Self {
        Self {
            name: scenario.name().to_string(),
            parameters: *scenario.parameters(),
            values: scenario.series().values().to_vec(),
            summary: scenario.summary(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResponse {
    parameters: ScenarioParameters,
    values: Vec<f64>,
    summary: DerivedSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScenariosResponse {
    mode: ResponseMode,
    scenarios: Vec<ScenarioView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotResponse {
    mode: ResponseMode,
    scenarios: Vec<ScenarioView>,
    combined: CombinedSeries,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_parameters(args: ProjectArgs) -> Result<ScenarioParameters, String> {
    if args.end_age < args.start_age {
        return Err("--end-age must be >= --start-age".to_string());
    }

    if !args.annual_contribution.is_finite() || args.annual_contribution < 0.0 {
        return Err("--annual-contribution must be >= 0".to_string());
    }

    if !args.interest_rate.is_finite() {
        return Err("--interest-rate must be a finite percentage".to_string());
    }

    Ok(ScenarioParameters {
        start_age: args.start_age,
        end_age: args.end_age,
        annual_contribution: args.annual_contribution,
        interest_rate: args.interest_rate,
    })
}

fn default_project_args() -> ProjectArgs {
    let defaults = ScenarioParameters::default();
    ProjectArgs {
        start_age: defaults.start_age,
        end_age: defaults.end_age,
        annual_contribution: defaults.annual_contribution,
        interest_rate: defaults.interest_rate,
    }
}

fn parameters_from_payload(payload: ProjectPayload) -> Result<ScenarioParameters, String> {
    let mut args = default_project_args();

    if let Some(v) = payload.start_age {
        args.start_age = v;
    }
    if let Some(v) = payload.end_age {
        args.end_age = v;
    }
    if let Some(v) = payload.annual_contribution {
        args.annual_contribution = v;
    }
    if let Some(v) = payload.interest_rate {
        args.interest_rate = v;
    }

    build_parameters(args)
}

#[cfg(test)]
fn parameters_from_json(json: &str) -> Result<ScenarioParameters, String> {
    let payload = serde_json::from_str::<ProjectPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    parameters_from_payload(payload)
}

fn build_project_response(parameters: ScenarioParameters) -> ProjectResponse {
    let series = project(&parameters);
    ProjectResponse {
        parameters,
        summary: derived_summary(&parameters, &series),
        values: series.values().to_vec(),
    }
}

fn build_snapshot(store: &ScenarioStore) -> SnapshotResponse {
    SnapshotResponse {
        mode: store.mode().into(),
        scenarios: store.scenarios().map(ScenarioView::from).collect(),
        combined: store.combined(),
    }
}

pub async fn run_cli(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Serve { port, mode } => run_http_server(port, mode.into()).await?,
        Command::Project(args) => {
            let parameters = build_parameters(args).map_err(CliError::InvalidInput)?;
            let response = build_project_response(parameters);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Show { mode } => {
            let store = ScenarioStore::initialize(mode.into());
            println!("{}", serde_json::to_string_pretty(&build_snapshot(&store))?);
        }
    }
    Ok(())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .route("/api/scenarios", get(list_scenarios_handler))
        .route("/api/scenarios/:name", get(get_scenario_handler))
        .route("/api/scenarios/:name/edit", post(edit_scenario_handler))
        .route("/api/combined", get(combined_handler))
        .route("/api/reset", post(reset_handler))
        .fallback(not_found_handler)
        .with_state(state)
}

pub async fn run_http_server(port: u16, mode: StoreMode) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = router(AppState::new(mode));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, ?mode, "net worth API listening");
    tracing::info!("local access: http://127.0.0.1:{port}/api/scenarios");
    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn project_get_handler(payload: Result<Query<ProjectPayload>, QueryRejection>) -> Response {
    match payload {
        Ok(Query(payload)) => project_handler_impl(payload),
        Err(rejection) => error_response(StatusCode::BAD_REQUEST, &rejection.body_text()),
    }
}

async fn project_post_handler(payload: Result<Json<ProjectPayload>, JsonRejection>) -> Response {
    match payload {
        Ok(Json(payload)) => project_handler_impl(payload),
        Err(rejection) => error_response(StatusCode::BAD_REQUEST, &rejection.body_text()),
    }
}

fn project_handler_impl(payload: ProjectPayload) -> Response {
    match parameters_from_payload(payload) {
        Ok(parameters) => json_response(StatusCode::OK, build_project_response(parameters)),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

async fn list_scenarios_handler(State(state): State<AppState>) -> Response {
    let store = state.store.read().await;
    let response = ScenariosResponse {
        mode: store.mode().into(),
        scenarios: store.scenarios().map(ScenarioView::from).collect(),
    };
    json_response(StatusCode::OK, response)
}

async fn get_scenario_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Response {
    let store = state.store.read().await;
    match store.scenario(&name) {
        Ok(scenario) => json_response(StatusCode::OK, ScenarioView::from(scenario)),
        Err(err) => store_error_response(err, "scenario lookup"),
    }
}

async fn edit_scenario_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    payload: Result<Json<EditPayload>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return error_response(StatusCode::BAD_REQUEST, &rejection.body_text()),
    };
    let field = ParameterField::from(payload.field);

    let mut store = state.store.write().await;
    let current = match store.scenario(&name) {
        Ok(scenario) => *scenario.parameters(),
        Err(err) => return store_error_response(err, "scenario edit"),
    };
    let edit = match limits::clamp_edit(field, payload.value, &current) {
        Ok(edit) => edit,
        Err(err) => return store_error_response(err, "scenario edit"),
    };

    match store.update_parameter(&name, edit) {
        Ok(scenario) => json_response(StatusCode::OK, ScenarioView::from(scenario)),
        Err(err) => store_error_response(err, "scenario edit"),
    }
}

async fn combined_handler(State(state): State<AppState>) -> Response {
    let store = state.store.read().await;
    json_response(StatusCode::OK, store.combined())
}

async fn reset_handler(
    State(state): State<AppState>,
    payload: Result<Json<ResetPayload>, JsonRejection>,
) -> Response {
    // A bare POST keeps the current mode; a body that fails to parse is refused.
    let requested = match payload {
        Ok(Json(payload)) => payload.mode,
        Err(JsonRejection::MissingJsonContentType(_)) => None,
        Err(rejection) => return error_response(StatusCode::BAD_REQUEST, &rejection.body_text()),
    };

    let mut store = state.store.write().await;
    let mode = requested
        .map(|mode| StoreMode::from(CliMode::from(mode)))
        .unwrap_or_else(|| store.mode());
    store.reset(mode);
    tracing::info!(?mode, "scenario store reset");
    json_response(StatusCode::OK, build_snapshot(&store))
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

fn store_error_response(err: StoreError, context: &'static str) -> Response {
    let status = match err {
        StoreError::UnknownScenario(_) => StatusCode::NOT_FOUND,
        StoreError::InvertedWindow { .. }
        | StoreError::NonFinite { .. }
        | StoreError::InvalidAge { .. } => StatusCode::BAD_REQUEST,
    };
    if status == StatusCode::NOT_FOUND {
        tracing::debug!(context, error = %err, "request rejected");
    } else {
        tracing::warn!(context, error = %err, "request rejected");
    }
    error_response(status, &err.to_string())
}
