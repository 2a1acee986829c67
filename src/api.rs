use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::{
    clients::health::HealthChecker,
    config::Config,
    models::{
        notification::DispatchResult,
        request::OperationRequest,
        response::ApiResponse,
    },
    utils::ReturnNotificationOperation,
};

pub struct AppState {
    pub operation: ReturnNotificationOperation,
    pub health_checker: HealthChecker,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/operations/ts-return", post(ts_return))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_api_server(
    config: &Config,
    state: Arc<AppState>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = router(state);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = TcpListener::bind(&addr).await?;

    info!(address = %addr, "Return notification server started");

    axum::serve(listener, app).await?;

    Ok(())
}

async fn ts_return(
    State(state): State<Arc<AppState>>,
    Json(request): Json<OperationRequest>,
) -> (StatusCode, Json<ApiResponse<DispatchResult>>) {
    match state.operation.do_operation(&request).await {
        Ok(result) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                result,
                "Notifications processed".to_string(),
            )),
        ),
        Err(e) => {
            let status_code = e.status_code();
            warn!(kind = e.kind(), status = %status_code, error = %e, "Return notification failed");

            (
                status_code,
                Json(ApiResponse::error(e.kind().to_string(), e.to_string())),
            )
        }
    }
}

async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let report = state.health_checker.check_all().await;

    (report.http_status(), Json(report))
}
