use crate::error::AppError;
use crate::infra::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{DateTime, Utc};
use keiyaku_ai::analysis::{AnalysisService, MergedResult, RuleReport};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct AnalyzeRequest {
    pub(crate) text: String,
    #[serde(default)]
    pub(crate) context: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnalyzeResponse {
    pub(crate) analyzed_at: DateTime<Utc>,
    #[serde(flatten)]
    pub(crate) result: MergedResult,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CheckRequest {
    pub(crate) text: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct CheckResponse {
    pub(crate) analyzed_at: DateTime<Utc>,
    #[serde(flatten)]
    pub(crate) report: RuleReport,
}

pub(crate) fn contract_router(service: Arc<AnalysisService>) -> axum::Router {
    axum::Router::new()
        .route(
            "/api/v1/contracts/analyze",
            axum::routing::post(analyze_endpoint),
        )
        .route(
            "/api/v1/contracts/check",
            axum::routing::post(check_endpoint),
        )
        .with_state(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn analyze_endpoint(
    State(service): State<Arc<AnalysisService>>,
    Json(payload): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let result = service
        .analyze(&payload.text, payload.context.as_deref())
        .await?;

    Ok(Json(AnalyzeResponse {
        analyzed_at: Utc::now(),
        result,
    }))
}

pub(crate) async fn check_endpoint(
    State(service): State<Arc<AnalysisService>>,
    Json(payload): Json<CheckRequest>,
) -> Json<CheckResponse> {
    let report = service.check(&payload.text);
    Json(CheckResponse {
        analyzed_at: Utc::now(),
        report,
    })
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
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

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::UnconfiguredAnalyzer;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use std::time::Duration;
    use tower::ServiceExt;

    fn router() -> axum::Router {
        let service = Arc::new(AnalysisService::new(
            Arc::new(UnconfiguredAnalyzer),
            Duration::from_secs(1),
        ));
        contract_router(service)
    }

    async fn read_json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        serde_json::from_slice(&bytes).expect("body is JSON")
    }

    fn post_json(uri: &str, payload: Value) -> Request<Body> {
        Request::post(uri)
            .header(axum::http::header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .expect("request builds")
    }

    #[tokio::test]
    async fn healthcheck_returns_ok() {
        let response = router()
            .oneshot(Request::get("/health").body(Body::empty()).expect("request builds"))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(payload["status"], "ok");
    }

    #[tokio::test]
    async fn check_route_works_without_analyzer_credentials() {
        let request = post_json(
            "/api/v1/contracts/check",
            json!({ "text": "乙は、甲に生じた一切の損害を賠償しなければならない。" }),
        );

        let response = router().oneshot(request).await.expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);

        let payload = read_json_body(response).await;
        assert!(payload["score"]["score"].is_number());
        assert!(payload["result"]["stats"]["critical"].as_u64() >= Some(1));
    }

    #[tokio::test]
    async fn analyze_without_credentials_returns_configuration_error() {
        let request = post_json(
            "/api/v1/contracts/analyze",
            json!({ "text": "業務委託契約書" }),
        );

        let response = router().oneshot(request).await.expect("route executes");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let payload = read_json_body(response).await;
        assert_eq!(payload["code"], "configuration");
        assert!(payload["error"].as_str().is_some_and(|m| !m.is_empty()));
    }
}
