use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use keiyaku_ai::config::ConfigError;
use keiyaku_ai::error::AnalysisError;
use keiyaku_ai::telemetry::TelemetryError;
use serde_json::json;
use std::fmt;
use tracing::error;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Analysis(AnalysisError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Analysis(err) => write!(f, "analysis error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Analysis(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Internal detail goes to the logs; clients get a retryable message
        // plus a stable error code.
        error!(error = %self, "request failed");

        let (status, code) = match &self {
            AppError::Analysis(AnalysisError::Configuration(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "configuration")
            }
            AppError::Analysis(AnalysisError::CollaboratorUnavailable(_)) => {
                (StatusCode::BAD_GATEWAY, "unavailable")
            }
            AppError::Analysis(AnalysisError::CollaboratorResponseInvalid(_)) => {
                (StatusCode::BAD_GATEWAY, "invalid_response")
            }
            AppError::Config(_) | AppError::Telemetry(_) | AppError::Io(_) | AppError::Server(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal")
            }
        };

        let body = Json(json!({
            "error": "解析に失敗しました。時間をおいて再試行してください。",
            "code": code,
        }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<AnalysisError> for AppError {
    fn from(value: AnalysisError) -> Self {
        Self::Analysis(value)
    }
}
