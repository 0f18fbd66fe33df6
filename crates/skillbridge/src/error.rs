use crate::accounts::{IdentityError, ProvisioningError, StoreError};
use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::registration::{PaymentError, StepValidationError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

/// Crate-boundary error. Local validation never throws past the wizard; the
/// variants here are what the HTTP and CLI surfaces report.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Validation(StepValidationError),
    Payment(PaymentError),
    Provisioning(ProvisioningError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Validation(err) => write!(f, "validation error: {}", err),
            AppError::Payment(err) => write!(f, "payment error: {}", err),
            AppError::Provisioning(err) => write!(f, "provisioning error: {}", err),
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
            AppError::Validation(err) => Some(err),
            AppError::Payment(err) => Some(err),
            AppError::Provisioning(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Payment(PaymentError::NoPlanSelected | PaymentError::PlanNotFound(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Provisioning(ProvisioningError::Identity(
                IdentityError::CredentialMismatch,
            )) => StatusCode::UNAUTHORIZED,
            AppError::Provisioning(ProvisioningError::Identity(IdentityError::Unavailable(_)))
            | AppError::Provisioning(ProvisioningError::Store(StoreError::Unavailable(_))) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Payment(PaymentError::Gateway(_)) | AppError::Provisioning(_) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Config(_) | AppError::Telemetry(_) | AppError::Io(_) | AppError::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "error": self.to_string() }));
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

impl From<StepValidationError> for AppError {
    fn from(value: StepValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<PaymentError> for AppError {
    fn from(value: PaymentError) -> Self {
        Self::Payment(value)
    }
}

impl From<ProvisioningError> for AppError {
    fn from(value: ProvisioningError) -> Self {
        Self::Provisioning(value)
    }
}
