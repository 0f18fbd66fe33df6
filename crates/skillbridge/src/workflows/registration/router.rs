use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::accounts::{ClaimSetter, IdentityError, IdentityProvider, ProfileStore, ProvisioningError, ProvisioningService};

use super::draft::RegistrationDraft;
use super::payment::{
    confirm_plan, CustomerIdentity, GatewayError, PaymentError, PaymentGateway, PaymentReceipt,
    PlanCatalog,
};
use super::steps::WizardStep;
use super::validation::StepValidationError;
use super::wizard::{PaymentState, RegistrationWizard, SubmitError};

/// Shared state for the registration endpoints.
pub struct RegistrationState<I, S, C> {
    pub service: Arc<ProvisioningService<I, S, C>>,
    pub gateway: Option<Arc<dyn PaymentGateway>>,
    pub return_url: Option<String>,
}

impl<I, S, C> Clone for RegistrationState<I, S, C> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            gateway: self.gateway.clone(),
            return_url: self.return_url.clone(),
        }
    }
}

/// Router builder exposing SDP registration submission and payment
/// confirmation.
pub fn registration_router<I, S, C>(state: RegistrationState<I, S, C>) -> Router
where
    I: IdentityProvider + 'static,
    S: ProfileStore + 'static,
    C: ClaimSetter + 'static,
{
    Router::new()
        .route("/api/v1/registrations", post(submit_handler::<I, S, C>))
        .route(
            "/api/v1/registrations/payment",
            post(payment_handler::<I, S, C>),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegistrationRequest {
    pub(crate) draft: RegistrationDraft,
    /// The client's payment confirmation, carried forward from the payment
    /// endpoint. Absent means payment has not been confirmed.
    #[serde(default)]
    pub(crate) receipt: Option<PaymentReceipt>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PaymentRequest {
    pub(crate) plan: String,
    pub(crate) customer: CustomerIdentity,
}

pub(crate) async fn submit_handler<I, S, C>(
    State(state): State<RegistrationState<I, S, C>>,
    axum::Json(request): axum::Json<RegistrationRequest>,
) -> Response
where
    I: IdentityProvider + 'static,
    S: ProfileStore + 'static,
    C: ClaimSetter + 'static,
{
    let mut wizard = RegistrationWizard::with_draft(request.draft);
    wizard.restore_payment(PaymentState {
        confirmed: request.receipt.is_some(),
        processing: false,
        receipt: request.receipt,
    });

    // Replay every guard server-side; the client wizard is not trusted.
    while wizard.step() != WizardStep::LAST {
        if let Err(error) = wizard.advance() {
            return validation_response(&error, &wizard);
        }
    }

    match wizard.submit(&state.service, Utc::now()) {
        Ok(outcome) => (StatusCode::CREATED, axum::Json(outcome)).into_response(),
        Err(SubmitError::Validation(error)) => validation_response(&error, &wizard),
        Err(SubmitError::Provisioning(error)) => provisioning_response(error),
    }
}

pub(crate) async fn payment_handler<I, S, C>(
    State(state): State<RegistrationState<I, S, C>>,
    axum::Json(request): axum::Json<PaymentRequest>,
) -> Response
where
    I: IdentityProvider + 'static,
    S: ProfileStore + 'static,
    C: ClaimSetter + 'static,
{
    if request.plan.trim().is_empty() {
        return payment_error_response(PaymentError::NoPlanSelected);
    }

    let Some(plan) = PlanCatalog::lookup(&request.plan) else {
        return payment_error_response(PaymentError::PlanNotFound(request.plan));
    };

    let result = confirm_plan(
        plan,
        &request.customer,
        state.gateway.as_deref(),
        state.return_url.as_deref(),
        Utc::now(),
    );

    match result {
        Ok(receipt) => (StatusCode::OK, axum::Json(receipt)).into_response(),
        Err(error) => payment_error_response(error),
    }
}

fn validation_response(error: &StepValidationError, wizard: &RegistrationWizard) -> Response {
    let field_errors: BTreeMap<String, &str> = wizard
        .field_errors()
        .iter()
        .map(|(field, message)| (field.key(), message.as_str()))
        .collect();

    let payload = json!({
        "error": error.to_string(),
        "section": error.section(),
        "step": error.step.ordinal(),
        "fields": error.fields,
        "fieldErrors": field_errors,
    });
    (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
}

fn provisioning_response(error: ProvisioningError) -> Response {
    let status = match &error {
        ProvisioningError::Identity(IdentityError::EmailInUse(_)) => StatusCode::CONFLICT,
        ProvisioningError::Identity(IdentityError::CredentialMismatch) => StatusCode::UNAUTHORIZED,
        ProvisioningError::Identity(IdentityError::Unavailable(_)) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        ProvisioningError::Store(crate::accounts::StoreError::Unavailable(_)) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        _ => StatusCode::BAD_GATEWAY,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

fn payment_error_response(error: PaymentError) -> Response {
    let status = match &error {
        PaymentError::NoPlanSelected | PaymentError::PlanNotFound(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        PaymentError::Gateway(GatewayError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
        PaymentError::Gateway(GatewayError::Rejected(_)) => StatusCode::BAD_GATEWAY,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
