use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Billing tier selected during registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanId {
    Free,
    Monthly,
    Annual,
}

impl PlanId {
    pub const fn key(self) -> &'static str {
        match self {
            PlanId::Free => "free",
            PlanId::Monthly => "monthly",
            PlanId::Annual => "annual",
        }
    }
}

/// How the provider bills a plan once checkout completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingType {
    Trial,
    Subscription,
    OneTime,
}

/// Static description of a billing tier. Amounts are whole rand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanDefinition {
    pub id: PlanId,
    pub amount_rand: u32,
    pub billing_duration_days: i64,
    pub plan_identifier: &'static str,
    pub billing_type: BillingType,
}

impl PlanDefinition {
    pub fn display_amount(&self) -> String {
        format!("R{}", self.amount_rand)
    }
}

const PLANS: [PlanDefinition; 3] = [
    PlanDefinition {
        id: PlanId::Free,
        amount_rand: 0,
        billing_duration_days: 30,
        plan_identifier: "sdp-free-trial",
        billing_type: BillingType::Trial,
    },
    PlanDefinition {
        id: PlanId::Monthly,
        amount_rand: 299,
        billing_duration_days: 30,
        plan_identifier: "sdp-monthly",
        billing_type: BillingType::Subscription,
    },
    PlanDefinition {
        id: PlanId::Annual,
        amount_rand: 2999,
        billing_duration_days: 365,
        plan_identifier: "sdp-annual",
        billing_type: BillingType::OneTime,
    },
];

/// Read-only lookup over the fixed plan table.
pub struct PlanCatalog;

impl PlanCatalog {
    pub fn definition(id: PlanId) -> &'static PlanDefinition {
        PLANS
            .iter()
            .find(|plan| plan.id == id)
            .unwrap_or(&PLANS[0])
    }

    /// String-keyed lookup for callers that receive the plan over the wire.
    /// Unknown keys yield `None`, never a panic.
    pub fn lookup(key: &str) -> Option<&'static PlanDefinition> {
        PLANS.iter().find(|plan| plan.id.key() == key)
    }

    pub fn all() -> &'static [PlanDefinition] {
        &PLANS
    }
}

/// Confirmation record produced after a successful (real or mocked) payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub reference: String,
    pub amount_display: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub checkout_url: Option<String>,
}

/// Customer identity forwarded to the payment provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerIdentity {
    pub name: String,
    pub email: String,
}

/// Checkout initiation payload sent to the external provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutRequest {
    pub amount_rand: u32,
    pub currency: &'static str,
    pub plan_identifier: &'static str,
    pub billing_type: BillingType,
    pub customer: CustomerIdentity,
    pub return_url: Option<String>,
    pub metadata: BTreeMap<String, String>,
}

/// Provider response for a checkout initiation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckoutResponse {
    pub payment_id: String,
    pub checkout_url: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Seam for the external payment provider. Adapters live outside the core
/// library; tests supply recording fakes.
pub trait PaymentGateway: Send + Sync {
    fn initiate_checkout(&self, request: CheckoutRequest) -> Result<CheckoutResponse, GatewayError>;
}

/// Transport-level failures from the payment provider.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("payment provider unavailable: {0}")]
    Unavailable(String),
    #[error("payment provider rejected checkout: {0}")]
    Rejected(String),
}

/// Failures raised while confirming a payment. Every variant is retryable by
/// the user; none of them advance the wizard.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("select a payment plan before confirming")]
    NoPlanSelected,
    #[error("payment plan '{0}' not found")]
    PlanNotFound(String),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Confirm a plan against the provider, or synthesize a mock confirmation when
/// no gateway is configured. The caller supplies the confirmation instant so
/// expiries stay deterministic.
pub fn confirm_plan(
    plan: &PlanDefinition,
    customer: &CustomerIdentity,
    gateway: Option<&dyn PaymentGateway>,
    return_url: Option<&str>,
    now: DateTime<Utc>,
) -> Result<PaymentReceipt, PaymentError> {
    let Some(gateway) = gateway else {
        return Ok(mock_receipt(plan, now));
    };

    let mut metadata = BTreeMap::new();
    metadata.insert("planId".to_string(), plan.id.key().to_string());

    let response = gateway.initiate_checkout(CheckoutRequest {
        amount_rand: plan.amount_rand,
        currency: "ZAR",
        plan_identifier: plan.plan_identifier,
        billing_type: plan.billing_type,
        customer: customer.clone(),
        return_url: return_url.map(str::to_string),
        metadata,
    })?;

    let expires_at = response
        .expires_at
        .or_else(|| Some(now + Duration::days(plan.billing_duration_days)));

    // Free plans never produce a checkout redirect.
    let checkout_url = if plan.id == PlanId::Free {
        None
    } else {
        response.checkout_url
    };

    Ok(PaymentReceipt {
        reference: response.payment_id,
        amount_display: plan.display_amount(),
        expires_at,
        checkout_url,
    })
}

fn mock_receipt(plan: &PlanDefinition, now: DateTime<Utc>) -> PaymentReceipt {
    PaymentReceipt {
        reference: format!("SB-{}", now.timestamp()),
        amount_display: plan.display_amount(),
        expires_at: Some(now + Duration::days(plan.billing_duration_days)),
        checkout_url: None,
    }
}
