use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use metrics_exporter_prometheus::PrometheusHandle;
use skillbridge::accounts::{
    AccountId, AccountRole, ClaimError, ClaimSetter, IdentityError, IdentityProvider,
    ProfileStore, Session, StoreError,
};
use skillbridge::workflows::directory::{
    Availability, DirectoryError, ProfileDirectory, SmeProfile,
};
use skillbridge::workflows::registration::{
    CheckoutRequest, CheckoutResponse, GatewayError, PaymentGateway,
};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Identity provider backed by process memory. Stands in for the managed
/// provider in local runs and demos.
#[derive(Default)]
pub(crate) struct InMemoryIdentityProvider {
    accounts: Mutex<HashMap<String, StoredAccount>>,
    sequence: Mutex<u64>,
}

struct StoredAccount {
    password: String,
    account_id: AccountId,
    role: AccountRole,
}

impl IdentityProvider for InMemoryIdentityProvider {
    fn create_account(
        &self,
        email: &str,
        password: &str,
        role: AccountRole,
    ) -> Result<AccountId, IdentityError> {
        let mut accounts = self.accounts.lock().expect("identity mutex poisoned");
        if accounts.contains_key(email) {
            return Err(IdentityError::EmailInUse(email.to_string()));
        }

        let mut sequence = self.sequence.lock().expect("sequence mutex poisoned");
        *sequence += 1;
        let account_id = AccountId(format!("acct-{:06}", *sequence));
        accounts.insert(
            email.to_string(),
            StoredAccount {
                password: password.to_string(),
                account_id: account_id.clone(),
                role,
            },
        );
        Ok(account_id)
    }

    fn authenticate(&self, email: &str, password: &str) -> Result<Session, IdentityError> {
        let accounts = self.accounts.lock().expect("identity mutex poisoned");
        match accounts.get(email) {
            Some(stored) if stored.password == password => Ok(Session {
                account_id: stored.account_id.clone(),
                email: email.to_string(),
                role: stored.role,
                verified: false,
            }),
            _ => Err(IdentityError::CredentialMismatch),
        }
    }

    fn current_session(&self) -> Option<Session> {
        None
    }
}

/// Profile document store backed by process memory.
#[derive(Default)]
pub(crate) struct InMemoryProfileStore {
    documents: Mutex<HashMap<AccountId, serde_json::Value>>,
}

impl InMemoryProfileStore {
    pub(crate) fn document(&self, account_id: &AccountId) -> Option<serde_json::Value> {
        self.documents
            .lock()
            .expect("store mutex poisoned")
            .get(account_id)
            .cloned()
    }
}

impl ProfileStore for InMemoryProfileStore {
    fn write_profile(
        &self,
        account_id: &AccountId,
        document: serde_json::Value,
        merge: bool,
    ) -> Result<(), StoreError> {
        let mut documents = self.documents.lock().expect("store mutex poisoned");
        match documents.get_mut(account_id) {
            Some(existing) if merge => merge_objects(existing, document),
            _ => {
                documents.insert(account_id.clone(), document);
            }
        }
        Ok(())
    }
}

fn merge_objects(target: &mut serde_json::Value, incoming: serde_json::Value) {
    match (target, incoming) {
        (serde_json::Value::Object(target), serde_json::Value::Object(incoming)) => {
            for (key, value) in incoming {
                match target.get_mut(&key) {
                    Some(existing) => merge_objects(existing, value),
                    None => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (target, incoming) => *target = incoming,
    }
}

/// Claim setter that only records the attempt. The privileged function lives
/// in the external serverless tier.
#[derive(Default)]
pub(crate) struct LoggingClaimSetter;

impl ClaimSetter for LoggingClaimSetter {
    fn set_admin_claims(
        &self,
        account_id: &AccountId,
        _authorization_key: &str,
    ) -> Result<(), ClaimError> {
        info!(account = %account_id.0, "admin claims requested");
        Ok(())
    }
}

/// Redirect-style payment gateway: the checkout URL is assembled from the
/// merchant configuration, so no round trip to the provider is needed to
/// initiate a payment.
pub(crate) struct RedirectGateway {
    provider_url: String,
    merchant_id: String,
    sequence: Mutex<u64>,
}

impl RedirectGateway {
    pub(crate) fn new(provider_url: String, merchant_id: String) -> Self {
        Self {
            provider_url,
            merchant_id,
            sequence: Mutex::new(0),
        }
    }
}

impl PaymentGateway for RedirectGateway {
    fn initiate_checkout(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutResponse, GatewayError> {
        let mut sequence = self.sequence.lock().expect("gateway mutex poisoned");
        *sequence += 1;
        let payment_id = format!("pay-{:06}", *sequence);

        let checkout_url = if request.amount_rand == 0 {
            None
        } else {
            Some(format!(
                "{}/checkout?merchant_id={}&amount={}&item_name={}&payment_id={}",
                self.provider_url.trim_end_matches('/'),
                self.merchant_id,
                request.amount_rand,
                request.plan_identifier,
                payment_id,
            ))
        };

        Ok(CheckoutResponse {
            payment_id,
            checkout_url,
            expires_at: None,
        })
    }
}

/// Directory seam returning an in-memory snapshot; in production this is fed
/// by the document store subscription.
pub(crate) struct SeededDirectory {
    profiles: Mutex<Vec<SmeProfile>>,
}

impl SeededDirectory {
    pub(crate) fn new(profiles: Vec<SmeProfile>) -> Self {
        Self {
            profiles: Mutex::new(profiles),
        }
    }
}

impl ProfileDirectory for SeededDirectory {
    fn snapshot(&self) -> Result<Vec<SmeProfile>, DirectoryError> {
        Ok(self
            .profiles
            .lock()
            .expect("directory mutex poisoned")
            .clone())
    }
}

pub(crate) fn seeded_profiles() -> Vec<SmeProfile> {
    vec![
        SmeProfile {
            id: "sme-0001".to_string(),
            name: "Thabo Nkosi".to_string(),
            roles: vec!["Assessor".to_string(), "Moderator".to_string()],
            specializations: vec![
                "Occupational Health & Safety".to_string(),
                "Quality Assurance".to_string(),
            ],
            sectors: vec!["CETA".to_string(), "MERSETA".to_string()],
            location: "Gauteng".to_string(),
            rating: 4.8,
            review_count: 34,
            availability: Availability::Available,
            verified: true,
            ..SmeProfile::default()
        },
        SmeProfile {
            id: "sme-0002".to_string(),
            name: "Lerato Molefe".to_string(),
            roles: vec!["Facilitator".to_string()],
            specializations: vec!["Skills Development Facilitation".to_string()],
            sectors: vec!["Services SETA".to_string()],
            location: "Western Cape".to_string(),
            rating: 4.5,
            review_count: 21,
            availability: Availability::Busy,
            verified: true,
            ..SmeProfile::default()
        },
        SmeProfile {
            id: "sme-0003".to_string(),
            name: "Anita van Wyk".to_string(),
            roles: Vec::new(),
            role: Some("Moderator".to_string()),
            specializations: vec!["Assessment Design".to_string()],
            sectors: vec!["CETA".to_string()],
            location: "KwaZulu-Natal".to_string(),
            rating: 4.1,
            review_count: 9,
            availability: Availability::Away,
            verified: false,
            ..SmeProfile::default()
        },
    ]
}
