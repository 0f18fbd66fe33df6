use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use crate::accounts::{
    AccountId, AccountRole, ClaimError, ClaimSetter, IdentityError, IdentityProvider, ProfileStore,
    ProvisioningService, Session, StoreError,
};
use crate::workflows::registration::draft::{AccreditationStatus, DocumentAttachment, RegistrationDraft};
use crate::workflows::registration::payment::{
    CheckoutRequest, CheckoutResponse, GatewayError, PaymentGateway, PlanId,
};
use crate::workflows::registration::wizard::RegistrationWizard;

pub(super) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 9, 30, 0).single().expect("valid instant")
}

pub(super) fn attachment(name: &str) -> DocumentAttachment {
    DocumentAttachment {
        name: name.to_string(),
        storage_key: format!("uploads/sdp/{name}"),
    }
}

/// A draft that satisfies every step's validator except the payment
/// confirmation, which is wizard state.
pub(super) fn complete_draft() -> RegistrationDraft {
    RegistrationDraft {
        company_name: "Ubuntu Skills Academy".to_string(),
        registration_number: "2019/123456/07".to_string(),
        organization_type: "Private Training Provider".to_string(),
        email: "info@ubuntuskills.co.za".to_string(),
        phone: "+27 11 555 0100".to_string(),

        first_name: "Naledi".to_string(),
        last_name: "Dlamini".to_string(),
        contact_email: "naledi@ubuntuskills.co.za".to_string(),
        contact_phone: "+27 82 555 0101".to_string(),
        position: "Managing Director".to_string(),
        password: "s3cure-pass".to_string(),
        confirm_password: "s3cure-pass".to_string(),

        established_year: "2019".to_string(),
        location: "Gauteng".to_string(),
        sectors: vec!["CETA".to_string(), "MERSETA".to_string()],
        other_sector: String::new(),

        goals: vec!["Accreditation support".to_string()],
        other_goal: String::new(),
        accreditation_status: AccreditationStatus::No,
        accreditation_numbers: Default::default(),

        services: vec!["Learnerships".to_string()],
        other_service: String::new(),
        learner_capacity: "250".to_string(),

        is_new_provider: false,
        company_registration_doc: Some(attachment("cipc.pdf")),
        identity_doc: Some(attachment("id.pdf")),
        appointment_doc: None,
        reference_letters: vec![
            attachment("ref-1.pdf"),
            attachment("ref-2.pdf"),
            attachment("ref-3.pdf"),
        ],

        terms_accepted: true,
        selected_plan: Some(PlanId::Free),
    }
}

/// Wizard positioned at the terminal step with payment already confirmed via
/// the mock path.
pub(super) fn wizard_at_review() -> RegistrationWizard {
    let mut wizard = RegistrationWizard::with_draft(complete_draft());
    wizard
        .confirm_payment(None, None, fixed_now())
        .expect("mock confirmation succeeds");
    for _ in 0..6 {
        wizard.advance().expect("complete draft advances");
    }
    wizard
}

#[derive(Default)]
pub(super) struct MemoryIdentity {
    accounts: Mutex<HashMap<String, (String, AccountId)>>,
    next: Mutex<u64>,
}

impl IdentityProvider for MemoryIdentity {
    fn create_account(
        &self,
        email: &str,
        password: &str,
        _role: AccountRole,
    ) -> Result<AccountId, IdentityError> {
        let mut accounts = self.accounts.lock().expect("identity mutex poisoned");
        if accounts.contains_key(email) {
            return Err(IdentityError::EmailInUse(email.to_string()));
        }
        let mut next = self.next.lock().expect("sequence mutex poisoned");
        *next += 1;
        let id = AccountId(format!("acct-{:04}", *next));
        accounts.insert(email.to_string(), (password.to_string(), id.clone()));
        Ok(id)
    }

    fn authenticate(&self, email: &str, password: &str) -> Result<Session, IdentityError> {
        let accounts = self.accounts.lock().expect("identity mutex poisoned");
        match accounts.get(email) {
            Some((stored, id)) if stored == password => Ok(Session {
                account_id: id.clone(),
                email: email.to_string(),
                role: AccountRole::Sdp,
                verified: false,
            }),
            _ => Err(IdentityError::CredentialMismatch),
        }
    }

    fn current_session(&self) -> Option<Session> {
        None
    }
}

pub(super) struct UnavailableIdentity;

impl IdentityProvider for UnavailableIdentity {
    fn create_account(
        &self,
        _email: &str,
        _password: &str,
        _role: AccountRole,
    ) -> Result<AccountId, IdentityError> {
        Err(IdentityError::Unavailable("auth backend offline".to_string()))
    }

    fn authenticate(&self, _email: &str, _password: &str) -> Result<Session, IdentityError> {
        Err(IdentityError::Unavailable("auth backend offline".to_string()))
    }

    fn current_session(&self) -> Option<Session> {
        None
    }
}

#[derive(Default)]
pub(super) struct MemoryStore {
    pub(super) writes: Mutex<Vec<(AccountId, serde_json::Value, bool)>>,
}

impl ProfileStore for MemoryStore {
    fn write_profile(
        &self,
        account_id: &AccountId,
        document: serde_json::Value,
        merge: bool,
    ) -> Result<(), StoreError> {
        self.writes
            .lock()
            .expect("store mutex poisoned")
            .push((account_id.clone(), document, merge));
        Ok(())
    }
}

#[derive(Default)]
pub(super) struct RecordingClaims {
    pub(super) calls: Mutex<Vec<AccountId>>,
    pub(super) fail: bool,
}

impl ClaimSetter for RecordingClaims {
    fn set_admin_claims(
        &self,
        account_id: &AccountId,
        _authorization_key: &str,
    ) -> Result<(), ClaimError> {
        self.calls
            .lock()
            .expect("claims mutex poisoned")
            .push(account_id.clone());
        if self.fail {
            Err(ClaimError::Rejected("insufficient privileges".to_string()))
        } else {
            Ok(())
        }
    }
}

pub(super) type TestService = ProvisioningService<MemoryIdentity, MemoryStore, RecordingClaims>;

pub(super) fn build_service() -> (TestService, Arc<MemoryIdentity>, Arc<MemoryStore>, Arc<RecordingClaims>) {
    let identity = Arc::new(MemoryIdentity::default());
    let store = Arc::new(MemoryStore::default());
    let claims = Arc::new(RecordingClaims::default());
    let service = ProvisioningService::new(
        identity.clone(),
        store.clone(),
        claims.clone(),
        Some("svc-admin-key".to_string()),
    );
    (service, identity, store, claims)
}

#[derive(Default)]
pub(super) struct RecordingGateway {
    pub(super) requests: Mutex<Vec<CheckoutRequest>>,
    pub(super) checkout_url: Option<String>,
    pub(super) expires_at: Option<DateTime<Utc>>,
}

impl PaymentGateway for RecordingGateway {
    fn initiate_checkout(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutResponse, GatewayError> {
        self.requests
            .lock()
            .expect("gateway mutex poisoned")
            .push(request);
        Ok(CheckoutResponse {
            payment_id: "pay-7781".to_string(),
            checkout_url: self.checkout_url.clone(),
            expires_at: self.expires_at,
        })
    }
}

pub(super) struct OfflineGateway;

impl PaymentGateway for OfflineGateway {
    fn initiate_checkout(
        &self,
        _request: CheckoutRequest,
    ) -> Result<CheckoutResponse, GatewayError> {
        Err(GatewayError::Unavailable("provider timeout".to_string()))
    }
}
