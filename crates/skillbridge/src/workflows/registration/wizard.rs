use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Months, Utc};
use serde::Serialize;

use crate::accounts::{
    AccountId, AccountRole, ClaimSetter, IdentityProvider, ProfileStore, ProvisioningError,
    ProvisioningService,
};

use super::draft::{FieldId, RegistrationDraft};
use super::payment::{
    confirm_plan, CustomerIdentity, PaymentError, PaymentGateway, PaymentReceipt, PlanCatalog,
    PlanId,
};
use super::steps::WizardStep;
use super::validation::{validate_step, StepValidationError};

/// Payment confirmation state owned by the wizard, invalidated whenever the
/// selected plan changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentState {
    pub confirmed: bool,
    pub processing: bool,
    pub receipt: Option<PaymentReceipt>,
}

/// Result of the terminal submit action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationOutcome {
    pub account_id: AccountId,
    pub destination: &'static str,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] StepValidationError),
    #[error(transparent)]
    Provisioning(#[from] ProvisioningError),
}

/// Drives the fixed seven-step SDP registration sequence. The wizard owns its
/// draft exclusively for the session; it is discarded on success or
/// abandonment.
#[derive(Debug)]
pub struct RegistrationWizard {
    step: WizardStep,
    draft: RegistrationDraft,
    failure: Option<StepValidationError>,
    field_errors: BTreeMap<FieldId, String>,
    payment: PaymentState,
}

impl Default for RegistrationWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrationWizard {
    pub fn new() -> Self {
        Self::with_draft(RegistrationDraft::default())
    }

    pub fn with_draft(draft: RegistrationDraft) -> Self {
        Self {
            step: WizardStep::FIRST,
            draft,
            failure: None,
            field_errors: BTreeMap::new(),
            payment: PaymentState::default(),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &RegistrationDraft {
        &self.draft
    }

    /// Mutable access for field edits. Plan selection must go through
    /// [`RegistrationWizard::select_plan`] so stale receipts are invalidated.
    pub fn draft_mut(&mut self) -> &mut RegistrationDraft {
        &mut self.draft
    }

    pub fn failure(&self) -> Option<&StepValidationError> {
        self.failure.as_ref()
    }

    pub fn field_errors(&self) -> &BTreeMap<FieldId, String> {
        &self.field_errors
    }

    pub fn payment(&self) -> &PaymentState {
        &self.payment
    }

    /// Rehydrate payment state, e.g. when a stateless caller replays a
    /// confirmation it already holds.
    pub fn restore_payment(&mut self, state: PaymentState) {
        self.payment = state;
    }

    /// A step is complete once the position has advanced past it.
    pub fn is_complete(&self, step: WizardStep) -> bool {
        self.step().ordinal() > step.ordinal()
    }

    /// Clear the error for a single field as the user edits it. Other failing
    /// fields keep their errors.
    pub fn clear_field_error(&mut self, field: &FieldId) {
        self.field_errors.remove(field);
    }

    /// Validate the current step and move forward. Rejection records the
    /// failure and leaves the position unchanged; advancing from the terminal
    /// step is a no-op.
    pub fn advance(&mut self) -> Result<WizardStep, StepValidationError> {
        match validate_step(&self.draft, self.step, self.payment.confirmed) {
            Ok(()) => {
                self.failure = None;
                if let Some(next) = self.step.next() {
                    self.step = next;
                }
                Ok(self.step)
            }
            Err(error) => {
                self.record_failure(&error);
                Err(error)
            }
        }
    }

    /// Move back one step without validating, clearing any error state.
    pub fn retreat(&mut self) -> WizardStep {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.failure = None;
        self.field_errors.clear();
        self.step
    }

    /// Select (or deselect) a payment plan. Changing the plan always discards
    /// any earlier confirmation, so the user must re-confirm payment.
    pub fn select_plan(&mut self, plan: Option<PlanId>) {
        if self.draft.selected_plan != plan {
            self.payment = PaymentState::default();
        }
        self.draft.selected_plan = plan;
    }

    /// Confirm the selected plan. With no gateway configured this resolves to
    /// the deterministic mock confirmation. Repeat calls re-trigger the remote
    /// call; callers gate on `payment().confirmed`.
    pub fn confirm_payment(
        &mut self,
        gateway: Option<&dyn PaymentGateway>,
        return_url: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<PaymentReceipt, PaymentError> {
        let Some(plan_id) = self.draft.selected_plan else {
            return Err(PaymentError::NoPlanSelected);
        };
        let plan = PlanCatalog::definition(plan_id);
        let customer = CustomerIdentity {
            name: format!("{} {}", self.draft.first_name, self.draft.last_name),
            email: self.draft.contact_email.clone(),
        };

        self.payment.processing = true;
        match confirm_plan(plan, &customer, gateway, return_url, now) {
            Ok(receipt) => {
                self.payment.processing = false;
                self.payment.confirmed = true;
                self.payment.receipt = Some(receipt.clone());
                self.field_errors.remove(&FieldId::Payment);
                Ok(receipt)
            }
            Err(error) => {
                self.payment.processing = false;
                Err(error)
            }
        }
    }

    /// Terminal action: validate the review step, compute the plan expiry, and
    /// provision the account. Remote failure leaves the wizard on the terminal
    /// step for retry.
    pub fn submit<I, S, C>(
        &mut self,
        service: &ProvisioningService<I, S, C>,
        now: DateTime<Utc>,
    ) -> Result<RegistrationOutcome, SubmitError>
    where
        I: IdentityProvider + 'static,
        S: ProfileStore + 'static,
        C: ClaimSetter + 'static,
    {
        if let Err(error) =
            validate_step(&self.draft, WizardStep::ReviewPayment, self.payment.confirmed)
        {
            self.record_failure(&error);
            return Err(error.into());
        }

        // Guarded by the review-step validator above.
        let plan_id = self.draft.selected_plan.unwrap_or(PlanId::Free);
        let expires_at = plan_expiry(plan_id, now);
        let document = profile_document(&self.draft, plan_id, now, expires_at, &self.payment);

        let account_id = service.provision(
            &self.draft.contact_email,
            &self.draft.password,
            AccountRole::Sdp,
            document,
        )?;

        self.failure = None;
        Ok(RegistrationOutcome {
            account_id,
            destination: AccountRole::Sdp.destination(),
        })
    }

    fn record_failure(&mut self, error: &StepValidationError) {
        for field in &error.fields {
            self.field_errors
                .insert(field.clone(), field_message(field).to_string());
        }
        self.failure = Some(error.clone());
    }
}

/// Plan activation window: free and monthly tiers run for 30 days, the annual
/// tier for one calendar year from the activation instant.
pub fn plan_expiry(plan: PlanId, activated_at: DateTime<Utc>) -> DateTime<Utc> {
    match plan {
        PlanId::Free | PlanId::Monthly => activated_at + Duration::days(30),
        PlanId::Annual => activated_at
            .checked_add_months(Months::new(12))
            .unwrap_or(activated_at + Duration::days(365)),
    }
}

fn field_message(field: &FieldId) -> &'static str {
    match field {
        FieldId::Password => "Password must be at least 6 characters",
        FieldId::ConfirmPassword => "Passwords must match",
        FieldId::ReferenceLetters => "At least 3 reference letters are required",
        FieldId::Terms => "You must accept the terms and conditions",
        FieldId::PaymentPlan => "Select a payment plan",
        FieldId::Payment => "Confirm your payment to continue",
        FieldId::SectorAccreditation(_) => "Accreditation number is required for this sector",
        _ => "This field is required",
    }
}

/// Project the completed draft into the denormalized profile document written
/// to the external store.
fn profile_document(
    draft: &RegistrationDraft,
    plan: PlanId,
    activated_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    payment: &PaymentState,
) -> serde_json::Value {
    serde_json::json!({
        "role": AccountRole::Sdp.label(),
        "companyName": draft.company_name,
        "registrationNumber": draft.registration_number,
        "organizationType": draft.organization_type,
        "email": draft.email,
        "phone": draft.phone,
        "contact": {
            "firstName": draft.first_name,
            "lastName": draft.last_name,
            "email": draft.contact_email,
            "phone": draft.contact_phone,
            "position": draft.position,
        },
        "establishedYear": draft.established_year,
        "location": draft.location,
        "sectors": draft.sectors,
        "otherSector": draft.other_sector,
        "goals": draft.goals,
        "otherGoal": draft.other_goal,
        "accreditationStatus": draft.accreditation_status,
        "accreditationNumbers": draft.accreditation_numbers,
        "services": draft.services,
        "otherService": draft.other_service,
        "learnerCapacity": draft.learner_capacity,
        "isNewProvider": draft.is_new_provider,
        "documents": {
            "companyRegistration": draft.company_registration_doc,
            "identity": draft.identity_doc,
            "appointment": draft.appointment_doc,
            "referenceLetters": draft.reference_letters,
        },
        "plan": {
            "id": plan.key(),
            "activatedAt": activated_at,
            "expiresAt": expires_at,
            "paymentReference": payment.receipt.as_ref().map(|r| r.reference.clone()),
        },
        "verified": false,
    })
}
