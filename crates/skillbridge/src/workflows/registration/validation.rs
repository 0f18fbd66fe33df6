use serde::Serialize;

use super::draft::{AccreditationStatus, FieldId, RegistrationDraft, OTHER_OPTION};
use super::steps::WizardStep;

pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Required number of reference letters for established providers.
pub const MIN_REFERENCE_LETTERS: usize = 3;

/// Structured rejection from a step validator: the affected section plus the
/// ordered list of offending fields. Local validation never reaches the
/// remote tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct StepValidationError {
    pub step: WizardStep,
    pub fields: Vec<FieldId>,
    pub message: String,
}

impl StepValidationError {
    fn new(step: WizardStep, fields: Vec<FieldId>) -> Self {
        let message = format!(
            "Please complete all required fields in {}",
            step.title()
        );
        Self {
            step,
            fields,
            message,
        }
    }

    pub fn section(&self) -> &'static str {
        self.step.section_key()
    }
}

/// Validate the named step against the draft. Pure: the same draft always
/// yields the same result. `payment_confirmed` is wizard state rather than
/// draft data, so the terminal step receives it explicitly.
pub fn validate_step(
    draft: &RegistrationDraft,
    step: WizardStep,
    payment_confirmed: bool,
) -> Result<(), StepValidationError> {
    let fields = match step {
        WizardStep::CompanyInfo => company_info_gaps(draft),
        WizardStep::ContactCredentials => contact_credential_gaps(draft),
        WizardStep::OrganizationProfile => organization_profile_gaps(draft),
        WizardStep::AccreditationGoals => accreditation_goal_gaps(draft),
        WizardStep::Services => service_gaps(draft),
        WizardStep::Documents => document_gaps(draft),
        WizardStep::ReviewPayment => review_payment_gaps(draft, payment_confirmed),
    };

    if fields.is_empty() {
        Ok(())
    } else {
        Err(StepValidationError::new(step, fields))
    }
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn company_info_gaps(draft: &RegistrationDraft) -> Vec<FieldId> {
    let mut fields = Vec::new();
    if blank(&draft.company_name) {
        fields.push(FieldId::CompanyName);
    }
    if blank(&draft.registration_number) {
        fields.push(FieldId::RegistrationNumber);
    }
    if blank(&draft.organization_type) {
        fields.push(FieldId::OrganizationType);
    }
    if blank(&draft.email) {
        fields.push(FieldId::Email);
    }
    if blank(&draft.phone) {
        fields.push(FieldId::Phone);
    }
    fields
}

fn contact_credential_gaps(draft: &RegistrationDraft) -> Vec<FieldId> {
    let mut fields = Vec::new();
    if blank(&draft.first_name) {
        fields.push(FieldId::FirstName);
    }
    if blank(&draft.last_name) {
        fields.push(FieldId::LastName);
    }
    if blank(&draft.contact_email) {
        fields.push(FieldId::ContactEmail);
    }
    if blank(&draft.contact_phone) {
        fields.push(FieldId::ContactPhone);
    }
    if blank(&draft.position) {
        fields.push(FieldId::Position);
    }
    if blank(&draft.password) || draft.password.chars().count() < MIN_PASSWORD_LENGTH {
        fields.push(FieldId::Password);
    }
    if blank(&draft.confirm_password) || draft.confirm_password != draft.password {
        fields.push(FieldId::ConfirmPassword);
    }
    fields
}

fn organization_profile_gaps(draft: &RegistrationDraft) -> Vec<FieldId> {
    let mut fields = Vec::new();
    if blank(&draft.organization_type) {
        fields.push(FieldId::OrganizationType);
    }
    if blank(&draft.established_year) {
        fields.push(FieldId::EstablishedYear);
    }
    if blank(&draft.location) {
        fields.push(FieldId::Location);
    }
    if draft.sectors.is_empty() {
        fields.push(FieldId::Sectors);
    }
    if draft.sectors.iter().any(|s| s == OTHER_OPTION) && blank(&draft.other_sector) {
        fields.push(FieldId::OtherSector);
    }
    fields
}

fn accreditation_goal_gaps(draft: &RegistrationDraft) -> Vec<FieldId> {
    let mut fields = Vec::new();
    if draft.goals.is_empty() {
        fields.push(FieldId::Goals);
    }
    if draft.goals.iter().any(|g| g == OTHER_OPTION) && blank(&draft.other_goal) {
        fields.push(FieldId::OtherGoal);
    }
    if draft.accreditation_status == AccreditationStatus::Yes {
        for sector in draft.sectors_missing_accreditation() {
            fields.push(FieldId::SectorAccreditation(sector.to_string()));
        }
    }
    fields
}

fn service_gaps(draft: &RegistrationDraft) -> Vec<FieldId> {
    let mut fields = Vec::new();
    if draft.services.is_empty() {
        fields.push(FieldId::Services);
    }
    if blank(&draft.learner_capacity) {
        fields.push(FieldId::LearnerCapacity);
    }
    if draft.services.iter().any(|s| s == OTHER_OPTION) && blank(&draft.other_service) {
        fields.push(FieldId::OtherService);
    }
    // Goals stay mandatory once collected; a cleared selection re-fails here.
    if draft.goals.is_empty() {
        fields.push(FieldId::Goals);
    }
    fields
}

fn document_gaps(draft: &RegistrationDraft) -> Vec<FieldId> {
    let mut fields = Vec::new();
    if draft.company_registration_doc.is_none() {
        fields.push(FieldId::CompanyRegistrationDoc);
    }
    if draft.identity_doc.is_none() {
        fields.push(FieldId::IdentityDoc);
    }
    if draft.is_new_provider {
        if draft.appointment_doc.is_none() {
            fields.push(FieldId::AppointmentDoc);
        }
    } else if draft.reference_letters.len() < MIN_REFERENCE_LETTERS {
        fields.push(FieldId::ReferenceLetters);
    }
    fields
}

fn review_payment_gaps(draft: &RegistrationDraft, payment_confirmed: bool) -> Vec<FieldId> {
    // Terms, plan, and payment are independent checks; all failing fields are
    // reported together rather than gated behind one another.
    let mut fields = Vec::new();
    if !draft.terms_accepted {
        fields.push(FieldId::Terms);
    }
    if draft.selected_plan.is_none() {
        fields.push(FieldId::PaymentPlan);
    }
    if !payment_confirmed {
        fields.push(FieldId::Payment);
    }
    fields
}
