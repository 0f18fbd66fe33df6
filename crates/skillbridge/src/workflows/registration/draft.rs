use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::payment::PlanId;

/// Sentinel option that demands an accompanying free-text entry when selected
/// among sectors, goals, or services.
pub const OTHER_OPTION: &str = "Other";

/// Identifier for a single wizard input, used for field-level error reporting.
/// Keys follow the legacy camelCase identifiers the client highlights.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum FieldId {
    CompanyName,
    RegistrationNumber,
    OrganizationType,
    Email,
    Phone,
    FirstName,
    LastName,
    ContactEmail,
    ContactPhone,
    Position,
    Password,
    ConfirmPassword,
    EstablishedYear,
    Location,
    Sectors,
    OtherSector,
    Goals,
    OtherGoal,
    SectorAccreditation(String),
    Services,
    OtherService,
    LearnerCapacity,
    CompanyRegistrationDoc,
    IdentityDoc,
    AppointmentDoc,
    ReferenceLetters,
    Terms,
    PaymentPlan,
    Payment,
}

impl FieldId {
    pub fn key(&self) -> String {
        match self {
            FieldId::CompanyName => "companyName".to_string(),
            FieldId::RegistrationNumber => "registrationNumber".to_string(),
            FieldId::OrganizationType => "organizationType".to_string(),
            FieldId::Email => "email".to_string(),
            FieldId::Phone => "phone".to_string(),
            FieldId::FirstName => "firstName".to_string(),
            FieldId::LastName => "lastName".to_string(),
            FieldId::ContactEmail => "contactEmail".to_string(),
            FieldId::ContactPhone => "contactPhone".to_string(),
            FieldId::Position => "position".to_string(),
            FieldId::Password => "password".to_string(),
            FieldId::ConfirmPassword => "confirmPassword".to_string(),
            FieldId::EstablishedYear => "establishedYear".to_string(),
            FieldId::Location => "location".to_string(),
            FieldId::Sectors => "sectors".to_string(),
            FieldId::OtherSector => "otherSector".to_string(),
            FieldId::Goals => "goals".to_string(),
            FieldId::OtherGoal => "otherGoal".to_string(),
            FieldId::SectorAccreditation(sector) => format!("accreditationNumbers.{sector}"),
            FieldId::Services => "services".to_string(),
            FieldId::OtherService => "otherService".to_string(),
            FieldId::LearnerCapacity => "learnerCapacity".to_string(),
            FieldId::CompanyRegistrationDoc => "companyRegistrationDoc".to_string(),
            FieldId::IdentityDoc => "identityDoc".to_string(),
            FieldId::AppointmentDoc => "appointmentDoc".to_string(),
            FieldId::ReferenceLetters => "referenceLetters".to_string(),
            FieldId::Terms => "terms".to_string(),
            FieldId::PaymentPlan => "paymentPlan".to_string(),
            FieldId::Payment => "payment".to_string(),
        }
    }
}

impl Serialize for FieldId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.key())
    }
}

/// Whether the organization already holds accreditation for its sectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccreditationStatus {
    Yes,
    #[default]
    No,
}

/// Metadata for an uploaded supporting document. Actual file storage belongs
/// to the external file store; the draft only tracks the attachment slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentAttachment {
    pub name: String,
    pub storage_key: String,
}

/// The in-progress SDP registration, accumulated across wizard steps and
/// discarded on success or abandonment. The draft itself never forbids an
/// invalid intermediate state; the wizard's transition guard enforces order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationDraft {
    // Step 1: company information
    pub company_name: String,
    pub registration_number: String,
    pub organization_type: String,
    pub email: String,
    pub phone: String,

    // Step 2: contact person and credentials
    pub first_name: String,
    pub last_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub position: String,
    pub password: String,
    pub confirm_password: String,

    // Step 3: organization profile
    pub established_year: String,
    pub location: String,
    pub sectors: Vec<String>,
    pub other_sector: String,

    // Step 4: accreditation and goals
    pub goals: Vec<String>,
    pub other_goal: String,
    pub accreditation_status: AccreditationStatus,
    pub accreditation_numbers: BTreeMap<String, String>,

    // Step 5: services offered
    pub services: Vec<String>,
    pub other_service: String,
    pub learner_capacity: String,

    // Step 6: supporting documents
    pub is_new_provider: bool,
    pub company_registration_doc: Option<DocumentAttachment>,
    pub identity_doc: Option<DocumentAttachment>,
    pub appointment_doc: Option<DocumentAttachment>,
    pub reference_letters: Vec<DocumentAttachment>,

    // Step 7: review and payment
    pub terms_accepted: bool,
    pub selected_plan: Option<PlanId>,
}

impl RegistrationDraft {
    /// Sectors that require an accreditation-number entry when the provider
    /// declares itself accredited.
    pub fn sectors_missing_accreditation(&self) -> Vec<&str> {
        self.sectors
            .iter()
            .filter(|sector| {
                self.accreditation_numbers
                    .get(sector.as_str())
                    .map(|number| number.trim().is_empty())
                    .unwrap_or(true)
            })
            .map(String::as_str)
            .collect()
    }
}
