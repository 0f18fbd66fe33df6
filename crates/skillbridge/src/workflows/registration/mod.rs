//! SDP registration: the seven-step wizard state machine, payment
//! confirmation, and the terminal account-provisioning action.

pub mod draft;
pub mod payment;
pub mod router;
pub mod steps;
pub(crate) mod validation;
pub mod wizard;

#[cfg(test)]
mod tests;

pub use draft::{
    AccreditationStatus, DocumentAttachment, FieldId, RegistrationDraft, OTHER_OPTION,
};
pub use payment::{
    BillingType, CheckoutRequest, CheckoutResponse, CustomerIdentity, GatewayError, PaymentError,
    PaymentGateway, PaymentReceipt, PlanCatalog, PlanDefinition, PlanId,
};
pub use router::{registration_router, RegistrationState};
pub use steps::WizardStep;
pub use validation::{StepValidationError, MIN_PASSWORD_LENGTH, MIN_REFERENCE_LETTERS};
pub use wizard::{
    plan_expiry, PaymentState, RegistrationOutcome, RegistrationWizard, SubmitError,
};
