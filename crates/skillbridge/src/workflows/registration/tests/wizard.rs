use super::common::*;
use crate::workflows::registration::draft::{FieldId, RegistrationDraft};
use crate::workflows::registration::payment::PlanId;
use crate::workflows::registration::steps::WizardStep;
use crate::workflows::registration::wizard::RegistrationWizard;

#[test]
fn rejected_advance_keeps_the_step() {
    let mut wizard = RegistrationWizard::new();
    let error = wizard.advance().expect_err("empty draft fails step 1");

    assert_eq!(wizard.step(), WizardStep::CompanyInfo);
    assert_eq!(error.section(), "companyInfo");
    assert_eq!(error.fields.len(), 5);
    assert!(wizard.failure().is_some());
}

#[test]
fn advance_walks_a_complete_draft_to_the_terminal_step() {
    let mut wizard = RegistrationWizard::with_draft(complete_draft());
    for expected in [2u8, 3, 4, 5, 6, 7] {
        let step = wizard.advance().expect("valid draft advances");
        assert_eq!(step.ordinal(), expected);
    }
    assert!(wizard.is_complete(WizardStep::Documents));
    assert!(!wizard.is_complete(WizardStep::ReviewPayment));
}

#[test]
fn advance_past_terminal_step_is_a_noop() {
    let mut wizard = wizard_at_review();
    assert_eq!(wizard.step(), WizardStep::ReviewPayment);
    let step = wizard.advance().expect("review step validates");
    assert_eq!(step, WizardStep::ReviewPayment);
}

#[test]
fn retreat_is_unconditional_and_clears_errors() {
    let mut wizard = RegistrationWizard::with_draft(complete_draft());
    wizard.advance().expect("step 1 passes");
    wizard.draft_mut().first_name.clear();
    wizard.advance().expect_err("step 2 fails");
    assert!(!wizard.field_errors().is_empty());

    let step = wizard.retreat();
    assert_eq!(step, WizardStep::CompanyInfo);
    assert!(wizard.failure().is_none());
    assert!(wizard.field_errors().is_empty());
}

#[test]
fn retreat_below_first_step_is_a_noop() {
    let mut wizard = RegistrationWizard::new();
    assert_eq!(wizard.retreat(), WizardStep::CompanyInfo);
}

#[test]
fn field_errors_clear_individually() {
    let mut wizard = RegistrationWizard::new();
    wizard.advance().expect_err("empty draft fails");
    assert!(wizard.field_errors().contains_key(&FieldId::CompanyName));
    assert!(wizard.field_errors().contains_key(&FieldId::Email));

    wizard.draft_mut().company_name = "Ubuntu Skills Academy".to_string();
    wizard.clear_field_error(&FieldId::CompanyName);

    assert!(!wizard.field_errors().contains_key(&FieldId::CompanyName));
    // Clearing one failing field never clears the others.
    assert!(wizard.field_errors().contains_key(&FieldId::Email));
}

#[test]
fn other_sector_scenario_reports_the_field_key() {
    let mut draft = complete_draft();
    draft.sectors = vec!["CETA".to_string(), "Other".to_string()];
    draft.other_sector = String::new();

    let mut wizard = RegistrationWizard::with_draft(draft);
    wizard.advance().expect("step 1 passes");
    wizard.advance().expect("step 2 passes");
    let error = wizard.advance().expect_err("step 3 fails on otherSector");

    assert_eq!(wizard.step(), WizardStep::OrganizationProfile);
    let keys: Vec<String> = error.fields.iter().map(|f| f.key()).collect();
    assert!(keys.contains(&"otherSector".to_string()));
    assert!(wizard.field_errors().contains_key(&FieldId::OtherSector));
}

#[test]
fn selecting_a_different_plan_discards_the_confirmation() {
    let mut wizard = RegistrationWizard::with_draft(complete_draft());
    wizard
        .confirm_payment(None, None, fixed_now())
        .expect("mock confirmation");
    assert!(wizard.payment().confirmed);
    assert!(wizard.payment().receipt.is_some());

    wizard.select_plan(Some(PlanId::Annual));

    assert!(!wizard.payment().confirmed);
    assert!(!wizard.payment().processing);
    assert!(wizard.payment().receipt.is_none());
    assert_eq!(wizard.draft().selected_plan, Some(PlanId::Annual));
}

#[test]
fn reselecting_the_same_plan_keeps_the_confirmation() {
    let mut wizard = RegistrationWizard::with_draft(complete_draft());
    wizard
        .confirm_payment(None, None, fixed_now())
        .expect("mock confirmation");

    wizard.select_plan(Some(PlanId::Free));
    assert!(wizard.payment().confirmed);
}

#[test]
fn draft_starts_empty_and_owns_no_defaults() {
    let draft = RegistrationDraft::default();
    assert!(draft.sectors.is_empty());
    assert!(draft.selected_plan.is_none());
    assert!(!draft.terms_accepted);
}
