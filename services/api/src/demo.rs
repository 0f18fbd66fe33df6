use crate::infra::{
    seeded_profiles, InMemoryIdentityProvider, InMemoryProfileStore, LoggingClaimSetter,
};
use chrono::Utc;
use clap::Args;
use skillbridge::accounts::ProvisioningService;
use skillbridge::error::AppError;
use skillbridge::workflows::directory::DirectorySearch;
use skillbridge::workflows::registration::{
    AccreditationStatus, DocumentAttachment, PlanCatalog, RegistrationDraft, RegistrationWizard,
    WizardStep,
};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Payment plan to select in the walkthrough (free, monthly or annual)
    #[arg(long, default_value = "free")]
    pub(crate) plan: String,
    /// Search query to run against the seeded expert directory
    #[arg(long, default_value = "assessor")]
    pub(crate) query: String,
    /// Skip the directory search portion of the demo
    #[arg(long)]
    pub(crate) skip_directory: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        plan,
        query,
        skip_directory,
    } = args;

    println!("SDP registration walkthrough");

    let Some(plan) = PlanCatalog::lookup(&plan) else {
        println!("Unknown plan '{plan}'; expected one of: free, monthly, annual");
        return Ok(());
    };

    let mut wizard = RegistrationWizard::with_draft(demo_draft());
    wizard.select_plan(Some(plan.id));

    // Walk every step up to review, reporting progress like the client would.
    while wizard.step() != WizardStep::LAST {
        let step = wizard.step();
        match wizard.advance() {
            Ok(_) => println!(
                "- Step {}/{} complete: {}",
                step.ordinal(),
                WizardStep::LAST.ordinal(),
                step.title()
            ),
            Err(error) => {
                println!("- Step {} rejected: {}", step.ordinal(), error);
                for field in &error.fields {
                    println!("    missing: {}", field.key());
                }
                return Ok(());
            }
        }
    }

    let now = Utc::now();
    let receipt = match wizard.confirm_payment(None, None, now) {
        Ok(receipt) => receipt,
        Err(error) => {
            println!("- Payment confirmation failed: {error}");
            return Ok(());
        }
    };
    println!(
        "- Payment confirmed: {} for {} ({})",
        receipt.reference,
        receipt.amount_display,
        plan.plan_identifier
    );
    if let Some(expires_at) = receipt.expires_at {
        println!("  Plan active until {}", expires_at.date_naive());
    }

    let identity = Arc::new(InMemoryIdentityProvider::default());
    let store = Arc::new(InMemoryProfileStore::default());
    let service = Arc::new(ProvisioningService::new(
        identity,
        store.clone(),
        Arc::new(LoggingClaimSetter),
        None,
    ));

    let outcome = match wizard.submit(&service, now) {
        Ok(outcome) => outcome,
        Err(error) => {
            println!("- Submission failed: {error}");
            return Ok(());
        }
    };
    println!(
        "- Account {} provisioned, redirecting to {}",
        outcome.account_id.0, outcome.destination
    );

    if let Some(document) = store.document(&outcome.account_id) {
        match serde_json::to_string_pretty(&document) {
            Ok(json) => println!("  Stored profile document:\n{json}"),
            Err(err) => println!("  Stored profile document unavailable: {err}"),
        }
    }

    if skip_directory {
        return Ok(());
    }

    println!("\nExpert directory search");
    let mut search = DirectorySearch::with_candidates(seeded_profiles());
    search.set_query(query.clone());

    println!(
        "- Query '{}' matched {} of {} experts",
        query,
        search.results().len(),
        seeded_profiles().len()
    );
    for profile in search.results() {
        println!(
            "  - {} | {} | {} | {} ({} reviews)",
            profile.name,
            profile.role_list().join(", "),
            profile.location,
            profile.availability.label(),
            profile.review_count
        );
    }

    Ok(())
}

fn demo_draft() -> RegistrationDraft {
    let mut accreditation_numbers = BTreeMap::new();
    accreditation_numbers.insert("CETA".to_string(), "ACC-2023-0481".to_string());
    accreditation_numbers.insert("MERSETA".to_string(), "ACC-2024-1127".to_string());

    RegistrationDraft {
        company_name: "Ubuntu Skills Academy".to_string(),
        registration_number: "2015/123456/07".to_string(),
        organization_type: "Private Training Provider".to_string(),
        email: "info@ubuntuskills.co.za".to_string(),
        phone: "+27 11 555 0134".to_string(),
        first_name: "Naledi".to_string(),
        last_name: "Mokoena".to_string(),
        contact_email: "naledi@ubuntuskills.co.za".to_string(),
        contact_phone: "+27 82 555 0199".to_string(),
        position: "Programme Director".to_string(),
        password: "s3cure-pass".to_string(),
        confirm_password: "s3cure-pass".to_string(),
        established_year: "2015".to_string(),
        location: "Gauteng".to_string(),
        sectors: vec!["CETA".to_string(), "MERSETA".to_string()],
        goals: vec!["Expand learnership programmes".to_string()],
        accreditation_status: AccreditationStatus::Yes,
        accreditation_numbers,
        services: vec!["Learnerships".to_string(), "Skills Programmes".to_string()],
        learner_capacity: "250".to_string(),
        is_new_provider: false,
        company_registration_doc: Some(attachment("cipc-certificate.pdf")),
        identity_doc: Some(attachment("director-id.pdf")),
        reference_letters: vec![
            attachment("reference-merseta.pdf"),
            attachment("reference-ceta.pdf"),
            attachment("reference-client.pdf"),
        ],
        terms_accepted: true,
        ..RegistrationDraft::default()
    }
}

fn attachment(name: &str) -> DocumentAttachment {
    DocumentAttachment {
        name: name.to_string(),
        storage_key: format!("uploads/demo/{name}"),
    }
}
