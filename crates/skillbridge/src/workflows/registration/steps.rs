use serde::Serialize;

/// Ordered wizard positions. Step 7 is terminal; advancing past it is a no-op
/// and submission happens from there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    CompanyInfo,
    ContactCredentials,
    OrganizationProfile,
    AccreditationGoals,
    Services,
    Documents,
    ReviewPayment,
}

impl WizardStep {
    pub const FIRST: WizardStep = WizardStep::CompanyInfo;
    pub const LAST: WizardStep = WizardStep::ReviewPayment;

    pub const fn ordinal(self) -> u8 {
        match self {
            WizardStep::CompanyInfo => 1,
            WizardStep::ContactCredentials => 2,
            WizardStep::OrganizationProfile => 3,
            WizardStep::AccreditationGoals => 4,
            WizardStep::Services => 5,
            WizardStep::Documents => 6,
            WizardStep::ReviewPayment => 7,
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            WizardStep::CompanyInfo => "Company Information",
            WizardStep::ContactCredentials => "Contact Person & Credentials",
            WizardStep::OrganizationProfile => "Organization Profile",
            WizardStep::AccreditationGoals => "Accreditation & Goals",
            WizardStep::Services => "Services Offered",
            WizardStep::Documents => "Document Upload",
            WizardStep::ReviewPayment => "Review & Payment",
        }
    }

    /// Key the client uses to highlight the affected form section.
    pub const fn section_key(self) -> &'static str {
        match self {
            WizardStep::CompanyInfo => "companyInfo",
            WizardStep::ContactCredentials => "contactCredentials",
            WizardStep::OrganizationProfile => "organizationProfile",
            WizardStep::AccreditationGoals => "accreditationGoals",
            WizardStep::Services => "services",
            WizardStep::Documents => "documents",
            WizardStep::ReviewPayment => "reviewPayment",
        }
    }

    pub const fn next(self) -> Option<WizardStep> {
        match self {
            WizardStep::CompanyInfo => Some(WizardStep::ContactCredentials),
            WizardStep::ContactCredentials => Some(WizardStep::OrganizationProfile),
            WizardStep::OrganizationProfile => Some(WizardStep::AccreditationGoals),
            WizardStep::AccreditationGoals => Some(WizardStep::Services),
            WizardStep::Services => Some(WizardStep::Documents),
            WizardStep::Documents => Some(WizardStep::ReviewPayment),
            WizardStep::ReviewPayment => None,
        }
    }

    pub const fn previous(self) -> Option<WizardStep> {
        match self {
            WizardStep::CompanyInfo => None,
            WizardStep::ContactCredentials => Some(WizardStep::CompanyInfo),
            WizardStep::OrganizationProfile => Some(WizardStep::ContactCredentials),
            WizardStep::AccreditationGoals => Some(WizardStep::OrganizationProfile),
            WizardStep::Services => Some(WizardStep::AccreditationGoals),
            WizardStep::Documents => Some(WizardStep::Services),
            WizardStep::ReviewPayment => Some(WizardStep::Documents),
        }
    }

    pub fn all() -> [WizardStep; 7] {
        [
            WizardStep::CompanyInfo,
            WizardStep::ContactCredentials,
            WizardStep::OrganizationProfile,
            WizardStep::AccreditationGoals,
            WizardStep::Services,
            WizardStep::Documents,
            WizardStep::ReviewPayment,
        ]
    }
}
