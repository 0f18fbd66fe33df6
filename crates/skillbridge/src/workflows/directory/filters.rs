use serde::{Deserialize, Serialize};

use super::profile::{Availability, SmeProfile};

/// Sparse filter record. An unset field means "no constraint", not "empty
/// string".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchFilters {
    pub role: Option<String>,
    pub sector: Option<String>,
    pub location: Option<String>,
    pub availability: Option<Availability>,
    pub specialization: Option<String>,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        self.role.is_none()
            && self.sector.is_none()
            && self.location.is_none()
            && self.availability.is_none()
            && self.specialization.is_none()
    }

    /// Conjunctive filter match: every set field must hold.
    pub fn matches(&self, profile: &SmeProfile) -> bool {
        if let Some(role) = &self.role {
            if !profile
                .role_list()
                .iter()
                .any(|candidate| contains_ci(candidate, role))
            {
                return false;
            }
        }

        if let Some(sector) = &self.sector {
            if !profile.sectors.iter().any(|candidate| candidate == sector) {
                return false;
            }
        }

        if let Some(location) = &self.location {
            if &profile.location != location {
                return false;
            }
        }

        if let Some(availability) = self.availability {
            if profile.availability != availability {
                return false;
            }
        }

        if let Some(specialization) = &self.specialization {
            if !profile
                .specializations
                .iter()
                .any(|candidate| contains_ci(candidate, specialization))
            {
                return false;
            }
        }

        true
    }
}

/// Free-text match over name, specializations, and roles. An empty query
/// matches everything.
pub fn matches_query(profile: &SmeProfile, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }

    contains_ci(&profile.name, query)
        || profile
            .specializations
            .iter()
            .any(|specialization| contains_ci(specialization, query))
        || profile.role_list().iter().any(|role| contains_ci(role, query))
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
