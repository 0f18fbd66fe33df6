use serde::{Deserialize, Serialize};

/// SME availability as advertised on the profile card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Availability {
    Available,
    Busy,
    Offline,
    Away,
}

impl Availability {
    pub const fn label(self) -> &'static str {
        match self {
            Availability::Available => "Available",
            Availability::Busy => "Busy",
            Availability::Offline => "Offline",
            Availability::Away => "Away",
        }
    }
}

/// Denormalized Subject Matter Expert read model, sourced entirely from the
/// external store. The directory never mutates these records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SmeProfile {
    pub id: String,
    pub name: String,
    /// Preferred plural role list.
    pub roles: Vec<String>,
    /// Legacy single-role field, honored only when `roles` is empty.
    pub role: Option<String>,
    pub specializations: Vec<String>,
    pub sectors: Vec<String>,
    pub location: String,
    pub rating: f32,
    pub review_count: u32,
    pub availability: Availability,
    pub verified: bool,
}

impl Default for SmeProfile {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            roles: Vec::new(),
            role: None,
            specializations: Vec::new(),
            sectors: Vec::new(),
            location: String::new(),
            rating: 0.0,
            review_count: 0,
            availability: Availability::Offline,
            verified: false,
        }
    }
}

impl SmeProfile {
    /// Effective role list: the legacy singular field counts as a one-element
    /// list when the plural field is absent.
    pub fn role_list(&self) -> Vec<&str> {
        if self.roles.is_empty() {
            self.role.as_deref().into_iter().collect()
        } else {
            self.roles.iter().map(String::as_str).collect()
        }
    }
}
