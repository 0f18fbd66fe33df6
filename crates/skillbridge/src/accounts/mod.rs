//! Account provisioning over the external identity provider and document
//! store. Both collaborators sit behind traits so workflows and tests run
//! against in-memory fakes.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Identifier wrapper for provisioned accounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(pub String);

/// Role claim attached to a session, separate from the stored profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    Sme,
    Sdp,
    Admin,
}

impl AccountRole {
    pub const fn label(self) -> &'static str {
        match self {
            AccountRole::Sme => "sme",
            AccountRole::Sdp => "sdp",
            AccountRole::Admin => "admin",
        }
    }

    /// Where the client lands after a successful registration or sign-in.
    pub const fn destination(self) -> &'static str {
        match self {
            AccountRole::Sme => "/sme/dashboard",
            AccountRole::Sdp => "/sdp/dashboard",
            AccountRole::Admin => "/admin",
        }
    }
}

/// Authenticated session snapshot carrying role and verification claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub account_id: AccountId,
    pub email: String,
    pub role: AccountRole,
    pub verified: bool,
}

impl Session {
    pub fn destination_after_login(&self) -> &'static str {
        self.role.destination()
    }
}

/// Seam for the managed identity provider.
pub trait IdentityProvider: Send + Sync {
    fn create_account(
        &self,
        email: &str,
        password: &str,
        role: AccountRole,
    ) -> Result<AccountId, IdentityError>;

    fn authenticate(&self, email: &str, password: &str) -> Result<Session, IdentityError>;

    fn current_session(&self) -> Option<Session>;
}

/// Identity provider failures. Credential mismatch is its own variant so the
/// boundary can answer 401 instead of a generic remote error.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("invalid email or password")]
    CredentialMismatch,
    #[error("an account already exists for {0}")]
    EmailInUse(String),
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
    #[error("identity provider rejected the request: {0}")]
    Rejected(String),
}

/// Seam for the managed document store holding denormalized profiles.
pub trait ProfileStore: Send + Sync {
    fn write_profile(
        &self,
        account_id: &AccountId,
        document: serde_json::Value,
        merge: bool,
    ) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document store unavailable: {0}")]
    Unavailable(String),
    #[error("document write rejected: {0}")]
    Rejected(String),
}

/// Seam for the privileged claim-setting function. Best-effort by contract.
pub trait ClaimSetter: Send + Sync {
    fn set_admin_claims(&self, account_id: &AccountId, authorization_key: &str)
        -> Result<(), ClaimError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ClaimError {
    #[error("claim setter unavailable: {0}")]
    Unavailable(String),
    #[error("claim request rejected: {0}")]
    Rejected(String),
}

/// Failures raised while provisioning an account. Claim failures never appear
/// here; they are logged and swallowed.
#[derive(Debug, thiserror::Error)]
pub enum ProvisioningError {
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Composes identity creation, the profile document write, and best-effort
/// claim setting into a single provisioning operation.
pub struct ProvisioningService<I, S, C> {
    identity: Arc<I>,
    store: Arc<S>,
    claims: Arc<C>,
    claim_key: Option<String>,
}

impl<I, S, C> ProvisioningService<I, S, C>
where
    I: IdentityProvider + 'static,
    S: ProfileStore + 'static,
    C: ClaimSetter + 'static,
{
    pub fn new(identity: Arc<I>, store: Arc<S>, claims: Arc<C>, claim_key: Option<String>) -> Self {
        Self {
            identity,
            store,
            claims,
            claim_key,
        }
    }

    /// Create the account and persist its profile document (merge write).
    /// Claim-setting failures are degraded-but-functional: the account stays
    /// usable, so they are logged and swallowed.
    pub fn provision(
        &self,
        email: &str,
        password: &str,
        role: AccountRole,
        document: serde_json::Value,
    ) -> Result<AccountId, ProvisioningError> {
        let account_id = self.identity.create_account(email, password, role)?;
        self.store.write_profile(&account_id, document, true)?;

        if let Some(key) = &self.claim_key {
            if let Err(err) = self.claims.set_admin_claims(&account_id, key) {
                warn!(account = %account_id.0, error = %err, "claim setting failed; continuing");
            }
        }

        Ok(account_id)
    }

    pub fn authenticate(&self, email: &str, password: &str) -> Result<Session, IdentityError> {
        self.identity.authenticate(email, password)
    }

    pub fn current_session(&self) -> Option<Session> {
        self.identity.current_session()
    }
}
