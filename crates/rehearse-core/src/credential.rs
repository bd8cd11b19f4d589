//! In-memory holder for the bearer credential.
//!
//! The store lives exactly as long as the controller that owns it. It never
//! persists, logs, or transmits the raw value; the transport reads it per
//! request through [`CredentialStore::get`].

use rehearse_types::credential::Credential;
use rehearse_types::error::CredentialError;

#[derive(Debug, Default)]
pub struct CredentialStore {
    current: Option<Credential>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shape-check and store a credential, replacing any previous one.
    ///
    /// On error the store is left untouched.
    pub fn set(&mut self, raw: &str) -> Result<(), CredentialError> {
        let credential = Credential::parse(raw)?;
        self.current = Some(credential);
        Ok(())
    }

    pub fn get(&self) -> Option<&Credential> {
        self.current.as_ref()
    }

    /// Drop the credential. Idempotent.
    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn is_set(&self) -> bool {
        self.current.is_some()
    }
}
