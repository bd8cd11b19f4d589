use secrecy::{ExposeSecret, SecretString};

use crate::error::CredentialError;

use std::fmt;

/// Literal tag every credential must start with.
///
/// This is only a cheap shape check; the credential is validated for real by
/// the interview service, which answers 401 when it rejects it.
pub const CREDENTIAL_PREFIX: &str = "sk-or-v1-";

/// Header the credential is injected into on every request.
pub const CREDENTIAL_HEADER: &str = "X-API-Key";

/// An opaque bearer credential.
///
/// The raw value lives in a [`SecretString`] and is only reachable through
/// [`Credential::expose`]. `Debug` and `Display` never print it.
#[derive(Clone)]
pub struct Credential(SecretString);

impl Credential {
    /// Shape-check a raw credential and wrap it.
    ///
    /// Surrounding whitespace is trimmed first. Empty input or input missing
    /// [`CREDENTIAL_PREFIX`] fails with [`CredentialError::InvalidFormat`].
    pub fn parse(raw: &str) -> Result<Self, CredentialError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CredentialError::InvalidFormat(
                "please paste your credential".to_string(),
            ));
        }
        if !trimmed.starts_with(CREDENTIAL_PREFIX) {
            return Err(CredentialError::InvalidFormat(format!(
                "credential should start with \"{CREDENTIAL_PREFIX}\""
            )));
        }
        Ok(Self(SecretString::from(trimmed.to_string())))
    }

    /// Access the raw value. Only the transport should call this.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Show masked representation: last 4 chars visible.
    pub fn masked(&self) -> String {
        let raw = self.expose();
        let count = raw.chars().count();
        if count <= 4 {
            return "****".to_string();
        }
        let tail: String = raw.chars().skip(count - 4).collect();
        format!("****{tail}")
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential(\"***\")")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***")
    }
}
