//! Environment variable credential source.
//!
//! Lets `rehearse` log in non-interactively. The value is read once at login
//! and handed straight to the controller's credential store; it is never
//! written anywhere by the client.

use tracing::debug;

/// Reads the credential from a named environment variable.
pub struct EnvCredentialSource {
    var: String,
}

impl EnvCredentialSource {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    /// Name of the variable consulted.
    pub fn var(&self) -> &str {
        &self.var
    }

    /// The raw variable value, if set and non-blank.
    ///
    /// Shape checking happens at login, not here.
    pub fn read(&self) -> Option<String> {
        match std::env::var(&self.var) {
            Ok(val) if !val.trim().is_empty() => {
                debug!(var = %self.var, "Credential found in environment");
                Some(val)
            }
            Ok(_) => None,
            Err(std::env::VarError::NotPresent) => None,
            // Not valid Unicode, so it cannot be a credential either.
            Err(std::env::VarError::NotUnicode(_)) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_returns_set_value() {
        let var = "REHEARSE_TEST_CREDENTIAL_SET";
        // SAFETY: unique variable name, restored before the test returns.
        unsafe {
            std::env::set_var(var, "sk-or-v1-abc");
        }
        let source = EnvCredentialSource::new(var);
        assert_eq!(source.read().as_deref(), Some("sk-or-v1-abc"));
        unsafe {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn read_ignores_blank_and_missing() {
        let var = "REHEARSE_TEST_CREDENTIAL_BLANK";
        let source = EnvCredentialSource::new(var);
        assert_eq!(source.read(), None);

        // SAFETY: unique variable name, restored before the test returns.
        unsafe {
            std::env::set_var(var, "   ");
        }
        assert_eq!(source.read(), None);
        unsafe {
            std::env::remove_var(var);
        }
    }
}
