//! Authentication collaborator
//!
//! Sessions are owned elsewhere; the domain only asks "who is calling, if
//! anyone". The CLI answers from `config.json` (`principal_email`) or the
//! `STOCKBOOK_USER` environment variable.

use crate::config::settings::AppSettings;

/// Environment variable naming the signed-in user
pub const PRINCIPAL_ENV: &str = "STOCKBOOK_USER";

/// An authenticated identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub email: String,
}

impl Principal {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }
}

/// Source of the current principal
pub trait SessionProvider {
    fn current_principal(&self) -> Option<Principal>;
}

/// A session fixed at construction time
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    principal: Option<Principal>,
}

impl StaticSession {
    pub fn signed_in(email: impl Into<String>) -> Self {
        Self {
            principal: Some(Principal::new(email)),
        }
    }

    pub fn anonymous() -> Self {
        Self { principal: None }
    }

    /// Session for the CLI: the environment wins over `config.json`
    pub fn from_settings(settings: &AppSettings) -> Self {
        let email = std::env::var(PRINCIPAL_ENV)
            .ok()
            .or_else(|| settings.principal_email.clone())
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());

        Self {
            principal: email.map(Principal::new),
        }
    }
}

impl SessionProvider for StaticSession {
    fn current_principal(&self) -> Option<Principal> {
        self.principal.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_sessions() {
        assert!(StaticSession::anonymous().current_principal().is_none());
        assert_eq!(
            StaticSession::signed_in("admin@inventory.com").current_principal(),
            Some(Principal::new("admin@inventory.com"))
        );
    }

    #[test]
    fn test_blank_configured_email_is_anonymous() {
        let settings = AppSettings {
            principal_email: Some("   ".into()),
            ..AppSettings::default()
        };
        if std::env::var(PRINCIPAL_ENV).is_err() {
            assert!(StaticSession::from_settings(&settings)
                .current_principal()
                .is_none());
        }
    }
}
