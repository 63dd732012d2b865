//! Access gating
//!
//! Report generation takes an `AccessToken` argument instead of consulting a
//! global "logged in" flag. The only way to get a token is through
//! `AccessGate::authorize`.

use tracing::warn;

use crate::error::{ReportError, Result};

/// Proof that the caller passed the access gate
#[derive(Debug)]
pub struct AccessToken {
    _private: (),
}

/// Password check guarding report generation
#[derive(Debug, Clone, Default)]
pub struct AccessGate {
    secret: Option<String>,
}

impl AccessGate {
    /// Gate requiring `secret`; `None` leaves the gate open
    pub fn new(secret: Option<String>) -> Self {
        Self { secret }
    }

    pub fn open() -> Self {
        Self { secret: None }
    }

    pub fn is_open(&self) -> bool {
        self.secret.is_none()
    }

    pub fn authorize(&self, attempt: Option<&str>) -> Result<AccessToken> {
        match (&self.secret, attempt) {
            (None, _) => Ok(AccessToken { _private: () }),
            (Some(secret), Some(given)) if given == secret => Ok(AccessToken { _private: () }),
            (Some(_), Some(_)) => {
                warn!("Rejected report access attempt");
                Err(ReportError::Unauthorized("Incorrect password.".to_string()))
            }
            (Some(_), None) => Err(ReportError::Unauthorized(
                "a password is required".to_string(),
            )),
        }
    }
}
