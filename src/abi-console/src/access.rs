//! Owner-only gating of privileged functions.

use crate::constants::PRIVILEGED_FUNCTIONS;

/// Active caller and, when known, the account allowed to see privileged functions.
///
/// Addresses are kept as text and compared case-insensitively, so a checksummed and a
/// lower-cased rendering of the same account match.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallerIdentity {
    pub caller: Option<String>,
    pub privileged: Option<String>,
}

impl CallerIdentity {
    pub fn new(caller: Option<String>, privileged: Option<String>) -> Self {
        Self { caller, privileged }
    }
}

/// Hides privileged functions from unrecognized callers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessFilter {
    enabled: bool,
    privileged: Vec<String>,
}

impl Default for AccessFilter {
    fn default() -> Self {
        Self::new(PRIVILEGED_FUNCTIONS.iter().map(|s| s.to_string()).collect())
    }
}

impl AccessFilter {
    pub fn new(privileged: Vec<String>) -> Self {
        Self {
            enabled: true,
            privileged,
        }
    }

    /// A filter that shows everything.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            privileged: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_privileged(&self, name: &str) -> bool {
        self.privileged.iter().any(|p| p.eq_ignore_ascii_case(name))
    }

    /// Vacuously true when no privileged account is known.
    pub fn is_authorized(caller: Option<&str>, recognized: Option<&str>) -> bool {
        match (caller, recognized) {
            (_, None) => true,
            (Some(caller), Some(recognized)) => caller.eq_ignore_ascii_case(recognized),
            (None, Some(_)) => false,
        }
    }

    /// Whether a function named `name` is visible to `identity`.
    pub fn allows(&self, name: &str, identity: &CallerIdentity) -> bool {
        if !self.enabled || !self.is_privileged(name) {
            return true;
        }
        Self::is_authorized(identity.caller.as_deref(), identity.privileged.as_deref())
    }
}
