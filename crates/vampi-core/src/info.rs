//! Descriptive service snapshot for info and diagnostic endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;


/// Service name reported by the info endpoints.
pub const SERVICE_NAME: &str = "VAmPI the Vulnerable API";

/// Purpose text reported by the info endpoints.
pub const SERVICE_PURPOSE: &str = "VAmPI is a vulnerable on purpose API. It was created in order to \
     evaluate the efficiency of third party tools in identifying vulnerabilities in APIs but it can \
     also be used in learning/teaching purposes.";

/// Point-in-time description of the running service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoSnapshot {
    pub service: &'static str,
    pub purpose: &'static str,
    /// The resolved vulnerable-mode flag, verbatim.
    pub vulnerable: bool,
    pub environment: String,
    pub deployment: String,
    pub timestamp: DateTime<Utc>,
}
