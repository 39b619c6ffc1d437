use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Outcome of one site verification, link pass included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitReport {
    pub site: String,
    pub links_followed: Vec<String>,
    pub elapsed: Duration,
    pub error: Option<String>,
}

impl VisitReport {
    pub fn new(site: String) -> Self {
        Self {
            site,
            links_followed: Vec::new(),
            elapsed: Duration::from_secs(0),
            error: None,
        }
    }

    pub fn with_error(site: String, error: String) -> Self {
        Self {
            site,
            links_followed: Vec::new(),
            elapsed: Duration::from_secs(0),
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
