//! Whole-visit retry: repeat a site visit until it succeeds or the policy
//! says stop.

use crate::error::Result;
use crate::visitor::SiteVisitor;
use std::collections::HashSet;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Give up and surface the error.
    Stop,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Fixed-backoff policy for whole site visits.
///
/// Every failure is treated as retryable; probing uncontrolled third-party
/// sites means transient trouble is the norm, so there is nothing to classify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Delay between attempts.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            backoff: Duration::from_millis(1500),
        }
    }
}

impl RetryPolicy {
    /// `attempt` is 1-based (1 = first attempt). Returns
    /// [`RetryDecision::Stop`] once `max_attempts` have been made.
    pub fn decide(&self, attempt: u32) -> RetryDecision {
        if attempt >= self.max_attempts {
            RetryDecision::Stop
        } else {
            RetryDecision::RetryAfter(self.backoff)
        }
    }
}

/// Visits `site` under `policy`, retrying the whole round (page plus link
/// pass) on any failure.
///
/// Only the final attempt's error is surfaced; earlier failures are traced at
/// debug level and discarded. Individual link fetches inside a round are never
/// retried on their own.
pub async fn retrieve_with_retry(
    visitor: &SiteVisitor,
    site: &str,
    get_links: bool,
    policy: &RetryPolicy,
) -> Result<HashSet<String>> {
    let mut attempt = 1u32;
    loop {
        match visitor.visit(site, get_links).await {
            Ok(links) => return Ok(links),
            Err(e) => match policy.decide(attempt) {
                RetryDecision::Stop => return Err(e),
                RetryDecision::RetryAfter(delay) => {
                    debug!(
                        "Attempt {} for {} failed ({}), retrying in {:?}",
                        attempt, site, e, delay
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
            },
        }
    }
}
