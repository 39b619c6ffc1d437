pub mod error;
pub mod links;
pub mod result;
pub mod retry;
pub mod stats;
pub mod status;
pub mod visitor;

pub use error::{LinkFailure, VisitError};
pub use links::{MAX_PAGE_LINKS, extract_links};
pub use result::VisitReport;
pub use retry::{RetryDecision, RetryPolicy, retrieve_with_retry};
pub use stats::{AtomicVisitStats, StatsSnapshot, VisitStats};
pub use status::{StatusClass, classify_status};
pub use visitor::{SiteVisitor, build_probe_client};
