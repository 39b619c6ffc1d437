use thiserror::Error;

/// One failed depth-1 link fetch, kept alongside the parent page's error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkFailure {
    pub link: String,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum VisitError {
    #[error("{site} returned unexpected status {status}")]
    UnexpectedStatus { site: String, status: u16 },

    #[error("link failures for site {site}: {}", join_failures(.failures))]
    LinkFailures {
        site: String,
        failures: Vec<LinkFailure>,
    },

    #[error("could not decode body from {site} (charset {charset})")]
    Decode { site: String, charset: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

fn join_failures(failures: &[LinkFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("Link:{} => {}", f.link, f.message))
        .collect::<Vec<_>>()
        .join(" | ")
}

pub type Result<T> = std::result::Result<T, VisitError>;
