use crate::error::{LinkFailure, Result, VisitError};
use crate::links::{MAX_PAGE_LINKS, extract_links};
use crate::stats::{AtomicVisitStats, StatsSnapshot, VisitStats};
use crate::status::{StatusClass, classify_status};
use encoding_rs::Encoding;
use reqwest::Client;
use reqwest::header::{
    ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

// Some sites only give proper responses when browser headers are present.
pub const PROBE_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/64.0.3282.186 Safari/537.36";
pub const PROBE_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
pub const PROBE_ACCEPT_ENCODING: &str = "gzip, deflate, br";
pub const PROBE_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8";

/// Builds the shared HTTP client with the fixed browser headers.
///
/// Headers are set once per client; every request the client issues carries
/// them. Timeouts and pooling are transport concerns, not part of the visit
/// contract.
pub fn build_probe_client() -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(PROBE_USER_AGENT));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static(PROBE_ACCEPT_LANGUAGE),
    );
    headers.insert(
        ACCEPT_ENCODING,
        HeaderValue::from_static(PROBE_ACCEPT_ENCODING),
    );
    headers.insert(ACCEPT, HeaderValue::from_static(PROBE_ACCEPT));

    let client = Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(15))
        .pool_max_idle_per_host(50)
        .pool_idle_timeout(Duration::from_secs(90))
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()?;

    Ok(client)
}

/// Visits sites and walks one layer of their outbound links.
pub struct SiteVisitor {
    client: Client,
    stats: Arc<dyn VisitStats>,
    max_links: usize,
}

impl SiteVisitor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: build_probe_client()?,
            stats: Arc::new(AtomicVisitStats::new()),
            max_links: MAX_PAGE_LINKS,
        })
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_stats(mut self, stats: Arc<dyn VisitStats>) -> Self {
        self.stats = stats;
        self
    }

    pub fn with_max_links(mut self, max_links: usize) -> Self {
        self.max_links = max_links;
        self
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Visits `site` and, when `get_links` is set, every off-host link its
    /// page declares, depth fixed at one.
    ///
    /// Link fetches are attempted independently; their failures are collected
    /// and raised together as [`VisitError::LinkFailures`] once all links have
    /// been tried. Returns the parent page's link set.
    pub async fn visit(&self, site: &str, get_links: bool) -> Result<HashSet<String>> {
        info!("Visiting {}", site);

        let links = self.fetch_page(site, get_links).await?;

        let mut failures = Vec::new();
        for link in &links {
            debug!("Following link {}", link);
            if let Err(e) = self.fetch_page(link, false).await {
                debug!("Link fetch failed for {}: {}", link, e);
                failures.push(LinkFailure {
                    link: link.clone(),
                    message: e.to_string(),
                });
            }
        }

        info!("{}", self.stats.snapshot());

        if !failures.is_empty() {
            return Err(VisitError::LinkFailures {
                site: site.to_string(),
                failures,
            });
        }

        Ok(links)
    }

    /// One GET against `site`; extracts links only when asked and only from a
    /// page that classified as a success.
    async fn fetch_page(&self, site: &str, get_links: bool) -> Result<HashSet<String>> {
        let host = Url::parse(site)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .ok_or_else(|| VisitError::InvalidUrl(site.to_string()))?;

        self.stats.record_attempt();
        debug!("Fetching {}", site);
        let response = self.client.get(site).send().await?;
        let status = response.status().as_u16();

        match classify_status(status) {
            StatusClass::Success => {
                self.stats.record_success();
                if !get_links {
                    return Ok(HashSet::new());
                }
                let charset = content_type_charset(response.headers());
                let bytes = response.bytes().await?;
                if bytes.is_empty() {
                    return Ok(HashSet::new());
                }
                let body = decode_body(site, &bytes, charset.as_deref())?;
                Ok(extract_links(&body, &host, self.max_links))
            }
            StatusClass::Tolerated => {
                debug!("{} returned tolerated status {}", site, status);
                self.stats.record_success();
                Ok(HashSet::new())
            }
            StatusClass::Unexpected => Err(VisitError::UnexpectedStatus {
                site: site.to_string(),
                status,
            }),
        }
    }
}

/// Decodes a response body, preferring the negotiated charset, falling back
/// once to strict UTF-8.
fn decode_body(site: &str, bytes: &[u8], charset: Option<&str>) -> Result<String> {
    if let Some(label) = charset
        && let Some(encoding) = Encoding::for_label(label.as_bytes())
    {
        let (text, _, had_errors) = encoding.decode(bytes);
        if !had_errors {
            return Ok(text.into_owned());
        }
        debug!("{} body is not valid {}, retrying as UTF-8", site, label);
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text.to_string()),
        Err(_) => Err(VisitError::Decode {
            site: site.to_string(),
            charset: charset.unwrap_or("utf-8").to_string(),
        }),
    }
}

/// Pulls the charset parameter out of a Content-Type header, if any.
fn content_type_charset(headers: &HeaderMap) -> Option<String> {
    let content_type = headers.get(CONTENT_TYPE)?.to_str().ok()?;
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"').to_string())
    })
}
