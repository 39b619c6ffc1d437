//! Bounded off-host link extraction from raw HTML.
//!
//! This is deliberately not an HTML parser. The scan walks the body looking
//! for the literal `href="` marker and reads each quoted value, which is
//! exactly enough to learn what a page points at without building a DOM.

use std::collections::HashSet;

/// Upper bound on links collected from a single page.
pub const MAX_PAGE_LINKS: usize = 16;

const HREF_MARKER: &str = "href=\"";

/// Scans `body` for off-host links.
///
/// A candidate is kept when it starts with `http` and does not contain
/// `origin_host` anywhere in the string. The host check is a substring test,
/// not a parsed-host comparison; it can drop an off-host link whose path
/// happens to mention the origin host, which is acceptable for probing.
///
/// The scan stops once the set holds `capacity` entries or at the first
/// unterminated attribute value. Extraction never fails; malformed markup
/// just ends it early. First-occurrence order decides which links survive a
/// capacity cut, and duplicates do not consume capacity.
pub fn extract_links(body: &str, origin_host: &str, capacity: usize) -> HashSet<String> {
    let mut links = HashSet::with_capacity(capacity);
    let mut cursor = 0;

    while links.len() < capacity {
        // Seek the next marker.
        let Some(found) = body[cursor..].find(HREF_MARKER) else {
            break;
        };
        let value_start = cursor + found + HREF_MARKER.len();

        // Seek the closing quote; an unterminated value ends the scan.
        let Some(value_len) = body[value_start..].find('"') else {
            break;
        };
        let candidate = &body[value_start..value_start + value_len];

        if candidate.starts_with("http") && !candidate.contains(origin_host) {
            links.insert(candidate.to_string());
        }

        cursor = value_start + value_len;
    }

    links
}
