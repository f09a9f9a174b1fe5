//! Digest identity derivation and paper-id normalization.
//!
//! A digest identity is a pure function of `(topic, days)` — never of the
//! optional request parameters — so re-saving the same topic and window
//! always lands on the same row or document, whichever backend is active.

use sha2::{Digest as _, Sha256};

use crate::enums::Period;

/// Fixed tag prefixed to every digest identity.
const DIGEST_ID_TAG: &str = "dg";

/// Hex characters of the hash kept in the identity.
const DIGEST_ID_HEX_LEN: usize = 10;

/// Known URL prefixes stripped from arXiv identifiers.
const ARXIV_URL_PREFIXES: [&str; 4] = [
    "https://arxiv.org/abs/",
    "http://arxiv.org/abs/",
    "https://arxiv.org/pdf/",
    "http://arxiv.org/pdf/",
];

/// Derive the deterministic identity for a `(topic, days)` pair.
///
/// Returns e.g. `"dg_3f2a9c01b4"`. Stable across process restarts and across
/// both cache backends.
#[must_use]
pub fn build_digest_id(topic: &str, days: i64) -> String {
    let hash = Sha256::digest(format!("{topic}_{days}").as_bytes());
    let mut hex = String::with_capacity(DIGEST_ID_HEX_LEN);
    for byte in hash.iter().take(DIGEST_ID_HEX_LEN.div_ceil(2)) {
        hex.push_str(&format!("{byte:02x}"));
    }
    hex.truncate(DIGEST_ID_HEX_LEN);
    format!("{DIGEST_ID_TAG}_{hex}")
}

/// Normalize an arXiv identifier or URL to a bare paper identity.
///
/// Strips `http(s)://arxiv.org/{abs,pdf}/` prefixes, an `arxiv:` scheme
/// prefix, and a trailing `.pdf`, so the same paper reached via different URL
/// forms maps to one identity. Returns `None` when nothing usable remains.
#[must_use]
pub fn normalize_arxiv_id(value: &str) -> Option<String> {
    let mut cleaned = value.trim();
    if cleaned.is_empty() {
        return None;
    }

    let lower = cleaned.to_ascii_lowercase();
    for prefix in ARXIV_URL_PREFIXES {
        if lower.starts_with(prefix) {
            cleaned = &cleaned[prefix.len()..];
            break;
        }
    }

    // Byte-wise check so a non-ASCII prefix can never split a char boundary.
    if cleaned.len() >= 6 && cleaned.as_bytes()[..6].eq_ignore_ascii_case(b"arxiv:") {
        cleaned = &cleaned[6..];
    }

    let cleaned = cleaned.replace(".pdf", "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

/// Expand the search window for the requested period.
///
/// Monthly digests cover at least 28 days; the expansion happens *before*
/// identity derivation so monthly and weekly requests never share a row.
#[must_use]
pub fn effective_days(period: Period, days: i64) -> i64 {
    match period {
        Period::Monthly => days.max(28),
        Period::Weekly => days,
    }
}
