//! Staleness state machine for per-paper citation data.
//!
//! ```text
//! unknown ──┐
//!           ├── refresh ──> fresh ── ttl elapses ──> stale ──┐
//! stale ────┘                 ^──────────── refresh ─────────┘
//! ```

use chrono::{DateTime, Utc};

use scry_core::entities::PaperMeta;

/// Where a paper identity sits in the citation lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// No metadata row exists.
    Unknown,
    /// Metadata exists but citations were never synced, the sync stamp is
    /// unreadable, or the TTL has elapsed.
    Stale,
    /// Synced within the TTL.
    Fresh,
}

impl SyncState {
    /// Whether this state triggers a refresh.
    #[must_use]
    pub const fn needs_refresh(self) -> bool {
        !matches!(self, Self::Fresh)
    }
}

/// Classify a paper's citation data at `now`.
///
/// An unparsable `citations_synced_at` counts as stale — unlike the digest
/// TTL this fails *closed*, because re-syncing is cheap and correct while
/// serving a broken stamp forever is neither.
#[must_use]
pub fn sync_state(meta: Option<&PaperMeta>, now: DateTime<Utc>, ttl_hours: i64) -> SyncState {
    let Some(meta) = meta else {
        return SyncState::Unknown;
    };
    let Some(synced) = meta.citations_synced_at.as_deref() else {
        return SyncState::Stale;
    };
    let Ok(synced_at) = DateTime::parse_from_rfc3339(synced) else {
        return SyncState::Stale;
    };
    if now - synced_at.with_timezone(&Utc) > chrono::Duration::hours(ttl_hours) {
        SyncState::Stale
    } else {
        SyncState::Fresh
    }
}
