//! Cache Entry Module
//!
//! Defines the persisted cache entry and its expiration policy: optional
//! absolute expiration, optional sliding expiration, and the effective
//! `expires_at` instant recomputed on every access.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

// == Entry Options ==
/// Expiration options supplied when an entry is stored.
///
/// When `absolute_expiration_relative_to_now` is set it takes precedence
/// over `absolute_expiration` in resolving the effective absolute instant.
#[derive(Debug, Clone, Default)]
pub struct EntryOptions {
    /// Fixed instant after which the entry is invalid regardless of access.
    pub absolute_expiration: Option<DateTime<Utc>>,
    /// Absolute expiration expressed as a duration from "now".
    pub absolute_expiration_relative_to_now: Option<Duration>,
    /// Window that resets to this duration from "now" on every access.
    pub sliding_expiration: Option<Duration>,
}

impl EntryOptions {
    /// Options with no expiration at all: the entry never expires.
    pub fn never() -> Self {
        Self::default()
    }

    /// Sets a fixed absolute expiration instant.
    pub fn with_absolute_expiration(mut self, at: DateTime<Utc>) -> Self {
        self.absolute_expiration = Some(at);
        self
    }

    /// Sets an absolute expiration relative to "now".
    pub fn with_absolute_expiration_relative_to_now(mut self, after: Duration) -> Self {
        self.absolute_expiration_relative_to_now = Some(after);
        self
    }

    /// Sets a sliding expiration window.
    pub fn with_sliding_expiration(mut self, window: Duration) -> Self {
        self.sliding_expiration = Some(window);
        self
    }

    /// Resolves the effective absolute expiration instant.
    ///
    /// A relative-to-now duration takes precedence over an explicit instant.
    /// Fails when the resolved instant is not strictly after `now`.
    fn resolve_absolute_expiration(&self, now: DateTime<Utc>) -> Result<Option<DateTime<Utc>>> {
        let mut rval = self.absolute_expiration;

        if let Some(after) = self.absolute_expiration_relative_to_now {
            rval = Some(add_duration(now, after.as_secs_f64()));
        }

        if let Some(at) = rval {
            if at <= now {
                return Err(CacheError::InvalidConfiguration(format!(
                    "absolute expiration must be in the future; now is {}, absolute expiration is {}",
                    now, at
                )));
            }
        }

        Ok(rval)
    }
}

// == Cache Entry ==
/// A single cached value plus its expiration policy, as persisted in the
/// backing store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    /// Unique, case-sensitive identifier chosen by the caller.
    pub key: String,
    /// The cached payload.
    pub value: Vec<u8>,
    /// Effective expiration instant; `None` means the entry never expires.
    pub expires_at: Option<DateTime<Utc>>,
    /// Sliding window in seconds, if sliding expiration is configured.
    pub sliding_expiration_seconds: Option<f64>,
    /// Fixed upper bound on validity, if absolute expiration is configured.
    pub absolute_expiration: Option<DateTime<Utc>>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry, resolving the expiration options against
    /// the current time.
    ///
    /// Fails with [`CacheError::InvalidConfiguration`] when the resolved
    /// absolute expiration is not strictly in the future.
    pub fn new(key: String, value: Vec<u8>, options: &EntryOptions) -> Result<Self> {
        let now = Utc::now();

        let absolute_expiration = options.resolve_absolute_expiration(now)?;
        let sliding_expiration_seconds = options.sliding_expiration.map(|w| w.as_secs_f64());
        let expires_at = compute_expires_at(now, sliding_expiration_seconds, absolute_expiration);

        Ok(Self {
            key,
            value,
            expires_at,
            sliding_expiration_seconds,
            absolute_expiration,
        })
    }

    // == Refresh ==
    /// Recomputes `expires_at` as of "now".
    ///
    /// Extends a sliding window, never past the absolute expiration. For
    /// entries without sliding expiration this is idempotent: the absolute
    /// instant (or `None`) is recomputed unchanged.
    pub fn refresh_expires_at(&mut self) {
        let now = Utc::now();

        self.expires_at = compute_expires_at(
            now,
            self.sliding_expiration_seconds,
            self.absolute_expiration,
        );
    }

    // == Is Expired ==
    /// Checks whether the entry is logically expired at `now`.
    ///
    /// An entry is expired once `now` reaches `expires_at`; the instant
    /// itself is already outside the validity window. Entries without
    /// `expires_at` never expire.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }
}

// == Expiration Computation ==
/// Computes the effective expiration instant from the sliding window and the
/// absolute bound.
///
/// Stateless so the sliding-vs-absolute interaction is testable without a
/// clock or storage:
/// - neither configured: `None` (never expires)
/// - absolute only: the absolute instant
/// - sliding only: `now + window`
/// - both: the sliding candidate, unless it would pass the absolute instant;
///   a candidate equal to the absolute instant counts as pinned to it
pub fn compute_expires_at(
    now: DateTime<Utc>,
    sliding_seconds: Option<f64>,
    absolute: Option<DateTime<Utc>>,
) -> Option<DateTime<Utc>> {
    let sliding_at = sliding_seconds.map(|secs| add_duration(now, secs));

    match (sliding_at, absolute) {
        (None, None) => None,
        (None, Some(absolute)) => Some(absolute),
        (Some(sliding_at), None) => Some(sliding_at),
        (Some(sliding_at), Some(absolute)) => {
            if sliding_at > absolute {
                Some(absolute)
            } else {
                Some(sliding_at)
            }
        }
    }
}

/// Adds a fractional-second duration to an instant, saturating instead of
/// overflowing for pathological windows.
fn add_duration(at: DateTime<Utc>, seconds: f64) -> DateTime<Utc> {
    let millis = (seconds * 1000.0) as i64;
    at.checked_add_signed(chrono::Duration::milliseconds(millis))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
