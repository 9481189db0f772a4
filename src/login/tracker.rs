//! Concurrent login-attempt counter with a sliding TTL.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::config::schema::LoginConfig;
use crate::login::clock::{Clock, SystemClock};
use crate::login::record::{AttemptRecord, Fingerprint, LoginInput, TrackerResult};
use crate::observability::metrics;

/// A stored record and the instant it stops counting.
///
/// `expires_at` is `None` when `now + ttl` is not representable; such a
/// record never expires.
#[derive(Debug, Clone)]
struct Slot {
    record: AttemptRecord,
    expires_at: Option<Instant>,
}

impl Slot {
    fn is_expired(&self, now: Instant) -> bool {
        matches!(self.expires_at, Some(at) if now >= at)
    }
}

/// Tracks login attempts per (username, address) pair.
///
/// Cloning is cheap and every clone shares the same store, so a single
/// tracker built at startup can be handed to each request handler.
#[derive(Clone)]
pub struct AttemptTracker {
    inner: Arc<DashMap<Fingerprint, Slot>>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    fallback_address: String,
    max_address_len: usize,
}

impl AttemptTracker {
    /// Create a tracker using the system clock.
    pub fn new(config: &LoginConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a tracker with an explicit time source.
    pub fn with_clock(config: &LoginConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            clock,
            ttl: Duration::from_secs(config.ttl_secs),
            fallback_address: config.fallback_address.clone(),
            max_address_len: config.max_address_len,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn parse<'a>(&'a self, username: &'a str, address: Option<&'a str>) -> TrackerResult<LoginInput<'a>> {
        LoginInput::parse(username, address, &self.fallback_address, self.max_address_len)
    }

    /// Current record for the pair, or `None` if absent or expired.
    pub fn get_attempt(&self, username: &str, address: Option<&str>) -> TrackerResult<Option<AttemptRecord>> {
        let key = self.parse(username, address)?.fingerprint();
        let now = self.clock.now();

        if let Some(slot) = self.inner.get(&key) {
            if !slot.is_expired(now) {
                return Ok(Some(slot.record.clone()));
            }
        }

        // Guard dropped above; evict lazily.
        if self.inner.remove_if(&key, |_, slot| slot.is_expired(now)).is_some() {
            metrics::record_evictions(1);
            tracing::debug!(key = %key, "Expired login attempt record evicted");
        }
        Ok(None)
    }

    /// Attempt count for the pair; 0 when unknown, expired or invalid.
    pub fn attempts(&self, username: &str, address: Option<&str>) -> u32 {
        match self.get_attempt(username, address) {
            Ok(Some(record)) => record.attempt,
            Ok(None) => 0,
            Err(e) => {
                tracing::debug!(error = %e, "Attempt lookup rejected");
                0
            }
        }
    }

    /// Record one attempt and return the updated record.
    ///
    /// The read-modify-write runs under the shard lock for this key, so
    /// concurrent callers for the same pair never lose an increment. The
    /// TTL window restarts from now.
    pub fn record_attempt(
        &self,
        username: &str,
        address: Option<&str>,
        user_agent: Option<&str>,
    ) -> TrackerResult<AttemptRecord> {
        let input = self.parse(username, address)?;
        let key = input.fingerprint();
        let now = self.clock.now();
        let expires_at = now.checked_add(self.ttl);

        let record = match self.inner.entry(key) {
            Entry::Occupied(mut occupied) => {
                let slot = occupied.get_mut();
                slot.record = if slot.is_expired(now) {
                    AttemptRecord::first(slot.record.key.clone(), input.username, input.address, user_agent)
                } else {
                    slot.record.next(user_agent)
                };
                slot.expires_at = expires_at;
                slot.record.clone()
            }
            Entry::Vacant(vacant) => {
                let record = AttemptRecord::first(vacant.key().clone(), input.username, input.address, user_agent);
                vacant.insert(Slot {
                    record: record.clone(),
                    expires_at,
                });
                record
            }
        };

        metrics::record_login_attempt();
        tracing::debug!(key = %record.key, attempt = record.attempt, "Login attempt recorded");

        Ok(record)
    }

    /// Drop every expired record. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut removed = 0;
        self.inner.retain(|_, slot| {
            let expired = slot.is_expired(now);
            if expired {
                removed += 1;
            }
            !expired
        });

        let remaining = self.inner.len();
        if removed > 0 {
            metrics::record_evictions(removed);
            tracing::info!(removed, remaining, "Purged expired login attempts");
        }
        metrics::record_tracked_keys(remaining);
        removed
    }

    /// Number of stored records, expired ones included until purged.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Snapshot of all live records.
    pub fn snapshot(&self) -> Vec<AttemptRecord> {
        let now = self.clock.now();
        self.inner
            .iter()
            .filter(|slot| !slot.is_expired(now))
            .map(|slot| slot.record.clone())
            .collect()
    }
}
