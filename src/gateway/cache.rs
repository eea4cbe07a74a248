//! Best-effort reuse of gateway offers for repeated identical totals.
//!
//! Paradise offers are priced handles with roughly a ten-minute lifetime.
//! A cache miss or stale entry just means one extra offer-creation call;
//! nothing here affects the charged amount.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Amount-keyed offer-hash cache. Entries are immutable once written and
/// concurrent writes for the same amount are benign (both hashes are
/// valid), so a plain mutex is enough.
pub trait OfferCache: Send + Sync {
    fn get(&self, amount_cents: i64) -> Option<String>;
    fn put(&self, amount_cents: i64, hash: String);
}

struct Entry {
    hash: String,
    expires_at: Instant,
}

pub struct InMemoryOfferCache {
    ttl: Duration,
    entries: Mutex<HashMap<i64, Entry>>,
}

impl InMemoryOfferCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl OfferCache for InMemoryOfferCache {
    fn get(&self, amount_cents: i64) -> Option<String> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(&amount_cents) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.hash.clone()),
            Some(_) => {
                entries.remove(&amount_cents);
                None
            }
            None => None,
        }
    }

    fn put(&self, amount_cents: i64, hash: String) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            amount_cents,
            Entry {
                hash,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }
}

/// Cache that never hits; useful for tests and multi-instance deployments
/// that would rather always create a fresh offer.
pub struct NoopOfferCache;

impl OfferCache for NoopOfferCache {
    fn get(&self, _amount_cents: i64) -> Option<String> {
        None
    }

    fn put(&self, _amount_cents: i64, _hash: String) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_within_ttl() {
        let cache = InMemoryOfferCache::new(Duration::from_secs(60));
        cache.put(4500, "off_abc".into());
        assert_eq!(cache.get(4500), Some("off_abc".into()));
        assert_eq!(cache.get(9999), None);
    }

    #[test]
    fn expired_entries_miss() {
        let cache = InMemoryOfferCache::new(Duration::ZERO);
        cache.put(4500, "off_abc".into());
        assert_eq!(cache.get(4500), None);
    }

    #[test]
    fn last_write_wins() {
        let cache = InMemoryOfferCache::new(Duration::from_secs(60));
        cache.put(4500, "off_a".into());
        cache.put(4500, "off_b".into());
        assert_eq!(cache.get(4500), Some("off_b".into()));
    }

    #[test]
    fn noop_never_hits() {
        let cache = NoopOfferCache;
        cache.put(4500, "off_abc".into());
        assert_eq!(cache.get(4500), None);
    }
}
