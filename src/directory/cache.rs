use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Single-slot cache with a fixed TTL.
///
/// Owned by whichever component needs caching rather than living in module
/// state, so lifecycle and expiry are visible at the call site and tests
/// can construct their own instances.
#[derive(Debug)]
pub struct TtlCache<T> {
    ttl: Duration,
    slot: Mutex<Option<CachedEntry<T>>>,
}

#[derive(Debug, Clone)]
struct CachedEntry<T> {
    stored_at: DateTime<Utc>,
    value: T,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The cached value if it is still within its TTL.
    pub fn get(&self) -> Option<T> {
        let guard = self.slot.lock().expect("cache mutex poisoned");
        let entry = guard.as_ref()?;
        let age = Utc::now().signed_duration_since(entry.stored_at);
        if age.num_milliseconds() < 0 {
            return Some(entry.value.clone());
        }
        let age = Duration::from_millis(age.num_milliseconds() as u64);
        if age < self.ttl {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    /// The cached value regardless of age, for stale-if-error serving.
    pub fn get_stale(&self) -> Option<T> {
        let guard = self.slot.lock().expect("cache mutex poisoned");
        guard.as_ref().map(|entry| entry.value.clone())
    }

    pub fn set(&self, value: T) {
        let mut guard = self.slot.lock().expect("cache mutex poisoned");
        *guard = Some(CachedEntry {
            stored_at: Utc::now(),
            value,
        });
    }

    pub fn invalidate(&self) {
        let mut guard = self.slot.lock().expect("cache mutex poisoned");
        *guard = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serves_fresh_values_within_ttl() {
        let cache = TtlCache::new(Duration::from_secs(60));
        assert!(cache.get().is_none());
        cache.set(vec![1, 2, 3]);
        assert_eq!(cache.get(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn expired_values_remain_available_as_stale() {
        let cache = TtlCache::new(Duration::ZERO);
        cache.set("payload".to_string());
        assert!(cache.get().is_none());
        assert_eq!(cache.get_stale(), Some("payload".to_string()));
    }

    #[test]
    fn invalidate_clears_both_paths() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.set(1u32);
        cache.invalidate();
        assert!(cache.get().is_none());
        assert!(cache.get_stale().is_none());
    }
}
