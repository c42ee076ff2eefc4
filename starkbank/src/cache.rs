//! Single-slot public key cache.
//!
//! One slot shared by every verification in the process, no eviction, no
//! per-key namespacing. Concurrent refreshes race benignly: the last write
//! wins, and any key the service hands out is equally authoritative.

use std::sync::{PoisonError, RwLock};

use crate::key::PublicKey;

/// Storage for the last fetched public key.
///
/// Implementations must be cheap to read, since every webhook reads the slot.
pub trait KeyCache: Send + Sync {
    /// Returns the cached key, if any.
    fn get(&self) -> Option<PublicKey>;

    /// Replaces the cached key.
    fn set(&self, key: PublicKey);

    /// Empties the slot.
    fn clear(&self);
}

/// In-memory [`KeyCache`] backed by a `RwLock`.
#[derive(Debug, Default)]
pub struct MemoryKeyCache {
    slot: RwLock<Option<PublicKey>>,
}

impl MemoryKeyCache {
    /// Creates an empty cache.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    /// Creates a cache pre-seeded with `key`.
    #[must_use]
    pub const fn with_key(key: PublicKey) -> Self {
        Self {
            slot: RwLock::new(Some(key)),
        }
    }
}

impl KeyCache for MemoryKeyCache {
    fn get(&self) -> Option<PublicKey> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, key: PublicKey) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(key);
    }

    fn clear(&self) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::PrivateKey;

    fn public_key(seed: u8) -> PublicKey {
        PrivateKey::from_bytes(&[seed; 32]).unwrap().public_key()
    }

    #[test]
    fn test_starts_empty() {
        assert!(MemoryKeyCache::new().get().is_none());
    }

    #[test]
    fn test_set_overwrites_slot() {
        let cache = MemoryKeyCache::with_key(public_key(1));
        assert_eq!(cache.get(), Some(public_key(1)));

        cache.set(public_key(2));
        assert_eq!(cache.get(), Some(public_key(2)));

        cache.clear();
        assert!(cache.get().is_none());
    }

    #[test]
    fn test_concurrent_writers_last_write_wins() {
        let cache = std::sync::Arc::new(MemoryKeyCache::new());
        let handles: Vec<_> = (1..=8u8)
            .map(|seed| {
                let cache = std::sync::Arc::clone(&cache);
                std::thread::spawn(move || cache.set(public_key(seed)))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let winner = cache.get().unwrap();
        assert!((1..=8u8).any(|seed| public_key(seed) == winner));
    }
}
