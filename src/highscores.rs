//! Persisted high score
//!
//! A single best coin count stored as a decimal string under a fixed key.

use serde::{Deserialize, Serialize};

use crate::persistence::KeyValueStore;

/// Best coin count across sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HighScore {
    pub best: u64,
}

impl HighScore {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "highscore";

    pub fn new(best: u64) -> Self {
        Self { best }
    }

    /// Load from storage; a missing or corrupt value reads as 0
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let best = parse_stored(store.get(Self::STORAGE_KEY).as_deref());
        log::info!("High score: {}", best);
        Self { best }
    }

    /// Check if a coin count beats the stored best
    pub fn beaten_by(&self, coins: u64) -> bool {
        coins > self.best
    }

    /// Record a coin count. Persists and returns true only when it strictly
    /// beats the current best.
    pub fn record(&mut self, coins: u64, store: &mut dyn KeyValueStore) -> bool {
        if !self.beaten_by(coins) {
            return false;
        }
        self.best = coins;
        store.set(Self::STORAGE_KEY, &coins.to_string());
        true
    }
}

/// Parse a stored high score. Absent, negative, fractional or garbage values
/// all read as 0.
pub fn parse_stored(value: Option<&str>) -> u64 {
    value.and_then(|s| s.trim().parse::<u64>().ok()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_parse_stored_defaults() {
        assert_eq!(parse_stored(None), 0);
        assert_eq!(parse_stored(Some("")), 0);
        assert_eq!(parse_stored(Some("abc")), 0);
        assert_eq!(parse_stored(Some("-3")), 0);
        assert_eq!(parse_stored(Some("17")), 17);
        assert_eq!(parse_stored(Some(" 17\n")), 17);
    }

    #[test]
    fn test_load_corrupt_value() {
        let store = MemoryStore::with_value(HighScore::STORAGE_KEY, "{oops}");
        assert_eq!(HighScore::load(&store).best, 0);
    }

    #[test]
    fn test_record_only_strictly_greater() {
        let mut store = MemoryStore::with_value(HighScore::STORAGE_KEY, "5");
        let mut high = HighScore::load(&store);
        assert_eq!(high.best, 5);

        assert!(!high.record(3, &mut store));
        assert!(!high.record(5, &mut store));
        assert_eq!(store.get(HighScore::STORAGE_KEY).as_deref(), Some("5"));

        assert!(high.record(6, &mut store));
        assert_eq!(high.best, 6);
        assert_eq!(store.get(HighScore::STORAGE_KEY).as_deref(), Some("6"));
    }

    #[test]
    fn test_survives_reload() {
        let mut store = MemoryStore::new();
        let mut high = HighScore::load(&store);
        high.record(9, &mut store);

        let reloaded = HighScore::load(&store);
        assert_eq!(reloaded.best, 9);
    }
}
