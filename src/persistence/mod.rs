//! Client-local progress persistence
//!
//! Stored as plain key/value pairs so a page reload keeps:
//! - remaining lives (`currentLives`)
//! - cached high score (`highScore`)
//! - scores that could not be submitted yet (`pendingScores`)
//!
//! Missing or unparseable values read as absent; write failures are logged
//! and otherwise ignored.

use serde::{Deserialize, Serialize};

use crate::platform::KeyValueStore;

const LIVES_KEY: &str = "currentLives";
const HIGH_SCORE_KEY: &str = "highScore";
const PENDING_KEY: &str = "pendingScores";

/// A final score waiting to be resubmitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingScore {
    pub wallet_address: String,
    pub score: u64,
    /// Unix timestamp (ms) when the run ended
    pub queued_at: f64,
}

pub fn load_lives(store: &impl KeyValueStore) -> Option<u32> {
    store.get(LIVES_KEY)?.trim().parse().ok()
}

pub fn save_lives(store: &mut impl KeyValueStore, lives: u32) {
    if !store.set(LIVES_KEY, &lives.to_string()) {
        log::warn!("Could not persist lives ({lives})");
    }
}

pub fn load_high_score(store: &impl KeyValueStore) -> u64 {
    store
        .get(HIGH_SCORE_KEY)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

pub fn save_high_score(store: &mut impl KeyValueStore, score: u64) {
    if !store.set(HIGH_SCORE_KEY, &score.to_string()) {
        log::warn!("Could not persist high score ({score})");
    }
}

pub fn load_pending(store: &impl KeyValueStore) -> Vec<PendingScore> {
    let Some(json) = store.get(PENDING_KEY) else {
        return Vec::new();
    };
    serde_json::from_str(&json).unwrap_or_else(|e| {
        log::warn!("Discarding corrupt pending score queue: {e}");
        Vec::new()
    })
}

pub fn save_pending(store: &mut impl KeyValueStore, pending: &[PendingScore]) {
    if pending.is_empty() {
        store.remove(PENDING_KEY);
        return;
    }
    match serde_json::to_string(pending) {
        Ok(json) => {
            if !store.set(PENDING_KEY, &json) {
                log::warn!("Could not persist {} pending scores", pending.len());
            }
        }
        Err(e) => log::error!("Failed to encode pending scores: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStore;

    #[test]
    fn test_lives_round_trip_and_garbage() {
        let mut store = MemoryStore::new();
        assert_eq!(load_lives(&store), None);
        save_lives(&mut store, 5);
        assert_eq!(load_lives(&store), Some(5));
        store.set("currentLives", "NaN");
        assert_eq!(load_lives(&store), None);
    }

    #[test]
    fn test_high_score_defaults_to_zero() {
        let mut store = MemoryStore::new();
        assert_eq!(load_high_score(&store), 0);
        save_high_score(&mut store, 9000);
        assert_eq!(load_high_score(&store), 9000);
    }

    #[test]
    fn test_pending_queue_uses_camel_case_and_clears() {
        let mut store = MemoryStore::new();
        let pending = vec![PendingScore {
            wallet_address: "0x18cd0B25309Df2e9c207f4417C5eaa7A7eaA19B8".into(),
            score: 1500,
            queued_at: 1.0,
        }];
        save_pending(&mut store, &pending);
        assert!(store.get("pendingScores").unwrap().contains("walletAddress"));
        assert_eq!(load_pending(&store), pending);

        save_pending(&mut store, &[]);
        assert!(store.get("pendingScores").is_none());
    }
}
