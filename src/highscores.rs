//! High score history
//!
//! Persisted to LocalStorage (web) or a JSON file (native). Every finished
//! session with a non-zero score is kept, sorted by score.

use serde::{Deserialize, Serialize};

use crate::sim::SessionSummary;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Final score
    pub score: u64,
    /// Base difficulty the session was played at
    pub difficulty: f64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// Session history, best first
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "dino_cretaceous_highscores";

    /// Create empty history
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Only scored sessions are recorded
    pub fn qualifies(score: u64) -> bool {
        score > 0
    }

    /// Add a finished session.
    /// Returns the rank achieved (1-indexed) or None for a zero score
    pub fn record(&mut self, summary: &SessionSummary) -> Option<usize> {
        let score = summary.final_score;
        if !Self::qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            score,
            difficulty: summary.base_difficulty,
            timestamp: summary.timestamp_ms,
        };

        // Find insertion point (sorted descending by score, ties keep arrival order)
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load high scores from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(scores) = serde_json::from_str::<HighScores>(&json) {
                    log::info!("Loaded {} high scores", scores.entries.len());
                    return scores;
                }
            }
        }

        log::info!("No high scores found, starting fresh");
        Self::new()
    }

    /// Save high scores to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            match serde_json::to_string(self) {
                Ok(json) => {
                    if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                        log::warn!("Failed to write high scores to LocalStorage");
                    } else {
                        log::info!("High scores saved ({} entries)", self.entries.len());
                    }
                }
                Err(e) => log::warn!("Failed to encode high scores: {e}"),
            }
        }
    }

    /// Load high scores from a JSON file, empty when missing or corrupt
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        let scores: Self = crate::persistence::load_or_default(path);
        log::info!("Loaded {} high scores", scores.entries.len());
        scores
    }

    /// Save high scores to a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), crate::persistence::PersistenceError> {
        crate::persistence::save_json(path, self)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}
