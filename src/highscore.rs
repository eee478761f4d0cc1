//! High score persistence
//!
//! A single number under a fixed key. Persisted to LocalStorage on the web,
//! kept in memory elsewhere. Anything unreadable counts as "no high score".

/// Storage key for the high score
pub const STORAGE_KEY: &str = "orbit_trail_high_score";

/// Read/write access to the persisted high score
pub trait HighScoreStore {
    fn get_high_score(&self) -> Option<u64>;
    fn set_high_score(&mut self, score: u64);
}

/// Parse a stored high score; corrupted values are treated as absent
pub fn parse_high_score(raw: &str) -> Option<u64> {
    match serde_json::from_str::<u64>(raw.trim()) {
        Ok(score) => Some(score),
        Err(e) => {
            log::warn!("Ignoring unreadable high score {:?}: {}", raw, e);
            None
        }
    }
}

/// Persist `max(previous, score)` and return it
pub fn record_score(store: &mut dyn HighScoreStore, score: u64) -> u64 {
    let previous = store.get_high_score();
    let best = previous.map_or(score, |p| p.max(score));
    store.set_high_score(best);
    if previous.is_none_or(|p| score > p) {
        log::info!("New high score: {}", best);
    }
    best
}

/// In-process store holding the raw stored text, like a key-value backend
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScoreStore {
    raw: Option<String>,
}

impl MemoryHighScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with whatever text a previous session left behind
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
        }
    }

    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn get_high_score(&self) -> Option<u64> {
        self.raw.as_deref().and_then(parse_high_score)
    }

    fn set_high_score(&mut self, score: u64) {
        self.raw = Some(score.to_string());
    }
}

/// LocalStorage-backed store (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct LocalStorageHighScoreStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageHighScoreStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl HighScoreStore for LocalStorageHighScoreStore {
    fn get_high_score(&self) -> Option<u64> {
        let raw = Self::storage()?.get_item(STORAGE_KEY).ok().flatten()?;
        parse_high_score(&raw)
    }

    fn set_high_score(&mut self, score: u64) {
        match Self::storage() {
            Some(storage) => {
                if storage.set_item(STORAGE_KEY, &score.to_string()).is_err() {
                    log::warn!("Failed to save high score");
                }
            }
            None => log::warn!("LocalStorage unavailable, high score not saved"),
        }
    }
}
