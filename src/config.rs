use std::time::Duration;

use serde::Deserialize;

/// Lowest playable level.
pub const MIN_LEVEL: u32 = 1;

/// Highest playable level. Levels outside [MIN_LEVEL, MAX_LEVEL] are clamped,
/// never rejected.
pub const MAX_LEVEL: u32 = 3;

/// Number of challenges a preload campaign fetches when the caller doesn't
/// say otherwise.
pub const DEFAULT_PRELOAD_COUNT: u32 = 6;

/// Per-request timeout for calls to the content-generation backend. The
/// backend shells out to a generative model, so individual calls are slow.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Storage slots for per-level state, indexed by `level - MIN_LEVEL`.
pub(crate) const LEVEL_SLOTS: usize = (MAX_LEVEL - MIN_LEVEL + 1) as usize;

/// Clamp an arbitrary level input into the playable range.
pub fn clamp_level(level: u32) -> u32 {
    level.clamp(MIN_LEVEL, MAX_LEVEL)
}

/// Top-level configuration for the content engine.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Base URL of the content-generation API, e.g. `http://localhost:5000`.
    pub base_url: String,
    /// Challenges fetched per preload campaign.
    pub preload_count: u32,
    /// Timeout applied to each backend request, in seconds.
    pub request_timeout_secs: u64,
}

impl EngineConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            preload_count: DEFAULT_PRELOAD_COUNT,
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_level() {
        assert_eq!(clamp_level(0), MIN_LEVEL);
        assert_eq!(clamp_level(1), 1);
        assert_eq!(clamp_level(3), 3);
        assert_eq!(clamp_level(99), MAX_LEVEL);
    }
}
