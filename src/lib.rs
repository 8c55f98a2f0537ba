// Challenge prefetch-and-cache engine — keeps per-level queues of generated
// coding challenges warm ahead of gameplay without overwhelming the
// content-generation backend.

pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod source;

pub use config::EngineConfig;
pub use domain::{Challenge, ChallengeKind, Feedback, Story};
pub use engine::session::ChallengeEngine;
pub use error::FetchError;

use std::sync::Once;

use tracing::info;
use tracing_subscriber::EnvFilter;

static INIT_TRACING: Once = Once::new();

/// Initialize tracing output for embedders that don't install their own
/// subscriber. Safe to call more than once.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,hyper=warn,reqwest=warn"));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init();

        info!("content engine tracing initialized");
    });
}
