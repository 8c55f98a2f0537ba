use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::{Challenge, Feedback, Story};
use crate::error::FetchError;

/// A backend that produces game content on demand.
///
/// Every call takes a cancellation token supplied by the caller; once the
/// token fires, the call settles with `FetchError::Cancelled` instead of
/// waiting out the transport.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Liveness check against the backend.
    async fn probe(&self, cancel: &CancellationToken) -> Result<(), FetchError>;

    async fn fetch_story(
        &self,
        level: u32,
        cancel: &CancellationToken,
    ) -> Result<Story, FetchError>;

    async fn fetch_challenge(
        &self,
        level: u32,
        language: &str,
        objective: &str,
        cancel: &CancellationToken,
    ) -> Result<Challenge, FetchError>;

    async fn submit_feedback(
        &self,
        answer: &str,
        correct_answer: &str,
        question: &str,
        cancel: &CancellationToken,
    ) -> Result<Feedback, FetchError>;
}
