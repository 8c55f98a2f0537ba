// Engine facade — queue-first challenge delivery, single-flight preloading,
// and bulk cancellation on level transition.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::objectives::ObjectiveStore;
use super::queues::LevelQueues;
use super::registry::RequestRegistry;
use super::stats::{StatsCollector, StatsSnapshot};
use crate::config::{clamp_level, EngineConfig};
use crate::domain::{Challenge, Feedback, Story};
use crate::error::FetchError;
use crate::source::traits::ContentSource;

pub struct ChallengeEngine {
    source: Arc<dyn ContentSource>,
    queues: LevelQueues,
    objectives: ObjectiveStore,
    registry: RequestRegistry,
    stats: StatsCollector,
    preloading: AtomicBool,
    preload_count: u32,
}

/// Holds the global preloading flag for the duration of one campaign.
/// Dropping the guard releases the flag on every exit path.
struct PreloadGuard<'a>(&'a AtomicBool);

impl<'a> PreloadGuard<'a> {
    fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for PreloadGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ChallengeEngine {
    pub fn new(source: Arc<dyn ContentSource>, config: &EngineConfig) -> Self {
        Self {
            source,
            queues: LevelQueues::new(),
            objectives: ObjectiveStore::new(),
            registry: RequestRegistry::new(),
            stats: StatsCollector::new(),
            preloading: AtomicBool::new(false),
            preload_count: config.preload_count,
        }
    }

    /// Fetch the level story and remember its objective, which every later
    /// challenge request for this level falls back to.
    pub async fn fetch_story(&self, level: u32) -> Result<Story, FetchError> {
        let level = clamp_level(level);
        let req = self.registry.register();
        let result = self.source.fetch_story(level, req.token()).await;
        self.registry.settle(req.id());

        let story = self.noting_cancellation(result)?;
        self.objectives.set(level, &story.objective);
        debug!("story fetched level={} objective={}", level, story.objective);
        Ok(story)
    }

    /// Hand out the next challenge for a level: from the queue when one is
    /// waiting, otherwise straight from the backend. Failures, including
    /// `Cancelled`, propagate to the caller unchanged.
    pub async fn get_challenge(
        &self,
        level: u32,
        language: &str,
        objective: Option<&str>,
    ) -> Result<Challenge, FetchError> {
        let level = clamp_level(level);
        let objective = self.resolve_objective(level, objective)?;

        if let Some(challenge) = self.queues.pop_front(level) {
            self.stats.record_hit();
            debug!(
                "cache hit level={} remaining={}",
                level,
                self.queues.len(level)
            );
            return Ok(challenge);
        }
        self.stats.record_miss();

        let req = self.registry.register();
        let result = self
            .source
            .fetch_challenge(level, language, &objective, req.token())
            .await;
        self.registry.settle(req.id());
        self.noting_cancellation(result)
    }

    /// Top up a level's queue with `count` challenges, one fetch at a time so
    /// the generation backend is never hit concurrently.
    ///
    /// Single-flight across the whole engine: while a campaign is running,
    /// further calls are no-ops returning 0. A mid-campaign fetch failure or
    /// cancellation stops the loop and is swallowed; whatever was queued
    /// before it stays queued. Returns the number of challenges pushed.
    pub async fn preload_challenges(
        &self,
        level: u32,
        language: &str,
        count: u32,
        objective: Option<&str>,
    ) -> Result<u32, FetchError> {
        let Some(_guard) = PreloadGuard::try_acquire(&self.preloading) else {
            debug!("preload already in progress, skipping");
            return Ok(0);
        };

        let level = clamp_level(level);
        let objective = self.resolve_objective(level, objective)?;

        info!("preload campaign start level={} count={}", level, count);
        let mut pushed = 0u32;
        for i in 0..count {
            let req = self.registry.register();
            let result = self
                .source
                .fetch_challenge(level, language, &objective, req.token())
                .await;
            self.registry.settle(req.id());

            match result {
                Ok(challenge) => {
                    // The fetch may have been cancelled after it completed;
                    // a flushed campaign must not repopulate the queue.
                    if !self
                        .queues
                        .push_unless_cancelled(level, challenge, req.token())
                    {
                        self.stats.record_cancelled();
                        debug!("preload cancelled after fetch {}/{}", i + 1, count);
                        break;
                    }
                    pushed += 1;
                    self.stats.record_preloaded();
                    debug!("preloaded challenge {}/{} level={}", i + 1, count, level);
                }
                Err(FetchError::Cancelled) => {
                    self.stats.record_cancelled();
                    debug!("preload cancelled at fetch {}/{}", i + 1, count);
                    break;
                }
                Err(e) => {
                    warn!("preload fetch {}/{} failed: {}", i + 1, count, e);
                    break;
                }
            }
        }

        info!("preload campaign done level={} pushed={}", level, pushed);
        Ok(pushed)
    }

    /// Kick off a preload campaign in the background, returning a handle the
    /// caller may await or drop. Uses the configured batch size. Cancellation
    /// still flows through the registry, not the handle.
    pub fn start_preload(
        self: &Arc<Self>,
        level: u32,
        language: &str,
        objective: Option<String>,
    ) -> JoinHandle<u32> {
        let engine = Arc::clone(self);
        let language = language.to_string();
        let count = engine.preload_count;
        tokio::spawn(async move {
            match engine
                .preload_challenges(level, &language, count, objective.as_deref())
                .await
            {
                Ok(pushed) => pushed,
                Err(e) => {
                    warn!("preload campaign not started: {}", e);
                    0
                }
            }
        })
    }

    /// Grade a submitted answer. Tracked like any other request, so a level
    /// flush aborts an obsolete round-trip.
    pub async fn submit_feedback(
        &self,
        answer: &str,
        correct_answer: &str,
        question: &str,
    ) -> Result<Feedback, FetchError> {
        let req = self.registry.register();
        let result = self
            .source
            .submit_feedback(answer, correct_answer, question, req.token())
            .await;
        self.registry.settle(req.id());
        self.noting_cancellation(result)
    }

    /// Number of challenges queued and not yet consumed for a level.
    pub fn cached_challenge_count(&self, level: u32) -> usize {
        self.queues.len(clamp_level(level))
    }

    /// Whether a preload campaign is currently running (any level).
    pub fn is_preloading(&self) -> bool {
        self.preloading.load(Ordering::Acquire)
    }

    /// Abort every in-flight request, then drop queued challenges for the
    /// given level, or for all levels when `None`. Stored objectives survive.
    pub fn flush_preloaded(&self, level: Option<u32>) {
        self.registry.cancel_all();
        match level {
            Some(level) => self.queues.clear(clamp_level(level)),
            None => self.queues.clear_all(),
        }
        debug!("flushed preloaded challenges level={:?}", level);
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot(self.registry.in_flight())
    }

    /// An explicit objective wins and is persisted; otherwise fall back to
    /// the stored one. No objective at all is a caller sequencing bug; the
    /// engine never fetches a story on its own to paper over it.
    fn resolve_objective(
        &self,
        level: u32,
        explicit: Option<&str>,
    ) -> Result<String, FetchError> {
        if let Some(objective) = explicit {
            self.objectives.set(level, objective);
            return Ok(objective.to_string());
        }
        self.objectives
            .get(level)
            .ok_or(FetchError::MissingObjective { level })
    }

    fn noting_cancellation<T>(&self, result: Result<T, FetchError>) -> Result<T, FetchError> {
        if matches!(result, Err(FetchError::Cancelled)) {
            self.stats.record_cancelled();
        }
        result
    }
}
