// In-memory challenge store — one independent FIFO queue per level.

use std::collections::VecDeque;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::config::{clamp_level, LEVEL_SLOTS, MIN_LEVEL};
use crate::domain::Challenge;

pub struct LevelQueues {
    queues: [Mutex<VecDeque<Challenge>>; LEVEL_SLOTS],
}

impl LevelQueues {
    pub fn new() -> Self {
        Self {
            queues: std::array::from_fn(|_| Mutex::new(VecDeque::new())),
        }
    }

    fn slot(&self, level: u32) -> &Mutex<VecDeque<Challenge>> {
        &self.queues[(clamp_level(level) - MIN_LEVEL) as usize]
    }

    /// Pop the oldest queued challenge for the level, if any.
    pub fn pop_front(&self, level: u32) -> Option<Challenge> {
        self.slot(level).lock().pop_front()
    }

    /// Append unless the producing request has been cancelled. The check and
    /// the push share the queue lock, and a flush cancels before it clears,
    /// so a response settling after a flush can never land in the queue.
    pub fn push_unless_cancelled(
        &self,
        level: u32,
        challenge: Challenge,
        cancel: &CancellationToken,
    ) -> bool {
        let mut queue = self.slot(level).lock();
        if cancel.is_cancelled() {
            return false;
        }
        queue.push_back(challenge);
        true
    }

    pub fn len(&self, level: u32) -> usize {
        self.slot(level).lock().len()
    }

    /// Drop every queued challenge for one level. Other levels are untouched.
    pub fn clear(&self, level: u32) {
        self.slot(level).lock().clear();
    }

    /// Drop every queued challenge across all levels.
    pub fn clear_all(&self) {
        for queue in &self.queues {
            queue.lock().clear();
        }
    }
}

impl Default for LevelQueues {
    fn default() -> Self {
        Self::new()
    }
}
