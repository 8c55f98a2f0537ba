// Tracks every in-flight backend request so a level flush can abort them all.

use std::collections::HashMap;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Handle for one registered request: an id to settle with and the token the
/// transport must honor.
pub struct TrackedRequest {
    id: u64,
    token: CancellationToken,
}

impl TrackedRequest {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

pub struct RequestRegistry {
    inner: Mutex<RegistryInner>,
}

struct RegistryInner {
    next_id: u64,
    in_flight: HashMap<u64, CancellationToken>,
}

impl RequestRegistry {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(RegistryInner {
                next_id: 0,
                in_flight: HashMap::new(),
            }),
        }
    }

    /// Create and track a fresh cancellation token for one request.
    pub fn register(&self) -> TrackedRequest {
        let mut inner = self.inner.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        let token = CancellationToken::new();
        inner.in_flight.insert(id, token.clone());
        TrackedRequest { id, token }
    }

    /// Remove a request after it settles, by any outcome. No-op if a
    /// `cancel_all` already swept it away.
    pub fn settle(&self, id: u64) {
        self.inner.lock().in_flight.remove(&id);
    }

    /// Cancel every tracked request, then clear the registry. Idempotent and
    /// safe with nothing in flight.
    pub fn cancel_all(&self) {
        let mut inner = self.inner.lock();
        if inner.in_flight.is_empty() {
            return;
        }
        debug!("cancelling {} in-flight requests", inner.in_flight.len());
        for token in inner.in_flight.values() {
            token.cancel();
        }
        inner.in_flight.clear();
    }

    pub fn in_flight(&self) -> usize {
        self.inner.lock().in_flight.len()
    }
}

impl Default for RequestRegistry {
    fn default() -> Self {
        Self::new()
    }
}
