use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::client::{FetchError, WeatherClient};
use crate::model::{RequestKey, WeatherReading};

/// Observable load state for the current request key. Exactly one variant
/// is active; `Loaded` and `Failed` are terminal until the key changes.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    Loaded(WeatherReading),
    Failed(String),
}

impl LoadState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, LoadState::Loading)
    }
}

#[derive(Debug)]
struct Tracked {
    key: Option<RequestKey>,
    /// Bumped on every accepted `start`. A fetch spawned under an older
    /// generation must not publish, even if its key matches again later.
    generation: u64,
}

/// Single-fetch state machine: a value holder that any binding layer can
/// subscribe to, independent of UI framework.
///
/// One fetch is in flight per active key. Starting a new key supersedes
/// the previous fetch; its eventual result is discarded, not applied.
/// Cheap to clone; clones share the same state slot.
#[derive(Debug, Clone)]
pub struct WeatherLoader {
    client: Arc<dyn WeatherClient>,
    tracked: Arc<Mutex<Tracked>>,
    tx: Arc<watch::Sender<LoadState>>,
}

impl WeatherLoader {
    pub fn new(client: Arc<dyn WeatherClient>) -> Self {
        let (tx, _rx) = watch::channel(LoadState::Loading);

        Self {
            client,
            tracked: Arc::new(Mutex::new(Tracked { key: None, generation: 0 })),
            tx: Arc::new(tx),
        }
    }

    /// Begin loading for `key`. Idempotent on an unchanged key: the fetch
    /// already issued (or its result) stands, and no new one is spawned.
    /// A changed key resets the state to `Loading` and spawns exactly one
    /// fetch task. Must be called from within a tokio runtime.
    pub fn start(&self, key: RequestKey) {
        let generation = {
            let mut tracked = self.tracked();
            if tracked.key.as_ref() == Some(&key) {
                return;
            }
            tracked.key = Some(key.clone());
            tracked.generation += 1;
            // Published under the guard: a fetch resolving concurrently
            // either sees the new generation or is sequenced before it.
            self.tx.send_replace(LoadState::Loading);
            tracked.generation
        };

        let loader = self.clone();
        tokio::spawn(async move {
            let result = loader.client.fetch_current(&key.location).await;
            loader.complete(generation, result);
        });
    }

    /// Apply a fetch outcome for `key`. A result whose key has been
    /// superseded by a newer `start` is discarded silently.
    pub fn on_result(&self, key: &RequestKey, result: Result<WeatherReading, FetchError>) {
        let tracked = self.tracked();
        if tracked.key.as_ref() != Some(key) {
            debug!(name = %key.name, "discarding result for superseded key");
            return;
        }

        self.apply(&tracked, result);
    }

    /// Pure read of the current state.
    pub fn current_state(&self) -> LoadState {
        self.tx.borrow().clone()
    }

    /// Receiver that observes every published state change.
    pub fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.tx.subscribe()
    }

    /// Completion path for spawned fetches. The generation check is
    /// stricter than key equality: it also rejects a stale fetch whose
    /// key has come back into use.
    fn complete(&self, generation: u64, result: Result<WeatherReading, FetchError>) {
        let tracked = self.tracked();
        if tracked.generation != generation {
            debug!(generation, "discarding result for superseded fetch");
            return;
        }

        self.apply(&tracked, result);
    }

    /// Publish a terminal state. Takes the `tracked` guard so the
    /// staleness check and the publish are one critical section: a
    /// `start` for a new key cannot interleave between them.
    fn apply(&self, _tracked: &MutexGuard<'_, Tracked>, result: Result<WeatherReading, FetchError>) {
        let next = match result {
            Ok(reading) => LoadState::Loaded(reading),
            Err(err) => {
                warn!(error = %err, "weather fetch failed");
                LoadState::Failed(err.to_string())
            }
        };

        self.tx.send_replace(next);
    }

    fn tracked(&self) -> MutexGuard<'_, Tracked> {
        self.tracked.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
