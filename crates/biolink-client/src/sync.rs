//! Keeps an open display page in step with edits, both from another tab in
//! the same browser (storage events) and from the store (polling).

use crate::http::StoreClient;
use crate::local_storage::{LocalStorage, StorageEvent, PROFILE_CONFIG_KEY};
use crate::renderer::DisplayRenderer;
use biolink_models::ProfileConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// `h = h * 31 + unit` over UTF-16 code units, wrapping at 32 bits.
pub fn rolling_hash(text: &str) -> i32 {
    text.encode_utf16().fold(0i32, |h, unit| {
        h.wrapping_shl(5).wrapping_sub(h).wrapping_add(i32::from(unit))
    })
}

/// Remembers the last hash seen and reports changes.
#[derive(Debug, Clone, Default)]
pub struct HashTracker {
    last: Option<i32>,
}

impl HashTracker {
    /// True when `text` differs from the previous observation. The first
    /// observation only records.
    pub fn observe(&mut self, text: &str) -> bool {
        let hash = rolling_hash(text);
        let changed = self.last.is_some_and(|last| last != hash);
        self.last = Some(hash);
        changed
    }
}

/// Apply a `profileConfig` storage event. Other keys and removals are
/// ignored.
pub fn apply_storage_event(renderer: &DisplayRenderer, event: &StorageEvent) -> bool {
    if event.key != PROFILE_CONFIG_KEY {
        return false;
    }
    let Some(value) = &event.new_value else {
        return false;
    };
    match ProfileConfig::from_json(value) {
        Ok(doc) => {
            let n = renderer.apply(&doc);
            tracing::info!("live sync: applied local change (#{})", n);
            true
        }
        Err(e) => {
            tracing::error!("live sync: parse error: {}", e);
            false
        }
    }
}

/// Fetch the stored document once and apply it if it changed since the last
/// poll. Any failure is skipped quietly.
pub async fn poll_once(
    renderer: &DisplayRenderer,
    client: &StoreClient,
    tracker: &mut HashTracker,
) -> bool {
    let cache_bust = chrono::Utc::now().timestamp_millis();
    let text = match client.fetch_config_text(Some(cache_bust)).await {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!("live sync: poll failed: {}", e);
            return false;
        }
    };
    if !tracker.observe(&text) {
        return false;
    }
    match ProfileConfig::from_json(&text) {
        Ok(doc) => {
            let n = renderer.apply(&doc);
            tracing::info!("live sync: server config changed, applied (#{})", n);
            true
        }
        Err(e) => {
            tracing::debug!("live sync: server sent malformed config: {}", e);
            false
        }
    }
}

/// The two background tasks. Both stop when this is dropped.
pub struct LiveSync {
    listener: JoinHandle<()>,
    poller: JoinHandle<()>,
}

impl LiveSync {
    pub fn spawn(
        renderer: Arc<DisplayRenderer>,
        storage: &LocalStorage,
        client: StoreClient,
        interval: Duration,
    ) -> Self {
        let mut events = storage.subscribe();
        let listener_renderer = renderer.clone();
        let listener = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        apply_storage_event(&listener_renderer, &event);
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("live sync: missed {} storage events", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        let poller = tokio::spawn(async move {
            let mut tracker = HashTracker::default();
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                poll_once(&renderer, &client, &mut tracker).await;
            }
        });

        Self { listener, poller }
    }

    pub fn is_running(&self) -> bool {
        !self.listener.is_finished() || !self.poller.is_finished()
    }
}

impl Drop for LiveSync {
    fn drop(&mut self) {
        self.listener.abort();
        self.poller.abort();
    }
}
