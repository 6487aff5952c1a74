//! Write-behind persistence: remote store first, local cache always,
//! and an offline queue with idempotent replay.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};
use twox_hash::XxHash64;

use crate::constants::{
    APPLIED_WRITES_MEMORY, CACHE_KEY_APPLIED_WRITES, CACHE_KEY_GAME_STATE, CACHE_KEY_LAST_SYNC,
    CACHE_KEY_OFFLINE_QUEUE, IDEMPOTENCY_HASH_SEED,
};
use crate::error::EngineError;
use crate::state::GameState;
use crate::{LocalCache, StateStore};

/// One deferred remote write, captured while the store was unreachable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueuedWrite {
    pub idempotency_key: u64,
    pub user_id: String,
    /// Operation tag, e.g. `advance_day` or `sell_harvest`.
    pub action: String,
    pub state: GameState,
    /// Unix seconds at enqueue time.
    pub queued_at: u64,
}

/// The cached queue of deferred writes, oldest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OfflineQueue {
    pub entries: Vec<QueuedWrite>,
}

/// Result of one persistence attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistOutcome {
    pub remote_ok: bool,
    /// Set when the write was deferred into the offline queue.
    pub queued: bool,
}

/// Result of replaying the offline queue against the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplayReport {
    pub replayed: usize,
    /// Entries dropped because their key was already applied.
    pub skipped: usize,
    /// Entries still queued after failed attempts.
    pub remaining: usize,
}

pub(crate) fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

/// Stable key identifying one write so a replay never applies it twice.
#[must_use]
pub fn idempotency_key(user_id: &str, action: &str, queued_at: u64, payload: &str) -> u64 {
    let mut material = Vec::with_capacity(user_id.len() + action.len() + payload.len() + 8);
    material.extend_from_slice(user_id.as_bytes());
    material.extend_from_slice(action.as_bytes());
    material.extend_from_slice(&queued_at.to_le_bytes());
    material.extend_from_slice(payload.as_bytes());
    XxHash64::oneshot(IDEMPOTENCY_HASH_SEED, &material)
}

fn load_queue<C: LocalCache>(cache: &C) -> OfflineQueue {
    cache
        .get(CACHE_KEY_OFFLINE_QUEUE)
        .ok()
        .flatten()
        .and_then(|json| serde_json::from_str(&json).ok())
        .unwrap_or_default()
}

fn save_queue<C: LocalCache>(cache: &C, queue: &OfflineQueue) -> Result<(), EngineError> {
    let json = serde_json::to_string(queue)
        .map_err(|e| EngineError::Persistence(format!("queue serialize: {e}")))?;
    cache
        .set(CACHE_KEY_OFFLINE_QUEUE, &json)
        .map_err(|e| EngineError::Persistence(format!("queue cache write: {e}")))
}

fn load_applied<C: LocalCache>(cache: &C) -> VecDeque<u64> {
    cache
        .get(CACHE_KEY_APPLIED_WRITES)
        .ok()
        .flatten()
        .and_then(|json| serde_json::from_str(&json).ok())
        .unwrap_or_default()
}

fn save_applied<C: LocalCache>(cache: &C, applied: &VecDeque<u64>) {
    if let Ok(json) = serde_json::to_string(applied) {
        if let Err(e) = cache.set(CACHE_KEY_APPLIED_WRITES, &json) {
            log::warn!("applied-writes cache update failed: {e}");
        }
    }
}

fn remember_applied(applied: &mut VecDeque<u64>, key: u64) {
    applied.push_back(key);
    while applied.len() > APPLIED_WRITES_MEMORY {
        applied.pop_front();
    }
}

/// Persist a committed state: remote store first, local cache always.
///
/// A remote failure is absorbed by deferring the write into the offline
/// queue; the operation still succeeds as long as the local cache takes
/// the document.
///
/// # Errors
///
/// Returns [`EngineError::Persistence`] only when both the remote store
/// and the local cache reject the write, or the state cannot be
/// serialized.
pub fn persist_with_fallback<S: StateStore, C: LocalCache>(
    store: &S,
    cache: &C,
    user_id: &str,
    action: &str,
    state: &GameState,
) -> Result<PersistOutcome, EngineError> {
    let json = serde_json::to_string(state)
        .map_err(|e| EngineError::Persistence(format!("state serialize: {e}")))?;

    let mut queued = false;
    let remote_ok = match store.save(user_id, state) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("remote save failed for {user_id}, queueing: {e}");
            let queued_at = now_secs();
            let write = QueuedWrite {
                idempotency_key: idempotency_key(user_id, action, queued_at, &json),
                user_id: user_id.to_owned(),
                action: action.to_owned(),
                state: state.clone(),
                queued_at,
            };
            let mut queue = load_queue(cache);
            queue.entries.push(write);
            save_queue(cache, &queue)?;
            queued = true;
            false
        }
    };

    let cache_result = cache.set(CACHE_KEY_GAME_STATE, &json);
    if let Err(e) = cache_result {
        if remote_ok {
            log::warn!("local cache write failed for {user_id}: {e}");
        } else {
            return Err(EngineError::Persistence(format!(
                "remote and local persistence both failed: {e}"
            )));
        }
    }

    Ok(PersistOutcome { remote_ok, queued })
}

/// Read the cached state document, if any.
#[must_use]
pub fn cached_state<C: LocalCache>(cache: &C) -> Option<GameState> {
    cache
        .get(CACHE_KEY_GAME_STATE)
        .ok()
        .flatten()
        .and_then(|json| serde_json::from_str::<GameState>(&json).ok())
        .map(GameState::rehydrate)
}

/// Replay queued writes against the remote store, oldest first.
///
/// Writes whose idempotency key was already applied are dropped without
/// another remote attempt. Writes that fail again stay queued for the
/// next sync.
///
/// # Errors
///
/// Returns [`EngineError::Persistence`] when the surviving queue cannot
/// be written back to the cache.
pub fn replay_offline_queue<S: StateStore, C: LocalCache>(
    store: &S,
    cache: &C,
) -> Result<ReplayReport, EngineError> {
    let queue = load_queue(cache);
    if queue.entries.is_empty() {
        return Ok(ReplayReport::default());
    }

    let mut applied = load_applied(cache);
    let mut report = ReplayReport::default();
    let mut remaining = Vec::new();

    for write in queue.entries {
        if applied.contains(&write.idempotency_key) {
            report.skipped += 1;
            continue;
        }
        match store.save(&write.user_id, &write.state) {
            Ok(()) => {
                remember_applied(&mut applied, write.idempotency_key);
                report.replayed += 1;
            }
            Err(e) => {
                log::warn!("replay of {} still failing: {e}", write.action);
                remaining.push(write);
            }
        }
    }

    report.remaining = remaining.len();
    save_queue(cache, &OfflineQueue { entries: remaining })?;
    save_applied(cache, &applied);
    if let Err(e) = cache.set(CACHE_KEY_LAST_SYNC, &now_secs().to_string()) {
        log::warn!("last-sync cache update failed: {e}");
    }
    Ok(report)
}
