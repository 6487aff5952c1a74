//! Shared in-memory backends for integration tests, with switchable
//! failure injection for the remote store and the local cache.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::rc::Rc;

use kisanverse_game::{DecisionLog, DecisionRecord, GameState, LocalCache, StateStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendDown(pub &'static str);

impl fmt::Display for BackendDown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is unreachable", self.0)
    }
}

impl Error for BackendDown {}

#[derive(Clone, Default)]
pub struct MemoryStore {
    saves: Rc<RefCell<HashMap<String, GameState>>>,
    offline: Rc<RefCell<bool>>,
    save_count: Rc<RefCell<usize>>,
}

impl MemoryStore {
    pub fn set_offline(&self, offline: bool) {
        *self.offline.borrow_mut() = offline;
    }

    pub fn save_count(&self) -> usize {
        *self.save_count.borrow()
    }

    pub fn saved_state(&self, user_id: &str) -> Option<GameState> {
        self.saves.borrow().get(user_id).cloned()
    }
}

impl StateStore for MemoryStore {
    type Error = BackendDown;

    fn load(&self, user_id: &str) -> Result<Option<GameState>, Self::Error> {
        if *self.offline.borrow() {
            return Err(BackendDown("store"));
        }
        Ok(self.saves.borrow().get(user_id).cloned())
    }

    fn save(&self, user_id: &str, state: &GameState) -> Result<(), Self::Error> {
        if *self.offline.borrow() {
            return Err(BackendDown("store"));
        }
        *self.save_count.borrow_mut() += 1;
        self.saves
            .borrow_mut()
            .insert(user_id.to_string(), state.clone());
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MemoryCache {
    values: Rc<RefCell<HashMap<String, String>>>,
    broken: Rc<RefCell<bool>>,
}

impl MemoryCache {
    pub fn set_broken(&self, broken: bool) {
        *self.broken.borrow_mut() = broken;
    }

    pub fn raw_get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }
}

impl LocalCache for MemoryCache {
    type Error = BackendDown;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        if *self.broken.borrow() {
            return Err(BackendDown("cache"));
        }
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        if *self.broken.borrow() {
            return Err(BackendDown("cache"));
        }
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct RecordingDecisionLog {
    records: Rc<RefCell<Vec<(String, DecisionRecord)>>>,
}

impl RecordingDecisionLog {
    pub fn recorded(&self) -> Vec<(String, DecisionRecord)> {
        self.records.borrow().clone()
    }
}

impl DecisionLog for RecordingDecisionLog {
    type Error = BackendDown;

    fn record(&self, user_id: &str, record: &DecisionRecord) -> Result<(), Self::Error> {
        self.records
            .borrow_mut()
            .push((user_id.to_string(), record.clone()));
        Ok(())
    }
}
