//! Single-flight guard for write actions
//!
//! A second submit of the same action on the same target is refused while
//! the first is still running.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlightAction {
    CreateTicket,
    UpdateTicket,
    DeleteTicket,
}

impl FlightAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlightAction::CreateTicket => "create-ticket",
            FlightAction::UpdateTicket => "update-ticket",
            FlightAction::DeleteTicket => "delete-ticket",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlightKey {
    pub action: FlightAction,
    pub target: String,
}

impl FlightKey {
    pub fn new(action: FlightAction, target: impl Into<String>) -> Self {
        Self {
            action,
            target: target.into(),
        }
    }
}

impl std::fmt::Display for FlightKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.action.as_str(), self.target)
    }
}

#[derive(Debug, Default)]
pub struct InFlight {
    keys: Mutex<HashSet<FlightKey>>,
}

impl InFlight {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Claim `key`; `None` if it is already running
    pub fn try_enter(self: &Arc<Self>, key: FlightKey) -> Option<FlightGuard> {
        let mut keys = self.keys.lock().unwrap_or_else(|e| e.into_inner());
        if keys.insert(key.clone()) {
            Some(FlightGuard {
                owner: Arc::clone(self),
                key,
            })
        } else {
            None
        }
    }

    pub fn is_running(&self, key: &FlightKey) -> bool {
        self.keys
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(key)
    }
}

/// Releases its key when dropped
#[derive(Debug)]
pub struct FlightGuard {
    owner: Arc<InFlight>,
    key: FlightKey,
}

impl FlightGuard {
    pub fn key(&self) -> &FlightKey {
        &self.key
    }
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.owner
            .keys
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.key);
    }
}
