use actix::Addr;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::websocket::{RelaySession, RoomRegistry};

/// Relay state shared between connections
#[derive(Default)]
pub struct AppState {
    pub rooms: Mutex<RoomRegistry>,
    pub sessions: Mutex<HashMap<String, Addr<RelaySession>>>,
}

impl AppState {
    pub fn rooms(&self) -> MutexGuard<'_, RoomRegistry> {
        self.rooms.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn sessions(&self) -> MutexGuard<'_, HashMap<String, Addr<RelaySession>>> {
        self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
