use chess::Color;
use log::info;
use std::collections::HashMap;

use crate::error::SyncError;

/// Room membership for the relay.
///
/// A room holds at most one connection per color. Colors are handed out in
/// join order: White first, then Black.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<String, Vec<(String, Color)>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `conn_id` to `room_id` and return its color.
    ///
    /// Joining a room twice returns the color already held.
    pub fn join(&mut self, room_id: &str, conn_id: &str) -> Result<Color, SyncError> {
        let members = self.rooms.entry(room_id.to_string()).or_default();

        if let Some((_, color)) = members.iter().find(|(id, _)| id == conn_id) {
            return Ok(*color);
        }

        let color = [Color::White, Color::Black]
            .into_iter()
            .find(|color| members.iter().all(|(_, taken)| taken != color))
            .ok_or_else(|| SyncError::RoomFull(room_id.to_string()))?;

        members.push((conn_id.to_string(), color));
        info!("Connection {} joined room {} as {:?}", conn_id, room_id, color);
        Ok(color)
    }

    /// Remove `conn_id` from every room; returns the rooms it left
    pub fn leave(&mut self, conn_id: &str) -> Vec<String> {
        let mut left = Vec::new();
        for (room_id, members) in self.rooms.iter_mut() {
            let before = members.len();
            members.retain(|(id, _)| id != conn_id);
            if members.len() != before {
                left.push(room_id.clone());
            }
        }

        self.rooms.retain(|room_id, members| {
            if members.is_empty() {
                info!("No more players in room {}. Cleaning up.", room_id);
            }
            !members.is_empty()
        });
        left
    }

    /// Other members of `room_id`, for forwarding a move sent by `conn_id`
    pub fn peers(&self, room_id: &str, conn_id: &str) -> Result<Vec<String>, SyncError> {
        let members = self
            .rooms
            .get(room_id)
            .filter(|members| members.iter().any(|(id, _)| id == conn_id))
            .ok_or_else(|| SyncError::NotInRoom(room_id.to_string()))?;

        Ok(members
            .iter()
            .filter(|(id, _)| id != conn_id)
            .map(|(id, _)| id.clone())
            .collect())
    }

    pub fn member_count(&self, room_id: &str) -> usize {
        self.rooms.get(room_id).map_or(0, Vec::len)
    }
}
