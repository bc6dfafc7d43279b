use actix::Message;
use chess::{Color, Square};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single ply, `{from, to}`, exchanged between peers.
///
/// The descriptor carries no move/capture tag; the receiver classifies it
/// against its own board.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveDescriptor {
    #[serde(with = "square_name")]
    pub from: Square,
    #[serde(with = "square_name")]
    pub to: Square,
}

impl MoveDescriptor {
    pub fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for MoveDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

/// Frame sent from a client to the relay
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Session setup: enter a room and receive a color.
    Join { room_id: String },
    /// `move(roomID, {from, to})`
    Move(String, MoveDescriptor),
}

/// Frame sent from the relay to a client
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    Joined {
        room_id: String,
        #[serde(with = "color_name")]
        color: Color,
    },
    /// `opponent-move({from, to})`
    OpponentMove(MoveDescriptor),
    Error(String),
}

/// Serialized frame delivered to a relay session actor
#[derive(Message)]
#[rtype(result = "()")]
pub struct RelayFrame(pub String);

mod square_name {
    use chess::Square;
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    use crate::game::utils::parse_square;

    pub fn serialize<S: Serializer>(square: &Square, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(square)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Square, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_square(&raw).map_err(D::Error::custom)
    }
}

mod color_name {
    use chess::Color;
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    use crate::game::utils::{color_to_string, parse_color};

    pub fn serialize<S: Serializer>(color: &Color, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&color_to_string(*color))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_color(&raw).map_err(D::Error::custom)
    }
}
