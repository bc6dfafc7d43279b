use chess::Color;

/// Room and color assignment for one session.
///
/// Established once when the match is assigned and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    room_id: String,
    my_color: Color,
}

impl SessionContext {
    pub fn new(room_id: impl Into<String>, my_color: Color) -> Self {
        Self {
            room_id: room_id.into(),
            my_color,
        }
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn my_color(&self) -> Color {
        self.my_color
    }
}
