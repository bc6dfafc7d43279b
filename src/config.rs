use clap::Parser;

/// Relay server settings
#[derive(Debug, Clone, Parser)]
#[command(name = "chess_move_sync", about = "Relays chess moves between the two players of a room")]
pub struct RelayConfig {
    /// Address to bind
    #[arg(long, env = "RELAY_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "RELAY_PORT", default_value_t = 8080)]
    pub port: u16,
}

impl RelayConfig {
    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}
