use actix_web::{web, App, HttpServer};
use clap::Parser;
use log::info;

use chess_move_sync::config::RelayConfig;
use chess_move_sync::models::AppState;
use chess_move_sync::routes::configure_routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = RelayConfig::parse();
    info!("Starting chess move relay at ws://{}:{}/ws", config.host, config.port);

    let app_state = web::Data::new(AppState::default());

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .configure(configure_routes)
    })
    .bind(config.bind_address())?
    .run()
    .await
}
