use crate::config::AppConfig;
use crate::db::{init_db, Database};
use crate::responses::error_to_response;
use crate::router::handle;
use crate::state::AppState;
use astra::Server;
use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;

mod analysis;
mod config;
mod db;
mod domain;
mod errors;
mod feeds;
mod responses;
mod router;
mod spreadsheets;
mod state;
mod submission;
mod templates;

#[cfg(test)]
mod tests;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env();

    // 1️⃣ Create the database handle and apply the schema
    let db = Database::new(config.database_path.clone());
    if let Err(e) = init_db(&db, &config.schema_path) {
        error!("❌ Database initialization failed: {e}");
        std::process::exit(1);
    }

    // 2️⃣ Load local reports and wire the feeds, webhook and analysis clients
    let state = match AppState::from_config(config, db) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            error!("❌ Startup failed: {e}");
            std::process::exit(1);
        }
    };

    // 3️⃣ Start the server
    let addr: SocketAddr = match state.config.bind_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("❌ Invalid BIND_ADDR {:?}: {e}", state.config.bind_addr);
            std::process::exit(1);
        }
    };
    info!("Starting server at http://{addr}");

    let server = Server::bind(&addr).max_workers(state.config.max_workers);

    // 4️⃣ Serve requests, passing the shared state into the closure
    let handler_state = Arc::clone(&state);
    let result = server.serve(move |req, _info| match handle(req, &handler_state) {
        Ok(resp) => resp,
        Err(err) => error_to_response(err),
    });

    if let Err(e) = result {
        error!("Server ended with error: {e}");
    }

    info!("Server shut down cleanly.");
}
