mod errors;
mod handlers;
mod initialization;
mod logging;
mod manager_db;
mod manager_forecast;
mod storm_level;
mod sun_times;

use std::time::Duration;
use actix_web::{web, App, HttpServer};
use log::{info, warn};
use crate::errors::UnrecoverableError;
use crate::initialization::config;
use crate::manager_db::KpStore;

pub struct AppState {
    store: KpStore,
    location: String,
    max_samples: usize,
}

#[actix_web::main]
async fn main() -> Result<(), UnrecoverableError> {
    let config = config()?;

    let store = KpStore::new(&config.db.db_path, Duration::from_secs(config.db.busy_timeout_secs));
    if !store.store_exists() {
        warn!("database file {} does not exist yet, forecasts will fall back", config.db.db_path);
    }

    let state = web::Data::new(AppState {
        store,
        location: config.forecast.location,
        max_samples: config.forecast.max_samples,
    });

    info!("starting web server on {}:{}", config.web_server.bind_address, config.web_server.bind_port);
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(handlers::configure)
    })
        .bind((config.web_server.bind_address, config.web_server.bind_port))?
        .run()
        .await?;

    Ok(())
}
