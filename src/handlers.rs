use std::env;
use actix_web::{get, web, HttpResponse, Responder};
use chrono::{Datelike, Utc};
use log::{error, info};
use serde::Serialize;
use serde_json::json;
use crate::manager_db::errors::DBError;
use crate::manager_db::models::TableInfo;
use crate::manager_forecast::fallback::{fallback_forecast, old_forecast};
use crate::manager_forecast::{build_forecast, storm_status};
use crate::sun_times::sun_times;
use crate::AppState;

const DBINFO_LAST_ROWS: usize = 5;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Health {
    status: &'static str,
    store_path: String,
    store_exists: bool,
    cwd: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DbInfo {
    #[serde(flatten)]
    info: TableInfo,
    current_time: String,
}

/// Server error carrying the raw error detail
///
fn error_response(detail: String) -> HttpResponse {
    HttpResponse::InternalServerError().json(json!({ "detail": detail }))
}

#[get("/health")]
async fn health(data: web::Data<AppState>) -> impl Responder {
    let store_exists = data.store.store_exists();
    let cwd = env::current_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_default();

    HttpResponse::Ok().json(Health {
        status: if store_exists { "ok" } else { "error" },
        store_path: data.store.db_path().display().to_string(),
        store_exists,
        cwd,
    })
}

#[get("/dbinfo")]
async fn dbinfo(data: web::Data<AppState>) -> impl Responder {
    let store = data.store.clone();

    match tokio::task::spawn_blocking(move || store.table_info(DBINFO_LAST_ROWS)).await {
        Ok(Ok(info)) => HttpResponse::Ok().json(DbInfo {
            info,
            current_time: Utc::now().naive_utc().format("%Y-%m-%dT%H:%M:%S").to_string(),
        }),
        Ok(Err(e)) => {
            error!("failed to get db info: {}", e);
            error_response(e.to_string())
        },
        Err(e) => {
            error!("db info task failed: {}", e);
            error_response(e.to_string())
        },
    }
}

#[get("/api/status")]
async fn current_status(data: web::Data<AppState>) -> impl Responder {
    let store = data.store.clone();

    match tokio::task::spawn_blocking(move || store.latest_sample()).await {
        Ok(Ok(latest)) => HttpResponse::Ok().json(storm_status(latest)),
        Ok(Err(DBError::StoreUnavailable(e))) => error_response(e),
        Ok(Err(e)) => {
            error!("failed to get latest sample: {}", e);
            HttpResponse::Ok().json(json!({ "currentKp": null, "stormLevel": format!("Error: {}", e) }))
        },
        Err(e) => {
            error!("status task failed: {}", e);
            error_response(e.to_string())
        },
    }
}

#[get("/api/forecast")]
async fn three_day_forecast(data: web::Data<AppState>) -> impl Responder {
    let now = Utc::now().naive_utc();
    let store = data.store.clone();
    let limit = data.max_samples;

    let response = match tokio::task::spawn_blocking(move || store.upcoming_samples(now, limit)).await {
        Ok(Ok(rows)) => build_forecast(&rows, now, &data.location),
        Ok(Err(e)) => {
            error!("failed to get forecast rows, serving fallback forecast: {}", e);
            fallback_forecast(now.date(), &data.location)
        },
        Err(e) => {
            error!("forecast task failed, serving fallback forecast: {}", e);
            fallback_forecast(now.date(), &data.location)
        },
    };
    info!("serving forecast with {} days, current storm: {}", response.days.len(), response.current_storm);

    HttpResponse::Ok().json(response)
}

#[get("/api/sun-times")]
async fn sun_times_api() -> impl Responder {
    HttpResponse::Ok().json(sun_times(Utc::now().naive_utc().month()))
}

#[get("/api/old-forecast")]
async fn old_forecast_api() -> impl Responder {
    HttpResponse::Ok().json(old_forecast(Utc::now().naive_utc().date()))
}

/// Registers all routes
///
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health)
        .service(dbinfo)
        .service(current_status)
        .service(three_day_forecast)
        .service(sun_times_api)
        .service(old_forecast_api);
}
