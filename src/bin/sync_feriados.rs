// Manual holiday sync, without starting the HTTP server.
//
// Usage:
//   cargo run --bin sync_feriados -- [year]
//
// Reads DATABASE_PATH / HOLIDAY_API_URL from the environment and prints the
// same JSON body as GET /api/sync-feriados.

use std::sync::{Arc, Mutex};

use production_tracker::api::{ApiError, SyncApi};
use production_tracker::config::AppConfig;
use production_tracker::db::{ensure_schema, open_sqlite_connection};
use production_tracker::logging;
use production_tracker::repository::{HolidayRepository, SyncRunRepository};
use production_tracker::sync::{HolidaySyncJob, HttpHolidaySource};
use serde_json::json;

async fn run(year: Option<i32>) -> Result<serde_json::Value, ApiError> {
    let config = AppConfig::from_env()?;

    let conn = open_sqlite_connection(&config.database_path)
        .map_err(|e| ApiError::DatabaseConnectionError(e.to_string()))?;
    ensure_schema(&conn).map_err(|e| ApiError::DatabaseError(e.to_string()))?;
    let conn = Arc::new(Mutex::new(conn));

    let sync_run_repo = Arc::new(SyncRunRepository::new(conn.clone()));
    let job = Arc::new(HolidaySyncJob::new(
        Arc::new(HttpHolidaySource::new(&config.holiday_api_url, config.locale.clone())?),
        Arc::new(HolidayRepository::new(conn)),
        sync_run_repo.clone(),
    ));
    let api = SyncApi::new(job, sync_run_repo, config.locale);

    let resp = match year {
        Some(y) => api.sync_year(y).await?,
        None => api.sync_current_year().await?,
    };
    Ok(serde_json::to_value(resp).map_err(anyhow::Error::from)?)
}

#[tokio::main]
async fn main() {
    logging::init();

    let year = match std::env::args().nth(1).map(|s| s.trim().parse::<i32>()) {
        None => None,
        Some(Ok(y)) => Some(y),
        Some(Err(e)) => {
            println!("{}", json!({ "error": format!("invalid year: {}", e) }));
            std::process::exit(2);
        }
    };

    match run(year).await {
        Ok(body) => println!("{}", body),
        Err(e) => {
            println!("{}", json!({ "error": e.to_string() }));
            std::process::exit(1);
        }
    }
}
