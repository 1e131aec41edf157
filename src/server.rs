use actix_web::http::StatusCode;
use actix_web::web::{self, Data};
use actix_web::{App, HttpResponse, HttpServer, ResponseError};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{error, info};

use crate::controller::standings::standings_for_flight;
use crate::controller::submit::{RoundSubmission, submit_round};
use crate::controller::update::handicap_record;
use crate::error::LeagueError;
use crate::record::RecordConfig;
use crate::score::{
    MatchValidationRequest, RoundValidationRequest, validate_match, validate_round,
};
use crate::storage::SqliteStorage;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ResponseError for LeagueError {
    fn status_code(&self) -> StatusCode {
        match self {
            LeagueError::InvalidCard { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            LeagueError::MissingPrerequisite(_) | LeagueError::InsufficientData(_) => {
                StatusCode::NOT_FOUND
            }
            LeagueError::StaleRead(_) => StatusCode::CONFLICT,
            LeagueError::Parse(_) | LeagueError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            LeagueError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            LeagueError::BatchAborted { .. } | LeagueError::Db(_) | LeagueError::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            error!(error = %self, "request failed");
        }
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}

fn date_param(
    query: &HashMap<String, String>,
    key: &str,
) -> Result<Option<NaiveDate>, LeagueError> {
    query
        .get(key)
        .map(|s| {
            s.parse::<NaiveDate>()
                .map_err(|e| LeagueError::Parse(format!("{key}: {e}")))
        })
        .transpose()
}

async fn validate_round_handler(body: web::Json<RoundValidationRequest>) -> HttpResponse {
    HttpResponse::Ok().json(validate_round(&body))
}

async fn validate_match_handler(body: web::Json<MatchValidationRequest>) -> HttpResponse {
    HttpResponse::Ok().json(validate_match(&body))
}

async fn submit_round_handler(
    body: web::Json<RoundSubmission>,
    storage: Data<SqliteStorage>,
) -> Result<HttpResponse, LeagueError> {
    let summary = submit_round(storage.get_ref(), &body).await?;
    Ok(HttpResponse::Created().json(summary))
}

async fn handicap_record_handler(
    path: web::Path<i64>,
    query: web::Query<HashMap<String, String>>,
    storage: Data<SqliteStorage>,
    config: Data<RecordConfig>,
) -> Result<HttpResponse, LeagueError> {
    let golfer_id = path.into_inner();
    let today = Local::now().date_naive();
    let as_of = date_param(&query, "as_of")?.unwrap_or(today);
    let today = date_param(&query, "today")?.unwrap_or(today);
    let record = handicap_record(storage.get_ref(), golfer_id, as_of, today, &config).await?;
    Ok(HttpResponse::Ok().json(record))
}

async fn standings_handler(
    path: web::Path<i64>,
    storage: Data<SqliteStorage>,
) -> Result<HttpResponse, LeagueError> {
    let standings = standings_for_flight(storage.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(standings))
}

/// Routes shared by the server and its tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/rounds/validate", web::post().to(validate_round_handler))
        .route("/matches/validate", web::post().to(validate_match_handler))
        .route("/rounds", web::post().to(submit_round_handler))
        .route(
            "/golfers/{golfer_id}/handicap-record",
            web::get().to(handicap_record_handler),
        )
        .route(
            "/flights/{flight_id}/standings",
            web::get().to(standings_handler),
        )
        .route("/health", web::get().to(HttpResponse::Ok));
}

/// # Errors
///
/// Will return `Err` if the address cannot be bound or the server stops
/// with an I/O failure
pub async fn serve(storage: SqliteStorage, config: RecordConfig, bind: &str) -> std::io::Result<()> {
    info!(bind, "starting server");
    HttpServer::new(move || {
        App::new()
            .app_data(Data::new(storage.clone()))
            .app_data(Data::new(config.clone()))
            .configure(configure)
    })
    .bind(bind)?
    .run()
    .await
}
