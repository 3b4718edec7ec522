//! actix-web handlers for the `/api/v1` JSON API.
//!
//! Reads answer with view bodies. Mutations answer with a
//! [`MutationResponse`]; store and delivery failures are reported through
//! its notification with status 200, never as a 5xx.

use actix_web::{HttpResponse, web};
use chrono::{NaiveDate, Utc};
use log::error;

use crate::directory::ClientDirectory;
use crate::domain::types::ClientId;
use crate::dto::{MutationResponse, Notification};
use crate::repository::DieselRepository;
use crate::services::ServiceError;

pub mod clients;
pub mod emails;
pub mod overview;

/// Directory shared by every worker.
pub type Directory = ClientDirectory<DieselRepository>;

pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub(crate) fn parse_client_id(raw: &str) -> Result<ClientId, HttpResponse> {
    ClientId::parse(raw.trim()).map_err(|_| {
        HttpResponse::BadRequest().json(MutationResponse::<()>::failed(Notification::error(
            "Invalid Request",
            "Malformed client id",
        )))
    })
}

/// Maps a failed read onto a response carrying an error notification.
pub(crate) fn read_failure(err: ServiceError, what: &str) -> HttpResponse {
    match err {
        ServiceError::NotFound => {
            HttpResponse::NotFound().json(Notification::error("Not Found", format!("{what} not found")))
        }
        ServiceError::Form(message) => {
            HttpResponse::BadRequest().json(Notification::error("Invalid Request", message))
        }
        ServiceError::TypeConstraint(e) => {
            HttpResponse::BadRequest().json(Notification::error("Invalid Request", e.to_string()))
        }
        other => {
            error!("Failed to load {what}: {other}");
            HttpResponse::ServiceUnavailable()
                .json(Notification::error("Error", format!("Failed to load {what}")))
        }
    }
}

/// Maps a failed mutation onto the `{success: false, notification}` envelope.
pub(crate) fn mutation_failure(err: ServiceError, description: &str) -> HttpResponse {
    match err {
        ServiceError::NotFound => HttpResponse::NotFound().json(MutationResponse::<()>::failed(
            Notification::error("Not Found", "The record no longer exists"),
        )),
        ServiceError::Form(message) => HttpResponse::BadRequest().json(
            MutationResponse::<()>::failed(Notification::error("Invalid Request", message)),
        ),
        ServiceError::TypeConstraint(e) => HttpResponse::BadRequest().json(
            MutationResponse::<()>::failed(Notification::error("Invalid Request", e.to_string())),
        ),
        other => {
            error!("{description}: {other}");
            HttpResponse::Ok().json(MutationResponse::<()>::failed(Notification::error(
                "Error",
                description,
            )))
        }
    }
}

/// Registers every handler on `cfg`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(overview::show_dashboard)
            .service(overview::list_leads)
            .service(overview::show_pipeline)
            .service(overview::list_clients)
            .service(overview::list_activity)
            .service(overview::list_team_members)
            .service(overview::sync)
            .service(clients::show_client)
            .service(clients::update_stage)
            .service(clients::mark_client)
            .service(clients::mark_lead)
            .service(clients::update_client)
            .service(emails::show_draft)
            .service(emails::compose_draft)
            .service(emails::save_draft)
            .service(emails::send_draft),
    );
}
