use actix_web::{HttpResponse, Responder, get, patch, post, web};
use chrono::Utc;

use crate::domain::stage::PipelineStage;
use crate::dto::{MutationResponse, Notification};
use crate::forms::client::{StageForm, UpdateClientForm};
use crate::repository::DieselRepository;
use crate::routes::{mutation_failure, parse_client_id, read_failure, today};
use crate::services::ServiceError;
use crate::services::{overview as overview_service, pipeline as pipeline_service};

#[get("/clients/{client_id}")]
pub async fn show_client(
    client_id: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let client_id = match parse_client_id(&client_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match overview_service::client_profile(repo.get_ref(), client_id, today()) {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(err) => read_failure(err, "client"),
    }
}

#[post("/clients/{client_id}/stage")]
pub async fn update_stage(
    client_id: web::Path<String>,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<StageForm>,
) -> impl Responder {
    let client_id = match parse_client_id(&client_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let stage = match PipelineStage::try_from(form) {
        Ok(stage) => stage,
        Err(err) => return mutation_failure(ServiceError::from(err), "Failed to update client stage"),
    };

    match pipeline_service::update_stage(repo.get_ref(), client_id, stage) {
        Ok(client) => HttpResponse::Ok().json(MutationResponse::ok(
            Notification::success(
                "Stage Updated",
                format!("Client moved to {}", stage.humanized()),
            ),
            overview_service::client_view(repo.get_ref(), client, today()),
        )),
        Err(err) => mutation_failure(err, "Failed to update client stage"),
    }
}

#[post("/clients/{client_id}/mark-client")]
pub async fn mark_client(
    client_id: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let client_id = match parse_client_id(&client_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match pipeline_service::mark_as_client(repo.get_ref(), client_id) {
        Ok(client) => HttpResponse::Ok().json(MutationResponse::ok(
            Notification::success("Client Created", "Lead has been converted to an active client"),
            overview_service::client_view(repo.get_ref(), client, today()),
        )),
        Err(err) => mutation_failure(err, "Failed to convert lead to client"),
    }
}

#[post("/clients/{client_id}/mark-lead")]
pub async fn mark_lead(
    client_id: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let client_id = match parse_client_id(&client_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match pipeline_service::mark_as_lead(repo.get_ref(), client_id) {
        Ok(client) => HttpResponse::Ok().json(MutationResponse::ok(
            Notification::success("Lead Restored", "Client has been moved back to leads"),
            overview_service::client_view(repo.get_ref(), client, today()),
        )),
        Err(err) => mutation_failure(err, "Failed to move client back to leads"),
    }
}

#[patch("/clients/{client_id}")]
pub async fn update_client(
    client_id: web::Path<String>,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<UpdateClientForm>,
) -> impl Responder {
    let client_id = match parse_client_id(&client_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let updates = match form.into_domain(Utc::now().naive_utc()) {
        Ok(updates) => updates,
        Err(err) => return mutation_failure(ServiceError::from(err), "Failed to update client"),
    };

    match pipeline_service::update_client(repo.get_ref(), client_id, &updates) {
        Ok(client) => HttpResponse::Ok().json(MutationResponse::ok(
            Notification::success("Client Updated", "Client information has been updated"),
            overview_service::client_view(repo.get_ref(), client, today()),
        )),
        Err(err) => mutation_failure(err, "Failed to update client"),
    }
}
