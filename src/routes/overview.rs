use actix_web::{HttpResponse, Responder, get, post, web};
use serde::Deserialize;

use crate::dto::{MutationResponse, Notification};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{Directory, read_failure, today};
use crate::services::overview as overview_service;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ActivityParams {
    pub limit: Option<i64>,
}

#[get("/dashboard")]
pub async fn show_dashboard(
    repo: web::Data<DieselRepository>,
    directory: web::Data<Directory>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let snapshot = directory.snapshot();
    HttpResponse::Ok().json(overview_service::dashboard(
        repo.get_ref(),
        &snapshot,
        server_config.activity_limit,
        today(),
    ))
}

#[get("/leads")]
pub async fn list_leads(
    params: web::Query<SearchParams>,
    directory: web::Data<Directory>,
) -> impl Responder {
    let snapshot = directory.snapshot();
    HttpResponse::Ok().json(overview_service::list_leads(
        &snapshot,
        params.search.as_deref(),
        today(),
    ))
}

#[get("/pipeline")]
pub async fn show_pipeline(
    params: web::Query<SearchParams>,
    directory: web::Data<Directory>,
) -> impl Responder {
    let snapshot = directory.snapshot();
    HttpResponse::Ok().json(overview_service::pipeline(
        &snapshot,
        params.search.as_deref(),
        today(),
    ))
}

#[get("/clients")]
pub async fn list_clients(
    params: web::Query<SearchParams>,
    directory: web::Data<Directory>,
) -> impl Responder {
    let snapshot = directory.snapshot();
    HttpResponse::Ok().json(overview_service::list_clients(
        &snapshot,
        params.search.as_deref(),
        today(),
    ))
}

#[get("/activity")]
pub async fn list_activity(
    params: web::Query<ActivityParams>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let limit = params.limit.unwrap_or(server_config.activity_limit);
    match overview_service::recent_activity(repo.get_ref(), limit) {
        Ok(entries) => HttpResponse::Ok().json(entries),
        Err(err) => read_failure(err, "activity"),
    }
}

#[get("/team-members")]
pub async fn list_team_members(repo: web::Data<DieselRepository>) -> impl Responder {
    match overview_service::list_team_members(repo.get_ref()) {
        Ok(members) => HttpResponse::Ok().json(members),
        Err(err) => read_failure(err, "team members"),
    }
}

/// Acknowledges the sidebar sync button. Nothing is resynchronized.
#[post("/sync")]
pub async fn sync() -> impl Responder {
    HttpResponse::Ok().json(MutationResponse::done(Notification::info(
        "Sync Complete",
        "All systems synchronized",
    )))
}
