use actix_web::{HttpResponse, Responder, get, post, put, web};
use validator::Validate;

use crate::delivery::webhook::WebhookDelivery;
use crate::domain::template::TemplateType;
use crate::domain::types::EmailId;
use crate::dto::client::DraftView;
use crate::dto::{MutationResponse, Notification};
use crate::forms::FormError;
use crate::forms::email::{SaveDraftForm, SendDraftForm};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{mutation_failure, parse_client_id, read_failure};
use crate::services::ServiceError;
use crate::services::drafts::{self as drafts_service, OutgoingDraft};

#[get("/clients/{client_id}/drafts/{template_type}")]
pub async fn show_draft(
    path: web::Path<(String, String)>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let (client_id, template_type) = path.into_inner();
    let client_id = match parse_client_id(&client_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match drafts_service::resolve_draft(repo.get_ref(), client_id, &template_type) {
        Ok(draft) => {
            let attachments = draft
                .template_type
                .parse::<TemplateType>()
                .map(TemplateType::attachments)
                .unwrap_or_default();
            HttpResponse::Ok().json(DraftView { draft, attachments })
        }
        Err(err) => read_failure(err, "draft"),
    }
}

#[post("/clients/{client_id}/drafts/{template_type}/compose")]
pub async fn compose_draft(
    path: web::Path<(String, String)>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let (client_id, template_type) = path.into_inner();
    let client_id = match parse_client_id(&client_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let template = match template_type.parse::<TemplateType>() {
        Ok(template) => template,
        Err(err) => return mutation_failure(ServiceError::from(err), "Failed to compose draft"),
    };

    match drafts_service::compose_draft(
        repo.get_ref(),
        client_id,
        template,
        &server_config.signature(),
        &server_config.default_cc,
    ) {
        Ok(composed) => HttpResponse::Ok().json(MutationResponse::ok(
            Notification::success(
                "Draft Created",
                format!("{} is ready for review", composed.draft.subject),
            ),
            DraftView {
                draft: composed.draft,
                attachments: composed.attachments,
            },
        )),
        Err(err) => mutation_failure(err, "Failed to compose draft"),
    }
}

#[put("/emails/{email_id}")]
pub async fn save_draft(
    email_id: web::Path<String>,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<SaveDraftForm>,
) -> impl Responder {
    let email_id = match EmailId::parse(email_id.trim()) {
        Ok(id) => id,
        Err(err) => return mutation_failure(ServiceError::from(err), "Failed to save draft"),
    };
    if let Err(err) = form.validate() {
        return mutation_failure(FormError::from(err).into(), "Failed to save draft");
    }

    match drafts_service::save_draft(repo.get_ref(), email_id, &form.body) {
        Ok(email) => HttpResponse::Ok().json(MutationResponse::ok(
            Notification::success("Draft Saved", "Your changes have been saved"),
            email,
        )),
        Err(err) => mutation_failure(err, "Failed to save draft"),
    }
}

#[post("/emails/send")]
pub async fn send_draft(
    repo: web::Data<DieselRepository>,
    delivery: web::Data<WebhookDelivery>,
    web::Json(form): web::Json<SendDraftForm>,
) -> impl Responder {
    let draft = match OutgoingDraft::try_from(form) {
        Ok(draft) => draft,
        Err(err) => return mutation_failure(ServiceError::from(err), "Failed to send email"),
    };

    match drafts_service::send_draft(repo.get_ref(), delivery.get_ref(), draft).await {
        Ok(sent) => {
            let plural = if sent.attachment_count == 1 { "" } else { "s" };
            HttpResponse::Ok().json(MutationResponse::ok(
                Notification::success(
                    "Email Sent",
                    format!(
                        "Email sent to {} with {} attachment{plural}",
                        sent.client_name, sent.attachment_count
                    ),
                ),
                sent.record,
            ))
        }
        Err(err) => mutation_failure(err, "Failed to send email"),
    }
}
