use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use advisory_crm::delivery::webhook::WebhookDelivery;
use advisory_crm::directory::ClientDirectory;
use advisory_crm::domain::activity::ActivityKind;
use advisory_crm::domain::client::ClientStatus;
use advisory_crm::domain::email::{EmailStatus, NewEmail};
use advisory_crm::domain::stage::PipelineStage;
use advisory_crm::domain::types::ClientId;
use advisory_crm::models::config::ServerConfig;
use advisory_crm::repository::{
    ActivityLogReader, ClientReader, ClientWriter, DieselRepository, EmailReader, EmailWriter,
    TeamMemberWriter,
};
use advisory_crm::routes;
use serde_json::{Value, json};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

use common::{advisor, lead};

fn config(webhook_url: &str) -> ServerConfig {
    ServerConfig {
        address: "127.0.0.1".into(),
        port: 0,
        database_url: String::new(),
        delivery_webhook_url: webhook_url.into(),
        delivery_timeout_secs: Some(2),
        sender_name: "Fiona McCarthy".into(),
        sender_title: "Financial Advisor".into(),
        default_cc: vec!["office@example.com".into()],
        activity_limit: 20,
    }
}

macro_rules! app {
    ($repo:expr, $webhook_url:expr) => {{
        let repo: DieselRepository = $repo;
        let directory = Arc::new(ClientDirectory::new(repo.clone()));
        directory.refresh().unwrap();
        test::init_service(
            App::new()
                .app_data(web::Data::new(repo))
                .app_data(web::Data::from(directory))
                .app_data(web::Data::new(WebhookDelivery::new($webhook_url)))
                .app_data(web::Data::new(config($webhook_url)))
                .configure(routes::configure),
        )
        .await
    }};
}

#[actix_web::test]
async fn dashboard_summarises_the_directory() {
    let test_db = common::TestDb::new("dashboard_summarises_the_directory.db");
    let repo = DieselRepository::new(test_db.pool());
    repo.create_client(&lead("Ann Lee", "ann@example.com").with_stage(PipelineStage::AwaitingData))
        .unwrap();
    repo.create_client(&lead("Bo Kim", "bo@example.com")).unwrap();
    repo.create_client(
        &lead("Cy Fox", "cy@example.com").with_status(ClientStatus::ActiveClient),
    )
    .unwrap();

    let app = app!(repo, "http://127.0.0.1:9");
    let req = test::TestRequest::get().uri("/api/v1/dashboard").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["leads_count"], 2);
    assert_eq!(body["clients_count"], 1);
    assert_eq!(body["stage_counts"].as_array().unwrap().len(), 6);
    assert_eq!(body["recent_leads"].as_array().unwrap().len(), 2);
    assert!(body["synced_at"].is_string());
}

#[actix_web::test]
async fn pipeline_and_lists_filter_by_search() {
    let test_db = common::TestDb::new("pipeline_and_lists_filter_by_search.db");
    let repo = DieselRepository::new(test_db.pool());
    repo.create_client(&lead("Dee Moore", "dee@example.com").with_stage(PipelineStage::LetterPending))
        .unwrap();
    repo.create_client(&lead("Eli Ward", "eli@example.com")).unwrap();

    let app = app!(repo, "http://127.0.0.1:9");

    let req = test::TestRequest::get().uri("/api/v1/pipeline?search=dee").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let columns = body["columns"].as_array().unwrap();
    assert_eq!(columns.len(), 6);
    let letter = columns
        .iter()
        .find(|c| c["id"] == "letter_pending")
        .unwrap();
    assert_eq!(letter["count"], 1);
    assert_eq!(letter["leads"][0]["full_name"], "Dee Moore");
    assert!(columns.iter().all(|c| c["id"] == "letter_pending" || c["count"] == 0));

    let req = test::TestRequest::get().uri("/api/v1/leads").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let req = test::TestRequest::get().uri("/api/v1/clients").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn stage_update_persists_and_logs() {
    let test_db = common::TestDb::new("stage_update_persists_and_logs.db");
    let repo = DieselRepository::new(test_db.pool());
    let client = repo.create_client(&lead("Fay Dunn", "fay@example.com")).unwrap();

    let app = app!(repo.clone(), "http://127.0.0.1:9");
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/clients/{}/stage", client.id))
        .set_json(json!({ "stage": "awaiting_data" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["success"], true);
    assert_eq!(body["notification"]["title"], "Stage Updated");
    assert_eq!(body["notification"]["description"], "Client moved to awaiting data");
    assert_eq!(body["data"]["stage"], "awaiting_data");

    let stored = repo.get_client_by_id(client.id).unwrap().unwrap();
    assert_eq!(stored.stage, PipelineStage::AwaitingData);
    let history = repo.list_client_activity(client.id).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].action, ActivityKind::StageChanged);
}

#[actix_web::test]
async fn stage_update_rejects_bad_input() {
    let test_db = common::TestDb::new("stage_update_rejects_bad_input.db");
    let repo = DieselRepository::new(test_db.pool());
    let client = repo.create_client(&lead("Gus Hale", "gus@example.com")).unwrap();
    let app = app!(repo.clone(), "http://127.0.0.1:9");

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/clients/{}/stage", client.id))
        .set_json(json!({ "stage": "closed_won" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/v1/clients/not-a-uuid/stage")
        .set_json(json!({ "stage": "awaiting_data" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/clients/{}/stage", ClientId::new()))
        .set_json(json!({ "stage": "awaiting_data" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    assert!(repo.list_client_activity(client.id).unwrap().is_empty());
}

#[actix_web::test]
async fn mark_client_then_lead_round_trips() {
    let test_db = common::TestDb::new("mark_client_then_lead_round_trips.db");
    let repo = DieselRepository::new(test_db.pool());
    let client = repo.create_client(&lead("Hana Roe", "hana@example.com")).unwrap();
    let app = app!(repo.clone(), "http://127.0.0.1:9");

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/clients/{}/mark-client", client.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["notification"]["title"], "Client Created");
    assert_eq!(body["data"]["status"], "active_client");
    assert!(body["data"]["client_since"].is_string());

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/clients/{}/mark-lead", client.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "lead");
    assert!(body["data"]["client_since"].is_null());

    let kinds: Vec<_> = repo
        .list_client_activity(client.id)
        .unwrap()
        .into_iter()
        .map(|log| log.action)
        .collect();
    assert_eq!(kinds, vec![ActivityKind::MarkedAsClient, ActivityKind::MarkedAsLead]);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/clients/{}", client.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["activity"].as_array().unwrap().len(), 2);
    assert!(body["latest_meeting"].is_null());
}

#[actix_web::test]
async fn patch_updates_client_fields() {
    let test_db = common::TestDb::new("patch_updates_client_fields.db");
    let repo = DieselRepository::new(test_db.pool());
    let client = repo.create_client(&lead("Ivo Park", "ivo@example.com")).unwrap();
    let app = app!(repo.clone(), "http://127.0.0.1:9");

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/clients/{}", client.id))
        .set_json(json!({ "notes": "Call after 5pm", "docs_required": 4, "docs_received": 1 }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["notification"]["title"], "Client Updated");
    assert_eq!(body["data"]["outstanding_docs"], 3);

    let stored = repo.get_client_by_id(client.id).unwrap().unwrap();
    assert_eq!(stored.notes.as_deref(), Some("Call after 5pm"));
    assert!(repo.list_client_activity(client.id).unwrap().is_empty());

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/clients/{}", client.id))
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn mutation_responses_include_the_assigned_advisor() {
    let test_db = common::TestDb::new("mutation_responses_include_the_assigned_advisor.db");
    let repo = DieselRepository::new(test_db.pool());
    let fiona = repo
        .create_team_member(&advisor("Fiona McCarthy", "fiona@example.com"))
        .unwrap();
    let client = repo
        .create_client(&lead("Orla Byrne", "orla@example.com").with_advisor(fiona.id))
        .unwrap();
    let app = app!(repo, "http://127.0.0.1:9");

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/clients/{}/stage", client.id))
        .set_json(json!({ "stage": "letter_pending" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["advisor"]["id"], fiona.id.to_string());
    assert_eq!(body["data"]["advisor"]["full_name"], "Fiona McCarthy");

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/clients/{}/mark-client", client.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["advisor"]["id"], fiona.id.to_string());
}

#[actix_web::test]
async fn missing_draft_falls_back_to_placeholder() {
    let test_db = common::TestDb::new("missing_draft_falls_back_to_placeholder.db");
    let repo = DieselRepository::new(test_db.pool());
    let client = repo.create_client(&lead("Jo Quinn", "jo@example.com")).unwrap();
    let app = app!(repo, "http://127.0.0.1:9");

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/clients/{}/drafts/discovery", client.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert!(body["id"].is_null());
    assert_eq!(body["subject"], "Discovery - Jo Quinn");
    assert_eq!(body["to_email"], "jo@example.com");
    assert_eq!(
        body["attachments"],
        json!(["Document_Checklist.pdf", "Privacy_Notice.pdf"])
    );

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/clients/{}/drafts/discovery", ClientId::new()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn stored_draft_is_edited_and_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let test_db = common::TestDb::new("stored_draft_is_edited_and_sent.db");
    let repo = DieselRepository::new(test_db.pool());
    let client = repo.create_client(&lead("Kit Shaw", "kit@example.com")).unwrap();
    let draft = repo
        .create_email(&NewEmail::draft(
            client.id,
            "Chase",
            "Chase - Kit Shaw",
            "original",
            "kit@example.com",
        ))
        .unwrap();
    let uri = server.uri();
    let app = app!(repo.clone(), &uri);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/clients/{}/drafts/chase", client.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["id"], draft.id.to_string());

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/emails/{}", draft.id))
        .set_json(json!({ "body": "edited" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["body"], "edited");

    let req = test::TestRequest::post()
        .uri("/api/v1/emails/send")
        .set_json(json!({
            "id": draft.id.to_string(),
            "client_id": client.id.to_string(),
            "template_type": "chase",
            "to_email": "kit@example.com",
            "cc_emails": ["partner@example.com"],
            "subject": "Chase - Kit Shaw",
            "body": "edited",
            "attachments": ["Checklist.pdf"],
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert_eq!(
        body["notification"]["description"],
        "Email sent to Kit Shaw with 1 attachment"
    );

    let stored = repo.get_email_by_id(draft.id).unwrap().unwrap();
    assert_eq!(stored.status, EmailStatus::Sent);
    assert!(stored.sent_at.is_some());
}

#[actix_web::test]
async fn rejected_delivery_leaves_draft_unsent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let test_db = common::TestDb::new("rejected_delivery_leaves_draft_unsent.db");
    let repo = DieselRepository::new(test_db.pool());
    let client = repo.create_client(&lead("Lou Tate", "lou@example.com")).unwrap();
    let draft = repo
        .create_email(&NewEmail::draft(
            client.id,
            "letter",
            "Letter - Lou Tate",
            "body",
            "lou@example.com",
        ))
        .unwrap();
    let uri = server.uri();
    let app = app!(repo.clone(), &uri);

    let req = test::TestRequest::post()
        .uri("/api/v1/emails/send")
        .set_json(json!({
            "id": draft.id.to_string(),
            "client_id": client.id.to_string(),
            "template_type": "letter",
            "to_email": "lou@example.com",
            "subject": "Letter - Lou Tate",
            "body": "body",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["notification"]["level"], "error");

    let stored = repo.get_email_by_id(draft.id).unwrap().unwrap();
    assert_eq!(stored.status, EmailStatus::Draft);
}

#[actix_web::test]
async fn compose_renders_and_stores_a_draft() {
    let test_db = common::TestDb::new("compose_renders_and_stores_a_draft.db");
    let repo = DieselRepository::new(test_db.pool());
    let client = repo.create_client(&lead("Max Vale", "max@example.com")).unwrap();
    let app = app!(repo.clone(), "http://127.0.0.1:9");

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/clients/{}/drafts/letter/compose", client.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["cc_emails"], json!(["office@example.com"]));
    assert!(body["data"]["id"].is_string());

    let stored = repo.list_client_emails(client.id).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].template_type.as_deref(), Some("letter"));
}

#[actix_web::test]
async fn sync_acknowledges() {
    let test_db = common::TestDb::new("sync_acknowledges.db");
    let repo = DieselRepository::new(test_db.pool());
    let app = app!(repo, "http://127.0.0.1:9");

    let req = test::TestRequest::post().uri("/api/v1/sync").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["notification"]["title"], "Sync Complete");
    assert_eq!(body["notification"]["description"], "All systems synchronized");
}
