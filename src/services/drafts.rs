//! Email draft lookup, editing, composition and delivery.

use chrono::Utc;
use log::{debug, error, info};

use crate::delivery::{DeliveryPayload, EmailDelivery};
use crate::domain::client::Client;
use crate::domain::email::{Email, EmailDraft, EmailStatus, NewEmail};
use crate::domain::template::{Signature, TemplateType, capitalize};
use crate::domain::types::{ClientId, EmailAddress, EmailId};
use crate::repository::{ClientReader, EmailQuery, EmailReader, EmailWriter};
use crate::services::{ServiceError, ServiceResult};

const PLACEHOLDER_BODY: &str =
    "No draft was found for this client and template. Write your message here.";

/// Search passes run in order until one yields an email.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DraftTier {
    /// Same template type, still a draft.
    TypedDraft,
    /// Same template type, any status.
    Typed,
    /// Anything on file for the client.
    AnyForClient,
}

impl DraftTier {
    pub const ORDER: [DraftTier; 3] = [
        DraftTier::TypedDraft,
        DraftTier::Typed,
        DraftTier::AnyForClient,
    ];

    pub fn query(self, client_id: ClientId, template_type: &str) -> EmailQuery {
        let query = EmailQuery::new(client_id);
        match self {
            DraftTier::TypedDraft => query
                .template_type(template_type)
                .status(EmailStatus::Draft),
            DraftTier::Typed => query.template_type(template_type),
            DraftTier::AnyForClient => query,
        }
    }
}

/// Draft shown when nothing is on file. It has no id and is never persisted
/// implicitly.
pub fn placeholder_draft(client: &Client, template_type: &str) -> EmailDraft {
    let template_type = template_type
        .parse::<TemplateType>()
        .map(TemplateType::as_str)
        .unwrap_or_else(|_| template_type.trim());
    EmailDraft {
        id: None,
        client_id: client.id,
        template_type: template_type.to_string(),
        subject: format!("{} - {}", capitalize(template_type), client.full_name),
        body: PLACEHOLDER_BODY.to_string(),
        to_email: client.email.as_str().to_string(),
        cc_emails: Vec::new(),
        status: EmailStatus::Draft,
        sent_at: None,
    }
}

/// Finds the draft to review for `client_id`, falling back through
/// [`DraftTier::ORDER`] and finally to a placeholder.
pub fn resolve_draft<R>(repo: &R, client_id: ClientId, template_type: &str) -> ServiceResult<EmailDraft>
where
    R: ClientReader + EmailReader + ?Sized,
{
    let client = repo
        .get_client_by_id(client_id)
        .inspect_err(|e| error!("Failed to load client {client_id}: {e}"))?
        .ok_or(ServiceError::NotFound)?;

    for tier in DraftTier::ORDER {
        let found = repo
            .find_latest_email(&tier.query(client_id, template_type))
            .inspect_err(|e| error!("Failed to look up drafts for client {client_id}: {e}"))?;
        if let Some(email) = found {
            debug!("draft for client {client_id} resolved at {tier:?}");
            return Ok(email.into());
        }
    }

    debug!("no draft on file for client {client_id}, using placeholder");
    Ok(placeholder_draft(&client, template_type))
}

/// Overwrites the draft body. Concurrent edits are last write wins.
pub fn save_draft<R>(repo: &R, email_id: EmailId, body: &str) -> ServiceResult<Email>
where
    R: EmailWriter + ?Sized,
{
    repo.save_email_body(email_id, body)
        .inspect_err(|e| error!("Failed to save draft {email_id}: {e}"))
        .map_err(ServiceError::from)
}

/// A reviewed draft ready to go out.
#[derive(Clone, Debug, PartialEq)]
pub struct OutgoingDraft {
    /// Set when the draft exists in storage and should be marked sent.
    pub id: Option<EmailId>,
    pub client_id: ClientId,
    pub template_type: String,
    pub to_email: EmailAddress,
    pub cc_emails: Vec<EmailAddress>,
    pub subject: String,
    pub body: String,
    pub attachments: Vec<String>,
}

/// Result of a successful delivery.
#[derive(Clone, Debug, PartialEq)]
pub struct SentDraft {
    pub client_name: String,
    pub attachment_count: usize,
    /// The stored email after it was marked sent, if that succeeded.
    pub record: Option<Email>,
}

/// Hands the draft to `delivery` and, once accepted, marks the stored draft
/// as sent. Failing to mark it does not undo a delivered email.
pub async fn send_draft<R, D>(repo: &R, delivery: &D, draft: OutgoingDraft) -> ServiceResult<SentDraft>
where
    R: ClientReader + EmailWriter + ?Sized,
    D: EmailDelivery,
{
    let client = repo
        .get_client_by_id(draft.client_id)
        .inspect_err(|e| error!("Failed to load client {}: {e}", draft.client_id))?
        .ok_or(ServiceError::NotFound)?;

    let payload = DeliveryPayload {
        to_email: draft.to_email.into_inner(),
        cc_emails: draft
            .cc_emails
            .into_iter()
            .map(EmailAddress::into_inner)
            .collect(),
        subject: draft.subject,
        body: draft.body,
        client_id: client.id,
        client_name: client.full_name.as_str().to_string(),
        template_type: draft.template_type,
        attachments: draft.attachments,
    };

    delivery.deliver(&payload).await?;
    info!("Sent {} email to {}", payload.template_type, payload.to_email);

    let record = match draft.id {
        Some(email_id) => match repo.mark_email_sent(email_id, Utc::now().naive_utc()) {
            Ok(email) => Some(email),
            Err(e) => {
                error!("Email {email_id} was delivered but could not be marked sent: {e}");
                None
            }
        },
        None => None,
    };

    Ok(SentDraft {
        client_name: payload.client_name,
        attachment_count: payload.attachments.len(),
        record,
    })
}

/// Rendered template stored as a fresh draft.
#[derive(Clone, Debug, PartialEq)]
pub struct ComposedDraft {
    pub draft: EmailDraft,
    pub attachments: Vec<String>,
}

/// Renders `template` for the client and saves it as a new draft addressed to
/// the client with `default_cc` copied.
pub fn compose_draft<R>(
    repo: &R,
    client_id: ClientId,
    template: TemplateType,
    signature: &Signature,
    default_cc: &[String],
) -> ServiceResult<ComposedDraft>
where
    R: ClientReader + EmailWriter + ?Sized,
{
    let client = repo
        .get_client_by_id(client_id)
        .inspect_err(|e| error!("Failed to load client {client_id}: {e}"))?
        .ok_or(ServiceError::NotFound)?;

    let cc_emails = default_cc
        .iter()
        .map(|cc| EmailAddress::new(cc.as_str()).map(EmailAddress::into_inner))
        .collect::<Result<Vec<_>, _>>()?;

    let rendered = template.render(&client, signature);
    let new_email = NewEmail::draft(
        client.id,
        template.as_str(),
        rendered.subject,
        rendered.body,
        client.email.as_str(),
    )
    .with_cc(cc_emails);

    let email = repo
        .create_email(&new_email)
        .inspect_err(|e| error!("Failed to store {template} draft for {client_id}: {e}"))?;
    info!("Composed {template} draft {} for client {client_id}", email.id);

    Ok(ComposedDraft {
        draft: email.into(),
        attachments: rendered.attachments,
    })
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use std::sync::Mutex;

    use chrono::NaiveDateTime;

    use super::*;
    use crate::delivery::DeliveryError;
    use crate::domain::stage::PipelineStage;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use crate::test_support::{at, client};

    fn email(
        client_id: ClientId,
        template_type: &str,
        status: EmailStatus,
        created_at: NaiveDateTime,
    ) -> Email {
        Email {
            id: EmailId::new(),
            client_id,
            template_type: Some(template_type.to_string()),
            subject: format!("{template_type} subject"),
            body: format!("{template_type} body"),
            to_email: "kate@example.com".to_string(),
            cc_emails: Vec::new(),
            status,
            sent_at: None,
            created_by: None,
            created_at,
        }
    }

    /// Evaluates an [`EmailQuery`] against in-memory rows the way the store does.
    fn newest_match(rows: &[Email], query: &EmailQuery) -> Option<Email> {
        rows.iter()
            .filter(|e| e.client_id == query.client_id)
            .filter(|e| {
                query.template_type.as_ref().is_none_or(|t| {
                    e.template_type
                        .as_deref()
                        .is_some_and(|own| own.eq_ignore_ascii_case(t.trim()))
                })
            })
            .filter(|e| query.status.is_none_or(|s| e.status == s))
            .max_by_key(|e| e.created_at)
            .cloned()
    }

    fn repo_with(kate: Client, rows: Vec<Email>) -> MockRepository {
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id()
            .returning(move |_| Ok(Some(kate.clone())));
        repo.expect_find_latest_email()
            .returning(move |query| Ok(newest_match(&rows, query)));
        repo
    }

    #[test]
    fn typed_draft_wins_over_newer_sent_email() {
        let kate = client("Kate Moran", "kate@example.com", PipelineStage::AwaitingData);
        let id = kate.id;
        let draft = email(id, "Discovery", EmailStatus::Draft, at("2025-01-01 10:00:00"));
        let sent = email(id, "discovery", EmailStatus::Sent, at("2025-02-01 10:00:00"));
        let repo = repo_with(kate, vec![draft.clone(), sent]);

        let resolved = resolve_draft(&repo, id, "discovery").expect("resolved");
        assert_eq!(resolved.id, Some(draft.id));
    }

    #[test]
    fn falls_back_to_sent_email_of_same_type() {
        let kate = client("Kate Moran", "kate@example.com", PipelineStage::AwaitingData);
        let id = kate.id;
        let chase = email(id, "chase", EmailStatus::Draft, at("2025-03-01 10:00:00"));
        let discovery = email(id, "discovery", EmailStatus::Sent, at("2025-01-01 10:00:00"));
        let repo = repo_with(kate, vec![chase, discovery.clone()]);

        let resolved = resolve_draft(&repo, id, "discovery").expect("resolved");
        assert_eq!(resolved.id, Some(discovery.id));
        assert_eq!(resolved.status, EmailStatus::Sent);
    }

    #[test]
    fn falls_back_to_any_email_for_the_client() {
        let kate = client("Kate Moran", "kate@example.com", PipelineStage::AwaitingData);
        let id = kate.id;
        let chase = email(id, "chase", EmailStatus::Failed, at("2025-03-01 10:00:00"));
        let repo = repo_with(kate, vec![chase.clone()]);

        let resolved = resolve_draft(&repo, id, "letter").expect("resolved");
        assert_eq!(resolved.id, Some(chase.id));
    }

    #[test]
    fn synthesizes_placeholder_when_nothing_is_on_file() {
        let kate = client("Kate Moran", "kate@example.com", PipelineStage::AwaitingData);
        let id = kate.id;
        let other = email(ClientId::new(), "letter", EmailStatus::Draft, at("2025-03-01 10:00:00"));
        let repo = repo_with(kate, vec![other]);

        let resolved = resolve_draft(&repo, id, "letter").expect("resolved");
        assert_eq!(resolved.id, None);
        assert_eq!(resolved.subject, "Letter - Kate Moran");
        assert_eq!(resolved.to_email, "kate@example.com");
        assert!(resolved.cc_emails.is_empty());
    }

    #[test]
    fn placeholder_normalizes_known_template_types() {
        let kate = client("Kate Moran", "kate@example.com", PipelineStage::AwaitingData);

        let known = placeholder_draft(&kate, " CHASE ");
        assert_eq!(known.subject, "Chase - Kate Moran");
        assert_eq!(known.template_type, "chase");

        let custom = placeholder_draft(&kate, "annual review");
        assert_eq!(custom.subject, "Annual review - Kate Moran");
        assert_eq!(custom.template_type, "annual review");
    }

    #[test]
    fn unknown_client_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id().returning(|_| Ok(None));
        repo.expect_find_latest_email().times(0);

        let result = resolve_draft(&repo, ClientId::new(), "chase");
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    struct RecordingDelivery {
        sent: Mutex<Vec<DeliveryPayload>>,
        reject: bool,
    }

    impl RecordingDelivery {
        fn new(reject: bool) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                reject,
            }
        }
    }

    impl EmailDelivery for RecordingDelivery {
        async fn deliver(&self, payload: &DeliveryPayload) -> Result<(), DeliveryError> {
            if self.reject {
                return Err(DeliveryError::Status {
                    status: 502,
                    body: "bad gateway".to_string(),
                });
            }
            self.sent.lock().unwrap().push(payload.clone());
            Ok(())
        }
    }

    fn outgoing(client_id: ClientId, id: Option<EmailId>) -> OutgoingDraft {
        OutgoingDraft {
            id,
            client_id,
            template_type: "letter".to_string(),
            to_email: EmailAddress::new("kate@example.com").expect("email"),
            cc_emails: vec![EmailAddress::new("admin@example.com").expect("email")],
            subject: "Your Letter of Recommendation - Kate Moran".to_string(),
            body: "Dear Kate".to_string(),
            attachments: vec!["Letter_of_Recommendation.pdf".to_string()],
        }
    }

    #[tokio::test]
    async fn successful_send_marks_persisted_draft() {
        let kate = client("Kate Moran", "kate@example.com", PipelineStage::LetterPending);
        let id = kate.id;
        let stored = email(id, "letter", EmailStatus::Draft, at("2025-03-01 10:00:00"));
        let email_id = stored.id;

        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id()
            .returning(move |_| Ok(Some(kate.clone())));
        repo.expect_mark_email_sent()
            .withf(move |eid, _| *eid == email_id)
            .times(1)
            .returning(move |_, sent_at| {
                Ok(Email {
                    status: EmailStatus::Sent,
                    sent_at: Some(sent_at),
                    ..stored.clone()
                })
            });
        let delivery = RecordingDelivery::new(false);

        let sent = send_draft(&repo, &delivery, outgoing(id, Some(email_id)))
            .await
            .expect("sent");

        assert_eq!(sent.client_name, "Kate Moran");
        assert_eq!(sent.attachment_count, 1);
        let record = sent.record.expect("marked sent");
        assert_eq!(record.status, EmailStatus::Sent);
        assert!(record.sent_at.is_some());

        let payloads = delivery.sent.lock().unwrap();
        assert_eq!(payloads.len(), 1);
        assert_eq!(payloads[0].cc_emails, vec!["admin@example.com"]);
        assert_eq!(payloads[0].client_id, id);
    }

    #[tokio::test]
    async fn placeholder_send_does_not_touch_storage() {
        let kate = client("Kate Moran", "kate@example.com", PipelineStage::LetterPending);
        let id = kate.id;
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id()
            .returning(move |_| Ok(Some(kate.clone())));
        repo.expect_mark_email_sent().times(0);

        let sent = send_draft(&repo, &RecordingDelivery::new(false), outgoing(id, None))
            .await
            .expect("sent");
        assert!(sent.record.is_none());
    }

    #[tokio::test]
    async fn rejected_delivery_leaves_draft_unsent() {
        let kate = client("Kate Moran", "kate@example.com", PipelineStage::LetterPending);
        let id = kate.id;
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id()
            .returning(move |_| Ok(Some(kate.clone())));
        repo.expect_mark_email_sent().times(0);

        let result = send_draft(&repo, &RecordingDelivery::new(true), outgoing(id, Some(EmailId::new()))).await;
        assert!(matches!(
            result,
            Err(ServiceError::Delivery(DeliveryError::Status { status: 502, .. }))
        ));
    }

    #[tokio::test]
    async fn failure_to_mark_sent_still_reports_delivery() {
        let kate = client("Kate Moran", "kate@example.com", PipelineStage::LetterPending);
        let id = kate.id;
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id()
            .returning(move |_| Ok(Some(kate.clone())));
        repo.expect_mark_email_sent()
            .returning(|_, _| Err(RepositoryError::ConnectionError("pool timed out".into())));

        let sent = send_draft(&repo, &RecordingDelivery::new(false), outgoing(id, Some(EmailId::new())))
            .await
            .expect("delivery still succeeds");
        assert!(sent.record.is_none());
    }

    #[test]
    fn compose_stores_rendered_template_with_default_cc() {
        let mut kate = client("Kate Moran", "kate@example.com", PipelineStage::AwaitingData);
        kate.cashcalc_complete = true;
        let id = kate.id;
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id()
            .returning(move |_| Ok(Some(kate.clone())));
        repo.expect_create_email()
            .withf(|new_email| {
                new_email.template_type.as_deref() == Some("chase")
                    && new_email.subject == "Reminder: Outstanding Items - Kate Moran"
                    && new_email.cc_emails == vec!["admin@example.com"]
                    && new_email.status == EmailStatus::Draft
            })
            .times(1)
            .returning(|new_email| {
                Ok(Email {
                    id: new_email.id,
                    client_id: new_email.client_id,
                    template_type: new_email.template_type.clone(),
                    subject: new_email.subject.clone(),
                    body: new_email.body.clone(),
                    to_email: new_email.to_email.clone(),
                    cc_emails: new_email.cc_emails.clone(),
                    status: new_email.status,
                    sent_at: None,
                    created_by: None,
                    created_at: new_email.created_at,
                })
            });
        let signature = Signature {
            sender_name: "Fiona McCarthy".to_string(),
            sender_title: "Financial Advisor".to_string(),
        };

        let composed = compose_draft(
            &repo,
            id,
            TemplateType::Chase,
            &signature,
            &["Admin@Example.com".to_string()],
        )
        .expect("composed");

        assert!(composed.draft.is_persisted());
        assert!(composed.draft.body.contains("• Risk profiler questionnaire"));
        assert!(!composed.draft.body.contains("CashCalc fact find completion"));
        assert!(composed.attachments.is_empty());
    }
}
