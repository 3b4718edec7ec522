//! Email drafts and sent messages.

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{ClientId, EmailId, TeamMemberId, text_enum};

text_enum!(
    /// Delivery state of an email record.
    EmailStatus {
        Draft => "draft",
        Scheduled => "scheduled",
        Sent => "sent",
        Failed => "failed",
    }
);

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Email {
    pub id: EmailId,
    pub client_id: ClientId,
    /// Free-form category, compared case-insensitively.
    pub template_type: Option<String>,
    pub subject: String,
    pub body: String,
    pub to_email: String,
    pub cc_emails: Vec<String>,
    pub status: EmailStatus,
    pub sent_at: Option<NaiveDateTime>,
    pub created_by: Option<TeamMemberId>,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewEmail {
    pub id: EmailId,
    pub client_id: ClientId,
    pub template_type: Option<String>,
    pub subject: String,
    pub body: String,
    pub to_email: String,
    pub cc_emails: Vec<String>,
    pub status: EmailStatus,
    pub created_by: Option<TeamMemberId>,
    pub created_at: NaiveDateTime,
}

impl NewEmail {
    /// Creates an unsent draft.
    #[must_use]
    pub fn draft(
        client_id: ClientId,
        template_type: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
        to_email: impl Into<String>,
    ) -> Self {
        Self {
            id: EmailId::new(),
            client_id,
            template_type: Some(template_type.into()),
            subject: subject.into(),
            body: body.into(),
            to_email: to_email.into(),
            cc_emails: Vec::new(),
            status: EmailStatus::Draft,
            created_by: None,
            created_at: Utc::now().naive_utc(),
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: EmailStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_cc(mut self, cc_emails: Vec<String>) -> Self {
        self.cc_emails = cc_emails;
        self
    }

    #[must_use]
    pub fn created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = created_at;
        self
    }
}

/// Draft presented for review. `id` is `None` for placeholders that were never
/// persisted.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EmailDraft {
    pub id: Option<EmailId>,
    pub client_id: ClientId,
    pub template_type: String,
    pub subject: String,
    pub body: String,
    pub to_email: String,
    pub cc_emails: Vec<String>,
    pub status: EmailStatus,
    pub sent_at: Option<NaiveDateTime>,
}

impl EmailDraft {
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

impl From<Email> for EmailDraft {
    fn from(email: Email) -> Self {
        Self {
            id: Some(email.id),
            client_id: email.client_id,
            template_type: email.template_type.unwrap_or_default(),
            subject: email.subject,
            body: email.body,
            to_email: email.to_email,
            cc_emails: email.cc_emails,
            status: email.status,
            sent_at: email.sent_at,
        }
    }
}
