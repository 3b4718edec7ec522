//! Diesel models for email drafts.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::email::{Email as DomainEmail, NewEmail as DomainNewEmail};
use crate::domain::types::{ClientId, EmailId, TeamMemberId, TypeConstraintError};
use crate::models::{decode_text_list, encode_text_list};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::emails)]
pub struct Email {
    pub id: String,
    pub client_id: String,
    pub template_type: Option<String>,
    pub subject: String,
    pub body: String,
    pub to_email: String,
    pub cc_emails: String, // JSON array text
    pub status: String,
    pub sent_at: Option<NaiveDateTime>,
    pub created_by: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::emails)]
pub struct NewEmail<'a> {
    pub id: String,
    pub client_id: String,
    pub template_type: Option<&'a str>,
    pub subject: &'a str,
    pub body: &'a str,
    pub to_email: &'a str,
    pub cc_emails: String,
    pub status: &'static str,
    pub created_by: Option<String>,
    pub created_at: NaiveDateTime,
}

impl TryFrom<Email> for DomainEmail {
    type Error = TypeConstraintError;

    fn try_from(email: Email) -> Result<Self, Self::Error> {
        Ok(Self {
            id: EmailId::parse(&email.id)?,
            client_id: ClientId::parse(&email.client_id)?,
            template_type: email.template_type,
            subject: email.subject,
            body: email.body,
            to_email: email.to_email,
            cc_emails: decode_text_list(&email.cc_emails)?,
            status: email.status.parse()?,
            sent_at: email.sent_at,
            created_by: email
                .created_by
                .as_deref()
                .map(TeamMemberId::parse)
                .transpose()?,
            created_at: email.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewEmail> for NewEmail<'a> {
    fn from(email: &'a DomainNewEmail) -> Self {
        Self {
            id: email.id.to_string(),
            client_id: email.client_id.to_string(),
            template_type: email.template_type.as_deref(),
            subject: email.subject.as_str(),
            body: email.body.as_str(),
            to_email: email.to_email.as_str(),
            cc_emails: encode_text_list(&email.cc_emails),
            status: email.status.as_str(),
            created_by: email.created_by.map(|id| id.to_string()),
            created_at: email.created_at,
        }
    }
}
