use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::client::{
    Client as DomainClient, NewClient as DomainNewClient, UpdateClient as DomainUpdateClient,
};
use crate::domain::types::{
    ClientId, DocCount, EmailAddress, PersonName, TeamMemberId, TypeConstraintError,
};
use crate::models::{decode_text_list, encode_text_list};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::clients)]
/// Diesel model for [`crate::domain::client::Client`].
pub struct Client {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub status: String,
    pub stage: String,
    pub assigned_advisor_id: Option<String>,
    pub products: String,
    pub source: Option<String>,
    pub cashcalc_complete: bool,
    pub cashcalc_completed_at: Option<NaiveDateTime>,
    pub typeform_complete: bool,
    pub typeform_completed_at: Option<NaiveDateTime>,
    pub docs_required: i32,
    pub docs_received: i32,
    pub client_since: Option<NaiveDate>,
    pub review_due_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::clients)]
/// Insertable form of [`Client`].
pub struct NewClient<'a> {
    pub id: String,
    pub full_name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub status: &'static str,
    pub stage: &'static str,
    pub assigned_advisor_id: Option<String>,
    pub products: String,
    pub source: Option<&'a str>,
    pub docs_required: i32,
    pub review_due_date: Option<NaiveDate>,
    pub notes: Option<&'a str>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::clients)]
/// Data used when updating a [`Client`] record.
pub struct UpdateClient<'a> {
    pub status: Option<&'static str>,
    pub stage: Option<&'static str>,
    pub client_since: Option<Option<NaiveDate>>,
    pub assigned_advisor_id: Option<Option<String>>,
    pub review_due_date: Option<Option<NaiveDate>>,
    pub notes: Option<Option<&'a str>>,
    pub products: Option<String>,
    pub cashcalc_complete: Option<bool>,
    pub cashcalc_completed_at: Option<Option<NaiveDateTime>>,
    pub typeform_complete: Option<bool>,
    pub typeform_completed_at: Option<Option<NaiveDateTime>>,
    pub docs_required: Option<i32>,
    pub docs_received: Option<i32>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Client> for DomainClient {
    type Error = TypeConstraintError;

    fn try_from(client: Client) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ClientId::parse(&client.id)?,
            full_name: PersonName::new(client.full_name)?,
            email: EmailAddress::new(client.email)?,
            phone: client.phone.filter(|p| !p.trim().is_empty()),
            status: client.status.parse()?,
            stage: client.stage.parse()?,
            assigned_advisor_id: client
                .assigned_advisor_id
                .as_deref()
                .map(TeamMemberId::parse)
                .transpose()?,
            products: decode_text_list(&client.products)?,
            source: client.source,
            cashcalc_complete: client.cashcalc_complete,
            cashcalc_completed_at: client.cashcalc_completed_at,
            typeform_complete: client.typeform_complete,
            typeform_completed_at: client.typeform_completed_at,
            docs_required: DocCount::new(client.docs_required)?,
            docs_received: DocCount::new(client.docs_received)?,
            client_since: client.client_since,
            review_due_date: client.review_due_date,
            notes: client.notes,
            created_at: client.created_at,
            updated_at: client.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewClient> for NewClient<'a> {
    fn from(client: &'a DomainNewClient) -> Self {
        Self {
            id: client.id.to_string(),
            full_name: client.full_name.as_str(),
            email: client.email.as_str(),
            phone: client.phone.as_deref(),
            status: client.status.as_str(),
            stage: client.stage.as_str(),
            assigned_advisor_id: client.assigned_advisor_id.map(|id| id.to_string()),
            products: encode_text_list(&client.products),
            source: client.source.as_deref(),
            docs_required: client.docs_required.get(),
            review_due_date: client.review_due_date,
            notes: client.notes.as_deref(),
            created_at: client.created_at,
            updated_at: client.created_at,
        }
    }
}

impl<'a> UpdateClient<'a> {
    /// Builds the changeset stamping `updated_at` with `now`.
    pub fn from_domain(update: &'a DomainUpdateClient, now: NaiveDateTime) -> Self {
        Self {
            status: update.status.map(|status| status.as_str()),
            stage: update.stage.map(|stage| stage.as_str()),
            client_since: update.client_since,
            assigned_advisor_id: update
                .assigned_advisor_id
                .map(|advisor| advisor.map(|id| id.to_string())),
            review_due_date: update.review_due_date,
            notes: update.notes.as_ref().map(|notes| notes.as_deref()),
            products: update.products.as_deref().map(encode_text_list),
            cashcalc_complete: update.cashcalc_complete,
            cashcalc_completed_at: update.cashcalc_completed_at,
            typeform_complete: update.typeform_complete,
            typeform_completed_at: update.typeform_completed_at,
            docs_required: update.docs_required.map(DocCount::get),
            docs_received: update.docs_received.map(DocCount::get),
            updated_at: now,
        }
    }
}
