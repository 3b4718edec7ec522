//! Persistence traits and their Diesel implementation.
//!
//! Services are generic over the reader/writer traits declared here so they
//! can be exercised against `MockRepository` in tests and against
//! [`DieselRepository`] in production.

use chrono::NaiveDateTime;

use crate::changes::{ChangeEvent, ChangeFeed};
use crate::db::{DbConnection, DbPool, get_connection};
use crate::domain::activity::{ActivityEntry, ActivityLog, NewActivityLog};
use crate::domain::client::{Client, NewClient, UpdateClient};
use crate::domain::document::{Document, NewDocument};
use crate::domain::email::{Email, EmailStatus, NewEmail};
use crate::domain::meeting::{Meeting, NewMeeting};
use crate::domain::team_member::{NewTeamMember, TeamMember};
use crate::domain::types::{ClientId, EmailId, TeamMemberId};
use crate::repository::errors::RepositoryResult;

pub mod activity;
pub mod client;
pub mod document;
pub mod email;
pub mod errors;
pub mod meeting;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod team_member;

/// Filter used to look up the newest matching email for a client.
///
/// `template_type` is compared case-insensitively.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailQuery {
    pub client_id: ClientId,
    pub template_type: Option<String>,
    pub status: Option<EmailStatus>,
}

impl EmailQuery {
    pub fn new(client_id: ClientId) -> Self {
        Self {
            client_id,
            template_type: None,
            status: None,
        }
    }

    pub fn template_type(mut self, template_type: impl Into<String>) -> Self {
        self.template_type = Some(template_type.into());
        self
    }

    pub fn status(mut self, status: EmailStatus) -> Self {
        self.status = Some(status);
        self
    }
}

pub trait ClientReader {
    fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>>;
    /// Every client, newest first, with its assigned advisor when one exists.
    /// Rows that no longer convert into domain values are skipped.
    fn list_clients_with_advisors(&self) -> RepositoryResult<Vec<(Client, Option<TeamMember>)>>;
}

pub trait ClientWriter {
    fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client>;
    /// Applies `updates`; a missing id yields [`errors::RepositoryError::NotFound`].
    fn update_client(&self, id: ClientId, updates: &UpdateClient) -> RepositoryResult<Client>;
}

pub trait TeamMemberReader {
    fn get_team_member_by_id(&self, id: TeamMemberId) -> RepositoryResult<Option<TeamMember>>;
    fn list_active_team_members(&self) -> RepositoryResult<Vec<TeamMember>>;
}

pub trait TeamMemberWriter {
    fn create_team_member(&self, new_member: &NewTeamMember) -> RepositoryResult<TeamMember>;
}

pub trait ActivityLogReader {
    /// Most recent entries with their client and performer joined.
    fn list_recent_activity(&self, limit: i64) -> RepositoryResult<Vec<ActivityEntry>>;
    /// Entries for one client, oldest first.
    fn list_client_activity(&self, client_id: ClientId) -> RepositoryResult<Vec<ActivityLog>>;
}

pub trait ActivityLogWriter {
    fn append_activity(&self, entry: &NewActivityLog) -> RepositoryResult<ActivityLog>;
}

pub trait EmailReader {
    fn get_email_by_id(&self, id: EmailId) -> RepositoryResult<Option<Email>>;
    fn find_latest_email(&self, query: &EmailQuery) -> RepositoryResult<Option<Email>>;
    fn list_client_emails(&self, client_id: ClientId) -> RepositoryResult<Vec<Email>>;
}

pub trait EmailWriter {
    fn create_email(&self, new_email: &NewEmail) -> RepositoryResult<Email>;
    fn save_email_body(&self, id: EmailId, body: &str) -> RepositoryResult<Email>;
    fn mark_email_sent(&self, id: EmailId, sent_at: NaiveDateTime) -> RepositoryResult<Email>;
}

pub trait MeetingReader {
    fn latest_meeting_for_client(&self, client_id: ClientId) -> RepositoryResult<Option<Meeting>>;
}

pub trait MeetingWriter {
    fn create_meeting(&self, new_meeting: &NewMeeting) -> RepositoryResult<Meeting>;
}

pub trait DocumentReader {
    /// Documents for one client, newest upload first.
    fn list_client_documents(&self, client_id: ClientId) -> RepositoryResult<Vec<Document>>;
}

pub trait DocumentWriter {
    fn create_document(&self, new_document: &NewDocument) -> RepositoryResult<Document>;
}

/// Diesel-backed repository publishing every write on a [`ChangeFeed`].
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
    changes: ChangeFeed,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self::with_changes(pool, ChangeFeed::default())
    }

    pub fn with_changes(pool: DbPool, changes: ChangeFeed) -> Self {
        Self { pool, changes }
    }

    pub fn changes(&self) -> &ChangeFeed {
        &self.changes
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(get_connection(&self.pool)?)
    }

    fn publish(&self, event: ChangeEvent) {
        self.changes.publish(event);
    }
}
