use chrono::NaiveDate;
use serde::Serialize;

use crate::directory::DirectoryEntry;
use crate::domain::activity::ActivityLog;
use crate::domain::client::{Client, DataBadges, IssueReason};
use crate::domain::document::Document;
use crate::domain::email::EmailDraft;
use crate::domain::meeting::Meeting;
use crate::domain::stage::StageDescriptor;
use crate::domain::team_member::TeamMember;

/// A client with every derived flag evaluated at build time.
#[derive(Debug, Serialize)]
pub struct ClientView {
    #[serde(flatten)]
    pub client: Client,
    pub stage_info: StageDescriptor,
    pub advisor: Option<TeamMember>,
    pub action_required: bool,
    /// Only set while action is required.
    pub issue_reason: Option<IssueReason>,
    pub data_complete: bool,
    pub badges: DataBadges,
    pub outstanding_docs: i32,
    pub review_due: bool,
}

impl ClientView {
    pub fn new(client: Client, advisor: Option<TeamMember>, today: NaiveDate) -> Self {
        let action_required = client.action_required();
        Self {
            stage_info: client.stage.descriptor(),
            action_required,
            issue_reason: action_required.then(|| client.issue_reason()),
            data_complete: client.data_complete(),
            badges: client.needs_data_badges(),
            outstanding_docs: client.outstanding_docs(),
            review_due: client.is_review_due(today),
            advisor,
            client,
        }
    }

    pub fn from_entry(entry: &DirectoryEntry, today: NaiveDate) -> Self {
        Self::new(entry.client.clone(), entry.advisor.clone(), today)
    }
}

/// Everything shown in the client detail view.
#[derive(Debug, Serialize)]
pub struct ClientProfileView {
    pub client: ClientView,
    pub latest_meeting: Option<Meeting>,
    pub documents: Vec<Document>,
    pub activity: Vec<ActivityLog>,
}

/// A resolved draft plus the attachments its template ships with.
#[derive(Debug, Serialize)]
pub struct DraftView {
    #[serde(flatten)]
    pub draft: EmailDraft,
    pub attachments: Vec<String>,
}
