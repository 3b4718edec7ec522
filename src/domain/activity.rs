//! Append-only audit trail of pipeline transitions.

use std::fmt::Display;

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::client::Client;
use crate::domain::stage::PipelineStage;
use crate::domain::team_member::TeamMember;
use crate::domain::types::{ActivityLogId, ClientId, TeamMemberId};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ActivityLog {
    pub id: ActivityLogId,
    pub client_id: Option<ClientId>,
    pub action: ActivityKind,
    pub details: Option<String>,
    pub performed_by: Option<TeamMemberId>,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum ActivityKind {
    StageChanged,
    MarkedAsClient,
    MarkedAsLead,
    Other(String),
}

/// Activity row together with the records it points at.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ActivityEntry {
    pub log: ActivityLog,
    pub client: Option<Client>,
    pub performer: Option<TeamMember>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewActivityLog {
    pub id: ActivityLogId,
    pub client_id: Option<ClientId>,
    pub action: ActivityKind,
    pub details: Option<String>,
    pub performed_by: Option<TeamMemberId>,
    pub created_at: NaiveDateTime,
}

impl NewActivityLog {
    #[must_use]
    pub fn new(action: ActivityKind, client_id: Option<ClientId>, details: Option<String>) -> Self {
        Self {
            id: ActivityLogId::new(),
            client_id,
            action,
            details,
            performed_by: None,
            created_at: Utc::now().naive_utc(),
        }
    }

    pub fn stage_changed(client_id: ClientId, stage: PipelineStage) -> Self {
        Self::new(
            ActivityKind::StageChanged,
            Some(client_id),
            Some(format!("Stage changed to {stage}")),
        )
    }

    pub fn marked_as_client(client_id: ClientId) -> Self {
        Self::new(
            ActivityKind::MarkedAsClient,
            Some(client_id),
            Some("Lead converted to active client".to_string()),
        )
    }

    pub fn marked_as_lead(client_id: ClientId) -> Self {
        Self::new(
            ActivityKind::MarkedAsLead,
            Some(client_id),
            Some("Client reverted to lead".to_string()),
        )
    }

    #[must_use]
    pub fn performed_by(mut self, member: Option<TeamMemberId>) -> Self {
        self.performed_by = member;
        self
    }
}

impl Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityKind::StageChanged => write!(f, "stage_changed"),
            ActivityKind::MarkedAsClient => write!(f, "marked_as_client"),
            ActivityKind::MarkedAsLead => write!(f, "marked_as_lead"),
            ActivityKind::Other(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for ActivityKind {
    fn from(s: &str) -> Self {
        match s {
            "stage_changed" => ActivityKind::StageChanged,
            "marked_as_client" => ActivityKind::MarkedAsClient,
            "marked_as_lead" => ActivityKind::MarkedAsLead,
            _ => ActivityKind::Other(s.to_string()),
        }
    }
}

impl From<String> for ActivityKind {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

impl From<ActivityKind> for String {
    fn from(kind: ActivityKind) -> Self {
        kind.to_string()
    }
}
