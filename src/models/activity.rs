//! Diesel models for the activity log.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::activity::{
    ActivityKind, ActivityLog as DomainActivityLog, NewActivityLog as DomainNewActivityLog,
};
use crate::domain::types::{ActivityLogId, ClientId, TeamMemberId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::activity_log)]
pub struct ActivityLog {
    pub id: String,
    pub client_id: Option<String>,
    pub action: String,
    pub details: Option<String>,
    pub performed_by: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::activity_log)]
pub struct NewActivityLog<'a> {
    pub id: String,
    pub client_id: Option<String>,
    pub action: String,
    pub details: Option<&'a str>,
    pub performed_by: Option<String>,
    pub created_at: NaiveDateTime,
}

impl TryFrom<ActivityLog> for DomainActivityLog {
    type Error = TypeConstraintError;

    fn try_from(log: ActivityLog) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ActivityLogId::parse(&log.id)?,
            client_id: log.client_id.as_deref().map(ClientId::parse).transpose()?,
            action: ActivityKind::from(log.action),
            details: log.details,
            performed_by: log
                .performed_by
                .as_deref()
                .map(TeamMemberId::parse)
                .transpose()?,
            created_at: log.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewActivityLog> for NewActivityLog<'a> {
    fn from(log: &'a DomainNewActivityLog) -> Self {
        Self {
            id: log.id.to_string(),
            client_id: log.client_id.map(|id| id.to_string()),
            action: log.action.to_string(),
            details: log.details.as_deref(),
            performed_by: log.performed_by.map(|id| id.to_string()),
            created_at: log.created_at,
        }
    }
}
