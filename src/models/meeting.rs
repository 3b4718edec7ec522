use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::meeting::{Meeting as DomainMeeting, NewMeeting as DomainNewMeeting};
use crate::domain::types::{ClientId, MeetingId, TeamMemberId, TypeConstraintError};
use crate::models::{decode_text_list, encode_text_list};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::meetings)]
pub struct Meeting {
    pub id: String,
    pub client_id: String,
    pub meeting_type: String,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub action_items: Option<String>,
    pub advisor_id: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::meetings)]
pub struct NewMeeting<'a> {
    pub id: String,
    pub client_id: String,
    pub meeting_type: &'static str,
    pub title: Option<&'a str>,
    pub summary: Option<&'a str>,
    pub action_items: Option<String>,
    pub advisor_id: Option<String>,
    pub created_at: NaiveDateTime,
}

impl TryFrom<Meeting> for DomainMeeting {
    type Error = TypeConstraintError;

    fn try_from(meeting: Meeting) -> Result<Self, Self::Error> {
        Ok(Self {
            id: MeetingId::parse(&meeting.id)?,
            client_id: ClientId::parse(&meeting.client_id)?,
            meeting_type: meeting.meeting_type.parse()?,
            title: meeting.title,
            summary: meeting.summary,
            action_items: match meeting.action_items.as_deref() {
                Some(raw) => decode_text_list(raw)?,
                None => Vec::new(),
            },
            advisor_id: meeting
                .advisor_id
                .as_deref()
                .map(TeamMemberId::parse)
                .transpose()?,
            created_at: meeting.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewMeeting> for NewMeeting<'a> {
    fn from(meeting: &'a DomainNewMeeting) -> Self {
        Self {
            id: meeting.id.to_string(),
            client_id: meeting.client_id.to_string(),
            meeting_type: meeting.meeting_type.as_str(),
            title: meeting.title.as_deref(),
            summary: meeting.summary.as_deref(),
            action_items: (!meeting.action_items.is_empty())
                .then(|| encode_text_list(&meeting.action_items)),
            advisor_id: meeting.advisor_id.map(|id| id.to_string()),
            created_at: meeting.created_at,
        }
    }
}
