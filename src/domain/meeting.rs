use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{ClientId, MeetingId, TeamMemberId, text_enum};

text_enum!(
    /// Kind of advisor meeting.
    MeetingType {
        DiscoveryCall => "discovery_call",
        RecommendationCall => "recommendation_call",
        ReviewCall => "review_call",
        General => "general",
    }
);

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Meeting {
    pub id: MeetingId,
    pub client_id: ClientId,
    pub meeting_type: MeetingType,
    pub title: Option<String>,
    pub summary: Option<String>,
    /// Follow-ups captured during the meeting.
    pub action_items: Vec<String>,
    pub advisor_id: Option<TeamMemberId>,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewMeeting {
    pub id: MeetingId,
    pub client_id: ClientId,
    pub meeting_type: MeetingType,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub action_items: Vec<String>,
    pub advisor_id: Option<TeamMemberId>,
    pub created_at: NaiveDateTime,
}

impl NewMeeting {
    #[must_use]
    pub fn new(client_id: ClientId, meeting_type: MeetingType, created_at: NaiveDateTime) -> Self {
        Self {
            id: MeetingId::new(),
            client_id,
            meeting_type,
            title: None,
            summary: None,
            action_items: Vec::new(),
            advisor_id: None,
            created_at,
        }
    }

    #[must_use]
    pub fn with_action_items(mut self, items: Vec<String>) -> Self {
        self.action_items = items;
        self
    }
}
