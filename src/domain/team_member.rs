use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{EmailAddress, PersonName, TeamMemberId};

/// Advisor referenced by clients, meetings and activity rows.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TeamMember {
    pub id: TeamMemberId,
    pub email: EmailAddress,
    pub full_name: PersonName,
    pub role: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewTeamMember {
    pub id: TeamMemberId,
    pub email: EmailAddress,
    pub full_name: PersonName,
    pub role: String,
    pub is_active: bool,
}

impl NewTeamMember {
    #[must_use]
    pub fn advisor(full_name: PersonName, email: EmailAddress) -> Self {
        Self {
            id: TeamMemberId::new(),
            email,
            full_name,
            role: "advisor".to_string(),
            is_active: true,
        }
    }

    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}
