//! Diesel models representing advisors.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::team_member::{
    NewTeamMember as DomainNewTeamMember, TeamMember as DomainTeamMember,
};
use crate::domain::types::{EmailAddress, PersonName, TeamMemberId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::team_members)]
/// Diesel model for [`crate::domain::team_member::TeamMember`].
pub struct TeamMember {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::team_members)]
/// Insertable form of [`TeamMember`].
pub struct NewTeamMember<'a> {
    pub id: String,
    pub email: &'a str,
    pub full_name: &'a str,
    pub role: &'a str,
    pub is_active: bool,
}

impl TryFrom<TeamMember> for DomainTeamMember {
    type Error = TypeConstraintError;

    fn try_from(member: TeamMember) -> Result<Self, Self::Error> {
        Ok(Self {
            id: TeamMemberId::parse(&member.id)?,
            email: EmailAddress::new(member.email)?,
            full_name: PersonName::new(member.full_name)?,
            role: member.role,
            is_active: member.is_active,
            created_at: member.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewTeamMember> for NewTeamMember<'a> {
    fn from(member: &'a DomainNewTeamMember) -> Self {
        Self {
            id: member.id.to_string(),
            email: member.email.as_str(),
            full_name: member.full_name.as_str(),
            role: member.role.as_str(),
            is_active: member.is_active,
        }
    }
}
