use diesel::prelude::*;

use crate::changes::{ChangeEvent, Table};
use crate::domain::team_member::{NewTeamMember, TeamMember};
use crate::domain::types::TeamMemberId;
use crate::models::team_member::{NewTeamMember as DbNewTeamMember, TeamMember as DbTeamMember};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, TeamMemberReader, TeamMemberWriter};

impl TeamMemberReader for DieselRepository {
    fn get_team_member_by_id(&self, id: TeamMemberId) -> RepositoryResult<Option<TeamMember>> {
        use crate::schema::team_members;

        let mut conn = self.conn()?;

        let member = team_members::table
            .find(id.to_string())
            .select(DbTeamMember::as_select())
            .first::<DbTeamMember>(&mut conn)
            .optional()?;

        Ok(member.map(TeamMember::try_from).transpose()?)
    }

    fn list_active_team_members(&self) -> RepositoryResult<Vec<TeamMember>> {
        use crate::schema::team_members;

        let mut conn = self.conn()?;

        let members = team_members::table
            .filter(team_members::is_active.eq(true))
            .order(team_members::full_name.asc())
            .select(DbTeamMember::as_select())
            .load::<DbTeamMember>(&mut conn)?;

        Ok(members
            .into_iter()
            .map(TeamMember::try_from)
            .collect::<Result<Vec<_>, _>>()?)
    }
}

impl TeamMemberWriter for DieselRepository {
    fn create_team_member(&self, new_member: &NewTeamMember) -> RepositoryResult<TeamMember> {
        use crate::schema::team_members;

        let mut conn = self.conn()?;

        let insertable: DbNewTeamMember = new_member.into();
        let member = diesel::insert_into(team_members::table)
            .values(&insertable)
            .returning(DbTeamMember::as_returning())
            .get_result::<DbTeamMember>(&mut conn)?;

        let member = TeamMember::try_from(member)?;
        self.publish(ChangeEvent::inserted(Table::TeamMembers, member.id));
        Ok(member)
    }
}
