//! Repository implementation for the activity log.

use diesel::prelude::*;

use crate::changes::{ChangeEvent, Table};
use crate::domain::activity::{ActivityEntry, ActivityLog, NewActivityLog};
use crate::domain::client::Client;
use crate::domain::team_member::TeamMember;
use crate::domain::types::ClientId;
use crate::models::activity::{ActivityLog as DbActivityLog, NewActivityLog as DbNewActivityLog};
use crate::models::client::Client as DbClient;
use crate::models::team_member::TeamMember as DbTeamMember;
use crate::repository::errors::RepositoryResult;
use crate::repository::{ActivityLogReader, ActivityLogWriter, DieselRepository};

impl ActivityLogReader for DieselRepository {
    fn list_recent_activity(&self, limit: i64) -> RepositoryResult<Vec<ActivityEntry>> {
        use crate::schema::{activity_log, clients, team_members};

        let mut conn = self.conn()?;

        let rows = activity_log::table
            .left_join(clients::table.on(activity_log::client_id.eq(clients::id.nullable())))
            .left_join(
                team_members::table
                    .on(activity_log::performed_by.eq(team_members::id.nullable())),
            )
            .order(activity_log::created_at.desc())
            .limit(limit.max(0))
            .select((
                DbActivityLog::as_select(),
                Option::<DbClient>::as_select(),
                Option::<DbTeamMember>::as_select(),
            ))
            .load::<(DbActivityLog, Option<DbClient>, Option<DbTeamMember>)>(&mut conn)?;

        let mut entries = Vec::with_capacity(rows.len());
        for (log, client, performer) in rows {
            entries.push(ActivityEntry {
                log: ActivityLog::try_from(log)?,
                client: client.map(Client::try_from).transpose()?,
                performer: performer.map(TeamMember::try_from).transpose()?,
            });
        }
        Ok(entries)
    }

    fn list_client_activity(&self, client_id: ClientId) -> RepositoryResult<Vec<ActivityLog>> {
        use crate::schema::activity_log;

        let mut conn = self.conn()?;

        let logs = activity_log::table
            .filter(activity_log::client_id.eq(client_id.to_string()))
            .order(activity_log::created_at.asc())
            .select(DbActivityLog::as_select())
            .load::<DbActivityLog>(&mut conn)?;

        Ok(logs
            .into_iter()
            .map(ActivityLog::try_from)
            .collect::<Result<Vec<_>, _>>()?)
    }
}

impl ActivityLogWriter for DieselRepository {
    fn append_activity(&self, entry: &NewActivityLog) -> RepositoryResult<ActivityLog> {
        use crate::schema::activity_log;

        let mut conn = self.conn()?;

        let insertable: DbNewActivityLog = entry.into();
        let log = diesel::insert_into(activity_log::table)
            .values(&insertable)
            .returning(DbActivityLog::as_returning())
            .get_result::<DbActivityLog>(&mut conn)?;

        let log = ActivityLog::try_from(log)?;
        self.publish(ChangeEvent::inserted(Table::ActivityLog, log.id));
        Ok(log)
    }
}
