//! Repository implementation for clients and leads.

use chrono::Utc;
use diesel::prelude::*;
use log::warn;

use crate::changes::{ChangeEvent, Table};
use crate::domain::client::{Client, NewClient, UpdateClient};
use crate::domain::team_member::TeamMember;
use crate::domain::types::ClientId;
use crate::models::client::{
    Client as DbClient, NewClient as DbNewClient, UpdateClient as DbUpdateClient,
};
use crate::models::team_member::TeamMember as DbTeamMember;
use crate::repository::errors::RepositoryResult;
use crate::repository::{ClientReader, ClientWriter, DieselRepository};

impl ClientReader for DieselRepository {
    fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>> {
        use crate::schema::clients;

        let mut conn = self.conn()?;

        let client = clients::table
            .find(id.to_string())
            .select(DbClient::as_select())
            .first::<DbClient>(&mut conn)
            .optional()?;

        Ok(client.map(Client::try_from).transpose()?)
    }

    fn list_clients_with_advisors(&self) -> RepositoryResult<Vec<(Client, Option<TeamMember>)>> {
        use crate::schema::{clients, team_members};

        let mut conn = self.conn()?;

        let rows = clients::table
            .left_join(
                team_members::table
                    .on(clients::assigned_advisor_id.eq(team_members::id.nullable())),
            )
            .order(clients::created_at.desc())
            .select((DbClient::as_select(), Option::<DbTeamMember>::as_select()))
            .load::<(DbClient, Option<DbTeamMember>)>(&mut conn)?;

        let mut result = Vec::with_capacity(rows.len());
        for (db_client, db_advisor) in rows {
            let client_id = db_client.id.clone();
            let client = match Client::try_from(db_client) {
                Ok(client) => client,
                Err(e) => {
                    warn!("Skipping unreadable client row {client_id}: {e}");
                    continue;
                }
            };
            let advisor = db_advisor.and_then(|advisor| {
                let advisor_id = advisor.id.clone();
                TeamMember::try_from(advisor)
                    .inspect_err(|e| warn!("Ignoring unreadable advisor row {advisor_id}: {e}"))
                    .ok()
            });
            result.push((client, advisor));
        }
        Ok(result)
    }
}

impl ClientWriter for DieselRepository {
    fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client> {
        use crate::schema::clients;

        let mut conn = self.conn()?;

        let insertable: DbNewClient = new_client.into();
        let db_client = diesel::insert_into(clients::table)
            .values(&insertable)
            .returning(DbClient::as_returning())
            .get_result::<DbClient>(&mut conn)?;

        let client = Client::try_from(db_client)?;
        self.publish(ChangeEvent::inserted(Table::Clients, client.id));
        Ok(client)
    }

    fn update_client(&self, id: ClientId, updates: &UpdateClient) -> RepositoryResult<Client> {
        use crate::schema::clients;

        let mut conn = self.conn()?;

        let changeset = DbUpdateClient::from_domain(updates, Utc::now().naive_utc());
        let db_client = diesel::update(clients::table.find(id.to_string()))
            .set(&changeset)
            .returning(DbClient::as_returning())
            .get_result::<DbClient>(&mut conn)?;

        let client = Client::try_from(db_client)?;
        self.publish(ChangeEvent::updated(Table::Clients, client.id));
        Ok(client)
    }
}
