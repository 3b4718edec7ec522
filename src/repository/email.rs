//! Repository implementation for email drafts and sent messages.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sql_types::{Nullable, Text};

use crate::changes::{ChangeEvent, Table};
use crate::domain::email::{Email, EmailStatus, NewEmail};
use crate::domain::types::{ClientId, EmailId};
use crate::models::email::{Email as DbEmail, NewEmail as DbNewEmail};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, EmailQuery, EmailReader, EmailWriter};

define_sql_function!(fn lower(x: Nullable<Text>) -> Nullable<Text>);

impl EmailReader for DieselRepository {
    fn get_email_by_id(&self, id: EmailId) -> RepositoryResult<Option<Email>> {
        use crate::schema::emails;

        let mut conn = self.conn()?;

        let email = emails::table
            .find(id.to_string())
            .select(DbEmail::as_select())
            .first::<DbEmail>(&mut conn)
            .optional()?;

        Ok(email.map(Email::try_from).transpose()?)
    }

    fn find_latest_email(&self, query: &EmailQuery) -> RepositoryResult<Option<Email>> {
        use crate::schema::emails;

        let mut conn = self.conn()?;

        let mut statement = emails::table
            .filter(emails::client_id.eq(query.client_id.to_string()))
            .into_boxed();

        if let Some(template_type) = &query.template_type {
            statement =
                statement.filter(lower(emails::template_type).eq(template_type.trim().to_lowercase()));
        }
        if let Some(status) = query.status {
            statement = statement.filter(emails::status.eq(status.as_str()));
        }

        let email = statement
            .order(emails::created_at.desc())
            .select(DbEmail::as_select())
            .first::<DbEmail>(&mut conn)
            .optional()?;

        Ok(email.map(Email::try_from).transpose()?)
    }

    fn list_client_emails(&self, client_id: ClientId) -> RepositoryResult<Vec<Email>> {
        use crate::schema::emails;

        let mut conn = self.conn()?;

        let emails = emails::table
            .filter(emails::client_id.eq(client_id.to_string()))
            .order(emails::created_at.desc())
            .select(DbEmail::as_select())
            .load::<DbEmail>(&mut conn)?;

        Ok(emails
            .into_iter()
            .map(Email::try_from)
            .collect::<Result<Vec<_>, _>>()?)
    }
}

impl EmailWriter for DieselRepository {
    fn create_email(&self, new_email: &NewEmail) -> RepositoryResult<Email> {
        use crate::schema::emails;

        let mut conn = self.conn()?;

        let insertable: DbNewEmail = new_email.into();
        let email = diesel::insert_into(emails::table)
            .values(&insertable)
            .returning(DbEmail::as_returning())
            .get_result::<DbEmail>(&mut conn)?;

        let email = Email::try_from(email)?;
        self.publish(ChangeEvent::inserted(Table::Emails, email.id));
        Ok(email)
    }

    fn save_email_body(&self, id: EmailId, body: &str) -> RepositoryResult<Email> {
        use crate::schema::emails;

        let mut conn = self.conn()?;

        let email = diesel::update(emails::table.find(id.to_string()))
            .set(emails::body.eq(body))
            .returning(DbEmail::as_returning())
            .get_result::<DbEmail>(&mut conn)?;

        let email = Email::try_from(email)?;
        self.publish(ChangeEvent::updated(Table::Emails, email.id));
        Ok(email)
    }

    fn mark_email_sent(&self, id: EmailId, sent_at: NaiveDateTime) -> RepositoryResult<Email> {
        use crate::schema::emails;

        let mut conn = self.conn()?;

        let email = diesel::update(emails::table.find(id.to_string()))
            .set((
                emails::status.eq(EmailStatus::Sent.as_str()),
                emails::sent_at.eq(Some(sent_at)),
            ))
            .returning(DbEmail::as_returning())
            .get_result::<DbEmail>(&mut conn)?;

        let email = Email::try_from(email)?;
        self.publish(ChangeEvent::updated(Table::Emails, email.id));
        Ok(email)
    }
}
