use diesel::prelude::*;

use crate::changes::{ChangeEvent, Table};
use crate::domain::meeting::{Meeting, NewMeeting};
use crate::domain::types::ClientId;
use crate::models::meeting::{Meeting as DbMeeting, NewMeeting as DbNewMeeting};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, MeetingReader, MeetingWriter};

impl MeetingReader for DieselRepository {
    fn latest_meeting_for_client(&self, client_id: ClientId) -> RepositoryResult<Option<Meeting>> {
        use crate::schema::meetings;

        let mut conn = self.conn()?;

        let meeting = meetings::table
            .filter(meetings::client_id.eq(client_id.to_string()))
            .order(meetings::created_at.desc())
            .select(DbMeeting::as_select())
            .first::<DbMeeting>(&mut conn)
            .optional()?;

        Ok(meeting.map(Meeting::try_from).transpose()?)
    }
}

impl MeetingWriter for DieselRepository {
    fn create_meeting(&self, new_meeting: &NewMeeting) -> RepositoryResult<Meeting> {
        use crate::schema::meetings;

        let mut conn = self.conn()?;

        let insertable: DbNewMeeting = new_meeting.into();
        let meeting = diesel::insert_into(meetings::table)
            .values(&insertable)
            .returning(DbMeeting::as_returning())
            .get_result::<DbMeeting>(&mut conn)?;

        let meeting = Meeting::try_from(meeting)?;
        self.publish(ChangeEvent::inserted(Table::Meetings, meeting.id));
        Ok(meeting)
    }
}
