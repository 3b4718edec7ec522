//! Mock repository implementations for isolating services in tests.

use chrono::NaiveDateTime;
use mockall::mock;

use crate::domain::activity::{ActivityEntry, ActivityLog, NewActivityLog};
use crate::domain::client::{Client, NewClient, UpdateClient};
use crate::domain::document::{Document, NewDocument};
use crate::domain::email::{Email, NewEmail};
use crate::domain::meeting::{Meeting, NewMeeting};
use crate::domain::team_member::{NewTeamMember, TeamMember};
use crate::domain::types::{ClientId, EmailId, TeamMemberId};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    ActivityLogReader, ActivityLogWriter, ClientReader, ClientWriter, DocumentReader,
    DocumentWriter, EmailQuery, EmailReader, EmailWriter, MeetingReader, MeetingWriter,
    TeamMemberReader, TeamMemberWriter,
};

mock! {
    pub Repository {}

    impl ClientReader for Repository {
        fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>>;
        fn list_clients_with_advisors(
            &self,
        ) -> RepositoryResult<Vec<(Client, Option<TeamMember>)>>;
    }

    impl ClientWriter for Repository {
        fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client>;
        fn update_client(&self, id: ClientId, updates: &UpdateClient) -> RepositoryResult<Client>;
    }

    impl TeamMemberReader for Repository {
        fn get_team_member_by_id(&self, id: TeamMemberId) -> RepositoryResult<Option<TeamMember>>;
        fn list_active_team_members(&self) -> RepositoryResult<Vec<TeamMember>>;
    }

    impl TeamMemberWriter for Repository {
        fn create_team_member(&self, new_member: &NewTeamMember) -> RepositoryResult<TeamMember>;
    }

    impl ActivityLogReader for Repository {
        fn list_recent_activity(&self, limit: i64) -> RepositoryResult<Vec<ActivityEntry>>;
        fn list_client_activity(&self, client_id: ClientId) -> RepositoryResult<Vec<ActivityLog>>;
    }

    impl ActivityLogWriter for Repository {
        fn append_activity(&self, entry: &NewActivityLog) -> RepositoryResult<ActivityLog>;
    }

    impl EmailReader for Repository {
        fn get_email_by_id(&self, id: EmailId) -> RepositoryResult<Option<Email>>;
        fn find_latest_email(&self, query: &EmailQuery) -> RepositoryResult<Option<Email>>;
        fn list_client_emails(&self, client_id: ClientId) -> RepositoryResult<Vec<Email>>;
    }

    impl EmailWriter for Repository {
        fn create_email(&self, new_email: &NewEmail) -> RepositoryResult<Email>;
        fn save_email_body(&self, id: EmailId, body: &str) -> RepositoryResult<Email>;
        fn mark_email_sent(&self, id: EmailId, sent_at: NaiveDateTime) -> RepositoryResult<Email>;
    }

    impl MeetingReader for Repository {
        fn latest_meeting_for_client(&self, client_id: ClientId) -> RepositoryResult<Option<Meeting>>;
    }

    impl MeetingWriter for Repository {
        fn create_meeting(&self, new_meeting: &NewMeeting) -> RepositoryResult<Meeting>;
    }

    impl DocumentReader for Repository {
        fn list_client_documents(&self, client_id: ClientId) -> RepositoryResult<Vec<Document>>;
    }

    impl DocumentWriter for Repository {
        fn create_document(&self, new_document: &NewDocument) -> RepositoryResult<Document>;
    }
}
