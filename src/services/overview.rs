//! Read models for the dashboard, lists and client detail.
//!
//! Collections come from the [`DirectorySnapshot`]; per-client detail and
//! the activity feed are read from the repository. Derived flags are
//! evaluated against `today` every time a view is built.

use chrono::NaiveDate;
use log::error;

use crate::directory::{DirectoryEntry, DirectorySnapshot};
use crate::domain::activity::ActivityEntry;
use crate::domain::client::Client;
use crate::domain::team_member::TeamMember;
use crate::domain::types::ClientId;
use crate::dto::client::{ClientProfileView, ClientView};
use crate::dto::dashboard::{DashboardView, PipelineColumn, PipelineView, StageCount};
use crate::repository::{
    ActivityLogReader, ClientReader, DocumentReader, MeetingReader, TeamMemberReader,
};
use crate::services::{ServiceError, ServiceResult};

const LEADS_NEEDING_ACTION_SHOWN: usize = 5;
const RECENT_LEADS_SHOWN: usize = 3;
const MAX_ACTIVITY: i64 = 100;

fn views<'a>(
    entries: impl IntoIterator<Item = &'a DirectoryEntry>,
    today: NaiveDate,
) -> Vec<ClientView> {
    entries
        .into_iter()
        .map(|entry| ClientView::from_entry(entry, today))
        .collect()
}

/// Builds the home page. A failing activity feed degrades to an empty list.
pub fn dashboard<R>(
    repo: &R,
    snapshot: &DirectorySnapshot,
    activity_limit: i64,
    today: NaiveDate,
) -> DashboardView
where
    R: ActivityLogReader + ?Sized,
{
    let activity = recent_activity(repo, activity_limit).unwrap_or_default();

    let stage_counts = snapshot
        .stage_counts()
        .into_iter()
        .map(|(stage, count)| StageCount {
            stage: stage.descriptor(),
            count,
        })
        .collect();

    let mut needing_action = snapshot.leads_needing_action();
    needing_action.truncate(LEADS_NEEDING_ACTION_SHOWN);

    DashboardView {
        leads_count: snapshot.leads().len(),
        clients_count: snapshot.active_clients().len(),
        action_required_count: snapshot.action_required_count(),
        stage_counts,
        leads_needing_action: views(needing_action, today),
        recent_leads: views(snapshot.recent_leads(RECENT_LEADS_SHOWN), today),
        activity,
        synced_at: snapshot.fetched_at(),
    }
}

/// Kanban board of leads, optionally filtered by `search`.
pub fn pipeline(snapshot: &DirectorySnapshot, search: Option<&str>, today: NaiveDate) -> PipelineView {
    let term = search.unwrap_or_default();
    let columns = snapshot
        .by_stage()
        .into_iter()
        .map(|(stage, leads)| {
            let leads = views(
                leads.into_iter().filter(|entry| entry.client.matches_search(term)),
                today,
            );
            PipelineColumn {
                stage: stage.descriptor(),
                count: leads.len(),
                leads,
            }
        })
        .collect();
    PipelineView { columns }
}

pub fn list_leads(snapshot: &DirectorySnapshot, search: Option<&str>, today: NaiveDate) -> Vec<ClientView> {
    views(snapshot.search_leads(search.unwrap_or_default()), today)
}

pub fn list_clients(snapshot: &DirectorySnapshot, search: Option<&str>, today: NaiveDate) -> Vec<ClientView> {
    views(snapshot.search_clients(search.unwrap_or_default()), today)
}

/// Most recent activity, `limit` clamped to `1..=100`.
pub fn recent_activity<R>(repo: &R, limit: i64) -> ServiceResult<Vec<ActivityEntry>>
where
    R: ActivityLogReader + ?Sized,
{
    repo.list_recent_activity(limit.clamp(1, MAX_ACTIVITY))
        .inspect_err(|e| error!("Failed to load activity feed: {e}"))
        .map_err(ServiceError::from)
}

pub fn list_team_members<R>(repo: &R) -> ServiceResult<Vec<TeamMember>>
where
    R: TeamMemberReader + ?Sized,
{
    repo.list_active_team_members()
        .inspect_err(|e| error!("Failed to load team members: {e}"))
        .map_err(ServiceError::from)
}

/// View of a client just returned by a write, with its advisor looked up.
/// A failed lookup leaves the advisor empty.
pub fn client_view<R>(repo: &R, client: Client, today: NaiveDate) -> ClientView
where
    R: TeamMemberReader + ?Sized,
{
    let advisor = client.assigned_advisor_id.and_then(|advisor_id| {
        repo.get_team_member_by_id(advisor_id)
            .inspect_err(|e| error!("Failed to load advisor {advisor_id}: {e}"))
            .ok()
            .flatten()
    });
    ClientView::new(client, advisor, today)
}

/// Client detail: advisor, latest meeting, documents and history. Missing
/// meetings or documents are empty states.
pub fn client_profile<R>(repo: &R, client_id: ClientId, today: NaiveDate) -> ServiceResult<ClientProfileView>
where
    R: ClientReader + TeamMemberReader + MeetingReader + DocumentReader + ActivityLogReader + ?Sized,
{
    let client = repo
        .get_client_by_id(client_id)
        .inspect_err(|e| error!("Failed to load client {client_id}: {e}"))?
        .ok_or(ServiceError::NotFound)?;

    let advisor = match client.assigned_advisor_id {
        Some(advisor_id) => repo.get_team_member_by_id(advisor_id)?,
        None => None,
    };
    let latest_meeting = repo.latest_meeting_for_client(client_id)?;
    let documents = repo.list_client_documents(client_id)?;
    let activity = repo.list_client_activity(client_id)?;

    Ok(ClientProfileView {
        client: ClientView::new(client, advisor, today),
        latest_meeting,
        documents,
        activity,
    })
}
