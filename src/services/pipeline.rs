//! Stage transitions and client edits.
//!
//! Every transition writes the client first and then appends an activity log
//! entry. The two writes are not transactional: if the log append fails the
//! client change stays applied and the failure is only logged.

use chrono::Utc;
use log::{error, info};

use crate::domain::activity::NewActivityLog;
use crate::domain::client::{Client, UpdateClient};
use crate::domain::stage::PipelineStage;
use crate::domain::types::ClientId;
use crate::repository::{ActivityLogWriter, ClientWriter};
use crate::services::{ServiceError, ServiceResult};

fn record_activity<R>(repo: &R, entry: NewActivityLog)
where
    R: ActivityLogWriter + ?Sized,
{
    if let Err(e) = repo.append_activity(&entry) {
        error!(
            "Failed to log `{}` for client {:?}: {e}",
            entry.action, entry.client_id
        );
    }
}

/// Moves a client to `stage`. Any stage may follow any other.
pub fn update_stage<R>(repo: &R, client_id: ClientId, stage: PipelineStage) -> ServiceResult<Client>
where
    R: ClientWriter + ActivityLogWriter + ?Sized,
{
    let client = repo
        .update_client(client_id, &UpdateClient::stage(stage))
        .inspect_err(|e| error!("Failed to update stage of client {client_id}: {e}"))?;

    record_activity(repo, NewActivityLog::stage_changed(client_id, stage));
    info!("Client {client_id} moved to {stage}");

    Ok(client)
}

/// Converts a lead into an active client as of today. The stage is kept.
pub fn mark_as_client<R>(repo: &R, client_id: ClientId) -> ServiceResult<Client>
where
    R: ClientWriter + ActivityLogWriter + ?Sized,
{
    let today = Utc::now().date_naive();
    let client = repo
        .update_client(client_id, &UpdateClient::mark_as_client(today))
        .inspect_err(|e| error!("Failed to mark client {client_id} as client: {e}"))?;

    record_activity(repo, NewActivityLog::marked_as_client(client_id));
    info!("Client {client_id} converted to active client");

    Ok(client)
}

/// Reverts a client to a lead and clears `client_since`.
pub fn mark_as_lead<R>(repo: &R, client_id: ClientId) -> ServiceResult<Client>
where
    R: ClientWriter + ActivityLogWriter + ?Sized,
{
    let client = repo
        .update_client(client_id, &UpdateClient::mark_as_lead())
        .inspect_err(|e| error!("Failed to mark client {client_id} as lead: {e}"))?;

    record_activity(repo, NewActivityLog::marked_as_lead(client_id));
    info!("Client {client_id} reverted to lead");

    Ok(client)
}

/// Applies a partial edit. Edits are not recorded in the activity log.
pub fn update_client<R>(repo: &R, client_id: ClientId, updates: &UpdateClient) -> ServiceResult<Client>
where
    R: ClientWriter + ?Sized,
{
    if updates.is_empty() {
        return Err(ServiceError::Form("no changes supplied".to_string()));
    }

    repo.update_client(client_id, updates)
        .inspect_err(|e| error!("Failed to update client {client_id}: {e}"))
        .map_err(ServiceError::from)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::domain::activity::{ActivityKind, ActivityLog};
    use crate::domain::client::ClientStatus;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use crate::test_support::client;

    fn logged(entry: &NewActivityLog) -> ActivityLog {
        ActivityLog {
            id: entry.id,
            client_id: entry.client_id,
            action: entry.action.clone(),
            details: entry.details.clone(),
            performed_by: entry.performed_by,
            created_at: entry.created_at,
        }
    }

    #[test]
    fn update_stage_writes_then_logs() {
        let lead = client("Gráinne Lynch", "grainne@example.com", PipelineStage::NewBooking);
        let id = lead.id;
        let mut repo = MockRepository::new();

        let updated = Client {
            stage: PipelineStage::LetterPending,
            ..lead
        };
        repo.expect_update_client()
            .withf(move |client_id, updates| {
                *client_id == id && updates.stage == Some(PipelineStage::LetterPending)
            })
            .times(1)
            .returning(move |_, _| Ok(updated.clone()));
        repo.expect_append_activity()
            .withf(move |entry| {
                entry.client_id == Some(id)
                    && entry.action == ActivityKind::StageChanged
                    && entry.details.as_deref() == Some("Stage changed to letter_pending")
            })
            .times(1)
            .returning(|entry| Ok(logged(entry)));

        let result = update_stage(&repo, id, PipelineStage::LetterPending).expect("stage updated");
        assert_eq!(result.stage, PipelineStage::LetterPending);
    }

    #[test]
    fn backwards_moves_are_allowed() {
        let lead = client("Hugh Daly", "hugh@example.com", PipelineStage::AwaitingSignature);
        let id = lead.id;
        let mut repo = MockRepository::new();
        repo.expect_update_client().returning(move |_, updates| {
            Ok(Client {
                stage: updates.stage.unwrap_or(lead.stage),
                ..lead.clone()
            })
        });
        repo.expect_append_activity()
            .returning(|entry| Ok(logged(entry)));

        let result = update_stage(&repo, id, PipelineStage::NewBooking).expect("stage updated");
        assert_eq!(result.stage, PipelineStage::NewBooking);
    }

    #[test]
    fn failed_write_skips_the_activity_log() {
        let mut repo = MockRepository::new();
        repo.expect_update_client()
            .returning(|_, _| Err(RepositoryError::NotFound));
        repo.expect_append_activity().times(0);

        let result = update_stage(&repo, ClientId::new(), PipelineStage::AwaitingData);
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn failed_log_append_keeps_the_transition() {
        let lead = client("Iseult Burke", "iseult@example.com", PipelineStage::AwaitingData);
        let id = lead.id;
        let mut repo = MockRepository::new();
        repo.expect_update_client()
            .returning(move |_, _| Ok(lead.clone()));
        repo.expect_append_activity()
            .times(1)
            .returning(|_| Err(RepositoryError::DatabaseError("disk full".into())));

        assert!(update_stage(&repo, id, PipelineStage::AwaitingData).is_ok());
    }

    #[test]
    fn mark_as_client_then_lead_round_trip() {
        let lead = client("Jane Doe", "jane@example.com", PipelineStage::LetterPending);
        let id = lead.id;
        let state = Arc::new(Mutex::new(lead));
        let log = Arc::new(Mutex::new(Vec::<NewActivityLog>::new()));

        let mut repo = MockRepository::new();
        let store = state.clone();
        repo.expect_update_client()
            .times(2)
            .returning(move |_, updates| {
                let mut client = store.lock().unwrap();
                if let Some(status) = updates.status {
                    client.status = status;
                }
                if let Some(since) = updates.client_since {
                    client.client_since = since;
                }
                Ok(client.clone())
            });
        let appended = log.clone();
        repo.expect_append_activity()
            .times(2)
            .returning(move |entry| {
                appended.lock().unwrap().push(entry.clone());
                Ok(logged(entry))
            });

        let converted = mark_as_client(&repo, id).expect("marked as client");
        assert_eq!(converted.status, ClientStatus::ActiveClient);
        assert_eq!(converted.client_since, Some(Utc::now().date_naive()));
        assert_eq!(converted.stage, PipelineStage::LetterPending);

        let reverted = mark_as_lead(&repo, id).expect("marked as lead");
        assert_eq!(reverted.status, ClientStatus::Lead);
        assert_eq!(reverted.client_since, None);

        let entries = log.lock().unwrap();
        let actions: Vec<_> = entries.iter().map(|e| e.action.clone()).collect();
        assert_eq!(
            actions,
            vec![ActivityKind::MarkedAsClient, ActivityKind::MarkedAsLead]
        );
        assert!(entries.iter().all(|e| e.client_id == Some(id)));
    }

    #[test]
    fn empty_update_is_rejected_without_writing() {
        let mut repo = MockRepository::new();
        repo.expect_update_client().times(0);

        let result = update_client(&repo, ClientId::new(), &UpdateClient::default());
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }
}
