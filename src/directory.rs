//! Live in-memory view of every client and the collections derived from it.
//!
//! [`ClientDirectory`] is the only writer of the snapshot. It replaces the
//! snapshot after a successful fetch or when a change notification for the
//! `clients` table arrives; mutating services never touch it directly.
//! Readers either take a [`DirectorySnapshot`] or subscribe to a `watch`
//! channel that yields every new snapshot.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};
use log::{debug, error, info, warn};
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::changes::{ChangeEvent, ChangeFeed, ChangeKind, Table};
use crate::domain::client::Client;
use crate::domain::stage::PipelineStage;
use crate::domain::team_member::TeamMember;
use crate::domain::types::ClientId;
use crate::repository::ClientReader;
use crate::repository::errors::RepositoryResult;

/// A client together with its assigned advisor, if any.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct DirectoryEntry {
    pub client: Client,
    pub advisor: Option<TeamMember>,
}

/// Immutable view of the client collection at one point in time.
#[derive(Clone, Debug, Default)]
pub struct DirectorySnapshot {
    entries: Vec<DirectoryEntry>,
    fetched_at: Option<NaiveDateTime>,
}

impl DirectorySnapshot {
    /// Entries are expected newest first.
    pub fn new(entries: Vec<DirectoryEntry>, fetched_at: NaiveDateTime) -> Self {
        Self {
            entries,
            fetched_at: Some(fetched_at),
        }
    }

    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    /// `None` until the first successful fetch.
    pub fn fetched_at(&self) -> Option<NaiveDateTime> {
        self.fetched_at
    }

    pub fn get(&self, id: ClientId) -> Option<&DirectoryEntry> {
        self.entries.iter().find(|entry| entry.client.id == id)
    }

    pub fn leads(&self) -> Vec<&DirectoryEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.client.is_lead())
            .collect()
    }

    pub fn active_clients(&self) -> Vec<&DirectoryEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.client.is_active_client())
            .collect()
    }

    /// Leads grouped by stage. Every stage is present, possibly empty.
    pub fn by_stage(&self) -> BTreeMap<PipelineStage, Vec<&DirectoryEntry>> {
        let mut columns: BTreeMap<PipelineStage, Vec<&DirectoryEntry>> = PipelineStage::ALL
            .into_iter()
            .map(|stage| (stage, Vec::new()))
            .collect();
        for entry in self.leads() {
            columns.entry(entry.client.stage).or_default().push(entry);
        }
        columns
    }

    /// Number of leads per stage; the counts sum to `leads().len()`.
    pub fn stage_counts(&self) -> BTreeMap<PipelineStage, usize> {
        self.by_stage()
            .into_iter()
            .map(|(stage, leads)| (stage, leads.len()))
            .collect()
    }

    pub fn leads_needing_action(&self) -> Vec<&DirectoryEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.client.is_lead() && entry.client.action_required())
            .collect()
    }

    pub fn action_required_count(&self) -> usize {
        self.leads_needing_action().len()
    }

    /// The `limit` most recently updated leads.
    pub fn recent_leads(&self, limit: usize) -> Vec<&DirectoryEntry> {
        let mut leads = self.leads();
        leads.sort_by(|a, b| b.client.updated_at.cmp(&a.client.updated_at));
        leads.truncate(limit);
        leads
    }

    pub fn search_leads(&self, term: &str) -> Vec<&DirectoryEntry> {
        self.leads()
            .into_iter()
            .filter(|entry| entry.client.matches_search(term))
            .collect()
    }

    pub fn search_clients(&self, term: &str) -> Vec<&DirectoryEntry> {
        self.active_clients()
            .into_iter()
            .filter(|entry| entry.client.matches_search(term))
            .collect()
    }
}

/// Single writer of the shared [`DirectorySnapshot`].
pub struct ClientDirectory<R> {
    repo: R,
    state: watch::Sender<Arc<DirectorySnapshot>>,
}

impl<R> ClientDirectory<R>
where
    R: ClientReader,
{
    /// Starts with an empty snapshot; call [`ClientDirectory::refresh`] to load.
    pub fn new(repo: R) -> Self {
        let (state, _) = watch::channel(Arc::new(DirectorySnapshot::default()));
        Self { repo, state }
    }

    /// Refetches every client. On failure the previous snapshot stays current.
    pub fn refresh(&self) -> RepositoryResult<Arc<DirectorySnapshot>> {
        let rows = self.repo.list_clients_with_advisors().inspect_err(|e| {
            error!("Failed to refresh client directory: {e}");
        })?;

        let entries = rows
            .into_iter()
            .map(|(client, advisor)| DirectoryEntry { client, advisor })
            .collect::<Vec<_>>();
        debug!("client directory refreshed with {} entries", entries.len());

        let snapshot = Arc::new(DirectorySnapshot::new(entries, Utc::now().naive_utc()));
        self.state.send_replace(snapshot.clone());
        Ok(snapshot)
    }

    /// Reacts to one change notification. Returns whether a new snapshot was
    /// published.
    pub fn apply(&self, event: &ChangeEvent) -> bool {
        match (event.table, event.kind) {
            (Table::Clients, ChangeKind::Insert | ChangeKind::Update | ChangeKind::Delete) => {
                self.refresh().is_ok()
            }
            _ => false,
        }
    }

    pub fn snapshot(&self) -> Arc<DirectorySnapshot> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<DirectorySnapshot>> {
        self.state.subscribe()
    }
}

/// Feeds change notifications into `directory` on a background task.
///
/// Only a weak reference is held: once the directory is dropped the next
/// notification ends the task. A lagging receiver triggers a full refetch.
pub fn spawn_listener<R>(directory: &Arc<ClientDirectory<R>>, feed: &ChangeFeed) -> JoinHandle<()>
where
    R: ClientReader + Send + Sync + 'static,
{
    let weak = Arc::downgrade(directory);
    let mut receiver = feed.subscribe();

    tokio::spawn(async move {
        loop {
            let event = match receiver.recv().await {
                Ok(event) => Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("client directory missed {skipped} change(s), refetching");
                    None
                }
                Err(RecvError::Closed) => break,
            };

            let Some(directory) = weak.upgrade() else {
                debug!("client directory dropped, stopping listener");
                break;
            };

            let applied = tokio::task::spawn_blocking(move || match event {
                Some(event) => directory.apply(&event),
                None => directory.refresh().is_ok(),
            })
            .await;

            if let Err(e) = applied {
                error!("Client directory update panicked: {e}");
            }
        }
        info!("client directory listener stopped");
    })
}
