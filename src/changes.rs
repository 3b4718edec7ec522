//! In-process change notifications emitted after repository writes.
//!
//! Every successful insert or update performed by
//! [`crate::repository::DieselRepository`] is published on a [`ChangeFeed`].
//! Subscribers such as the [`crate::directory::ClientDirectory`] react to the
//! events; publishing never blocks and silently drops events when nobody is
//! listening.

use std::fmt::{Display, Formatter};

use log::debug;
use serde::Serialize;
use tokio::sync::broadcast;

const DEFAULT_CAPACITY: usize = 256;

/// Table a change was applied to.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Clients,
    ActivityLog,
    Emails,
    Meetings,
    Documents,
    TeamMembers,
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// A single row-level mutation.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ChangeEvent {
    pub table: Table,
    pub kind: ChangeKind,
    pub record_id: String,
}

impl ChangeEvent {
    pub fn new(table: Table, kind: ChangeKind, record_id: impl Display) -> Self {
        Self {
            table,
            kind,
            record_id: record_id.to_string(),
        }
    }

    pub fn inserted(table: Table, record_id: impl Display) -> Self {
        Self::new(table, ChangeKind::Insert, record_id)
    }

    pub fn updated(table: Table, record_id: impl Display) -> Self {
        Self::new(table, ChangeKind::Update, record_id)
    }
}

impl Display for ChangeEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} {:?} {}", self.table, self.kind, self.record_id)
    }
}

/// Broadcast channel of [`ChangeEvent`]s. Cloning shares the channel.
#[derive(Clone, Debug)]
pub struct ChangeFeed {
    sender: broadcast::Sender<ChangeEvent>,
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }

    /// Publishes `event` to current subscribers.
    pub fn publish(&self, event: ChangeEvent) {
        match self.sender.send(event) {
            Ok(receivers) => debug!("change delivered to {receivers} subscriber(s)"),
            Err(broadcast::error::SendError(event)) => {
                debug!("no subscribers for change {event}")
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
