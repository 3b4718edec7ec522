use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::activity::ActivityEntry;
use crate::domain::stage::StageDescriptor;
use crate::dto::client::ClientView;

#[derive(Debug, Serialize)]
pub struct StageCount {
    #[serde(flatten)]
    pub stage: StageDescriptor,
    pub count: usize,
}

/// Home page summary.
#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub leads_count: usize,
    pub clients_count: usize,
    pub action_required_count: usize,
    pub stage_counts: Vec<StageCount>,
    pub leads_needing_action: Vec<ClientView>,
    pub recent_leads: Vec<ClientView>,
    pub activity: Vec<ActivityEntry>,
    /// When the directory last loaded successfully.
    pub synced_at: Option<NaiveDateTime>,
}

/// One kanban column.
#[derive(Debug, Serialize)]
pub struct PipelineColumn {
    #[serde(flatten)]
    pub stage: StageDescriptor,
    pub count: usize,
    pub leads: Vec<ClientView>,
}

#[derive(Debug, Serialize)]
pub struct PipelineView {
    pub columns: Vec<PipelineColumn>,
}
