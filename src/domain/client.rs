//! Leads and clients along with the rules derived from their state.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::stage::PipelineStage;
use crate::domain::types::{
    ClientId, DocCount, EmailAddress, PersonName, TeamMemberId, TypeConstraintError,
};

/// Lifecycle status of a client record.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ClientStatus {
    Lead,
    /// Some deployments stored this as `client`; both forms are accepted on read.
    #[serde(alias = "client")]
    ActiveClient,
    Inactive,
}

impl ClientStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            ClientStatus::Lead => "lead",
            ClientStatus::ActiveClient => "active_client",
            ClientStatus::Inactive => "inactive",
        }
    }
}

impl Display for ClientStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ClientStatus {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lead" => Ok(ClientStatus::Lead),
            "active_client" | "client" => Ok(ClientStatus::ActiveClient),
            "inactive" => Ok(ClientStatus::Inactive),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown client status `{other}`"
            ))),
        }
    }
}

/// Text shown next to a lead that needs advisor attention.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub enum IssueReason {
    #[serde(rename = "CashCalc pending")]
    CashCalcPending,
    #[serde(rename = "Risk profiler pending")]
    RiskProfilerPending,
    #[serde(rename = "Signature pending")]
    SignaturePending,
}

impl IssueReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            IssueReason::CashCalcPending => "CashCalc pending",
            IssueReason::RiskProfilerPending => "Risk profiler pending",
            IssueReason::SignaturePending => "Signature pending",
        }
    }
}

impl Display for IssueReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outstanding data-collection badges shown on pipeline cards.
#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, Eq)]
pub struct DataBadges {
    pub cashcalc: bool,
    pub risk_profiler: bool,
    pub documents: bool,
}

impl DataBadges {
    pub fn any(&self) -> bool {
        self.cashcalc || self.risk_profiler || self.documents
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Client {
    pub id: ClientId,
    pub full_name: PersonName,
    pub email: EmailAddress,
    pub phone: Option<String>,
    pub status: ClientStatus,
    /// Only surfaced while `status` is [`ClientStatus::Lead`].
    pub stage: PipelineStage,
    pub assigned_advisor_id: Option<TeamMemberId>,
    /// Display order is insertion order.
    pub products: Vec<String>,
    pub source: Option<String>,
    pub cashcalc_complete: bool,
    pub cashcalc_completed_at: Option<NaiveDateTime>,
    pub typeform_complete: bool,
    pub typeform_completed_at: Option<NaiveDateTime>,
    pub docs_required: DocCount,
    pub docs_received: DocCount,
    pub client_since: Option<NaiveDate>,
    pub review_due_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Client {
    pub fn is_lead(&self) -> bool {
        self.status == ClientStatus::Lead
    }

    pub fn is_active_client(&self) -> bool {
        self.status == ClientStatus::ActiveClient
    }

    /// Whether the periodic review is due on or before `today`.
    pub fn is_review_due(&self, today: NaiveDate) -> bool {
        self.review_due_date.is_some_and(|due| due <= today)
    }

    /// [`Client::is_review_due`] evaluated against the current UTC date.
    pub fn is_review_due_now(&self) -> bool {
        self.is_review_due(Utc::now().date_naive())
    }

    pub fn docs_outstanding(&self) -> bool {
        self.docs_received < self.docs_required
    }

    /// Number of documents still expected, zero when over-delivered.
    pub fn outstanding_docs(&self) -> i32 {
        (self.docs_required.get() - self.docs_received.get()).max(0)
    }

    /// Both questionnaires done and every required document received.
    pub fn data_complete(&self) -> bool {
        self.cashcalc_complete && self.typeform_complete && !self.docs_outstanding()
    }

    /// Leads in `new_booking` get a grace period on the questionnaires;
    /// `awaiting_signature` always needs attention.
    pub fn action_required(&self) -> bool {
        let questionnaires_missing = !self.cashcalc_complete || !self.typeform_complete;
        (questionnaires_missing && self.stage != PipelineStage::NewBooking)
            || self.stage == PipelineStage::AwaitingSignature
    }

    /// First outstanding item in priority order. Only meaningful when
    /// [`Client::action_required`] holds.
    pub fn issue_reason(&self) -> IssueReason {
        if !self.cashcalc_complete {
            IssueReason::CashCalcPending
        } else if !self.typeform_complete {
            IssueReason::RiskProfilerPending
        } else {
            IssueReason::SignaturePending
        }
    }

    pub fn needs_data_badges(&self) -> DataBadges {
        let past_booking = self.stage != PipelineStage::NewBooking;
        DataBadges {
            cashcalc: !self.cashcalc_complete && past_booking,
            risk_profiler: !self.typeform_complete && past_booking,
            documents: self.docs_outstanding() && self.docs_required.get() > 0,
        }
    }

    /// Case-insensitive substring match on name, email and products.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.full_name.to_lowercase().contains(&term)
            || self.email.as_str().contains(&term)
            || self
                .products
                .iter()
                .any(|product| product.to_lowercase().contains(&term))
    }
}

/// Data required to register a new lead.
#[derive(Clone, Debug, Deserialize)]
pub struct NewClient {
    pub id: ClientId,
    pub full_name: PersonName,
    pub email: EmailAddress,
    pub phone: Option<String>,
    pub status: ClientStatus,
    pub stage: PipelineStage,
    pub assigned_advisor_id: Option<TeamMemberId>,
    pub products: Vec<String>,
    pub source: Option<String>,
    pub docs_required: DocCount,
    pub review_due_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

impl NewClient {
    /// Creates a lead in the `new_booking` stage.
    #[must_use]
    pub fn lead(full_name: PersonName, email: EmailAddress) -> Self {
        Self {
            id: ClientId::new(),
            full_name,
            email,
            phone: None,
            status: ClientStatus::Lead,
            stage: PipelineStage::NewBooking,
            assigned_advisor_id: None,
            products: Vec::new(),
            source: None,
            docs_required: DocCount::default(),
            review_due_date: None,
            notes: None,
            created_at: Utc::now().naive_utc(),
        }
    }

    pub fn try_lead(full_name: &str, email: &str) -> Result<Self, TypeConstraintError> {
        Ok(Self::lead(PersonName::new(full_name)?, EmailAddress::new(email)?))
    }

    #[must_use]
    pub fn with_stage(mut self, stage: PipelineStage) -> Self {
        self.stage = stage;
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: ClientStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_products(mut self, products: Vec<String>) -> Self {
        self.products = products
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        self
    }

    #[must_use]
    pub fn with_advisor(mut self, advisor: TeamMemberId) -> Self {
        self.assigned_advisor_id = Some(advisor);
        self
    }

    #[must_use]
    pub fn with_docs_required(mut self, docs_required: DocCount) -> Self {
        self.docs_required = docs_required;
        self
    }

    #[must_use]
    pub fn created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = created_at;
        self
    }
}

/// Partial update of a client record. `None` leaves a column untouched; the
/// nested `Option` of nullable columns distinguishes "clear" from "skip".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateClient {
    pub status: Option<ClientStatus>,
    pub stage: Option<PipelineStage>,
    pub client_since: Option<Option<NaiveDate>>,
    pub assigned_advisor_id: Option<Option<TeamMemberId>>,
    pub review_due_date: Option<Option<NaiveDate>>,
    pub notes: Option<Option<String>>,
    pub products: Option<Vec<String>>,
    pub cashcalc_complete: Option<bool>,
    pub cashcalc_completed_at: Option<Option<NaiveDateTime>>,
    pub typeform_complete: Option<bool>,
    pub typeform_completed_at: Option<Option<NaiveDateTime>>,
    pub docs_required: Option<DocCount>,
    pub docs_received: Option<DocCount>,
}

impl UpdateClient {
    pub fn stage(stage: PipelineStage) -> Self {
        Self {
            stage: Some(stage),
            ..Self::default()
        }
    }

    /// Converts a lead into an active client starting on `since`.
    pub fn mark_as_client(since: NaiveDate) -> Self {
        Self {
            status: Some(ClientStatus::ActiveClient),
            client_since: Some(Some(since)),
            ..Self::default()
        }
    }

    /// Reverts a client to a lead and clears the conversion date.
    pub fn mark_as_lead() -> Self {
        Self {
            status: Some(ClientStatus::Lead),
            client_since: Some(None),
            ..Self::default()
        }
    }

    /// Sets the CashCalc flag along with its completion timestamp.
    #[must_use]
    pub fn cashcalc(mut self, complete: bool, now: NaiveDateTime) -> Self {
        self.cashcalc_complete = Some(complete);
        self.cashcalc_completed_at = Some(complete.then_some(now));
        self
    }

    /// Sets the risk profiler flag along with its completion timestamp.
    #[must_use]
    pub fn typeform(mut self, complete: bool, now: NaiveDateTime) -> Self {
        self.typeform_complete = Some(complete);
        self.typeform_completed_at = Some(complete.then_some(now));
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
