//! Fixtures shared by unit tests.

use chrono::{NaiveDateTime, Utc};

use crate::domain::client::{Client, ClientStatus};
use crate::domain::stage::PipelineStage;
use crate::domain::types::{ClientId, DocCount, EmailAddress, PersonName};

pub(crate) fn client(full_name: &str, email: &str, stage: PipelineStage) -> Client {
    let now = Utc::now().naive_utc();
    Client {
        id: ClientId::new(),
        full_name: PersonName::new(full_name).expect("valid name"),
        email: EmailAddress::new(email).expect("valid email"),
        phone: None,
        status: ClientStatus::Lead,
        stage,
        assigned_advisor_id: None,
        products: Vec::new(),
        source: None,
        cashcalc_complete: false,
        cashcalc_completed_at: None,
        typeform_complete: false,
        typeform_completed_at: None,
        docs_required: DocCount::default(),
        docs_received: DocCount::default(),
        client_since: None,
        review_due_date: None,
        notes: None,
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn active_client(full_name: &str, email: &str) -> Client {
    Client {
        status: ClientStatus::ActiveClient,
        client_since: Some(Utc::now().date_naive()),
        ..client(full_name, email, PipelineStage::AwaitingSignature)
    }
}

pub(crate) fn at(timestamp: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S").expect("valid timestamp")
}
