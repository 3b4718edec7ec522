use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use validator::Validate;

use crate::domain::client::UpdateClient;
use crate::domain::stage::PipelineStage;
use crate::domain::types::{DocCount, TeamMemberId};
use crate::forms::FormError;

#[derive(Debug, Deserialize, Validate)]
/// Payload for `POST /clients/{id}/stage`.
pub struct StageForm {
    #[validate(length(min = 1))]
    pub stage: String,
}

impl TryFrom<StageForm> for PipelineStage {
    type Error = FormError;

    fn try_from(form: StageForm) -> Result<Self, Self::Error> {
        form.validate()?;
        form.stage
            .trim()
            .parse()
            .map_err(|_| FormError::InvalidStage)
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
/// Payload for `PATCH /clients/{id}`. Absent fields are left untouched; an
/// empty string clears `notes`, `assigned_advisor_id` and `review_due_date`.
pub struct UpdateClientForm {
    #[validate(length(max = 10000))]
    pub notes: Option<String>,
    pub assigned_advisor_id: Option<String>,
    /// `YYYY-MM-DD`.
    pub review_due_date: Option<String>,
    pub products: Option<Vec<String>>,
    pub cashcalc_complete: Option<bool>,
    pub typeform_complete: Option<bool>,
    #[validate(range(min = 0))]
    pub docs_required: Option<i32>,
    #[validate(range(min = 0))]
    pub docs_received: Option<i32>,
}

fn blank_to_none(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn count(value: i32) -> Result<DocCount, FormError> {
    DocCount::new(value).map_err(|_| FormError::InvalidCount)
}

impl UpdateClientForm {
    /// Validates the payload and builds the partial update, stamping
    /// questionnaire completion with `now`.
    pub fn into_domain(self, now: NaiveDateTime) -> Result<UpdateClient, FormError> {
        self.validate()?;

        let mut update = UpdateClient {
            notes: self.notes.map(blank_to_none),
            assigned_advisor_id: self
                .assigned_advisor_id
                .map(|raw| {
                    blank_to_none(raw)
                        .map(|id| TeamMemberId::parse(&id))
                        .transpose()
                        .map_err(|_| FormError::InvalidAdvisorId)
                })
                .transpose()?,
            review_due_date: self
                .review_due_date
                .map(|raw| {
                    blank_to_none(raw)
                        .map(|date| NaiveDate::parse_from_str(&date, "%Y-%m-%d"))
                        .transpose()
                        .map_err(|_| FormError::InvalidDate)
                })
                .transpose()?,
            products: self.products.map(|products| {
                products
                    .into_iter()
                    .filter_map(blank_to_none)
                    .collect::<Vec<_>>()
            }),
            docs_required: self.docs_required.map(count).transpose()?,
            docs_received: self.docs_received.map(count).transpose()?,
            ..UpdateClient::default()
        };
        if let Some(complete) = self.cashcalc_complete {
            update = update.cashcalc(complete, now);
        }
        if let Some(complete) = self.typeform_complete {
            update = update.typeform(complete, now);
        }
        Ok(update)
    }
}
