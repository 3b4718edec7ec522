use serde::Deserialize;
use validator::Validate;

use crate::domain::types::{ClientId, EmailAddress, EmailId};
use crate::forms::FormError;
use crate::services::drafts::OutgoingDraft;

#[derive(Debug, Deserialize, Validate)]
/// Payload for `PUT /emails/{id}`.
pub struct SaveDraftForm {
    #[validate(length(max = 100000))]
    pub body: String,
}

#[derive(Debug, Deserialize, Validate)]
/// Payload for `POST /emails/send`.
pub struct SendDraftForm {
    /// Present when the draft is stored and should be marked sent.
    pub id: Option<String>,
    pub client_id: String,
    #[validate(length(min = 1))]
    pub template_type: String,
    /// Checked by [`EmailAddress::new`] after trimming.
    pub to_email: String,
    #[serde(default)]
    pub cc_emails: Vec<String>,
    #[validate(length(min = 1))]
    pub subject: String,
    #[validate(length(min = 1))]
    pub body: String,
    #[serde(default)]
    pub attachments: Vec<String>,
}

impl TryFrom<SendDraftForm> for OutgoingDraft {
    type Error = FormError;

    fn try_from(form: SendDraftForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let id = form
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(EmailId::parse)
            .transpose()
            .map_err(|_| FormError::InvalidEmailId)?;
        let client_id =
            ClientId::parse(form.client_id.trim()).map_err(|_| FormError::InvalidClientId)?;
        let to_email = EmailAddress::new(form.to_email).map_err(|_| FormError::InvalidEmail)?;
        let cc_emails = form
            .cc_emails
            .into_iter()
            .filter(|cc| !cc.trim().is_empty())
            .map(EmailAddress::new)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| FormError::InvalidEmail)?;

        Ok(OutgoingDraft {
            id,
            client_id,
            template_type: form.template_type.trim().to_string(),
            to_email,
            cc_emails,
            subject: form.subject,
            body: form.body,
            attachments: form.attachments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> SendDraftForm {
        SendDraftForm {
            id: None,
            client_id: ClientId::new().to_string(),
            template_type: "chase".to_string(),
            to_email: "Lorcan@Example.com".to_string(),
            cc_emails: vec!["".to_string(), "admin@example.com".to_string()],
            subject: "Reminder".to_string(),
            body: "Dear Lorcan".to_string(),
            attachments: Vec::new(),
        }
    }

    #[test]
    fn converts_valid_payload() {
        let draft = OutgoingDraft::try_from(form()).expect("valid");
        assert_eq!(draft.to_email.as_str(), "lorcan@example.com");
        assert_eq!(draft.cc_emails.len(), 1);
        assert!(draft.id.is_none());
    }

    #[test]
    fn rejects_bad_cc_and_ids() {
        let mut bad_cc = form();
        bad_cc.cc_emails = vec!["not-an-email".to_string()];
        assert!(matches!(
            OutgoingDraft::try_from(bad_cc),
            Err(FormError::InvalidEmail)
        ));

        let mut bad_to = form();
        bad_to.to_email = "kate at example".to_string();
        assert!(matches!(
            OutgoingDraft::try_from(bad_to),
            Err(FormError::InvalidEmail)
        ));

        let mut bad_id = form();
        bad_id.id = Some("42".to_string());
        assert!(matches!(
            OutgoingDraft::try_from(bad_id),
            Err(FormError::InvalidEmailId)
        ));

        let mut empty_subject = form();
        empty_subject.subject = String::new();
        assert!(matches!(
            OutgoingDraft::try_from(empty_subject),
            Err(FormError::Validation(_))
        ));
    }

    #[test]
    fn recipient_is_trimmed_before_checking() {
        let mut padded = form();
        padded.to_email = " kate@example.com ".to_string();
        let draft = OutgoingDraft::try_from(padded).expect("valid");
        assert_eq!(draft.to_email.as_str(), "kate@example.com");
    }
}
