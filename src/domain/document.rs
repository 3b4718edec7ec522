use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{ClientId, DocumentId, DocumentName, FileUrl, text_enum};

text_enum!(
    /// Category of a collected client document.
    DocumentType {
        IdDocument => "id_document",
        ProofOfAddress => "proof_of_address",
        BankStatement => "bank_statement",
        Payslip => "payslip",
        P60 => "p60",
        Other => "other",
    }
);

/// Uploaded file; never modified after upload.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub client_id: ClientId,
    pub name: DocumentName,
    pub document_type: DocumentType,
    pub file_url: Option<FileUrl>,
    pub uploaded_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewDocument {
    pub id: DocumentId,
    pub client_id: ClientId,
    pub name: DocumentName,
    pub document_type: DocumentType,
    pub file_url: Option<FileUrl>,
    pub uploaded_at: NaiveDateTime,
}

impl NewDocument {
    #[must_use]
    pub fn new(
        client_id: ClientId,
        name: DocumentName,
        document_type: DocumentType,
        file_url: Option<FileUrl>,
        uploaded_at: NaiveDateTime,
    ) -> Self {
        Self {
            id: DocumentId::new(),
            client_id,
            name,
            document_type,
            file_url,
            uploaded_at,
        }
    }
}
