use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::document::{Document as DomainDocument, NewDocument as DomainNewDocument};
use crate::domain::types::{ClientId, DocumentId, DocumentName, FileUrl, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::documents)]
pub struct Document {
    pub id: String,
    pub client_id: String,
    pub name: String,
    pub document_type: String,
    pub file_url: Option<String>,
    pub uploaded_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::documents)]
pub struct NewDocument<'a> {
    pub id: String,
    pub client_id: String,
    pub name: &'a str,
    pub document_type: &'static str,
    pub file_url: Option<&'a str>,
    pub uploaded_at: NaiveDateTime,
}

impl TryFrom<Document> for DomainDocument {
    type Error = TypeConstraintError;

    fn try_from(document: Document) -> Result<Self, Self::Error> {
        Ok(Self {
            id: DocumentId::parse(&document.id)?,
            client_id: ClientId::parse(&document.client_id)?,
            name: DocumentName::new(document.name)?,
            document_type: document.document_type.parse()?,
            file_url: document.file_url.map(FileUrl::new).transpose()?,
            uploaded_at: document.uploaded_at,
        })
    }
}

impl<'a> From<&'a DomainNewDocument> for NewDocument<'a> {
    fn from(document: &'a DomainNewDocument) -> Self {
        Self {
            id: document.id.to_string(),
            client_id: document.client_id.to_string(),
            name: document.name.as_str(),
            document_type: document.document_type.as_str(),
            file_url: document.file_url.as_ref().map(FileUrl::as_str),
            uploaded_at: document.uploaded_at,
        }
    }
}
