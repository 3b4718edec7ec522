use diesel::prelude::*;

use crate::changes::{ChangeEvent, Table};
use crate::domain::document::{Document, NewDocument};
use crate::domain::types::ClientId;
use crate::models::document::{Document as DbDocument, NewDocument as DbNewDocument};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, DocumentReader, DocumentWriter};

impl DocumentReader for DieselRepository {
    fn list_client_documents(&self, client_id: ClientId) -> RepositoryResult<Vec<Document>> {
        use crate::schema::documents;

        let mut conn = self.conn()?;

        let documents = documents::table
            .filter(documents::client_id.eq(client_id.to_string()))
            .order(documents::uploaded_at.desc())
            .select(DbDocument::as_select())
            .load::<DbDocument>(&mut conn)?;

        Ok(documents
            .into_iter()
            .map(Document::try_from)
            .collect::<Result<Vec<_>, _>>()?)
    }
}

impl DocumentWriter for DieselRepository {
    fn create_document(&self, new_document: &NewDocument) -> RepositoryResult<Document> {
        use crate::schema::documents;

        let mut conn = self.conn()?;

        let insertable: DbNewDocument = new_document.into();
        let document = diesel::insert_into(documents::table)
            .values(&insertable)
            .returning(DbDocument::as_returning())
            .get_result::<DbDocument>(&mut conn)?;

        let document = Document::try_from(document)?;
        self.publish(ChangeEvent::inserted(Table::Documents, document.id));
        Ok(document)
    }
}
