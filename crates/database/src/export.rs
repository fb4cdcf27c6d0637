//! CSV export of contacts.

use std::io::Write;

use sqlx::SqlitePool;

use crate::contact::{list_contacts, ContactFilter};
use crate::field::ContactField;
use crate::models::Contact;
use crate::Result;

/// Write contacts as UTF-8 CSV.
///
/// The header row uses the import layout's headers where one exists and the
/// column name otherwise, so an export can be imported again unchanged.
/// Passwords are exported as stored.
pub fn write_csv<W: Write>(contacts: &[Contact], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);

    csv.write_record(ContactField::ALL.iter().map(|field| field.export_header()))?;
    for contact in contacts {
        csv.write_record(ContactField::ALL.iter().map(|field| contact.text(*field)))?;
    }

    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Export every contact in the default listing order.
///
/// Returns the number of contacts written.
pub async fn export_csv<W: Write>(pool: &SqlitePool, writer: W) -> Result<usize> {
    let contacts = list_contacts(pool, &ContactFilter::default()).await?;
    write_csv(&contacts, writer)?;

    tracing::info!(rows = contacts.len(), "Exported contacts");
    Ok(contacts.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::{count_contacts, create_contact};
    use crate::import::{import_batch, ImportRecord};
    use crate::normalize::FieldMap;
    use crate::Database;

    async fn test_db() -> Database {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.ensure_schema().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_export_layout() {
        let db = test_db().await;
        create_contact(
            db.pool(),
            &FieldMap::new()
                .with(ContactField::Name, "Doe, Jane")
                .with(ContactField::Phone, "0821234567")
                .with(ContactField::Level, 3i64),
        )
        .await
        .unwrap();

        let mut out = Vec::new();
        let rows = export_csv(db.pool(), &mut out).await.unwrap();
        assert_eq!(rows, 1);

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("Level,Leg,Associate's ID,Name and surname,GO status"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("3,,,\"Doe, Jane\",Active,,0821234567"));
        assert!(lines.next().is_none());
    }

    #[tokio::test]
    async fn test_export_reimports_without_duplicates() {
        let db = test_db().await;
        for (name, phone) in [("Jane", "0821234567"), ("John", "0837654321")] {
            create_contact(
                db.pool(),
                &FieldMap::new()
                    .with(ContactField::Name, name)
                    .with(ContactField::Phone, phone)
                    .with(ContactField::Level, 2i64),
            )
            .await
            .unwrap();
        }

        let mut out = Vec::new();
        export_csv(db.pool(), &mut out).await.unwrap();

        let mut reader = csv::Reader::from_reader(out.as_slice());
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        let records: Vec<ImportRecord> = reader
            .records()
            .map(|row| ImportRecord::from_row(&headers, &row.unwrap().iter().collect::<Vec<_>>()))
            .collect();

        let summary = import_batch(db.pool(), &records).await.unwrap();
        assert_eq!(summary.updated, 2);
        assert_eq!(count_contacts(db.pool()).await.unwrap(), 2);
    }
}
