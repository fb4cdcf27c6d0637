//! Bulk import of distributor spreadsheets.
//!
//! Each record is matched against existing contacts by phone number, or by
//! associate ID and name when the phone is blank. Matches are overwritten and
//! everything else is inserted, so importing an updated sheet again does not
//! create duplicates. A record with neither key always inserts.

use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;

use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::{info, warn};

use crate::contact::{column_value, ColumnValue};
use crate::error::Result;
use crate::field::ContactField;
use crate::models::ImportSummary;
use crate::normalize::{normalize, FieldValue};
use crate::status::{DistributorStatus, MemberStatus};
use crate::validation::{MAX_LEVEL, MIN_LEVEL};

/// One spreadsheet row as `(header, cell text)` pairs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImportRecord {
    cells: Vec<(String, String)>,
}

impl ImportRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a header row and one data row of equal length.
    pub fn from_row<H, C>(headers: &[H], cells: &[C]) -> Self
    where
        H: AsRef<str>,
        C: AsRef<str>,
    {
        headers
            .iter()
            .zip(cells)
            .map(|(header, cell)| (header.as_ref().to_string(), cell.as_ref().to_string()))
            .collect()
    }

    pub fn with(mut self, header: impl Into<String>, value: impl Into<String>) -> Self {
        self.cells.push((header.into(), value.into()));
        self
    }

    pub fn cells(&self) -> &[(String, String)] {
        &self.cells
    }
}

impl FromIterator<(String, String)> for ImportRecord {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

// JSON rows keep only columns that map onto a contact field, sorted by
// header. Other values are skipped whatever their shape.
impl<'de> Deserialize<'de> for ImportRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = ImportRecord;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of column headers to cell values")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<ImportRecord, A::Error> {
                let mut cells = Vec::new();
                while let Some(header) = access.next_key::<String>()? {
                    if ContactField::from_header(&header).is_some() {
                        let value = access.next_value::<FieldValue>()?;
                        cells.push((header, normalize(&value)));
                    } else {
                        access.next_value::<IgnoredAny>()?;
                    }
                }
                cells.sort();
                Ok(ImportRecord { cells })
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

/// A record mapped onto contact fields with its defaults applied.
#[derive(Debug, Clone, PartialEq)]
struct MappedRecord {
    text: BTreeMap<ContactField, String>,
    level: i64,
    member_status: MemberStatus,
    distributor_status: DistributorStatus,
    recovered: bool,
}

impl MappedRecord {
    fn text(&self, field: ContactField) -> &str {
        self.text.get(&field).map(String::as_str).unwrap_or("")
    }

    fn columns(&self) -> Result<Vec<(&'static str, ColumnValue)>> {
        let mut columns = Vec::with_capacity(self.text.len() + 3);
        for (field, text) in &self.text {
            columns.push((field.column_name(), column_value(*field, text.clone())?));
        }
        columns.push(("level", ColumnValue::Integer(Some(self.level))));
        columns.push((
            "member_status",
            ColumnValue::Text(self.member_status.as_str().to_string()),
        ));
        columns.push((
            "distributor_status",
            ColumnValue::Text(self.distributor_status.as_str().to_string()),
        ));
        Ok(columns)
    }
}

/// Clamp a spreadsheet level into range.
///
/// Returns the level and whether the cell was unusable and replaced.
fn coerce_level(raw: Option<&str>) -> (i64, bool) {
    match raw.map(str::trim) {
        None | Some("") => (MIN_LEVEL, false),
        Some(text) => match text.parse::<f64>() {
            Ok(value) if value.is_finite() => ((value.trunc() as i64).clamp(MIN_LEVEL, MAX_LEVEL), false),
            _ => (MIN_LEVEL, true),
        },
    }
}

fn map_record(record: &ImportRecord, row: usize) -> MappedRecord {
    let mut text = BTreeMap::new();
    for (header, value) in record.cells() {
        if let Some(field) = ContactField::from_header(header) {
            text.insert(field, value.trim().to_string());
        }
    }

    let mut recovered = false;

    let raw_level = text.remove(&ContactField::Level);
    let (level, bad_level) = coerce_level(raw_level.as_deref());
    if bad_level {
        warn!(row, value = ?raw_level, "Unreadable level, defaulting to {}", MIN_LEVEL);
        recovered = true;
    }

    let raw_member = text.remove(&ContactField::MemberStatus).unwrap_or_default();
    let member_status = match MemberStatus::parse(&raw_member) {
        Some(status) => status,
        None => {
            if !raw_member.is_empty() {
                warn!(row, value = %raw_member, "Unknown member status, defaulting to Active");
                recovered = true;
            }
            MemberStatus::default()
        }
    };

    let raw_distributor = text
        .remove(&ContactField::DistributorStatus)
        .unwrap_or_default();
    let distributor_status = match DistributorStatus::parse(&raw_distributor) {
        Some(status) => status,
        None => {
            if !raw_distributor.is_empty() {
                warn!(
                    row,
                    value = %raw_distributor,
                    "Unknown distributor status, defaulting to Distributor"
                );
                recovered = true;
            }
            DistributorStatus::default()
        }
    };

    MappedRecord {
        text,
        level,
        member_status,
        distributor_status,
        recovered,
    }
}

/// Find the contact a record should overwrite.
async fn find_existing(conn: &mut SqliteConnection, record: &MappedRecord) -> Result<Option<i64>> {
    let phone = record.text(ContactField::Phone);
    if !phone.is_empty() {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT id FROM contacts
            WHERE phone = ?
            "#,
        )
        .bind(phone)
        .fetch_optional(&mut *conn)
        .await?;
        return Ok(id);
    }

    let associate_id = record.text(ContactField::AssociateId);
    let name = record.text(ContactField::Name);
    if associate_id.is_empty() || name.is_empty() {
        return Ok(None);
    }

    let id = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT id FROM contacts
        WHERE associate_id = ? AND name = ?
        ORDER BY id
        LIMIT 1
        "#,
    )
    .bind(associate_id)
    .bind(name)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(id)
}

async fn insert_record(conn: &mut SqliteConnection, record: &MappedRecord) -> Result<()> {
    let columns = record.columns()?;

    let mut builder = QueryBuilder::<Sqlite>::new("INSERT INTO contacts (");
    for (column, _) in &columns {
        builder.push(column);
        builder.push(", ");
    }
    builder.push("created_at, updated_at) VALUES (");
    for (_, value) in columns {
        value.push_bind(&mut builder);
        builder.push(", ");
    }
    builder.push("datetime('now'), datetime('now'))");

    builder.build().execute(&mut *conn).await?;
    Ok(())
}

async fn update_record(conn: &mut SqliteConnection, id: i64, record: &MappedRecord) -> Result<()> {
    let mut builder = QueryBuilder::<Sqlite>::new("UPDATE contacts SET ");
    for (column, value) in record.columns()? {
        builder.push(column);
        builder.push(" = ");
        value.push_bind(&mut builder);
        builder.push(", ");
    }
    builder.push("updated_at = datetime('now') WHERE id = ");
    builder.push_bind(id);

    builder.build().execute(&mut *conn).await?;
    Ok(())
}

/// Read CSV with a header row into import records.
///
/// Cells are trimmed and short rows simply omit their trailing columns.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<ImportRecord>> {
    let mut csv = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv.headers()?.iter().map(String::from).collect();
    let mut records = Vec::new();
    for row in csv.records() {
        let row = row?;
        let cells: Vec<&str> = row.iter().collect();
        records.push(ImportRecord::from_row(&headers, &cells));
    }

    Ok(records)
}

/// Upsert a batch of spreadsheet records.
///
/// The batch runs in one transaction: later rows see contacts inserted by
/// earlier rows, and an error leaves the store untouched. Malformed cells are
/// replaced by their defaults (level 1, status Active / Distributor) and
/// counted in [`ImportSummary::recovered`].
pub async fn import_batch(pool: &SqlitePool, records: &[ImportRecord]) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();
    let mut tx = pool.begin().await?;

    for (index, record) in records.iter().enumerate() {
        let mapped = map_record(record, index + 1);
        if mapped.recovered {
            summary.recovered += 1;
        }

        match find_existing(&mut *tx, &mapped).await? {
            Some(id) => {
                update_record(&mut *tx, id, &mapped).await?;
                summary.updated += 1;
            }
            None => {
                insert_record(&mut *tx, &mapped).await?;
                summary.inserted += 1;
            }
        }
    }

    tx.commit().await?;

    info!(
        inserted = summary.inserted,
        updated = summary.updated,
        recovered = summary.recovered,
        "Import complete"
    );

    Ok(summary)
}
