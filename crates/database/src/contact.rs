//! Contact CRUD and filtered listing.

use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DatabaseError, Result};
use crate::field::ContactField;
use crate::models::Contact;
use crate::normalize::FieldMap;
use crate::status::{DistributorStatus, MemberStatus};
use crate::validation::{parse_level, ValidationError};

/// Filter for [`list_contacts`]. Empty members impose no constraint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactFilter {
    /// Case-insensitive substring over name, phone, email and associate ID.
    pub search: Option<String>,
    pub member_status: Vec<String>,
    pub distributor_status: Vec<String>,
    pub levels: Vec<i64>,
    pub legs: Vec<String>,
}

impl ContactFilter {
    pub fn search(mut self, needle: impl Into<String>) -> Self {
        self.search = Some(needle.into());
        self
    }

    pub fn member_status<S: Into<String>>(mut self, statuses: impl IntoIterator<Item = S>) -> Self {
        self.member_status = statuses.into_iter().map(Into::into).collect();
        self
    }

    pub fn distributor_status<S: Into<String>>(
        mut self,
        statuses: impl IntoIterator<Item = S>,
    ) -> Self {
        self.distributor_status = statuses.into_iter().map(Into::into).collect();
        self
    }

    pub fn levels(mut self, levels: impl IntoIterator<Item = i64>) -> Self {
        self.levels = levels.into_iter().collect();
        self
    }

    pub fn leg(mut self, leg: impl Into<String>) -> Self {
        self.legs = vec![leg.into()];
        self
    }
}

/// A bound value for one contact column.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ColumnValue {
    Text(String),
    /// Empty text is stored as NULL so it stays out of the phone index.
    OptionalText(Option<String>),
    Integer(Option<i64>),
}

impl ColumnValue {
    pub(crate) fn push_bind(self, builder: &mut QueryBuilder<'_, Sqlite>) {
        match self {
            ColumnValue::Text(value) => builder.push_bind(value),
            ColumnValue::OptionalText(value) => builder.push_bind(value),
            ColumnValue::Integer(value) => builder.push_bind(value),
        };
    }
}

/// Convert stored text for a field into the value bound for its column.
pub(crate) fn column_value(field: ContactField, text: String) -> Result<ColumnValue> {
    Ok(match field {
        ContactField::Level => ColumnValue::Integer(parse_level(&text)?),
        ContactField::Phone if text.trim().is_empty() => ColumnValue::OptionalText(None),
        ContactField::Phone => ColumnValue::OptionalText(Some(text)),
        ContactField::MemberStatus => {
            let status = if text.trim().is_empty() {
                MemberStatus::default()
            } else {
                MemberStatus::parse(&text).ok_or_else(|| unknown_status(field, &text))?
            };
            ColumnValue::Text(status.as_str().to_string())
        }
        ContactField::DistributorStatus => {
            let status = if text.trim().is_empty() {
                DistributorStatus::default()
            } else {
                DistributorStatus::parse(&text).ok_or_else(|| unknown_status(field, &text))?
            };
            ColumnValue::Text(status.as_str().to_string())
        }
        _ => ColumnValue::Text(text),
    })
}

fn unknown_status(field: ContactField, text: &str) -> ValidationError {
    ValidationError::UnknownVariant {
        field: field.column_name().to_string(),
        value: text.to_string(),
    }
}

fn bound_columns(fields: &FieldMap) -> Result<Vec<(ContactField, ColumnValue)>> {
    fields
        .iter()
        .map(|(field, _)| Ok((field, column_value(field, fields.text(field))?)))
        .collect()
}

/// Select list that reads NULLs written by older builds as empty text.
pub(crate) fn select_columns() -> String {
    let mut columns = vec!["id".to_string()];
    for field in ContactField::ALL {
        let name = field.column_name();
        if field.is_numeric() {
            columns.push(name.to_string());
        } else {
            columns.push(format!("COALESCE({name}, '') AS {name}", name = name));
        }
    }
    columns.push("COALESCE(created_at, '') AS created_at".to_string());
    columns.push("COALESCE(updated_at, '') AS updated_at".to_string());
    columns.join(", ")
}

/// Create a new contact and return its ID.
///
/// Every field is normalized to text; `level` must be blank or a whole number
/// from 1 to 13. A phone number already used by another contact is rejected.
pub async fn create_contact(pool: &SqlitePool, fields: &FieldMap) -> Result<i64> {
    let columns = bound_columns(fields)?;
    let phone = fields.text(ContactField::Phone);

    let mut builder = QueryBuilder::<Sqlite>::new("INSERT INTO contacts (");
    {
        let mut names = builder.separated(", ");
        for (field, _) in &columns {
            names.push(field.column_name());
        }
        names.push("created_at");
        names.push("updated_at");
    }
    builder.push(") VALUES (");
    for (field, value) in columns {
        value.push_bind(&mut builder);
        debug!(field = field.column_name(), "Bound contact field");
        builder.push(", ");
    }
    builder.push("datetime('now'), datetime('now'))");

    let result = builder
        .build()
        .execute(pool)
        .await
        .map_err(|e| DatabaseError::from_insert(e, "Contact", &phone))?;

    let id = result.last_insert_rowid();
    debug!(id, "Created contact");
    Ok(id)
}

/// Get a contact by ID.
pub async fn get_contact(pool: &SqlitePool, id: i64) -> Result<Contact> {
    let mut builder = QueryBuilder::<Sqlite>::new("SELECT ");
    builder.push(select_columns());
    builder.push(" FROM contacts WHERE id = ");
    builder.push_bind(id);

    builder
        .build_query_as::<Contact>()
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "Contact",
            id: id.to_string(),
        })
}

/// List contacts matching a filter, ordered by level, then name, then ID.
pub async fn list_contacts(pool: &SqlitePool, filter: &ContactFilter) -> Result<Vec<Contact>> {
    let mut builder = QueryBuilder::<Sqlite>::new("SELECT ");
    builder.push(select_columns());
    builder.push(" FROM contacts WHERE 1 = 1");

    if let Some(needle) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", escape_like(needle));
        builder.push(" AND (");
        let mut any = builder.separated(" OR ");
        for column in ["name", "phone", "email", "associate_id"] {
            any.push(format!("{} LIKE ", column));
            any.push_bind_unseparated(pattern.clone());
            any.push_unseparated(" ESCAPE '\\'");
        }
        builder.push(")");
    }

    push_in(&mut builder, "member_status", &filter.member_status);
    push_in(&mut builder, "distributor_status", &filter.distributor_status);
    push_in(&mut builder, "leg", &filter.legs);

    if !filter.levels.is_empty() {
        builder.push(" AND level IN (");
        let mut levels = builder.separated(", ");
        for level in &filter.levels {
            levels.push_bind(*level);
        }
        builder.push(")");
    }

    builder.push(" ORDER BY level ASC, name ASC, id ASC");

    let contacts = builder.build_query_as::<Contact>().fetch_all(pool).await?;
    Ok(contacts)
}

fn push_in(builder: &mut QueryBuilder<'_, Sqlite>, column: &str, values: &[String]) {
    if values.is_empty() {
        return;
    }
    builder.push(format!(" AND {} IN (", column));
    let mut list = builder.separated(", ");
    for value in values {
        list.push_bind(value.clone());
    }
    builder.push(")");
}

/// Escape `LIKE` wildcards so the needle matches literally.
pub(crate) fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Update the given fields of a contact and refresh `updated_at`.
///
/// Fields not in `fields` are left alone. An empty map writes nothing.
/// Returns `false` when no contact has this ID; that is not an error.
pub async fn update_contact(pool: &SqlitePool, id: i64, fields: &FieldMap) -> Result<bool> {
    if fields.is_empty() {
        return Ok(false);
    }

    let columns = bound_columns(fields)?;
    let phone = fields.text(ContactField::Phone);

    let mut builder = QueryBuilder::<Sqlite>::new("UPDATE contacts SET ");
    for (field, value) in columns {
        builder.push(field.column_name());
        builder.push(" = ");
        value.push_bind(&mut builder);
        builder.push(", ");
    }
    builder.push("updated_at = datetime('now') WHERE id = ");
    builder.push_bind(id);

    let result = builder
        .build()
        .execute(pool)
        .await
        .map_err(|e| DatabaseError::from_insert(e, "Contact", &phone))?;

    Ok(result.rows_affected() > 0)
}

/// Delete a contact by ID.
///
/// Activities of the contact are deleted and its orders are kept with the
/// contact reference cleared. Returns `false` when no contact had this ID.
pub async fn delete_contact(pool: &SqlitePool, id: i64) -> Result<bool> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        DELETE FROM activities
        WHERE contact_id = ?
        "#,
    )
    .bind(id)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        UPDATE orders
        SET contact_id = NULL
        WHERE contact_id = ?
        "#,
    )
    .bind(id)
    .execute(&mut *tx)
    .await?;

    let result = sqlx::query(
        r#"
        DELETE FROM contacts
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(result.rows_affected() > 0)
}

/// Count total contacts.
pub async fn count_contacts(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM contacts
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}
