//! Schema assurance.
//!
//! Tables are created if missing and then compared column by column against
//! the recognized set. Missing columns are added with `ALTER TABLE … ADD
//! COLUMN`; nothing is ever dropped or renamed, so a file written by an older
//! build keeps all of its rows.

use sqlx::SqlitePool;
use tracing::info;

use crate::field::ContactField;
use crate::Result;

const CREATE_CONTACTS: &str = r#"
CREATE TABLE IF NOT EXISTS contacts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL DEFAULT '',
    phone TEXT,
    email TEXT NOT NULL DEFAULT '',
    source TEXT NOT NULL DEFAULT '',
    interest TEXT NOT NULL DEFAULT '',
    lead_status TEXT NOT NULL DEFAULT '',
    communication_status TEXT NOT NULL DEFAULT '',
    registration_status TEXT NOT NULL DEFAULT '',
    tags TEXT NOT NULL DEFAULT '',
    assigned TEXT NOT NULL DEFAULT '',
    notes TEXT NOT NULL DEFAULT '',
    action_needed TEXT NOT NULL DEFAULT '',
    action_taken TEXT NOT NULL DEFAULT '',
    username TEXT NOT NULL DEFAULT '',
    password TEXT NOT NULL DEFAULT '',
    country TEXT NOT NULL DEFAULT '',
    province TEXT NOT NULL DEFAULT '',
    city TEXT NOT NULL DEFAULT '',
    location TEXT NOT NULL DEFAULT '',
    level INTEGER,
    leg TEXT NOT NULL DEFAULT '',
    associate_id TEXT NOT NULL DEFAULT '',
    member_status TEXT NOT NULL DEFAULT 'Active',
    distributor_status TEXT NOT NULL DEFAULT 'Distributor',
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
)
"#;

const CREATE_ORDERS: &str = r#"
CREATE TABLE IF NOT EXISTS orders (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    contact_id INTEGER REFERENCES contacts(id) ON DELETE SET NULL,
    order_date TEXT NOT NULL DEFAULT '',
    product TEXT NOT NULL DEFAULT '',
    qty INTEGER NOT NULL DEFAULT 1,
    amount REAL NOT NULL DEFAULT 0,
    notes TEXT NOT NULL DEFAULT '',
    proof_of_payment TEXT NOT NULL DEFAULT '',
    status TEXT NOT NULL DEFAULT 'Pending',
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
)
"#;

const CREATE_ACTIVITIES: &str = r#"
CREATE TABLE IF NOT EXISTS activities (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    contact_id INTEGER REFERENCES contacts(id) ON DELETE CASCADE,
    channel TEXT NOT NULL DEFAULT '',
    message TEXT NOT NULL DEFAULT '',
    ts TEXT NOT NULL DEFAULT (datetime('now'))
)
"#;

const CREATE_CAMPAIGNS: &str = r#"
CREATE TABLE IF NOT EXISTS campaigns (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    channel TEXT NOT NULL DEFAULT '',
    name TEXT NOT NULL DEFAULT '',
    audience TEXT NOT NULL DEFAULT '',
    message TEXT NOT NULL DEFAULT '',
    outcome TEXT NOT NULL DEFAULT '',
    notes TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
)
"#;

// Empty phones are stored as NULL or '' depending on the writer; neither
// takes part in uniqueness.
const CREATE_INDEXES: &[&str] = &[
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_contacts_phone ON contacts(phone) WHERE phone <> ''",
    "CREATE INDEX IF NOT EXISTS idx_contacts_associate ON contacts(associate_id, name)",
    "CREATE INDEX IF NOT EXISTS idx_orders_contact ON orders(contact_id)",
    "CREATE INDEX IF NOT EXISTS idx_activities_contact ON activities(contact_id)",
];

// ADD COLUMN fills existing rows with the declared default. Rows left blank
// by a writer that had no status default are brought back into the closed set.
const STATUS_REPAIRS: &[&str] = &[
    "UPDATE contacts SET member_status = 'Active' WHERE TRIM(member_status) = ''",
    "UPDATE contacts SET distributor_status = 'Distributor' WHERE TRIM(distributor_status) = ''",
];

/// A column that may need to be added to an existing table.
struct ColumnSpec {
    name: &'static str,
    /// Declaration used with `ADD COLUMN`.
    decl: &'static str,
    /// Timestamp columns cannot take a `datetime('now')` default when added
    /// later, so existing rows are stamped after the column is created.
    backfill_now: bool,
}

const TEXT_DECL: &str = "TEXT NOT NULL DEFAULT ''";

const fn text(name: &'static str) -> ColumnSpec {
    ColumnSpec {
        name,
        decl: TEXT_DECL,
        backfill_now: false,
    }
}

const fn timestamp(name: &'static str) -> ColumnSpec {
    ColumnSpec {
        name,
        decl: "TEXT",
        backfill_now: true,
    }
}

fn contact_columns() -> Vec<ColumnSpec> {
    let mut columns: Vec<ColumnSpec> = ContactField::ALL
        .iter()
        .map(|field| match field {
            ContactField::Level => ColumnSpec {
                name: "level",
                decl: "INTEGER",
                backfill_now: false,
            },
            ContactField::Phone => ColumnSpec {
                name: "phone",
                decl: "TEXT",
                backfill_now: false,
            },
            ContactField::MemberStatus => ColumnSpec {
                name: "member_status",
                decl: "TEXT NOT NULL DEFAULT 'Active'",
                backfill_now: false,
            },
            ContactField::DistributorStatus => ColumnSpec {
                name: "distributor_status",
                decl: "TEXT NOT NULL DEFAULT 'Distributor'",
                backfill_now: false,
            },
            other => text(other.column_name()),
        })
        .collect();
    columns.push(timestamp("created_at"));
    columns.push(timestamp("updated_at"));
    columns
}

fn order_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec {
            name: "contact_id",
            decl: "INTEGER",
            backfill_now: false,
        },
        text("order_date"),
        text("product"),
        ColumnSpec {
            name: "qty",
            decl: "INTEGER NOT NULL DEFAULT 1",
            backfill_now: false,
        },
        ColumnSpec {
            name: "amount",
            decl: "REAL NOT NULL DEFAULT 0",
            backfill_now: false,
        },
        text("notes"),
        text("proof_of_payment"),
        ColumnSpec {
            name: "status",
            decl: "TEXT NOT NULL DEFAULT 'Pending'",
            backfill_now: false,
        },
        timestamp("created_at"),
    ]
}

fn activity_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec {
            name: "contact_id",
            decl: "INTEGER",
            backfill_now: false,
        },
        text("channel"),
        text("message"),
        timestamp("ts"),
    ]
}

fn campaign_columns() -> Vec<ColumnSpec> {
    vec![
        text("channel"),
        text("name"),
        text("audience"),
        text("message"),
        text("outcome"),
        text("notes"),
        timestamp("created_at"),
    ]
}

/// Create missing tables and add missing columns.
///
/// Returns the `table.column` names that were added.
pub async fn ensure(pool: &SqlitePool) -> Result<Vec<String>> {
    for create in [CREATE_CONTACTS, CREATE_ORDERS, CREATE_ACTIVITIES, CREATE_CAMPAIGNS] {
        sqlx::query(create).execute(pool).await?;
    }

    let mut added = Vec::new();
    added.extend(ensure_columns(pool, "contacts", &contact_columns()).await?);
    added.extend(ensure_columns(pool, "orders", &order_columns()).await?);
    added.extend(ensure_columns(pool, "activities", &activity_columns()).await?);
    added.extend(ensure_columns(pool, "campaigns", &campaign_columns()).await?);

    for index in CREATE_INDEXES {
        sqlx::query(index).execute(pool).await?;
    }

    let mut repaired = 0;
    for repair in STATUS_REPAIRS {
        repaired += sqlx::query(repair).execute(pool).await?.rows_affected();
    }
    if repaired > 0 {
        info!(rows = repaired, "Filled blank contact statuses");
    }

    if !added.is_empty() {
        info!(columns = ?added, "Added missing columns");
    }

    Ok(added)
}

/// Column names currently present on a table.
pub async fn table_columns(pool: &SqlitePool, table: &str) -> Result<Vec<String>> {
    let columns = sqlx::query_scalar::<_, String>(
        r#"
        SELECT name FROM pragma_table_info(?)
        "#,
    )
    .bind(table)
    .fetch_all(pool)
    .await?;

    Ok(columns)
}

async fn ensure_columns(
    pool: &SqlitePool,
    table: &'static str,
    columns: &[ColumnSpec],
) -> Result<Vec<String>> {
    let present = table_columns(pool, table).await?;
    let mut added = Vec::new();

    for column in columns {
        if present.iter().any(|name| name.eq_ignore_ascii_case(column.name)) {
            continue;
        }

        // Table and column names come from the constants above, never from input.
        let alter = format!(
            "ALTER TABLE {table} ADD COLUMN {column} {decl}",
            table = table,
            column = column.name,
            decl = column.decl
        );
        sqlx::query(&alter).execute(pool).await?;

        if column.backfill_now {
            let backfill = format!(
                "UPDATE {table} SET {column} = datetime('now') WHERE {column} IS NULL",
                table = table,
                column = column.name
            );
            sqlx::query(&backfill).execute(pool).await?;
        }

        added.push(format!("{}.{}", table, column.name));
    }

    Ok(added)
}
