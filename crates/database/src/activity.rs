//! Activity log persistence.

use sqlx::SqlitePool;

use crate::models::Activity;
use crate::Result;

/// Append an activity for a contact.
pub async fn insert_activity(
    pool: &SqlitePool,
    contact_id: i64,
    channel: &str,
    message: &str,
) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO activities (contact_id, channel, message, ts)
        VALUES (?, ?, ?, datetime('now'))
        "#,
    )
    .bind(contact_id)
    .bind(channel)
    .bind(message)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// List activities, newest first, optionally for one contact.
pub async fn list_activities(pool: &SqlitePool, contact_id: Option<i64>) -> Result<Vec<Activity>> {
    let rows = sqlx::query_as::<_, Activity>(
        r#"
        SELECT id, contact_id, COALESCE(channel, '') AS channel,
               COALESCE(message, '') AS message, COALESCE(ts, '') AS ts
        FROM activities
        WHERE ?1 IS NULL OR contact_id = ?1
        ORDER BY ts DESC, id DESC
        "#,
    )
    .bind(contact_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
