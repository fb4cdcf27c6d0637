//! Dashboard aggregates.

use sqlx::SqlitePool;

use crate::models::{Kpis, LevelCount};
use crate::Result;

/// Compute the dashboard counts in one statement.
///
/// Every count is present; an empty store yields zeros.
pub async fn kpis(pool: &SqlitePool) -> Result<Kpis> {
    let kpis = sqlx::query_as::<_, Kpis>(
        r#"
        SELECT
            COUNT(*) AS total_contacts,
            COALESCE(SUM(member_status = 'Active'), 0) AS active,
            COALESCE(SUM(member_status = 'Expired'), 0) AS expired,
            COALESCE(SUM(distributor_status = 'Distributor'), 0) AS distributors,
            COALESCE(SUM(distributor_status = 'Inactive'), 0) AS inactive,
            (SELECT COUNT(*) FROM orders) AS orders
        FROM contacts
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(kpis)
}

/// Count distributors per level, lowest level first.
///
/// Levels without distributors are left out rather than reported as zero.
pub async fn level_distribution(pool: &SqlitePool) -> Result<Vec<LevelCount>> {
    let rows = sqlx::query_as::<_, LevelCount>(
        r#"
        SELECT level, COUNT(*) AS count
        FROM contacts
        WHERE distributor_status = 'Distributor'
          AND level BETWEEN 1 AND 13
        GROUP BY level
        ORDER BY level
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
