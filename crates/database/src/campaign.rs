//! Campaign persistence.

use sqlx::SqlitePool;

use crate::contact::escape_like;
use crate::models::{Campaign, NewCampaign};
use crate::validation::validate_required;
use crate::Result;

/// Insert a campaign and return its ID. The name is required.
pub async fn insert_campaign(pool: &SqlitePool, campaign: &NewCampaign) -> Result<i64> {
    validate_required("campaign name", &campaign.name)?;

    let result = sqlx::query(
        r#"
        INSERT INTO campaigns (channel, name, audience, message, outcome, notes, created_at)
        VALUES (?, ?, ?, ?, ?, ?, datetime('now'))
        "#,
    )
    .bind(&campaign.channel)
    .bind(campaign.name.trim())
    .bind(&campaign.audience)
    .bind(&campaign.message)
    .bind(campaign.outcome.as_str())
    .bind(&campaign.notes)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// List campaigns, newest first.
///
/// A non-blank `search` keeps campaigns whose name, channel, audience,
/// message or notes contain it.
pub async fn list_campaigns(pool: &SqlitePool, search: Option<&str>) -> Result<Vec<Campaign>> {
    let pattern = search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{}%", escape_like(s)));

    let rows = sqlx::query_as::<_, Campaign>(
        r#"
        SELECT id,
               COALESCE(channel, '') AS channel,
               COALESCE(name, '') AS name,
               COALESCE(audience, '') AS audience,
               COALESCE(message, '') AS message,
               COALESCE(outcome, '') AS outcome,
               COALESCE(notes, '') AS notes,
               COALESCE(created_at, '') AS created_at
        FROM campaigns
        WHERE ?1 IS NULL
           OR name LIKE ?1 ESCAPE '\' OR channel LIKE ?1 ESCAPE '\'
           OR audience LIKE ?1 ESCAPE '\' OR message LIKE ?1 ESCAPE '\'
           OR notes LIKE ?1 ESCAPE '\'
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(pattern)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::CampaignOutcome;
    use crate::{Database, DatabaseError};

    async fn test_db() -> Database {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.ensure_schema().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_insert_and_search_campaigns() {
        let db = test_db().await;

        insert_campaign(
            db.pool(),
            &NewCampaign {
                channel: "WhatsApp".to_string(),
                name: "Winter Luna push".to_string(),
                audience: "Expired members".to_string(),
                message: "Hi {name}, Luna is back in stock".to_string(),
                outcome: CampaignOutcome::Sent,
                notes: String::new(),
            },
        )
        .await
        .unwrap();
        insert_campaign(
            db.pool(),
            &NewCampaign {
                channel: "TikTok".to_string(),
                name: "GRW teaser".to_string(),
                ..NewCampaign::default()
            },
        )
        .await
        .unwrap();

        let all = list_campaigns(db.pool(), None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "GRW teaser");
        assert_eq!(all[0].outcome, "");

        let found = list_campaigns(db.pool(), Some("expired")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].outcome, "Sent");

        assert_eq!(list_campaigns(db.pool(), Some("  ")).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_search_matches_wildcards_literally() {
        let db = test_db().await;
        for name in ["50% off Luna", "Spring restock", "GRW_bundle"] {
            insert_campaign(
                db.pool(),
                &NewCampaign {
                    name: name.to_string(),
                    ..NewCampaign::default()
                },
            )
            .await
            .unwrap();
        }

        let found = list_campaigns(db.pool(), Some("50%")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "50% off Luna");

        let found = list_campaigns(db.pool(), Some("_")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "GRW_bundle");

        assert!(list_campaigns(db.pool(), Some("%%")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_campaign_name_required() {
        let db = test_db().await;
        let result = insert_campaign(db.pool(), &NewCampaign::default()).await;
        assert!(matches!(result, Err(DatabaseError::Validation(_))));
    }
}
