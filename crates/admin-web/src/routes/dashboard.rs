//! Dashboard routes.

use std::collections::BTreeMap;

use askama::Template;
use axum::extract::State;
use axum::Json;
use database::{kpi, Kpis, LevelCount};
use serde::Serialize;

use crate::error::Result;
use crate::state::AppState;

/// Dashboard page template.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub kpis: Kpis,
    pub levels: Vec<LevelBar>,
}

/// One bar of the distributors-per-level chart.
#[derive(Clone, Serialize)]
pub struct LevelBar {
    pub level: i64,
    pub count: i64,
    /// Width relative to the largest level, 0 to 100.
    pub percent: i64,
}

impl LevelBar {
    fn scale(levels: Vec<LevelCount>) -> Vec<Self> {
        let max = levels.iter().map(|l| l.count).max().unwrap_or(0).max(1);
        levels
            .into_iter()
            .map(|l| LevelBar {
                level: l.level,
                count: l.count,
                percent: l.count * 100 / max,
            })
            .collect()
    }
}

/// Render the dashboard page.
pub async fn dashboard_page(State(state): State<AppState>) -> Result<DashboardTemplate> {
    let pool = state.db.pool();
    let kpis = kpi::kpis(pool).await?;
    let levels = LevelBar::scale(kpi::level_distribution(pool).await?);

    Ok(DashboardTemplate { kpis, levels })
}

/// Get dashboard counts as JSON.
pub async fn kpis_api(State(state): State<AppState>) -> Result<Json<BTreeMap<&'static str, i64>>> {
    let kpis = kpi::kpis(state.db.pool()).await?;
    Ok(Json(kpis.as_map()))
}

/// Get distributors per level as JSON.
pub async fn levels_api(State(state): State<AppState>) -> Result<Json<Vec<LevelCount>>> {
    let levels = kpi::level_distribution(state.db.pool()).await?;
    Ok(Json(levels))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_bars_scale_to_largest() {
        let bars = LevelBar::scale(vec![
            LevelCount { level: 1, count: 4 },
            LevelCount { level: 2, count: 1 },
        ]);
        assert_eq!(bars[0].percent, 100);
        assert_eq!(bars[1].percent, 25);
        assert!(LevelBar::scale(Vec::new()).is_empty());
    }
}
