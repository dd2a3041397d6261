use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/ranking — the executor leaderboard.
pub async fn get_ranking(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let profiles = grifo_core::gamification::Profile::list(&root)?;
        let ranking = grifo_core::gamification::ranking(&profiles);
        Ok::<_, grifo_core::GrifoError>(serde_json::to_value(&ranking)?)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// POST /api/obras/:slug/weeks/:week/award — award points for a closed week.
pub async fn award_week(
    State(app): State<AppState>,
    Path((slug, week)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let plan = grifo_core::week::WeekPlan::load(&root, &slug, &week)?;
        let awards = grifo_core::gamification::award_week(&root, &plan)?;
        grifo_core::state::State::mark_changed(&root)?;
        Ok::<_, grifo_core::GrifoError>(serde_json::json!({
            "obra": slug,
            "week": week,
            "awards": awards,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
