use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/state — project state with obra summaries.
pub async fn get_state(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let state = grifo_core::state::State::load(&root)?;
        let obras = grifo_core::obra::Obra::list(&root)?;

        let obra_summaries: Vec<serde_json::Value> = obras
            .iter()
            .map(|o| {
                let weeks = grifo_core::week::WeekPlan::list_weeks(&root, &o.slug)
                    .unwrap_or_default();
                serde_json::json!({
                    "slug": o.slug,
                    "name": o.name,
                    "status": o.status,
                    "weeks": weeks,
                    "updated_at": o.updated_at,
                })
            })
            .collect();

        Ok::<_, grifo_core::GrifoError>(serde_json::json!({
            "project": state.project,
            "obras": obra_summaries,
            "last_updated": state.last_updated,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
