use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/obras — list all obras.
pub async fn list_obras(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let obras = grifo_core::obra::Obra::list(&root)?;
        let list: Vec<serde_json::Value> = obras
            .iter()
            .map(|o| {
                serde_json::json!({
                    "slug": o.slug,
                    "name": o.name,
                    "address": o.address,
                    "responsible": o.responsible,
                    "status": o.status,
                    "created_at": o.created_at,
                    "updated_at": o.updated_at,
                })
            })
            .collect();
        Ok::<_, grifo_core::GrifoError>(serde_json::json!(list))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// GET /api/obras/:slug — obra detail with stored weeks.
pub async fn get_obra(
    State(app): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let o = grifo_core::obra::Obra::load(&root, &slug)?;
        let weeks = grifo_core::week::WeekPlan::list_weeks(&root, &slug)?;
        Ok::<_, grifo_core::GrifoError>(serde_json::json!({
            "slug": o.slug,
            "name": o.name,
            "address": o.address,
            "responsible": o.responsible,
            "status": o.status,
            "weeks": weeks,
            "created_at": o.created_at,
            "updated_at": o.updated_at,
            "finished_at": o.finished_at,
            "archived_at": o.archived_at,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct CreateObraBody {
    pub slug: String,
    pub name: String,
}

/// POST /api/obras — create a new obra.
pub async fn create_obra(
    State(app): State<AppState>,
    Json(body): Json<CreateObraBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let o = grifo_core::obra::Obra::create(&root, body.slug, body.name)?;

        let mut state = grifo_core::state::State::load(&root)?;
        state.add_obra(&o.slug);
        state.save(&root)?;

        Ok::<_, grifo_core::GrifoError>(serde_json::json!({
            "slug": o.slug,
            "name": o.name,
            "status": o.status,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
