use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct InitBody {
    pub project: String,
}

/// POST /api/init — set up the `.grifo/` layout under the server root.
pub async fn init_project(
    State(app): State<AppState>,
    Json(body): Json<InitBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let created = grifo_core::state::init(&root, &body.project)?;
        let state = grifo_core::state::State::load(&root)?;
        Ok::<_, grifo_core::GrifoError>(serde_json::json!({
            "created": created,
            "project": state.project,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
