use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/obras/:slug/playbook — the imported budget with roll-ups.
pub async fn get_playbook(
    State(app): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let playbook = grifo_core::playbook::Playbook::load(&root, &slug)?;
        Ok::<_, grifo_core::GrifoError>(serde_json::to_value(&playbook)?)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct ImportBody {
    pub csv: String,
    #[serde(default)]
    pub coefficient: Option<f64>,
}

/// POST /api/obras/:slug/playbook/import — import a budget CSV.
///
/// Falls back to the project's configured coefficient when the body
/// does not pick one.
pub async fn import_playbook(
    State(app): State<AppState>,
    Path(slug): Path<String>,
    Json(body): Json<ImportBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let coefficient = match body.coefficient {
            Some(c) => c,
            None => grifo_core::config::Config::load(&root)?.coefficient(),
        };
        let playbook =
            grifo_core::playbook::Playbook::import(&root, &slug, &body.csv, coefficient)?;
        grifo_core::state::State::mark_changed(&root)?;

        Ok::<_, grifo_core::GrifoError>(serde_json::json!({
            "obra": playbook.obra,
            "items": playbook.items.len(),
            "coefficient": playbook.coefficient,
            "grand_total": playbook.grand_total,
            "grand_total_meta": playbook.grand_total_meta,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct CoefficientBody {
    pub coefficient: f64,
}

/// PUT /api/obras/:slug/playbook/coefficient — re-project target totals.
pub async fn set_coefficient(
    State(app): State<AppState>,
    Path(slug): Path<String>,
    Json(body): Json<CoefficientBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut playbook = grifo_core::playbook::Playbook::load(&root, &slug)?;
        playbook.set_coefficient(body.coefficient)?;
        playbook.save(&root)?;
        grifo_core::state::State::mark_changed(&root)?;

        Ok::<_, grifo_core::GrifoError>(serde_json::json!({
            "obra": playbook.obra,
            "coefficient": playbook.coefficient,
            "grand_total": playbook.grand_total,
            "grand_total_meta": playbook.grand_total_meta,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
