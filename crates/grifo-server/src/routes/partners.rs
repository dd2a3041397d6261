use axum::extract::{Path, Query, State};
use axum::Json;
use std::str::FromStr;

use crate::error::AppError;
use crate::state::AppState;
use grifo_core::marketplace::{Partner, PartnerCategory};

#[derive(serde::Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub category: Option<String>,
}

/// GET /api/partners — registered partners, optionally filtered by category.
pub async fn list_partners(
    State(app): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let category = query
            .category
            .as_deref()
            .map(PartnerCategory::from_str)
            .transpose()?;
        let partners = Partner::list(&root, category)?;
        Ok::<_, grifo_core::GrifoError>(serde_json::to_value(&partners)?)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct CreatePartnerBody {
    pub slug: String,
    pub name: String,
    pub category: String,
}

/// POST /api/partners — register a partner.
pub async fn create_partner(
    State(app): State<AppState>,
    Json(body): Json<CreatePartnerBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let category = PartnerCategory::from_str(&body.category)?;
        let partner = Partner::create(&root, body.slug, body.name, category)?;
        grifo_core::state::State::mark_changed(&root)?;
        Ok::<_, grifo_core::GrifoError>(serde_json::to_value(&partner)?)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct RateBody {
    pub rating: u8,
}

/// POST /api/partners/:slug/rate — rate a partner 1..=5.
pub async fn rate_partner(
    State(app): State<AppState>,
    Path(slug): Path<String>,
    Json(body): Json<RateBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut partner = Partner::load(&root, &slug)?;
        partner.rate(body.rating)?;
        partner.save(&root)?;
        grifo_core::state::State::mark_changed(&root)?;
        Ok::<_, grifo_core::GrifoError>(serde_json::json!({
            "slug": partner.slug,
            "rating": partner.rating,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
