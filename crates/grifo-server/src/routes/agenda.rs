use axum::extract::{Path, State};
use axum::Json;
use chrono::NaiveDate;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/obras/:slug/agenda — events sorted by date then time.
pub async fn list_events(
    State(app): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        grifo_core::obra::Obra::load(&root, &slug)?;
        let events = grifo_core::agenda::AgendaEvent::list(&root, &slug)?;
        Ok::<_, grifo_core::GrifoError>(serde_json::to_value(&events)?)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct AddEventBody {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub date: String,
    #[serde(default)]
    pub time: Option<String>,
}

/// POST /api/obras/:slug/agenda — schedule an event.
pub async fn add_event(
    State(app): State<AppState>,
    Path(slug): Path<String>,
    Json(body): Json<AddEventBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let date = parse_date(&body.date)?;
        let event = grifo_core::agenda::AgendaEvent::create(
            &root,
            &slug,
            body.title,
            body.description,
            date,
            body.time,
        )?;
        grifo_core::state::State::mark_changed(&root)?;
        Ok::<_, grifo_core::GrifoError>(serde_json::to_value(&event)?)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// POST /api/obras/:slug/agenda/:id/done — mark an event done.
pub async fn mark_done(
    State(app): State<AppState>,
    Path((slug, id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut event = grifo_core::agenda::AgendaEvent::load(&root, &slug, &id)?;
        event.mark_done();
        event.save(&root)?;
        grifo_core::state::State::mark_changed(&root)?;
        Ok::<_, grifo_core::GrifoError>(serde_json::json!({
            "id": event.id,
            "done": event.done,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// GET /api/obras/:slug/diary/:date — the diary for one calendar day.
pub async fn get_diary(
    State(app): State<AppState>,
    Path((slug, date)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let date = parse_date(&date)?;
        let diary = grifo_core::report::diary_report(&root, &slug, date)?;
        Ok::<_, grifo_core::GrifoError>(serde_json::to_value(&diary)?)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

fn parse_date(s: &str) -> grifo_core::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| grifo_core::GrifoError::InvalidDate(s.to_string()))
}
