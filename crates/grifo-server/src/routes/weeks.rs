use axum::extract::{Path, State};
use axum::Json;
use std::str::FromStr;

use crate::error::AppError;
use crate::state::AppState;
use grifo_core::types::{DayStatus, Weekday};

/// GET /api/obras/:slug/weeks — ISO week labels with stored plans.
pub async fn list_weeks(
    State(app): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        grifo_core::obra::Obra::load(&root, &slug)?;
        let weeks = grifo_core::week::WeekPlan::list_weeks(&root, &slug)?;
        Ok::<_, grifo_core::GrifoError>(serde_json::json!(weeks))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct CreateWeekBody {
    pub week: String,
}

/// POST /api/obras/:slug/weeks — create an empty week plan.
pub async fn create_week(
    State(app): State<AppState>,
    Path(slug): Path<String>,
    Json(body): Json<CreateWeekBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let plan = grifo_core::week::WeekPlan::create(&root, &slug, &body.week)?;
        grifo_core::state::State::mark_changed(&root)?;
        Ok::<_, grifo_core::GrifoError>(serde_json::json!({
            "obra": plan.obra,
            "week": plan.week,
            "tasks": plan.tasks.len(),
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// GET /api/obras/:slug/weeks/:week — the full week plan.
pub async fn get_week(
    State(app): State<AppState>,
    Path((slug, week)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let plan = grifo_core::week::WeekPlan::load(&root, &slug, &week)?;
        Ok::<_, grifo_core::GrifoError>(serde_json::to_value(&plan)?)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct AddTaskBody {
    pub sector: String,
    pub description: String,
    #[serde(default)]
    pub discipline: String,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub responsible: String,
    #[serde(default)]
    pub executor: String,
    pub planned_days: Vec<String>,
}

/// POST /api/obras/:slug/weeks/:week/tasks — add a task to the plan.
pub async fn add_task(
    State(app): State<AppState>,
    Path((slug, week)): Path<(String, String)>,
    Json(body): Json<AddTaskBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let planned_days = body
            .planned_days
            .iter()
            .map(|d| Weekday::from_str(d))
            .collect::<grifo_core::Result<Vec<Weekday>>>()?;

        let mut plan = grifo_core::week::WeekPlan::load(&root, &slug, &week)?;
        let id = grifo_core::task::add_task(
            &mut plan.tasks,
            grifo_core::task::TaskSpec {
                sector: body.sector,
                description: body.description,
                discipline: body.discipline,
                team: body.team,
                responsible: body.responsible,
                executor: body.executor,
                planned_days,
            },
        );
        plan.save(&root)?;
        grifo_core::state::State::mark_changed(&root)?;

        Ok::<_, grifo_core::GrifoError>(serde_json::json!({
            "id": id,
            "week": plan.week,
            "tasks": plan.tasks.len(),
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct CheckDayBody {
    pub day: String,
    pub status: String,
    #[serde(default)]
    pub cause: Option<String>,
}

/// POST /api/obras/:slug/weeks/:week/tasks/:id/check — daily check-off.
pub async fn check_task_day(
    State(app): State<AppState>,
    Path((slug, week, id)): Path<(String, String, String)>,
    Json(body): Json<CheckDayBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let day = Weekday::from_str(&body.day)?;
        let status = DayStatus::from_str(&body.status)?;

        let mut plan = grifo_core::week::WeekPlan::load(&root, &slug, &week)?;
        grifo_core::task::check_day(&mut plan.tasks, &id, day, status, body.cause)?;
        plan.save(&root)?;
        grifo_core::state::State::mark_changed(&root)?;

        let task = plan.tasks.iter().find(|t| t.id == id);
        Ok::<_, grifo_core::GrifoError>(serde_json::json!({
            "id": id,
            "day": day.as_str(),
            "status": status.as_str(),
            "fully_completed": task.is_some_and(|t| t.is_fully_completed()),
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// GET /api/obras/:slug/weeks/:week/pcp — the weekly PCP breakdown.
pub async fn get_pcp(
    State(app): State<AppState>,
    Path((slug, week)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let plan = grifo_core::week::WeekPlan::load(&root, &slug, &week)?;
        let report = grifo_core::pcp::calculate_pcp(&plan.tasks);
        Ok::<_, grifo_core::GrifoError>(serde_json::to_value(&report)?)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// GET /api/obras/:slug/weeks/:week/report — the weekly production report.
pub async fn get_weekly_report(
    State(app): State<AppState>,
    Path((slug, week)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let report = grifo_core::report::weekly_report(&root, &slug, &week)?;
        Ok::<_, grifo_core::GrifoError>(serde_json::to_value(&report)?)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
