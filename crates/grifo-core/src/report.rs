use crate::agenda::AgendaEvent;
use crate::config::Config;
use crate::error::Result;
use crate::pcp::{calculate_pcp, PcpReport};
use crate::types::{DayStatus, Weekday};
use crate::week::WeekPlan;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// WeeklyReport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotDoneEntry {
    pub task_id: String,
    pub description: String,
    pub sector: String,
    pub cause: Option<String>,
}

/// Weekly production-control report: the PCP numbers against the configured
/// goal, plus every task that missed a planned day and why.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyReport {
    pub obra: String,
    pub week: String,
    pub pcp: PcpReport,
    pub goal_percentage: f64,
    pub goal_met: bool,
    pub not_done: Vec<NotDoneEntry>,
    pub generated_at: DateTime<Utc>,
}

pub fn weekly_report(root: &Path, obra: &str, week: &str) -> Result<WeeklyReport> {
    let config = Config::load(root)?;
    let plan = WeekPlan::load(root, obra, week)?;
    let pcp = calculate_pcp(&plan.tasks);

    let not_done = plan
        .tasks
        .iter()
        .filter(|t| t.days.values().any(|s| *s == DayStatus::NotDone))
        .map(|t| NotDoneEntry {
            task_id: t.id.clone(),
            description: t.description.clone(),
            sector: t.sector.clone(),
            cause: t.cause.clone(),
        })
        .collect();

    let goal = config.pcp.goal_percentage;
    Ok(WeeklyReport {
        obra: obra.to_string(),
        week: week.to_string(),
        goal_met: pcp.overall.percentage >= goal,
        pcp,
        goal_percentage: goal,
        not_done,
        generated_at: Utc::now(),
    })
}

// ---------------------------------------------------------------------------
// DiaryReport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiaryEntry {
    pub task_id: String,
    pub description: String,
    pub sector: String,
    pub status: DayStatus,
}

/// Diary of work for one calendar day: the tasks touched on that day's
/// weekday plus the day's agenda events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiaryReport {
    pub obra: String,
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub tasks_worked: Vec<DiaryEntry>,
    pub events: Vec<AgendaEvent>,
    pub generated_at: DateTime<Utc>,
}

/// Build the diary from the week plan containing `date`. A day with no
/// stored plan yields an empty diary rather than an error.
pub fn diary_report(root: &Path, obra: &str, date: NaiveDate) -> Result<DiaryReport> {
    let weekday = Weekday::from_date(date);
    let week = iso_week_label(date);

    let tasks_worked = match WeekPlan::load(root, obra, &week) {
        Ok(plan) => plan
            .tasks
            .iter()
            .filter_map(|t| {
                let status = *t.days.get(&weekday)?;
                matches!(status, DayStatus::Completed | DayStatus::NotDone).then(|| DiaryEntry {
                    task_id: t.id.clone(),
                    description: t.description.clone(),
                    sector: t.sector.clone(),
                    status,
                })
            })
            .collect(),
        Err(crate::error::GrifoError::WeekNotFound(_)) => Vec::new(),
        Err(e) => return Err(e),
    };

    let events = AgendaEvent::list(root, obra)?
        .into_iter()
        .filter(|e| e.date == date)
        .collect();

    Ok(DiaryReport {
        obra: obra.to_string(),
        date,
        weekday,
        tasks_worked,
        events,
        generated_at: Utc::now(),
    })
}

/// ISO week label ("2026-W35") for a calendar date.
pub fn iso_week_label(date: NaiveDate) -> String {
    use chrono::Datelike;
    let iso = date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
