use crate::error::{GrifoError, Result};
use crate::paths;
use crate::task::Task;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The weekly production plan for one obra: the task list being checked off
/// during an ISO week (e.g. "2026-W35").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekPlan {
    pub week: String,
    pub obra: String,
    pub tasks: Vec<Task>,
    pub updated_at: DateTime<Utc>,
}

impl WeekPlan {
    pub fn new(obra: impl Into<String>, week: impl Into<String>) -> Self {
        Self {
            week: week.into(),
            obra: obra.into(),
            tasks: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    pub fn create(root: &Path, obra: &str, week: &str) -> Result<Self> {
        paths::validate_week(week)?;
        crate::obra::Obra::load(root, obra)?;

        let path = paths::week_path(root, obra, week);
        if path.exists() {
            return Err(GrifoError::WeekExists(week.to_string()));
        }

        let plan = Self::new(obra, week);
        plan.save(root)?;
        Ok(plan)
    }

    pub fn load(root: &Path, obra: &str, week: &str) -> Result<Self> {
        let path = paths::week_path(root, obra, week);
        if !path.exists() {
            return Err(GrifoError::WeekNotFound(format!("{obra}/{week}")));
        }
        let data = std::fs::read_to_string(&path)?;
        let plan: WeekPlan = serde_yaml::from_str(&data)?;
        Ok(plan)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::week_path(root, &self.obra, &self.week);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// Week labels with a stored plan for this obra, sorted ascending.
    /// The label format sorts lexicographically in calendar order.
    pub fn list_weeks(root: &Path, obra: &str) -> Result<Vec<String>> {
        let dir = paths::weeks_dir(root, obra);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut weeks = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if let Some(week) = name.strip_suffix(".yaml") {
                if paths::validate_week(week).is_ok() {
                    weeks.push(week.to_string());
                }
            }
        }
        weeks.sort();
        Ok(weeks)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
