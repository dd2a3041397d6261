use crate::error::{GrifoError, Result};
use crate::paths;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A dated obra event: deliveries, inspections, concrete pours.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgendaEvent {
    pub id: String,
    pub obra: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub date: NaiveDate,
    /// Optional "HH:MM"; undated-time events sort before timed ones.
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub done: bool,
    pub created_at: DateTime<Utc>,
}

impl AgendaEvent {
    pub fn create(
        root: &Path,
        obra: &str,
        title: impl Into<String>,
        description: Option<String>,
        date: NaiveDate,
        time: Option<String>,
    ) -> Result<Self> {
        crate::obra::Obra::load(root, obra)?;
        let event = Self {
            id: uuid::Uuid::new_v4().to_string(),
            obra: obra.to_string(),
            title: title.into(),
            description,
            date,
            time,
            done: false,
            created_at: Utc::now(),
        };
        event.save(root)?;
        Ok(event)
    }

    pub fn load(root: &Path, obra: &str, id: &str) -> Result<Self> {
        let path = paths::agenda_event_path(root, obra, id);
        if !path.exists() {
            return Err(GrifoError::AgendaEventNotFound(id.to_string()));
        }
        let data = std::fs::read_to_string(&path)?;
        let event: AgendaEvent = serde_yaml::from_str(&data)?;
        Ok(event)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::agenda_event_path(root, &self.obra, &self.id);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// All events for an obra, sorted by (date, time).
    pub fn list(root: &Path, obra: &str) -> Result<Vec<Self>> {
        let dir = paths::agenda_dir(root, obra);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut events = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if let Some(id) = name.strip_suffix(".yaml") {
                events.push(Self::load(root, obra, id)?);
            }
        }
        events.sort_by(|a, b| (a.date, &a.time).cmp(&(b.date, &b.time)));
        Ok(events)
    }

    /// Events on or after `from`, not yet done.
    pub fn upcoming(root: &Path, obra: &str, from: NaiveDate) -> Result<Vec<Self>> {
        let events = Self::list(root, obra)?;
        Ok(events
            .into_iter()
            .filter(|e| e.date >= from && !e.done)
            .collect())
    }

    pub fn mark_done(&mut self) {
        self.done = true;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
