use crate::error::{GrifoError, Result};
use crate::paths;
use crate::pcp::PcpData;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    pub description: String,
    pub done: bool,
    pub done_at: Option<DateTime<Utc>>,
}

/// A per-obra checklist (site inspections, deliverables, safety rounds).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checklist {
    pub id: String,
    pub obra: String,
    pub title: String,
    pub items: Vec<ChecklistItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Checklist {
    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    pub fn create(root: &Path, obra: &str, title: impl Into<String>) -> Result<Self> {
        crate::obra::Obra::load(root, obra)?;
        let now = Utc::now();
        let checklist = Self {
            id: uuid::Uuid::new_v4().to_string(),
            obra: obra.to_string(),
            title: title.into(),
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        checklist.save(root)?;
        Ok(checklist)
    }

    pub fn load(root: &Path, obra: &str, id: &str) -> Result<Self> {
        let path = paths::checklist_path(root, obra, id);
        if !path.exists() {
            return Err(GrifoError::ChecklistNotFound(id.to_string()));
        }
        let data = std::fs::read_to_string(&path)?;
        let checklist: Checklist = serde_yaml::from_str(&data)?;
        Ok(checklist)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::checklist_path(root, &self.obra, &self.id);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn list(root: &Path, obra: &str) -> Result<Vec<Self>> {
        let dir = paths::checklists_dir(root, obra);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut checklists = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if let Some(id) = name.strip_suffix(".yaml") {
                checklists.push(Self::load(root, obra, id)?);
            }
        }
        checklists.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(checklists)
    }

    // ---------------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------------

    pub fn add_item(&mut self, description: impl Into<String>) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.items.push(ChecklistItem {
            id: id.clone(),
            description: description.into(),
            done: false,
            done_at: None,
        });
        self.updated_at = Utc::now();
        id
    }

    pub fn check_item(&mut self, item_id: &str) -> Result<()> {
        let item = self.find_mut(item_id)?;
        item.done = true;
        item.done_at = Some(Utc::now());
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn uncheck_item(&mut self, item_id: &str) -> Result<()> {
        let item = self.find_mut(item_id)?;
        item.done = false;
        item.done_at = None;
        self.updated_at = Utc::now();
        Ok(())
    }

    fn find_mut(&mut self, item_id: &str) -> Result<&mut ChecklistItem> {
        self.items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| GrifoError::ChecklistItemNotFound(item_id.to_string()))
    }

    /// Completion ratio in the same shape PCP uses.
    pub fn progress(&self) -> PcpData {
        let total = self.items.len();
        let done = self.items.iter().filter(|i| i.done).count();
        PcpData {
            completed_tasks: done,
            total_tasks: total,
            percentage: if total == 0 {
                0.0
            } else {
                done as f64 / total as f64 * 100.0
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup(dir: &TempDir) {
        std::fs::create_dir_all(dir.path().join(".grifo/obras")).unwrap();
        crate::obra::Obra::create(dir.path(), "torre", "Torre").unwrap();
    }

    #[test]
    fn create_add_check_roundtrip() {
        let dir = TempDir::new().unwrap();
        setup(&dir);

        let mut cl = Checklist::create(dir.path(), "torre", "Inspecao semanal").unwrap();
        let a = cl.add_item("Verificar andaimes");
        cl.add_item("Conferir EPI");
        cl.check_item(&a).unwrap();
        cl.save(dir.path()).unwrap();

        let loaded = Checklist::load(dir.path(), "torre", &cl.id).unwrap();
        assert_eq!(loaded.items.len(), 2);
        assert!(loaded.items[0].done);
        assert!(loaded.items[0].done_at.is_some());
        assert!(!loaded.items[1].done);
    }

    #[test]
    fn uncheck_clears_done_at() {
        let dir = TempDir::new().unwrap();
        setup(&dir);

        let mut cl = Checklist::create(dir.path(), "torre", "Seguranca").unwrap();
        let a = cl.add_item("Sinalizar acesso");
        cl.check_item(&a).unwrap();
        cl.uncheck_item(&a).unwrap();
        assert!(!cl.items[0].done);
        assert!(cl.items[0].done_at.is_none());
    }

    #[test]
    fn unknown_item_errors() {
        let dir = TempDir::new().unwrap();
        setup(&dir);

        let mut cl = Checklist::create(dir.path(), "torre", "Seguranca").unwrap();
        assert!(matches!(
            cl.check_item("ghost"),
            Err(GrifoError::ChecklistItemNotFound(_))
        ));
    }

    #[test]
    fn progress_ratio() {
        let dir = TempDir::new().unwrap();
        setup(&dir);

        let mut cl = Checklist::create(dir.path(), "torre", "Entrega").unwrap();
        assert_eq!(cl.progress().percentage, 0.0);

        let a = cl.add_item("Item 1");
        cl.add_item("Item 2");
        cl.check_item(&a).unwrap();

        let p = cl.progress();
        assert_eq!(p.completed_tasks, 1);
        assert_eq!(p.total_tasks, 2);
        assert_eq!(p.percentage, 50.0);
    }

    #[test]
    fn list_per_obra() {
        let dir = TempDir::new().unwrap();
        setup(&dir);

        Checklist::create(dir.path(), "torre", "A").unwrap();
        Checklist::create(dir.path(), "torre", "B").unwrap();
        let all = Checklist::list(dir.path(), "torre").unwrap();
        assert_eq!(all.len(), 2);
    }
}
