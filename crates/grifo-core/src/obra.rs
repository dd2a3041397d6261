use crate::error::{GrifoError, Result};
use crate::paths;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

// ---------------------------------------------------------------------------
// ObraStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObraStatus {
    Active,
    Finished,
    Archived,
}

impl fmt::Display for ObraStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ObraStatus::Active => "active",
            ObraStatus::Finished => "finished",
            ObraStatus::Archived => "archived",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Obra
// ---------------------------------------------------------------------------

/// A construction site/project: the tenancy unit for all plans, playbooks,
/// agenda events, and checklists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obra {
    pub slug: String,
    pub name: String,
    pub address: Option<String>,
    pub responsible: Option<String>,
    pub status: ObraStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub archived_at: Option<DateTime<Utc>>,
}

impl Obra {
    pub fn new(slug: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            slug: slug.into(),
            name: name.into(),
            address: None,
            responsible: None,
            status: ObraStatus::Active,
            created_at: now,
            updated_at: now,
            finished_at: None,
            archived_at: None,
        }
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    pub fn create(root: &Path, slug: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let slug = slug.into();
        paths::validate_slug(&slug)?;

        let dir = paths::obra_dir(root, &slug);
        if dir.exists() {
            return Err(GrifoError::ObraExists(slug));
        }

        let obra = Self::new(slug, name);
        obra.save(root)?;
        Ok(obra)
    }

    pub fn load(root: &Path, slug: &str) -> Result<Self> {
        let manifest = paths::obra_manifest(root, slug);
        if !manifest.exists() {
            return Err(GrifoError::ObraNotFound(slug.to_string()));
        }
        let data = std::fs::read_to_string(&manifest)?;
        let obra: Obra = serde_yaml::from_str(&data)?;
        Ok(obra)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let manifest = paths::obra_manifest(root, &self.slug);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&manifest, data.as_bytes())
    }

    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let obras_dir = root.join(paths::OBRAS_DIR);
        if !obras_dir.exists() {
            return Ok(Vec::new());
        }

        let mut obras = Vec::new();
        for entry in std::fs::read_dir(&obras_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                let slug = entry.file_name().to_string_lossy().into_owned();
                match Self::load(root, &slug) {
                    Ok(o) => obras.push(o),
                    Err(GrifoError::ObraNotFound(_)) => {}
                    Err(e) => return Err(e),
                }
            }
        }
        obras.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(obras)
    }

    // ---------------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------------

    pub fn finish(&mut self) {
        self.status = ObraStatus::Finished;
        self.finished_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }

    pub fn archive(&mut self) {
        self.status = ObraStatus::Archived;
        self.archived_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
