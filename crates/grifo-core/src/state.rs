use crate::error::{GrifoError, Result};
use crate::paths;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Project-wide registry in `.grifo/state.yaml`. The server watches this
/// file's mtime for its change feed, so every mutating command touches it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct State {
    #[serde(default = "default_version")]
    pub version: u32,
    pub project: String,
    #[serde(default)]
    pub obras: Vec<String>,
    pub last_updated: DateTime<Utc>,
}

fn default_version() -> u32 {
    1
}

impl State {
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            version: 1,
            project: project.into(),
            obras: Vec::new(),
            last_updated: Utc::now(),
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::state_path(root);
        if !path.exists() {
            return Err(GrifoError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let state: State = serde_yaml::from_str(&data)?;
        Ok(state)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::state_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// Register an obra slug. Idempotent.
    pub fn add_obra(&mut self, slug: &str) {
        if !self.obras.contains(&slug.to_string()) {
            self.obras.push(slug.to_string());
        }
        self.last_updated = Utc::now();
    }

    /// Bump `last_updated` so file watchers pick up the change.
    pub fn touch(&mut self) {
        self.last_updated = Utc::now();
    }

    /// Load-touch-save in one step; used by mutating commands.
    pub fn mark_changed(root: &Path) -> Result<()> {
        let mut state = Self::load(root)?;
        state.touch();
        state.save(root)
    }
}

/// Initialize the `.grifo/` layout under `root`. Returns false if the
/// project was already initialized; existing files are never overwritten.
pub fn init(root: &Path, project: &str) -> Result<bool> {
    crate::io::ensure_dir(&root.join(paths::OBRAS_DIR))?;
    crate::io::ensure_dir(&root.join(paths::PARTNERS_DIR))?;
    crate::io::ensure_dir(&root.join(paths::PROFILES_DIR))?;

    let config = crate::config::Config::new(project);
    let config_data = serde_yaml::to_string(&config)?;
    crate::io::write_if_missing(&paths::config_path(root), config_data.as_bytes())?;

    let state = State::new(project);
    let state_data = serde_yaml::to_string(&state)?;
    crate::io::write_if_missing(&paths::state_path(root), state_data.as_bytes())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
