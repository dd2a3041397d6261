use crate::error::{GrifoError, Result};
use crate::paths;
use crate::week::WeekPlan;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Points granted per fully completed task when a week is awarded.
pub const POINTS_PER_COMPLETED_TASK: u32 = 10;

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// An executor's gamification profile, keyed by the executor slug used in
/// weekly tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub slug: String,
    pub name: String,
    pub points: u32,
    pub completed_tasks: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(slug: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            slug: slug.into(),
            name: name.into(),
            points: 0,
            completed_tasks: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn load(root: &Path, slug: &str) -> Result<Self> {
        let path = paths::profile_path(root, slug);
        if !path.exists() {
            return Err(GrifoError::ProfileNotFound(slug.to_string()));
        }
        let data = std::fs::read_to_string(&path)?;
        let profile: Profile = serde_yaml::from_str(&data)?;
        Ok(profile)
    }

    /// Load a profile, creating an empty one when missing.
    pub fn load_or_new(root: &Path, slug: &str) -> Result<Self> {
        match Self::load(root, slug) {
            Ok(p) => Ok(p),
            Err(GrifoError::ProfileNotFound(_)) => Ok(Self::new(slug, slug)),
            Err(e) => Err(e),
        }
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::profile_path(root, &self.slug);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let dir = root.join(paths::PROFILES_DIR);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut profiles = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if let Some(slug) = name.strip_suffix(".yaml") {
                profiles.push(Self::load(root, slug)?);
            }
        }
        profiles.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(profiles)
    }

    pub fn award(&mut self, points: u32, completed: u32) {
        self.points += points;
        self.completed_tasks += completed;
        self.updated_at = Utc::now();
    }
}

// ---------------------------------------------------------------------------
// Week awards
// ---------------------------------------------------------------------------

/// One executor's share of a weekly award.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekAward {
    pub executor: String,
    pub completed_tasks: u32,
    pub points: u32,
}

/// Award points for a closed week: each executor gets
/// `POINTS_PER_COMPLETED_TASK` per fully completed task. Profiles are
/// created on first award. Returns the per-executor breakdown.
pub fn award_week(root: &Path, plan: &WeekPlan) -> Result<Vec<WeekAward>> {
    let mut by_executor: std::collections::BTreeMap<String, u32> = std::collections::BTreeMap::new();
    for task in plan.tasks.iter().filter(|t| t.is_fully_completed()) {
        *by_executor.entry(task.executor.clone()).or_default() += 1;
    }

    let mut awards = Vec::new();
    for (executor, completed) in by_executor {
        let points = completed * POINTS_PER_COMPLETED_TASK;
        let mut profile = Profile::load_or_new(root, &executor)?;
        profile.award(points, completed);
        profile.save(root)?;
        awards.push(WeekAward {
            executor,
            completed_tasks: completed,
            points,
        });
    }
    Ok(awards)
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankEntry {
    pub position: usize,
    pub slug: String,
    pub name: String,
    pub points: u32,
    pub completed_tasks: u32,
}

/// Standard competition ranking: points descending, ties share the smaller
/// position, ties ordered by name for determinism.
pub fn ranking(profiles: &[Profile]) -> Vec<RankEntry> {
    let mut sorted: Vec<&Profile> = profiles.iter().collect();
    sorted.sort_by(|a, b| b.points.cmp(&a.points).then(a.name.cmp(&b.name)));

    let mut entries = Vec::with_capacity(sorted.len());
    let mut position = 0;
    let mut last_points = None;
    for (i, p) in sorted.iter().enumerate() {
        if last_points != Some(p.points) {
            position = i + 1;
            last_points = Some(p.points);
        }
        entries.push(RankEntry {
            position,
            slug: p.slug.clone(),
            name: p.name.clone(),
            points: p.points,
            completed_tasks: p.completed_tasks,
        });
    }
    entries
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
