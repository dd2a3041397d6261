use crate::error::{GrifoError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const GRIFO_DIR: &str = ".grifo";
pub const OBRAS_DIR: &str = ".grifo/obras";
pub const PARTNERS_DIR: &str = ".grifo/partners";
pub const PROFILES_DIR: &str = ".grifo/profiles";

pub const CONFIG_FILE: &str = ".grifo/config.yaml";
pub const STATE_FILE: &str = ".grifo/state.yaml";

pub const MANIFEST_FILE: &str = "manifest.yaml";
pub const PLAYBOOK_FILE: &str = "playbook.yaml";
pub const WEEKS_DIR: &str = "weeks";
pub const AGENDA_DIR: &str = "agenda";
pub const CHECKLISTS_DIR: &str = "checklists";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn grifo_dir(root: &Path) -> PathBuf {
    root.join(GRIFO_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn state_path(root: &Path) -> PathBuf {
    root.join(STATE_FILE)
}

pub fn obra_dir(root: &Path, slug: &str) -> PathBuf {
    root.join(OBRAS_DIR).join(slug)
}

pub fn obra_manifest(root: &Path, slug: &str) -> PathBuf {
    obra_dir(root, slug).join(MANIFEST_FILE)
}

pub fn week_path(root: &Path, slug: &str, week: &str) -> PathBuf {
    obra_dir(root, slug).join(WEEKS_DIR).join(format!("{week}.yaml"))
}

pub fn weeks_dir(root: &Path, slug: &str) -> PathBuf {
    obra_dir(root, slug).join(WEEKS_DIR)
}

pub fn playbook_path(root: &Path, slug: &str) -> PathBuf {
    obra_dir(root, slug).join(PLAYBOOK_FILE)
}

pub fn agenda_dir(root: &Path, slug: &str) -> PathBuf {
    obra_dir(root, slug).join(AGENDA_DIR)
}

pub fn agenda_event_path(root: &Path, slug: &str, id: &str) -> PathBuf {
    agenda_dir(root, slug).join(format!("{id}.yaml"))
}

pub fn checklists_dir(root: &Path, slug: &str) -> PathBuf {
    obra_dir(root, slug).join(CHECKLISTS_DIR)
}

pub fn checklist_path(root: &Path, slug: &str, id: &str) -> PathBuf {
    checklists_dir(root, slug).join(format!("{id}.yaml"))
}

pub fn partner_path(root: &Path, slug: &str) -> PathBuf {
    root.join(PARTNERS_DIR).join(format!("{slug}.yaml"))
}

pub fn profile_path(root: &Path, slug: &str) -> PathBuf {
    root.join(PROFILES_DIR).join(format!("{slug}.yaml"))
}

// ---------------------------------------------------------------------------
// Slug and week validation
// ---------------------------------------------------------------------------

static SLUG_RE: OnceLock<Regex> = OnceLock::new();
static WEEK_RE: OnceLock<Regex> = OnceLock::new();

fn slug_re() -> &'static Regex {
    SLUG_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").unwrap())
}

fn week_re() -> &'static Regex {
    WEEK_RE.get_or_init(|| Regex::new(r"^\d{4}-W(0[1-9]|[1-4]\d|5[0-3])$").unwrap())
}

pub fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() || slug.len() > 64 || !slug_re().is_match(slug) {
        return Err(GrifoError::InvalidSlug(slug.to_string()));
    }
    Ok(())
}

/// Validate an ISO week label like "2026-W35".
pub fn validate_week(week: &str) -> Result<()> {
    if !week_re().is_match(week) {
        return Err(GrifoError::InvalidWeek(week.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
