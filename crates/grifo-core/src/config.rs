use crate::error::{GrifoError, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// PcpConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PcpConfig {
    /// Weekly completion goal used by reports, in percent.
    #[serde(default = "default_goal")]
    pub goal_percentage: f64,
}

fn default_goal() -> f64 {
    80.0
}

impl Default for PcpConfig {
    fn default() -> Self {
        Self {
            goal_percentage: default_goal(),
        }
    }
}

// ---------------------------------------------------------------------------
// CoefficientConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoefficientChoice {
    First,
    Second,
}

/// The playbook "target" coefficient: two stored alternatives, one selected.
/// Leaf costs are scaled by the active value to project target costs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoefficientConfig {
    #[serde(default = "default_alternatives")]
    pub alternatives: [f64; 2],
    #[serde(default = "default_choice")]
    pub selected: CoefficientChoice,
}

fn default_alternatives() -> [f64; 2] {
    [1.0, 0.85]
}

fn default_choice() -> CoefficientChoice {
    CoefficientChoice::First
}

impl Default for CoefficientConfig {
    fn default() -> Self {
        Self {
            alternatives: default_alternatives(),
            selected: default_choice(),
        }
    }
}

impl CoefficientConfig {
    pub fn active(&self) -> f64 {
        match self.selected {
            CoefficientChoice::First => self.alternatives[0],
            CoefficientChoice::Second => self.alternatives[1],
        }
    }
}

// ---------------------------------------------------------------------------
// ProjectConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    pub project: ProjectConfig,
    #[serde(default)]
    pub pcp: PcpConfig,
    #[serde(default)]
    pub coefficients: CoefficientConfig,
}

fn default_version() -> u32 {
    1
}

impl Config {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            version: 1,
            project: ProjectConfig {
                name: project_name.into(),
                description: None,
            },
            pcp: PcpConfig::default(),
            coefficients: CoefficientConfig::default(),
        }
    }

    /// The active playbook coefficient.
    pub fn coefficient(&self) -> f64 {
        self.coefficients.active()
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(GrifoError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        for (i, &c) in self.coefficients.alternatives.iter().enumerate() {
            if c <= 0.0 {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("coefficient alternative {} is {c} (must be > 0)", i + 1),
                });
            } else if c > 2.0 {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("coefficient alternative {} is {c} (>2.0 is unusual)", i + 1),
                });
            }
        }

        if !(0.0..=100.0).contains(&self.pcp.goal_percentage) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "pcp goal_percentage {} is outside 0..=100",
                    self.pcp.goal_percentage
                ),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::new("torre-norte");
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.project.name, "torre-norte");
        assert_eq!(parsed.version, 1);
        assert_eq!(parsed.coefficient(), 1.0);
        assert_eq!(parsed.pcp.goal_percentage, 80.0);
    }

    #[test]
    fn coefficient_selection() {
        let mut cfg = Config::new("test");
        cfg.coefficients.alternatives = [1.0, 0.5];
        assert_eq!(cfg.coefficient(), 1.0);
        cfg.coefficients.selected = CoefficientChoice::Second;
        assert_eq!(cfg.coefficient(), 0.5);
    }

    #[test]
    fn config_without_new_sections_backward_compat() {
        // A config.yaml without pcp/coefficients keys must still deserialize
        let yaml = "version: 1\nproject:\n  name: my-obra\n";
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.pcp.goal_percentage, 80.0);
        assert_eq!(cfg.coefficient(), 1.0);
    }

    #[test]
    fn validate_valid_config_no_warnings() {
        let cfg = Config::new("test");
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn validate_nonpositive_coefficient() {
        let mut cfg = Config::new("test");
        cfg.coefficients.alternatives = [0.0, 0.85];
        let warnings = cfg.validate();
        assert!(warnings
            .iter()
            .any(|w| w.level == WarnLevel::Error && w.message.contains("must be > 0")));
    }

    #[test]
    fn validate_large_coefficient_warns() {
        let mut cfg = Config::new("test");
        cfg.coefficients.alternatives = [1.0, 2.5];
        let warnings = cfg.validate();
        assert!(warnings
            .iter()
            .any(|w| w.level == WarnLevel::Warning && w.message.contains(">2.0 is unusual")));
    }

    #[test]
    fn validate_goal_out_of_range() {
        let mut cfg = Config::new("test");
        cfg.pcp.goal_percentage = 120.0;
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| w.message.contains("outside 0..=100")));
    }

    #[test]
    fn load_missing_is_not_initialized() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(matches!(
            Config::load(dir.path()),
            Err(GrifoError::NotInitialized)
        ));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut cfg = Config::new("canteiro");
        cfg.coefficients.selected = CoefficientChoice::Second;
        cfg.save(dir.path()).unwrap();

        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded.project.name, "canteiro");
        assert_eq!(loaded.coefficients.selected, CoefficientChoice::Second);
    }
}
