use crate::error::{GrifoError, Result};
use crate::paths;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

// ---------------------------------------------------------------------------
// PartnerCategory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartnerCategory {
    Materials,
    Equipment,
    Workforce,
    Services,
}

impl PartnerCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            PartnerCategory::Materials => "materials",
            PartnerCategory::Equipment => "equipment",
            PartnerCategory::Workforce => "workforce",
            PartnerCategory::Services => "services",
        }
    }
}

impl fmt::Display for PartnerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PartnerCategory {
    type Err = GrifoError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "materials" => Ok(PartnerCategory::Materials),
            "equipment" => Ok(PartnerCategory::Equipment),
            "workforce" => Ok(PartnerCategory::Workforce),
            "services" => Ok(PartnerCategory::Services),
            _ => Err(GrifoError::InvalidCategory(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Partner
// ---------------------------------------------------------------------------

/// A marketplace supplier/subcontractor, registered project-wide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partner {
    pub slug: String,
    pub name: String,
    pub category: PartnerCategory,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// 1..=5, set by `rate`.
    #[serde(default)]
    pub rating: Option<u8>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Partner {
    pub fn create(
        root: &Path,
        slug: impl Into<String>,
        name: impl Into<String>,
        category: PartnerCategory,
    ) -> Result<Self> {
        let slug = slug.into();
        paths::validate_slug(&slug)?;

        let path = paths::partner_path(root, &slug);
        if path.exists() {
            return Err(GrifoError::PartnerExists(slug));
        }

        let now = Utc::now();
        let partner = Self {
            slug,
            name: name.into(),
            category,
            contact: None,
            phone: None,
            rating: None,
            created_at: now,
            updated_at: now,
        };
        partner.save(root)?;
        Ok(partner)
    }

    pub fn load(root: &Path, slug: &str) -> Result<Self> {
        let path = paths::partner_path(root, slug);
        if !path.exists() {
            return Err(GrifoError::PartnerNotFound(slug.to_string()));
        }
        let data = std::fs::read_to_string(&path)?;
        let partner: Partner = serde_yaml::from_str(&data)?;
        Ok(partner)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::partner_path(root, &self.slug);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn list(root: &Path, category: Option<PartnerCategory>) -> Result<Vec<Self>> {
        let dir = root.join(paths::PARTNERS_DIR);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut partners = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if let Some(slug) = name.strip_suffix(".yaml") {
                let partner = Self::load(root, slug)?;
                if category.is_none_or(|c| partner.category == c) {
                    partners.push(partner);
                }
            }
        }
        partners.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(partners)
    }

    pub fn rate(&mut self, rating: u8) -> Result<()> {
        if !(1..=5).contains(&rating) {
            return Err(GrifoError::InvalidRating(rating));
        }
        self.rating = Some(rating);
        self.updated_at = Utc::now();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn create_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let p = Partner::create(
            dir.path(),
            "concreteira-sul",
            "Concreteira Sul",
            PartnerCategory::Materials,
        )
        .unwrap();
        assert!(p.rating.is_none());

        let loaded = Partner::load(dir.path(), "concreteira-sul").unwrap();
        assert_eq!(loaded.name, "Concreteira Sul");
        assert_eq!(loaded.category, PartnerCategory::Materials);
    }

    #[test]
    fn duplicate_fails() {
        let dir = TempDir::new().unwrap();
        Partner::create(dir.path(), "gruas-abc", "Gruas ABC", PartnerCategory::Equipment).unwrap();
        assert!(matches!(
            Partner::create(dir.path(), "gruas-abc", "Other", PartnerCategory::Equipment),
            Err(GrifoError::PartnerExists(_))
        ));
    }

    #[test]
    fn list_filters_by_category() {
        let dir = TempDir::new().unwrap();
        Partner::create(dir.path(), "a", "A", PartnerCategory::Materials).unwrap();
        Partner::create(dir.path(), "b", "B", PartnerCategory::Workforce).unwrap();

        let all = Partner::list(dir.path(), None).unwrap();
        assert_eq!(all.len(), 2);

        let workforce = Partner::list(dir.path(), Some(PartnerCategory::Workforce)).unwrap();
        assert_eq!(workforce.len(), 1);
        assert_eq!(workforce[0].slug, "b");
    }

    #[test]
    fn rate_validates_range() {
        let dir = TempDir::new().unwrap();
        let mut p =
            Partner::create(dir.path(), "a", "A", PartnerCategory::Services).unwrap();
        assert!(matches!(p.rate(0), Err(GrifoError::InvalidRating(0))));
        assert!(matches!(p.rate(6), Err(GrifoError::InvalidRating(6))));
        p.rate(4).unwrap();
        assert_eq!(p.rating, Some(4));
    }

    #[test]
    fn category_parse_roundtrip() {
        use std::str::FromStr;
        for cat in [
            PartnerCategory::Materials,
            PartnerCategory::Equipment,
            PartnerCategory::Workforce,
            PartnerCategory::Services,
        ] {
            assert_eq!(PartnerCategory::from_str(cat.as_str()).unwrap(), cat);
        }
        assert!(PartnerCategory::from_str("logistics").is_err());
    }
}
