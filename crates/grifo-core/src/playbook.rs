use crate::error::{GrifoError, Result};
use crate::paths;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// PlaybookLevel
// ---------------------------------------------------------------------------

/// Depth in the three-level budget hierarchy. Serialized as the numeric
/// level (0/1/2) the imported spreadsheets use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum PlaybookLevel {
    Principal,
    Sub,
    Item,
}

impl PlaybookLevel {
    pub fn as_u8(self) -> u8 {
        match self {
            PlaybookLevel::Principal => 0,
            PlaybookLevel::Sub => 1,
            PlaybookLevel::Item => 2,
        }
    }

    pub fn from_u8(n: u8) -> Result<Self> {
        match n {
            0 => Ok(PlaybookLevel::Principal),
            1 => Ok(PlaybookLevel::Sub),
            2 => Ok(PlaybookLevel::Item),
            _ => Err(GrifoError::InvalidPlaybookLevel(n.to_string())),
        }
    }
}

impl From<PlaybookLevel> for u8 {
    fn from(l: PlaybookLevel) -> u8 {
        l.as_u8()
    }
}

impl TryFrom<u8> for PlaybookLevel {
    type Error = GrifoError;

    fn try_from(n: u8) -> Result<Self> {
        PlaybookLevel::from_u8(n)
    }
}

// ---------------------------------------------------------------------------
// CostBreakdown / PlaybookItem
// ---------------------------------------------------------------------------

/// Raw unit cost components of a leaf item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub labor: f64,
    pub materials: f64,
    pub equipment: f64,
    pub fees: f64,
}

impl CostBreakdown {
    pub fn sum(&self) -> f64 {
        self.labor + self.materials + self.equipment + self.fees
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybookItem {
    pub code: String,
    pub description: String,
    pub level: PlaybookLevel,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub costs: CostBreakdown,
    /// Raw total: leaf-owned for `Item` rows, derived for parents.
    #[serde(default)]
    pub total: f64,
    /// Target total: `total * coefficient`.
    #[serde(default)]
    pub meta_total: f64,
    /// Share of the grand target total, in percent.
    #[serde(default)]
    pub percentage: f64,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Roll up the flat depth-first item list in place and return
/// `(grand_total, grand_total_meta)`.
///
/// Leaf totals come from `quantity * sum(cost components)`, keeping an
/// explicit imported total when all components are zero. Parents are
/// computed in reverse (bottom-up, descendant totals are defined later in
/// array order): each level-0/1 node sums its contiguous descendant run,
/// stopping at the next node whose level is not deeper. Within the run,
/// only direct children count — except level-2 items appearing before any
/// level-1, which sum straight into the level-0. Grand totals accumulate
/// level-2 rows only, and percentages are taken against the grand meta
/// total, which makes them coefficient-invariant.
pub fn aggregate(items: &mut [PlaybookItem], coefficient: f64) -> (f64, f64) {
    // Leaf pass
    for item in items.iter_mut() {
        if item.level == PlaybookLevel::Item {
            let raw = item.costs.sum();
            if raw > 0.0 {
                item.total = item.quantity * raw;
            }
            item.meta_total = item.total * coefficient;
        }
    }

    // Parent pass, bottom-up
    for i in (0..items.len()).rev() {
        let level = items[i].level;
        if level == PlaybookLevel::Item {
            continue;
        }

        let mut total = 0.0;
        let mut seen_sub = false;
        for j in (i + 1)..items.len() {
            let child = items[j].level;
            if child <= level {
                break;
            }
            if child.as_u8() == level.as_u8() + 1 {
                seen_sub = child == PlaybookLevel::Sub;
                total += items[j].total;
            } else if level == PlaybookLevel::Principal
                && child == PlaybookLevel::Item
                && !seen_sub
            {
                // Orphan leaf directly under a principal with no sub level.
                total += items[j].total;
            }
        }
        items[i].total = total;
        items[i].meta_total = total * coefficient;
    }

    // Grand totals: level-2 rows only
    let grand_total: f64 = items
        .iter()
        .filter(|i| i.level == PlaybookLevel::Item)
        .map(|i| i.total)
        .sum();
    let grand_total_meta: f64 = items
        .iter()
        .filter(|i| i.level == PlaybookLevel::Item)
        .map(|i| i.meta_total)
        .sum();

    for item in items.iter_mut() {
        item.percentage = if grand_total_meta > 0.0 {
            item.meta_total / grand_total_meta * 100.0
        } else {
            0.0
        };
    }

    (grand_total, grand_total_meta)
}

// ---------------------------------------------------------------------------
// CSV importer
// ---------------------------------------------------------------------------

/// Parse a playbook export. Lines are
/// `level;code;description[;unit;quantity;labor;materials;equipment;fees[;total]]`,
/// semicolon- or comma-delimited, pt-BR decimal commas accepted. A header
/// row (non-numeric first field) and blank lines are skipped.
pub fn parse_csv(input: &str) -> Result<Vec<PlaybookItem>> {
    let mut items = Vec::new();

    for (idx, raw_line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        let delim = if line.contains(';') { ';' } else { ',' };
        let fields: Vec<&str> = line.split(delim).map(str::trim).collect();

        let level = match fields[0].parse::<u8>() {
            Ok(n) => PlaybookLevel::from_u8(n).map_err(|_| GrifoError::PlaybookImport {
                line: line_no,
                reason: format!("level must be 0, 1, or 2, got '{}'", fields[0]),
            })?,
            // Header row: only tolerated as the first line
            Err(_) if idx == 0 => continue,
            Err(_) => {
                return Err(GrifoError::PlaybookImport {
                    line: line_no,
                    reason: format!("level must be numeric, got '{}'", fields[0]),
                })
            }
        };

        if fields.len() < 3 {
            return Err(GrifoError::PlaybookImport {
                line: line_no,
                reason: "expected at least level, code, and description".to_string(),
            });
        }

        let number = |pos: usize, name: &str| -> Result<f64> {
            match fields.get(pos) {
                None => Ok(0.0),
                Some(s) if s.is_empty() => Ok(0.0),
                Some(s) => parse_number(s).ok_or_else(|| GrifoError::PlaybookImport {
                    line: line_no,
                    reason: format!("invalid {name} '{s}'"),
                }),
            }
        };

        let item = PlaybookItem {
            code: fields[1].to_string(),
            description: fields[2].to_string(),
            level,
            unit: fields
                .get(3)
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string()),
            quantity: number(4, "quantity")?,
            costs: CostBreakdown {
                labor: number(5, "labor")?,
                materials: number(6, "materials")?,
                equipment: number(7, "equipment")?,
                fees: number(8, "fees")?,
            },
            total: number(9, "total")?,
            meta_total: 0.0,
            percentage: 0.0,
        };
        items.push(item);
    }

    Ok(items)
}

/// Parse "1234.56" or pt-BR "1.234,56" / "1234,56".
fn parse_number(s: &str) -> Option<f64> {
    let cleaned = if s.contains(',') {
        s.replace('.', "").replace(',', ".")
    } else {
        s.to_string()
    };
    cleaned.parse::<f64>().ok()
}

// ---------------------------------------------------------------------------
// Playbook (persisted)
// ---------------------------------------------------------------------------

/// The imported budget for one obra, with derived roll-ups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playbook {
    pub obra: String,
    pub coefficient: f64,
    pub items: Vec<PlaybookItem>,
    pub grand_total: f64,
    pub grand_total_meta: f64,
    pub imported_at: DateTime<Utc>,
}

impl Playbook {
    /// Parse, aggregate, and persist a playbook import for an obra.
    pub fn import(root: &Path, obra: &str, csv: &str, coefficient: f64) -> Result<Self> {
        if coefficient <= 0.0 {
            return Err(GrifoError::InvalidCoefficient(coefficient));
        }
        crate::obra::Obra::load(root, obra)?;

        let mut items = parse_csv(csv)?;
        let (grand_total, grand_total_meta) = aggregate(&mut items, coefficient);

        let playbook = Self {
            obra: obra.to_string(),
            coefficient,
            items,
            grand_total,
            grand_total_meta,
            imported_at: Utc::now(),
        };
        playbook.save(root)?;
        Ok(playbook)
    }

    pub fn load(root: &Path, obra: &str) -> Result<Self> {
        let path = paths::playbook_path(root, obra);
        if !path.exists() {
            return Err(GrifoError::PlaybookNotFound(obra.to_string()));
        }
        let data = std::fs::read_to_string(&path)?;
        let playbook: Playbook = serde_yaml::from_str(&data)?;
        Ok(playbook)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::playbook_path(root, &self.obra);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// Re-project target totals under a new coefficient. No re-import; the
    /// raw costs are kept and the roll-up runs again.
    pub fn set_coefficient(&mut self, coefficient: f64) -> Result<()> {
        if coefficient <= 0.0 {
            return Err(GrifoError::InvalidCoefficient(coefficient));
        }
        self.coefficient = coefficient;
        let (grand_total, grand_total_meta) = aggregate(&mut self.items, coefficient);
        self.grand_total = grand_total;
        self.grand_total_meta = grand_total_meta;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
