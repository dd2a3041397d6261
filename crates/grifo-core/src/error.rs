use thiserror::Error;

#[derive(Debug, Error)]
pub enum GrifoError {
    #[error("not initialized: run 'grifo init'")]
    NotInitialized,

    #[error("obra not found: {0}")]
    ObraNotFound(String),

    #[error("obra already exists: {0}")]
    ObraExists(String),

    #[error("week plan not found: {0}")]
    WeekNotFound(String),

    #[error("week plan already exists: {0}")]
    WeekExists(String),

    #[error("invalid week label '{0}': expected e.g. 2026-W35")]
    InvalidWeek(String),

    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("day {day} is not planned for task {task}")]
    DayNotPlanned { task: String, day: String },

    #[error("marking a day not done requires a cause")]
    MissingCause,

    #[error("invalid day status: {0}")]
    InvalidDayStatus(String),

    #[error("invalid weekday: {0}")]
    InvalidWeekday(String),

    #[error("invalid slug '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidSlug(String),

    #[error("playbook not found for obra: {0}")]
    PlaybookNotFound(String),

    #[error("playbook import error at line {line}: {reason}")]
    PlaybookImport { line: usize, reason: String },

    #[error("invalid playbook level: {0}")]
    InvalidPlaybookLevel(String),

    #[error("invalid coefficient: {0}")]
    InvalidCoefficient(f64),

    #[error("checklist not found: {0}")]
    ChecklistNotFound(String),

    #[error("checklist item not found: {0}")]
    ChecklistItemNotFound(String),

    #[error("agenda event not found: {0}")]
    AgendaEventNotFound(String),

    #[error("partner not found: {0}")]
    PartnerNotFound(String),

    #[error("partner already exists: {0}")]
    PartnerExists(String),

    #[error("invalid partner category: {0}")]
    InvalidCategory(String),

    #[error("invalid rating {0}: must be between 1 and 5")]
    InvalidRating(u8),

    #[error("profile not found: {0}")]
    ProfileNotFound(String),

    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GrifoError>;
