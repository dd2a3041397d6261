use crate::error::{GrifoError, Result};
use crate::types::{DayStatus, Weekday};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A weekly production task. Each task is planned on a subset of the week's
/// days and checked off day by day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub sector: String,
    pub description: String,
    pub discipline: String,
    pub team: String,
    pub responsible: String,
    pub executor: String,
    /// Every weekday has an entry; unplanned days are `NotPlanned`.
    pub days: BTreeMap<Weekday, DayStatus>,
    /// Why the task was not done, when any day is marked `NotDone`.
    pub cause: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when creating a task; everything else is derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSpec {
    pub sector: String,
    pub description: String,
    pub discipline: String,
    pub team: String,
    pub responsible: String,
    pub executor: String,
    pub planned_days: Vec<Weekday>,
}

impl Task {
    pub fn new(id: impl Into<String>, spec: TaskSpec) -> Self {
        let now = Utc::now();
        let mut days = BTreeMap::new();
        for &day in Weekday::all() {
            let status = if spec.planned_days.contains(&day) {
                DayStatus::Planned
            } else {
                DayStatus::NotPlanned
            };
            days.insert(day, status);
        }
        Self {
            id: id.into(),
            sector: spec.sector,
            description: spec.description,
            discipline: spec.discipline,
            team: spec.team,
            responsible: spec.responsible,
            executor: spec.executor,
            days,
            cause: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Weekdays this task is planned on (anything but `NotPlanned`).
    pub fn planned_days(&self) -> Vec<Weekday> {
        self.days
            .iter()
            .filter(|(_, s)| **s != DayStatus::NotPlanned)
            .map(|(d, _)| *d)
            .collect()
    }

    /// A task is fully completed when it has at least one planned day and
    /// every planned day is `Completed`.
    pub fn is_fully_completed(&self) -> bool {
        let planned: Vec<_> = self
            .days
            .values()
            .filter(|s| **s != DayStatus::NotPlanned)
            .collect();
        !planned.is_empty() && planned.iter().all(|s| **s == DayStatus::Completed)
    }
}

// ---------------------------------------------------------------------------
// Task list operations (operate on a mutable Vec<Task>)
// ---------------------------------------------------------------------------

/// Ids are never reused: the next id is one past the highest numeric suffix
/// present, so a removed task's id stays retired for the life of the plan.
pub fn add_task(tasks: &mut Vec<Task>, spec: TaskSpec) -> String {
    let next = tasks
        .iter()
        .filter_map(|t| t.id.strip_prefix('T').and_then(|n| n.parse::<u64>().ok()))
        .max()
        .unwrap_or(0)
        + 1;
    let id = format!("T{next}");
    tasks.push(Task::new(id.clone(), spec));
    id
}

/// Daily check-off: set the status of one planned day.
///
/// Marking a day `NotDone` requires a cause. Marking `Completed` clears a
/// stale cause once no day remains `NotDone`. A `NotPlanned` day cannot be
/// checked.
pub fn check_day(
    tasks: &mut [Task],
    id: &str,
    day: Weekday,
    status: DayStatus,
    cause: Option<String>,
) -> Result<()> {
    let task = find_mut(tasks, id)?;

    let current = task.days.get(&day).copied().unwrap_or(DayStatus::NotPlanned);
    if current == DayStatus::NotPlanned || status == DayStatus::NotPlanned {
        return Err(GrifoError::DayNotPlanned {
            task: id.to_string(),
            day: day.to_string(),
        });
    }

    if status == DayStatus::NotDone && cause.as_deref().map_or(true, |c| c.trim().is_empty()) {
        return Err(GrifoError::MissingCause);
    }

    task.days.insert(day, status);
    if status == DayStatus::NotDone {
        task.cause = cause;
    } else if !task.days.values().any(|s| *s == DayStatus::NotDone) {
        task.cause = None;
    }
    task.updated_at = Utc::now();
    Ok(())
}

/// Remove a task from the plan. The PCP calculator never deletes; this is a
/// plan-editing operation only.
pub fn remove_task(tasks: &mut Vec<Task>, id: &str) -> Result<Task> {
    let pos = tasks
        .iter()
        .position(|t| t.id == id)
        .ok_or_else(|| GrifoError::TaskNotFound(id.to_string()))?;
    Ok(tasks.remove(pos))
}

/// Human-readable summary: "3/5 fully completed, 12/20 day-slots done".
pub fn summarize(tasks: &[Task]) -> String {
    let total = tasks.len();
    let full = tasks.iter().filter(|t| t.is_fully_completed()).count();
    let slots: usize = tasks
        .iter()
        .map(|t| t.days.values().filter(|s| **s != DayStatus::NotPlanned).count())
        .sum();
    let done_slots: usize = tasks
        .iter()
        .map(|t| t.days.values().filter(|s| **s == DayStatus::Completed).count())
        .sum();
    format!("{full}/{total} fully completed, {done_slots}/{slots} day-slots done")
}

fn find_mut<'a>(tasks: &'a mut [Task], id: &str) -> Result<&'a mut Task> {
    tasks
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| GrifoError::TaskNotFound(id.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn spec(sector: &str, executor: &str, days: &[Weekday]) -> TaskSpec {
        TaskSpec {
            sector: sector.to_string(),
            description: "Concretagem da laje".to_string(),
            discipline: "estrutura".to_string(),
            team: "equipe-a".to_string(),
            responsible: "joao".to_string(),
            executor: executor.to_string(),
            planned_days: days.to_vec(),
        }
    }

    #[test]
    fn new_task_marks_planned_and_unplanned_days() {
        let task = Task::new("T1", spec("bloco-a", "equipe-a", &[Weekday::Mon, Weekday::Wed]));
        assert_eq!(task.days[&Weekday::Mon], DayStatus::Planned);
        assert_eq!(task.days[&Weekday::Wed], DayStatus::Planned);
        assert_eq!(task.days[&Weekday::Tue], DayStatus::NotPlanned);
        assert_eq!(task.days.len(), 7);
        assert_eq!(task.planned_days(), vec![Weekday::Mon, Weekday::Wed]);
    }

    #[test]
    fn check_off_lifecycle() {
        let mut tasks: Vec<Task> = Vec::new();
        let id = add_task(&mut tasks, spec("bloco-a", "equipe-a", &[Weekday::Mon, Weekday::Tue]));
        assert!(!tasks[0].is_fully_completed());

        check_day(&mut tasks, &id, Weekday::Mon, DayStatus::Completed, None).unwrap();
        assert!(!tasks[0].is_fully_completed());

        check_day(&mut tasks, &id, Weekday::Tue, DayStatus::Completed, None).unwrap();
        assert!(tasks[0].is_fully_completed());
    }

    #[test]
    fn not_done_requires_cause() {
        let mut tasks: Vec<Task> = Vec::new();
        let id = add_task(&mut tasks, spec("bloco-a", "equipe-a", &[Weekday::Mon]));

        assert!(matches!(
            check_day(&mut tasks, &id, Weekday::Mon, DayStatus::NotDone, None),
            Err(GrifoError::MissingCause)
        ));
        assert!(matches!(
            check_day(
                &mut tasks,
                &id,
                Weekday::Mon,
                DayStatus::NotDone,
                Some("   ".to_string())
            ),
            Err(GrifoError::MissingCause)
        ));

        check_day(
            &mut tasks,
            &id,
            Weekday::Mon,
            DayStatus::NotDone,
            Some("chuva forte".to_string()),
        )
        .unwrap();
        assert_eq!(tasks[0].cause.as_deref(), Some("chuva forte"));
    }

    #[test]
    fn completing_clears_stale_cause() {
        let mut tasks: Vec<Task> = Vec::new();
        let id = add_task(&mut tasks, spec("bloco-a", "equipe-a", &[Weekday::Mon]));

        check_day(
            &mut tasks,
            &id,
            Weekday::Mon,
            DayStatus::NotDone,
            Some("falta de material".to_string()),
        )
        .unwrap();
        check_day(&mut tasks, &id, Weekday::Mon, DayStatus::Completed, None).unwrap();
        assert!(tasks[0].cause.is_none());
        assert!(tasks[0].is_fully_completed());
    }

    #[test]
    fn cannot_check_unplanned_day() {
        let mut tasks: Vec<Task> = Vec::new();
        let id = add_task(&mut tasks, spec("bloco-a", "equipe-a", &[Weekday::Mon]));

        assert!(matches!(
            check_day(&mut tasks, &id, Weekday::Sun, DayStatus::Completed, None),
            Err(GrifoError::DayNotPlanned { .. })
        ));
    }

    #[test]
    fn task_not_found() {
        let mut tasks: Vec<Task> = Vec::new();
        assert!(matches!(
            check_day(&mut tasks, "T99", Weekday::Mon, DayStatus::Completed, None),
            Err(GrifoError::TaskNotFound(_))
        ));
    }

    #[test]
    fn remove_task_by_id() {
        let mut tasks: Vec<Task> = Vec::new();
        let id = add_task(&mut tasks, spec("bloco-a", "equipe-a", &[Weekday::Mon]));
        add_task(&mut tasks, spec("bloco-b", "equipe-b", &[Weekday::Tue]));

        let removed = remove_task(&mut tasks, &id).unwrap();
        assert_eq!(removed.id, id);
        assert_eq!(tasks.len(), 1);
        assert!(remove_task(&mut tasks, &id).is_err());
    }

    #[test]
    fn ids_not_reused_after_removal() {
        let mut tasks: Vec<Task> = Vec::new();
        let first = add_task(&mut tasks, spec("bloco-a", "equipe-a", &[Weekday::Mon]));
        let second = add_task(&mut tasks, spec("bloco-b", "equipe-b", &[Weekday::Tue]));
        assert_eq!(first, "T1");
        assert_eq!(second, "T2");

        remove_task(&mut tasks, &first).unwrap();
        let third = add_task(&mut tasks, spec("bloco-c", "equipe-c", &[Weekday::Wed]));
        assert_eq!(third, "T3");

        let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["T2", "T3"]);

        check_day(&mut tasks, &third, Weekday::Wed, DayStatus::Completed, None).unwrap();
        assert_eq!(tasks[0].days[&Weekday::Tue], DayStatus::Planned);
        assert_eq!(tasks[1].days[&Weekday::Wed], DayStatus::Completed);
    }

    #[test]
    fn task_with_no_planned_days_never_fully_completed() {
        let task = Task::new("T1", spec("bloco-a", "equipe-a", &[]));
        assert!(!task.is_fully_completed());
        assert!(task.planned_days().is_empty());
    }

    #[test]
    fn summarize_counts_slots() {
        let mut tasks: Vec<Task> = Vec::new();
        let a = add_task(&mut tasks, spec("bloco-a", "equipe-a", &[Weekday::Mon, Weekday::Tue]));
        add_task(&mut tasks, spec("bloco-b", "equipe-b", &[Weekday::Wed]));

        check_day(&mut tasks, &a, Weekday::Mon, DayStatus::Completed, None).unwrap();
        check_day(&mut tasks, &a, Weekday::Tue, DayStatus::Completed, None).unwrap();

        assert_eq!(summarize(&tasks), "1/2 fully completed, 2/3 day-slots done");
    }
}
