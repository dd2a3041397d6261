use crate::task::Task;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// PcpData
// ---------------------------------------------------------------------------

/// One completion ratio: tasks fully completed over tasks measured.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PcpData {
    pub completed_tasks: usize,
    pub total_tasks: usize,
    pub percentage: f64,
}

impl PcpData {
    fn record(&mut self, completed: bool) {
        self.total_tasks += 1;
        if completed {
            self.completed_tasks += 1;
        }
        self.percentage = percentage(self.completed_tasks, self.total_tasks);
    }
}

fn percentage(completed: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        completed as f64 / total as f64 * 100.0
    }
}

// ---------------------------------------------------------------------------
// PcpReport
// ---------------------------------------------------------------------------

/// Weekly PCP (Percentual de Cumprimento de Programação): overall completion
/// rate plus the same ratio partitioned by sector, discipline, and executor.
///
/// BTreeMap keys keep grouped output deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PcpReport {
    pub overall: PcpData,
    pub by_sector: BTreeMap<String, PcpData>,
    pub by_discipline: BTreeMap<String, PcpData>,
    pub by_executor: BTreeMap<String, PcpData>,
}

/// Compute the weekly PCP over a task list.
///
/// Only tasks with at least one planned day are measured; a task counts as
/// completed iff every planned day is checked off. Empty input yields an
/// all-zero report rather than dividing by zero.
pub fn calculate_pcp(tasks: &[Task]) -> PcpReport {
    let mut report = PcpReport::default();

    for task in tasks.iter().filter(|t| !t.planned_days().is_empty()) {
        let completed = task.is_fully_completed();
        report.overall.record(completed);
        report
            .by_sector
            .entry(task.sector.clone())
            .or_default()
            .record(completed);
        report
            .by_discipline
            .entry(task.discipline.clone())
            .or_default()
            .record(completed);
        report
            .by_executor
            .entry(task.executor.clone())
            .or_default()
            .record(completed);
    }

    report
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
