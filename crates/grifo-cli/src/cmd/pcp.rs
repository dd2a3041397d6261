use crate::output::{print_json, print_table};
use anyhow::Context;
use grifo_core::{pcp, week::WeekPlan};
use std::collections::BTreeMap;
use std::path::Path;

pub fn run(root: &Path, obra: &str, week: &str, json: bool) -> anyhow::Result<()> {
    let plan = WeekPlan::load(root, obra, week)
        .with_context(|| format!("week plan '{week}' not found for obra '{obra}'"))?;
    let report = pcp::calculate_pcp(&plan.tasks);

    if json {
        print_json(&report)?;
        return Ok(());
    }

    println!(
        "PCP {week} — {:.1}% ({}/{} tasks fully completed)",
        report.overall.percentage, report.overall.completed_tasks, report.overall.total_tasks
    );
    print_group("By sector", &report.by_sector);
    print_group("By discipline", &report.by_discipline);
    print_group("By executor", &report.by_executor);
    Ok(())
}

fn print_group(label: &str, group: &BTreeMap<String, pcp::PcpData>) {
    if group.is_empty() {
        return;
    }
    println!("\n{label}:");
    let rows: Vec<Vec<String>> = group
        .iter()
        .map(|(key, data)| {
            vec![
                key.clone(),
                format!("{}/{}", data.completed_tasks, data.total_tasks),
                format!("{:.1}%", data.percentage),
            ]
        })
        .collect();
    print_table(&["GROUP", "DONE", "PCP"], rows);
}
