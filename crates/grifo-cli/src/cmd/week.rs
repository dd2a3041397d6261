use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use grifo_core::{state::State, task, week::WeekPlan};
use std::path::Path;

#[derive(Subcommand)]
pub enum WeekSubcommand {
    /// Create an empty weekly plan (week label like 2026-W35)
    Create { obra: String, week: String },
    /// List the stored weeks of an obra
    List { obra: String },
}

pub fn run(root: &Path, subcmd: WeekSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        WeekSubcommand::Create { obra, week } => create(root, &obra, &week, json),
        WeekSubcommand::List { obra } => list(root, &obra, json),
    }
}

fn create(root: &Path, obra: &str, week: &str, json: bool) -> anyhow::Result<()> {
    let plan = WeekPlan::create(root, obra, week)
        .with_context(|| format!("failed to create week plan '{week}' for obra '{obra}'"))?;
    State::mark_changed(root).context("failed to update state")?;

    if json {
        print_json(&serde_json::json!({
            "obra": plan.obra,
            "week": plan.week,
        }))?;
    } else {
        println!("Created week plan {week} for obra '{obra}'.");
    }
    Ok(())
}

fn list(root: &Path, obra: &str, json: bool) -> anyhow::Result<()> {
    grifo_core::obra::Obra::load(root, obra).with_context(|| format!("obra '{obra}' not found"))?;
    let weeks = WeekPlan::list_weeks(root, obra).context("failed to list weeks")?;

    if json {
        print_json(&weeks)?;
        return Ok(());
    }

    if weeks.is_empty() {
        println!("No week plans for obra '{obra}'.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = weeks
        .iter()
        .map(|w| {
            let summary = WeekPlan::load(root, obra, w)
                .map(|p| task::summarize(&p.tasks))
                .unwrap_or_default();
            vec![w.clone(), summary]
        })
        .collect();
    print_table(&["WEEK", "SUMMARY"], rows);
    Ok(())
}
