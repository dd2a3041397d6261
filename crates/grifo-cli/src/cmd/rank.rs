use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use grifo_core::{gamification, state::State, week::WeekPlan};
use std::path::Path;

#[derive(Subcommand)]
pub enum RankSubcommand {
    /// Show the executor leaderboard (default)
    Show,
    /// Award points for a closed week
    Award { obra: String, week: String },
}

pub fn run(root: &Path, subcmd: Option<RankSubcommand>, json: bool) -> anyhow::Result<()> {
    match subcmd {
        None | Some(RankSubcommand::Show) => show(root, json),
        Some(RankSubcommand::Award { obra, week }) => award(root, &obra, &week, json),
    }
}

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let profiles = gamification::Profile::list(root).context("failed to list profiles")?;
    let ranking = gamification::ranking(&profiles);

    if json {
        print_json(&ranking)?;
        return Ok(());
    }

    if ranking.is_empty() {
        println!("No profiles yet. Award a week with `grifo rank award <obra> <week>`.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = ranking
        .iter()
        .map(|e| {
            vec![
                e.position.to_string(),
                e.name.clone(),
                e.points.to_string(),
                e.completed_tasks.to_string(),
            ]
        })
        .collect();
    print_table(&["#", "EXECUTOR", "POINTS", "COMPLETED"], rows);
    Ok(())
}

fn award(root: &Path, obra: &str, week: &str, json: bool) -> anyhow::Result<()> {
    let plan = WeekPlan::load(root, obra, week)
        .with_context(|| format!("week plan '{week}' not found for obra '{obra}'"))?;
    let awards = gamification::award_week(root, &plan).context("failed to award points")?;
    State::mark_changed(root).context("failed to update state")?;

    if json {
        print_json(&awards)?;
        return Ok(());
    }

    if awards.is_empty() {
        println!("No fully completed tasks in {week}; nothing to award.");
        return Ok(());
    }
    for a in &awards {
        println!(
            "{}: +{} points ({} tasks completed)",
            a.executor, a.points, a.completed_tasks
        );
    }
    Ok(())
}
