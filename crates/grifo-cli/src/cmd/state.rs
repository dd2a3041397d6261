use crate::output::{print_json, print_table};
use anyhow::Context;
use grifo_core::{obra::Obra, state::State, week::WeekPlan};
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let state = State::load(root).context("failed to load state")?;
    let obras = Obra::list(root).unwrap_or_default();

    if json {
        let summaries: Vec<serde_json::Value> = obras
            .iter()
            .map(|o| {
                let weeks = WeekPlan::list_weeks(root, &o.slug).unwrap_or_default();
                serde_json::json!({
                    "slug": o.slug,
                    "name": o.name,
                    "status": o.status,
                    "weeks": weeks,
                })
            })
            .collect();
        print_json(&serde_json::json!({
            "project": state.project,
            "obras": summaries,
            "last_updated": state.last_updated,
        }))?;
        return Ok(());
    }

    println!("Project: {}", state.project);
    if obras.is_empty() {
        println!("No obras. Create one with `grifo obra create <slug> --name <name>`.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = obras
        .iter()
        .map(|o| {
            let weeks = WeekPlan::list_weeks(root, &o.slug).unwrap_or_default();
            vec![
                o.slug.clone(),
                o.name.clone(),
                o.status.to_string(),
                weeks.len().to_string(),
            ]
        })
        .collect();
    print_table(&["SLUG", "NAME", "STATUS", "WEEKS"], rows);
    Ok(())
}
