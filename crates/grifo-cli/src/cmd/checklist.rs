use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use grifo_core::{checklist::Checklist, state::State};
use std::path::Path;

#[derive(Subcommand)]
pub enum ChecklistSubcommand {
    /// Create a checklist for an obra
    Create {
        obra: String,
        /// Checklist title
        #[arg(long)]
        title: String,
    },
    /// Add an item to a checklist
    Add {
        obra: String,
        id: String,
        description: String,
    },
    /// Check off an item (or undo with --undo)
    Check {
        obra: String,
        id: String,
        item: String,
        /// Revert the item to unchecked
        #[arg(long)]
        undo: bool,
    },
    /// List the checklists of an obra
    List { obra: String },
    /// Show one checklist with its items
    Show { obra: String, id: String },
}

pub fn run(root: &Path, subcmd: ChecklistSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ChecklistSubcommand::Create { obra, title } => create(root, &obra, &title, json),
        ChecklistSubcommand::Add {
            obra,
            id,
            description,
        } => add(root, &obra, &id, &description, json),
        ChecklistSubcommand::Check {
            obra,
            id,
            item,
            undo,
        } => check(root, &obra, &id, &item, undo, json),
        ChecklistSubcommand::List { obra } => list(root, &obra, json),
        ChecklistSubcommand::Show { obra, id } => show(root, &obra, &id, json),
    }
}

fn create(root: &Path, obra: &str, title: &str, json: bool) -> anyhow::Result<()> {
    let checklist = Checklist::create(root, obra, title)
        .with_context(|| format!("failed to create checklist for obra '{obra}'"))?;
    State::mark_changed(root).context("failed to update state")?;

    if json {
        print_json(&serde_json::json!({ "id": checklist.id, "title": checklist.title }))?;
    } else {
        println!("Created checklist '{title}' ({}).", checklist.id);
    }
    Ok(())
}

fn add(root: &Path, obra: &str, id: &str, description: &str, json: bool) -> anyhow::Result<()> {
    let mut checklist =
        Checklist::load(root, obra, id).with_context(|| format!("checklist '{id}' not found"))?;
    let item_id = checklist.add_item(description);
    checklist.save(root).context("failed to save checklist")?;
    State::mark_changed(root).context("failed to update state")?;

    if json {
        print_json(&serde_json::json!({ "id": item_id }))?;
    } else {
        println!("Added item {item_id}.");
    }
    Ok(())
}

fn check(
    root: &Path,
    obra: &str,
    id: &str,
    item: &str,
    undo: bool,
    json: bool,
) -> anyhow::Result<()> {
    let mut checklist =
        Checklist::load(root, obra, id).with_context(|| format!("checklist '{id}' not found"))?;
    if undo {
        checklist.uncheck_item(item)?;
    } else {
        checklist.check_item(item)?;
    }
    checklist.save(root).context("failed to save checklist")?;
    State::mark_changed(root).context("failed to update state")?;

    let progress = checklist.progress();
    if json {
        print_json(&progress)?;
    } else {
        println!(
            "{}/{} items done ({:.1}%).",
            progress.completed_tasks, progress.total_tasks, progress.percentage
        );
    }
    Ok(())
}

fn list(root: &Path, obra: &str, json: bool) -> anyhow::Result<()> {
    let checklists = Checklist::list(root, obra).context("failed to list checklists")?;

    if json {
        let items: Vec<serde_json::Value> = checklists
            .iter()
            .map(|c| {
                serde_json::json!({
                    "id": c.id,
                    "title": c.title,
                    "progress": c.progress(),
                })
            })
            .collect();
        print_json(&items)?;
        return Ok(());
    }

    if checklists.is_empty() {
        println!("No checklists for obra '{obra}'.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = checklists
        .iter()
        .map(|c| {
            let p = c.progress();
            vec![
                c.id.clone(),
                c.title.clone(),
                format!("{}/{}", p.completed_tasks, p.total_tasks),
            ]
        })
        .collect();
    print_table(&["ID", "TITLE", "DONE"], rows);
    Ok(())
}

fn show(root: &Path, obra: &str, id: &str, json: bool) -> anyhow::Result<()> {
    let checklist =
        Checklist::load(root, obra, id).with_context(|| format!("checklist '{id}' not found"))?;

    if json {
        print_json(&checklist)?;
        return Ok(());
    }

    let p = checklist.progress();
    println!(
        "{} — {}/{} done ({:.1}%)",
        checklist.title, p.completed_tasks, p.total_tasks, p.percentage
    );
    for item in &checklist.items {
        let mark = if item.done { "x" } else { " " };
        println!("  [{mark}] {}  {}", item.id, item.description);
    }
    Ok(())
}
