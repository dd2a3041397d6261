use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use grifo_core::{config::Config, playbook::Playbook, state::State};
use std::path::{Path, PathBuf};

#[derive(Subcommand)]
pub enum PlaybookSubcommand {
    /// Import a three-level budget CSV for an obra
    Import {
        obra: String,
        /// CSV file (level;code;description;unit;quantity;labor;materials;equipment;fees)
        file: PathBuf,
        /// Projection coefficient (defaults to the configured alternative)
        #[arg(long)]
        coefficient: Option<f64>,
    },
    /// Show the imported playbook with roll-ups
    Show { obra: String },
    /// Re-project target totals under a new coefficient
    Coefficient { obra: String, value: f64 },
}

pub fn run(root: &Path, subcmd: PlaybookSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        PlaybookSubcommand::Import {
            obra,
            file,
            coefficient,
        } => import(root, &obra, &file, coefficient, json),
        PlaybookSubcommand::Show { obra } => show(root, &obra, json),
        PlaybookSubcommand::Coefficient { obra, value } => coefficient(root, &obra, value, json),
    }
}

fn import(
    root: &Path,
    obra: &str,
    file: &Path,
    coefficient: Option<f64>,
    json: bool,
) -> anyhow::Result<()> {
    let csv = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let coefficient = match coefficient {
        Some(c) => c,
        None => Config::load(root).context("failed to load config")?.coefficient(),
    };

    let playbook = Playbook::import(root, obra, &csv, coefficient)
        .with_context(|| format!("failed to import playbook for obra '{obra}'"))?;
    State::mark_changed(root).context("failed to update state")?;

    if json {
        print_json(&serde_json::json!({
            "obra": playbook.obra,
            "items": playbook.items.len(),
            "coefficient": playbook.coefficient,
            "grand_total": playbook.grand_total,
            "grand_total_meta": playbook.grand_total_meta,
        }))?;
    } else {
        println!(
            "Imported {} items for obra '{obra}' (coefficient {}).",
            playbook.items.len(),
            playbook.coefficient
        );
        println!(
            "Grand total: {:.2}  Target: {:.2}",
            playbook.grand_total, playbook.grand_total_meta
        );
    }
    Ok(())
}

fn show(root: &Path, obra: &str, json: bool) -> anyhow::Result<()> {
    let playbook =
        Playbook::load(root, obra).with_context(|| format!("no playbook for obra '{obra}'"))?;

    if json {
        print_json(&playbook)?;
        return Ok(());
    }

    let rows: Vec<Vec<String>> = playbook
        .items
        .iter()
        .map(|item| {
            let indent = "  ".repeat(item.level.as_u8() as usize);
            vec![
                item.code.clone(),
                format!("{indent}{}", item.description),
                format!("{:.2}", item.total),
                format!("{:.2}", item.meta_total),
                format!("{:.1}%", item.percentage),
            ]
        })
        .collect();
    print_table(&["CODE", "DESCRIPTION", "TOTAL", "TARGET", "%"], rows);
    println!(
        "\nGrand total: {:.2}  Target (x{}): {:.2}",
        playbook.grand_total, playbook.coefficient, playbook.grand_total_meta
    );
    Ok(())
}

fn coefficient(root: &Path, obra: &str, value: f64, json: bool) -> anyhow::Result<()> {
    let mut playbook =
        Playbook::load(root, obra).with_context(|| format!("no playbook for obra '{obra}'"))?;
    playbook.set_coefficient(value)?;
    playbook.save(root).context("failed to save playbook")?;
    State::mark_changed(root).context("failed to update state")?;

    if json {
        print_json(&serde_json::json!({
            "obra": obra,
            "coefficient": playbook.coefficient,
            "grand_total_meta": playbook.grand_total_meta,
        }))?;
    } else {
        println!(
            "Coefficient set to {value}. Target total: {:.2}",
            playbook.grand_total_meta
        );
    }
    Ok(())
}
