use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use grifo_core::{obra::Obra, state::State, week::WeekPlan};
use std::path::Path;

#[derive(Subcommand)]
pub enum ObraSubcommand {
    /// Register a new obra
    Create {
        slug: String,
        /// Display name
        #[arg(long)]
        name: String,
        /// Site address
        #[arg(long)]
        address: Option<String>,
        /// Site engineer / responsible
        #[arg(long)]
        responsible: Option<String>,
    },
    /// List all obras
    List,
    /// Show obra details and its stored weeks
    Show { slug: String },
    /// Mark an obra finished
    Finish { slug: String },
    /// Archive an obra
    Archive { slug: String },
}

pub fn run(root: &Path, subcmd: ObraSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ObraSubcommand::Create {
            slug,
            name,
            address,
            responsible,
        } => create(root, &slug, &name, address, responsible, json),
        ObraSubcommand::List => list(root, json),
        ObraSubcommand::Show { slug } => show(root, &slug, json),
        ObraSubcommand::Finish { slug } => finish(root, &slug, json),
        ObraSubcommand::Archive { slug } => archive(root, &slug, json),
    }
}

fn create(
    root: &Path,
    slug: &str,
    name: &str,
    address: Option<String>,
    responsible: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let mut obra =
        Obra::create(root, slug, name).with_context(|| format!("failed to create obra '{slug}'"))?;
    if address.is_some() || responsible.is_some() {
        obra.address = address;
        obra.responsible = responsible;
        obra.save(root).context("failed to save obra")?;
    }

    let mut state = State::load(root).context("failed to load state")?;
    state.add_obra(slug);
    state.save(root).context("failed to save state")?;

    if json {
        print_json(&serde_json::json!({
            "slug": obra.slug,
            "name": obra.name,
            "status": obra.status,
        }))?;
    } else {
        println!("Created obra '{slug}'.");
    }
    Ok(())
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let obras = Obra::list(root).context("failed to list obras")?;

    if json {
        let items: Vec<serde_json::Value> = obras
            .iter()
            .map(|o| {
                serde_json::json!({
                    "slug": o.slug,
                    "name": o.name,
                    "status": o.status,
                })
            })
            .collect();
        print_json(&items)?;
        return Ok(());
    }

    if obras.is_empty() {
        println!("No obras.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = obras
        .iter()
        .map(|o| vec![o.slug.clone(), o.name.clone(), o.status.to_string()])
        .collect();
    print_table(&["SLUG", "NAME", "STATUS"], rows);
    Ok(())
}

fn show(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    let obra = Obra::load(root, slug).with_context(|| format!("obra '{slug}' not found"))?;
    let weeks = WeekPlan::list_weeks(root, slug).unwrap_or_default();

    if json {
        print_json(&serde_json::json!({
            "slug": obra.slug,
            "name": obra.name,
            "address": obra.address,
            "responsible": obra.responsible,
            "status": obra.status,
            "weeks": weeks,
            "created_at": obra.created_at,
        }))?;
        return Ok(());
    }

    println!("{} — {}", obra.slug, obra.name);
    println!("  status:      {}", obra.status);
    if let Some(addr) = &obra.address {
        println!("  address:     {addr}");
    }
    if let Some(resp) = &obra.responsible {
        println!("  responsible: {resp}");
    }
    if weeks.is_empty() {
        println!("  weeks:       none");
    } else {
        println!("  weeks:       {}", weeks.join(", "));
    }
    Ok(())
}

fn finish(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    let mut obra = Obra::load(root, slug).with_context(|| format!("obra '{slug}' not found"))?;
    obra.finish();
    obra.save(root).context("failed to save obra")?;
    State::mark_changed(root).context("failed to update state")?;

    if json {
        print_json(&serde_json::json!({ "slug": slug, "status": obra.status }))?;
    } else {
        println!("Obra '{slug}' marked finished.");
    }
    Ok(())
}

fn archive(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    let mut obra = Obra::load(root, slug).with_context(|| format!("obra '{slug}' not found"))?;
    obra.archive();
    obra.save(root).context("failed to save obra")?;
    State::mark_changed(root).context("failed to update state")?;

    if json {
        print_json(&serde_json::json!({ "slug": slug, "status": obra.status }))?;
    } else {
        println!("Obra '{slug}' archived.");
    }
    Ok(())
}
