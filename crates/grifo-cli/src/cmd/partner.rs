use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use grifo_core::marketplace::{Partner, PartnerCategory};
use grifo_core::state::State;
use std::path::Path;
use std::str::FromStr;

#[derive(Subcommand)]
pub enum PartnerSubcommand {
    /// Register a partner (category: materials | equipment | workforce | services)
    Add {
        slug: String,
        /// Display name
        #[arg(long)]
        name: String,
        #[arg(long)]
        category: String,
        /// Contact person
        #[arg(long)]
        contact: Option<String>,
        /// Phone number
        #[arg(long)]
        phone: Option<String>,
    },
    /// List partners, optionally by category
    List {
        #[arg(long)]
        category: Option<String>,
    },
    /// Rate a partner 1..=5
    Rate { slug: String, rating: u8 },
}

pub fn run(root: &Path, subcmd: PartnerSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        PartnerSubcommand::Add {
            slug,
            name,
            category,
            contact,
            phone,
        } => add(root, &slug, &name, &category, contact, phone, json),
        PartnerSubcommand::List { category } => list(root, category.as_deref(), json),
        PartnerSubcommand::Rate { slug, rating } => rate(root, &slug, rating, json),
    }
}

fn add(
    root: &Path,
    slug: &str,
    name: &str,
    category: &str,
    contact: Option<String>,
    phone: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let category = PartnerCategory::from_str(category)?;
    let mut partner = Partner::create(root, slug, name, category)
        .with_context(|| format!("failed to register partner '{slug}'"))?;
    if contact.is_some() || phone.is_some() {
        partner.contact = contact;
        partner.phone = phone;
        partner.save(root).context("failed to save partner")?;
    }
    State::mark_changed(root).context("failed to update state")?;

    if json {
        print_json(&partner)?;
    } else {
        println!("Registered partner '{slug}' ({}).", partner.category.as_str());
    }
    Ok(())
}

fn list(root: &Path, category: Option<&str>, json: bool) -> anyhow::Result<()> {
    let category = category.map(PartnerCategory::from_str).transpose()?;
    let partners = Partner::list(root, category).context("failed to list partners")?;

    if json {
        print_json(&partners)?;
        return Ok(());
    }

    if partners.is_empty() {
        println!("No partners.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = partners
        .iter()
        .map(|p| {
            vec![
                p.slug.clone(),
                p.name.clone(),
                p.category.as_str().to_string(),
                p.rating.map(|r| r.to_string()).unwrap_or_default(),
            ]
        })
        .collect();
    print_table(&["SLUG", "NAME", "CATEGORY", "RATING"], rows);
    Ok(())
}

fn rate(root: &Path, slug: &str, rating: u8, json: bool) -> anyhow::Result<()> {
    let mut partner =
        Partner::load(root, slug).with_context(|| format!("partner '{slug}' not found"))?;
    partner.rate(rating)?;
    partner.save(root).context("failed to save partner")?;
    State::mark_changed(root).context("failed to update state")?;

    if json {
        print_json(&serde_json::json!({ "slug": slug, "rating": partner.rating }))?;
    } else {
        println!("Rated '{slug}' {rating}/5.");
    }
    Ok(())
}
