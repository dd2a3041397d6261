use crate::output::{print_json, print_table};
use anyhow::Context;
use chrono::NaiveDate;
use clap::Subcommand;
use grifo_core::{agenda::AgendaEvent, state::State, GrifoError};
use std::path::Path;

#[derive(Subcommand)]
pub enum AgendaSubcommand {
    /// Schedule an event (deliveries, inspections, visits)
    Add {
        obra: String,
        /// Event title
        #[arg(long)]
        title: String,
        /// Free-form detail shown alongside the title
        #[arg(long)]
        description: Option<String>,
        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Time of day (e.g. 08:00)
        #[arg(long)]
        time: Option<String>,
    },
    /// List events, soonest first
    List {
        obra: String,
        /// Only events from today onwards
        #[arg(long)]
        upcoming: bool,
    },
    /// Mark an event done
    Done { obra: String, id: String },
}

pub fn run(root: &Path, subcmd: AgendaSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        AgendaSubcommand::Add {
            obra,
            title,
            description,
            date,
            time,
        } => add(root, &obra, &title, description, &date, time, json),
        AgendaSubcommand::List { obra, upcoming } => list(root, &obra, upcoming, json),
        AgendaSubcommand::Done { obra, id } => done(root, &obra, &id, json),
    }
}

fn parse_date(s: &str) -> grifo_core::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| GrifoError::InvalidDate(s.to_string()))
}

fn add(
    root: &Path,
    obra: &str,
    title: &str,
    description: Option<String>,
    date: &str,
    time: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let date = parse_date(date)?;
    let event = AgendaEvent::create(root, obra, title, description, date, time)
        .with_context(|| format!("failed to create agenda event for obra '{obra}'"))?;
    State::mark_changed(root).context("failed to update state")?;

    if json {
        print_json(&event)?;
    } else {
        println!("Scheduled '{title}' on {date} ({}).", event.id);
    }
    Ok(())
}

fn list(root: &Path, obra: &str, upcoming: bool, json: bool) -> anyhow::Result<()> {
    grifo_core::obra::Obra::load(root, obra).with_context(|| format!("obra '{obra}' not found"))?;
    let events = if upcoming {
        let today = chrono::Local::now().date_naive();
        AgendaEvent::upcoming(root, obra, today)
    } else {
        AgendaEvent::list(root, obra)
    }
    .context("failed to list agenda events")?;

    if json {
        print_json(&events)?;
        return Ok(());
    }

    if events.is_empty() {
        println!("No agenda events for obra '{obra}'.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = events
        .iter()
        .map(|e| {
            vec![
                e.id.clone(),
                e.date.to_string(),
                e.time.clone().unwrap_or_default(),
                e.title.clone(),
                if e.done { "done" } else { "" }.to_string(),
            ]
        })
        .collect();
    print_table(&["ID", "DATE", "TIME", "TITLE", ""], rows);
    Ok(())
}

fn done(root: &Path, obra: &str, id: &str, json: bool) -> anyhow::Result<()> {
    let mut event =
        AgendaEvent::load(root, obra, id).with_context(|| format!("event '{id}' not found"))?;
    event.mark_done();
    event.save(root).context("failed to save event")?;
    State::mark_changed(root).context("failed to update state")?;

    if json {
        print_json(&serde_json::json!({ "id": event.id, "done": event.done }))?;
    } else {
        println!("Event '{}' marked done.", event.title);
    }
    Ok(())
}
