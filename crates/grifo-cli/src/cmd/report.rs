use crate::output::print_json;
use anyhow::Context;
use chrono::NaiveDate;
use clap::Subcommand;
use grifo_core::{report, GrifoError};
use std::path::Path;

#[derive(Subcommand)]
pub enum ReportSubcommand {
    /// Weekly production report: PCP vs goal plus missed days and causes
    Weekly { obra: String, week: String },
    /// Diary of one calendar day (YYYY-MM-DD)
    Diary { obra: String, date: String },
}

pub fn run(root: &Path, subcmd: ReportSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ReportSubcommand::Weekly { obra, week } => weekly(root, &obra, &week, json),
        ReportSubcommand::Diary { obra, date } => diary(root, &obra, &date, json),
    }
}

fn weekly(root: &Path, obra: &str, week: &str, json: bool) -> anyhow::Result<()> {
    let report = report::weekly_report(root, obra, week)
        .with_context(|| format!("failed to build weekly report for '{obra}' {week}"))?;

    if json {
        print_json(&report)?;
        return Ok(());
    }

    println!("Weekly report — {obra} {week}");
    println!(
        "  PCP: {:.1}% (goal {:.0}%) — {}",
        report.pcp.overall.percentage,
        report.goal_percentage,
        if report.goal_met { "goal met" } else { "below goal" }
    );
    println!(
        "  Tasks: {}/{} fully completed",
        report.pcp.overall.completed_tasks, report.pcp.overall.total_tasks
    );
    if !report.not_done.is_empty() {
        println!("  Missed days:");
        for entry in &report.not_done {
            println!(
                "    {} [{}] {} — {}",
                entry.task_id,
                entry.sector,
                entry.description,
                entry.cause.as_deref().unwrap_or("no cause recorded")
            );
        }
    }
    Ok(())
}

fn diary(root: &Path, obra: &str, date: &str, json: bool) -> anyhow::Result<()> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| GrifoError::InvalidDate(date.to_string()))?;
    let report = report::diary_report(root, obra, date)
        .with_context(|| format!("failed to build diary for '{obra}' {date}"))?;

    if json {
        print_json(&report)?;
        return Ok(());
    }

    println!("Diary — {obra} {date} ({})", report.weekday.as_str());
    if report.tasks_worked.is_empty() {
        println!("  No task activity recorded.");
    } else {
        for t in &report.tasks_worked {
            println!(
                "  {} [{}] {} — {}",
                t.task_id,
                t.sector,
                t.description,
                t.status.as_str()
            );
        }
    }
    if !report.events.is_empty() {
        println!("  Events:");
        for e in &report.events {
            let time = e.time.clone().unwrap_or_default();
            println!("    {} {} {}", time, e.title, if e.done { "(done)" } else { "" });
        }
    }
    Ok(())
}
