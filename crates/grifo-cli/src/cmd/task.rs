use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use grifo_core::{
    state::State,
    task::{self, TaskSpec},
    types::{DayStatus, Weekday},
    week::WeekPlan,
};
use std::path::Path;
use std::str::FromStr;

#[derive(Subcommand)]
pub enum TaskSubcommand {
    /// Add a task to a weekly plan
    Add {
        obra: String,
        week: String,
        /// Sector of the site (tower, floor, block)
        #[arg(long)]
        sector: String,
        /// What is being executed
        #[arg(long)]
        description: String,
        /// Discipline (masonry, electrical, ...)
        #[arg(long, default_value = "")]
        discipline: String,
        /// Crew name
        #[arg(long, default_value = "")]
        team: String,
        /// Planning responsible
        #[arg(long, default_value = "")]
        responsible: String,
        /// Executor credited by the leaderboard
        #[arg(long, default_value = "")]
        executor: String,
        /// Planned day (repeatable: --day mon --day tue)
        #[arg(long = "day", value_name = "DAY", required = true)]
        days: Vec<String>,
    },
    /// Check off one day of a task (status: planned | completed | not_done)
    Check {
        obra: String,
        week: String,
        id: String,
        day: String,
        status: String,
        /// Why the day was not done (required for not_done)
        #[arg(long)]
        cause: Option<String>,
    },
    /// List the tasks of a weekly plan
    List { obra: String, week: String },
    /// Remove a task from a weekly plan
    Remove {
        obra: String,
        week: String,
        id: String,
    },
}

pub fn run(root: &Path, subcmd: TaskSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        TaskSubcommand::Add {
            obra,
            week,
            sector,
            description,
            discipline,
            team,
            responsible,
            executor,
            days,
        } => add(
            root,
            &obra,
            &week,
            TaskInput {
                sector,
                description,
                discipline,
                team,
                responsible,
                executor,
                days,
            },
            json,
        ),
        TaskSubcommand::Check {
            obra,
            week,
            id,
            day,
            status,
            cause,
        } => check(root, &obra, &week, &id, &day, &status, cause, json),
        TaskSubcommand::List { obra, week } => list(root, &obra, &week, json),
        TaskSubcommand::Remove { obra, week, id } => remove(root, &obra, &week, &id, json),
    }
}

struct TaskInput {
    sector: String,
    description: String,
    discipline: String,
    team: String,
    responsible: String,
    executor: String,
    days: Vec<String>,
}

fn add(root: &Path, obra: &str, week: &str, input: TaskInput, json: bool) -> anyhow::Result<()> {
    let planned_days = input
        .days
        .iter()
        .map(|d| Weekday::from_str(d))
        .collect::<grifo_core::Result<Vec<Weekday>>>()?;

    let mut plan = WeekPlan::load(root, obra, week)
        .with_context(|| format!("week plan '{week}' not found for obra '{obra}'"))?;
    let id = task::add_task(
        &mut plan.tasks,
        TaskSpec {
            sector: input.sector,
            description: input.description,
            discipline: input.discipline,
            team: input.team,
            responsible: input.responsible,
            executor: input.executor,
            planned_days,
        },
    );
    plan.save(root).context("failed to save week plan")?;
    State::mark_changed(root).context("failed to update state")?;

    if json {
        print_json(&serde_json::json!({ "id": id, "week": week }))?;
    } else {
        println!("Added task {id} to {week}.");
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn check(
    root: &Path,
    obra: &str,
    week: &str,
    id: &str,
    day: &str,
    status: &str,
    cause: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let day = Weekday::from_str(day)?;
    let status = DayStatus::from_str(status)?;

    let mut plan = WeekPlan::load(root, obra, week)
        .with_context(|| format!("week plan '{week}' not found for obra '{obra}'"))?;
    task::check_day(&mut plan.tasks, id, day, status, cause)?;
    plan.save(root).context("failed to save week plan")?;
    State::mark_changed(root).context("failed to update state")?;

    let fully = plan
        .tasks
        .iter()
        .find(|t| t.id == id)
        .is_some_and(|t| t.is_fully_completed());

    if json {
        print_json(&serde_json::json!({
            "id": id,
            "day": day.as_str(),
            "status": status.as_str(),
            "fully_completed": fully,
        }))?;
    } else {
        println!("Task {id}: {} -> {}.", day.as_str(), status.as_str());
        if fully {
            println!("Task {id} is fully completed.");
        }
    }
    Ok(())
}

fn list(root: &Path, obra: &str, week: &str, json: bool) -> anyhow::Result<()> {
    let plan = WeekPlan::load(root, obra, week)
        .with_context(|| format!("week plan '{week}' not found for obra '{obra}'"))?;

    if json {
        print_json(&plan.tasks)?;
        return Ok(());
    }

    if plan.tasks.is_empty() {
        println!("No tasks in {week}.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = plan
        .tasks
        .iter()
        .map(|t| {
            let days: Vec<String> = Weekday::all()
                .iter()
                .filter_map(|d| {
                    let status = t.days.get(d)?;
                    (*status != DayStatus::NotPlanned)
                        .then(|| format!("{}:{}", d.as_str(), status.as_str()))
                })
                .collect();
            vec![
                t.id.clone(),
                t.sector.clone(),
                t.description.clone(),
                t.executor.clone(),
                days.join(" "),
            ]
        })
        .collect();
    print_table(&["ID", "SECTOR", "DESCRIPTION", "EXECUTOR", "DAYS"], rows);
    println!("{}", task::summarize(&plan.tasks));
    Ok(())
}

fn remove(root: &Path, obra: &str, week: &str, id: &str, json: bool) -> anyhow::Result<()> {
    let mut plan = WeekPlan::load(root, obra, week)
        .with_context(|| format!("week plan '{week}' not found for obra '{obra}'"))?;
    let removed = task::remove_task(&mut plan.tasks, id)?;
    plan.save(root).context("failed to save week plan")?;
    State::mark_changed(root).context("failed to update state")?;

    if json {
        print_json(&serde_json::json!({ "id": removed.id, "removed": true }))?;
    } else {
        println!("Removed task {id} from {week}.");
    }
    Ok(())
}
