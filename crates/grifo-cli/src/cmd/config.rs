use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use grifo_core::config::{CoefficientChoice, Config, WarnLevel};
use grifo_core::state::State;
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show the project configuration
    Show,

    /// Validate the config for common mistakes
    Validate,

    /// Select the active coefficient alternative (first | second)
    Coefficient { choice: String },
}

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(root, json),
        ConfigSubcommand::Validate => validate(root, json),
        ConfigSubcommand::Coefficient { choice } => coefficient(root, &choice, json),
    }
}

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;

    if json {
        print_json(&config)?;
        return Ok(());
    }

    println!("Project: {}", config.project.name);
    println!("PCP goal: {:.0}%", config.pcp.goal_percentage);
    println!(
        "Coefficients: [{}, {}] (active: {})",
        config.coefficients.alternatives[0],
        config.coefficients.alternatives[1],
        config.coefficient()
    );
    Ok(())
}

fn validate(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let warnings = config.validate();

    if json {
        print_json(&serde_json::json!({ "warnings": warnings }))?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    let has_errors = warnings.iter().any(|w| w.level == WarnLevel::Error);
    if has_errors {
        anyhow::bail!("config validation found errors");
    }

    Ok(())
}

fn coefficient(root: &Path, choice: &str, json: bool) -> anyhow::Result<()> {
    let selected = match choice {
        "first" | "1" => CoefficientChoice::First,
        "second" | "2" => CoefficientChoice::Second,
        other => anyhow::bail!("unknown coefficient choice '{other}' (expected first or second)"),
    };

    let mut config = Config::load(root).context("failed to load config")?;
    config.coefficients.selected = selected;
    config.save(root).context("failed to save config")?;
    State::mark_changed(root).context("failed to update state")?;

    if json {
        print_json(&serde_json::json!({
            "selected": config.coefficients.selected,
            "active": config.coefficient(),
        }))?;
    } else {
        println!("Active coefficient is now {}.", config.coefficient());
    }
    Ok(())
}
