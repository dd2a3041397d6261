mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    agenda::AgendaSubcommand, checklist::ChecklistSubcommand, config::ConfigSubcommand,
    obra::ObraSubcommand, partner::PartnerSubcommand, playbook::PlaybookSubcommand,
    rank::RankSubcommand, report::ReportSubcommand, task::TaskSubcommand, week::WeekSubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "grifo",
    about = "GrifoBoard — weekly planning, PCP tracking, and budget control for construction sites",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .grifo/ or .git/)
    #[arg(long, global = true, env = "GRIFO_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize GrifoBoard in the current project
    Init {
        /// Project name (defaults to the root directory name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Show project state
    State,

    /// Manage obras (construction sites)
    Obra {
        #[command(subcommand)]
        subcommand: ObraSubcommand,
    },

    /// Manage weekly plans
    Week {
        #[command(subcommand)]
        subcommand: WeekSubcommand,
    },

    /// Manage tasks in a weekly plan
    Task {
        #[command(subcommand)]
        subcommand: TaskSubcommand,
    },

    /// Show the weekly PCP breakdown
    Pcp { obra: String, week: String },

    /// Manage the budget playbook
    Playbook {
        #[command(subcommand)]
        subcommand: PlaybookSubcommand,
    },

    /// Manage checklists
    Checklist {
        #[command(subcommand)]
        subcommand: ChecklistSubcommand,
    },

    /// Manage the agenda
    Agenda {
        #[command(subcommand)]
        subcommand: AgendaSubcommand,
    },

    /// Manage marketplace partners
    Partner {
        #[command(subcommand)]
        subcommand: PartnerSubcommand,
    },

    /// Executor leaderboard and weekly awards
    Rank {
        #[command(subcommand)]
        subcommand: Option<RankSubcommand>,
    },

    /// Generate reports
    Report {
        #[command(subcommand)]
        subcommand: ReportSubcommand,
    },

    /// Inspect and validate the project configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Launch the API server
    Ui {
        /// Port to listen on (0 = OS-assigned)
        #[arg(long, default_value = "3141")]
        port: u16,

        /// Don't open browser automatically
        #[arg(long)]
        no_open: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Ui { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let root_path = cli.root.as_deref();
    let root = root::resolve_root(root_path);

    let result = match cli.command {
        Commands::Init { name } => cmd::init::run(&root, name.as_deref()),
        Commands::State => cmd::state::run(&root, cli.json),
        Commands::Obra { subcommand } => cmd::obra::run(&root, subcommand, cli.json),
        Commands::Week { subcommand } => cmd::week::run(&root, subcommand, cli.json),
        Commands::Task { subcommand } => cmd::task::run(&root, subcommand, cli.json),
        Commands::Pcp { obra, week } => cmd::pcp::run(&root, &obra, &week, cli.json),
        Commands::Playbook { subcommand } => cmd::playbook::run(&root, subcommand, cli.json),
        Commands::Checklist { subcommand } => cmd::checklist::run(&root, subcommand, cli.json),
        Commands::Agenda { subcommand } => cmd::agenda::run(&root, subcommand, cli.json),
        Commands::Partner { subcommand } => cmd::partner::run(&root, subcommand, cli.json),
        Commands::Rank { subcommand } => cmd::rank::run(&root, subcommand, cli.json),
        Commands::Report { subcommand } => cmd::report::run(&root, subcommand, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
        Commands::Ui { port, no_open } => cmd::ui::run(&root, port, no_open),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
