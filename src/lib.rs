//! Oskar: filtering and roll-ups for an OKR planning hierarchy.
//!
//! Ambitions are annual objectives. Each one carries annual key results and
//! is broken into quarterly objectives, which carry quarterly key results,
//! which carry actions:
//!
//! ```text
//! Ambition ─┬─ AnnualKeyResult
//!           └─ QuarterlyObjective ── QuarterlyKeyResult ── Action
//! ```
//!
//! The crate computes, for one owner's snapshot of those five collections:
//!
//! - the filtered projections of actions, ambitions and objectives for a
//!   seven-field [`FilterState`](core::filter::FilterState);
//! - child lookups, progress and status roll-ups per subtree;
//! - the tree's expansion state and a one-line description of the filters;
//! - dashboard metrics.
//!
//! The library half is pure: nothing here owns persistence or reads the
//! clock. The `oskar` binary wraps it in a small CLI that reads a JSON
//! snapshot export and an optional `.oskar/config.toml`.
//!
//! # Examples
//!
//! ```bash
//! oskar tree --snapshot okr.json --quarter Q1 --year 2025
//! oskar filter --snapshot okr.json --status todo --label marketing --format json
//! oskar summary --ambition A1 --priority high
//! oskar dashboard --today 2025-03-01
//! ```

pub mod cli;
pub mod core;

pub use crate::core::error;
pub use crate::core::error::OskarError;

use clap::Parser;
use colored::Colorize;
use serde::Serialize;
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::cli::{Cli, Command, DashboardCli, OutputFormat, ScopeArgs, TreeCli};
use crate::core::config::{OskarConfig, load_config};
use crate::core::engine::{self, FilteredView};
use crate::core::expansion::{ExpansionState, TreeLevel};
use crate::core::filter::{FilterState, RawFilter};
use crate::core::metrics::{DashboardMetrics, UpcomingDeadline, upcoming_deadlines};
use crate::core::model::{ActionStatus, EntityKind, Priority, Quarter, Snapshot};
use crate::core::navigator::{AmbitionNode, Navigator};
use crate::core::store::load_snapshot;
use crate::core::summary::{describe, priority_label, quarter_label, status_label};
use crate::core::time;
use crate::core::tui::{TreeRenderer, progress_bar, truncate_title};

/// Log filter variable; falls back to `RUST_LOG`, then `warn`.
pub const LOG_ENV: &str = "OSKAR_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

/// Everything one subcommand works on: config, snapshot and effective filters.
struct Session {
    config: OskarConfig,
    snapshot: Snapshot,
    filters: FilterState,
}

fn open_session(scope: &ScopeArgs) -> Result<Session, OskarError> {
    let current_dir = std::env::current_dir()?;
    let config = load_config(scope.config.as_deref(), &current_dir)?;
    let snapshot_path = scope
        .snapshot
        .clone()
        .or_else(|| config.snapshot.clone())
        .ok_or_else(|| {
            OskarError::ValidationError(
                "No snapshot given: pass --snapshot or set `snapshot` in .oskar/config.toml"
                    .to_string(),
            )
        })?;
    let snapshot = load_snapshot(&snapshot_path)?;

    let configured = if scope.no_config_filter {
        FilterState::new()
    } else {
        FilterState::from(config.filter.clone())
    };
    let filters = configured.merged(&scope.filter.to_filter_state());
    debug!(active_filters = filters.active_filter_count(), "effective filters");

    Ok(Session {
        config,
        snapshot,
        filters,
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<(), OskarError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_header(session: &Session, view: &FilteredView<'_>) {
    let summary = describe(
        &session.filters,
        &session.snapshot.ambitions,
        &session.snapshot.quarterly_objectives,
    );
    println!("{} {}", "Filters:".bold(), summary);
    println!(
        "{}",
        format!(
            "{} of {} actions · {} ambitions · {} objectives",
            view.stats.filtered_actions,
            view.stats.total_actions,
            view.stats.ambitions_count,
            view.stats.objectives_count
        )
        .dimmed()
    );
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TreeReport<'a> {
    filters: RawFilter,
    stats: engine::FilterStats,
    expansion: &'a ExpansionState,
    ambitions: Vec<AmbitionNode<'a>>,
}

fn level_of(snapshot: &Snapshot, id: &str) -> Result<TreeLevel, OskarError> {
    match snapshot.kind_of(id) {
        Some(EntityKind::Ambition) => Ok(TreeLevel::Ambition),
        Some(EntityKind::QuarterlyObjective) => Ok(TreeLevel::Objective),
        Some(EntityKind::QuarterlyKeyResult) => Ok(TreeLevel::KeyResult),
        Some(kind) => Err(OskarError::ValidationError(format!(
            "{} '{}' has no children to expand",
            kind, id
        ))),
        None => Err(OskarError::NotFound(format!("tree node '{}'", id))),
    }
}

fn cmd_tree(args: &TreeCli) -> Result<(), OskarError> {
    let session = open_session(&args.scope)?;
    let view = engine::apply(&session.snapshot, &session.filters);
    let navigator = Navigator::filtered(&session.snapshot, &view);

    let mut expansion = ExpansionState::new().observe(
        view.ambitions.iter().copied(),
        view.objectives.iter().copied(),
    );
    if args.collapsed {
        expansion = expansion.collapsed_all();
    }
    for id in &args.toggles {
        expansion = expansion.toggled(level_of(&session.snapshot, id)?, id);
    }

    match args.scope.format {
        OutputFormat::Json => print_json(&TreeReport {
            filters: session.filters.to_raw(),
            stats: view.stats,
            expansion: &expansion,
            ambitions: navigator.tree(&view.ambitions),
        }),
        OutputFormat::Text => {
            print_header(&session, &view);
            println!();
            if view.ambitions.is_empty() {
                println!("{}", "No ambitions match the active filters.".yellow());
                return Ok(());
            }
            let renderer =
                TreeRenderer::new(&navigator, &expansion, session.config.display.max_title_chars);
            for line in renderer.render(&view.ambitions) {
                println!("{}", line);
            }
            Ok(())
        }
    }
}

fn cmd_filter(scope: &ScopeArgs) -> Result<(), OskarError> {
    let session = open_session(scope)?;
    let view = engine::apply(&session.snapshot, &session.filters);
    if scope.format == OutputFormat::Json {
        return print_json(&view);
    }

    let max = session.config.display.max_title_chars;
    print_header(&session, &view);

    println!();
    println!("{}", "Ambitions".bright_magenta().bold());
    for ambition in &view.ambitions {
        println!("  {} {}", ambition.id.dimmed(), truncate_title(&ambition.title, max));
    }
    println!("{}", "Objectives".bright_cyan().bold());
    for objective in &view.objectives {
        println!(
            "  {} {} {}",
            objective.id.dimmed(),
            format!("{} {}", objective.quarter, objective.year).cyan(),
            truncate_title(&objective.title, max)
        );
    }
    println!("{}", "Actions".bright_green().bold());
    for action in &view.actions {
        println!(
            "  {} {} [{}] [{}]",
            action.id.dimmed(),
            truncate_title(&action.title, max),
            status_label(action.status),
            priority_label(action.priority)
        );
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryReport {
    summary: String,
    active_filter_count: usize,
    filters: RawFilter,
}

fn cmd_summary(scope: &ScopeArgs) -> Result<(), OskarError> {
    let session = open_session(scope)?;
    let summary = describe(
        &session.filters,
        &session.snapshot.ambitions,
        &session.snapshot.quarterly_objectives,
    );
    match scope.format {
        OutputFormat::Json => print_json(&SummaryReport {
            summary,
            active_filter_count: session.filters.active_filter_count(),
            filters: session.filters.to_raw(),
        }),
        OutputFormat::Text => {
            println!("{}", summary);
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct Choice {
    id: String,
    title: String,
}

#[derive(Serialize)]
struct Facets {
    ambitions: Vec<Choice>,
    quarters: Vec<Quarter>,
    years: Vec<i32>,
    priorities: Vec<Priority>,
    statuses: Vec<ActionStatus>,
    labels: Vec<String>,
}

fn cmd_facets(scope: &ScopeArgs) -> Result<(), OskarError> {
    let session = open_session(scope)?;
    let snapshot = &session.snapshot;
    let facets = Facets {
        ambitions: snapshot
            .ambitions
            .iter()
            .map(|a| Choice {
                id: a.id.clone(),
                title: a.title.clone(),
            })
            .collect(),
        quarters: Quarter::ALL.to_vec(),
        years: engine::available_years(&snapshot.quarterly_objectives),
        priorities: Priority::ALL.to_vec(),
        statuses: ActionStatus::ALL.to_vec(),
        labels: engine::available_labels(&snapshot.actions),
    };
    if scope.format == OutputFormat::Json {
        return print_json(&facets);
    }

    let join = |items: Vec<String>| items.join(", ");
    println!(
        "{} {}",
        "Ambitions:".bold(),
        join(facets.ambitions.iter().map(|c| format!("{} ({})", c.title, c.id)).collect())
    );
    println!(
        "{} {}",
        "Quarters:".bold(),
        join(facets.quarters.iter().map(|q| quarter_label(*q).to_string()).collect())
    );
    println!(
        "{} {}",
        "Years:".bold(),
        join(facets.years.iter().map(ToString::to_string).collect())
    );
    println!(
        "{} {}",
        "Priorities:".bold(),
        join(facets.priorities.iter().map(|p| priority_label(*p).to_string()).collect())
    );
    println!(
        "{} {}",
        "Statuses:".bold(),
        join(facets.statuses.iter().map(|s| status_label(*s).to_string()).collect())
    );
    println!("{} {}", "Labels:".bold(), join(facets.labels.clone()));
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DashboardReport {
    today: chrono::NaiveDate,
    metrics: DashboardMetrics,
    deadlines: Vec<UpcomingDeadline>,
}

fn cmd_dashboard(args: &DashboardCli) -> Result<(), OskarError> {
    let session = open_session(&args.scope)?;
    if session.filters.has_active_filters() {
        warn!("dashboard metrics cover the whole snapshot; filters are ignored");
    }
    let today = match &args.today {
        Some(raw) => time::parse_date(raw)?,
        None => time::today(),
    };
    let horizon = args
        .horizon
        .unwrap_or(session.config.dashboard.deadline_horizon_days);
    let metrics = DashboardMetrics::compute(&session.snapshot, today, horizon);
    let deadlines = upcoming_deadlines(&session.snapshot.actions, today, horizon);

    if args.scope.format == OutputFormat::Json {
        return print_json(&DashboardReport {
            today,
            metrics,
            deadlines,
        });
    }

    println!("{} {}", "Dashboard".bold(), today.to_string().dimmed());
    println!("  Active ambitions:   {}", metrics.active_ambitions);
    println!("  Active objectives:  {}", metrics.active_objectives);
    println!("  Completed actions:  {}", metrics.completed_actions);
    println!("  Overall progress:   {}", progress_bar(metrics.overall_progress));
    println!(
        "  Upcoming deadlines: {} {}",
        metrics.upcoming_deadlines,
        format!("(next {} days)", horizon).dimmed()
    );
    let max = session.config.display.max_title_chars;
    for deadline in &deadlines {
        let days = if deadline.days_left == 1 {
            "tomorrow".to_string()
        } else {
            format!("in {} days", deadline.days_left)
        };
        println!(
            "    {} {} {}",
            deadline.deadline.to_string().yellow(),
            truncate_title(&deadline.title, max),
            days.dimmed()
        );
    }
    Ok(())
}

pub fn run() -> Result<(), OskarError> {
    init_tracing();
    let cli = Cli::parse();

    match &cli.command {
        Command::Version => {
            println!("v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Command::Tree(args) => cmd_tree(args),
        Command::Filter(scope) => cmd_filter(scope),
        Command::Summary(scope) => cmd_summary(scope),
        Command::Facets(scope) => cmd_facets(scope),
        Command::Dashboard(args) => cmd_dashboard(args),
    }
}
