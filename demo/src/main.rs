//! VIGIL Agent Monitor — Demo CLI
//!
//! Drives a real `AgentMonitor` backed by a JSON snapshot file: a simulated
//! multi-agent extraction workflow, plus inspection subcommands that read
//! the persisted state the way a dashboard would.
//!
//! Usage:
//!   cargo run -p demo -- simulate
//!   cargo run -p demo -- summary
//!   cargo run -p demo -- stalled --timeout-secs 300
//!   cargo run -p demo -- --config monitor.toml simulate

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vigil_contracts::{
    error::VigilResult,
    event::MonitorEvent,
    status::{AgentStatus, TaskPriority},
};
use vigil_core::{AgentMonitor, EventSink, MonitorConfig};
use vigil_persist::JsonSnapshotStore;

// ── CLI definition ────────────────────────────────────────────────────────────

/// VIGIL — agent/task monitor demo.
///
/// All subcommands operate on the snapshot file named by the configuration
/// (default `data/monitor_state.json`), so `simulate` followed by `summary`
/// demonstrates restart recovery.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "VIGIL agent monitor demo",
    long_about = "Simulates a multi-agent document-extraction workflow against a\n\
                  persistent agent monitor, and inspects the resulting state."
)]
struct Cli {
    /// Path to a TOML monitor configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the simulated extraction workflow: three agents, three tasks,
    /// progress reports, heartbeats, and one failure.
    Simulate,
    /// Print the overall summary from the persisted state.
    Summary,
    /// List agents whose last heartbeat is older than the timeout.
    Stalled {
        /// Heartbeat age, in seconds, after which an agent counts as stalled.
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = load_config(cli.config.as_deref()).and_then(|config| {
        let store = JsonSnapshotStore::new(&config.snapshot_path);
        let monitor = AgentMonitor::with_config(Box::new(store), config.clone());

        match cli.command {
            Command::Simulate => simulate(&monitor),
            Command::Summary => summary(&monitor),
            Command::Stalled { timeout_secs } => stalled(&monitor, &config, timeout_secs),
        }
    });

    if let Err(e) = result {
        eprintln!("demo error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&std::path::Path>) -> VigilResult<MonitorConfig> {
    match path {
        Some(path) => MonitorConfig::from_file(path),
        None => Ok(MonitorConfig::default()),
    }
}

// ── Simulated workflow ────────────────────────────────────────────────────────

/// A sink that prints each event, standing in for a dashboard refresher.
struct PrintingSink;

impl EventSink for PrintingSink {
    fn on_event(&self, event: &MonitorEvent) {
        match event {
            MonitorEvent::AgentRegistered { agent } => {
                println!("  [event] agent registered: {} ({})", agent.name, agent.agent_type);
            }
            MonitorEvent::TaskStatusUpdated { task, old_status } => {
                println!("  [event] task '{}': {} -> {}", task.description, old_status, task.status);
            }
            MonitorEvent::SnapshotFailed { reason } => {
                println!("  [event] snapshot save failed: {}", reason);
            }
            _ => {}
        }
    }
}

fn simulate(monitor: &AgentMonitor) -> VigilResult<()> {
    println!();
    println!("VIGIL — Agent Monitor");
    println!("Simulated Extraction Workflow");
    println!("=============================");
    println!();

    monitor.register_sink(Arc::new(PrintingSink));

    println!("Registering extraction agents...");
    let primary = monitor.register_agent(
        "Extractor-Primary",
        "gemini_extractor",
        [("model".to_string(), serde_json_value("gemini-2.5-pro"))].into(),
    );
    let secondary = monitor.register_agent(
        "Extractor-Secondary",
        "gemini_extractor",
        [("model".to_string(), serde_json_value("gemini-2.5-flash"))].into(),
    );
    let validator = monitor.register_agent("Validator", "validator", Default::default());

    println!();
    println!("Assigning tasks...");
    let task1 = monitor.assign_task(
        &primary,
        "Extract pages 6-50 (primary schematics)",
        "page_extraction",
        TaskPriority::High,
        page_range(6, 50),
        Default::default(),
    )?;
    let task2 = monitor.assign_task(
        &secondary,
        "Extract pages 51-100 (secondary circuits)",
        "page_extraction",
        TaskPriority::Normal,
        page_range(51, 100),
        Default::default(),
    )?;
    let task3 = monitor.assign_task(
        &validator,
        "Validate extracted data",
        "validation",
        TaskPriority::Normal,
        BTreeSet::new(),
        Default::default(),
    )?;

    // Primary extracts its range in five progress steps.
    println!();
    println!("Primary extraction...");
    monitor.update_agent_status(&primary, AgentStatus::Running, Some("initializing client"))?;
    monitor.update_task_status(&task1, AgentStatus::Running, None)?;
    for step in 1..=5 {
        let progress = step as f64 / 5.0;
        let last_page = 6 + (44.0 * progress) as u32;
        monitor.update_task_progress(&task1, progress, page_range(6, last_page))?;
        monitor.heartbeat(&primary, Some(&task1))?;
        println!("  primary progress: {:.0}%", progress * 100.0);
    }
    monitor.update_task_status(&task1, AgentStatus::Completed, None)?;
    monitor.update_agent_status(&primary, AgentStatus::Completed, Some("extraction finished"))?;

    // Secondary hits an upstream failure partway through.
    println!();
    println!("Secondary extraction...");
    monitor.update_agent_status(&secondary, AgentStatus::Running, Some("processing pages"))?;
    monitor.update_task_status(&task2, AgentStatus::Running, None)?;
    monitor.update_task_progress(&task2, 0.4, page_range(51, 70))?;
    monitor.heartbeat(&secondary, Some(&task2))?;
    monitor.update_task_status(&task2, AgentStatus::Failed, Some("vision API quota exhausted"))?;
    monitor.update_agent_status(&secondary, AgentStatus::Failed, Some("gave up after quota error"))?;
    println!("  secondary failed: vision API quota exhausted");

    // Validation runs over whatever was extracted.
    println!();
    println!("Validation...");
    monitor.update_agent_status(&validator, AgentStatus::Running, Some("checking references"))?;
    monitor.update_task_status(&task3, AgentStatus::Running, None)?;
    monitor.update_task_progress(&task3, 1.0, BTreeSet::new())?;
    monitor.heartbeat(&validator, Some(&task3))?;
    monitor.update_task_status(&task3, AgentStatus::Completed, None)?;
    monitor.update_agent_status(&validator, AgentStatus::Completed, None)?;

    println!();
    print_summary(monitor);
    Ok(())
}

// ── Inspection subcommands ────────────────────────────────────────────────────

fn summary(monitor: &AgentMonitor) -> VigilResult<()> {
    print_summary(monitor);
    Ok(())
}

fn stalled(
    monitor: &AgentMonitor,
    config: &MonitorConfig,
    timeout_secs: Option<u64>,
) -> VigilResult<()> {
    let timeout = timeout_secs
        .map(|secs| chrono::Duration::seconds(secs as i64))
        .unwrap_or_else(|| config.stall_timeout());

    let stalled = monitor.stalled_agents(timeout);
    if stalled.is_empty() {
        println!("no stalled agents (timeout {}s)", timeout.num_seconds());
    } else {
        println!("stalled agents (timeout {}s):", timeout.num_seconds());
        for agent_id in stalled {
            if let Some(agent) = monitor.get_agent(&agent_id) {
                let last = agent
                    .last_heartbeat_at
                    .unwrap_or(agent.registered_at);
                println!("  {} ({}) — last signal {}", agent.name, agent_id, last);
            }
        }
    }
    Ok(())
}

fn print_summary(monitor: &AgentMonitor) {
    let summary = monitor.summary();

    println!("Summary");
    println!("-------");
    println!("agents: {}   tasks: {}", summary.total_agents, summary.total_tasks);
    println!("overall progress: {:.0}%", summary.overall_progress * 100.0);

    println!("tasks by status:");
    for (status, count) in &summary.tasks_by_status {
        if *count > 0 {
            println!("  {:<13} {}", status.to_string(), count);
        }
    }

    println!("agents:");
    for agent in &summary.agents {
        println!(
            "  {:<20} {:<10} completed={} failed={} {}",
            agent.name,
            agent.status.to_string(),
            agent.tasks_completed,
            agent.tasks_failed,
            agent.current_activity.as_deref().unwrap_or("-"),
        );
    }

    if !summary.recent_activity.is_empty() {
        println!("recent activity:");
        for entry in &summary.recent_activity {
            println!(
                "  {} {:?} {} — {}",
                entry.timestamp.format("%H:%M:%S"),
                entry.event,
                entry.agent,
                entry.description
            );
        }
    }

    let incomplete = monitor.incomplete_tasks();
    println!("incomplete tasks: {}", incomplete.len());
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn page_range(first: u32, last: u32) -> BTreeSet<u32> {
    (first..=last).collect()
}

fn serde_json_value(s: &str) -> serde_json::Value {
    serde_json::Value::String(s.to_string())
}
