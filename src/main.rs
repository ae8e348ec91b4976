mod cli;
mod model;
mod ops;
mod output;
mod parse;
mod report;
mod stats;
mod store;
mod tui;
mod view;
mod watch;

use std::fs;
use std::io::Read as _;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Parser;
use serde::Serialize;

use cli::{Cli, Command};
use store::Store;
use view::{Filter, ViewMode, ViewState};

fn default_store_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".coursetrack").join("tasks.json"))
}

fn resolve_store(cli_store: Option<PathBuf>) -> Result<Store> {
    let path = match cli_store {
        Some(p) => p,
        None => default_store_path()?,
    };
    Ok(Store::new(path))
}

/// Ask for explicit confirmation before a destructive operation.
fn confirm(prompt: &str) -> Result<bool> {
    eprint!("{prompt} [y/N] ");
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let store = resolve_store(cli.store)?;

    match cli.command {
        Command::Import { file } => {
            let raw = match file {
                Some(path) => fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let count = ops::import_plan(&store, &raw)?;
            eprintln!("Imported {count} tasks");
        }

        Command::Add {
            subject,
            name,
            topic,
            priority,
        } => {
            let priority = model::Priority::parse(&priority)?;
            let task = ops::add_task(&store, &subject, topic.as_deref(), &name, priority)?;
            eprintln!("Added task '{}' (id {})", task.name, task.id);
        }

        Command::Toggle { id } => match ops::toggle_task(&store, id)? {
            Some(true) => {
                eprintln!("Marked task {id} as done");
                let all = stats::overall(&store.load());
                if all.total > 0 && all.completed == all.total {
                    eprintln!("All {} tasks complete!", all.total);
                }
            }
            Some(false) => eprintln!("Reopened task {id}"),
            None => eprintln!("Task {id} not found; nothing changed"),
        },

        Command::Rm { id, yes } => {
            if !yes && !confirm(&format!("Delete task {id}?"))? {
                eprintln!("Aborted");
                return Ok(());
            }
            if ops::delete_task(&store, id)? {
                eprintln!("Deleted task {id}");
            } else {
                eprintln!("Task {id} not found; nothing changed");
            }
        }

        Command::List {
            subject,
            tree,
            json,
        } => {
            let mut state = ViewState::new();
            if let Some(s) = &subject {
                state.set_filter(Filter::parse(s));
            }
            if tree {
                state.set_mode(ViewMode::Hierarchical);
            }
            let tasks = store.load();
            let model = state.project(&tasks);
            if json {
                println!("{}", serde_json::to_string_pretty(&model)?);
            } else if model.overall.total == 0 {
                eprintln!("No tasks yet. Import a course plan to get started.");
            } else if tree {
                print!("{}", output::format_tree(&model));
            } else {
                print!("{}", output::format_flat(&model));
            }
        }

        Command::Subjects { json } => {
            let tasks = store.load();
            let subjects = stats::by_subject(&tasks);
            if json {
                #[derive(Serialize)]
                struct SubjectStats<'a> {
                    subject: &'a str,
                    #[serde(flatten)]
                    stats: stats::Stats,
                }
                let rows: Vec<SubjectStats> = subjects
                    .iter()
                    .map(|(subject, stats)| SubjectStats {
                        subject,
                        stats: *stats,
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if subjects.is_empty() {
                eprintln!("No subjects yet");
            } else {
                print!("{}", output::format_overview(&subjects, stats::overall(&tasks)));
            }
        }

        Command::Export { output } => {
            let tasks = store.load();
            if tasks.is_empty() {
                bail!("no data to export");
            }
            let now = Utc::now();
            let path = output
                .unwrap_or_else(|| PathBuf::from(report::default_filename(now.date_naive())));
            fs::write(&path, report::render(&tasks, now))
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Exported progress report to {}", path.display());
        }

        Command::Clear { yes } => {
            if !yes && !confirm("Clear all tasks? This cannot be undone!")? {
                eprintln!("Aborted");
                return Ok(());
            }
            ops::clear_all(&store)?;
            eprintln!("All data cleared");
        }

        Command::Tui {
            subject,
            poll_interval,
        } => {
            tui::run(&store, subject.as_deref(), poll_interval)?;
        }
    }

    Ok(())
}
