use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "coursetrack", about = "Course plan progress tracker")]
pub struct Cli {
    /// Path to the task store [default: ~/.coursetrack/tasks.json]
    #[arg(long, env = "COURSETRACK_STORE", global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Import a course plan (lines of "Subject | Topic | Task")
    Import {
        /// Plan file (omit to read from stdin)
        file: Option<PathBuf>,
    },

    /// Add a single task
    Add {
        /// Subject label
        subject: String,
        /// Task description
        name: String,
        /// Topic within the subject
        #[arg(short, long)]
        topic: Option<String>,
        /// Priority (low, medium, high)
        #[arg(short, long, default_value = "medium")]
        priority: String,
    },

    /// Toggle a task's completion state
    Toggle {
        /// Task id
        id: i64,
    },

    /// Delete a task
    Rm {
        /// Task id
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// List tasks
    List {
        /// Only tasks for this subject ("all" for everything)
        #[arg(short, long)]
        subject: Option<String>,
        /// Group by subject and topic instead of a flat list
        #[arg(long)]
        tree: bool,
        /// Output the render model as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show per-subject progress overview
    Subjects {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export a progress report
    Export {
        /// Output file [default: course-progress-<date>.txt]
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete all tasks
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Launch the interactive browser
    Tui {
        /// Start filtered to this subject
        #[arg(long)]
        subject: Option<String>,
        /// Poll interval in milliseconds
        #[arg(long, default_value = "1000")]
        poll_interval: u64,
    },
}
