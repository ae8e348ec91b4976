use chrono::{DateTime, NaiveDate, Utc};

use crate::model::TaskRecord;
use crate::stats;

/// Default name for the exported artifact, e.g. `course-progress-2026-08-23.txt`.
pub fn default_filename(date: NaiveDate) -> String {
    format!("course-progress-{date}.txt")
}

pub(crate) fn format_date(ts: DateTime<Utc>) -> String {
    ts.format("%b %-d, %Y").to_string()
}

/// Render the full progress report. Deterministic for a given collection
/// and generation timestamp: same input, same bytes.
pub fn render(tasks: &[TaskRecord], generated_at: DateTime<Utc>) -> String {
    let overall = stats::overall(tasks);
    let subjects = stats::by_subject(tasks);

    let mut out = String::new();
    out.push_str("Coursetrack - Progress Report\n");
    out.push_str(&format!(
        "Generated: {}\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str("\n=================================\n");
    out.push_str(&format!(
        "Overall Progress: {}/{} tasks ({}%)\n",
        overall.completed, overall.total, overall.percentage
    ));
    out.push_str(&format!("Total Subjects: {}\n", subjects.len()));
    out.push_str("=================================\n\n");

    out.push_str("PROGRESS BY SUBJECT:\n");
    out.push_str("--------------------\n");
    for (subject, s) in &subjects {
        out.push_str(&format!(
            "{subject}: {}/{} ({}%)\n",
            s.completed, s.total, s.percentage
        ));
    }
    out.push('\n');

    out.push_str(&format!("COMPLETED TASKS ({}):\n", overall.completed));
    out.push_str("------------------\n");
    for (subject, _) in &subjects {
        let completed: Vec<&TaskRecord> = tasks
            .iter()
            .filter(|t| t.subject == *subject && t.completed)
            .collect();
        if completed.is_empty() {
            continue;
        }
        out.push_str(&format!("\n[{subject}]\n"));
        for (i, task) in completed.iter().enumerate() {
            out.push_str(&format!("  {}. [x] {}\n", i + 1, task.name));
            let completed_on = task
                .completed_on
                .map(format_date)
                .unwrap_or_else(|| "-".to_string());
            out.push_str(&format!(
                "     Priority: {} | Completed: {completed_on}\n",
                task.priority.label()
            ));
        }
    }

    let pending_total = overall.total - overall.completed;
    if pending_total > 0 {
        out.push_str(&format!("\n\nPENDING TASKS ({pending_total}):\n"));
        out.push_str("------------------\n");
        for (subject, _) in &subjects {
            let pending: Vec<&TaskRecord> = tasks
                .iter()
                .filter(|t| t.subject == *subject && !t.completed)
                .collect();
            if pending.is_empty() {
                continue;
            }
            out.push_str(&format!("\n[{subject}]\n"));
            for (i, task) in pending.iter().enumerate() {
                out.push_str(&format!("  {}. [ ] {}\n", i + 1, task.name));
                out.push_str(&format!("     Priority: {}\n", task.priority.label()));
            }
        }
    }

    out
}
