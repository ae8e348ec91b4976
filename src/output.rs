use crate::stats::Stats;
use crate::view::{RenderBody, RenderModel, SubjectGroup};

/// One line per subject plus an overall footer, for the `subjects` overview.
pub fn format_overview(subjects: &[(String, Stats)], overall: Stats) -> String {
    let width = subjects.iter().map(|(s, _)| s.len()).max().unwrap_or(0);
    let mut out = String::new();
    for (subject, s) in subjects {
        out.push_str(&format!(
            "{subject:<width$}  {}/{} completed ({}%)\n",
            s.completed, s.total, s.percentage
        ));
    }
    out.push_str(&format!(
        "\nOverall: {}/{} tasks ({}%) across {} subjects\n",
        overall.completed,
        overall.total,
        overall.percentage,
        subjects.len()
    ));
    out
}

/// Flat task list: one line per task in insertion order.
pub fn format_flat(model: &RenderModel) -> String {
    let RenderBody::Flat { tasks } = &model.body else {
        return String::new();
    };
    let mut out = String::new();
    for task in tasks {
        let display_name = match &task.topic {
            Some(topic) => format!("{topic} - {}", task.name),
            None => task.name.clone(),
        };
        let completed = task
            .completed_on
            .map(|ts| format!("  completed {}", crate::report::format_date(ts)))
            .unwrap_or_default();
        out.push_str(&format!(
            "{} {:>4}  {}  {}  [{}]{}\n",
            task.icon(),
            task.id,
            task.subject,
            display_name,
            task.priority.label(),
            completed
        ));
    }
    out
}

/// Hierarchical subject > topic > task tree with collapse markers.
pub fn format_tree(model: &RenderModel) -> String {
    let RenderBody::Grouped { subjects } = &model.body else {
        return String::new();
    };
    let mut out = String::new();
    for group in subjects {
        write_subject(&mut out, group);
    }
    out
}

fn write_subject(out: &mut String, group: &SubjectGroup) {
    let marker = if group.collapsed { ">" } else { "v" };
    out.push_str(&format!(
        "{marker} {}  {}/{} completed ({}%)\n",
        group.subject, group.stats.completed, group.stats.total, group.stats.percentage
    ));
    if group.collapsed {
        return;
    }
    for (i, topic) in group.topics.iter().enumerate() {
        let last_topic = i == group.topics.len() - 1;
        let (connector, extension) = if last_topic {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        let marker = if topic.collapsed { ">" } else { "v" };
        out.push_str(&format!(
            "{connector}{marker} {}  {}/{}\n",
            topic.topic, topic.stats.completed, topic.stats.total
        ));
        if topic.collapsed {
            continue;
        }
        for (j, task) in topic.tasks.iter().enumerate() {
            let task_connector = if j == topic.tasks.len() - 1 {
                "└── "
            } else {
                "├── "
            };
            out.push_str(&format!(
                "{extension}{task_connector}{} {}  [{}]\n",
                task.icon(),
                task.name,
                task.priority.label()
            ));
        }
    }
}
