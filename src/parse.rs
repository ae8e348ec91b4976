use chrono::{DateTime, Utc};

use crate::model::{IdAlloc, Priority, TaskRecord, GENERAL_SUBJECT};

/// Parse a line-oriented course plan into task records.
///
/// Each non-blank line is split on `|` into trimmed fields:
/// - 1 field:  name only, filed under "General"
/// - 2 fields: subject | name
/// - 3+ fields: subject | topic | name (extra fields ignored)
///
/// There is no reject path: any text is accepted as a task name, and empty
/// subject/topic fields fall back to "General" / no topic.
pub fn parse_plan(raw: &str, ids: &mut IdAlloc, now: DateTime<Utc>) -> Vec<TaskRecord> {
    raw.lines()
        .filter_map(|line| parse_line(line, ids, now))
        .collect()
}

fn parse_line(line: &str, ids: &mut IdAlloc, now: DateTime<Utc>) -> Option<TaskRecord> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let fields: Vec<&str> = line.split('|').map(str::trim).collect();

    let (subject, topic, name) = match fields.len() {
        1 => (GENERAL_SUBJECT, None, line),
        2 => (fields[0], None, fields[1]),
        _ => (fields[0], Some(fields[1]), fields[2]),
    };

    let subject = if subject.is_empty() { GENERAL_SUBJECT } else { subject };
    let topic = topic.filter(|t| !t.is_empty()).map(str::to_string);
    // Degenerate lines like "Math |" keep the whole line as the name.
    let name = if name.is_empty() { line } else { name };

    Some(TaskRecord::new(
        ids.next(),
        subject.to_string(),
        topic,
        name.to_string(),
        Priority::Medium,
        now,
    ))
}
