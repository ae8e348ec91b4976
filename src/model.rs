use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Subject assigned to tasks whose plan line carries no subject field.
pub const GENERAL_SUBJECT: &str = "General";

/// Synthetic topic bucket for tasks without a topic.
pub const OTHER_TOPIC: &str = "Other";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn parse(s: &str) -> anyhow::Result<Self> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => anyhow::bail!("invalid priority '{s}': must be low, medium, or high"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Uppercase form used in reports and badges.
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single trackable unit of work. Identity fields (id, subject, topic,
/// name, added_on) never change after creation; only the completion state
/// and its timestamp do.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: i64,
    pub subject: String,
    #[serde(default)]
    pub topic: Option<String>,
    pub name: String,
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    pub added_on: DateTime<Utc>,
    #[serde(default)]
    pub completed_on: Option<DateTime<Utc>>,
}

impl TaskRecord {
    pub fn new(
        id: i64,
        subject: String,
        topic: Option<String>,
        name: String,
        priority: Priority,
        added_on: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            subject,
            topic,
            name,
            completed: false,
            priority,
            added_on,
            completed_on: None,
        }
    }

    /// Set the completion state, keeping `completed_on` in lockstep:
    /// present iff completed.
    pub fn set_completed(&mut self, done: bool, at: DateTime<Utc>) {
        self.completed = done;
        self.completed_on = if done { Some(at) } else { None };
    }

    pub fn icon(&self) -> &'static str {
        if self.completed {
            "x"
        } else {
            "."
        }
    }
}

/// Monotonic id allocator seeded from the current collection maximum.
/// Ids never come from the clock, so bulk imports and rapid single adds
/// cannot collide.
#[derive(Debug)]
pub struct IdAlloc {
    next: i64,
}

impl IdAlloc {
    pub fn seeded(tasks: &[TaskRecord]) -> Self {
        let max = tasks.iter().map(|t| t.id).max().unwrap_or(0);
        Self { next: max + 1 }
    }

    pub fn next(&mut self) -> i64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_round_trip() {
        for p in [Priority::Low, Priority::Medium, Priority::High] {
            assert_eq!(Priority::parse(p.as_str()).unwrap(), p);
        }
        assert!(Priority::parse("urgent").is_err());
    }

    #[test]
    fn completion_invariant() {
        let now = Utc::now();
        let mut task = TaskRecord::new(1, "Math".into(), None, "Read".into(), Priority::Medium, now);
        assert!(!task.completed);
        assert!(task.completed_on.is_none());

        task.set_completed(true, now);
        assert!(task.completed);
        assert_eq!(task.completed_on, Some(now));

        task.set_completed(false, now);
        assert!(!task.completed);
        assert!(task.completed_on.is_none());
    }

    #[test]
    fn id_alloc_seeds_past_max() {
        let now = Utc::now();
        let tasks = vec![
            TaskRecord::new(3, "A".into(), None, "x".into(), Priority::Medium, now),
            TaskRecord::new(7, "A".into(), None, "y".into(), Priority::Medium, now),
        ];
        let mut ids = IdAlloc::seeded(&tasks);
        assert_eq!(ids.next(), 8);
        assert_eq!(ids.next(), 9);
    }

    #[test]
    fn id_alloc_empty_starts_at_one() {
        let mut ids = IdAlloc::seeded(&[]);
        assert_eq!(ids.next(), 1);
    }

    #[test]
    fn serialized_field_names_match_slot_format() {
        let now = "2026-01-05T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let mut task = TaskRecord::new(
            1,
            "Math".into(),
            Some("Algebra".into()),
            "Solve".into(),
            Priority::High,
            now,
        );
        task.set_completed(true, now);
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["addedOn"], "2026-01-05T00:00:00Z");
        assert_eq!(json["completedOn"], "2026-01-05T00:00:00Z");
        assert_eq!(json["priority"], "high");
        assert_eq!(json["topic"], "Algebra");
    }
}
