use serde::Serialize;

use crate::model::{TaskRecord, OTHER_TOPIC};

/// Aggregate progress triple. Never persisted; recomputed on every read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    pub percentage: u32,
}

impl Stats {
    fn count(&mut self, done: bool) {
        self.total += 1;
        if done {
            self.completed += 1;
        }
    }

    fn finalize(&mut self) {
        self.percentage = percent(self.completed, self.total);
    }
}

/// Rounded completion percentage; an empty group reads 0%, never NaN.
pub fn percent(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (completed as f64 / total as f64 * 100.0).round() as u32
}

/// Find or append a group slot, preserving first-appearance order.
/// Grouping deliberately avoids hash maps: subject and topic ordering is
/// part of the rendering contract.
fn slot<'a, V: Default>(groups: &'a mut Vec<(String, V)>, key: &str) -> &'a mut V {
    if let Some(i) = groups.iter().position(|(k, _)| k == key) {
        return &mut groups[i].1;
    }
    groups.push((key.to_string(), V::default()));
    &mut groups.last_mut().unwrap().1
}

pub fn overall(tasks: &[TaskRecord]) -> Stats {
    let mut stats = Stats::default();
    for t in tasks {
        stats.count(t.completed);
    }
    stats.finalize();
    stats
}

/// Per-subject stats in first-appearance order.
pub fn by_subject(tasks: &[TaskRecord]) -> Vec<(String, Stats)> {
    let mut groups: Vec<(String, Stats)> = Vec::new();
    for t in tasks {
        slot(&mut groups, &t.subject).count(t.completed);
    }
    for (_, s) in &mut groups {
        s.finalize();
    }
    groups
}

/// Per-subject, per-topic stats. Tasks without a topic land in the
/// synthetic "Other" bucket. Both levels keep first-appearance order.
pub fn by_subject_and_topic(tasks: &[TaskRecord]) -> Vec<(String, Vec<(String, Stats)>)> {
    let mut groups: Vec<(String, Vec<(String, Stats)>)> = Vec::new();
    for t in tasks {
        let topics = slot(&mut groups, &t.subject);
        let topic = t.topic.as_deref().unwrap_or(OTHER_TOPIC);
        slot(topics, topic).count(t.completed);
    }
    for (_, topics) in &mut groups {
        for (_, s) in topics.iter_mut() {
            s.finalize();
        }
    }
    groups
}

/// Number of distinct subjects, first-appearance semantics.
pub fn subject_count(tasks: &[TaskRecord]) -> usize {
    let mut seen: Vec<&str> = Vec::new();
    for t in tasks {
        if !seen.contains(&t.subject.as_str()) {
            seen.push(&t.subject);
        }
    }
    seen.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Priority;
    use chrono::Utc;

    fn task(id: i64, subject: &str, topic: Option<&str>, done: bool) -> TaskRecord {
        let mut t = TaskRecord::new(
            id,
            subject.into(),
            topic.map(Into::into),
            format!("t{id}"),
            Priority::Medium,
            Utc::now(),
        );
        if done {
            t.set_completed(true, Utc::now());
        }
        t
    }

    #[test]
    fn empty_collection_is_all_zero() {
        assert_eq!(overall(&[]), Stats::default());
        assert!(by_subject(&[]).is_empty());
        assert!(by_subject_and_topic(&[]).is_empty());
        assert_eq!(subject_count(&[]), 0);
    }

    #[test]
    fn subject_and_overall_percentages() {
        let tasks = vec![
            task(1, "A", None, true),
            task(2, "A", None, false),
            task(3, "A", None, false),
            task(4, "A", None, false),
            task(5, "B", None, true),
            task(6, "B", None, true),
        ];
        let subjects = by_subject(&tasks);
        assert_eq!(
            subjects[0],
            ("A".to_string(), Stats { total: 4, completed: 1, percentage: 25 })
        );
        assert_eq!(
            subjects[1],
            ("B".to_string(), Stats { total: 2, completed: 2, percentage: 100 })
        );
        assert_eq!(overall(&tasks), Stats { total: 6, completed: 3, percentage: 50 });
    }

    #[test]
    fn first_appearance_order_is_stable() {
        let tasks = vec![
            task(1, "Zeta", None, false),
            task(2, "Alpha", None, false),
            task(3, "Zeta", None, false),
            task(4, "Mid", None, false),
        ];
        let grouped = by_subject(&tasks);
        let names: Vec<&str> = grouped.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
        assert_eq!(subject_count(&tasks), 3);
    }

    #[test]
    fn missing_topic_buckets_under_other() {
        let tasks = vec![
            task(1, "Math", Some("Algebra"), true),
            task(2, "Math", None, false),
            task(3, "Math", Some("Algebra"), false),
        ];
        let grouped = by_subject_and_topic(&tasks);
        assert_eq!(grouped.len(), 1);
        let (subject, topics) = &grouped[0];
        assert_eq!(subject, "Math");
        assert_eq!(topics[0].0, "Algebra");
        assert_eq!(topics[0].1, Stats { total: 2, completed: 1, percentage: 50 });
        assert_eq!(topics[1].0, "Other");
        assert_eq!(topics[1].1, Stats { total: 1, completed: 0, percentage: 0 });
    }

    #[test]
    fn rounding_matches_half_up() {
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 8), 13);
        assert_eq!(percent(0, 0), 0);
    }
}
