use anyhow::{bail, Result};
use chrono::Utc;

use crate::model::{IdAlloc, Priority, TaskRecord};
use crate::parse;
use crate::store::Store;

// Every mutation follows the same discipline: load the full collection,
// apply one logical change, save the full collection. Lookup misses are
// no-ops and skip the save entirely.

/// Parse a plan and append its tasks to the collection. Input that yields
/// no tasks (empty or all-blank) is rejected before anything is written.
pub fn import_plan(store: &Store, raw: &str) -> Result<usize> {
    let mut tasks = store.load();
    let mut ids = IdAlloc::seeded(&tasks);
    let parsed = parse::parse_plan(raw, &mut ids, Utc::now());
    if parsed.is_empty() {
        bail!("no tasks found in input");
    }
    let count = parsed.len();
    tasks.extend(parsed);
    store.save(&tasks)?;
    Ok(count)
}

pub fn add_task(
    store: &Store,
    subject: &str,
    topic: Option<&str>,
    name: &str,
    priority: Priority,
) -> Result<TaskRecord> {
    let subject = subject.trim();
    let name = name.trim();
    if subject.is_empty() || name.is_empty() {
        bail!("subject and task name must not be empty");
    }
    let topic = topic.map(str::trim).filter(|t| !t.is_empty()).map(String::from);

    let mut tasks = store.load();
    let mut ids = IdAlloc::seeded(&tasks);
    let task = TaskRecord::new(
        ids.next(),
        subject.to_string(),
        topic,
        name.to_string(),
        priority,
        Utc::now(),
    );
    tasks.push(task.clone());
    store.save(&tasks)?;
    Ok(task)
}

/// Flip a task's completion state. Returns the new state, or None if no
/// task has that id (nothing is written in that case).
pub fn toggle_task(store: &Store, id: i64) -> Result<Option<bool>> {
    let mut tasks = store.load();
    let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
        return Ok(None);
    };
    let done = !task.completed;
    task.set_completed(done, Utc::now());
    store.save(&tasks)?;
    Ok(Some(done))
}

/// Remove a task by id. Returns false (and writes nothing) on a miss.
pub fn delete_task(store: &Store, id: i64) -> Result<bool> {
    let mut tasks = store.load();
    let before = tasks.len();
    tasks.retain(|t| t.id != id);
    if tasks.len() == before {
        return Ok(false);
    }
    store.save(&tasks)?;
    Ok(true)
}

pub fn clear_all(store: &Store) -> Result<()> {
    store.clear()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("tasks.json"));
        (dir, store)
    }

    #[test]
    fn import_appends_to_existing() {
        let (_dir, store) = temp_store();
        assert_eq!(import_plan(&store, "Math | Algebra | Solve").unwrap(), 1);
        assert_eq!(import_plan(&store, "History | Read\nEssay").unwrap(), 2);
        let tasks = store.load();
        assert_eq!(tasks.len(), 3);
        let ids: Vec<i64> = tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn import_rejects_blank_input() {
        let (_dir, store) = temp_store();
        assert!(import_plan(&store, "").is_err());
        assert!(import_plan(&store, "\n  \n").is_err());
        assert!(store.load().is_empty());
    }

    #[test]
    fn add_validates_required_fields() {
        let (_dir, store) = temp_store();
        assert!(add_task(&store, "", None, "x", Priority::Medium).is_err());
        assert!(add_task(&store, "Math", None, "  ", Priority::Medium).is_err());
        assert!(store.load().is_empty());

        let task = add_task(&store, " Math ", Some(" "), " Solve ", Priority::High).unwrap();
        assert_eq!(task.subject, "Math");
        assert!(task.topic.is_none());
        assert_eq!(task.name, "Solve");
        assert_eq!(store.load().len(), 1);
    }

    #[test]
    fn toggle_maintains_completed_on_invariant() {
        let (_dir, store) = temp_store();
        let task = add_task(&store, "Math", None, "Solve", Priority::Medium).unwrap();

        assert_eq!(toggle_task(&store, task.id).unwrap(), Some(true));
        let loaded = &store.load()[0];
        assert!(loaded.completed);
        assert!(loaded.completed_on.is_some());

        assert_eq!(toggle_task(&store, task.id).unwrap(), Some(false));
        let loaded = &store.load()[0];
        assert!(!loaded.completed);
        assert!(loaded.completed_on.is_none());
    }

    #[test]
    fn toggle_miss_is_noop() {
        let (_dir, store) = temp_store();
        add_task(&store, "Math", None, "Solve", Priority::Medium).unwrap();
        let before = fs::read(store.path()).unwrap();
        assert_eq!(toggle_task(&store, 999).unwrap(), None);
        assert_eq!(fs::read(store.path()).unwrap(), before);
    }

    #[test]
    fn delete_removes_only_target() {
        let (_dir, store) = temp_store();
        let a = add_task(&store, "Math", None, "a", Priority::Medium).unwrap();
        let b = add_task(&store, "Math", None, "b", Priority::Medium).unwrap();
        assert!(delete_task(&store, a.id).unwrap());
        let tasks = store.load();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, b.id);
    }

    #[test]
    fn delete_miss_leaves_file_byte_identical() {
        let (_dir, store) = temp_store();
        add_task(&store, "Math", None, "a", Priority::Medium).unwrap();
        let before = fs::read(store.path()).unwrap();
        assert!(!delete_task(&store, 42).unwrap());
        assert_eq!(fs::read(store.path()).unwrap(), before);
    }

    #[test]
    fn clear_empties_collection() {
        let (_dir, store) = temp_store();
        add_task(&store, "Math", None, "a", Priority::Medium).unwrap();
        clear_all(&store).unwrap();
        assert!(store.load().is_empty());
    }
}
