use anyhow::Result;

use crate::model::{Priority, TaskRecord};
use crate::ops;
use crate::stats::{self, Stats};
use crate::store::Store;
use crate::view::{subject_node, topic_node, Filter, RenderBody, Screen, ViewMode, ViewState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Subject,
    Topic,
    Task,
}

/// A flattened render-model row for display.
#[derive(Debug, Clone)]
pub struct Row {
    pub kind: RowKind,
    /// Collapse key, present on subject and topic rows.
    pub node: Option<String>,
    pub task_id: Option<i64>,
    pub subject: String,
    pub label: String,
    pub stats: Option<Stats>,
    pub completed: bool,
    pub priority: Option<Priority>,
    pub has_children: bool,
    pub collapsed: bool,
    pub depth: usize,
    pub is_last_at_depth: Vec<bool>,
}

pub struct App {
    pub state: ViewState,
    pub rows: Vec<Row>,
    pub cursor: usize,
    pub overall: Stats,
    pub subject_count: usize,
    pub pending_delete: Option<(i64, String)>,
    pub error: Option<String>,
    tasks: Vec<TaskRecord>,
}

impl App {
    pub fn new(store: &Store, subject: Option<&str>) -> Result<Self> {
        let mut state = ViewState::new();
        state.set_mode(ViewMode::Hierarchical);
        match subject {
            Some(s) => state.view_subject(s),
            None => state.view_all_tasks(),
        }
        let mut app = App {
            state,
            rows: Vec::new(),
            cursor: 0,
            overall: Stats::default(),
            subject_count: 0,
            pending_delete: None,
            error: None,
            tasks: Vec::new(),
        };
        app.refresh(store);
        Ok(app)
    }

    /// Reload the collection from the store and rebuild the rows.
    pub fn refresh(&mut self, store: &Store) {
        self.tasks = store.load();
        if self.tasks.is_empty() {
            self.state.reset();
        } else if self.state.screen() == Screen::Landing {
            self.state.view_all_tasks();
        }
        self.rebuild();
    }

    /// Re-project the cached collection through the current view state.
    pub fn rebuild(&mut self) {
        let model = self.state.project(&self.tasks);
        self.overall = model.overall;
        self.subject_count = model.subjects;
        self.rows = match &model.body {
            RenderBody::Flat { tasks } => tasks.iter().map(flat_row).collect(),
            RenderBody::Grouped { subjects } => {
                let mut rows = Vec::new();
                for group in subjects {
                    let subject_row = Row {
                        kind: RowKind::Subject,
                        node: Some(subject_node(&group.subject)),
                        task_id: None,
                        subject: group.subject.clone(),
                        label: group.subject.clone(),
                        stats: Some(group.stats),
                        completed: false,
                        priority: None,
                        has_children: !group.topics.is_empty(),
                        collapsed: group.collapsed,
                        depth: 0,
                        is_last_at_depth: Vec::new(),
                    };
                    rows.push(subject_row);
                    if group.collapsed {
                        continue;
                    }
                    for (i, topic) in group.topics.iter().enumerate() {
                        let topic_last = i == group.topics.len() - 1;
                        rows.push(Row {
                            kind: RowKind::Topic,
                            node: Some(topic_node(&group.subject, &topic.topic)),
                            task_id: None,
                            subject: group.subject.clone(),
                            label: topic.topic.clone(),
                            stats: Some(topic.stats),
                            completed: false,
                            priority: None,
                            has_children: !topic.tasks.is_empty(),
                            collapsed: topic.collapsed,
                            depth: 1,
                            is_last_at_depth: vec![topic_last],
                        });
                        if topic.collapsed {
                            continue;
                        }
                        for (j, task) in topic.tasks.iter().enumerate() {
                            let task_last = j == topic.tasks.len() - 1;
                            let mut row = flat_row(task);
                            row.depth = 2;
                            row.is_last_at_depth = vec![topic_last, task_last];
                            rows.push(row);
                        }
                    }
                }
                rows
            }
        };
        if self.rows.is_empty() {
            self.cursor = 0;
        } else if self.cursor >= self.rows.len() {
            self.cursor = self.rows.len() - 1;
        }
    }

    pub fn move_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn move_down(&mut self) {
        if !self.rows.is_empty() && self.cursor < self.rows.len() - 1 {
            self.cursor += 1;
        }
    }

    pub fn selected(&self) -> Option<&Row> {
        self.rows.get(self.cursor)
    }

    pub fn toggle_collapse(&mut self) {
        let Some(node) = self.selected().and_then(|r| r.node.clone()) else {
            return;
        };
        self.state.toggle_node(&node);
        self.rebuild();
    }

    pub fn toggle_done(&mut self, store: &Store) {
        let Some(id) = self.selected().and_then(|r| r.task_id) else {
            return;
        };
        self.error = None;
        match ops::toggle_task(store, id) {
            Ok(_) => self.refresh(store),
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    pub fn request_delete(&mut self) {
        if let Some(row) = self.selected() {
            if let Some(id) = row.task_id {
                self.pending_delete = Some((id, row.label.clone()));
            }
        }
    }

    pub fn confirm_delete(&mut self, store: &Store) {
        if let Some((id, _)) = self.pending_delete.take() {
            self.error = None;
            match ops::delete_task(store, id) {
                Ok(_) => self.refresh(store),
                Err(e) => self.error = Some(e.to_string()),
            }
        }
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Cycle the filter: all subjects, then each subject in first-appearance
    /// order, then back to all. The mode is untouched.
    pub fn cycle_filter(&mut self) {
        let subjects: Vec<String> = stats::by_subject(&self.tasks)
            .into_iter()
            .map(|(s, _)| s)
            .collect();
        if subjects.is_empty() {
            return;
        }
        let next = match self.state.filter() {
            Filter::All => Some(subjects[0].clone()),
            Filter::Subject(current) => {
                let pos = subjects.iter().position(|s| s == current);
                match pos {
                    Some(i) if i + 1 < subjects.len() => Some(subjects[i + 1].clone()),
                    _ => None,
                }
            }
        };
        match next {
            Some(s) => self.state.view_subject(&s),
            None => self.state.view_all_tasks(),
        }
        self.cursor = 0;
        self.rebuild();
    }

    pub fn toggle_mode(&mut self) {
        self.state.set_mode(self.state.mode().toggled());
        self.rebuild();
    }
}

fn flat_row(task: &TaskRecord) -> Row {
    let label = match &task.topic {
        Some(topic) => format!("{topic} - {}", task.name),
        None => task.name.clone(),
    };
    Row {
        kind: RowKind::Task,
        node: None,
        task_id: Some(task.id),
        subject: task.subject.clone(),
        label,
        stats: None,
        completed: task.completed,
        priority: Some(task.priority),
        has_children: false,
        collapsed: false,
        depth: 0,
        is_last_at_depth: Vec::new(),
    }
}
