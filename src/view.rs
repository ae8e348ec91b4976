use std::collections::HashSet;

use serde::Serialize;

use crate::model::{TaskRecord, OTHER_TOPIC};
use crate::stats::{self, Stats};

/// Sentinel accepted on the CLI and shown in headers for the all-subjects
/// filter.
pub const ALL_FILTER: &str = "all";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Filter {
    #[default]
    All,
    Subject(String),
}

impl Filter {
    pub fn parse(s: &str) -> Self {
        if s == ALL_FILTER {
            Self::All
        } else {
            Self::Subject(s.to_string())
        }
    }

    pub fn matches(&self, task: &TaskRecord) -> bool {
        match self {
            Self::All => true,
            Self::Subject(s) => task.subject == *s,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_FILTER,
            Self::Subject(s) => s,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Flat,
    Hierarchical,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Flat => Self::Hierarchical,
            Self::Hierarchical => Self::Flat,
        }
    }
}

/// Page-level navigation state. Landing is where an empty collection lands;
/// Overview requires data; TaskList is entered by picking a subject or
/// viewing everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Landing,
    Overview,
    TaskList,
}

/// Transient per-view state: active filter, flat/hierarchical mode, and the
/// set of collapsed subject/topic nodes. Never persisted; owned explicitly
/// by whoever drives a view rather than living in globals.
#[derive(Debug, Default)]
pub struct ViewState {
    filter: Filter,
    mode: ViewMode,
    screen: Screen,
    collapsed: HashSet<String>,
}

/// Collapse key for a subject node.
pub fn subject_node(subject: &str) -> String {
    subject.to_string()
}

/// Collapse key for a topic node within a subject.
pub fn topic_node(subject: &str, topic: &str) -> String {
    format!("{subject}::{topic}")
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    /// Switch between flat and hierarchical rendering. The active filter is
    /// untouched.
    pub fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
    }

    /// Enter the overview if there is anything to show; an empty collection
    /// stays on the landing screen.
    pub fn enter_overview(&mut self, tasks: &[TaskRecord]) {
        self.screen = if tasks.is_empty() {
            Screen::Landing
        } else {
            Screen::Overview
        };
    }

    pub fn view_subject(&mut self, subject: &str) {
        self.filter = Filter::Subject(subject.to_string());
        self.screen = Screen::TaskList;
    }

    pub fn view_all_tasks(&mut self) {
        self.filter = Filter::All;
        self.screen = Screen::TaskList;
    }

    /// After a clear-all: back to the landing screen, filter reset.
    /// Collapse state is meaningless without data and is dropped too.
    pub fn reset(&mut self) {
        self.filter = Filter::All;
        self.screen = Screen::Landing;
        self.collapsed.clear();
    }

    pub fn is_collapsed(&self, node: &str) -> bool {
        self.collapsed.contains(node)
    }

    pub fn toggle_node(&mut self, node: &str) {
        if !self.collapsed.remove(node) {
            self.collapsed.insert(node.to_string());
        }
    }

    /// Project the collection through the current filter and mode.
    ///
    /// Overall stats and the subject count always describe the unfiltered
    /// collection (the global progress header reflects everything); the body
    /// holds only tasks passing the filter, in insertion order.
    pub fn project(&self, tasks: &[TaskRecord]) -> RenderModel {
        let filtered: Vec<&TaskRecord> = tasks.iter().filter(|t| self.filter.matches(t)).collect();

        let body = match self.mode {
            ViewMode::Flat => RenderBody::Flat {
                tasks: filtered.iter().map(|t| (*t).clone()).collect(),
            },
            ViewMode::Hierarchical => RenderBody::Grouped {
                subjects: self.group(&filtered),
            },
        };

        RenderModel {
            overall: stats::overall(tasks),
            subjects: stats::subject_count(tasks),
            mode: self.mode,
            filter: match &self.filter {
                Filter::All => None,
                Filter::Subject(s) => Some(s.clone()),
            },
            body,
        }
    }

    fn group(&self, filtered: &[&TaskRecord]) -> Vec<SubjectGroup> {
        let mut subjects: Vec<SubjectGroup> = Vec::new();
        for task in filtered {
            let group = match subjects.iter().position(|g| g.subject == task.subject) {
                Some(i) => &mut subjects[i],
                None => {
                    subjects.push(SubjectGroup {
                        subject: task.subject.clone(),
                        stats: Stats::default(),
                        collapsed: self.is_collapsed(&subject_node(&task.subject)),
                        topics: Vec::new(),
                    });
                    subjects.last_mut().unwrap()
                }
            };

            let topic_name = task.topic.as_deref().unwrap_or(OTHER_TOPIC);
            let topic = match group.topics.iter().position(|t| t.topic == topic_name) {
                Some(i) => &mut group.topics[i],
                None => {
                    group.topics.push(TopicGroup {
                        topic: topic_name.to_string(),
                        stats: Stats::default(),
                        collapsed: self.is_collapsed(&topic_node(&task.subject, topic_name)),
                        tasks: Vec::new(),
                    });
                    group.topics.last_mut().unwrap()
                }
            };
            topic.tasks.push((*task).clone());
        }

        for group in &mut subjects {
            for topic in &mut group.topics {
                topic.stats = stats::overall(&topic.tasks);
            }
            let all: Vec<TaskRecord> = group
                .topics
                .iter()
                .flat_map(|t| t.tasks.iter().cloned())
                .collect();
            group.stats = stats::overall(&all);
        }
        subjects
    }
}

/// The projected, filtered, aggregate-annotated view handed to a
/// presentation layer.
#[derive(Debug, Serialize)]
pub struct RenderModel {
    pub overall: Stats,
    pub subjects: usize,
    pub mode: ViewMode,
    pub filter: Option<String>,
    pub body: RenderBody,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderBody {
    Flat { tasks: Vec<TaskRecord> },
    Grouped { subjects: Vec<SubjectGroup> },
}

#[derive(Debug, Serialize)]
pub struct SubjectGroup {
    pub subject: String,
    pub stats: Stats,
    pub collapsed: bool,
    pub topics: Vec<TopicGroup>,
}

#[derive(Debug, Serialize)]
pub struct TopicGroup {
    pub topic: String,
    pub stats: Stats,
    pub collapsed: bool,
    pub tasks: Vec<TaskRecord>,
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

    fn sample() -> Vec<TaskRecord> {
        vec![
            task(1, "Math", Some("Algebra"), true),
            task(2, "Math", None, false),
            task(3, "History", None, false),
            task(4, "Math", Some("Geometry"), false),
        ]
    }

    #[test]
    fn mode_switch_preserves_filter() {
        let mut state = ViewState::new();
        state.set_filter(Filter::Subject("Math".into()));
        state.set_mode(ViewMode::Hierarchical);
        assert_eq!(state.filter(), &Filter::Subject("Math".into()));
        state.set_mode(ViewMode::Flat);
        assert_eq!(state.filter(), &Filter::Subject("Math".into()));
    }

    #[test]
    fn flat_projection_keeps_insertion_order() {
        let state = ViewState::new();
        let model = state.project(&sample());
        match model.body {
            RenderBody::Flat { tasks } => {
                let ids: Vec<i64> = tasks.iter().map(|t| t.id).collect();
                assert_eq!(ids, vec![1, 2, 3, 4]);
            }
            _ => panic!("expected flat body"),
        }
    }

    #[test]
    fn overall_stats_ignore_filter() {
        let mut state = ViewState::new();
        state.set_filter(Filter::Subject("History".into()));
        let model = state.project(&sample());
        assert_eq!(model.overall.total, 4);
        assert_eq!(model.overall.completed, 1);
        assert_eq!(model.subjects, 2);
        match model.body {
            RenderBody::Flat { tasks } => {
                assert_eq!(tasks.len(), 1);
                assert_eq!(tasks[0].subject, "History");
            }
            _ => panic!("expected flat body"),
        }
    }

    #[test]
    fn grouped_projection_orders_by_first_appearance() {
        let mut state = ViewState::new();
        state.set_mode(ViewMode::Hierarchical);
        let model = state.project(&sample());
        match model.body {
            RenderBody::Grouped { subjects } => {
                assert_eq!(subjects[0].subject, "Math");
                assert_eq!(subjects[1].subject, "History");
                let topics: Vec<&str> =
                    subjects[0].topics.iter().map(|t| t.topic.as_str()).collect();
                assert_eq!(topics, vec!["Algebra", "Other", "Geometry"]);
                assert_eq!(subjects[0].stats.total, 3);
                assert_eq!(subjects[0].stats.completed, 1);
                assert_eq!(subjects[0].stats.percentage, 33);
            }
            _ => panic!("expected grouped body"),
        }
    }

    #[test]
    fn collapse_state_surfaces_in_model() {
        let mut state = ViewState::new();
        state.set_mode(ViewMode::Hierarchical);
        state.toggle_node(&subject_node("Math"));
        state.toggle_node(&topic_node("Math", "Algebra"));
        let model = state.project(&sample());
        match model.body {
            RenderBody::Grouped { subjects } => {
                assert!(subjects[0].collapsed);
                assert!(subjects[0].topics[0].collapsed);
                assert!(!subjects[1].collapsed);
            }
            _ => panic!("expected grouped body"),
        }
        // Toggling again expands
        state.toggle_node(&subject_node("Math"));
        assert!(!state.is_collapsed(&subject_node("Math")));
    }

    #[test]
    fn screen_machine() {
        let mut state = ViewState::new();
        assert_eq!(state.screen(), Screen::Landing);

        state.enter_overview(&[]);
        assert_eq!(state.screen(), Screen::Landing);

        let tasks = sample();
        state.enter_overview(&tasks);
        assert_eq!(state.screen(), Screen::Overview);

        state.view_subject("Math");
        assert_eq!(state.screen(), Screen::TaskList);
        assert_eq!(state.filter(), &Filter::Subject("Math".into()));

        state.view_all_tasks();
        assert_eq!(state.filter(), &Filter::All);
        assert_eq!(state.screen(), Screen::TaskList);

        state.reset();
        assert_eq!(state.screen(), Screen::Landing);
        assert_eq!(state.filter(), &Filter::All);
    }

    #[test]
    fn filter_parse_sentinel() {
        assert_eq!(Filter::parse("all"), Filter::All);
        assert_eq!(Filter::parse("Math"), Filter::Subject("Math".into()));
        assert_eq!(Filter::Subject("Math".into()).label(), "Math");
    }
}
