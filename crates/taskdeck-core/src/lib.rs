//! Domain types and derived queries for taskdeck boards.

/// Identifier types.
pub mod id;
/// Tasks, groups, sub-tasks and tags.
pub mod model;
pub mod ordering;

use serde::{Deserialize, Serialize};

pub use crate::id::{GroupId, SubTaskId, TagId, TaskId};
pub use crate::model::{
    Group, GroupTask, SubTask, Tag, Task, default_tags, find_default_tag, normalize_progress,
    project_to_group_task,
};

/// Complete board state: the standalone task list and the ordered groups.
///
/// This is also the persisted document layout (`{ "tasks": [], "groups": [] }`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    /// Standalone tasks in display order.
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// Groups in display order.
    #[serde(default)]
    pub groups: Vec<Group>,
}

impl BoardSnapshot {
    /// Build a snapshot from both collections.
    #[must_use]
    pub const fn new(tasks: Vec<Task>, groups: Vec<Group>) -> Self {
        Self { tasks, groups }
    }

    /// Returns true when the board holds neither tasks nor groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty() && self.groups.is_empty()
    }

    /// Standalone plus grouped tasks.
    #[must_use]
    pub fn total_tasks_count(&self) -> usize {
        self.tasks.len() + self.groups.iter().map(|group| group.tasks.len()).sum::<usize>()
    }

    /// Completed standalone plus completed grouped tasks.
    #[must_use]
    pub fn completed_tasks_count(&self) -> usize {
        let standalone = self.tasks.iter().filter(|task| task.completed).count();
        let grouped: usize = self.groups.iter().map(Group::completed_count).sum();
        standalone + grouped
    }

    /// True iff at least one task exists and every task is completed.
    #[must_use]
    pub fn is_all_tasks_completed(&self) -> bool {
        let total = self.total_tasks_count();
        total > 0 && self.completed_tasks_count() == total
    }

    /// Find a standalone task.
    #[must_use]
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Find a group.
    #[must_use]
    pub fn group(&self, id: &str) -> Option<&Group> {
        self.groups.iter().find(|group| group.id == id)
    }

    /// Returns true when some group holds a task with `id`.
    #[must_use]
    pub fn is_grouped(&self, id: &str) -> bool {
        self.groups.iter().any(|group| group.task(id).is_some())
    }

    /// Returns true when `id` names a task anywhere on the board.
    ///
    /// Task ids share one scope: a task is either standalone or in exactly
    /// one group.
    #[must_use]
    pub fn holds_task_id(&self, id: &str) -> bool {
        self.task(id).is_some() || self.is_grouped(id)
    }
}
