//! Inputs for creating and partially updating tasks and groups.

use taskdeck_core::{Group, GroupTask, SubTask, Tag, Task, normalize_progress};

/// Data for a new standalone task. The store assigns the id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    /// Title, stored as given.
    pub title: String,
    /// Initial completion flag.
    pub completed: bool,
    /// Initial sub-tasks.
    pub sub_tasks: Vec<SubTask>,
    /// Initial progress (normalised by the store).
    pub progress: Option<u8>,
    /// Initial tag.
    pub tag: Option<Tag>,
}

impl NewTask {
    /// Incomplete task with only a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Data for a new group. The store assigns the id and starts it expanded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewGroup {
    /// Title, stored as given.
    pub title: String,
    /// Initial member tasks.
    pub tasks: Vec<GroupTask>,
}

impl NewGroup {
    /// Empty group with only a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            tasks: Vec::new(),
        }
    }
}

/// Partial update for a standalone task. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// New title.
    pub title: Option<String>,
    /// New completion flag.
    pub completed: Option<bool>,
    /// New progress; `Some(None)` clears it.
    pub progress: Option<Option<u8>>,
    /// New tag; `Some(None)` clears it.
    pub tag: Option<Option<Tag>>,
    /// Replacement sub-task list.
    pub sub_tasks: Option<Vec<SubTask>>,
    /// New sub-task visibility.
    pub show_sub_tasks: Option<bool>,
}

impl TaskPatch {
    /// Set the title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the completion flag.
    #[must_use]
    pub const fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Set or clear progress.
    #[must_use]
    pub const fn progress(mut self, progress: Option<u8>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Set or clear the tag.
    #[must_use]
    pub fn tag(mut self, tag: Option<Tag>) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Replace the sub-task list.
    #[must_use]
    pub fn sub_tasks(mut self, sub_tasks: Vec<SubTask>) -> Self {
        self.sub_tasks = Some(sub_tasks);
        self
    }

    /// Set sub-task visibility.
    #[must_use]
    pub const fn show_sub_tasks(mut self, show: bool) -> Self {
        self.show_sub_tasks = Some(show);
        self
    }

    /// Merge the patch into `task`. Progress is normalised on the way in.
    pub fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        if let Some(progress) = self.progress {
            task.progress = progress.map(normalize_progress);
        }
        if let Some(tag) = self.tag {
            task.tag = tag;
        }
        if let Some(sub_tasks) = self.sub_tasks {
            task.sub_tasks = sub_tasks;
        }
        if let Some(show) = self.show_sub_tasks {
            task.show_sub_tasks = show;
        }
    }
}

/// Partial update for a group. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupPatch {
    /// New title.
    pub title: Option<String>,
    /// New collapsed flag.
    pub collapsed: Option<bool>,
    /// Replacement member list.
    pub tasks: Option<Vec<GroupTask>>,
}

impl GroupPatch {
    /// Set the title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the collapsed flag.
    #[must_use]
    pub const fn collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = Some(collapsed);
        self
    }

    /// Replace the member list.
    #[must_use]
    pub fn tasks(mut self, tasks: Vec<GroupTask>) -> Self {
        self.tasks = Some(tasks);
        self
    }

    /// Merge the patch into `group`.
    pub fn apply(self, group: &mut Group) {
        if let Some(title) = self.title {
            group.title = title;
        }
        if let Some(collapsed) = self.collapsed {
            group.collapsed = collapsed;
        }
        if let Some(tasks) = self.tasks {
            group.tasks = tasks;
        }
    }
}

/// Copy of `task` with its progress normalised.
pub(crate) fn with_normalized_progress(mut task: Task) -> Task {
    task.progress = task.progress.map(normalize_progress);
    task
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskdeck_core::TaskId;

    fn blank_task() -> Task {
        Task {
            id: TaskId::from("task-1"),
            title: "Draft".into(),
            completed: false,
            progress: Some(10),
            tag: Some(Tag::custom("home")),
            sub_tasks: Vec::new(),
            show_sub_tasks: false,
        }
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let original = blank_task();
        let mut task = original.clone();
        TaskPatch::default().apply(&mut task);
        assert_eq!(task, original);
    }

    #[test]
    fn patch_merges_present_fields_and_clears_options() {
        let mut task = blank_task();
        let patch = TaskPatch::default()
            .title("Renamed")
            .progress(Some(87))
            .tag(None)
            .show_sub_tasks(true);
        patch.apply(&mut task);

        assert_eq!(task.title, "Renamed");
        assert_eq!(task.progress, Some(85));
        assert!(task.tag.is_none());
        assert!(task.show_sub_tasks);
        assert!(!task.completed);
    }

    #[test]
    fn group_patch_updates_fields() {
        let mut group = Group {
            id: "group-1".into(),
            title: "Old".into(),
            tasks: vec![],
            collapsed: false,
        };
        GroupPatch::default()
            .title("New")
            .collapsed(true)
            .tasks(vec![GroupTask::new("a")])
            .apply(&mut group);
        assert_eq!(group.title, "New");
        assert!(group.collapsed);
        assert_eq!(group.tasks.len(), 1);
    }

    #[test]
    fn normalizes_progress_of_incoming_tasks() {
        let mut task = blank_task();
        task.progress = Some(199);
        assert_eq!(with_normalized_progress(task).progress, Some(100));
    }
}
