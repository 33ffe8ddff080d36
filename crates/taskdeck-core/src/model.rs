use serde::{Deserialize, Serialize};

use crate::id::{GroupId, SubTaskId, TagId, TaskId};

/// Upper bound of task progress, in percent.
pub const PROGRESS_MAX: u8 = 100;
/// Granularity of task progress, in percent.
pub const PROGRESS_STEP: u8 = 5;

/// Colour token used for the "Easy" tag.
pub const COLOR_EASY: &str =
    "bg-green-100 text-green-800 dark:bg-green-900/30 dark:text-green-400";
/// Colour token used for the "Medium" tag.
pub const COLOR_MEDIUM: &str =
    "bg-yellow-100 text-yellow-800 dark:bg-yellow-900/30 dark:text-yellow-400";
/// Colour token used for the "Hard" tag.
pub const COLOR_HARD: &str = "bg-red-100 text-red-800 dark:bg-red-900/30 dark:text-red-400";
/// Colour token assigned to user-created tags.
pub const COLOR_CUSTOM: &str =
    "bg-blue-100 text-blue-800 dark:bg-blue-900/30 dark:text-blue-400";

/// Label attached to a standalone task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag identifier (`easy`, `medium`, `hard` or `custom-*`).
    pub id: TagId,
    /// Display label.
    pub label: String,
    /// Style-class token used by the presentation layer.
    pub color: String,
}

impl Tag {
    /// Build a tag from its parts.
    pub fn new(id: impl Into<TagId>, label: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            color: color.into(),
        }
    }

    /// Create a user-defined tag with a generated id. The label is trimmed.
    #[must_use]
    pub fn custom(label: &str) -> Self {
        Self::new(TagId::generate_custom(), label.trim(), COLOR_CUSTOM)
    }

    /// Returns true when this tag is one of [`default_tags`].
    #[must_use]
    pub fn is_predefined(&self) -> bool {
        default_tags().iter().any(|tag| tag.id == self.id)
    }
}

/// The predefined difficulty tags offered by the tag picker.
#[must_use]
pub fn default_tags() -> [Tag; 3] {
    [
        Tag::new("easy", "Easy", COLOR_EASY),
        Tag::new("medium", "Medium", COLOR_MEDIUM),
        Tag::new("hard", "Hard", COLOR_HARD),
    ]
}

/// Look up a predefined tag by id or (case-insensitive) label.
#[must_use]
pub fn find_default_tag(key: &str) -> Option<Tag> {
    default_tags()
        .into_iter()
        .find(|tag| tag.id == key || tag.label.eq_ignore_ascii_case(key))
}

/// Checklist entry owned by a standalone task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTask {
    /// Identifier, unique within the parent task.
    pub id: SubTaskId,
    /// Display title.
    pub title: String,
    /// Completion flag.
    pub completed: bool,
}

impl SubTask {
    /// Create an incomplete sub-task for `parent` with a generated id.
    #[must_use]
    pub fn new(parent: &TaskId, title: impl Into<String>) -> Self {
        Self {
            id: SubTaskId::generate_for(parent),
            title: title.into(),
            completed: false,
        }
    }
}

/// A standalone task with the full set of attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier within the standalone list.
    pub id: TaskId,
    /// Display title.
    pub title: String,
    /// Completion flag.
    pub completed: bool,
    /// Optional progress in percent (0–100, steps of 5).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    /// Optional tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<Tag>,
    /// Ordered sub-tasks.
    #[serde(default)]
    pub sub_tasks: Vec<SubTask>,
    /// Whether the sub-task list is expanded.
    #[serde(default)]
    pub show_sub_tasks: bool,
}

impl Task {
    /// Number of completed sub-tasks.
    #[must_use]
    pub fn completed_sub_tasks(&self) -> usize {
        self.sub_tasks.iter().filter(|sub| sub.completed).count()
    }

    /// True when the task has sub-tasks and every one of them is completed.
    #[must_use]
    pub fn all_sub_tasks_completed(&self) -> bool {
        sub_tasks_all_completed(&self.sub_tasks)
    }

    /// Find a sub-task by id.
    #[must_use]
    pub fn sub_task(&self, id: &str) -> Option<&SubTask> {
        self.sub_tasks.iter().find(|sub| sub.id == id)
    }
}

/// True when `sub_tasks` is non-empty and fully completed.
#[must_use]
pub fn sub_tasks_all_completed(sub_tasks: &[SubTask]) -> bool {
    !sub_tasks.is_empty() && sub_tasks.iter().all(|sub| sub.completed)
}

/// Reduced task shape stored inside a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupTask {
    /// Identifier, unique within the owning group.
    pub id: TaskId,
    /// Display title.
    pub title: String,
    /// Completion flag.
    pub completed: bool,
}

impl GroupTask {
    /// Create an incomplete group task with a generated id.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: TaskId::generate(),
            title: title.into(),
            completed: false,
        }
    }
}

/// Narrow a standalone task into the group shape.
///
/// Only `id`, `title` and `completed` survive. Progress, tag and sub-tasks are
/// dropped and cannot be recovered from the result.
#[must_use]
pub fn project_to_group_task(task: Task) -> GroupTask {
    GroupTask {
        id: task.id,
        title: task.title,
        completed: task.completed,
    }
}

/// Named collection of reduced tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Unique identifier.
    pub id: GroupId,
    /// Display title.
    pub title: String,
    /// Ordered member tasks.
    #[serde(default)]
    pub tasks: Vec<GroupTask>,
    /// Whether the group is folded in the presentation layer.
    #[serde(default)]
    pub collapsed: bool,
}

impl Group {
    /// Number of completed member tasks.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.completed).count()
    }

    /// True when the group has tasks and all of them are completed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        !self.tasks.is_empty() && self.tasks.iter().all(|task| task.completed)
    }

    /// Completion ratio in whole percent, `0` for an empty group.
    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        let total = self.tasks.len();
        if total == 0 {
            return 0;
        }
        let percent = self.completed_count() * usize::from(PROGRESS_MAX) / total;
        u8::try_from(percent).unwrap_or(PROGRESS_MAX)
    }

    /// Find a member task by id.
    #[must_use]
    pub fn task(&self, id: &str) -> Option<&GroupTask> {
        self.tasks.iter().find(|task| task.id == id)
    }
}

/// Clamp progress into `0..=100` and snap it to the nearest step of 5.
#[must_use]
pub fn normalize_progress(value: u8) -> u8 {
    let clamped = value.min(PROGRESS_MAX);
    let half = PROGRESS_STEP / 2;
    let snapped = (clamped + half) / PROGRESS_STEP * PROGRESS_STEP;
    snapped.min(PROGRESS_MAX)
}
