//! The single authoritative board state container.
//!
//! Every mutation follows the same path: update the in-memory board, emit
//! notifications, then write the whole board through the [`Persistence`]
//! port. Lookups that miss are silent no-ops reported through the return
//! value.

use std::time::Duration;

use anyhow::Error;
use taskdeck_core::ordering::{Keyed, array_move, has_unique_keys, is_permutation, position_of, resequence};
use taskdeck_core::{
    BoardSnapshot, Group, GroupId, GroupTask, SubTask, SubTaskId, Tag, Task, TaskId,
    normalize_progress, project_to_group_task,
};
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::notify::{Notification, NotificationSettings, Notifier};
use crate::patch::{GroupPatch, NewGroup, NewTask, TaskPatch, with_normalized_progress};
use crate::persistence::Persistence;
use crate::scheduler::Scheduler;
use crate::transfer::{ExportDocument, ImportData};

/// Errors surfaced by [`Store`].
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// The persisted board could not be read at start-up.
    #[error("failed to load board: {0:#}")]
    Load(Error),
    /// The board changed in memory but could not be written.
    #[error("failed to persist board: {0:#}")]
    Persist(Error),
}

/// Board state plus its persistence, notifier and scheduler collaborators.
pub struct Store<P, N, S> {
    board: BoardSnapshot,
    persistence: P,
    notifier: N,
    scheduler: S,
    settings: NotificationSettings,
}

impl<P, N, S> Store<P, N, S> {
    /// Build a store around an existing board without touching persistence.
    pub const fn with_board(
        board: BoardSnapshot,
        persistence: P,
        notifier: N,
        scheduler: S,
        settings: NotificationSettings,
    ) -> Self {
        Self {
            board,
            persistence,
            notifier,
            scheduler,
            settings,
        }
    }

    /// Current board.
    pub const fn snapshot(&self) -> &BoardSnapshot {
        &self.board
    }

    /// Standalone tasks in display order.
    pub fn tasks(&self) -> &[Task] {
        &self.board.tasks
    }

    /// Groups in display order.
    pub fn groups(&self) -> &[Group] {
        &self.board.groups
    }

    /// Find a standalone task.
    pub fn find_task(&self, task_id: &str) -> Option<&Task> {
        self.board.task(task_id)
    }

    /// Find a group.
    pub fn find_group(&self, group_id: &str) -> Option<&Group> {
        self.board.group(group_id)
    }

    /// Completed standalone plus completed grouped tasks.
    pub fn completed_tasks_count(&self) -> usize {
        self.board.completed_tasks_count()
    }

    /// Standalone plus grouped tasks.
    pub fn total_tasks_count(&self) -> usize {
        self.board.total_tasks_count()
    }

    /// True iff at least one task exists and all are completed.
    pub fn is_all_tasks_completed(&self) -> bool {
        self.board.is_all_tasks_completed()
    }

    /// Snapshot wrapped as an export taken at `now`.
    pub fn export_document(&self, now: OffsetDateTime) -> ExportDocument {
        ExportDocument::new(self.board.clone(), now)
    }

    /// Borrow the notifier.
    pub const fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Borrow the scheduler.
    pub const fn scheduler(&self) -> &S {
        &self.scheduler
    }
}

impl<P, N, S> Store<P, N, S>
where
    P: Persistence,
    N: Notifier,
    S: Scheduler,
{
    /// Rehydrate from `persistence`; nothing stored yet means an empty board.
    ///
    /// # Errors
    /// Returns [`StoreError::Load`] when the stored board cannot be read.
    pub fn open(
        persistence: P,
        notifier: N,
        scheduler: S,
        settings: NotificationSettings,
    ) -> Result<Self, StoreError> {
        let board = persistence
            .load()
            .map_err(|err| StoreError::Load(err.into()))?
            .unwrap_or_default();
        info!(
            tasks = board.tasks.len(),
            groups = board.groups.len(),
            "Opened board"
        );
        Ok(Self::with_board(board, persistence, notifier, scheduler, settings))
    }

    /// Emit `kind` right away, unless notifications are disabled.
    pub fn announce(&self, kind: Notification) {
        if self.settings.enabled {
            self.notifier.notify(&kind.notice());
        }
    }

    fn defer(&self, delay: Duration, kind: Notification) {
        if self.settings.enabled {
            debug!(?kind, delay_ms = delay.as_millis(), "Scheduling deferred notice");
            self.scheduler.schedule(delay, kind.notice());
        }
    }

    fn commit(&self) -> Result<(), StoreError> {
        self.persistence
            .save(&self.board)
            .map_err(|err| StoreError::Persist(err.into()))
    }

    fn task_mut(&mut self, task_id: &str) -> Option<&mut Task> {
        self.board.tasks.iter_mut().find(|task| task.id == task_id)
    }

    fn group_mut(&mut self, group_id: &str) -> Option<&mut Group> {
        self.board.groups.iter_mut().find(|group| group.id == group_id)
    }

    /// Members for `group_id` (or a new group) must be distinct and must not
    /// already live anywhere else on the board.
    fn admits_members(&self, group_id: Option<&str>, members: &[GroupTask]) -> bool {
        if !has_unique_keys(members) {
            warn!(group_id, "Rejected group members: repeated task id");
            return false;
        }
        let elsewhere = |id: &str| {
            self.board.task(id).is_some()
                || self
                    .board
                    .groups
                    .iter()
                    .filter(|group| Some(group.id.as_str()) != group_id)
                    .any(|group| group.task(id).is_some())
        };
        if let Some(member) = members.iter().find(|member| elsewhere(member.id.as_str())) {
            warn!(group_id, task_id = %member.id, "Rejected group members: task id already on the board");
            return false;
        }
        true
    }

    /// Append a standalone task with a fresh id.
    ///
    /// # Errors
    /// Returns [`StoreError::Persist`] when the board cannot be written.
    pub fn add_task(&mut self, new: NewTask) -> Result<TaskId, StoreError> {
        let id = TaskId::generate();
        self.board.tasks.push(Task {
            id: id.clone(),
            title: new.title,
            completed: new.completed,
            progress: new.progress.map(normalize_progress),
            tag: new.tag,
            sub_tasks: new.sub_tasks,
            show_sub_tasks: false,
        });
        debug!(task_id = %id, "Added task");
        self.commit()?;
        Ok(id)
    }

    /// Merge `patch` into a task.
    ///
    /// Replacing the sub-task list so that every sub-task is completed, when
    /// that was not already the case, emits [`Notification::AllSubTasksComplete`].
    ///
    /// # Errors
    /// Returns [`StoreError::Persist`] when the board cannot be written.
    pub fn update_task(&mut self, task_id: &str, patch: TaskPatch) -> Result<bool, StoreError> {
        let Some(task) = self.task_mut(task_id) else {
            debug!(task_id, "Update skipped: task not found");
            return Ok(false);
        };
        let touches_sub_tasks = patch.sub_tasks.is_some();
        let was_all_done = task.all_sub_tasks_completed();
        patch.apply(task);
        let celebrate = touches_sub_tasks && !was_all_done && task.all_sub_tasks_completed();

        if celebrate {
            self.announce(Notification::AllSubTasksComplete);
        }
        self.commit()?;
        Ok(true)
    }

    /// Remove a standalone task and its sub-tasks.
    ///
    /// # Errors
    /// Returns [`StoreError::Persist`] when the board cannot be written.
    pub fn delete_task(&mut self, task_id: &str) -> Result<bool, StoreError> {
        let Some(index) = position_of(&self.board.tasks, task_id) else {
            debug!(task_id, "Delete skipped: task not found");
            return Ok(false);
        };
        self.board.tasks.remove(index);
        debug!(task_id, "Deleted task");
        self.commit()?;
        Ok(true)
    }

    /// Flip a standalone task's completion.
    ///
    /// Completing it emits [`Notification::TaskComplete`]; if that completes
    /// the whole board, [`Notification::AllTasksComplete`] is scheduled.
    ///
    /// # Errors
    /// Returns [`StoreError::Persist`] when the board cannot be written.
    pub fn toggle_task(&mut self, task_id: &str) -> Result<bool, StoreError> {
        let Some(task) = self.task_mut(task_id) else {
            debug!(task_id, "Toggle skipped: task not found");
            return Ok(false);
        };
        task.completed = !task.completed;
        let completed = task.completed;

        if completed {
            self.announce(Notification::TaskComplete);
            if self.board.is_all_tasks_completed() {
                self.defer(self.settings.all_complete_delay, Notification::AllTasksComplete);
            }
        }
        self.commit()?;
        Ok(true)
    }

    /// Re-sequence the standalone list to follow the ids of `new_order`.
    /// Anything but a permutation of the current list is rejected; only the
    /// order is taken from `new_order`, the stored tasks are kept as they are.
    ///
    /// # Errors
    /// Returns [`StoreError::Persist`] when the board cannot be written.
    pub fn reorder_tasks(&mut self, new_order: &[Task]) -> Result<bool, StoreError> {
        if !accepts_order("tasks", &self.board.tasks, new_order) {
            return Ok(false);
        }
        resequence(&mut self.board.tasks, new_order);
        self.commit()?;
        Ok(true)
    }

    /// Move the standalone task at `from` to position `to`.
    ///
    /// # Errors
    /// Returns [`StoreError::Persist`] when the board cannot be written.
    pub fn move_task(&mut self, from: usize, to: usize) -> Result<bool, StoreError> {
        let mut order = self.board.tasks.clone();
        if !array_move(&mut order, from, to) {
            debug!(from, to, "Move skipped: index out of range");
            return Ok(false);
        }
        self.reorder_tasks(&order)
    }

    /// Move a standalone task into a group, narrowing it to a [`GroupTask`].
    ///
    /// Progress, tag and sub-tasks are dropped. Unknown task or group ids,
    /// or a group anywhere already holding the id, leave the board unchanged.
    ///
    /// # Errors
    /// Returns [`StoreError::Persist`] when the board cannot be written.
    pub fn move_task_to_group(&mut self, task_id: &str, group_id: &str) -> Result<bool, StoreError> {
        let Some(group_index) = position_of(&self.board.groups, group_id) else {
            warn!(task_id, group_id, "Move to group skipped: group not found");
            return Ok(false);
        };
        let Some(task_index) = position_of(&self.board.tasks, task_id) else {
            debug!(task_id, group_id, "Move to group skipped: task not found");
            return Ok(false);
        };
        if self.board.is_grouped(task_id) {
            warn!(task_id, group_id, "Move to group skipped: id already in a group");
            return Ok(false);
        }

        let task = self.board.tasks.remove(task_index);
        self.board.groups[group_index].tasks.push(project_to_group_task(task));
        debug!(task_id, group_id, "Moved task into group");
        self.announce(Notification::TaskMoved);
        self.commit()?;
        Ok(true)
    }

    /// Append a group with a fresh id, expanded. `None` when the initial
    /// members repeat an id or reuse one already on the board.
    ///
    /// # Errors
    /// Returns [`StoreError::Persist`] when the board cannot be written.
    pub fn add_group(&mut self, new: NewGroup) -> Result<Option<GroupId>, StoreError> {
        if !self.admits_members(None, &new.tasks) {
            return Ok(None);
        }
        let id = GroupId::generate();
        self.board.groups.push(Group {
            id: id.clone(),
            title: new.title,
            tasks: new.tasks,
            collapsed: false,
        });
        debug!(group_id = %id, "Added group");
        self.announce(Notification::NewGroup);
        self.commit()?;
        Ok(Some(id))
    }

    /// Merge `patch` into a group. A replacement member list that repeats an
    /// id or takes one from elsewhere on the board rejects the whole patch.
    ///
    /// # Errors
    /// Returns [`StoreError::Persist`] when the board cannot be written.
    pub fn update_group(&mut self, group_id: &str, patch: GroupPatch) -> Result<bool, StoreError> {
        let Some(index) = position_of(&self.board.groups, group_id) else {
            debug!(group_id, "Update skipped: group not found");
            return Ok(false);
        };
        if let Some(members) = &patch.tasks
            && !self.admits_members(Some(group_id), members)
        {
            return Ok(false);
        }
        patch.apply(&mut self.board.groups[index]);
        self.commit()?;
        Ok(true)
    }

    /// Remove a group together with its tasks.
    ///
    /// # Errors
    /// Returns [`StoreError::Persist`] when the board cannot be written.
    pub fn delete_group(&mut self, group_id: &str) -> Result<bool, StoreError> {
        let Some(index) = position_of(&self.board.groups, group_id) else {
            debug!(group_id, "Delete skipped: group not found");
            return Ok(false);
        };
        let removed = self.board.groups.remove(index);
        debug!(group_id, tasks = removed.tasks.len(), "Deleted group");
        self.commit()?;
        Ok(true)
    }

    /// Flip a grouped task's completion.
    ///
    /// Completing it emits [`Notification::TaskComplete`]. A group that just
    /// became complete schedules [`Notification::GroupComplete`], and a board
    /// that just became complete schedules [`Notification::AllTasksComplete`]
    /// after the longer delay.
    ///
    /// # Errors
    /// Returns [`StoreError::Persist`] when the board cannot be written.
    pub fn toggle_group_task(&mut self, group_id: &str, task_id: &str) -> Result<bool, StoreError> {
        let was_all_done = self.board.is_all_tasks_completed();
        let Some(group) = self.group_mut(group_id) else {
            debug!(group_id, task_id, "Toggle skipped: group not found");
            return Ok(false);
        };
        let was_group_done = group.is_completed();
        let Some(task) = group.tasks.iter_mut().find(|task| task.id == task_id) else {
            debug!(group_id, task_id, "Toggle skipped: task not in group");
            return Ok(false);
        };
        task.completed = !task.completed;
        let completed = task.completed;
        let group_done = group.is_completed();

        if completed {
            self.announce(Notification::TaskComplete);
        }
        if group_done && !was_group_done {
            self.defer(self.settings.group_complete_delay, Notification::GroupComplete);
        }
        if !was_all_done && self.board.is_all_tasks_completed() {
            self.defer(self.settings.group_all_complete_delay, Notification::AllTasksComplete);
        }
        self.commit()?;
        Ok(true)
    }

    /// Append a caller-built task to a group. Ids already used by any task on
    /// the board are refused.
    ///
    /// # Errors
    /// Returns [`StoreError::Persist`] when the board cannot be written.
    pub fn add_task_to_group(&mut self, group_id: &str, task: GroupTask) -> Result<bool, StoreError> {
        let Some(index) = position_of(&self.board.groups, group_id) else {
            debug!(group_id, "Add skipped: group not found");
            return Ok(false);
        };
        if self.board.holds_task_id(task.id.as_str()) {
            warn!(group_id, task_id = %task.id, "Add skipped: task id already on the board");
            return Ok(false);
        }
        debug!(group_id, task_id = %task.id, "Added task to group");
        self.board.groups[index].tasks.push(task);
        self.commit()?;
        Ok(true)
    }

    /// Remove one task from a group.
    ///
    /// # Errors
    /// Returns [`StoreError::Persist`] when the board cannot be written.
    pub fn remove_group_task(&mut self, group_id: &str, task_id: &str) -> Result<bool, StoreError> {
        let Some(group) = self.group_mut(group_id) else {
            debug!(group_id, task_id, "Remove skipped: group not found");
            return Ok(false);
        };
        let Some(index) = position_of(&group.tasks, task_id) else {
            debug!(group_id, task_id, "Remove skipped: task not in group");
            return Ok(false);
        };
        group.tasks.remove(index);
        self.commit()?;
        Ok(true)
    }

    /// Re-sequence the groups; must be a permutation of the current groups.
    ///
    /// # Errors
    /// Returns [`StoreError::Persist`] when the board cannot be written.
    pub fn reorder_groups(&mut self, new_order: &[Group]) -> Result<bool, StoreError> {
        if !accepts_order("groups", &self.board.groups, new_order) {
            return Ok(false);
        }
        resequence(&mut self.board.groups, new_order);
        self.commit()?;
        Ok(true)
    }

    /// Move the group at `from` to position `to`.
    ///
    /// # Errors
    /// Returns [`StoreError::Persist`] when the board cannot be written.
    pub fn move_group(&mut self, from: usize, to: usize) -> Result<bool, StoreError> {
        let mut order = self.board.groups.clone();
        if !array_move(&mut order, from, to) {
            debug!(from, to, "Move skipped: index out of range");
            return Ok(false);
        }
        self.reorder_groups(&order)
    }

    /// Re-sequence one group's tasks; must be a permutation of its tasks.
    ///
    /// # Errors
    /// Returns [`StoreError::Persist`] when the board cannot be written.
    pub fn reorder_group_tasks(&mut self, group_id: &str, new_order: &[GroupTask]) -> Result<bool, StoreError> {
        let Some(group) = self.group_mut(group_id) else {
            debug!(group_id, "Reorder skipped: group not found");
            return Ok(false);
        };
        if !accepts_order("group tasks", &group.tasks, new_order) {
            return Ok(false);
        }
        resequence(&mut group.tasks, new_order);
        self.commit()?;
        Ok(true)
    }

    /// Move the task at `from` to position `to` inside one group.
    ///
    /// # Errors
    /// Returns [`StoreError::Persist`] when the board cannot be written.
    pub fn move_group_task(&mut self, group_id: &str, from: usize, to: usize) -> Result<bool, StoreError> {
        let Some(group) = self.board.group(group_id) else {
            debug!(group_id, "Move skipped: group not found");
            return Ok(false);
        };
        let mut order = group.tasks.clone();
        if !array_move(&mut order, from, to) {
            debug!(group_id, from, to, "Move skipped: index out of range");
            return Ok(false);
        }
        self.reorder_group_tasks(group_id, &order)
    }

    /// Replace a task's sub-task list; same celebration rule as [`update_task`](Self::update_task).
    ///
    /// # Errors
    /// Returns [`StoreError::Persist`] when the board cannot be written.
    pub fn update_sub_tasks(&mut self, task_id: &str, sub_tasks: Vec<SubTask>) -> Result<bool, StoreError> {
        self.update_task(task_id, TaskPatch::default().sub_tasks(sub_tasks))
    }

    fn edit_sub_tasks(
        &mut self,
        task_id: &str,
        edit: impl FnOnce(&mut Vec<SubTask>) -> bool,
    ) -> Result<bool, StoreError> {
        let Some(task) = self.board.task(task_id) else {
            debug!(task_id, "Sub-task edit skipped: task not found");
            return Ok(false);
        };
        let mut sub_tasks = task.sub_tasks.clone();
        if !edit(&mut sub_tasks) {
            debug!(task_id, "Sub-task edit skipped: nothing changed");
            return Ok(false);
        }
        self.update_sub_tasks(task_id, sub_tasks)
    }

    /// Append an incomplete sub-task; `None` when the task does not exist.
    ///
    /// # Errors
    /// Returns [`StoreError::Persist`] when the board cannot be written.
    pub fn add_sub_task(&mut self, task_id: &str, title: impl Into<String>) -> Result<Option<SubTaskId>, StoreError> {
        let Some(task) = self.board.task(task_id) else {
            debug!(task_id, "Sub-task add skipped: task not found");
            return Ok(None);
        };
        let sub_task = SubTask::new(&task.id, title);
        let id = sub_task.id.clone();
        let mut sub_tasks = task.sub_tasks.clone();
        sub_tasks.push(sub_task);
        self.update_sub_tasks(task_id, sub_tasks)?;
        Ok(Some(id))
    }

    /// Flip a sub-task's completion.
    ///
    /// # Errors
    /// Returns [`StoreError::Persist`] when the board cannot be written.
    pub fn toggle_sub_task(&mut self, task_id: &str, sub_task_id: &str) -> Result<bool, StoreError> {
        self.edit_sub_tasks(task_id, |sub_tasks| {
            let Some(sub_task) = sub_tasks.iter_mut().find(|sub| sub.id == sub_task_id) else {
                return false;
            };
            sub_task.completed = !sub_task.completed;
            true
        })
    }

    /// Retitle a sub-task.
    ///
    /// # Errors
    /// Returns [`StoreError::Persist`] when the board cannot be written.
    pub fn rename_sub_task(
        &mut self,
        task_id: &str,
        sub_task_id: &str,
        title: impl Into<String>,
    ) -> Result<bool, StoreError> {
        let title = title.into();
        self.edit_sub_tasks(task_id, |sub_tasks| {
            let Some(sub_task) = sub_tasks.iter_mut().find(|sub| sub.id == sub_task_id) else {
                return false;
            };
            sub_task.title = title;
            true
        })
    }

    /// Remove a sub-task.
    ///
    /// # Errors
    /// Returns [`StoreError::Persist`] when the board cannot be written.
    pub fn delete_sub_task(&mut self, task_id: &str, sub_task_id: &str) -> Result<bool, StoreError> {
        self.edit_sub_tasks(task_id, |sub_tasks| {
            let Some(index) = position_of(sub_tasks.as_slice(), sub_task_id) else {
                return false;
            };
            sub_tasks.remove(index);
            true
        })
    }

    /// Re-sequence a task's sub-tasks; must be a permutation.
    ///
    /// # Errors
    /// Returns [`StoreError::Persist`] when the board cannot be written.
    pub fn reorder_sub_tasks(&mut self, task_id: &str, new_order: &[SubTask]) -> Result<bool, StoreError> {
        self.edit_sub_tasks(task_id, |sub_tasks| {
            if !accepts_order("sub-tasks", sub_tasks.as_slice(), new_order) {
                return false;
            }
            resequence(sub_tasks, new_order);
            true
        })
    }

    /// Move the sub-task at `from` to position `to`.
    ///
    /// # Errors
    /// Returns [`StoreError::Persist`] when the board cannot be written.
    pub fn move_sub_task(&mut self, task_id: &str, from: usize, to: usize) -> Result<bool, StoreError> {
        self.edit_sub_tasks(task_id, |sub_tasks| array_move(sub_tasks.as_mut_slice(), from, to))
    }

    /// Show or hide a task's sub-task list.
    ///
    /// # Errors
    /// Returns [`StoreError::Persist`] when the board cannot be written.
    pub fn toggle_show_sub_tasks(&mut self, task_id: &str) -> Result<bool, StoreError> {
        let Some(task) = self.board.task(task_id) else {
            debug!(task_id, "Visibility toggle skipped: task not found");
            return Ok(false);
        };
        let show = !task.show_sub_tasks;
        self.update_task(task_id, TaskPatch::default().show_sub_tasks(show))
    }

    /// Retitle a standalone task.
    ///
    /// # Errors
    /// Returns [`StoreError::Persist`] when the board cannot be written.
    pub fn rename_task(&mut self, task_id: &str, title: impl Into<String>) -> Result<bool, StoreError> {
        self.update_task(task_id, TaskPatch::default().title(title))
    }

    /// Attach a tag, replacing any previous one.
    ///
    /// # Errors
    /// Returns [`StoreError::Persist`] when the board cannot be written.
    pub fn set_tag(&mut self, task_id: &str, tag: Tag) -> Result<bool, StoreError> {
        self.update_task(task_id, TaskPatch::default().tag(Some(tag)))
    }

    /// Remove the tag.
    ///
    /// # Errors
    /// Returns [`StoreError::Persist`] when the board cannot be written.
    pub fn clear_tag(&mut self, task_id: &str) -> Result<bool, StoreError> {
        self.update_task(task_id, TaskPatch::default().tag(None))
    }

    /// Set (normalised) or clear progress.
    ///
    /// # Errors
    /// Returns [`StoreError::Persist`] when the board cannot be written.
    pub fn set_progress(&mut self, task_id: &str, progress: Option<u8>) -> Result<bool, StoreError> {
        self.update_task(task_id, TaskPatch::default().progress(progress))
    }

    /// Empty both collections.
    ///
    /// # Errors
    /// Returns [`StoreError::Persist`] when the board cannot be written.
    pub fn clear_all_data(&mut self) -> Result<(), StoreError> {
        self.board = BoardSnapshot::default();
        info!("Cleared board");
        self.announce(Notification::DataCleared);
        self.commit()
    }

    /// Replace the whole board with validated import data.
    ///
    /// # Errors
    /// Returns [`StoreError::Persist`] when the board cannot be written.
    pub fn import_data(&mut self, data: ImportData) -> Result<(), StoreError> {
        let tasks = data.tasks.into_iter().map(with_normalized_progress).collect();
        self.board = BoardSnapshot::new(tasks, data.groups);
        info!(
            tasks = self.board.tasks.len(),
            groups = self.board.groups.len(),
            "Imported board"
        );
        self.announce(Notification::DataImported);
        self.commit()
    }
}

fn accepts_order<T: Keyed>(kind: &str, current: &[T], new_order: &[T]) -> bool {
    let accepted = is_permutation(current, new_order);
    if !accepted {
        warn!(
            kind,
            current = current.len(),
            proposed = new_order.len(),
            "Rejected reorder that is not a permutation of the current order"
        );
    }
    accepted
}
