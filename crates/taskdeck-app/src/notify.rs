//! User-facing feedback emitted by the store.
//!
//! Notifications are advisory: they never feed back into board state. The
//! message text is resolved when a [`Notice`] is built, so a deferred notice
//! shows what was true at scheduling time.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{info, warn};

const TASK_COMPLETE: &[&str] = &[
    "You nailed it! Task complete 💪",
    "Boom! Another one bites the dust 🎯",
    "Task crushed! You're on fire 🔥",
    "Victory! Task conquered 🏆",
    "Awesome work! Task done ✨",
];

const ALL_SUB_TASKS_COMPLETE: &[&str] = &[
    "Sub-tasks demolished! You're unstoppable 🚀",
    "All sub-tasks crushed! Master level achieved 🎖️",
    "Sub-task sweep complete! Legendary 🌟",
    "Every sub-task conquered! You're amazing 💫",
];

const GROUP_COMPLETE: &[&str] = &[
    "Focus group cleared! 🧠✨",
    "Group mission accomplished! 🎊",
    "Entire group conquered! Champion mode 🏅",
    "Group goals smashed! Incredible 🎉",
];

const ALL_TASKS_COMPLETE: &[&str] = &[
    "All tasks done, go touch grass 🍀",
    "Everything complete! Time to celebrate 🎈",
    "Mission accomplished! You're a productivity legend 🌟",
    "All done! Go enjoy life, you earned it 🌈",
    "Perfect score! Time for some well-deserved rest 😎",
];

const NEW_GROUP: &[&str] = &[
    "New task group created! Let's organize 📁",
    "Group ready for action! 🎯",
    "Task group assembled! Time to conquer 💪",
];

const TASK_MOVED: &[&str] = &[
    "Task moved successfully! 📦",
    "Reorganized like a pro! 🎯",
    "Task relocated! Perfect organization 📋",
];

/// Kinds of feedback the store and its collaborators emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notification {
    /// A task or group task was marked completed.
    TaskComplete,
    /// Every sub-task of a task became completed.
    AllSubTasksComplete,
    /// Every task of a group became completed.
    GroupComplete,
    /// Every task on the board became completed.
    AllTasksComplete,
    /// A group was created.
    NewGroup,
    /// A standalone task was moved into a group.
    TaskMoved,
    /// The board was wiped.
    DataCleared,
    /// The board was replaced by imported data.
    DataImported,
    /// An export document was produced.
    ExportSucceeded,
    /// Producing an export document failed.
    ExportFailed,
    /// An import document was rejected.
    ImportFailed,
}

/// Whether a notice reports success or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Celebration or confirmation.
    Success,
    /// Something the user asked for did not happen.
    Failure,
}

impl Notification {
    /// Candidate messages for this kind. Fixed kinds have a single entry.
    #[must_use]
    pub const fn messages(self) -> &'static [&'static str] {
        match self {
            Self::TaskComplete => TASK_COMPLETE,
            Self::AllSubTasksComplete => ALL_SUB_TASKS_COMPLETE,
            Self::GroupComplete => GROUP_COMPLETE,
            Self::AllTasksComplete => ALL_TASKS_COMPLETE,
            Self::NewGroup => NEW_GROUP,
            Self::TaskMoved => TASK_MOVED,
            Self::DataCleared => &["All data cleared! Fresh start 🌱"],
            Self::DataImported => &["Data imported successfully! 📥"],
            Self::ExportSucceeded => &["Tasks exported successfully! 📥"],
            Self::ExportFailed => &["Failed to export tasks. Please try again."],
            Self::ImportFailed => &["Failed to import file. Please check the file format."],
        }
    }

    /// Success or failure classification.
    #[must_use]
    pub const fn tone(self) -> Tone {
        match self {
            Self::ExportFailed | Self::ImportFailed => Tone::Failure,
            _ => Tone::Success,
        }
    }

    /// Build a notice, picking a message with `rng`.
    pub fn notice_with<R: Rng + ?Sized>(self, rng: &mut R) -> Notice {
        let message = self
            .messages()
            .choose(rng)
            .copied()
            .unwrap_or_default()
            .to_owned();
        Notice { kind: self, message }
    }

    /// Build a notice using the thread-local random generator.
    #[must_use]
    pub fn notice(self) -> Notice {
        self.notice_with(&mut rand::thread_rng())
    }
}

/// A notification with its message text already chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// What happened.
    pub kind: Notification,
    /// Text shown to the user.
    pub message: String,
}

/// Sink for notices (toast area, log, terminal, ...).
pub trait Notifier: Send + Sync {
    /// Deliver a notice.
    fn notify(&self, notice: &Notice);
}

impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    fn notify(&self, notice: &Notice) {
        (**self).notify(notice);
    }
}

impl<T: Notifier + ?Sized> Notifier for Box<T> {
    fn notify(&self, notice: &Notice) {
        (**self).notify(notice);
    }
}

/// Writes notices to the tracing subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: &Notice) {
        match notice.kind.tone() {
            Tone::Success => info!(kind = ?notice.kind, "{}", notice.message),
            Tone::Failure => warn!(kind = ?notice.kind, "{}", notice.message),
        }
    }
}

/// Keeps every notice in memory; clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    log: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every notice delivered so far.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        guard(&self.log).clone()
    }

    /// Kinds of every notice delivered so far, in delivery order.
    #[must_use]
    pub fn kinds(&self) -> Vec<Notification> {
        guard(&self.log).iter().map(|notice| notice.kind).collect()
    }

    /// Remove and return everything recorded so far.
    pub fn take(&self) -> Vec<Notice> {
        std::mem::take(&mut *guard(&self.log))
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: &Notice) {
        guard(&self.log).push(notice.clone());
    }
}

/// Whether notifications are emitted, and how long the deferred ones wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationSettings {
    /// Master switch; when off the store emits nothing.
    pub enabled: bool,
    /// Delay before "all complete" after toggling a standalone task.
    pub all_complete_delay: Duration,
    /// Delay before "group complete" after toggling a group task.
    pub group_complete_delay: Duration,
    /// Delay before "all complete" after toggling a group task.
    pub group_all_complete_delay: Duration,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            all_complete_delay: Duration::from_millis(500),
            group_complete_delay: Duration::from_millis(300),
            group_all_complete_delay: Duration::from_millis(800),
        }
    }
}

impl NotificationSettings {
    /// Settings with every notification switched off.
    #[must_use]
    pub fn silent() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

pub(crate) fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
