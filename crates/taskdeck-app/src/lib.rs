//! Application layer for taskdeck.
//!
//! This crate owns the board store together with its collaborators
//! (persistence port, notifications, deferred delivery), import/export and
//! configuration shared by every front end.

/// TOML configuration.
pub mod config;
pub mod notify;
pub mod patch;
pub mod persistence;
pub mod scheduler;
pub mod store;
pub mod transfer;

// Re-exports for convenience
pub use config::{AppConfig, NotificationConfig, StorageConfig};
pub use notify::{
    Notice, Notification, NotificationSettings, Notifier, RecordingNotifier, Tone,
    TracingNotifier,
};
pub use patch::{GroupPatch, NewGroup, NewTask, TaskPatch};
pub use persistence::{MemoryPersistence, Persistence};
pub use scheduler::{Deferred, InlineScheduler, ManualScheduler, Scheduler, TokioScheduler};
pub use store::{Store, StoreError};
pub use transfer::{
    Collection, EXPORT_VERSION, ExportDocument, ImportData, ImportError, TransferError,
    backup_file_name, parse_import,
};
