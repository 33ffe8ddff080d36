//! Export documents and validated import payloads.

use std::collections::HashSet;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use taskdeck_core::{BoardSnapshot, Group, Task};
use time::{Date, OffsetDateTime};

/// Format version written into every export.
pub const EXPORT_VERSION: &str = "1.0.0";

/// Full board plus export metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    /// Standalone tasks.
    pub tasks: Vec<Task>,
    /// Groups.
    pub groups: Vec<Group>,
    /// When the export was produced.
    #[serde(with = "time::serde::rfc3339")]
    pub export_date: OffsetDateTime,
    /// Document format version.
    pub version: String,
}

impl ExportDocument {
    /// Wrap `board` as an export taken at `now`.
    #[must_use]
    pub fn new(board: BoardSnapshot, now: OffsetDateTime) -> Self {
        Self {
            tasks: board.tasks,
            groups: board.groups,
            export_date: now,
            version: EXPORT_VERSION.to_owned(),
        }
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    /// Returns [`TransferError::Serialize`] when encoding fails.
    pub fn to_json(&self) -> Result<String, TransferError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Suggested file name for an export made on `date`.
#[must_use]
pub fn backup_file_name(date: Date) -> String {
    format!(
        "taskdeck-backup-{:04}-{:02}-{:02}.json",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Errors produced while building an export.
#[derive(thiserror::Error, Debug)]
pub enum TransferError {
    /// The document could not be encoded.
    #[error("failed to encode export document: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Validated payload accepted by [`Store::import_data`](crate::store::Store::import_data).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportData {
    /// Replacement standalone tasks.
    pub tasks: Vec<Task>,
    /// Replacement groups.
    pub groups: Vec<Group>,
}

impl From<BoardSnapshot> for ImportData {
    fn from(board: BoardSnapshot) -> Self {
        Self {
            tasks: board.tasks,
            groups: board.groups,
        }
    }
}

/// Top-level collection of an import document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    /// The `tasks` array.
    Tasks,
    /// The `groups` array.
    Groups,
}

impl Collection {
    const fn key(self) -> &'static str {
        match self {
            Self::Tasks => "tasks",
            Self::Groups => "groups",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Reasons an import document is rejected.
#[derive(thiserror::Error, Debug)]
pub enum ImportError {
    /// Not JSON, or not a JSON object.
    #[error("import document is malformed: {0}")]
    Malformed(String),
    /// Neither `tasks` nor `groups` is present.
    #[error("import document contains neither `tasks` nor `groups`")]
    MissingCollections,
    /// A collection key is present but does not hold an array.
    #[error("`{collection}` must be an array")]
    InvalidCollection {
        /// Offending collection.
        collection: Collection,
    },
    /// An entry does not have the expected shape.
    #[error("`{collection}` entry {index} is invalid: {reason}")]
    InvalidEntity {
        /// Collection holding the entry.
        collection: Collection,
        /// Zero-based position of the entry.
        index: usize,
        /// Decoder message.
        reason: String,
    },
    /// Two entities share an id within the same scope.
    #[error("duplicate id `{id}` in `{collection}`")]
    DuplicateId {
        /// Collection where the clash was found.
        collection: Collection,
        /// Clashing id.
        id: String,
    },
    /// A task carries progress outside 0 to 100.
    #[error("task {index} has progress {value}, expected 0 to 100")]
    InvalidProgress {
        /// Zero-based position of the task.
        index: usize,
        /// Offending value.
        value: Number,
    },
}

/// Validate an import document.
///
/// Either collection may be missing (it defaults to empty) but not both.
/// Unknown keys such as `exportDate` and `version` are ignored.
///
/// # Errors
/// Returns the first [`ImportError`] found.
pub fn parse_import(input: &str) -> Result<ImportData, ImportError> {
    let value: Value =
        serde_json::from_str(input).map_err(|err| ImportError::Malformed(err.to_string()))?;
    let Value::Object(mut root) = value else {
        return Err(ImportError::Malformed("top level is not an object".to_owned()));
    };
    if !root.contains_key(Collection::Tasks.key()) && !root.contains_key(Collection::Groups.key()) {
        return Err(ImportError::MissingCollections);
    }

    let raw_tasks = take_array(&mut root, Collection::Tasks)?;
    for (index, entry) in raw_tasks.iter().enumerate() {
        check_progress(index, entry)?;
    }
    let tasks: Vec<Task> = decode_entries(raw_tasks, Collection::Tasks)?;
    let groups: Vec<Group> = decode_entries(take_array(&mut root, Collection::Groups)?, Collection::Groups)?;

    check_unique_ids(&tasks, &groups)?;
    Ok(ImportData { tasks, groups })
}

fn take_array(root: &mut Map<String, Value>, collection: Collection) -> Result<Vec<Value>, ImportError> {
    match root.remove(collection.key()) {
        None => Ok(Vec::new()),
        Some(Value::Array(entries)) => Ok(entries),
        Some(_) => Err(ImportError::InvalidCollection { collection }),
    }
}

fn check_progress(index: usize, entry: &Value) -> Result<(), ImportError> {
    if let Some(Value::Number(number)) = entry.get("progress")
        && number.as_f64().is_some_and(|value| !(0.0..=100.0).contains(&value))
    {
        return Err(ImportError::InvalidProgress {
            index,
            value: number.clone(),
        });
    }
    Ok(())
}

fn decode_entries<T: DeserializeOwned>(entries: Vec<Value>, collection: Collection) -> Result<Vec<T>, ImportError> {
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            serde_json::from_value(entry).map_err(|err| ImportError::InvalidEntity {
                collection,
                index,
                reason: err.to_string(),
            })
        })
        .collect()
}

/// Task ids share one scope across the standalone list and every group, since
/// a task lives in exactly one place. Group ids and sub-task ids (per parent)
/// have their own scopes.
fn check_unique_ids(tasks: &[Task], groups: &[Group]) -> Result<(), ImportError> {
    let duplicate = |collection, id: &str| ImportError::DuplicateId {
        collection,
        id: id.to_owned(),
    };

    let mut task_ids = HashSet::new();
    for task in tasks {
        if !task_ids.insert(task.id.as_str()) {
            return Err(duplicate(Collection::Tasks, task.id.as_str()));
        }
        let mut sub_ids = HashSet::new();
        if let Some(sub) = task.sub_tasks.iter().find(|sub| !sub_ids.insert(sub.id.as_str())) {
            return Err(duplicate(Collection::Tasks, sub.id.as_str()));
        }
    }

    let mut group_ids = HashSet::new();
    for group in groups {
        if !group_ids.insert(group.id.as_str()) {
            return Err(duplicate(Collection::Groups, group.id.as_str()));
        }
        if let Some(task) = group.tasks.iter().find(|task| !task_ids.insert(task.id.as_str())) {
            return Err(duplicate(Collection::Groups, task.id.as_str()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::json;
    use taskdeck_core::{GroupTask, SubTask, TaskId};
    use time::macros::datetime;

    fn sample_board() -> BoardSnapshot {
        let id = TaskId::from("task-1");
        BoardSnapshot::new(
            vec![Task {
                sub_tasks: vec![SubTask::new(&id, "draft")],
                id,
                title: "Report".into(),
                completed: false,
                progress: Some(40),
                tag: None,
                show_sub_tasks: true,
            }],
            vec![Group {
                id: "group-1".into(),
                title: "Chores".into(),
                tasks: vec![GroupTask {
                    id: "t1".into(),
                    title: "Dishes".into(),
                    completed: true,
                }],
                collapsed: false,
            }],
        )
    }

    #[test]
    fn export_document_layout() -> Result<()> {
        let doc = ExportDocument::new(sample_board(), datetime!(2024-03-09 12:30:00 UTC));
        let json: Value = serde_json::from_str(&doc.to_json()?)?;
        assert_eq!(json["version"], "1.0.0");
        assert_eq!(json["exportDate"], "2024-03-09T12:30:00Z");
        assert_eq!(json["tasks"][0]["showSubTasks"], true);
        assert_eq!(json["groups"][0]["tasks"][0]["id"], "t1");
        Ok(())
    }

    #[test]
    fn export_can_be_imported_again() -> Result<()> {
        let board = sample_board();
        let doc = ExportDocument::new(board.clone(), datetime!(2024-03-09 12:30:00 UTC));
        let data = parse_import(&doc.to_json()?)?;
        assert_eq!(data, ImportData::from(board));
        Ok(())
    }

    #[test]
    fn backup_name_uses_the_date() {
        let date = datetime!(2025-01-07 23:59:00 UTC).date();
        assert_eq!(backup_file_name(date), "taskdeck-backup-2025-01-07.json");
    }

    #[test]
    fn rejects_non_json_and_non_objects() {
        assert!(matches!(parse_import("{ nope"), Err(ImportError::Malformed(_))));
        assert!(matches!(parse_import("[1, 2]"), Err(ImportError::Malformed(_))));
    }

    #[test]
    fn rejects_document_without_collections() {
        let Err(err) = parse_import(r#"{"version": "1.0.0"}"#) else {
            panic!("document without collections must be rejected");
        };
        assert!(matches!(err, ImportError::MissingCollections));
        assert!(matches!(parse_import("{}"), Err(ImportError::MissingCollections)));
    }

    #[test]
    fn partial_documents_default_missing_collection() -> Result<()> {
        let data = parse_import(r#"{"groups": [{"id": "g", "title": "Solo"}]}"#)?;
        assert!(data.tasks.is_empty());
        assert_eq!(data.groups.len(), 1);
        assert!(data.groups[0].tasks.is_empty());
        assert!(!data.groups[0].collapsed);
        Ok(())
    }

    #[test]
    fn rejects_non_array_collection() {
        let result = parse_import(r#"{"tasks": {"id": "x"}}"#);
        assert!(matches!(
            result,
            Err(ImportError::InvalidCollection {
                collection: Collection::Tasks
            })
        ));
    }

    #[test]
    fn reports_position_of_bad_entity() {
        let doc = json!({
            "tasks": [
                { "id": "a", "title": "ok", "completed": false },
                { "id": "b", "completed": "yes" }
            ]
        });
        let Err(ImportError::InvalidEntity { collection, index, .. }) = parse_import(&doc.to_string()) else {
            panic!("second task should be rejected");
        };
        assert_eq!(collection, Collection::Tasks);
        assert_eq!(index, 1);
    }

    #[test]
    fn rejects_out_of_range_progress() {
        let doc = json!({ "tasks": [{ "id": "a", "title": "x", "completed": false, "progress": 140 }] });
        let Err(err) = parse_import(&doc.to_string()) else {
            panic!("progress above 100 must be rejected");
        };
        assert!(matches!(err, ImportError::InvalidProgress { index: 0, .. }));
        assert!(err.to_string().contains("140"));

        let negative = json!({ "tasks": [{ "id": "a", "title": "x", "completed": false, "progress": -5 }] });
        assert!(matches!(
            parse_import(&negative.to_string()),
            Err(ImportError::InvalidProgress { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_ids_per_scope() {
        let tasks = json!({ "tasks": [
            { "id": "a", "title": "x", "completed": false },
            { "id": "a", "title": "y", "completed": false }
        ]});
        assert!(matches!(
            parse_import(&tasks.to_string()),
            Err(ImportError::DuplicateId { collection: Collection::Tasks, .. })
        ));

        let groups = json!({ "groups": [
            { "id": "g", "title": "x" },
            { "id": "g", "title": "y" }
        ]});
        assert!(matches!(
            parse_import(&groups.to_string()),
            Err(ImportError::DuplicateId { collection: Collection::Groups, .. })
        ));

        let straddling = json!({
            "tasks": [{ "id": "a", "title": "x", "completed": false }],
            "groups": [{ "id": "g", "title": "g", "tasks": [{ "id": "a", "title": "x", "completed": false }] }]
        });
        let Err(ImportError::DuplicateId { id, .. }) = parse_import(&straddling.to_string()) else {
            panic!("task in both places must be rejected");
        };
        assert_eq!(id, "a");
    }

    #[test]
    fn duplicate_sub_task_ids_are_rejected() {
        let doc = json!({ "tasks": [{
            "id": "a", "title": "x", "completed": false,
            "subTasks": [
                { "id": "s", "title": "1", "completed": false },
                { "id": "s", "title": "2", "completed": true }
            ]
        }]});
        assert!(matches!(parse_import(&doc.to_string()), Err(ImportError::DuplicateId { .. })));
    }
}
