//! End-to-end store behaviour against the JSON file backend.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use taskdeck_app::{
    AppConfig, GroupPatch, ImportError, InlineScheduler, ManualScheduler, NewGroup, NewTask,
    Notification, NotificationSettings, Notifier, RecordingNotifier, Store, StoreError,
    TokioScheduler, parse_import,
};
use taskdeck_core::{BoardSnapshot, GroupTask};
use taskdeck_store_fs::{JsonFileStore, STATE_FILE};
use tempfile::tempdir;
use time::macros::datetime;

type FileStore = Store<JsonFileStore, RecordingNotifier, ManualScheduler>;

fn open_in(dir: &std::path::Path) -> Result<FileStore, StoreError> {
    Store::open(
        JsonFileStore::in_dir(dir),
        RecordingNotifier::new(),
        ManualScheduler::new(),
        NotificationSettings::default(),
    )
}

#[test]
fn board_survives_a_restart() -> Result<()> {
    let dir = tempdir()?;
    let (task_id, group_id) = {
        let mut store = open_in(dir.path())?;
        let task_id = store.add_task(NewTask::titled("Buy milk"))?;
        store.add_sub_task(task_id.as_str(), "check fridge")?;
        let group_id = store.add_group(NewGroup::titled("Chores"))?.context("group should be created")?;
        store.add_task_to_group(group_id.as_str(), GroupTask::new("Dishes"))?;
        store.update_group(group_id.as_str(), GroupPatch::default().collapsed(true))?;
        (task_id, group_id)
    };

    let reopened = open_in(dir.path())?;
    assert_eq!(reopened.total_tasks_count(), 2);
    let Some(task) = reopened.find_task(task_id.as_str()) else {
        panic!("task should be persisted");
    };
    assert_eq!(task.sub_tasks.len(), 1);
    let Some(group) = reopened.find_group(group_id.as_str()) else {
        panic!("group should be persisted");
    };
    assert!(group.collapsed);
    assert_eq!(group.tasks[0].title, "Dishes");
    Ok(())
}

#[test]
fn persisted_document_uses_the_documented_layout() -> Result<()> {
    let dir = tempdir()?;
    let mut store = open_in(dir.path())?;
    let id = store.add_task(NewTask::titled("Layout"))?;
    store.toggle_show_sub_tasks(id.as_str())?;

    let raw = fs::read_to_string(dir.path().join(STATE_FILE))?;
    let json: serde_json::Value = serde_json::from_str(&raw)?;
    assert_eq!(json["tasks"][0]["title"], "Layout");
    assert_eq!(json["tasks"][0]["showSubTasks"], true);
    assert_eq!(json["tasks"][0]["subTasks"], serde_json::json!([]));
    assert!(json["tasks"][0].get("progress").is_none());
    assert_eq!(json["groups"], serde_json::json!([]));
    Ok(())
}

#[test]
fn corrupt_state_file_fails_to_open() -> Result<()> {
    let dir = tempdir()?;
    fs::write(dir.path().join(STATE_FILE), "{ broken")?;
    let Err(err) = open_in(dir.path()) else {
        panic!("corrupt board should not open");
    };
    assert!(matches!(err, StoreError::Load(_)));
    Ok(())
}

#[test]
fn export_then_import_into_a_fresh_board() -> Result<()> {
    let source_dir = tempdir()?;
    let mut source = open_in(source_dir.path())?;
    let id = source.add_task(NewTask {
        title: "Portable".into(),
        progress: Some(50),
        ..NewTask::default()
    })?;
    source.add_sub_task(id.as_str(), "step")?;
    let group = source.add_group(NewGroup::titled("Travel"))?.context("group should be created")?;
    source.add_task_to_group(group.as_str(), GroupTask::new("Passport"))?;

    let exported = source.export_document(datetime!(2024-06-01 08:00 UTC)).to_json()?;

    let target_dir = tempdir()?;
    let mut target = open_in(target_dir.path())?;
    target.add_task(NewTask::titled("will be replaced"))?;
    target.import_data(parse_import(&exported)?)?;

    assert_eq!(target.snapshot(), source.snapshot());
    assert_eq!(
        target.notifier().kinds().last(),
        Some(&Notification::DataImported)
    );
    Ok(())
}

#[test]
fn import_empty_collections_replaces_state() -> Result<()> {
    let dir = tempdir()?;
    let mut store = open_in(dir.path())?;
    store.add_task(NewTask::titled("old"))?;
    store.add_group(NewGroup::titled("old"))?;

    store.import_data(parse_import(r#"{"tasks": [], "groups": []}"#)?)?;
    assert!(store.snapshot().is_empty());
    assert_eq!(
        JsonFileStore::in_dir(dir.path()).load()?,
        Some(BoardSnapshot::default())
    );
    Ok(())
}

#[test]
fn import_without_collections_leaves_state_alone() -> Result<()> {
    let dir = tempdir()?;
    let mut store = open_in(dir.path())?;
    store.add_task(NewTask::titled("keep me"))?;
    let before = store.snapshot().clone();

    match parse_import("{}") {
        Ok(data) => {
            store.import_data(data)?;
        }
        Err(err) => {
            assert!(matches!(err, ImportError::MissingCollections));
            store.announce(Notification::ImportFailed);
        }
    }
    assert_eq!(store.snapshot(), &before);
    assert_eq!(
        store.notifier().kinds().last(),
        Some(&Notification::ImportFailed)
    );
    Ok(())
}

#[test]
fn config_drives_store_settings() -> Result<()> {
    let dir = tempdir()?;
    fs::write(
        dir.path().join("config.toml"),
        "[notifications]\nall_complete_delay_ms = 50\n",
    )?;
    let config = AppConfig::load(dir.path())?;

    let scheduler = ManualScheduler::new();
    let mut store = Store::open(
        JsonFileStore::at(config.state_path(dir.path())),
        RecordingNotifier::new(),
        scheduler.clone(),
        config.notification_settings(),
    )?;
    let id = store.add_task(NewTask::titled("fast"))?;
    store.toggle_task(id.as_str())?;

    let pending = scheduler.pending();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].delay, Duration::from_millis(50));
    Ok(())
}

#[test]
fn inline_scheduler_delivers_everything_to_one_sink() -> Result<()> {
    let recorder = RecordingNotifier::new();
    let mut store = Store::with_board(
        BoardSnapshot::default(),
        taskdeck_app::MemoryPersistence::new(),
        recorder.clone(),
        InlineScheduler::new(recorder.clone()),
        NotificationSettings::default(),
    );
    let group = store.add_group(NewGroup {
        title: "Solo".into(),
        tasks: vec![GroupTask::new("only")],
    })?
    .context("group should be created")?;
    let Some(task_id) = store.find_group(group.as_str()).map(|group| group.tasks[0].id.clone()) else {
        panic!("group should exist");
    };
    store.toggle_group_task(group.as_str(), task_id.as_str())?;

    assert_eq!(recorder.kinds(), vec![
        Notification::NewGroup,
        Notification::TaskComplete,
        Notification::GroupComplete,
        Notification::AllTasksComplete,
    ]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn tokio_scheduler_delivers_group_before_board() -> Result<()> {
    let recorder = RecordingNotifier::new();
    let sink: Arc<dyn Notifier> = Arc::new(recorder.clone());
    let scheduler = Arc::new(TokioScheduler::new(
        tokio::runtime::Handle::current(),
        Arc::clone(&sink),
    ));
    let mut store = Store::with_board(
        BoardSnapshot::default(),
        taskdeck_app::MemoryPersistence::new(),
        Arc::clone(&sink),
        Arc::clone(&scheduler),
        NotificationSettings::default(),
    );
    let group = store.add_group(NewGroup {
        title: "Solo".into(),
        tasks: vec![GroupTask::new("only")],
    })?
    .context("group should be created")?;
    let Some(task_id) = store.find_group(group.as_str()).map(|group| group.tasks[0].id.clone()) else {
        panic!("group should exist");
    };
    store.toggle_group_task(group.as_str(), task_id.as_str())?;
    assert_eq!(recorder.kinds(), vec![Notification::NewGroup, Notification::TaskComplete]);

    scheduler.settle().await;
    assert_eq!(recorder.kinds(), vec![
        Notification::NewGroup,
        Notification::TaskComplete,
        Notification::GroupComplete,
        Notification::AllTasksComplete,
    ]);
    Ok(())
}
