use std::borrow::Borrow;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use taskdeck_app::{
    GroupPatch, NewGroup, NewTask, Notification, Notifier, Persistence, Scheduler, Store,
    backup_file_name, parse_import,
};
use taskdeck_core::ordering::Keyed;
use taskdeck_core::{BoardSnapshot, GroupTask, Tag, find_default_tag};
use time::OffsetDateTime;

use crate::{Command, GroupCommand, SubCommand};

mod render;

pub fn run<P, N, S, W>(command: Command, store: &mut Store<P, N, S>, out: &mut W) -> Result<()>
where
    P: Persistence,
    N: Notifier,
    S: Scheduler,
    W: Write,
{
    match command {
        Command::Ls { json } => render::board(store.snapshot(), json, out),
        Command::Add {
            title,
            tag,
            progress,
            done,
        } => {
            let tag = tag.as_deref().map(parse_tag).transpose()?;
            let id = store.add_task(NewTask {
                title: non_empty(&title)?,
                completed: done,
                progress,
                tag,
                ..NewTask::default()
            })?;
            writeln!(out, "added task {id}")?;
            Ok(())
        }
        Command::Toggle { task } => {
            let id = resolve(store.tasks(), &task, "task")?;
            store.toggle_task(&id)?;
            let completed = store.find_task(&id).is_some_and(|task| task.completed);
            writeln!(out, "{} {id}", if completed { "completed" } else { "reopened" })?;
            Ok(())
        }
        Command::Rm { task } => {
            let id = resolve(store.tasks(), &task, "task")?;
            let changed = store.delete_task(&id)?;
            report(out, changed, &format!("deleted task {id}"))
        }
        Command::Edit { task, title } => {
            let id = resolve(store.tasks(), &task, "task")?;
            let changed = store.rename_task(&id, non_empty(&title)?)?;
            report(out, changed, &format!("renamed task {id}"))
        }
        Command::Progress { task, value } => {
            let id = resolve(store.tasks(), &task, "task")?;
            let changed = store.set_progress(&id, value)?;
            let progress = store.find_task(&id).and_then(|task| task.progress);
            let message = progress.map_or_else(
                || format!("cleared progress of {id}"),
                |value| format!("progress of {id} is {value}%"),
            );
            report(out, changed, &message)
        }
        Command::Tag { task, tag } => {
            let id = resolve(store.tasks(), &task, "task")?;
            let tag = parse_tag(&tag)?;
            let label = tag.label.clone();
            let changed = store.set_tag(&id, tag)?;
            report(out, changed, &format!("tagged {id} as {label}"))
        }
        Command::Untag { task } => {
            let id = resolve(store.tasks(), &task, "task")?;
            let changed = store.clear_tag(&id)?;
            report(out, changed, &format!("removed tag from {id}"))
        }
        Command::Mv { from, to } => {
            let changed = store.move_task(position(from)?, position(to)?)?;
            report(out, changed, &format!("moved task {from} to {to}"))
        }
        Command::ToGroup { task, group } => {
            let task_id = resolve(store.tasks(), &task, "task")?;
            let group_id = resolve(store.groups(), &group, "group")?;
            let changed = store.move_task_to_group(&task_id, &group_id)?;
            report(out, changed, &format!("moved {task_id} into {group_id}"))
        }
        Command::Sub(sub) => run_sub(sub, store, out),
        Command::Group(group) => run_group(group, store, out),
        Command::Stats => render::stats(store.snapshot(), out),
        Command::Export { out: path } => export(store, path, out),
        Command::Import { path } => import(store, &path, out),
        Command::Clear { yes } => {
            if !yes {
                bail!("refusing to clear the board without --yes");
            }
            store.clear_all_data()?;
            writeln!(out, "cleared all data")?;
            Ok(())
        }
    }
}

fn run_sub<P, N, S, W>(command: SubCommand, store: &mut Store<P, N, S>, out: &mut W) -> Result<()>
where
    P: Persistence,
    N: Notifier,
    S: Scheduler,
    W: Write,
{
    match command {
        SubCommand::Add { task, title } => {
            let task_id = resolve(store.tasks(), &task, "task")?;
            let added = store.add_sub_task(&task_id, non_empty(&title)?)?;
            match added {
                Some(id) => writeln!(out, "added sub-task {id}")?,
                None => writeln!(out, "nothing changed")?,
            }
            Ok(())
        }
        SubCommand::Toggle { task, sub } => {
            let (task_id, sub_id) = resolve_sub_task(store.snapshot(), &task, &sub)?;
            let changed = store.toggle_sub_task(&task_id, &sub_id)?;
            let completed = store
                .find_task(&task_id)
                .and_then(|task| task.sub_task(&sub_id))
                .is_some_and(|sub| sub.completed);
            let verb = if completed { "completed" } else { "reopened" };
            report(out, changed, &format!("{verb} sub-task {sub_id}"))
        }
        SubCommand::Rename { task, sub, title } => {
            let (task_id, sub_id) = resolve_sub_task(store.snapshot(), &task, &sub)?;
            let changed = store.rename_sub_task(&task_id, &sub_id, non_empty(&title)?)?;
            report(out, changed, &format!("renamed sub-task {sub_id}"))
        }
        SubCommand::Rm { task, sub } => {
            let (task_id, sub_id) = resolve_sub_task(store.snapshot(), &task, &sub)?;
            let changed = store.delete_sub_task(&task_id, &sub_id)?;
            report(out, changed, &format!("deleted sub-task {sub_id}"))
        }
        SubCommand::Mv { task, from, to } => {
            let task_id = resolve(store.tasks(), &task, "task")?;
            let changed = store.move_sub_task(&task_id, position(from)?, position(to)?)?;
            report(out, changed, &format!("moved sub-task {from} to {to}"))
        }
        SubCommand::Show { task } => {
            let task_id = resolve(store.tasks(), &task, "task")?;
            let changed = store.toggle_show_sub_tasks(&task_id)?;
            let shown = store.find_task(&task_id).is_some_and(|task| task.show_sub_tasks);
            let verb = if shown { "showing" } else { "hiding" };
            report(out, changed, &format!("{verb} sub-tasks of {task_id}"))
        }
    }
}

fn run_group<P, N, S, W>(command: GroupCommand, store: &mut Store<P, N, S>, out: &mut W) -> Result<()>
where
    P: Persistence,
    N: Notifier,
    S: Scheduler,
    W: Write,
{
    match command {
        GroupCommand::Add { title } => {
            match store.add_group(NewGroup::titled(non_empty(&title)?))? {
                Some(id) => writeln!(out, "added group {id}")?,
                None => writeln!(out, "nothing changed")?,
            }
            Ok(())
        }
        GroupCommand::Rm { group } => {
            let id = resolve(store.groups(), &group, "group")?;
            let changed = store.delete_group(&id)?;
            report(out, changed, &format!("deleted group {id}"))
        }
        GroupCommand::Rename { group, title } => {
            let id = resolve(store.groups(), &group, "group")?;
            let changed = store.update_group(&id, GroupPatch::default().title(non_empty(&title)?))?;
            report(out, changed, &format!("renamed group {id}"))
        }
        GroupCommand::Collapse { group } => {
            let id = resolve(store.groups(), &group, "group")?;
            let collapsed = store.find_group(&id).is_some_and(|group| group.collapsed);
            let changed = store.update_group(&id, GroupPatch::default().collapsed(!collapsed))?;
            let verb = if collapsed { "expanded" } else { "collapsed" };
            report(out, changed, &format!("{verb} group {id}"))
        }
        GroupCommand::Toggle { group, task } => {
            let (group_id, task_id) = resolve_group_task(store.snapshot(), &group, &task)?;
            store.toggle_group_task(&group_id, &task_id)?;
            let completed = store
                .find_group(&group_id)
                .and_then(|group| group.task(&task_id))
                .is_some_and(|task| task.completed);
            writeln!(out, "{} {task_id}", if completed { "completed" } else { "reopened" })?;
            Ok(())
        }
        GroupCommand::AddTask { group, title } => {
            let group_id = resolve(store.groups(), &group, "group")?;
            let task = GroupTask::new(non_empty(&title)?);
            let task_id = task.id.clone();
            let changed = store.add_task_to_group(&group_id, task)?;
            report(out, changed, &format!("added {task_id} to {group_id}"))
        }
        GroupCommand::RmTask { group, task } => {
            let (group_id, task_id) = resolve_group_task(store.snapshot(), &group, &task)?;
            let changed = store.remove_group_task(&group_id, &task_id)?;
            report(out, changed, &format!("removed {task_id} from {group_id}"))
        }
        GroupCommand::Mv { from, to } => {
            let changed = store.move_group(position(from)?, position(to)?)?;
            report(out, changed, &format!("moved group {from} to {to}"))
        }
        GroupCommand::MvTask { group, from, to } => {
            let group_id = resolve(store.groups(), &group, "group")?;
            let changed = store.move_group_task(&group_id, position(from)?, position(to)?)?;
            report(out, changed, &format!("moved task {from} to {to} in {group_id}"))
        }
    }
}

fn export<P, N, S, W>(store: &Store<P, N, S>, path: Option<PathBuf>, out: &mut W) -> Result<()>
where
    P: Persistence,
    N: Notifier,
    S: Scheduler,
    W: Write,
{
    let now = OffsetDateTime::now_utc();
    let path = path.unwrap_or_else(|| PathBuf::from(backup_file_name(now.date())));
    let written = store
        .export_document(now)
        .to_json()
        .map_err(anyhow::Error::from)
        .and_then(|body| {
            fs::write(&path, body).with_context(|| format!("failed to write {}", path.display()))
        });
    if let Err(err) = written {
        store.announce(Notification::ExportFailed);
        return Err(err);
    }
    store.announce(Notification::ExportSucceeded);
    writeln!(out, "exported to {}", path.display())?;
    Ok(())
}

fn import<P, N, S, W>(store: &mut Store<P, N, S>, path: &Path, out: &mut W) -> Result<()>
where
    P: Persistence,
    N: Notifier,
    S: Scheduler,
    W: Write,
{
    let parsed = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))
        .and_then(|contents| {
            parse_import(&contents)
                .with_context(|| format!("{} is not a taskdeck export", path.display()))
        });
    let data = match parsed {
        Ok(data) => data,
        Err(err) => {
            store.announce(Notification::ImportFailed);
            return Err(err);
        }
    };
    store.import_data(data)?;
    writeln!(
        out,
        "imported {} tasks and {} groups",
        store.tasks().len(),
        store.groups().len()
    )?;
    Ok(())
}

fn report<W: Write>(out: &mut W, changed: bool, message: &str) -> Result<()> {
    if changed {
        writeln!(out, "{message}")?;
    } else {
        writeln!(out, "nothing changed")?;
    }
    Ok(())
}

fn non_empty(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("title must not be empty");
    }
    Ok(trimmed.to_owned())
}

fn parse_tag(raw: &str) -> Result<Tag> {
    if raw.trim().is_empty() {
        bail!("tag must not be empty");
    }
    Ok(find_default_tag(raw).unwrap_or_else(|| Tag::custom(raw)))
}

/// Convert a 1-based position from the command line.
fn position(value: usize) -> Result<usize> {
    value.checked_sub(1).ok_or_else(|| anyhow!("positions start at 1"))
}

/// Resolve an id or 1-based position to an id. An exact id match wins over
/// a position, so numeric ids stay addressable.
fn resolve<T>(items: &[T], reference: &str, what: &str) -> Result<String>
where
    T: Keyed,
    T::Key: Borrow<str>,
{
    let found = items
        .iter()
        .find(|item| Borrow::<str>::borrow(item.key()) == reference)
        .or_else(|| {
            reference
                .parse::<usize>()
                .ok()
                .and_then(|number| number.checked_sub(1))
                .and_then(|index| items.get(index))
        });
    found
        .map(|item| Borrow::<str>::borrow(item.key()).to_owned())
        .ok_or_else(|| anyhow!("no {what} matches `{reference}`"))
}

fn resolve_sub_task(board: &BoardSnapshot, task: &str, sub: &str) -> Result<(String, String)> {
    let task_id = resolve(&board.tasks, task, "task")?;
    let sub_tasks = board.task(&task_id).map_or(&[][..], |task| task.sub_tasks.as_slice());
    let sub_id = resolve(sub_tasks, sub, "sub-task")?;
    Ok((task_id, sub_id))
}

fn resolve_group_task(board: &BoardSnapshot, group: &str, task: &str) -> Result<(String, String)> {
    let group_id = resolve(&board.groups, group, "group")?;
    let tasks = board.group(&group_id).map_or(&[][..], |group| group.tasks.as_slice());
    let task_id = resolve(tasks, task, "task")?;
    Ok((group_id, task_id))
}
