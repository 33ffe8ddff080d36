use std::io::Write;

use anyhow::Result;
use taskdeck_core::{BoardSnapshot, Group, Task};

const INDENT: &str = "       ";

pub(super) fn board<W: Write>(board: &BoardSnapshot, json: bool, out: &mut W) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(board)?)?;
        return Ok(());
    }
    if board.is_empty() {
        writeln!(out, "No tasks yet")?;
        return Ok(());
    }

    if !board.tasks.is_empty() {
        writeln!(out, "Tasks")?;
        for (index, task) in board.tasks.iter().enumerate() {
            render_task(index + 1, task, out)?;
        }
    }
    if !board.groups.is_empty() {
        writeln!(out, "Groups")?;
        for (index, group) in board.groups.iter().enumerate() {
            render_group(index + 1, group, out)?;
        }
    }
    Ok(())
}

fn render_task<W: Write>(position: usize, task: &Task, out: &mut W) -> Result<()> {
    let mut line = format!("{position:>4}. {} {}", checkbox(task.completed), task.title);
    if let Some(tag) = &task.tag {
        line.push_str(&format!("  #{}", tag.label));
    }
    if let Some(progress) = task.progress {
        line.push_str(&format!("  {progress}%"));
    }
    writeln!(out, "{line}  ({})", task.id)?;

    if task.sub_tasks.is_empty() {
        return Ok(());
    }
    if task.show_sub_tasks {
        for (index, sub) in task.sub_tasks.iter().enumerate() {
            writeln!(out, "{INDENT}{}. {} {}", index + 1, checkbox(sub.completed), sub.title)?;
        }
    } else {
        writeln!(
            out,
            "{INDENT}{}/{} sub-tasks",
            task.completed_sub_tasks(),
            task.sub_tasks.len()
        )?;
    }
    Ok(())
}

fn render_group<W: Write>(position: usize, group: &Group, out: &mut W) -> Result<()> {
    let collapsed = if group.collapsed { " [collapsed]" } else { "" };
    writeln!(
        out,
        "{position:>4}. {} ({}/{}, {}%){collapsed}  ({})",
        group.title,
        group.completed_count(),
        group.tasks.len(),
        group.progress_percent(),
        group.id
    )?;
    if group.collapsed {
        return Ok(());
    }
    for (index, task) in group.tasks.iter().enumerate() {
        writeln!(out, "{INDENT}{}. {} {}", index + 1, checkbox(task.completed), task.title)?;
    }
    Ok(())
}

pub(super) fn stats<W: Write>(board: &BoardSnapshot, out: &mut W) -> Result<()> {
    writeln!(
        out,
        "{}/{} tasks completed",
        board.completed_tasks_count(),
        board.total_tasks_count()
    )?;
    if board.is_all_tasks_completed() {
        writeln!(out, "Everything is done")?;
    }
    Ok(())
}

const fn checkbox(completed: bool) -> &'static str {
    if completed { "[x]" } else { "[ ]" }
}
