use jiff::Zoned;
use serde_json::json;

use super::{CommandOutput, format_task_line};
use crate::error::Result;
use crate::hierarchy::{
    NewTask, TaskFilter, TaskUpdate, delete_task, effective_effort, select_tasks, subtask_counts,
    update_task_status,
};
use crate::store::Workspace;
use crate::types::{Recurrence, TaskCategory, TaskStatus};

/// Options for creating a new task
pub struct CreateTaskOptions {
    pub title: String,
    pub category: TaskCategory,
    pub assignee: String,
    pub effort_hours: f64,
    pub start_date: String,
    pub end_date: String,
    pub recurrence: Recurrence,
    pub parent: Option<String>,
}

/// Create a task (or subtask, with `--parent`) and print its id
pub fn cmd_task_create(options: CreateTaskOptions, output_json: bool) -> Result<()> {
    let mut workspace = Workspace::load()?;

    let input = NewTask {
        title: options.title,
        category: options.category,
        assigned_to: options.assignee,
        effort_hours: options.effort_hours,
        start_date: options.start_date,
        end_date: options.end_date,
        status: TaskStatus::Todo,
        recurrence: options.recurrence,
    };
    let task = workspace.add_task(input, options.parent.as_deref(), Zoned::now().date())?;
    workspace.save()?;

    CommandOutput::new(json!({
        "id": task.id,
        "action": "task_created",
        "parent_id": task.parent_id,
        "title": task.title,
        "category": task.category.to_string(),
        "assigned_to": task.assigned_to,
        "effort_hours": task.effort_hours,
        "status": task.status.to_string(),
    }))
    .with_text(task.id.clone())
    .print(output_json)
}

/// Transition a task's status, enforcing closure blocking
pub fn cmd_task_status(id: &str, new_status: TaskStatus, output_json: bool) -> Result<()> {
    let mut workspace = Workspace::load()?;
    let previous = workspace.task(id)?.status;
    let task = update_task_status(&mut workspace.tasks, id, new_status)?;
    workspace.save()?;

    CommandOutput::new(json!({
        "id": task.id,
        "action": "status_changed",
        "previous_status": previous.to_string(),
        "new_status": new_status.to_string(),
    }))
    .with_text(format!("Updated {} -> {}", task.id, new_status))
    .print(output_json)
}

/// Edit task fields in place
pub fn cmd_task_edit(id: &str, update: TaskUpdate, output_json: bool) -> Result<()> {
    let mut workspace = Workspace::load()?;
    let task = workspace.edit_task(id, update)?;
    workspace.save()?;

    CommandOutput::new(json!({
        "id": task.id,
        "action": "task_updated",
        "title": task.title,
        "assigned_to": task.assigned_to,
        "effort_hours": task.effort_hours,
        "start_date": task.start_date,
        "end_date": task.end_date,
    }))
    .with_text(format!("Updated {}", task.id))
    .print(output_json)
}

/// List tasks, hierarchically or filtered flat
pub fn cmd_task_ls(filter: TaskFilter, output_json: bool) -> Result<()> {
    let workspace = Workspace::load()?;
    let selected = select_tasks(&workspace.tasks, &filter);
    let counts = subtask_counts(&workspace.tasks);

    if output_json {
        let items: Vec<_> = selected
            .iter()
            .map(|t| {
                json!({
                    "id": t.id,
                    "parent_id": t.parent_id,
                    "title": t.title,
                    "category": t.category.to_string(),
                    "assigned_to": t.assigned_to,
                    "status": t.status.to_string(),
                    "stored_effort": t.stored_effort(),
                    "effective_effort": effective_effort(t, &workspace.tasks),
                    "start_date": t.start_date,
                    "end_date": t.end_date,
                })
            })
            .collect();
        return CommandOutput::new(json!({ "tasks": items })).print(true);
    }

    for task in selected {
        let count = counts.get(&task.id).copied().unwrap_or(0);
        println!(
            "{}",
            format_task_line(task, count, effective_effort(task, &workspace.tasks))
        );
    }
    Ok(())
}

/// Delete a task; a main task takes its subtasks with it
pub fn cmd_task_rm(id: &str, output_json: bool) -> Result<()> {
    let mut workspace = Workspace::load()?;
    let removed = delete_task(&mut workspace.tasks, id)?;
    workspace.save()?;

    let text = if removed > 1 {
        format!("Removed {} and {} subtask(s)", id, removed - 1)
    } else {
        format!("Removed {id}")
    };
    CommandOutput::new(json!({
        "id": id,
        "action": "task_removed",
        "removed": removed,
    }))
    .with_text(text)
    .print(output_json)
}
