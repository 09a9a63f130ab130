//! Parent/child task management: ID assignment, effort rollup, closure
//! blocking and cascade deletion.
//!
//! Tasks form a two-level tree stored as a flat collection with a
//! child -> parent id reference. Parent-side aggregates are computed by
//! filtering that collection; there are no back-pointers.

use std::collections::HashMap;

use jiff::civil::Date;
use tracing::debug;

use crate::calendar::parse_date;
use crate::error::{CadenceError, Result};
use crate::types::{Recurrence, TaskCategory, TaskStatus, WorkTask};

/// Direct subtasks of `parent_id`, in collection order.
pub fn children_of<'a>(
    tasks: &'a [WorkTask],
    parent_id: &'a str,
) -> impl Iterator<Item = &'a WorkTask> {
    tasks
        .iter()
        .filter(move |t| t.parent_id.as_deref() == Some(parent_id))
}

/// Subtask count per parent id, for display.
pub fn subtask_counts(tasks: &[WorkTask]) -> HashMap<String, usize> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for task in tasks {
        if let Some(parent) = &task.parent_id {
            *counts.entry(parent.clone()).or_default() += 1;
        }
    }
    counts
}

/// The effort value used for aggregation: the sum of direct subtasks'
/// stored effort when at least one subtask exists, otherwise the task's
/// own stored value.
pub fn effective_effort(task: &WorkTask, tasks: &[WorkTask]) -> f64 {
    let mut sum = 0.0;
    let mut has_children = false;
    for child in children_of(tasks, &task.id) {
        has_children = true;
        sum += child.stored_effort();
    }
    if has_children { sum } else { task.stored_effort() }
}

/// Number of subtasks of `task_id` that are not yet Done or Cancelled.
pub fn open_children(tasks: &[WorkTask], task_id: &str) -> usize {
    children_of(tasks, task_id)
        .filter(|c| !c.status.is_terminal())
        .count()
}

/// Whether a closing transition on `task_id` would currently be rejected.
pub fn is_blocked_from_closing(tasks: &[WorkTask], task_id: &str) -> bool {
    open_children(tasks, task_id) > 0
}

/// Generate an id for a new task.
///
/// Main tasks: `{CATEGORY}-{YYYY}-{MM}-{SSSS}` where the sequence is one
/// past the live count of main tasks in that category. Subtasks:
/// `{parent_id}-{n}` where `n` is one past the parent's live subtask
/// count. Sequence numbers are derived from current state, so deleting
/// and recreating tasks can reuse numbers.
pub fn generate_task_id(
    tasks: &[WorkTask],
    category: TaskCategory,
    today: Date,
    parent_id: Option<&str>,
) -> String {
    if let Some(parent) = parent_id {
        let n = children_of(tasks, parent).count() + 1;
        format!("{parent}-{n}")
    } else {
        let count = tasks
            .iter()
            .filter(|t| t.is_main() && t.category == category)
            .count();
        format!(
            "{}-{:04}-{:02}-{:04}",
            category,
            today.year(),
            today.month(),
            count + 1
        )
    }
}

/// Field values for a task to be created.
pub struct NewTask {
    pub title: String,
    pub category: TaskCategory,
    pub assigned_to: String,
    pub effort_hours: f64,
    pub start_date: String,
    pub end_date: String,
    pub status: TaskStatus,
    pub recurrence: Recurrence,
}

impl Default for NewTask {
    fn default() -> Self {
        NewTask {
            title: "Untitled".to_string(),
            category: TaskCategory::default(),
            assigned_to: String::new(),
            effort_hours: 4.0,
            start_date: String::new(),
            end_date: String::new(),
            status: TaskStatus::Todo,
            recurrence: Recurrence::None,
        }
    }
}

fn validate_fields(title: &str, effort_hours: f64, start_date: &str, end_date: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(CadenceError::Validation("title must not be empty".into()));
    }
    if effort_hours < 0.0 {
        return Err(CadenceError::Validation(format!(
            "effort hours must be non-negative (got {effort_hours})"
        )));
    }
    let start = parse_date(start_date)?;
    let end = parse_date(end_date)?;
    if end < start {
        return Err(CadenceError::Validation(format!(
            "end date {end_date} is before start date {start_date}"
        )));
    }
    Ok(())
}

/// Create a task, assigning its id. With a `parent_id` the new record is a
/// subtask: it inherits the parent's category, and the parent must itself
/// be a main task. No state is touched when validation fails.
pub fn create_task(
    tasks: &mut Vec<WorkTask>,
    mut input: NewTask,
    parent_id: Option<&str>,
    today: Date,
) -> Result<WorkTask> {
    validate_fields(
        &input.title,
        input.effort_hours,
        &input.start_date,
        &input.end_date,
    )?;

    if let Some(pid) = parent_id {
        let parent = tasks
            .iter()
            .find(|t| t.id == pid)
            .ok_or_else(|| CadenceError::TaskNotFound(pid.to_string()))?;
        if parent.parent_id.is_some() {
            return Err(CadenceError::Validation(format!(
                "'{pid}' is a subtask and cannot have subtasks of its own"
            )));
        }
        input.category = parent.category;
    }

    let id = generate_task_id(tasks, input.category, today, parent_id);
    let task = WorkTask {
        id,
        parent_id: parent_id.map(str::to_string),
        title: input.title,
        category: input.category,
        assigned_to: input.assigned_to,
        effort_hours: input.effort_hours,
        start_date: input.start_date,
        end_date: input.end_date,
        status: input.status,
        recurrence: input.recurrence,
    };

    debug!(id = %task.id, parent = ?task.parent_id, "task created");
    tasks.push(task.clone());
    Ok(task)
}

/// Transition a task's status.
///
/// A main task may not move to Done or Cancelled while it has at least one
/// open subtask; such a transition is rejected with `ClosureBlocked` and
/// the state is left unchanged. Every other point-to-point transition is
/// legal, including reopening a closed task.
pub fn update_task_status(
    tasks: &mut [WorkTask],
    task_id: &str,
    new_status: TaskStatus,
) -> Result<WorkTask> {
    if new_status.is_terminal() && is_blocked_from_closing(tasks, task_id) {
        return Err(CadenceError::ClosureBlocked {
            id: task_id.to_string(),
            open: open_children(tasks, task_id),
        });
    }
    let task = tasks
        .iter_mut()
        .find(|t| t.id == task_id)
        .ok_or_else(|| CadenceError::TaskNotFound(task_id.to_string()))?;

    let previous = task.status;
    task.status = new_status;
    debug!(id = %task.id, from = %previous, to = %new_status, "status changed");
    Ok(task.clone())
}

/// Field edits for an existing task. Status changes go through
/// [`update_task_status`] only.
#[derive(Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub assigned_to: Option<String>,
    pub effort_hours: Option<f64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub recurrence: Option<Recurrence>,
}

/// Apply field edits in place, with the same field validation as
/// creation. Assignee existence is checked at the workspace level, as it
/// is for creation. Nothing is written if validation fails.
pub fn update_task(tasks: &mut [WorkTask], task_id: &str, update: TaskUpdate) -> Result<WorkTask> {
    let idx = tasks
        .iter()
        .position(|t| t.id == task_id)
        .ok_or_else(|| CadenceError::TaskNotFound(task_id.to_string()))?;

    let mut edited = tasks[idx].clone();
    if let Some(title) = update.title {
        edited.title = title;
    }
    if let Some(assigned_to) = update.assigned_to {
        edited.assigned_to = assigned_to;
    }
    if let Some(effort) = update.effort_hours {
        edited.effort_hours = effort;
    }
    if let Some(start) = update.start_date {
        edited.start_date = start;
    }
    if let Some(end) = update.end_date {
        edited.end_date = end;
    }
    if let Some(recurrence) = update.recurrence {
        edited.recurrence = recurrence;
    }

    validate_fields(
        &edited.title,
        edited.effort_hours,
        &edited.start_date,
        &edited.end_date,
    )?;

    tasks[idx] = edited.clone();
    debug!(id = %task_id, "task updated");
    Ok(edited)
}

/// Delete a task. Deleting a main task also deletes all of its subtasks
/// as a single operation; deleting a subtask removes only that record.
/// Returns the number of records removed.
pub fn delete_task(tasks: &mut Vec<WorkTask>, task_id: &str) -> Result<usize> {
    if !tasks.iter().any(|t| t.id == task_id) {
        return Err(CadenceError::TaskNotFound(task_id.to_string()));
    }

    let before = tasks.len();
    tasks.retain(|t| t.id != task_id && t.parent_id.as_deref() != Some(task_id));
    let removed = before - tasks.len();
    debug!(id = %task_id, removed, "task deleted");
    Ok(removed)
}

/// Share of tasks (main and sub alike) that are Done, as a whole
/// percentage.
pub fn queue_completion_pct(tasks: &[WorkTask]) -> u32 {
    if tasks.is_empty() {
        return 0;
    }
    let done = tasks.iter().filter(|t| t.status == TaskStatus::Done).count();
    (done as f64 / tasks.len() as f64 * 100.0).round() as u32
}

/// Filter criteria for task listings. An empty filter matches everything.
#[derive(Default)]
pub struct TaskFilter {
    pub id_contains: Option<String>,
    pub assignee: Option<String>,
    pub status: Option<TaskStatus>,
}

impl TaskFilter {
    pub fn is_empty(&self) -> bool {
        self.id_contains.is_none() && self.assignee.is_none() && self.status.is_none()
    }

    pub fn matches(&self, task: &WorkTask) -> bool {
        if let Some(fragment) = &self.id_contains
            && !task.id.to_lowercase().contains(&fragment.to_lowercase())
        {
            return false;
        }
        if let Some(assignee) = &self.assignee
            && &task.assigned_to != assignee
        {
            return false;
        }
        if let Some(status) = self.status
            && task.status != status
        {
            return false;
        }
        true
    }
}

/// Tasks matching `filter`. With an empty filter the result is in
/// hierarchical order: each main task followed by its subtasks. A
/// non-empty filter returns a flat match list in collection order.
pub fn select_tasks<'a>(tasks: &'a [WorkTask], filter: &TaskFilter) -> Vec<&'a WorkTask> {
    if !filter.is_empty() {
        return tasks.iter().filter(|t| filter.matches(t)).collect();
    }

    let mut result = Vec::with_capacity(tasks.len());
    for main in tasks.iter().filter(|t| t.is_main()) {
        result.push(main);
        result.extend(children_of(tasks, &main.id));
    }
    result
}
