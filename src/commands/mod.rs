mod dashboard;
mod init;
mod member;
mod task;

pub use dashboard::cmd_dashboard;
pub use init::cmd_init;
pub use member::{cmd_conflicts, cmd_leave_toggle, cmd_member_add, cmd_member_ls, cmd_member_rm};
pub use task::{
    CreateTaskOptions, cmd_task_create, cmd_task_edit, cmd_task_ls, cmd_task_rm, cmd_task_status,
};

use owo_colors::OwoColorize;
use serde_json::Value;

use crate::error::Result;
use crate::types::{TaskStatus, WorkTask};

/// Structured command result: a JSON payload plus an optional plain-text
/// rendering. Commands build one of these and `print` picks the format.
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        CommandOutput { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn print(self, output_json: bool) -> Result<()> {
        if output_json {
            println!("{}", serde_json::to_string_pretty(&self.json)?);
        } else if let Some(text) = self.text {
            println!("{text}");
        }
        Ok(())
    }
}

/// Color a status tag for terminal display
pub fn format_status(status: TaskStatus) -> String {
    let tag = format!("[{status}]");
    match status {
        TaskStatus::Todo => tag.yellow().to_string(),
        TaskStatus::InProgress => tag.blue().to_string(),
        TaskStatus::Done => tag.green().to_string(),
        TaskStatus::Cancelled => tag.dimmed().to_string(),
    }
}

/// Format a task for single-line display. Subtasks are indented under
/// their parent; parents with children show the rollup marker.
pub fn format_task_line(task: &WorkTask, subtask_count: usize, effective_effort: f64) -> String {
    let indent = if task.is_main() { "" } else { "  " };
    let id = format!("{:24}", task.id).cyan().to_string();

    let effort = if task.is_main() && subtask_count > 0 {
        format!("Σ{effective_effort}h")
    } else {
        format!("{}h", task.effort_hours)
    };

    let suffix = if subtask_count > 0 {
        format!(" ({subtask_count} subtasks)")
    } else {
        String::new()
    };

    format!(
        "{indent}{id} {} {} - {}{suffix}",
        format_status(task.status),
        effort,
        task.title
    )
}
