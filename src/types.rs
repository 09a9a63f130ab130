use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CadenceError;

pub const STORE_DIR: &str = ".cadence";
pub const WORKSPACE_FILE: &str = "workspace.yaml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
    Cancelled,
}

impl TaskStatus {
    /// Done and Cancelled are the two closed (terminal) statuses.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Done | TaskStatus::Cancelled)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Todo => write!(f, "todo"),
            TaskStatus::InProgress => write!(f, "in-progress"),
            TaskStatus::Done => write!(f, "done"),
            TaskStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = CadenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "todo" => Ok(TaskStatus::Todo),
            "in-progress" | "in_progress" | "doing" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            "cancelled" => Ok(TaskStatus::Cancelled),
            _ => Err(CadenceError::InvalidStatus(s.to_string())),
        }
    }
}

pub const VALID_STATUSES: &[&str] = &["todo", "in-progress", "done", "cancelled"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TaskCategory {
    #[serde(rename = "CTB")]
    Ctb,
    #[serde(rename = "RTB")]
    Rtb,
    #[serde(rename = "SSP")]
    Ssp,
    #[serde(rename = "BAU")]
    Bau,
    #[default]
    #[serde(rename = "Other")]
    Other,
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskCategory::Ctb => write!(f, "CTB"),
            TaskCategory::Rtb => write!(f, "RTB"),
            TaskCategory::Ssp => write!(f, "SSP"),
            TaskCategory::Bau => write!(f, "BAU"),
            TaskCategory::Other => write!(f, "Other"),
        }
    }
}

impl FromStr for TaskCategory {
    type Err = CadenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ctb" => Ok(TaskCategory::Ctb),
            "rtb" => Ok(TaskCategory::Rtb),
            "ssp" => Ok(TaskCategory::Ssp),
            "bau" => Ok(TaskCategory::Bau),
            "other" => Ok(TaskCategory::Other),
            _ => Err(CadenceError::InvalidCategory(s.to_string())),
        }
    }
}

pub const VALID_CATEGORIES: &[&str] = &["ctb", "rtb", "ssp", "bau", "other"];

/// Stored on tasks for planning context; never expanded into task instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recurrence::None => write!(f, "none"),
            Recurrence::Daily => write!(f, "daily"),
            Recurrence::Weekly => write!(f, "weekly"),
            Recurrence::Monthly => write!(f, "monthly"),
        }
    }
}

impl FromStr for Recurrence {
    type Err = CadenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Recurrence::None),
            "daily" => Ok(Recurrence::Daily),
            "weekly" => Ok(Recurrence::Weekly),
            "monthly" => Ok(Recurrence::Monthly),
            _ => Err(CadenceError::InvalidRecurrence(s.to_string())),
        }
    }
}

pub const VALID_RECURRENCES: &[&str] = &["none", "daily", "weekly", "monthly"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: String,
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub role: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,

    /// Contracted hours per week. Capacity math spreads this over a
    /// 5-day week regardless of calendar length.
    pub weekly_hours: f64,

    /// Single ISO calendar days (YYYY-MM-DD), unique, kept sorted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leave_dates: Vec<String>,
}

impl TeamMember {
    pub fn on_leave(&self, date: &str) -> bool {
        self.leave_dates.iter().any(|d| d == date)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkTask {
    pub id: String,

    /// Reference to the parent task. `None` marks a main task; tasks with
    /// a parent are subtasks and may not have children of their own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    pub title: String,
    pub category: TaskCategory,
    pub assigned_to: String,
    pub effort_hours: f64,
    pub start_date: String,
    pub end_date: String,
    pub status: TaskStatus,

    #[serde(default)]
    pub recurrence: Recurrence,
}

impl WorkTask {
    pub fn is_main(&self) -> bool {
        self.parent_id.is_none()
    }

    /// The effort value as stored on this record. For a parent with
    /// subtasks the committed value is derived instead; see
    /// [`crate::hierarchy::effective_effort`].
    pub fn stored_effort(&self) -> f64 {
        self.effort_hours
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for s in VALID_STATUSES {
            let status: TaskStatus = s.parse().unwrap();
            assert_eq!(&status.to_string(), s);
        }
    }

    #[test]
    fn test_status_terminal() {
        assert!(TaskStatus::Done.is_terminal());
        assert!(TaskStatus::Cancelled.is_terminal());
        assert!(!TaskStatus::Todo.is_terminal());
        assert!(!TaskStatus::InProgress.is_terminal());
    }

    #[test]
    fn test_invalid_status_rejected() {
        let result = "finished".parse::<TaskStatus>();
        assert!(matches!(
            result,
            Err(crate::error::CadenceError::InvalidStatus(_))
        ));
    }

    #[test]
    fn test_category_parse_is_case_insensitive() {
        assert_eq!("CTB".parse::<TaskCategory>().unwrap(), TaskCategory::Ctb);
        assert_eq!("bau".parse::<TaskCategory>().unwrap(), TaskCategory::Bau);
    }

    #[test]
    fn test_category_serializes_uppercase() {
        let yaml = serde_yaml_ng::to_string(&TaskCategory::Ssp).unwrap();
        assert_eq!(yaml.trim(), "SSP");
    }
}
