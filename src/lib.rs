pub mod calendar;
pub mod capacity;
pub mod commands;
pub mod error;
pub mod hierarchy;
pub mod leave;
pub mod store;
pub mod types;

pub use calendar::{DayInfo, MonthWindow, parse_date, parse_month_key};
pub use capacity::{
    MemberMetrics, WorkspaceAggregate, active_effort_hours, aggregate_metrics, member_metrics,
    team_metrics, workspace_aggregate,
};
pub use error::{CadenceError, Result};
pub use hierarchy::{
    NewTask, TaskFilter, TaskUpdate, create_task, delete_task, effective_effort,
    generate_task_id, is_blocked_from_closing, update_task, update_task_status,
};
pub use leave::{LeaveEntry, detect_leave_conflicts, toggle_leave};
pub use store::Workspace;
pub use types::{
    Recurrence, STORE_DIR, TaskCategory, TaskStatus, TeamMember, VALID_CATEGORIES,
    VALID_RECURRENCES, VALID_STATUSES, WorkTask,
};
