//! Capacity and availability math: per-member monthly metrics and the
//! workspace-wide reduction.
//!
//! Everything here is pure over an immutable snapshot of (team, tasks,
//! window) and recomputed on demand; nothing is cached. Bad data (leave
//! exceeding working days, effort exceeding capacity) is absorbed by
//! clamping, never raised as an error.

use serde::Serialize;

use crate::calendar::MonthWindow;
use crate::hierarchy::effective_effort;
use crate::types::{TeamMember, WorkTask};

/// Capacity is always normalized over a 5-day work week, independent of
/// the calendar's actual working-day count.
pub const DAYS_PER_WEEK: f64 = 5.0;

/// Per-member, per-month derived metrics. Never stored.
#[derive(Debug, Clone, Serialize)]
pub struct MemberMetrics {
    pub member_id: String,
    pub member_name: String,
    /// Leave days that fall on working days of the window's month.
    pub leave_days_in_month: usize,
    pub net_working_days: usize,
    pub total_capacity_hours: f64,
    pub active_effort_hours: f64,
    pub remaining_hours: f64,
    /// 0-100; 0 when capacity is zero.
    pub availability_pct: u32,
    /// Unclamped overload signal: committed effort exceeds capacity.
    pub is_overloaded: bool,
}

/// Workspace-wide reduction over all member metrics. Never stored.
#[derive(Debug, Clone, Serialize)]
pub struct WorkspaceAggregate {
    pub total_working_member_days: usize,
    pub net_available_days: usize,
    pub capacity_percentage: u32,
    pub avg_availability: u32,
}

/// Active (non-closed) effort committed to `member_id` in the window.
///
/// Overlap is a month-key prefix match on either endpoint: a task counts
/// when its start or end date falls inside the month. A task spanning the
/// whole month with both endpoints outside it is NOT counted. That gap is
/// a known limitation of the planner this replaces, preserved here for
/// compatibility.
pub fn active_effort_hours(tasks: &[WorkTask], member_id: &str, window: &MonthWindow) -> f64 {
    tasks
        .iter()
        .filter(|t| {
            t.assigned_to == member_id
                && !t.status.is_terminal()
                && (t.start_date.starts_with(&window.month_key)
                    || t.end_date.starts_with(&window.month_key))
        })
        .map(|t| effective_effort(t, tasks))
        .sum()
}

/// Compute one member's metrics for the window.
pub fn member_metrics(
    member: &TeamMember,
    tasks: &[WorkTask],
    window: &MonthWindow,
) -> MemberMetrics {
    // Leave on a weekend does not consume capacity.
    let leave_days_in_month = member
        .leave_dates
        .iter()
        .filter(|d| {
            d.starts_with(&window.month_key) && window.working_days.iter().any(|w| w == *d)
        })
        .count();

    let net_working_days = window.working_day_count().saturating_sub(leave_days_in_month);
    let hours_per_day = member.weekly_hours / DAYS_PER_WEEK;
    let total_capacity_hours = net_working_days as f64 * hours_per_day;

    let active_effort_hours = active_effort_hours(tasks, &member.id, window);
    let remaining_hours = (total_capacity_hours - active_effort_hours).max(0.0);

    MemberMetrics {
        member_id: member.id.clone(),
        member_name: member.name.clone(),
        leave_days_in_month,
        net_working_days,
        total_capacity_hours,
        active_effort_hours,
        remaining_hours,
        availability_pct: percentage(remaining_hours, total_capacity_hours),
        is_overloaded: active_effort_hours > total_capacity_hours,
    }
}

/// Metrics for every member of the team, in team order.
pub fn team_metrics(
    team: &[TeamMember],
    tasks: &[WorkTask],
    window: &MonthWindow,
) -> Vec<MemberMetrics> {
    team.iter().map(|m| member_metrics(m, tasks, window)).collect()
}

/// Reduce precomputed member metrics into the workspace aggregate.
pub fn aggregate_metrics(metrics: &[MemberMetrics], window: &MonthWindow) -> WorkspaceAggregate {
    let total_working_member_days = metrics.len() * window.working_day_count();
    let net_available_days: usize = metrics.iter().map(|m| m.net_working_days).sum();

    let avg_availability = if metrics.is_empty() {
        0
    } else {
        let sum: f64 = metrics.iter().map(|m| f64::from(m.availability_pct)).sum();
        (sum / metrics.len() as f64).round() as u32
    };

    WorkspaceAggregate {
        total_working_member_days,
        net_available_days,
        capacity_percentage: percentage(net_available_days as f64, total_working_member_days as f64),
        avg_availability,
    }
}

/// Compute the workspace aggregate from scratch.
pub fn workspace_aggregate(
    team: &[TeamMember],
    tasks: &[WorkTask],
    window: &MonthWindow,
) -> WorkspaceAggregate {
    aggregate_metrics(&team_metrics(team, tasks, window), window)
}

// Round-half-up; inputs are non-negative so f64::round behaves as such.
fn percentage(part: f64, whole: f64) -> u32 {
    if whole > 0.0 {
        (part / whole * 100.0).round() as u32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Recurrence, TaskCategory, TaskStatus};
    use jiff::civil::date;

    fn member(id: &str, weekly_hours: f64, leave: &[&str]) -> TeamMember {
        TeamMember {
            id: id.to_string(),
            name: format!("member {id}"),
            weekly_hours,
            leave_dates: leave.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn task(id: &str, assignee: &str, effort: f64, start: &str, end: &str) -> WorkTask {
        WorkTask {
            id: id.to_string(),
            parent_id: None,
            title: format!("task {id}"),
            category: TaskCategory::Ctb,
            assigned_to: assignee.to_string(),
            effort_hours: effort,
            start_date: start.to_string(),
            end_date: end.to_string(),
            status: TaskStatus::Todo,
            recurrence: Recurrence::None,
        }
    }

    // Feb 2024: 21 working days.
    fn feb_window() -> MonthWindow {
        MonthWindow::containing(date(2024, 2, 1), date(2024, 2, 1))
    }

    #[test]
    fn test_capacity_with_leave_on_working_days() {
        // 2024-02-05 is a Monday, 2024-02-06 a Tuesday.
        let m = member("m-1", 40.0, &["2024-02-05", "2024-02-06"]);
        let metrics = member_metrics(&m, &[], &feb_window());

        assert_eq!(metrics.leave_days_in_month, 2);
        assert_eq!(metrics.net_working_days, 19);
        assert_eq!(metrics.total_capacity_hours, 152.0);
        assert_eq!(metrics.availability_pct, 100);
        assert!(!metrics.is_overloaded);
    }

    #[test]
    fn test_weekend_leave_consumes_no_capacity() {
        // 2024-02-10 is a Saturday.
        let m = member("m-1", 40.0, &["2024-02-10"]);
        let metrics = member_metrics(&m, &[], &feb_window());
        assert_eq!(metrics.leave_days_in_month, 0);
        assert_eq!(metrics.net_working_days, 21);
    }

    #[test]
    fn test_leave_in_other_month_ignored() {
        let m = member("m-1", 40.0, &["2024-03-04"]);
        let metrics = member_metrics(&m, &[], &feb_window());
        assert_eq!(metrics.leave_days_in_month, 0);
    }

    #[test]
    fn test_availability_with_active_task() {
        let m = member("m-1", 40.0, &["2024-02-05", "2024-02-06"]);
        let tasks = vec![task("t1", "m-1", 60.0, "2024-02-01", "2024-02-20")];
        let metrics = member_metrics(&m, &tasks, &feb_window());

        assert_eq!(metrics.active_effort_hours, 60.0);
        // round((152 - 60) / 152 * 100) = 61
        assert_eq!(metrics.availability_pct, 61);
        assert!(!metrics.is_overloaded);
    }

    #[test]
    fn test_terminal_tasks_do_not_commit_effort() {
        let m = member("m-1", 40.0, &[]);
        let mut done = task("t1", "m-1", 60.0, "2024-02-01", "2024-02-20");
        done.status = TaskStatus::Done;
        let mut cancelled = task("t2", "m-1", 30.0, "2024-02-01", "2024-02-20");
        cancelled.status = TaskStatus::Cancelled;

        let effort = active_effort_hours(&[done, cancelled], "m-1", &feb_window());
        assert_eq!(effort, 0.0);
    }

    #[test]
    fn test_mid_span_task_not_counted() {
        // Runs across February without either endpoint in it. The prefix
        // match misses it; that behavior is intentional.
        let tasks = vec![task("t1", "m-1", 40.0, "2024-01-15", "2024-03-15")];
        assert_eq!(active_effort_hours(&tasks, "m-1", &feb_window()), 0.0);
    }

    #[test]
    fn test_either_endpoint_in_month_counts() {
        let starts_in = task("t1", "m-1", 10.0, "2024-02-28", "2024-03-15");
        let ends_in = task("t2", "m-1", 5.0, "2024-01-15", "2024-02-02");
        let effort = active_effort_hours(&[starts_in, ends_in], "m-1", &feb_window());
        assert_eq!(effort, 15.0);
    }

    #[test]
    fn test_effort_uses_parent_rollup() {
        let parent = task("P", "m-1", 99.0, "2024-02-01", "2024-02-28");
        let mut child = task("P-1", "m-2", 12.0, "2024-02-01", "2024-02-28");
        child.parent_id = Some("P".to_string());

        let tasks = vec![parent, child];
        // The parent contributes its children's sum, not its stored 99.
        assert_eq!(active_effort_hours(&tasks, "m-1", &feb_window()), 12.0);
    }

    #[test]
    fn test_overload_flag() {
        let m = member("m-1", 20.0, &[]);
        // Capacity: 21 * 4 = 84 hours.
        let tasks = vec![task("t1", "m-1", 100.0, "2024-02-01", "2024-02-20")];
        let metrics = member_metrics(&m, &tasks, &feb_window());

        assert!(metrics.is_overloaded);
        assert_eq!(metrics.remaining_hours, 0.0);
        assert_eq!(metrics.availability_pct, 0);
    }

    #[test]
    fn test_zero_capacity_availability_is_zero() {
        let m = member("m-1", 0.0, &[]);
        let metrics = member_metrics(&m, &[], &feb_window());
        assert_eq!(metrics.total_capacity_hours, 0.0);
        assert_eq!(metrics.availability_pct, 0);
    }

    #[test]
    fn test_net_working_days_never_negative() {
        // More leave days than working days in the data.
        let leave: Vec<String> = feb_window().working_days.clone();
        let mut m = member("m-1", 40.0, &[]);
        m.leave_dates = leave;
        m.leave_dates.push("2024-02-05".to_string()); // duplicate entry in bad data

        let metrics = member_metrics(&m, &[], &feb_window());
        assert_eq!(metrics.net_working_days, 0);
        assert_eq!(metrics.total_capacity_hours, 0.0);
    }

    #[test]
    fn test_workspace_aggregate() {
        let team = vec![
            member("m-1", 40.0, &["2024-02-05"]),
            member("m-2", 40.0, &[]),
        ];
        let window = feb_window();
        let agg = workspace_aggregate(&team, &[], &window);

        assert_eq!(agg.total_working_member_days, 42);
        assert_eq!(agg.net_available_days, 41);
        // round(41 / 42 * 100) = 98
        assert_eq!(agg.capacity_percentage, 98);
        assert_eq!(agg.avg_availability, 100);
    }

    #[test]
    fn test_empty_team_aggregate() {
        let agg = workspace_aggregate(&[], &[], &feb_window());
        assert_eq!(agg.total_working_member_days, 0);
        assert_eq!(agg.capacity_percentage, 0);
        assert_eq!(agg.avg_availability, 0);
    }

    #[test]
    fn test_avg_availability_rounds_half_up() {
        let team = vec![
            member("m-1", 40.0, &["2024-02-05", "2024-02-06"]),
            member("m-2", 40.0, &[]),
        ];
        let window = feb_window();
        // m-1: 61% (60 of 152 committed), m-2: 100% -> mean 80.5 -> 81.
        let tasks = vec![task("t1", "m-1", 60.0, "2024-02-01", "2024-02-20")];
        let agg = workspace_aggregate(&team, &tasks, &window);
        assert_eq!(agg.avg_availability, 81);
    }
}
