//! Leave planning: toggling single leave days and detecting dates where
//! more than one team member is absent.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::calendar::parse_date;
use crate::error::{CadenceError, Result};
use crate::types::TeamMember;

#[derive(Debug, Clone, Serialize)]
pub struct LeaveEntry {
    pub member_id: String,
    pub member_name: String,
    pub date: String,
    /// Set when at least one other member is also on leave on this date.
    pub has_conflict: bool,
}

/// Every (member, date) leave pair in the month, ordered by date then
/// member name. Dates with two or more absentees are flagged on all of
/// their entries.
pub fn detect_leave_conflicts(team: &[TeamMember], month_key: &str) -> Vec<LeaveEntry> {
    let mut pairs: Vec<(&TeamMember, &String)> = Vec::new();
    for member in team {
        for date in member.leave_dates.iter().filter(|d| d.starts_with(month_key)) {
            pairs.push((member, date));
        }
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for (_, date) in &pairs {
        *counts.entry(date.as_str()).or_default() += 1;
    }

    let mut entries: Vec<LeaveEntry> = pairs
        .into_iter()
        .map(|(member, date)| LeaveEntry {
            member_id: member.id.clone(),
            member_name: member.name.clone(),
            date: date.clone(),
            has_conflict: counts[date.as_str()] > 1,
        })
        .collect();

    entries.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.member_name.cmp(&b.member_name)));
    entries
}

/// Add or remove a single leave day on a member. Returns `true` when the
/// member is on leave on `date` after the call. Leave dates are kept
/// sorted so the workspace file stays diff-stable.
pub fn toggle_leave(team: &mut [TeamMember], member_id: &str, date: &str) -> Result<bool> {
    parse_date(date)?;

    let member = team
        .iter_mut()
        .find(|m| m.id == member_id)
        .ok_or_else(|| CadenceError::MemberNotFound(member_id.to_string()))?;

    let on_leave = if let Some(pos) = member.leave_dates.iter().position(|d| d == date) {
        member.leave_dates.remove(pos);
        false
    } else {
        member.leave_dates.push(date.to_string());
        member.leave_dates.sort();
        true
    };

    debug!(member = %member_id, date, on_leave, "leave toggled");
    Ok(on_leave)
}
