use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::calendar::{MonthWindow, parse_month_key};
use crate::error::Result;
use crate::leave::{detect_leave_conflicts, toggle_leave};
use crate::store::Workspace;

/// Onboard a new team member and print their id
pub fn cmd_member_add(
    name: &str,
    role: &str,
    email: &str,
    skills: Vec<String>,
    weekly_hours: f64,
    output_json: bool,
) -> Result<()> {
    let mut workspace = Workspace::load()?;
    let member = workspace.add_member(name, role, email, skills, weekly_hours)?;
    workspace.save()?;

    CommandOutput::new(json!({
        "id": member.id,
        "action": "member_added",
        "name": member.name,
        "role": member.role,
        "weekly_hours": member.weekly_hours,
    }))
    .with_text(member.id.clone())
    .print(output_json)
}

/// List team members with contract hours and planned leave counts
pub fn cmd_member_ls(output_json: bool) -> Result<()> {
    let workspace = Workspace::load()?;

    if output_json {
        return CommandOutput::new(json!({ "members": workspace.team })).print(true);
    }

    for member in &workspace.team {
        let role = if member.role.is_empty() {
            String::new()
        } else {
            format!(" ({})", member.role)
        };
        println!(
            "{} {}{} - {}h/week, {} leave day(s) planned",
            format!("{:8}", member.id).cyan(),
            member.name,
            role.dimmed(),
            member.weekly_hours,
            member.leave_dates.len()
        );
    }
    Ok(())
}

/// Remove a member from the roster
pub fn cmd_member_rm(id: &str, output_json: bool) -> Result<()> {
    let mut workspace = Workspace::load()?;
    let member = workspace.remove_member(id)?;
    workspace.save()?;

    CommandOutput::new(json!({
        "id": member.id,
        "action": "member_removed",
        "name": member.name,
    }))
    .with_text(format!("Removed {} ({})", member.id, member.name))
    .print(output_json)
}

/// Toggle a single leave day for a member
pub fn cmd_leave_toggle(member_id: &str, date: &str, output_json: bool) -> Result<()> {
    let mut workspace = Workspace::load()?;
    let on_leave = toggle_leave(&mut workspace.team, member_id, date)?;
    workspace.save()?;

    let text = if on_leave {
        format!("{member_id} is now on leave on {date}")
    } else {
        format!("Leave on {date} removed for {member_id}")
    };
    CommandOutput::new(json!({
        "member_id": member_id,
        "action": "leave_toggled",
        "date": date,
        "on_leave": on_leave,
    }))
    .with_text(text)
    .print(output_json)
}

/// List the month's leave entries, flagging dates with multiple absentees
pub fn cmd_conflicts(month: Option<&str>, output_json: bool) -> Result<()> {
    let workspace = Workspace::load()?;
    let window = match month {
        Some(key) => {
            let first = parse_month_key(key)?;
            MonthWindow::containing(first, jiff::Zoned::now().date())
        }
        None => MonthWindow::current(),
    };

    let entries = detect_leave_conflicts(&workspace.team, &window.month_key);

    if output_json {
        return CommandOutput::new(json!({
            "month_key": window.month_key,
            "entries": entries,
        }))
        .print(true);
    }

    if entries.is_empty() {
        println!("No leave planned for {} {}", window.month_name(), window.year);
        return Ok(());
    }

    for entry in &entries {
        let line = format!("{}  {}", entry.date, entry.member_name);
        if entry.has_conflict {
            println!("{} {}", line.red(), "(overlap)".red().bold());
        } else {
            println!("{line}");
        }
    }
    Ok(())
}
