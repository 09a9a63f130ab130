use owo_colors::OwoColorize;
use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::CommandOutput;
use crate::calendar::{MonthWindow, parse_month_key};
use crate::capacity::{MemberMetrics, aggregate_metrics, team_metrics};
use crate::error::Result;
use crate::hierarchy::queue_completion_pct;
use crate::store::Workspace;

#[derive(Tabled)]
struct MemberRow {
    #[tabled(rename = "Member")]
    name: String,
    #[tabled(rename = "Leave")]
    leave: usize,
    #[tabled(rename = "Net days")]
    net_days: usize,
    #[tabled(rename = "Capacity (h)")]
    capacity: String,
    #[tabled(rename = "Effort (h)")]
    effort: String,
    #[tabled(rename = "Avail %")]
    availability: String,
}

impl MemberRow {
    fn from_metrics(m: &MemberMetrics) -> MemberRow {
        let availability = if m.is_overloaded {
            format!("{}% !", m.availability_pct)
        } else {
            format!("{}%", m.availability_pct)
        };
        MemberRow {
            name: m.member_name.clone(),
            leave: m.leave_days_in_month,
            net_days: m.net_working_days,
            capacity: format!("{:.1}", m.total_capacity_hours),
            effort: format!("{:.1}", m.active_effort_hours),
            availability,
        }
    }
}

/// Show per-member availability and the workspace capacity summary for a
/// month (defaults to the current one)
pub fn cmd_dashboard(month: Option<&str>, output_json: bool) -> Result<()> {
    let workspace = Workspace::load()?;
    let window = match month {
        Some(key) => {
            let first = parse_month_key(key)?;
            MonthWindow::containing(first, jiff::Zoned::now().date())
        }
        None => MonthWindow::current(),
    };

    let metrics = team_metrics(&workspace.team, &workspace.tasks, &window);
    let aggregate = aggregate_metrics(&metrics, &window);
    let completion = queue_completion_pct(&workspace.tasks);

    if output_json {
        return CommandOutput::new(json!({
            "month_key": window.month_key,
            "working_days": window.working_day_count(),
            "members": metrics,
            "aggregate": aggregate,
            "queue_completion_pct": completion,
        }))
        .print(true);
    }

    println!(
        "{} {} - {} working days\n",
        window.month_name().bold(),
        window.year,
        window.working_day_count()
    );

    if metrics.is_empty() {
        println!("No team members yet. Add one with `cadence member add`.");
        return Ok(());
    }

    let rows: Vec<MemberRow> = metrics.iter().map(MemberRow::from_metrics).collect();
    println!("{}", Table::new(rows).with(Style::sharp()));

    for m in &metrics {
        if m.is_overloaded {
            println!(
                "{} {} is overloaded ({:.1}h committed vs {:.1}h capacity)",
                "!".red().bold(),
                m.member_name,
                m.active_effort_hours,
                m.total_capacity_hours
            );
        }
    }

    println!(
        "\nPotential member-days: {}  Net deliverable: {}  Utilization: {}%",
        aggregate.total_working_member_days,
        aggregate.net_available_days,
        aggregate.capacity_percentage
    );
    println!(
        "Average availability: {}%  Queue completion: {}%",
        aggregate.avg_availability, completion
    );
    Ok(())
}
