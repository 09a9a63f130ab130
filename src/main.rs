use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::process::ExitCode;

use cadence::commands::{
    CreateTaskOptions, cmd_conflicts, cmd_dashboard, cmd_init, cmd_leave_toggle, cmd_member_add,
    cmd_member_ls, cmd_member_rm, cmd_task_create, cmd_task_edit, cmd_task_ls, cmd_task_rm,
    cmd_task_status,
};
use cadence::hierarchy::{TaskFilter, TaskUpdate};
use cadence::types::{
    Recurrence, TaskCategory, TaskStatus, VALID_CATEGORIES, VALID_RECURRENCES, VALID_STATUSES,
};

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Plain-text team capacity planning")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Emit JSON instead of text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a workspace in the current directory
    Init,

    /// Monthly availability and capacity overview
    #[command(visible_alias = "d")]
    Dashboard {
        /// Month to report on (YYYY-MM, default: current)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Manage tasks
    #[command(subcommand, visible_alias = "t")]
    Task(TaskCommands),

    /// Manage team members
    #[command(subcommand, visible_alias = "m")]
    Member(MemberCommands),

    /// Toggle a leave day for a member
    Leave {
        /// Member id
        member: String,

        /// Calendar date (YYYY-MM-DD)
        date: String,
    },

    /// Show leave entries for a month, flagging overlapping absences
    Conflicts {
        /// Month to scan (YYYY-MM, default: current)
        #[arg(short, long)]
        month: Option<String>,
    },
}

#[derive(Subcommand)]
enum TaskCommands {
    /// Create a new task (or subtask, with --parent)
    #[command(visible_alias = "c")]
    Create {
        /// Task title
        title: String,

        /// Category: ctb, rtb, ssp, bau, other (ignored for subtasks)
        #[arg(short, long, default_value = "other", value_parser = parse_category)]
        category: TaskCategory,

        /// Assignee member id
        #[arg(short, long)]
        assignee: String,

        /// Effort in hours
        #[arg(short, long, default_value_t = 4.0)]
        effort: f64,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: String,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        end: String,

        /// Recurrence: none, daily, weekly, monthly
        #[arg(short, long, default_value = "none", value_parser = parse_recurrence)]
        recurrence: Recurrence,

        /// Parent task id (makes this a subtask)
        #[arg(short, long)]
        parent: Option<String>,
    },

    /// Change a task's status
    Status {
        /// Task id
        id: String,

        /// New status: todo, in-progress, done, cancelled
        #[arg(value_parser = parse_status)]
        status: TaskStatus,
    },

    /// Edit task fields
    Edit {
        /// Task id
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(short, long)]
        assignee: Option<String>,

        #[arg(short, long)]
        effort: Option<f64>,

        #[arg(long)]
        start: Option<String>,

        #[arg(long)]
        end: Option<String>,

        #[arg(short, long, value_parser = parse_recurrence)]
        recurrence: Option<Recurrence>,
    },

    /// List tasks
    Ls {
        /// Filter by id fragment (case-insensitive)
        #[arg(long)]
        id: Option<String>,

        /// Filter by assignee member id
        #[arg(short, long)]
        assignee: Option<String>,

        /// Filter by status
        #[arg(short, long, value_parser = parse_status)]
        status: Option<TaskStatus>,
    },

    /// Delete a task (a main task takes its subtasks with it)
    Rm {
        /// Task id
        id: String,
    },
}

#[derive(Subcommand)]
enum MemberCommands {
    /// Onboard a team member
    Add {
        /// Member name
        name: String,

        /// Role description
        #[arg(short, long, default_value = "")]
        role: String,

        /// Email address
        #[arg(short, long, default_value = "")]
        email: String,

        /// Comma-separated skills
        #[arg(short, long, default_value = "")]
        skills: String,

        /// Contracted hours per week
        #[arg(long, default_value_t = 40.0, allow_negative_numbers = true)]
        hours: f64,
    },

    /// List team members
    Ls,

    /// Remove a team member
    Rm {
        /// Member id
        id: String,
    },
}

fn parse_status(s: &str) -> Result<TaskStatus, String> {
    s.parse()
        .map_err(|_| format!("must be one of: {}", VALID_STATUSES.join(", ")))
}

fn parse_category(s: &str) -> Result<TaskCategory, String> {
    s.parse()
        .map_err(|_| format!("must be one of: {}", VALID_CATEGORIES.join(", ")))
}

fn parse_recurrence(s: &str) -> Result<Recurrence, String> {
    s.parse()
        .map_err(|_| format!("must be one of: {}", VALID_RECURRENCES.join(", ")))
}

fn split_skills(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let json = cli.json;

    let result = match cli.command {
        Commands::Init => cmd_init(json),
        Commands::Dashboard { month } => cmd_dashboard(month.as_deref(), json),
        Commands::Task(command) => match command {
            TaskCommands::Create {
                title,
                category,
                assignee,
                effort,
                start,
                end,
                recurrence,
                parent,
            } => cmd_task_create(
                CreateTaskOptions {
                    title,
                    category,
                    assignee,
                    effort_hours: effort,
                    start_date: start,
                    end_date: end,
                    recurrence,
                    parent,
                },
                json,
            ),
            TaskCommands::Status { id, status } => cmd_task_status(&id, status, json),
            TaskCommands::Edit {
                id,
                title,
                assignee,
                effort,
                start,
                end,
                recurrence,
            } => cmd_task_edit(
                &id,
                TaskUpdate {
                    title,
                    assigned_to: assignee,
                    effort_hours: effort,
                    start_date: start,
                    end_date: end,
                    recurrence,
                },
                json,
            ),
            TaskCommands::Ls {
                id,
                assignee,
                status,
            } => cmd_task_ls(
                TaskFilter {
                    id_contains: id,
                    assignee,
                    status,
                },
                json,
            ),
            TaskCommands::Rm { id } => cmd_task_rm(&id, json),
        },
        Commands::Member(command) => match command {
            MemberCommands::Add {
                name,
                role,
                email,
                skills,
                hours,
            } => cmd_member_add(&name, &role, &email, split_skills(&skills), hours, json),
            MemberCommands::Ls => cmd_member_ls(json),
            MemberCommands::Rm { id } => cmd_member_rm(&id, json),
        },
        Commands::Leave { member, date } => cmd_leave_toggle(&member, &date, json),
        Commands::Conflicts { month } => cmd_conflicts(month.as_deref(), json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
