//! Workspace persistence: the whole planning state lives in a single YAML
//! file under `.cadence/`, loaded and saved whole. The CLI applies one
//! mutation per invocation, which is the single-writer serialization
//! point the computation core assumes.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use jiff::civil::Date;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{CadenceError, Result};
use crate::hierarchy::{self, NewTask, TaskUpdate};
use crate::types::{STORE_DIR, TeamMember, WORKSPACE_FILE, WorkTask};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Workspace {
    #[serde(default)]
    pub team: Vec<TeamMember>,

    #[serde(default)]
    pub tasks: Vec<WorkTask>,
}

pub fn workspace_path() -> PathBuf {
    PathBuf::from(STORE_DIR).join(WORKSPACE_FILE)
}

/// Ensure the store directory exists
pub fn ensure_dir() -> io::Result<()> {
    fs::create_dir_all(STORE_DIR)
}

impl Workspace {
    /// Create the store directory and an empty workspace file if missing,
    /// then return the current workspace.
    pub fn init() -> Result<Workspace> {
        ensure_dir()?;
        let path = workspace_path();
        if !path.exists() {
            let workspace = Workspace::default();
            workspace.save_to(&path)?;
            return Ok(workspace);
        }
        Self::load_from(&path)
    }

    pub fn load() -> Result<Workspace> {
        Self::load_from(&workspace_path())
    }

    pub fn load_from(path: &Path) -> Result<Workspace> {
        if !path.exists() {
            return Err(CadenceError::NotInitialized);
        }
        let content = fs::read_to_string(path)?;
        let workspace: Workspace = serde_yaml_ng::from_str(&content)?;
        debug!(
            team = workspace.team.len(),
            tasks = workspace.tasks.len(),
            "workspace loaded"
        );
        Ok(workspace)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&workspace_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, serde_yaml_ng::to_string(self)?)?;
        debug!(path = %path.display(), "workspace saved");
        Ok(())
    }

    pub fn member(&self, id: &str) -> Result<&TeamMember> {
        self.team
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| CadenceError::MemberNotFound(id.to_string()))
    }

    pub fn task(&self, id: &str) -> Result<&WorkTask> {
        self.tasks
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| CadenceError::TaskNotFound(id.to_string()))
    }

    /// Onboard a member with a freshly generated id.
    pub fn add_member(
        &mut self,
        name: &str,
        role: &str,
        email: &str,
        skills: Vec<String>,
        weekly_hours: f64,
    ) -> Result<TeamMember> {
        if name.trim().is_empty() {
            return Err(CadenceError::Validation("name must not be empty".into()));
        }
        if weekly_hours < 0.0 {
            return Err(CadenceError::Validation(format!(
                "weekly hours must be non-negative (got {weekly_hours})"
            )));
        }

        let member = TeamMember {
            id: self.fresh_member_id(),
            name: name.to_string(),
            role: role.to_string(),
            email: email.to_string(),
            skills,
            weekly_hours,
            leave_dates: Vec::new(),
        };
        debug!(id = %member.id, "member added");
        self.team.push(member.clone());
        Ok(member)
    }

    /// Remove a member. Tasks assigned to them are left in place; a
    /// dangling assignee is a data-quality issue the metrics absorb.
    pub fn remove_member(&mut self, id: &str) -> Result<TeamMember> {
        let pos = self
            .team
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| CadenceError::MemberNotFound(id.to_string()))?;
        debug!(id, "member removed");
        Ok(self.team.remove(pos))
    }

    /// Create a task after checking the assignee exists. Structured input
    /// from outside (including machine-proposed records) goes through the
    /// same validation as manual entry.
    pub fn add_task(
        &mut self,
        input: NewTask,
        parent_id: Option<&str>,
        today: Date,
    ) -> Result<WorkTask> {
        if !self.team.iter().any(|m| m.id == input.assigned_to) {
            return Err(CadenceError::MemberNotFound(input.assigned_to.clone()));
        }
        hierarchy::create_task(&mut self.tasks, input, parent_id, today)
    }

    /// Edit a task's fields. A reassignment is checked against the team
    /// the same way creation is.
    pub fn edit_task(&mut self, id: &str, update: TaskUpdate) -> Result<WorkTask> {
        if let Some(assignee) = &update.assigned_to
            && !self.team.iter().any(|m| m.id == *assignee)
        {
            return Err(CadenceError::MemberNotFound(assignee.clone()));
        }
        hierarchy::update_task(&mut self.tasks, id, update)
    }

    fn fresh_member_id(&self) -> String {
        loop {
            let id = generate_member_id();
            if !self.team.iter().any(|m| m.id == id) {
                return id;
            }
        }
    }
}

/// Generate a short member id: "m-" plus the first four hex chars of a
/// random hash.
pub fn generate_member_id() -> String {
    let random_bytes: [u8; 16] = rand::rng().random();
    let mut hasher = Sha256::new();
    hasher.update(random_bytes);
    let hash = format!("{:x}", hasher.finalize());
    format!("m-{}", &hash[..4])
}
