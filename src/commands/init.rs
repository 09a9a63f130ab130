use serde_json::json;

use super::CommandOutput;
use crate::error::Result;
use crate::store::{Workspace, workspace_path};

/// Create the `.cadence` store in the current directory
pub fn cmd_init(output_json: bool) -> Result<()> {
    let workspace = Workspace::init()?;
    let path = workspace_path();

    CommandOutput::new(json!({
        "action": "init",
        "path": path.to_string_lossy(),
        "members": workspace.team.len(),
        "tasks": workspace.tasks.len(),
    }))
    .with_text(format!("Initialized workspace at {}", path.display()))
    .print(output_json)
}
