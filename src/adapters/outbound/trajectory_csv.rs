use crate::common::{ExportError, ExportResult};
use crate::domains::trajectory::{AgentId, Timestep, TrajectorySet};
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Serialize)]
struct ExportRow<'a> {
    agent: AgentId,
    timestep: Timestep,
    position: Option<String>,
    action: Option<&'a str>,
}

/// Persist a trajectory set as a semicolon-delimited table readable by
/// [`crate::adapters::inbound::TrajectoryCsvImporter`].
pub fn export_trajectories<P: AsRef<Path>>(set: &TrajectorySet, path: P) -> ExportResult<()> {
    let path = path.as_ref();
    let write_error = |source: csv::Error| ExportError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ExportError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(path)
        .map_err(write_error)?;

    for trajectory in set.iter() {
        for waypoint in &trajectory.waypoints {
            writer
                .serialize(ExportRow {
                    agent: trajectory.agent_id,
                    timestep: waypoint.timestep,
                    position: waypoint.position.map(|p| p.to_string()),
                    action: waypoint.action.as_deref(),
                })
                .map_err(write_error)?;
        }
    }
    writer.flush().map_err(|e| write_error(e.into()))?;
    Ok(())
}
