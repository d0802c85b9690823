use super::grid::GridDescriptor;
use super::renderer::{GridRenderer, RenderedArtifact};
use crate::common::RenderResult;
use crate::domains::trajectory::TrajectorySet;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// How an artifact is named inside the session's output tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactName {
    /// 1-based index of the answer set the trajectories came from.
    Answer(usize),
    /// Render timestamp plus the session counter.
    Sequential,
}

/// Owns the output location and naming counter for a series of renders.
///
/// Names combine the ISO minute of the render, a per-session counter and a
/// random session id, so two sessions writing into the same directory never
/// pick the same file.
#[derive(Debug)]
pub struct RenderSession {
    output_dir: PathBuf,
    session_id: String,
    started: DateTime<Local>,
    counter: u64,
}

impl RenderSession {
    pub fn new<P: Into<PathBuf>>(output_dir: P) -> Self {
        let session_id = Uuid::new_v4().simple().to_string()[..8].to_string();
        Self {
            output_dir: output_dir.into(),
            session_id,
            started: Local::now(),
            counter: 0,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn counter(&self) -> u64 {
        self.counter
    }

    pub fn reset_counter(&mut self) {
        self.counter = 0;
    }

    /// Folder for answer-indexed artifacts of this session.
    pub fn answer_dir(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_{}", iso_minute(&self.started), self.session_id))
    }

    /// Destination for the next artifact. Sequential names advance the counter.
    pub fn next_path(&mut self, name: ArtifactName) -> PathBuf {
        match name {
            ArtifactName::Answer(index) => self.answer_dir().join(format!("answer_{}.png", index)),
            ArtifactName::Sequential => {
                let path = self.output_dir.join(format!(
                    "{}_{}_{}.png",
                    iso_minute(&Local::now()),
                    self.counter,
                    self.session_id
                ));
                self.counter += 1;
                path
            }
        }
    }

    pub fn render(
        &mut self,
        renderer: &GridRenderer,
        trajectories: &TrajectorySet,
        grid: &GridDescriptor,
        name: ArtifactName,
    ) -> RenderResult<RenderedArtifact> {
        let destination = self.next_path(name);
        renderer.render_to(trajectories, grid, &destination)
    }
}

/// `2024-11-09T20-31`: ISO 8601 to the minute, with `:` replaced for file systems.
fn iso_minute(at: &DateTime<Local>) -> String {
    at.format("%Y-%m-%dT%H-%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_names_are_unique_and_counted() {
        let mut session = RenderSession::new("Plots");
        let first = session.next_path(ArtifactName::Sequential);
        let second = session.next_path(ArtifactName::Sequential);
        assert_ne!(first, second);
        assert_eq!(session.counter(), 2);
        assert!(first.starts_with("Plots"));
        assert!(first
            .to_string_lossy()
            .ends_with(&format!("_0_{}.png", session.session_id())));

        session.reset_counter();
        assert_eq!(session.counter(), 0);
    }

    #[test]
    fn answer_names_live_in_a_session_folder() {
        let mut session = RenderSession::new("Plots");
        let path = session.next_path(ArtifactName::Answer(3));
        assert_eq!(path.file_name().unwrap(), "answer_3.png");
        assert_eq!(path.parent().unwrap(), session.answer_dir());
        assert_eq!(session.counter(), 0);
    }

    #[test]
    fn separate_sessions_do_not_collide() {
        let mut a = RenderSession::new("Plots");
        let mut b = RenderSession::new("Plots");
        assert_ne!(
            a.next_path(ArtifactName::Sequential),
            b.next_path(ArtifactName::Sequential)
        );
    }
}
