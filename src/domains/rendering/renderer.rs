use super::font::{draw_text_centered, GLYPH_HEIGHT};
use super::grid::{GridDescriptor, GridGeometry};
use super::palette::{agent_color, label_offset};
use crate::common::{RenderError, RenderResult};
use crate::domains::trajectory::TrajectorySet;
use image::{imageops, ImageFormat, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Integer upscale of the (cropped) background before drawing.
    pub upscale: u32,
    pub line_width: u32,
    pub line_color: [u8; 4],
    /// Label height as a fraction of the cell height.
    pub label_height_ratio: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            upscale: 4,
            line_width: 1,
            line_color: [0, 0, 0, 255],
            label_height_ratio: 0.3,
        }
    }
}

/// A written raster and where it lives. Never modified after creation.
#[derive(Debug, Clone)]
pub struct RenderedArtifact {
    path: PathBuf,
    image: RgbaImage,
}

impl RenderedArtifact {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

/// Draws trajectories as timestep labels over a gridded background.
#[derive(Debug, Clone, Default)]
pub struct GridRenderer {
    options: RenderOptions,
}

impl GridRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Compose the overlay in memory.
    pub fn render(&self, trajectories: &TrajectorySet, grid: &GridDescriptor) -> RenderResult<RgbaImage> {
        let background = grid.cropped_background()?;
        let upscale = self.options.upscale.max(1);
        let (width, height) = match (
            background.width().checked_mul(upscale),
            background.height().checked_mul(upscale),
        ) {
            (Some(width), Some(height)) => (width, height),
            _ => {
                return Err(RenderError::InvalidGrid {
                    reason: format!(
                        "upscale {} overflows a {}x{} background",
                        upscale,
                        background.width(),
                        background.height()
                    ),
                })
            }
        };

        let mut canvas = RgbaImage::new(width, height);
        let scaled = imageops::resize(&background, width, height, imageops::FilterType::Nearest);
        imageops::overlay(&mut canvas, &scaled, 0, 0);

        let geometry = GridGeometry::new(width, height, grid.rows(), grid.cols());
        self.draw_grid_lines(&mut canvas, &geometry);

        let label_scale = ((geometry.cell_height * self.options.label_height_ratio)
            / GLYPH_HEIGHT as f64)
            .round()
            .max(1.0) as u32;

        for trajectory in trajectories.iter() {
            let color = agent_color(trajectory.agent_id);
            let (fx, fy) = label_offset(trajectory.agent_id);
            for (waypoint, coordinate) in trajectory.positioned() {
                if coordinate.row >= grid.rows() || coordinate.col >= grid.cols() {
                    debug!(
                        agent = trajectory.agent_id,
                        timestep = waypoint.timestep,
                        %coordinate,
                        "position outside grid, label may be clipped"
                    );
                }
                let (cx, cy) = geometry.cell_center(coordinate);
                draw_text_centered(
                    &mut canvas,
                    &waypoint.timestep.to_string(),
                    cx + fx * geometry.cell_width,
                    cy + fy * geometry.cell_height,
                    label_scale,
                    color,
                );
            }
        }

        Ok(canvas)
    }

    /// Render and persist to `destination`. The file appears only once fully
    /// encoded; an existing destination is never overwritten.
    pub fn render_to(
        &self,
        trajectories: &TrajectorySet,
        grid: &GridDescriptor,
        destination: &Path,
    ) -> RenderResult<RenderedArtifact> {
        let image = self.render(trajectories, grid)?;
        persist(&image, destination)?;
        info!(
            path = %destination.display(),
            agents = trajectories.len(),
            "rendered trajectory overlay"
        );
        Ok(RenderedArtifact {
            path: destination.to_path_buf(),
            image,
        })
    }

    fn draw_grid_lines(&self, canvas: &mut RgbaImage, geometry: &GridGeometry) {
        let color = Rgba(self.options.line_color);
        let line_width = self.options.line_width.max(1);
        let (width, height) = canvas.dimensions();

        for x in geometry.column_boundaries() {
            for dx in 0..line_width {
                let px = (x + dx).min(width - 1);
                for y in 0..height {
                    canvas.put_pixel(px, y, color);
                }
            }
        }
        for y in geometry.row_boundaries() {
            for dy in 0..line_width {
                let py = (y + dy).min(height - 1);
                for x in 0..width {
                    canvas.put_pixel(x, py, color);
                }
            }
        }
    }
}

fn persist(image: &RgbaImage, destination: &Path) -> RenderResult<()> {
    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| RenderError::OutputDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    if destination.exists() {
        return Err(RenderError::ArtifactExists {
            path: destination.to_path_buf(),
        });
    }

    let partial = destination.with_extension("png.partial");
    if let Err(source) = image.save_with_format(&partial, ImageFormat::Png) {
        let _ = fs::remove_file(&partial);
        return Err(RenderError::Encode {
            path: destination.to_path_buf(),
            source,
        });
    }
    fs::rename(&partial, destination).map_err(|source| {
        let _ = fs::remove_file(&partial);
        RenderError::Persist {
            path: destination.to_path_buf(),
            source,
        }
    })
}
