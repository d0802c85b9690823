use crate::common::{RenderError, RenderResult};
use crate::domains::trajectory::Coordinate;
use image::{imageops, RgbaImage};
use std::path::Path;

/// Geometry and imagery needed to draw trajectories over an environment.
#[derive(Debug, Clone)]
pub struct GridDescriptor {
    rows: u32,
    cols: u32,
    background: RgbaImage,
    border_crop: Option<u32>,
}

impl GridDescriptor {
    pub fn new(rows: u32, cols: u32, background: RgbaImage) -> RenderResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(RenderError::InvalidGrid {
                reason: format!("grid must have positive dimensions, got {}x{}", rows, cols),
            });
        }
        if background.width() == 0 || background.height() == 0 {
            return Err(RenderError::InvalidGrid {
                reason: "background image is empty".to_string(),
            });
        }
        Ok(Self {
            rows,
            cols,
            background,
            border_crop: None,
        })
    }

    /// Load the background raster from disk. A missing or undecodable file
    /// is fatal.
    pub fn from_path<P: AsRef<Path>>(rows: u32, cols: u32, background: P) -> RenderResult<Self> {
        let path = background.as_ref();
        let image = image::open(path).map_err(|source| RenderError::Background {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(rows, cols, image.to_rgba8())
    }

    pub fn with_border_crop(mut self, border: Option<u32>) -> Self {
        self.border_crop = border;
        self
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn border_crop(&self) -> Option<u32> {
        self.border_crop
    }

    pub fn background(&self) -> &RgbaImage {
        &self.background
    }

    /// Background with the right and bottom border strip removed.
    pub fn cropped_background(&self) -> RenderResult<RgbaImage> {
        let (width, height) = self.background.dimensions();
        match self.border_crop {
            None | Some(0) => Ok(self.background.clone()),
            Some(border) if border >= width || border >= height => Err(RenderError::CropTooLarge {
                border,
                width,
                height,
            }),
            Some(border) => Ok(imageops::crop_imm(
                &self.background,
                0,
                0,
                width - border,
                height - border,
            )
            .to_image()),
        }
    }
}

/// Pixel-space layout of the grid on a canvas of a given size.
///
/// Axis convention: `col` maps to pixel x, `row` maps to pixel y, and row 0
/// is the top row. Cell sizes are fractional.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    pub width: u32,
    pub height: u32,
    pub rows: u32,
    pub cols: u32,
    pub cell_width: f64,
    pub cell_height: f64,
}

impl GridGeometry {
    pub fn new(width: u32, height: u32, rows: u32, cols: u32) -> Self {
        Self {
            width,
            height,
            rows,
            cols,
            cell_width: width as f64 / cols as f64,
            cell_height: height as f64 / rows as f64,
        }
    }

    /// Top-left corner of a cell.
    pub fn cell_origin(&self, coordinate: Coordinate) -> (f64, f64) {
        (
            coordinate.col as f64 * self.cell_width,
            coordinate.row as f64 * self.cell_height,
        )
    }

    pub fn cell_center(&self, coordinate: Coordinate) -> (f64, f64) {
        let (x, y) = self.cell_origin(coordinate);
        (x + self.cell_width / 2.0, y + self.cell_height / 2.0)
    }

    /// X positions of the `cols + 1` vertical boundaries, clamped to the canvas.
    pub fn column_boundaries(&self) -> impl Iterator<Item = u32> + '_ {
        (0..=self.cols).map(move |i| clamp_px(i as f64 * self.cell_width, self.width))
    }

    pub fn row_boundaries(&self) -> impl Iterator<Item = u32> + '_ {
        (0..=self.rows).map(move |i| clamp_px(i as f64 * self.cell_height, self.height))
    }
}

fn clamp_px(value: f64, extent: u32) -> u32 {
    (value.round().max(0.0) as u32).min(extent.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn blank(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]))
    }

    #[test]
    fn rejects_zero_dimensions() {
        assert!(matches!(
            GridDescriptor::new(0, 4, blank(10, 10)),
            Err(RenderError::InvalidGrid { .. })
        ));
    }

    #[test]
    fn crop_removes_right_and_bottom_strip() {
        let grid = GridDescriptor::new(2, 2, blank(50, 40))
            .unwrap()
            .with_border_crop(Some(4));
        let cropped = grid.cropped_background().unwrap();
        assert_eq!(cropped.dimensions(), (46, 36));
    }

    #[test]
    fn crop_that_consumes_the_image_fails() {
        let grid = GridDescriptor::new(2, 2, blank(50, 40))
            .unwrap()
            .with_border_crop(Some(40));
        assert!(matches!(
            grid.cropped_background(),
            Err(RenderError::CropTooLarge { border: 40, .. })
        ));
    }

    #[test]
    fn fractional_cells_keep_their_precision() {
        let geometry = GridGeometry::new(100, 100, 3, 3);
        let (x, y) = geometry.cell_origin(Coordinate::new(1, 2));
        assert!((x - 66.666).abs() < 0.01);
        assert!((y - 33.333).abs() < 0.01);
        let boundaries: Vec<u32> = geometry.column_boundaries().collect();
        assert_eq!(boundaries, vec![0, 33, 67, 99]);
    }

    #[test]
    fn missing_background_is_fatal() {
        let result = GridDescriptor::from_path(2, 2, "/nonexistent/background.png");
        assert!(matches!(result, Err(RenderError::Background { .. })));
    }
}
