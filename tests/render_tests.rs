use image::{Rgba, RgbaImage};
use trajviz::common::RenderError;
use trajviz::domains::rendering::{
    ArtifactName, GridDescriptor, GridRenderer, RenderOptions, RenderSession, SET1,
};
use trajviz::domains::trajectory::{build_trajectories, parse_answer, TrajectorySet};

fn white_grid(rows: u32, cols: u32, size: u32) -> GridDescriptor {
    let background = RgbaImage::from_pixel(size, size, Rgba([255, 255, 255, 255]));
    GridDescriptor::new(rows, cols, background).unwrap()
}

#[test]
fn test_label_lands_in_top_left_cell_in_palette_color() {
    let grid = white_grid(2, 2, 40);
    let set = build_trajectories(parse_answer("position(0,(0,0),n,5)"));

    let image = GridRenderer::default().render(&set, &grid).unwrap();
    assert_eq!(image.dimensions(), (160, 160));

    let label = Rgba(SET1[0]);
    let (half_w, half_h) = (image.width() / 2, image.height() / 2);
    let mut inside = 0;
    for (x, y, pixel) in image.enumerate_pixels() {
        if *pixel == label {
            assert!(x < half_w && y < half_h, "label pixel at ({}, {}) outside top-left cell", x, y);
            inside += 1;
        }
    }
    assert!(inside > 0, "no label pixels drawn");
}

#[test]
fn test_empty_set_renders_grid_only() {
    let grid = white_grid(3, 3, 30);
    let image = GridRenderer::default()
        .render(&TrajectorySet::new(), &grid)
        .unwrap();

    assert_eq!(image.dimensions(), (120, 120));
    assert_eq!(*image.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
    assert_eq!(*image.get_pixel(20, 20), Rgba([255, 255, 255, 255]));
    assert!(image.pixels().all(|p| SET1.iter().all(|c| p.0 != *c)));
}

#[test]
fn test_transparent_background_stays_transparent() {
    let background = RgbaImage::from_pixel(20, 20, Rgba([0, 0, 0, 0]));
    let grid = GridDescriptor::new(2, 2, background).unwrap();
    let options = RenderOptions {
        line_color: [0, 0, 255, 255],
        ..RenderOptions::default()
    };
    let image = GridRenderer::new(options)
        .render(&TrajectorySet::new(), &grid)
        .unwrap();
    assert_eq!(image.get_pixel(10, 10).0[3], 0);
    assert_eq!(*image.get_pixel(0, 10), Rgba([0, 0, 255, 255]));
}

#[test]
fn test_border_crop_shrinks_canvas_and_rejects_oversized_crop() {
    let grid = white_grid(2, 2, 40).with_border_crop(Some(8));
    let image = GridRenderer::default()
        .render(&TrajectorySet::new(), &grid)
        .unwrap();
    assert_eq!(image.dimensions(), (128, 128));

    let bad = white_grid(2, 2, 40).with_border_crop(Some(40));
    let err = GridRenderer::default()
        .render(&TrajectorySet::new(), &bad)
        .unwrap_err();
    assert!(matches!(err, RenderError::CropTooLarge { border: 40, .. }));
}

#[test]
fn test_missing_background_is_fatal() {
    let err = GridDescriptor::from_path(2, 2, "/nonexistent/background.png").unwrap_err();
    assert!(matches!(err, RenderError::Background { .. }));
}

#[test]
fn test_session_writes_without_overwriting() {
    let dir = tempfile::tempdir().unwrap();
    let grid = white_grid(2, 2, 20);
    let set = build_trajectories(parse_answer("position(1,(1,1),s,0)"));
    let renderer = GridRenderer::default();
    let mut session = RenderSession::new(dir.path());

    let first = session
        .render(&renderer, &set, &grid, ArtifactName::Sequential)
        .unwrap();
    let second = session
        .render(&renderer, &set, &grid, ArtifactName::Sequential)
        .unwrap();
    assert_ne!(first.path(), second.path());
    assert!(first.path().exists());
    assert!(second.path().exists());

    let answer = session
        .render(&renderer, &set, &grid, ArtifactName::Answer(1))
        .unwrap();
    assert!(answer.path().ends_with("answer_1.png"));
    let reloaded = image::open(answer.path()).unwrap().to_rgba8();
    assert_eq!(reloaded.dimensions(), (80, 80));

    let err = session
        .render(&renderer, &set, &grid, ArtifactName::Answer(1))
        .unwrap_err();
    assert!(matches!(err, RenderError::ArtifactExists { .. }));

    let leftovers = std::fs::read_dir(session.answer_dir())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().to_string_lossy().ends_with(".partial"))
        .count();
    assert_eq!(leftovers, 0);
}

#[test]
fn test_oversized_upscale_is_rejected() {
    let options = RenderOptions {
        upscale: u32::MAX,
        ..RenderOptions::default()
    };
    let err = GridRenderer::new(options)
        .render(&TrajectorySet::new(), &white_grid(2, 2, 40))
        .unwrap_err();
    assert!(matches!(err, RenderError::InvalidGrid { .. }));
}
