//! Debug overlay data: collision outlines the embedding layer can draw
//! on top of the frame. Everything is off by default and costs nothing
//! while disabled.

use crate::api::types::Rect;
use crate::core::scene::Scene;
use crate::level::grid::TileGrid;
use crate::renderer::camera::Camera2D;

/// Which debug overlays are active. Plain data passed down from the
/// embedding layer each frame; no global switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct DebugOptions {
    /// Outline entity collision rects.
    pub colliders: bool,
    /// Outline solid tiles in view.
    pub tiles: bool,
}

/// Collect the outline rects requested by `options`, culled to the view.
pub fn collect_outlines(
    scene: &Scene,
    grid: &TileGrid,
    camera: &Camera2D,
    options: DebugOptions,
) -> Vec<Rect> {
    let mut rects = Vec::new();
    if options.colliders {
        for e in scene.iter() {
            if e.dead || e.suspended {
                continue;
            }
            let rect = e.collision_rect();
            if camera.is_rect_visible(&rect) {
                rects.push(rect);
            }
        }
    }
    if options.tiles {
        rects.extend(grid.solid_rects_in(&camera.view_rect()));
    }
    rects
}
