//! Build the per-frame render buffer: parallax background layers first,
//! then visible tiles, then live entities, in draw order.

use crate::core::scene::Scene;
use crate::entities::entity::{Entity, EntityKind, EntityState, Facing};
use crate::level::grid::TileGrid;
use crate::level::ParallaxLayer;
use crate::renderer::camera::Camera2D;
use crate::renderer::instance::{RenderBuffer, RenderInstance};

/// Airborne stretch factors applied to moving entities: narrower and
/// taller while off the ground, to sell the motion.
const AIR_SQUASH_X: f32 = 0.85;
const AIR_STRETCH_Y: f32 = 1.15;

pub fn build_render_buffer(
    scene: &Scene,
    grid: &TileGrid,
    layers: &[ParallaxLayer],
    camera: &Camera2D,
    buffer: &mut RenderBuffer,
) {
    buffer.clear();
    push_parallax(layers, camera, buffer);
    push_tiles(grid, camera, buffer);
    for entity in scene.iter() {
        if let Some(instance) = entity_instance(entity) {
            if camera.is_rect_visible(&entity.image_rect()) {
                buffer.push(instance);
            }
        }
    }
}

/// Background layers trail the camera by their scroll factor and repeat
/// horizontally until the viewport is covered.
fn push_parallax(layers: &[ParallaxLayer], camera: &Camera2D, buffer: &mut RenderBuffer) {
    let view = camera.view_rect();
    for layer in layers {
        let w = layer.size[0];
        if w <= 0.0 {
            continue;
        }
        let x0 = camera.center.x * (1.0 - layer.scroll_factor[0]) + layer.offset[0];
        let y = camera.center.y * (1.0 - layer.scroll_factor[1]) + layer.offset[1];

        // Indices of the repeats whose extents touch the view.
        let first = ((view.x - x0) / w - 0.5).floor() as i32 + 1;
        let last = ((view.right() - x0) / w + 0.5).ceil() as i32;
        for i in first..last {
            buffer.push(RenderInstance {
                x: x0 + i as f32 * w,
                y,
                rotation: 0.0,
                scale_x: w,
                scale_y: layer.size[1],
                sprite_col: layer.sprite[0],
                sprite_row: layer.sprite[1],
                alpha: 1.0,
            });
        }
    }
}

/// Tiles outside the viewport are culled before instancing; a scrolling
/// level is far larger than the view.
fn push_tiles(grid: &TileGrid, camera: &Camera2D, buffer: &mut RenderBuffer) {
    let view = camera.view_rect();
    for (center, cell) in grid.cells_in(&view) {
        buffer.push(RenderInstance {
            x: center.x,
            y: center.y,
            rotation: 0.0,
            scale_x: grid.tile_size(),
            scale_y: grid.tile_size(),
            sprite_col: cell.col,
            sprite_row: cell.row,
            alpha: 1.0,
        });
    }
}

fn entity_instance(entity: &Entity) -> Option<RenderInstance> {
    if entity.dead || entity.suspended {
        return None;
    }
    let (col, row) = entity.keyframe?;

    let rect = entity.image_rect();
    let mut scale_x = rect.w;
    let mut scale_y = rect.h;

    // Movers stretch while airborne.
    if !entity.grounded && matches!(entity.kind, EntityKind::Player | EntityKind::Enemy) {
        scale_x *= AIR_SQUASH_X;
        scale_y *= AIR_STRETCH_Y;
    }
    if entity.facing == Facing::Left {
        scale_x = -scale_x;
    }

    // Fade out over the death animation.
    let alpha = if entity.state == EntityState::Death {
        1.0 - entity.timers.death_time.clamp(0.0, 1.0)
    } else {
        1.0
    };

    Some(RenderInstance {
        x: rect.center().x,
        y: rect.center().y,
        rotation: 0.0,
        scale_x,
        scale_y,
        sprite_col: col,
        sprite_row: row,
        alpha,
    })
}
