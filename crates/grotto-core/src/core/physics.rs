//! Tile-grid physics: velocity/acceleration integration plus collision
//! resolution against the level's static collision layer.
//!
//! One step has two passes. First every enabled body is integrated, then
//! each is resolved against the grid independently — resolution always
//! sees the same per-step tile geometry, and entities never collide with
//! each other here (combat-layer concern, out of scope).

use glam::Vec2;

use crate::api::types::Rect;
use crate::core::scene::Scene;
use crate::entities::entity::Entity;
use crate::level::grid::TileGrid;

/// Default downward gravity in world units / s².
pub const DEFAULT_GRAVITY: Vec2 = Vec2::new(0.0, -500.0);

pub struct PhysicsSystem {
    pub gravity: Vec2,
}

impl PhysicsSystem {
    pub fn new(gravity: Vec2) -> Self {
        Self { gravity }
    }

    /// Advance every registered body by `dt` and resolve tile contacts.
    pub fn step(&self, scene: &mut Scene, grid: &TileGrid, dt: f32) {
        // Pass 1: integrate everything.
        for e in scene.iter_mut() {
            if !Self::simulates(e) {
                continue;
            }
            e.body.prev_pos = e.pos;
            e.vel += (self.gravity * e.body.gravity_scale + e.accel) * dt;
            let next = e.pos + e.vel * dt;
            e.set_position(next);
        }

        // Pass 2: resolve each body against this step's tile geometry.
        for e in scene.iter_mut() {
            if !Self::simulates(e) || !e.body.collides_tiles {
                continue;
            }
            resolve_tiles(e, grid);
        }
    }

    fn simulates(e: &Entity) -> bool {
        e.body.enabled && !e.suspended && !e.dead
    }
}

impl Default for PhysicsSystem {
    fn default() -> Self {
        Self::new(DEFAULT_GRAVITY)
    }
}

/// Sweep the collision rect from the pre-integration position one axis at
/// a time, clamping position and zeroing velocity on the contact axis.
/// A downward contact grounds the entity.
fn resolve_tiles(e: &mut Entity, grid: &TileGrid) {
    e.grounded = false;
    e.body.hit_wall = false;

    let half = e.half_extents;
    let from = e.body.prev_pos;
    let target = e.pos;

    // Horizontal first, at the pre-step height.
    let mut x = target.x;
    let moved_right = target.x > from.x;
    let probe = Rect::from_center(Vec2::new(x, from.y), half);
    for tile in grid.solid_rects_in(&probe) {
        if moved_right {
            x = x.min(tile.x - half.x);
        } else {
            x = x.max(tile.right() + half.x);
        }
        e.vel.x = 0.0;
        e.body.hit_wall = true;
    }

    // Vertical second, with the resolved horizontal position.
    let mut y = target.y;
    let moved_down = target.y < from.y;
    let probe = Rect::from_center(Vec2::new(x, y), half);
    for tile in grid.solid_rects_in(&probe) {
        if moved_down {
            y = y.max(tile.top() + half.y);
            e.grounded = true;
        } else {
            y = y.min(tile.y - half.y);
        }
        e.vel.y = 0.0;
    }

    e.set_position(Vec2::new(x, y));
}
