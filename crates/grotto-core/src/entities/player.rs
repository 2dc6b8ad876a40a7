//! The player controller: maps action state onto movement commands,
//! handles falling off the stage, and manages enemy capture.

use std::sync::Arc;

use glam::Vec2;

use crate::api::types::{EntityId, Outbox, SimEvent};
use crate::core::scene::Scene;
use crate::entities::animation::AnimationSet;
use crate::entities::entity::{EntityKind, EntityState, Facing};
use crate::entities::{interactable, movable};
use crate::input::{Action, ActionState};
use crate::level::grid::TileGrid;

/// Velocity the player is launched back onto the stage with after
/// falling past the bottom edge above solid ground.
pub const RESPAWN_LAUNCH_VELOCITY: Vec2 = Vec2::new(0.0, 400.0);

/// Player bookkeeping that doesn't live on the entity record: the
/// default look to restore after a capture, and which enemy (if any) is
/// currently captured.
pub struct PlayerControl {
    pub id: EntityId,
    default_anims: Arc<AnimationSet>,
    captured: Option<EntityId>,
}

impl PlayerControl {
    pub fn new(id: EntityId, default_anims: Arc<AnimationSet>) -> Self {
        Self {
            id,
            default_anims,
            captured: None,
        }
    }

    pub fn captured(&self) -> Option<EntityId> {
        self.captured
    }

    /// Drive the player for one fixed step from the current action state.
    pub fn update(
        &mut self,
        scene: &mut Scene,
        grid: &TileGrid,
        spawn: Vec2,
        actions: &ActionState,
        dt: f32,
        out: &mut Outbox,
    ) {
        if actions.just_pressed(Action::Interact) {
            self.handle_interact(scene, out);
        }

        let Some(e) = scene.get_mut(self.id) else {
            return;
        };
        if e.dead {
            return;
        }

        e.timers.jump_held = actions.is_held(Action::Up);
        if actions.just_pressed(Action::Up) {
            movable::jump_command(e, out);
        }
        if actions.just_pressed(Action::Attack) {
            movable::attack_command(e, out);
        }

        // Steering is locked during the jump wind-up; the launch keeps
        // whatever horizontal velocity was built up before it.
        if e.state != EntityState::JumpWindup {
            let speed = e.stats.move_accel;
            if actions.is_held(Action::Left) {
                movable::move_command(e, Facing::Left, speed);
            }
            if actions.is_held(Action::Right) {
                movable::move_command(e, Facing::Right, speed);
            }
        }

        movable::update(e, dt, out);

        if e.pos.y < -(e.half_extents.y * 2.0) {
            self.return_to_stage(scene, grid, spawn, out);
        }
    }

    /// The player fell past the bottom of the level. Scan the tile column
    /// under them for solid ground rising unbroken from the level floor:
    /// if there is some, launch them back up onto it; if the column is
    /// bottomless, do a full respawn at the level spawn point.
    fn return_to_stage(&self, scene: &mut Scene, grid: &TileGrid, spawn: Vec2, out: &mut Outbox) {
        let Some(e) = scene.get_mut(self.id) else {
            return;
        };

        let mut top = 0.0;
        for tile in grid.solid_column(e.pos.x) {
            if tile.y > top {
                break;
            }
            top = tile.top();
        }

        if top > 0.0 {
            let pos = Vec2::new(e.pos.x, top + e.half_extents.y);
            e.set_position(pos);
            e.vel = RESPAWN_LAUNCH_VELOCITY;
            log::debug!("player launched back to {pos}");
            out.event(SimEvent::PlayerLaunched { pos });
        } else {
            e.set_position(spawn);
            e.vel = Vec2::ZERO;
            e.state = EntityState::Standing;
            log::debug!("player respawned at {spawn}");
            out.event(SimEvent::PlayerRespawned { pos: spawn });
        }
    }

    /// Interact press: a touched interactable wins; otherwise toggle the
    /// enemy capture.
    fn handle_interact(&mut self, scene: &mut Scene, out: &mut Outbox) {
        let Some(player_rect) = scene.get(self.id).map(|e| e.collision_rect()) else {
            return;
        };

        if let Some(id) = scene.first_overlapping(EntityKind::Interactable, &player_rect) {
            if let Some(target) = scene.get_mut(id) {
                interactable::interact(target);
            }
            return;
        }

        if self.captured.is_some() {
            self.release(scene, out);
        } else if let Some(enemy) = scene.first_overlapping(EntityKind::Enemy, &player_rect) {
            self.capture(scene, enemy, out);
        }
    }

    /// Capture an enemy: it stops simulating and rendering, and the
    /// player takes on its look until release.
    fn capture(&mut self, scene: &mut Scene, enemy_id: EntityId, out: &mut Outbox) {
        let Some(enemy) = scene.get_mut(enemy_id) else {
            return;
        };
        enemy.suspended = true;
        // One clip for every motion state; the enemy set has no jump or
        // fall clips of its own.
        let look = match enemy.anims.mov.clone() {
            Some(clip) => Arc::new(AnimationSet::uniform(clip)),
            None => enemy.anims.clone(),
        };

        if let Some(player) = scene.get_mut(self.id) {
            player.anims = look;
        }
        self.captured = Some(enemy_id);
        log::debug!("player captured enemy {:?}", enemy_id);
        out.event(SimEvent::Captured(enemy_id));
    }

    /// Release the captured enemy at the player's feet and restore the
    /// player's own look.
    fn release(&mut self, scene: &mut Scene, out: &mut Outbox) {
        let Some(enemy_id) = self.captured.take() else {
            return;
        };
        let player_pos = match scene.get_mut(self.id) {
            Some(player) => {
                player.anims = self.default_anims.clone();
                player.pos
            }
            None => return,
        };
        if let Some(enemy) = scene.get_mut(enemy_id) {
            enemy.suspended = false;
            enemy.set_position(player_pos);
            enemy.vel = Vec2::ZERO;
        }
        log::debug!("player released enemy {:?}", enemy_id);
        out.event(SimEvent::Released(enemy_id));
    }
}
