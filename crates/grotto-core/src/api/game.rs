//! The game-facing API: configuration, the `Game` trait, and the
//! `EngineContext` that owns the scene and runs the simulation step.

use std::sync::Arc;

use glam::Vec2;

use crate::api::types::{EntityId, Outbox, ParticleKind, SimEvent};
use crate::core::physics::{PhysicsSystem, DEFAULT_GRAVITY};
use crate::core::scene::Scene;
use crate::entities::animation::{AnimKey, AnimationSet};
use crate::entities::boss::{Boss, MissileShot};
use crate::entities::entity::{Entity, EntityKind, Facing, PhysicsBody};
use crate::entities::interactable::{InteractableData, InteractableKind};
use crate::entities::player::PlayerControl;
use crate::entities::{enemy, interactable};
use crate::input::ActionState;
use crate::level::Level;
use crate::renderer::camera::{Camera2D, FollowConstraints};
use crate::renderer::instance::RenderBuffer;
use crate::systems::debug::DebugOptions;

const PLAYER_SIZE: Vec2 = Vec2::new(20.0, 30.0);
// Half-width hitbox; the sprite overhangs its collision box.
const PLAYER_COLLISION_SIZE: Vec2 = Vec2::new(10.0, 30.0);
const ENEMY_SIZE: Vec2 = Vec2::new(16.0, 16.0);
const INTERACTABLE_SIZE: Vec2 = Vec2::new(16.0, 24.0);
const BOSS_SIZE: Vec2 = Vec2::new(96.0, 64.0);
const MISSILE_SIZE: Vec2 = Vec2::new(12.0, 6.0);

/// Margin past the level bounds before a projectile is culled.
const PROJECTILE_CULL_MARGIN: f32 = 64.0;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Visible width in world units at zoom 1.
    pub view_width: f32,
    /// Visible height in world units at zoom 1.
    pub view_height: f32,
    /// World gravity applied by the physics step.
    pub gravity: Vec2,
    /// Maximum number of render instances (default: 512).
    pub max_instances: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            view_width: 400.0,
            view_height: 240.0,
            gravity: DEFAULT_GRAVITY,
            max_instances: 512,
        }
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state: load the level, script the boss, etc.
    fn init(&mut self, ctx: &mut EngineContext);

    /// Per-tick game logic, before the built-in simulation step.
    fn update(&mut self, ctx: &mut EngineContext, actions: &ActionState);

    /// Optional read-only render pass for custom render commands.
    fn render(&self, _ctx: &mut RenderContext) {}
}

/// Animation sets the level spawner assigns to each entity archetype.
#[derive(Clone, Default)]
pub struct LevelAssets {
    pub player: Arc<AnimationSet>,
    pub enemy: Arc<AnimationSet>,
    pub lever: Arc<AnimationSet>,
    pub door: Arc<AnimationSet>,
    pub boss: Arc<AnimationSet>,
    pub missile: Arc<AnimationSet>,
}

/// Mutable access to engine state, passed to Game::init and Game::update.
pub struct EngineContext {
    pub scene: Scene,
    pub level: Option<Level>,
    pub physics: PhysicsSystem,
    pub camera: Camera2D,
    pub follow: FollowConstraints,
    /// Zoom the camera eases toward each tick.
    pub target_zoom: f32,
    pub debug: DebugOptions,
    pub outbox: Outbox,
    pub player: Option<PlayerControl>,
    pub boss: Option<Boss>,
    assets: LevelAssets,
    next_id: u32,
}

impl EngineContext {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            scene: Scene::new(),
            level: None,
            physics: PhysicsSystem::new(config.gravity),
            camera: Camera2D::new(config.view_width, config.view_height),
            follow: FollowConstraints::default(),
            target_zoom: 1.0,
            debug: DebugOptions::default(),
            outbox: Outbox::new(),
            player: None,
            boss: None,
            assets: LevelAssets::default(),
            next_id: 1,
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Swap in a level: clears the scene, spawns everything the level
    /// describes, confines the camera to the level bounds, and requests
    /// the level's music.
    pub fn load_level(&mut self, level: Level, assets: LevelAssets) {
        self.scene.clear();
        self.boss = None;

        let player_id = self.next_id();
        self.scene.spawn(
            Entity::new(player_id, EntityKind::Player, assets.player.clone())
                .with_size(PLAYER_SIZE)
                .with_collision_size(PLAYER_COLLISION_SIZE)
                .with_pos(level.player_spawn),
        );
        self.player = Some(PlayerControl::new(player_id, assets.player.clone()));

        for spawn in &level.enemy_spawns {
            let id = self.next_id();
            let facing = if spawn.facing_left {
                Facing::Left
            } else {
                Facing::Right
            };
            self.scene.spawn(
                Entity::new(id, EntityKind::Enemy, assets.enemy.clone())
                    .with_size(ENEMY_SIZE)
                    .with_pos(Vec2::from(spawn.pos))
                    .with_facing(facing),
            );
        }

        for spawn in &level.interactable_spawns {
            let id = self.next_id();
            let anims = match spawn.kind {
                InteractableKind::Lever => assets.lever.clone(),
                InteractableKind::Door => assets.door.clone(),
            };
            self.scene.spawn(
                Entity::new(id, EntityKind::Interactable, anims)
                    .with_size(INTERACTABLE_SIZE)
                    .with_pos(Vec2::from(spawn.pos))
                    .with_body(PhysicsBody {
                        enabled: false,
                        ..PhysicsBody::default()
                    })
                    .with_interactable(
                        InteractableData::new(spawn.kind, spawn.id).with_target(spawn.target),
                    ),
            );
        }

        if let Some(spawn) = &level.boss_spawn {
            let id = self.next_id();
            self.scene.spawn(
                Entity::new(id, EntityKind::Boss, assets.boss.clone())
                    .with_size(BOSS_SIZE)
                    .with_pos(Vec2::from(spawn.pos))
                    .with_facing(Facing::Left)
                    .with_body(PhysicsBody {
                        enabled: false,
                        ..PhysicsBody::default()
                    }),
            );
            self.boss = Some(Boss::new(id));
        }

        self.camera.set_bounds(level.grid.bounds());
        self.camera.look_at(level.player_spawn);
        if let Some(music) = level.music {
            self.outbox.event(SimEvent::Music(music));
        }

        self.assets = assets;
        self.level = Some(level);
    }

    /// Run one fixed simulation step. Order is fixed: physics, then the
    /// player, enemies, interactables (with chain triggers), the boss
    /// script, projectile animation and culling, corpse sweep, and
    /// finally the camera.
    pub fn step_sim(&mut self, actions: &ActionState, dt: f32) {
        let Some(level) = self.level.as_ref() else {
            return;
        };

        self.physics.step(&mut self.scene, &level.grid, dt);

        if let Some(player) = self.player.as_mut() {
            player.update(
                &mut self.scene,
                &level.grid,
                level.player_spawn,
                actions,
                dt,
                &mut self.outbox,
            );
        }

        for id in self.scene.ids_of_kind(EntityKind::Enemy) {
            if let Some(e) = self.scene.get_mut(id) {
                enemy::update(e, dt, &mut self.outbox);
            }
        }

        // Interactables first collect their chain targets, then the
        // triggers fire; a completion never mutates another interactable
        // mid-iteration.
        let mut chain_targets = Vec::new();
        for id in self.scene.ids_of_kind(EntityKind::Interactable) {
            if let Some(e) = self.scene.get_mut(id) {
                if let Some(target) = interactable::update(e, dt, &mut self.outbox) {
                    chain_targets.push((target, e.pos));
                }
            }
        }
        for (link, source_pos) in chain_targets {
            match self.scene.interactable_by_link(link) {
                Some(id) => {
                    if let Some(e) = self.scene.get_mut(id) {
                        // Triggering a door puffs smoke at the finisher
                        // that opened it, before the opening plays out.
                        let is_door = e
                            .interactable
                            .map(|d| d.kind == InteractableKind::Door)
                            .unwrap_or(false);
                        if interactable::interact(e) && is_door {
                            self.outbox.event(SimEvent::Particles {
                                kind: ParticleKind::Smoke,
                                pos: source_pos,
                            });
                        }
                    }
                }
                None => log::warn!("chain trigger to unknown link id {link}"),
            }
        }

        self.step_boss(dt);
        self.animate_projectiles(dt);
        self.cull_projectiles();
        self.scene.sweep_dead(&mut self.outbox);
        self.track_camera();
    }

    fn step_boss(&mut self, dt: f32) {
        let Some(boss) = self.boss.as_mut() else {
            return;
        };
        // The boss body doesn't run the movement FSM; loop its idle clip
        // here so it still animates.
        let Some(boss_pos) = self.scene.get_mut(boss.entity).map(|e| {
            e.timers.state_time += dt;
            if let Some(frame) = e
                .anims
                .clip(AnimKey::Idle)
                .and_then(|clip| clip.frame_at(e.timers.state_time))
            {
                e.keyframe = Some(frame);
            }
            e.pos
        }) else {
            return;
        };
        let player_pos = self
            .player
            .as_ref()
            .and_then(|p| self.scene.get(p.id))
            .map(|e| e.pos)
            .unwrap_or(boss_pos);

        let shots = boss.update(boss_pos, player_pos, dt, &mut self.outbox);
        for shot in shots {
            self.spawn_missile(shot);
        }
    }

    fn spawn_missile(&mut self, shot: MissileShot) {
        let id = self.next_id();
        let facing = if shot.vel.x < 0.0 {
            Facing::Left
        } else {
            Facing::Right
        };
        let mut missile = Entity::new(id, EntityKind::Projectile, self.assets.missile.clone())
            .with_size(MISSILE_SIZE)
            .with_pos(shot.pos)
            .with_facing(facing)
            .with_body(PhysicsBody {
                collides_tiles: false,
                gravity_scale: 0.0,
                ..PhysicsBody::default()
            });
        missile.vel = shot.vel;
        // No horizontal clamp for missiles.
        missile.stats.max_horizontal_speed = f32::INFINITY;
        missile.keyframe = self
            .assets
            .missile
            .clip(AnimKey::Idle)
            .and_then(|clip| clip.frame_at(0.0));
        self.scene.spawn(missile);
        self.outbox.event(SimEvent::MissileFired(id));
        log::debug!("missile {:?} fired from {} at {}", id, shot.pos, shot.vel);
    }

    // Projectiles don't run the movement FSM; loop their idle clips here.
    fn animate_projectiles(&mut self, dt: f32) {
        for e in self.scene.iter_mut() {
            if e.kind != EntityKind::Projectile {
                continue;
            }
            e.timers.state_time += dt;
            if let Some(frame) = e
                .anims
                .clip(AnimKey::Idle)
                .and_then(|clip| clip.frame_at(e.timers.state_time))
            {
                e.keyframe = Some(frame);
            }
        }
    }

    /// Projectiles that leave the level (plus a margin) are removed; they
    /// never collide with tiles, so nothing else stops them.
    fn cull_projectiles(&mut self) {
        let Some(level) = self.level.as_ref() else {
            return;
        };
        let mut bounds = level.grid.bounds();
        bounds.x -= PROJECTILE_CULL_MARGIN;
        bounds.y -= PROJECTILE_CULL_MARGIN;
        bounds.w += PROJECTILE_CULL_MARGIN * 2.0;
        bounds.h += PROJECTILE_CULL_MARGIN * 2.0;

        for e in self.scene.iter_mut() {
            if e.kind == EntityKind::Projectile && !bounds.contains(e.pos) {
                e.dead = true;
            }
        }
    }

    fn track_camera(&mut self) {
        let Some((focus, grounded)) = self
            .player
            .as_ref()
            .and_then(|p| self.scene.get(p.id))
            .map(|e| (e.pos, e.grounded))
        else {
            return;
        };
        self.follow
            .track(&mut self.camera, focus, grounded, self.target_zoom);
    }
}

/// Render context for optional custom render commands.
pub struct RenderContext<'a> {
    pub render_buffer: &'a mut RenderBuffer,
    pub camera: &'a Camera2D,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{MusicKind, SoundKind};
    use crate::entities::animation::{Clip, PlayMode};
    use crate::entities::boss::BossPhase;
    use crate::level::LevelDescriptor;

    const DT: f32 = 1.0 / 60.0;

    fn test_level(with_boss: bool) -> Level {
        Level::from_descriptor(LevelDescriptor {
            name: "arena".into(),
            tile_size: 16.0,
            rows: vec![
                "....................".into(),
                "....................".into(),
                "....................".into(),
                "....................".into(),
                "####################".into(),
            ],
            player_spawn: [48.0, 31.0],
            enemy_spawns: vec![crate::level::EnemySpawn {
                pos: [120.0, 24.0],
                facing_left: true,
            }],
            interactable_spawns: vec![
                crate::level::InteractableSpawn {
                    pos: [80.0, 28.0],
                    kind: InteractableKind::Lever,
                    id: 1,
                    target: Some(2),
                },
                crate::level::InteractableSpawn {
                    pos: [200.0, 28.0],
                    kind: InteractableKind::Door,
                    id: 2,
                    target: None,
                },
            ],
            boss_spawn: with_boss.then(|| crate::level::BossSpawn { pos: [280.0, 60.0] }),
            parallax_layers: Vec::new(),
            music: Some(MusicKind::Descent),
        })
    }

    fn loaded_context(with_boss: bool) -> EngineContext {
        let mut ctx = EngineContext::new(&GameConfig::default());
        ctx.load_level(test_level(with_boss), LevelAssets::default());
        ctx
    }

    #[test]
    fn load_level_spawns_everything_and_requests_music() {
        let ctx = loaded_context(true);
        assert_eq!(ctx.scene.iter_kind(EntityKind::Player).count(), 1);
        assert_eq!(ctx.scene.iter_kind(EntityKind::Enemy).count(), 1);
        assert_eq!(ctx.scene.iter_kind(EntityKind::Interactable).count(), 2);
        assert_eq!(ctx.scene.iter_kind(EntityKind::Boss).count(), 1);
        assert!(ctx.boss.is_some());
        assert!(ctx
            .outbox
            .events
            .contains(&SimEvent::Music(MusicKind::Descent)));
        assert!(ctx.camera.bounds.is_some());
    }

    #[test]
    fn step_sim_settles_the_player_on_the_floor() {
        let mut ctx = loaded_context(false);
        for _ in 0..120 {
            ctx.step_sim(&ActionState::new(), DT);
        }
        let player = ctx.player.as_ref().unwrap();
        let e = ctx.scene.get(player.id).unwrap();
        assert!(e.grounded);
        // Standing on the 16px floor: center at floor top + half height.
        assert_eq!(e.pos.y, 16.0 + 15.0);
    }

    #[test]
    fn enemy_patrols_in_its_facing_direction() {
        let mut ctx = loaded_context(false);
        let enemy_id = ctx.scene.ids_of_kind(EntityKind::Enemy)[0];
        let start_x = ctx.scene.get(enemy_id).unwrap().pos.x;
        for _ in 0..60 {
            ctx.step_sim(&ActionState::new(), DT);
        }
        let e = ctx.scene.get(enemy_id).unwrap();
        assert!(e.pos.x < start_x, "enemy should patrol left");
    }

    #[test]
    fn lever_completion_chain_triggers_the_door() {
        let mut ctx = loaded_context(false);
        let lever_id = ctx.scene.interactable_by_link(1).unwrap();
        if let Some(e) = ctx.scene.get_mut(lever_id) {
            interactable::interact(e);
        }

        // Assets are empty sets, so activation completes on the next tick
        // and chains into the door, which then removes itself.
        for _ in 0..5 {
            ctx.step_sim(&ActionState::new(), DT);
        }
        assert!(ctx.scene.interactable_by_link(2).is_none());
        assert!(ctx
            .outbox
            .events
            .iter()
            .any(|ev| matches!(ev, SimEvent::EntityRemoved(_))));
    }

    #[test]
    fn boss_barrage_spawns_missiles_that_get_culled() {
        let mut ctx = loaded_context(true);
        ctx.boss
            .as_mut()
            .unwrap()
            .push_phase(BossPhase::missile_barrage(2, 0.1));

        let mut seen_missile = false;
        for _ in 0..600 {
            ctx.step_sim(&ActionState::new(), DT);
            if ctx.scene.iter_kind(EntityKind::Projectile).count() > 0 {
                seen_missile = true;
            }
        }
        assert!(seen_missile);
        assert!(ctx.outbox.sounds.contains(&SoundKind::Laser));
        // All missiles flew off the level and were culled.
        assert_eq!(ctx.scene.iter_kind(EntityKind::Projectile).count(), 0);
    }

    #[test]
    fn missiles_animate_in_flight() {
        let mut ctx = EngineContext::new(&GameConfig::default());
        let mut assets = LevelAssets::default();
        assets.missile = Arc::new(
            AnimationSet::new()
                .with_idle(Arc::new(Clip::strip(7.0, 0.0, 2, 0.05, PlayMode::Loop))),
        );
        ctx.load_level(test_level(true), assets);
        ctx.boss
            .as_mut()
            .unwrap()
            .push_phase(BossPhase::missile_barrage(1, 0.01));

        ctx.step_sim(&ActionState::new(), DT);
        let missile = ctx.scene.iter_kind(EntityKind::Projectile).next().unwrap();
        let id = missile.id;
        let first = missile.keyframe.unwrap();
        assert_eq!(first, (0.0, 7.0));

        // Two more ticks push the clip past its first frame boundary.
        for _ in 0..2 {
            ctx.step_sim(&ActionState::new(), DT);
        }
        let later = ctx.scene.get(id).unwrap().keyframe.unwrap();
        assert_eq!(later, (1.0, 7.0));
    }

    #[test]
    fn chain_smoke_marks_the_triggering_interactable() {
        let mut ctx = loaded_context(false);
        let lever_id = ctx.scene.interactable_by_link(1).unwrap();
        let lever_pos = ctx.scene.get(lever_id).unwrap().pos;
        if let Some(e) = ctx.scene.get_mut(lever_id) {
            interactable::interact(e);
        }

        for _ in 0..5 {
            ctx.step_sim(&ActionState::new(), DT);
        }
        // The cue for the remote door trigger puffs at the lever, not at
        // the door it opened.
        assert!(ctx.outbox.events.contains(&SimEvent::Particles {
            kind: ParticleKind::Smoke,
            pos: lever_pos,
        }));
    }

    #[test]
    fn camera_stays_inside_level_bounds() {
        let mut ctx = loaded_context(false);
        for _ in 0..300 {
            ctx.step_sim(&ActionState::new(), DT);
        }
        let view = ctx.camera.view_rect();
        let bounds = ctx.level.as_ref().unwrap().grid.bounds();
        // Level is 320x80, narrower than the 400x240 view: centered.
        assert_eq!(ctx.camera.center.x, bounds.center().x);
        assert_eq!(ctx.camera.center.y, bounds.center().y);
        assert!(view.w >= bounds.w);
    }

    #[test]
    fn step_without_level_is_a_no_op() {
        let mut ctx = EngineContext::new(&GameConfig::default());
        ctx.step_sim(&ActionState::new(), DT);
        assert!(ctx.scene.is_empty());
        assert!(ctx.outbox.events.is_empty());
    }
}
