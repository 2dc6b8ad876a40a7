use std::sync::Arc;

use glam::Vec2;

use crate::api::types::{EntityId, Rect};
use crate::entities::animation::{AnimationSet, Frame};
use crate::entities::interactable::InteractableData;

/// Which way an entity is looking. Controls the render mirror and, for
/// enemies, the patrol direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    pub fn flipped(self) -> Self {
        match self {
            Facing::Right => Facing::Left,
            Facing::Left => Facing::Right,
        }
    }

    /// Horizontal sign: +1 facing right, -1 facing left.
    pub fn sign(self) -> f32 {
        match self {
            Facing::Right => 1.0,
            Facing::Left => -1.0,
        }
    }
}

/// Logical state of the movement state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntityState {
    #[default]
    Standing,
    Walking,
    /// Jump wind-up: the jump animation plays while launch is pending.
    /// Holding the jump input during this window earns bonus velocity.
    JumpWindup,
    /// Ballistic flight after launch.
    Jump,
    Falling,
    Attacking,
    Death,
}

/// Capability tag selecting which update logic applies to an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Player,
    Enemy,
    Boss,
    Interactable,
    /// Boss missile; flies on its launch vector, ignores tiles.
    Projectile,
}

/// Movement tuning for entities driven by the state machine.
#[derive(Debug, Clone, Copy)]
pub struct MoveStats {
    /// Horizontal speed clamp, applied every update.
    pub max_horizontal_speed: f32,
    /// Velocity added per move command.
    pub move_accel: f32,
    /// Upward launch velocity at the end of the jump wind-up.
    pub jump_velocity: f32,
    /// Max bonus fraction earned by holding jump through the wind-up.
    pub jump_bonus: f32,
}

impl Default for MoveStats {
    fn default() -> Self {
        Self {
            max_horizontal_speed: 100.0,
            move_accel: 20.0,
            jump_velocity: 200.0,
            jump_bonus: 0.4,
        }
    }
}

/// Timers owned by the movement state machine.
///
/// `jump_time` and `attack_time` idle at 1.0 so "animation duration
/// elapsed" guards don't fire spuriously outside their states.
#[derive(Debug, Clone, Copy)]
pub struct MotionTimers {
    pub state_time: f32,
    pub fall_time: f32,
    pub jump_time: f32,
    pub jump_held_timer: f32,
    pub jump_held: bool,
    pub attack_time: f32,
    pub death_time: f32,
}

impl Default for MotionTimers {
    fn default() -> Self {
        Self {
            state_time: 0.0,
            fall_time: 0.0,
            jump_time: 1.0,
            jump_held_timer: 0.0,
            jump_held: false,
            attack_time: 1.0,
            death_time: 1.0,
        }
    }
}

/// Physics participation data for an entity.
#[derive(Debug, Clone, Copy)]
pub struct PhysicsBody {
    /// Whether the physics system integrates this entity at all.
    pub enabled: bool,
    /// Whether the integrated position is resolved against the tile grid.
    pub collides_tiles: bool,
    /// Multiplier on world gravity (0 for missiles).
    pub gravity_scale: f32,
    /// Position before this step's integration; resolution sweeps from here.
    pub prev_pos: Vec2,
    /// Set when a horizontal tile contact was resolved this step.
    pub hit_wall: bool,
}

impl Default for PhysicsBody {
    fn default() -> Self {
        Self {
            enabled: true,
            collides_tiles: true,
            gravity_scale: 1.0,
            prev_pos: Vec2::ZERO,
            hit_wall: false,
        }
    }
}

/// A single game entity: one record with optional capability data
/// selected by `kind`, instead of an inheritance chain.
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,

    pub pos: Vec2,
    pub vel: Vec2,
    pub accel: Vec2,
    pub facing: Facing,

    /// Collision box half extents. The collision rect and circle are
    /// always derived from the live `pos`, so there is no window where
    /// bounds lag behind a position write.
    pub half_extents: Vec2,
    /// Render quad half extents (may be wider than the collision box).
    pub image_half_extents: Vec2,

    pub state: EntityState,
    pub last_state: EntityState,
    pub timers: MotionTimers,
    pub stats: MoveStats,

    pub grounded: bool,
    pub dead: bool,
    /// Captured enemies ride along without simulating or rendering.
    pub suspended: bool,

    pub body: PhysicsBody,

    pub anims: Arc<AnimationSet>,
    /// Last keyframe selected; kept as-is when the active state has no
    /// clip, so missing animations degrade to a freeze-frame.
    pub keyframe: Option<Frame>,

    pub interactable: Option<InteractableData>,
}

impl Entity {
    pub fn new(id: EntityId, kind: EntityKind, anims: Arc<AnimationSet>) -> Self {
        Self {
            id,
            kind,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            accel: Vec2::ZERO,
            facing: Facing::Right,
            half_extents: Vec2::splat(8.0),
            image_half_extents: Vec2::splat(8.0),
            state: EntityState::Standing,
            last_state: EntityState::Standing,
            timers: MotionTimers::default(),
            stats: MoveStats::default(),
            grounded: true,
            dead: false,
            suspended: false,
            body: PhysicsBody::default(),
            anims,
            keyframe: None,
            interactable: None,
        }
    }

    // -- Builder pattern --

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.set_position(pos);
        self
    }

    /// Set both collision and image extents from a full size.
    pub fn with_size(mut self, size: Vec2) -> Self {
        self.half_extents = size / 2.0;
        self.image_half_extents = size / 2.0;
        self
    }

    /// Narrow the collision box relative to the image (e.g. the player's
    /// hitbox is half the sprite width).
    pub fn with_collision_size(mut self, size: Vec2) -> Self {
        self.half_extents = size / 2.0;
        self
    }

    pub fn with_stats(mut self, stats: MoveStats) -> Self {
        self.stats = stats;
        self
    }

    pub fn with_facing(mut self, facing: Facing) -> Self {
        self.facing = facing;
        self
    }

    pub fn with_body(mut self, body: PhysicsBody) -> Self {
        self.body = body;
        self
    }

    pub fn with_interactable(mut self, data: InteractableData) -> Self {
        self.interactable = Some(data);
        self
    }

    // -- Geometry --

    /// Move the entity; all derived bounds follow atomically because they
    /// are computed from `pos` on read.
    pub fn set_position(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    /// Collision rectangle centered on the entity position.
    pub fn collision_rect(&self) -> Rect {
        Rect::from_center(self.pos, self.half_extents)
    }

    /// Collision circle: center at the entity position, radius half the
    /// collision-box width.
    pub fn collision_circle(&self) -> (Vec2, f32) {
        (self.pos, self.half_extents.x)
    }

    /// Render rectangle centered horizontally on the position, bottom
    /// aligned with the collision box.
    pub fn image_rect(&self) -> Rect {
        Rect {
            x: self.pos.x - self.image_half_extents.x,
            y: self.pos.y - self.half_extents.y,
            w: self.image_half_extents.x * 2.0,
            h: self.image_half_extents.y * 2.0,
        }
    }
}
