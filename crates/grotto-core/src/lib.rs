//! Deterministic fixed-step simulation core for a 2D tile platformer:
//! entity state machines, tile physics, boss phase scripting, and a
//! dead-zone tracking camera. Rendering and audio stay in the embedding
//! layer; the core only produces render instances and effect queues.

pub mod api;
pub mod core;
pub mod entities;
pub mod input;
pub mod level;
pub mod renderer;
pub mod runner;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::game::{EngineContext, Game, GameConfig, LevelAssets, RenderContext};
pub use api::types::{
    EntityId, MusicKind, Outbox, ParticleKind, Rect, SimEvent, SoundKind,
};
pub use core::physics::PhysicsSystem;
pub use core::scene::Scene;
pub use core::time::FixedTimestep;
pub use entities::animation::{AnimKey, AnimationSet, Clip, PlayMode};
pub use entities::boss::{Boss, BossPhase, MissileShot, PhaseStatus};
pub use entities::entity::{Entity, EntityKind, EntityState, Facing, MoveStats, PhysicsBody};
pub use entities::interactable::{InteractableData, InteractableKind};
pub use entities::player::PlayerControl;
pub use input::{Action, ActionState, InputEvent, InputQueue};
pub use level::{Level, LevelDescriptor, ParallaxLayer};
pub use level::grid::{TileCell, TileGrid};
pub use renderer::camera::{Camera2D, CameraUniform, FollowConstraints};
pub use renderer::instance::{RenderBuffer, RenderInstance};
pub use runner::GameRunner;
pub use systems::debug::DebugOptions;
