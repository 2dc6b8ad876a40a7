//! Levers, doors, and other one-shot stage objects.
//!
//! An interactable sits idle on its first frame until something activates
//! it, then plays its clip through once. Completion fires its side effect
//! exactly once and may chain-trigger another interactable by link id;
//! the chain is resolved by the simulation step, not here, because it
//! needs access to the whole scene.

use serde::{Deserialize, Serialize};

use crate::api::types::{Outbox, ParticleKind, SimEvent};
use crate::entities::animation::AnimKey;
use crate::entities::entity::Entity;

/// What an interactable does when its activation completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractableKind {
    /// Stays in the level after completing; emits interact particles.
    Lever,
    /// Removed from the level on completion, in a puff of smoke.
    Door,
}

/// Capability data carried by interactable entities.
#[derive(Debug, Clone, Copy)]
pub struct InteractableData {
    pub kind: InteractableKind,
    /// This interactable's id in the level's link namespace.
    pub link_id: u32,
    /// Link id of the interactable to trigger on completion.
    pub target: Option<u32>,
    /// Disabled interactables ignore activation entirely.
    pub disabled: bool,
    /// Activation latch; once set the clip plays through.
    pub active: bool,
    /// Completion latch; guarantees the side effect fires once.
    pub completed: bool,
}

impl InteractableData {
    pub fn new(kind: InteractableKind, link_id: u32) -> Self {
        Self {
            kind,
            link_id,
            target: None,
            disabled: false,
            active: false,
            completed: false,
        }
    }

    pub fn with_target(mut self, target: Option<u32>) -> Self {
        self.target = target;
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// Try to activate an interactable. Disabled, already-active, and
/// completed interactables ignore the request, so repeat activations
/// are harmless. Returns whether activation actually happened.
pub fn interact(e: &mut Entity) -> bool {
    let Some(data) = e.interactable.as_mut() else {
        return false;
    };
    if data.disabled || data.active || data.completed {
        return false;
    }
    data.active = true;
    e.timers.state_time = 0.0;
    true
}

/// Advance an interactable one tick. The clip only plays while active;
/// on completion the side effect fires and the chain target (if any) is
/// returned exactly once.
pub fn update(e: &mut Entity, dt: f32, out: &mut Outbox) -> Option<u32> {
    let Some(data) = e.interactable else {
        return None;
    };
    if e.dead || data.disabled || data.completed {
        return None;
    }

    if data.active {
        e.timers.state_time += dt;
    }

    let clip = e.anims.clip(AnimKey::Idle);
    if let Some(clip) = clip {
        e.keyframe = clip.frame_at(e.timers.state_time);
    }

    // No clip means activation completes on the next tick.
    let finished = match clip {
        Some(clip) => clip.is_finished(e.timers.state_time),
        None => data.active,
    };
    if !finished {
        return None;
    }

    match data.kind {
        InteractableKind::Lever => {
            out.event(SimEvent::Particles {
                kind: ParticleKind::Interact,
                pos: e.pos,
            });
        }
        InteractableKind::Door => {
            out.event(SimEvent::Particles {
                kind: ParticleKind::Smoke,
                pos: e.pos,
            });
            e.dead = true;
        }
    }

    if let Some(data) = e.interactable.as_mut() {
        data.completed = true;
    }
    data.target
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::EntityId;
    use crate::entities::animation::{AnimationSet, Clip, PlayMode};
    use crate::entities::entity::EntityKind;
    use glam::Vec2;
    use std::sync::Arc;

    const DT: f32 = 1.0 / 60.0;

    fn lever(target: Option<u32>) -> Entity {
        let anims = AnimationSet::new().with_idle(Arc::new(Clip::strip(
            0.0,
            0.0,
            3,
            0.1,
            PlayMode::Once,
        )));
        Entity::new(EntityId(1), EntityKind::Interactable, Arc::new(anims))
            .with_pos(Vec2::new(40.0, 24.0))
            .with_interactable(InteractableData::new(InteractableKind::Lever, 1).with_target(target))
    }

    fn door() -> Entity {
        let anims = AnimationSet::new().with_idle(Arc::new(Clip::strip(
            1.0,
            0.0,
            2,
            0.1,
            PlayMode::Once,
        )));
        Entity::new(EntityId(2), EntityKind::Interactable, Arc::new(anims))
            .with_pos(Vec2::new(120.0, 24.0))
            .with_interactable(InteractableData::new(InteractableKind::Door, 2))
    }

    fn run_to_completion(e: &mut Entity, out: &mut Outbox) -> Option<u32> {
        for _ in 0..60 {
            if let Some(target) = update(e, DT, out) {
                return Some(target);
            }
            if e.interactable.map(|d| d.completed).unwrap_or(false) {
                break;
            }
        }
        None
    }

    #[test]
    fn idle_until_activated() {
        let mut e = lever(None);
        let mut out = Outbox::new();
        for _ in 0..30 {
            update(&mut e, DT, &mut out);
        }
        assert_eq!(e.keyframe, Some((0.0, 0.0)));
        assert!(!e.interactable.unwrap().completed);
        assert!(out.events.is_empty());
    }

    #[test]
    fn interact_is_idempotent() {
        let mut e = lever(None);
        assert!(interact(&mut e));
        assert!(!interact(&mut e));

        let mut out = Outbox::new();
        run_to_completion(&mut e, &mut out);
        assert!(e.interactable.unwrap().completed);
        assert!(!interact(&mut e));

        // Side effect fired exactly once.
        let particles = out
            .events
            .iter()
            .filter(|ev| matches!(ev, SimEvent::Particles { .. }))
            .count();
        assert_eq!(particles, 1);
    }

    #[test]
    fn completed_interactable_stays_inert() {
        let mut e = lever(None);
        interact(&mut e);
        let mut out = Outbox::new();
        run_to_completion(&mut e, &mut out);

        let before = out.events.len();
        for _ in 0..30 {
            assert_eq!(update(&mut e, DT, &mut out), None);
        }
        assert_eq!(out.events.len(), before);
        assert!(!e.dead);
    }

    #[test]
    fn door_removes_itself_with_smoke() {
        let mut e = door();
        interact(&mut e);
        let mut out = Outbox::new();
        run_to_completion(&mut e, &mut out);

        assert!(e.dead);
        assert!(out.events.iter().any(|ev| matches!(
            ev,
            SimEvent::Particles {
                kind: ParticleKind::Smoke,
                ..
            }
        )));
    }

    #[test]
    fn completion_reports_chain_target_once() {
        let mut e = lever(Some(7));
        interact(&mut e);
        let mut out = Outbox::new();
        assert_eq!(run_to_completion(&mut e, &mut out), Some(7));
        for _ in 0..10 {
            assert_eq!(update(&mut e, DT, &mut out), None);
        }
    }

    #[test]
    fn disabled_ignores_activation() {
        let mut e = lever(None);
        e.interactable = Some(
            InteractableData::new(InteractableKind::Lever, 1).with_disabled(true),
        );
        assert!(!interact(&mut e));
        let mut out = Outbox::new();
        for _ in 0..30 {
            assert_eq!(update(&mut e, DT, &mut out), None);
        }
        assert!(out.events.is_empty());
    }
}
