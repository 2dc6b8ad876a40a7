//! The movement state machine shared by the player, enemies and the boss
//! body: standing / walking / jump wind-up / jump / falling / attacking /
//! death, with the timers that drive transitions and keyframe selection.
//!
//! Runs as free functions over the entity record; callers decide which
//! entities get which commands.

use crate::api::types::{Outbox, SimEvent, SoundKind};
use crate::entities::animation::AnimKey;
use crate::entities::entity::{Entity, EntityState, Facing};

/// Entering free fall requires a strongly negative vertical velocity, so
/// small integration jitter near zero does not flicker the state.
pub const FALL_VELOCITY_THRESHOLD: f32 = -50.0;

/// Below this horizontal speed a grounded entity snaps to standing and
/// its velocity is forced to exactly zero to prevent drift.
pub const STOP_SPEED_THRESHOLD: f32 = 10.0;

/// A fresh jump can't re-trigger the standing snap until the jump timer
/// has run this long past launch.
const JUMP_REARM_TIME: f32 = 0.2;

/// Advance the state machine by one fixed step.
///
/// Death pre-empts everything and is handled first. Falling is derived
/// from instantaneous velocity but sticky once entered; it clears through
/// the grounded standing snap below.
pub fn update(e: &mut Entity, dt: f32, out: &mut Outbox) {
    if e.suspended {
        return;
    }

    // State timer freezes once the entity is fully dead.
    if !e.dead {
        e.timers.state_time += dt;
    }

    // Horizontal clamp applies every step, whatever wrote the velocity.
    // Vertical is unclamped: free fall and missiles exceed the cap.
    let max = e.stats.max_horizontal_speed;
    e.vel.x = e.vel.x.clamp(-max, max);

    if e.state == EntityState::Death {
        e.timers.death_time += dt;
        let finished = match e.anims.die.as_ref() {
            Some(clip) => e.timers.death_time > clip.duration(),
            None => true,
        };
        if finished && !e.dead {
            e.dead = true;
            out.event(SimEvent::Died(e.id));
        }
        select_keyframe(e);
        e.last_state = e.state;
        return;
    }

    if e.vel.y < FALL_VELOCITY_THRESHOLD || e.state == EntityState::Falling {
        e.state = EntityState::Falling;
        e.timers.fall_time += dt;
    } else {
        e.timers.fall_time = 0.0;
    }

    if matches!(e.state, EntityState::Jump | EntityState::JumpWindup) {
        e.timers.jump_time += dt;
        if e.timers.jump_held {
            e.timers.jump_held_timer += dt;
        }
        if e.state == EntityState::JumpWindup {
            match e.anims.jump.as_ref() {
                // No wind-up clip: launch immediately, no bonus.
                None => {
                    e.vel.y = e.stats.jump_velocity;
                    e.state = EntityState::Jump;
                }
                Some(clip) if e.timers.jump_time > clip.duration() => {
                    let held = (e.timers.jump_held_timer / clip.duration()).min(1.0);
                    let bonus = held * e.stats.jump_bonus;
                    e.vel.y = e.stats.jump_velocity * (1.0 + bonus);
                    e.state = EntityState::Jump;
                }
                Some(_) => {}
            }
        }
    } else {
        e.timers.jump_time = 1.0;
    }

    if e.state != EntityState::JumpWindup
        && e.timers.jump_time >= JUMP_REARM_TIME
        && e.state != EntityState::Attacking
        && e.vel.x.abs() < STOP_SPEED_THRESHOLD
        && e.grounded
    {
        e.vel.x = 0.0;
        e.state = EntityState::Standing;
    }

    if e.state == EntityState::Attacking {
        e.timers.attack_time += dt;
        let finished = match e.anims.attack.as_ref() {
            Some(clip) => e.timers.attack_time > clip.duration(),
            None => true,
        };
        if finished {
            e.state = if e.vel.x.abs() > STOP_SPEED_THRESHOLD {
                EntityState::Walking
            } else {
                EntityState::Standing
            };
        }
    }

    // Restart the idle/move clip when (re)entering its state.
    if e.state == EntityState::Standing && e.last_state != EntityState::Standing {
        e.timers.state_time = 0.0;
    }
    if e.state == EntityState::Walking && e.last_state != EntityState::Walking {
        e.timers.state_time = 0.0;
    }

    select_keyframe(e);
    e.last_state = e.state;
}

/// Pick the keyframe for the current state. A state without a clip keeps
/// the previous keyframe (graceful degradation, never a crash).
fn select_keyframe(e: &mut Entity) {
    let (key, t) = match e.state {
        EntityState::Death => (AnimKey::Die, e.timers.death_time),
        EntityState::Falling => (AnimKey::Fall, e.timers.fall_time),
        EntityState::Jump | EntityState::JumpWindup => (AnimKey::Jump, e.timers.jump_time),
        EntityState::Attacking => (AnimKey::Attack, e.timers.attack_time),
        EntityState::Walking => (AnimKey::Move, e.timers.state_time),
        EntityState::Standing => (AnimKey::Idle, e.timers.state_time),
    };
    if let Some(frame) = e.anims.clip(key).and_then(|clip| clip.frame_at(t)) {
        e.keyframe = Some(frame);
    }
}

/// Horizontal move command: accelerate toward `facing` and enter walking
/// if grounded and not busy jumping or attacking.
pub fn move_command(e: &mut Entity, facing: Facing, speed: f32) {
    e.facing = facing;
    e.vel.x += facing.sign() * speed;

    if e.state != EntityState::JumpWindup
        && e.timers.jump_time >= JUMP_REARM_TIME
        && e.state != EntityState::Attacking
        && e.grounded
    {
        e.state = EntityState::Walking;
    }
}

/// Jump command: begins the wind-up if grounded and not already jumping
/// or attacking. Resets both the wind-up and held-input timers.
pub fn jump_command(e: &mut Entity, out: &mut Outbox) {
    if !matches!(
        e.state,
        EntityState::Jump | EntityState::JumpWindup | EntityState::Attacking
    ) && e.grounded
    {
        out.sound(SoundKind::Jump);
        e.timers.jump_time = 0.0;
        e.timers.jump_held_timer = 0.0;
        e.state = EntityState::JumpWindup;
    }
}

/// Attack command: only from standing or walking; locks movement until
/// the attack animation runs out.
pub fn attack_command(e: &mut Entity, out: &mut Outbox) {
    if matches!(e.state, EntityState::Standing | EntityState::Walking) {
        out.sound(SoundKind::Attack);
        e.timers.attack_time = 0.0;
        e.state = EntityState::Attacking;
    }
}

/// Explicit death trigger; pre-empts every other state.
pub fn kill(e: &mut Entity, out: &mut Outbox) {
    if e.state == EntityState::Death {
        return;
    }
    out.sound(SoundKind::Death);
    e.timers.death_time = 0.0;
    e.state = EntityState::Death;
}
