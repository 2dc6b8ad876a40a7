//! Patrolling enemies. An enemy walks in its facing direction and turns
//! around when it runs into a wall; everything else (gravity, state
//! machine, animation) is the shared movable logic.

use crate::api::types::Outbox;
use crate::entities::entity::{Entity, EntityState};
use crate::entities::movable;

pub fn update(e: &mut Entity, dt: f32, out: &mut Outbox) {
    if e.suspended || e.dead {
        return;
    }

    if e.state != EntityState::Death {
        // Turn at walls only while grounded; airborne wall contact (being
        // shoved mid-fall) doesn't flip the patrol.
        if e.body.hit_wall && e.grounded {
            e.facing = e.facing.flipped();
        }
        let facing = e.facing;
        let speed = e.stats.move_accel;
        movable::move_command(e, facing, speed);
    }

    movable::update(e, dt, out);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::EntityId;
    use crate::entities::animation::AnimationSet;
    use crate::entities::entity::{EntityKind, EntityState, Facing};
    use glam::Vec2;
    use std::sync::Arc;

    const DT: f32 = 1.0 / 60.0;

    fn enemy() -> Entity {
        Entity::new(EntityId(1), EntityKind::Enemy, Arc::new(AnimationSet::new()))
            .with_size(Vec2::new(16.0, 16.0))
            .with_facing(Facing::Left)
    }

    #[test]
    fn patrols_in_facing_direction() {
        let mut e = enemy();
        let mut out = Outbox::new();
        update(&mut e, DT, &mut out);
        assert!(e.vel.x < 0.0);
        assert_eq!(e.state, EntityState::Walking);
    }

    #[test]
    fn turns_around_at_walls_when_grounded() {
        let mut e = enemy();
        e.body.hit_wall = true;
        e.grounded = true;
        let mut out = Outbox::new();
        update(&mut e, DT, &mut out);
        assert_eq!(e.facing, Facing::Right);
        assert!(e.vel.x > 0.0);
    }

    #[test]
    fn airborne_wall_contact_keeps_facing() {
        let mut e = enemy();
        e.body.hit_wall = true;
        e.grounded = false;
        let mut out = Outbox::new();
        update(&mut e, DT, &mut out);
        assert_eq!(e.facing, Facing::Left);
    }

    #[test]
    fn suspended_enemy_does_not_move() {
        let mut e = enemy();
        e.suspended = true;
        let mut out = Outbox::new();
        update(&mut e, DT, &mut out);
        assert_eq!(e.vel, Vec2::ZERO);
        assert_eq!(e.timers.state_time, 0.0);
    }

    #[test]
    fn dying_enemy_stops_patrolling() {
        let mut e = enemy();
        let mut out = Outbox::new();
        movable::kill(&mut e, &mut out);
        update(&mut e, DT, &mut out);
        assert_eq!(e.state, EntityState::Death);
        assert_eq!(e.vel.x, 0.0);
    }
}
