//! Boss phase scripting.
//!
//! A boss runs a queue of phases; each phase is a small value-state
//! machine advanced once per tick until it reports completion, then the
//! next phase is popped. Phases never run concurrently and the script
//! only moves forward. Missile launches are returned as plain shot
//! records so the simulation step can spawn the projectile entities —
//! phases never touch the scene.

use std::collections::VecDeque;

use glam::Vec2;

use crate::api::types::{EntityId, Outbox, SimEvent, SoundKind};

/// Offset from the boss position to its mouth, where missiles appear.
pub const MOUTH_OFFSET: Vec2 = Vec2::new(-50.0, -10.0);

/// A missile launch requested by a phase this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MissileShot {
    pub pos: Vec2,
    pub vel: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseStatus {
    Active,
    Complete,
}

/// One scripted boss behavior. Phases are data, not callbacks: each
/// variant carries its own countdown state inline.
#[derive(Debug, Clone)]
pub enum BossPhase {
    /// Do nothing for a fixed time.
    Idle { duration: f32, elapsed: f32 },
    /// Fire a fixed number of aimed missiles on a fixed interval.
    /// The timer starts at one full interval, so the first shot comes
    /// after `interval` seconds, not immediately.
    MissileBarrage {
        shots_left: u32,
        interval: f32,
        timer: f32,
    },
}

impl BossPhase {
    pub fn idle(duration: f32) -> Self {
        Self::Idle {
            duration,
            elapsed: 0.0,
        }
    }

    pub fn missile_barrage(shots: u32, interval: f32) -> Self {
        Self::MissileBarrage {
            shots_left: shots,
            interval,
            timer: interval,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle { .. } => "idle",
            Self::MissileBarrage { .. } => "missile_barrage",
        }
    }

    /// Advance the phase one tick. Missile launches are appended to
    /// `shots`; a phase reports `Complete` on the same tick its work ends.
    pub fn advance(
        &mut self,
        boss_pos: Vec2,
        player_pos: Vec2,
        dt: f32,
        shots: &mut Vec<MissileShot>,
    ) -> PhaseStatus {
        match self {
            Self::Idle { duration, elapsed } => {
                *elapsed += dt;
                if *elapsed >= *duration {
                    PhaseStatus::Complete
                } else {
                    PhaseStatus::Active
                }
            }
            Self::MissileBarrage {
                shots_left,
                interval,
                timer,
            } => {
                *timer -= dt;
                if *timer <= 0.0 && *shots_left > 0 {
                    let pos = boss_pos + MOUTH_OFFSET;
                    // Aim by raw position delta; distant players get faster
                    // missiles, which is the point.
                    let vel = player_pos - pos;
                    shots.push(MissileShot { pos, vel });
                    *shots_left -= 1;
                    *timer = *interval;
                }
                if *shots_left == 0 {
                    PhaseStatus::Complete
                } else {
                    PhaseStatus::Active
                }
            }
        }
    }
}

/// The boss controller: its body entity plus the forward-only phase queue.
pub struct Boss {
    pub entity: EntityId,
    phase: Option<BossPhase>,
    queue: VecDeque<BossPhase>,
}

impl Boss {
    pub fn new(entity: EntityId) -> Self {
        Self {
            entity,
            phase: None,
            queue: VecDeque::new(),
        }
    }

    /// Append a phase to the end of the script.
    pub fn push_phase(&mut self, phase: BossPhase) {
        self.queue.push_back(phase);
    }

    pub fn current_phase(&self) -> Option<&BossPhase> {
        self.phase.as_ref()
    }

    /// Whether the script has run out of phases.
    pub fn is_idle(&self) -> bool {
        self.phase.is_none() && self.queue.is_empty()
    }

    /// Advance the boss script one tick. Completed phases hand over to the
    /// next queued phase on the same tick they finish; each handover (and
    /// script exhaustion) is reported once.
    pub fn update(
        &mut self,
        boss_pos: Vec2,
        player_pos: Vec2,
        dt: f32,
        out: &mut Outbox,
    ) -> Vec<MissileShot> {
        let mut shots = Vec::new();

        if self.phase.is_none() {
            if let Some(next) = self.queue.pop_front() {
                self.begin_phase(next, out);
            } else {
                return shots;
            }
        }

        if let Some(phase) = self.phase.as_mut() {
            if phase.advance(boss_pos, player_pos, dt, &mut shots) == PhaseStatus::Complete {
                match self.queue.pop_front() {
                    Some(next) => self.begin_phase(next, out),
                    None => {
                        self.phase = None;
                        log::debug!("boss script exhausted");
                        out.event(SimEvent::BossPhaseChanged { phase: None });
                    }
                }
            }
        }

        shots
    }

    fn begin_phase(&mut self, phase: BossPhase, out: &mut Outbox) {
        log::debug!("boss phase -> {}", phase.name());
        if matches!(phase, BossPhase::MissileBarrage { .. }) {
            out.sound(SoundKind::Laser);
        }
        out.event(SimEvent::BossPhaseChanged {
            phase: Some(phase.name()),
        });
        self.phase = Some(phase);
    }
}
