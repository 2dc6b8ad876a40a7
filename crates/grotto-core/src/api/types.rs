use glam::Vec2;

/// Unique identifier for an entity in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub u32);

/// Axis-aligned rectangle in world space, min-corner + size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Build a rect centered on `center` with the given half extents.
    pub fn from_center(center: Vec2, half: Vec2) -> Self {
        Self {
            x: center.x - half.x,
            y: center.y - half.y,
            w: half.x * 2.0,
            h: half.y * 2.0,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn top(&self) -> f32 {
        self.y + self.h
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.top()
            && other.y < self.top()
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.top()
    }
}

/// A one-shot sound cue emitted by the simulation.
/// The embedding layer maps these to actual audio playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundKind {
    Jump,
    Attack,
    Death,
    Laser,
}

/// Background music selection, requested once on level load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MusicKind {
    Descent,
    BossFight,
}

/// Particle burst kinds the simulation can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    /// Feedback burst when a lever finishes its throw.
    Interact,
    /// Puff when a door crumbles open.
    Smoke,
}

/// Side effects produced by a simulation step.
///
/// The core never calls into audio, particles or any other collaborator
/// directly; it records what happened and the embedding layer interprets
/// the queue after each frame. This also makes effects assertable in tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    /// Spawn a particle burst at a world position.
    Particles { kind: ParticleKind, pos: Vec2 },
    /// An entity was removed from the scene (death or self-removal).
    EntityRemoved(EntityId),
    /// An entity finished its death animation this step.
    Died(EntityId),
    /// A boss missile entity was spawned.
    MissileFired(EntityId),
    /// The boss transitioned to a new phase (`None` = script exhausted).
    BossPhaseChanged { phase: Option<&'static str> },
    /// The player fell off the stage with no ground below and was
    /// returned to the level spawn point.
    PlayerRespawned { pos: Vec2 },
    /// The player fell off the stage and was launched back onto the
    /// first solid span below their column.
    PlayerLaunched { pos: Vec2 },
    /// The player captured an enemy (animation sets swapped).
    Captured(EntityId),
    /// The player released a captured enemy.
    Released(EntityId),
    /// Background music requested (level load).
    Music(MusicKind),
}

/// Per-frame outbound queues: sounds and simulation events.
///
/// Cleared by the runner at the start of every rendered frame, so a frame
/// that runs multiple fixed steps delivers the union of their effects.
#[derive(Debug, Default)]
pub struct Outbox {
    pub sounds: Vec<SoundKind>,
    pub events: Vec<SimEvent>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sound(&mut self, kind: SoundKind) {
        self.sounds.push(kind);
    }

    pub fn event(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    pub fn clear(&mut self) {
        self.sounds.clear();
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_from_center_is_centered() {
        let r = Rect::from_center(Vec2::new(10.0, 20.0), Vec2::new(4.0, 8.0));
        assert_eq!(r.center(), Vec2::new(10.0, 20.0));
        assert_eq!(r.w, 8.0);
        assert_eq!(r.h, 16.0);
    }

    #[test]
    fn rect_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        let c = Rect::new(20.0, 20.0, 2.0, 2.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn touching_rects_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn outbox_clear_drops_both_queues() {
        let mut out = Outbox::new();
        out.sound(SoundKind::Jump);
        out.event(SimEvent::Died(EntityId(3)));
        out.clear();
        assert!(out.sounds.is_empty());
        assert!(out.events.is_empty());
    }
}
