//! Animation clips and per-entity animation sets.
//!
//! Clips are built once at startup and shared behind `Arc` — entities hold
//! references, never copies. An entity's `AnimationSet` maps each logical
//! state to an optional clip; a missing clip means the entity holds its
//! last keyframe for that state instead of crashing.

use std::sync::Arc;

/// An atlas cell (col, row), matching the sprite grid convention of the
/// rendering surface.
pub type Frame = (f32, f32);

/// How a clip behaves when its frame sequence runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayMode {
    /// Loop forever.
    Loop,
    /// Play once and hold the last frame, without ever reporting finished.
    OnceHold,
    /// Play once, hold the last frame, and report finished past the end.
    Once,
    /// Loop forever in reverse frame order.
    Reversed,
}

/// An ordered frame sequence with a fixed per-frame duration.
#[derive(Debug, Clone)]
pub struct Clip {
    pub frames: Vec<Frame>,
    pub frame_duration: f32,
    pub mode: PlayMode,
}

impl Clip {
    pub fn new(frames: Vec<Frame>, frame_duration: f32, mode: PlayMode) -> Self {
        Self {
            frames,
            frame_duration,
            mode,
        }
    }

    /// A horizontal strip of consecutive atlas columns on one row.
    pub fn strip(row: f32, start_col: f32, frame_count: u32, frame_duration: f32, mode: PlayMode) -> Self {
        let frames = (0..frame_count)
            .map(|i| (start_col + i as f32, row))
            .collect();
        Self::new(frames, frame_duration, mode)
    }

    /// Total duration of one pass through the frames.
    pub fn duration(&self) -> f32 {
        self.frame_duration * self.frames.len() as f32
    }

    /// The frame to display after `time` seconds in this clip.
    pub fn frame_at(&self, time: f32) -> Option<Frame> {
        if self.frames.is_empty() {
            return None;
        }
        let len = self.frames.len();
        let raw = (time / self.frame_duration).max(0.0) as usize;
        let index = match self.mode {
            PlayMode::Loop => raw % len,
            PlayMode::Reversed => len - 1 - (raw % len),
            PlayMode::Once | PlayMode::OnceHold => raw.min(len - 1),
        };
        Some(self.frames[index])
    }

    /// Whether the clip signals completion at `time`.
    /// Only `Once` clips ever finish; looping and hold modes do not.
    pub fn is_finished(&self, time: f32) -> bool {
        match self.mode {
            PlayMode::Once => time >= self.duration(),
            _ => false,
        }
    }
}

/// Logical animation states an entity can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimKey {
    Idle,
    Move,
    Jump,
    Fall,
    Attack,
    Die,
}

/// Per-entity mapping from logical state to a shared clip.
///
/// Immutable after construction; the player swaps whole sets when
/// capturing an enemy, but an entity never holds two sets at once.
#[derive(Debug, Clone, Default)]
pub struct AnimationSet {
    pub idle: Option<Arc<Clip>>,
    pub mov: Option<Arc<Clip>>,
    pub jump: Option<Arc<Clip>>,
    pub fall: Option<Arc<Clip>>,
    pub attack: Option<Arc<Clip>>,
    pub die: Option<Arc<Clip>>,
}

impl AnimationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A set that shows the same clip for every motion state.
    /// Used when the player takes over a captured enemy's look.
    pub fn uniform(clip: Arc<Clip>) -> Self {
        Self {
            idle: Some(clip.clone()),
            mov: Some(clip.clone()),
            jump: Some(clip.clone()),
            fall: Some(clip),
            attack: None,
            die: None,
        }
    }

    pub fn with_idle(mut self, clip: Arc<Clip>) -> Self {
        self.idle = Some(clip);
        self
    }

    pub fn with_move(mut self, clip: Arc<Clip>) -> Self {
        self.mov = Some(clip);
        self
    }

    pub fn with_jump(mut self, clip: Arc<Clip>) -> Self {
        self.jump = Some(clip);
        self
    }

    pub fn with_fall(mut self, clip: Arc<Clip>) -> Self {
        self.fall = Some(clip);
        self
    }

    pub fn with_attack(mut self, clip: Arc<Clip>) -> Self {
        self.attack = Some(clip);
        self
    }

    pub fn with_die(mut self, clip: Arc<Clip>) -> Self {
        self.die = Some(clip);
        self
    }

    pub fn clip(&self, key: AnimKey) -> Option<&Arc<Clip>> {
        match key {
            AnimKey::Idle => self.idle.as_ref(),
            AnimKey::Move => self.mov.as_ref(),
            AnimKey::Jump => self.jump.as_ref(),
            AnimKey::Fall => self.fall.as_ref(),
            AnimKey::Attack => self.attack.as_ref(),
            AnimKey::Die => self.die.as_ref(),
        }
    }
}
