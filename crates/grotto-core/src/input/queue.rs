//! Input plumbing: the embedding layer pushes raw press/release events
//! into a queue, and the runner drains them into per-frame action state.
//!
//! The simulation only ever reads `ActionState`; it never sees platform
//! key codes.

/// Logical game actions, already mapped from physical keys by the
/// embedding layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    Attack,
    Interact,
}

impl Action {
    const COUNT: usize = 6;

    fn index(self) -> usize {
        match self {
            Action::Up => 0,
            Action::Down => 1,
            Action::Left => 2,
            Action::Right => 3,
            Action::Attack => 4,
            Action::Interact => 5,
        }
    }
}

/// A raw input edge from the embedding layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Pressed(Action),
    Released(Action),
}

/// Buffer of input events awaiting the next frame.
#[derive(Debug, Default)]
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = InputEvent> + '_ {
        self.events.drain(..)
    }
}

/// Held / just-pressed state per action, rebuilt edge-by-edge each frame.
///
/// `just_pressed` reports presses that arrived since the last
/// `begin_frame`, so taps shorter than a frame still register.
#[derive(Debug, Default)]
pub struct ActionState {
    held: [bool; Action::COUNT],
    just: [bool; Action::COUNT],
}

impl ActionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the just-pressed edges; held state carries over.
    pub fn begin_frame(&mut self) {
        self.just = [false; Action::COUNT];
    }

    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::Pressed(action) => {
                if !self.held[action.index()] {
                    self.just[action.index()] = true;
                }
                self.held[action.index()] = true;
            }
            InputEvent::Released(action) => {
                self.held[action.index()] = false;
            }
        }
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held[action.index()]
    }

    pub fn just_pressed(&self, action: Action) -> bool {
        self.just[action.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_sets_held_and_just() {
        let mut s = ActionState::new();
        s.apply(InputEvent::Pressed(Action::Up));
        assert!(s.is_held(Action::Up));
        assert!(s.just_pressed(Action::Up));
    }

    #[test]
    fn just_pressed_clears_next_frame_while_held_persists() {
        let mut s = ActionState::new();
        s.apply(InputEvent::Pressed(Action::Attack));
        s.begin_frame();
        assert!(s.is_held(Action::Attack));
        assert!(!s.just_pressed(Action::Attack));
    }

    #[test]
    fn autorepeat_presses_do_not_retrigger_just() {
        let mut s = ActionState::new();
        s.apply(InputEvent::Pressed(Action::Right));
        s.begin_frame();
        s.apply(InputEvent::Pressed(Action::Right));
        assert!(!s.just_pressed(Action::Right));
    }

    #[test]
    fn release_then_press_retriggers() {
        let mut s = ActionState::new();
        s.apply(InputEvent::Pressed(Action::Interact));
        s.begin_frame();
        s.apply(InputEvent::Released(Action::Interact));
        s.apply(InputEvent::Pressed(Action::Interact));
        assert!(s.just_pressed(Action::Interact));
    }

    #[test]
    fn queue_drains_in_order() {
        let mut q = InputQueue::new();
        q.push(InputEvent::Pressed(Action::Left));
        q.push(InputEvent::Released(Action::Left));
        let events: Vec<_> = q.drain().collect();
        assert_eq!(
            events,
            vec![
                InputEvent::Pressed(Action::Left),
                InputEvent::Released(Action::Left)
            ]
        );
        assert_eq!(q.drain().count(), 0);
    }
}
