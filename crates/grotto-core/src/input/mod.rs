pub mod queue;

pub use queue::{Action, ActionState, InputEvent, InputQueue};
