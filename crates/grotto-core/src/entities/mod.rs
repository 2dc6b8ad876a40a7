pub mod animation;
pub mod boss;
pub mod enemy;
pub mod entity;
pub mod interactable;
pub mod movable;
pub mod player;
