//! Drives a `Game` from the embedding layer: drains input, runs the
//! fixed-step simulation, and rebuilds the render buffer once per frame.

use crate::api::game::{Game, GameConfig, EngineContext, RenderContext};
use crate::core::time::FixedTimestep;
use crate::input::{ActionState, InputQueue};
use crate::renderer::instance::RenderBuffer;
use crate::systems::render::build_render_buffer;

pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    actions: ActionState,
    timestep: FixedTimestep,
    buffer: RenderBuffer,
    config: GameConfig,
    initialized: bool,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        Self {
            ctx: EngineContext::new(&config),
            input: InputQueue::new(),
            actions: ActionState::new(),
            timestep: FixedTimestep::new(config.fixed_dt),
            buffer: RenderBuffer::new(),
            config,
            initialized: false,
            game,
        }
    }

    /// Input events from the embedding layer; queued until the next frame.
    pub fn push_input(&mut self, event: crate::input::InputEvent) {
        self.input.push(event);
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut EngineContext {
        &mut self.ctx
    }

    pub fn render_buffer(&self) -> &RenderBuffer {
        &self.buffer
    }

    /// Sounds and events produced since the start of this frame.
    pub fn outbox(&self) -> &crate::api::types::Outbox {
        &self.ctx.outbox
    }

    /// Advance one rendered frame. Runs as many fixed simulation ticks as
    /// `frame_dt` earns (possibly zero), then rebuilds the render buffer.
    /// The outbox is cleared at the start of the frame, so after this call
    /// it holds the union of this frame's effects.
    pub fn frame(&mut self, frame_dt: f32) {
        self.ctx.outbox.clear();

        if !self.initialized {
            self.game.init(&mut self.ctx);
            self.initialized = true;
        }

        // Input edges apply once per frame, whatever the tick count.
        self.actions.begin_frame();
        for event in self.input.drain() {
            self.actions.apply(event);
        }

        let steps = self.timestep.accumulate(frame_dt);
        let dt = self.timestep.dt();
        for _ in 0..steps {
            self.game.update(&mut self.ctx, &self.actions);
            self.ctx.step_sim(&self.actions, dt);
        }

        if let Some(level) = self.ctx.level.as_ref() {
            build_render_buffer(
                &self.ctx.scene,
                &level.grid,
                &level.parallax_layers,
                &self.ctx.camera,
                &mut self.buffer,
            );
            if self.buffer.instance_count() as usize > self.config.max_instances {
                log::warn!(
                    "render buffer overflow: {} instances (max {})",
                    self.buffer.instance_count(),
                    self.config.max_instances
                );
            }
        }

        let mut render_ctx = RenderContext {
            render_buffer: &mut self.buffer,
            camera: &self.ctx.camera,
        };
        self.game.render(&mut render_ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::game::LevelAssets;
    use crate::api::types::SimEvent;
    use crate::input::{Action, InputEvent};
    use crate::level::{Level, LevelDescriptor};

    struct TestGame {
        init_count: u32,
        update_count: u32,
    }

    impl TestGame {
        fn new() -> Self {
            Self {
                init_count: 0,
                update_count: 0,
            }
        }
    }

    impl Game for TestGame {
        fn init(&mut self, ctx: &mut EngineContext) {
            self.init_count += 1;
            let level = Level::from_descriptor(LevelDescriptor {
                name: "runner test".into(),
                tile_size: 16.0,
                rows: vec!["................".into(), "################".into()],
                player_spawn: [40.0, 31.0],
                enemy_spawns: Vec::new(),
                interactable_spawns: Vec::new(),
                boss_spawn: None,
                parallax_layers: Vec::new(),
                music: None,
            });
            ctx.load_level(level, LevelAssets::default());
        }

        fn update(&mut self, _ctx: &mut EngineContext, _actions: &ActionState) {
            self.update_count += 1;
        }
    }

    #[test]
    fn init_runs_once_before_the_first_tick() {
        let mut runner = GameRunner::new(TestGame::new());
        runner.frame(1.0 / 60.0);
        runner.frame(1.0 / 60.0);
        assert_eq!(runner.game.init_count, 1);
        assert_eq!(runner.game.update_count, 2);
    }

    #[test]
    fn short_frame_earns_no_tick() {
        let mut runner = GameRunner::new(TestGame::new());
        runner.frame(0.001);
        assert_eq!(runner.game.update_count, 0);
        // Leftover time carries into the next frame.
        runner.frame(0.016);
        assert_eq!(runner.game.update_count, 1);
    }

    #[test]
    fn long_frame_runs_multiple_ticks() {
        let mut runner = GameRunner::new(TestGame::new());
        runner.frame(4.0 / 60.0 + 1e-4);
        assert_eq!(runner.game.update_count, 4);
    }

    #[test]
    fn frame_builds_render_instances() {
        let mut runner = GameRunner::new(TestGame::new());
        runner.frame(1.0 / 60.0);
        // Floor tiles are in view even though the player has no keyframe.
        assert!(runner.render_buffer().instance_count() > 0);
    }

    #[test]
    fn outbox_spans_one_frame() {
        let mut runner = GameRunner::new(TestGame::new());
        runner.frame(1.0 / 60.0);
        runner.push_input(InputEvent::Pressed(Action::Up));
        runner.frame(1.0 / 60.0);
        // Jump sound emitted this frame.
        assert!(!runner.outbox().sounds.is_empty());
        runner.push_input(InputEvent::Released(Action::Up));
        runner.frame(1.0 / 60.0);
        assert!(runner.outbox().sounds.is_empty());
    }

    #[test]
    fn respawn_event_reaches_the_outbox() {
        let mut runner = GameRunner::new(TestGame::new());
        runner.frame(1.0 / 60.0);
        // Teleport the player into the void below the stage.
        let player_id = runner.context().player.as_ref().unwrap().id;
        runner
            .context_mut()
            .scene
            .get_mut(player_id)
            .unwrap()
            .set_position(glam::Vec2::new(-100.0, -200.0));

        runner.frame(1.0 / 60.0);
        assert!(runner
            .outbox()
            .events
            .iter()
            .any(|ev| matches!(ev, SimEvent::PlayerRespawned { .. })));
    }
}
