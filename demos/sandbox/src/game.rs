//! A small demo game: one hand-written level with an enemy, a lever/door
//! pair, and a scripted boss.

use std::sync::Arc;

use grotto_core::{
    ActionState, AnimationSet, BossPhase, Clip, EngineContext, Game, GameConfig, Level,
    LevelAssets, PlayMode,
};

// The delimiter must outlast the quote-then-hash runs in the rows.
const LEVEL_JSON: &str = r###########"{
    "name": "grotto entrance",
    "tile_size": 16.0,
    "rows": [
        "................................",
        "................................",
        "................................",
        "..........o.....................",
        "........====....................",
        "................................",
        "......##........................",
        "######.......###########.#######"
    ],
    "player_spawn": [40.0, 32.0],
    "enemy_spawns": [
        { "pos": [200.0, 24.0], "facing_left": true }
    ],
    "interactable_spawns": [
        { "pos": [120.0, 28.0], "kind": "lever", "id": 1, "target": 2 },
        { "pos": [300.0, 28.0], "kind": "door", "id": 2 }
    ],
    "boss_spawn": { "pos": [440.0, 80.0] },
    "parallax_layers": [
        { "sprite": [8.0, 0.0], "size": [256.0, 128.0], "scroll_factor": [0.3, 0.9], "offset": [0.0, 72.0] },
        { "sprite": [8.0, 1.0], "size": [256.0, 128.0], "scroll_factor": [0.6, 0.95], "offset": [0.0, 56.0] }
    ],
    "music": "descent"
}"###########;

pub struct SandboxGame;

impl Game for SandboxGame {
    fn config(&self) -> GameConfig {
        GameConfig {
            view_width: 400.0,
            view_height: 240.0,
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        let level = match Level::from_json(LEVEL_JSON) {
            Ok(level) => level,
            Err(err) => {
                log::error!("level parse failed: {err}");
                return;
            }
        };
        ctx.load_level(level, demo_assets());

        if let Some(boss) = ctx.boss.as_mut() {
            boss.push_phase(BossPhase::idle(2.0));
            boss.push_phase(BossPhase::missile_barrage(5, 0.5));
            boss.push_phase(BossPhase::idle(1.0));
            boss.push_phase(BossPhase::missile_barrage(5, 0.5));
        }
    }

    fn update(&mut self, _ctx: &mut EngineContext, _actions: &ActionState) {}
}

/// Placeholder clips on a shared atlas; the real game ships its own.
fn demo_assets() -> LevelAssets {
    let player = AnimationSet::new()
        .with_idle(Arc::new(Clip::strip(0.0, 0.0, 2, 0.3, PlayMode::Loop)))
        .with_move(Arc::new(Clip::strip(0.0, 2.0, 4, 0.1, PlayMode::Loop)))
        .with_jump(Arc::new(Clip::strip(1.0, 0.0, 3, 0.1, PlayMode::OnceHold)))
        .with_fall(Arc::new(Clip::strip(1.0, 3.0, 2, 0.15, PlayMode::Loop)))
        .with_attack(Arc::new(Clip::strip(2.0, 0.0, 3, 0.08, PlayMode::OnceHold)))
        .with_die(Arc::new(Clip::strip(3.0, 0.0, 4, 0.15, PlayMode::Once)));
    let enemy = AnimationSet::new()
        .with_idle(Arc::new(Clip::strip(4.0, 0.0, 2, 0.4, PlayMode::Loop)))
        .with_move(Arc::new(Clip::strip(4.0, 2.0, 4, 0.12, PlayMode::Loop)))
        .with_die(Arc::new(Clip::strip(4.0, 6.0, 3, 0.1, PlayMode::Once)));
    let lever = AnimationSet::new()
        .with_idle(Arc::new(Clip::strip(5.0, 0.0, 4, 0.1, PlayMode::Once)));
    let door = AnimationSet::new()
        .with_idle(Arc::new(Clip::strip(5.0, 4.0, 4, 0.1, PlayMode::Once)));
    let boss = AnimationSet::new()
        .with_idle(Arc::new(Clip::strip(6.0, 0.0, 2, 0.5, PlayMode::Loop)));
    let missile = AnimationSet::new()
        .with_idle(Arc::new(Clip::strip(7.0, 0.0, 1, 1.0, PlayMode::Loop)));

    LevelAssets {
        player: Arc::new(player),
        enemy: Arc::new(enemy),
        lever: Arc::new(lever),
        door: Arc::new(door),
        boss: Arc::new(boss),
        missile: Arc::new(missile),
    }
}
