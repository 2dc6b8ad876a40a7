//! Runs the sandbox game headless for a few seconds of simulated time,
//! driving it with a scripted input tape and logging everything the
//! simulation reports. Useful for eyeballing determinism: two runs print
//! identical output.

mod game;

use grotto_core::{Action, GameRunner, InputEvent};

use crate::game::SandboxGame;

const FRAME_DT: f32 = 1.0 / 60.0;
const RUN_FRAMES: u32 = 600;

/// (frame, event) pairs fed to the runner; a crude replay tape.
const TAPE: &[(u32, InputEvent)] = &[
    (30, InputEvent::Pressed(Action::Right)),
    (150, InputEvent::Released(Action::Right)),
    (160, InputEvent::Pressed(Action::Up)),
    (185, InputEvent::Released(Action::Up)),
    (240, InputEvent::Pressed(Action::Interact)),
    (241, InputEvent::Released(Action::Interact)),
    (300, InputEvent::Pressed(Action::Attack)),
    (301, InputEvent::Released(Action::Attack)),
];

fn main() {
    pretty_env_logger::init();

    let mut runner = GameRunner::new(SandboxGame);
    for frame in 0..RUN_FRAMES {
        for (at, event) in TAPE {
            if *at == frame {
                runner.push_input(*event);
            }
        }

        runner.frame(FRAME_DT);

        let outbox = runner.outbox();
        for sound in &outbox.sounds {
            log::info!("frame {frame}: sound {sound:?}");
        }
        for event in &outbox.events {
            log::info!("frame {frame}: event {event:?}");
        }
    }

    let ctx = runner.context();
    log::info!(
        "done: {} entities alive, {} instances in the last frame",
        ctx.scene.len(),
        runner.render_buffer().instance_count()
    );
}
