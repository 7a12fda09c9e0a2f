//! Rendering backend that presents nothing and feeds scripted input.

use anyhow::Result as AnyResult;
use sneaky_doctor_rendering::{FrameControl, FrameInput, Presentation, RenderingBackend, Scene};
use tracing::{debug, info};

use crate::script::KeyScript;

/// Runs frames as fast as possible, replaying a key script.
#[derive(Clone, Debug)]
pub(crate) struct HeadlessBackend {
    script: KeyScript,
    frames: u64,
}

impl HeadlessBackend {
    /// Creates a backend that stops after `frames` frames.
    pub(crate) fn new(script: KeyScript, frames: u64) -> Self {
        Self { script, frames }
    }
}

impl RenderingBackend for HeadlessBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> AnyResult<()>
    where
        F: FnMut(std::time::Duration, FrameInput, &mut Scene) -> FrameControl,
    {
        let Presentation {
            window_title,
            frame_duration,
            mut scene,
            ..
        } = presentation;
        info!(title = %window_title, frames = self.frames, "headless_run_started");

        let mut presented = 0_u64;
        while presented < self.frames {
            let input = FrameInput {
                pressed_keys: self.script.keys_at(presented).to_vec(),
            };
            let control = update_scene(frame_duration, input, &mut scene);
            presented += 1;
            debug!(
                frame = presented,
                sprites = scene.visible_in_draw_order().count(),
                "frame_presented"
            );
            if control == FrameControl::Exit {
                break;
            }
        }

        info!(frames = presented, level = scene.level, "headless_run_finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sneaky_doctor_core::{GameStats, Key};
    use sneaky_doctor_rendering::FLOOR_COLOR;

    use super::*;

    fn presentation() -> Presentation {
        let scene = Scene {
            level: 1,
            stats: GameStats::new_game(),
            sprites: Vec::new(),
        };
        Presentation::new("test", FLOOR_COLOR, 30, scene)
    }

    #[test]
    fn replays_the_script_frame_by_frame() {
        let script = KeyScript::parse("d*2,w*1").expect("script parses");
        let mut seen = Vec::new();

        HeadlessBackend::new(script, 4)
            .run(presentation(), |_, input, _| {
                seen.push(input.pressed_keys);
                FrameControl::Continue
            })
            .expect("run succeeds");

        assert_eq!(
            seen,
            vec![vec![Key::Right], vec![Key::Right], vec![Key::Up], Vec::new()]
        );
    }

    #[test]
    fn stops_when_asked_to_exit() {
        let mut frames = 0;

        HeadlessBackend::new(KeyScript::default(), 100)
            .run(presentation(), |_, _, scene| {
                frames += 1;
                scene.level = frames;
                if frames == 3 {
                    FrameControl::Exit
                } else {
                    FrameControl::Continue
                }
            })
            .expect("run succeeds");

        assert_eq!(frames, 3);
    }
}
