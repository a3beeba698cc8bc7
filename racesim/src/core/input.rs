use crate::core::ai;
use crate::core::race::Race;
use helpers::general::signum;
use serde::{Deserialize, Serialize};

/// ControlInput is the control intent of one car for one tick. Both directions are in {-1, 0, 1}:
/// reverse/none/forward and left/none/right.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlInput {
    pub accel_dir: i32,
    pub rot_dir: i32,
}

impl ControlInput {
    pub fn new(accel_dir: i32, rot_dir: i32) -> ControlInput {
        ControlInput {
            accel_dir: signum(accel_dir as f64),
            rot_dir: signum(rot_dir as f64),
        }
    }
}

/// InputSource supplies the player car's input. It is polled once per tick before the race is
/// advanced.
pub trait InputSource {
    fn poll(&mut self, race: &Race) -> ControlInput;
}

/// Autopilot drives the player car with the same heuristic as the computer cars.
#[derive(Debug, Clone, Copy, Default)]
pub struct Autopilot;

impl InputSource for Autopilot {
    fn poll(&mut self, race: &Race) -> ControlInput {
        ai::steer(race.player(), &race.track, race.consts())
    }
}

/// * `frames` - Number of ticks the input is held
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct TapeSegment {
    pub frames: u32,
    pub accel_dir: i32,
    pub rot_dir: i32,
}

/// InputTape replays recorded input segments and returns neutral input afterwards.
#[derive(Debug, Clone, Default)]
pub struct InputTape {
    segments: Vec<TapeSegment>,
    cur_segment: usize,
    cur_frame: u32,
}

impl InputTape {
    pub fn new(segments: Vec<TapeSegment>) -> InputTape {
        InputTape {
            segments,
            cur_segment: 0,
            cur_frame: 0,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.cur_segment >= self.segments.len()
    }

    fn next_input(&mut self) -> ControlInput {
        while let Some(segment) = self.segments.get(self.cur_segment) {
            if self.cur_frame < segment.frames {
                self.cur_frame += 1;
                return ControlInput::new(segment.accel_dir, segment.rot_dir);
            }
            self.cur_segment += 1;
            self.cur_frame = 0;
        }
        ControlInput::default()
    }
}

impl InputSource for InputTape {
    fn poll(&mut self, _race: &Race) -> ControlInput {
        self.next_input()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_is_normalized() {
        assert_eq!(ControlInput::new(5, -3), ControlInput::new(1, -1));
        assert_eq!(ControlInput::new(0, 0), ControlInput::default());
    }

    #[test]
    fn tape_replays_segments_in_order() {
        let mut tape = InputTape::new(vec![
            TapeSegment {
                frames: 2,
                accel_dir: 1,
                rot_dir: 0,
            },
            TapeSegment {
                frames: 0,
                accel_dir: -1,
                rot_dir: -1,
            },
            TapeSegment {
                frames: 1,
                accel_dir: 1,
                rot_dir: -1,
            },
        ]);

        let inputs: Vec<ControlInput> = (0..5).map(|_| tape.next_input()).collect();
        assert_eq!(
            inputs,
            vec![
                ControlInput::new(1, 0),
                ControlInput::new(1, 0),
                ControlInput::new(1, -1),
                ControlInput::default(),
                ControlInput::default(),
            ]
        );
        assert!(tape.is_exhausted());
    }
}
