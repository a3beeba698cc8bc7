use crate::core::car::ControllerKind;
use crate::core::race::RacePhase;
use crate::post::race_result::RaceResult;

pub const MAX_HUD_UPDATE_FREQUENCY: f64 = 20.0;

#[derive(Debug, Clone)]
pub struct CarHudState {
    pub name: String,
    pub controller: ControllerKind,
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub speed: f64,
    pub lap: u32,
    pub finished: bool,
}

/// RaceHudState is the snapshot an external view needs to draw one frame of the race.
#[derive(Debug, Clone)]
pub struct RaceHudState {
    pub phase: RacePhase,
    pub countdown: f64,
    pub race_time: f64,
    pub tot_no_laps: u32,
    pub player_idx: usize,
    pub car_states: Vec<CarHudState>,

    // final results payload (sent once when the results are shown)
    pub final_result: Option<RaceResult>,
}

impl RaceHudState {
    pub fn player(&self) -> Option<&CarHudState> {
        self.car_states.get(self.player_idx)
    }
}
