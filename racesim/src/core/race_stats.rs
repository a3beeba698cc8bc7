use tracing::debug;

/// Number of distinct checkpoint stages encoded in the overlay.
pub const CHECKPOINT_STAGE_TYPES: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LapEvent {
    None,
    LapCompleted,
    Finished,
}

/// RaceStats holds the running state of one car in one race.
///
/// * `lap` - Current lap number, starting at 1
/// * `current_lap_time` - (s) Time spent in the current lap
/// * `lap_times` - (s) Times of all completed laps
/// * `last_checkpoint_stage` - Stage observed in the previous tick, -1 before the first tick
/// * `checkpoints` - Checkpoint lines passed in this lap. It starts at -1 since the grid lies
/// before the finish line, and reversing through a checkpoint can push it below zero.
/// * `auto_completed` - True if the car was ranked without finishing
#[derive(Debug, Clone, PartialEq)]
pub struct RaceStats {
    pub lap: u32,
    pub current_lap_time: f64,
    pub lap_times: Vec<f64>,
    pub last_checkpoint_stage: i32,
    pub checkpoints: i32,
    pub finished: bool,
    pub auto_completed: bool,
    total_time_override: Option<f64>,
}

impl Default for RaceStats {
    fn default() -> Self {
        RaceStats {
            lap: 1,
            current_lap_time: 0.0,
            lap_times: Vec::new(),
            last_checkpoint_stage: -1,
            checkpoints: -1,
            finished: false,
            auto_completed: false,
            total_time_override: None,
        }
    }
}

impl RaceStats {
    /// observe_stage applies one checkpoint stage sample. Driving into the next stage counts a
    /// checkpoint when that stage is the line itself, re-entering an approach zone from anywhere
    /// else means driving the wrong way and takes one back.
    pub fn observe_stage(&mut self, stage: u8) {
        let stage = stage as i32;
        let next_stage = (self.last_checkpoint_stage + 1).rem_euclid(CHECKPOINT_STAGE_TYPES);

        if stage == next_stage {
            if stage == 2 {
                self.checkpoints += 1;
                debug!("Checkpoint passed, {} in this lap", self.checkpoints);
            }
        } else if stage != self.last_checkpoint_stage
            && self.last_checkpoint_stage > -1
            && stage == 1
        {
            self.checkpoints -= 1;
            debug!("Wrong way, {} checkpoints in this lap", self.checkpoints);
        }

        self.last_checkpoint_stage = stage;
    }

    /// advance runs the bookkeeping of one tick for an active car: stage transition, lap time and
    /// lap completion.
    pub fn advance(
        &mut self,
        dt: f64,
        stage: u8,
        total_checkpoints: u32,
        total_laps: u32,
    ) -> LapEvent {
        if self.finished {
            return LapEvent::None;
        }

        self.observe_stage(stage);
        self.current_lap_time += dt;

        if self.checkpoints != total_checkpoints as i32 {
            return LapEvent::None;
        }

        self.checkpoints = 0;
        self.lap_times.push(self.current_lap_time);
        self.current_lap_time = 0.0;

        if self.lap >= total_laps {
            self.finished = true;
            LapEvent::Finished
        } else {
            self.lap += 1;
            LapEvent::LapCompleted
        }
    }

    /// auto_complete ranks a car that did not finish with the given total time.
    pub fn auto_complete(&mut self, total_time: f64) {
        self.finished = true;
        self.auto_completed = true;
        self.total_time_override = Some(total_time);
    }

    /// total_time returns the sum of the lap times, or the assigned time of an auto-completed car.
    pub fn total_time(&self) -> f64 {
        self.total_time_override
            .unwrap_or_else(|| self.lap_times.iter().sum())
    }

    pub fn laps_completed(&self) -> usize {
        self.lap_times.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn trace(stats: &mut RaceStats, stages: &[u8]) -> Vec<i32> {
        stages
            .iter()
            .map(|&s| {
                stats.observe_stage(s);
                stats.checkpoints
            })
            .collect()
    }

    #[test]
    fn forward_driving_counts_each_line_once() {
        let mut stats = RaceStats::default();
        let t = trace(&mut stats, &[0, 0, 1, 1, 2, 2, 0, 1, 2, 0, 1, 2]);
        assert_eq!(t, vec![-1, -1, -1, -1, 0, 0, 0, 0, 1, 1, 1, 2]);
    }

    #[test]
    fn reversing_out_of_the_line_takes_one_back() {
        let mut stats = RaceStats::default();
        trace(&mut stats, &[0, 1, 2, 0, 1, 2]);
        assert_eq!(stats.checkpoints, 1);

        stats.observe_stage(1);
        assert_eq!(stats.checkpoints, 0);

        // 1 -> 0 and 0 -> 2 are neither forward nor counted as wrong way
        let t = trace(&mut stats, &[0, 2, 1]);
        assert_eq!(t, vec![0, 0, -1]);
    }

    #[test]
    fn first_sample_in_approach_zone_is_not_penalized() {
        let mut stats = RaceStats::default();
        let t = trace(&mut stats, &[1, 2]);
        assert_eq!(t, vec![-1, 0]);
    }

    #[test]
    fn back_and_forth_on_the_start_line() {
        // two checkpoints, one lap: the grid lies before the finish line
        let mut stats = RaceStats::default();
        let t = trace(&mut stats, &[0, 1, 2, 1, 2]);
        assert_eq!(t, vec![-1, -1, 0, -1, 0]);
    }

    #[test]
    fn back_and_forth_on_the_start_line_completes_no_lap() {
        let mut stats = RaceStats::default();
        let t: Vec<(i32, LapEvent)> = [0, 1, 2, 1, 2]
            .iter()
            .map(|&s| {
                let event = stats.advance(0.1, s, 2, 1);
                (stats.checkpoints, event)
            })
            .collect();

        assert_eq!(
            t,
            vec![
                (-1, LapEvent::None),
                (-1, LapEvent::None),
                (0, LapEvent::None),
                (-1, LapEvent::None),
                (0, LapEvent::None),
            ]
        );
        assert_eq!(stats.lap, 1);
        assert!(stats.lap_times.is_empty());
        assert!(!stats.finished);
        assert_relative_eq!(stats.current_lap_time, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn lap_completion_and_finish() {
        let mut stats = RaceStats::default();
        let stages = [0, 1, 2, 0, 1, 2, 0, 1, 2];
        let events: Vec<LapEvent> = stages
            .iter()
            .map(|&s| stats.advance(0.5, s, 2, 2))
            .collect();

        // first line crossing only brings the counter from -1 to 0
        assert_eq!(events[2], LapEvent::None);
        assert_eq!(events[5], LapEvent::None);
        assert_eq!(events[8], LapEvent::LapCompleted);
        assert_eq!(stats.lap, 2);
        assert_eq!(stats.checkpoints, 0);
        assert_eq!(stats.lap_times, vec![4.5]);
        assert_eq!(stats.current_lap_time, 0.0);

        let events: Vec<LapEvent> = [0, 1, 2, 0, 1, 2]
            .iter()
            .map(|&s| stats.advance(0.25, s, 2, 2))
            .collect();
        assert_eq!(events[5], LapEvent::Finished);
        assert!(stats.finished);
        assert_eq!(stats.lap, 2);
        assert_eq!(stats.laps_completed(), 2);
        assert_relative_eq!(stats.total_time(), 6.0);

        // finished cars are frozen
        assert_eq!(stats.advance(1.0, 1, 2, 2), LapEvent::None);
        assert_relative_eq!(stats.total_time(), 6.0);
    }

    #[test]
    fn auto_completed_time_overrides_lap_sum() {
        let mut stats = RaceStats::default();
        stats.lap_times.push(10.0);
        stats.auto_complete(42.0);
        assert!(stats.finished && stats.auto_completed);
        assert_eq!(stats.total_time(), 42.0);
    }
}
