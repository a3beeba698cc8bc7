use crate::core::ai;
use crate::core::car::{ControllerKind, Vehicle};
use crate::core::collision::resolve_collisions;
use crate::core::input::ControlInput;
use crate::core::race_stats::{LapEvent, RaceStats};
use crate::core::track::Track;
use crate::interfaces::hud_interface::{CarHudState, RaceHudState};
use crate::post::race_result::{RaceResult, ResultEntry};
use helpers::general::ordinal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// SimConstants are the tuning constants of the simulation. All of them have defaults, so a
/// constants file only has to name the ones it changes.
///
/// * `forward_gain` - Acceleration gain when driving forward
/// * `reverse_gain` - Acceleration gain when driving in reverse
/// * `brake_gain` - Amplification of friction and brake slow down
/// * `rotation_speed` - (deg/s) Turn rate at full steering authority
/// * `full_turn_speed` - Speed from which on the car has full steering authority
/// * `car_scale` - Scale of the body dimensions on the track
/// * `start_countdown` - (s) Duration of the start sequence
/// * `results_delay` - (s) Time the other cars may race on after the player finished
/// * `unfinished_penalty` - (s) Added to the last finisher's time for cars that did not finish
/// * `max_race_time` - (s) Simulated time after which a race is abandoned
/// * `max_separation_steps` - Bound on the nudges per colliding pair and tick
/// * `sensor_angle` - (deg) Angle of the side probes of the AI
/// * `sensor_margin` - Distance of the AI probes in front of the body
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct SimConstants {
    pub forward_gain: f64,
    pub reverse_gain: f64,
    pub brake_gain: f64,
    pub rotation_speed: f64,
    pub full_turn_speed: f64,
    pub car_scale: f64,
    pub start_countdown: f64,
    pub results_delay: f64,
    pub unfinished_penalty: f64,
    pub max_race_time: f64,
    pub max_separation_steps: u32,
    pub sensor_angle: f64,
    pub sensor_margin: f64,
}

impl Default for SimConstants {
    fn default() -> Self {
        SimConstants {
            forward_gain: 2000.0,
            reverse_gain: 1000.0,
            brake_gain: 2000.0,
            rotation_speed: 150.0,
            full_turn_speed: 200.0,
            car_scale: 0.3,
            start_countdown: 3.0,
            results_delay: 5.0,
            unfinished_penalty: 30.0,
            max_race_time: 900.0,
            max_separation_steps: 10000,
            sensor_angle: 45.0,
            sensor_margin: 10.0,
        }
    }
}

impl SimConstants {
    /// directional_gain returns the acceleration gain for the sign of the acceleration input.
    pub fn directional_gain(&self, accel_sig: i32) -> f64 {
        match accel_sig {
            1 => self.forward_gain,
            -1 => self.reverse_gain,
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RacePhase {
    Starting,
    Running,
    Finished,
    ShowingResults,
}

/// Race owns the track, the cars and their race state. Exactly one car is player controlled.
#[derive(Debug)]
pub struct Race {
    pub track: Track,
    pub cars: Vec<Vehicle>,
    pub stats: Vec<RaceStats>,
    results: Vec<usize>,
    player_idx: usize,
    phase: RacePhase,
    countdown: f64,
    race_time: f64,
    t_after_player_finish: f64,
    consts: SimConstants,
    final_result: Option<RaceResult>,
}

impl Race {
    /// new places the cars on the starting grid in list order.
    ///
    /// Panics if there is not exactly one human controlled car or if there are more cars than
    /// grid slots.
    pub fn new(track: Track, mut cars: Vec<Vehicle>, consts: SimConstants) -> Race {
        let human_idxs: Vec<usize> = cars
            .iter()
            .enumerate()
            .filter(|(_, car)| car.is_human())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(
            human_idxs.len(),
            1,
            "A race needs exactly one player car, got {}!",
            human_idxs.len()
        );
        assert!(
            cars.len() <= track.start.len(),
            "Track {} has {} grid slots but {} cars were entered!",
            track.name,
            track.start.len(),
            cars.len()
        );

        for (car, slot) in cars.iter_mut().zip(track.start.iter()) {
            car.reset(slot.position, slot.rotation, consts.car_scale);
        }

        let no_cars = cars.len();
        info!(
            "Race on {} with {} cars over {} laps",
            track.name, no_cars, track.laps
        );

        Race {
            track,
            cars,
            stats: vec![RaceStats::default(); no_cars],
            results: Vec::with_capacity(no_cars),
            player_idx: human_idxs[0],
            phase: RacePhase::Starting,
            countdown: consts.start_countdown,
            race_time: 0.0,
            t_after_player_finish: 0.0,
            consts,
            final_result: None,
        }
    }

    // ---------------------------------------------------------------------------------------------
    // MAIN METHOD ---------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    /// update advances the race by one frame of `dt` seconds.
    pub fn update(&mut self, dt: f64) {
        match self.phase {
            RacePhase::Starting => {
                self.countdown -= dt;
                if self.countdown <= 0.0 {
                    self.countdown = 0.0;
                    self.set_phase(RacePhase::Running);
                }
            }
            RacePhase::Running | RacePhase::Finished => {
                self.race_time += dt;

                for idx in 0..self.cars.len() {
                    self.update_car(idx, dt);
                }

                // collision pass after all cars moved
                let no_collisions =
                    resolve_collisions(&mut self.cars, self.consts.max_separation_steps);
                if no_collisions > 0 {
                    debug!("Resolved {} collisions", no_collisions);
                }

                if self.phase == RacePhase::Finished {
                    self.t_after_player_finish += dt;
                    if self.all_finished()
                        || self.t_after_player_finish >= self.consts.results_delay
                    {
                        self.finalize();
                    }
                }
            }
            RacePhase::ShowingResults => {}
        }
    }

    // ---------------------------------------------------------------------------------------------
    // RACE SIMULATOR PARTS ------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    /// update_car runs the complete pipeline of one car: control, dynamics, checkpoints and laps.
    fn update_car(&mut self, idx: usize, dt: f64) {
        let car = &self.cars[idx];
        if car.controller == ControllerKind::Computer && !car.stopping {
            let input = ai::steer(car, &self.track, &self.consts);
            self.cars[idx].apply_input(input);
        }

        let car = &mut self.cars[idx];
        car.update(dt, &self.track, &self.consts);

        if self.stats[idx].finished {
            return;
        }

        let stage = self.track.checkpoint_stage_at(car.position);
        let event = self.stats[idx].advance(dt, stage, self.track.checkpoints, self.track.laps);

        match event {
            LapEvent::None => {}
            LapEvent::LapCompleted => {
                info!(
                    "{} completed a lap in {:.3}s, now in lap {}",
                    car.name,
                    self.stats[idx].lap_times.last().copied().unwrap_or(0.0),
                    self.stats[idx].lap
                );
            }
            LapEvent::Finished => {
                car.stop();
                self.results.push(idx);
                info!(
                    "{} finished {} with {:.3}s",
                    car.name,
                    ordinal(self.results.len()),
                    self.stats[idx].total_time()
                );

                if idx == self.player_idx {
                    info!(
                        "Player finished the race {}",
                        ordinal(self.results.len())
                    );
                    self.set_phase(RacePhase::Finished);
                }
            }
        }
    }

    /// finalize ranks the cars that did not finish behind the finishers and freezes the result.
    fn finalize(&mut self) {
        if self.final_result.is_some() {
            return;
        }

        let t_base = self
            .results
            .last()
            .map(|&idx| self.stats[idx].total_time())
            .unwrap_or(self.race_time);
        let t_unfinished = t_base + self.consts.unfinished_penalty;

        for idx in 0..self.cars.len() {
            if !self.stats[idx].finished {
                self.stats[idx].auto_complete(t_unfinished);
                self.cars[idx].stop();
                self.results.push(idx);
                debug!(
                    "{} did not finish, ranked with {:.3}s",
                    self.cars[idx].name, t_unfinished
                );
            }
        }

        let entries = self
            .results
            .iter()
            .map(|&idx| ResultEntry {
                name: self.cars[idx].name.to_owned(),
                controller: self.cars[idx].controller,
                lap_times: self.stats[idx].lap_times.to_owned(),
                total_time: self.stats[idx].total_time(),
                auto_completed: self.stats[idx].auto_completed,
            })
            .collect();

        self.final_result = Some(RaceResult {
            track_name: self.track.name.to_owned(),
            tot_no_laps: self.track.laps,
            entries,
        });
        self.set_phase(RacePhase::ShowingResults);
    }

    fn set_phase(&mut self, phase: RacePhase) {
        let legal = matches!(
            (self.phase, phase),
            (RacePhase::Starting, RacePhase::Running)
                | (RacePhase::Starting, RacePhase::ShowingResults)
                | (RacePhase::Running, RacePhase::Finished)
                | (RacePhase::Running, RacePhase::ShowingResults)
                | (RacePhase::Finished, RacePhase::ShowingResults)
        );
        assert!(
            legal,
            "Illegal race phase transition {:?} -> {:?}!",
            self.phase, phase
        );
        info!("Race phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    // ---------------------------------------------------------------------------------------------
    // METHODS (HELPERS) ---------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    /// set_player_input hands the player's control intent to the player car. It has no effect
    /// once the player car is stopping.
    pub fn set_player_input(&mut self, input: ControlInput) {
        self.cars[self.player_idx].apply_input(input);
    }

    /// abandon ends the race immediately, the remaining cars are ranked as not finished.
    pub fn abandon(&mut self) {
        self.finalize();
    }

    pub fn phase(&self) -> RacePhase {
        self.phase
    }

    pub fn countdown(&self) -> f64 {
        self.countdown
    }

    pub fn race_time(&self) -> f64 {
        self.race_time
    }

    pub fn consts(&self) -> &SimConstants {
        &self.consts
    }

    pub fn player_idx(&self) -> usize {
        self.player_idx
    }

    pub fn player(&self) -> &Vehicle {
        &self.cars[self.player_idx]
    }

    /// results_order returns the car indices in finish order.
    pub fn results_order(&self) -> &[usize] {
        &self.results
    }

    pub fn all_finished(&self) -> bool {
        self.stats.iter().all(|s| s.finished)
    }

    pub fn race_result(&self) -> Option<&RaceResult> {
        self.final_result.as_ref()
    }

    pub fn hud_state(&self) -> RaceHudState {
        RaceHudState {
            phase: self.phase,
            countdown: self.countdown,
            race_time: self.race_time,
            tot_no_laps: self.track.laps,
            player_idx: self.player_idx,
            car_states: self
                .cars
                .iter()
                .zip(self.stats.iter())
                .map(|(car, stats)| CarHudState {
                    name: car.name.to_owned(),
                    controller: car.controller,
                    x: car.position.x,
                    y: car.position.y,
                    rotation: car.rotation,
                    speed: car.speed,
                    lap: stats.lap,
                    finished: stats.finished,
                })
                .collect(),
            final_result: self.final_result.to_owned(),
        }
    }
}
