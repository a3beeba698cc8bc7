use crate::core::input::InputSource;
use crate::core::race::{Race, RacePhase};
use crate::interfaces::hud_interface::{RaceHudState, MAX_HUD_UPDATE_FREQUENCY};
use crate::post::race_result::RaceResult;
use anyhow::Context;
use flume::Sender;
use std::thread::sleep;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// handle_race simulates the inserted race with a fixed time step until the results are shown,
/// and returns them for post-processing. The player car is driven by `input`.
///
/// If a sender is inserted, the race runs in real-time (scaled by `realtime_factor`) and HUD
/// snapshots are sent to the receiving view.
pub fn handle_race(
    mut race: Race,
    input: &mut dyn InputSource,
    timestep_size: f64,
    tx: Option<&Sender<RaceHudState>>,
    realtime_factor: f64,
) -> anyhow::Result<RaceResult> {
    let max_race_time = race.consts().max_race_time;
    let mut t_race_update_print = 0.0;
    let mut t_race_update_hud = f64::NEG_INFINITY;
    let mut last_printed_lap = 1;

    while race.phase() != RacePhase::ShowingResults {
        let t_start = Instant::now();

        let control = input.poll(&race);
        race.set_player_input(control);
        race.update(timestep_size);

        if race.race_time() > max_race_time && race.phase() != RacePhase::ShowingResults {
            warn!(
                "Race on {} exceeded {:.0}s of simulated time, abandoning it",
                race.track.name, max_race_time
            );
            race.abandon();
        }

        if race.race_time() > t_race_update_print + 0.9999 {
            let player = race.player();
            debug!(
                "Simulating... Current race time is {:.3}s, player at ({:.1}, {:.1}) with {:.1}",
                race.race_time(),
                player.position.x,
                player.position.y,
                player.speed
            );
            t_race_update_print = race.race_time();
        }

        let player_lap = race.stats[race.player_idx()].lap;
        if player_lap > last_printed_lap {
            info!("Player started lap {}", player_lap);
            last_printed_lap = player_lap;
        }

        if let Some(tx) = tx {
            // the countdown does not advance the race time, so the simulated time is used
            let t_sim = race.race_time() - race.countdown();
            if t_sim > t_race_update_hud + 1.0 / MAX_HUD_UPDATE_FREQUENCY - 0.001 {
                tx.send(race.hud_state())
                    .context("Failed to send race state to HUD!")?;
                t_race_update_hud = t_sim;
            }

            // sleep until time step is finished in real-time as well (calculation in ms)
            let t_sleep = (timestep_size * 1000.0 / realtime_factor) as i64
                - t_start.elapsed().as_millis() as i64;

            if t_sleep > 0 {
                sleep(Duration::from_millis(t_sleep as u64));
            } else {
                warn!("Could not keep up with real-time!")
            }
        }
    }

    // send final state including the result once
    if let Some(tx) = tx {
        tx.send(race.hud_state())
            .context("Failed to send final race result to HUD!")?;
    }

    race.race_result()
        .cloned()
        .context("Race ended without a result!")
}
