use anyhow::Context;
use arcade_racesim::core::cup::Cup;
use arcade_racesim::core::handle_race::handle_race;
use arcade_racesim::core::input::{Autopilot, InputSource, InputTape, TapeSegment};
use arcade_racesim::core::parts::{PartCatalog, PartKind};
use arcade_racesim::core::race::{Race, RacePhase};
use arcade_racesim::core::session::{Profile, Session};
use arcade_racesim::core::shop::Shop;
use arcade_racesim::interfaces::hud_interface::RaceHudState;
use arcade_racesim::post::race_result::RaceResult;
use arcade_racesim::pre::profile_store::ProfileStore;
use arcade_racesim::pre::read_sim_pars::{read_input_tape, read_part_catalog, read_sim_constants};
use arcade_racesim::pre::sim_opts::SimOpts;
use clap::Parser;
use helpers::general::ordinal;
use std::thread;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// print_hud prints a one-line status of the player car.
fn print_hud(hud: &RaceHudState) {
    let Some(player) = hud.player() else {
        return;
    };
    match hud.phase {
        RacePhase::Starting => println!("HUD: start in {:.1}s", hud.countdown),
        RacePhase::Running | RacePhase::Finished => println!(
            "HUD: {:7.2}s, lap {}/{}, speed {:6.1}, position ({:6.1}, {:6.1}){}",
            hud.race_time,
            player.lap.min(hud.tot_no_laps),
            hud.tot_no_laps,
            player.speed,
            player.x,
            player.y,
            if player.finished { ", finished" } else { "" }
        ),
        RacePhase::ShowingResults => {
            if let Some(result) = &hud.final_result {
                if let Some((pos, _)) = result.player_entry() {
                    println!("HUD: race over, you finished {}", ordinal(pos + 1));
                }
            }
        }
    }
}

/// run_race simulates one race. With HUD updates the race runs in a separate thread in
/// real-time while the main thread prints the received states.
fn run_race(
    race: Race,
    input: &mut (dyn InputSource + Send),
    sim_opts: &SimOpts,
) -> anyhow::Result<RaceResult> {
    if !sim_opts.hud {
        return handle_race(race, input, sim_opts.timestep_size, None, 1.0);
    }

    let (tx, rx) = flume::unbounded();
    thread::scope(|s| {
        let sim = s.spawn(move || {
            handle_race(
                race,
                input,
                sim_opts.timestep_size,
                Some(&tx),
                sim_opts.realtime_factor,
            )
        });

        // the loop ends when the simulation thread drops the sender
        for hud in rx.iter() {
            print_hud(&hud);
        }

        sim.join()
            .map_err(|_| anyhow::anyhow!("Simulation thread panicked!"))?
    })
}

/// buy_parts runs the shop for the parts requested on the command line.
fn buy_parts(
    profile: &mut Profile,
    sim_opts: &SimOpts,
    catalog: &PartCatalog,
) -> anyhow::Result<bool> {
    let requests = [
        (PartKind::Body, &sim_opts.body),
        (PartKind::Engine, &sim_opts.engine),
        (PartKind::Tyres, &sim_opts.tyres),
    ];
    if requests.iter().all(|(_, id)| id.is_none()) {
        return Ok(false);
    }

    let mut shop = Shop::new(profile, catalog);
    for (kind, id) in requests.iter() {
        if let Some(id) = id {
            shop.select(*kind, id)?;
        }
    }
    info!(
        "Purchase costs {}, new balance would be {}",
        shop.cost()?,
        shop.new_balance()?
    );
    shop.commit()?;
    Ok(true)
}

fn main() -> anyhow::Result<()> {
    // PRE-PROCESSING ------------------------------------------------------------------------------
    // get simulation options from the command line arguments
    let sim_opts: SimOpts = SimOpts::parse();

    let default_level = if sim_opts.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    sim_opts
        .check()
        .context("Command line options out of range!")?;

    // get simulation parameters
    let catalog = read_part_catalog(&sim_opts.parts)?;
    let consts = read_sim_constants(sim_opts.constants.as_deref())?;
    let tape: Option<Vec<TapeSegment>> = match &sim_opts.input_tape {
        Some(path) => Some(read_input_tape(path)?),
        None => None,
    };

    let mut store = ProfileStore::open(&sim_opts.profiles)?;
    let mut profile = match store.load(&sim_opts.profile) {
        Ok(profile) => profile,
        Err(_) => {
            info!("Creating new profile {}", sim_opts.profile);
            store.create(&sim_opts.profile)?
        }
    };

    if buy_parts(&mut profile, &sim_opts, &catalog)? {
        store.save(&profile)?;
    }

    info!(
        "Available cups: {:?}",
        Cup::list(&sim_opts.cups_dir).unwrap_or_default()
    );
    let cup = Cup::load(&sim_opts.cups_dir, &sim_opts.cup)?;
    info!(
        "Driving cup {} ({} tracks) with a time step size of {:.3}s",
        cup.name,
        cup.track_names().len(),
        sim_opts.timestep_size
    );

    let mut session = Session::new(
        profile,
        catalog,
        cup,
        consts,
        sim_opts.opponents,
        sim_opts.seed,
    );

    // EXECUTION -----------------------------------------------------------------------------------
    while let Some(track) = session.cup.next_track()? {
        let track_name = track.name.to_owned();
        let race = session.build_race(track)?;

        let mut input: Box<dyn InputSource + Send> = match &tape {
            Some(segments) => Box::new(InputTape::new(segments.to_owned())),
            None => Box::new(Autopilot),
        };

        let t_start = Instant::now();
        let race_result = run_race(race, input.as_mut(), &sim_opts)?;
        info!("Execution time: {}ms", t_start.elapsed().as_millis());

        // POST-PROCESSING -------------------------------------------------------------------------
        race_result.print_lap_and_race_times();
        let csv_path = sim_opts
            .results_dir
            .join(format!("{}_{}.csv", session.cup.name, track_name));
        race_result.write_to_csv(&csv_path)?;
        info!("Result written to {}", csv_path.display());

        session.record_result(race_result);
    }

    println!("CUP RANKING: {}", session.cup.name);
    for (pos, ranked) in session.cup.total_ranking().iter().enumerate() {
        println!("{:3}, {:>10}, {:10.3}", pos + 1, ranked.name, ranked.score);
    }

    match session.finish_cup() {
        Some(payout) => println!(
            "{} earned {}, balance {}",
            session.profile.name, payout, session.profile.money
        ),
        None => println!("{} missed the podium", session.profile.name),
    }
    store.save(&session.profile)?;

    Ok(())
}
