use crate::core::car::{ControllerKind, Vehicle, VehicleConfig};
use crate::core::cup::Cup;
use crate::core::parts::PartCatalog;
use crate::core::race::{Race, SimConstants};
use crate::core::track::{Track, GRID_SLOTS};
use crate::error::SetupError;
use crate::post::race_result::RaceResult;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Names handed out to the computer controlled cars.
pub const COMPUTER_NAMES: [&str; 7] = [
    "Brutus", "Rufus", "Gunther", "Grossini", "Helmut", "Angus", "Fred",
];

pub const DEFAULT_NO_OPPONENTS: usize = 2;

/// Profile is the persistent state of one player: the equipped parts and the money balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub car: VehicleConfig,
    #[serde(default)]
    pub money: i64,
}

impl Profile {
    pub fn new(name: &str) -> Profile {
        Profile {
            name: name.to_owned(),
            car: VehicleConfig::default(),
            money: 0,
        }
    }
}

/// Session is the context a cup is driven in. Everything race construction needs is passed in
/// through it.
#[derive(Debug)]
pub struct Session {
    pub profile: Profile,
    pub catalog: PartCatalog,
    pub cup: Cup,
    pub opponents: Vec<String>,
    pub consts: SimConstants,
}

impl Session {
    /// new draws the opponent names without repetition. The number of opponents is capped by the
    /// available names and the grid slots left next to the player.
    pub fn new(
        profile: Profile,
        catalog: PartCatalog,
        cup: Cup,
        consts: SimConstants,
        no_opponents: usize,
        seed: Option<u64>,
    ) -> Session {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let no_opponents = no_opponents.min(COMPUTER_NAMES.len()).min(GRID_SLOTS - 1);
        let opponents: Vec<String> = COMPUTER_NAMES
            .choose_multiple(&mut rng, no_opponents)
            .map(|name| name.to_string())
            .collect();

        info!(
            "Session for {} in cup {} against {:?}",
            profile.name, cup.name, opponents
        );

        Session {
            profile,
            catalog,
            cup,
            opponents,
            consts,
        }
    }

    /// build_race assembles the player car from the profile and the opponents with the default
    /// configuration. The player starts from the first grid slot.
    pub fn build_race(&self, track: Track) -> Result<Race, SetupError> {
        let mut cars = Vec::with_capacity(self.opponents.len() + 1);
        cars.push(Vehicle::from_config(
            &self.profile.name,
            &self.profile.car,
            &self.catalog,
            ControllerKind::Human,
        )?);

        let opponent_config = VehicleConfig::default();
        for name in self.opponents.iter() {
            cars.push(Vehicle::from_config(
                name,
                &opponent_config,
                &self.catalog,
                ControllerKind::Computer,
            )?);
        }

        Ok(Race::new(track, cars, self.consts.to_owned()))
    }

    pub fn record_result(&mut self, result: RaceResult) {
        self.cup.set_results_for_current_track(result);
    }

    /// finish_cup adds the player's podium payout to the profile and returns it.
    pub fn finish_cup(&mut self) -> Option<i64> {
        let payout = self.cup.payout_for(&self.profile.name, ControllerKind::Human)?;
        self.profile.money += payout;
        info!(
            "{} earned {} in cup {}, balance is now {}",
            self.profile.name, payout, self.cup.name, self.profile.money
        );
        Some(payout)
    }
}
