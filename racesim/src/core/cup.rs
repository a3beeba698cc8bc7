use crate::core::car::ControllerKind;
use crate::core::track::{Track, TrackPars};
use crate::error::SetupError;
use crate::post::race_result::RaceResult;
use anyhow::Context;
use helpers::general::{argsort, SortOrder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// Money earned for the first three places of the total ranking.
pub const PODIUM_PAYOUTS: [i64; 3] = [1000, 500, 250];

pub const CUP_FILE: &str = "cup.json";

/// * `tracklist` - Track names in race order
/// * `tracks` - Parameters of every track, keyed by name
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CupPars {
    pub tracklist: Vec<String>,
    pub tracks: HashMap<String, TrackPars>,
}

/// RankingEntry is one car in the total ranking of a cup.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingEntry {
    pub name: String,
    pub controller: ControllerKind,
    pub score: f64,
}

/// Cup hands out its tracks in order and collects the results of the races driven on them.
#[derive(Debug, Clone)]
pub struct Cup {
    pub name: String,
    dir: PathBuf,
    pars: CupPars,
    current_index: usize,
    results: Vec<RaceResult>,
}

impl Cup {
    pub fn new(name: &str, dir: &Path, pars: CupPars) -> Cup {
        Cup {
            name: name.to_owned(),
            dir: dir.to_owned(),
            pars,
            current_index: 0,
            results: Vec::new(),
        }
    }

    /// load reads `<cups_dir>/<name>/cup.json`.
    pub fn load(cups_dir: &Path, name: &str) -> anyhow::Result<Cup> {
        let dir = cups_dir.join(name);
        if !dir.is_dir() {
            return Err(SetupError::UnknownCup(name.to_owned()).into());
        }

        let filepath = dir.join(CUP_FILE);
        let fh = OpenOptions::new()
            .read(true)
            .open(&filepath)
            .context(format!("Failed to open cup file {}!", filepath.display()))?;
        let pars: CupPars = serde_json::from_reader(&fh)
            .context(format!("Failed to parse cup file {}!", filepath.display()))?;

        Ok(Cup::new(name, &dir, pars))
    }

    /// list returns the names of all cups, i.e. all directories containing a cup file.
    pub fn list(cups_dir: &Path) -> anyhow::Result<Vec<String>> {
        let mut names = Vec::new();
        let entries = std::fs::read_dir(cups_dir)
            .context(format!("Failed to read cups directory {}!", cups_dir.display()))?;

        for entry in entries {
            let path = entry?.path();
            if path.join(CUP_FILE).is_file() {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    names.push(name.to_owned());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn track_names(&self) -> &[String] {
        &self.pars.tracklist
    }

    pub fn has_next_track(&self) -> bool {
        self.current_index < self.pars.tracklist.len()
    }

    /// load_track creates the track with the given name from the cup directory.
    pub fn load_track(&self, name: &str) -> Result<Track, SetupError> {
        let track_pars = self
            .pars
            .tracks
            .get(name)
            .ok_or_else(|| SetupError::UnknownTrack {
                cup: self.name.to_owned(),
                track: name.to_owned(),
            })?;
        Track::load(&self.dir, name, track_pars)
    }

    /// next_track loads the next track of the cup, or returns None after the last one.
    pub fn next_track(&mut self) -> Result<Option<Track>, SetupError> {
        if !self.has_next_track() {
            return Ok(None);
        }
        let name = self.pars.tracklist[self.current_index].to_owned();
        self.current_index += 1;
        self.load_track(&name).map(Some)
    }

    pub fn set_results_for_current_track(&mut self, result: RaceResult) {
        self.results.push(result);
    }

    /// total_ranking scores every car with the sum of position index times total time over all
    /// recorded races, lower is better. Cars are told apart by name and controller, so a player
    /// sharing a name with a computer car is ranked on its own. Best first.
    pub fn total_ranking(&self) -> Vec<RankingEntry> {
        let mut entries: Vec<RankingEntry> = Vec::new();

        for result in self.results.iter() {
            for (pos, entry) in result.entries.iter().enumerate() {
                let score = pos as f64 * entry.total_time;
                match entries
                    .iter_mut()
                    .find(|r| r.name == entry.name && r.controller == entry.controller)
                {
                    Some(ranked) => ranked.score += score,
                    None => entries.push(RankingEntry {
                        name: entry.name.to_owned(),
                        controller: entry.controller,
                        score,
                    }),
                }
            }
        }

        let scores: Vec<f64> = entries.iter().map(|r| r.score).collect();
        argsort(&scores, SortOrder::Ascending)
            .into_iter()
            .map(|i| entries[i].to_owned())
            .collect()
    }

    /// payout_for returns the podium money of the given car, if it is in the top three.
    pub fn payout_for(&self, name: &str, controller: ControllerKind) -> Option<i64> {
        self.total_ranking()
            .iter()
            .take(PODIUM_PAYOUTS.len())
            .position(|r| r.name == name && r.controller == controller)
            .map(|pos| PODIUM_PAYOUTS[pos])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::race_result::ResultEntry;

    fn entry(name: &str, total_time: f64) -> ResultEntry {
        ResultEntry {
            name: name.to_owned(),
            controller: ControllerKind::Computer,
            lap_times: vec![total_time],
            total_time,
            auto_completed: false,
        }
    }

    fn result(entries: Vec<ResultEntry>) -> RaceResult {
        RaceResult {
            track_name: "t".to_owned(),
            tot_no_laps: 1,
            entries,
        }
    }

    fn cup(tracklist: &[&str]) -> Cup {
        let pars = CupPars {
            tracklist: tracklist.iter().map(|s| s.to_string()).collect(),
            tracks: HashMap::new(),
        };
        Cup::new("test", Path::new("cups/test"), pars)
    }

    #[test]
    fn ranking_weights_position_with_time() {
        let mut cup = cup(&[]);
        cup.set_results_for_current_track(result(vec![
            entry("a", 10.0),
            entry("b", 11.0),
            entry("c", 12.0),
        ]));
        cup.set_results_for_current_track(result(vec![
            entry("c", 9.0),
            entry("a", 9.5),
            entry("b", 30.0),
        ]));

        // a: 0 + 9.5, b: 11 + 60, c: 24 + 0
        let ranking = cup.total_ranking();
        let names: Vec<&str> = ranking.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c", "b"]);
        assert_eq!(ranking[1].score, 24.0);

        assert_eq!(cup.payout_for("a", ControllerKind::Computer), Some(1000));
        assert_eq!(cup.payout_for("b", ControllerKind::Computer), Some(250));
        assert_eq!(cup.payout_for("a", ControllerKind::Human), None);
        assert_eq!(cup.payout_for("nobody", ControllerKind::Computer), None);
    }

    #[test]
    fn ranking_ties_keep_first_seen_order() {
        let mut cup = cup(&[]);
        cup.set_results_for_current_track(result(vec![entry("x", 5.0), entry("y", 0.0)]));
        let names: Vec<String> = cup.total_ranking().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["x", "y"]);
    }

    #[test]
    fn player_named_like_a_computer_car_is_ranked_separately() {
        let mut cup = cup(&[]);
        let player = ResultEntry {
            controller: ControllerKind::Human,
            ..entry("Brutus", 10.0)
        };
        cup.set_results_for_current_track(result(vec![
            entry("Rufus", 9.0),
            player.to_owned(),
            entry("Brutus", 12.0),
        ]));
        cup.set_results_for_current_track(result(vec![
            player,
            entry("Brutus", 11.0),
            entry("Rufus", 20.0),
        ]));

        // Rufus: 0 + 40, player Brutus: 10 + 0, computer Brutus: 24 + 11
        let ranking = cup.total_ranking();
        assert_eq!(ranking.len(), 3);
        assert_eq!(ranking[0].controller, ControllerKind::Human);
        assert_eq!(ranking[0].score, 10.0);
        assert_eq!(ranking[1].name, "Brutus");
        assert_eq!(ranking[1].controller, ControllerKind::Computer);
        assert_eq!(ranking[1].score, 35.0);

        assert_eq!(cup.payout_for("Brutus", ControllerKind::Human), Some(1000));
        assert_eq!(cup.payout_for("Brutus", ControllerKind::Computer), Some(500));
    }

    #[test]
    fn unknown_track_in_tracklist() {
        let mut cup = cup(&["missing"]);
        assert!(cup.has_next_track());
        assert!(matches!(
            cup.next_track(),
            Err(SetupError::UnknownTrack { .. })
        ));
        assert!(!cup.has_next_track());
        assert!(cup.next_track().unwrap().is_none());
    }

    #[test]
    fn unknown_cup_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = Cup::load(dir.path(), "nope").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SetupError>(),
            Some(SetupError::UnknownCup(_))
        ));
        assert!(Cup::list(dir.path()).unwrap().is_empty());
    }
}
