use crate::core::car::ControllerKind;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::Path;

/// ResultEntry is one line of the final classification.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ResultEntry {
    pub name: String,
    pub controller: ControllerKind,
    pub lap_times: Vec<f64>,
    pub total_time: f64,
    pub auto_completed: bool,
}

/// RaceResult contains the classification of one race, entries in finish order.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RaceResult {
    pub track_name: String,
    pub tot_no_laps: u32,
    pub entries: Vec<ResultEntry>,
}

impl RaceResult {
    /// position_of returns the 0-based finishing position of the named car.
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }

    pub fn player_entry(&self) -> Option<(usize, &ResultEntry)> {
        self.entries
            .iter()
            .enumerate()
            .find(|(_, e)| e.controller == ControllerKind::Human)
    }

    fn format_table(&self) -> Result<String, std::fmt::Error> {
        let mut content = String::new();

        write!(&mut content, "pos, {:>10}, ", "name")?;
        for lap in 1..self.tot_no_laps as usize + 1 {
            write!(&mut content, "{:>8}, ", format!("lap {}", lap))?;
        }
        writeln!(&mut content, "{:>9}", "total")?;

        for (pos, entry) in self.entries.iter().enumerate() {
            write!(&mut content, "{:3}, {:>10}, ", pos + 1, entry.name)?;
            for lap in 0..self.tot_no_laps as usize {
                match entry.lap_times.get(lap) {
                    Some(t) => write!(&mut content, "{:7.3}s, ", t)?,
                    None => write!(&mut content, "{:>8}, ", "-")?,
                }
            }
            if entry.auto_completed {
                writeln!(&mut content, "{:8.3}s (not finished)", entry.total_time)?;
            } else {
                writeln!(&mut content, "{:8.3}s", entry.total_time)?;
            }
        }

        Ok(content)
    }

    /// print_lap_and_race_times prints the classification to the console output.
    pub fn print_lap_and_race_times(&self) {
        println!("RESULT: {}", self.track_name);
        match self.format_table() {
            Ok(table) => print!("{}", table),
            Err(e) => tracing::warn!("Could not format race result: {}", e),
        }
    }

    /// write_to_csv writes one row per car in finish order. Laps a car did not drive stay empty.
    pub fn write_to_csv(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .context(format!("Failed to create result directory {}!", dir.display()))?;
        }

        let mut writer = csv::Writer::from_path(path)
            .context(format!("Failed to open result file {}!", path.display()))?;

        let mut header = vec![
            "position".to_owned(),
            "name".to_owned(),
            "controller".to_owned(),
            "total_time".to_owned(),
            "auto_completed".to_owned(),
        ];
        header.extend((1..self.tot_no_laps + 1).map(|lap| format!("lap_{}", lap)));
        writer.write_record(&header)?;

        for (pos, entry) in self.entries.iter().enumerate() {
            let mut record = vec![
                (pos + 1).to_string(),
                entry.name.to_owned(),
                format!("{:?}", entry.controller),
                format!("{:.3}", entry.total_time),
                entry.auto_completed.to_string(),
            ];
            record.extend(
                (0..self.tot_no_laps as usize)
                    .map(|lap| entry.lap_times.get(lap).map_or(String::new(), |t| format!("{:.3}", t))),
            );
            writer.write_record(&record)?;
        }

        writer
            .flush()
            .context(format!("Failed to write result file {}!", path.display()))?;
        Ok(())
    }
}
