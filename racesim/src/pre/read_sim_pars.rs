use crate::core::input::TapeSegment;
use crate::core::parts::{PartCatalog, PartCatalogPars};
use crate::core::race::SimConstants;
use anyhow::Context;
use serde::de::DeserializeOwned;
use std::fs::OpenOptions;
use std::path::Path;

/// read_json opens the file and decodes its JSON content. `what` names the file in the error
/// context, e.g. "part catalog".
fn read_json<T: DeserializeOwned>(filepath: &Path, what: &str) -> anyhow::Result<T> {
    let fh = OpenOptions::new()
        .read(true)
        .open(filepath)
        .context(format!(
            "Failed to open {} file {}!",
            what,
            filepath.display()
        ))?;
    let pars = serde_json::from_reader(&fh).context(format!(
        "Failed to parse {} file {}!",
        what,
        filepath.display()
    ))?;
    Ok(pars)
}

/// read_part_catalog reads the JSON part file and builds the price sorted catalog from it.
pub fn read_part_catalog(filepath: &Path) -> anyhow::Result<PartCatalog> {
    let pars: PartCatalogPars = read_json(filepath, "part catalog")?;
    Ok(PartCatalog::new(pars))
}

/// read_sim_constants reads the simulation constants. Constants missing in the file keep their
/// defaults, no file at all means all defaults.
pub fn read_sim_constants(filepath: Option<&Path>) -> anyhow::Result<SimConstants> {
    match filepath {
        Some(filepath) => read_json(filepath, "simulation constants"),
        None => Ok(SimConstants::default()),
    }
}

/// read_input_tape reads a recorded list of input segments.
pub fn read_input_tape(filepath: &Path) -> anyhow::Result<Vec<TapeSegment>> {
    read_json(filepath, "input tape")
}
