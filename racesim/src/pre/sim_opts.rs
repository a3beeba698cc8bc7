use clap::Parser;
use helpers::general::InputValueError;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[clap(
    version = "0.1.0",
    name = "RCr",
    about = "A top-down arcade race simulator written in Rust"
)]
pub struct SimOpts {
    // FLAGS ---------------------------------------------------------------------------------------
    /// Activate debug printing
    #[clap(short, long)]
    pub debug: bool,

    /// Print HUD updates - races are simulated in real-time
    #[clap(long)]
    pub hud: bool,

    // OPTIONS -------------------------------------------------------------------------------------
    /// Set path to the directory containing the cups
    #[clap(long, default_value = "input/cups")]
    pub cups_dir: PathBuf,

    /// Set name of the cup to drive
    #[clap(short, long, default_value = "classic")]
    pub cup: String,

    /// Set path to the part catalog file
    #[clap(long, default_value = "input/parts.json")]
    pub parts: PathBuf,

    /// Set path to a simulation constants file (OPTIONAL: defaults are used if not set)
    #[clap(long)]
    pub constants: Option<PathBuf>,

    /// Set path to the profile file
    #[clap(long, default_value = "output/profiles.json")]
    pub profiles: PathBuf,

    /// Set name of the player profile, it is created if it does not exist
    #[clap(short, long, default_value = "player")]
    pub profile: String,

    /// Set number of computer controlled opponents, should be in the range [0, 7]
    #[clap(short, long, default_value = "2")]
    pub opponents: usize,

    /// Set simulation timestep size in seconds, should be in the range [0.001, 1.0]
    #[clap(short, long, default_value = "0.02")]
    pub timestep_size: f64,

    /// Set real-time factor (only relevant with HUD updates)
    #[clap(short, long, default_value = "1.0")]
    pub realtime_factor: f64,

    /// Set path to an input tape for the player car (OPTIONAL: autopilot drives if not set)
    #[clap(short, long)]
    pub input_tape: Option<PathBuf>,

    /// Set seed for the opponent selection
    #[clap(long)]
    pub seed: Option<u64>,

    /// Set path to the directory the result CSV files are written to
    #[clap(long, default_value = "output/results")]
    pub results_dir: PathBuf,

    /// Buy this body before the cup
    #[clap(long)]
    pub body: Option<String>,

    /// Buy this engine before the cup
    #[clap(long)]
    pub engine: Option<String>,

    /// Buy these tyres before the cup
    #[clap(long)]
    pub tyres: Option<String>,
}

impl SimOpts {
    /// check returns an error if an option is outside of its allowed range.
    pub fn check(&self) -> Result<(), InputValueError> {
        if !(0.001..=1.0).contains(&self.timestep_size)
            || self.realtime_factor <= 0.0
            || self.opponents > 7
        {
            return Err(InputValueError);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let opts = SimOpts::parse_from(["rcr"]);
        assert!(opts.check().is_ok());
        assert_eq!(opts.cup, "classic");
        assert_eq!(opts.opponents, 2);
        assert!(opts.input_tape.is_none());
    }

    #[test]
    fn out_of_range_options() {
        let opts = SimOpts::parse_from(["rcr", "--timestep-size", "2.0"]);
        assert!(opts.check().is_err());

        let opts = SimOpts::parse_from(["rcr", "--opponents", "8"]);
        assert!(opts.check().is_err());

        let opts = SimOpts::parse_from(["rcr", "--engine", "turbo", "--seed", "7"]);
        assert!(opts.check().is_ok());
        assert_eq!(opts.engine.as_deref(), Some("turbo"));
        assert_eq!(opts.seed, Some(7));
    }
}
