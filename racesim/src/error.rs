use crate::core::parts::PartKind;
use thiserror::Error;

/// SetupError covers everything that can go wrong while assembling cars, tracks and races from
/// the configuration data. These errors indicate broken data files and are not recoverable.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Cup {0} does not exist!")]
    UnknownCup(String),

    #[error("Track {track} not found in cup {cup}!")]
    UnknownTrack { cup: String, track: String },

    #[error("Unknown {kind} part {id}!")]
    UnknownPart { kind: PartKind, id: String },

    #[error("Malformed overlay image {path}: {reason}")]
    MalformedOverlay { path: String, reason: String },

    #[error("Starting grid of track {track} has {slots} slots, expected {expected}!")]
    BadGrid {
        track: String,
        slots: usize,
        expected: usize,
    },

    #[error("Insufficient funds, the balance after the purchase would be {0}!")]
    InsufficientFunds(i64),

    #[error("Profile {0} does not exist!")]
    UnknownProfile(String),

    #[error("Profile {0} already exists!")]
    DuplicateProfile(String),
}
