use crate::error::SetupError;
use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Ratio between track (world) pixels and overlay pixels.
pub const DOWNSAMPLE: usize = 4;
/// Number of starting positions every track must define.
pub const GRID_SLOTS: usize = 8;

pub const FRICTION_FALLBACK: u8 = 25;
pub const PATH_FALLBACK: u8 = 0;
pub const CHECKPOINT_STAGE_FALLBACK: u8 = 0;

// overlay channels
const CH_PATH: usize = 0;
const CH_CHECKPOINT: usize = 1;
const CH_FRICTION: usize = 2;

/// * `start` - Starting grid, one `[x, y, rotation]` entry per car slot
/// * `checkpoints` - Number of checkpoint lines per lap (the finish line included)
/// * `laps` - Number of laps of a race
/// * `overlay_image` - Overlay image path, relative to the cup directory
/// * `music` - (optional) Background music file
/// * `music_volume` - (optional) Background music volume
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TrackPars {
    pub start: Vec<[f64; 3]>,
    pub checkpoints: u32,
    pub laps: u32,
    pub overlay_image: PathBuf,
    #[serde(default)]
    pub music: Option<String>,
    #[serde(default)]
    pub music_volume: Option<f64>,
}

/// Overlay holds the decoded RGBA overlay image, rows from top to bottom.
#[derive(Debug, Clone)]
pub struct Overlay {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Overlay {
    pub fn from_rgba(width: usize, height: usize, data: Vec<u8>) -> Result<Overlay, SetupError> {
        if width == 0 || height == 0 || data.len() != width * height * 4 {
            return Err(SetupError::MalformedOverlay {
                path: "<memory>".to_owned(),
                reason: format!(
                    "expected {}x{} RGBA pixels, got {} bytes",
                    width,
                    height,
                    data.len()
                ),
            });
        }
        Ok(Overlay {
            width,
            height,
            data,
        })
    }

    /// from_fn builds an overlay by evaluating `f(column, row)` for every overlay pixel.
    pub fn from_fn<F>(width: usize, height: usize, f: F) -> Overlay
    where
        F: Fn(usize, usize) -> [u8; 4],
    {
        let mut data = Vec::with_capacity(width * height * 4);
        for row in 0..height {
            for col in 0..width {
                data.extend_from_slice(&f(col, row));
            }
        }
        Overlay {
            width,
            height,
            data,
        }
    }

    /// load decodes an overlay image file. Any decoding failure is a data defect.
    pub fn load(path: &Path) -> Result<Overlay, SetupError> {
        let img = image::open(path).map_err(|e| SetupError::MalformedOverlay {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        Overlay::from_rgba(width as usize, height as usize, rgba.into_raw()).map_err(|e| match e {
            SetupError::MalformedOverlay { reason, .. } => SetupError::MalformedOverlay {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn pixel(&self, col: usize, row: usize) -> Option<&[u8]> {
        if col >= self.width || row >= self.height {
            return None;
        }
        let pos = (row * self.width + col) * 4;
        self.data.get(pos..pos + 4)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSlot {
    pub position: DVec2,
    pub rotation: f64,
}

/// Track is the surface model of one race. World coordinates have their origin in the lower
/// left corner, y pointing up. The surface is DOWNSAMPLE times larger than the overlay.
#[derive(Debug, Clone)]
pub struct Track {
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub start: Vec<GridSlot>,
    pub checkpoints: u32,
    pub laps: u32,
    pub music: Option<String>,
    pub music_volume: Option<f64>,
    overlay: Overlay,
}

impl Track {
    pub fn new(name: &str, track_pars: &TrackPars, overlay: Overlay) -> Result<Track, SetupError> {
        if track_pars.start.len() != GRID_SLOTS {
            return Err(SetupError::BadGrid {
                track: name.to_owned(),
                slots: track_pars.start.len(),
                expected: GRID_SLOTS,
            });
        }

        let start = track_pars
            .start
            .iter()
            .map(|&[x, y, r]| GridSlot {
                position: DVec2::new(x, y),
                rotation: r.rem_euclid(360.0),
            })
            .collect();

        Ok(Track {
            name: name.to_owned(),
            width: (overlay.width() * DOWNSAMPLE) as f64,
            height: (overlay.height() * DOWNSAMPLE) as f64,
            start,
            checkpoints: track_pars.checkpoints,
            laps: track_pars.laps,
            music: track_pars.music.to_owned(),
            music_volume: track_pars.music_volume,
            overlay,
        })
    }

    /// load reads the overlay image relative to the cup directory and creates the track.
    pub fn load(cup_dir: &Path, name: &str, track_pars: &TrackPars) -> Result<Track, SetupError> {
        let overlay = Overlay::load(&cup_dir.join(&track_pars.overlay_image))?;
        Track::new(name, track_pars, overlay)
    }

    pub fn contains(&self, point: DVec2) -> bool {
        0.0 < point.x && point.x < self.width && 0.0 < point.y && point.y < self.height
    }

    fn overlay_pixel(&self, point: DVec2) -> Option<&[u8]> {
        if !self.contains(point) {
            return None;
        }
        let col = (point.x / DOWNSAMPLE as f64) as usize;
        let row = ((self.height - point.y) / DOWNSAMPLE as f64) as usize;
        self.overlay.pixel(col, row)
    }

    /// friction_at returns the surface friction in [0, 255]. 0 marks impassable terrain.
    pub fn friction_at(&self, point: DVec2) -> u8 {
        self.overlay_pixel(point)
            .map_or(FRICTION_FALLBACK, |px| px[CH_FRICTION])
    }

    /// path_value_at returns the ideal line indicator followed by the computer cars.
    pub fn path_value_at(&self, point: DVec2) -> u8 {
        self.overlay_pixel(point).map_or(PATH_FALLBACK, |px| px[CH_PATH])
    }

    /// checkpoint_stage_at returns 1 inside a checkpoint approach zone, 2 on a checkpoint line
    /// and 0 everywhere else.
    pub fn checkpoint_stage_at(&self, point: DVec2) -> u8 {
        match self.overlay_pixel(point).map(|px| px[CH_CHECKPOINT]) {
            Some(v) if 10 < v && v < 100 => 1,
            Some(v) if v > 125 => 2,
            _ => CHECKPOINT_STAGE_FALLBACK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pars() -> TrackPars {
        TrackPars {
            start: vec![[10.0, 10.0, 90.0]; GRID_SLOTS],
            checkpoints: 2,
            laps: 3,
            overlay_image: PathBuf::from("overlay.png"),
            music: None,
            music_volume: None,
        }
    }

    /// 10x5 overlay, the checkpoint channel counts up along the columns, the friction channel
    /// along the rows.
    fn track() -> Track {
        let overlay = Overlay::from_fn(10, 5, |col, row| {
            [col as u8 * 20, [0, 11, 99, 100, 125, 126, 255, 10, 50, 200][col], row as u8 * 50, 255]
        });
        Track::new("test", &pars(), overlay).unwrap()
    }

    #[test]
    fn surface_size_from_overlay() {
        let track = track();
        assert_eq!(track.width, 40.0);
        assert_eq!(track.height, 20.0);
        assert_eq!(track.start[0].rotation, 90.0);
    }

    #[test]
    fn vertical_axis_is_flipped() {
        let track = track();
        // top row of the overlay is the upper edge of the surface
        assert_eq!(track.friction_at(DVec2::new(1.0, 19.0)), 0);
        assert_eq!(track.friction_at(DVec2::new(1.0, 1.0)), 200);
        assert_eq!(track.friction_at(DVec2::new(1.0, 12.5)), 50);
        assert_eq!(track.path_value_at(DVec2::new(13.0, 5.0)), 60);
    }

    #[test]
    fn checkpoint_thresholds() {
        let track = track();
        let stages: Vec<u8> = (0..10)
            .map(|col| track.checkpoint_stage_at(DVec2::new(col as f64 * 4.0 + 2.0, 10.0)))
            .collect();
        assert_eq!(stages, vec![0, 1, 1, 0, 0, 2, 2, 0, 1, 2]);
    }

    #[test]
    fn out_of_bounds_fallbacks() {
        let track = track();
        for p in [
            DVec2::new(0.0, 10.0),
            DVec2::new(40.0, 10.0),
            DVec2::new(10.0, 0.0),
            DVec2::new(10.0, 20.0),
            DVec2::new(-5.0, -5.0),
            DVec2::new(1000.0, 3.0),
        ] {
            assert_eq!(track.friction_at(p), FRICTION_FALLBACK);
            assert_eq!(track.path_value_at(p), PATH_FALLBACK);
            assert_eq!(track.checkpoint_stage_at(p), CHECKPOINT_STAGE_FALLBACK);
        }
    }

    #[test]
    fn grid_must_have_eight_slots() {
        let mut pars = pars();
        pars.start.pop();
        let overlay = Overlay::from_fn(2, 2, |_, _| [0; 4]);
        assert!(matches!(
            Track::new("short", &pars, overlay),
            Err(SetupError::BadGrid { slots: 7, .. })
        ));
    }

    #[test]
    fn malformed_overlay_buffer() {
        assert!(Overlay::from_rgba(2, 2, vec![0; 15]).is_err());
        assert!(Overlay::from_rgba(0, 2, vec![]).is_err());
        assert!(Overlay::from_rgba(2, 2, vec![0; 16]).is_ok());
    }

    #[test]
    fn missing_overlay_file() {
        let err = Overlay::load(Path::new("does/not/exist.png")).unwrap_err();
        assert!(matches!(err, SetupError::MalformedOverlay { .. }));
    }
}
