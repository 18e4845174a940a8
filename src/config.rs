use anyhow::{ensure, Context, Result};
use rand::{rngs::StdRng, SeedableRng};
use serde::Deserialize;
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use tracing::info;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct Settings {
    pub(crate) width: usize,
    pub(crate) height: usize,
    /// Chance of each cell starting alive. Clamped, not rejected.
    pub(crate) live_density: f64,
    /// Ticks with an unchanged population before the run stops.
    pub(crate) stable_generations: usize,
    /// Milliseconds per tick in the interactive view.
    pub(crate) speed: u64,
    /// Give up on a research run after this many generations.
    pub(crate) max_generations: u64,
    pub(crate) seed: Option<u64>,
    pub(crate) shapes_dir: PathBuf,
    pub(crate) save_path: PathBuf,
    pub(crate) load_path: PathBuf,
    pub(crate) data_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 60,
            height: 30,
            live_density: 0.3,
            stable_generations: 10,
            speed: 100,
            max_generations: 10_000,
            seed: None,
            shapes_dir: PathBuf::from("shapes"),
            save_path: PathBuf::from("outBoard.txt"),
            load_path: PathBuf::from("inBoard.txt"),
            data_path: PathBuf::from("stability_data.txt"),
        }
    }
}

impl Settings {
    pub(crate) fn validate(&self) -> Result<()> {
        ensure!(
            self.width > 0 && self.height > 0,
            "grid must be at least 1x1, got {}x{}",
            self.width,
            self.height
        );
        ensure!(
            self.stable_generations > 0,
            "stableGenerations must be at least 1"
        );
        Ok(())
    }

    /// Seeded from `seed` when set, from the OS otherwise.
    pub(crate) fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Reads settings from a JSON file. A missing file gives the defaults; an
/// unreadable or malformed one is an error.
pub(crate) fn load_settings(path: &Path) -> Result<Settings> {
    match fs::read_to_string(path) {
        Ok(s) => parse_settings(&s)
            .with_context(|| format!("malformed settings file {}", path.display())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "no settings file, using defaults");
            Ok(Settings::default())
        }
        Err(e) => Err(e).with_context(|| format!("could not read {}", path.display())),
    }
}

fn parse_settings(s: &str) -> Result<Settings> {
    Ok(serde_json::from_str::<Settings>(s)?)
}
