use crate::research::StabilityPoint;
use anyhow::{Context, Result};
use std::{fmt::Write as _, fs, path::Path, str::FromStr};
use torus_life::Grid;

/// Writes the grid as snapshot text, replacing `path` atomically.
pub(crate) fn save_snapshot(path: &Path, grid: &Grid) -> Result<()> {
    write_atomic(path, grid.to_string().as_bytes())
        .with_context(|| format!("could not save snapshot to {}", path.display()))
}

/// Overlays a snapshot file onto an existing grid.
pub(crate) fn load_snapshot(path: &Path, grid: &mut Grid) -> Result<()> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("could not read snapshot {}", path.display()))?;
    grid.load_text(&text);
    Ok(())
}

/// A grid sized to fit a snapshot file.
pub(crate) fn read_snapshot(path: &Path) -> Result<Grid> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("could not read snapshot {}", path.display()))?;
    Grid::from_str(&text).with_context(|| format!("bad snapshot {}", path.display()))
}

/// One `density;generations` line per point, density to two places.
pub(crate) fn save_stability_data(path: &Path, points: &[StabilityPoint]) -> Result<()> {
    let mut data = String::new();
    for p in points {
        writeln!(data, "{:.2};{}", p.density, p.generations)?;
    }
    write_atomic(path, data.as_bytes())
        .with_context(|| format!("could not write {}", path.display()))
}

fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    fs::write(&tmp, data)?;
    atomic_rename(Path::new(&tmp), path)
}

fn atomic_rename(from: &Path, to: &Path) -> Result<()> {
    if let Err(e) = fs::rename(from, to) {
        // Some platforms refuse to rename over an existing file.
        if !to.exists() {
            return Err(e.into());
        }
        fs::remove_file(to)?;
        fs::rename(from, to)?;
    }
    Ok(())
}
