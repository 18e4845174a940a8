use crate::config::Settings;
use crate::storage::save_stability_data;
use anyhow::Result;
use rand::Rng;
use torus_life::{Grid, Simulation};
use tracing::{info, warn};

/// How long a grid filled at `density` took to settle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct StabilityPoint {
    pub(crate) density: f64,
    pub(crate) generations: u64,
    /// False if the run hit `maxGenerations` first.
    pub(crate) settled: bool,
}

/// 0.05 to 0.95 in steps of 0.05.
pub(crate) fn densities() -> impl Iterator<Item = f64> {
    (1..=19).map(|i| i as f64 * 0.05)
}

pub(crate) fn measure<R: Rng + ?Sized>(settings: &Settings, density: f64, rng: &mut R) -> StabilityPoint {
    let grid = Grid::random(settings.width, settings.height, density, rng);
    let mut sim = Simulation::new(grid, settings.stable_generations);
    match sim.run_until_stable(settings.max_generations) {
        Some(generations) => StabilityPoint {
            density,
            generations,
            settled: true,
        },
        None => {
            warn!(density, limit = settings.max_generations, "run did not settle");
            StabilityPoint {
                density,
                generations: sim.generation(),
                settled: false,
            }
        }
    }
}

pub(crate) fn run(settings: &Settings) -> Result<()> {
    let mut rng = settings.rng();
    let mut points = Vec::new();
    for density in densities() {
        let p = measure(settings, density, &mut rng);
        let note = if p.settled { "" } else { " (limit reached)" };
        println!(
            "Density {:.2}: settled after {} generations{}",
            p.density, p.generations, note
        );
        points.push(p);
    }

    save_stability_data(&settings.data_path, &points)?;
    info!(path = %settings.data_path.display(), points = points.len(), "wrote stability data");
    println!("\nData written to {}\n", settings.data_path.display());
    println!("{}", render_chart(&points, 57, 16));
    Ok(())
}

/// A text scatter plot of generations against density. `*` marks a settled
/// run and `?` one that hit the limit.
pub(crate) fn render_chart(points: &[StabilityPoint], width: usize, height: usize) -> String {
    if points.is_empty() || width < 2 || height < 2 {
        return String::from("(no data)");
    }
    let d_min = points.iter().map(|p| p.density).fold(f64::INFINITY, f64::min);
    let d_max = points.iter().map(|p| p.density).fold(f64::NEG_INFINITY, f64::max);
    let g_max = points.iter().map(|p| p.generations).max().unwrap_or(0).max(1);

    let mut canvas = vec![vec![' '; width]; height];
    for p in points {
        let x = if d_max > d_min {
            ((p.density - d_min) / (d_max - d_min) * (width - 1) as f64).round() as usize
        } else {
            0
        };
        let y = (p.generations as f64 / g_max as f64 * (height - 1) as f64).round() as usize;
        canvas[height - 1 - y][x] = if p.settled { '*' } else { '?' };
    }

    let label_w = g_max.to_string().len();
    let mut out = String::new();
    for (i, row) in canvas.iter().enumerate() {
        let label = match i {
            0 => g_max.to_string(),
            _ if i == height - 1 => "0".to_string(),
            _ => String::new(),
        };
        out.push_str(&format!("{label:>label_w$} |"));
        out.extend(row.iter());
        out.push('\n');
    }
    out.push_str(&format!("{:>label_w$} +{}\n", "", "-".repeat(width)));
    let left = format!("{d_min:.2}");
    let right = format!("{d_max:.2}");
    let gap = width.saturating_sub(left.len() + right.len());
    out.push_str(&format!(
        "{:>label_w$}  {left}{}{right}\n",
        "",
        " ".repeat(gap)
    ));
    out.push_str(&format!(
        "{:>label_w$}  generations to settle vs. live density",
        ""
    ));
    out
}
