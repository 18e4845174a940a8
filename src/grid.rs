use std::{
    fmt::{self, Display, Write},
    str::FromStr,
};

use itertools::Itertools;
use rand::Rng;
use tracing::warn;

use crate::error::LifeError;

/// Marker for a live cell in snapshot and pattern text.
pub const ALIVE: char = '0';
/// Marker for a dead cell in snapshot and pattern text.
pub const DEAD: char = '.';

/// The eight `(dx, dy)` steps to a cell's neighbours, row by row.
pub(crate) fn neighbour_offsets() -> impl Iterator<Item = (isize, isize)> {
    (-1..=1)
        .cartesian_product(-1..=1)
        .filter(|&d| d != (0, 0))
        .map(|(dy, dx)| (dx, dy))
}

/// A fixed-size toroidal surface of cells.
///
/// Cells are stored row-major. `advance` computes the whole next generation
/// into a second buffer before swapping it in, so no cell ever observes a
/// neighbour's next-tick state.
#[derive(Clone, Debug)]
pub struct Grid {
    columns: usize,
    rows: usize,
    cells: Vec<bool>,
    next: Vec<bool>,
}

impl Grid {
    /// An all-dead grid.
    ///
    /// # Panics
    ///
    /// If either dimension is zero.
    pub fn new(columns: usize, rows: usize) -> Self {
        assert!(
            columns > 0 && rows > 0,
            "grid dimensions must be positive, got {columns}x{rows}"
        );
        let n = columns * rows;
        Self {
            columns,
            rows,
            cells: vec![false; n],
            next: vec![false; n],
        }
    }

    /// A grid where every cell is independently alive with probability
    /// `density`. Out-of-range densities are clamped to `0.0..=1.0` rather
    /// than rejected; see [`clamp_density`].
    pub fn random<R: Rng + ?Sized>(columns: usize, rows: usize, density: f64, rng: &mut R) -> Self {
        let mut grid = Self::new(columns, rows);
        let density = clamp_density(density);
        for cell in &mut grid.cells {
            *cell = rng.gen_bool(density);
        }
        grid
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Row-major current state, `columns * rows` long.
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    pub fn is_alive(&self, x: usize, y: usize) -> bool {
        self.cells[self.index(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, alive: bool) {
        let i = self.index(x, y);
        self.cells[i] = alive;
    }

    /// Kills every cell.
    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    /// Live cells among the eight wrapped neighbours of `(x, y)`.
    ///
    /// On grids narrower or shorter than three cells several offsets land on
    /// the same cell; each offset is counted separately.
    pub fn neighbor_count(&self, x: usize, y: usize) -> usize {
        let (x, y) = (x as isize, y as isize);
        neighbour_offsets()
            .filter(|&(dx, dy)| self.cells[self.wrap(x + dx, y + dy)])
            .count()
    }

    /// Moves every cell to its next generation.
    pub fn advance(&mut self) {
        for y in 0..self.rows {
            for x in 0..self.columns {
                let i = self.index(x, y);
                let alive = matches!(
                    (self.cells[i], self.neighbor_count(x, y)),
                    (true, 2 | 3) | (false, 3)
                );
                self.next[i] = alive;
            }
        }
        std::mem::swap(&mut self.cells, &mut self.next);
    }

    /// Overlays snapshot text onto the grid, one line per row and one
    /// character per column. [`ALIVE`] marks a live cell and anything else a
    /// dead one. Text beyond the grid is ignored; cells the text does not
    /// reach keep their state.
    pub fn load_text(&mut self, text: &str) {
        for (y, line) in text.lines().take(self.rows).enumerate() {
            for (x, c) in line.chars().take(self.columns).enumerate() {
                self.set(x, y, c == ALIVE);
            }
        }
    }

    /// # Panics
    ///
    /// If `(x, y)` lies outside the grid.
    pub(crate) fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.columns && y < self.rows,
            "cell ({x}, {y}) outside {}x{} grid",
            self.columns,
            self.rows
        );
        y * self.columns + x
    }

    /// Index of `(x, y)` after wrapping both coordinates onto the torus.
    pub(crate) fn wrap(&self, x: isize, y: isize) -> usize {
        let x = x.rem_euclid(self.columns as isize) as usize;
        let y = y.rem_euclid(self.rows as isize) as usize;
        y * self.columns + x
    }
}

/// Clamps a fill density into `0.0..=1.0`.
///
/// Out-of-range input is accepted and clamped to the nearest bound (NaN
/// becomes `0.0`). This masks bad configuration, so it is logged.
pub fn clamp_density(density: f64) -> f64 {
    if density.is_nan() {
        warn!("live density is NaN, using 0.0");
        return 0.0;
    }
    let clamped = density.clamp(0.0, 1.0);
    if clamped != density {
        warn!(density, clamped, "live density out of range, clamping");
    }
    clamped
}

/// The lines of a text block, without trailing blank lines.
pub(crate) fn text_lines(s: &str) -> Vec<&str> {
    let mut lines = s.lines().collect_vec();
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    lines
}

impl PartialEq for Grid {
    fn eq(&self, other: &Self) -> bool {
        (self.columns, self.rows) == (other.columns, other.rows) && self.cells == other.cells
    }
}

impl Eq for Grid {}

/// Snapshot text: one line per row, each ending in a newline.
impl Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.columns) {
            for &alive in row {
                f.write_char(if alive { ALIVE } else { DEAD })?;
            }
            f.write_char('\n')?;
        }
        Ok(())
    }
}

/// Builds a grid sized to the text: as wide as its longest line and as tall
/// as its line count. Short lines are padded with dead cells; trailing blank
/// lines are dropped.
impl FromStr for Grid {
    type Err = LifeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines = text_lines(s);
        let rows = lines.len();
        let columns = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        if rows == 0 || columns == 0 {
            return Err(LifeError::EmptyBlock);
        }
        let mut grid = Grid::new(columns, rows);
        grid.load_text(s);
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn grid_with(columns: usize, rows: usize, live: &[(usize, usize)]) -> Grid {
        let mut grid = Grid::new(columns, rows);
        for &(x, y) in live {
            grid.set(x, y, true);
        }
        grid
    }

    #[test]
    fn test_survival_and_death() {
        // Centre cell of a 5x5 grid with a chosen number of live neighbours.
        let around = [(1, 1), (2, 1), (3, 1), (1, 2), (3, 2), (1, 3), (2, 3), (3, 3)];
        for n in 0..=8 {
            let mut live = vec![(2, 2)];
            live.extend_from_slice(&around[..n]);
            let mut grid = grid_with(5, 5, &live);
            assert_eq!(grid.neighbor_count(2, 2), n);
            grid.advance();
            assert_eq!(grid.is_alive(2, 2), n == 2 || n == 3, "{n} neighbours");
        }
    }

    #[test]
    fn test_birth() {
        let around = [(1, 1), (2, 1), (3, 1), (1, 2), (3, 2), (1, 3), (2, 3), (3, 3)];
        for n in 0..=8 {
            let mut grid = grid_with(5, 5, &around[..n]);
            grid.advance();
            assert_eq!(grid.is_alive(2, 2), n == 3, "{n} neighbours");
        }
    }

    #[test]
    fn test_diagonal_wraparound() {
        let grid = grid_with(3, 3, &[(2, 2)]);
        assert_eq!(grid.neighbor_count(0, 0), 1);
        let grid = grid_with(3, 3, &[(0, 0), (2, 2), (0, 2)]);
        assert_eq!(grid.population(), 3);
    }

    #[test]
    fn test_lonely_cell_dies() {
        for (x, y) in [(0, 0), (1, 1), (2, 0)] {
            let mut grid = grid_with(3, 3, &[(x, y)]);
            grid.advance();
            assert_eq!(grid.population(), 0);
        }
    }

    #[test]
    fn test_block_is_still() {
        let mut grid = grid_with(4, 4, &[(1, 1), (1, 2), (2, 1), (2, 2)]);
        let before = grid.clone();
        for _ in 0..10 {
            grid.advance();
            assert_eq!(grid, before);
        }
    }

    #[test]
    fn test_blinker() {
        // On 3x3 every dead cell sees the whole row, so the centre column
        // is what the blinker and the torus agree on.
        let mut grid = grid_with(3, 3, &[(0, 1), (1, 1), (2, 1)]);
        grid.advance();
        assert!(grid.is_alive(1, 0) && grid.is_alive(1, 1) && grid.is_alive(1, 2));

        let mut grid = grid_with(5, 5, &[(1, 2), (2, 2), (3, 2)]);
        grid.advance();
        assert_eq!(grid, grid_with(5, 5, &[(2, 1), (2, 2), (2, 3)]));
        grid.advance();
        assert_eq!(grid, grid_with(5, 5, &[(1, 2), (2, 2), (3, 2)]));
    }

    #[test]
    fn test_full_and_empty_grids() {
        let mut grid = Grid::new(6, 4);
        grid.advance();
        assert_eq!(grid.population(), 0);

        let mut grid = Grid::random(6, 4, 1.0, &mut StdRng::seed_from_u64(1));
        assert_eq!(grid.population(), 24);
        grid.advance();
        assert_eq!(grid.population(), 0);
    }

    #[test]
    fn test_advance_is_deterministic() {
        let start = Grid::random(16, 12, 0.4, &mut StdRng::seed_from_u64(7));
        let mut a = start.clone();
        let mut b = start.clone();
        a.advance();
        b.advance();
        assert_eq!(a, b);
    }

    #[test]
    fn test_random_fill() {
        let a = Grid::random(10, 10, 0.5, &mut StdRng::seed_from_u64(1));
        let b = Grid::random(10, 10, 0.5, &mut StdRng::seed_from_u64(2));
        let c = Grid::random(10, 10, 0.5, &mut StdRng::seed_from_u64(1));
        assert_ne!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_density_is_clamped() {
        assert_eq!(clamp_density(-0.5), 0.0);
        assert_eq!(clamp_density(1.5), 1.0);
        assert_eq!(clamp_density(f64::NAN), 0.0);
        assert_eq!(clamp_density(0.25), 0.25);

        let grid = Grid::random(5, 5, 7.0, &mut StdRng::seed_from_u64(3));
        assert_eq!(grid.population(), 25);
        let grid = Grid::random(5, 5, -1.0, &mut StdRng::seed_from_u64(3));
        assert_eq!(grid.population(), 0);
    }

    #[test]
    #[should_panic]
    fn test_zero_width_panics() {
        Grid::new(0, 3);
    }

    #[test]
    fn test_snapshot_text() {
        let grid = grid_with(4, 2, &[(0, 0), (3, 1)]);
        assert_eq!(grid.to_string(), "0...\n...0\n");
        assert_eq!(Grid::from_str(&grid.to_string()).unwrap(), grid);
    }

    #[test]
    fn test_load_text_overlays() {
        let mut grid = grid_with(3, 3, &[(2, 2)]);
        grid.load_text("0.0.0\n.");
        assert!(grid.is_alive(0, 0));
        assert!(!grid.is_alive(1, 0));
        assert!(grid.is_alive(2, 0));
        // Untouched by the text.
        assert!(grid.is_alive(2, 2));
        assert_eq!(grid.population(), 3);
    }

    #[test]
    fn test_from_str_pads_short_lines() {
        let grid = Grid::from_str("0\n.00\n").unwrap();
        assert_eq!((grid.columns(), grid.rows()), (3, 2));
        assert_eq!(grid.population(), 3);
        assert!(matches!(Grid::from_str(""), Err(LifeError::EmptyBlock)));
    }

    #[test]
    fn test_from_str_ignores_trailing_blank_lines() {
        let grid = Grid::from_str("00\n00\n\n\n").unwrap();
        assert_eq!((grid.columns(), grid.rows()), (2, 2));
        assert!(matches!(Grid::from_str("\n\n"), Err(LifeError::EmptyBlock)));
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_query_panics() {
        let grid = grid_with(5, 5, &[(0, 1)]);
        grid.is_alive(5, 0);
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_set_panics() {
        let mut grid = Grid::new(5, 5);
        grid.set(0, 5, true);
    }
}
