use std::{
    fmt::{self, Display, Write},
    str::FromStr,
};

use itertools::{Itertools, MinMaxResult};

use crate::{
    error::LifeError,
    grid::{text_lines, ALIVE, DEAD},
};

/// A rectangle of cells tightly bounding at least one live cell.
///
/// Both extracted groups and named templates are patterns. Equality is
/// structural: same width, same height, same cell at every position.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pattern {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Pattern {
    /// The minimal pattern covering the given live cells, in any integer
    /// coordinate space. `None` if there are no cells.
    pub fn from_cells<I>(cells: I) -> Option<Self>
    where
        I: IntoIterator<Item = (isize, isize)>,
        I::IntoIter: Clone,
    {
        let cells = cells.into_iter();
        let (x0, x1) = bounds(cells.clone().map(|(x, _)| x))?;
        let (y0, y1) = bounds(cells.clone().map(|(_, y)| y))?;
        let width = (x1 - x0 + 1) as usize;
        let height = (y1 - y0 + 1) as usize;
        let mut pattern = Self {
            width,
            height,
            cells: vec![false; width * height],
        };
        for (x, y) in cells {
            let i = (y - y0) as usize * width + (x - x0) as usize;
            pattern.cells[i] = true;
        }
        Some(pattern)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_alive(&self, x: usize, y: usize) -> bool {
        self.cells[y * self.width + x]
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    /// `(x, y)` of every live cell, row by row.
    pub fn live_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .positions(|&alive| alive)
            .map(move |i| (i % self.width, i / self.width))
    }

    /// A quarter turn: the cell at `(x, y)` moves to `(y, width - 1 - x)`,
    /// so a `width x height` pattern becomes `height x width`. Four turns
    /// give back the original.
    pub fn rotate90(&self) -> Self {
        let (width, height) = (self.height, self.width);
        let mut cells = vec![false; width * height];
        for (x, y) in self.live_cells() {
            cells[(self.width - 1 - x) * width + y] = true;
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// The pattern at 0°, 90°, 180° and 270°, in that order.
    pub fn rotations(&self) -> [Pattern; 4] {
        let r90 = self.rotate90();
        let r180 = r90.rotate90();
        let r270 = r180.rotate90();
        [self.clone(), r90, r180, r270]
    }
}

fn bounds(values: impl Iterator<Item = isize>) -> Option<(isize, isize)> {
    match values.minmax() {
        MinMaxResult::NoElements => None,
        MinMaxResult::OneElement(v) => Some((v, v)),
        MinMaxResult::MinMax(lo, hi) => Some((lo, hi)),
    }
}

/// Parses a rectangular block of equal-length lines. [`ALIVE`] marks a live
/// cell and any other character a dead one. Trailing blank lines are
/// ignored, and empty rows and columns around the live cells are trimmed
/// away.
impl FromStr for Pattern {
    type Err = LifeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines = text_lines(s);
        let expected = lines.first().map_or(0, |l| l.chars().count());
        if expected == 0 {
            return Err(LifeError::EmptyBlock);
        }
        let mut live = Vec::new();
        for (y, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != expected {
                return Err(LifeError::Ragged {
                    row: y,
                    expected,
                    found,
                });
            }
            live.extend(
                line.chars()
                    .positions(|c| c == ALIVE)
                    .map(|x| (x as isize, y as isize)),
            );
        }
        Pattern::from_cells(live).ok_or(LifeError::NoLiveCells)
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.cells.chunks(self.width).enumerate() {
            if y > 0 {
                f.write_char('\n')?;
            }
            for &alive in row {
                f.write_char(if alive { ALIVE } else { DEAD })?;
            }
        }
        Ok(())
    }
}
