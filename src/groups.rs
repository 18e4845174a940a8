//! Splitting a grid into 8-connected groups of live cells.
//!
//! A group may wrap across the torus edges. Each fill walks neighbours in an
//! unwrapped coordinate space, where stepping `(dx, dy)` from `(ux, uy)`
//! always lands on `(ux + dx, uy + dy)`, while liveness and visited checks
//! use the wrapped grid index. The bounding box is taken over the unwrapped
//! positions, so a block straddling a corner comes out as a plain 2x2.

use tracing::debug;

use crate::{
    grid::{neighbour_offsets, Grid},
    pattern::Pattern,
};

/// Every group on the grid as a minimal pattern, in the order the groups are
/// first met scanning rows top to bottom and each row left to right.
pub fn extract_groups(grid: &Grid) -> Vec<Pattern> {
    let mut groups = Vec::new();
    for_each_group(grid, |members| {
        groups.extend(Pattern::from_cells(members.iter().copied()));
    });
    debug!(groups = groups.len(), "extracted groups");
    groups
}

/// Number of groups on the grid; the same scan as [`extract_groups`]
/// without building patterns.
pub fn count_groups(grid: &Grid) -> usize {
    let mut count = 0;
    for_each_group(grid, |_| count += 1);
    count
}

fn for_each_group(grid: &Grid, mut on_group: impl FnMut(&[(isize, isize)])) {
    let mut visited = vec![false; grid.cells().len()];
    let mut stack = Vec::new();
    let mut members = Vec::new();
    for y in 0..grid.rows() {
        for x in 0..grid.columns() {
            let i = grid.index(x, y);
            if visited[i] || !grid.cells()[i] {
                continue;
            }
            // Explicit stack: a large group must not recurse once per cell.
            visited[i] = true;
            members.clear();
            stack.push((x as isize, y as isize));
            while let Some((ux, uy)) = stack.pop() {
                members.push((ux, uy));
                for (dx, dy) in neighbour_offsets() {
                    let (nx, ny) = (ux + dx, uy + dy);
                    let j = grid.wrap(nx, ny);
                    if grid.cells()[j] && !visited[j] {
                        visited[j] = true;
                        stack.push((nx, ny));
                    }
                }
            }
            on_group(&members);
        }
    }
}
