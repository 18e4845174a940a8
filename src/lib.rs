//! Conway's Game of Life on a finite torus, with recognition of the groups
//! left behind once the population settles.
//!
//! The pieces are layered leaves-first: [`grid::Grid`] runs generations,
//! [`groups`] cuts the surface into 8-connected groups (following
//! wraparound), [`templates::TemplateLibrary`] holds named reference shapes
//! and [`classify`] matches groups against them under quarter-turn rotation.
//! [`sim::Simulation`] drives the grid until the population stops changing.

pub mod classify;
pub mod error;
pub mod grid;
pub mod groups;
pub mod pattern;
pub mod sim;
pub mod templates;

pub use classify::{classify, classify_grid, Label};
pub use error::LifeError;
pub use grid::Grid;
pub use pattern::Pattern;
pub use sim::{Phase, Simulation};
pub use templates::{Template, TemplateLibrary};
