use tracing::debug;

use crate::{classify::classify_grid, classify::Label, grid::Grid, templates::TemplateLibrary};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Running,
    /// The population held steady for the configured number of ticks.
    Stopped,
}

/// Advances a grid one generation per tick until its population has stayed
/// the same for `threshold` consecutive ticks.
#[derive(Clone, Debug)]
pub struct Simulation {
    grid: Grid,
    threshold: usize,
    generation: u64,
    population: usize,
    stable_for: usize,
    phase: Phase,
}

impl Simulation {
    /// A threshold of zero stops after the first tick.
    pub fn new(grid: Grid, threshold: usize) -> Self {
        let population = grid.population();
        Self {
            grid,
            threshold,
            generation: 0,
            population,
            stable_for: 0,
            phase: Phase::Running,
        }
    }

    /// Advances one generation and updates the stability count. Does nothing
    /// once stopped.
    pub fn tick(&mut self) -> Phase {
        if self.phase == Phase::Stopped {
            return self.phase;
        }
        self.grid.advance();
        self.generation += 1;

        let population = self.grid.population();
        if population == self.population {
            self.stable_for += 1;
        } else {
            self.stable_for = 0;
        }
        self.population = population;

        if self.stable_for >= self.threshold {
            debug!(
                generation = self.generation,
                population, "population stable, stopping"
            );
            self.phase = Phase::Stopped;
        }
        self.phase
    }

    /// Ticks until stopped. Gives up once `limit` generations have run and
    /// returns `None`; otherwise returns the generation it stopped at.
    pub fn run_until_stable(&mut self, limit: u64) -> Option<u64> {
        while self.phase == Phase::Running {
            if self.generation >= limit {
                return None;
            }
            self.tick();
        }
        Some(self.generation)
    }

    /// Restarts counting from the grid's current state, e.g. after a
    /// snapshot was loaded into it.
    pub fn rebase(&mut self) {
        self.generation = 0;
        self.population = self.grid.population();
        self.stable_for = 0;
        self.phase = Phase::Running;
    }

    pub fn classify(&self, library: &TemplateLibrary) -> Vec<Label> {
        classify_grid(&self.grid, library)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// For external edits; call [`Simulation::rebase`] afterwards.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn population(&self) -> usize {
        self.population
    }

    pub fn stable_for(&self) -> usize {
        self.stable_for
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_stopped(&self) -> bool {
        self.phase == Phase::Stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::Pattern;
    use std::str::FromStr;

    fn grid(s: &str) -> Grid {
        Grid::from_str(s).unwrap()
    }

    #[test]
    fn test_block_stops_after_threshold() {
        let mut sim = Simulation::new(grid("....\n.00.\n.00.\n...."), 3);
        assert_eq!(sim.tick(), Phase::Running);
        assert_eq!(sim.tick(), Phase::Running);
        assert_eq!(sim.tick(), Phase::Stopped);
        assert_eq!(sim.generation(), 3);
        assert_eq!(sim.stable_for(), 3);
    }

    #[test]
    fn test_stopped_is_terminal() {
        let mut sim = Simulation::new(grid("....\n.00.\n.00.\n...."), 1);
        assert_eq!(sim.tick(), Phase::Stopped);
        let before = sim.grid().clone();
        assert_eq!(sim.tick(), Phase::Stopped);
        assert_eq!(sim.generation(), 1);
        assert_eq!(sim.grid(), &before);
    }

    #[test]
    fn test_changing_population_resets_count() {
        // A lone cell dies on the first tick, then the empty grid holds.
        let mut sim = Simulation::new(grid("...\n.0.\n..."), 2);
        sim.tick();
        assert_eq!((sim.population(), sim.stable_for()), (0, 0));
        sim.tick();
        assert_eq!(sim.stable_for(), 1);
        assert_eq!(sim.tick(), Phase::Stopped);
        assert_eq!(sim.generation(), 3);
    }

    #[test]
    fn test_blinker_counts_as_stable() {
        let mut sim = Simulation::new(grid(".....\n.....\n.000.\n.....\n....."), 4);
        assert_eq!(sim.run_until_stable(100), Some(4));
    }

    #[test]
    fn test_run_until_stable_limit() {
        // Glider keeps five cells but the threshold is out of reach.
        let mut sim = Simulation::new(grid(".0....\n..0...\n000...\n......\n......\n......"), 50);
        assert_eq!(sim.run_until_stable(10), None);
        assert_eq!(sim.generation(), 10);
        assert_eq!(sim.phase(), Phase::Running);
    }

    #[test]
    fn test_zero_threshold() {
        let mut sim = Simulation::new(grid("0.\n.."), 0);
        assert_eq!(sim.tick(), Phase::Stopped);
    }

    #[test]
    fn test_rebase_after_edit() {
        let mut sim = Simulation::new(grid("....\n.00.\n.00.\n...."), 1);
        sim.tick();
        assert!(sim.is_stopped());
        sim.grid_mut().clear();
        sim.grid_mut().load_text("000");
        sim.rebase();
        assert_eq!(sim.phase(), Phase::Running);
        assert_eq!((sim.generation(), sim.population()), (0, 3));
    }

    #[test]
    fn test_classify_when_stopped() {
        let mut library = TemplateLibrary::new();
        library.insert("block", Pattern::from_str("00\n00").unwrap());
        let mut sim = Simulation::new(grid("......\n.00...\n.00...\n......\n....0.\n......"), 2);
        sim.run_until_stable(10);
        assert_eq!(sim.classify(&library), [Label::Known("block".into())]);
    }
}
