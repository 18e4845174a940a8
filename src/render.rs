use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Stdout, Write};
use torus_life::{Label, Simulation};

const ALIVE_GLYPH: char = '█';
const DEAD_GLYPH: char = '·';

/// Raw-mode alternate screen, restored on drop.
pub(crate) struct Terminal {
    out: Stdout,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            Clear(ClearType::All)
        )?;
        Ok(Self { out })
    }

    /// Draws the grid from the top-left corner and `text` beneath it, both
    /// clipped to the terminal.
    pub(crate) fn draw(&mut self, sim: &Simulation, text: &[String]) -> anyhow::Result<()> {
        let (cols, rows) = terminal::size()?;
        let (cols, rows) = (cols as usize, rows as usize);
        let grid_rows = rows.saturating_sub(text.len()).min(sim.grid().rows());

        queue!(self.out, BeginSynchronizedUpdate, Clear(ClearType::All))?;
        queue!(self.out, SetForegroundColor(Color::Green))?;
        for (y, line) in grid_lines(sim, cols, grid_rows).iter().enumerate() {
            queue!(self.out, cursor::MoveTo(0, y as u16), Print(line))?;
        }
        queue!(self.out, SetForegroundColor(Color::White))?;
        for (i, line) in text.iter().enumerate() {
            let y = grid_rows + i;
            if y >= rows {
                break;
            }
            let line: String = line.chars().take(cols).collect();
            queue!(self.out, cursor::MoveTo(0, y as u16), Print(line))?;
        }
        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = execute!(
            self.out,
            ResetColor,
            cursor::Show,
            EnableLineWrap,
            LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}

/// At most `max_rows` rows of at most `max_cols` cells each.
pub(crate) fn grid_lines(sim: &Simulation, max_cols: usize, max_rows: usize) -> Vec<String> {
    let grid = sim.grid();
    let cols = grid.columns().min(max_cols);
    (0..grid.rows().min(max_rows))
        .map(|y| {
            (0..cols)
                .map(|x| if grid.is_alive(x, y) { ALIVE_GLYPH } else { DEAD_GLYPH })
                .collect()
        })
        .collect()
}

pub(crate) fn status_lines(sim: &Simulation, groups: usize, notice: Option<&str>) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        format!(
            "Alive: {}   Groups: {}   Generation: {}   Stable: {}/{}",
            sim.population(),
            groups,
            sim.generation(),
            sim.stable_for(),
            sim.threshold()
        ),
        "q quit   p pause   s save   l load".to_string(),
    ];
    if let Some(notice) = notice {
        lines.push(notice.to_string());
    }
    lines
}

pub(crate) fn report_lines(sim: &Simulation, labels: &[Label]) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        format!(
            "Stopped: population {} unchanged for {} generations (generation {}).",
            sim.population(),
            sim.stable_for(),
            sim.generation()
        ),
    ];
    if labels.is_empty() {
        lines.push("No groups left.".to_string());
    }
    for (i, label) in labels.iter().enumerate() {
        lines.push(format!("  {:>3}. {}", i + 1, label));
    }
    lines.push("Press any key to exit.".to_string());
    lines
}
