use crate::config::Settings;
use crate::input::{collect_actions, wait_for_key, Action};
use crate::render::{report_lines, status_lines, Terminal};
use crate::storage::{load_snapshot, save_snapshot};
use std::time::{Duration, Instant};
use torus_life::{groups::count_groups, Grid, Simulation, TemplateLibrary};
use tracing::{info, warn};

pub(crate) struct App {
    settings: Settings,
    library: TemplateLibrary,
    sim: Simulation,
    term: Terminal,
    notice: Option<String>,
}

impl App {
    fn init(settings: Settings, library: TemplateLibrary) -> anyhow::Result<Self> {
        let mut rng = settings.rng();
        let grid = Grid::random(settings.width, settings.height, settings.live_density, &mut rng);
        let sim = Simulation::new(grid, settings.stable_generations);
        let term = Terminal::begin()?;
        Ok(Self {
            settings,
            library,
            sim,
            term,
            notice: None,
        })
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let tick = Duration::from_millis(self.settings.speed);
        loop {
            let groups = count_groups(self.sim.grid());
            let status = status_lines(&self.sim, groups, self.notice.as_deref());
            self.term.draw(&self.sim, &status)?;

            if self.sim.is_stopped() {
                let labels = self.sim.classify(&self.library);
                for label in &labels {
                    info!(%label, "group");
                }
                self.term.draw(&self.sim, &report_lines(&self.sim, &labels))?;
                wait_for_key()?;
                return Ok(());
            }

            let started = Instant::now();
            for action in collect_actions(Duration::from_millis(1))? {
                match action {
                    Action::Quit => return Ok(()),
                    Action::Pause => {
                        let mut paused = status.clone();
                        paused.push("Paused. Press any key...".to_string());
                        self.term.draw(&self.sim, &paused)?;
                        wait_for_key()?;
                    }
                    Action::Save => self.save(),
                    Action::Load => self.load(),
                }
            }

            self.sim.tick();
            spin_sleep(tick, started);
        }
    }

    fn save(&mut self) {
        let path = &self.settings.save_path;
        self.notice = Some(match save_snapshot(path, self.sim.grid()) {
            Ok(()) => format!("Saved to {}", path.display()),
            Err(e) => {
                warn!("{e:#}");
                format!("Save failed: {e:#}")
            }
        });
    }

    fn load(&mut self) {
        let path = &self.settings.load_path;
        self.notice = Some(match load_snapshot(path, self.sim.grid_mut()) {
            Ok(()) => {
                self.sim.rebase();
                format!("Loaded {}", path.display())
            }
            Err(e) => {
                warn!("{e:#}");
                format!("Load failed: {e:#}")
            }
        });
    }
}

pub(crate) fn run(settings: Settings, library: TemplateLibrary) -> anyhow::Result<()> {
    let mut app = App::init(settings, library)?;
    app.run()
}

/* -----------------------------
   Frame pacing helper
------------------------------ */

fn spin_sleep(target: Duration, now: Instant) {
    let end = now + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        let left = end - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}
