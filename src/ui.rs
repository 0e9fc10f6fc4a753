//! Interactive site selection.
//!
//! The [`App`] owns the [`SelectionState`] and the immutable snapshot. Each
//! line read from stdin is one user action; every change recomputes the
//! ranking synchronously and redraws the checkbox panel and chart.
//!
//! | Input | Action |
//! |-------|--------|
//! | `1`..`N` | toggle that site |
//! | `a` | select every site |
//! | `n` | clear the selection |
//! | `q` / EOF | quit |

use crate::aggregate::{self, Vocabulary};
use crate::config::Site;
use crate::models::{RankedView, SelectionState, Snapshot};
use crate::outputs::chart;
use std::error::Error;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, instrument};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// One parsed input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Zero-based site index.
    Toggle(usize),
    SelectAll,
    SelectNone,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "q" | "quit" => Some(Command::Quit),
            "a" | "all" => Some(Command::SelectAll),
            "n" | "none" => Some(Command::SelectNone),
            other => other
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .map(Command::Toggle),
        }
    }
}

/// Presentation state for one session.
#[derive(Debug)]
pub struct App {
    sites: Vec<Site>,
    snapshot: Snapshot,
    vocabulary: Vocabulary,
    selection: SelectionState,
    top_n: usize,
    color: bool,
}

impl App {
    pub fn new(sites: Vec<Site>, snapshot: Snapshot, top_n: usize, color: bool) -> Self {
        let vocabulary = Vocabulary::from_snapshot(&snapshot);
        let selection = SelectionState::all_active(sites.len());
        info!(candidates = vocabulary.len(), sites = sites.len(), "Candidate vocabulary fixed");
        Self {
            sites,
            snapshot,
            vocabulary,
            selection,
            top_n,
            color,
        }
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn view(&self) -> RankedView {
        aggregate::rank(
            &self.snapshot,
            &self.vocabulary,
            &self.sites,
            &self.selection,
            self.top_n,
        )
    }

    /// Apply a command. Returns `false` when the session should end.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Quit => return false,
            Command::SelectAll => self.selection.set_all(true),
            Command::SelectNone => self.selection.set_all(false),
            Command::Toggle(i) => match self.selection.toggle(i) {
                Some(active) => debug!(site = %self.sites[i].name, active, "Toggled site"),
                None => debug!(index = i, "Ignoring toggle of unknown site"),
            },
        }
        true
    }

    /// Checkbox panel, chart and prompt as one frame.
    pub fn render(&self) -> String {
        let mut frame = String::new();
        if self.color {
            frame.push_str(CLEAR_SCREEN);
        }
        frame.push_str(&chart::render_chart(&self.view(), &self.sites, self.color));
        frame.push('\n');
        frame.push_str(&chart::render_checkboxes(&self.sites, &self.selection, self.color));
        frame.push_str(&format!(
            "\n[1-{}] toggle  [a] all  [n] none  [q] quit > ",
            self.sites.len()
        ));
        frame
    }

    fn draw(&self) -> std::io::Result<()> {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(self.render().as_bytes())?;
        stdout.flush()
    }

    /// Read commands from stdin until `q` or end of input.
    #[instrument(level = "info", skip_all)]
    pub async fn run(mut self) -> Result<(), Box<dyn Error>> {
        self.draw()?;
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            let Some(command) = Command::parse(&line) else {
                self.draw()?;
                continue;
            };
            if !self.apply(command) {
                break;
            }
            self.draw()?;
        }
        println!();
        info!("Session ended");
        Ok(())
    }
}
