use crate::tui::{inputs::{map_event, Action}, views::{self, LeftPane, RightPane}};
use crossterm::{
    event::{self},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use lexicard_core::{Difficulty, ReviewSession, Scheduler, SessionState, Storage};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stdout, Stdout};
use std::sync::Arc;

pub struct TuiApp {
    pub repo: Arc<dyn Storage>,
    session: ReviewSession,
    word_count: usize,
    reveal: bool,
    status: Option<String>,
}

impl TuiApp {
    pub fn new(repo: Arc<dyn Storage>, scheduler: Scheduler) -> Self {
        let session = ReviewSession::new(repo.clone(), scheduler);
        Self { repo, session, word_count: 0, reveal: false, status: None }
    }

    fn restart(&mut self) {
        self.reveal = false;
        self.word_count = self.repo.get_words().map(|w| w.len()).unwrap_or(0);
        match self.session.start(chrono::Utc::now()) {
            Ok(_) => self.status = None,
            Err(e) => self.status = Some(format!("could not load words: {e}")),
        }
    }

    fn rate(&mut self, difficulty: Difficulty) {
        if self.session.current().is_none() {
            return;
        }
        match self.session.submit_answer(difficulty, chrono::Utc::now()) {
            Ok(_) => {
                self.reveal = false;
                self.status = None;
            }
            Err(e) => self.status = Some(format!("not saved: {e}")),
        }
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        self.restart();

        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let res = self.mainloop(&mut terminal);

        disable_raw_mode().ok();
        let mut out: Stdout = std::io::stdout();
        execute!(out, LeaveAlternateScreen).ok();
        terminal.show_cursor().ok();

        res
    }

    fn mainloop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
        loop {
            terminal.draw(|f| {
                let right = match self.session.state() {
                    SessionState::NotStarted | SessionState::Empty => RightPane::Empty("No words are due. Come back later."),
                    SessionState::Complete => RightPane::Summary(self.session.summary()),
                    SessionState::InProgress => match self.session.current() {
                        Some(word) => {
                            let phase = self.repo.get_progress(word.id).ok().flatten().map(|p| p.phase).unwrap_or(0);
                            RightPane::Card { word, phase, reveal: self.reveal }
                        }
                        None => RightPane::Empty("No words in queue."),
                    },
                };
                let totals = self.session.totals();
                let left = LeftPane {
                    totals,
                    remaining: self.session.remaining(),
                    due_total: totals.total as usize,
                    word_count: self.word_count,
                    status: self.status.as_deref(),
                };
                views::draw_ui(f, f.size(), left, right);
            })?;

            if event::poll(std::time::Duration::from_millis(100))? {
                match map_event(event::read()?) {
                    Action::Quit => break,
                    Action::ToggleReveal => self.reveal = !self.reveal,
                    Action::Forgot => self.rate(Difficulty::Forgot),
                    Action::Vague => self.rate(Difficulty::Vague),
                    Action::Remembered => self.rate(Difficulty::Remembered),
                    Action::Restart => {
                        if self.session.state() != SessionState::InProgress {
                            self.restart();
                        }
                    }
                    Action::None => {}
                }
            }
        }
        Ok(())
    }
}
