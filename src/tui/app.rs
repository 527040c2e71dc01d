//! Main TUI application.

use std::io;
use std::time::{Duration, Instant};

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{debug, info, warn};

use crate::dashboard::{DashboardState, FetchOutcome, Loader};
use crate::model::POSTINGS_TABLE;
use crate::store::{ChangeFeed, Subscription};

use super::event::{Event, EventHandler};
use super::input::{KeyAction, handle_key};
use super::refresh::{RefreshWorker, Trigger};
use super::render::render;
use super::state::AppState;

/// How often the input thread wakes up when idle.
const TICK_RATE: Duration = Duration::from_millis(250);

/// Main TUI application.
pub struct App {
    loader: Loader,
    feed: Option<Box<dyn ChangeFeed>>,
    state: AppState,
    last_poll: Instant,
    should_quit: bool,
}

impl App {
    /// Creates a new App. `feed` enables refetch-on-change.
    pub fn new(
        loader: Loader,
        feed: Option<Box<dyn ChangeFeed>>,
        dashboard: DashboardState,
        bot_url: String,
        poll_interval: Duration,
    ) -> Self {
        Self {
            loader,
            feed,
            state: AppState::new(dashboard, bot_url, poll_interval),
            last_poll: Instant::now(),
            should_quit: false,
        }
    }

    /// Runs the TUI application.
    pub fn run(mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        // Restore terminal even if the loop failed
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> io::Result<()> {
        let events = EventHandler::new(TICK_RATE)?;
        let mut worker = RefreshWorker::spawn(self.loader.clone(), events.sender())?;
        // Dropped at the end of this function, which tears the feed down.
        let _subscription = self.subscribe(&events);

        if let Ok(size) = terminal.size() {
            self.state.terminal_width = size.width;
        }

        self.request(&mut worker, Trigger::Initial);

        loop {
            terminal.draw(|frame| render(frame, &mut self.state))?;

            match events.next() {
                Ok(Event::Tick) => {
                    if !self.state.paused && self.last_poll.elapsed() >= self.state.poll_interval {
                        self.request(&mut worker, Trigger::Poll);
                    }
                }
                Ok(Event::Key(key)) => match handle_key(&mut self.state, key) {
                    KeyAction::Quit => self.should_quit = true,
                    KeyAction::Refresh => {
                        self.state.status_message = Some("Refreshing...".to_string());
                        self.request(&mut worker, Trigger::Manual);
                    }
                    KeyAction::None => {}
                },
                Ok(Event::Resize(width)) => {
                    self.state.terminal_width = width;
                }
                Ok(Event::Change) => {
                    debug!("change notification");
                    self.request(&mut worker, Trigger::Change);
                }
                Ok(Event::Fetched(seq, outcome)) => {
                    worker.complete();
                    self.apply(seq, outcome);
                    self.state.refreshing = worker.is_busy();
                }
                Err(_) => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        worker.shutdown();
        Ok(())
    }

    /// Subscribes to postings changes if a feed and a store are available.
    ///
    /// A failed subscription is logged and the dashboard keeps polling.
    fn subscribe(&mut self, events: &EventHandler) -> Option<Subscription> {
        if self.loader.config_error().is_some() {
            return None;
        }
        let feed = self.feed.as_ref()?;
        let tx = events.sender();
        match feed.subscribe(
            POSTINGS_TABLE,
            Box::new(move || {
                let _ = tx.send(Event::Change);
            }),
        ) {
            Ok(sub) => {
                info!(table = sub.table(), "subscribed to changes");
                self.state.is_live = true;
                Some(sub)
            }
            Err(e) => {
                warn!(error = %e, "change subscription failed, polling only");
                None
            }
        }
    }

    fn request(&mut self, worker: &mut RefreshWorker, trigger: Trigger) {
        let seq = worker.request(trigger);
        debug!(seq, ?trigger, "refresh requested");
        self.last_poll = Instant::now();
        self.state.refreshing = true;
    }

    fn apply(&mut self, seq: u64, outcome: FetchOutcome) {
        if !self.state.dashboard.apply_sequenced(seq, outcome) {
            debug!(seq, "dropped stale fetch result");
            return;
        }
        if self.state.status_message.as_deref() == Some("Refreshing...") {
            self.state.status_message = None;
        }
    }
}
