//! Event handling for TUI.
//!
//! A separate thread polls for terminal events and timer ticks. The refresh
//! worker and the change feed post into the same channel through
//! [`EventHandler::sender`].

use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};

use crate::dashboard::FetchOutcome;

/// Application events.
#[derive(Debug)]
pub enum Event {
    /// Timer tick; drives the poll interval.
    Tick,
    /// Keyboard input.
    Key(KeyEvent),
    /// Terminal resize (width).
    Resize(u16),
    /// The postings table changed upstream.
    Change,
    /// A fetch finished. Carries the sequence number of its request.
    Fetched(u64, FetchOutcome),
}

/// Event handler that polls for terminal events in a separate thread.
pub struct EventHandler {
    rx: Receiver<Event>,
    tx: Sender<Event>,
}

impl EventHandler {
    /// Creates a new event handler with the specified tick rate.
    pub fn new(tick_rate: Duration) -> io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        let event_tx = tx.clone();

        thread::Builder::new()
            .name("tui-input".into())
            .spawn(move || {
                loop {
                    if event::poll(tick_rate).unwrap_or(false) {
                        if let Ok(evt) = event::read() {
                            let event = match evt {
                                // Windows reports releases too
                                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                                    Event::Key(key)
                                }
                                CrosstermEvent::Resize(w, _) => Event::Resize(w),
                                _ => continue,
                            };
                            if event_tx.send(event).is_err() {
                                break;
                            }
                        }
                    } else if event_tx.send(Event::Tick).is_err() {
                        break;
                    }
                }
            })?;

        Ok(Self { rx, tx })
    }

    /// Handle for other threads to post events.
    pub fn sender(&self) -> Sender<Event> {
        self.tx.clone()
    }

    /// Receives the next event, blocking until one is available.
    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        self.rx.recv()
    }
}
