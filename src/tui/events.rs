use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use std::io;
use std::time::Duration;

/// Application events
#[derive(Debug, Clone)]
pub enum Event {
    /// Keyboard input event
    Key(KeyEvent),

    /// Terminal was resized; the next draw picks up the new size
    Resize,

    /// No input within the tick interval
    Tick,
}

/// Polls the terminal for input without blocking the async runtime
pub struct EventHandler {
    /// Tick interval for periodic events
    tick_interval: Duration,
}

impl EventHandler {
    pub fn new() -> Self {
        Self {
            tick_interval: Duration::from_millis(250),
        }
    }

    /// Get the next event, or `Tick` when nothing arrived in time
    pub async fn next(&mut self) -> Result<Event> {
        let tick = self.tick_interval;
        let polled = tokio::task::spawn_blocking(move || -> io::Result<Option<CrosstermEvent>> {
            if event::poll(tick)? {
                event::read().map(Some)
            } else {
                Ok(None)
            }
        })
        .await??;

        Ok(match polled {
            Some(CrosstermEvent::Key(key)) => Event::Key(key),
            Some(CrosstermEvent::Resize(..)) => Event::Resize,
            _ => Event::Tick,
        })
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}
