//! Fixed-rate tick and key pump.
//!
//! A background thread multiplexes terminal input and the logical clock
//! onto one channel. Ticks are scheduled against absolute deadlines: a
//! burst of key presses shortens the next poll timeout instead of pushing
//! the tick back, so the simulation rate holds under heavy typing. The
//! main loop just blocks on the channel, no busy-waiting anywhere.

use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, KeyEvent, KeyEventKind};

pub enum Event {
    Key(KeyEvent),
    Tick,
}

/// Deadline tracker for the tick schedule. A late tick advances from the
/// missed deadline, not from now, so the average rate is preserved.
struct Cadence {
    period: Duration,
    next: Instant,
}

impl Cadence {
    fn new(period: Duration) -> Self {
        Self {
            period,
            next: Instant::now() + period,
        }
    }

    /// Time left until the next tick is due; zero once it is overdue.
    fn remaining(&self) -> Duration {
        self.next.saturating_duration_since(Instant::now())
    }

    fn advance(&mut self) {
        self.next += self.period;
    }
}

pub struct EventPump {
    rx: mpsc::Receiver<Event>,
}

impl EventPump {
    pub fn new(tick_ms: u64) -> Self {
        let (tx, rx) = mpsc::channel();
        let mut cadence = Cadence::new(Duration::from_millis(tick_ms));

        thread::spawn(move || loop {
            if event::poll(cadence.remaining()).unwrap_or(false) {
                if let Ok(event::Event::Key(key)) = event::read() {
                    if key.kind == KeyEventKind::Press && tx.send(Event::Key(key)).is_err() {
                        return;
                    }
                }
            } else {
                cadence.advance();
                if tx.send(Event::Tick).is_err() {
                    return;
                }
            }
        });

        Self { rx }
    }

    pub fn next(&self) -> io::Result<Event> {
        self.rx
            .recv()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cadence_deadlines_are_cumulative() {
        let period = Duration::from_millis(10);
        let t0 = Instant::now();
        let mut c = Cadence::new(period);
        assert!(c.next >= t0 + period);
        assert!(c.remaining() <= period);

        let first = c.next;
        c.advance();
        c.advance();
        // two periods out from the first deadline, however late we ran
        assert_eq!(c.next, first + period * 2);
    }
}
