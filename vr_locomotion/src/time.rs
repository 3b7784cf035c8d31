use std::time::Duration;

/// Frame timing handed to every per-frame update
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Time {
    /// Time since the previous frame
    pub elapsed: Duration,
    /// Time since the session started
    pub total: Duration,
}

impl Time {
    pub fn new(elapsed: Duration, total: Duration) -> Self {
        Self { elapsed, total }
    }

    /// Produce the timing for the next frame, `elapsed` after this one
    pub fn advance(&self, elapsed: Duration) -> Time {
        Time {
            elapsed,
            total: self.total + elapsed,
        }
    }
}
