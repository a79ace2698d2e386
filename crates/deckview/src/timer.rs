use std::time::{Duration, Instant};

/// Elapsed-time counter for the presenter view.
///
/// The displayed value is always derived from `banked + (now - running_since)`,
/// so there is no separate tick counter that could drift from wall time.
/// Every operation takes the current instant explicitly.
#[derive(Debug, Clone, Default)]
pub struct Timer {
    banked: Duration,
    running_since: Option<Instant>,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    pub fn start(&mut self, now: Instant) {
        if self.running_since.is_none() {
            self.running_since = Some(now);
        }
    }

    pub fn pause(&mut self, now: Instant) {
        if let Some(since) = self.running_since.take() {
            self.banked += now.saturating_duration_since(since);
            log::debug!("timer paused at {} ms", self.elapsed_ms(now));
        }
    }

    pub fn toggle(&mut self, now: Instant) {
        if self.is_running() {
            self.pause(now);
        } else {
            self.start(now);
        }
    }

    /// Stop and zero the counter.
    pub fn reset(&mut self) {
        self.banked = Duration::ZERO;
        self.running_since = None;
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        match self.running_since {
            Some(since) => self.banked + now.saturating_duration_since(since),
            None => self.banked,
        }
    }

    pub fn elapsed_ms(&self, now: Instant) -> u128 {
        self.elapsed(now).as_millis()
    }

    /// `MM:SS`, zero padded. Minutes keep growing past 59.
    pub fn display(&self, now: Instant) -> String {
        format_elapsed(self.elapsed(now))
    }
}

pub fn format_elapsed(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}
