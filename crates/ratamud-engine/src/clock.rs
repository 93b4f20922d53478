//! In-game clock advanced by `update`.

use std::fmt;

const MINUTES_PER_HOUR: u64 = 60;
const MINUTES_PER_DAY: u64 = 24 * MINUTES_PER_HOUR;
/// The game opens on day 1 at 09:00.
const START_MINUTE: u64 = 9 * MINUTES_PER_HOUR;

/// Converts real elapsed milliseconds into whole in-game minutes.
///
/// Leftover milliseconds carry over between calls, so many small ticks add up
/// to the same time as one large one.
#[derive(Debug, Clone)]
pub struct GameClock {
    ms_per_minute: u64,
    pending_ms: u64,
    elapsed_minutes: u64,
}

impl GameClock {
    /// Create a clock at day 1, 09:00.
    pub fn new(ms_per_minute: u64) -> Self {
        Self {
            ms_per_minute: ms_per_minute.max(1),
            pending_ms: 0,
            elapsed_minutes: 0,
        }
    }

    /// Add real time. Returns how many in-game minutes completed.
    pub fn advance(&mut self, delta_ms: u64) -> u64 {
        self.pending_ms = self.pending_ms.saturating_add(delta_ms);
        let minutes = self.pending_ms / self.ms_per_minute;
        self.pending_ms %= self.ms_per_minute;
        self.elapsed_minutes = self.elapsed_minutes.saturating_add(minutes);
        minutes
    }

    /// In-game minutes since the clock started.
    pub fn elapsed_minutes(&self) -> u64 {
        self.elapsed_minutes
    }

    fn absolute_minutes(&self) -> u64 {
        START_MINUTE.saturating_add(self.elapsed_minutes)
    }

    /// Day number, starting at 1.
    pub fn day(&self) -> u64 {
        self.absolute_minutes() / MINUTES_PER_DAY + 1
    }

    /// Hour of the day (0-23).
    pub fn hour(&self) -> u64 {
        self.absolute_minutes() % MINUTES_PER_DAY / MINUTES_PER_HOUR
    }

    /// Minute of the hour (0-59).
    pub fn minute(&self) -> u64 {
        self.absolute_minutes() % MINUTES_PER_HOUR
    }

    /// Total in-game hours since day 1, 00:00. Changes exactly when a new hour
    /// begins.
    pub fn hour_stamp(&self) -> u64 {
        self.absolute_minutes() / MINUTES_PER_HOUR
    }
}

impl fmt::Display for GameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Day {} {:02}:{:02}",
            self.day(),
            self.hour(),
            self.minute()
        )
    }
}
