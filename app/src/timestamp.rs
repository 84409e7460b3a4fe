use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

const MICROS_PER_SEC: u32 = 1_000_000;

/// Wall-clock instant with microsecond resolution.
///
/// Ordering is lexicographic on (seconds, microseconds), which the derived
/// `Ord` provides through field order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    secs: u64,
    micros: u32,
}

impl Timestamp {
    /// The "never closed" value every real reading is newer than.
    pub const EPOCH: Timestamp = Timestamp { secs: 0, micros: 0 };

    /// Builds a timestamp, carrying excess microseconds into the seconds
    /// (saturating at `u64::MAX`).
    pub fn new(secs: u64, micros: u32) -> Self {
        Timestamp {
            secs: secs.saturating_add(u64::from(micros / MICROS_PER_SEC)),
            micros: micros % MICROS_PER_SEC,
        }
    }

    pub fn now() -> Self {
        SystemTime::now().into()
    }

    pub fn secs(&self) -> u64 {
        self.secs
    }

    pub fn micros(&self) -> u32 {
        self.micros
    }

    /// Whole seconds, the value used in log lines and notification arguments.
    pub fn log_secs(&self) -> u64 {
        self.secs
    }
}

impl From<SystemTime> for Timestamp {
    fn from(time: SystemTime) -> Self {
        // A clock set before 1970 reads as the epoch
        let since = time.duration_since(UNIX_EPOCH).unwrap_or_default();
        Timestamp::new(since.as_secs(), since.subsec_micros())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:06}", self.secs, self.micros)
    }
}
