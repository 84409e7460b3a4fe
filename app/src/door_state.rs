use std::fmt;

use rppal::gpio::Level;

use crate::Timestamp;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DoorState {
    Open,
    Closed,
    /// Startup sentinel, never produced by a sensor reading.
    Unknown,
}

impl From<Level> for DoorState {
    fn from(level: Level) -> Self {
        // The reed switch pulls the pin to ground while the magnet is near.
        match level {
            Level::Low => DoorState::Closed,
            Level::High => DoorState::Open,
        }
    }
}

impl fmt::Display for DoorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DoorState::Open => f.write_str("Open"),
            DoorState::Closed => f.write_str("Closed"),
            DoorState::Unknown => f.write_str("Unknown"),
        }
    }
}

/// Outcome of comparing two consecutive readings.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Transition {
    Unchanged,
    Closed(Timestamp),
    Opened(Timestamp),
}

impl Transition {
    /// Classifies the edge between `prev` and `curr`.
    ///
    /// Closing needs a confirmed open reading before it. Opening only needs
    /// a confirmed closed reading followed by anything that is not closed, so
    /// an indeterminate reading after a close still counts as opening.
    pub fn detect(prev: DoorState, curr: DoorState, at: Timestamp) -> Self {
        match (prev, curr) {
            (DoorState::Open, DoorState::Closed) => Transition::Closed(at),
            (DoorState::Closed, curr) if curr != DoorState::Closed => Transition::Opened(at),
            _ => Transition::Unchanged,
        }
    }
}
