pub mod alert;
pub mod buzzer;
pub mod config;
mod door_state;
pub mod gpio;
pub mod monitor;
pub mod notify;
pub mod priority;
mod store;
pub mod termination;
mod timestamp;

pub use door_state::{DoorState, Transition};
pub use monitor::Monitor;
pub use store::DoorStore;
pub use termination::{Termination, TerminationState};
pub use timestamp::Timestamp;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Event {
    Opened,
    Closed,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::Opened => "opened",
            Event::Closed => "closed",
        }
    }
}

/// Owned input of one alert or notification worker.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct WorkerArg {
    pub at: Timestamp,
    pub event: Event,
}

impl WorkerArg {
    pub fn new(at: Timestamp, event: Event) -> Self {
        WorkerArg { at, event }
    }
}
