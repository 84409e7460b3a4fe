use std::sync::{Arc, Mutex, PoisonError};

use crate::Timestamp;

/// Timestamp of the most recent close, shared between the poll loop and
/// every live alert worker.
///
/// The lock is held only for the copy in or out, never across a sleep or a
/// collaborator call. Last writer wins, whatever the timestamp values.
#[derive(Clone, Debug)]
pub struct DoorStore {
    latest_closed: Arc<Mutex<Timestamp>>,
}

impl DoorStore {
    pub fn new(initial: Timestamp) -> Self {
        DoorStore {
            latest_closed: Arc::new(Mutex::new(initial)),
        }
    }

    pub fn record_closed(&self, at: Timestamp) {
        // A poisoned lock still holds a whole `Timestamp`, writes are a single copy.
        *self
            .latest_closed
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = at;
    }

    pub fn snapshot(&self) -> Timestamp {
        *self
            .latest_closed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for DoorStore {
    fn default() -> Self {
        DoorStore::new(Timestamp::EPOCH)
    }
}
