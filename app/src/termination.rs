use std::io;
use std::os::raw::c_int;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, TryLockError};

use signal_hook::consts::{SIGINT, SIGTERM, SIGUSR1};

pub const STOP_SIGNALS: [c_int; 3] = [SIGINT, SIGTERM, SIGUSR1];

const RUNNING: usize = 0;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TerminationState {
    Running,
    StopRequested(c_int),
    Stopped(c_int),
}

/// Running -> StopRequested -> Stopped.
///
/// The request is a plain atomic store of the signal number, which is all a
/// signal handler does. Committing to Stopped happens under a lock that
/// the poll loop only ever tries, so it never blocks on it.
#[derive(Debug)]
pub struct Termination {
    requested: Arc<AtomicUsize>,
    stopped: Mutex<Option<c_int>>,
}

impl Termination {
    pub fn new() -> Self {
        Termination {
            requested: Arc::new(AtomicUsize::new(RUNNING)),
            stopped: Mutex::new(None),
        }
    }

    /// Routes every stop signal to an atomic store of its number.
    pub fn register_signals(&self) -> io::Result<()> {
        for &signal in STOP_SIGNALS.iter() {
            signal_hook::flag::register_usize(
                signal,
                Arc::clone(&self.requested),
                signal as usize,
            )?;
        }
        Ok(())
    }

    /// What a signal handler would do, for callers outside one.
    pub fn request(&self, signal: c_int) {
        self.requested.store(signal as usize, Ordering::SeqCst);
    }

    pub fn requested(&self) -> Option<c_int> {
        match self.requested.load(Ordering::SeqCst) {
            RUNNING => None,
            signal => Some(signal as c_int),
        }
    }

    /// Commits a pending stop request. Returns the signal once stopped, or
    /// `None` if nothing is pending or the commit lock is busy.
    pub fn try_commit(&self) -> Option<c_int> {
        let signal = self.requested()?;
        let mut stopped = match self.stopped.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return None,
        };
        Some(*stopped.get_or_insert(signal))
    }

    pub fn state(&self) -> TerminationState {
        let stopped = *self.stopped.lock().unwrap_or_else(PoisonError::into_inner);
        match (stopped, self.requested()) {
            (Some(signal), _) => TerminationState::Stopped(signal),
            (None, Some(signal)) => TerminationState::StopRequested(signal),
            (None, None) => TerminationState::Running,
        }
    }

    #[cfg(test)]
    pub(crate) fn hold_commit_lock(&self) -> std::sync::MutexGuard<'_, Option<c_int>> {
        self.stopped.lock().unwrap()
    }
}

impl Default for Termination {
    fn default() -> Self {
        Termination::new()
    }
}

pub fn signal_name(signal: c_int) -> &'static str {
    match signal {
        SIGINT => "SIGINT",
        SIGTERM => "SIGTERM",
        SIGUSR1 => "SIGUSR1",
        _ => "unknown signal",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_the_states_in_order() {
        let term = Termination::new();
        assert_eq!(term.state(), TerminationState::Running);
        assert_eq!(term.try_commit(), None);

        term.request(SIGTERM);
        assert_eq!(term.state(), TerminationState::StopRequested(SIGTERM));

        assert_eq!(term.try_commit(), Some(SIGTERM));
        assert_eq!(term.state(), TerminationState::Stopped(SIGTERM));
    }

    #[test]
    fn busy_lock_defers_the_commit() {
        let term = Termination::new();
        term.request(SIGINT);
        {
            let _held = term.hold_commit_lock();
            assert_eq!(term.try_commit(), None);
        }
        assert_eq!(term.try_commit(), Some(SIGINT));
    }

    #[test]
    fn first_commit_keeps_its_signal() {
        let term = Termination::new();
        term.request(SIGINT);
        assert_eq!(term.try_commit(), Some(SIGINT));
        term.request(SIGUSR1);
        assert_eq!(term.try_commit(), Some(SIGINT));
    }

    #[test]
    fn real_signal_requests_stop() {
        let term = Termination::new();
        term.register_signals().unwrap();
        signal_hook::low_level::raise(SIGUSR1).unwrap();
        assert_eq!(term.requested(), Some(SIGUSR1));
        assert_eq!(signal_name(SIGUSR1), "SIGUSR1");
    }
}
