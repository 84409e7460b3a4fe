use std::os::raw::c_int;
use std::sync::Arc;
use std::{io, thread};

use log::info;

use crate::buzzer::Buzzer;
use crate::config::Timings;
use crate::gpio::{GateInputs, Sensor};
use crate::notify::Notifier;
use crate::termination::Termination;
use crate::{alert, notify, DoorState, DoorStore, Event, Timestamp, Transition, WorkerArg};

/// The poll loop. Owns the sensor and gate inputs, writes the shared store
/// and launches detached workers on transitions.
pub struct Monitor<S, G> {
    sensor: S,
    gates: G,
    buzzer: Arc<dyn Buzzer>,
    notifier: Arc<dyn Notifier>,
    termination: Arc<Termination>,
    store: DoorStore,
    timings: Timings,
    previous: DoorState,
}

impl<S: Sensor, G: GateInputs> Monitor<S, G> {
    pub fn new(
        sensor: S,
        gates: G,
        buzzer: Arc<dyn Buzzer>,
        notifier: Arc<dyn Notifier>,
        termination: Arc<Termination>,
    ) -> Self {
        Monitor {
            sensor,
            gates,
            buzzer,
            notifier,
            termination,
            store: DoorStore::default(),
            timings: Timings::default(),
            previous: DoorState::Unknown,
        }
    }

    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }

    pub fn store(&self) -> &DoorStore {
        &self.store
    }

    /// Polls until a stop request is committed, returning its signal.
    pub fn run(&mut self) -> c_int {
        loop {
            if let Some(signal) = self.termination.try_commit() {
                return signal;
            }
            self.poll();
            thread::sleep(self.timings.poll_interval);
        }
    }

    /// One cycle without the sleep: read, classify, act.
    pub fn poll(&mut self) -> Transition {
        let current = self.sensor.door_state();
        let now = Timestamp::now();
        let gates = self.gates.sample();
        let transition = Transition::detect(self.previous, current, now);
        self.previous = current;

        match transition {
            Transition::Closed(at) => {
                self.store.record_closed(at);
                info!("{}: Door closed", at.log_secs());
                if gates.allows() {
                    self.launch_notify(WorkerArg::new(at, Event::Closed));
                }
            }
            Transition::Opened(at) => {
                info!("{}: Door opened", at.log_secs());
                if gates.allows() {
                    self.launch_alert(WorkerArg::new(at, Event::Opened));
                    self.launch_notify(WorkerArg::new(at, Event::Opened));
                }
            }
            Transition::Unchanged => {}
        }
        transition
    }

    fn launch_alert(&self, arg: WorkerArg) {
        let secs = arg.at.log_secs();
        if let Err(err) = alert::spawn(
            Arc::clone(&self.buzzer),
            self.store.clone(),
            arg,
            self.timings,
        ) {
            launch_failed("alert", secs, &err);
        }
    }

    fn launch_notify(&self, arg: WorkerArg) {
        let secs = arg.at.log_secs();
        if let Err(err) = notify::spawn(
            Arc::clone(&self.notifier),
            arg,
            self.timings.notify_attempts,
            self.timings.notify_backoff,
        ) {
            launch_failed("notification", secs, &err);
        }
    }
}

/// The event is dropped, the loop carries on.
fn launch_failed(worker: &str, secs: u64, err: &io::Error) {
    info!("{}: Unable to start {} worker: {}", secs, worker, err);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buzzer::tests::CountingBuzzer;
    use crate::gpio::GateState;
    use crate::notify::tests::StubNotifier;
    use log::{Level, LevelFilter, Log, Metadata, Record};
    use signal_hook::consts::SIGTERM;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{mpsc, Mutex};
    use std::time::Duration;

    /// Reports the door closed and counts reads.
    struct CountingSensor(Arc<AtomicUsize>);

    impl Sensor for CountingSensor {
        fn door_state(&mut self) -> DoorState {
            self.0.fetch_add(1, Ordering::SeqCst);
            DoorState::Closed
        }
    }

    /// Replays a fixed list of readings.
    struct Scripted(std::vec::IntoIter<DoorState>);

    impl Sensor for Scripted {
        fn door_state(&mut self) -> DoorState {
            self.0.next().unwrap_or(DoorState::Unknown)
        }
    }

    fn monitor(
        reads: &Arc<AtomicUsize>,
        termination: &Arc<Termination>,
    ) -> Monitor<CountingSensor, GateState> {
        Monitor::new(
            CountingSensor(Arc::clone(reads)),
            GateState::OPEN,
            Arc::new(CountingBuzzer::default()),
            Arc::new(StubNotifier::failing(0)),
            Arc::clone(termination),
        )
        .with_timings(Timings {
            poll_interval: Duration::from_millis(1),
            ..Timings::default()
        })
    }

    #[test]
    fn pending_stop_exits_before_polling() {
        let reads = Arc::new(AtomicUsize::new(0));
        let termination = Arc::new(Termination::new());
        termination.request(SIGTERM);

        assert_eq!(monitor(&reads, &termination).run(), SIGTERM);
        assert_eq!(reads.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn busy_commit_lock_keeps_polling() {
        let reads = Arc::new(AtomicUsize::new(0));
        let termination = Arc::new(Termination::new());
        termination.request(SIGTERM);

        let held = termination.hold_commit_lock();
        let (tx, rx) = mpsc::channel();
        {
            let mut monitor = monitor(&reads, &termination);
            thread::spawn(move || {
                let _ = tx.send(monitor.run());
            });
        }
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
        assert!(reads.load(Ordering::SeqCst) > 0);

        drop(held);
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)), Ok(SIGTERM));
    }

    /// Keeps every record whose message mentions a worker start failure.
    struct Capture;

    static CAPTURED: Mutex<Vec<(Level, String)>> = Mutex::new(Vec::new());
    static CAPTURE: Capture = Capture;

    impl Log for Capture {
        fn enabled(&self, _: &Metadata<'_>) -> bool {
            true
        }

        fn log(&self, record: &Record<'_>) {
            let message = record.args().to_string();
            if message.contains("Unable to start") {
                CAPTURED.lock().unwrap().push((record.level(), message));
            }
        }

        fn flush(&self) {}
    }

    #[test]
    fn launch_failure_logs_at_info() {
        let _ = log::set_logger(&CAPTURE);
        log::set_max_level(LevelFilter::Trace);

        let err = io::Error::new(io::ErrorKind::WouldBlock, "no threads left");
        launch_failed("alert", 42, &err);

        let captured = CAPTURED.lock().unwrap();
        assert_eq!(
            captured.as_slice(),
            &[(
                Level::Info,
                "42: Unable to start alert worker: no threads left".to_string()
            )]
        );
    }

    #[test]
    fn closed_gates_still_record_closes() {
        let notifier = Arc::new(StubNotifier::failing(0));
        let buzzer = Arc::new(CountingBuzzer::default());
        let readings = vec![DoorState::Open, DoorState::Closed, DoorState::Open];
        let mut monitor = Monitor::new(
            Scripted(readings.into_iter()),
            GateState::CLOSED,
            Arc::clone(&buzzer) as Arc<dyn Buzzer>,
            Arc::clone(&notifier) as Arc<dyn Notifier>,
            Arc::new(Termination::new()),
        );

        assert_eq!(monitor.poll(), Transition::Unchanged);
        let closed = match monitor.poll() {
            Transition::Closed(at) => at,
            other => panic!("expected a close, got {:?}", other),
        };
        assert_eq!(monitor.store().snapshot(), closed);
        assert!(matches!(monitor.poll(), Transition::Opened(_)));

        thread::sleep(Duration::from_millis(50));
        assert_eq!(notifier.call_count(), 0);
        assert_eq!(buzzer.ons.load(Ordering::SeqCst), 0);
    }
}
