use std::sync::Arc;
use std::{io, thread};

use log::info;

use crate::buzzer::{self, Buzzer};
use crate::config::Timings;
use crate::{DoorStore, WorkerArg};

/// Sounds the opening pattern, then watches the store until a close newer
/// than the opening is recorded, sounding a reminder pulse every
/// `reminder_cycles` watch intervals in between.
pub fn watch(buzzer: &dyn Buzzer, store: &DoorStore, arg: WorkerArg, timings: &Timings) {
    let opened = arg.at;
    buzzer::sound(
        buzzer,
        timings.alert_repeats,
        timings.alert_on,
        timings.alert_off,
    );

    let mut cycles = 0;
    while store.snapshot() <= opened {
        thread::sleep(timings.watch_interval);
        cycles += 1;
        if cycles >= timings.reminder_cycles {
            info!("{}: Door is still open", opened.log_secs());
            buzzer::pulse(buzzer, timings.reminder_pulse);
            cycles = 0;
        }
    }
}

/// Starts a detached alert worker for one opening.
pub fn spawn(
    buzzer: Arc<dyn Buzzer>,
    store: DoorStore,
    arg: WorkerArg,
    timings: Timings,
) -> io::Result<()> {
    thread::Builder::new()
        .name("alert".into())
        .spawn(move || watch(buzzer.as_ref(), &store, arg, &timings))
        .map(drop)
}
