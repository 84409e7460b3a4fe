use std::sync::Arc;
use std::{io, process};

use log::{error, info, LevelFilter};
use syslog::Facility;

use door_monitor::notify::ScriptNotifier;
use door_monitor::termination::{self, Termination};
use door_monitor::{config, gpio, priority, Monitor};

const PROCESS_NAME: &str = "door-monitor";

fn main() -> Result<(), io::Error> {
    if let Err(err) = syslog::init(Facility::LOG_USER, LevelFilter::Info, Some(PROCESS_NAME)) {
        eprintln!("Unable to connect to syslog: {}", err);
    }

    let term = Arc::new(Termination::new());
    term.register_signals()?;

    if let Err(err) = priority::raise_to_realtime(priority::REALTIME_PRIORITY) {
        info!("Unable to raise scheduling priority: {}", err);
    }

    let hardware = match gpio::setup() {
        Ok(hardware) => hardware,
        Err(err) => {
            error!("Unable to set up GPIO: {}", err);
            eprintln!("Unable to set up GPIO: {}", err);
            process::exit(1);
        }
    };

    let notifier = ScriptNotifier::new(config::notify_script());
    let mut monitor = Monitor::new(
        hardware.sensor,
        hardware.gates,
        Arc::new(hardware.buzzer),
        Arc::new(notifier),
        Arc::clone(&term),
    );
    let signal = monitor.run();

    info!("Termination requested ({})", termination::signal_name(signal));
    Ok(())
}
