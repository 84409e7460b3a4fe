//! Fixed startup configuration. Pin numbers are BCM GPIO numbers.

use std::path::PathBuf;
use std::time::Duration;

pub const SENSOR_PIN: u8 = 17; // header pin 11
pub const BUZZER_PIN: u8 = 9; // header pin 21
pub const MASTER_SWITCH_PIN: Option<u8> = Some(23); // header pin 16
pub const ALERT_SWITCH_PIN: Option<u8> = Some(24); // header pin 18

pub const NOTIFY_SCRIPT: &str = "door-sendmail.sh";
const DEFAULT_TARGET_DIR: &str = "/usr/local/bin";

/// Directory holding the notification script, fixed at build time through
/// the `TARGET_DIR` environment variable.
pub fn target_dir() -> &'static str {
    option_env!("TARGET_DIR").unwrap_or(DEFAULT_TARGET_DIR)
}

pub fn notify_script() -> PathBuf {
    PathBuf::from(target_dir()).join(NOTIFY_SCRIPT)
}

/// Every interval the monitor and its workers use.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Timings {
    pub poll_interval: Duration,
    pub notify_attempts: u32,
    pub notify_backoff: Duration,
    pub alert_repeats: u8,
    pub alert_on: Duration,
    pub alert_off: Duration,
    pub watch_interval: Duration,
    /// Watch cycles between "still open" reminders.
    pub reminder_cycles: u32,
    pub reminder_pulse: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Timings {
            poll_interval: Duration::from_millis(100),
            notify_attempts: 10,
            notify_backoff: Duration::from_millis(500),
            alert_repeats: 3,
            alert_on: Duration::from_millis(1000),
            alert_off: Duration::from_millis(500),
            watch_interval: Duration::from_secs(1),
            reminder_cycles: 5 * 60,
            reminder_pulse: Duration::from_secs(5),
        }
    }
}
