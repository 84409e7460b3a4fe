use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use rppal::gpio::OutputPin;

/// Alert output shared by every live alert worker.
pub trait Buzzer: Send + Sync {
    fn on(&self);
    fn off(&self);
}

impl Buzzer for Mutex<OutputPin> {
    fn on(&self) {
        self.lock().unwrap_or_else(PoisonError::into_inner).set_high();
    }

    fn off(&self) {
        self.lock().unwrap_or_else(PoisonError::into_inner).set_low();
    }
}

pub fn sound(buzzer: &dyn Buzzer, times: u8, on: Duration, off: Duration) {
    (0..times).for_each(|_| {
        buzzer.on();
        thread::sleep(on);
        buzzer.off();
        thread::sleep(off);
    })
}

pub fn pulse(buzzer: &dyn Buzzer, duration: Duration) {
    buzzer.on();
    thread::sleep(duration);
    buzzer.off();
}
