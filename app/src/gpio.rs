use std::sync::Mutex;

use rppal::gpio::{Gpio, InputPin, OutputPin};

use crate::config::{ALERT_SWITCH_PIN, BUZZER_PIN, MASTER_SWITCH_PIN, SENSOR_PIN};
use crate::DoorState;

/// Source of door readings, owned by the poll loop.
pub trait Sensor {
    fn door_state(&mut self) -> DoorState;
}

impl Sensor for InputPin {
    fn door_state(&mut self) -> DoorState {
        self.read().into()
    }
}

/// Live reading of the two gate switches.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct GateState {
    pub master: bool,
    pub alert: bool,
}

impl GateState {
    pub const OPEN: GateState = GateState {
        master: true,
        alert: true,
    };
    pub const CLOSED: GateState = GateState {
        master: false,
        alert: false,
    };

    /// Alerting and notifying need at least one active switch.
    pub fn allows(&self) -> bool {
        self.master || self.alert
    }
}

pub trait GateInputs {
    fn sample(&mut self) -> GateState;
}

impl GateInputs for GateState {
    fn sample(&mut self) -> GateState {
        *self
    }
}

/// Gate switches wired to ground with the internal pull-up enabled, so a
/// low level means active.
pub struct GatePins {
    master: Option<InputPin>,
    alert: Option<InputPin>,
}

impl GateInputs for GatePins {
    fn sample(&mut self) -> GateState {
        if self.master.is_none() && self.alert.is_none() {
            return GateState::OPEN;
        }
        GateState {
            master: self.master.as_ref().map_or(false, InputPin::is_low),
            alert: self.alert.as_ref().map_or(false, InputPin::is_low),
        }
    }
}

pub struct Hardware {
    pub sensor: InputPin,
    pub gates: GatePins,
    pub buzzer: Mutex<OutputPin>,
}

pub fn setup() -> rppal::gpio::Result<Hardware> {
    let gpio = Gpio::new()?;
    let sensor = gpio.get(SENSOR_PIN)?.into_input_pullup();
    let mut buzzer = gpio.get(BUZZER_PIN)?.into_output();
    buzzer.set_low();
    let master = MASTER_SWITCH_PIN
        .map(|pin| gpio.get(pin).map(|pin| pin.into_input_pullup()))
        .transpose()?;
    let alert = ALERT_SWITCH_PIN
        .map(|pin| gpio.get(pin).map(|pin| pin.into_input_pullup()))
        .transpose()?;
    Ok(Hardware {
        sensor,
        gates: GatePins { master, alert },
        buzzer: Mutex::new(buzzer),
    })
}
