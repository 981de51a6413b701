//! `embedded-hal` implementations of the controller's collaborators.
//!
//! These adapters are the only device-facing part of the crate. Pin setup and
//! clocking stay with the board's HAL; hand the configured pins in here.

use crate::config::{HalConfig, Polarity};
use crate::controller::{LightOutput, SensorInput};
use crate::time::{TickWait, Ticks};
use crate::types::{PedestrianLamps, SensorWord, TrafficLamps};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

/// Presence detectors on three digital inputs.
///
/// Each detector may be a different pin type. A failed pin read counts as
/// "nothing present".
pub struct PinSensors<P: InputPin, N: InputPin, E: InputPin> {
    pedestrian: P,
    north_south: N,
    east_west: E,
    polarity: Polarity,
}

impl<P: InputPin, N: InputPin, E: InputPin> PinSensors<P, N, E> {
    /// Wraps the pedestrian, north/south and east/west detector pins.
    pub fn new(pedestrian: P, north_south: N, east_west: E, config: &HalConfig) -> Self {
        Self {
            pedestrian,
            north_south,
            east_west,
            polarity: config.sensor_polarity,
        }
    }

    /// Returns the pins.
    pub fn release(self) -> (P, N, E) {
        (self.pedestrian, self.north_south, self.east_west)
    }
}

fn sample<P: InputPin>(pin: &mut P, polarity: Polarity, name: &str) -> bool {
    match pin.is_high() {
        Ok(high) => polarity.is_on(high),
        Err(_) => {
            warn!("{} detector read failed", name);
            false
        }
    }
}

impl<P: InputPin, N: InputPin, E: InputPin> SensorInput for PinSensors<P, N, E> {
    fn read_sensors(&mut self) -> u8 {
        let pedestrian = sample(&mut self.pedestrian, self.polarity, "pedestrian");
        let north_south = sample(&mut self.north_south, self.polarity, "north/south");
        let east_west = sample(&mut self.east_west, self.polarity, "east/west");

        SensorWord::new(pedestrian, north_south, east_west).bits()
    }
}

/// Traffic and pedestrian lamps on eight digital outputs.
///
/// The six traffic pins are held in one array and so share a type `T`. On HALs
/// with a distinct type per pin, pass their erased or degraded form (for
/// example a port-erased `Output`). The walk and don't-walk pins keep their own
/// types.
///
/// Write errors are logged and skipped; the remaining lamps are still driven.
pub struct PinLights<T: OutputPin, W: OutputPin, D: OutputPin> {
    traffic: [T; TrafficLamps::LAMP_COUNT],
    walk: W,
    dont_walk: D,
    polarity: Polarity,
}

impl<T: OutputPin, W: OutputPin, D: OutputPin> PinLights<T, W, D> {
    /// Wraps the lamp pins.
    ///
    /// `traffic` is in wiring order: north/south green, yellow, red, then
    /// east/west green, yellow, red.
    pub fn new(
        traffic: [T; TrafficLamps::LAMP_COUNT],
        walk: W,
        dont_walk: D,
        config: &HalConfig,
    ) -> Self {
        Self {
            traffic,
            walk,
            dont_walk,
            polarity: config.lamp_polarity,
        }
    }

    /// Returns the pins.
    pub fn release(self) -> ([T; TrafficLamps::LAMP_COUNT], W, D) {
        (self.traffic, self.walk, self.dont_walk)
    }
}

fn drive<P: OutputPin>(pin: &mut P, polarity: Polarity, on: bool) {
    if pin.set_state(polarity.level(on)).is_err() {
        warn!("lamp write failed");
    }
}

impl<T: OutputPin, W: OutputPin, D: OutputPin> LightOutput for PinLights<T, W, D> {
    fn write_lights(&mut self, traffic: TrafficLamps, pedestrian: PedestrianLamps) {
        for (bit, pin) in self.traffic.iter_mut().enumerate() {
            drive(pin, self.polarity, traffic.lamp(bit));
        }
        drive(&mut self.walk, self.polarity, pedestrian.walk());
        drive(&mut self.dont_walk, self.polarity, pedestrian.dont_walk());
    }
}

/// Blocking tick wait on a `DelayNs` provider.
pub struct DelayTicks<D: DelayNs> {
    delay: D,
    tick_millis: u32,
}

impl<D: DelayNs> DelayTicks<D> {
    /// Wraps a delay provider, using the configured tick length.
    pub fn new(delay: D, config: &HalConfig) -> Self {
        Self {
            delay,
            tick_millis: config.tick_millis,
        }
    }

    /// Returns the delay provider.
    pub fn release(self) -> D {
        self.delay
    }
}

impl<D: DelayNs> TickWait for DelayTicks<D> {
    fn wait_ticks(&mut self, ticks: Ticks) {
        // One delay per tick keeps each call short on timers with narrow counters.
        for _ in 0..ticks.get() {
            self.delay.delay_ms(self.tick_millis);
        }
    }
}
