//! Board configuration for the hardware adapters.

use crate::time::DEFAULT_TICK_MILLIS;
use embedded_hal::digital::PinState;

/// Electrical level that means "on".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// High level is on.
    #[default]
    ActiveHigh,
    /// Low level is on (e.g. common-anode lamps, pull-up detectors).
    ActiveLow,
}

impl Polarity {
    /// Pin level that shows `on`.
    #[inline]
    pub const fn level(self, on: bool) -> PinState {
        match (self, on) {
            (Polarity::ActiveHigh, true) | (Polarity::ActiveLow, false) => PinState::High,
            (Polarity::ActiveHigh, false) | (Polarity::ActiveLow, true) => PinState::Low,
        }
    }

    /// Whether a pin reading `high` means on.
    #[inline]
    pub const fn is_on(self, high: bool) -> bool {
        match self {
            Polarity::ActiveHigh => high,
            Polarity::ActiveLow => !high,
        }
    }
}

/// Settings shared by the `hal` adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HalConfig {
    /// Length of one tick in milliseconds.
    pub tick_millis: u32,

    /// Polarity of the lamp outputs.
    pub lamp_polarity: Polarity,

    /// Polarity of the detector inputs.
    pub sensor_polarity: Polarity,
}

impl HalConfig {
    /// Reference board: 10 ms ticks, active-high lamps and detectors.
    pub const fn new() -> Self {
        Self {
            tick_millis: DEFAULT_TICK_MILLIS,
            lamp_polarity: Polarity::ActiveHigh,
            sensor_polarity: Polarity::ActiveHigh,
        }
    }

    /// Sets the tick length.
    pub const fn tick_millis(mut self, millis: u32) -> Self {
        self.tick_millis = millis;
        self
    }

    /// Sets the lamp polarity.
    pub const fn lamp_polarity(mut self, polarity: Polarity) -> Self {
        self.lamp_polarity = polarity;
        self
    }

    /// Sets the detector polarity.
    pub const fn sensor_polarity(mut self, polarity: Polarity) -> Self {
        self.sensor_polarity = polarity;
        self
    }
}

impl Default for HalConfig {
    fn default() -> Self {
        Self::new()
    }
}
