//! Pedestrian signal on an RGB LED.
//!
//! Many development boards have no discrete walk/don't-walk lamps but do have
//! an RGB LED. [`RgbCrossingLights`] forwards the traffic lamps to any
//! [`LightOutput`] and renders the pedestrian lamps as a color: walk green,
//! don't-walk red, dark off.
//!
//! All colors are `palette::Srgb` in the 0.0-1.0 range.

use crate::controller::LightOutput;
use crate::types::{PedestrianLamps, TrafficLamps};
use palette::Srgb;

pub const WALK_COLOR: Srgb = Srgb::new(0.0, 1.0, 0.0);
pub const DONT_WALK_COLOR: Srgb = Srgb::new(1.0, 0.0, 0.0);
pub const DARK_COLOR: Srgb = Srgb::new(0.0, 0.0, 0.0);

/// Trait for abstracting RGB LED hardware.
///
/// Implement this for your LED hardware (GPIO, PWM, SPI, etc.). Color
/// components are in the range 0.0-1.0; convert them to the hardware's native
/// format. Handle any hardware errors internally - this method cannot fail.
pub trait RgbLed {
    /// Sets the LED to the specified RGB color.
    fn set_color(&mut self, color: Srgb);
}

/// Returns the color showing the given pedestrian lamps.
///
/// Walk and don't-walk lit together mix to yellow; no table state does this.
#[inline]
pub fn pedestrian_color(lamps: PedestrianLamps) -> Srgb {
    Srgb::new(
        if lamps.dont_walk() { 1.0 } else { 0.0 },
        if lamps.walk() { 1.0 } else { 0.0 },
        0.0,
    )
}

/// Light output splitting traffic lamps and an RGB pedestrian signal.
pub struct RgbCrossingLights<T: LightOutput, L: RgbLed> {
    traffic: T,
    pedestrian: L,
    current: Option<PedestrianLamps>,
}

impl<T: LightOutput, L: RgbLed> RgbCrossingLights<T, L> {
    /// Creates the output with the RGB LED turned off.
    pub fn new(traffic: T, mut pedestrian: L) -> Self {
        pedestrian.set_color(DARK_COLOR);

        Self {
            traffic,
            pedestrian,
            current: None,
        }
    }

    /// Returns the pedestrian lamps currently shown, if any write happened.
    pub fn current_pedestrian(&self) -> Option<PedestrianLamps> {
        self.current
    }

    /// Returns the traffic output and the RGB LED.
    pub fn release(self) -> (T, L) {
        (self.traffic, self.pedestrian)
    }
}

impl<T: LightOutput, L: RgbLed> LightOutput for RgbCrossingLights<T, L> {
    fn write_lights(&mut self, traffic: TrafficLamps, pedestrian: PedestrianLamps) {
        // Pedestrian lamps go to the RGB LED, not the traffic output
        self.traffic.write_lights(traffic, PedestrianLamps::DARK);

        // Update LED only if the pedestrian lamps changed
        if self.current != Some(pedestrian) {
            self.pedestrian.set_color(pedestrian_color(pedestrian));
            self.current = Some(pedestrian);
        }
    }
}
