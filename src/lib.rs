#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`State`**: The nine controller states, from `GoNorthSouth` through the pedestrian clearance blink
//! - **`StateTable`**: Immutable map from state to lamps, hold and an 8-entry transition row
//! - **`SensorWord`**: The masked 3-bit detector reading (pedestrian, north/south, east/west)
//! - **`TrafficLamps`** / **`PedestrianLamps`**: Bit-encoded lamp words in the historical wiring order
//! - **`Controller`**: Runs the table one cycle at a time: lamps, hold, sample, transition
//! - **`SensorInput`**, **`LightOutput`**, **`TickWait`**: Traits to implement for your hardware
//! - **`hal`**: Ready-made implementations over `embedded-hal` pins and delays
//! - **`RgbCrossingLights`**: Shows the pedestrian signal on an RGB LED
//!
//! The built-in table is validated when a controller is created; custom tables
//! go through the same checks.

#[macro_use]
mod fmt;

pub mod colors;
pub mod config;
pub mod controller;
pub mod hal;
pub mod table;
pub mod time;
pub mod types;

pub use colors::{RgbCrossingLights, RgbLed, pedestrian_color};
pub use config::{HalConfig, Polarity};
pub use controller::{Controller, Cycle, LightOutput, SensorInput};
pub use table::{Outputs, State, StateRecord, StateTable, TableError};
pub use time::{DEFAULT_TICK_MILLIS, TickWait, Ticks};
pub use types::{Approach, PedestrianLamps, SensorWord, TrafficLamps};

// Re-export Srgb from palette for user convenience
pub use palette::Srgb;
