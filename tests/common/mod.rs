//! Shared test infrastructure for intersection-fsm integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use core::convert::Infallible;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorKind, ErrorType, InputPin, OutputPin, PinState};
use intersection_fsm::{
    LightOutput, PedestrianLamps, RgbLed, SensorInput, Srgb, TickWait, Ticks, TrafficLamps,
};

pub const HISTORY: usize = 256;

// ============================================================================
// Controller collaborators
// ============================================================================

/// Sensors that replay a script, then repeat its last reading forever
pub struct ScriptedSensors {
    script: heapless::Vec<u8, HISTORY>,
    position: usize,
    reads: usize,
}

impl ScriptedSensors {
    pub fn new(script: &[u8]) -> Self {
        Self {
            script: heapless::Vec::from_slice(script).unwrap(),
            position: 0,
            reads: 0,
        }
    }

    /// Always returns the same reading
    pub fn constant(reading: u8) -> Self {
        Self::new(&[reading])
    }

    pub fn reads(&self) -> usize {
        self.reads
    }

    /// Replaces the script and starts over
    pub fn set_script(&mut self, script: &[u8]) {
        self.script = heapless::Vec::from_slice(script).unwrap();
        self.position = 0;
    }
}

impl SensorInput for ScriptedSensors {
    fn read_sensors(&mut self) -> u8 {
        self.reads += 1;
        let reading = self
            .script
            .get(self.position)
            .or(self.script.last())
            .copied()
            .unwrap_or(0);
        self.position += 1;
        reading
    }
}

/// Light output that records every write
pub struct RecordingLights {
    history: heapless::Vec<(TrafficLamps, PedestrianLamps), HISTORY>,
}

impl RecordingLights {
    pub fn new() -> Self {
        Self {
            history: heapless::Vec::new(),
        }
    }

    pub fn history(&self) -> &[(TrafficLamps, PedestrianLamps)] {
        &self.history
    }

    pub fn last(&self) -> Option<(TrafficLamps, PedestrianLamps)> {
        self.history.last().copied()
    }
}

impl LightOutput for RecordingLights {
    fn write_lights(&mut self, traffic: TrafficLamps, pedestrian: PedestrianLamps) {
        let _ = self.history.push((traffic, pedestrian));
    }
}

/// Tick wait that records holds instead of blocking
pub struct RecordingTimer {
    waits: heapless::Vec<Ticks, HISTORY>,
    total: u64,
}

impl RecordingTimer {
    pub fn new() -> Self {
        Self {
            waits: heapless::Vec::new(),
            total: 0,
        }
    }

    pub fn waits(&self) -> &[Ticks] {
        &self.waits
    }

    pub fn total_ticks(&self) -> u64 {
        self.total
    }
}

impl TickWait for RecordingTimer {
    fn wait_ticks(&mut self, ticks: Ticks) {
        self.total += u64::from(ticks.get());
        let _ = self.waits.push(ticks);
    }
}

// ============================================================================
// Interleaving log
// ============================================================================

/// One collaborator call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Write,
    Wait(Ticks),
    Read,
}

/// Collaborator that logs every call into one shared sequence
pub struct EventLog {
    events: core::cell::RefCell<heapless::Vec<Event, HISTORY>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            events: core::cell::RefCell::new(heapless::Vec::new()),
        }
    }

    pub fn events(&self) -> heapless::Vec<Event, HISTORY> {
        self.events.borrow().clone()
    }

    fn push(&self, event: Event) {
        let _ = self.events.borrow_mut().push(event);
    }
}

pub struct LoggedSensors<'a>(pub &'a EventLog, pub u8);
pub struct LoggedLights<'a>(pub &'a EventLog);
pub struct LoggedTimer<'a>(pub &'a EventLog);

impl SensorInput for LoggedSensors<'_> {
    fn read_sensors(&mut self) -> u8 {
        self.0.push(Event::Read);
        self.1
    }
}

impl LightOutput for LoggedLights<'_> {
    fn write_lights(&mut self, _traffic: TrafficLamps, _pedestrian: PedestrianLamps) {
        self.0.push(Event::Write);
    }
}

impl TickWait for LoggedTimer<'_> {
    fn wait_ticks(&mut self, ticks: Ticks) {
        self.0.push(Event::Wait(ticks));
    }
}

// ============================================================================
// Mock embedded-hal pins and delay
// ============================================================================

/// Input pin with a settable level
pub struct MockInputPin {
    high: bool,
}

impl MockInputPin {
    pub fn new(high: bool) -> Self {
        Self { high }
    }
}

impl ErrorType for MockInputPin {
    type Error = Infallible;
}

impl InputPin for MockInputPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.high)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.high)
    }
}

/// Input pin that fails every read
pub struct FailingInputPin;

impl ErrorType for FailingInputPin {
    type Error = ErrorKind;
}

impl InputPin for FailingInputPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Err(ErrorKind::Other)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Err(ErrorKind::Other)
    }
}

/// Output pin that remembers its level and counts writes
pub struct MockOutputPin {
    level: Option<PinState>,
    writes: usize,
}

impl MockOutputPin {
    pub fn new() -> Self {
        Self {
            level: None,
            writes: 0,
        }
    }

    pub fn level(&self) -> Option<PinState> {
        self.level
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl ErrorType for MockOutputPin {
    type Error = Infallible;
}

impl OutputPin for MockOutputPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.level = Some(PinState::Low);
        self.writes += 1;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.level = Some(PinState::High);
        self.writes += 1;
        Ok(())
    }
}

/// Output pin whose every write fails
pub struct FailingOutputPin;

impl ErrorType for FailingOutputPin {
    type Error = ErrorKind;
}

impl OutputPin for FailingOutputPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Err(ErrorKind::Other)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Err(ErrorKind::Other)
    }
}

/// Eight fresh output pins: six traffic lamps, walk, don't-walk
pub fn output_pins() -> ([MockOutputPin; 6], MockOutputPin, MockOutputPin) {
    (
        core::array::from_fn(|_| MockOutputPin::new()),
        MockOutputPin::new(),
        MockOutputPin::new(),
    )
}

/// Delay that adds up requested time instead of sleeping
pub struct MockDelay {
    total_ns: u64,
    calls: usize,
}

impl MockDelay {
    pub fn new() -> Self {
        Self {
            total_ns: 0,
            calls: 0,
        }
    }

    pub fn total_millis(&self) -> u64 {
        self.total_ns / 1_000_000
    }

    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
        self.calls += 1;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.total_ns += u64::from(ms) * 1_000_000;
        self.calls += 1;
    }
}

// ============================================================================
// Mock RGB LED
// ============================================================================

/// Mock LED that records all color changes for testing
pub struct MockLed {
    current_color: Srgb,
    color_history: heapless::Vec<Srgb, 32>,
}

impl MockLed {
    pub fn new() -> Self {
        Self {
            current_color: Srgb::new(0.0, 0.0, 0.0),
            color_history: heapless::Vec::new(),
        }
    }

    pub fn get_last_color(&self) -> Srgb {
        self.current_color
    }

    pub fn color_history(&self) -> &[Srgb] {
        &self.color_history
    }
}

impl RgbLed for MockLed {
    fn set_color(&mut self, color: Srgb) {
        self.current_color = color;
        let _ = self.color_history.push(color);
    }
}
