//! Intersection controller driving the state table.
//!
//! Provides [`Controller`] which steps a [`StateTable`] one cycle at a time:
//! write the current state's lamps, hold, sample the sensors and move to the
//! successor. Also defines the [`SensorInput`] and [`LightOutput`] traits for
//! hardware abstraction.

use crate::table::{Outputs, State, StateTable, TableError};
use crate::time::TickWait;
use crate::types::{PedestrianLamps, SensorWord, TrafficLamps};

/// Trait for abstracting the three presence detectors.
pub trait SensorInput {
    /// Returns the raw detector word.
    ///
    /// Bit 2 is the pedestrian detector, bit 1 north/south and bit 0
    /// east/west. Higher bits are ignored by the controller. Must have no side
    /// effects beyond the read and cannot fail.
    fn read_sensors(&mut self) -> u8;
}

/// Trait for abstracting the traffic and pedestrian lamps.
pub trait LightOutput {
    /// Lights exactly the given lamps.
    ///
    /// Must take effect immediately and be idempotent. Handle any hardware
    /// errors internally - this method cannot fail.
    fn write_lights(&mut self, traffic: TrafficLamps, pedestrian: PedestrianLamps);
}

impl<T: SensorInput + ?Sized> SensorInput for &mut T {
    fn read_sensors(&mut self) -> u8 {
        (**self).read_sensors()
    }
}

impl<T: LightOutput + ?Sized> LightOutput for &mut T {
    fn write_lights(&mut self, traffic: TrafficLamps, pedestrian: PedestrianLamps) {
        (**self).write_lights(traffic, pedestrian)
    }
}

/// What happened during one controller cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cycle {
    /// State whose outputs were shown.
    pub state: State,
    /// Outputs written and the hold that was waited.
    pub outputs: Outputs,
    /// Masked sensor reading taken after the hold.
    pub sensors: SensorWord,
    /// State the controller moved to.
    pub next: State,
}

/// Runs the intersection state machine against real or fake hardware.
///
/// The controller owns the current state and its collaborators. Each call to
/// [`Controller::step`] is one full cycle; the order lights, hold, sample,
/// transition never changes.
///
/// # Type Parameters
/// * `'t` - Lifetime of the state table reference
/// * `S` - Sensor implementation type
/// * `L` - Light output implementation type
/// * `W` - Tick wait implementation type
pub struct Controller<'t, S: SensorInput, L: LightOutput, W: TickWait> {
    table: &'t StateTable,
    sensors: S,
    lights: L,
    timer: W,
    state: State,
    cycles: u64,
}

impl<'t, S: SensorInput, L: LightOutput, W: TickWait> Controller<'t, S, L, W> {
    /// Creates a controller in [`State::INITIAL`].
    ///
    /// The table is validated here, before any cycle runs. No output is
    /// written until the first [`Controller::step`].
    ///
    /// # Errors
    /// Returns the first [`TableError`] the table violates.
    pub fn new(
        table: &'t StateTable,
        sensors: S,
        lights: L,
        timer: W,
    ) -> Result<Self, TableError> {
        table.validate()?;
        info!("controller starting in {:?}", State::INITIAL);

        Ok(Self {
            table,
            sensors,
            lights,
            timer,
            state: State::INITIAL,
            cycles: 0,
        })
    }

    /// Runs one full cycle and reports it.
    pub fn step(&mut self) -> Cycle {
        let state = self.state;
        let outputs = self.table.outputs_for(state);

        self.lights.write_lights(outputs.traffic, outputs.pedestrian);
        self.timer.wait_ticks(outputs.hold);

        let sensors = SensorWord::from_bits_truncate(self.sensors.read_sensors());
        let next = self.table.next_state(state, sensors);

        if next != state {
            debug!("{:?} -> {:?} on sensors {:?}", state, next, sensors.bits());
        } else {
            trace!("holding {:?} on sensors {:?}", state, sensors.bits());
        }

        self.state = next;
        self.cycles = self.cycles.wrapping_add(1);

        Cycle {
            state,
            outputs,
            sensors,
            next,
        }
    }

    /// Runs `count` cycles and returns the state reached.
    pub fn run_cycles(&mut self, count: usize) -> State {
        for _ in 0..count {
            self.step();
        }
        self.state
    }

    /// Runs forever.
    pub fn run(&mut self) -> ! {
        loop {
            self.step();
        }
    }

    /// Returns the state whose outputs the next cycle will show.
    pub fn state(&self) -> State {
        self.state
    }

    /// Returns the number of completed cycles.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Returns the table being run.
    pub fn table(&self) -> &'t StateTable {
        self.table
    }

    /// Returns a reference to the sensor collaborator.
    pub fn sensors(&self) -> &S {
        &self.sensors
    }

    /// Returns a mutable reference to the sensor collaborator.
    pub fn sensors_mut(&mut self) -> &mut S {
        &mut self.sensors
    }

    /// Returns a reference to the light collaborator.
    pub fn lights(&self) -> &L {
        &self.lights
    }

    /// Returns a reference to the tick wait collaborator.
    pub fn timer(&self) -> &W {
        &self.timer
    }

    /// Consumes the controller and returns its collaborators.
    pub fn release(self) -> (S, L, W) {
        (self.sensors, self.lights, self.timer)
    }
}
