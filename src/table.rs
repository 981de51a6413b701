//! The intersection's control policy as pure data.
//!
//! Provides [`StateTable`], an immutable map from [`State`] to [`StateRecord`],
//! and the validation that every table must pass before a controller will run
//! it.

use crate::time::Ticks;
use crate::types::{Approach, PedestrianLamps, SensorWord, TrafficLamps};
use heapless::Vec;

/// Controller state identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum State {
    /// North/south green.
    GoNorthSouth,
    /// North/south yellow.
    WaitNorthSouth,
    /// East/west green.
    GoEastWest,
    /// East/west yellow.
    WaitEastWest,
    /// All red, walk lit.
    GoPedestrian,
    /// Clearance blink, don't-walk lit.
    WalkOnPhase1,
    /// Clearance blink, pedestrian lamps dark.
    WalkOffPhase1,
    /// Clearance blink, don't-walk lit.
    WalkOnPhase2,
    /// Clearance blink, pedestrian lamps dark. Leaves the clearance sequence.
    WalkOffPhase2,
}

impl State {
    /// Number of states.
    pub const COUNT: usize = 9;

    /// The state the controller starts in.
    pub const INITIAL: State = State::GoNorthSouth;

    /// All states in table order.
    pub const ALL: [State; State::COUNT] = [
        State::GoNorthSouth,
        State::WaitNorthSouth,
        State::GoEastWest,
        State::WaitEastWest,
        State::GoPedestrian,
        State::WalkOnPhase1,
        State::WalkOffPhase1,
        State::WalkOnPhase2,
        State::WalkOffPhase2,
    ];

    /// Position of this state's record in the table.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns true for the four traffic Go/Wait states.
    pub const fn is_traffic(self) -> bool {
        matches!(
            self,
            State::GoNorthSouth | State::WaitNorthSouth | State::GoEastWest | State::WaitEastWest
        )
    }

    /// Returns true for the clearance states whose successor must not depend
    /// on input. The last clearance state is excluded: it picks the next Go
    /// state from the final reading.
    pub const fn is_timed_clearance(self) -> bool {
        matches!(
            self,
            State::WalkOnPhase1 | State::WalkOffPhase1 | State::WalkOnPhase2
        )
    }
}

/// Outputs and hold for one state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Outputs {
    pub traffic: TrafficLamps,
    pub pedestrian: PedestrianLamps,
    pub hold: Ticks,
}

/// A single row of the state table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateRecord {
    /// Traffic lamps lit while in this state.
    pub traffic: TrafficLamps,

    /// Pedestrian lamps lit while in this state.
    pub pedestrian: PedestrianLamps,

    /// How long outputs are held before the next sensor sample.
    pub hold: Ticks,

    /// Successor for each sensor reading, indexed by [`SensorWord::index`].
    pub next: [State; SensorWord::COUNT],
}

impl StateRecord {
    /// Creates a new record.
    pub const fn new(
        traffic: TrafficLamps,
        pedestrian: PedestrianLamps,
        hold: Ticks,
        next: [State; SensorWord::COUNT],
    ) -> Self {
        Self {
            traffic,
            pedestrian,
            hold,
            next,
        }
    }

    /// Returns the outputs of this record.
    #[inline]
    pub const fn outputs(&self) -> Outputs {
        Outputs {
            traffic: self.traffic,
            pedestrian: self.pedestrian,
            hold: self.hold,
        }
    }
}

/// Table validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TableError {
    /// A state has a zero hold.
    ZeroHold(State),

    /// A state lights green for both approaches.
    ConflictingGreens(State),

    /// A transition lights a green while the previous state still showed the
    /// crossing approach green, or drops a green straight to red.
    UnsafeTransition { from: State, to: State },

    /// A state cannot be reached from [`State::INITIAL`].
    Unreachable(State),

    /// A traffic state can hold off a waiting pedestrian forever.
    PedestrianStarved(State),

    /// A timed clearance state changes its successor with the input.
    ClearanceInterrupted(State),
}

impl core::fmt::Display for TableError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TableError::ZeroHold(state) => {
                write!(f, "state {:?} has a zero hold", state)
            }
            TableError::ConflictingGreens(state) => {
                write!(f, "state {:?} lights green for both approaches", state)
            }
            TableError::UnsafeTransition { from, to } => {
                write!(
                    f,
                    "transition {:?} -> {:?} skips the caution phase",
                    from, to
                )
            }
            TableError::Unreachable(state) => {
                write!(f, "state {:?} is unreachable from the initial state", state)
            }
            TableError::PedestrianStarved(state) => {
                write!(
                    f,
                    "state {:?} can starve a waiting pedestrian indefinitely",
                    state
                )
            }
            TableError::ClearanceInterrupted(state) => {
                write!(
                    f,
                    "clearance state {:?} reacts to sensor input",
                    state
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TableError {}

use State::{
    GoEastWest as GoEW, GoNorthSouth as GoNS, GoPedestrian as GoPed, WaitEastWest as WaitEW,
    WaitNorthSouth as WaitNS, WalkOffPhase1 as Off1, WalkOffPhase2 as Off2,
    WalkOnPhase1 as On1, WalkOnPhase2 as On2,
};

const GO_HOLD: Ticks = Ticks(600);
const CAUTION_HOLD: Ticks = Ticks(200);
const BLINK_HOLD: Ticks = Ticks(50);

// Columns are the sensor word: pedestrian, north/south, east/west.
//
// Rows follow the historical controller with one change: WalkOffPhase2 on a
// pedestrian-only reading (100) exits to GoNS, where the historical data went
// to GoEW. With no car demand, every exit from the clearance goes north/south.
#[rustfmt::skip]
const INTERSECTION: [StateRecord; State::COUNT] = [
    //                                                                                                  000    001     010     011     100    101    110    111
    StateRecord::new(TrafficLamps::NS_GREEN.union(TrafficLamps::EW_RED), PedestrianLamps::DONT_WALK, GO_HOLD,      [GoNS,  WaitNS, GoNS,   WaitNS, WaitNS, WaitNS, WaitNS, WaitNS]),
    StateRecord::new(TrafficLamps::NS_YELLOW.union(TrafficLamps::EW_RED), PedestrianLamps::DONT_WALK, CAUTION_HOLD, [GoEW,  GoEW,   GoNS,   GoEW,   GoPed,  GoPed,  GoPed,  GoEW]),
    StateRecord::new(TrafficLamps::EW_GREEN.union(TrafficLamps::NS_RED), PedestrianLamps::DONT_WALK, GO_HOLD,      [GoEW,  GoEW,   WaitEW, WaitEW, WaitEW, WaitEW, WaitEW, WaitEW]),
    StateRecord::new(TrafficLamps::EW_YELLOW.union(TrafficLamps::NS_RED), PedestrianLamps::DONT_WALK, CAUTION_HOLD, [GoNS,  GoEW,   GoNS,   GoNS,   GoPed,  GoPed,  GoPed,  GoPed]),
    StateRecord::new(TrafficLamps::ALL_RED,                               PedestrianLamps::WALK,      GO_HOLD,      [GoPed, On1,    On1,    On1,    GoPed,  On1,    On1,    On1]),
    StateRecord::new(TrafficLamps::ALL_RED,                               PedestrianLamps::DONT_WALK, BLINK_HOLD,   [Off1; 8]),
    StateRecord::new(TrafficLamps::ALL_RED,                               PedestrianLamps::DARK,      BLINK_HOLD,   [On2; 8]),
    StateRecord::new(TrafficLamps::ALL_RED,                               PedestrianLamps::DONT_WALK, BLINK_HOLD,   [Off2; 8]),
    StateRecord::new(TrafficLamps::ALL_RED,                               PedestrianLamps::DARK,      BLINK_HOLD,   [GoNS,  GoEW,   GoNS,   GoNS,   GoNS,   GoEW,   GoNS,   GoNS]),
];

/// An immutable, validated state table.
///
/// Records are stored in [`State`] order, so lookups are a single array index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTable {
    records: [StateRecord; State::COUNT],
}

impl StateTable {
    /// Returns the built-in intersection policy.
    pub const fn intersection() -> Self {
        Self {
            records: INTERSECTION,
        }
    }

    /// Builds a table from records in [`State`] order and validates it.
    ///
    /// # Errors
    /// Returns the first [`TableError`] found by [`StateTable::validate`].
    pub fn new(records: [StateRecord; State::COUNT]) -> Result<Self, TableError> {
        let table = Self { records };
        table.validate()?;
        Ok(table)
    }

    /// Builds a table without validating it.
    ///
    /// Usable in `const` context. [`Controller::new`](crate::Controller::new)
    /// still validates the table before running it.
    pub const fn new_unchecked(records: [StateRecord; State::COUNT]) -> Self {
        Self { records }
    }

    /// Returns all records in [`State`] order.
    pub fn records(&self) -> &[StateRecord; State::COUNT] {
        &self.records
    }

    /// Returns the record for `state`.
    #[inline]
    pub fn record(&self, state: State) -> &StateRecord {
        &self.records[state.index()]
    }

    /// Returns the outputs and hold for `state`.
    #[inline]
    pub fn outputs_for(&self, state: State) -> Outputs {
        self.record(state).outputs()
    }

    /// Returns the successor of `state` for a sensor reading.
    #[inline]
    pub fn next_state(&self, state: State, sensors: SensorWord) -> State {
        self.record(state).next[sensors.index()]
    }

    /// Iterates over every state and its record.
    pub fn iter(&self) -> impl Iterator<Item = (State, &StateRecord)> {
        State::ALL.iter().map(move |&state| (state, self.record(state)))
    }

    /// Checks the table's safety and liveness properties.
    ///
    /// Successor references and totality are guaranteed by the record type.
    /// This checks the rest: non-zero holds, no double green, no green lit
    /// straight after the crossing approach's green, no green dropped to red
    /// without yellow, every state reachable, pedestrians never starved and
    /// the timed clearance states ignoring input.
    pub fn validate(&self) -> Result<(), TableError> {
        for (state, record) in self.iter() {
            if record.hold == Ticks::ZERO {
                return Err(TableError::ZeroHold(state));
            }
            if record.traffic.green(Approach::NorthSouth)
                && record.traffic.green(Approach::EastWest)
            {
                return Err(TableError::ConflictingGreens(state));
            }
            if state.is_timed_clearance() && record.next.iter().any(|&n| n != record.next[0]) {
                return Err(TableError::ClearanceInterrupted(state));
            }
        }

        let reachable = self.reachable();
        if let Some(state) = State::ALL.iter().find(|s| !reachable[s.index()]) {
            return Err(TableError::Unreachable(*state));
        }

        for (from, record) in self.iter() {
            for &to in &record.next {
                if !transition_is_safe(record.traffic, self.record(to).traffic) {
                    return Err(TableError::UnsafeTransition { from, to });
                }
            }
        }

        let serves = self.serves_pedestrian();
        if let Some(state) = State::ALL
            .iter()
            .find(|s| s.is_traffic() && !serves[s.index()])
        {
            return Err(TableError::PedestrianStarved(*state));
        }

        Ok(())
    }

    /// Marks every state reachable from [`State::INITIAL`].
    fn reachable(&self) -> [bool; State::COUNT] {
        let mut seen = [false; State::COUNT];
        let mut pending: Vec<State, { State::COUNT }> = Vec::new();

        seen[State::INITIAL.index()] = true;
        // Each state is pushed at most once, so the worklist never overflows.
        let _ = pending.push(State::INITIAL);

        while let Some(state) = pending.pop() {
            for &next in &self.record(state).next {
                if !seen[next.index()] {
                    seen[next.index()] = true;
                    let _ = pending.push(next);
                }
            }
        }

        seen
    }

    /// Marks every state that reaches GoPedestrian in a bounded number of
    /// cycles while the pedestrian bit stays set, whatever the car bits do.
    fn serves_pedestrian(&self) -> [bool; State::COUNT] {
        let mut serves = [false; State::COUNT];
        serves[State::GoPedestrian.index()] = true;

        // Fixed point: a state joins once all its pedestrian-set successors
        // are already in the set. Each round adds at least one state or stops.
        loop {
            let mut changed = false;
            for state in State::ALL {
                if serves[state.index()] {
                    continue;
                }
                let record = self.record(state);
                let all_served = SensorWord::all()
                    .filter(|word| word.pedestrian())
                    .all(|word| serves[record.next[word.index()].index()]);
                if all_served {
                    serves[state.index()] = true;
                    changed = true;
                }
            }
            if !changed {
                return serves;
            }
        }
    }
}

impl Default for StateTable {
    fn default() -> Self {
        Self::intersection()
    }
}

/// A green may only light if the crossing approach showed no green in the
/// previous state, and a green may only go out through yellow.
fn transition_is_safe(from: TrafficLamps, to: TrafficLamps) -> bool {
    [Approach::NorthSouth, Approach::EastWest]
        .into_iter()
        .all(|approach| {
            let lights_green_over_crossing =
                to.green(approach) && from.green(approach.crossing());
            let skips_yellow =
                from.green(approach) && !to.green(approach) && !to.yellow(approach);
            !lights_green_over_crossing && !skips_yellow
        })
}
