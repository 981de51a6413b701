//! Tick-based timing for state holds.

/// Length of one tick on the reference board, in milliseconds.
pub const DEFAULT_TICK_MILLIS: u32 = 10;

/// A hold duration measured in controller ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Ticks(pub u16);

impl Ticks {
    /// Zero duration. Never valid as a state hold.
    pub const ZERO: Self = Ticks(0);

    /// Returns the raw tick count.
    #[inline]
    pub const fn get(self) -> u16 {
        self.0
    }

    /// Converts to milliseconds for a given tick length.
    #[inline]
    pub const fn as_millis(self, tick_millis: u32) -> u32 {
        (self.0 as u32).saturating_mul(tick_millis)
    }
}

impl From<u16> for Ticks {
    fn from(ticks: u16) -> Self {
        Ticks(ticks)
    }
}

/// Trait for abstracting the blocking hold between output and sensor sample.
///
/// Implementations must block the caller for exactly `ticks` ticks and cannot
/// be cut short by sensor changes.
pub trait TickWait {
    /// Blocks for the given number of ticks.
    fn wait_ticks(&mut self, ticks: Ticks);
}

impl<T: TickWait + ?Sized> TickWait for &mut T {
    fn wait_ticks(&mut self, ticks: Ticks) {
        (**self).wait_ticks(ticks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_to_millis_with_reference_tick() {
        assert_eq!(Ticks(600).as_millis(DEFAULT_TICK_MILLIS), 6000);
        assert_eq!(Ticks(50).as_millis(DEFAULT_TICK_MILLIS), 500);
        assert_eq!(Ticks::ZERO.as_millis(DEFAULT_TICK_MILLIS), 0);
    }
}
