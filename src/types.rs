//! Bit-encoded sensor and lamp words.

/// A 3-bit sensor reading.
///
/// Bit 2 is the pedestrian detector, bit 1 the north/south car detector and
/// bit 0 the east/west car detector. Construction always masks to these three
/// bits, so every `SensorWord` is a valid transition index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorWord(u8);

impl SensorWord {
    /// East/west car present.
    pub const EAST_WEST: u8 = 0b001;
    /// North/south car present.
    pub const NORTH_SOUTH: u8 = 0b010;
    /// Pedestrian waiting.
    pub const PEDESTRIAN: u8 = 0b100;
    /// Mask of the significant bits.
    pub const MASK: u8 = 0b111;
    /// Number of distinct readings.
    pub const COUNT: usize = 8;

    /// No demand on any detector.
    pub const NONE: Self = SensorWord(0);

    /// Builds a reading from a raw value, discarding bits above bit 2.
    #[inline]
    pub const fn from_bits_truncate(raw: u8) -> Self {
        SensorWord(raw & Self::MASK)
    }

    /// Builds a reading from the three detector states.
    #[inline]
    pub const fn new(pedestrian: bool, north_south: bool, east_west: bool) -> Self {
        SensorWord(
            (pedestrian as u8) << 2 | (north_south as u8) << 1 | east_west as u8,
        )
    }

    /// Returns the masked raw value.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns the reading as a transition-row index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns true if a pedestrian is waiting.
    #[inline]
    pub const fn pedestrian(self) -> bool {
        self.0 & Self::PEDESTRIAN != 0
    }

    /// Returns true if a north/south car is present.
    #[inline]
    pub const fn north_south(self) -> bool {
        self.0 & Self::NORTH_SOUTH != 0
    }

    /// Returns true if an east/west car is present.
    #[inline]
    pub const fn east_west(self) -> bool {
        self.0 & Self::EAST_WEST != 0
    }

    /// Iterates over all eight possible readings in index order.
    pub fn all() -> impl Iterator<Item = SensorWord> {
        (0..Self::COUNT as u8).map(SensorWord)
    }
}

/// One of the two conflicting traffic streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Approach {
    NorthSouth,
    EastWest,
}

impl Approach {
    /// The stream that crosses this one.
    #[inline]
    pub const fn crossing(self) -> Approach {
        match self {
            Approach::NorthSouth => Approach::EastWest,
            Approach::EastWest => Approach::NorthSouth,
        }
    }

    /// Bit offset of this approach's red lamp; yellow and green follow below it.
    const fn shift(self) -> u8 {
        match self {
            Approach::NorthSouth => 0,
            Approach::EastWest => 3,
        }
    }
}

/// The six traffic lamps as one word.
///
/// Layout matches the historical wiring: bit 5 east/west red, bit 4 east/west
/// yellow, bit 3 east/west green, bit 2 north/south red, bit 1 north/south
/// yellow, bit 0 north/south green.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TrafficLamps(u8);

impl TrafficLamps {
    /// North/south green lamp.
    pub const NS_GREEN: Self = TrafficLamps(1 << 0);
    /// North/south yellow lamp.
    pub const NS_YELLOW: Self = TrafficLamps(1 << 1);
    /// North/south red lamp.
    pub const NS_RED: Self = TrafficLamps(1 << 2);
    /// East/west green lamp.
    pub const EW_GREEN: Self = TrafficLamps(1 << 3);
    /// East/west yellow lamp.
    pub const EW_YELLOW: Self = TrafficLamps(1 << 4);
    /// East/west red lamp.
    pub const EW_RED: Self = TrafficLamps(1 << 5);

    /// All lamps dark.
    pub const DARK: Self = TrafficLamps(0);
    /// Both approaches held at red.
    pub const ALL_RED: Self = Self::NS_RED.union(Self::EW_RED);

    /// Mask of the significant bits.
    pub const MASK: u8 = 0b11_1111;
    /// Number of lamps in the word.
    pub const LAMP_COUNT: usize = 6;

    /// Builds a lamp word from a raw value, discarding bits above bit 5.
    #[inline]
    pub const fn from_bits_truncate(raw: u8) -> Self {
        TrafficLamps(raw & Self::MASK)
    }

    /// Returns the raw lamp word.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Combines the lamps of both words.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        TrafficLamps(self.0 | other.0)
    }

    /// Returns true if every lamp lit in `other` is lit here.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns true if lamp `bit` (0..6) is lit.
    #[inline]
    pub const fn lamp(self, bit: usize) -> bool {
        bit < Self::LAMP_COUNT && self.0 & (1 << bit) != 0
    }

    /// Returns true if `approach` shows red.
    #[inline]
    pub const fn red(self, approach: Approach) -> bool {
        self.0 & (0b100 << approach.shift()) != 0
    }

    /// Returns true if `approach` shows yellow.
    #[inline]
    pub const fn yellow(self, approach: Approach) -> bool {
        self.0 & (0b010 << approach.shift()) != 0
    }

    /// Returns true if `approach` shows green.
    #[inline]
    pub const fn green(self, approach: Approach) -> bool {
        self.0 & (0b001 << approach.shift()) != 0
    }
}

/// The two pedestrian lamps as one word: bit 1 walk, bit 0 don't-walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PedestrianLamps(u8);

impl PedestrianLamps {
    /// Don't-walk lit.
    pub const DONT_WALK: Self = PedestrianLamps(0b01);
    /// Walk lit.
    pub const WALK: Self = PedestrianLamps(0b10);
    /// Both lamps off (the dark half of the clearance blink).
    pub const DARK: Self = PedestrianLamps(0);

    /// Mask of the significant bits.
    pub const MASK: u8 = 0b11;

    /// Builds a lamp word from a raw value, discarding bits above bit 1.
    #[inline]
    pub const fn from_bits_truncate(raw: u8) -> Self {
        PedestrianLamps(raw & Self::MASK)
    }

    /// Returns the raw lamp word.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns true if walk is lit.
    #[inline]
    pub const fn walk(self) -> bool {
        self.0 & Self::WALK.0 != 0
    }

    /// Returns true if don't-walk is lit.
    #[inline]
    pub const fn dont_walk(self) -> bool {
        self.0 & Self::DONT_WALK.0 != 0
    }
}
