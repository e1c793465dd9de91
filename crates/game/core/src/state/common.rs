use std::fmt;

use strum::{Display, EnumIter};

/// Identity of one of the two combatants in a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatantId {
    #[strum(serialize = "P1")]
    P1,
    #[strum(serialize = "P2")]
    P2,
}

impl CombatantId {
    /// Returns the other combatant.
    #[inline]
    pub const fn opponent(self) -> Self {
        match self {
            Self::P1 => Self::P2,
            Self::P2 => Self::P1,
        }
    }

    /// Territory this combatant starts in. P1 always spawns on the left half.
    #[inline]
    pub const fn home_side(self) -> Side {
        match self {
            Self::P1 => Side::Left,
            Self::P2 => Side::Right,
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::P1 => 0,
            Self::P2 => 1,
        }
    }
}

/// Half of the arena. Tile ownership and movement legality are expressed per side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Side a column belongs to: columns left of the midline are `Left`.
    #[inline]
    pub const fn of_column(x: i32, width: u32) -> Self {
        if x < (width / 2) as i32 {
            Self::Left
        } else {
            Self::Right
        }
    }

    /// Lane direction pointing from this side toward the opponent.
    #[inline]
    pub const fn forward(self) -> LaneDirection {
        match self {
            Self::Left => LaneDirection::Rightward,
            Self::Right => LaneDirection::Leftward,
        }
    }
}

/// Discrete grid position expressed in tile coordinates.
///
/// `x` runs along the lane (left to right), `y` selects the row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the neighbouring position in `direction`.
    #[must_use]
    pub const fn step(self, direction: CardinalDirection) -> Self {
        let (dx, dy) = direction.offset();
        Self::new(self.x + dx, self.y + dy)
    }

    /// Returns the position `cells` steps along the lane.
    #[must_use]
    pub const fn along_lane(self, direction: LaneDirection, cells: i32) -> Self {
        Self::new(self.x + direction.sign() * cells, self.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Orthogonal step direction for discrete movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CardinalDirection {
    North,
    South,
    East,
    West,
}

impl CardinalDirection {
    /// Returns the offset (dx, dy) for this direction.
    ///
    /// Coordinate system: Y-axis increases upward (north), X-axis increases rightward (east).
    pub const fn offset(self) -> (i32, i32) {
        match self {
            CardinalDirection::North => (0, 1),
            CardinalDirection::South => (0, -1),
            CardinalDirection::East => (1, 0),
            CardinalDirection::West => (-1, 0),
        }
    }
}

/// Travel direction along the lane axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LaneDirection {
    Leftward,
    Rightward,
}

impl LaneDirection {
    /// `+1` for rightward travel, `-1` for leftward.
    #[inline]
    pub const fn sign(self) -> i32 {
        match self {
            Self::Leftward => -1,
            Self::Rightward => 1,
        }
    }

    #[inline]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Leftward => Self::Rightward,
            Self::Rightward => Self::Leftward,
        }
    }
}
