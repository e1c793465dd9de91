use std::fmt;

use crate::state::Side;

/// State of a single arena cell.
///
/// `Cracked` and `Broken` carry the side of the owner they will revert to;
/// `None` marks a neutral (empty) tile that was damaged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TileState {
    Owned(Side),
    Empty,
    Cracked(Option<Side>),
    Broken(Option<Side>),
}

impl TileState {
    /// Side whose exclusive territory this tile is, in any damage state.
    pub const fn territory(self) -> Option<Side> {
        match self {
            Self::Owned(side) => Some(side),
            Self::Cracked(side) | Self::Broken(side) => side,
            Self::Empty => None,
        }
    }

    #[inline]
    pub const fn is_cracked(self) -> bool {
        matches!(self, Self::Cracked(_))
    }

    #[inline]
    pub const fn is_broken(self) -> bool {
        matches!(self, Self::Broken(_))
    }

    /// True for the intact states a tile can be restored to.
    #[inline]
    pub const fn is_intact(self) -> bool {
        matches!(self, Self::Owned(_) | Self::Empty)
    }

    /// Cracked variant derived from this tile's territory.
    pub const fn cracked(self) -> Self {
        Self::Cracked(self.territory())
    }

    /// Broken variant derived from this tile's territory.
    pub const fn broken(self) -> Self {
        Self::Broken(self.territory())
    }

    /// Whether a combatant fighting for `side` may stand here.
    pub fn is_walkable_for(self, side: Side) -> bool {
        if self.is_broken() {
            return false;
        }
        self.territory().is_none_or(|owner| owner == side)
    }
}

impl fmt::Display for TileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn label(side: Option<Side>) -> &'static str {
            match side {
                Some(Side::Left) => "left",
                Some(Side::Right) => "right",
                None => "neutral",
            }
        }

        match self {
            Self::Owned(side) => write!(f, "owned({})", label(Some(*side))),
            Self::Empty => f.write_str("empty"),
            Self::Cracked(side) => write!(f, "cracked({})", label(*side)),
            Self::Broken(side) => write!(f, "broken({})", label(*side)),
        }
    }
}
