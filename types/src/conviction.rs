//! Conviction levels and their lock-period / vote-weight multipliers.
//!
//! | Conviction | Lock periods | Vote weight |
//! |------------|:------------:|:-----------:|
//! | None       | 0            | 0.1x        |
//! | Locked1x   | 1            | 1x          |
//! | Locked2x   | 2            | 2x          |
//! | Locked3x   | 4            | 3x          |
//! | Locked4x   | 8            | 4x          |
//! | Locked5x   | 16           | 5x          |
//! | Locked6x   | 32           | 6x          |

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TypesError;

/// How strongly a voter locks their balance behind a vote.
///
/// Variants are declared in increasing order so the derived `Ord` is the
/// conviction order.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Conviction {
    #[default]
    None,
    Locked1x,
    Locked2x,
    Locked3x,
    Locked4x,
    Locked5x,
    Locked6x,
}

impl Conviction {
    pub const ALL: [Conviction; 7] = [
        Conviction::None,
        Conviction::Locked1x,
        Conviction::Locked2x,
        Conviction::Locked3x,
        Conviction::Locked4x,
        Conviction::Locked5x,
        Conviction::Locked6x,
    ];

    /// The `N` of `LockedNx`; zero for `None`.
    pub const fn level(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::Locked1x => 1,
            Self::Locked2x => 2,
            Self::Locked3x => 3,
            Self::Locked4x => 4,
            Self::Locked5x => 5,
            Self::Locked6x => 6,
        }
    }

    /// Number of vote-locking periods the balance stays locked after the
    /// referendum ends: `2^(N-1)`, or zero without conviction.
    pub const fn lock_periods(&self) -> u64 {
        match self.level() {
            0 => 0,
            n => 1 << (n - 1),
        }
    }

    /// Multiplier applied to the balance to obtain voting power.
    pub const fn weight(&self) -> VoteWeight {
        match self.level() {
            0 => VoteWeight::NO_CONVICTION,
            n => VoteWeight::from_tenths(n as u32 * 10),
        }
    }
}

impl TryFrom<u8> for Conviction {
    type Error = TypesError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(tag as usize)
            .copied()
            .ok_or(TypesError::UnknownConviction(tag))
    }
}

impl fmt::Display for Conviction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            other => write!(f, "locked {}x", other.level()),
        }
    }
}

/// An exact decimal vote-weight multiplier, stored in tenths.
///
/// `VoteWeight::from_tenths(1)` is 0.1x; `VoteWeight::from_tenths(60)` is 6x.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoteWeight(u32);

impl VoteWeight {
    pub const DENOMINATOR: u32 = 10;
    /// Weight of a vote cast without conviction, and of every split leg.
    pub const NO_CONVICTION: Self = Self(1);

    pub const fn from_tenths(tenths: u32) -> Self {
        Self(tenths)
    }

    pub const fn tenths(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for VoteWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / Self::DENOMINATOR;
        let frac = self.0 % Self::DENOMINATOR;
        if frac == 0 {
            write!(f, "{whole}x")
        } else {
            write!(f, "{whole}.{frac}x")
        }
    }
}
