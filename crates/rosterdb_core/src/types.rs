//! Core type definitions for RosterDB.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Unique key of a student record.
///
/// Roll numbers are chosen by the user; the store guarantees that no two
/// records share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RollNumber(pub i64);

impl fmt::Display for RollNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RollNumber {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl From<i64> for RollNumber {
    fn from(roll: i64) -> Self {
        Self(roll)
    }
}
