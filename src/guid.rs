//! `TaskGuid` — 128-bit task identifiers.
//!
//! Components compare lexicographically in `a, b, c, d` order, which is the
//! ordering the coordinator uses to pick the minimum of a batch.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// A globally unique, totally ordered task identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskGuid {
    a: u32,
    b: u32,
    c: u32,
    d: u32,
}

impl TaskGuid {
    /// The all-zero guid, which is never valid.
    pub const NIL: Self = Self::new(0, 0, 0, 0);

    /// Creates a guid from its four components.
    #[inline]
    pub const fn new(a: u32, b: u32, c: u32, d: u32) -> Self {
        Self { a, b, c, d }
    }

    /// Creates a guid from a 128-bit value, `a` being the most significant word.
    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_u128(value: u128) -> Self {
        Self::new(
            (value >> 96) as u32,
            (value >> 64) as u32,
            (value >> 32) as u32,
            value as u32,
        )
    }

    /// The guid as a 128-bit value. Order-preserving.
    #[inline]
    pub const fn as_u128(self) -> u128 {
        ((self.a as u128) << 96) | ((self.b as u128) << 64) | ((self.c as u128) << 32) | self.d as u128
    }

    /// Returns the four components.
    #[inline]
    pub const fn components(self) -> [u32; 4] {
        [self.a, self.b, self.c, self.d]
    }

    /// A guid is valid unless every component is zero.
    #[inline]
    pub const fn is_valid(self) -> bool {
        (self.a | self.b | self.c | self.d) != 0
    }
}

impl fmt::Display for TaskGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08X}{:08X}{:08X}{:08X}", self.a, self.b, self.c, self.d)
    }
}

/// Error returned when parsing a [`TaskGuid`] from a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseGuidError {
    input: String,
}

impl fmt::Display for ParseGuidError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid task guid {:?}: expected 32 hex digits", self.input)
    }
}

impl std::error::Error for ParseGuidError {}

impl FromStr for TaskGuid {
    type Err = ParseGuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseGuidError { input: s.to_owned() };
        if s.len() != 32 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }
        u128::from_str_radix(s, 16).map(Self::from_u128).map_err(|_| err())
    }
}

impl From<u128> for TaskGuid {
    fn from(value: u128) -> Self {
        Self::from_u128(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guid_orders_by_components() {
        let lo = TaskGuid::new(1, u32::MAX, u32::MAX, u32::MAX);
        let hi = TaskGuid::new(2, 0, 0, 0);
        assert!(lo < hi);
        assert!(TaskGuid::new(2, 0, 0, 1) > hi);
        assert_eq!(lo.as_u128() < hi.as_u128(), lo < hi);
    }

    #[test]
    fn test_guid_text_form() {
        let g = TaskGuid::new(0xDEAD_BEEF, 1, 0x10, 0xABCD_EF01);
        let text = g.to_string();
        assert_eq!(text, "DEADBEEF0000000100000010ABCDEF01");
        assert_eq!(text.parse::<TaskGuid>(), Ok(g));
        assert_eq!(text.to_lowercase().parse::<TaskGuid>(), Ok(g));
    }

    #[test]
    fn test_guid_rejects_malformed_text() {
        assert!("".parse::<TaskGuid>().is_err());
        assert!("+EADBEEF0000000100000010ABCDEF01".parse::<TaskGuid>().is_err());
        assert!("DEADBEEF".parse::<TaskGuid>().is_err());
        assert!("ZZADBEEF0000000100000010ABCDEF01".parse::<TaskGuid>().is_err());
    }

    #[test]
    fn test_guid_validity() {
        assert!(!TaskGuid::NIL.is_valid());
        assert!(TaskGuid::new(0, 0, 0, 1).is_valid());
        assert_eq!(TaskGuid::from_u128(7).components(), [0, 0, 0, 7]);
    }
}
