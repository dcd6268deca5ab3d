//! Signature hashing over sorted field paths.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rolling polynomial hash (multiplier 31) over UTF-16 code units.
///
/// Wraps to 32-bit signed at every step. Not cryptographic; distinct inputs
/// may collide.
pub fn str_hash(s: &str) -> i32 {
    s.encode_utf16().fold(0i32, |hash, unit| {
        (hash << 5).wrapping_sub(hash).wrapping_add(unit as i32)
    })
}

/// Number of segments in a dotted field path.
pub fn segment_depth(path: &str) -> usize {
    path.matches('.').count() + 1
}

/// 32-bit key identifying a set of field paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(pub i32);

impl Signature {
    /// Hashes an already-sorted path list joined by single spaces.
    pub fn from_sorted(paths: &[String]) -> Self {
        Signature(str_hash(&paths.join(" ")))
    }

    /// Sorts a copy of `paths` and hashes it.
    pub fn of(paths: &[String]) -> Self {
        let mut sorted = paths.to_vec();
        sorted.sort();
        Self::from_sorted(&sorted)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
