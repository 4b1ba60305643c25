//! Click-sequence count encoding.

use serde::{Deserialize, Serialize};

/// Per-known-type click tallies. Labels outside the known set are counted in
/// `unknown` and contribute no feature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickCounts {
    /// Aligned with the known click types the counts were built against
    pub known: Vec<u32>,
    pub unknown: u32,
}

impl ClickCounts {
    pub fn from_sequence(sequence: &[String], known_types: &[String]) -> Self {
        let mut s = ClickCounts {
            known: vec![0; known_types.len()],
            unknown: 0,
        };
        for label in sequence {
            match known_types.iter().position(|k| k == label) {
                Some(i) => s.known[i] += 1,
                None => s.unknown += 1,
            }
        }
        s
    }

    pub fn total(&self) -> u32 {
        self.known.iter().sum::<u32>() + self.unknown
    }

    /// One feature per known type, in declared order.
    pub fn to_vector(&self) -> Vec<f64> {
        self.known.iter().map(|&c| c as f64).collect()
    }
}
