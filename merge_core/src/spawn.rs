use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coord::CellCoord;
use crate::hashing;

/// A collectible token. Always a positive power of two; merging two equal
/// tokens produces the next power.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Token(pub u32);

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Token {
    pub fn value(self) -> u32 {
        self.0
    }

    /// The next power of two, capped at the largest one representable so a
    /// merge can never wrap the value to zero.
    pub fn doubled(self) -> Token {
        if self.0 >= 1 << 31 {
            self
        } else {
            Token(self.0 * 2)
        }
    }
}

/// One rung of the spawn ladder: rolls strictly below `upto` (and at or above
/// the previous rung) produce `token`; `None` is the empty band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnBand {
    pub upto: f64,
    #[serde(default)]
    pub token: Option<u32>,
}

#[derive(Debug, Error)]
pub enum SpawnTableError {
    #[error("spawn table has no bands")]
    Empty,
    #[error("band {index} threshold {upto} does not increase over {previous}")]
    NonMonotonic {
        index: usize,
        upto: f64,
        previous: f64,
    },
    #[error("final band threshold is {upto}, bands must partition [0,1)")]
    Incomplete { upto: f64 },
    #[error("band {index} token {value} is not a positive power of two")]
    NotPowerOfTwo { index: usize, value: u32 },
}

/// Threshold ladder mapping a unit-interval roll to cell content.
///
/// The natural distribution keeps most cells empty and makes large tokens
/// rare; the exact thresholds are tunable policy carried in the game config,
/// validated here to partition `[0, 1)` completely.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnTable {
    bands: Vec<SpawnBand>,
}

impl SpawnTable {
    pub fn new(bands: Vec<SpawnBand>) -> Result<Self, SpawnTableError> {
        let last = bands.last().ok_or(SpawnTableError::Empty)?;
        if last.upto != 1.0 {
            return Err(SpawnTableError::Incomplete { upto: last.upto });
        }
        let mut previous = 0.0;
        for (index, band) in bands.iter().enumerate() {
            if index > 0 && band.upto <= previous {
                return Err(SpawnTableError::NonMonotonic {
                    index,
                    upto: band.upto,
                    previous,
                });
            }
            previous = band.upto;
            if let Some(value) = band.token {
                if !value.is_power_of_two() {
                    return Err(SpawnTableError::NotPowerOfTwo { index, value });
                }
            }
        }
        Ok(Self { bands })
    }

    pub fn bands(&self) -> &[SpawnBand] {
        &self.bands
    }

    /// Natural content of a cell. Pure and total: the same seed and
    /// coordinate yield the same answer across calls and sessions.
    pub fn generate(&self, world_seed: &str, coord: CellCoord) -> Option<Token> {
        let roll = hashing::unit_interval(&format!("{world_seed}:{}", coord.key()));
        for band in &self.bands {
            if roll < band.upto {
                return band.token.map(Token);
            }
        }
        // roll < 1.0 and the last band sits at exactly 1.0, so the loop
        // always returns; stay total regardless.
        self.bands.last().and_then(|band| band.token.map(Token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_bands() -> Vec<SpawnBand> {
        vec![
            SpawnBand {
                upto: 0.75,
                token: None,
            },
            SpawnBand {
                upto: 0.875,
                token: Some(1),
            },
            SpawnBand {
                upto: 0.9375,
                token: Some(2),
            },
            SpawnBand {
                upto: 0.984375,
                token: Some(4),
            },
            SpawnBand {
                upto: 1.0,
                token: Some(8),
            },
        ]
    }

    #[test]
    fn generate_is_idempotent() {
        let table = SpawnTable::new(default_bands()).unwrap();
        for i in -20..20 {
            for j in -20..20 {
                let coord = CellCoord::new(i, j);
                assert_eq!(
                    table.generate("geomerge", coord),
                    table.generate("geomerge", coord)
                );
            }
        }
    }

    #[test]
    fn generated_tokens_come_from_the_ladder() {
        let table = SpawnTable::new(default_bands()).unwrap();
        let mut empties = 0usize;
        let mut total = 0usize;
        for i in -50..50 {
            for j in -50..50 {
                total += 1;
                match table.generate("geomerge", CellCoord::new(i, j)) {
                    None => empties += 1,
                    Some(token) => assert!(matches!(token.value(), 1 | 2 | 4 | 8)),
                }
            }
        }
        // The empty band holds ~75% of the mass; allow a wide margin.
        assert!(empties > total / 2);
        assert!(empties < total);
    }

    #[test]
    fn world_seed_changes_the_board() {
        let table = SpawnTable::new(default_bands()).unwrap();
        let differs = (-30..30).any(|i| {
            (-30..30).any(|j| {
                let coord = CellCoord::new(i, j);
                table.generate("alpha", coord) != table.generate("beta", coord)
            })
        });
        assert!(differs);
    }

    #[test]
    fn validation_rejects_bad_ladders() {
        assert!(matches!(
            SpawnTable::new(Vec::new()),
            Err(SpawnTableError::Empty)
        ));
        assert!(matches!(
            SpawnTable::new(vec![SpawnBand {
                upto: 0.9,
                token: None
            }]),
            Err(SpawnTableError::Incomplete { .. })
        ));
        assert!(matches!(
            SpawnTable::new(vec![
                SpawnBand {
                    upto: 0.8,
                    token: None
                },
                SpawnBand {
                    upto: 0.5,
                    token: Some(1)
                },
                SpawnBand {
                    upto: 1.0,
                    token: Some(2)
                },
            ]),
            Err(SpawnTableError::NonMonotonic { index: 1, .. })
        ));
        assert!(matches!(
            SpawnTable::new(vec![
                SpawnBand {
                    upto: 0.5,
                    token: None
                },
                SpawnBand {
                    upto: 1.0,
                    token: Some(3)
                },
            ]),
            Err(SpawnTableError::NotPowerOfTwo { value: 3, .. })
        ));
    }

    #[test]
    fn doubling_walks_the_powers_and_caps_at_the_top() {
        assert_eq!(Token(1).doubled(), Token(2));
        assert_eq!(Token(8).doubled(), Token(16));
        assert_eq!(Token(1 << 30).doubled(), Token(1 << 31));
        assert_eq!(Token(1 << 31).doubled(), Token(1 << 31));
    }
}
