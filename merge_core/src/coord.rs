use std::fmt;

use serde::{Deserialize, Serialize};

/// Continuous player position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPosition {
    pub const ORIGIN: GeoPosition = GeoPosition { lat: 0.0, lon: 0.0 };

    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl fmt::Display for GeoPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lon)
    }
}

/// Identifier for one grid cell: the globe quantized to a fixed angular size.
///
/// `i` indexes latitude, `j` longitude. The domain is unbounded; cells exist
/// only as lookup keys, never as allocated storage.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CellCoord {
    pub i: i32,
    pub j: i32,
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.i, self.j)
    }
}

impl CellCoord {
    pub fn new(i: i32, j: i32) -> Self {
        Self { i, j }
    }

    /// The cell containing a continuous position, by floor quantization.
    pub fn containing(position: GeoPosition, cell_size_deg: f64) -> Self {
        Self {
            i: (position.lat / cell_size_deg).floor() as i32,
            j: (position.lon / cell_size_deg).floor() as i32,
        }
    }

    /// Canonical center point of this cell. Manual steps re-center the player
    /// here so repeated stepping never drifts off the grid.
    pub fn center(self, cell_size_deg: f64) -> GeoPosition {
        GeoPosition {
            lat: (self.i as f64 + 0.5) * cell_size_deg,
            lon: (self.j as f64 + 0.5) * cell_size_deg,
        }
    }

    pub fn offset(self, di: i32, dj: i32) -> Self {
        Self {
            i: self.i + di,
            j: self.j + dj,
        }
    }

    /// King-move distance. The legal interaction neighborhood is the square
    /// `chebyshev(player, cell) <= radius`, not a circle.
    ///
    /// Deltas are taken in i64: the coordinate domain is the full i32 range,
    /// and the widest possible axis delta is exactly `u32::MAX`, so the cast
    /// back is lossless.
    pub fn chebyshev(self, other: Self) -> u32 {
        let di = (i64::from(self.i) - i64::from(other.i)).unsigned_abs();
        let dj = (i64::from(self.j) - i64::from(other.j)).unsigned_abs();
        di.max(dj) as u32
    }

    /// Canonical string form, used as the seed key for procedural content.
    pub fn key(self) -> String {
        format!("{}:{}", self.i, self.j)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CELL: f64 = 0.0001;

    #[test]
    fn containing_floors_toward_negative_infinity() {
        assert_eq!(
            CellCoord::containing(GeoPosition::new(0.00041, 0.00009), CELL),
            CellCoord::new(4, 0)
        );
        assert_eq!(
            CellCoord::containing(GeoPosition::new(-0.00001, 0.0), CELL),
            CellCoord::new(-1, 0)
        );
    }

    #[test]
    fn center_round_trips_through_containing() {
        for coord in [
            CellCoord::new(0, 0),
            CellCoord::new(4, -7),
            CellCoord::new(-123, 456),
        ] {
            assert_eq!(CellCoord::containing(coord.center(CELL), CELL), coord);
        }
    }

    #[test]
    fn chebyshev_is_symmetric_and_square() {
        let a = CellCoord::new(0, 0);
        let b = CellCoord::new(3, -3);
        assert_eq!(a.chebyshev(b), 3);
        assert_eq!(b.chebyshev(a), 3);
        assert_eq!(a.chebyshev(CellCoord::new(1, 3)), 3);
        assert_eq!(a.chebyshev(CellCoord::new(0, 4)), 4);
    }

    #[test]
    fn chebyshev_handles_the_full_coordinate_range() {
        let origin = CellCoord::new(0, 0);
        assert_eq!(
            origin.chebyshev(CellCoord::new(i32::MIN, 0)),
            i32::MIN.unsigned_abs()
        );
        assert_eq!(
            CellCoord::new(i32::MIN, 0).chebyshev(CellCoord::new(i32::MAX, 0)),
            u32::MAX
        );
        assert_eq!(
            CellCoord::new(i32::MAX, i32::MIN).chebyshev(origin),
            i32::MIN.unsigned_abs()
        );
    }

    #[test]
    fn key_is_canonical_per_coordinate() {
        assert_eq!(CellCoord::new(-2, 9).key(), "-2:9");
        assert_ne!(CellCoord::new(1, 2).key(), CellCoord::new(12, 0).key());
    }
}
