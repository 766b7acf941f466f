use crossbeam_channel::Receiver;

use crate::coord::{CellCoord, GeoPosition};
use crate::state::MovementMode;

/// Discrete one-cell step request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    North,
    South,
    East,
    West,
}

impl StepDirection {
    /// Cell displacement as `(di, dj)`: latitude grows north, longitude east.
    pub fn delta(self) -> (i32, i32) {
        match self {
            StepDirection::North => (1, 0),
            StepDirection::South => (-1, 0),
            StepDirection::East => (0, 1),
            StepDirection::West => (0, -1),
        }
    }
}

/// Result of a step request under the active driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    Moved(GeoPosition),
    /// Device-tracked movement owns the position; step requests are accepted
    /// and discarded, never an error.
    IgnoredByDriver,
}

/// The movement strategy in effect. Exactly one variant is active at a time;
/// replacing the value drops the previous variant, and dropping the
/// device-tracked receiver releases the position subscription.
#[derive(Debug)]
pub enum MovementDriver {
    Manual,
    DeviceTracked { feed: Receiver<GeoPosition> },
}

impl MovementDriver {
    pub fn mode(&self) -> MovementMode {
        match self {
            MovementDriver::Manual => MovementMode::Manual,
            MovementDriver::DeviceTracked { .. } => MovementMode::DeviceTracked,
        }
    }

    /// Translate a step request into a new position.
    ///
    /// Manual steps land on the canonical center of the adjacent cell so the
    /// continuous position never drifts within a cell.
    pub fn step(
        &self,
        position: GeoPosition,
        direction: StepDirection,
        cell_size_deg: f64,
    ) -> StepOutcome {
        match self {
            MovementDriver::Manual => {
                let (di, dj) = direction.delta();
                let target = CellCoord::containing(position, cell_size_deg).offset(di, dj);
                StepOutcome::Moved(target.center(cell_size_deg))
            }
            MovementDriver::DeviceTracked { .. } => StepOutcome::IgnoredByDriver,
        }
    }

    /// Drain pending device updates; the freshest one wins. Manual movement
    /// has no feed and always yields `None`. A disconnected feed is treated
    /// as quiet, not as an error.
    pub fn poll(&mut self) -> Option<GeoPosition> {
        match self {
            MovementDriver::Manual => None,
            MovementDriver::DeviceTracked { feed } => {
                let mut latest = None;
                while let Ok(position) = feed.try_recv() {
                    latest = Some(position);
                }
                latest
            }
        }
    }
}
