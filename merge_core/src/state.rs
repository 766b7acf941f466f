use serde::{Deserialize, Serialize};

use crate::coord::{CellCoord, GeoPosition};
use crate::overrides::OverrideStore;
use crate::spawn::Token;

/// Which movement driver variant is active. Persisted so a reload resumes
/// the same variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementMode {
    #[default]
    Manual,
    DeviceTracked,
}

/// The whole mutable game, as one owned value.
///
/// Position changes only through movement, the held token only through
/// pickup/drop/merge, and the override store only grows (values update,
/// entries never leave) until an explicit new game.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub position: GeoPosition,
    pub held: Option<Token>,
    pub overrides: OverrideStore,
    pub mode: MovementMode,
}

impl Default for GameState {
    fn default() -> Self {
        Self::fresh()
    }
}

impl GameState {
    /// The no-saved-game defaults: origin position, empty hands, empty
    /// overrides, manual movement.
    pub fn fresh() -> Self {
        Self {
            position: GeoPosition::ORIGIN,
            held: None,
            overrides: OverrideStore::new(),
            mode: MovementMode::Manual,
        }
    }

    pub fn cell(&self, cell_size_deg: f64) -> CellCoord {
        CellCoord::containing(self.position, cell_size_deg)
    }
}
