//! Core crate for the geomerge walking-merge game.
//!
//! A grid of geographically indexed cells is populated deterministically with
//! power-of-two tokens. The player walks a continuous position across the
//! grid, picks a token up from a nearby cell, and merges it with an equal
//! token to double it, chasing a configured win threshold. Cells the player
//! changes are remembered in a sparse override store that permanently shadows
//! the generator, in memory and across reloads.
//!
//! The crate is headless: rendering belongs to a client behind the
//! [`Presenter`] boundary, and everything mutable lives in one owned
//! [`GameState`] driven through a [`Session`].

pub mod config;
pub mod coord;
pub mod hashing;
pub mod interact;
pub mod movement;
pub mod overrides;
pub mod persist;
pub mod presenter;
pub mod session;
pub mod spawn;
pub mod state;

pub use config::{load_game_config_from_env, ConfigError, GameConfig};
pub use coord::{CellCoord, GeoPosition};
pub use interact::{InteractError, InteractOutcome};
pub use movement::{MovementDriver, StepDirection, StepOutcome};
pub use overrides::{effective_value, OverrideStore};
pub use persist::{FileSaveStore, MemorySaveStore, SaveError, SaveRecord, SaveStore};
pub use presenter::{grid_view, CellView, Notification, NullPresenter, Presenter};
pub use session::Session;
pub use spawn::{SpawnBand, SpawnTable, SpawnTableError, Token};
pub use state::{GameState, MovementMode};
