use crossbeam_channel::Receiver;

use crate::config::GameConfig;
use crate::coord::{CellCoord, GeoPosition};
use crate::interact::{interact, InteractError, InteractOutcome};
use crate::movement::{MovementDriver, StepDirection, StepOutcome};
use crate::overrides::effective_value;
use crate::persist::{self, SaveStore};
use crate::presenter::{grid_view, CellView, Notification, Presenter};
use crate::state::{GameState, MovementMode};

/// Owns the wiring between the game state, the movement driver, the save
/// slot, and the presentation boundary.
///
/// Every entry point runs synchronously inside the caller's event dispatch:
/// mutate, persist, then notify. Persistence failures are logged and play
/// continues from memory.
pub struct Session<S: SaveStore> {
    config: GameConfig,
    state: GameState,
    driver: MovementDriver,
    store: S,
    slot: String,
}

impl<S: SaveStore> Session<S> {
    /// Restore a slot, or start fresh when nothing (readable) is saved.
    ///
    /// A save that recorded device-tracked movement resumes it only when the
    /// host can supply a feed; otherwise the session falls back to manual
    /// with a one-time notification.
    pub fn load(
        config: GameConfig,
        store: S,
        slot: impl Into<String>,
        feed: Option<Receiver<GeoPosition>>,
        presenter: &mut dyn Presenter,
    ) -> Self {
        let slot = slot.into();
        let mut state = persist::load_game(&store, &slot);
        let driver = match (state.mode, feed) {
            (MovementMode::Manual, _) => MovementDriver::Manual,
            (MovementMode::DeviceTracked, Some(feed)) => MovementDriver::DeviceTracked { feed },
            (MovementMode::DeviceTracked, None) => {
                presenter.notify(Notification::TrackingUnavailable);
                state.mode = MovementMode::Manual;
                MovementDriver::Manual
            }
        };
        tracing::info!(
            target: "geomerge::session",
            slot = %slot,
            overrides = state.overrides.len(),
            mode = ?state.mode,
            "session.loaded"
        );
        presenter.center_on(state.position);
        Self {
            config,
            state,
            driver,
            store,
            slot,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Tear the session down, handing the save store back to the host.
    /// Dropping the session also drops any active feed subscription.
    pub fn into_store(self) -> S {
        self.store
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn player_cell(&self) -> CellCoord {
        self.state.cell(self.config.cell_size_deg)
    }

    /// Effective content of one cell, override first.
    pub fn cell_view(&self, coord: CellCoord) -> CellView {
        CellView {
            coord,
            content: effective_value(
                &self.state.overrides,
                &self.config.spawn,
                &self.config.world_seed,
                coord,
            ),
        }
    }

    /// The square window of cells around the player, for redraws.
    pub fn view(&self, radius: u32) -> Vec<CellView> {
        grid_view(&self.state, &self.config, radius)
    }

    /// Player clicked / tapped cell `coord`.
    pub fn interact_with(&mut self, coord: CellCoord, presenter: &mut dyn Presenter) {
        match interact(&mut self.state, &self.config, coord) {
            Ok(outcome) => {
                self.persist();
                presenter.refresh_cell(self.cell_view(coord));
                match outcome {
                    InteractOutcome::PickedUp(token) => {
                        presenter.notify(Notification::PickedUp(token));
                    }
                    InteractOutcome::Dropped(token) => {
                        presenter.notify(Notification::Dropped(token));
                    }
                    InteractOutcome::Merged { value, win } => {
                        presenter.notify(Notification::Merged(value));
                        if win {
                            tracing::info!(
                                target: "geomerge::session",
                                value = value.value(),
                                "game.win"
                            );
                            presenter.notify(Notification::Win(value));
                        }
                    }
                }
            }
            Err(err) => presenter.notify(rejection(err)),
        }
    }

    /// Discrete step request. Ignored without error while device tracking
    /// is active.
    pub fn step(&mut self, direction: StepDirection, presenter: &mut dyn Presenter) {
        match self
            .driver
            .step(self.state.position, direction, self.config.cell_size_deg)
        {
            StepOutcome::Moved(position) => {
                self.state.position = position;
                self.persist();
                presenter.center_on(position);
            }
            StepOutcome::IgnoredByDriver => {}
        }
    }

    /// Apply any pending device position updates; the freshest wins.
    pub fn poll_feed(&mut self, presenter: &mut dyn Presenter) {
        if let Some(position) = self.driver.poll() {
            self.state.position = position;
            self.persist();
            presenter.center_on(position);
        }
    }

    /// Switch movement strategies. Replacing the driver drops the previous
    /// variant's feed subscription. Asking for device tracking without a
    /// feed keeps the current variant and tells the player once.
    pub fn set_movement_mode(
        &mut self,
        mode: MovementMode,
        feed: Option<Receiver<GeoPosition>>,
        presenter: &mut dyn Presenter,
    ) {
        match mode {
            MovementMode::Manual => self.driver = MovementDriver::Manual,
            MovementMode::DeviceTracked => match feed {
                Some(feed) => self.driver = MovementDriver::DeviceTracked { feed },
                None => {
                    presenter.notify(Notification::TrackingUnavailable);
                    return;
                }
            },
        }
        self.state.mode = mode;
        self.persist();
    }

    /// Explicit restart: fresh state, cleared slot, manual movement.
    pub fn new_game(&mut self, presenter: &mut dyn Presenter) {
        self.state = GameState::fresh();
        self.driver = MovementDriver::Manual;
        if let Err(err) = self.store.clear(&self.slot) {
            tracing::warn!(
                target: "geomerge::session",
                slot = %self.slot,
                error = %err,
                "save.clear_failed"
            );
        }
        self.persist();
        presenter.center_on(self.state.position);
    }

    fn persist(&mut self) {
        if let Err(err) = persist::save_game(&mut self.store, &self.slot, &self.state) {
            tracing::warn!(
                target: "geomerge::session",
                slot = %self.slot,
                error = %err,
                "save.write_failed"
            );
        }
    }
}

fn rejection(err: InteractError) -> Notification {
    match err {
        InteractError::OutOfRange {
            coord,
            distance,
            radius,
        } => Notification::OutOfRange {
            coord,
            distance,
            radius,
        },
        InteractError::NothingHere(coord) => Notification::NothingHere(coord),
        InteractError::Mismatch { held, found, .. } => {
            Notification::IncompatibleValues { held, found }
        }
    }
}
