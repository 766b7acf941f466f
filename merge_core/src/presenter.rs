use std::fmt;

use crate::config::GameConfig;
use crate::coord::{CellCoord, GeoPosition};
use crate::overrides::effective_value;
use crate::spawn::Token;
use crate::state::GameState;

/// What a client should draw for one cell. Emptied cells still get a view
/// with `content: None`; the marker is never removed outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellView {
    pub coord: CellCoord,
    pub content: Option<Token>,
}

/// Player-facing messages, emitted strictly after the mutation (and its
/// persistence attempt) has committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    OutOfRange {
        coord: CellCoord,
        distance: u32,
        radius: u32,
    },
    NothingHere(CellCoord),
    IncompatibleValues {
        held: Token,
        found: Token,
    },
    PickedUp(Token),
    Dropped(Token),
    Merged(Token),
    Win(Token),
    TrackingUnavailable,
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::OutOfRange {
                coord,
                distance,
                radius,
            } => write!(
                f,
                "cell {coord} is {distance} cells away, you can reach {radius}"
            ),
            Notification::NothingHere(coord) => write!(f, "nothing to pick up at {coord}"),
            Notification::IncompatibleValues { held, found } => {
                write!(f, "can't merge held {held} with {found}")
            }
            Notification::PickedUp(token) => write!(f, "picked up {token}"),
            Notification::Dropped(token) => write!(f, "dropped {token}"),
            Notification::Merged(token) => write!(f, "merged into {token}"),
            Notification::Win(token) => write!(f, "you win! reached {token}"),
            Notification::TrackingUnavailable => {
                write!(f, "position tracking is not available on this device")
            }
        }
    }
}

/// Rendering boundary. The core never draws; it hands the client cell views,
/// camera targets, and notifications and lets the mapping side do the rest.
pub trait Presenter {
    fn refresh_cell(&mut self, view: CellView);
    fn center_on(&mut self, position: GeoPosition);
    fn notify(&mut self, notification: Notification);
}

/// Presenter that discards everything. Keeps headless callers and tests
/// honest about which calls they actually care about.
#[derive(Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn refresh_cell(&mut self, _view: CellView) {}
    fn center_on(&mut self, _position: GeoPosition) {}
    fn notify(&mut self, _notification: Notification) {}
}

/// Effective content of every cell in the square window around a center,
/// for full redraws after a camera or viewport change.
pub fn grid_view(state: &GameState, config: &GameConfig, radius: u32) -> Vec<CellView> {
    let center = state.cell(config.cell_size_deg);
    let radius = radius as i32;
    let mut views = Vec::with_capacity(((radius * 2 + 1) * (radius * 2 + 1)) as usize);
    for di in -radius..=radius {
        for dj in -radius..=radius {
            let coord = center.offset(di, dj);
            views.push(CellView {
                coord,
                content: effective_value(
                    &state.overrides,
                    &config.spawn,
                    &config.world_seed,
                    coord,
                ),
            });
        }
    }
    views
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_view_covers_the_square_window() {
        let config = GameConfig::from_json(r#"{ "spawn_bands": [ { "upto": 1.0 } ] }"#).unwrap();
        let mut state = GameState::fresh();
        state.overrides.set(CellCoord::new(1, -1), Some(Token(2)));

        let views = grid_view(&state, &config, 2);
        assert_eq!(views.len(), 25);
        let staged = views
            .iter()
            .find(|view| view.coord == CellCoord::new(1, -1))
            .unwrap();
        assert_eq!(staged.content, Some(Token(2)));
        assert!(views
            .iter()
            .filter(|view| view.coord != CellCoord::new(1, -1))
            .all(|view| view.content.is_none()));
    }
}
