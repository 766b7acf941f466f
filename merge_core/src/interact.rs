use thiserror::Error;

use crate::config::GameConfig;
use crate::coord::CellCoord;
use crate::overrides::effective_value;
use crate::spawn::Token;
use crate::state::GameState;

/// A state-changing transition of the pickup/drop/merge machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractOutcome {
    /// Empty hand, non-empty cell: the token moves into the hand and the
    /// cell is overridden empty.
    PickedUp(Token),
    /// Held token, empty cell: the hand empties and the cell records the
    /// token.
    Dropped(Token),
    /// Held token equal to the cell's token: the carried token doubles and
    /// the cell is overridden empty. `win` is true whenever the doubled
    /// value reaches the threshold, on every such merge.
    Merged { value: Token, win: bool },
}

/// A rejected interaction. The game state is untouched; these exist to be
/// reported to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InteractError {
    #[error("cell {coord} is {distance} cells away, reach is {radius}")]
    OutOfRange {
        coord: CellCoord,
        distance: u32,
        radius: u32,
    },
    #[error("nothing to pick up at {0}")]
    NothingHere(CellCoord),
    #[error("held {held} does not match {found} at {coord}")]
    Mismatch {
        coord: CellCoord,
        held: Token,
        found: Token,
    },
}

/// Apply one "interact with cell" action.
///
/// Range is checked first against the square king-move neighborhood; a cell
/// at Chebyshev distance exactly the radius is in reach. Drop and merge both
/// clear the hand; pickup is the only transition that fills it.
pub fn interact(
    state: &mut GameState,
    config: &GameConfig,
    coord: CellCoord,
) -> Result<InteractOutcome, InteractError> {
    let player_cell = state.cell(config.cell_size_deg);
    let distance = player_cell.chebyshev(coord);
    if distance > config.interact_radius {
        return Err(InteractError::OutOfRange {
            coord,
            distance,
            radius: config.interact_radius,
        });
    }

    let found = effective_value(&state.overrides, &config.spawn, &config.world_seed, coord);
    match (state.held, found) {
        (None, None) => Err(InteractError::NothingHere(coord)),
        (None, Some(token)) => {
            state.held = Some(token);
            state.overrides.set(coord, None);
            Ok(InteractOutcome::PickedUp(token))
        }
        (Some(held), None) => {
            state.held = None;
            state.overrides.set(coord, Some(held));
            Ok(InteractOutcome::Dropped(held))
        }
        (Some(held), Some(found)) if held == found => {
            let value = held.doubled();
            state.held = Some(value);
            state.overrides.set(coord, None);
            Ok(InteractOutcome::Merged {
                value,
                win: value.value() >= config.win_threshold,
            })
        }
        (Some(held), Some(found)) => Err(InteractError::Mismatch { coord, held, found }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Radius 3, threshold 16, every cell naturally holds a 1 token.
    fn config_all_ones() -> GameConfig {
        GameConfig::from_json(
            r#"{
                "win_threshold": 16,
                "spawn_bands": [ { "upto": 1.0, "token": 1 } ]
            }"#,
        )
        .unwrap()
    }

    /// Radius 3, threshold 16, every cell naturally empty.
    fn config_all_empty() -> GameConfig {
        GameConfig::from_json(
            r#"{
                "win_threshold": 16,
                "spawn_bands": [ { "upto": 1.0 } ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn boundary_cell_is_in_reach_one_beyond_is_not() {
        let config = config_all_ones();
        let mut state = GameState::fresh();

        assert!(interact(&mut state, &config, CellCoord::new(3, 3)).is_ok());

        let err = interact(&mut state, &config, CellCoord::new(0, 4)).unwrap_err();
        assert_eq!(
            err,
            InteractError::OutOfRange {
                coord: CellCoord::new(0, 4),
                distance: 4,
                radius: 3
            }
        );
        let err = interact(&mut state, &config, CellCoord::new(-4, 0)).unwrap_err();
        assert!(matches!(err, InteractError::OutOfRange { distance: 4, .. }));
    }

    #[test]
    fn rejection_leaves_state_untouched() {
        let config = config_all_ones();
        let mut state = GameState::fresh();
        let before = state.clone();

        let _ = interact(&mut state, &config, CellCoord::new(0, 4));
        assert_eq!(state, before);
    }

    #[test]
    fn pickup_then_merge_doubles_the_held_token() {
        let config = config_all_ones();
        let mut state = GameState::fresh();

        let first = CellCoord::new(0, 1);
        let second = CellCoord::new(0, 2);

        assert_eq!(
            interact(&mut state, &config, first),
            Ok(InteractOutcome::PickedUp(Token(1)))
        );
        assert_eq!(state.held, Some(Token(1)));
        assert_eq!(state.overrides.get(first), Some(None));

        assert_eq!(
            interact(&mut state, &config, second),
            Ok(InteractOutcome::Merged {
                value: Token(2),
                win: false
            })
        );
        assert_eq!(state.held, Some(Token(2)));
        assert_eq!(state.overrides.get(second), Some(None));
    }

    #[test]
    fn empty_hand_on_empty_cell_is_reported() {
        let config = config_all_empty();
        let mut state = GameState::fresh();
        assert_eq!(
            interact(&mut state, &config, CellCoord::new(1, 1)),
            Err(InteractError::NothingHere(CellCoord::new(1, 1)))
        );
    }

    #[test]
    fn drop_records_the_held_token() {
        let config = config_all_empty();
        let mut state = GameState::fresh();
        state.held = Some(Token(4));

        let coord = CellCoord::new(2, -2);
        assert_eq!(
            interact(&mut state, &config, coord),
            Ok(InteractOutcome::Dropped(Token(4)))
        );
        assert_eq!(state.held, None);
        assert_eq!(state.overrides.get(coord), Some(Some(Token(4))));
    }

    #[test]
    fn unequal_tokens_do_not_merge() {
        let config = config_all_ones();
        let mut state = GameState::fresh();
        state.held = Some(Token(2));

        let coord = CellCoord::new(1, 0);
        assert_eq!(
            interact(&mut state, &config, coord),
            Err(InteractError::Mismatch {
                coord,
                held: Token(2),
                found: Token(1)
            })
        );
        assert_eq!(state.held, Some(Token(2)));
        assert_eq!(state.overrides.get(coord), None);
    }

    #[test]
    fn win_fires_on_every_threshold_merge() {
        let config = config_all_empty();
        let mut state = GameState::fresh();

        // Stage an 8 on the board and hold another 8: merging reaches the
        // threshold of 16.
        let coord = CellCoord::new(0, 1);
        state.overrides.set(coord, Some(Token(8)));
        state.held = Some(Token(8));
        assert_eq!(
            interact(&mut state, &config, coord),
            Ok(InteractOutcome::Merged {
                value: Token(16),
                win: true
            })
        );

        // A later merge past the threshold signals again.
        let coord = CellCoord::new(0, 2);
        state.overrides.set(coord, Some(Token(16)));
        assert_eq!(
            interact(&mut state, &config, coord),
            Ok(InteractOutcome::Merged {
                value: Token(32),
                win: true
            })
        );
    }

    #[test]
    fn moves_conserve_total_token_value() {
        let config = config_all_ones();
        let mut state = GameState::fresh();

        let total = |state: &GameState| -> u32 {
            state
                .overrides
                .sorted_entries()
                .iter()
                .filter_map(|(_, value)| value.map(Token::value))
                .sum::<u32>()
                + state.held.map(Token::value).unwrap_or(0)
        };

        // Pickup moves a generated token into the tracked multiset.
        interact(&mut state, &config, CellCoord::new(0, 1)).unwrap();
        assert_eq!(total(&state), 1);

        // Merge doubles one token and removes the other: 1 (held) + 1 (cell)
        // collapse into a held 2.
        interact(&mut state, &config, CellCoord::new(0, 2)).unwrap();
        assert_eq!(total(&state), 2);

        // Drop into a player-emptied cell moves value without changing it.
        interact(&mut state, &config, CellCoord::new(0, 1)).unwrap();
        assert_eq!(total(&state), 2);
        assert_eq!(state.held, None);
    }
}
