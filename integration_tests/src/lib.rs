//! Shared fixtures and play helpers for the scenario tests.

use merge_core::{CellCoord, GameConfig, MemorySaveStore, NullPresenter, Presenter, Session};

/// Radius 3, win at 16, every cell naturally holds a 1 token.
pub fn config_all_ones() -> GameConfig {
    GameConfig::from_json(
        r#"{
            "win_threshold": 16,
            "spawn_bands": [ { "upto": 1.0, "token": 1 } ]
        }"#,
    )
    .expect("fixture config should parse")
}

/// Radius 3, win at 16, every cell naturally empty.
pub fn config_all_empty() -> GameConfig {
    GameConfig::from_json(
        r#"{
            "win_threshold": 16,
            "spawn_bands": [ { "upto": 1.0 } ]
        }"#,
    )
    .expect("fixture config should parse")
}

/// Cell supply for the all-ones board: every in-range cell around the
/// origin, each naturally holding a 1.
pub struct CellSupply {
    untouched: Vec<CellCoord>,
    emptied: Vec<CellCoord>,
}

impl CellSupply {
    pub fn in_radius(radius: i32) -> Self {
        let mut untouched = Vec::new();
        for i in -radius..=radius {
            for j in -radius..=radius {
                untouched.push(CellCoord::new(i, j));
            }
        }
        Self {
            untouched,
            emptied: Vec::new(),
        }
    }

    pub fn take_untouched(&mut self) -> CellCoord {
        self.untouched.pop().expect("supply of fresh cells exhausted")
    }

    pub fn take_emptied(&mut self) -> CellCoord {
        self.emptied.pop().expect("no emptied cell available")
    }

    pub fn release_emptied(&mut self, coord: CellCoord) {
        self.emptied.push(coord);
    }
}

/// Play until the hand holds `value`, through real pickups, drops, and
/// merges on an all-ones board. Requires an empty hand on entry.
pub fn build_in_hand(
    session: &mut Session<MemorySaveStore>,
    presenter: &mut dyn Presenter,
    supply: &mut CellSupply,
    value: u32,
) {
    assert!(value.is_power_of_two());
    if value == 1 {
        let cell = supply.take_untouched();
        session.interact_with(cell, presenter);
        supply.release_emptied(cell);
        return;
    }
    build_in_hand(session, presenter, supply, value / 2);
    let parking = supply.take_emptied();
    // Drop the first half, assemble the second, merge them back together.
    session.interact_with(parking, presenter);
    build_in_hand(session, presenter, supply, value / 2);
    session.interact_with(parking, presenter);
    supply.release_emptied(parking);
}

/// Convenience wrapper that plays silently.
pub fn build_in_hand_quiet(
    session: &mut Session<MemorySaveStore>,
    supply: &mut CellSupply,
    value: u32,
) {
    build_in_hand(session, &mut NullPresenter, supply, value);
}
