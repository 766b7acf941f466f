use std::collections::HashMap;

use crate::coord::CellCoord;
use crate::spawn::{SpawnTable, Token};

/// Sparse record of cells the player has changed.
///
/// A present `None` means "emptied by the player" and is distinct from an
/// absent key, which means "defer to the generator". Entries are never
/// evicted; each session visits a bounded number of cells, so the map stays
/// small, and once a cell is touched its entry shadows the generator for the
/// rest of the game (and across reloads once persisted).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverrideStore {
    cells: HashMap<CellCoord, Option<Token>>,
}

impl OverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outer `None` means no override recorded; `Some(None)` is an explicit
    /// player-emptied cell.
    pub fn get(&self, coord: CellCoord) -> Option<Option<Token>> {
        self.cells.get(&coord).copied()
    }

    pub fn set(&mut self, coord: CellCoord, value: Option<Token>) {
        self.cells.insert(coord, value);
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Entries in coordinate order, for stable serialization.
    pub fn sorted_entries(&self) -> Vec<(CellCoord, Option<Token>)> {
        let mut entries: Vec<_> = self
            .cells
            .iter()
            .map(|(coord, value)| (*coord, *value))
            .collect();
        entries.sort_unstable_by_key(|(coord, _)| *coord);
        entries
    }
}

impl FromIterator<(CellCoord, Option<Token>)> for OverrideStore {
    fn from_iter<I: IntoIterator<Item = (CellCoord, Option<Token>)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

/// Two-tier lookup: the override wins whenever one is recorded, including an
/// explicit empty over generated content and vice versa.
pub fn effective_value(
    overrides: &OverrideStore,
    table: &SpawnTable,
    world_seed: &str,
    coord: CellCoord,
) -> Option<Token> {
    match overrides.get(coord) {
        Some(value) => value,
        None => table.generate(world_seed, coord),
    }
}
