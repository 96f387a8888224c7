//! Movement cost table shared by reachability and shortest-path search.

use std::collections::BTreeMap;

use strum::IntoEnumIterator;

use super::{TerrainKind, Tile};
use crate::pathfinding::PathError;

/// Cost of entering a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "CostRepr", into = "CostRepr"))]
pub enum MovementCost {
    Finite(u32),
    Impassable,
}

impl MovementCost {
    pub fn points(self) -> Option<u32> {
        match self {
            MovementCost::Finite(points) => Some(points),
            MovementCost::Impassable => None,
        }
    }

    pub fn is_passable(self) -> bool {
        matches!(self, MovementCost::Finite(_))
    }
}

/// Mapping from terrain to the cost of entering it.
///
/// Every terrain kind must be present: a grid that references a kind missing
/// from the table is a configuration bug and lookups fail with
/// [`PathError::UnknownTerrain`]. Closed doors cost [`MovementCost::Impassable`]
/// whatever the `Door` entry says; the entry applies to open doors.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        try_from = "BTreeMap<String, MovementCost>",
        into = "BTreeMap<String, MovementCost>"
    )
)]
pub struct MovementCostTable {
    entries: BTreeMap<TerrainKind, MovementCost>,
}

impl MovementCostTable {
    pub const ICE: MovementCost = MovementCost::Finite(0);
    pub const DEFAULT: MovementCost = MovementCost::Finite(1);
    pub const OPEN_DOOR: MovementCost = MovementCost::Finite(1);
    pub const WATER: MovementCost = MovementCost::Finite(2);
    pub const WALL: MovementCost = MovementCost::Impassable;

    /// Creates a table with no entries.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn with_cost(mut self, terrain: TerrainKind, cost: MovementCost) -> Self {
        self.entries.insert(terrain, cost);
        self
    }

    pub fn without(mut self, terrain: TerrainKind) -> Self {
        self.entries.remove(&terrain);
        self
    }

    /// Returns the terrain kinds missing from the table.
    pub fn missing(&self) -> Vec<TerrainKind> {
        TerrainKind::iter()
            .filter(|kind| !self.entries.contains_key(kind))
            .collect()
    }

    pub fn cost(&self, terrain: TerrainKind) -> Result<MovementCost, PathError> {
        self.entries
            .get(&terrain)
            .copied()
            .ok_or(PathError::UnknownTerrain(terrain))
    }

    /// Cost of entering `tile`, taking door state into account.
    pub fn tile_cost(&self, tile: &Tile) -> Result<MovementCost, PathError> {
        let cost = self.cost(tile.terrain)?;
        if tile.is_closed_door() {
            return Ok(MovementCost::Impassable);
        }
        Ok(cost)
    }
}

impl Default for MovementCostTable {
    fn default() -> Self {
        Self::empty()
            .with_cost(TerrainKind::Ice, Self::ICE)
            .with_cost(TerrainKind::Default, Self::DEFAULT)
            .with_cost(TerrainKind::Door, Self::OPEN_DOOR)
            .with_cost(TerrainKind::Water, Self::WATER)
            .with_cost(TerrainKind::Wall, Self::WALL)
    }
}

#[cfg(feature = "serde")]
#[derive(Clone, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
enum CostRepr {
    Points(u32),
    Keyword(CostKeyword),
}

#[cfg(feature = "serde")]
#[derive(Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
enum CostKeyword {
    Impassable,
}

#[cfg(feature = "serde")]
impl From<CostRepr> for MovementCost {
    fn from(repr: CostRepr) -> Self {
        match repr {
            CostRepr::Points(points) => MovementCost::Finite(points),
            CostRepr::Keyword(CostKeyword::Impassable) => MovementCost::Impassable,
        }
    }
}

#[cfg(feature = "serde")]
impl From<MovementCost> for CostRepr {
    fn from(cost: MovementCost) -> Self {
        match cost {
            MovementCost::Finite(points) => CostRepr::Points(points),
            MovementCost::Impassable => CostRepr::Keyword(CostKeyword::Impassable),
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<BTreeMap<String, MovementCost>> for MovementCostTable {
    type Error = super::GridError;

    fn try_from(raw: BTreeMap<String, MovementCost>) -> Result<Self, Self::Error> {
        let mut table = Self::empty();
        for (name, cost) in raw {
            let terrain = name
                .parse::<TerrainKind>()
                .map_err(|_| super::GridError::UnknownTerrain(name.clone()))?;
            table.entries.insert(terrain, cost);
        }
        Ok(table)
    }
}

#[cfg(feature = "serde")]
impl From<MovementCostTable> for BTreeMap<String, MovementCost> {
    fn from(table: MovementCostTable) -> Self {
        table
            .entries
            .into_iter()
            .map(|(terrain, cost)| (terrain.to_string(), cost))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TileId;

    #[test]
    fn default_table_covers_every_terrain() {
        assert!(MovementCostTable::default().missing().is_empty());
    }

    #[test]
    fn closed_door_is_impassable_regardless_of_entry() {
        let table = MovementCostTable::default();
        let closed = Tile::new(TileId::new(0, 0), TerrainKind::Door);
        let open = closed.clone().with_open(true);

        assert_eq!(table.tile_cost(&closed), Ok(MovementCost::Impassable));
        assert_eq!(table.tile_cost(&open), Ok(MovementCost::Finite(1)));
    }

    #[test]
    fn missing_entry_is_reported() {
        let table = MovementCostTable::default().without(TerrainKind::Water);
        let err = table.cost(TerrainKind::Water).unwrap_err();
        assert_eq!(err.to_string(), "Unknown tile type: Water");
    }
}
