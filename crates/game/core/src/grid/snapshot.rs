//! Wire format of a grid as exchanged with the hosting application.
//!
//! ```json
//! [[{"id": "tile-0-0", "terrainKind": "Default", "isOpen": false,
//!    "occupantName": "alice", "itemId": null}]]
//! ```

use super::{Grid, GridError, ItemId, TerrainKind, Tile, TileId};

/// One tile of a grid snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TileSnapshot {
    pub id: String,
    pub terrain_kind: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_open: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub occupant_name: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub item_id: Option<String>,
}

/// Rectangular array of tile snapshots, row-major.
pub type GridSnapshot = Vec<Vec<TileSnapshot>>;

impl TileSnapshot {
    fn into_tile(self) -> Result<Tile, GridError> {
        let id: TileId = self.id.parse()?;
        let terrain: TerrainKind = self
            .terrain_kind
            .parse()
            .map_err(|_| GridError::UnknownTerrain(self.terrain_kind.clone()))?;

        Ok(Tile {
            id,
            terrain,
            is_open: self.is_open,
            occupant: self.occupant_name,
            item: self.item_id.map(ItemId),
        })
    }
}

impl From<&Tile> for TileSnapshot {
    fn from(tile: &Tile) -> Self {
        Self {
            id: tile.id.to_string(),
            terrain_kind: tile.terrain.to_string(),
            is_open: tile.is_open,
            occupant_name: tile.occupant.clone(),
            item_id: tile.item.as_ref().map(|item| item.0.clone()),
        }
    }
}

impl Grid {
    /// Parses a snapshot; ids must encode the row/column the tile sits at.
    pub fn from_snapshot(snapshot: GridSnapshot) -> Result<Self, GridError> {
        let rows = snapshot
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(TileSnapshot::into_tile)
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_rows(rows)
    }

    pub fn to_snapshot(&self) -> GridSnapshot {
        self.rows()
            .map(|row| row.iter().map(TileSnapshot::from).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(id: &str, terrain: &str) -> TileSnapshot {
        TileSnapshot {
            id: id.to_owned(),
            terrain_kind: terrain.to_owned(),
            is_open: false,
            occupant_name: None,
            item_id: None,
        }
    }

    #[test]
    fn parses_coordinates_from_ids() {
        let grid = Grid::from_snapshot(vec![
            vec![tile("tile-0-0", "Default"), tile("tile-0-1", "Ice")],
            vec![tile("tile-1-0", "Door"), tile("tile-1-1", "Wall")],
        ])
        .unwrap();

        assert_eq!(grid.width(), 2);
        assert_eq!(grid.height(), 2);
        assert_eq!(
            grid.tile(TileId::new(1, 0)).map(|t| t.terrain),
            Some(TerrainKind::Door)
        );
        assert_eq!(grid.to_snapshot()[0][1].terrain_kind, "Ice");
    }

    #[test]
    fn unknown_terrain_names_the_kind() {
        let err = Grid::from_snapshot(vec![vec![tile("tile-0-0", "Lava")]]).unwrap_err();
        assert_eq!(err.to_string(), "Unknown tile type: Lava");
    }

    #[test]
    fn malformed_id_is_rejected() {
        let err = Grid::from_snapshot(vec![vec![tile("0-0", "Default")]]).unwrap_err();
        assert!(matches!(err, GridError::InvalidTileId(_)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn reads_camel_case_json() {
        let json = r#"[[{"id":"tile-0-0","terrainKind":"Water","isOpen":false,"occupantName":"bob"}]]"#;
        let snapshot: GridSnapshot = serde_json::from_str(json).unwrap();
        let grid = Grid::from_snapshot(snapshot).unwrap();
        assert_eq!(grid.position_of("bob"), Some(TileId::new(0, 0)));
    }
}
