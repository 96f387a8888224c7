//! Rectangular tile grid of a match.
//!
//! The grid is the single source of truth for player positions: tiles carry
//! the name of their occupant and every lookup of "where is this player" goes
//! through [`Grid::position_of`].

mod cost;
mod snapshot;
mod tile;

use arrayvec::ArrayVec;

pub use cost::{MovementCost, MovementCostTable};
pub use snapshot::{GridSnapshot, TileSnapshot};
pub use tile::{ItemId, TerrainKind, Tile, TileId, TileIdParseError};

use crate::error::{ErrorSeverity, GameError};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("grid has no tiles")]
    Empty,

    #[error("row {row} has {found} tiles, expected {expected}")]
    NotRectangular {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error(transparent)]
    InvalidTileId(#[from] TileIdParseError),

    #[error("tile at position {expected} is labelled {found}")]
    TileIdMismatch { expected: TileId, found: TileId },

    #[error("Unknown tile type: {0}")]
    UnknownTerrain(String),

    #[error("wall tile {0} cannot hold an occupant")]
    WallOccupied(TileId),

    #[error("tile {0} is not on the grid")]
    TileNotFound(TileId),

    #[error("tile {tile} is already occupied by {occupant}")]
    TileOccupied { tile: TileId, occupant: String },

    #[error("tile {tile} is not occupied by {expected}")]
    OccupantMismatch { tile: TileId, expected: String },
}

impl GameError for GridError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            GridError::TileOccupied { .. } => ErrorSeverity::Recoverable,
            GridError::OccupantMismatch { .. } => ErrorSeverity::Internal,
            GridError::UnknownTerrain(_) => ErrorSeverity::Fatal,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            GridError::Empty => "GRID_EMPTY",
            GridError::NotRectangular { .. } => "GRID_NOT_RECTANGULAR",
            GridError::InvalidTileId(_) => "GRID_INVALID_TILE_ID",
            GridError::TileIdMismatch { .. } => "GRID_TILE_ID_MISMATCH",
            GridError::UnknownTerrain(_) => "GRID_UNKNOWN_TERRAIN",
            GridError::WallOccupied(_) => "GRID_WALL_OCCUPIED",
            GridError::TileNotFound(_) => "GRID_TILE_NOT_FOUND",
            GridError::TileOccupied { .. } => "GRID_TILE_OCCUPIED",
            GridError::OccupantMismatch { .. } => "GRID_OCCUPANT_MISMATCH",
        }
    }
}

/// Row-major rectangular grid.
///
/// Serialized through [`GridSnapshot`] so that shape checks always run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Builds a grid from rows of tiles, checking shape and tile ids.
    pub fn from_rows(rows: Vec<Vec<Tile>>) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(GridError::Empty);
        }

        let mut tiles = Vec::with_capacity(width * height);
        for (row_index, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(GridError::NotRectangular {
                    row: row_index,
                    expected: width,
                    found: row.len(),
                });
            }
            for (col_index, tile) in row.into_iter().enumerate() {
                let expected = TileId::new(row_index, col_index);
                if tile.id != expected {
                    return Err(GridError::TileIdMismatch {
                        expected,
                        found: tile.id,
                    });
                }
                if tile.is_wall() && tile.is_occupied() {
                    return Err(GridError::WallOccupied(tile.id));
                }
                tiles.push(tile);
            }
        }

        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    /// Builds an unoccupied grid from terrain rows. Doors start closed.
    pub fn from_terrain(rows: Vec<Vec<TerrainKind>>) -> Result<Self, GridError> {
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(row, kinds)| {
                kinds
                    .into_iter()
                    .enumerate()
                    .map(|(col, terrain)| Tile::new(TileId::new(row, col), terrain))
                    .collect()
            })
            .collect();
        Self::from_rows(rows)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, id: TileId) -> bool {
        id.row < self.height && id.col < self.width
    }

    fn index(&self, id: TileId) -> Option<usize> {
        self.contains(id).then(|| id.row * self.width + id.col)
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.index(id).map(|index| &self.tiles[index])
    }

    pub fn tile_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        let index = self.index(id)?;
        Some(&mut self.tiles[index])
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Rows of tiles in row-major order.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.chunks(self.width)
    }

    /// Orthogonal neighbours of `id` that lie on the grid (up, right, down, left).
    pub fn neighbors(&self, id: TileId) -> ArrayVec<TileId, 4> {
        let mut out = ArrayVec::new();
        if id.row > 0 {
            out.push(TileId::new(id.row - 1, id.col));
        }
        if id.col + 1 < self.width {
            out.push(TileId::new(id.row, id.col + 1));
        }
        if id.row + 1 < self.height {
            out.push(TileId::new(id.row + 1, id.col));
        }
        if id.col > 0 {
            out.push(TileId::new(id.row, id.col - 1));
        }
        out
    }

    /// Tile currently holding the named player.
    pub fn position_of(&self, name: &str) -> Option<TileId> {
        self.tiles
            .iter()
            .find(|tile| tile.is_occupied_by(name))
            .map(|tile| tile.id)
    }

    pub fn occupant(&self, id: TileId) -> Option<&str> {
        self.tile(id).and_then(|tile| tile.occupant.as_deref())
    }

    /// Places a player on an empty, non-wall tile.
    pub fn place_occupant(&mut self, id: TileId, name: &str) -> Result<(), GridError> {
        let tile = self.tile_mut(id).ok_or(GridError::TileNotFound(id))?;
        if tile.is_wall() {
            return Err(GridError::WallOccupied(id));
        }
        if let Some(occupant) = &tile.occupant {
            return Err(GridError::TileOccupied {
                tile: id,
                occupant: occupant.clone(),
            });
        }
        tile.occupant = Some(name.to_owned());
        Ok(())
    }

    /// Removes the named player from `id`.
    pub fn remove_occupant(&mut self, id: TileId, name: &str) -> Result<(), GridError> {
        let tile = self.tile_mut(id).ok_or(GridError::TileNotFound(id))?;
        if !tile.is_occupied_by(name) {
            return Err(GridError::OccupantMismatch {
                tile: id,
                expected: name.to_owned(),
            });
        }
        tile.occupant = None;
        Ok(())
    }

    /// Moves a player between two tiles; the grid is unchanged on error.
    pub fn move_occupant(&mut self, from: TileId, to: TileId, name: &str) -> Result<(), GridError> {
        if from == to {
            return match self.tile(from) {
                Some(tile) if tile.is_occupied_by(name) => Ok(()),
                Some(_) => Err(GridError::OccupantMismatch {
                    tile: from,
                    expected: name.to_owned(),
                }),
                None => Err(GridError::TileNotFound(from)),
            };
        }
        self.remove_occupant(from, name)?;
        if let Err(err) = self.place_occupant(to, name) {
            // Restore the original placement
            if let Some(tile) = self.tile_mut(from) {
                tile.occupant = Some(name.to_owned());
            }
            return Err(err);
        }
        Ok(())
    }
}
