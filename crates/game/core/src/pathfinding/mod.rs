//! Weighted reachability and shortest-path search over a [`Grid`].
//!
//! All functions here are pure: they read a grid and a cost table and never
//! mutate either, so repeated calls on the same grid yield identical results.
//!
//! Invalid input (a tile that is not on the grid, a wall or closed door as an
//! endpoint) is an ordinary empty result. The only error is a terrain kind the
//! cost table does not know about, which is a configuration bug.
//!
//! Closed doors are impassable both as a destination and as a tile to route
//! through, for every search in this module.
//!
//! [`Grid`]: crate::grid::Grid

mod approach;
mod dijkstra;
mod moves;
mod reachable;

pub use approach::{find_best_move_tile, find_closest_reachable_tile, find_nearest_free_tile};
pub use dijkstra::{path_cost, quickest_free_path, quickest_path};
pub use moves::{Move, MoveKind, candidate_moves};
pub use reachable::reachable_tiles;

use crate::error::{ErrorSeverity, GameError};
use crate::grid::TerrainKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("Unknown tile type: {0}")]
    UnknownTerrain(TerrainKind),
}

impl GameError for PathError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        "PATH_UNKNOWN_TERRAIN"
    }
}
