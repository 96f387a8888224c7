//! Committing moves and toggling doors.
//!
//! Both operations validate everything before touching state, so a rejected
//! request leaves the match exactly as it was.

use crate::error::{ErrorSeverity, GameError};
use crate::grid::{GridError, MovementCostTable, TileId};
use crate::pathfinding::{PathError, path_cost, quickest_free_path, reachable_tiles};
use crate::state::GameState;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("unknown player `{0}`")]
    UnknownPlayer(String),

    #[error("player `{player}` is not on tile {tile}")]
    NotAtOrigin { player: String, tile: TileId },

    #[error("tile {0} is not on the grid")]
    UnknownTile(TileId),

    #[error("tile {0} cannot be entered")]
    Blocked(TileId),

    #[error("tile {to} is out of reach with {movement_points} movement points")]
    OutOfReach { to: TileId, movement_points: u32 },

    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Grid(#[from] GridError),
}

impl GameError for MoveError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            MoveError::UnknownPlayer(_) | MoveError::UnknownTile(_) => ErrorSeverity::Validation,
            MoveError::NotAtOrigin { .. } => ErrorSeverity::Validation,
            MoveError::Blocked(_) | MoveError::OutOfReach { .. } => ErrorSeverity::Recoverable,
            MoveError::Path(inner) => inner.severity(),
            MoveError::Grid(inner) => inner.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            MoveError::UnknownPlayer(_) => "MOVE_UNKNOWN_PLAYER",
            MoveError::NotAtOrigin { .. } => "MOVE_NOT_AT_ORIGIN",
            MoveError::UnknownTile(_) => "MOVE_UNKNOWN_TILE",
            MoveError::Blocked(_) => "MOVE_BLOCKED",
            MoveError::OutOfReach { .. } => "MOVE_OUT_OF_REACH",
            MoveError::Path(inner) => inner.error_code(),
            MoveError::Grid(inner) => inner.error_code(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub player: String,
    /// `from` through `to`, inclusive.
    pub path: Vec<TileId>,
    pub cost: u32,
    pub movement_points_left: u32,
}

/// Moves `actor` from `from` to `to` along the cheapest free path.
pub fn resolve_move(
    state: &mut GameState,
    actor: &str,
    from: TileId,
    to: TileId,
    costs: &MovementCostTable,
) -> Result<MoveOutcome, MoveError> {
    let budget = state
        .player(actor)
        .map(|player| player.movement_points)
        .ok_or_else(|| MoveError::UnknownPlayer(actor.to_owned()))?;

    let grid = state.grid();
    if !grid.tile(from).is_some_and(|tile| tile.is_occupied_by(actor)) {
        return Err(MoveError::NotAtOrigin {
            player: actor.to_owned(),
            tile: from,
        });
    }
    let target = grid.tile(to).ok_or(MoveError::UnknownTile(to))?;
    if from != to && !target.is_free() {
        return Err(MoveError::Blocked(to));
    }

    if !reachable_tiles(grid, from, budget, costs)?.contains(&to) {
        return Err(MoveError::OutOfReach {
            to,
            movement_points: budget,
        });
    }
    let path = quickest_free_path(grid, from, to, costs, false)?.ok_or(MoveError::OutOfReach {
        to,
        movement_points: budget,
    })?;
    let cost = path_cost(grid, &path, costs)?;

    // Reachability guarantees cost <= budget, so spending cannot fail here
    let player = state
        .player_mut(actor)
        .ok_or_else(|| MoveError::UnknownPlayer(actor.to_owned()))?;
    if !player.spend_movement(cost) {
        return Err(MoveError::OutOfReach {
            to,
            movement_points: budget,
        });
    }
    let movement_points_left = player.movement_points;

    if let Err(err) = state.grid_mut().move_occupant(from, to, actor) {
        if let Some(player) = state.player_mut(actor) {
            player.movement_points = budget;
        }
        return Err(err.into());
    }

    Ok(MoveOutcome {
        player: actor.to_owned(),
        path,
        cost,
        movement_points_left,
    })
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DoorError {
    #[error("unknown player `{0}`")]
    UnknownPlayer(String),

    #[error("player `{0}` is not on the board")]
    NotOnBoard(String),

    #[error("tile {0} is not a door")]
    NotADoor(TileId),

    #[error("door {0} is not next to the player")]
    NotAdjacent(TileId),

    #[error("door {0} is blocked by a player")]
    Occupied(TileId),

    #[error("player `{0}` has no action points left")]
    NoActionPoints(String),
}

impl GameError for DoorError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            DoorError::Occupied(_) | DoorError::NoActionPoints(_) => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            DoorError::UnknownPlayer(_) => "DOOR_UNKNOWN_PLAYER",
            DoorError::NotOnBoard(_) => "DOOR_NOT_ON_BOARD",
            DoorError::NotADoor(_) => "DOOR_NOT_A_DOOR",
            DoorError::NotAdjacent(_) => "DOOR_NOT_ADJACENT",
            DoorError::Occupied(_) => "DOOR_OCCUPIED",
            DoorError::NoActionPoints(_) => "DOOR_NO_ACTION_POINTS",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DoorOutcome {
    pub tile: TileId,
    pub is_open: bool,
    pub action_points_left: u32,
}

/// Opens or closes the door at `door`, spending one action point.
pub fn toggle_door(state: &mut GameState, actor: &str, door: TileId) -> Result<DoorOutcome, DoorError> {
    let action_points = state
        .player(actor)
        .map(|player| player.action_points)
        .ok_or_else(|| DoorError::UnknownPlayer(actor.to_owned()))?;
    let position = state
        .position_of(actor)
        .ok_or_else(|| DoorError::NotOnBoard(actor.to_owned()))?;

    let tile = state.grid().tile(door).ok_or(DoorError::NotADoor(door))?;
    if !tile.is_door() {
        return Err(DoorError::NotADoor(door));
    }
    if !position.is_adjacent(door) {
        return Err(DoorError::NotAdjacent(door));
    }
    if tile.is_occupied() {
        return Err(DoorError::Occupied(door));
    }
    if action_points == 0 {
        return Err(DoorError::NoActionPoints(actor.to_owned()));
    }

    let tile = state
        .grid_mut()
        .tile_mut(door)
        .ok_or(DoorError::NotADoor(door))?;
    tile.is_open = !tile.is_open;
    let is_open = tile.is_open;

    let player = state
        .player_mut(actor)
        .ok_or_else(|| DoorError::UnknownPlayer(actor.to_owned()))?;
    player.spend_action();

    Ok(DoorOutcome {
        tile: door,
        is_open,
        action_points_left: player.action_points,
    })
}
