use super::PathError;
use super::reachable::reachable_tiles;
use crate::grid::{MovementCostTable, TileId};
use crate::state::GameState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveKind {
    Attack,
    Item,
    Step,
}

/// A candidate action for a player, as consumed by decision heuristics.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Move {
    pub target_tile: TileId,
    pub kind: MoveKind,
    /// Whether the player can act on the target this turn.
    pub in_range: bool,
    /// Left unset here; filled in by whoever ranks the candidates.
    pub score: Option<i32>,
}

impl Move {
    fn new(target_tile: TileId, kind: MoveKind, in_range: bool) -> Self {
        Self {
            target_tile,
            kind,
            in_range,
            score: None,
        }
    }
}

/// Every step, item pickup and attack open to `player` given its remaining
/// movement points.
///
/// Players that are not on the board (abandoned, or unknown names) produce no
/// candidates and are never attack targets.
pub fn candidate_moves(
    state: &GameState,
    player: &str,
    costs: &MovementCostTable,
) -> Result<Vec<Move>, PathError> {
    let grid = state.grid();
    let (Some(actor), Some(start)) = (state.player(player), state.position_of(player)) else {
        return Ok(Vec::new());
    };
    let reachable = reachable_tiles(grid, start, actor.movement_points, costs)?;

    let mut moves: Vec<Move> = reachable
        .iter()
        .filter(|&&id| id != start)
        .map(|&id| Move::new(id, MoveKind::Step, true))
        .collect();

    for tile in grid.tiles().filter(|tile| tile.item.is_some()) {
        moves.push(Move::new(
            tile.id,
            MoveKind::Item,
            reachable.contains(&tile.id),
        ));
    }

    for other in state.players().iter().filter(|other| other.name != player) {
        let Some(position) = state.position_of(&other.name) else {
            continue;
        };
        let in_range = position.is_adjacent(start)
            || grid
                .neighbors(position)
                .iter()
                .any(|neighbor| reachable.contains(neighbor));
        moves.push(Move::new(position, MoveKind::Attack, in_range));
    }

    Ok(moves)
}
