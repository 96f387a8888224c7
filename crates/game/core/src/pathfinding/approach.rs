use ::pathfinding::prelude::bfs_reach;

use super::PathError;
use super::dijkstra::{path_cost, quickest_free_path};
use crate::grid::{Grid, MovementCost, MovementCostTable, TileId};

/// Farthest unoccupied tile on the free path from `start` toward `goal` that
/// fits in `budget`.
///
/// The goal itself may hold a player (walking up to an enemy); it is then
/// never returned. Yields `start` when no step is affordable and `None` when
/// no route exists.
pub fn find_closest_reachable_tile(
    grid: &Grid,
    start: TileId,
    goal: TileId,
    budget: u32,
    costs: &MovementCostTable,
) -> Result<Option<TileId>, PathError> {
    let Some(path) = quickest_free_path(grid, start, goal, costs, true)? else {
        return Ok(None);
    };

    let mut spent: u32 = 0;
    let mut farthest = start;
    for &id in path.iter().skip(1) {
        let Some(tile) = grid.tile(id) else {
            break;
        };
        let MovementCost::Finite(cost) = costs.tile_cost(tile)? else {
            break;
        };
        spent = spent.saturating_add(cost);
        if spent > budget {
            break;
        }
        if !tile.is_occupied() {
            farthest = id;
        }
    }
    Ok(Some(farthest))
}

/// Where to move to end up next to `target`.
///
/// Already adjacent means staying put. Otherwise the free orthogonal neighbor
/// of `target` with the cheapest free path is chosen (ties go to the lower
/// [`TileId`]) and the approach stops wherever the budget runs out.
pub fn find_best_move_tile(
    grid: &Grid,
    start: TileId,
    target: TileId,
    budget: u32,
    costs: &MovementCostTable,
) -> Result<Option<TileId>, PathError> {
    if !grid.contains(start) || !grid.contains(target) {
        return Ok(None);
    }
    if start.is_adjacent(target) {
        return Ok(Some(start));
    }

    let mut best: Option<(u32, TileId)> = None;
    for neighbor in grid.neighbors(target) {
        if !grid.tile(neighbor).is_some_and(|tile| tile.is_free()) {
            continue;
        }
        let Some(path) = quickest_free_path(grid, start, neighbor, costs, false)? else {
            continue;
        };
        let cost = path_cost(grid, &path, costs)?;
        if best.is_none_or(|current| (cost, neighbor) < current) {
            best = Some((cost, neighbor));
        }
    }

    match best {
        Some((_, tile)) => find_closest_reachable_tile(grid, start, tile, budget, costs),
        None => Ok(None),
    }
}

/// Closest tile to `origin`, by orthogonal steps, that a player could stand on:
/// not a wall, not a closed door and unoccupied. `origin` itself qualifies.
///
/// The search walks through occupied tiles but never through walls or closed
/// doors, so the result is always connected to `origin`.
pub fn find_nearest_free_tile(grid: &Grid, origin: TileId) -> Option<TileId> {
    if !grid.contains(origin) {
        return None;
    }

    let walkable = |id: &TileId| {
        grid.tile(*id).is_some_and(|tile| !tile.is_wall() && !tile.is_closed_door())
    };
    bfs_reach(origin, |&current| grid.neighbors(current).into_iter().filter(walkable))
        .find(|&id| grid.tile(id).is_some_and(|tile| tile.is_free()))
}
