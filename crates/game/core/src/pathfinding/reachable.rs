use std::collections::{BTreeSet, HashMap, VecDeque};

use super::PathError;
use crate::grid::{Grid, MovementCost, MovementCostTable, TileId};

/// Tiles a player standing on `start` can reach spending at most `budget`
/// movement points.
///
/// The search is breadth-first over the remaining budget rather than hop
/// count. A tile is (re-)expanded only when it is reached with strictly more
/// budget left than on any earlier visit, which keeps zero-cost terrain from
/// looping and bounds the search. Occupied tiles are impassable.
///
/// Returns an empty set when `start` is off the grid, a wall or a closed door.
pub fn reachable_tiles(
    grid: &Grid,
    start: TileId,
    budget: u32,
    costs: &MovementCostTable,
) -> Result<BTreeSet<TileId>, PathError> {
    let mut reachable = BTreeSet::new();
    let Some(start_tile) = grid.tile(start) else {
        return Ok(reachable);
    };
    if start_tile.is_wall() || start_tile.is_closed_door() {
        return Ok(reachable);
    }

    reachable.insert(start);
    if budget == 0 {
        return Ok(reachable);
    }

    let mut best_remaining: HashMap<TileId, u32> = HashMap::from([(start, budget)]);
    let mut frontier = VecDeque::from([(start, budget)]);

    while let Some((current, remaining)) = frontier.pop_front() {
        // A better visit was recorded after this entry was queued
        if best_remaining.get(&current).is_some_and(|&best| best > remaining) {
            continue;
        }

        for neighbor in grid.neighbors(current) {
            let Some(tile) = grid.tile(neighbor) else {
                continue;
            };
            let MovementCost::Finite(cost) = costs.tile_cost(tile)? else {
                continue;
            };
            if tile.is_occupied() {
                continue;
            }
            let Some(left) = remaining.checked_sub(cost) else {
                continue;
            };
            if best_remaining
                .get(&neighbor)
                .is_some_and(|&previous| left <= previous)
            {
                continue;
            }

            best_remaining.insert(neighbor, left);
            reachable.insert(neighbor);
            frontier.push_back((neighbor, left));
        }
    }

    Ok(reachable)
}
