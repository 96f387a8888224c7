use arrayvec::ArrayVec;
use ::pathfinding::prelude::dijkstra;

use super::PathError;
use crate::grid::{Grid, MovementCost, MovementCostTable, TileId};

/// How the search treats tiles that hold a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Occupancy {
    /// Pure terrain cost; occupants are ignored.
    Ignore,
    /// Occupied tiles are impassable, except the target when `allow_target`.
    Avoid { allow_target: bool },
}

/// Lowest-cost path from `start` to `target`, both included.
///
/// Terrain cost only: a target or intermediate tile held by another player is
/// still reachable. Callers that move a player should use
/// [`quickest_free_path`] instead.
///
/// Returns `None` when an endpoint is off the grid, the target is a wall or a
/// closed door, or no route exists.
pub fn quickest_path(
    grid: &Grid,
    start: TileId,
    target: TileId,
    costs: &MovementCostTable,
) -> Result<Option<Vec<TileId>>, PathError> {
    search(grid, start, target, costs, Occupancy::Ignore)
}

/// Like [`quickest_path`] but routes around occupied tiles.
///
/// With `allow_occupied_target` the target itself may hold a player, which is
/// what "walk up to that enemy" queries need.
pub fn quickest_free_path(
    grid: &Grid,
    start: TileId,
    target: TileId,
    costs: &MovementCostTable,
    allow_occupied_target: bool,
) -> Result<Option<Vec<TileId>>, PathError> {
    search(
        grid,
        start,
        target,
        costs,
        Occupancy::Avoid {
            allow_target: allow_occupied_target,
        },
    )
}

/// Total cost of walking `path`, excluding the tile it starts on.
///
/// A path through a tile that is off the grid or impassable saturates to
/// `u32::MAX`.
pub fn path_cost(grid: &Grid, path: &[TileId], costs: &MovementCostTable) -> Result<u32, PathError> {
    let mut total: u32 = 0;
    for &id in path.iter().skip(1) {
        let Some(tile) = grid.tile(id) else {
            return Ok(u32::MAX);
        };
        match costs.tile_cost(tile)? {
            MovementCost::Finite(cost) => total = total.saturating_add(cost),
            MovementCost::Impassable => return Ok(u32::MAX),
        }
    }
    Ok(total)
}

fn search(
    grid: &Grid,
    start: TileId,
    target: TileId,
    costs: &MovementCostTable,
    occupancy: Occupancy,
) -> Result<Option<Vec<TileId>>, PathError> {
    let (Some(_), Some(target_tile)) = (grid.tile(start), grid.tile(target)) else {
        return Ok(None);
    };
    if target_tile.is_wall() || target_tile.is_closed_door() {
        return Ok(None);
    }
    if start == target {
        return Ok(Some(vec![start]));
    }

    let passable_occupant = |id: TileId| match occupancy {
        Occupancy::Ignore => true,
        Occupancy::Avoid { allow_target } => allow_target && id == target,
    };

    // The first unknown terrain met while expanding aborts the search.
    let mut failure: Option<PathError> = None;
    let found = dijkstra(
        &start,
        |&current| {
            let mut steps: ArrayVec<(TileId, u32), 4> = ArrayVec::new();
            if failure.is_some() {
                return steps;
            }
            for neighbor in grid.neighbors(current) {
                let Some(tile) = grid.tile(neighbor) else {
                    continue;
                };
                let step = match costs.tile_cost(tile) {
                    Ok(MovementCost::Finite(step)) => step,
                    Ok(MovementCost::Impassable) => continue,
                    Err(err) => {
                        failure = Some(err);
                        return ArrayVec::new();
                    }
                };
                if tile.is_occupied() && !passable_occupant(neighbor) {
                    continue;
                }
                steps.push((neighbor, step));
            }
            steps
        },
        |&current| current == target,
    );

    if let Some(err) = failure {
        return Err(err);
    }
    Ok(found.map(|(path, _)| path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TerrainKind::{self, Default as D, Door, Ice, Wall, Water};

    fn grid(rows: Vec<Vec<TerrainKind>>) -> Grid {
        Grid::from_terrain(rows).unwrap()
    }

    fn t(row: usize, col: usize) -> TileId {
        TileId::new(row, col)
    }

    #[test]
    fn water_line_costs_three() {
        let costs = MovementCostTable::default();
        let grid = grid(vec![vec![D, Water, D]]);

        let path = quickest_path(&grid, t(0, 0), t(0, 2), &costs).unwrap().unwrap();
        assert_eq!(path, vec![t(0, 0), t(0, 1), t(0, 2)]);
        assert_eq!(path_cost(&grid, &path, &costs).unwrap(), 3);
    }

    #[test]
    fn prefers_cheaper_detour_over_fewer_hops() {
        let costs = MovementCostTable::default();
        let grid = grid(vec![vec![D, Water, D], vec![D, Ice, D]]);

        let path = quickest_path(&grid, t(0, 0), t(0, 2), &costs).unwrap().unwrap();
        assert_eq!(path_cost(&grid, &path, &costs).unwrap(), 3);
        assert!(path.contains(&t(1, 1)) || path.contains(&t(0, 1)));

        let grid = self::grid(vec![vec![D, Water, Water, D], vec![D, Ice, Ice, D]]);
        let path = quickest_path(&grid, t(0, 0), t(0, 3), &costs).unwrap().unwrap();
        assert_eq!(path, vec![t(0, 0), t(1, 0), t(1, 1), t(1, 2), t(1, 3), t(0, 3)]);
        assert_eq!(path_cost(&grid, &path, &costs).unwrap(), 3);
    }

    #[test]
    fn closed_door_blocks_routing_and_targeting() {
        let costs = MovementCostTable::default();
        let mut grid = grid(vec![vec![D, Door, D]]);

        assert_eq!(quickest_path(&grid, t(0, 0), t(0, 2), &costs).unwrap(), None);
        assert_eq!(quickest_path(&grid, t(0, 0), t(0, 1), &costs).unwrap(), None);

        grid.tile_mut(t(0, 1)).unwrap().is_open = true;
        let path = quickest_path(&grid, t(0, 0), t(0, 2), &costs).unwrap().unwrap();
        assert_eq!(path_cost(&grid, &path, &costs).unwrap(), 2);
    }

    #[test]
    fn walls_and_missing_endpoints_yield_none() {
        let costs = MovementCostTable::default();
        let grid = grid(vec![vec![D, Wall, D]]);

        assert_eq!(quickest_path(&grid, t(0, 0), t(0, 1), &costs).unwrap(), None);
        assert_eq!(quickest_path(&grid, t(0, 0), t(0, 2), &costs).unwrap(), None);
        assert_eq!(quickest_path(&grid, t(3, 3), t(0, 0), &costs).unwrap(), None);
        assert_eq!(quickest_path(&grid, t(0, 0), t(3, 3), &costs).unwrap(), None);
    }

    #[test]
    fn occupied_target_is_reachable_geometrically() {
        let costs = MovementCostTable::default();
        let mut grid = grid(vec![vec![D, D, D]]);
        grid.place_occupant(t(0, 0), "alice").unwrap();
        grid.place_occupant(t(0, 1), "bob").unwrap();

        let path = quickest_path(&grid, t(0, 0), t(0, 2), &costs).unwrap();
        assert_eq!(path, Some(vec![t(0, 0), t(0, 1), t(0, 2)]));

        assert_eq!(
            quickest_free_path(&grid, t(0, 0), t(0, 2), &costs, false).unwrap(),
            None
        );
        assert_eq!(
            quickest_free_path(&grid, t(0, 0), t(0, 1), &costs, true).unwrap(),
            Some(vec![t(0, 0), t(0, 1)])
        );
    }

    #[test]
    fn unknown_terrain_on_the_way_is_fatal() {
        let costs = MovementCostTable::default().without(TerrainKind::Water);
        let grid = grid(vec![vec![D, Water, D]]);

        let err = quickest_path(&grid, t(0, 0), t(0, 2), &costs).unwrap_err();
        assert_eq!(err, PathError::UnknownTerrain(TerrainKind::Water));
        let err = quickest_free_path(&grid, t(0, 0), t(0, 2), &costs, false).unwrap_err();
        assert_eq!(err, PathError::UnknownTerrain(TerrainKind::Water));
    }

    #[test]
    fn start_equals_target() {
        let costs = MovementCostTable::default();
        let grid = grid(vec![vec![Water]]);
        let path = quickest_path(&grid, t(0, 0), t(0, 0), &costs).unwrap().unwrap();
        assert_eq!(path, vec![t(0, 0)]);
        assert_eq!(path_cost(&grid, &path, &costs).unwrap(), 0);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let costs = MovementCostTable::default();
        let grid = grid(vec![vec![D, D, D], vec![D, D, D], vec![D, D, D]]);
        let first = quickest_path(&grid, t(0, 0), t(2, 2), &costs).unwrap();
        let second = quickest_path(&grid, t(0, 0), t(2, 2), &costs).unwrap();
        assert_eq!(first, second);
    }
}
