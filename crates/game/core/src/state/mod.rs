//! Authoritative state of one match: the grid plus its players.
//!
//! Positions are never stored on [`Player`]; the grid's occupant names are the
//! only record of where someone stands.

mod error;

use std::collections::HashSet;

pub use error::InitializationError;

use crate::grid::{Grid, TileId};
use crate::player::Player;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    grid: Grid,
    players: Vec<Player>,
}

impl GameState {
    pub const MIN_PLAYERS: usize = 2;

    /// Validates that players and grid agree before a match starts.
    pub fn new(grid: Grid, players: Vec<Player>) -> Result<Self, InitializationError> {
        if players.len() < Self::MIN_PLAYERS {
            return Err(InitializationError::NotEnoughPlayers(players.len()));
        }

        let mut names = HashSet::with_capacity(players.len());
        for player in &players {
            if !names.insert(player.name.as_str()) {
                return Err(InitializationError::DuplicatePlayer(player.name.clone()));
            }
            if !player.hp.is_valid() {
                return Err(InitializationError::InvalidHealth(player.name.clone()));
            }
            match grid.tile(player.spawn) {
                Some(tile) if !tile.is_wall() => {}
                _ => {
                    return Err(InitializationError::InvalidSpawn {
                        player: player.name.clone(),
                        spawn: player.spawn,
                    });
                }
            }
        }

        let mut placed = HashSet::with_capacity(players.len());
        for tile in grid.tiles() {
            let Some(occupant) = tile.occupant.as_deref() else {
                continue;
            };
            if !names.contains(occupant) {
                return Err(InitializationError::UnknownOccupant {
                    tile: tile.id,
                    occupant: occupant.to_owned(),
                });
            }
            if !placed.insert(occupant) {
                return Err(InitializationError::PlayerPlacedTwice(occupant.to_owned()));
            }
        }
        if let Some(missing) = players.iter().find(|p| !placed.contains(p.name.as_str())) {
            return Err(InitializationError::PlayerNotPlaced(missing.name.clone()));
        }

        Ok(Self { grid, players })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|player| player.name == name)
    }

    pub fn player_mut(&mut self, name: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|player| player.name == name)
    }

    /// Mutable access to two distinct players at once.
    pub fn pair_mut(&mut self, first: &str, second: &str) -> Option<(&mut Player, &mut Player)> {
        if first == second {
            return None;
        }
        let a = self.players.iter().position(|p| p.name == first)?;
        let b = self.players.iter().position(|p| p.name == second)?;
        if a < b {
            let (left, right) = self.players.split_at_mut(b);
            Some((&mut left[a], &mut right[0]))
        } else {
            let (left, right) = self.players.split_at_mut(a);
            Some((&mut right[0], &mut left[b]))
        }
    }

    pub fn position_of(&self, name: &str) -> Option<TileId> {
        self.grid.position_of(name)
    }

    /// Takes a player's piece off the board, e.g. after they abandon.
    pub fn remove_from_board(&mut self, name: &str) -> Option<TileId> {
        let tile = self.grid.position_of(name)?;
        self.grid.remove_occupant(tile, name).ok()?;
        Some(tile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TerrainKind;

    fn board() -> Grid {
        let mut grid = Grid::from_terrain(vec![
            vec![TerrainKind::Default, TerrainKind::Default, TerrainKind::Wall],
            vec![TerrainKind::Ice, TerrainKind::Default, TerrainKind::Default],
        ])
        .unwrap();
        grid.place_occupant(TileId::new(0, 0), "alice").unwrap();
        grid.place_occupant(TileId::new(1, 2), "bob").unwrap();
        grid
    }

    fn players() -> Vec<Player> {
        vec![
            Player::new("alice", TileId::new(0, 0)),
            Player::new("bob", TileId::new(1, 2)),
        ]
    }

    #[test]
    fn accepts_consistent_state() {
        let state = GameState::new(board(), players()).unwrap();
        assert_eq!(state.position_of("bob"), Some(TileId::new(1, 2)));
        assert_eq!(state.players().len(), 2);
    }

    #[test]
    fn rejects_duplicate_names() {
        let mut players = players();
        players[1].name = "alice".into();
        let err = GameState::new(board(), players).unwrap_err();
        assert_eq!(err, InitializationError::DuplicatePlayer("alice".into()));
    }

    #[test]
    fn rejects_unplaced_and_unknown_players() {
        let mut grid = board();
        grid.remove_occupant(TileId::new(1, 2), "bob").unwrap();
        let err = GameState::new(grid, players()).unwrap_err();
        assert_eq!(err, InitializationError::PlayerNotPlaced("bob".into()));

        let mut grid = board();
        grid.place_occupant(TileId::new(1, 0), "carol").unwrap();
        let err = GameState::new(grid, players()).unwrap_err();
        assert!(matches!(err, InitializationError::UnknownOccupant { .. }));
    }

    #[test]
    fn rejects_wall_spawn() {
        let mut players = players();
        players[0].spawn = TileId::new(0, 2);
        let err = GameState::new(board(), players).unwrap_err();
        assert!(matches!(err, InitializationError::InvalidSpawn { .. }));
    }

    #[test]
    fn pair_mut_returns_both_in_call_order() {
        let mut state = GameState::new(board(), players()).unwrap();
        let (bob, alice) = state.pair_mut("bob", "alice").unwrap();
        assert_eq!(bob.name, "bob");
        assert_eq!(alice.name, "alice");
        assert!(state.pair_mut("bob", "bob").is_none());
    }

    #[test]
    fn remove_from_board_frees_the_tile() {
        let mut state = GameState::new(board(), players()).unwrap();
        assert_eq!(state.remove_from_board("alice"), Some(TileId::new(0, 0)));
        assert_eq!(state.position_of("alice"), None);
        assert_eq!(state.remove_from_board("alice"), None);
    }
}
