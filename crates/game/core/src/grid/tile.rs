use core::fmt;
use core::str::FromStr;

/// Position of a tile on the grid.
///
/// The textual form is `tile-<row>-<col>`; it is only parsed when a snapshot is
/// loaded; after that the coordinates are carried explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId {
    pub row: usize,
    pub col: usize,
}

impl TileId {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Manhattan distance between two tiles.
    pub fn distance(self, other: TileId) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Returns true if `other` is one of the four orthogonal neighbours.
    pub fn is_adjacent(self, other: TileId) -> bool {
        self.distance(other) == 1
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tile-{}-{}", self.row, self.col)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid tile id `{0}`: expected tile-<row>-<col>")]
pub struct TileIdParseError(pub String);

impl FromStr for TileId {
    type Err = TileIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TileIdParseError(s.to_owned());
        let coords = s.strip_prefix("tile-").ok_or_else(invalid)?;
        let (row, col) = coords.split_once('-').ok_or_else(invalid)?;
        let row = row.parse().map_err(|_| invalid())?;
        let col = col.parse().map_err(|_| invalid())?;
        Ok(Self { row, col })
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for TileId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for TileId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = <std::string::String as serde::Deserialize>::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Terrain classes a tile can have.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerrainKind {
    Default,
    Ice,
    Water,
    Wall,
    Door,
}

/// Identifier of an item lying on a tile.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ItemId(pub String);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One cell of the grid.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    pub id: TileId,
    pub terrain: TerrainKind,
    /// Only meaningful for doors.
    pub is_open: bool,
    /// Name of the player standing on the tile.
    pub occupant: Option<String>,
    pub item: Option<ItemId>,
}

impl Tile {
    pub fn new(id: TileId, terrain: TerrainKind) -> Self {
        Self {
            id,
            terrain,
            is_open: false,
            occupant: None,
            item: None,
        }
    }

    pub fn with_open(mut self, is_open: bool) -> Self {
        self.is_open = is_open;
        self
    }

    pub fn with_item(mut self, item: ItemId) -> Self {
        self.item = Some(item);
        self
    }

    pub fn is_wall(&self) -> bool {
        self.terrain == TerrainKind::Wall
    }

    pub fn is_door(&self) -> bool {
        self.terrain == TerrainKind::Door
    }

    pub fn is_closed_door(&self) -> bool {
        self.is_door() && !self.is_open
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    pub fn is_occupied_by(&self, name: &str) -> bool {
        self.occupant.as_deref() == Some(name)
    }

    /// A tile a player could stand on right now.
    pub fn is_free(&self) -> bool {
        !self.is_wall() && !self.is_closed_door() && !self.is_occupied()
    }
}
