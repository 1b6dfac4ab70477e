use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub const fn new(y: i32, x: i32) -> Self {
        Self { y, x }
    }

    pub fn offset(self, dy: i32, dx: i32) -> Self {
        Self { y: self.y + dy, x: self.x + dx }
    }

    pub fn manhattan(self, other: Pos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// 4-connected neighbours in up, right, down, left order.
    pub fn neighbors(self) -> [Pos; 4] {
        [
            Pos { y: self.y - 1, x: self.x },
            Pos { y: self.y, x: self.x + 1 },
            Pos { y: self.y + 1, x: self.x },
            Pos { y: self.y, x: self.x - 1 },
        ]
    }
}

/// The fixed player entry cell of every generated grid.
pub const START_POS: Pos = Pos { y: 1, x: 1 };

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tile {
    Empty,
    Wall,
    SecretWall,
    Start,
    Treasure,
    Hammer,
    MapBasic,
    MapAdvanced,
    MapLegendary,
    Key1,
    Key2,
    Key3,
    Door1,
    Door2,
    Door3,
}

impl Tile {
    pub const ALL: [Tile; 15] = [
        Tile::Empty,
        Tile::Wall,
        Tile::SecretWall,
        Tile::Start,
        Tile::Treasure,
        Tile::Hammer,
        Tile::MapBasic,
        Tile::MapAdvanced,
        Tile::MapLegendary,
        Tile::Key1,
        Tile::Key2,
        Tile::Key3,
        Tile::Door1,
        Tile::Door2,
        Tile::Door3,
    ];

    /// Numeric code understood by the editor and level files.
    pub fn code(self) -> u8 {
        match self {
            Tile::Empty => 0,
            Tile::Wall => 1,
            Tile::SecretWall => 2,
            Tile::Start => 3,
            Tile::Treasure => 4,
            Tile::Hammer => 5,
            Tile::MapBasic => 6,
            Tile::Key1 => 7,
            Tile::Key2 => 8,
            Tile::Key3 => 9,
            Tile::Door1 => 10,
            Tile::Door2 => 11,
            Tile::Door3 => 12,
            Tile::MapAdvanced => 13,
            Tile::MapLegendary => 14,
        }
    }

    pub fn from_code(code: u8) -> Option<Tile> {
        Tile::ALL.into_iter().find(|tile| tile.code() == code)
    }

    pub fn glyph(self) -> char {
        match self {
            Tile::Empty => '.',
            Tile::Wall => '#',
            Tile::SecretWall => 'S',
            Tile::Start => 'P',
            Tile::Treasure => '$',
            Tile::Hammer => 'T',
            Tile::MapBasic => 'm',
            Tile::MapAdvanced => 'M',
            Tile::MapLegendary => 'L',
            Tile::Key1 => 'a',
            Tile::Key2 => 'b',
            Tile::Key3 => 'c',
            Tile::Door1 => 'A',
            Tile::Door2 => 'B',
            Tile::Door3 => 'C',
        }
    }

    pub fn from_glyph(glyph: char) -> Option<Tile> {
        Tile::ALL.into_iter().find(|tile| tile.glyph() == glyph)
    }

    pub fn door_tier(self) -> Option<LockTier> {
        match self {
            Tile::Door1 => Some(LockTier::First),
            Tile::Door2 => Some(LockTier::Second),
            Tile::Door3 => Some(LockTier::Third),
            _ => None,
        }
    }

    pub fn key_tier(self) -> Option<LockTier> {
        match self {
            Tile::Key1 => Some(LockTier::First),
            Tile::Key2 => Some(LockTier::Second),
            Tile::Key3 => Some(LockTier::Third),
            _ => None,
        }
    }

    pub fn map_tier(self) -> Option<MapTier> {
        match self {
            Tile::MapBasic => Some(MapTier::Basic),
            Tile::MapAdvanced => Some(MapTier::Advanced),
            Tile::MapLegendary => Some(MapTier::Legendary),
            _ => None,
        }
    }

    pub fn is_door(self) -> bool {
        self.door_tier().is_some()
    }

    /// Cells a player can stand on without any key or tool.
    pub fn is_base_walkable(self) -> bool {
        match self {
            Tile::Empty
            | Tile::Start
            | Tile::Hammer
            | Tile::Treasure
            | Tile::Key1
            | Tile::Key2
            | Tile::Key3
            | Tile::MapBasic
            | Tile::MapAdvanced
            | Tile::MapLegendary => true,
            Tile::Wall | Tile::SecretWall | Tile::Door1 | Tile::Door2 | Tile::Door3 => false,
        }
    }
}

/// Door/key pairing level. `Door_i` opens only with `Key_i`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LockTier {
    First,
    Second,
    Third,
}

impl LockTier {
    pub const ALL: [LockTier; 3] = [LockTier::First, LockTier::Second, LockTier::Third];

    pub fn from_index(index: usize) -> Option<LockTier> {
        LockTier::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        match self {
            LockTier::First => 0,
            LockTier::Second => 1,
            LockTier::Third => 2,
        }
    }

    pub fn door(self) -> Tile {
        match self {
            LockTier::First => Tile::Door1,
            LockTier::Second => Tile::Door2,
            LockTier::Third => Tile::Door3,
        }
    }

    pub fn key(self) -> Tile {
        match self {
            LockTier::First => Tile::Key1,
            LockTier::Second => Tile::Key2,
            LockTier::Third => Tile::Key3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MapTier {
    Basic,
    Advanced,
    Legendary,
}

impl MapTier {
    /// Placement priority order.
    pub const ALL: [MapTier; 3] = [MapTier::Basic, MapTier::Advanced, MapTier::Legendary];

    pub fn tile(self) -> Tile {
        match self {
            MapTier::Basic => Tile::MapBasic,
            MapTier::Advanced => Tile::MapAdvanced,
            MapTier::Legendary => Tile::MapLegendary,
        }
    }

    /// Which distance band (near, mid, far) the map is hidden in.
    pub(crate) fn band(self) -> usize {
        match self {
            MapTier::Basic => 0,
            MapTier::Advanced => 1,
            MapTier::Legendary => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_unique_and_round_trip() {
        for tile in Tile::ALL {
            assert_eq!(Tile::from_code(tile.code()), Some(tile));
            assert_eq!(Tile::from_glyph(tile.glyph()), Some(tile));
        }
        assert_eq!(Tile::from_code(15), None);
        assert_eq!(Tile::from_glyph('?'), None);
    }

    #[test]
    fn doors_and_keys_pair_by_tier() {
        for tier in LockTier::ALL {
            assert_eq!(tier.door().door_tier(), Some(tier));
            assert_eq!(tier.key().key_tier(), Some(tier));
            assert_eq!(tier.door().key_tier(), None);
            assert!(tier.key().is_base_walkable());
            assert!(!tier.door().is_base_walkable());
        }
    }

    #[test]
    fn walls_and_secret_walls_are_never_base_walkable() {
        assert!(!Tile::Wall.is_base_walkable());
        assert!(!Tile::SecretWall.is_base_walkable());
        assert!(Tile::Start.is_base_walkable());
    }
}
