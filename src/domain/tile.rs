/// Tile types and their properties.
/// Properties are queried via methods, not stored as flags,
/// so tile semantics are centralized here.

/// Edge length of one tile, world pixels.
pub const TILE_PX: i32 = 16;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tile {
    Floor,
    Wall,     // Solid, room boundary
    Pillar,   // Solid, interior obstacle
    Door,     // Passage punched through a boundary wall
    Rift,     // Passable hazard, drains hp on contact
    Gem,      // Pickup, feeds lives_part
    Pedestal, // Artifact pedestal, pickup
    Checkpoint,
}

impl Tile {
    /// Does this tile block player movement?
    pub fn is_solid(self) -> bool {
        matches!(self, Tile::Wall | Tile::Pillar)
    }

    /// Can the player occupy this cell?
    pub fn is_passable(self) -> bool {
        !self.is_solid()
    }

    /// Does standing on this tile drain hp?
    pub fn is_hazard(self) -> bool {
        matches!(self, Tile::Rift)
    }

    /// Is this a pickup that is consumed on contact?
    #[allow(dead_code)]
    pub fn is_pickup(self) -> bool {
        matches!(self, Tile::Gem | Tile::Pedestal)
    }

    /// Stable numeric code, used by the solidity lookup table.
    pub fn code(self) -> u8 {
        match self {
            Tile::Floor      => 0,
            Tile::Wall       => 1,
            Tile::Pillar     => 2,
            Tile::Door       => 3,
            Tile::Rift       => 4,
            Tile::Gem        => 5,
            Tile::Pedestal   => 6,
            Tile::Checkpoint => 7,
        }
    }

    pub fn from_code(code: u8) -> Option<Tile> {
        match code {
            0 => Some(Tile::Floor),
            1 => Some(Tile::Wall),
            2 => Some(Tile::Pillar),
            3 => Some(Tile::Door),
            4 => Some(Tile::Rift),
            5 => Some(Tile::Gem),
            6 => Some(Tile::Pedestal),
            7 => Some(Tile::Checkpoint),
            _ => None,
        }
    }
}

/// Solidity by raw tile code. Unknown codes are treated as walls,
/// so a corrupted grid can never be walked through.
#[allow(dead_code)]
pub fn is_solid(code: u8) -> bool {
    match Tile::from_code(code) {
        Some(t) => t.is_solid(),
        None => true,
    }
}

impl Default for Tile {
    fn default() -> Self {
        Tile::Floor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solidity_table() {
        let cases = [
            (Tile::Floor, false),
            (Tile::Wall, true),
            (Tile::Pillar, true),
            (Tile::Door, false),
            (Tile::Rift, false),
            (Tile::Gem, false),
            (Tile::Pedestal, false),
            (Tile::Checkpoint, false),
        ];
        for (tile, solid) in cases {
            assert_eq!(tile.is_solid(), solid, "{:?}", tile);
            assert_eq!(is_solid(tile.code()), solid, "{:?} via code", tile);
            assert_eq!(tile.is_passable(), !solid, "{:?}", tile);
        }
    }

    #[test]
    fn codes_round_trip() {
        for code in 0..=7u8 {
            let tile = Tile::from_code(code).unwrap();
            assert_eq!(tile.code(), code);
        }
        assert_eq!(Tile::from_code(8), None);
    }

    #[test]
    fn unknown_code_is_solid() {
        assert!(is_solid(200));
    }

    #[test]
    fn only_rift_is_hazardous() {
        for code in 0..=7u8 {
            let tile = Tile::from_code(code).unwrap();
            assert_eq!(tile.is_hazard(), tile == Tile::Rift);
        }
    }
}
