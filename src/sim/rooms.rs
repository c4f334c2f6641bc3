/// The dungeon: a fixed grid of rooms, generated once at world load.
///
/// Each room owns its tile grid; the dungeon resolves world-coordinate
/// queries (solidity, tile mutation) through the owning room. Layout is a
/// pure function of (seed, room id): rooms are carved with a per-room PCG
/// stream, and door gaps between neighbours come from a per-wall stream so
/// both sides always agree.
///
/// Checkpoints are registered in room-id order, so checkpoint ids are
/// stable across runs of the same seed.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::domain::physics::dist_sq;
use crate::domain::player::ARTIFACT_COUNT;
use crate::domain::tile::{Tile, TILE_PX};
use crate::gfx::palette;
use crate::gfx::primitives::draw_circle;
use crate::gfx::surface::{Rect, Surface};

pub const ROOMS_X: usize = 8;
pub const ROOMS_Y: usize = 8;
pub const ROOM_COUNT: usize = ROOMS_X * ROOMS_Y;

/// Room size in tiles.
pub const ROOM_W: usize = 24;
pub const ROOM_H: usize = 18;

pub const ROOM_PX_W: i32 = ROOM_W as i32 * TILE_PX;
pub const ROOM_PX_H: i32 = ROOM_H as i32 * TILE_PX;
pub const WORLD_PX_W: i32 = ROOMS_X as i32 * ROOM_PX_W;
pub const WORLD_PX_H: i32 = ROOMS_Y as i32 * ROOM_PX_H;

/// Half-width of the door gap and of the clear lanes leading to it.
const DOOR_HALF: i32 = 1;

#[derive(Clone, Copy, Debug)]
pub struct Checkpoint {
    pub id: usize,
    /// World pixels, tile center.
    pub x: i32,
    pub y: i32,
}

pub struct Room {
    pub id: usize,
    pub rx: usize,
    pub ry: usize,
    tiles: Vec<Tile>,
    pub visited: bool,
    /// Artifact id sitting on this room's pedestal, if any.
    pub artifact: Option<usize>,
}

impl Room {
    fn blank(id: usize, rx: usize, ry: usize) -> Self {
        Room {
            id,
            rx,
            ry,
            tiles: vec![Tile::Floor; ROOM_W * ROOM_H],
            visited: false,
            artifact: None,
        }
    }

    pub fn tile(&self, lx: usize, ly: usize) -> Tile {
        if lx < ROOM_W && ly < ROOM_H {
            self.tiles[ly * ROOM_W + lx]
        } else {
            Tile::Wall
        }
    }

    /// Tile-mutation hook: collectible consumption and triggers go
    /// through here. Out-of-range writes are ignored.
    pub fn set_tile(&mut self, lx: usize, ly: usize, tile: Tile) {
        if lx < ROOM_W && ly < ROOM_H {
            self.tiles[ly * ROOM_W + lx] = tile;
        }
    }

    /// World-pixel origin of this room.
    pub fn origin_px(&self) -> (i32, i32) {
        (self.rx as i32 * ROOM_PX_W, self.ry as i32 * ROOM_PX_H)
    }
}

pub struct Dungeon {
    rooms: Vec<Room>,
    checkpoints: Vec<Checkpoint>,
}

// ── Generation ──

impl Dungeon {
    pub fn generate(seed: u64) -> Dungeon {
        let mut rooms: Vec<Room> = (0..ROOM_COUNT)
            .map(|id| {
                let (rx, ry) = (id % ROOMS_X, id / ROOMS_X);
                let mut room = Room::blank(id, rx, ry);
                carve_room(&mut room, seed);
                room
            })
            .collect();

        punch_doors(&mut rooms, seed);

        // Checkpoints after doors so lanes stay clear; ids ascend with room id.
        let mut checkpoints = Vec::new();
        for room in rooms.iter_mut() {
            let mut rng = room_rng(seed, room.id, 0xC4);
            let wanted = room.id == 0 || rng.gen_ratio(1, 4);
            if wanted {
                let lx = ROOM_W / 2;
                let ly = ROOM_H / 2;
                room.set_tile(lx, ly, Tile::Checkpoint);
                let (ox, oy) = room.origin_px();
                checkpoints.push(Checkpoint {
                    id: checkpoints.len(),
                    x: ox + lx as i32 * TILE_PX + TILE_PX / 2,
                    y: oy + ly as i32 * TILE_PX + TILE_PX / 2,
                });
            }
        }

        place_artifacts(&mut rooms, seed);

        Dungeon { rooms, checkpoints }
    }
}

fn room_rng(seed: u64, id: usize, salt: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed ^ (id as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ salt)
}

/// Is (lx, ly) on one of the cross lanes that lead to the door gaps?
fn on_door_lane(lx: usize, ly: usize) -> bool {
    let cx = ROOM_W as i32 / 2;
    let cy = ROOM_H as i32 / 2;
    (lx as i32 - cx).abs() <= DOOR_HALF || (ly as i32 - cy).abs() <= DOOR_HALF
}

fn carve_room(room: &mut Room, seed: u64) {
    // Boundary walls.
    for lx in 0..ROOM_W {
        room.set_tile(lx, 0, Tile::Wall);
        room.set_tile(lx, ROOM_H - 1, Tile::Wall);
    }
    for ly in 0..ROOM_H {
        room.set_tile(0, ly, Tile::Wall);
        room.set_tile(ROOM_W - 1, ly, Tile::Wall);
    }

    let mut rng = room_rng(seed, room.id, 0x01);

    // Interior pillars, off the door lanes.
    let pillars = rng.gen_range(2..6);
    for _ in 0..pillars {
        let lx = rng.gen_range(2..ROOM_W - 2);
        let ly = rng.gen_range(2..ROOM_H - 2);
        if !on_door_lane(lx, ly) {
            room.set_tile(lx, ly, Tile::Pillar);
        }
    }

    // Rift patches: 2x2-ish hazard pools.
    if room.id != 0 && rng.gen_ratio(2, 5) {
        let lx = rng.gen_range(2..ROOM_W - 4);
        let ly = rng.gen_range(2..ROOM_H - 4);
        for dy in 0..2 {
            for dx in 0..3 {
                let (px, py) = (lx + dx, ly + dy);
                if !on_door_lane(px, py) && room.tile(px, py) == Tile::Floor {
                    room.set_tile(px, py, Tile::Rift);
                }
            }
        }
    }

    // Gems on open floor.
    let gems = rng.gen_range(3..8);
    for _ in 0..gems {
        let lx = rng.gen_range(1..ROOM_W - 1);
        let ly = rng.gen_range(1..ROOM_H - 1);
        if room.tile(lx, ly) == Tile::Floor {
            room.set_tile(lx, ly, Tile::Gem);
        }
    }
}

/// Punch door gaps through the shared walls of neighbouring rooms.
/// The gap position comes from a per-wall stream so both rooms agree.
fn punch_doors(rooms: &mut [Room], seed: u64) {
    for ry in 0..ROOMS_Y {
        for rx in 0..ROOMS_X {
            let id = ry * ROOMS_X + rx;

            if rx + 1 < ROOMS_X {
                let mut rng = room_rng(seed, id, 0xD0);
                let gap = ROOM_H / 2 + rng.gen_range(0..3) - 1;
                for dy in -DOOR_HALF..=DOOR_HALF {
                    let ly = (gap as i32 + dy) as usize;
                    rooms[id].set_tile(ROOM_W - 1, ly, Tile::Door);
                    rooms[id + 1].set_tile(0, ly, Tile::Door);
                }
            }

            if ry + 1 < ROOMS_Y {
                let mut rng = room_rng(seed, id, 0xD1);
                let gap = ROOM_W / 2 + rng.gen_range(0..3) - 1;
                for dx in -DOOR_HALF..=DOOR_HALF {
                    let lx = (gap as i32 + dx) as usize;
                    rooms[id].set_tile(lx, ROOM_H - 1, Tile::Door);
                    rooms[id + ROOMS_X].set_tile(lx, 0, Tile::Door);
                }
            }
        }
    }
}

/// Scatter the artifact pedestals over distinct rooms (never the start
/// room). Artifact ids ascend with room id so they are seed-stable.
fn place_artifacts(rooms: &mut [Room], seed: u64) {
    let mut rng = Pcg32::seed_from_u64(seed ^ 0xA27F);
    let mut chosen: Vec<usize> = Vec::with_capacity(ARTIFACT_COUNT);
    while chosen.len() < ARTIFACT_COUNT {
        let id = rng.gen_range(1..ROOM_COUNT);
        if !chosen.contains(&id) {
            chosen.push(id);
        }
    }
    chosen.sort_unstable();

    for (artifact, &id) in chosen.iter().enumerate() {
        let room = &mut rooms[id];
        let lx = ROOM_W / 2 + 3;
        let ly = ROOM_H / 2 - 3;
        room.set_tile(lx, ly, Tile::Pedestal);
        room.artifact = Some(artifact);
    }
}

// ── Queries ──

impl Dungeon {
    /// Room by id. An out-of-range id is a programming error.
    pub fn room(&self, id: usize) -> &Room {
        assert!(id < self.rooms.len(), "room id {} out of range", id);
        &self.rooms[id]
    }

    pub fn room_mut(&mut self, id: usize) -> &mut Room {
        assert!(id < self.rooms.len(), "room id {} out of range", id);
        &mut self.rooms[id]
    }

    /// Which room owns this world-pixel position? Clamped at the edges.
    pub fn room_id_at_px(x: i32, y: i32) -> usize {
        let rx = (x.clamp(0, WORLD_PX_W - 1) / ROOM_PX_W) as usize;
        let ry = (y.clamp(0, WORLD_PX_H - 1) / ROOM_PX_H) as usize;
        ry * ROOMS_X + rx
    }

    /// Tile at world tile coordinates. Outside the world is wall.
    pub fn tile_at(&self, tx: i32, ty: i32) -> Tile {
        if tx < 0 || ty < 0 {
            return Tile::Wall;
        }
        let (tx, ty) = (tx as usize, ty as usize);
        if tx >= ROOMS_X * ROOM_W || ty >= ROOMS_Y * ROOM_H {
            return Tile::Wall;
        }
        let room = &self.rooms[(ty / ROOM_H) * ROOMS_X + tx / ROOM_W];
        room.tile(tx % ROOM_W, ty % ROOM_H)
    }

    pub fn solid_at_px(&self, x: i32, y: i32) -> bool {
        self.tile_at(x.div_euclid(TILE_PX), y.div_euclid(TILE_PX)).is_solid()
    }

    /// Tile-mutation hook at world tile coordinates.
    pub fn set_tile_at(&mut self, tx: i32, ty: i32, tile: Tile) {
        if tx < 0 || ty < 0 {
            return;
        }
        let (tx, ty) = (tx as usize, ty as usize);
        if tx >= ROOMS_X * ROOM_W || ty >= ROOMS_Y * ROOM_H {
            return;
        }
        let room = &mut self.rooms[(ty / ROOM_H) * ROOMS_X + tx / ROOM_W];
        room.set_tile(tx % ROOM_W, ty % ROOM_H, tile);
    }

    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    /// Nearest checkpoint by Euclidean distance; exact ties go to the
    /// lowest id (strict comparison over an id-ordered scan).
    pub fn nearest_checkpoint(&self, x: i32, y: i32) -> usize {
        nearest_of(&self.checkpoints, x, y)
    }

    /// Where a fresh session starts: the start room's checkpoint.
    pub fn spawn(&self) -> Checkpoint {
        self.checkpoints[0]
    }

    pub fn visited_rooms(&self) -> Vec<usize> {
        self.rooms.iter().filter(|r| r.visited).map(|r| r.id).collect()
    }
}

fn nearest_of(checkpoints: &[Checkpoint], x: i32, y: i32) -> usize {
    assert!(!checkpoints.is_empty(), "no checkpoints registered");
    let mut best = 0;
    let mut best_d = i64::MAX;
    for cp in checkpoints {
        let d = dist_sq(cp.x, cp.y, x, y);
        if d < best_d {
            best_d = d;
            best = cp.id;
        }
    }
    best
}

// ── Rendering ──

/// Distance (pixels) per fog dimming step.
const FOG_STEP_PX: i64 = 56;

impl Dungeon {
    /// Render the tile window visible through `surface` with the camera at
    /// (off_x, off_y) world pixels. Two independent masks, fixed order:
    /// hide-unvisited blanks whole rooms first, then fog-of-war dims what
    /// remains by distance from the player.
    pub fn draw_level(
        &self,
        surface: &mut Surface,
        off_x: i32,
        off_y: i32,
        hide_unvisited: bool,
        fog_of_war: bool,
        player_px: (i32, i32),
    ) {
        surface.fill(None, palette::BG);

        let tx0 = off_x.div_euclid(TILE_PX);
        let ty0 = off_y.div_euclid(TILE_PX);
        let tx1 = (off_x + surface.width() as i32 - 1).div_euclid(TILE_PX);
        let ty1 = (off_y + surface.height() as i32 - 1).div_euclid(TILE_PX);

        for ty in ty0..=ty1 {
            for tx in tx0..=tx1 {
                let sx = tx * TILE_PX - off_x;
                let sy = ty * TILE_PX - off_y;
                let wx = tx * TILE_PX;
                let wy = ty * TILE_PX;

                if wx < 0 || wy < 0 || wx >= WORLD_PX_W || wy >= WORLD_PX_H {
                    continue;
                }

                if hide_unvisited {
                    let room = &self.rooms[Dungeon::room_id_at_px(wx, wy)];
                    if !room.visited {
                        continue;
                    }
                }

                let tile = self.tile_at(tx, ty);
                let mut color = tile_color(tile);
                if fog_of_war {
                    let d = dist_sq(
                        wx + TILE_PX / 2,
                        wy + TILE_PX / 2,
                        player_px.0,
                        player_px.1,
                    );
                    let steps = ((d as f64).sqrt() as i64 / FOG_STEP_PX) as u8;
                    color = palette::dim(color, steps);
                }

                surface.fill(Some(Rect::new(sx, sy, TILE_PX as u32, TILE_PX as u32)), color);
                draw_tile_marker(surface, tile, sx, sy, color);
            }
        }
    }
}

fn tile_color(tile: Tile) -> u8 {
    match tile {
        Tile::Floor      => palette::ramp(palette::RAMP_GRAY, 3),
        Tile::Wall       => palette::ramp(palette::RAMP_GRAY, 11),
        Tile::Pillar     => palette::ramp(palette::RAMP_SLATE, 9),
        Tile::Door       => palette::ramp(palette::RAMP_BROWN, 8),
        Tile::Rift       => palette::ramp(palette::RAMP_RED, 7),
        Tile::Gem        => palette::ramp(palette::RAMP_GRAY, 3),
        Tile::Pedestal   => palette::ramp(palette::RAMP_GRAY, 4),
        Tile::Checkpoint => palette::ramp(palette::RAMP_GRAY, 4),
    }
}

/// Inset markers for tiles that are more than a flat fill.
fn draw_tile_marker(surface: &mut Surface, tile: Tile, sx: i32, sy: i32, base: u8) {
    match tile {
        Tile::Gem => {
            surface.fill(
                Some(Rect::new(sx + 6, sy + 6, 4, 4)),
                palette::ramp(palette::RAMP_CYAN, 13),
            );
        }
        Tile::Pedestal => {
            surface.fill(
                Some(Rect::new(sx + 4, sy + 4, 8, 8)),
                palette::ramp(palette::RAMP_MAGENTA, 12),
            );
        }
        Tile::Checkpoint => {
            draw_circle(
                surface,
                sx + TILE_PX / 2,
                sy + TILE_PX / 2,
                6,
                palette::ramp(palette::RAMP_GREEN, 13),
            );
        }
        Tile::Rift => {
            surface.fill(Some(Rect::new(sx + 2, sy + 2, 12, 12)), base.saturating_sub(2));
        }
        _ => {}
    }
}
