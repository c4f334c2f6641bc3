/// Movement and proximity primitives.
///
/// Collision is axis-separated: the X component of a move is resolved
/// first, then the Y component. Diagonal contact with an L-shaped corner
/// therefore slides along one wall instead of stopping dead. Each axis
/// advances one pixel at a time, so no velocity can tunnel through a
/// one-tile wall.
///
/// Solidity is queried through a closure over world-pixel coordinates;
/// the room model supplies it. Physics itself holds no state.

use crate::domain::player::{PLAYER_H, PLAYER_W};

/// Euclidean distance between two world-pixel points. Used for both
/// checkpoint lookup and effect range checks.
pub fn dist(x1: i32, y1: i32, x2: i32, y2: i32) -> f32 {
    let dx = (x1 - x2) as f32;
    let dy = (y1 - y2) as f32;
    (dx * dx + dy * dy).sqrt()
}

/// Squared distance, exact in integers. Preferred for comparisons.
pub fn dist_sq(x1: i32, y1: i32, x2: i32, y2: i32) -> i64 {
    let dx = (x1 - x2) as i64;
    let dy = (y1 - y2) as i64;
    dx * dx + dy * dy
}

/// Is the player collision box at (x, y) free of solid tiles?
///
/// The box is smaller than a tile, so sampling the corners and edge
/// midpoints covers every tile the box can overlap.
pub fn box_free<F>(solid_px: &F, x: i32, y: i32) -> bool
where
    F: Fn(i32, i32) -> bool,
{
    let xs = [x, x + PLAYER_W / 2, x + PLAYER_W - 1];
    let ys = [y, y + PLAYER_H / 2, y + PLAYER_H - 1];
    for &sx in &xs {
        for &sy in &ys {
            if solid_px(sx, sy) {
                return false;
            }
        }
    }
    true
}

/// Move the box by (dx, dy), X axis first, one pixel per sub-step.
/// Returns the resolved position.
pub fn slide<F>(solid_px: &F, x: i32, y: i32, dx: i32, dy: i32) -> (i32, i32)
where
    F: Fn(i32, i32) -> bool,
{
    let mut px = x;
    let mut py = y;

    let step_x = dx.signum();
    for _ in 0..dx.abs() {
        if box_free(solid_px, px + step_x, py) {
            px += step_x;
        } else {
            break;
        }
    }

    let step_y = dy.signum();
    for _ in 0..dy.abs() {
        if box_free(solid_px, px, py + step_y) {
            py += step_y;
        } else {
            break;
        }
    }

    (px, py)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tile::TILE_PX;

    /// Build a solidity closure from an ASCII grid ('#' = solid tile).
    fn grid(rows: &'static [&'static str]) -> impl Fn(i32, i32) -> bool {
        move |px: i32, py: i32| {
            if px < 0 || py < 0 {
                return true;
            }
            let tx = (px / TILE_PX) as usize;
            let ty = (py / TILE_PX) as usize;
            match rows.get(ty).and_then(|r| r.as_bytes().get(tx)).copied() {
                Some(b'#') => true,
                Some(_) => false,
                None => true,
            }
        }
    }

    #[test]
    fn dist_is_euclidean() {
        assert_eq!(dist(0, 0, 3, 4), 5.0);
        assert_eq!(dist(10, 10, 10, 10), 0.0);
        assert_eq!(dist_sq(0, 0, 3, 4), 25);
    }

    #[test]
    fn free_space_moves_full_distance() {
        let g = grid(&["....", "....", "....", "...."]);
        assert_eq!(slide(&g, 20, 20, 5, 7), (25, 27));
    }

    #[test]
    fn wall_stops_one_axis_only() {
        // Wall column at tile x=2; moving right+down should slide down.
        let g = grid(&["..#.", "..#.", "..#.", "...."]);
        let (nx, ny) = slide(&g, 18, 18, 20, 8);
        assert_eq!(nx, 32 - PLAYER_W); // flush against the wall
        assert_eq!(ny, 26); // full vertical distance
    }

    #[test]
    fn l_corner_slides_instead_of_stopping() {
        // Vertical wall with a return at the bottom: moving diagonally
        // into it pins X against the wall while Y keeps advancing.
        let g = grid(&[
            "......",
            "...#..",
            "...#..",
            "......",
            "...###",
        ]);
        let (nx, ny) = slide(&g, 36, 20, 6, 6);
        assert_eq!(nx, 48 - PLAYER_W);
        assert_eq!(ny, 26);
    }

    #[test]
    fn high_velocity_never_tunnels() {
        // One-tile-thick wall at tile x=3.
        let g = grid(&["...#....", "...#....", "...#...."]);
        for v in [1, 7, 16, 17, 33, 100] {
            let (nx, _) = slide(&g, 4, 4, v, 0);
            assert!(nx + PLAYER_W <= 48, "velocity {} tunneled to {}", v, nx);
        }
    }

    #[test]
    fn out_of_bounds_is_solid() {
        let g = grid(&["....", "....", "....", "...."]);
        let (nx, ny) = slide(&g, 2, 2, -10, -10);
        assert_eq!((nx, ny), (0, 0));
    }
}
