/// Software rasterizer: circles, arcs, lines, rectangles, bitmap text.
///
/// Every primitive writes palette indices straight into the destination
/// surface and allocates nothing. Circle and arc sweeps use a step count
/// proportional to the radius (angular step ∝ 1/r, floor of 24 steps),
/// so the dot density of the visible rings stays constant as they grow
/// and repeated draws are pixel-identical.

use std::f32::consts::TAU;

use rand::Rng;

use super::font::{glyph, GLYPH_H, GLYPH_W};
use super::surface::{Rect, Surface};

fn circle_steps(r: i32) -> i32 {
    (6 * r.max(0)).max(24)
}

/// Outline circle via fixed-density angular sweep.
pub fn draw_circle(surface: &mut Surface, cx: i32, cy: i32, r: i32, c: u8) {
    if r <= 0 {
        surface.put(cx, cy, c);
        return;
    }
    let steps = circle_steps(r);
    for i in 0..steps {
        let a = i as f32 / steps as f32 * TAU;
        let x = cx + (a.cos() * r as f32).round() as i32;
        let y = cy + (a.sin() * r as f32).round() as i32;
        surface.put(x, y, c);
    }
}

/// Annulus between radii r2..=r: one radial spoke per sweep step of the
/// outer radius. Used for the resonance-circuit ring.
pub fn draw_circle_ex(surface: &mut Surface, cx: i32, cy: i32, r: i32, r2: i32, c: u8) {
    let (outer, inner) = (r.max(r2), r.min(r2).max(0));
    if outer <= 0 {
        surface.put(cx, cy, c);
        return;
    }
    let steps = circle_steps(outer);
    for i in 0..steps {
        let a = i as f32 / steps as f32 * TAU;
        let (sin, cos) = a.sin_cos();
        let x1 = cx + (cos * inner as f32).round() as i32;
        let y1 = cy + (sin * inner as f32).round() as i32;
        let x2 = cx + (cos * outer as f32).round() as i32;
        let y2 = cy + (sin * outer as f32).round() as i32;
        thin_line(surface, x1, y1, x2, y2, c);
    }
}

/// Half-width of an arc segment, radians.
const ARC_HALF_SWEEP: f32 = 0.45;

/// Arc segment of radius r centered on direction `dir` (radians).
pub fn arc(surface: &mut Surface, cx: i32, cy: i32, r: i32, dir: f32, c: u8) {
    if r <= 0 {
        return;
    }
    // Same density rule as the full circle, scaled to the sweep.
    let steps = ((circle_steps(r) as f32 * ARC_HALF_SWEEP / TAU * 2.0) as i32).max(8);
    for i in 0..=steps {
        let a = dir - ARC_HALF_SWEEP + 2.0 * ARC_HALF_SWEEP * i as f32 / steps as f32;
        let x = cx + (a.cos() * r as f32).round() as i32;
        let y = cy + (a.sin() * r as f32).round() as i32;
        surface.put(x, y, c);
    }
}

/// Uniform random direction in radians, for effect jitter.
pub fn random_dir() -> f32 {
    rand::thread_rng().gen_range(0.0..TAU)
}

/// Single-pixel Bresenham line.
pub fn thin_line(surface: &mut Surface, x1: i32, y1: i32, x2: i32, y2: i32, c: u8) {
    let dx = (x2 - x1).abs();
    let dy = -(y2 - y1).abs();
    let sx = if x1 < x2 { 1 } else { -1 };
    let sy = if y1 < y2 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x1, y1);
    loop {
        surface.put(x, y, c);
        if x == x2 && y == y2 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Filled rectangle.
pub fn draw_rect(surface: &mut Surface, x: i32, y: i32, w: u32, h: u32, c: u8) {
    surface.fill(Some(Rect::new(x, y, w, h)), c);
}

/// One font glyph; background bits are left untouched.
pub fn draw_char(surface: &mut Surface, x: i32, y: i32, ch: char, c: u8) {
    let rows = glyph(ch);
    for (row, &bits) in rows.iter().enumerate() {
        for col in 0..GLYPH_W {
            if bits & (0x80u8 >> col) != 0 {
                surface.put(x + col, y + row as i32, c);
            }
        }
    }
}

/// Text with the cursor advancing by the fixed glyph width.
pub fn draw_text(surface: &mut Surface, x: i32, y: i32, text: &str, c: u8) {
    draw_text_ex(surface, x, y, text, c, 0);
}

/// Text with extra letter spacing, for titles and off-screen composition.
pub fn draw_text_ex(surface: &mut Surface, x: i32, y: i32, text: &str, c: u8, spacing: i32) {
    let mut cur_x = x;
    for ch in text.chars() {
        draw_char(surface, cur_x, y, ch, c);
        cur_x += GLYPH_W + spacing;
    }
}

/// Pixel width of a rendered string.
pub fn text_width(text: &str) -> i32 {
    text.chars().count() as i32 * GLYPH_W
}

#[allow(dead_code)]
pub const TEXT_HEIGHT: i32 = GLYPH_H;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::physics::dist;

    #[test]
    fn thin_line_hits_both_endpoints() {
        let mut s = Surface::new(16, 16);
        thin_line(&mut s, 1, 2, 12, 9, 5);
        assert_eq!(s.pixel(1, 2), 5);
        assert_eq!(s.pixel(12, 9), 5);
    }

    #[test]
    fn horizontal_line_is_exact() {
        let mut s = Surface::new(16, 4);
        thin_line(&mut s, 2, 1, 9, 1, 3);
        for x in 2..=9 {
            assert_eq!(s.pixel(x, 1), 3);
        }
        assert_eq!(s.pixel(1, 1), 0);
        assert_eq!(s.pixel(10, 1), 0);
    }

    #[test]
    fn circle_pixels_sit_on_the_radius() {
        let mut s = Surface::new(64, 64);
        draw_circle(&mut s, 32, 32, 10, 9);
        let mut hits = 0;
        for y in 0..64 {
            for x in 0..64 {
                if s.pixel(x, y) == 9 {
                    let d = dist(x, y, 32, 32);
                    assert!((d - 10.0).abs() < 1.5, "stray pixel at ({}, {})", x, y);
                    hits += 1;
                }
            }
        }
        assert!(hits >= 24);
    }

    #[test]
    fn circle_draws_are_deterministic() {
        let mut a = Surface::new(48, 48);
        let mut b = Surface::new(48, 48);
        draw_circle(&mut a, 24, 24, 15, 7);
        draw_circle(&mut b, 24, 24, 15, 7);
        assert_eq!(a.pixels(), b.pixels());
    }

    #[test]
    fn annulus_fills_between_radii() {
        let mut s = Surface::new(64, 64);
        draw_circle_ex(&mut s, 32, 32, 12, 8, 4);
        for y in 0..64 {
            for x in 0..64 {
                if s.pixel(x, y) == 4 {
                    let d = dist(x, y, 32, 32);
                    assert!(d > 6.5 && d < 13.5, "pixel off the ring at ({}, {})", x, y);
                }
            }
        }
        // The inner disc stays clear.
        assert_eq!(s.pixel(32, 32), 0);
    }

    #[test]
    fn arc_stays_near_its_direction() {
        let mut s = Surface::new(64, 64);
        // Pointing right: all lit pixels should be in the +x half.
        arc(&mut s, 32, 32, 14, 0.0, 6);
        for y in 0..64 {
            for x in 0..64 {
                if s.pixel(x, y) == 6 {
                    assert!(x > 32 + 7, "arc pixel strayed to ({}, {})", x, y);
                }
            }
        }
    }

    #[test]
    fn random_dir_is_in_range() {
        for _ in 0..64 {
            let d = random_dir();
            assert!((0.0..TAU).contains(&d));
        }
    }

    #[test]
    fn text_advances_by_glyph_width() {
        let mut s = Surface::new(40, 10);
        draw_text(&mut s, 0, 0, "II", 2);
        // 'I' has its stem around x=3..5; the second one 8 px later.
        assert_eq!(s.pixel(3, 1), 2);
        assert_eq!(s.pixel(11, 1), 2);
        assert_eq!(text_width("II"), 16);
    }

    #[test]
    fn text_spacing_spreads_glyphs() {
        let mut s = Surface::new(40, 10);
        draw_text_ex(&mut s, 0, 0, "II", 2, 4);
        assert_eq!(s.pixel(3, 1), 2);
        assert_eq!(s.pixel(15, 1), 2);
        assert_eq!(s.pixel(11, 1), 0);
    }

    #[test]
    fn rect_is_filled_and_bounded() {
        let mut s = Surface::new(10, 10);
        draw_rect(&mut s, 2, 3, 4, 2, 8);
        assert_eq!(s.pixel(2, 3), 8);
        assert_eq!(s.pixel(5, 4), 8);
        assert_eq!(s.pixel(6, 4), 0);
        assert_eq!(s.pixel(2, 5), 0);
    }
}
