/// Synthesized sprite surfaces.
///
/// The core treats sprites as read-only borrowed surfaces supplied by an
/// asset source; this one draws them programmatically at startup instead
/// of decoding files. Index 0 is the color key everywhere, so blits
/// composite over the room.

use crate::domain::player::{Facing, PLAYER_H, PLAYER_W};
use crate::gfx::palette;
use crate::gfx::primitives::thin_line;
use crate::gfx::surface::{Rect, Surface};

pub struct Assets {
    player: Vec<Surface>,
    pub artifact: Surface,
}

impl Assets {
    pub fn build() -> Assets {
        let mut player = Vec::with_capacity(8);
        for facing in [Facing::Up, Facing::Down, Facing::Left, Facing::Right] {
            for frame in 0..2 {
                player.push(player_sprite(facing, frame));
            }
        }
        Assets {
            player,
            artifact: artifact_sprite(),
        }
    }

    pub fn player_sprite(&self, facing: Facing, frame: u8) -> &Surface {
        let f = match facing {
            Facing::Up => 0,
            Facing::Down => 1,
            Facing::Left => 2,
            Facing::Right => 3,
        };
        &self.player[f * 2 + (frame % 2) as usize]
    }
}

fn player_sprite(facing: Facing, frame: u8) -> Surface {
    let mut s = Surface::new(PLAYER_W as u32, PLAYER_H as u32);
    s.set_color_key(0);

    let robe = palette::ramp(palette::RAMP_AZURE, 9);
    let robe_dark = palette::ramp(palette::RAMP_AZURE, 5);
    let skin = palette::ramp(palette::RAMP_PINK, 12);

    // Robe body with a darker hem.
    s.fill(Some(Rect::new(2, 4, 6, 8)), robe);
    s.fill(Some(Rect::new(2, 10, 6, 2)), robe_dark);

    // Head.
    s.fill(Some(Rect::new(3, 1, 4, 4)), skin);

    // Eyes mark the facing; none are visible from behind.
    let eye = palette::UI_WHITE;
    match facing {
        Facing::Down => {
            s.put(4, 2, eye);
            s.put(6, 2, eye);
        }
        Facing::Left => s.put(3, 2, eye),
        Facing::Right => s.put(6, 2, eye),
        Facing::Up => {}
    }

    // Feet alternate with the walk frame.
    let boot = palette::ramp(palette::RAMP_SLATE, 4);
    if frame == 0 {
        s.fill(Some(Rect::new(2, 12, 2, 2)), boot);
        s.fill(Some(Rect::new(6, 12, 2, 2)), boot);
    } else {
        s.fill(Some(Rect::new(3, 12, 2, 2)), boot);
        s.fill(Some(Rect::new(5, 12, 2, 2)), boot);
    }

    s
}

fn artifact_sprite() -> Surface {
    let mut s = Surface::new(16, 16);
    s.set_color_key(0);
    let bright = palette::ramp(palette::RAMP_MAGENTA, 13);
    let dark = palette::ramp(palette::RAMP_MAGENTA, 7);
    // Diamond outline with a lit core.
    thin_line(&mut s, 8, 1, 14, 8, bright);
    thin_line(&mut s, 14, 8, 8, 14, dark);
    thin_line(&mut s, 8, 14, 1, 8, dark);
    thin_line(&mut s, 1, 8, 8, 1, bright);
    s.fill(Some(Rect::new(6, 6, 4, 4)), bright);
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sprites_carry_the_color_key() {
        let assets = Assets::build();
        for facing in [Facing::Up, Facing::Down, Facing::Left, Facing::Right] {
            let sprite = assets.player_sprite(facing, 0);
            assert_eq!(sprite.color_key(), Some(0));
            assert_eq!(sprite.width(), PLAYER_W as u32);
            assert_eq!(sprite.height(), PLAYER_H as u32);
            // Corners stay transparent.
            assert_eq!(sprite.pixel(0, 0), 0);
        }
        assert_eq!(assets.artifact.color_key(), Some(0));
    }

    #[test]
    fn walk_frames_differ() {
        let assets = Assets::build();
        let a = assets.player_sprite(Facing::Down, 0);
        let b = assets.player_sprite(Facing::Down, 1);
        assert_ne!(a.pixels(), b.pixels());
    }
}
