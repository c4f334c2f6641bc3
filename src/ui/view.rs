/// Frame composition: room, player, effects, HUD, menus.
///
/// The room viewport is composed into an off-screen surface and blitted
/// under the HUD strip, so the map pass can never smear into the HUD and
/// the transition fade can dim the whole viewport in one sweep.

use crate::config::VideoConfig;
use crate::domain::physics::dist;
use crate::domain::player::{LifeState, PLAYER_H, PLAYER_W};
use crate::gfx::palette;
use crate::gfx::primitives::{
    arc, draw_circle, draw_circle_ex, draw_rect, draw_text, draw_text_ex, random_dir, text_width,
};
use crate::gfx::screen::Screen;
use crate::gfx::surface::{blit, Surface};
use crate::sim::save::SavePart;
use crate::sim::world::{GameSession, Phase};
use crate::strings;

pub const SCREEN_W: u32 = 240;
pub const SCREEN_H: u32 = 176;
pub const HUD_H: i32 = 16;
pub const VIEW_W: u32 = SCREEN_W;
pub const VIEW_H: u32 = SCREEN_H - HUD_H as u32;

/// Pixel distance from the room entry point over which the cross-fade
/// from the previous room plays out.
const TRANSITION_PX: f32 = 24.0;

pub struct View {
    map: Surface,
    assets: super::assets::Assets,
}

impl View {
    pub fn new() -> View {
        View {
            map: Surface::new(VIEW_W, VIEW_H),
            assets: super::assets::Assets::build(),
        }
    }

    pub fn render(&mut self, session: &GameSession, video: &VideoConfig, screen: &mut Screen) {
        match session.phase {
            Phase::Title => self.render_title(session, screen),
            Phase::Playing | Phase::GameOver => self.render_world(session, video, screen),
        }

        if session.phase == Phase::GameOver {
            let surface = screen.surface_mut();
            center_text(surface, 70, strings::lookup("game_over"), palette::UI_RED);
            center_text(surface, 90, strings::lookup("game_over_retry"), palette::UI_LIGHT);
        }
    }

    // ── World ──

    fn render_world(&mut self, session: &GameSession, video: &VideoConfig, screen: &mut Screen) {
        let (sx, sy) = session.scroll(VIEW_W, VIEW_H);
        let p = &session.player;

        session.dungeon.draw_level(
            &mut self.map,
            sx,
            sy,
            video.hide_unvisited,
            video.fog_of_war,
            p.center(),
        );

        let px = p.x - sx;
        let py = p.y - sy;
        let (pcx, pcy) = (px + PLAYER_W / 2, py + PLAYER_H / 2);

        match p.life_state {
            LifeState::Dying => {
                // Death burst: an expanding ring over the corpse position.
                let total = session.rules.dying_ticks.max(1);
                let progress = (total - p.state_timer.min(total)) as i32;
                let r = 2 + progress * 24 / total as i32;
                draw_circle(&mut self.map, pcx, pcy, r, palette::ramp(palette::RAMP_RED, 13));
                draw_circle(&mut self.map, pcx, pcy, r / 2, palette::ramp(palette::RAMP_ORANGE, 12));
            }
            LifeState::Invulnerable if session.tick % 4 < 2 => {
                // Grace flicker: the sprite blinks at half rate.
            }
            _ => {
                let sprite = self.assets.player_sprite(p.facing, p.frame);
                blit(sprite, None, &mut self.map, px, py);
            }
        }

        // Resonance circuit: ring plus stray arcs, scaling with charge.
        if p.circuit_charge > 0 && p.alive() {
            let range = p.circuit_range();
            let shade = 8 + (session.tick % 6) as u8;
            draw_circle_ex(
                &mut self.map,
                pcx,
                pcy,
                range,
                range - 2,
                palette::ramp(palette::RAMP_VIOLET, shade),
            );
            for _ in 0..(p.circuit_charge / 8) {
                arc(
                    &mut self.map,
                    pcx,
                    pcy,
                    range - 4,
                    random_dir(),
                    palette::ramp(palette::RAMP_CYAN, 14),
                );
            }
        }

        // Cross-fade out of the previous room, driven by how far the
        // player has walked since the boundary crossing.
        if p.prv_room != p.room {
            let walked = dist(p.x, p.y, p.enter_room_x, p.enter_room_y);
            if walked < TRANSITION_PX {
                let steps = ((TRANSITION_PX - walked) / 4.0) as u8;
                for idx in self.map.pixels_mut() {
                    *idx = palette::dim(*idx, steps);
                }
            }
        }

        let surface = screen.surface_mut();
        blit(&self.map, None, surface, 0, HUD_H);
        self.draw_hud(session, surface);

        // Special message, centered under the HUD.
        let msg = strings::special_message(p.special_message);
        if !msg.is_empty() {
            center_text(surface, HUD_H + 10, msg, palette::UI_YELLOW);
        }

        if session.paused {
            center_text(surface, 80, strings::lookup("paused"), palette::UI_WHITE);
        }
    }

    // ── HUD ──

    fn draw_hud(&self, session: &GameSession, surface: &mut Surface) {
        let p = &session.player;
        draw_rect(surface, 0, 0, SCREEN_W, HUD_H as u32, palette::UI_DARK);

        // Hit points, one notch per point.
        for i in 0..p.max_hp {
            let c = if i < p.hp { palette::UI_RED } else { palette::ramp(palette::RAMP_RED, 2) };
            draw_rect(surface, 2 + i * 5, 2, 4, 5, c);
        }

        // Shield notches under the hp row; hollow while recovering.
        let capacity = session.rules.shield_capacity;
        for i in 0..capacity {
            let c = if i < p.shield_hp {
                palette::UI_CYAN
            } else {
                palette::ramp(palette::RAMP_CYAN, 2)
            };
            draw_rect(surface, 2 + i * 5, 9, 4, 4, c);
        }

        let lives = format!("*{}", p.lives);
        draw_text(surface, 120, 4, &lives, palette::UI_WHITE);
        let gems = format!("G{}", p.gems);
        draw_text(surface, 152, 4, &gems, palette::UI_CYAN);

        // Artifact tally.
        let found = p.artifacts.iter().filter(|&&a| a).count();
        blit(&self.assets.artifact, None, surface, 192, 0);
        draw_text(surface, 208, 4, &format!("{}", found), palette::UI_MAGENTA);

        if p.training {
            draw_text(surface, 224, 4, "T", palette::UI_ORANGE);
        }
    }

    // ── Menus ──

    fn render_title(&mut self, session: &GameSession, screen: &mut Screen) {
        let surface = screen.surface_mut();
        surface.fill(None, palette::BG);

        draw_circle_ex(surface, SCREEN_W as i32 / 2, 44, 64, 60, palette::ramp(palette::RAMP_VIOLET, 6));
        let title = strings::lookup("title");
        let w = title.chars().count() as i32 * 10 - 2;
        draw_text_ex(surface, (SCREEN_W as i32 - w) / 2, 36, title, palette::UI_MAGENTA, 2);

        center_text(surface, 84, strings::lookup("title_start"), palette::UI_WHITE);
        if session.has_save {
            center_text(surface, 98, strings::lookup("title_continue"), palette::UI_LIGHT);
        }
        center_text(surface, 112, strings::lookup("title_training"), palette::UI_MID);
        center_text(surface, 126, strings::lookup("title_quit"), palette::UI_MID);

        if session.player.training {
            center_text(surface, 146, "TRAINING ON - NO SAVING", palette::UI_ORANGE);
        }
    }

    /// Progress feedback for multi-part save/load, drawn over whatever
    /// frame is on screen. The caller presents.
    pub fn render_transfer(&self, screen: &mut Screen, saving: bool, part: SavePart, frac: f32) {
        let surface = screen.surface_mut();
        let label = strings::lookup(if saving { "saving" } else { "loading" });
        let part_no = match part {
            SavePart::Header => 1,
            SavePart::Progress => 2,
            SavePart::Map => 3,
        };

        let y = SCREEN_H as i32 - 24;
        draw_rect(surface, 40, y, SCREEN_W - 80, 18, palette::UI_DARK);
        draw_text(surface, 46, y + 2, &format!("{} {}/3", label, part_no), palette::UI_WHITE);
        let bar_w = (SCREEN_W - 92) as f32 * frac.clamp(0.0, 1.0);
        draw_rect(surface, 46, y + 12, bar_w as u32, 3, palette::UI_GREEN);
    }
}

fn center_text(surface: &mut Surface, y: i32, text: &str, color: u8) {
    let x = (surface.width() as i32 - text_width(text)) / 2;
    draw_text(surface, x, y, text, color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{test_config, BackendKind};
    use crate::gfx::palette::Palette;
    use crate::gfx::screen::DisplaySink;
    use std::io;

    struct NullSink;
    impl DisplaySink for NullSink {
        fn present_indexed(&mut self, _: &Surface, _: &Palette) -> io::Result<()> {
            Ok(())
        }
        fn present_rgba(&mut self, _: u32, _: u32, _: &[u8]) -> io::Result<()> {
            Ok(())
        }
    }

    fn screen() -> Screen {
        Screen::new(BackendKind::Native, SCREEN_W, SCREEN_H, Box::new(NullSink))
    }

    fn lit_pixels(s: &Surface) -> usize {
        s.pixels().iter().filter(|&&p| p != 0).count()
    }

    #[test]
    fn every_phase_renders_something() {
        let cfg = test_config();
        let mut session = GameSession::new(&cfg);
        let mut view = View::new();
        let mut screen = screen();

        for phase in [Phase::Title, Phase::Playing, Phase::GameOver] {
            session.phase = phase;
            screen.surface_mut().fill(None, 0);
            view.render(&session, &cfg.video, &mut screen);
            assert!(
                lit_pixels(screen.surface()) > 100,
                "{:?} rendered almost nothing",
                phase
            );
        }
    }

    #[test]
    fn hud_occupies_the_top_strip() {
        let cfg = test_config();
        let mut session = GameSession::new(&cfg);
        session.phase = Phase::Playing;
        let mut view = View::new();
        let mut screen = screen();
        view.render(&session, &cfg.video, &mut screen);
        // The HUD background fills row 0.
        assert_eq!(screen.surface().pixel(0, 0), palette::UI_DARK);
        assert_eq!(screen.surface().pixel(SCREEN_W as i32 - 1, 0), palette::UI_DARK);
    }

    #[test]
    fn transfer_bar_scales_with_progress() {
        let view = View::new();
        let mut screen = screen();
        view.render_transfer(&mut screen, true, SavePart::Progress, 0.0);
        let before = lit_pixels(screen.surface());
        view.render_transfer(&mut screen, true, SavePart::Progress, 1.0);
        assert!(lit_pixels(screen.surface()) > before);
    }
}
