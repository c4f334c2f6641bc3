/// GameSession: the complete state of a running game.
///
/// One session owns exactly one player, the dungeon, and the meta phase.
/// There are no hidden globals; the frame loop passes the session down
/// by reference.
///
/// ## Camera
///
/// The scroll offset is always derived from the player position clamped
/// to the current room's pixel bounds. It is a view, recomputed on
/// demand and never stored.

use crate::config::{GameConfig, RulesConfig};
use crate::domain::player::{Player, PLAYER_H, PLAYER_W};
use crate::sim::rooms::{Dungeon, ROOM_PX_H, ROOM_PX_W};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Title,
    Playing,
    GameOver,
}

pub struct GameSession {
    pub dungeon: Dungeon,
    pub player: Player,
    pub rules: RulesConfig,
    pub phase: Phase,
    pub paused: bool,
    pub tick: u64,
    pub has_save: bool,
}

impl GameSession {
    pub fn new(config: &GameConfig) -> GameSession {
        let dungeon = Dungeon::generate(config.world.seed);
        let spawn = dungeon.spawn();
        let mut player = Player::new(
            spawn.x - PLAYER_W / 2,
            spawn.y - PLAYER_H / 2,
            &config.rules,
        );
        player.room = 0;
        player.bind_checkpoint(player.x, player.y);

        let mut session = GameSession {
            dungeon,
            player,
            rules: config.rules.clone(),
            phase: Phase::Title,
            paused: false,
            tick: 0,
            has_save: false,
        };
        session.dungeon.room_mut(0).visited = true;
        session
    }

    /// Reset to a fresh run, keeping the generated dungeon layout.
    pub fn start_new_game(&mut self, config: &GameConfig) {
        self.dungeon = Dungeon::generate(config.world.seed);
        let spawn = self.dungeon.spawn();
        let training = self.player.training;
        self.player = Player::new(spawn.x - PLAYER_W / 2, spawn.y - PLAYER_H / 2, &config.rules);
        self.player.bind_checkpoint(self.player.x, self.player.y);
        self.player.training = training;
        self.dungeon.room_mut(0).visited = true;
        self.tick = 0;
        self.paused = false;
        self.phase = Phase::Playing;
    }

    /// Camera offset for a viewport of the given size: follow the player,
    /// clamp to the current room, center rooms smaller than the view.
    pub fn scroll(&self, view_w: u32, view_h: u32) -> (i32, i32) {
        let (px, py) = self.player.center();
        let room = self.dungeon.room(self.player.room);
        let (ox, oy) = room.origin_px();
        (
            axis_scroll(px, ox, ROOM_PX_W, view_w as i32),
            axis_scroll(py, oy, ROOM_PX_H, view_h as i32),
        )
    }

    /// Track which room the player is in. On a boundary crossing the
    /// outgoing room id lands in `prv_room` before `room` updates, and
    /// the entry position is recorded for transition rendering.
    /// Returns the new room id when a transition happened.
    pub fn update_room_tracking(&mut self) -> Option<usize> {
        let (px, py) = self.player.center();
        let here = Dungeon::room_id_at_px(px, py);
        if here == self.player.room {
            return None;
        }
        self.player.prv_room = self.player.room;
        self.player.room = here;
        self.player.enter_room_x = self.player.x;
        self.player.enter_room_y = self.player.y;
        self.dungeon.room_mut(here).visited = true;
        Some(here)
    }
}

fn axis_scroll(center: i32, room_origin: i32, room_len: i32, view_len: i32) -> i32 {
    if room_len <= view_len {
        room_origin - (view_len - room_len) / 2
    } else {
        (center - view_len / 2).clamp(room_origin, room_origin + room_len - view_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config as config;
    use crate::sim::rooms::ROOMS_X;

    #[test]
    fn scroll_follows_then_clamps() {
        let cfg = config();
        let mut s = GameSession::new(&cfg);
        let room = s.dungeon.room(s.player.room);
        let (ox, oy) = room.origin_px();

        // Player in the middle of the room: camera centered on them.
        s.player.x = ox + ROOM_PX_W / 2;
        s.player.y = oy + ROOM_PX_H / 2;
        let (sx, sy) = s.scroll(240, 160);
        let (px, py) = s.player.center();
        assert_eq!(sx, px - 120);
        assert_eq!(sy, py - 80);

        // Player hugging the room's top-left corner: clamped to the room.
        s.player.x = ox + 1;
        s.player.y = oy + 1;
        assert_eq!(s.scroll(240, 160), (ox, oy));

        // Bottom-right corner clamps to the far edge.
        s.player.x = ox + ROOM_PX_W - PLAYER_W - 1;
        s.player.y = oy + ROOM_PX_H - PLAYER_H - 1;
        let (sx, sy) = s.scroll(240, 160);
        assert_eq!(sx, ox + ROOM_PX_W - 240);
        assert_eq!(sy, oy + ROOM_PX_H - 160);
    }

    #[test]
    fn oversized_view_centers_the_room() {
        let cfg = config();
        let s = GameSession::new(&cfg);
        let (ox, oy) = s.dungeon.room(0).origin_px();
        let (sx, sy) = s.scroll(ROOM_PX_W as u32 + 100, ROOM_PX_H as u32 + 50);
        assert_eq!(sx, ox - 50);
        assert_eq!(sy, oy - 25);
    }

    #[test]
    fn room_transition_records_previous_room() {
        let cfg = config();
        let mut s = GameSession::new(&cfg);
        assert_eq!(s.update_room_tracking(), None);

        // Teleport the player's center into the room to the right.
        s.player.x = ROOM_PX_W + 10;
        s.player.y = 10;
        let entered = s.update_room_tracking();
        assert_eq!(entered, Some(1));
        assert_eq!(s.player.room, 1);
        assert_eq!(s.player.prv_room, 0);
        assert_eq!(s.player.enter_room_x, s.player.x);
        assert!(s.dungeon.room(1).visited);

        // And down from there.
        s.player.y = ROOM_PX_H + 10;
        assert_eq!(s.update_room_tracking(), Some(ROOMS_X + 1));
        assert_eq!(s.player.prv_room, 1);
    }

    #[test]
    fn new_session_spawns_at_the_bound_checkpoint() {
        let cfg = config();
        let s = GameSession::new(&cfg);
        assert_eq!(s.player.room, 0);
        assert_eq!((s.player.checkpoint_x, s.player.checkpoint_y), (s.player.x, s.player.y));
        assert!(s.dungeon.room(0).visited);
        assert_eq!(s.phase, Phase::Title);
    }
}
