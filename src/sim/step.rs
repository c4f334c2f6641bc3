/// The step function: advances the session by one tick.
///
/// Processing order:
///   1. Special-message countdown
///   2. Death sequence / respawn
///   3. Grace + shield recovery countdowns
///   4. Movement (axis-separated collision)
///   5. Room transition tracking
///   6. Tile contact (pickups, checkpoint binding)
///   7. Hazard damage
///   8. Circuit charge / release
///
/// The player can only be simulated while the session is in the Playing
/// phase; every other phase is handled by the meta loop in main.

use crate::domain::physics;
use crate::domain::player::{
    DamageOutcome, DeathOutcome, Facing, FrameInput, LifeState, K_DN, K_LT, K_RT, K_SP, K_UP,
    PLAYER_H, PLAYER_W,
};
use crate::domain::tile::{Tile, TILE_PX};
use crate::sim::rooms::{WORLD_PX_H, WORLD_PX_W};
use crate::strings;

use super::event::GameEvent;
use super::world::{GameSession, Phase};

pub fn step(session: &mut GameSession, input: FrameInput) -> Vec<GameEvent> {
    if session.phase != Phase::Playing {
        return vec![];
    }

    let mut events: Vec<GameEvent> = Vec::new();
    session.tick += 1;

    // Special-message countdown; the message clears at zero.
    if session.player.special_message_timer > 0 {
        session.player.special_message_timer -= 1;
        if session.player.special_message_timer == 0 {
            session.player.special_message = 0;
        }
    }

    match session.player.life_state {
        LifeState::Dying => {
            match session.player.advance_death(&session.rules) {
                DeathOutcome::StillDying => {}
                DeathOutcome::Respawned => {
                    // Respawn may land in another room than the death.
                    session.update_room_tracking();
                    events.push(GameEvent::PlayerRespawned);
                }
                DeathOutcome::GameOver => {
                    session.phase = Phase::GameOver;
                    events.push(GameEvent::GameOver);
                }
            }
            return events;
        }
        LifeState::AwaitingRespawn => return events,
        LifeState::Normal | LifeState::Invulnerable => {}
    }

    session.player.tick_grace();
    if session.player.tick_shield(&session.rules) {
        session
            .player
            .set_special_message(strings::MSG_SHIELD_RESTORED, &session.rules);
        events.push(GameEvent::ShieldRestored);
    }

    resolve_movement(session, &input);
    if let Some(id) = session.update_room_tracking() {
        events.push(GameEvent::RoomEntered { id });
    }
    resolve_tile_contact(session, &input, &mut events);
    resolve_hazard(session, &mut events);
    resolve_circuit(session, &input, &mut events);

    events
}

// ── Movement ──

fn resolve_movement(session: &mut GameSession, input: &FrameInput) {
    let mut dx = 0;
    let mut dy = 0;
    let speed = session.rules.player_speed;
    if input.held[K_LT] {
        dx -= speed;
    }
    if input.held[K_RT] {
        dx += speed;
    }
    if input.held[K_UP] {
        dy -= speed;
    }
    if input.held[K_DN] {
        dy += speed;
    }

    if dx == 0 && dy == 0 {
        return;
    }

    session.player.facing = if dx < 0 {
        Facing::Left
    } else if dx > 0 {
        Facing::Right
    } else if dy < 0 {
        Facing::Up
    } else {
        Facing::Down
    };

    let solid = |x: i32, y: i32| session.dungeon.solid_at_px(x, y);
    let (nx, ny) = physics::slide(&solid, session.player.x, session.player.y, dx, dy);
    session.player.x = nx.clamp(0, WORLD_PX_W - PLAYER_W);
    session.player.y = ny.clamp(0, WORLD_PX_H - PLAYER_H);
    session.player.frame = ((session.tick / 6) % 4) as u8;
}

// ── Tile contact ──

fn resolve_tile_contact(session: &mut GameSession, input: &FrameInput, events: &mut Vec<GameEvent>) {
    let (cx, cy) = session.player.center();
    let tx = cx.div_euclid(TILE_PX);
    let ty = cy.div_euclid(TILE_PX);

    match session.dungeon.tile_at(tx, ty) {
        Tile::Gem => {
            session.dungeon.set_tile_at(tx, ty, Tile::Floor);
            events.push(GameEvent::GemPicked { x: tx, y: ty });
            if session.player.add_gem(&session.rules) {
                session
                    .player
                    .set_special_message(strings::MSG_EXTRA_LIFE, &session.rules);
                events.push(GameEvent::ExtraLife);
            }
        }
        Tile::Pedestal => {
            let artifact = session.dungeon.room(session.player.room).artifact;
            if let Some(id) = artifact {
                if session.player.grant_artifact(id) {
                    session.dungeon.set_tile_at(tx, ty, Tile::Floor);
                    session
                        .player
                        .set_special_message(strings::MSG_ARTIFACT, &session.rules);
                    events.push(GameEvent::ArtifactFound { id });
                }
            }
        }
        Tile::Checkpoint => {
            // Trigger-tile activation: binding moves only when the player
            // stands on a checkpoint tile, never on mere proximity.
            let bx = tx * TILE_PX + TILE_PX / 2 - PLAYER_W / 2;
            let by = ty * TILE_PX + TILE_PX / 2 - PLAYER_H / 2;
            if (session.player.checkpoint_x, session.player.checkpoint_y) != (bx, by) {
                session.player.bind_checkpoint(bx, by);
                session.player.hp = session.player.max_hp;
                let id = session.dungeon.nearest_checkpoint(cx, cy);
                session
                    .player
                    .set_special_message(strings::MSG_CHECKPOINT, &session.rules);
                events.push(GameEvent::CheckpointBound { id });
            }
            if input.enter {
                let count = session.dungeon.checkpoints().len();
                session.player.tele_select = (session.player.tele_select + 1) % count;
            }
        }
        _ => {}
    }
}

// ── Hazards ──

fn resolve_hazard(session: &mut GameSession, events: &mut Vec<GameEvent>) {
    let (cx, cy) = session.player.center();
    let tile = session
        .dungeon
        .tile_at(cx.div_euclid(TILE_PX), cy.div_euclid(TILE_PX));
    if !tile.is_hazard() {
        return;
    }

    let amount = session.rules.rift_damage;
    match session.player.apply_damage(amount, &session.rules) {
        DamageOutcome::Ignored => {}
        DamageOutcome::Shielded { broke_shield } => {
            events.push(GameEvent::PlayerHurt { amount });
            if broke_shield {
                events.push(GameEvent::ShieldBroken);
            }
        }
        DamageOutcome::Hurt => events.push(GameEvent::PlayerHurt { amount }),
        DamageOutcome::Fatal => events.push(GameEvent::PlayerDying),
    }
}

// ── Resonance circuit ──

fn resolve_circuit(session: &mut GameSession, input: &FrameInput, events: &mut Vec<GameEvent>) {
    let p = &mut session.player;
    if input.held[K_SP] {
        p.circuit_charge = (p.circuit_charge + 1).min(p.circuit_size());
    } else if p.circuit_charge > 0 {
        events.push(GameEvent::CircuitReleased {
            charge: p.circuit_charge,
        });
        p.circuit_charge = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use crate::sim::rooms::ROOM_PX_W;

    fn session() -> GameSession {
        let cfg = test_config();
        let mut s = GameSession::new(&cfg);
        s.phase = Phase::Playing;
        clear_around_player(&mut s);
        s
    }

    /// Flatten a working area around the player so tests control contact.
    fn clear_around_player(s: &mut GameSession) {
        let (cx, cy) = s.player.center();
        let (tx, ty) = (cx.div_euclid(TILE_PX), cy.div_euclid(TILE_PX));
        for dy in -3..=3 {
            for dx in -3..=3 {
                s.dungeon.set_tile_at(tx + dx, ty + dy, Tile::Floor);
            }
        }
    }

    fn held(keys: &[usize]) -> FrameInput {
        let mut input = FrameInput::default();
        for &k in keys {
            input.held[k] = true;
        }
        input
    }

    fn center_tile(s: &GameSession) -> (i32, i32) {
        let (cx, cy) = s.player.center();
        (cx.div_euclid(TILE_PX), cy.div_euclid(TILE_PX))
    }

    #[test]
    fn held_key_moves_the_player() {
        let mut s = session();
        let x0 = s.player.x;
        let events = step(&mut s, held(&[K_RT]));
        assert_eq!(s.player.x, x0 + s.rules.player_speed);
        assert_eq!(s.player.facing, Facing::Right);
        assert!(events.is_empty());
    }

    #[test]
    fn gem_pickup_consumes_the_tile() {
        let mut s = session();
        let (tx, ty) = center_tile(&s);
        s.dungeon.set_tile_at(tx, ty, Tile::Gem);
        let events = step(&mut s, FrameInput::default());
        assert!(events.contains(&GameEvent::GemPicked { x: tx, y: ty }));
        assert_eq!(s.player.gems, 1);
        assert_eq!(s.player.lives_part, 1);
        assert_eq!(s.dungeon.tile_at(tx, ty), Tile::Floor);
        // Second step: nothing left to pick up.
        assert!(step(&mut s, FrameInput::default()).is_empty());
        assert_eq!(s.player.gems, 1);
    }

    #[test]
    fn artifact_pickup_is_monotonic() {
        let mut s = session();
        let (tx, ty) = center_tile(&s);
        let room = s.player.room;
        s.dungeon.room_mut(room).artifact = Some(5);
        s.dungeon.set_tile_at(tx, ty, Tile::Pedestal);
        let events = step(&mut s, FrameInput::default());
        assert!(events.contains(&GameEvent::ArtifactFound { id: 5 }));
        assert!(s.player.artifacts[5]);
        assert_eq!(s.dungeon.tile_at(tx, ty), Tile::Floor);
        assert_ne!(s.player.special_message, 0);
    }

    #[test]
    fn checkpoint_binds_only_on_the_trigger_tile() {
        let mut s = session();
        let before = (s.player.checkpoint_x, s.player.checkpoint_y);

        // Ordinary movement never rebinds.
        step(&mut s, held(&[K_RT]));
        step(&mut s, held(&[K_DN]));
        assert_eq!((s.player.checkpoint_x, s.player.checkpoint_y), before);

        // Standing on a checkpoint tile two tiles away does.
        s.player.x += TILE_PX * 2;
        let (tx, ty) = center_tile(&s);
        s.dungeon.set_tile_at(tx, ty, Tile::Checkpoint);
        s.player.hp = 3;
        let events = step(&mut s, FrameInput::default());
        assert!(events.iter().any(|e| matches!(e, GameEvent::CheckpointBound { .. })));
        assert_ne!((s.player.checkpoint_x, s.player.checkpoint_y), before);
        assert_eq!(s.player.hp, s.player.max_hp, "binding heals");
        assert_eq!(s.player.special_message, strings::MSG_CHECKPOINT);
        assert_eq!(s.player.special_message_timer, s.rules.message_ticks);

        // Enter on a bound checkpoint cycles the teleport target.
        let mut input = FrameInput::default();
        input.enter = true;
        step(&mut s, input);
        assert_eq!(s.player.tele_select, 1);
    }

    #[test]
    fn rift_damage_runs_the_full_death_cycle() {
        let mut s = session();
        let checkpoint = (s.player.checkpoint_x, s.player.checkpoint_y);
        let (tx, ty) = center_tile(&s);
        s.player.shield_hp = 0;
        s.player.hp = 1;
        s.dungeon.set_tile_at(tx, ty, Tile::Rift);

        let events = step(&mut s, FrameInput::default());
        assert!(events.contains(&GameEvent::PlayerDying));
        assert_eq!(s.player.life_state, LifeState::Dying);

        let mut respawned = false;
        for _ in 0..s.rules.dying_ticks + 1 {
            if step(&mut s, FrameInput::default()).contains(&GameEvent::PlayerRespawned) {
                respawned = true;
                break;
            }
        }
        assert!(respawned, "exactly one dying sequence then a respawn");
        assert_eq!((s.player.x, s.player.y), checkpoint);
        assert_eq!(s.player.hp, s.player.max_hp);
        assert_eq!(s.player.life_state, LifeState::Invulnerable);
        assert_eq!(s.player.lives, 2);

        // Grace window: standing on another rift does nothing.
        let (tx, ty) = center_tile(&s);
        s.dungeon.set_tile_at(tx, ty, Tile::Rift);
        let events = step(&mut s, FrameInput::default());
        assert!(!events.iter().any(|e| matches!(e, GameEvent::PlayerHurt { .. })));
        assert_eq!(s.player.hp, s.player.max_hp);
    }

    #[test]
    fn game_over_when_lives_run_out() {
        let mut s = session();
        let (tx, ty) = center_tile(&s);
        s.player.lives = 0;
        s.player.shield_hp = 0;
        s.player.hp = 1;
        s.dungeon.set_tile_at(tx, ty, Tile::Rift);

        step(&mut s, FrameInput::default());
        let mut over = false;
        for _ in 0..s.rules.dying_ticks + 1 {
            if step(&mut s, FrameInput::default()).contains(&GameEvent::GameOver) {
                over = true;
                break;
            }
        }
        assert!(over);
        assert_eq!(s.phase, Phase::GameOver);
        assert_eq!(s.player.life_state, LifeState::AwaitingRespawn);
    }

    #[test]
    fn special_message_expires() {
        let mut s = session();
        s.player.set_special_message(strings::MSG_ARTIFACT, &s.rules.clone());
        for _ in 0..s.rules.message_ticks {
            step(&mut s, FrameInput::default());
        }
        assert_eq!(s.player.special_message, 0);
        assert_eq!(s.player.special_message_timer, 0);
    }

    #[test]
    fn crossing_a_door_emits_room_entered() {
        let mut s = session();
        // Park the player just left of the boundary to room 1, on the
        // door row, then punch the wall to guarantee an opening here.
        let ty = (s.player.center().1).div_euclid(TILE_PX);
        let border_tx = ROOM_PX_W / TILE_PX;
        for dx in -1..=0 {
            s.dungeon.set_tile_at(border_tx + dx, ty, Tile::Door);
        }
        s.player.x = ROOM_PX_W - PLAYER_W - 2;
        let mut entered = false;
        for _ in 0..12 {
            let events = step(&mut s, held(&[K_RT]));
            if events.contains(&GameEvent::RoomEntered { id: 1 }) {
                entered = true;
                break;
            }
        }
        assert!(entered);
        assert_eq!(s.player.room, 1);
        assert_eq!(s.player.prv_room, 0);
    }

    #[test]
    fn circuit_charges_while_held_and_releases() {
        let mut s = session();
        for _ in 0..10 {
            step(&mut s, held(&[K_SP]));
        }
        assert_eq!(s.player.circuit_charge, 10);
        for _ in 0..1000 {
            step(&mut s, held(&[K_SP]));
        }
        assert_eq!(s.player.circuit_charge, s.player.circuit_size(), "clamped");
        let events = step(&mut s, FrameInput::default());
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::CircuitReleased { .. })));
        assert_eq!(s.player.circuit_charge, 0);
    }
}
