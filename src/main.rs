/// Entry point and game loop.

mod config;
mod domain;
mod frame;
mod gfx;
mod sim;
mod strings;
mod ui;

use crossterm::event::KeyCode;

use config::GameConfig;
use domain::player::FrameInput;
use frame::FrameClock;
use gfx::screen::Screen;
use sim::event::GameEvent;
use sim::save;
use sim::step;
use sim::world::{GameSession, Phase};
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::sink::TerminalSink;
use ui::sound::SoundEngine;
use ui::view::{View, SCREEN_H, SCREEN_W};

fn main() {
    let config = GameConfig::load();

    let mut session = GameSession::new(&config);
    session.has_save = save::has_save();

    let mut sink = TerminalSink::new();
    let enhanced = match sink.init() {
        Ok(enhanced) => enhanced,
        Err(e) => {
            eprintln!("Terminal init failed: {e}");
            return;
        }
    };

    // Without a screen surface the core cannot render at all; surface
    // allocation failure aborts inside Screen::new with a diagnostic.
    let mut screen = Screen::new(config.video.backend, SCREEN_W, SCREEN_H, Box::new(sink));
    let mut view = View::new();
    let sound = SoundEngine::new();

    let result = game_loop(
        &mut session,
        &mut screen,
        &mut view,
        sound.as_ref(),
        &config,
        enhanced,
    );

    if let Err(e) = ui::sink::cleanup_terminal(enhanced) {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("The spire will be waiting.");
}

fn game_loop(
    session: &mut GameSession,
    screen: &mut Screen,
    view: &mut View,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
    enhanced: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    kb.honor_release = enhanced;
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    let mut clock = FrameClock::new(config.tick_rate_ms);
    let mut frame_no: u64 = 0;

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() {
            flush_save(session);
            break;
        }
        if handle_meta(session, screen, view, &kb, &gp, config) {
            flush_save(session);
            break;
        }

        if session.phase == Phase::Playing && !session.paused {
            let input = merge_input(&kb, &gp);
            let events = step::step(session, input);
            process_events(session, screen, view, sound, &events);
        }

        view.render(session, &config.video, screen);
        screen.present()?;
        clock.end_cycle(frame_no);
        frame_no += 1;
    }

    Ok(())
}

/// Keyboard and gamepad agree by OR: either device can hold a direction.
fn merge_input(kb: &InputState, gp: &GamepadState) -> FrameInput {
    use domain::player::{K_DN, K_LT, K_RT, K_SP, K_UP};
    let mut input = kb.frame_input();
    input.held[K_UP] |= gp.up_held();
    input.held[K_DN] |= gp.down_held();
    input.held[K_LT] |= gp.left_held();
    input.held[K_RT] |= gp.right_held();
    input.held[K_SP] |= gp.action_held();
    input.enter |= gp.confirm_pressed();
    input
}

// ── Meta-phase input (everything that is not the simulation) ──

const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter];
const KEYS_PAUSE: &[KeyCode] = &[KeyCode::Char('p'), KeyCode::Char('P'), KeyCode::F(1)];

/// Returns true when the game should quit.
fn handle_meta(
    session: &mut GameSession,
    screen: &mut Screen,
    view: &mut View,
    kb: &InputState,
    gp: &GamepadState,
    config: &GameConfig,
) -> bool {
    let confirm = kb.any_pressed(KEYS_CONFIRM) || gp.confirm_pressed();
    let esc = kb.any_pressed(&[KeyCode::Esc]) || gp.cancel_pressed();

    match session.phase {
        // ── Title ──
        Phase::Title => {
            if confirm {
                session.start_new_game(config);
            } else if kb.any_pressed(&[KeyCode::Char('c'), KeyCode::Char('C')]) {
                if !try_load(session, screen, view, config) {
                    session.player.set_special_message(strings::MSG_NO_SAVE, &config.rules);
                }
            } else if kb.any_pressed(&[KeyCode::Char('t'), KeyCode::Char('T')]) {
                session.player.training = !session.player.training;
            } else if esc || kb.any_pressed(&[KeyCode::Char('q'), KeyCode::Char('Q')]) {
                return true;
            }
        }

        // ── Playing ──
        Phase::Playing => {
            if kb.any_pressed(KEYS_PAUSE) {
                session.paused = !session.paused;
                return false;
            }
            if session.paused {
                if esc {
                    save_now(session, screen, view);
                    session.paused = false;
                    session.phase = Phase::Title;
                }
                return false;
            }

            if esc {
                save_now(session, screen, view);
                session.phase = Phase::Title;
                return false;
            }
            // F5 / F9: manual save and restore.
            if kb.any_pressed(&[KeyCode::F(5)]) {
                save_now(session, screen, view);
                if !session.player.training {
                    let msg = if session.has_save {
                        strings::MSG_SAVED
                    } else {
                        strings::MSG_SAVE_FAILED
                    };
                    session.player.set_special_message(msg, &session.rules.clone());
                }
            }
            if kb.any_pressed(&[KeyCode::F(9)]) {
                if !try_load(session, screen, view, config) {
                    session
                        .player
                        .set_special_message(strings::MSG_NO_SAVE, &session.rules.clone());
                }
            }
        }

        // ── Game over ──
        Phase::GameOver => {
            if confirm {
                // Continue from the last checkpoint save when one exists,
                // otherwise start over.
                if !try_load(session, screen, view, config) {
                    session.start_new_game(config);
                }
            } else if esc {
                session.phase = Phase::Title;
            }
        }
    }

    false
}

// ── Persistence plumbing ──

/// Save with on-screen progress feedback.
fn save_now(session: &mut GameSession, screen: &mut Screen, view: &View) {
    let result = save::write_player_data(session, |part, frac| {
        view.render_transfer(screen, true, part, frac);
        let _ = screen.present();
    });
    match result {
        Ok(()) => {
            if !session.player.training {
                session.has_save = true;
            }
        }
        Err(_) => {
            session
                .player
                .set_special_message(strings::MSG_SAVE_FAILED, &session.rules.clone());
        }
    }
}

/// Silent save for shutdown paths; progress feedback is pointless when
/// the terminal is about to be torn down.
fn flush_save(session: &GameSession) {
    if session.phase == Phase::Playing {
        let _ = save::write_player_data(session, |_, _| {});
    }
}

/// Load the save and resume play at the checkpoint. False if no usable
/// save exists.
fn try_load(
    session: &mut GameSession,
    screen: &mut Screen,
    view: &mut View,
    config: &GameConfig,
) -> bool {
    let data = {
        let view = &*view;
        save::read_player_data(|part, frac| {
            view.render_transfer(screen, false, part, frac);
            let _ = screen.present();
        })
    };
    let Some(data) = data else { return false };

    session.start_new_game(config);
    save::apply(session, &data);
    session.has_save = true;
    session.phase = Phase::Playing;
    true
}

// ── Event fan-out ──

fn process_events(
    session: &mut GameSession,
    screen: &mut Screen,
    view: &View,
    sound: Option<&SoundEngine>,
    events: &[GameEvent],
) {
    for event in events {
        if let Some(sfx) = sound {
            match event {
                GameEvent::GemPicked { .. } => sfx.play_gem(),
                GameEvent::ArtifactFound { .. } => sfx.play_artifact(),
                GameEvent::CheckpointBound { .. } => sfx.play_checkpoint(),
                GameEvent::PlayerHurt { .. } => sfx.play_hurt(),
                GameEvent::ShieldBroken => sfx.play_shield_break(),
                GameEvent::PlayerDying => sfx.play_die(),
                GameEvent::PlayerRespawned | GameEvent::ExtraLife => sfx.play_respawn(),
                GameEvent::CircuitReleased { .. } => sfx.play_circuit(),
                _ => {}
            }
        }

        // Binding a checkpoint is the explicit save boundary.
        if matches!(event, GameEvent::CheckpointBound { .. }) {
            save_now(session, screen, view);
        }
    }
}
