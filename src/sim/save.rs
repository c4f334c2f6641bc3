/// Save and load player progress.
///
/// ## What is persisted
///
/// Durable fields only: room id, checkpoint coordinates, hp, shield
/// (including an in-flight recovery countdown), lives and the fractional
/// life bar, artifact flags, gem count, and the visited-room set.
/// Position is NOT persisted: a restored player always stands at the
/// bound checkpoint, in Normal state.
///
/// ## File format
///
/// Key-value lines, opaque and versionless. Parsing is tolerant; a
/// missing or corrupt file reads as "no save present" (new game), never
/// as an error.
///
/// Serialization runs in three parts (header, progress, map); the
/// progress hooks receive each part with a 0.0–1.0 fraction for UI
/// feedback and mutate nothing.

use std::path::PathBuf;

use crate::domain::player::{LifeState, ARTIFACT_COUNT};
use crate::sim::rooms::ROOM_COUNT;
use crate::sim::world::GameSession;

const SAVE_FILE: &str = "voidspire.sav";

/// Which persisted section is in flight, for progress reporting.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SavePart {
    Header,
    Progress,
    Map,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaveData {
    pub room: usize,
    pub checkpoint: (i32, i32),
    pub hp: i32,
    pub max_hp: i32,
    pub shield_hp: i32,
    pub shield_recover: u32,
    pub lives: u32,
    pub lives_part: u32,
    pub gems: u32,
    pub artifacts: Vec<usize>,
    pub visited: Vec<usize>,
}

// ══════════════════════════════════════════════════════════════
// Paths
// ══════════════════════════════════════════════════════════════

fn save_dir() -> PathBuf {
    // 1. Try exe directory (works for local/portable installs)
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            let test_path = parent.join(".write_test_voidspire");
            if std::fs::write(&test_path, "").is_ok() {
                let _ = std::fs::remove_file(&test_path);
                return parent.to_path_buf();
            }
        }
    }

    // 2. XDG data home for system installs
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/voidspire");
        if std::fs::create_dir_all(&xdg).is_ok() {
            return xdg;
        }
    }

    // 3. Fallback to CWD
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn save_path() -> PathBuf {
    save_dir().join(SAVE_FILE)
}

// ══════════════════════════════════════════════════════════════
// Session ↔ SaveData
// ══════════════════════════════════════════════════════════════

pub fn capture(session: &GameSession) -> SaveData {
    let p = &session.player;
    SaveData {
        room: p.room,
        checkpoint: (p.checkpoint_x, p.checkpoint_y),
        hp: p.hp,
        max_hp: p.max_hp,
        shield_hp: p.shield_hp,
        shield_recover: p.shield_recover,
        lives: p.lives,
        lives_part: p.lives_part,
        gems: p.gems,
        artifacts: (0..ARTIFACT_COUNT).filter(|&i| p.artifacts[i]).collect(),
        visited: session.dungeon.visited_rooms(),
    }
}

/// Restore durable fields into the session. The player comes back at
/// the checkpoint, Normal, with transient state cleared.
pub fn apply(session: &mut GameSession, data: &SaveData) {
    let p = &mut session.player;
    p.room = data.room;
    p.prv_room = data.room;
    p.checkpoint_x = data.checkpoint.0;
    p.checkpoint_y = data.checkpoint.1;
    p.x = data.checkpoint.0;
    p.y = data.checkpoint.1;
    p.enter_room_x = p.x;
    p.enter_room_y = p.y;
    p.max_hp = data.max_hp.max(1);
    p.hp = data.hp.clamp(0, p.max_hp).max(1);
    p.shield_hp = data.shield_hp.max(0);
    p.shield_recover = data.shield_recover;
    p.lives = data.lives;
    p.lives_part = data.lives_part;
    p.gems = data.gems;
    p.artifacts = [false; ARTIFACT_COUNT];
    for &id in &data.artifacts {
        if id < ARTIFACT_COUNT {
            p.artifacts[id] = true;
        }
    }
    p.life_state = LifeState::Normal;
    p.state_timer = 0;
    p.circuit_charge = 0;
    p.special_message = 0;
    p.special_message_timer = 0;
    p.tele_select = 0;

    for &id in &data.visited {
        if id < ROOM_COUNT {
            session.dungeon.room_mut(id).visited = true;
        }
    }
    session.dungeon.room_mut(data.room).visited = true;
}

// ══════════════════════════════════════════════════════════════
// Disk operations
// ══════════════════════════════════════════════════════════════

/// Serialize and write the session's durable fields. A no-op in
/// training mode, which must leave no persistence side-effects.
pub fn write_player_data(
    session: &GameSession,
    mut progress: impl FnMut(SavePart, f32),
) -> Result<(), String> {
    if session.player.training {
        return Ok(());
    }
    let content = serialize(&capture(session), &mut progress);
    std::fs::write(save_path(), content).map_err(|e| format!("Save failed: {}", e))
}

/// Read and parse the save file. Missing or corrupt data is `None`.
pub fn read_player_data(mut progress: impl FnMut(SavePart, f32)) -> Option<SaveData> {
    let candidates = [save_path(), PathBuf::from(SAVE_FILE)];
    for path in &candidates {
        if let Ok(content) = std::fs::read_to_string(path) {
            return parse_save(&content, &mut progress);
        }
    }
    None
}

pub fn has_save() -> bool {
    let candidates = [save_path(), PathBuf::from(SAVE_FILE)];
    candidates.iter().any(|p| p.exists())
}

pub fn delete_save() {
    let _ = std::fs::remove_file(save_path());
    let _ = std::fs::remove_file(SAVE_FILE);
}

// ══════════════════════════════════════════════════════════════
// Serialization
// ══════════════════════════════════════════════════════════════

fn serialize(data: &SaveData, progress: &mut dyn FnMut(SavePart, f32)) -> String {
    let mut out = String::with_capacity(512);

    progress(SavePart::Header, 0.0);
    out.push_str(&format!("room={}\n", data.room));
    out.push_str(&format!("checkpoint={},{}\n", data.checkpoint.0, data.checkpoint.1));
    out.push_str(&format!("hp={}\n", data.hp));
    out.push_str(&format!("max_hp={}\n", data.max_hp));
    progress(SavePart::Header, 1.0);

    progress(SavePart::Progress, 0.0);
    out.push_str(&format!("shield={}\n", data.shield_hp));
    out.push_str(&format!("shield_recover={}\n", data.shield_recover));
    out.push_str(&format!("lives={}\n", data.lives));
    out.push_str(&format!("lives_part={}\n", data.lives_part));
    out.push_str(&format!("gems={}\n", data.gems));
    progress(SavePart::Progress, 0.5);
    let arts: Vec<String> = data.artifacts.iter().map(|a| a.to_string()).collect();
    out.push_str(&format!("artifacts={}\n", arts.join(",")));
    progress(SavePart::Progress, 1.0);

    progress(SavePart::Map, 0.0);
    let rooms: Vec<String> = data.visited.iter().map(|r| r.to_string()).collect();
    out.push_str(&format!("visited={}\n", rooms.join(",")));
    progress(SavePart::Map, 1.0);

    out
}

// ══════════════════════════════════════════════════════════════
// Parsing
// ══════════════════════════════════════════════════════════════

fn parse_save(content: &str, progress: &mut dyn FnMut(SavePart, f32)) -> Option<SaveData> {
    let mut room = None;
    let mut checkpoint = None;
    let mut hp = None;
    let mut max_hp = None;
    let mut shield_hp = 0;
    let mut shield_recover = 0;
    let mut lives = None;
    let mut lives_part = 0;
    let mut gems = 0;
    let mut artifacts: Vec<usize> = vec![];
    let mut visited: Vec<usize> = vec![];

    progress(SavePart::Header, 0.0);
    for line in content.lines() {
        let line = line.trim();
        if let Some(val) = line.strip_prefix("room=") {
            room = val.parse().ok();
        } else if let Some(val) = line.strip_prefix("checkpoint=") {
            let parts: Vec<&str> = val.split(',').collect();
            if parts.len() == 2 {
                if let (Ok(x), Ok(y)) = (parts[0].trim().parse(), parts[1].trim().parse()) {
                    checkpoint = Some((x, y));
                }
            }
        } else if let Some(val) = line.strip_prefix("hp=") {
            hp = val.parse().ok();
        } else if let Some(val) = line.strip_prefix("max_hp=") {
            max_hp = val.parse().ok();
        } else if let Some(val) = line.strip_prefix("shield=") {
            shield_hp = val.parse().unwrap_or(0);
        } else if let Some(val) = line.strip_prefix("shield_recover=") {
            shield_recover = val.parse().unwrap_or(0);
        } else if let Some(val) = line.strip_prefix("lives=") {
            lives = val.parse().ok();
        } else if let Some(val) = line.strip_prefix("lives_part=") {
            lives_part = val.parse().unwrap_or(0);
        } else if let Some(val) = line.strip_prefix("gems=") {
            gems = val.parse().unwrap_or(0);
        } else if let Some(val) = line.strip_prefix("artifacts=") {
            artifacts = val.split(',').filter_map(|s| s.trim().parse().ok()).collect();
        } else if let Some(val) = line.strip_prefix("visited=") {
            visited = val.split(',').filter_map(|s| s.trim().parse().ok()).collect();
        }
    }
    progress(SavePart::Header, 1.0);

    progress(SavePart::Progress, 1.0);
    progress(SavePart::Map, 1.0);

    let room: usize = room?;
    // A save pointing at a room that cannot exist is corrupt content,
    // not a crash: reject it and fall back to a new game.
    if room >= ROOM_COUNT {
        return None;
    }
    artifacts.retain(|&a| a < ARTIFACT_COUNT);
    visited.retain(|&r| r < ROOM_COUNT);

    Some(SaveData {
        room,
        checkpoint: checkpoint?,
        hp: hp?,
        max_hp: max_hp.unwrap_or(10),
        shield_hp,
        shield_recover,
        lives: lives?,
        lives_part,
        gems,
        artifacts,
        visited,
    })
}
