/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub tick_rate_ms: u64,
    pub rules: RulesConfig,
    pub video: VideoConfig,
    pub world: WorldConfig,
    pub gamepad: GamepadConfig,
}

#[derive(Clone, Debug)]
pub struct RulesConfig {
    pub max_hp: i32,
    pub shield_capacity: i32,
    pub shield_recover_ticks: u32,
    pub dying_ticks: u32,
    pub grace_ticks: u32,
    pub message_ticks: u32,
    pub gems_per_life: u32,
    pub starting_lives: u32,
    pub player_speed: i32,   // pixels per tick
    pub rift_damage: i32,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BackendKind {
    Native,
    Emulated,
}

#[derive(Clone, Debug)]
pub struct VideoConfig {
    pub backend: BackendKind,
    pub hide_unvisited: bool,
    pub fog_of_war: bool,
}

#[derive(Clone, Debug)]
pub struct WorldConfig {
    pub seed: u64,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub action: Vec<String>,
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    rules: TomlRules,
    #[serde(default)]
    video: TomlVideo,
    #[serde(default)]
    world: TomlWorld,
    #[serde(default)]
    gamepad: TomlGamepad,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_player_speed")]
    player_speed: i32,
}

#[derive(Deserialize, Debug)]
struct TomlRules {
    #[serde(default = "default_max_hp")]
    max_hp: i32,
    #[serde(default = "default_shield_capacity")]
    shield_capacity: i32,
    #[serde(default = "default_shield_recover")]
    shield_recover_ticks: u32,
    #[serde(default = "default_dying_ticks")]
    dying_ticks: u32,
    #[serde(default = "default_grace_ticks")]
    grace_ticks: u32,
    #[serde(default = "default_message_ticks")]
    message_ticks: u32,
    #[serde(default = "default_gems_per_life")]
    gems_per_life: u32,
    #[serde(default = "default_starting_lives")]
    starting_lives: u32,
    #[serde(default = "default_rift_damage")]
    rift_damage: i32,
}

#[derive(Deserialize, Debug)]
struct TomlVideo {
    #[serde(default = "default_backend")]
    backend: String,
    #[serde(default = "default_hide_unvisited")]
    hide_unvisited: bool,
    #[serde(default = "default_fog_of_war")]
    fog_of_war: bool,
}

#[derive(Deserialize, Debug)]
struct TomlWorld {
    #[serde(default = "default_seed")]
    seed: u64,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_action")]
    action: Vec<String>,
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 33 }
fn default_player_speed() -> i32 { 3 }

fn default_max_hp() -> i32 { 10 }
fn default_shield_capacity() -> i32 { 5 }
fn default_shield_recover() -> u32 { 90 }   // ~3s at 33ms tick
fn default_dying_ticks() -> u32 { 45 }
fn default_grace_ticks() -> u32 { 60 }      // ~2s invulnerability window
fn default_message_ticks() -> u32 { 90 }
fn default_gems_per_life() -> u32 { 50 }
fn default_starting_lives() -> u32 { 3 }
fn default_rift_damage() -> i32 { 1 }

fn default_backend() -> String { "native".into() }
fn default_hide_unvisited() -> bool { true }
fn default_fog_of_war() -> bool { true }

fn default_seed() -> u64 { 0x5D1F_7E11 }

fn default_action() -> Vec<String> { vec!["A".into(), "X".into(), "R1".into()] }
fn default_confirm() -> Vec<String> { vec!["Start".into()] }
fn default_cancel() -> Vec<String> { vec!["Select".into()] }

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed {
            tick_rate_ms: default_tick_rate(),
            player_speed: default_player_speed(),
        }
    }
}

impl Default for TomlRules {
    fn default() -> Self {
        TomlRules {
            max_hp: default_max_hp(),
            shield_capacity: default_shield_capacity(),
            shield_recover_ticks: default_shield_recover(),
            dying_ticks: default_dying_ticks(),
            grace_ticks: default_grace_ticks(),
            message_ticks: default_message_ticks(),
            gems_per_life: default_gems_per_life(),
            starting_lives: default_starting_lives(),
            rift_damage: default_rift_damage(),
        }
    }
}

impl Default for TomlVideo {
    fn default() -> Self {
        TomlVideo {
            backend: default_backend(),
            hide_unvisited: default_hide_unvisited(),
            fog_of_war: default_fog_of_war(),
        }
    }
}

impl Default for TomlWorld {
    fn default() -> Self {
        TomlWorld { seed: default_seed() }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            action: default_action(),
            confirm: default_confirm(),
            cancel: default_cancel(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());
        Self::from_toml(toml_cfg)
    }

    fn from_toml(t: TomlConfig) -> Self {
        let backend = match t.video.backend.to_lowercase().as_str() {
            "emulated" => BackendKind::Emulated,
            "native" => BackendKind::Native,
            other => {
                eprintln!("Warning: unknown video.backend {:?}, using native", other);
                BackendKind::Native
            }
        };

        GameConfig {
            tick_rate_ms: t.speed.tick_rate_ms,
            rules: RulesConfig {
                max_hp: t.rules.max_hp.max(1),
                shield_capacity: t.rules.shield_capacity.max(0),
                shield_recover_ticks: t.rules.shield_recover_ticks.max(1),
                dying_ticks: t.rules.dying_ticks.max(1),
                grace_ticks: t.rules.grace_ticks.max(1),
                message_ticks: t.rules.message_ticks.max(1),
                gems_per_life: t.rules.gems_per_life.max(1),
                starting_lives: t.rules.starting_lives,
                player_speed: t.speed.player_speed.clamp(1, 8),
                rift_damage: t.rules.rift_damage.max(1),
            },
            video: VideoConfig {
                backend,
                hide_unvisited: t.video.hide_unvisited,
                fog_of_war: t.video.fog_of_war,
            },
            world: WorldConfig { seed: t.world.seed },
            gamepad: GamepadConfig {
                action: t.gamepad.action,
                confirm: t.gamepad.confirm,
                cancel: t.gamepad.cancel,
            },
        }
    }
}

/// Built-in defaults with the pinned default seed; never touches disk.
#[cfg(test)]
pub fn test_config() -> GameConfig {
    GameConfig::from_toml(TomlConfig::default())
}

/// Candidate directories to search: exe dir + CWD + XDG data dir (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so a packaged binary still finds data
        // relative to the real executable.
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/voidspire");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse_from_empty_toml() {
        let cfg = GameConfig::from_toml(toml::from_str("").unwrap());
        assert_eq!(cfg.tick_rate_ms, 33);
        assert_eq!(cfg.rules.max_hp, 10);
        assert_eq!(cfg.video.backend, BackendKind::Native);
        assert!(cfg.video.fog_of_war);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let text = "[video]\nbackend = \"emulated\"\n[rules]\nmax_hp = 20\n";
        let cfg = GameConfig::from_toml(toml::from_str(text).unwrap());
        assert_eq!(cfg.video.backend, BackendKind::Emulated);
        assert_eq!(cfg.rules.max_hp, 20);
        assert_eq!(cfg.rules.shield_capacity, 5);
    }

    #[test]
    fn bogus_backend_falls_back_to_native() {
        let text = "[video]\nbackend = \"quantum\"\n";
        let cfg = GameConfig::from_toml(toml::from_str(text).unwrap());
        assert_eq!(cfg.video.backend, BackendKind::Native);
    }
}
