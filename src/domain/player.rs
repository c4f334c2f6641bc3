/// The player avatar: exactly one per running session.
///
/// Life state machine:
///   Normal → Dying            (hp reaches 0, exactly once)
///   Dying  → AwaitingRespawn  (death timer expires, no lives left)
///   Dying  → Invulnerable     (death timer expires, respawn at checkpoint)
///   Invulnerable → Normal     (grace timer expires)
///
/// The shield runs its own sub-machine: damage drains shield_hp before hp;
/// at zero a recovery countdown starts, and on expiry the shield snaps back
/// to full capacity in a single cycle. It never regenerates partially.

use crate::config::RulesConfig;

/// Collision box, world pixels.
pub const PLAYER_W: i32 = 10;
pub const PLAYER_H: i32 = 14;

/// Indices into the held-key array polled from the input layer.
pub const K_UP: usize = 0;
pub const K_DN: usize = 1;
pub const K_LT: usize = 2;
pub const K_RT: usize = 3;
pub const K_SP: usize = 4;

pub const ARTIFACT_COUNT: usize = 12;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Facing {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LifeState {
    Normal,
    Invulnerable,
    Dying,
    AwaitingRespawn,
}

/// One frame of polled input: held directions + action, and the
/// edge-triggered enter flag.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameInput {
    pub held: [bool; 5],
    pub enter: bool,
}

/// What a damage application did, for the caller to turn into events.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DamageOutcome {
    Ignored,
    Shielded { broke_shield: bool },
    Hurt,
    Fatal,
}

/// What advancing the death timer did.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DeathOutcome {
    StillDying,
    Respawned,
    GameOver,
}

#[derive(Clone, Debug)]
pub struct Player {
    // Position: top-left of the collision box, world pixels.
    pub x: i32,
    pub y: i32,
    pub facing: Facing,
    pub frame: u8,

    pub room: usize,
    pub prv_room: usize,
    // Position at the moment the current room was entered.
    pub enter_room_x: i32,
    pub enter_room_y: i32,

    pub hp: i32,
    pub max_hp: i32,
    pub shield_hp: i32,
    pub shield_recover: u32,

    pub lives: u32,
    pub lives_part: u32,

    pub life_state: LifeState,
    // Grace countdown while Invulnerable, death countdown while Dying.
    pub state_timer: u32,

    pub checkpoint_x: i32,
    pub checkpoint_y: i32,

    pub artifacts: [bool; ARTIFACT_COUNT],
    pub gems: u32,

    // Resonance circuit weapon: charge grows while the action key is held.
    pub circuit_charge: i32,

    // 0 = no message. Set together with its timer; the frame driver
    // decrements the timer and clears the message at zero.
    pub special_message: usize,
    pub special_message_timer: u32,

    pub tele_select: usize,
    pub training: bool,
}

impl Player {
    pub fn new(x: i32, y: i32, rules: &RulesConfig) -> Self {
        Player {
            x,
            y,
            facing: Facing::Down,
            frame: 0,
            room: 0,
            prv_room: 0,
            enter_room_x: x,
            enter_room_y: y,
            hp: rules.max_hp,
            max_hp: rules.max_hp,
            shield_hp: rules.shield_capacity,
            shield_recover: 0,
            lives: rules.starting_lives,
            lives_part: 0,
            life_state: LifeState::Normal,
            state_timer: 0,
            checkpoint_x: x,
            checkpoint_y: y,
            artifacts: [false; ARTIFACT_COUNT],
            gems: 0,
            circuit_charge: 0,
            special_message: 0,
            special_message_timer: 0,
            tele_select: 0,
            training: false,
        }
    }

    /// Center of the collision box, world pixels.
    pub fn center(&self) -> (i32, i32) {
        (self.x + PLAYER_W / 2, self.y + PLAYER_H / 2)
    }

    pub fn alive(&self) -> bool {
        matches!(self.life_state, LifeState::Normal | LifeState::Invulnerable)
    }

    /// Maximum circuit charge: grows with recovered artifacts.
    pub fn circuit_size(&self) -> i32 {
        32 + 2 * self.artifacts.iter().filter(|&&a| a).count() as i32
    }

    /// Visible radius of the circuit effect at the current charge.
    pub fn circuit_range(&self) -> i32 {
        16 + self.circuit_charge / 2
    }

    /// Apply damage: shield first, overflow into hp. Only a player in
    /// Normal state can be hurt; grace and death sequences ignore damage.
    pub fn apply_damage(&mut self, amount: i32, rules: &RulesConfig) -> DamageOutcome {
        if self.life_state != LifeState::Normal || amount <= 0 {
            return DamageOutcome::Ignored;
        }

        let mut remaining = amount;
        let mut broke_shield = false;

        if self.shield_hp > 0 {
            let absorbed = self.shield_hp.min(remaining);
            self.shield_hp -= absorbed;
            remaining -= absorbed;
            if self.shield_hp == 0 {
                self.shield_recover = rules.shield_recover_ticks;
                broke_shield = true;
            }
        }

        if remaining == 0 {
            self.life_state = LifeState::Invulnerable;
            self.state_timer = rules.grace_ticks;
            return DamageOutcome::Shielded { broke_shield };
        }

        self.hp = (self.hp - remaining).max(0);
        if self.hp == 0 {
            self.life_state = LifeState::Dying;
            self.state_timer = rules.dying_ticks;
            DamageOutcome::Fatal
        } else {
            self.life_state = LifeState::Invulnerable;
            self.state_timer = rules.grace_ticks;
            DamageOutcome::Hurt
        }
    }

    /// Advance the shield recovery countdown. Returns true on the cycle
    /// where the shield snaps back to capacity.
    pub fn tick_shield(&mut self, rules: &RulesConfig) -> bool {
        if self.shield_recover == 0 {
            return false;
        }
        self.shield_recover -= 1;
        if self.shield_recover == 0 {
            self.shield_hp = rules.shield_capacity;
            true
        } else {
            false
        }
    }

    /// Advance the death timer while Dying. On expiry, either respawn at
    /// the bound checkpoint (consuming a life) or give up for good.
    pub fn advance_death(&mut self, rules: &RulesConfig) -> DeathOutcome {
        debug_assert_eq!(self.life_state, LifeState::Dying);
        if self.state_timer > 0 {
            self.state_timer -= 1;
        }
        if self.state_timer > 0 {
            return DeathOutcome::StillDying;
        }

        if self.lives == 0 {
            self.life_state = LifeState::AwaitingRespawn;
            return DeathOutcome::GameOver;
        }

        self.lives -= 1;
        self.x = self.checkpoint_x;
        self.y = self.checkpoint_y;
        self.hp = self.max_hp;
        self.shield_hp = rules.shield_capacity;
        self.shield_recover = 0;
        self.circuit_charge = 0;
        self.life_state = LifeState::Invulnerable;
        self.state_timer = rules.grace_ticks;
        DeathOutcome::Respawned
    }

    /// Advance the post-hit/post-respawn grace countdown.
    pub fn tick_grace(&mut self) {
        if self.life_state != LifeState::Invulnerable {
            return;
        }
        if self.state_timer > 0 {
            self.state_timer -= 1;
        }
        if self.state_timer == 0 {
            self.life_state = LifeState::Normal;
        }
    }

    /// Bind the respawn point. Only checkpoint activation calls this;
    /// ordinary movement never touches the binding.
    pub fn bind_checkpoint(&mut self, x: i32, y: i32) {
        self.checkpoint_x = x;
        self.checkpoint_y = y;
    }

    /// Record an artifact. Flags are monotonic: returns true only the
    /// first time a given id is set.
    pub fn grant_artifact(&mut self, id: usize) -> bool {
        if id >= ARTIFACT_COUNT || self.artifacts[id] {
            return false;
        }
        self.artifacts[id] = true;
        true
    }

    /// Collect a gem; returns true when the fractional-life bar fills
    /// and an extra life is granted.
    pub fn add_gem(&mut self, rules: &RulesConfig) -> bool {
        self.gems += 1;
        self.lives_part += 1;
        if self.lives_part >= rules.gems_per_life {
            self.lives_part = 0;
            self.lives += 1;
            true
        } else {
            false
        }
    }

    pub fn set_special_message(&mut self, id: usize, rules: &RulesConfig) {
        self.special_message = id;
        self.special_message_timer = rules.message_ticks;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RulesConfig;

    fn rules() -> RulesConfig {
        RulesConfig {
            max_hp: 10,
            shield_capacity: 5,
            shield_recover_ticks: 90,
            dying_ticks: 45,
            grace_ticks: 60,
            message_ticks: 90,
            gems_per_life: 50,
            starting_lives: 3,
            player_speed: 3,
            rift_damage: 1,
        }
    }

    fn player() -> Player {
        Player::new(100, 100, &rules())
    }

    #[test]
    fn damage_drains_shield_before_hp() {
        let r = rules();
        let mut p = player();
        assert_eq!(p.apply_damage(3, &r), DamageOutcome::Shielded { broke_shield: false });
        assert_eq!(p.shield_hp, 2);
        assert_eq!(p.hp, 10);
    }

    #[test]
    fn overflow_damage_carries_into_hp() {
        let r = rules();
        let mut p = player();
        assert_eq!(p.apply_damage(8, &r), DamageOutcome::Hurt);
        assert_eq!(p.shield_hp, 0);
        assert_eq!(p.shield_recover, r.shield_recover_ticks);
        assert_eq!(p.hp, 7);
    }

    #[test]
    fn totals_never_exceed_capacity_and_never_go_negative() {
        let r = rules();
        let mut p = player();
        for amount in [0, 1, 3, 100, 2, 7] {
            p.apply_damage(amount, &r);
            assert!(p.hp + p.shield_hp <= r.max_hp + r.shield_capacity);
            assert!(p.hp >= 0);
            assert!(p.shield_hp >= 0);
            // Re-arm so the next hit is not ignored by grace.
            if p.life_state == LifeState::Invulnerable {
                p.life_state = LifeState::Normal;
            }
        }
    }

    #[test]
    fn shield_stays_empty_then_snaps_to_full() {
        let r = rules();
        let mut p = player();
        p.apply_damage(5, &r);
        assert_eq!(p.shield_hp, 0);
        for _ in 0..r.shield_recover_ticks - 1 {
            assert!(!p.tick_shield(&r));
            assert_eq!(p.shield_hp, 0, "no partial regeneration");
        }
        assert!(p.tick_shield(&r));
        assert_eq!(p.shield_hp, r.shield_capacity);
    }

    #[test]
    fn fatal_damage_enters_dying_exactly_once() {
        let r = rules();
        let mut p = player();
        p.shield_hp = 0;
        assert_eq!(p.apply_damage(10, &r), DamageOutcome::Fatal);
        assert_eq!(p.life_state, LifeState::Dying);
        let timer = p.state_timer;
        // Further damage during the death sequence is ignored.
        assert_eq!(p.apply_damage(10, &r), DamageOutcome::Ignored);
        assert_eq!(p.state_timer, timer);
    }

    #[test]
    fn death_respawns_at_checkpoint_with_grace() {
        let r = rules();
        let mut p = player();
        p.bind_checkpoint(400, 250);
        p.shield_hp = 0;
        p.apply_damage(10, &r);
        for _ in 0..r.dying_ticks - 1 {
            assert_eq!(p.advance_death(&r), DeathOutcome::StillDying);
        }
        assert_eq!(p.advance_death(&r), DeathOutcome::Respawned);
        assert_eq!((p.x, p.y), (400, 250));
        assert_eq!(p.hp, r.max_hp);
        assert_eq!(p.shield_hp, r.shield_capacity);
        assert_eq!(p.lives, 2);
        assert_eq!(p.life_state, LifeState::Invulnerable);
        // Damage during the grace window is ignored.
        assert_eq!(p.apply_damage(4, &r), DamageOutcome::Ignored);
        assert_eq!(p.hp, r.max_hp);
    }

    #[test]
    fn death_with_no_lives_awaits_respawn() {
        let r = rules();
        let mut p = player();
        p.lives = 0;
        p.shield_hp = 0;
        p.apply_damage(10, &r);
        for _ in 0..r.dying_ticks - 1 {
            p.advance_death(&r);
        }
        assert_eq!(p.advance_death(&r), DeathOutcome::GameOver);
        assert_eq!(p.life_state, LifeState::AwaitingRespawn);
    }

    #[test]
    fn grace_expires_back_to_normal() {
        let r = rules();
        let mut p = player();
        p.apply_damage(6, &r);
        assert_eq!(p.life_state, LifeState::Invulnerable);
        for _ in 0..r.grace_ticks {
            p.tick_grace();
        }
        assert_eq!(p.life_state, LifeState::Normal);
    }

    #[test]
    fn artifacts_are_monotonic() {
        let mut p = player();
        assert!(p.grant_artifact(3));
        assert!(!p.grant_artifact(3));
        assert!(p.artifacts[3]);
        assert!(!p.grant_artifact(ARTIFACT_COUNT));
    }

    #[test]
    fn gems_fill_the_life_bar() {
        let r = rules();
        let mut p = player();
        for _ in 0..r.gems_per_life - 1 {
            assert!(!p.add_gem(&r));
        }
        assert!(p.add_gem(&r));
        assert_eq!(p.lives, 4);
        assert_eq!(p.lives_part, 0);
        assert_eq!(p.gems, r.gems_per_life);
    }

    #[test]
    fn circuit_size_grows_with_artifacts() {
        let mut p = player();
        let base = p.circuit_size();
        p.grant_artifact(0);
        p.grant_artifact(1);
        assert_eq!(p.circuit_size(), base + 4);
    }
}
