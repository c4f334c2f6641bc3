/// Gamepad input tracker using gilrs.
///
/// Button mapping is loaded from config.toml via `load_button_config()`.
/// Default mapping:
///   D-pad / Left Stick    →  Movement
///   A / X / R1            →  Circuit (action)
///   Start                 →  Confirm
///   Select                →  Cancel / quit
///
/// Compiles to a no-op stub without the "gamepad" feature.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;

const STICK_DEADZONE: f32 = 0.25;

/// Logical button identifiers (one per physical button).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Btn {
    A,
    B,
    X,
    Y,
    L1,
    R1,
    Start,
    Select,
}

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH" => Some(Btn::A),
            "B" | "EAST" => Some(Btn::B),
            "X" | "WEST" => Some(Btn::X),
            "Y" | "NORTH" => Some(Btn::Y),
            "L1" | "LB" | "LEFTTRIGGER" => Some(Btn::L1),
            "R1" | "RB" | "RIGHTTRIGGER" => Some(Btn::R1),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South => Some(Btn::A),
            Button::East => Some(Btn::B),
            Button::West => Some(Btn::X),
            Button::North => Some(Btn::Y),
            Button::LeftTrigger => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::Start => Some(Btn::Start),
            Button::Select => Some(Btn::Select),
            _ => None,
        }
    }

    fn index(self) -> usize {
        match self {
            Btn::A => 0,
            Btn::B => 1,
            Btn::X => 2,
            Btn::Y => 3,
            Btn::L1 => 4,
            Btn::R1 => 5,
            Btn::Start => 6,
            Btn::Select => 7,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct BtnState {
    held: bool,
    just_pressed: bool,
}

struct ActionMap {
    action: Vec<Btn>,
    confirm: Vec<Btn>,
    cancel: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            action: vec![Btn::A, Btn::X, Btn::R1],
            confirm: vec![Btn::Start],
            cancel: vec![Btn::Select],
        }
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    buttons: [BtnState; 8],

    dpad_up: bool,
    dpad_down: bool,
    dpad_left: bool,
    dpad_right: bool,

    stick_x: f32,
    stick_y: f32,

    action_map: ActionMap,
}

impl GamepadState {
    pub fn new() -> Self {
        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: Gilrs::new().ok(),
            buttons: [BtnState::default(); 8],
            dpad_up: false,
            dpad_down: false,
            dpad_left: false,
            dpad_right: false,
            stick_x: 0.0,
            stick_y: 0.0,
            action_map: ActionMap::default(),
        }
    }

    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        let parse = |names: &[String], fallback: &[Btn]| -> Vec<Btn> {
            let parsed: Vec<Btn> = names.iter().filter_map(|n| Btn::from_name(n)).collect();
            if parsed.is_empty() {
                fallback.to_vec()
            } else {
                parsed
            }
        };
        let defaults = ActionMap::default();
        self.action_map = ActionMap {
            action: parse(&cfg.action, &defaults.action),
            confirm: parse(&cfg.confirm, &defaults.confirm),
            cancel: parse(&cfg.cancel, &defaults.cancel),
        };
    }

    /// Drain gilrs events. Call once per frame.
    #[cfg(feature = "gamepad")]
    pub fn update(&mut self) {
        for b in self.buttons.iter_mut() {
            b.just_pressed = false;
        }

        let Some(gilrs) = self.gilrs.as_mut() else { return };
        while let Some(ev) = gilrs.next_event() {
            match ev.event {
                EventType::ButtonPressed(button, _) => match button {
                    Button::DPadUp => self.dpad_up = true,
                    Button::DPadDown => self.dpad_down = true,
                    Button::DPadLeft => self.dpad_left = true,
                    Button::DPadRight => self.dpad_right = true,
                    other => {
                        if let Some(btn) = Btn::from_gilrs(other) {
                            let state = &mut self.buttons[btn.index()];
                            if !state.held {
                                state.just_pressed = true;
                            }
                            state.held = true;
                        }
                    }
                },
                EventType::ButtonReleased(button, _) => match button {
                    Button::DPadUp => self.dpad_up = false,
                    Button::DPadDown => self.dpad_down = false,
                    Button::DPadLeft => self.dpad_left = false,
                    Button::DPadRight => self.dpad_right = false,
                    other => {
                        if let Some(btn) = Btn::from_gilrs(other) {
                            self.buttons[btn.index()].held = false;
                        }
                    }
                },
                EventType::AxisChanged(Axis::LeftStickX, v, _) => self.stick_x = v,
                EventType::AxisChanged(Axis::LeftStickY, v, _) => self.stick_y = v,
                _ => {}
            }
        }
    }

    #[cfg(not(feature = "gamepad"))]
    pub fn update(&mut self) {}

    pub fn up_held(&self) -> bool {
        self.dpad_up || self.stick_y > STICK_DEADZONE
    }

    pub fn down_held(&self) -> bool {
        self.dpad_down || self.stick_y < -STICK_DEADZONE
    }

    pub fn left_held(&self) -> bool {
        self.dpad_left || self.stick_x < -STICK_DEADZONE
    }

    pub fn right_held(&self) -> bool {
        self.dpad_right || self.stick_x > STICK_DEADZONE
    }

    pub fn action_held(&self) -> bool {
        self.any_held(&self.action_map.action)
    }

    pub fn confirm_pressed(&self) -> bool {
        self.any_pressed(&self.action_map.confirm)
    }

    pub fn cancel_pressed(&self) -> bool {
        self.any_pressed(&self.action_map.cancel)
    }

    fn any_held(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|b| self.buttons[b.index()].held)
    }

    fn any_pressed(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|b| self.buttons[b.index()].just_pressed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_names_parse_case_insensitively() {
        assert_eq!(Btn::from_name("a"), Some(Btn::A));
        assert_eq!(Btn::from_name("SOUTH"), Some(Btn::A));
        assert_eq!(Btn::from_name("rb"), Some(Btn::R1));
        assert_eq!(Btn::from_name("pedal"), None);
    }

    #[test]
    fn bad_config_keeps_defaults() {
        let mut gp = GamepadState::new();
        gp.load_button_config(&GamepadConfig {
            action: vec!["nonsense".into()],
            confirm: vec![],
            cancel: vec!["select".into()],
        });
        assert_eq!(gp.action_map.action, ActionMap::default().action);
        assert_eq!(gp.action_map.confirm, ActionMap::default().confirm);
        assert_eq!(gp.action_map.cancel, vec![Btn::Select]);
    }
}
