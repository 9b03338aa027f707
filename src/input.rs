use anyhow::{bail, Result};
use gilrs::Button;
use std::collections::{BTreeMap, HashMap};

/// A single button transition. `value` is nonzero for a press and zero for a
/// release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Input {
    pub button: Button,
    pub value: i32,
}

impl Input {
    pub fn pressed(button: Button) -> Self {
        Self { button, value: 1 }
    }

    pub fn released(button: Button) -> Self {
        Self { button, value: 0 }
    }

    pub fn is_press(&self) -> bool {
        self.value != 0
    }
}

/// Maps logical action names ("up", "a", "pageup", ...) to physical buttons.
#[derive(Debug, Clone)]
pub struct InputConfig {
    mapping: HashMap<String, Vec<Button>>,
}

impl Default for InputConfig {
    fn default() -> Self {
        let mut config = Self::empty();
        config
            .map("up", Button::DPadUp)
            .map("down", Button::DPadDown)
            .map("left", Button::DPadLeft)
            .map("right", Button::DPadRight)
            .map("a", Button::South)
            .map("b", Button::East)
            .map("x", Button::North)
            .map("y", Button::West)
            .map("start", Button::Start)
            .map("select", Button::Select)
            .map("pageup", Button::LeftTrigger)
            .map("pagedown", Button::RightTrigger)
            .map("quit", Button::Mode);
        config
    }
}

impl InputConfig {
    pub fn empty() -> Self {
        Self {
            mapping: HashMap::new(),
        }
    }

    /// Builds a mapping from button names, e.g. `{"a": ["South"]}`. Actions
    /// missing from `names` keep their default buttons.
    pub fn from_names(names: &BTreeMap<String, Vec<String>>) -> Result<Self> {
        let mut config = Self::default();
        for (action, buttons) in names {
            let mut parsed = Vec::with_capacity(buttons.len());
            for name in buttons {
                parsed.push(parse_button(name)?);
            }
            config.mapping.insert(action.to_lowercase(), parsed);
        }
        Ok(config)
    }

    pub fn map(&mut self, action: &str, button: Button) -> &mut Self {
        self.mapping
            .entry(action.to_owned())
            .or_default()
            .push(button);
        self
    }

    pub fn is_mapped_to(&self, action: &str, input: &Input) -> bool {
        self.mapping
            .get(action)
            .is_some_and(|buttons| buttons.contains(&input.button))
    }

    /// Every action the input is bound to.
    pub fn mapped_actions(&self, input: &Input) -> Vec<&str> {
        let mut actions: Vec<&str> = self
            .mapping
            .iter()
            .filter(|(_, buttons)| buttons.contains(&input.button))
            .map(|(action, _)| action.as_str())
            .collect();
        actions.sort_unstable();
        actions
    }
}

fn parse_button(name: &str) -> Result<Button> {
    let button = match name {
        "South" => Button::South,
        "East" => Button::East,
        "North" => Button::North,
        "West" => Button::West,
        "C" => Button::C,
        "Z" => Button::Z,
        "LeftTrigger" => Button::LeftTrigger,
        "LeftTrigger2" => Button::LeftTrigger2,
        "RightTrigger" => Button::RightTrigger,
        "RightTrigger2" => Button::RightTrigger2,
        "Select" => Button::Select,
        "Start" => Button::Start,
        "Mode" => Button::Mode,
        "LeftThumb" => Button::LeftThumb,
        "RightThumb" => Button::RightThumb,
        "DPadUp" => Button::DPadUp,
        "DPadDown" => Button::DPadDown,
        "DPadLeft" => Button::DPadLeft,
        "DPadRight" => Button::DPadRight,
        other => bail!("unknown button name {}", other),
    };
    Ok(button)
}
