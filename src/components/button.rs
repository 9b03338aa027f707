use std::rc::Rc;

use super::{Component, ComponentBase, HelpPrompt};
use crate::{
    input::{Input, InputConfig},
    math::{Transform, Vec2},
    renderer::{Color, FontSize, Renderer},
};

const PADDING: f32 = 24.0;

pub type ButtonAction = Rc<dyn Fn()>;

/// A labelled button that fires its action on "a".
pub struct ButtonComponent {
    base: ComponentBase,
    label: String,
    help_text: String,
    action: ButtonAction,
    focused: bool,
}

impl ButtonComponent {
    pub fn new(label: &str, help_text: &str, action: ButtonAction) -> Self {
        let mut base = ComponentBase::new();
        let font = FontSize::Medium;
        base.size = Vec2::new(
            font.text_width(&label.to_uppercase()) + PADDING * 2.0,
            font.line_height() + PADDING / 2.0,
        );
        Self {
            base,
            label: label.to_uppercase(),
            help_text: help_text.to_owned(),
            action,
            focused: false,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }
}

impl Component for ButtonComponent {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn input(&mut self, config: &InputConfig, input: Input) -> bool {
        if config.is_mapped_to("a", &input) && input.is_press() {
            log::debug!("button {} pressed", self.label);
            (self.action)();
            return true;
        }
        false
    }

    fn render(&self, parent: &Transform, renderer: &mut dyn Renderer) {
        if !self.is_visible() {
            return;
        }
        let transform = parent.translated(self.position());
        renderer.set_matrix(&transform);
        let (fill, text) = if self.focused {
            (Color::HIGHLIGHT, Color::WHITE)
        } else {
            (Color::BACKGROUND, Color::TEXT)
        };
        renderer.draw_rect(Vec2::ZERO, self.size(), fill);
        let font = FontSize::Medium;
        let text_pos = Vec2::new(
            (self.size().x - font.text_width(&self.label)) / 2.0,
            (self.size().y - font.line_height()) / 2.0,
        );
        renderer.draw_text(text_pos, &self.label, font, text);
    }

    fn on_focus_gained(&mut self) {
        self.focused = true;
    }

    fn on_focus_lost(&mut self) {
        self.focused = false;
    }

    fn help_prompts(&self) -> Vec<HelpPrompt> {
        vec![HelpPrompt::new("a", &self.help_text)]
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use gilrs::Button;

    use super::*;

    #[test]
    fn fires_on_accept_press_only() {
        let config = InputConfig::default();
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        let mut button = ButtonComponent::new("ok", "ok", Rc::new(move || counter.set(counter.get() + 1)));

        assert!(!button.input(&config, Input::released(Button::South)));
        assert!(!button.input(&config, Input::pressed(Button::East)));
        assert!(button.input(&config, Input::pressed(Button::South)));
        assert_eq!(hits.get(), 1);
        assert_eq!(button.label(), "OK");
        assert_eq!(button.help_prompts(), vec![HelpPrompt::new("a", "ok")]);
    }

    #[test]
    fn focus_toggles_highlight() {
        let mut button = ButtonComponent::new("cancel", "cancel", Rc::new(|| {}));
        button.on_focus_gained();
        assert!(button.is_focused());
        button.on_focus_lost();
        assert!(!button.is_focused());
    }
}
