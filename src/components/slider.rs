use super::{Component, ComponentBase, HelpPrompt};
use crate::{
    input::{Input, InputConfig},
    math::{Transform, Vec2},
    renderer::{Color, FontSize, Renderer},
};

const MOVE_REPEAT_DELAY: i32 = 500;
const MOVE_REPEAT_RATE: i32 = 40;
const BAR_WIDTH: f32 = 180.0;

/// Numeric slider changed with left/right; holding repeats.
pub struct SliderComponent {
    base: ComponentBase,
    min: f32,
    max: f32,
    increment: f32,
    value: f32,
    suffix: String,
    move_rate: f32,
    move_accumulator: i32,
}

impl SliderComponent {
    pub fn new(min: f32, max: f32, increment: f32, suffix: &str) -> Self {
        debug_assert!(min < max, "slider range is empty");
        let mut base = ComponentBase::new();
        base.size = Vec2::new(BAR_WIDTH, FontSize::Medium.line_height());
        Self {
            base,
            min,
            max,
            increment,
            value: (min + max) / 2.0,
            suffix: suffix.to_owned(),
            move_rate: 0.0,
            move_accumulator: 0,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn set_value(&mut self, value: f32) {
        self.value = value.clamp(self.min, self.max);
    }

    fn value_label(&self) -> String {
        format!("{:.0}{}", self.value, self.suffix)
    }
}

impl Component for SliderComponent {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn input(&mut self, config: &InputConfig, input: Input) -> bool {
        let sign = if config.is_mapped_to("left", &input) {
            -1.0
        } else if config.is_mapped_to("right", &input) {
            1.0
        } else {
            return false;
        };

        if input.is_press() {
            self.move_rate = sign * self.increment;
            self.set_value(self.value + self.move_rate);
            self.move_accumulator = -MOVE_REPEAT_DELAY;
        } else {
            self.move_rate = 0.0;
        }
        true
    }

    fn update(&mut self, delta_ms: i32) {
        if self.move_rate != 0.0 {
            self.move_accumulator += delta_ms;
            while self.move_accumulator >= MOVE_REPEAT_RATE {
                self.set_value(self.value + self.move_rate);
                self.move_accumulator -= MOVE_REPEAT_RATE;
            }
        }
        self.base.update_children(delta_ms);
    }

    fn render(&self, parent: &Transform, renderer: &mut dyn Renderer) {
        if !self.is_visible() {
            return;
        }
        let transform = parent.translated(self.position());
        renderer.set_matrix(&transform);

        let label = self.value_label();
        let font = FontSize::Medium;
        let label_width = font.text_width(&label);
        let bar_width = (self.size().x - label_width - 8.0).max(0.0);
        let mid = self.size().y / 2.0;

        renderer.draw_rect(Vec2::new(0.0, mid - 1.0), Vec2::new(bar_width, 2.0), Color::TEXT);
        let knob_x = (self.value - self.min) / (self.max - self.min) * bar_width;
        renderer.draw_rect(
            Vec2::new(knob_x - 6.0, mid - 6.0),
            Vec2::new(12.0, 12.0),
            Color::HIGHLIGHT,
        );
        renderer.draw_text(Vec2::new(bar_width + 8.0, 0.0), &label, font, Color::TEXT);
    }

    fn help_prompts(&self) -> Vec<HelpPrompt> {
        vec![HelpPrompt::new("left/right", "change")]
    }
}

#[cfg(test)]
mod tests {
    use gilrs::Button;

    use super::*;

    #[test]
    fn press_steps_and_clamps() {
        let config = InputConfig::default();
        let mut slider = SliderComponent::new(0.0, 5.0, 1.0, " ");
        slider.set_value(4.0);
        assert!(slider.input(&config, Input::pressed(Button::DPadRight)));
        assert_eq!(slider.value(), 5.0);
        assert!(slider.input(&config, Input::released(Button::DPadRight)));
        assert!(slider.input(&config, Input::pressed(Button::DPadRight)));
        assert_eq!(slider.value(), 5.0);
        assert!(!slider.input(&config, Input::pressed(Button::DPadUp)));
    }

    #[test]
    fn holding_repeats_after_delay() {
        let config = InputConfig::default();
        let mut slider = SliderComponent::new(0.0, 100.0, 1.0, "");
        slider.set_value(0.0);
        slider.input(&config, Input::pressed(Button::DPadRight));
        assert_eq!(slider.value(), 1.0);

        slider.update(499);
        assert_eq!(slider.value(), 1.0);
        // 1 ms to finish the delay, then two repeat periods
        slider.update(1 + 2 * MOVE_REPEAT_RATE);
        assert_eq!(slider.value(), 3.0);

        slider.input(&config, Input::released(Button::DPadRight));
        slider.update(1000);
        assert_eq!(slider.value(), 3.0);
    }

    #[test]
    fn value_label_uses_suffix() {
        let mut slider = SliderComponent::new(0.0, 5.0, 1.0, " ");
        slider.set_value(3.0);
        assert_eq!(slider.value_label(), "3 ");
        assert_eq!(slider.help_prompts(), vec![HelpPrompt::new("left/right", "change")]);
    }
}
