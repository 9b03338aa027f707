use std::rc::Rc;

use super::{ViewRequest, ViewRequests};
use crate::{
    components::{Component, ComponentBase, HelpPrompt},
    input::{Input, InputConfig},
    math::{Transform, Vec2},
    models::{SystemData, SystemId},
    renderer::{Color, FontSize, Renderer},
};

/// Carousel of systems. Left/right cycles, "a" opens the game list.
pub struct SystemView {
    base: ComponentBase,
    systems: Vec<Rc<SystemData>>,
    cursor: usize,
    requests: ViewRequests,
}

impl SystemView {
    pub fn new(systems: Vec<Rc<SystemData>>, screen: Vec2, requests: ViewRequests) -> Self {
        let mut view = Self {
            base: ComponentBase::new(),
            systems,
            cursor: 0,
            requests,
        };
        view.set_size(screen);
        view
    }

    pub fn selected(&self) -> Option<&Rc<SystemData>> {
        self.systems.get(self.cursor)
    }

    /// Returns false when `system` is not in the carousel.
    pub fn set_cursor_to(&mut self, system: &SystemId) -> bool {
        match self.systems.iter().position(|s| &s.name == system) {
            Some(idx) => {
                self.cursor = idx;
                true
            }
            None => false,
        }
    }

    fn step(&mut self, amount: isize) {
        if self.systems.is_empty() {
            return;
        }
        let len = self.systems.len() as isize;
        self.cursor = (self.cursor as isize + amount).rem_euclid(len) as usize;
        log::debug!("system view on {}", self.systems[self.cursor].name);
    }
}

impl Component for SystemView {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn input(&mut self, config: &InputConfig, input: Input) -> bool {
        if !input.is_press() {
            return false;
        }
        if config.is_mapped_to("left", &input) {
            self.step(-1);
            return true;
        }
        if config.is_mapped_to("right", &input) {
            self.step(1);
            return true;
        }
        if config.is_mapped_to("a", &input) {
            if let Some(system) = self.selected() {
                self.requests.push(ViewRequest::GameList(system.name.clone()));
                return true;
            }
        }
        false
    }

    fn render(&self, parent: &Transform, renderer: &mut dyn Renderer) {
        if !self.is_visible() {
            return;
        }
        let transform = parent.translated(self.position());
        renderer.set_matrix(&transform);
        renderer.draw_rect(Vec2::ZERO, self.size(), Color::BACKGROUND);

        let Some(system) = self.selected() else {
            return;
        };
        let title = system.full_name.to_uppercase();
        let large = FontSize::Large;
        let center = self.size() * 0.5;
        renderer.draw_text(
            Vec2::new(center.x - large.text_width(&title) / 2.0, center.y - large.line_height()),
            &title,
            large,
            Color::TEXT,
        );

        let count = format!("{} GAMES AVAILABLE", system.games.len());
        let small = FontSize::Small;
        renderer.draw_text(
            Vec2::new(center.x - small.text_width(&count) / 2.0, center.y + small.line_height()),
            &count,
            small,
            Color::TEXT,
        );
    }

    fn help_prompts(&self) -> Vec<HelpPrompt> {
        vec![
            HelpPrompt::new("left/right", "choose"),
            HelpPrompt::new("a", "select"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use gilrs::Button;

    use super::*;
    use crate::renderer::HeadlessRenderer;

    const SCREEN: Vec2 = Vec2::new(640.0, 480.0);

    fn systems() -> Vec<Rc<SystemData>> {
        ["nes", "snes", "megadrive"]
            .into_iter()
            .map(|name| Rc::new(SystemData::new(name, name)))
            .collect()
    }

    #[test]
    fn left_and_right_wrap() {
        let config = InputConfig::default();
        let mut view = SystemView::new(systems(), SCREEN, ViewRequests::new());
        assert!(view.input(&config, Input::pressed(Button::DPadLeft)));
        assert_eq!(view.selected().unwrap().name, "megadrive");
        view.input(&config, Input::pressed(Button::DPadRight));
        assert_eq!(view.selected().unwrap().name, "nes");
        assert!(!view.input(&config, Input::released(Button::DPadRight)));
    }

    #[test]
    fn accept_requests_game_list() {
        let config = InputConfig::default();
        let requests = ViewRequests::new();
        let mut view = SystemView::new(systems(), SCREEN, requests.clone());
        assert!(view.set_cursor_to(&"snes".to_owned()));
        assert!(!view.set_cursor_to(&"n64".to_owned()));
        view.input(&config, Input::pressed(Button::South));
        assert_eq!(requests.pop(), Some(ViewRequest::GameList("snes".to_owned())));
        assert_eq!(requests.pop(), None);
    }

    #[test]
    fn empty_carousel_ignores_input() {
        let config = InputConfig::default();
        let mut view = SystemView::new(Vec::new(), SCREEN, ViewRequests::new());
        assert!(!view.input(&config, Input::pressed(Button::South)));
        assert!(view.selected().is_none());
    }

    #[test]
    fn renders_selected_system() {
        let mut view = SystemView::new(systems(), SCREEN, ViewRequests::new());
        view.set_cursor_to(&"snes".to_owned());
        let mut renderer = HeadlessRenderer::new(SCREEN);
        view.render(&Transform::IDENTITY, &mut renderer);
        assert!(renderer.texts().any(|t| t == "SNES"));
        assert!(renderer.texts().any(|t| t == "0 GAMES AVAILABLE"));
    }
}
