use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use anyhow::{anyhow, bail, Result};

use super::{GameListView, SystemView, ViewRequest, ViewRequests};
use crate::{
    components::{Component, ComponentBase, ComponentRef, HelpPrompt},
    input::{Input, InputConfig},
    math::{Transform, Vec2},
    models::{SystemData, SystemId},
    renderer::{Color, FontSize, Renderer},
};

/// Camera slide between views, in ms.
pub const TRANSITION_DURATION: i32 = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Nothing,
    StartScreen,
    SystemSelect(SystemId),
    GameList(SystemId),
}

impl ViewState {
    pub fn system(&self) -> Option<&SystemId> {
        match self {
            ViewState::SystemSelect(sys) | ViewState::GameList(sys) => Some(sys),
            ViewState::Nothing | ViewState::StartScreen => None,
        }
    }
}

struct CameraSlide {
    from: Vec2,
    to: Vec2,
    elapsed: i32,
}

/// Owns the system carousel and one game list per system, laid out on a
/// large canvas. Switching views slides the camera across it.
pub struct ViewController {
    base: ComponentBase,
    screen: Vec2,
    scroll_delay: i32,
    systems: Vec<Rc<SystemData>>,
    requests: ViewRequests,
    system_view: Rc<RefCell<SystemView>>,
    game_lists: BTreeMap<SystemId, Rc<RefCell<GameListView>>>,
    current: Option<ComponentRef>,
    state: ViewState,
    camera: Vec2,
    slide: Option<CameraSlide>,
    focused: bool,
}

impl ViewController {
    pub fn new(systems: Vec<Rc<SystemData>>, screen: Vec2, scroll_delay: i32) -> Self {
        let requests = ViewRequests::new();
        let mut system_view = SystemView::new(systems.clone(), screen, requests.clone());
        system_view.set_position(Vec2::new(0.0, screen.y));

        let mut controller = Self {
            base: ComponentBase::new(),
            screen,
            scroll_delay,
            systems,
            requests,
            system_view: Rc::new(RefCell::new(system_view)),
            game_lists: BTreeMap::new(),
            current: None,
            state: ViewState::Nothing,
            camera: Vec2::ZERO,
            slide: None,
            focused: false,
        };
        controller.set_size(screen);
        controller
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn camera(&self) -> Vec2 {
        self.camera
    }

    pub fn is_animating(&self) -> bool {
        self.slide.is_some()
    }

    pub fn requests(&self) -> ViewRequests {
        self.requests.clone()
    }

    pub fn system_view(&self) -> &Rc<RefCell<SystemView>> {
        &self.system_view
    }

    /// The cached game list for `system`, if it has been built.
    pub fn game_list_view(&self, system: &SystemId) -> Option<Rc<RefCell<GameListView>>> {
        self.game_lists.get(system).cloned()
    }

    /// Builds every game list up front.
    pub fn preload(&mut self) -> Result<()> {
        for idx in 0..self.systems.len() {
            let name = self.systems[idx].name.clone();
            self.get_game_list_view(&name)?;
        }
        log::info!("preloaded {} game lists", self.game_lists.len());
        Ok(())
    }

    pub fn go_to_start(&mut self) -> Result<()> {
        match self.systems.first() {
            Some(first) => {
                let name = first.name.clone();
                self.go_to_system_view(&name)
            }
            None => {
                log::warn!("no systems to show");
                self.set_current(None);
                self.state = ViewState::StartScreen;
                Ok(())
            }
        }
    }

    pub fn go_to_system_view(&mut self, system: &SystemId) -> Result<()> {
        if !self.system_view.borrow_mut().set_cursor_to(system) {
            bail!("unknown system {}", system);
        }
        let view: ComponentRef = self.system_view.clone();
        self.state = ViewState::SystemSelect(system.clone());
        self.set_current(Some(view));
        Ok(())
    }

    pub fn go_to_game_list(&mut self, system: &SystemId) -> Result<()> {
        let view: ComponentRef = self.get_game_list_view(system)?;
        self.system_view.borrow_mut().set_cursor_to(system);
        self.state = ViewState::GameList(system.clone());
        self.set_current(Some(view));
        Ok(())
    }

    pub fn go_to_next_game_list(&mut self) -> Result<()> {
        self.step_game_list(1)
    }

    pub fn go_to_prev_game_list(&mut self) -> Result<()> {
        self.step_game_list(-1)
    }

    /// Throws away the cached game list for `system`, rebuilding it right
    /// away if it is on screen.
    pub fn reload_game_list_view(&mut self, system: &SystemId) -> Result<()> {
        if self.game_lists.remove(system).is_none() {
            log::debug!("no game list cached for {}", system);
        }
        if self.state == ViewState::GameList(system.clone()) {
            let view: ComponentRef = self.get_game_list_view(system)?;
            if self.focused {
                view.borrow_mut().on_focus_gained();
            }
            self.current = Some(view);
        }
        Ok(())
    }

    fn step_game_list(&mut self, amount: isize) -> Result<()> {
        let ViewState::GameList(current) = &self.state else {
            bail!("not viewing a game list");
        };
        let idx = self.system_index(current)?;
        let len = self.systems.len() as isize;
        let next = (idx as isize + amount).rem_euclid(len) as usize;
        let name = self.systems[next].name.clone();
        self.go_to_game_list(&name)
    }

    fn system_index(&self, system: &SystemId) -> Result<usize> {
        self.systems
            .iter()
            .position(|s| &s.name == system)
            .ok_or_else(|| anyhow!("unknown system {}", system))
    }

    fn get_game_list_view(&mut self, system: &SystemId) -> Result<Rc<RefCell<GameListView>>> {
        if let Some(view) = self.game_lists.get(system) {
            return Ok(view.clone());
        }
        let idx = self.system_index(system)?;
        let mut view = GameListView::new(
            self.systems[idx].clone(),
            self.screen,
            self.scroll_delay,
            self.requests.clone(),
        )?;
        view.set_position(Vec2::new(idx as f32 * self.screen.x, self.screen.y * 2.0));
        let view = Rc::new(RefCell::new(view));
        self.game_lists.insert(system.clone(), view.clone());
        log::debug!("created game list for {}", system);
        Ok(view)
    }

    fn set_current(&mut self, view: Option<ComponentRef>) {
        if self.focused {
            if let Some(old) = self.current.as_ref() {
                old.borrow_mut().on_focus_lost();
            }
            if let Some(new) = view.as_ref() {
                new.borrow_mut().on_focus_gained();
            }
        }
        match view.as_ref() {
            Some(new) => {
                let target = new.borrow().position();
                self.slide = Some(CameraSlide {
                    from: self.camera,
                    to: target,
                    elapsed: 0,
                });
            }
            None => self.slide = None,
        }
        self.current = view;
    }

    fn advance_camera(&mut self, delta_ms: i32) {
        let Some(slide) = self.slide.as_mut() else {
            return;
        };
        slide.elapsed += delta_ms;
        if slide.elapsed >= TRANSITION_DURATION {
            self.camera = slide.to;
            self.slide = None;
            return;
        }
        let t = slide.elapsed as f32 / TRANSITION_DURATION as f32;
        // ease out
        let t = 1.0 - (1.0 - t) * (1.0 - t);
        self.camera = slide.from + (slide.to - slide.from) * t;
    }

    fn process_requests(&mut self) {
        while let Some(request) = self.requests.pop() {
            let result = match &request {
                ViewRequest::GameList(sys) => self.go_to_game_list(sys),
                ViewRequest::SystemView(sys) => self.go_to_system_view(sys),
                ViewRequest::NextGameList => self.go_to_next_game_list(),
                ViewRequest::PrevGameList => self.go_to_prev_game_list(),
            };
            if let Err(err) = result {
                log::warn!("view request {:?} failed: {:#}", request, err);
            }
        }
    }

    fn is_on_screen(&self, view: &ComponentRef) -> bool {
        let view = view.borrow();
        let pos = view.position() - self.camera;
        let size = view.size();
        pos.x < self.screen.x && pos.x + size.x > 0.0 && pos.y < self.screen.y && pos.y + size.y > 0.0
    }
}

impl Component for ViewController {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn input(&mut self, config: &InputConfig, input: Input) -> bool {
        // locked while sliding
        if self.slide.is_some() {
            return true;
        }
        let consumed = match self.current.clone() {
            Some(view) => view.borrow_mut().input(config, input),
            None => false,
        };
        self.process_requests();
        consumed
    }

    fn update(&mut self, delta_ms: i32) {
        self.advance_camera(delta_ms);
        if let Some(view) = self.current.clone() {
            view.borrow_mut().update(delta_ms);
        }
        self.process_requests();
    }

    fn render(&self, parent: &Transform, renderer: &mut dyn Renderer) {
        let transform = parent.translated(-self.camera);

        let system_view: ComponentRef = self.system_view.clone();
        if self.is_on_screen(&system_view) {
            system_view.borrow().render(&transform, renderer);
        }
        for view in self.game_lists.values() {
            let view: ComponentRef = view.clone();
            if self.is_on_screen(&view) {
                view.borrow().render(&transform, renderer);
            }
        }

        if self.state == ViewState::StartScreen {
            let text = "NO GAMES FOUND";
            let font = FontSize::Large;
            renderer.set_matrix(parent);
            renderer.draw_text(
                Vec2::new(
                    (self.screen.x - font.text_width(text)) / 2.0,
                    (self.screen.y - font.line_height()) / 2.0,
                ),
                text,
                font,
                Color::TEXT,
            );
        }
    }

    fn on_focus_gained(&mut self) {
        self.focused = true;
        if let Some(view) = self.current.as_ref() {
            view.borrow_mut().on_focus_gained();
        }
    }

    fn on_focus_lost(&mut self) {
        if let Some(view) = self.current.as_ref() {
            view.borrow_mut().on_focus_lost();
        }
        self.focused = false;
    }

    fn help_prompts(&self) -> Vec<HelpPrompt> {
        self.current
            .as_ref()
            .map(|view| view.borrow().help_prompts())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use gilrs::Button;

    use super::*;
    use crate::{models::GameMetadata, renderer::HeadlessRenderer};

    const SCREEN: Vec2 = Vec2::new(640.0, 480.0);

    fn system(name: &str, games: &[&str]) -> Rc<SystemData> {
        let mut sys = SystemData::new(name, name);
        sys.games = games.iter().map(|g| GameMetadata::new(*g)).collect();
        Rc::new(sys)
    }

    fn controller() -> ViewController {
        let systems = vec![
            system("nes", &["Metroid", "Zelda"]),
            system("snes", &["Super Metroid"]),
            system("megadrive", &["Sonic"]),
        ];
        let mut controller = ViewController::new(systems, SCREEN, 1000);
        controller.on_focus_gained();
        controller
    }

    /// Feeds one press and finishes any slide it starts.
    fn press(controller: &mut ViewController, button: Button) {
        let config = InputConfig::default();
        controller.input(&config, Input::pressed(button));
        controller.input(&config, Input::released(button));
        controller.update(TRANSITION_DURATION);
    }

    #[test]
    fn starts_on_first_system() {
        let mut controller = controller();
        assert_eq!(controller.state(), &ViewState::Nothing);
        controller.go_to_start().unwrap();
        assert_eq!(controller.state(), &ViewState::SystemSelect("nes".to_owned()));
        assert_eq!(controller.state().system().map(String::as_str), Some("nes"));
    }

    #[test]
    fn empty_catalog_shows_start_screen() {
        let mut controller = ViewController::new(Vec::new(), SCREEN, 0);
        controller.go_to_start().unwrap();
        assert_eq!(controller.state(), &ViewState::StartScreen);
        assert_eq!(controller.state().system(), None);

        let mut renderer = HeadlessRenderer::new(SCREEN);
        controller.render(&Transform::IDENTITY, &mut renderer);
        assert!(renderer.texts().any(|t| t == "NO GAMES FOUND"));
    }

    #[test]
    fn camera_slides_and_locks_input() {
        let config = InputConfig::default();
        let mut controller = controller();
        controller.go_to_start().unwrap();
        assert!(controller.is_animating());

        // input is swallowed mid slide
        controller.update(TRANSITION_DURATION / 2);
        let halfway = controller.camera();
        assert!(halfway.y > 0.0 && halfway.y < SCREEN.y);
        assert!(controller.input(&config, Input::pressed(Button::DPadRight)));
        assert_eq!(controller.system_view().borrow().selected().unwrap().name, "nes");

        controller.update(TRANSITION_DURATION / 2);
        assert!(!controller.is_animating());
        assert_eq!(controller.camera(), Vec2::new(0.0, SCREEN.y));
    }

    #[test]
    fn views_drive_navigation_through_requests() {
        let mut controller = controller();
        controller.go_to_start().unwrap();
        controller.update(TRANSITION_DURATION);

        press(&mut controller, Button::DPadRight);
        press(&mut controller, Button::South);
        assert_eq!(controller.state(), &ViewState::GameList("snes".to_owned()));
        assert_eq!(controller.camera(), Vec2::new(SCREEN.x, SCREEN.y * 2.0));

        press(&mut controller, Button::East);
        assert_eq!(controller.state(), &ViewState::SystemSelect("snes".to_owned()));
    }

    #[test]
    fn next_and_prev_game_list_wrap() {
        let mut controller = controller();
        controller.go_to_game_list(&"megadrive".to_owned()).unwrap();
        controller.go_to_next_game_list().unwrap();
        assert_eq!(controller.state(), &ViewState::GameList("nes".to_owned()));
        controller.go_to_prev_game_list().unwrap();
        assert_eq!(controller.state(), &ViewState::GameList("megadrive".to_owned()));

        controller.go_to_system_view(&"nes".to_owned()).unwrap();
        assert!(controller.go_to_next_game_list().is_err());
    }

    #[test]
    fn unknown_systems_are_rejected() {
        let mut controller = controller();
        assert!(controller.go_to_game_list(&"n64".to_owned()).is_err());
        assert!(controller.go_to_system_view(&"n64".to_owned()).is_err());
        assert_eq!(controller.state(), &ViewState::Nothing);
    }

    #[test]
    fn game_lists_are_cached_until_reloaded() {
        let mut controller = controller();
        let nes = "nes".to_owned();
        assert!(controller.game_list_view(&nes).is_none());
        controller.go_to_game_list(&nes).unwrap();
        let first = controller.game_list_view(&nes).unwrap();
        controller.go_to_system_view(&nes).unwrap();
        controller.go_to_game_list(&nes).unwrap();
        assert!(Rc::ptr_eq(&first, &controller.game_list_view(&nes).unwrap()));

        controller.reload_game_list_view(&nes).unwrap();
        let second = controller.game_list_view(&nes).unwrap();
        assert!(!Rc::ptr_eq(&first, &second));
        assert_eq!(controller.state(), &ViewState::GameList(nes));
    }

    #[test]
    fn preload_builds_every_list() {
        let mut controller = controller();
        controller.preload().unwrap();
        for name in ["nes", "snes", "megadrive"] {
            assert!(controller.game_list_view(&name.to_owned()).is_some());
        }
    }

    #[test]
    fn help_comes_from_current_view() {
        let mut controller = controller();
        assert!(controller.help_prompts().is_empty());
        controller.go_to_game_list(&"nes".to_owned()).unwrap();
        assert!(controller
            .help_prompts()
            .contains(&HelpPrompt::new("b", "back")));
    }
}
