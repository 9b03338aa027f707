use std::{cell::RefCell, rc::Rc};

use anyhow::Result;

use crate::{
    components::{Component, ComponentBase, ComponentListRow, ComponentRef, HelpPrompt, MenuComponent},
    input::{Input, InputConfig},
    math::Vec2,
    settings::SharedSettings,
    window::GuiQueue,
};

/// A titled menu of settings rows. Backing out runs every save callback,
/// writes the settings file and closes the dialog.
pub struct GuiSettings {
    base: ComponentBase,
    menu: Rc<RefCell<MenuComponent>>,
    settings: SharedSettings,
    window: GuiQueue,
    save_funcs: Vec<Box<dyn Fn()>>,
}

impl GuiSettings {
    pub fn new(title: &str, screen: Vec2, settings: SharedSettings, window: GuiQueue) -> Result<Self> {
        let menu = Rc::new(RefCell::new(MenuComponent::new(title, screen)?));
        let mut base = ComponentBase::new();
        let menu_ref: ComponentRef = menu.clone();
        base.add_child(&menu_ref);
        let mut gui = Self {
            base,
            menu,
            settings,
            window,
            save_funcs: Vec::new(),
        };
        gui.set_size(screen);
        Ok(gui)
    }

    pub fn menu(&self) -> &Rc<RefCell<MenuComponent>> {
        &self.menu
    }

    pub fn add_row(&mut self, row: ComponentListRow) {
        self.menu.borrow_mut().add_row(row, false);
    }

    pub fn add_with_label(&mut self, label: &str, comp: ComponentRef) {
        self.menu.borrow_mut().add_with_label(label, comp);
    }

    pub fn add_save_func(&mut self, func: impl Fn() + 'static) {
        self.save_funcs.push(Box::new(func));
    }

    /// Runs the save callbacks in order, then persists the settings.
    pub fn save(&self) -> Result<()> {
        if self.save_funcs.is_empty() {
            return Ok(());
        }
        for func in &self.save_funcs {
            func();
        }
        self.settings.borrow_mut().save_file()
    }

    fn close(&self) {
        if let Err(err) = self.save() {
            log::error!("failed to save settings: {:#}", err);
        }
        self.window.close(self.id());
    }
}

impl Component for GuiSettings {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn input(&mut self, config: &InputConfig, input: Input) -> bool {
        if config.is_mapped_to("b", &input) && input.is_press() {
            self.close();
            return true;
        }
        self.menu.borrow_mut().input(config, input)
    }

    fn on_focus_gained(&mut self) {
        self.menu.borrow_mut().on_focus_gained();
    }

    fn on_focus_lost(&mut self) {
        self.menu.borrow_mut().on_focus_lost();
    }

    fn help_prompts(&self) -> Vec<HelpPrompt> {
        let mut prompts = self.menu.borrow().help_prompts();
        prompts.push(HelpPrompt::new("b", "back"));
        prompts
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use gilrs::Button;

    use super::*;
    use crate::{
        components::SliderComponent,
        settings::Settings,
        window::Window,
    };

    const SCREEN: Vec2 = Vec2::new(1280.0, 720.0);

    #[test]
    fn back_runs_save_funcs_in_order_and_closes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("es_settings.yaml");
        let settings = Settings::load(&path).unwrap().shared();
        let mut window = Window::new(SCREEN, InputConfig::default());

        let mut gui = GuiSettings::new("sound", SCREEN, settings.clone(), window.queue()).unwrap();
        let order = Rc::new(RefCell::new(Vec::new()));
        for i in 0..2 {
            let order = order.clone();
            let settings = settings.clone();
            gui.add_save_func(move || {
                order.borrow_mut().push(i);
                settings.borrow_mut().set_string("Volume", &i.to_string());
            });
        }
        window.push_gui(Rc::new(RefCell::new(gui)));

        window.input(Input::pressed(Button::East));
        assert_eq!(*order.borrow(), vec![0, 1]);
        assert_eq!(window.gui_count(), 0);
        assert!(!settings.borrow().is_dirty());
        let reloaded = Settings::load(&path).unwrap();
        assert_eq!(reloaded.get_string("Volume"), "1");
    }

    #[test]
    fn no_save_funcs_skips_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("es_settings.yaml");
        let settings = Settings::load(&path).unwrap().shared();
        let gui = GuiSettings::new("empty", SCREEN, settings, GuiQueue::new()).unwrap();
        gui.save().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn other_input_reaches_menu_rows() {
        let config = InputConfig::default();
        let settings = Settings::in_memory().shared();
        let mut gui = GuiSettings::new("video", SCREEN, settings, GuiQueue::new()).unwrap();
        let slider = Rc::new(RefCell::new(SliderComponent::new(0.0, 10.0, 1.0, "")));
        slider.borrow_mut().set_value(5.0);
        gui.add_with_label("brightness", slider.clone());
        gui.on_focus_gained();

        assert!(gui.input(&config, Input::pressed(Button::DPadRight)));
        assert_eq!(slider.borrow().value(), 6.0);
    }

    #[test]
    fn help_ends_with_back() {
        let settings = Settings::in_memory().shared();
        let fired = Rc::new(Cell::new(false));
        let mut gui = GuiSettings::new("x", SCREEN, settings, GuiQueue::new()).unwrap();
        let flag = fired.clone();
        gui.add_save_func(move || flag.set(true));
        let prompts = gui.help_prompts();
        assert_eq!(prompts.last(), Some(&HelpPrompt::new("b", "back")));
        assert!(!fired.get());
    }
}
