use std::{cell::RefCell, rc::Rc};

use anyhow::Result;

use super::{
    ButtonComponent, Component, ComponentBase, ComponentGrid, ComponentList, ComponentListRow,
    ComponentRef, HelpPrompt, Placement, TextComponent,
};
use crate::{
    math::{Transform, Vec2},
    renderer::{Color, FontSize, Renderer},
};

const TITLE_PADDING: f32 = 16.0;
const BUTTON_ROW_HEIGHT: f32 = 64.0;
const BUTTON_SPACING: f32 = 12.0;
const MAX_HEIGHT_PERC: f32 = 0.75;
const WIDTH_PERC: f32 = 0.9;

struct MenuButton {
    name: String,
    help_text: String,
    action: Rc<dyn Fn()>,
}

/// Titled list of rows with a row of buttons underneath, laid out on a 1x3
/// grid. Centered on the screen it was built for.
pub struct MenuComponent {
    base: ComponentBase,
    screen: Vec2,
    grid: Rc<RefCell<ComponentGrid>>,
    title: Rc<RefCell<TextComponent>>,
    list: Rc<RefCell<ComponentList>>,
    buttons: Vec<MenuButton>,
    button_grid: Option<Rc<RefCell<ComponentGrid>>>,
}

impl MenuComponent {
    pub fn new(title: &str, screen: Vec2) -> Result<Self> {
        let grid = Rc::new(RefCell::new(ComponentGrid::new(1, 3)?));
        let title = Rc::new(RefCell::new(TextComponent::new(
            &title.to_uppercase(),
            FontSize::Large,
            Color::TEXT,
        )));
        let list = Rc::new(RefCell::new(ComponentList::new()));

        {
            let mut grid = grid.borrow_mut();
            grid.set_entry(title.clone(), Placement::new(0, 0, false, false))?;
            grid.set_entry(list.clone(), Placement::new(0, 1, true, true))?;
        }

        let mut base = ComponentBase::new();
        let grid_ref: ComponentRef = grid.clone();
        base.add_child(&grid_ref);

        let mut menu = Self {
            base,
            screen,
            grid,
            title,
            list,
            buttons: Vec::new(),
            button_grid: None,
        };
        menu.update_size();
        Ok(menu)
    }

    pub fn title(&self) -> String {
        self.title.borrow().text().to_owned()
    }

    pub fn set_title(&mut self, title: &str) {
        self.title.borrow_mut().set_text(&title.to_uppercase());
        self.update_size();
    }

    pub fn list(&self) -> &Rc<RefCell<ComponentList>> {
        &self.list
    }

    pub fn add_row(&mut self, row: ComponentListRow, set_cursor_here: bool) {
        {
            let mut list = self.list.borrow_mut();
            list.add_row(row);
            if set_cursor_here {
                let last = list.len() - 1;
                list.set_cursor(last);
            }
        }
        self.update_size();
    }

    /// Adds a row of `label` on the left and `comp` on the right.
    pub fn add_with_label(&mut self, label: &str, comp: ComponentRef) {
        let text: ComponentRef = Rc::new(RefCell::new(TextComponent::new(
            &label.to_uppercase(),
            FontSize::Medium,
            Color::TEXT,
        )));
        let mut row = ComponentListRow::new();
        row.add_element(text, true).add_element(comp, false);
        self.add_row(row, false);
    }

    pub fn add_button(&mut self, name: &str, help_text: &str, action: impl Fn() + 'static) -> Result<()> {
        self.buttons.push(MenuButton {
            name: name.to_owned(),
            help_text: help_text.to_owned(),
            action: Rc::new(action),
        });
        self.rebuild_buttons()?;
        self.update_size();
        Ok(())
    }

    pub fn button_labels(&self) -> Vec<String> {
        self.buttons.iter().map(|b| b.name.to_uppercase()).collect()
    }

    fn rebuild_buttons(&mut self) -> Result<()> {
        let mut grid = self.grid.borrow_mut();
        if let Some(old) = self.button_grid.take() {
            let old: ComponentRef = old;
            grid.remove_entry(&old);
        }
        if self.buttons.is_empty() {
            return Ok(());
        }

        let mut row = ComponentGrid::new(self.buttons.len() as i32, 1)?;
        let mut widths = Vec::with_capacity(self.buttons.len());
        let mut height: f32 = 0.0;
        for (col, entry) in self.buttons.iter().enumerate() {
            let button = ButtonComponent::new(&entry.name, &entry.help_text, entry.action.clone());
            let size = button.size();
            widths.push(size.x + BUTTON_SPACING);
            height = height.max(size.y);
            row.set_entry(
                Rc::new(RefCell::new(button)),
                Placement::new(col as i32, 0, true, false),
            )?;
        }
        let total: f32 = widths.iter().sum();
        row.set_size(Vec2::new(total, height));
        for (col, width) in widths.iter().enumerate() {
            row.set_col_width_perc(col as i32, width / total)?;
        }

        let row = Rc::new(RefCell::new(row));
        grid.set_entry(row.clone(), Placement::new(0, 2, true, false))?;
        self.button_grid = Some(row);
        Ok(())
    }

    fn update_size(&mut self) {
        let title_height = self.title.borrow().size().y + TITLE_PADDING * 2.0;
        let list_height = self.list.borrow().total_row_height();
        let max_height = self.screen.y * MAX_HEIGHT_PERC;
        let height = (title_height + list_height + BUTTON_ROW_HEIGHT).min(max_height);
        let width = self.screen.x * WIDTH_PERC;

        self.set_size(Vec2::new(width, height));
        self.set_position(Vec2::new(
            (self.screen.x - width) / 2.0,
            (self.screen.y - height) / 2.0,
        ));
    }
}

impl Component for MenuComponent {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn render(&self, parent: &Transform, renderer: &mut dyn Renderer) {
        if !self.is_visible() {
            return;
        }
        let transform = parent.translated(self.position());
        renderer.set_matrix(&transform);
        renderer.draw_rect(Vec2::ZERO, self.size(), Color::BACKGROUND);
        self.base.render_children(&transform, renderer);
    }

    fn on_focus_gained(&mut self) {
        self.grid.borrow_mut().on_focus_gained();
    }

    fn on_focus_lost(&mut self) {
        self.grid.borrow_mut().on_focus_lost();
    }

    fn on_size_changed(&mut self) {
        let size = self.size();
        if size.y <= 0.0 {
            return;
        }
        let title_height = self.title.borrow().size().y + TITLE_PADDING * 2.0;
        let mut grid = self.grid.borrow_mut();
        for (row, height) in [(0, title_height), (2, BUTTON_ROW_HEIGHT)] {
            if let Err(err) = grid.set_row_height_perc(row, (height / size.y).min(1.0)) {
                log::warn!("menu layout: {:#}", err);
            }
        }
        grid.set_size(size);
    }

    fn help_prompts(&self) -> Vec<HelpPrompt> {
        self.grid.borrow().help_prompts()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use gilrs::Button;

    use super::super::testing::Probe;
    use super::*;
    use crate::input::{Input, InputConfig};

    const SCREEN: Vec2 = Vec2::new(1280.0, 720.0);

    fn labelled_menu(rows: usize) -> MenuComponent {
        let mut menu = MenuComponent::new("options", SCREEN).unwrap();
        for i in 0..rows {
            let (comp, _) = Probe::shared(Vec2::new(60.0, 30.0));
            menu.add_with_label(&format!("row {}", i), comp);
        }
        menu
    }

    #[test]
    fn title_is_uppercased() {
        let menu = labelled_menu(0);
        assert_eq!(menu.title(), "OPTIONS");
    }

    #[test]
    fn height_follows_rows_until_capped() {
        let short = labelled_menu(2);
        let tall = labelled_menu(40);
        assert!(short.size().y < tall.size().y);
        assert_eq!(tall.size().y, SCREEN.y * MAX_HEIGHT_PERC);
        assert_eq!(short.size().x, SCREEN.x * WIDTH_PERC);
    }

    #[test]
    fn menu_is_centered() {
        let menu = labelled_menu(3);
        let pos = menu.position();
        let size = menu.size();
        assert_eq!(pos.x * 2.0 + size.x, SCREEN.x);
        assert_eq!(pos.y * 2.0 + size.y, SCREEN.y);
    }

    #[test]
    fn buttons_are_rebuilt_on_each_add() {
        let mut menu = labelled_menu(1);
        menu.add_button("ok", "ok", || {}).unwrap();
        menu.add_button("cancel", "cancel", || {}).unwrap();
        assert_eq!(menu.button_labels(), vec!["OK", "CANCEL"]);
        let grid = menu.grid.borrow();
        assert_eq!(grid.entries().len(), 3);
        let row = grid.entry_at(0, 2).unwrap().component.clone();
        drop(grid);
        let button_grid = menu.button_grid.as_ref().unwrap();
        let button_grid_ref: ComponentRef = button_grid.clone();
        assert!(super::super::same_component(&row, &button_grid_ref));
        assert_eq!(button_grid.borrow().entries().len(), 2);
    }

    #[test]
    fn down_from_last_row_reaches_buttons() {
        let config = InputConfig::default();
        let pressed = Rc::new(Cell::new(false));
        let flag = pressed.clone();
        let mut menu = labelled_menu(2);
        menu.add_button("ok", "ok", move || flag.set(true)).unwrap();
        menu.on_focus_gained();

        assert!(menu.input(&config, Input::pressed(Button::DPadDown)));
        assert_eq!(menu.list().borrow().cursor(), 1);
        // list is at its edge, the grid moves on to the button row
        assert!(menu.input(&config, Input::pressed(Button::DPadDown)));
        assert_eq!(menu.grid.borrow().cursor().y, 2);
        assert!(menu.input(&config, Input::pressed(Button::South)));
        assert!(pressed.get());
    }

    #[test]
    fn renders_background_and_title() {
        use crate::renderer::HeadlessRenderer;

        let menu = labelled_menu(1);
        let mut renderer = HeadlessRenderer::new(SCREEN);
        menu.render(&Transform::IDENTITY, &mut renderer);
        assert!(renderer.texts().any(|t| t == "OPTIONS"));
        assert!(renderer.texts().any(|t| t == "ROW 0"));
    }
}
