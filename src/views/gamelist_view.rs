use std::{cell::RefCell, rc::Rc};

use anyhow::Result;

use super::{ViewRequest, ViewRequests};
use crate::{
    components::{
        Border, Component, ComponentBase, ComponentGrid, ComponentList, ComponentListRow,
        ComponentRef, HelpPrompt, Placement, ScrollableContainer, TextComponent,
    },
    input::{Input, InputConfig},
    math::Vec2,
    models::{GameMetadata, SystemData},
    renderer::{Color, FontSize},
};

const HEADER_HEIGHT_PERC: f32 = 0.15;
const LIST_WIDTH_PERC: f32 = 0.5;
const DETAIL_PADDING: f32 = 16.0;

/// Game list for one system: header on top, titles on the left and the
/// auto-scrolling details of the selected game on the right.
pub struct GameListView {
    base: ComponentBase,
    system: Rc<SystemData>,
    requests: ViewRequests,
    grid: Rc<RefCell<ComponentGrid>>,
    list: Rc<RefCell<ComponentList>>,
    detail: Rc<RefCell<TextComponent>>,
    scroll: Rc<RefCell<ScrollableContainer>>,
    shown: Option<usize>,
}

impl GameListView {
    pub fn new(system: Rc<SystemData>, screen: Vec2, scroll_delay: i32, requests: ViewRequests) -> Result<Self> {
        let mut grid = ComponentGrid::new(2, 2)?;
        grid.set_size(screen);
        grid.set_row_height_perc(0, HEADER_HEIGHT_PERC)?;
        grid.set_col_width_perc(0, LIST_WIDTH_PERC)?;

        let header = Rc::new(RefCell::new(TextComponent::new(
            &system.full_name.to_uppercase(),
            FontSize::Large,
            Color::TEXT,
        )));
        grid.set_entry(
            header,
            Placement::new(0, 0, false, false)
                .span(2, 1)
                .border(Border::BOTTOM),
        )?;

        let mut list = ComponentList::new();
        for game in &system.games {
            let title: ComponentRef = Rc::new(RefCell::new(TextComponent::new(
                &game.title,
                FontSize::Medium,
                Color::TEXT,
            )));
            let mut row = ComponentListRow::new();
            row.add_element(title, true);
            list.add_row(row);
        }
        let list = Rc::new(RefCell::new(list));
        grid.set_entry(list.clone(), Placement::new(0, 1, true, true))?;

        let mut scroll = ScrollableContainer::new(scroll_delay);
        scroll.set_auto_scroll(true);
        let scroll = Rc::new(RefCell::new(scroll));
        grid.set_entry(
            scroll.clone(),
            Placement::new(1, 1, false, true).border(Border::LEFT),
        )?;

        let detail = Rc::new(RefCell::new(TextComponent::new("", FontSize::Small, Color::TEXT)));
        {
            let mut scroll = scroll.borrow_mut();
            let width = (scroll.size().x - DETAIL_PADDING * 2.0).max(0.0);
            let mut text = detail.borrow_mut();
            text.set_wrap_width(Some(width));
            text.set_position(Vec2::new(DETAIL_PADDING, 0.0));
            drop(text);
            let detail_ref: ComponentRef = detail.clone();
            scroll.add_child(&detail_ref);
        }

        let grid = Rc::new(RefCell::new(grid));
        let mut base = ComponentBase::new();
        let grid_ref: ComponentRef = grid.clone();
        base.add_child(&grid_ref);

        let mut view = Self {
            base,
            system,
            requests,
            grid,
            list,
            detail,
            scroll,
            shown: None,
        };
        view.set_size(screen);
        view.refresh_details();
        Ok(view)
    }

    pub fn system(&self) -> &Rc<SystemData> {
        &self.system
    }

    pub fn cursor(&self) -> usize {
        self.list.borrow().cursor()
    }

    pub fn selected_game(&self) -> Option<&GameMetadata> {
        self.system.games.get(self.cursor())
    }

    pub fn detail_text(&self) -> String {
        self.detail.borrow().text().to_owned()
    }

    fn refresh_details(&mut self) {
        let cursor = self.cursor();
        if self.shown == Some(cursor) {
            return;
        }
        self.shown = Some(cursor);
        let text = self
            .selected_game()
            .map(GameMetadata::detail_text)
            .unwrap_or_default();
        self.detail.borrow_mut().set_text(&text);
        self.scroll.borrow_mut().reset();
    }
}

impl Component for GameListView {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn input(&mut self, config: &InputConfig, input: Input) -> bool {
        if input.is_press() {
            if config.is_mapped_to("b", &input) {
                self.requests
                    .push(ViewRequest::SystemView(self.system.name.clone()));
                return true;
            }
            if config.is_mapped_to("right", &input) {
                self.requests.push(ViewRequest::NextGameList);
                return true;
            }
            if config.is_mapped_to("left", &input) {
                self.requests.push(ViewRequest::PrevGameList);
                return true;
            }
        }
        self.grid.borrow_mut().input(config, input)
    }

    fn update(&mut self, delta_ms: i32) {
        self.refresh_details();
        self.base.update_children(delta_ms);
    }

    fn on_focus_gained(&mut self) {
        self.grid.borrow_mut().on_focus_gained();
    }

    fn on_focus_lost(&mut self) {
        self.grid.borrow_mut().on_focus_lost();
    }

    fn on_size_changed(&mut self) {
        let size = self.size();
        self.grid.borrow_mut().set_size(size);
        let width = (self.scroll.borrow().size().x - DETAIL_PADDING * 2.0).max(0.0);
        self.detail.borrow_mut().set_wrap_width(Some(width));
    }

    fn help_prompts(&self) -> Vec<HelpPrompt> {
        vec![
            HelpPrompt::new("left/right", "system"),
            HelpPrompt::new("up/down", "choose"),
            HelpPrompt::new("b", "back"),
        ]
    }
}
