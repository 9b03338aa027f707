use super::{Component, ComponentBase, ComponentRef, HelpPrompt};
use crate::{
    input::{Input, InputConfig},
    math::{Transform, Vec2},
    renderer::{Color, Renderer},
};

const ROW_PADDING: f32 = 12.0;
const ELEMENT_SPACING: f32 = 16.0;

pub type RowInputHandler = Box<dyn FnMut(&InputConfig, Input) -> bool>;

pub struct RowElement {
    pub component: ComponentRef,
    /// Takes whatever width the fixed elements leave over.
    pub resize_width: bool,
}

#[derive(Default)]
pub struct ComponentListRow {
    elements: Vec<RowElement>,
    input_handler: Option<RowInputHandler>,
}

impl ComponentListRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_element(&mut self, component: ComponentRef, resize_width: bool) -> &mut Self {
        self.elements.push(RowElement {
            component,
            resize_width,
        });
        self
    }

    pub fn elements(&self) -> &[RowElement] {
        &self.elements
    }

    pub fn set_input_handler(&mut self, handler: RowInputHandler) {
        self.input_handler = Some(handler);
    }

    /// Runs `func` when "a" is pressed on this row.
    pub fn make_accept_input_handler(&mut self, func: impl Fn() + 'static) {
        self.input_handler = Some(Box::new(move |config, input| {
            if config.is_mapped_to("a", &input) && input.is_press() {
                func();
                return true;
            }
            false
        }));
    }

    fn height(&self) -> f32 {
        self.elements
            .iter()
            .map(|e| e.component.borrow().size().y)
            .fold(0.0, f32::max)
            + ROW_PADDING * 2.0
    }
}

/// Vertical list of rows with a selection cursor.
pub struct ComponentList {
    base: ComponentBase,
    rows: Vec<ComponentListRow>,
    cursor: usize,
    focused: bool,
    camera_offset: f32,
}

impl Default for ComponentList {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentList {
    pub fn new() -> Self {
        Self {
            base: ComponentBase::new(),
            rows: Vec::new(),
            cursor: 0,
            focused: false,
            camera_offset: 0.0,
        }
    }

    pub fn add_row(&mut self, row: ComponentListRow) {
        for element in &row.elements {
            self.base.add_child(&element.component);
        }
        self.rows.push(row);
        self.layout_rows();
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn camera_offset(&self) -> f32 {
        self.camera_offset
    }

    /// Sum of all row heights.
    pub fn total_row_height(&self) -> f32 {
        self.rows.iter().map(ComponentListRow::height).sum()
    }

    fn row_top(&self, idx: usize) -> f32 {
        self.rows[..idx].iter().map(ComponentListRow::height).sum()
    }

    pub fn set_cursor(&mut self, idx: usize) {
        if idx >= self.rows.len() || idx == self.cursor {
            return;
        }
        self.notify_row(self.cursor, false);
        self.cursor = idx;
        self.notify_row(self.cursor, true);
        self.scroll_to_cursor();
    }

    /// Moves the cursor by `amount` rows. Returns false at either end.
    fn move_cursor(&mut self, amount: isize) -> bool {
        let target = self.cursor as isize + amount;
        if target < 0 || target >= self.rows.len() as isize {
            return false;
        }
        self.set_cursor(target as usize);
        true
    }

    fn notify_row(&self, idx: usize, gained: bool) {
        if !self.focused {
            return;
        }
        let Some(row) = self.rows.get(idx) else {
            return;
        };
        for element in &row.elements {
            let mut comp = element.component.borrow_mut();
            if gained {
                comp.on_focus_gained();
            } else {
                comp.on_focus_lost();
            }
        }
    }

    fn scroll_to_cursor(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let top = self.row_top(self.cursor);
        let bottom = top + self.rows[self.cursor].height();
        let view = self.size().y;
        if top < self.camera_offset {
            self.camera_offset = top;
        } else if bottom > self.camera_offset + view {
            self.camera_offset = bottom - view;
        }
        self.camera_offset = self
            .camera_offset
            .clamp(0.0, (self.total_row_height() - view).max(0.0));
    }

    fn layout_rows(&mut self) {
        let width = self.size().x;
        let mut y = 0.0;
        for row in &self.rows {
            let height = row.height();
            let fixed: f32 = row
                .elements
                .iter()
                .filter(|e| !e.resize_width)
                .map(|e| e.component.borrow().size().x)
                .sum();
            let flexible = row.elements.iter().filter(|e| e.resize_width).count();
            let spacing = ELEMENT_SPACING * (row.elements.len().saturating_sub(1)) as f32;
            let flex_width = if flexible > 0 {
                ((width - fixed - spacing - ROW_PADDING * 2.0) / flexible as f32).max(0.0)
            } else {
                0.0
            };

            let mut x = ROW_PADDING;
            for element in &row.elements {
                let mut comp = element.component.borrow_mut();
                if element.resize_width {
                    let h = comp.size().y;
                    comp.set_size(Vec2::new(flex_width, h));
                }
                let size = comp.size();
                comp.set_position(Vec2::new(x, y + (height - size.y) / 2.0));
                x += size.x + ELEMENT_SPACING;
            }
            y += height;
        }
        self.scroll_to_cursor();
    }
}

impl Component for ComponentList {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn input(&mut self, config: &InputConfig, input: Input) -> bool {
        if self.rows.is_empty() {
            return false;
        }

        let row = &mut self.rows[self.cursor];
        if let Some(handler) = row.input_handler.as_mut() {
            if handler(config, input) {
                return true;
            }
        } else if let Some(last) = row.elements.last() {
            // no handler: the rightmost element gets it
            if last.component.borrow_mut().input(config, input) {
                return true;
            }
        }

        if !input.is_press() {
            return false;
        }
        if config.is_mapped_to("up", &input) {
            return self.move_cursor(-1);
        }
        if config.is_mapped_to("down", &input) {
            return self.move_cursor(1);
        }
        false
    }

    fn render(&self, parent: &Transform, renderer: &mut dyn Renderer) {
        if !self.is_visible() || self.rows.is_empty() {
            return;
        }
        let transform = parent.translated(self.position());
        renderer.push_clip_rect(transform.translation, self.size());

        let scrolled = transform.translated(Vec2::new(0.0, -self.camera_offset));
        if self.focused {
            renderer.set_matrix(&scrolled);
            let top = self.row_top(self.cursor);
            renderer.draw_rect(
                Vec2::new(0.0, top),
                Vec2::new(self.size().x, self.rows[self.cursor].height()),
                Color::SELECTOR,
            );
        }
        self.base.render_children(&scrolled, renderer);

        renderer.pop_clip_rect();
    }

    fn on_focus_gained(&mut self) {
        self.focused = true;
        self.notify_row(self.cursor, true);
    }

    fn on_focus_lost(&mut self) {
        self.notify_row(self.cursor, false);
        self.focused = false;
    }

    fn on_size_changed(&mut self) {
        self.layout_rows();
    }

    fn help_prompts(&self) -> Vec<HelpPrompt> {
        let mut prompts = Vec::new();
        if self.rows.len() > 1 {
            prompts.push(HelpPrompt::new("up/down", "choose"));
        }
        if let Some(last) = self.rows.get(self.cursor).and_then(|r| r.elements.last()) {
            prompts.extend(last.component.borrow().help_prompts());
        }
        prompts
    }
}
