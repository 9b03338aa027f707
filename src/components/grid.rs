use anyhow::{bail, Result};
use bitflags::bitflags;

use super::{same_component, Component, ComponentBase, ComponentRef, HelpPrompt};
use crate::{
    input::{Input, InputConfig},
    math::{Transform, Vec2},
    renderer::{Color, Renderer},
};

/// A cell coordinate (or span) on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }

    pub fn add(&self, x: i32, y: i32) -> Self {
        Point {
            x: self.x + x,
            y: self.y + y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// For focus, we only handle these actions.
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn as_dir_vector(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    // Go sideways, positive sense first.
    fn as_search_axis(self) -> (i32, i32) {
        match self {
            Direction::Up | Direction::Down => (1, 0),
            Direction::Left | Direction::Right => (0, 1),
        }
    }

    fn from_input(config: &InputConfig, input: &Input) -> Option<Direction> {
        [
            ("down", Direction::Down),
            ("up", Direction::Up),
            ("left", Direction::Left),
            ("right", Direction::Right),
        ]
        .into_iter()
        .find(|(action, _)| config.is_mapped_to(action, input))
        .map(|(_, d)| d)
    }
}

bitflags! {
    /// Which edges of a cell get a separator line.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Border: u8 {
        const TOP = 1;
        const BOTTOM = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateType {
    #[default]
    Always,
    /// Only updated while the cell holds the cursor.
    WhenSelected,
}

/// Where and how a component is placed on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub pos: Point,
    pub span: Point,
    pub can_focus: bool,
    pub resize: bool,
    pub border: Border,
    pub update_type: UpdateType,
}

impl Placement {
    pub fn new(x: i32, y: i32, can_focus: bool, resize: bool) -> Self {
        Self {
            pos: Point::new(x, y),
            span: Point::new(1, 1),
            can_focus,
            resize,
            border: Border::empty(),
            update_type: UpdateType::Always,
        }
    }

    pub fn span(mut self, w: i32, h: i32) -> Self {
        self.span = Point::new(w, h);
        self
    }

    pub fn border(mut self, border: Border) -> Self {
        self.border = border;
        self
    }

    pub fn update_type(mut self, update_type: UpdateType) -> Self {
        self.update_type = update_type;
        self
    }
}

/// A component placed on the grid.
pub struct GridEntry {
    pub pos: Point,
    pub dim: Point,
    pub component: ComponentRef,
    pub can_focus: bool,
    pub resize: bool,
    pub update_type: UpdateType,
    pub border: Border,
}

impl GridEntry {
    fn covers(&self, x: i32, y: i32) -> bool {
        x >= self.pos.x
            && y >= self.pos.y
            && x < self.pos.x + self.dim.x
            && y < self.pos.y + self.dim.y
    }
}

/// Lays components out on a fixed number of columns and rows and moves a
/// focus cursor between them.
pub struct ComponentGrid {
    base: ComponentBase,
    grid_size: Point,
    col_widths: Vec<f32>,
    row_heights: Vec<f32>,
    cells: Vec<GridEntry>,
    cursor: Point,
    lines: Vec<Vec2>,
    line_colors: Vec<Color>,
}

/// Pixel extent of slot `idx`: explicit fraction of `total`, or an equal share
/// of whatever the explicit fractions leave over.
fn slot_extent(fractions: &[f32], idx: i32, total: f32) -> f32 {
    let Some(&fraction) = usize::try_from(idx).ok().and_then(|idx| fractions.get(idx)) else {
        log::debug!("slot {} is outside of the grid, extent is 0", idx);
        return 0.0;
    };
    if fraction != 0.0 {
        return fraction * total;
    }

    let free = 1.0 - fractions.iter().sum::<f32>();
    let between = fractions.iter().filter(|f| **f == 0.0).count();
    if between == 0 {
        log::debug!("no auto slots left, extent is 0");
        return 0.0;
    }
    free * total / between as f32
}

impl ComponentGrid {
    pub fn new(cols: i32, rows: i32) -> Result<Self> {
        if cols <= 0 || rows <= 0 {
            bail!("invalid grid size {}x{}", cols, rows);
        }
        Ok(Self {
            base: ComponentBase::new(),
            grid_size: Point::new(cols, rows),
            col_widths: vec![0.0; cols as usize],
            row_heights: vec![0.0; rows as usize],
            cells: Vec::with_capacity((cols * rows) as usize),
            cursor: Point::default(),
            lines: Vec::new(),
            line_colors: Vec::new(),
        })
    }

    pub fn grid_size(&self) -> Point {
        self.grid_size
    }

    pub fn cursor(&self) -> Point {
        self.cursor
    }

    pub fn entries(&self) -> &[GridEntry] {
        &self.cells
    }

    /// Segment endpoints (pairs) in grid-local space.
    pub fn separator_lines(&self) -> &[Vec2] {
        &self.lines
    }

    pub fn separator_colors(&self) -> &[Color] {
        &self.line_colors
    }

    pub fn col_width(&self, col: i32) -> f32 {
        slot_extent(&self.col_widths, col, self.size().x)
    }

    pub fn row_height(&self, row: i32) -> f32 {
        slot_extent(&self.row_heights, row, self.size().y)
    }

    pub fn set_col_width_perc(&mut self, col: i32, width: f32) -> Result<()> {
        if col < 0 || col >= self.grid_size.x {
            bail!("column {} is outside of the grid", col);
        }
        self.col_widths[col as usize] = width;
        self.on_size_changed();
        Ok(())
    }

    pub fn set_row_height_perc(&mut self, row: i32, height: f32) -> Result<()> {
        if row < 0 || row >= self.grid_size.y {
            bail!("row {} is outside of the grid", row);
        }
        self.row_heights[row as usize] = height;
        self.on_size_changed();
        Ok(())
    }

    pub fn set_entry(&mut self, comp: ComponentRef, placement: Placement) -> Result<()> {
        let Placement { pos, span, .. } = placement;
        if !self.within_bounds(pos.x, pos.y) {
            bail!("position {},{} is outside of the grid", pos.x, pos.y);
        }
        if span.x <= 0
            || span.y <= 0
            || pos.x + span.x > self.grid_size.x
            || pos.y + span.y > self.grid_size.y
        {
            bail!(
                "span {}x{} at {},{} does not fit the grid",
                span.x,
                span.y,
                pos.x,
                pos.y
            );
        }
        match comp.borrow().base().parent() {
            Some(parent) if parent == self.base.id() => bail!("component is already on this grid"),
            Some(_) => bail!("component already has a parent"),
            None => {}
        }

        self.base.add_child(&comp);
        self.cells.push(GridEntry {
            pos,
            dim: span,
            component: comp,
            can_focus: placement.can_focus,
            resize: placement.resize,
            update_type: placement.update_type,
            border: placement.border,
        });

        if !self.cursor_valid() && placement.can_focus {
            self.cursor = pos;
        }

        self.update_cell_component(self.cells.len() - 1);
        self.update_separators();
        Ok(())
    }

    /// Removes the entry holding `comp`. The cursor is left where it is.
    pub fn remove_entry(&mut self, comp: &ComponentRef) -> bool {
        let Some(idx) = self
            .cells
            .iter()
            .position(|cell| same_component(&cell.component, comp))
        else {
            return false;
        };
        self.base.remove_child(comp);
        self.cells.remove(idx);
        self.update_separators();
        true
    }

    pub fn entry_at(&self, x: i32, y: i32) -> Option<&GridEntry> {
        self.cell_index_at(x, y).map(|idx| &self.cells[idx])
    }

    /// The component under the cursor.
    pub fn selected_component(&self) -> Option<ComponentRef> {
        self.cursor_index().map(|idx| self.cells[idx].component.clone())
    }

    /// True while a focusable entry covers the cursor.
    pub fn cursor_valid(&self) -> bool {
        self.cursor_index()
            .map_or(false, |idx| self.cells[idx].can_focus)
    }

    // Cells never overlap in practice; the first match wins.
    fn cell_index_at(&self, x: i32, y: i32) -> Option<usize> {
        if !self.within_bounds(x, y) {
            return None;
        }
        self.cells.iter().position(|cell| cell.covers(x, y))
    }

    fn cursor_index(&self) -> Option<usize> {
        self.cell_index_at(self.cursor.x, self.cursor.y)
    }

    fn within_bounds(&self, x: i32, y: i32) -> bool {
        !(x >= self.grid_size.x || x < 0 || y >= self.grid_size.y || y < 0)
    }

    /// Top-left corner and size of the box spanned by a cell.
    fn cell_box(&self, pos: Point, dim: Point) -> (Vec2, Vec2) {
        let mut origin = Vec2::ZERO;
        let mut size = Vec2::ZERO;
        for x in 0..pos.x {
            origin.x += self.col_width(x);
        }
        for y in 0..pos.y {
            origin.y += self.row_height(y);
        }
        for x in pos.x..pos.x + dim.x {
            size.x += self.col_width(x);
        }
        for y in pos.y..pos.y + dim.y {
            size.y += self.row_height(y);
        }
        (origin, size)
    }

    fn update_cell_component(&self, idx: usize) {
        let cell = &self.cells[idx];
        let (origin, size) = self.cell_box(cell.pos, cell.dim);

        let mut comp = cell.component.borrow_mut();
        if cell.resize {
            comp.set_size(size);
        }

        // center component
        let comp_size = comp.size();
        comp.set_position(Vec2::new(
            origin.x + (size.x - comp_size.x) / 2.0,
            origin.y + (size.y - comp_size.y) / 2.0,
        ));
    }

    fn update_separators(&mut self) {
        let mut lines = Vec::new();
        for cell in self.cells.iter().filter(|c| !c.border.is_empty()) {
            let (pos, size) = self.cell_box(cell.pos, cell.dim);
            let (left, top) = (pos.x, pos.y);
            let (right, bottom) = (pos.x + size.x, pos.y + size.y);

            if cell.border.contains(Border::TOP) {
                lines.push(Vec2::new(left, top));
                lines.push(Vec2::new(right, top));
            }
            if cell.border.contains(Border::BOTTOM) {
                lines.push(Vec2::new(left, bottom));
                lines.push(Vec2::new(right, bottom));
            }
            if cell.border.contains(Border::LEFT) {
                lines.push(Vec2::new(left, top));
                lines.push(Vec2::new(left, bottom));
            }
            if cell.border.contains(Border::RIGHT) {
                lines.push(Vec2::new(right, top));
                lines.push(Vec2::new(right, bottom));
            }
        }

        self.line_colors = vec![Color::SEPARATOR; lines.len()];
        self.lines = lines;
    }

    /// Moves the cursor to the nearest focusable cell in `dir`. Returns false,
    /// leaving the cursor untouched, when there is none.
    pub fn move_cursor(&mut self, dir: Direction) -> bool {
        let orig_cursor = self.cursor;
        let current_entry = self.cursor_index();
        let (dx, dy) = dir.as_dir_vector();
        let (sx, sy) = dir.as_search_axis();

        let mut next = orig_cursor;
        while self.within_bounds(next.x, next.y) {
            next = next.add(dx, dy);

            // Spread out on the search axis, positive first.
            for sign in [1, -1] {
                let mut probe = next;
                while self.within_bounds(probe.x, probe.y) {
                    if let Some(idx) = self.cell_index_at(probe.x, probe.y) {
                        if self.cells[idx].can_focus && Some(idx) != current_entry {
                            self.cursor = probe;
                            self.on_cursor_moved(orig_cursor, probe);
                            return true;
                        }
                    }
                    probe = probe.add(sx * sign, sy * sign);
                }
            }
        }

        // failed to find another focusable element in this direction
        self.cursor = orig_cursor;
        false
    }

    /// Puts the cursor on the first focusable entry, in placement order.
    pub fn reset_cursor(&mut self) {
        let Some(pos) = self.cells.iter().find(|c| c.can_focus).map(|c| c.pos) else {
            return;
        };
        let orig_cursor = self.cursor;
        self.cursor = pos;
        self.on_cursor_moved(orig_cursor, pos);
    }

    pub fn set_cursor_to(&mut self, comp: &ComponentRef) -> Result<()> {
        let Some(pos) = self
            .cells
            .iter()
            .find(|c| same_component(&c.component, comp))
            .map(|c| c.pos)
        else {
            bail!("component is not on this grid");
        };
        let orig_cursor = self.cursor;
        self.cursor = pos;
        self.on_cursor_moved(orig_cursor, pos);
        Ok(())
    }

    fn on_cursor_moved(&mut self, from: Point, to: Point) {
        if let Some(idx) = self.cell_index_at(from.x, from.y) {
            self.cells[idx].component.borrow_mut().on_focus_lost();
        }
        if let Some(idx) = self.cell_index_at(to.x, to.y) {
            self.cells[idx].component.borrow_mut().on_focus_gained();
        }
        log::trace!("grid cursor {:?} -> {:?}", from, to);
    }
}

impl Component for ComponentGrid {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn input(&mut self, config: &InputConfig, input: Input) -> bool {
        if let Some(comp) = self.selected_component() {
            if comp.borrow_mut().input(config, input) {
                return true;
            }
        }

        if !input.is_press() {
            return false;
        }

        match Direction::from_input(config, &input) {
            Some(dir) => self.move_cursor(dir),
            None => false,
        }
    }

    fn update(&mut self, delta_ms: i32) {
        let cursor_entry = self.cursor_index();
        for (idx, cell) in self.cells.iter().enumerate() {
            if cell.update_type == UpdateType::Always || cursor_entry == Some(idx) {
                cell.component.borrow_mut().update(delta_ms);
            }
        }
    }

    fn render(&self, parent: &Transform, renderer: &mut dyn Renderer) {
        if !self.is_visible() {
            return;
        }
        let transform = parent.translated(self.position());
        self.base.render_children(&transform, renderer);

        // draw cell separators
        if !self.lines.is_empty() {
            renderer.set_matrix(&transform);
            renderer.draw_lines(&self.lines, &self.line_colors);
        }
    }

    fn text_input(&mut self, text: &str) {
        if let Some(comp) = self.selected_component() {
            comp.borrow_mut().text_input(text);
        }
    }

    fn on_focus_gained(&mut self) {
        if let Some(comp) = self.selected_component() {
            comp.borrow_mut().on_focus_gained();
        }
    }

    fn on_focus_lost(&mut self) {
        if let Some(comp) = self.selected_component() {
            comp.borrow_mut().on_focus_lost();
        }
    }

    fn on_size_changed(&mut self) {
        for idx in 0..self.cells.len() {
            self.update_cell_component(idx);
        }
        self.update_separators();
    }

    fn help_prompts(&self) -> Vec<HelpPrompt> {
        let mut prompts = self
            .selected_component()
            .map(|c| c.borrow().help_prompts())
            .unwrap_or_default();

        let mut can_scroll_vert = self.grid_size.y > 1;
        let mut can_scroll_horiz = self.grid_size.x > 1;
        for prompt in &prompts {
            match prompt.buttons.as_str() {
                "up/down/left/right" => {
                    can_scroll_horiz = false;
                    can_scroll_vert = false;
                    break;
                }
                "up/down" => can_scroll_vert = false,
                "left/right" => can_scroll_horiz = false,
                _ => {}
            }
        }

        if can_scroll_horiz && can_scroll_vert {
            prompts.push(HelpPrompt::new("up/down/left/right", "move cursor"));
        } else if can_scroll_horiz {
            prompts.push(HelpPrompt::new("left/right", "move cursor"));
        } else if can_scroll_vert {
            prompts.push(HelpPrompt::new("up/down", "move cursor"));
        }
        prompts
    }
}
