use super::{Component, ComponentBase, HelpPrompt};
use crate::{
    input::{Input, InputConfig},
    math::{Transform, Vec2},
    renderer::{Color, FontSize, Renderer},
};

const ARROW_WIDTH: f32 = 24.0;

#[derive(Debug, Clone)]
struct OptionEntry<T> {
    name: String,
    object: T,
    selected: bool,
}

/// Single-choice list cycled with left/right.
pub struct OptionListComponent<T> {
    base: ComponentBase,
    name: String,
    entries: Vec<OptionEntry<T>>,
}

impl<T: Clone> OptionListComponent<T> {
    pub fn new(name: &str) -> Self {
        let mut base = ComponentBase::new();
        base.size = Vec2::new(ARROW_WIDTH * 2.0, FontSize::Medium.line_height());
        Self {
            base,
            name: name.to_owned(),
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a choice. Marking it selected clears any previous selection.
    pub fn add(&mut self, name: &str, object: T, selected: bool) {
        if selected {
            for entry in &mut self.entries {
                entry.selected = false;
            }
        }
        self.entries.push(OptionEntry {
            name: name.to_owned(),
            object,
            selected,
        });
        self.fit_width();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn selected_index(&self) -> Option<usize> {
        match self.entries.iter().position(|e| e.selected) {
            Some(idx) => Some(idx),
            None if !self.entries.is_empty() => Some(0),
            None => None,
        }
    }

    /// The selected object; the first entry when nothing was marked.
    pub fn selected(&self) -> Option<T> {
        self.selected_index().map(|idx| self.entries[idx].object.clone())
    }

    pub fn selected_name(&self) -> Option<&str> {
        self.selected_index().map(|idx| self.entries[idx].name.as_str())
    }

    pub fn select_index(&mut self, idx: usize) {
        for (i, entry) in self.entries.iter_mut().enumerate() {
            entry.selected = i == idx;
        }
    }

    fn cycle(&mut self, step: isize) {
        let Some(current) = self.selected_index() else {
            return;
        };
        let len = self.entries.len() as isize;
        let next = (current as isize + step).rem_euclid(len) as usize;
        self.select_index(next);
    }

    fn fit_width(&mut self) {
        let font = FontSize::Medium;
        let widest = self
            .entries
            .iter()
            .map(|e| font.text_width(&e.name))
            .fold(0.0, f32::max);
        self.base.size.x = widest + ARROW_WIDTH * 2.0;
    }
}

impl<T: Clone> Component for OptionListComponent<T> {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn input(&mut self, config: &InputConfig, input: Input) -> bool {
        if !input.is_press() || self.entries.is_empty() {
            return false;
        }
        if config.is_mapped_to("left", &input) {
            self.cycle(-1);
            true
        } else if config.is_mapped_to("right", &input) {
            self.cycle(1);
            true
        } else {
            false
        }
    }

    fn render(&self, parent: &Transform, renderer: &mut dyn Renderer) {
        if !self.is_visible() {
            return;
        }
        let Some(name) = self.selected_name() else {
            return;
        };
        let transform = parent.translated(self.position());
        renderer.set_matrix(&transform);
        let font = FontSize::Medium;
        renderer.draw_text(Vec2::ZERO, "<", font, Color::TEXT);
        let text_x = (self.size().x - font.text_width(name)) / 2.0;
        renderer.draw_text(Vec2::new(text_x, 0.0), name, font, Color::TEXT);
        renderer.draw_text(
            Vec2::new(self.size().x - font.glyph_advance(), 0.0),
            ">",
            font,
            Color::TEXT,
        );
    }

    fn help_prompts(&self) -> Vec<HelpPrompt> {
        vec![HelpPrompt::new("left/right", "change")]
    }
}
