use super::{Component, ComponentBase};
use crate::{
    math::{Transform, Vec2},
    renderer::{Color, FontSize, Renderer},
};

/// Static text. Without a wrap width the component sizes itself to one line;
/// with one it breaks on words and grows downwards.
pub struct TextComponent {
    base: ComponentBase,
    text: String,
    font: FontSize,
    color: Color,
    wrap_width: Option<f32>,
    lines: Vec<String>,
}

impl TextComponent {
    pub fn new(text: &str, font: FontSize, color: Color) -> Self {
        let mut comp = Self {
            base: ComponentBase::new(),
            text: text.to_owned(),
            font,
            color,
            wrap_width: None,
            lines: Vec::new(),
        };
        comp.relayout();
        comp
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_owned();
        self.relayout();
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn font(&self) -> FontSize {
        self.font
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn set_wrap_width(&mut self, width: Option<f32>) {
        self.wrap_width = width;
        self.relayout();
    }

    fn relayout(&mut self) {
        self.lines = match self.wrap_width {
            Some(width) => wrap(&self.text, self.font, width),
            None => self.text.lines().map(str::to_owned).collect(),
        };
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }

        let width = match self.wrap_width {
            Some(width) => width,
            None => self
                .lines
                .iter()
                .map(|l| self.font.text_width(l))
                .fold(0.0, f32::max),
        };
        let height = self.lines.len() as f32 * self.font.line_height();
        self.base.size = Vec2::new(width, height);
    }
}

fn wrap(text: &str, font: FontSize, width: f32) -> Vec<String> {
    let max_chars = ((width / font.glyph_advance()).floor() as usize).max(1);
    let mut out = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let needed = if line.is_empty() {
                word.chars().count()
            } else {
                line.chars().count() + 1 + word.chars().count()
            };
            if needed > max_chars && !line.is_empty() {
                out.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        out.push(line);
    }
    out
}

impl Component for TextComponent {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn render(&self, parent: &Transform, renderer: &mut dyn Renderer) {
        if !self.is_visible() || self.color.alpha() == 0 {
            return;
        }
        let transform = parent.translated(self.position());
        renderer.set_matrix(&transform);
        let line_height = self.font.line_height();
        for (i, line) in self.lines.iter().enumerate() {
            renderer.draw_text(
                Vec2::new(0.0, i as f32 * line_height),
                line,
                self.font,
                self.color,
            );
        }
    }

    // A resize only sets the box; wrapped text keeps its own height.
    fn on_size_changed(&mut self) {
        if let Some(width) = self.wrap_width {
            if width != self.base.size.x {
                self.wrap_width = Some(self.base.size.x);
                self.relayout();
            }
        }
    }
}
