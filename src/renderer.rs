use crate::math::{Transform, Vec2};

/// Packed 0xRRGGBBAA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Color = Color(0xFFFFFFFF);
    pub const TEXT: Color = Color(0x777777FF);
    pub const SEPARATOR: Color = Color(0xC6C7C6FF);
    pub const SELECTOR: Color = Color(0xFFFFFFFF);
    pub const HIGHLIGHT: Color = Color(0x32_32_32_FF);
    pub const BACKGROUND: Color = Color(0xEFEFEFFF);

    pub fn alpha(self) -> u8 {
        (self.0 & 0xFF) as u8
    }
}

/// Font sizes with fixed glyph metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSize {
    Small,
    Medium,
    Large,
}

impl FontSize {
    pub fn line_height(self) -> f32 {
        match self {
            FontSize::Small => 20.0,
            FontSize::Medium => 30.0,
            FontSize::Large => 48.0,
        }
    }

    pub fn glyph_advance(self) -> f32 {
        self.line_height() * 0.6
    }

    pub fn text_width(self, text: &str) -> f32 {
        text.chars().count() as f32 * self.glyph_advance()
    }
}

/// Drawing backend consumed by every component.
pub trait Renderer {
    fn screen_size(&self) -> Vec2;
    fn set_matrix(&mut self, transform: &Transform);
    fn push_clip_rect(&mut self, pos: Vec2, size: Vec2);
    fn pop_clip_rect(&mut self);
    /// `lines` holds endpoint pairs; `colors` has one entry per endpoint.
    fn draw_lines(&mut self, lines: &[Vec2], colors: &[Color]);
    fn draw_rect(&mut self, pos: Vec2, size: Vec2, color: Color);
    fn draw_text(&mut self, pos: Vec2, text: &str, font: FontSize, color: Color);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    SetMatrix(Transform),
    PushClip { pos: Vec2, size: Vec2 },
    PopClip,
    Lines { lines: Vec<Vec2>, colors: Vec<Color> },
    Rect { pos: Vec2, size: Vec2, color: Color },
    Text { pos: Vec2, text: String, color: Color },
}

/// Renderer that records draw calls instead of rasterising them. Positions are
/// stored in screen space (the current matrix is applied).
#[derive(Debug)]
pub struct HeadlessRenderer {
    screen: Vec2,
    matrix: Transform,
    clip_stack: Vec<(Vec2, Vec2)>,
    commands: Vec<DrawCommand>,
}

impl HeadlessRenderer {
    pub fn new(screen: Vec2) -> Self {
        Self {
            screen,
            matrix: Transform::IDENTITY,
            clip_stack: Vec::new(),
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drops recorded commands, returning them. Called once per frame.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn clip_depth(&self) -> usize {
        self.clip_stack.len()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Renderer for HeadlessRenderer {
    fn screen_size(&self) -> Vec2 {
        self.screen
    }

    fn set_matrix(&mut self, transform: &Transform) {
        self.matrix = *transform;
        self.commands.push(DrawCommand::SetMatrix(*transform));
    }

    fn push_clip_rect(&mut self, pos: Vec2, size: Vec2) {
        self.clip_stack.push((pos, size));
        self.commands.push(DrawCommand::PushClip { pos, size });
    }

    fn pop_clip_rect(&mut self) {
        if self.clip_stack.pop().is_none() {
            log::warn!("pop_clip_rect called with an empty clip stack");
        }
        self.commands.push(DrawCommand::PopClip);
    }

    fn draw_lines(&mut self, lines: &[Vec2], colors: &[Color]) {
        let lines = lines.iter().map(|p| self.matrix.apply(*p)).collect();
        self.commands.push(DrawCommand::Lines {
            lines,
            colors: colors.to_vec(),
        });
    }

    fn draw_rect(&mut self, pos: Vec2, size: Vec2, color: Color) {
        self.commands.push(DrawCommand::Rect {
            pos: self.matrix.apply(pos),
            size,
            color,
        });
    }

    fn draw_text(&mut self, pos: Vec2, text: &str, _font: FontSize, color: Color) {
        self.commands.push(DrawCommand::Text {
            pos: self.matrix.apply(pos),
            text: text.to_owned(),
            color,
        });
    }
}
