use super::{Component, ComponentBase, ComponentRef};
use crate::{
    input::{Input, InputConfig},
    math::{Transform, Vec2},
    renderer::Renderer,
};

/// ms to reset to top after we reach the bottom
pub const AUTO_SCROLL_RESET_DELAY: i32 = 3000;
/// ms to wait before we start to scroll
pub const AUTO_SCROLL_DELAY: i32 = 1000;
/// ms between scrolls
pub const AUTO_SCROLL_SPEED: i32 = 50;

const MANUAL_SPEEDUP: f32 = 1.025;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollState {
    Idle,
    AutoScrolling,
    ManualScrolling,
    AtEndPendingReset,
}

/// Clips its children to its own box and scrolls them, either on a timer or
/// manually while a shoulder hotkey is held.
pub struct ScrollableContainer {
    base: ComponentBase,
    scroll_pos: Vec2,
    scroll_dir: Vec2,
    auto_scroll_delay: i32,
    pristine_auto_scroll_delay: i32,
    auto_scroll_speed: i32,
    auto_scroll_accumulator: i32,
    auto_scroll_reset_accumulator: i32,
    at_end: bool,
    hotkey_held: bool,
    manual_scroll: bool,
}

impl ScrollableContainer {
    pub fn new(scroll_delay: i32) -> Self {
        Self {
            base: ComponentBase::new(),
            scroll_pos: Vec2::ZERO,
            scroll_dir: Vec2::ZERO,
            auto_scroll_delay: scroll_delay,
            pristine_auto_scroll_delay: scroll_delay,
            auto_scroll_speed: 0,
            auto_scroll_accumulator: 0,
            auto_scroll_reset_accumulator: 0,
            at_end: false,
            hotkey_held: false,
            manual_scroll: false,
        }
    }

    pub fn add_child(&mut self, child: &ComponentRef) {
        self.base.add_child(child);
    }

    pub fn remove_child(&mut self, child: &ComponentRef) -> bool {
        self.base.remove_child(child)
    }

    pub fn set_auto_scroll(&mut self, auto_scroll: bool) {
        if auto_scroll {
            self.scroll_dir = Vec2::new(0.0, 1.0);
            if self.auto_scroll_delay == 0 {
                self.auto_scroll_delay = AUTO_SCROLL_DELAY;
            }
            self.auto_scroll_speed = AUTO_SCROLL_SPEED;
            self.auto_scroll_accumulator = -self.auto_scroll_delay;
        } else {
            self.scroll_dir = Vec2::ZERO;
            self.auto_scroll_delay = 0;
            self.auto_scroll_speed = 0;
            self.auto_scroll_accumulator = 0;
        }
        self.pristine_auto_scroll_delay = self.auto_scroll_delay;
    }

    pub fn scroll_pos(&self) -> Vec2 {
        self.scroll_pos
    }

    pub fn set_scroll_pos(&mut self, pos: Vec2) {
        self.scroll_pos = pos;
    }

    pub fn is_at_end(&self) -> bool {
        self.at_end
    }

    pub fn state(&self) -> ScrollState {
        if self.manual_scroll {
            ScrollState::ManualScrolling
        } else if self.at_end {
            ScrollState::AtEndPendingReset
        } else if self.auto_scroll_speed != 0 && !self.hotkey_held {
            ScrollState::AutoScrolling
        } else {
            ScrollState::Idle
        }
    }

    /// Bounding box of every child's position + size.
    pub fn content_size(&self) -> Vec2 {
        self.base
            .children()
            .iter()
            .map(|child| {
                let child = child.borrow();
                child.position() + child.size()
            })
            .fold(Vec2::ZERO, Vec2::max)
    }

    /// Back to the top, unless the user is scrolling by hand.
    pub fn reset(&mut self) {
        if !self.hotkey_held && !self.manual_scroll {
            log::trace!("scroll reset");
            self.scroll_pos = Vec2::ZERO;
            self.auto_scroll_reset_accumulator = 0;
            self.auto_scroll_accumulator = -self.auto_scroll_delay;
            self.at_end = false;
        }
    }

    fn restore_autoscroll(&mut self, delay: i32) {
        self.manual_scroll = false;
        self.auto_scroll_accumulator = self.auto_scroll_speed - delay;
        self.auto_scroll_delay = self.pristine_auto_scroll_delay;
        self.auto_scroll_reset_accumulator = 0;
        self.scroll_dir = Vec2::new(0.0, 1.0);
    }

    fn max_scroll(&self) -> Vec2 {
        let content = self.content_size();
        let size = self.size();
        Vec2::new(
            (content.x - size.x).max(0.0),
            (content.y - size.y).max(0.0),
        )
    }

    fn clamp_scroll(&mut self) {
        let max = self.max_scroll();
        self.scroll_pos.x = self.scroll_pos.x.clamp(0.0, max.x);
        if self.scroll_pos.y >= max.y {
            self.scroll_pos.y = max.y;
            if max.y > 0.0 {
                self.at_end = !self.hotkey_held && !self.manual_scroll;
            }
        }
        if self.scroll_pos.y < 0.0 {
            self.scroll_pos.y = 0.0;
        }
    }
}

impl Component for ScrollableContainer {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn input(&mut self, config: &InputConfig, input: Input) -> bool {
        if !self.is_visible() {
            return false;
        }

        let hotkey = config.is_mapped_to("pageup", &input) || config.is_mapped_to("pagedown", &input);
        let down_btn = config.is_mapped_to("down", &input);
        let up_btn = config.is_mapped_to("up", &input);

        if hotkey {
            self.hotkey_held = input.is_press();
            // hotkey released on its own: resume with the usual delay
            if !input.is_press() && !self.manual_scroll {
                self.restore_autoscroll(self.pristine_auto_scroll_delay);
                self.reset();
            }
        } else if self.hotkey_held && (down_btn || up_btn) {
            if input.is_press() {
                self.manual_scroll = true;
                self.at_end = false;
                self.auto_scroll_reset_accumulator = 0;
                self.auto_scroll_accumulator = self.auto_scroll_speed;
                self.auto_scroll_delay = 0;
                self.scroll_dir = Vec2::new(0.0, if down_btn { 1.0 } else { -1.0 });
            } else {
                // direction released first, hotkey still held
                self.restore_autoscroll(self.pristine_auto_scroll_delay);
            }
        } else if !self.hotkey_held && !input.is_press() && self.manual_scroll && (up_btn || down_btn) {
            // hotkey released before up/down: carry on right away
            self.restore_autoscroll(0);
        }

        for child in self.base.children() {
            if child.borrow_mut().input(config, input) {
                return true;
            }
        }
        false
    }

    fn update(&mut self, delta_ms: i32) {
        let delta_ms = delta_ms.max(0);
        if self.hotkey_held != self.manual_scroll {
            // hotkey held alone (stop scrolling) or hotkey released while
            // up/down is still held
            self.base.update_children(delta_ms);
            return;
        }

        if self.auto_scroll_speed != 0 {
            let elapsed = if self.manual_scroll {
                delta_ms.saturating_mul(2)
            } else {
                delta_ms
            };
            self.auto_scroll_accumulator = self.auto_scroll_accumulator.saturating_add(elapsed);
            let max = self.max_scroll();
            while self.auto_scroll_accumulator >= self.auto_scroll_speed {
                if self.manual_scroll {
                    // speed up while up/down held
                    self.scroll_dir.y *= MANUAL_SPEEDUP;
                }
                self.scroll_pos += self.scroll_dir;
                self.auto_scroll_accumulator -= self.auto_scroll_speed;
                if self.scroll_pos.y >= max.y || self.scroll_pos.y <= 0.0 {
                    // edge reached, drop the remaining steps
                    self.auto_scroll_accumulator %= self.auto_scroll_speed;
                    break;
                }
            }
        }

        self.clamp_scroll();

        if self.at_end {
            self.auto_scroll_reset_accumulator =
                self.auto_scroll_reset_accumulator.saturating_add(delta_ms);
            if self.auto_scroll_reset_accumulator >= AUTO_SCROLL_RESET_DELAY {
                self.reset();
            }
        }

        self.base.update_children(delta_ms);
    }

    fn render(&self, parent: &Transform, renderer: &mut dyn Renderer) {
        if !self.is_visible() {
            return;
        }
        let transform = parent.translated(self.position());
        renderer.push_clip_rect(transform.translation, self.size());

        let scrolled = transform.translated(-self.scroll_pos);
        renderer.set_matrix(&scrolled);
        self.base.render_children(&scrolled, renderer);

        renderer.pop_clip_rect();
    }
}
