//! Stack of full-screen GUIs. The bottom entry is normally the view
//! controller; dialogs are pushed on top of it.

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use crate::{
    components::{ComponentId, ComponentRef, HelpPrompt},
    input::{Input, InputConfig},
    math::{Transform, Vec2},
    renderer::{Color, FontSize, Renderer},
};

const HELP_SPACING: f32 = 32.0;

pub enum WindowRequest {
    Push(ComponentRef),
    Close(ComponentId),
}

/// Handle used by widgets to open or close GUIs. Requests are applied by the
/// window once the current input or update pass is over.
#[derive(Clone, Default)]
pub struct GuiQueue(Rc<RefCell<VecDeque<WindowRequest>>>);

impl GuiQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_gui(&self, gui: ComponentRef) {
        self.0.borrow_mut().push_back(WindowRequest::Push(gui));
    }

    pub fn close(&self, id: ComponentId) {
        self.0.borrow_mut().push_back(WindowRequest::Close(id));
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    fn pop(&self) -> Option<WindowRequest> {
        self.0.borrow_mut().pop_front()
    }
}

pub struct Window {
    screen: Vec2,
    input_config: InputConfig,
    guis: Vec<ComponentRef>,
    queue: GuiQueue,
}

impl Window {
    pub fn new(screen: Vec2, input_config: InputConfig) -> Self {
        Self {
            screen,
            input_config,
            guis: Vec::new(),
            queue: GuiQueue::new(),
        }
    }

    pub fn screen_size(&self) -> Vec2 {
        self.screen
    }

    pub fn input_config(&self) -> &InputConfig {
        &self.input_config
    }

    pub fn queue(&self) -> GuiQueue {
        self.queue.clone()
    }

    pub fn gui_count(&self) -> usize {
        self.guis.len()
    }

    pub fn peek_gui(&self) -> Option<ComponentRef> {
        self.guis.last().cloned()
    }

    pub fn push_gui(&mut self, gui: ComponentRef) {
        if let Some(top) = self.guis.last() {
            top.borrow_mut().on_focus_lost();
        }
        gui.borrow_mut().on_focus_gained();
        log::debug!("pushed gui {:?}", gui.borrow().id());
        self.guis.push(gui);
    }

    /// Removes the GUI with `id`. The new top regains focus if the top one
    /// was removed.
    pub fn remove_gui(&mut self, id: ComponentId) -> bool {
        let Some(idx) = self.guis.iter().position(|g| g.borrow().id() == id) else {
            log::warn!("no gui {:?} on the stack", id);
            return false;
        };
        let was_top = idx + 1 == self.guis.len();
        let removed = self.guis.remove(idx);
        if was_top {
            removed.borrow_mut().on_focus_lost();
            if let Some(top) = self.guis.last() {
                top.borrow_mut().on_focus_gained();
            }
        }
        log::debug!("removed gui {:?}", id);
        true
    }

    pub fn input(&mut self, input: Input) -> bool {
        let consumed = match self.peek_gui() {
            Some(top) => top.borrow_mut().input(&self.input_config, input),
            None => false,
        };
        self.process_requests();
        consumed
    }

    pub fn text_input(&mut self, text: &str) {
        if let Some(top) = self.peek_gui() {
            top.borrow_mut().text_input(text);
        }
        self.process_requests();
    }

    pub fn update(&mut self, delta_ms: i32) {
        if let Some(top) = self.peek_gui() {
            top.borrow_mut().update(delta_ms);
        }
        // the view underneath keeps animating behind dialogs
        if self.guis.len() > 1 {
            self.guis[0].borrow_mut().update(delta_ms);
        }
        self.process_requests();
    }

    pub fn render(&self, renderer: &mut dyn Renderer) {
        for gui in &self.guis {
            gui.borrow().render(&Transform::IDENTITY, renderer);
        }
        self.render_help_prompts(renderer);
    }

    pub fn help_prompts(&self) -> Vec<HelpPrompt> {
        self.peek_gui()
            .map(|top| top.borrow().help_prompts())
            .unwrap_or_default()
    }

    fn render_help_prompts(&self, renderer: &mut dyn Renderer) {
        let font = FontSize::Small;
        renderer.set_matrix(&Transform::IDENTITY);
        let mut x = HELP_SPACING;
        let y = self.screen.y - font.line_height() * 1.5;
        for prompt in self.help_prompts() {
            let text = format!("{} {}", prompt.buttons.to_uppercase(), prompt.action.to_uppercase());
            renderer.draw_text(Vec2::new(x, y), &text, font, Color::TEXT);
            x += font.text_width(&text) + HELP_SPACING;
        }
    }

    fn process_requests(&mut self) {
        while let Some(request) = self.queue.pop() {
            match request {
                WindowRequest::Push(gui) => self.push_gui(gui),
                WindowRequest::Close(id) => {
                    self.remove_gui(id);
                }
            }
        }
    }
}
