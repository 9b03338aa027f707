//! Widget tree. Every widget implements [`Component`] and keeps its shared
//! state (geometry, parent link, children) in a [`ComponentBase`].

use std::{
    cell::RefCell,
    rc::Rc,
    sync::atomic::{AtomicU64, Ordering},
};

use crate::{
    input::{Input, InputConfig},
    math::{Transform, Vec2},
    renderer::Renderer,
};

mod button;
mod grid;
mod list;
mod menu;
mod option_list;
mod scrollable;
mod slider;
mod text;

pub use self::button::ButtonComponent;
pub use self::grid::{Border, ComponentGrid, Direction, GridEntry, Placement, Point, UpdateType};
pub use self::list::{ComponentList, ComponentListRow};
pub use self::menu::MenuComponent;
pub use self::option_list::OptionListComponent;
pub use self::scrollable::{ScrollState, ScrollableContainer, AUTO_SCROLL_DELAY};
pub use self::slider::SliderComponent;
pub use self::text::TextComponent;

pub type ComponentRef = Rc<RefCell<dyn Component>>;

static NEXT_COMPONENT_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentId(u64);

impl ComponentId {
    fn next() -> Self {
        ComponentId(NEXT_COMPONENT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A (buttons, action) pair shown in the help bar, e.g. ("a", "select").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpPrompt {
    pub buttons: String,
    pub action: String,
}

impl HelpPrompt {
    pub fn new(buttons: &str, action: &str) -> Self {
        Self {
            buttons: buttons.to_owned(),
            action: action.to_owned(),
        }
    }
}

/// True when both handles point at the same widget.
pub fn same_component(a: &ComponentRef, b: &ComponentRef) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

pub struct ComponentBase {
    id: ComponentId,
    position: Vec2,
    size: Vec2,
    parent: Option<ComponentId>,
    visible: bool,
    children: Vec<ComponentRef>,
}

impl Default for ComponentBase {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentBase {
    pub fn new() -> Self {
        Self {
            id: ComponentId::next(),
            position: Vec2::ZERO,
            size: Vec2::ZERO,
            parent: None,
            visible: true,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn parent(&self) -> Option<ComponentId> {
        self.parent
    }

    pub fn children(&self) -> &[ComponentRef] {
        &self.children
    }

    /// Attaches `child` for update/render traversal and records this
    /// component as its parent.
    pub fn add_child(&mut self, child: &ComponentRef) {
        child.borrow_mut().base_mut().parent = Some(self.id);
        self.children.push(child.clone());
    }

    /// Returns false when `child` is not a child of this component.
    pub fn remove_child(&mut self, child: &ComponentRef) -> bool {
        let Some(idx) = self.children.iter().position(|c| same_component(c, child)) else {
            return false;
        };
        let removed = self.children.remove(idx);
        removed.borrow_mut().base_mut().parent = None;
        true
    }

    pub fn clear_children(&mut self) {
        for child in self.children.drain(..) {
            child.borrow_mut().base_mut().parent = None;
        }
    }

    pub fn update_children(&self, delta_ms: i32) {
        for child in &self.children {
            child.borrow_mut().update(delta_ms);
        }
    }

    pub fn render_children(&self, transform: &Transform, renderer: &mut dyn Renderer) {
        for child in &self.children {
            child.borrow().render(transform, renderer);
        }
    }
}

pub trait Component {
    fn base(&self) -> &ComponentBase;
    fn base_mut(&mut self) -> &mut ComponentBase;

    /// Returns true when the input was consumed. The default offers it to
    /// each child in turn.
    fn input(&mut self, config: &InputConfig, input: Input) -> bool {
        for child in self.base().children() {
            if child.borrow_mut().input(config, input) {
                return true;
            }
        }
        false
    }

    fn update(&mut self, delta_ms: i32) {
        self.base().update_children(delta_ms);
    }

    fn render(&self, parent: &Transform, renderer: &mut dyn Renderer) {
        if !self.is_visible() {
            return;
        }
        let transform = parent.translated(self.position());
        self.base().render_children(&transform, renderer);
    }

    fn text_input(&mut self, _text: &str) {}

    fn on_focus_gained(&mut self) {}

    fn on_focus_lost(&mut self) {}

    fn on_size_changed(&mut self) {}

    fn help_prompts(&self) -> Vec<HelpPrompt> {
        Vec::new()
    }

    fn id(&self) -> ComponentId {
        self.base().id()
    }

    fn position(&self) -> Vec2 {
        self.base().position
    }

    fn set_position(&mut self, position: Vec2) {
        self.base_mut().position = position;
    }

    fn size(&self) -> Vec2 {
        self.base().size
    }

    fn set_size(&mut self, size: Vec2) {
        self.base_mut().size = size;
        self.on_size_changed();
    }

    fn is_visible(&self) -> bool {
        self.base().visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.base_mut().visible = visible;
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::{cell::RefCell, rc::Rc};

    use super::*;

    /// Counters recorded by a [`Probe`].
    #[derive(Debug, Default, Clone, PartialEq, Eq)]
    pub struct ProbeLog {
        pub focus_gained: u32,
        pub focus_lost: u32,
        pub updates: u32,
        pub inputs: u32,
        pub text: String,
    }

    /// Minimal widget that records what the tree does to it.
    pub struct Probe {
        base: ComponentBase,
        pub log: Rc<RefCell<ProbeLog>>,
        pub consume_input: bool,
        pub prompts: Vec<HelpPrompt>,
    }

    impl Probe {
        pub fn new(size: Vec2) -> Self {
            let mut base = ComponentBase::new();
            base.size = size;
            Self {
                base,
                log: Rc::new(RefCell::new(ProbeLog::default())),
                consume_input: false,
                prompts: Vec::new(),
            }
        }

        pub fn shared(size: Vec2) -> (ComponentRef, Rc<RefCell<ProbeLog>>) {
            let probe = Probe::new(size);
            let log = probe.log.clone();
            (Rc::new(RefCell::new(probe)), log)
        }
    }

    impl Component for Probe {
        fn base(&self) -> &ComponentBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut ComponentBase {
            &mut self.base
        }

        fn input(&mut self, _config: &InputConfig, _input: Input) -> bool {
            self.log.borrow_mut().inputs += 1;
            self.consume_input
        }

        fn update(&mut self, _delta_ms: i32) {
            self.log.borrow_mut().updates += 1;
        }

        fn text_input(&mut self, text: &str) {
            self.log.borrow_mut().text.push_str(text);
        }

        fn on_focus_gained(&mut self) {
            self.log.borrow_mut().focus_gained += 1;
        }

        fn on_focus_lost(&mut self) {
            self.log.borrow_mut().focus_lost += 1;
        }

        fn help_prompts(&self) -> Vec<HelpPrompt> {
            self.prompts.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::Probe;
    use super::*;

    #[test]
    fn ids_are_unique() {
        assert_ne!(ComponentBase::new().id(), ComponentBase::new().id());
    }

    #[test]
    fn add_and_remove_child_tracks_parent() {
        let mut parent = ComponentBase::new();
        let (child, _) = Probe::shared(Vec2::new(1.0, 1.0));
        parent.add_child(&child);
        assert_eq!(child.borrow().base().parent(), Some(parent.id()));
        assert!(parent.remove_child(&child));
        assert_eq!(child.borrow().base().parent(), None);
        assert!(!parent.remove_child(&child));
    }

    #[test]
    fn same_component_compares_identity() {
        let (a, _) = Probe::shared(Vec2::ZERO);
        let (b, _) = Probe::shared(Vec2::ZERO);
        assert!(same_component(&a, &a.clone()));
        assert!(!same_component(&a, &b));
    }
}
