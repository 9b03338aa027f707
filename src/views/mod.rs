//! Full-screen views managed by the [`ViewController`].

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use crate::models::SystemId;

mod gamelist_view;
mod system_view;
mod view_controller;

pub use self::gamelist_view::GameListView;
pub use self::system_view::SystemView;
pub use self::view_controller::{ViewController, ViewState};

/// Navigation asked for by a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewRequest {
    GameList(SystemId),
    SystemView(SystemId),
    NextGameList,
    PrevGameList,
}

/// Queue shared between the controller and its views. Views push while
/// handling input; the controller drains once the view is released.
#[derive(Debug, Clone, Default)]
pub struct ViewRequests(Rc<RefCell<VecDeque<ViewRequest>>>);

impl ViewRequests {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, request: ViewRequest) {
        log::trace!("view request {:?}", request);
        self.0.borrow_mut().push_back(request);
    }

    pub fn pop(&self) -> Option<ViewRequest> {
        self.0.borrow_mut().pop_front()
    }
}
