//! Dialogs pushed on top of the views.

mod random_collection;
mod settings;

pub use self::random_collection::GuiRandomCollectionOptions;
pub use self::settings::GuiSettings;
