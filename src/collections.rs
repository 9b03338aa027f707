use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use crate::models::SystemId;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CollectionSystemDecl {
    pub name: String,
    pub long_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CollectionSystemData {
    pub decl: CollectionSystemDecl,
    /// The system backing this collection, if it has been populated.
    pub system: Option<SystemId>,
    pub is_enabled: bool,
}

impl CollectionSystemData {
    pub fn new(name: &str, long_name: &str) -> Self {
        Self {
            decl: CollectionSystemDecl {
                name: name.to_owned(),
                long_name: long_name.to_owned(),
            },
            system: Some(name.to_owned()),
            is_enabled: true,
        }
    }
}

/// Owner of auto/custom collections, including the random collection.
pub trait CollectionSystemManager {
    fn custom_collection_systems(&self) -> BTreeMap<String, CollectionSystemData>;
    fn auto_collection_systems(&self) -> BTreeMap<String, CollectionSystemData>;
    fn random_collection(&self) -> Option<SystemId>;
    fn recreate_collection(&mut self, system: &SystemId);
}

pub type SharedCollections = Rc<RefCell<dyn CollectionSystemManager>>;

/// Collections held in memory. Recreation requests are only recorded.
#[derive(Debug, Default)]
pub struct InMemoryCollections {
    pub custom: BTreeMap<String, CollectionSystemData>,
    pub auto: BTreeMap<String, CollectionSystemData>,
    pub random: Option<SystemId>,
    recreated: Vec<SystemId>,
}

impl InMemoryCollections {
    /// The stock auto collections, with "random" as the random collection.
    pub fn with_defaults() -> Self {
        let mut auto = BTreeMap::new();
        for (name, long_name) in [
            ("all", "all games"),
            ("favorites", "favorites"),
            ("random", "random"),
            ("recent", "last played"),
        ] {
            auto.insert(name.to_owned(), CollectionSystemData::new(name, long_name));
        }
        Self {
            custom: BTreeMap::new(),
            auto,
            random: Some("random".to_owned()),
            recreated: Vec::new(),
        }
    }

    pub fn add_custom(&mut self, name: &str, long_name: &str) {
        self.custom
            .insert(name.to_owned(), CollectionSystemData::new(name, long_name));
    }

    pub fn recreated(&self) -> &[SystemId] {
        &self.recreated
    }
}

impl CollectionSystemManager for InMemoryCollections {
    fn custom_collection_systems(&self) -> BTreeMap<String, CollectionSystemData> {
        self.custom.clone()
    }

    fn auto_collection_systems(&self) -> BTreeMap<String, CollectionSystemData> {
        self.auto.clone()
    }

    fn random_collection(&self) -> Option<SystemId> {
        self.random.clone()
    }

    fn recreate_collection(&mut self, system: &SystemId) {
        log::info!("recreating collection {}", system);
        self.recreated.push(system.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_include_random() {
        let collections = InMemoryCollections::with_defaults();
        assert_eq!(collections.random_collection().as_deref(), Some("random"));
        assert!(collections.auto_collection_systems().contains_key("random"));
        assert!(collections.custom_collection_systems().is_empty());
    }

    #[test]
    fn records_recreation() {
        let mut collections = InMemoryCollections::with_defaults();
        collections.add_custom("shmups", "Shoot em ups");
        collections.recreate_collection(&"random".to_owned());
        assert_eq!(collections.recreated(), ["random".to_owned()]);
        assert_eq!(
            collections.custom_collection_systems()["shmups"].decl.long_name,
            "Shoot em ups"
        );
    }
}
