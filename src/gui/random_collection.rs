use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use anyhow::Result;

use super::GuiSettings;
use crate::{
    collections::{CollectionSystemData, SharedCollections},
    components::{
        Component, ComponentBase, ComponentListRow, ComponentRef, HelpPrompt, MenuComponent,
        OptionListComponent, SliderComponent, TextComponent,
    },
    input::{Input, InputConfig},
    math::Vec2,
    models::SystemData,
    renderer::{Color, FontSize},
    settings::{
        SharedSettings, RANDOM_EXCLUSION_COLLECTION, RANDOM_MAX_ITEMS, RANDOM_SYSTEMS,
        RANDOM_SYSTEMS_AUTO, RANDOM_SYSTEMS_CUSTOM,
    },
    window::GuiQueue,
};

/// Most games a single system or collection may contribute.
pub const RANDOM_SYSTEM_MAX: i32 = 5;
pub const DEFAULT_RANDOM_SYSTEM_GAMES: i32 = 1;
pub const DEFAULT_RANDOM_COLLECTIONS_GAMES: i32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IncludeGroup {
    Systems,
    AutoCollections,
    CustomCollections,
}

impl IncludeGroup {
    fn settings_key(self) -> &'static str {
        match self {
            IncludeGroup::Systems => RANDOM_SYSTEMS,
            IncludeGroup::AutoCollections => RANDOM_SYSTEMS_AUTO,
            IncludeGroup::CustomCollections => RANDOM_SYSTEMS_CUSTOM,
        }
    }

    fn default_games(self) -> i32 {
        match self {
            IncludeGroup::Systems => DEFAULT_RANDOM_SYSTEM_GAMES,
            _ => DEFAULT_RANDOM_COLLECTIONS_GAMES,
        }
    }

    fn label(self) -> &'static str {
        match self {
            IncludeGroup::Systems => "INCLUDE SYSTEMS",
            IncludeGroup::AutoCollections => "INCLUDE AUTO COLLECTIONS",
            IncludeGroup::CustomCollections => "INCLUDE CUSTOM COLLECTIONS",
        }
    }
}

struct SystemGames {
    name: String,
    games: Rc<RefCell<SliderComponent>>,
}

#[derive(Default)]
struct GroupSelections {
    needs_refresh: bool,
    systems: Vec<SystemGames>,
    auto_collections: Vec<SystemGames>,
    custom_collections: Vec<SystemGames>,
}

impl GroupSelections {
    fn group_mut(&mut self, group: IncludeGroup) -> &mut Vec<SystemGames> {
        match group {
            IncludeGroup::Systems => &mut self.systems,
            IncludeGroup::AutoCollections => &mut self.auto_collections,
            IncludeGroup::CustomCollections => &mut self.custom_collections,
        }
    }
}

/// Everything the row and button callbacks need, shared between them.
struct OptionsContext {
    screen: Vec2,
    settings: SharedSettings,
    collections: SharedCollections,
    systems: Vec<Rc<SystemData>>,
    window: GuiQueue,
    selections: RefCell<GroupSelections>,
}

impl OptionsContext {
    fn group_entries(&self, group: IncludeGroup) -> BTreeMap<String, CollectionSystemData> {
        match group {
            IncludeGroup::Systems => self
                .systems
                .iter()
                .filter(|sys| sys.is_game_system())
                .map(|sys| (sys.name.clone(), CollectionSystemData::new(&sys.name, &sys.full_name)))
                .collect(),
            IncludeGroup::AutoCollections => self.collections.borrow().auto_collection_systems(),
            IncludeGroup::CustomCollections => self.collections.borrow().custom_collection_systems(),
        }
    }

    /// Opens the per-system slider dialog for `group`.
    fn select_entries(self: &Rc<Self>, group: IncludeGroup) -> Result<()> {
        let mut gui = GuiSettings::new(
            "INCLUDE GAMES FROM",
            self.screen,
            self.settings.clone(),
            self.window.clone(),
        )?;

        let key = group.settings_key();
        let mut init_values = self.settings.borrow().get_map(key);
        let random = self.collections.borrow().random_collection();
        let mut results = Vec::new();
        let mut needs_refresh = false;

        for csd in self.group_entries(group).into_values() {
            if csd.system.is_some() && csd.system == random {
                continue;
            }
            let label = csd.decl.long_name;
            let mut selected = group.default_games();
            if let Some(&stored) = init_values.get(&label) {
                // never more than the max nor less than 0
                selected = stored.clamp(0, RANDOM_SYSTEM_MAX);
                needs_refresh |= selected != stored;
            }
            init_values.insert(label.clone(), selected);

            let games = Rc::new(RefCell::new(SliderComponent::new(
                0.0,
                RANDOM_SYSTEM_MAX as f32,
                1.0,
                " ",
            )));
            games.borrow_mut().set_value(selected as f32);
            let text: ComponentRef = Rc::new(RefCell::new(TextComponent::new(
                &label.to_uppercase(),
                FontSize::Medium,
                Color::TEXT,
            )));
            let mut row = ComponentListRow::new();
            row.add_element(text, true).add_element(games.clone(), false);
            gui.add_row(row);

            results.push(SystemGames { name: label, games });
        }

        {
            let mut selections = self.selections.borrow_mut();
            selections.needs_refresh |= needs_refresh;
            *selections.group_mut(group) = results;
        }

        let ctx = self.clone();
        gui.add_save_func(move || ctx.apply_group_settings(group, &init_values));
        self.window.push_gui(Rc::new(RefCell::new(gui)));
        Ok(())
    }

    fn apply_group_settings(&self, group: IncludeGroup, initial: &BTreeMap<String, i32>) {
        let mut selections = self.selections.borrow_mut();
        let current: BTreeMap<String, i32> = selections
            .group_mut(group)
            .iter()
            .map(|sys| (sys.name.clone(), sys.games.borrow().value().round() as i32))
            .collect();
        if current != *initial {
            log::debug!("{} changed", group.settings_key());
            selections.needs_refresh = true;
            self.settings.borrow_mut().set_map(group.settings_key(), current);
        }
    }

    fn save_settings(
        &self,
        trim: &RefCell<OptionListComponent<String>>,
        exclusion: &RefCell<OptionListComponent<String>>,
    ) -> Result<()> {
        let cur_trim = trim.borrow().selected().unwrap_or_default();
        let cur_exclusion = exclusion.borrow().selected().unwrap_or_default();

        let mut settings = self.settings.borrow_mut();
        let prev_trim = settings.get_string(RANDOM_MAX_ITEMS);
        settings.set_string(RANDOM_MAX_ITEMS, &cur_trim);
        let prev_exclusion = settings.get_string(RANDOM_EXCLUSION_COLLECTION);
        settings.set_string(RANDOM_EXCLUSION_COLLECTION, &cur_exclusion);

        let mut selections = self.selections.borrow_mut();
        selections.needs_refresh |= cur_trim != prev_trim || cur_exclusion != prev_exclusion;
        if !selections.needs_refresh {
            return Ok(());
        }

        settings.save_file()?;
        let random = self.collections.borrow().random_collection();
        match random {
            Some(random) => self.collections.borrow_mut().recreate_collection(&random),
            None => log::warn!("no random collection to recreate"),
        }
        Ok(())
    }
}

/// Options for the random collection: which systems and collections feed it,
/// one collection to exclude, and a cap on its size.
pub struct GuiRandomCollectionOptions {
    base: ComponentBase,
    menu: Rc<RefCell<MenuComponent>>,
    ctx: Rc<OptionsContext>,
    trim_random: Rc<RefCell<OptionListComponent<String>>>,
    exclusion_collection: Rc<RefCell<OptionListComponent<String>>>,
}

impl GuiRandomCollectionOptions {
    pub fn new(
        screen: Vec2,
        settings: SharedSettings,
        collections: SharedCollections,
        systems: Vec<Rc<SystemData>>,
        window: GuiQueue,
    ) -> Result<Self> {
        let ctx = Rc::new(OptionsContext {
            screen,
            settings,
            collections,
            systems,
            window,
            selections: RefCell::new(GroupSelections::default()),
        });
        let mut base = ComponentBase::new();
        let id = base.id();
        let mut menu = MenuComponent::new("random collection", screen)?;

        for group in [
            IncludeGroup::Systems,
            IncludeGroup::AutoCollections,
            IncludeGroup::CustomCollections,
        ] {
            let text: ComponentRef = Rc::new(RefCell::new(TextComponent::new(
                group.label(),
                FontSize::Medium,
                Color::TEXT,
            )));
            let arrow: ComponentRef = Rc::new(RefCell::new(TextComponent::new(
                ">",
                FontSize::Medium,
                Color::TEXT,
            )));
            let mut row = ComponentListRow::new();
            row.add_element(text, true).add_element(arrow, false);
            let ctx = ctx.clone();
            row.make_accept_input_handler(move || {
                if let Err(err) = ctx.select_entries(group) {
                    log::error!("failed to open {}: {:#}", group.label(), err);
                }
            });
            menu.add_row(row, false);
        }

        let (exclusion_collection, trim_random) = {
            let settings = ctx.settings.borrow();

            let exclusion = settings.get_string(RANDOM_EXCLUSION_COLLECTION);
            let mut list = OptionListComponent::new("EXCLUDE GAMES FROM");
            list.add("<NONE>", String::new(), exclusion.is_empty());
            for csd in ctx.collections.borrow().custom_collection_systems().values() {
                list.add(&csd.decl.long_name, csd.decl.name.clone(), exclusion == csd.decl.name);
            }
            let exclusion_collection = Rc::new(RefCell::new(list));

            let max_items = settings.get_string(RANDOM_MAX_ITEMS);
            let mut list = OptionListComponent::new("MAX GAMES");
            list.add("ALL", String::new(), max_items.is_empty());
            for i in (5..=50).step_by(5) {
                let value = i.to_string();
                list.add(&value, value.clone(), max_items == value);
            }
            (exclusion_collection, Rc::new(RefCell::new(list)))
        };
        menu.add_with_label("EXCLUDE GAMES FROM", exclusion_collection.clone());
        menu.add_with_label("MAX GAMES", trim_random.clone());

        {
            let ctx = ctx.clone();
            let trim = trim_random.clone();
            let exclusion = exclusion_collection.clone();
            menu.add_button("ok", "ok", move || {
                if let Err(err) = ctx.save_settings(&trim, &exclusion) {
                    log::error!("failed to save random collection options: {:#}", err);
                }
                ctx.window.close(id);
            })?;
        }
        {
            let window = ctx.window.clone();
            menu.add_button("cancel", "cancel", move || window.close(id))?;
        }

        let menu = Rc::new(RefCell::new(menu));
        let menu_ref: ComponentRef = menu.clone();
        base.add_child(&menu_ref);

        let mut gui = Self {
            base,
            menu,
            ctx,
            trim_random,
            exclusion_collection,
        };
        gui.set_size(screen);
        Ok(gui)
    }

    pub fn needs_refresh(&self) -> bool {
        self.ctx.selections.borrow().needs_refresh
    }

    fn save_and_close(&self) {
        if let Err(err) = self
            .ctx
            .save_settings(&self.trim_random, &self.exclusion_collection)
        {
            log::error!("failed to save random collection options: {:#}", err);
        }
        self.ctx.window.close(self.id());
    }
}

impl Component for GuiRandomCollectionOptions {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn input(&mut self, config: &InputConfig, input: Input) -> bool {
        if self.menu.borrow_mut().input(config, input) {
            return true;
        }
        if config.is_mapped_to("b", &input) && input.is_press() {
            self.save_and_close();
        }
        false
    }

    fn on_focus_gained(&mut self) {
        self.menu.borrow_mut().on_focus_gained();
    }

    fn on_focus_lost(&mut self) {
        self.menu.borrow_mut().on_focus_lost();
    }

    fn help_prompts(&self) -> Vec<HelpPrompt> {
        let mut prompts = self.menu.borrow().help_prompts();
        prompts.push(HelpPrompt::new("b", "back"));
        prompts
    }
}
