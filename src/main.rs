use anyhow::{anyhow, Result};
use gilrs::{Event, EventType, Gilrs};
use std::{
    cell::RefCell,
    path::{Path, PathBuf},
    rc::Rc,
    sync::mpsc,
    thread,
    time::{Duration, Instant},
};

use horus::{
    collections::{InMemoryCollections, SharedCollections},
    config::FrontendConfig,
    gui::GuiRandomCollectionOptions,
    input::Input,
    models::{self, SystemData},
    renderer::HeadlessRenderer,
    settings::Settings,
    views::ViewController,
    window::Window,
};

const FRAME_TIME: Duration = Duration::from_millis(16);
const POLL_INTERVAL: Duration = Duration::from_millis(4);

fn controller_loop(tx: mpsc::Sender<Input>) -> Result<()> {
    let mut gilrs = Gilrs::new().map_err(|e| anyhow!("failed to open gamepads: {}", e))?;
    for (_id, gamepad) in gilrs.gamepads() {
        log::info!("{} is {:?}", gamepad.name(), gamepad.power_info());
    }

    loop {
        while let Some(Event { id, event, .. }) = gilrs.next_event() {
            log::trace!("event from {}: {:?}", id, event);
            let input = match event {
                EventType::ButtonPressed(b, _) => Input::pressed(b),
                EventType::ButtonReleased(b, _) => Input::released(b),
                _ => continue,
            };
            if tx.send(input).is_err() {
                // UI thread is gone
                return Ok(());
            }
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn load_systems(path: &Path) -> Result<Vec<Rc<SystemData>>> {
    if !path.exists() {
        log::warn!("no catalog at {}", path.display());
        return Ok(Vec::new());
    }
    models::load_catalog(path)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = match std::env::args().nth(1) {
        Some(path) => PathBuf::from(path),
        None => FrontendConfig::config_dir()
            .ok_or_else(|| anyhow!("cannot find a config directory, pass a config path"))?
            .join("config.yaml"),
    };
    let config_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let config = FrontendConfig::load(&config_path)?;
    let screen = config.screen_size();

    let settings = Settings::load(config.settings_path(&config_dir))?.shared();
    let systems = load_systems(&config.catalog_path(&config_dir))?;
    let collections: SharedCollections = Rc::new(RefCell::new(InMemoryCollections::with_defaults()));
    log::info!("loaded {} systems", systems.len());

    let mut window = Window::new(screen, config.input_config()?);
    let mut views = ViewController::new(systems.clone(), screen, config.scroll_delay);
    if config.preload_gamelists {
        views.preload()?;
    }
    views.go_to_start()?;
    window.push_gui(Rc::new(RefCell::new(views)));

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        if let Err(err) = controller_loop(tx) {
            log::error!("controller thread stopped: {:#}", err);
        }
    });

    let mut renderer = HeadlessRenderer::new(screen);
    let mut last_frame = Instant::now();
    loop {
        for input in rx.try_iter() {
            let config = window.input_config();
            if config.is_mapped_to("quit", &input) && input.is_press() {
                log::info!("quit requested");
                return Ok(());
            }
            // random collection options from the main views only
            if config.is_mapped_to("select", &input) && input.is_press() && window.gui_count() == 1 {
                let gui = GuiRandomCollectionOptions::new(
                    screen,
                    settings.clone(),
                    collections.clone(),
                    systems.clone(),
                    window.queue(),
                )?;
                window.push_gui(Rc::new(RefCell::new(gui)));
                continue;
            }
            window.input(input);
        }

        let now = Instant::now();
        let delta_ms = now.duration_since(last_frame).as_millis() as i32;
        last_frame = now;
        window.update(delta_ms);

        window.render(&mut renderer);
        let commands = renderer.take_commands();
        log::trace!("frame with {} draw commands", commands.len());

        thread::sleep(FRAME_TIME);
    }
}
