use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use holograph_config::HoloConfig;
use log::{info, warn};
use parking_lot::Mutex;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::manager::HoloManager;
use crate::placeholder::PlaceholderResolver;
use crate::refresh::RefreshTask;
use crate::render::Renderer;
use crate::store::DefinitionStore;
use crate::text_animation::{self, TextAnimations};
use crate::world::WorldApi;

#[derive(Debug, Error)]
pub enum HoloError {
    #[error("no display renderer is available")]
    RendererUnavailable,
}

/// Top-level handle a host embeds. Wires the store, the manager and the
/// refresh scheduler together and owns the engine lifecycle.
pub struct HoloEngine {
    manager: Arc<HoloManager>,
    animations: Arc<TextAnimations>,
    animations_dir: PathBuf,
    write_default_animations: bool,
    tick: Duration,
    start_delay: Duration,
    refresh_task: Mutex<Option<JoinHandle<()>>>,
}

impl HoloEngine {
    /// Builds the engine against host-provided services. Holograms render
    /// through display entities, so a missing renderer is fatal; a missing
    /// placeholder resolver only downgrades placeholders to raw text.
    pub fn new(
        config: &HoloConfig,
        renderer: Option<Arc<dyn Renderer>>,
        world: Arc<dyn WorldApi>,
        placeholders: Arc<dyn PlaceholderResolver>,
    ) -> Result<Self, HoloError> {
        let Some(renderer) = renderer else {
            return Err(HoloError::RendererUnavailable);
        };
        if placeholders.is_available() {
            info!("Placeholder resolution is active");
        } else {
            warn!("No placeholder resolver found, placeholders stay raw");
        }
        let tick = config.tick_duration();
        let animations = Arc::new(TextAnimations::new());
        let manager = Arc::new(HoloManager::new(
            DefinitionStore::new(&config.data_dir),
            renderer,
            world,
            placeholders,
            animations.clone(),
            tick,
        ));
        Ok(HoloEngine {
            manager,
            animations,
            animations_dir: PathBuf::from(&config.animations_dir),
            write_default_animations: config.write_default_animations,
            tick,
            start_delay: tick * config.refresh_start_delay_ticks,
            refresh_task: Mutex::new(None),
        })
    }

    /// Loads text animations and persisted holograms, then starts the
    /// refresh loop. Needs a running tokio runtime.
    pub fn enable(&self) {
        self.animations.register_defaults();
        if self.write_default_animations && !self.animations_dir.exists() {
            if let Err(err) = text_animation::write_default_files(&self.animations_dir) {
                warn!("Couldn't write default text animations: {err}");
            }
        }
        self.animations.load_dir(&self.animations_dir);
        self.manager.load_all();

        let task = RefreshTask::new(self.manager.clone(), self.animations.clone());
        let handle = tokio::spawn(task.run(self.tick, self.start_delay));
        *self.refresh_task.lock() = Some(handle);
        info!("Hologram engine enabled");
    }

    /// Stops the refresh loop, persists every definition and despawns all
    /// entities. Definitions survive for the next `enable`.
    pub fn disable(&self) {
        if let Some(task) = self.refresh_task.lock().take() {
            task.abort();
        }
        self.manager.save_all();
        self.manager.unload_all();
        info!("Hologram engine disabled");
    }

    pub fn manager(&self) -> &Arc<HoloManager> {
        &self.manager
    }

    pub fn animations(&self) -> &Arc<TextAnimations> {
        &self.animations
    }
}
