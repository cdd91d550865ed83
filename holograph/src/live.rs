use std::collections::HashMap;

use crossbeam::atomic::AtomicCell;
use holograph_core::location::Location;
use holograph_core::math::vector3::Vector3;
use parking_lot::RwLock;
use tokio::task::JoinHandle;

use crate::render::{EntityId, LiveEntity};

/// Everything owned by one spawned hologram: its entity handles, the last
/// position it was moved to, and the background tasks animating it.
pub struct ActiveHologram {
    main: LiveEntity,
    caption: Option<EntityId>,
    world: String,
    position: AtomicCell<Vector3<f64>>,
    yaw: AtomicCell<f32>,
    pitch: AtomicCell<f32>,
    animation_task: Option<JoinHandle<()>>,
    particle_task: Option<JoinHandle<()>>,
}

impl ActiveHologram {
    pub fn new(main: LiveEntity, caption: Option<EntityId>, location: &Location) -> Self {
        ActiveHologram {
            main,
            caption,
            world: location.world.clone(),
            position: AtomicCell::new(location.position),
            yaw: AtomicCell::new(location.yaw),
            pitch: AtomicCell::new(location.pitch),
            animation_task: None,
            particle_task: None,
        }
    }

    pub const fn main(&self) -> LiveEntity {
        self.main
    }

    pub const fn caption(&self) -> Option<EntityId> {
        self.caption
    }

    pub fn location(&self) -> Location {
        Location {
            world: self.world.clone(),
            position: self.position.load(),
            yaw: self.yaw.load(),
            pitch: self.pitch.load(),
        }
    }

    /// Aborts both tasks. Safe to call more than once; abort lets an
    /// in-flight tick finish, so task loops re-check liveness themselves.
    pub fn stop_tasks(&mut self) {
        if let Some(task) = self.animation_task.take() {
            task.abort();
        }
        if let Some(task) = self.particle_task.take() {
            task.abort();
        }
    }
}

impl Drop for ActiveHologram {
    fn drop(&mut self) {
        self.stop_tasks();
    }
}

/// Registry of spawned holograms keyed by definition id. Position updates
/// go through atomic cells so follower tasks read them under the shared
/// lock.
#[derive(Default)]
pub struct ActiveHolograms {
    entries: RwLock<HashMap<String, ActiveHologram>>,
}

impl ActiveHolograms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, id: &str, entry: ActiveHologram) {
        self.entries.write().insert(id.to_string(), entry);
    }

    pub fn remove(&self, id: &str) -> Option<ActiveHologram> {
        self.entries.write().remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.read().contains_key(id)
    }

    pub fn entities(&self, id: &str) -> Option<(LiveEntity, Option<EntityId>)> {
        let entries = self.entries.read();
        let entry = entries.get(id)?;
        Some((entry.main, entry.caption))
    }

    pub fn location(&self, id: &str) -> Option<Location> {
        self.entries.read().get(id).map(ActiveHologram::location)
    }

    pub fn set_position(&self, id: &str, location: &Location) {
        let entries = self.entries.read();
        if let Some(entry) = entries.get(id) {
            entry.position.store(location.position);
            entry.yaw.store(location.yaw);
            entry.pitch.store(location.pitch);
        }
    }

    pub fn take_caption(&self, id: &str) -> Option<EntityId> {
        self.entries.write().get_mut(id)?.caption.take()
    }

    pub fn set_tasks(
        &self,
        id: &str,
        animation: Option<JoinHandle<()>>,
        particles: Option<JoinHandle<()>>,
    ) {
        let mut entries = self.entries.write();
        if let Some(entry) = entries.get_mut(id) {
            entry.animation_task = animation;
            entry.particle_task = particles;
        }
    }

    pub fn drain(&self) -> Vec<ActiveHologram> {
        self.entries.write().drain().map(|(_, entry)| entry).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
