use std::sync::Arc;
use std::time::Duration;

use holograph_core::location::Location;
use holograph_core::math::rotation::Rotation;
use holograph_core::math::vector3::Vector3;
use itertools::Itertools;
use log::{error, info, warn};
use thiserror::Error;
use uuid::Uuid;

use crate::animation::Animator;
use crate::live::{ActiveHologram, ActiveHolograms};
use crate::model::{BillboardMode, HoloKind, HologramDefinition, LeaderboardConfig};
use crate::particle::ParticleEmitter;
use crate::placeholder::{contains_placeholders, PlaceholderResolver};
use crate::render::{
    BlockDisplayOptions, EntityId, ItemDisplayOptions, LeaderboardLine, LeaderboardOptions,
    LiveEntity, RenderError, Renderer, TextDisplayOptions,
};
use crate::store::{DefinitionStore, StoreError};
use crate::text_animation::TextAnimations;
use crate::world::WorldApi;

#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("unknown material `{0}`")]
    UnknownMaterial(String),
    #[error("leaderboard hologram has no board configuration")]
    MissingBoard,
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Owns the definition store and the live registry, and walks holograms
/// through their lifecycle: spawn, refresh, full respawn on update, and
/// despawn. All entity traffic goes through the renderer it was built
/// with.
pub struct HoloManager {
    store: DefinitionStore,
    live: Arc<ActiveHolograms>,
    renderer: Arc<dyn Renderer>,
    world: Arc<dyn WorldApi>,
    placeholders: Arc<dyn PlaceholderResolver>,
    animations: Arc<TextAnimations>,
    animator: Animator,
    particles: ParticleEmitter,
}

impl HoloManager {
    pub fn new(
        store: DefinitionStore,
        renderer: Arc<dyn Renderer>,
        world: Arc<dyn WorldApi>,
        placeholders: Arc<dyn PlaceholderResolver>,
        animations: Arc<TextAnimations>,
        tick: Duration,
    ) -> Self {
        let live = Arc::new(ActiveHolograms::new());
        let animator = Animator::new(Arc::clone(&renderer), Arc::clone(&live), tick);
        let particles = ParticleEmitter::new(Arc::clone(&world), Arc::clone(&live), tick);
        HoloManager {
            store,
            live,
            renderer,
            world,
            placeholders,
            animations,
            animator,
            particles,
        }
    }

    pub fn store(&self) -> &DefinitionStore {
        &self.store
    }

    /// Registers a fresh definition without spawning or persisting it.
    pub fn create(
        &self,
        id: &str,
        kind: HoloKind,
        location: Location,
    ) -> Result<HologramDefinition, StoreError> {
        self.store.create(id, kind, location)
    }

    pub fn definition(&self, id: &str) -> Option<HologramDefinition> {
        self.store.get(id)
    }

    pub fn definitions(&self) -> Vec<HologramDefinition> {
        self.store.all()
    }

    pub fn is_spawned(&self, id: &str) -> bool {
        self.live.contains(id)
    }

    /// Placeholders resolve first, then animation tokens, so a placeholder
    /// may itself expand to a token.
    fn render_text(&self, text: &str) -> String {
        let mut out = text.to_string();
        if self.placeholders.is_available() && contains_placeholders(&out) {
            out = self.placeholders.resolve(&out);
        }
        if self.animations.contains_tokens(&out) {
            out = self.animations.substitute(&out);
        }
        out
    }

    fn background(def: &HologramDefinition) -> u32 {
        if def.background_enabled {
            def.background_color.packed()
        } else {
            0
        }
    }

    fn apply_fixed_orientation(&self, def: &HologramDefinition, entity: EntityId) {
        if def.billboard == BillboardMode::Fixed {
            let rotation = Rotation::from_yaw_pitch(def.location.yaw, def.location.pitch);
            self.renderer.set_orientation(entity, rotation);
        }
    }

    /// Brings a definition to life. The registry entry is written before
    /// the per-hologram tasks start so the tasks always find it.
    pub fn spawn(&self, def: &HologramDefinition) -> Result<(), SpawnError> {
        match def.kind() {
            HoloKind::Text => self.spawn_text(def)?,
            HoloKind::Item => self.spawn_item(def)?,
            HoloKind::Block => self.spawn_block(def)?,
            HoloKind::Leaderboard => self.spawn_leaderboard(def)?,
        }
        let animation = self.animator.start(def);
        let particles = self.particles.start(def);
        self.live.set_tasks(def.id(), animation, particles);
        Ok(())
    }

    fn spawn_text(&self, def: &HologramDefinition) -> Result<(), SpawnError> {
        let options = TextDisplayOptions {
            text: self.render_text(&def.text()),
            shadow: def.shadow,
            alignment: def.alignment,
            opacity: def.opacity,
            see_through_blocks: def.see_through_blocks,
            view_range: def.view_range,
            scale: def.scale,
            billboard: def.billboard,
            translation: def.translation,
            background: Self::background(def),
        };
        let entity = self.renderer.spawn_text(&options, &def.location)?;
        self.apply_fixed_orientation(def, entity);
        self.live.insert(
            def.id(),
            ActiveHologram::new(LiveEntity::Text(entity), None, &def.location),
        );
        Ok(())
    }

    fn spawn_item(&self, def: &HologramDefinition) -> Result<(), SpawnError> {
        let Some(item) = self.world.resolve_item(&def.material) else {
            return Err(SpawnError::UnknownMaterial(def.material.clone()));
        };
        let options = ItemDisplayOptions {
            item,
            glowing: def.glowing,
            glow_color: def.glowing.then_some(def.glow_color),
            on_fire: def.on_fire,
            view_range: def.view_range,
            scale: def.scale,
            billboard: def.billboard,
            translation: def.translation,
        };
        let entity = self.renderer.spawn_item(&options, &def.location)?;
        self.apply_fixed_orientation(def, entity);
        let caption = self.spawn_caption(def);
        self.live.insert(
            def.id(),
            ActiveHologram::new(LiveEntity::Item(entity), caption, &def.location),
        );
        Ok(())
    }

    fn spawn_block(&self, def: &HologramDefinition) -> Result<(), SpawnError> {
        let Some(block) = self.world.resolve_block_state(&def.material) else {
            return Err(SpawnError::UnknownMaterial(def.material.clone()));
        };
        let options = BlockDisplayOptions {
            block,
            on_fire: def.on_fire,
            view_range: def.view_range,
            scale: def.scale,
            billboard: def.billboard,
            translation: def.translation,
        };
        let entity = self.renderer.spawn_block(&options, &def.location)?;
        self.apply_fixed_orientation(def, entity);
        let caption = self.spawn_caption(def);
        self.live.insert(
            def.id(),
            ActiveHologram::new(LiveEntity::Block(entity), caption, &def.location),
        );
        Ok(())
    }

    /// Text floating below an item or block display, present only while
    /// the definition has lines. Captions always face the viewer and keep
    /// the default translation. A caption failure leaves the main entity
    /// standing.
    fn spawn_caption(&self, def: &HologramDefinition) -> Option<EntityId> {
        let raw = def.text();
        if raw.is_empty() {
            return None;
        }
        let options = TextDisplayOptions {
            text: self.render_text(&raw),
            shadow: def.shadow,
            alignment: def.alignment,
            opacity: def.opacity,
            see_through_blocks: def.see_through_blocks,
            view_range: def.view_range,
            scale: def.scale,
            billboard: BillboardMode::Center,
            translation: Vector3::default(),
            background: Self::background(def),
        };
        let offset = def.caption_offset();
        let location = def.location.offset(offset.x, offset.y, offset.z);
        match self.renderer.spawn_text(&options, &location) {
            Ok(entity) => Some(entity),
            Err(err) => {
                error!("Couldn't spawn caption for hologram {}: {}", def.id(), err);
                None
            }
        }
    }

    fn spawn_leaderboard(&self, def: &HologramDefinition) -> Result<(), SpawnError> {
        let Some(board) = &def.leaderboard else {
            return Err(SpawnError::MissingBoard);
        };
        let options = self.build_board(board);
        let entity = self.renderer.spawn_leaderboard(&options, &def.location)?;
        self.apply_fixed_orientation(def, entity);
        self.live.insert(
            def.id(),
            ActiveHologram::new(LiveEntity::Leaderboard(entity), None, &def.location),
        );
        Ok(())
    }

    /// Resolves the board's placeholder sources into concrete, rank-ordered
    /// lines. Player identities come from the world when known; otherwise a
    /// name-derived UUID keeps head textures stable across rebuilds.
    fn build_board(&self, board: &LeaderboardConfig) -> LeaderboardOptions {
        let max_entries = if board.entries.is_empty() {
            board.max_entries as usize
        } else {
            (board.max_entries as usize).min(board.entries.len())
        };
        let entries = board
            .entries
            .iter()
            .sorted_by_key(|entry| entry.rank)
            .map(|entry| {
                let name = self.resolve_source(&entry.name_source);
                let score = parse_score(&self.resolve_source(&entry.score_source));
                let id = self
                    .world
                    .resolve_identity(&name)
                    .unwrap_or_else(|| Uuid::new_v3(&Uuid::NAMESPACE_OID, name.as_bytes()));
                LeaderboardLine { id, name, score }
            })
            .collect();
        LeaderboardOptions {
            title: board.title.clone(),
            max_entries,
            suffix: board.suffix.clone(),
            style: board.style,
            show_empty_places: board.show_empty_places,
            title_format: board.title_format.clone(),
            footer_format: board.footer_format.clone(),
            place_formats: board.place_formats.clone(),
            default_place_format: board.default_place_format.clone(),
            line_height: board.line_height,
            background: board.background,
            background_color: board.background_color.packed(),
            entries,
        }
    }

    fn resolve_source(&self, source: &str) -> String {
        if self.placeholders.is_available() {
            self.placeholders.resolve(source)
        } else {
            source.to_string()
        }
    }

    /// Applies an edited definition with a full respawn: stop tasks,
    /// despawn, persist, spawn again. A failed persist aborts the respawn.
    pub fn update(&self, def: HologramDefinition) {
        let id = def.id().to_string();
        if let Some(mut old) = self.live.remove(&id) {
            old.stop_tasks();
            self.despawn(&old);
        }
        if let Err(err) = self.store.save(&def) {
            error!("Couldn't persist hologram {id}, leaving it despawned: {err}");
            return;
        }
        self.store.replace(def.clone());
        if let Err(err) = self.spawn(&def) {
            error!("Couldn't respawn hologram {id}: {err}");
        }
    }

    /// Removes a hologram for good: tasks, entities, definition and its
    /// record file. Returns `false` for unknown ids.
    pub fn remove(&self, id: &str) -> bool {
        if self.store.remove(id).is_none() {
            return false;
        }
        if let Some(mut entry) = self.live.remove(id) {
            entry.stop_tasks();
            self.despawn(&entry);
        }
        true
    }

    fn despawn(&self, entry: &ActiveHologram) {
        self.renderer.remove(entry.main().id());
        if let Some(caption) = entry.caption() {
            self.renderer.remove(caption);
        }
    }

    /// Re-renders dynamic text on live entities without a respawn. Text
    /// holograms rewrite their own payload; item and block holograms
    /// rewrite their caption, dropping it when the lines went away.
    pub fn refresh(&self, id: &str) {
        let Some(def) = self.store.get(id) else {
            return;
        };
        match def.kind() {
            HoloKind::Text => {
                let Some((LiveEntity::Text(entity), _)) = self.live.entities(id) else {
                    return;
                };
                self.renderer
                    .set_text(entity, &self.render_text(&def.text()));
            }
            HoloKind::Item | HoloKind::Block => {
                let Some((_, Some(caption))) = self.live.entities(id) else {
                    return;
                };
                let raw = def.text();
                if raw.is_empty() {
                    if let Some(caption) = self.live.take_caption(id) {
                        self.renderer.remove(caption);
                    }
                    return;
                }
                self.renderer.set_text(caption, &self.render_text(&raw));
            }
            HoloKind::Leaderboard => {}
        }
    }

    /// Despawns everything, reloads records from disk and spawns what
    /// decoded. One bad spawn never blocks the others.
    pub fn load_all(&self) {
        self.unload_all();
        let defs = self.store.load_all();
        let count = defs.len();
        for def in defs {
            if let Err(err) = self.spawn(&def) {
                error!("Couldn't spawn hologram {}: {}", def.id(), err);
            }
        }
        info!("Loaded {count} hologram(s)");
    }

    pub fn save_all(&self) {
        self.store.save_all();
    }

    /// Stops every task and despawns every entity, keeping definitions in
    /// memory and on disk.
    pub fn unload_all(&self) {
        for mut entry in self.live.drain() {
            entry.stop_tasks();
            self.despawn(&entry);
        }
    }
}

/// Scores arrive as resolved placeholder text. Everything except digits
/// and dots is stripped first, so `1,234 pts` reads as 1234.
fn parse_score(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return 0.0;
    }
    cleaned.parse().unwrap_or_else(|_| {
        warn!("Couldn't parse leaderboard score `{raw}`");
        0.0
    })
}
