use std::sync::Arc;
use std::time::Duration;

use crate::manager::HoloManager;
use crate::model::{HoloKind, HologramDefinition};
use crate::text_animation::TextAnimations;

/// Drives text animations and periodic placeholder refreshes off one
/// shared tick counter.
pub struct RefreshTask {
    manager: Arc<HoloManager>,
    animations: Arc<TextAnimations>,
    tick_counter: u64,
}

impl RefreshTask {
    pub fn new(manager: Arc<HoloManager>, animations: Arc<TextAnimations>) -> Self {
        RefreshTask {
            manager,
            animations,
            tick_counter: 0,
        }
    }

    /// One scheduler tick: advance every animation, then push fresh text
    /// to the holograms whose refresh interval divides the counter.
    pub fn tick(&mut self) {
        self.tick_counter += 1;
        self.animations.tick();
        for def in self.manager.definitions() {
            if !self.eligible(&def) {
                continue;
            }
            if self.tick_counter % u64::from(def.refresh_ticks()) == 0 {
                self.manager.refresh(def.id());
            }
        }
    }

    /// Text holograms refresh when their lines hold placeholders or
    /// animation tokens. Item and block holograms additionally need lines,
    /// or there is no caption to rewrite. Leaderboards only change through
    /// an update.
    fn eligible(&self, def: &HologramDefinition) -> bool {
        let dynamic = def.placeholders_enabled || self.animations.contains_tokens(&def.text());
        match def.kind() {
            HoloKind::Text => dynamic,
            HoloKind::Item | HoloKind::Block => dynamic && def.line_count() > 0,
            HoloKind::Leaderboard => false,
        }
    }

    /// Loop driver. The start delay gives the host a moment to finish its
    /// own startup before the first refresh wave.
    pub async fn run(mut self, tick: Duration, start_delay: Duration) {
        tokio::time::sleep(start_delay).await;
        let mut interval = tokio::time::interval(tick);
        loop {
            interval.tick().await;
            self.tick();
        }
    }
}

#[cfg(test)]
mod test {
    use std::fs;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use holograph_core::location::Location;
    use holograph_core::math::rotation::Rotation;
    use holograph_core::math::vector3::Vector3;
    use parking_lot::Mutex;
    use uuid::Uuid;

    use crate::manager::HoloManager;
    use crate::model::{HoloKind, LeaderboardConfig};
    use crate::placeholder::NoPlaceholders;
    use crate::render::{
        BlockDisplayOptions, EntityId, ItemDisplayOptions, LeaderboardOptions, RenderError,
        Renderer, TextDisplayOptions,
    };
    use crate::store::DefinitionStore;
    use crate::text_animation::TextAnimations;
    use crate::world::{BlockStateId, ItemId, ParticleId, WorldApi};

    use super::RefreshTask;

    /// Counts `set_text` calls and remembers the payloads.
    #[derive(Default)]
    struct CountingRenderer {
        next_id: AtomicI32,
        set_texts: Mutex<Vec<(EntityId, String)>>,
    }

    impl CountingRenderer {
        fn refresh_count(&self) -> usize {
            self.set_texts.lock().len()
        }

        fn payloads(&self) -> Vec<String> {
            self.set_texts.lock().iter().map(|(_, t)| t.clone()).collect()
        }
    }

    impl Renderer for CountingRenderer {
        fn spawn_text(
            &self,
            _: &TextDisplayOptions,
            _: &Location,
        ) -> Result<EntityId, RenderError> {
            Ok(self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
        }
        fn spawn_item(
            &self,
            _: &ItemDisplayOptions,
            _: &Location,
        ) -> Result<EntityId, RenderError> {
            Ok(self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
        }
        fn spawn_block(
            &self,
            _: &BlockDisplayOptions,
            _: &Location,
        ) -> Result<EntityId, RenderError> {
            Ok(self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
        }
        fn spawn_leaderboard(
            &self,
            _: &LeaderboardOptions,
            _: &Location,
        ) -> Result<EntityId, RenderError> {
            Ok(self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
        }
        fn remove(&self, _: EntityId) {}
        fn teleport(&self, _: EntityId, _: &Location) {}
        fn set_text(&self, entity: EntityId, text: &str) {
            self.set_texts.lock().push((entity, text.to_string()));
        }
        fn set_orientation(&self, _: EntityId, _: Rotation) {}
    }

    struct PermissiveWorld;

    impl WorldApi for PermissiveWorld {
        fn emit_particle(&self, _: &str, _: Vector3<f64>, _: ParticleId) -> bool {
            true
        }
        fn resolve_item(&self, _: &str) -> Option<ItemId> {
            Some(ItemId(1))
        }
        fn resolve_block_state(&self, _: &str) -> Option<BlockStateId> {
            Some(BlockStateId(2))
        }
        fn resolve_particle(&self, _: &str) -> Option<ParticleId> {
            Some(ParticleId(3))
        }
        fn resolve_identity(&self, _: &str) -> Option<Uuid> {
            None
        }
    }

    struct Fixture {
        manager: Arc<HoloManager>,
        renderer: Arc<CountingRenderer>,
        animations: Arc<TextAnimations>,
        dir: PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = std::env::temp_dir().join(format!("holograph-refresh-{}", Uuid::new_v4()));
            let renderer = Arc::new(CountingRenderer::default());
            let animations = Arc::new(TextAnimations::new());
            let manager = Arc::new(HoloManager::new(
                DefinitionStore::new(&dir),
                renderer.clone(),
                Arc::new(PermissiveWorld),
                Arc::new(NoPlaceholders),
                animations.clone(),
                Duration::from_millis(5),
            ));
            Fixture {
                manager,
                renderer,
                animations,
                dir,
            }
        }

        fn task(&self) -> RefreshTask {
            RefreshTask::new(self.manager.clone(), self.animations.clone())
        }
    }

    impl Drop for Fixture {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.dir);
        }
    }

    fn location() -> Location {
        Location::new("world", 0.0, 64.0, 0.0)
    }

    #[test]
    fn refreshes_land_exactly_on_interval_multiples() {
        let fx = Fixture::new();
        let mut def = fx
            .manager
            .create("clock", HoloKind::Text, location())
            .unwrap();
        def.add_line("%time%");
        def.placeholders_enabled = true;
        def.set_refresh_ticks(20);
        fx.manager.update(def);

        let mut task = fx.task();
        for _ in 0..19 {
            task.tick();
        }
        assert_eq!(fx.renderer.refresh_count(), 0);
        task.tick();
        assert_eq!(fx.renderer.refresh_count(), 1);
        for _ in 0..40 {
            task.tick();
        }
        // Ticks 20, 40 and 60.
        assert_eq!(fx.renderer.refresh_count(), 3);
    }

    #[test]
    fn static_text_is_never_refreshed() {
        let fx = Fixture::new();
        let mut def = fx
            .manager
            .create("plaque", HoloKind::Text, location())
            .unwrap();
        def.add_line("Welcome");
        fx.manager.update(def);

        let mut task = fx.task();
        for _ in 0..40 {
            task.tick();
        }
        assert_eq!(fx.renderer.refresh_count(), 0);
    }

    #[test]
    fn animation_tokens_make_text_dynamic() {
        let fx = Fixture::new();
        fx.animations.register(
            "cycle",
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            10,
        );
        let mut def = fx
            .manager
            .create("spinner", HoloKind::Text, location())
            .unwrap();
        def.add_line("{anim:cycle}");
        def.set_refresh_ticks(20);
        fx.manager.update(def);

        let mut task = fx.task();
        for _ in 0..60 {
            task.tick();
        }
        // Two frame advances by tick 20, four by 40, six by 60.
        assert_eq!(fx.renderer.payloads(), vec!["c", "b", "a"]);
    }

    #[test]
    fn captionless_items_are_skipped() {
        let fx = Fixture::new();
        let mut def = fx
            .manager
            .create("bare", HoloKind::Item, location())
            .unwrap();
        def.placeholders_enabled = true;
        def.set_refresh_ticks(5);
        fx.manager.update(def);

        let mut task = fx.task();
        for _ in 0..20 {
            task.tick();
        }
        assert_eq!(fx.renderer.refresh_count(), 0);
    }

    #[test]
    fn item_captions_are_refreshed() {
        let fx = Fixture::new();
        let mut def = fx
            .manager
            .create("stall", HoloKind::Item, location())
            .unwrap();
        def.add_line("%stock% left");
        def.placeholders_enabled = true;
        def.set_refresh_ticks(10);
        fx.manager.update(def);

        let mut task = fx.task();
        for _ in 0..20 {
            task.tick();
        }
        assert_eq!(fx.renderer.refresh_count(), 2);
    }

    #[test]
    fn leaderboards_never_refresh() {
        let fx = Fixture::new();
        let mut def = fx
            .manager
            .create("board", HoloKind::Leaderboard, location())
            .unwrap();
        def.leaderboard = Some(LeaderboardConfig::default());
        def.placeholders_enabled = true;
        def.set_refresh_ticks(1);
        fx.manager.update(def);

        let mut task = fx.task();
        for _ in 0..20 {
            task.tick();
        }
        assert_eq!(fx.renderer.refresh_count(), 0);
    }

    #[tokio::test]
    async fn run_waits_out_the_start_delay() {
        let fx = Fixture::new();
        let mut def = fx
            .manager
            .create("clock", HoloKind::Text, location())
            .unwrap();
        def.add_line("%time%");
        def.placeholders_enabled = true;
        def.set_refresh_ticks(1);
        fx.manager.update(def);

        let handle = tokio::spawn(
            fx.task()
                .run(Duration::from_millis(5), Duration::from_millis(60)),
        );
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(fx.renderer.refresh_count(), 0);
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(fx.renderer.refresh_count() > 0);
        handle.abort();
    }
}
