use std::f64::consts::TAU;
use std::sync::Arc;
use std::time::Duration;

use holograph_core::location::Location;
use tokio::task::JoinHandle;

use crate::live::ActiveHolograms;
use crate::model::{AnimationKind, HologramDefinition};
use crate::render::Renderer;

/// Where an animated hologram sits at `timer`, relative to its still base
/// location. The timer advances by `speed * 0.1` per tick, so one full
/// trig cycle takes `2π / (speed * 0.1)` ticks at speed 1.
pub fn animated_location(
    base: &Location,
    kind: AnimationKind,
    radius: f64,
    timer: f64,
) -> Location {
    let mut location = base.clone();
    match kind {
        AnimationKind::None => {}
        AnimationKind::Rotate => {
            location.yaw = ((timer * 20.0) % 360.0) as f32;
        }
        AnimationKind::Bounce => {
            location.position.y += timer.sin() * radius;
        }
        AnimationKind::Circle => {
            location.position.x += timer.cos() * radius;
            location.position.z += timer.sin() * radius;
        }
        AnimationKind::Spiral => {
            location.position.x += timer.cos() * radius;
            location.position.z += timer.sin() * radius;
            location.position.y += (timer % TAU) / TAU * (radius * 2.0) - radius;
        }
        AnimationKind::Shake => {
            location.position.x += (rand::random::<f64>() - 0.5) * radius * 0.2;
            location.position.y += (rand::random::<f64>() - 0.5) * radius * 0.2;
            location.position.z += (rand::random::<f64>() - 0.5) * radius * 0.2;
        }
    }
    location
}

/// Drives one follower task per animated hologram. Tasks hold no locks
/// between ticks and stop themselves once their hologram leaves the
/// registry, so an aborted handle is only a shortcut, not a requirement.
pub struct Animator {
    renderer: Arc<dyn Renderer>,
    registry: Arc<ActiveHolograms>,
    tick: Duration,
}

impl Animator {
    pub fn new(renderer: Arc<dyn Renderer>, registry: Arc<ActiveHolograms>, tick: Duration) -> Self {
        Animator {
            renderer,
            registry,
            tick,
        }
    }

    /// Spawns the movement task for one hologram, or returns `None` when
    /// the definition holds still. Needs a running tokio runtime.
    pub fn start(&self, def: &HologramDefinition) -> Option<JoinHandle<()>> {
        if !def.animated || def.animation == AnimationKind::None {
            return None;
        }

        let def = def.clone();
        let base = def.location.clone();
        let renderer = Arc::clone(&self.renderer);
        let registry = Arc::clone(&self.registry);
        let tick = self.tick;

        Some(tokio::spawn(async move {
            let mut timer = 0.0_f64;
            let mut interval = tokio::time::interval(tick);
            loop {
                interval.tick().await;
                let Some((main, caption)) = registry.entities(def.id()) else {
                    break;
                };

                timer += def.animation_speed * 0.1;
                let location = animated_location(&base, def.animation, def.animation_radius, timer);
                renderer.teleport(main.id(), &location);
                registry.set_position(def.id(), &location);

                if let Some(caption) = caption {
                    let offset = def.caption_offset();
                    renderer.teleport(caption, &location.offset(offset.x, offset.y, offset.z));
                }
            }
        }))
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;
    use std::time::Duration;

    use holograph_core::location::Location;
    use holograph_core::math::rotation::Rotation;
    use parking_lot::Mutex;

    use crate::live::{ActiveHologram, ActiveHolograms};
    use crate::model::{AnimationKind, BillboardMode, HoloKind, HologramDefinition};
    use crate::render::{
        BlockDisplayOptions, EntityId, ItemDisplayOptions, LeaderboardOptions, LiveEntity,
        RenderError, Renderer, TextDisplayOptions,
    };

    use super::{animated_location, Animator};

    const RADIUS: f64 = 0.5;

    fn base() -> Location {
        let mut location = Location::new("world", 10.0, 64.0, -10.0);
        location.yaw = 45.0;
        location
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn still_holograms_keep_their_base() {
        let location = animated_location(&base(), AnimationKind::None, RADIUS, 123.0);
        assert_eq!(location, base());
    }

    #[test]
    fn rotate_spins_twenty_degrees_per_timer_unit() {
        let location = animated_location(&base(), AnimationKind::Rotate, RADIUS, 9.0);
        assert_eq!(location.yaw, 180.0);
        assert_eq!(location.position, base().position);

        let wrapped = animated_location(&base(), AnimationKind::Rotate, RADIUS, 36.0);
        assert_eq!(wrapped.yaw, 0.0);
    }

    #[test]
    fn bounce_oscillates_vertically() {
        let top = animated_location(&base(), AnimationKind::Bounce, RADIUS, std::f64::consts::FRAC_PI_2);
        assert_close(top.position.y, 64.0 + RADIUS);
        assert_close(top.position.x, 10.0);

        let bottom =
            animated_location(&base(), AnimationKind::Bounce, RADIUS, 1.5 * std::f64::consts::PI);
        assert_close(bottom.position.y, 64.0 - RADIUS);
    }

    #[test]
    fn circle_orbits_in_the_horizontal_plane() {
        let start = animated_location(&base(), AnimationKind::Circle, RADIUS, 0.0);
        assert_close(start.position.x, 10.0 + RADIUS);
        assert_close(start.position.z, -10.0);
        assert_close(start.position.y, 64.0);

        let quarter =
            animated_location(&base(), AnimationKind::Circle, RADIUS, std::f64::consts::FRAC_PI_2);
        assert_close(quarter.position.x, 10.0);
        assert_close(quarter.position.z, -10.0 + RADIUS);
    }

    #[test]
    fn spiral_climbs_through_one_cycle() {
        let start = animated_location(&base(), AnimationKind::Spiral, RADIUS, 0.0);
        assert_close(start.position.y, 64.0 - RADIUS);

        let midway = animated_location(&base(), AnimationKind::Spiral, RADIUS, std::f64::consts::PI);
        assert_close(midway.position.y, 64.0);

        let next_cycle =
            animated_location(&base(), AnimationKind::Spiral, RADIUS, std::f64::consts::TAU);
        assert_close(next_cycle.position.y, 64.0 - RADIUS);
    }

    #[test]
    fn shake_stays_inside_its_jitter_bounds() {
        for _ in 0..100 {
            let location = animated_location(&base(), AnimationKind::Shake, RADIUS, 1.0);
            assert!((location.position.x - 10.0).abs() <= RADIUS * 0.1);
            assert!((location.position.y - 64.0).abs() <= RADIUS * 0.1);
            assert!((location.position.z + 10.0).abs() <= RADIUS * 0.1);
            assert_eq!(location.world, "world");
            assert_eq!(location.yaw, 45.0);
        }
    }

    #[derive(Default)]
    struct MovementLog {
        teleports: Mutex<Vec<(EntityId, Location)>>,
    }

    impl MovementLog {
        fn count(&self) -> usize {
            self.teleports.lock().len()
        }

        fn last_for(&self, entity: EntityId) -> Option<Location> {
            self.teleports
                .lock()
                .iter()
                .rev()
                .find(|(id, _)| *id == entity)
                .map(|(_, location)| location.clone())
        }
    }

    impl Renderer for MovementLog {
        fn spawn_text(&self, _: &TextDisplayOptions, _: &Location) -> Result<EntityId, RenderError> {
            Ok(0)
        }
        fn spawn_item(&self, _: &ItemDisplayOptions, _: &Location) -> Result<EntityId, RenderError> {
            Ok(0)
        }
        fn spawn_block(
            &self,
            _: &BlockDisplayOptions,
            _: &Location,
        ) -> Result<EntityId, RenderError> {
            Ok(0)
        }
        fn spawn_leaderboard(
            &self,
            _: &LeaderboardOptions,
            _: &Location,
        ) -> Result<EntityId, RenderError> {
            Ok(0)
        }
        fn remove(&self, _: EntityId) {}
        fn teleport(&self, entity: EntityId, location: &Location) {
            self.teleports.lock().push((entity, location.clone()));
        }
        fn set_text(&self, _: EntityId, _: &str) {}
        fn set_orientation(&self, _: EntityId, _: Rotation) {}
    }

    fn animated_def(caption: bool) -> HologramDefinition {
        let kind = if caption { HoloKind::Block } else { HoloKind::Text };
        let mut def = HologramDefinition::new("mover", kind, base());
        def.animated = true;
        def.animation = AnimationKind::Bounce;
        def.animation_speed = 2.0;
        def
    }

    #[test]
    fn still_definitions_get_no_task() {
        let renderer = Arc::new(MovementLog::default());
        let registry = Arc::new(ActiveHolograms::new());
        let animator = Animator::new(renderer, registry, Duration::from_millis(5));

        let mut def = animated_def(false);
        def.animated = false;
        assert!(animator.start(&def).is_none());

        def.animated = true;
        def.animation = AnimationKind::None;
        assert!(animator.start(&def).is_none());
    }

    #[tokio::test]
    async fn follower_moves_the_live_entity_and_tracked_position() {
        let renderer = Arc::new(MovementLog::default());
        let registry = Arc::new(ActiveHolograms::new());
        let animator = Animator::new(renderer.clone(), registry.clone(), Duration::from_millis(5));

        let def = animated_def(false);
        registry.insert(
            "mover",
            ActiveHologram::new(LiveEntity::Text(1), None, &def.location),
        );
        let task = animator.start(&def).unwrap();

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(renderer.count() > 0);

        let moved = renderer.last_for(1).unwrap();
        assert_eq!(moved.world, "world");
        // The registry follows the renderer, so particle tasks see the
        // animated position.
        assert_eq!(registry.location("mover").unwrap(), moved);

        task.abort();
    }

    #[tokio::test]
    async fn follower_stops_once_the_hologram_is_gone() {
        let renderer = Arc::new(MovementLog::default());
        let registry = Arc::new(ActiveHolograms::new());
        let animator = Animator::new(renderer.clone(), registry.clone(), Duration::from_millis(5));

        let def = animated_def(false);
        registry.insert(
            "mover",
            ActiveHologram::new(LiveEntity::Text(1), None, &def.location),
        );
        let task = animator.start(&def).unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;

        registry.remove("mover");
        tokio::time::sleep(Duration::from_millis(30)).await;
        let frozen = renderer.count();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(renderer.count(), frozen);
        assert!(task.is_finished());
    }

    #[tokio::test]
    async fn caption_follows_at_its_offset() {
        let renderer = Arc::new(MovementLog::default());
        let registry = Arc::new(ActiveHolograms::new());
        let animator = Animator::new(renderer.clone(), registry.clone(), Duration::from_millis(5));

        let mut def = animated_def(true);
        def.billboard = BillboardMode::Fixed;
        registry.insert(
            "mover",
            ActiveHologram::new(LiveEntity::Block(1), Some(2), &def.location),
        );
        animator.start(&def).unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;

        registry.remove("mover");
        tokio::time::sleep(Duration::from_millis(30)).await;

        let main = renderer.last_for(1).unwrap();
        let caption = renderer.last_for(2).unwrap();
        let offset = def.caption_offset();
        assert_eq!(
            caption.position,
            main.offset(offset.x, offset.y, offset.z).position
        );
    }
}
