use std::f64::consts::TAU;
use std::sync::Arc;
use std::time::Duration;

use holograph_core::math::vector3::Vector3;
use log::warn;
use tokio::task::JoinHandle;

use crate::live::ActiveHolograms;
use crate::model::HologramDefinition;
use crate::world::WorldApi;

/// Spawns the orbiting particle task for holograms that ask for one.
/// Points are laid out evenly on a horizontal ring that slowly revolves,
/// centered half a block above the tracked position (or at the scaled
/// center of fixed block displays).
pub struct ParticleEmitter {
    world: Arc<dyn WorldApi>,
    registry: Arc<ActiveHolograms>,
    period: Duration,
}

impl ParticleEmitter {
    /// `tick` is one host tick; emission runs every second tick.
    pub fn new(world: Arc<dyn WorldApi>, registry: Arc<ActiveHolograms>, tick: Duration) -> Self {
        ParticleEmitter {
            world,
            registry,
            period: tick * 2,
        }
    }

    /// Returns `None` when particles are off or the particle name does not
    /// resolve. Needs a running tokio runtime.
    pub fn start(&self, def: &HologramDefinition) -> Option<JoinHandle<()>> {
        if !def.particles_enabled {
            return None;
        }
        let Some(particle) = self.world.resolve_particle(&def.particle_type) else {
            warn!(
                "Unknown particle type `{}` on hologram {}",
                def.particle_type,
                def.id()
            );
            return None;
        };

        let id = def.id().to_string();
        let anchor = def.particle_anchor();
        let count = def.particle_count;
        let radius = def.particle_radius;
        let world = Arc::clone(&self.world);
        let registry = Arc::clone(&self.registry);
        let period = self.period;

        Some(tokio::spawn(async move {
            let mut phase = 0.0_f64;
            let mut interval = tokio::time::interval(period);
            'emit: loop {
                interval.tick().await;
                let Some(location) = registry.location(&id) else {
                    break;
                };

                let center = location.position.add(&anchor);
                for step in 0..count {
                    let angle = phase + TAU * f64::from(step) / f64::from(count);
                    let point = Vector3::new(
                        center.x + angle.cos() * radius,
                        center.y,
                        center.z + angle.sin() * radius,
                    );
                    if !world.emit_particle(&location.world, point, particle) {
                        // The world went away; no point ticking on.
                        break 'emit;
                    }
                }
                phase += 0.1;
            }
        }))
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;
    use std::time::Duration;

    use holograph_core::location::Location;
    use holograph_core::math::vector3::Vector3;
    use parking_lot::Mutex;
    use uuid::Uuid;

    use crate::live::{ActiveHologram, ActiveHolograms};
    use crate::model::{HoloKind, HologramDefinition};
    use crate::render::LiveEntity;
    use crate::world::{BlockStateId, ItemId, ParticleId, WorldApi};

    use super::ParticleEmitter;

    struct ParticleLog {
        emissions: Mutex<Vec<(String, Vector3<f64>)>>,
        accept: bool,
    }

    impl ParticleLog {
        fn new(accept: bool) -> Self {
            ParticleLog {
                emissions: Mutex::new(Vec::new()),
                accept,
            }
        }

        fn count(&self) -> usize {
            self.emissions.lock().len()
        }

        fn points(&self) -> Vec<Vector3<f64>> {
            self.emissions
                .lock()
                .iter()
                .map(|(_, point)| *point)
                .collect()
        }
    }

    impl WorldApi for ParticleLog {
        fn emit_particle(&self, world: &str, position: Vector3<f64>, _: ParticleId) -> bool {
            self.emissions.lock().push((world.to_string(), position));
            self.accept
        }
        fn resolve_item(&self, _: &str) -> Option<ItemId> {
            None
        }
        fn resolve_block_state(&self, _: &str) -> Option<BlockStateId> {
            None
        }
        fn resolve_particle(&self, name: &str) -> Option<ParticleId> {
            (name == "flame").then_some(ParticleId(9))
        }
        fn resolve_identity(&self, _: &str) -> Option<Uuid> {
            None
        }
    }

    fn sparkling_def(count: u32) -> HologramDefinition {
        let mut def = HologramDefinition::new(
            "sparkle",
            HoloKind::Text,
            Location::new("world", 10.0, 64.0, -10.0),
        );
        def.particles_enabled = true;
        def.particle_count = count;
        def.particle_radius = 1.0;
        def
    }

    fn emitter(world: &Arc<ParticleLog>) -> (ParticleEmitter, Arc<ActiveHolograms>) {
        let registry = Arc::new(ActiveHolograms::new());
        let emitter = ParticleEmitter::new(
            world.clone(),
            registry.clone(),
            Duration::from_millis(5),
        );
        (emitter, registry)
    }

    #[test]
    fn disabled_or_unresolvable_particles_get_no_task() {
        let world = Arc::new(ParticleLog::new(true));
        let registry = Arc::new(ActiveHolograms::new());
        let emitter =
            ParticleEmitter::new(world, registry, Duration::from_millis(5));

        let mut def = sparkling_def(3);
        def.particles_enabled = false;
        assert!(emitter.start(&def).is_none());

        def.particles_enabled = true;
        def.particle_type = "mist".to_string();
        assert!(emitter.start(&def).is_none());
    }

    #[tokio::test]
    async fn points_orbit_the_anchored_center() {
        let world = Arc::new(ParticleLog::new(true));
        let (emitter, registry) = emitter(&world);
        let def = sparkling_def(4);
        registry.insert(
            "sparkle",
            ActiveHologram::new(LiveEntity::Text(1), None, &def.location),
        );

        let task = emitter.start(&def).unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;
        task.abort();

        let points = world.points();
        assert!(points.len() >= 4);
        for point in points {
            assert!((point.y - 64.5).abs() < 1e-9);
            let dx = point.x - 10.0;
            let dz = point.z + 10.0;
            assert!(((dx * dx + dz * dz).sqrt() - 1.0).abs() < 1e-9);
        }
    }

    #[tokio::test]
    async fn the_ring_revolves_between_batches() {
        let world = Arc::new(ParticleLog::new(true));
        let (emitter, registry) = emitter(&world);
        let def = sparkling_def(1);
        registry.insert(
            "sparkle",
            ActiveHologram::new(LiveEntity::Text(1), None, &def.location),
        );

        let task = emitter.start(&def).unwrap();
        tokio::time::sleep(Duration::from_millis(80)).await;
        task.abort();

        let points = world.points();
        assert!(points.len() >= 3);
        for (batch, point) in points.iter().take(3).enumerate() {
            let angle = 0.1 * batch as f64;
            assert!((point.x - (10.0 + angle.cos())).abs() < 1e-9);
            assert!((point.z - (-10.0 + angle.sin())).abs() < 1e-9);
        }
    }

    #[tokio::test]
    async fn a_rejected_emission_stops_the_task() {
        let world = Arc::new(ParticleLog::new(false));
        let (emitter, registry) = emitter(&world);
        let def = sparkling_def(4);
        registry.insert(
            "sparkle",
            ActiveHologram::new(LiveEntity::Text(1), None, &def.location),
        );

        let task = emitter.start(&def).unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(world.count(), 1);
        assert!(task.is_finished());
    }

    #[tokio::test]
    async fn removal_stops_the_task() {
        let world = Arc::new(ParticleLog::new(true));
        let (emitter, registry) = emitter(&world);
        let def = sparkling_def(2);
        registry.insert(
            "sparkle",
            ActiveHologram::new(LiveEntity::Text(1), None, &def.location),
        );

        let task = emitter.start(&def).unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        registry.remove("sparkle");
        tokio::time::sleep(Duration::from_millis(30)).await;
        let frozen = world.count();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(world.count(), frozen);
        assert!(task.is_finished());
    }
}
