use holograph_core::math::vector3::Vector3;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockStateId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParticleId(pub u32);

/// The engine's window onto the host world: name resolution and particle
/// emission. All lookups are by the lowercase names stored in records.
pub trait WorldApi: Send + Sync {
    /// Returns `false` when the target world is not available, which stops
    /// the calling emitter task.
    fn emit_particle(&self, world: &str, position: Vector3<f64>, particle: ParticleId) -> bool;

    fn resolve_item(&self, name: &str) -> Option<ItemId>;

    fn resolve_block_state(&self, name: &str) -> Option<BlockStateId>;

    fn resolve_particle(&self, name: &str) -> Option<ParticleId>;

    /// Identity of a known player by visible name, if the host tracks one.
    fn resolve_identity(&self, display_name: &str) -> Option<Uuid>;
}
