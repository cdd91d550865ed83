use holograph_core::color::Rgb;
use holograph_core::location::Location;
use holograph_core::math::rotation::Rotation;
use holograph_core::math::vector3::Vector3;
use thiserror::Error;
use uuid::Uuid;

use crate::model::{BillboardMode, LeaderboardStyle, TextAlignment};
use crate::world::{BlockStateId, ItemId};

pub type EntityId = i32;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("renderer rejected spawn: {0}")]
    Spawn(String),
}

#[derive(Clone, Debug)]
pub struct TextDisplayOptions {
    pub text: String,
    pub shadow: bool,
    pub alignment: TextAlignment,
    pub opacity: u8,
    pub see_through_blocks: bool,
    pub view_range: f64,
    pub scale: Vector3<f64>,
    pub billboard: BillboardMode,
    pub translation: Vector3<f64>,
    /// Packed `0xAARRGGBB` background. Zero means fully transparent.
    pub background: u32,
}

#[derive(Clone, Debug)]
pub struct ItemDisplayOptions {
    pub item: ItemId,
    pub glowing: bool,
    /// Outline color, set only while `glowing` is on.
    pub glow_color: Option<Rgb>,
    pub on_fire: bool,
    pub view_range: f64,
    pub scale: Vector3<f64>,
    pub billboard: BillboardMode,
    pub translation: Vector3<f64>,
}

#[derive(Clone, Debug)]
pub struct BlockDisplayOptions {
    pub block: BlockStateId,
    pub on_fire: bool,
    pub view_range: f64,
    pub scale: Vector3<f64>,
    pub billboard: BillboardMode,
    pub translation: Vector3<f64>,
}

#[derive(Clone, Debug)]
pub struct LeaderboardLine {
    /// Player identity backing the head texture for head styles.
    pub id: Uuid,
    pub name: String,
    pub score: f64,
}

#[derive(Clone, Debug)]
pub struct LeaderboardOptions {
    pub title: String,
    pub max_entries: usize,
    pub suffix: String,
    pub style: LeaderboardStyle,
    pub show_empty_places: bool,
    pub title_format: String,
    pub footer_format: String,
    pub place_formats: Vec<String>,
    pub default_place_format: String,
    pub line_height: f64,
    pub background: bool,
    pub background_color: u32,
    /// Resolved places, best first.
    pub entries: Vec<LeaderboardLine>,
}

/// Handle to a spawned display entity, tagged with what it renders so
/// lifecycle code cannot send a text update to a block display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LiveEntity {
    Text(EntityId),
    Item(EntityId),
    Block(EntityId),
    Leaderboard(EntityId),
}

impl LiveEntity {
    pub const fn id(&self) -> EntityId {
        match self {
            LiveEntity::Text(id)
            | LiveEntity::Item(id)
            | LiveEntity::Block(id)
            | LiveEntity::Leaderboard(id) => *id,
        }
    }
}

/// Rendering backend. Implementations translate these calls into whatever
/// the host uses to show display entities; the engine never talks to the
/// host directly.
pub trait Renderer: Send + Sync {
    fn spawn_text(
        &self,
        options: &TextDisplayOptions,
        location: &Location,
    ) -> Result<EntityId, RenderError>;

    fn spawn_item(
        &self,
        options: &ItemDisplayOptions,
        location: &Location,
    ) -> Result<EntityId, RenderError>;

    fn spawn_block(
        &self,
        options: &BlockDisplayOptions,
        location: &Location,
    ) -> Result<EntityId, RenderError>;

    fn spawn_leaderboard(
        &self,
        options: &LeaderboardOptions,
        location: &Location,
    ) -> Result<EntityId, RenderError>;

    fn remove(&self, entity: EntityId);

    fn teleport(&self, entity: EntityId, location: &Location);

    fn set_text(&self, entity: EntityId, text: &str);

    fn set_orientation(&self, entity: EntityId, rotation: Rotation);
}
