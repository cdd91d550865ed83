use holograph_core::color::{Argb, Rgb};
use holograph_core::location::Location;
use holograph_core::math::vector3::Vector3;

use super::{AnimationKind, BillboardMode, HoloKind, LeaderboardConfig, TextAlignment, NEWLINE};

/// Persistent description of one hologram. Everything a spawn needs lives
/// here; live entity ids and task handles stay with the manager.
#[derive(Clone, Debug, PartialEq)]
pub struct HologramDefinition {
    id: String,
    kind: HoloKind,
    pub location: Location,
    /// Visible text lines. For item and block holograms these feed the
    /// caption entity floating below the display.
    pub lines: Vec<String>,
    pub shadow: bool,
    pub alignment: TextAlignment,
    pub opacity: u8,
    pub background_enabled: bool,
    pub background_color: Argb,
    pub background_padding: u32,
    pub view_range: f64,
    pub see_through_blocks: bool,
    pub scale: Vector3<f64>,
    pub billboard: BillboardMode,
    pub translation: Vector3<f64>,
    /// Item or block name, resolved through the world at spawn time.
    pub material: String,
    pub glowing: bool,
    pub glow_color: Rgb,
    pub on_fire: bool,
    pub placeholders_enabled: bool,
    refresh_ticks: u32,
    pub animated: bool,
    pub animation: AnimationKind,
    pub animation_speed: f64,
    pub animation_radius: f64,
    pub particles_enabled: bool,
    pub particle_type: String,
    pub particle_count: u32,
    pub particle_radius: f64,
    /// Vertical offset of the caption entity, in blocks.
    pub text_offset: f64,
    pub leaderboard: Option<LeaderboardConfig>,
}

impl HologramDefinition {
    pub fn new(id: impl Into<String>, kind: HoloKind, location: Location) -> Self {
        HologramDefinition {
            id: id.into(),
            kind,
            location,
            lines: Vec::new(),
            shadow: true,
            alignment: TextAlignment::Center,
            opacity: 255,
            background_enabled: false,
            background_color: Argb::new(80, 0, 0, 0),
            background_padding: 2,
            view_range: 25.0,
            see_through_blocks: false,
            scale: Vector3::new(1.0, 1.0, 1.0),
            billboard: BillboardMode::Center,
            translation: Vector3::default(),
            material: "stone".to_string(),
            glowing: false,
            glow_color: Rgb::WHITE,
            on_fire: false,
            placeholders_enabled: false,
            refresh_ticks: 20,
            animated: false,
            animation: AnimationKind::None,
            animation_speed: 1.0,
            animation_radius: 0.5,
            particles_enabled: false,
            particle_type: "flame".to_string(),
            particle_count: 3,
            particle_radius: 0.5,
            text_offset: -0.9,
            leaderboard: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub const fn kind(&self) -> HoloKind {
        self.kind
    }

    /// The lines joined into the single payload text entities carry.
    pub fn text(&self) -> String {
        self.lines.join(NEWLINE)
    }

    /// Replaces the line list from a joined payload. An empty payload
    /// clears all lines.
    pub fn set_text(&mut self, text: &str) {
        if text.is_empty() {
            self.lines.clear();
        } else {
            self.lines = text.split(NEWLINE).map(str::to_string).collect();
        }
    }

    pub fn add_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Writes a line at `index`, padding with empty lines as needed.
    pub fn set_line(&mut self, index: usize, line: impl Into<String>) {
        if index >= self.lines.len() {
            self.lines.resize(index + 1, String::new());
        }
        self.lines[index] = line.into();
    }

    pub fn line(&self, index: usize) -> &str {
        self.lines.get(index).map_or("", String::as_str)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub const fn refresh_ticks(&self) -> u32 {
        self.refresh_ticks
    }

    /// The interval is used as a modulus divisor, so zero is lifted to one.
    pub fn set_refresh_ticks(&mut self, ticks: u32) {
        self.refresh_ticks = ticks.max(1);
    }

    /// Where the caption entity sits relative to the main entity. Fixed
    /// block displays grow from their corner, so the caption is pushed to
    /// the horizontal center of the scaled block.
    pub fn caption_offset(&self) -> Vector3<f64> {
        let mut offset = Vector3::new(0.0, self.text_offset, 0.0);
        if self.billboard == BillboardMode::Fixed && self.kind == HoloKind::Block {
            offset.x = 0.5 * self.scale.x + self.translation.x;
            offset.z = 0.5 * self.scale.z + self.translation.z;
        }
        offset
    }

    /// Center of the particle orbit relative to the tracked location.
    pub fn particle_anchor(&self) -> Vector3<f64> {
        if self.billboard == BillboardMode::Fixed && self.kind == HoloKind::Block {
            Vector3::new(
                0.5 * self.scale.x + self.translation.x,
                0.5 * self.scale.y + self.translation.y,
                0.5 * self.scale.z + self.translation.z,
            )
        } else {
            Vector3::new(0.0, 0.5, 0.0)
        }
    }
}
