pub mod definition;
pub mod leaderboard;

pub use definition::HologramDefinition;
pub use leaderboard::{LeaderboardConfig, LeaderboardEntry, LeaderboardStyle};

/// Marker joining the line list into a single text payload.
pub const NEWLINE: &str = "<newline>";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoloKind {
    Text,
    Item,
    Block,
    Leaderboard,
}

impl HoloKind {
    pub const fn record_name(&self) -> &'static str {
        match self {
            HoloKind::Text => "text",
            HoloKind::Item => "item",
            HoloKind::Block => "block",
            HoloKind::Leaderboard => "leaderboard",
        }
    }

    pub fn from_record_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "text" => Some(HoloKind::Text),
            "item" => Some(HoloKind::Item),
            "block" => Some(HoloKind::Block),
            "leaderboard" => Some(HoloKind::Leaderboard),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlignment {
    Left,
    Center,
    Right,
}

impl TextAlignment {
    pub const fn record_name(&self) -> &'static str {
        match self {
            TextAlignment::Left => "left",
            TextAlignment::Center => "center",
            TextAlignment::Right => "right",
        }
    }

    pub fn from_record_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "left" => Some(TextAlignment::Left),
            "center" => Some(TextAlignment::Center),
            "right" => Some(TextAlignment::Right),
            _ => None,
        }
    }
}

/// How a display entity faces the viewer. `Fixed` keeps the spawn facing,
/// which is the only mode where an explicit orientation is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BillboardMode {
    Fixed,
    Vertical,
    Horizontal,
    Center,
}

impl BillboardMode {
    pub const fn record_name(&self) -> &'static str {
        match self {
            BillboardMode::Fixed => "fixed",
            BillboardMode::Vertical => "vertical",
            BillboardMode::Horizontal => "horizontal",
            BillboardMode::Center => "center",
        }
    }

    pub fn from_record_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "fixed" => Some(BillboardMode::Fixed),
            "vertical" => Some(BillboardMode::Vertical),
            "horizontal" => Some(BillboardMode::Horizontal),
            "center" => Some(BillboardMode::Center),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationKind {
    None,
    Rotate,
    Bounce,
    Circle,
    Spiral,
    Shake,
}

impl AnimationKind {
    pub const fn record_name(&self) -> &'static str {
        match self {
            AnimationKind::None => "none",
            AnimationKind::Rotate => "rotate",
            AnimationKind::Bounce => "bounce",
            AnimationKind::Circle => "circle",
            AnimationKind::Spiral => "spiral",
            AnimationKind::Shake => "shake",
        }
    }

    pub fn from_record_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "none" => Some(AnimationKind::None),
            "rotate" => Some(AnimationKind::Rotate),
            "bounce" => Some(AnimationKind::Bounce),
            "circle" => Some(AnimationKind::Circle),
            "spiral" => Some(AnimationKind::Spiral),
            "shake" => Some(AnimationKind::Shake),
            _ => None,
        }
    }
}
