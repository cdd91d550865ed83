use holograph_core::color::Argb;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeaderboardStyle {
    TopPlayerHead,
    AllPlayerHeads,
    SimpleText,
}

impl LeaderboardStyle {
    pub const fn record_name(&self) -> &'static str {
        match self {
            LeaderboardStyle::TopPlayerHead => "top_player_head",
            LeaderboardStyle::AllPlayerHeads => "all_player_heads",
            LeaderboardStyle::SimpleText => "simple_text",
        }
    }

    pub fn from_record_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "top_player_head" => Some(LeaderboardStyle::TopPlayerHead),
            "all_player_heads" => Some(LeaderboardStyle::AllPlayerHeads),
            "simple_text" => Some(LeaderboardStyle::SimpleText),
            _ => None,
        }
    }
}

/// One ranked slot. The name and score sources are raw placeholder strings,
/// resolved only while building the visible board.
#[derive(Clone, Debug, PartialEq)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub name_source: String,
    pub score_source: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LeaderboardConfig {
    pub title: String,
    /// Cap on visible places. When entries exist, the smaller of this and
    /// the entry count wins.
    pub max_entries: u32,
    pub suffix: String,
    pub style: LeaderboardStyle,
    pub show_empty_places: bool,
    pub title_format: String,
    pub footer_format: String,
    /// Per-place format overrides, first place first. Places beyond the list
    /// fall back to `default_place_format`.
    pub place_formats: Vec<String>,
    pub default_place_format: String,
    pub entries: Vec<LeaderboardEntry>,
    pub line_height: f64,
    pub background: bool,
    pub background_color: Argb,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            title: "Leaderboard".to_string(),
            max_entries: 10,
            suffix: "points".to_string(),
            style: LeaderboardStyle::TopPlayerHead,
            show_empty_places: false,
            title_format: "<gradient:#ff6000:#ffc663>--------- {title} ---------</gradient>"
                .to_string(),
            footer_format: String::new(),
            place_formats: Vec::new(),
            default_place_format: "<color:#ffb486><bold>{place}.</bold></color> \
                 <color:#ffb486>{name}</color> <gray>{score}</gray> <white>{suffix}</white>"
                .to_string(),
            entries: Vec::new(),
            line_height: 0.25,
            background: false,
            background_color: Argb::new(0x54, 0, 0, 0),
        }
    }
}
