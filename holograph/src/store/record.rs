use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;
use std::fmt::Write as _;
use std::str::FromStr;

use holograph_core::color::{Argb, Rgb};
use holograph_core::location::Location;
use holograph_core::math::vector3::Vector3;
use log::warn;
use thiserror::Error;

use crate::model::{
    AnimationKind, BillboardMode, HoloKind, HologramDefinition, LeaderboardEntry, LeaderboardStyle,
    TextAlignment,
};

/// One definition is stored as a flat `key: value` text record. Keys are
/// dotted for grouping, `line` repeats in display order, and everything
/// except `id`, `kind` and `location` falls back to its default when
/// absent.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("unknown hologram kind `{0}`")]
    UnknownKind(String),
    #[error("malformed location `{0}`")]
    MalformedLocation(String),
    #[error("invalid value `{value}` for `{key}`")]
    InvalidValue { key: String, value: String },
}

fn invalid(key: &str, value: &str) -> RecordError {
    RecordError::InvalidValue {
        key: key.to_string(),
        value: value.trim().to_string(),
    }
}

fn parse_field<T: FromStr>(key: &str, value: &str) -> Result<T, RecordError> {
    value.trim().parse().map_err(|_| invalid(key, value))
}

fn parse_vec3(key: &str, value: &str) -> Result<Vector3<f64>, RecordError> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(invalid(key, value));
    }
    Ok(Vector3::new(
        parse_field(key, parts[0])?,
        parse_field(key, parts[1])?,
        parse_field(key, parts[2])?,
    ))
}

fn fmt_vec3(vector: &Vector3<f64>) -> String {
    format!("{},{},{}", vector.x, vector.y, vector.z)
}

fn put(out: &mut String, key: &str, value: impl Display) {
    let _ = writeln!(out, "{key}: {value}");
}

pub fn encode(def: &HologramDefinition) -> String {
    let mut out = String::new();

    put(&mut out, "id", def.id());
    put(&mut out, "kind", def.kind().record_name());
    put(&mut out, "location", &def.location);
    for line in &def.lines {
        put(&mut out, "line", line);
    }

    put(&mut out, "shadow", def.shadow);
    put(&mut out, "alignment", def.alignment.record_name());
    put(&mut out, "opacity", def.opacity);
    put(&mut out, "background.enabled", def.background_enabled);
    put(&mut out, "background.color", def.background_color);
    put(&mut out, "background.padding", def.background_padding);

    put(&mut out, "view.range", def.view_range);
    put(&mut out, "view.see-through-blocks", def.see_through_blocks);
    put(&mut out, "scale", fmt_vec3(&def.scale));
    put(&mut out, "billboard", def.billboard.record_name());
    put(&mut out, "translation", fmt_vec3(&def.translation));

    if matches!(def.kind(), HoloKind::Item | HoloKind::Block) {
        put(&mut out, "material", &def.material);
        put(&mut out, "glowing", def.glowing);
        put(&mut out, "glow-color", def.glow_color);
        put(&mut out, "on-fire", def.on_fire);
    }

    put(&mut out, "placeholders.enabled", def.placeholders_enabled);
    put(&mut out, "placeholders.refresh", def.refresh_ticks());

    put(&mut out, "animation.enabled", def.animated);
    put(&mut out, "animation.type", def.animation.record_name());
    put(&mut out, "animation.speed", def.animation_speed);
    put(&mut out, "animation.radius", def.animation_radius);

    put(&mut out, "particles.enabled", def.particles_enabled);
    put(&mut out, "particles.type", &def.particle_type);
    put(&mut out, "particles.count", def.particle_count);
    put(&mut out, "particles.radius", def.particle_radius);

    put(&mut out, "text-offset", def.text_offset);

    if def.kind() == HoloKind::Leaderboard {
        if let Some(board) = &def.leaderboard {
            put(&mut out, "leaderboard.title", &board.title);
            put(&mut out, "leaderboard.max-entries", board.max_entries);
            put(&mut out, "leaderboard.suffix", &board.suffix);
            put(&mut out, "leaderboard.style", board.style.record_name());
            put(
                &mut out,
                "leaderboard.show-empty-places",
                board.show_empty_places,
            );
            put(&mut out, "leaderboard.title-format", &board.title_format);
            put(&mut out, "leaderboard.footer-format", &board.footer_format);
            put(
                &mut out,
                "leaderboard.default-place-format",
                &board.default_place_format,
            );
            for (index, format) in board.place_formats.iter().enumerate() {
                put(
                    &mut out,
                    &format!("leaderboard.place-format.{}", index + 1),
                    format,
                );
            }
            put(&mut out, "leaderboard.line-height", board.line_height);
            put(&mut out, "leaderboard.background.enabled", board.background);
            put(
                &mut out,
                "leaderboard.background.color",
                board.background_color,
            );
            for entry in &board.entries {
                put(
                    &mut out,
                    &format!("leaderboard.entry.{}.name", entry.rank),
                    &entry.name_source,
                );
                put(
                    &mut out,
                    &format!("leaderboard.entry.{}.score", entry.rank),
                    &entry.score_source,
                );
            }
        }
    }

    out
}

pub fn decode(content: &str) -> Result<HologramDefinition, RecordError> {
    let mut fields: Vec<(&str, &str)> = Vec::new();
    for raw in content.lines() {
        let line = raw.trim_start();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        // Values keep their spacing; only the single separator space goes.
        fields.push((key.trim(), rest.strip_prefix(' ').unwrap_or(rest)));
    }

    let lookup = |wanted: &str| {
        fields
            .iter()
            .find(|(key, _)| *key == wanted)
            .map(|(_, value)| *value)
    };

    let id = lookup("id")
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(RecordError::MissingField("id"))?;
    let kind_name = lookup("kind").ok_or(RecordError::MissingField("kind"))?;
    let kind = HoloKind::from_record_name(kind_name.trim())
        .ok_or_else(|| RecordError::UnknownKind(kind_name.trim().to_string()))?;
    let location_text = lookup("location").ok_or(RecordError::MissingField("location"))?;
    let location = Location::parse(location_text)
        .ok_or_else(|| RecordError::MalformedLocation(location_text.trim().to_string()))?;

    let mut def = HologramDefinition::new(id, kind, location);
    let mut place_formats: BTreeMap<u32, String> = BTreeMap::new();
    let mut entry_names: BTreeMap<u32, String> = BTreeMap::new();
    let mut entry_scores: BTreeMap<u32, String> = BTreeMap::new();

    for (key, value) in &fields {
        match *key {
            "id" | "kind" | "location" => {}
            "line" => def.add_line(*value),
            "shadow" => def.shadow = parse_field(key, value)?,
            "alignment" => {
                def.alignment = TextAlignment::from_record_name(value.trim())
                    .ok_or_else(|| invalid(key, value))?;
            }
            "opacity" => def.opacity = parse_field(key, value)?,
            "background.enabled" => def.background_enabled = parse_field(key, value)?,
            "background.color" => {
                def.background_color = Argb::parse(value).ok_or_else(|| invalid(key, value))?;
            }
            "background.padding" => def.background_padding = parse_field(key, value)?,
            "view.range" => def.view_range = parse_field(key, value)?,
            "view.see-through-blocks" => def.see_through_blocks = parse_field(key, value)?,
            "scale" => def.scale = parse_vec3(key, value)?,
            "billboard" => {
                def.billboard = BillboardMode::from_record_name(value.trim())
                    .ok_or_else(|| invalid(key, value))?;
            }
            "translation" => def.translation = parse_vec3(key, value)?,
            "material" => def.material = value.trim().to_lowercase(),
            "glowing" => def.glowing = parse_field(key, value)?,
            "glow-color" => {
                def.glow_color = Rgb::parse(value).ok_or_else(|| invalid(key, value))?;
            }
            "on-fire" => def.on_fire = parse_field(key, value)?,
            "placeholders.enabled" => def.placeholders_enabled = parse_field(key, value)?,
            "placeholders.refresh" => {
                let ticks: u32 = parse_field(key, value)?;
                if ticks == 0 {
                    warn!(
                        "Hologram {} has a zero refresh interval, using 1 tick instead",
                        def.id()
                    );
                }
                def.set_refresh_ticks(ticks);
            }
            "animation.enabled" => def.animated = parse_field(key, value)?,
            "animation.type" => {
                def.animation = AnimationKind::from_record_name(value.trim())
                    .ok_or_else(|| invalid(key, value))?;
            }
            "animation.speed" => def.animation_speed = parse_field(key, value)?,
            "animation.radius" => def.animation_radius = parse_field(key, value)?,
            "particles.enabled" => def.particles_enabled = parse_field(key, value)?,
            "particles.type" => def.particle_type = value.trim().to_lowercase(),
            "particles.count" => def.particle_count = parse_field(key, value)?,
            "particles.radius" => def.particle_radius = parse_field(key, value)?,
            "text-offset" => def.text_offset = parse_field(key, value)?,
            _ => {
                if let Some(board_key) = key.strip_prefix("leaderboard.") {
                    apply_leaderboard_field(
                        &mut def,
                        board_key,
                        key,
                        value,
                        &mut place_formats,
                        &mut entry_names,
                        &mut entry_scores,
                    )?;
                }
                // Anything else is an unknown key left for newer versions.
            }
        }
    }

    if !place_formats.is_empty() || !entry_names.is_empty() || !entry_scores.is_empty() {
        let board = def.leaderboard.get_or_insert_with(Default::default);
        board.place_formats = place_formats.into_values().collect();

        let ranks: BTreeSet<u32> = entry_names
            .keys()
            .chain(entry_scores.keys())
            .copied()
            .collect();
        board.entries = ranks
            .into_iter()
            .map(|rank| LeaderboardEntry {
                rank,
                name_source: entry_names.remove(&rank).unwrap_or_default(),
                score_source: entry_scores.remove(&rank).unwrap_or_default(),
            })
            .collect();
    }

    Ok(def)
}

#[allow(clippy::too_many_arguments)]
fn apply_leaderboard_field(
    def: &mut HologramDefinition,
    board_key: &str,
    key: &str,
    value: &str,
    place_formats: &mut BTreeMap<u32, String>,
    entry_names: &mut BTreeMap<u32, String>,
    entry_scores: &mut BTreeMap<u32, String>,
) -> Result<(), RecordError> {
    let board = def.leaderboard.get_or_insert_with(Default::default);
    match board_key {
        "title" => board.title = value.to_string(),
        "max-entries" => board.max_entries = parse_field(key, value)?,
        "suffix" => board.suffix = value.to_string(),
        "style" => {
            board.style = LeaderboardStyle::from_record_name(value.trim()).unwrap_or_else(|| {
                warn!(
                    "Unknown leaderboard style `{}`, falling back to top_player_head",
                    value.trim()
                );
                LeaderboardStyle::TopPlayerHead
            });
        }
        "show-empty-places" => board.show_empty_places = parse_field(key, value)?,
        "title-format" => board.title_format = value.to_string(),
        "footer-format" => board.footer_format = value.to_string(),
        "default-place-format" => board.default_place_format = value.to_string(),
        "line-height" => board.line_height = parse_field(key, value)?,
        "background.enabled" => board.background = parse_field(key, value)?,
        "background.color" => {
            board.background_color = Argb::parse(value).ok_or_else(|| invalid(key, value))?;
        }
        _ => {
            if let Some(rank) = board_key.strip_prefix("place-format.") {
                place_formats.insert(parse_field(key, rank)?, value.to_string());
            } else if let Some(entry_key) = board_key.strip_prefix("entry.") {
                let (rank, field) = entry_key
                    .split_once('.')
                    .ok_or_else(|| invalid(key, value))?;
                let rank: u32 = parse_field(key, rank)?;
                match field {
                    "name" => {
                        entry_names.insert(rank, value.to_string());
                    }
                    "score" => {
                        entry_scores.insert(rank, value.to_string());
                    }
                    _ => {}
                }
            }
        }
    }
    Ok(())
}
