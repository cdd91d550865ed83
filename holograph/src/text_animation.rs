use std::collections::HashMap;
use std::path::Path;
use std::{fs, io};

use log::{info, warn};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

const TOKEN_OPEN: &str = "{anim:";

struct TextAnimation {
    frames: Vec<String>,
    speed: u32,
    frame: usize,
    ticks: u32,
}

impl TextAnimation {
    fn new(frames: Vec<String>, speed: u32) -> Self {
        TextAnimation {
            frames,
            speed,
            frame: 0,
            ticks: 0,
        }
    }

    fn current_frame(&self) -> &str {
        &self.frames[self.frame]
    }

    fn advance(&mut self) {
        self.ticks += 1;
        if self.ticks >= self.speed {
            self.ticks = 0;
            self.frame = (self.frame + 1) % self.frames.len();
        }
    }
}

/// Named frame sequences, advanced in lockstep by the refresh scheduler and
/// spliced into hologram text wherever an `{anim:name}` token appears.
/// Names are case-insensitive; unknown tokens pass through untouched.
#[derive(Default)]
pub struct TextAnimations {
    animations: RwLock<HashMap<String, TextAnimation>>,
}

/// On-disk shape of one animation, one TOML file each.
#[derive(Deserialize, Serialize)]
struct AnimationFile {
    /// Defaults to the file stem.
    name: Option<String>,
    #[serde(default = "default_speed")]
    speed: u32,
    frames: Vec<String>,
}

fn default_speed() -> u32 {
    5
}

const DEFAULT_ANIMATIONS: &[(&str, u32, &[&str])] = &[
    (
        "wave",
        5,
        &[
            "▁▂▃▄▅▆▇█",
            "▂▃▄▅▆▇█▁",
            "▃▄▅▆▇█▁▂",
            "▄▅▆▇█▁▂▃",
            "▅▆▇█▁▂▃▄",
            "▆▇█▁▂▃▄▅",
            "▇█▁▂▃▄▅▆",
            "█▁▂▃▄▅▆▇",
        ],
    ),
    (
        "loading",
        3,
        &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"],
    ),
    ("arrow", 5, &["→", "↗", "↑", "↖", "←", "↙", "↓", "↘"]),
    ("dots", 10, &["   ", ".  ", ".. ", "..."]),
];

/// Locates the next well-formed token at or after `from`. Returns the byte
/// ranges of the whole token and of the name inside it.
fn find_token(text: &str, mut from: usize) -> Option<(usize, usize, usize)> {
    while from < text.len() {
        let start = text[from..].find(TOKEN_OPEN)? + from;
        let name_start = start + TOKEN_OPEN.len();
        let close = text[name_start..].find('}')?;
        let name_end = name_start + close;
        if name_end > name_start {
            return Some((start, name_start, name_end));
        }
        // `{anim:}` carries no name; scan on behind the prefix.
        from = name_start;
    }
    None
}

impl TextAnimations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, name: &str, frames: Vec<String>, speed: u32) {
        if frames.is_empty() {
            warn!("Ignoring text animation `{name}` with no frames");
            return;
        }
        self.animations
            .write()
            .insert(name.to_lowercase(), TextAnimation::new(frames, speed));
    }

    pub fn register_defaults(&self) {
        for (name, speed, frames) in DEFAULT_ANIMATIONS {
            self.register(name, frames.iter().map(|s| s.to_string()).collect(), *speed);
        }
    }

    pub fn len(&self) -> usize {
        self.animations.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.read().is_empty()
    }

    /// One global step: every animation advances its own tick counter, so
    /// all holograms referencing a sequence show the same frame.
    pub fn tick(&self) {
        for animation in self.animations.write().values_mut() {
            animation.advance();
        }
    }

    pub fn contains_tokens(&self, text: &str) -> bool {
        find_token(text, 0).is_some()
    }

    pub fn substitute(&self, text: &str) -> String {
        let animations = self.animations.read();
        let mut out = String::with_capacity(text.len());
        let mut cursor = 0;
        while let Some((start, name_start, name_end)) = find_token(text, cursor) {
            out.push_str(&text[cursor..start]);
            let name = text[name_start..name_end].to_lowercase();
            let token_end = name_end + 1;
            match animations.get(&name) {
                Some(animation) => out.push_str(animation.current_frame()),
                None => out.push_str(&text[start..token_end]),
            }
            cursor = token_end;
        }
        out.push_str(&text[cursor..]);
        out
    }

    /// Registers every `*.toml` animation under `dir`, skipping files that
    /// fail to parse. Returns how many were loaded.
    pub fn load_dir(&self, dir: &Path) -> usize {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!("Couldn't read text animation directory {:?}: {}", dir, err);
                return 0;
            }
        };

        let mut count = 0;
        for entry in entries {
            let Ok(entry) = entry else {
                continue;
            };
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("toml") {
                continue;
            }
            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(err) => {
                    warn!("Skipping unreadable text animation {:?}: {}", path, err);
                    continue;
                }
            };
            let file: AnimationFile = match toml::from_str(&content) {
                Ok(file) => file,
                Err(err) => {
                    warn!("Skipping malformed text animation {:?}: {}", path, err);
                    continue;
                }
            };
            let name = file.name.or_else(|| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(str::to_string)
            });
            let Some(name) = name else {
                continue;
            };
            if file.frames.is_empty() {
                warn!("Skipping text animation `{name}`: no frames");
                continue;
            }
            self.register(&name, file.frames, file.speed);
            count += 1;
        }
        info!("Loaded {count} text animation(s)");
        count
    }
}

/// Writes the built-in animations as editable TOML files, one per
/// animation, so server owners have a template to copy.
pub fn write_default_files(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    for (name, speed, frames) in DEFAULT_ANIMATIONS {
        let file = AnimationFile {
            name: Some((*name).to_string()),
            speed: *speed,
            frames: frames.iter().map(|s| s.to_string()).collect(),
        };
        let content = toml::to_string(&file)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        fs::write(dir.join(format!("{name}.toml")), content)?;
    }
    Ok(())
}
