use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::colorize::CacheMode;
use crate::data::EntityKind;

pub mod plugin_params;

pub use plugin_params::ParamError;

pub const DEFAULT_CONFIG_PATH: &str = "battlelog.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Lines kept in the battle log scrollback
    pub max_log_count: usize,
    /// Entries kept by the colorizer cache
    pub cache_size: usize,
    pub cache_mode: CacheMode,
    pub render: RenderConfig,
    pub colors: ColorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_log_count: 8,
            cache_size: 100,
            cache_mode: CacheMode::default(),
            render: RenderConfig::default(),
            colors: ColorConfig::default(),
        }
    }
}

/// Window styling handed through to the host renderer untouched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub font_size: u32,
    pub line_height: u32,
    pub offset_x: i32,
    pub offset_y: i32,
    pub outline_width: u32,
    pub outline_color: String,
    /// 0 stretches the log to the screen edge
    pub log_width: u32,
    pub no_battle_log_background: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            font_size: 28,
            line_height: 36,
            offset_x: 0,
            offset_y: 0,
            outline_width: 3,
            outline_color: "rgba(0, 0, 0, 0.6)".to_string(),
            log_width: 0,
            no_battle_log_background: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub actor: u32,
    pub enemy: u32,
    pub item: u32,
    pub skill: u32,
    pub actor_enabled: bool,
    pub enemy_enabled: bool,
    pub item_enabled: bool,
    pub skill_enabled: bool,
    pub additional: Vec<CustomColorConfig>,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            actor: 1,
            enemy: 26,
            item: 3,
            skill: 4,
            actor_enabled: true,
            enemy_enabled: true,
            item_enabled: true,
            skill_enabled: true,
            additional: Vec::new(),
        }
    }
}

impl ColorConfig {
    /// Color and toggle of a built-in category
    pub fn builtin(&self, kind: EntityKind) -> (u32, bool) {
        match kind {
            EntityKind::Actor => (self.actor, self.actor_enabled),
            EntityKind::Enemy => (self.enemy, self.enemy_enabled),
            EntityKind::Item => (self.item, self.item_enabled),
            EntityKind::Skill => (self.skill, self.skill_enabled),
        }
    }

    pub fn set_builtin(&mut self, kind: EntityKind, color: u32, enabled: bool) {
        let (c, e) = match kind {
            EntityKind::Actor => (&mut self.actor, &mut self.actor_enabled),
            EntityKind::Enemy => (&mut self.enemy, &mut self.enemy_enabled),
            EntityKind::Item => (&mut self.item, &mut self.item_enabled),
            EntityKind::Skill => (&mut self.skill, &mut self.skill_enabled),
        };
        *c = color;
        *e = enabled;
    }
}

/// A user-defined keyword group. Validated when the colorizer is built, so
/// a bad entry only disables itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomColorConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub color: ColorValue,
    #[serde(default)]
    pub keywords: KeywordList,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    Code(i64),
    Text(String),
    /// Any other TOML value, rejected when the colorizer is built
    Other(toml::Value),
}

impl fmt::Display for ColorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorValue::Code(code) => write!(f, "{}", code),
            ColorValue::Text(text) => f.write_str(text),
            ColorValue::Other(value) => write!(f, "{}", value),
        }
    }
}

/// Keywords either as a list or in the host's JSON-encoded string form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeywordList {
    List(Vec<String>),
    Encoded(String),
    Other(toml::Value),
}

impl Default for KeywordList {
    fn default() -> Self {
        KeywordList::List(Vec::new())
    }
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config '{}'", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config '{}'", path.display()))
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// The default configuration rendered as TOML
    pub fn default_toml() -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(&Config::default())?)
    }
}
