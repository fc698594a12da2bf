//! Reading configuration from the host's `js/plugins.js`, where each
//! plugin's parameters are stored as a flat map of strings.

use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;

use super::{ColorValue, Config, CustomColorConfig, KeywordList};
use crate::data::EntityKind;

pub const ACCUMULATION_PLUGIN: &str = "stwv_accumulationBattleLog";
pub const COLORED_PLUGIN: &str = "stwv_coloredBattleLog";

/// A parameter that could not be used. The default is kept instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamError {
    #[error("parameter '{key}': '{value}' is not a number")]
    NotANumber { key: String, value: String },
    #[error("parameter '{key}': '{value}' is not true or false")]
    NotABoolean { key: String, value: String },
    #[error("parameter 'Additional Colors' is not a JSON array: {reason}")]
    MalformedColorList { reason: String },
    #[error("additional color #{index} could not be decoded: {reason}")]
    MalformedColorEntry { index: usize, reason: String },
}

#[derive(Debug, Clone, Deserialize)]
struct PluginEntry {
    name: String,
    #[serde(default)]
    status: bool,
    #[serde(default)]
    parameters: HashMap<String, String>,
}

// One element of "Additional Colors", itself JSON-encoded by the editor
#[derive(Debug, Deserialize)]
struct ColorKeywordParam {
    #[serde(rename = "Color", default)]
    color: String,
    #[serde(rename = "Keywords", default)]
    keywords: String,
}

impl Config {
    /// Build a config from the contents of `js/plugins.js`.
    ///
    /// Plugins are looked up by name ignoring ASCII case, as the host does.
    /// Plugins that are missing or switched off leave their settings at the
    /// defaults. Unusable parameter values are logged and skipped.
    pub fn from_plugins_js(text: &str) -> anyhow::Result<Self> {
        let plugins = parse_plugin_list(text)?;
        let params_of = |name: &str| {
            plugins
                .iter()
                .find(|p| p.status && p.name.eq_ignore_ascii_case(name))
                .map(|p| &p.parameters)
        };

        let (config, errors) =
            Config::from_plugin_parameters(params_of(ACCUMULATION_PLUGIN), params_of(COLORED_PLUGIN));
        for err in &errors {
            tracing::warn!("{}", err);
        }
        Ok(config)
    }

    /// Map both plugins' raw parameters onto a config.
    pub fn from_plugin_parameters(
        accumulation: Option<&HashMap<String, String>>,
        colored: Option<&HashMap<String, String>>,
    ) -> (Self, Vec<ParamError>) {
        let mut config = Config::default();
        let mut errors = Vec::new();

        if let Some(params) = accumulation {
            let mut p = ParamReader { params, errors: &mut errors };
            let render = &mut config.render;
            config.max_log_count = p.count("maxLogCount", config.max_log_count);
            render.no_battle_log_background = p.flag("noBattleLogBackground", render.no_battle_log_background);
            render.font_size = p.number("fontSize", render.font_size);
            render.line_height = p.number("lineHeight", render.line_height);
            render.offset_x = p.number("offsetX", render.offset_x);
            render.offset_y = p.number("offsetY", render.offset_y);
            render.outline_width = p.number("outlineWidth", render.outline_width);
            render.log_width = p.number("logWidth", render.log_width);
            if let Some(color) = p.text("outlineColor") {
                render.outline_color = color.to_string();
            }
        }

        if let Some(params) = colored {
            let mut p = ParamReader { params, errors: &mut errors };
            for kind in EntityKind::ALL {
                let (color, enabled) = config.colors.builtin(kind);
                let label = capitalized(kind);
                let color = p.number(&format!("{} Color", label), color);
                let enabled = p.flag(&format!("{} Enabled", label), enabled);
                config.colors.set_builtin(kind, color, enabled);
            }
            config.cache_size = p.count("Cache Size", config.cache_size);
            if let Some(raw) = p.text("Additional Colors") {
                let raw = raw.to_string();
                config.colors.additional = decode_additional_colors(&raw, &mut errors);
            }
        }

        (config, errors)
    }
}

fn parse_plugin_list(text: &str) -> anyhow::Result<Vec<PluginEntry>> {
    let start = text
        .find("$plugins")
        .and_then(|pos| text[pos..].find('[').map(|offset| pos + offset))
        .ok_or_else(|| anyhow::anyhow!("plugins.js does not define $plugins"))?;
    let end = text
        .rfind(']')
        .filter(|&end| end > start)
        .ok_or_else(|| anyhow::anyhow!("plugins.js has an unterminated $plugins list"))?;

    let plugins = serde_json::from_str(&text[start..=end])?;
    Ok(plugins)
}

fn decode_additional_colors(raw: &str, errors: &mut Vec<ParamError>) -> Vec<CustomColorConfig> {
    let entries: Vec<String> = match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(e) => {
            errors.push(ParamError::MalformedColorList { reason: e.to_string() });
            return Vec::new();
        }
    };

    let mut colors = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        match serde_json::from_str::<ColorKeywordParam>(entry) {
            Ok(param) => colors.push(CustomColorConfig {
                name: None,
                color: ColorValue::Text(param.color),
                keywords: KeywordList::Encoded(param.keywords),
            }),
            Err(e) => errors.push(ParamError::MalformedColorEntry {
                index,
                reason: e.to_string(),
            }),
        }
    }
    colors
}

fn capitalized(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Actor => "Actor",
        EntityKind::Enemy => "Enemy",
        EntityKind::Item => "Item",
        EntityKind::Skill => "Skill",
    }
}

struct ParamReader<'a> {
    params: &'a HashMap<String, String>,
    errors: &'a mut Vec<ParamError>,
}

impl<'a> ParamReader<'a> {
    /// Non-blank value for `key`
    fn text(&self, key: &str) -> Option<&'a str> {
        self.params
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    fn number<T: FromStr>(&mut self, key: &str, default: T) -> T {
        let Some(value) = self.text(key) else {
            return default;
        };
        match value.parse() {
            Ok(n) => n,
            Err(_) => {
                self.errors.push(ParamError::NotANumber {
                    key: key.to_string(),
                    value: value.to_string(),
                });
                default
            }
        }
    }

    /// Capacities below zero mean "keep nothing"
    fn count(&mut self, key: &str, default: usize) -> usize {
        let signed = self.number::<i64>(key, default as i64);
        usize::try_from(signed.max(0)).unwrap_or(default)
    }

    fn flag(&mut self, key: &str, default: bool) -> bool {
        match self.text(key) {
            None => default,
            Some("true") => true,
            Some("false") => false,
            Some(value) => {
                self.errors.push(ParamError::NotABoolean {
                    key: key.to_string(),
                    value: value.to_string(),
                });
                default
            }
        }
    }
}
