use std::borrow::Cow;

use crate::config::{ColorConfig, ColorValue, CustomColorConfig, KeywordList};
use crate::data::{EntityKind, NameSource};

/// Where a category gets its keywords from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keywords {
    /// Names fetched from the database on every pass
    Lookup(EntityKind),
    /// A fixed user-supplied list
    Fixed(Vec<String>),
}

/// A group of keywords drawn in one color, with its own toggle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorCategory {
    pub name: String,
    pub keywords: Keywords,
    pub color: u32,
    pub enabled: bool,
}

impl ColorCategory {
    pub fn builtin(kind: EntityKind, color: u32, enabled: bool) -> Self {
        Self {
            name: kind.to_string(),
            keywords: Keywords::Lookup(kind),
            color,
            enabled,
        }
    }

    pub fn custom(name: impl Into<String>, keywords: Vec<String>, color: u32) -> Self {
        Self {
            name: name.into(),
            keywords: Keywords::Fixed(keywords),
            color,
            enabled: true,
        }
    }

    /// Current keyword list for this category
    pub fn keywords<'a>(&'a self, source: &impl NameSource) -> Cow<'a, [String]> {
        match &self.keywords {
            Keywords::Lookup(kind) => Cow::Owned(source.names(*kind)),
            Keywords::Fixed(list) => Cow::Borrowed(list.as_slice()),
        }
    }
}

/// A user category that could not be built. The category is skipped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CategoryError {
    #[error("additional color #{index}: invalid color code '{value}'")]
    InvalidColor { index: usize, value: String },
    #[error("additional color #{index}: invalid keyword list: {reason}")]
    InvalidKeywords { index: usize, reason: String },
}

/// Build the category list: actor, enemy, item, skill, then user categories
/// in configured order. Malformed user categories are left out and returned
/// alongside.
pub fn build_categories(colors: &ColorConfig) -> (Vec<ColorCategory>, Vec<CategoryError>) {
    let mut categories: Vec<ColorCategory> = EntityKind::ALL
        .into_iter()
        .map(|kind| {
            let (color, enabled) = colors.builtin(kind);
            ColorCategory::builtin(kind, color, enabled)
        })
        .collect();
    let mut errors = Vec::new();

    for (index, custom) in colors.additional.iter().enumerate() {
        match custom_category(index, custom) {
            Ok(category) => categories.push(category),
            Err(err) => {
                tracing::warn!("skipping color category: {}", err);
                errors.push(err);
            }
        }
    }

    (categories, errors)
}

fn custom_category(index: usize, custom: &CustomColorConfig) -> Result<ColorCategory, CategoryError> {
    let color = parse_color(&custom.color).ok_or_else(|| CategoryError::InvalidColor {
        index,
        value: custom.color.to_string(),
    })?;

    let keywords = match &custom.keywords {
        KeywordList::List(list) => list.clone(),
        KeywordList::Encoded(raw) if raw.trim().is_empty() => Vec::new(),
        KeywordList::Encoded(raw) => serde_json::from_str::<Vec<String>>(raw).map_err(|e| {
            CategoryError::InvalidKeywords {
                index,
                reason: e.to_string(),
            }
        })?,
        KeywordList::Other(value) => {
            return Err(CategoryError::InvalidKeywords {
                index,
                reason: format!("expected a list of strings, found {}", value.type_str()),
            });
        }
    };

    let name = custom
        .name
        .clone()
        .unwrap_or_else(|| format!("additional #{}", index));
    Ok(ColorCategory::custom(name, keywords, color))
}

/// A blank string means color 0, as the host's parameter editor stores it.
fn parse_color(value: &ColorValue) -> Option<u32> {
    match value {
        ColorValue::Code(code) => u32::try_from(*code).ok(),
        ColorValue::Text(text) if text.trim().is_empty() => Some(0),
        ColorValue::Text(text) => text.trim().parse().ok(),
        ColorValue::Other(_) => None,
    }
}
