use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::data::NameSource;
use crate::markup;

pub mod cache;
pub mod category;

pub use cache::{CacheStats, FifoCache};
pub use category::{build_categories, CategoryError, ColorCategory, Keywords};

/// What the colorizer cache remembers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheMode {
    /// (keyword, color) -> wrapped fragment
    #[default]
    Fragment,
    /// Raw input line -> colorized line
    Line,
}

/// The replacement for one keyword in one color, with a literal matcher
#[derive(Debug, Clone)]
pub struct Fragment {
    keyword: String,
    replacement: String,
    matcher: Option<Regex>,
}

impl Fragment {
    pub fn new(keyword: &str, color: u32) -> Self {
        // Escaped, so names like "Potion (L)" or "$100" match literally.
        // Only a keyword past the regex size limit fails to compile.
        let matcher = Regex::new(&regex::escape(keyword)).ok();
        Self {
            keyword: keyword.to_string(),
            replacement: markup::wrap(keyword, color),
            matcher,
        }
    }

    pub fn text(&self) -> &str {
        &self.replacement
    }

    /// Replace every occurrence of the keyword in `text`
    pub fn apply(&self, text: &str) -> String {
        match &self.matcher {
            Some(re) => re.replace_all(text, NoExpand(&self.replacement)).into_owned(),
            None => text.replace(&self.keyword, &self.replacement),
        }
    }
}

enum ColorCache {
    Fragment(FifoCache<(String, u32), Fragment>),
    Line(FifoCache<String, String>),
}

impl ColorCache {
    fn new(mode: CacheMode, max_size: usize) -> Self {
        match mode {
            CacheMode::Fragment => ColorCache::Fragment(FifoCache::new(max_size)),
            CacheMode::Line => ColorCache::Line(FifoCache::new(max_size)),
        }
    }
}

/// Wraps known names in a battle-log line with `\c[N]...\c[0]`.
///
/// Categories run in order and each one works on the output of the
/// previous, so a later keyword can match inside markup an earlier one
/// inserted (for example a keyword `c` hits every `\c[`). Content may rely
/// on this, so it is left alone.
pub struct KeywordColorizer<S> {
    categories: Vec<ColorCategory>,
    cache: ColorCache,
    source: S,
    config_errors: Vec<CategoryError>,
}

impl<S: NameSource> KeywordColorizer<S> {
    pub fn new(categories: Vec<ColorCategory>, cache_size: usize, mode: CacheMode, source: S) -> Self {
        Self {
            categories,
            cache: ColorCache::new(mode, cache_size),
            source,
            config_errors: Vec::new(),
        }
    }

    /// Build from configuration. Malformed user categories are skipped and
    /// kept in [`KeywordColorizer::config_errors`].
    pub fn from_config(config: &Config, source: S) -> Self {
        let (categories, errors) = build_categories(&config.colors);
        let mut colorizer = Self::new(categories, config.cache_size, config.cache_mode, source);
        colorizer.config_errors = errors;
        colorizer
    }

    pub fn colorize(&mut self, text: &str) -> String {
        let categories = &self.categories;
        let source = &self.source;

        match &mut self.cache {
            ColorCache::Line(cache) => cache.get_or_insert_with(text.to_string(), || {
                apply_categories(categories, source, text, |keyword, color| Fragment::new(keyword, color))
            }),
            ColorCache::Fragment(cache) => apply_categories(categories, source, text, |keyword, color| {
                cache.get_or_insert_with((keyword.to_string(), color), || Fragment::new(keyword, color))
            }),
        }
    }

    /// Drop every cached entry.
    ///
    /// In fragment mode cached entries only depend on keyword and color, so
    /// clearing never changes output there. In line mode a hit skips the name
    /// lookup, so lines cached before a database reload keep their old
    /// coloring until this runs. The host calls it on map change and on the
    /// clear-cache command.
    pub fn invalidate(&mut self) {
        let dropped = self.cache_len();
        match &mut self.cache {
            ColorCache::Fragment(cache) => cache.clear(),
            ColorCache::Line(cache) => cache.clear(),
        }
        tracing::debug!(dropped, "colorizer cache cleared");
    }

    pub fn cache_len(&self) -> usize {
        match &self.cache {
            ColorCache::Fragment(cache) => cache.len(),
            ColorCache::Line(cache) => cache.len(),
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        match &self.cache {
            ColorCache::Fragment(cache) => cache.stats(),
            ColorCache::Line(cache) => cache.stats(),
        }
    }

    pub fn cache_mode(&self) -> CacheMode {
        match self.cache {
            ColorCache::Fragment(_) => CacheMode::Fragment,
            ColorCache::Line(_) => CacheMode::Line,
        }
    }

    /// Whether a fragment for this pair is cached (fragment mode only)
    pub fn has_fragment(&self, keyword: &str, color: u32) -> bool {
        match &self.cache {
            ColorCache::Fragment(cache) => cache.contains_key(&(keyword.to_string(), color)),
            ColorCache::Line(_) => false,
        }
    }

    /// Cached (keyword, color) pairs, oldest first (fragment mode only)
    pub fn cached_fragments(&self) -> Vec<(String, u32)> {
        match &self.cache {
            ColorCache::Fragment(cache) => cache.keys().cloned().collect(),
            ColorCache::Line(_) => Vec::new(),
        }
    }

    pub fn categories(&self) -> &[ColorCategory] {
        &self.categories
    }

    pub fn config_errors(&self) -> &[CategoryError] {
        &self.config_errors
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Mutable access to the name provider, e.g. to reload game data
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

fn apply_categories(
    categories: &[ColorCategory],
    source: &impl NameSource,
    text: &str,
    mut fragment_for: impl FnMut(&str, u32) -> Fragment,
) -> String {
    let mut text = text.to_string();

    for category in categories.iter().filter(|c| c.enabled) {
        for keyword in category.keywords(source).iter() {
            if keyword.is_empty() || !text.contains(keyword.as_str()) {
                continue;
            }
            let fragment = fragment_for(keyword, category.color);
            text = fragment.apply(&text);
        }
    }

    text
}
