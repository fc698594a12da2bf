use crate::colorize::KeywordColorizer;
use crate::config::{Config, RenderConfig};
use crate::data::NameSource;
use crate::log::{LogBuffer, LogLine};

/// Plugin commands the host can invoke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginCommand {
    ClearCache,
}

impl PluginCommand {
    /// Look up a command by its registered name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "clearCache" => Some(PluginCommand::ClearCache),
            _ => None,
        }
    }
}

/// Lifecycle signals from the host engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// The player moved to another map
    MapChanged { map_id: u32 },
    /// Battle processing ended; `in_battle` is whether the party was still
    /// flagged as in battle at that point
    BattleEnd { in_battle: bool },
    Command(PluginCommand),
}

/// One battle log window: raw lines are colorized, stored in the bounded
/// scrollback and handed to a renderer when something changed.
pub struct BattleLogSession<S> {
    colorizer: KeywordColorizer<S>,
    log: LogBuffer,
    render: RenderConfig,
}

impl<S: NameSource> BattleLogSession<S> {
    pub fn new(config: &Config, source: S) -> Self {
        Self {
            colorizer: KeywordColorizer::from_config(config, source),
            log: LogBuffer::new(config.max_log_count),
            render: config.render.clone(),
        }
    }

    /// Colorize a raw line from the host and append it to the log
    pub fn add_text(&mut self, raw: &str) {
        let line = self.colorizer.colorize(raw);
        self.log.append(LogLine::from(line));
    }

    pub fn handle(&mut self, event: HostEvent) {
        match event {
            HostEvent::MapChanged { map_id } => {
                tracing::debug!(map_id, "map changed");
                self.colorizer.invalidate();
            }
            HostEvent::BattleEnd { in_battle } => {
                if in_battle {
                    self.log.clear();
                }
            }
            HostEvent::Command(PluginCommand::ClearCache) => self.colorizer.invalidate(),
        }
    }

    /// Hand the current lines to `render` if anything changed since the
    /// last refresh. Returns whether `render` was called.
    pub fn refresh(&mut self, render: impl FnOnce(&[&LogLine])) -> bool {
        if !self.log.consume_dirty() {
            return false;
        }
        render(&self.log.snapshot());
        true
    }

    /// Rows the log window needs
    pub fn visible_rows(&self) -> usize {
        self.log.visible_count()
    }

    pub fn log(&self) -> &LogBuffer {
        &self.log
    }

    pub fn colorizer(&self) -> &KeywordColorizer<S> {
        &self.colorizer
    }

    pub fn colorizer_mut(&mut self) -> &mut KeywordColorizer<S> {
        &mut self.colorizer
    }

    pub fn render_config(&self) -> &RenderConfig {
        &self.render
    }
}
