//! Replay scripts: a plain-text battle transcript interleaved with host
//! events, for driving a [`BattleLogSession`](crate::session::BattleLogSession)
//! outside the engine.
//!
//! ```text
//! # comment
//! Reid attacks!
//! @render
//! @battle-end in-battle
//! @map 4
//! @clear-cache
//! @@literal line starting with @
//! ```

use anyhow::{anyhow, bail, Context};
use std::path::Path;

use crate::data::NameSource;
use crate::log::LogLine;
use crate::markup;
use crate::session::{BattleLogSession, HostEvent, PluginCommand};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    /// A raw battle-log line
    Text(String),
    Event(HostEvent),
    /// Show the window if it changed
    Render,
}

pub fn parse_script(content: &str) -> anyhow::Result<Vec<ScriptStep>> {
    let mut steps = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim_end();

        if trimmed.trim_start().is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix("@@") {
            steps.push(ScriptStep::Text(format!("@{}", rest)));
            continue;
        }

        match trimmed.strip_prefix('@') {
            Some(directive) => {
                let step = parse_directive(directive)
                    .with_context(|| format!("line {}: invalid directive '{}'", line_no, trimmed))?;
                steps.push(step);
            }
            None => steps.push(ScriptStep::Text(trimmed.to_string())),
        }
    }

    Ok(steps)
}

pub fn load_script(path: impl AsRef<Path>) -> anyhow::Result<Vec<ScriptStep>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script '{}'", path.display()))?;
    parse_script(&content)
}

fn parse_directive(directive: &str) -> anyhow::Result<ScriptStep> {
    let mut parts = directive.split_whitespace();
    let name = parts.next().ok_or_else(|| anyhow!("empty directive"))?;
    let arg = parts.next();
    if parts.next().is_some() {
        bail!("too many arguments");
    }

    let step = match (name, arg) {
        ("render", None) => ScriptStep::Render,
        ("clear-cache", None) => ScriptStep::Event(HostEvent::Command(PluginCommand::ClearCache)),
        ("map", Some(id)) => {
            let map_id: u32 = id.parse().with_context(|| format!("map id '{}' is not a number", id))?;
            ScriptStep::Event(HostEvent::MapChanged { map_id })
        }
        ("battle-end", None | Some("in-battle")) => {
            ScriptStep::Event(HostEvent::BattleEnd { in_battle: true })
        }
        ("battle-end", Some("after-battle")) => {
            ScriptStep::Event(HostEvent::BattleEnd { in_battle: false })
        }
        ("command", Some(command)) => {
            let command = PluginCommand::from_name(command)
                .ok_or_else(|| anyhow!("unknown plugin command '{}'", command))?;
            ScriptStep::Event(HostEvent::Command(command))
        }
        _ => bail!("unknown directive"),
    };

    Ok(step)
}

/// Run `steps` through `session` and return every frame that was drawn.
///
/// A frame is drawn at each `@render` with pending changes and once more
/// at the end if the last steps changed the log. With `plain` the color
/// markup is stripped; otherwise it becomes ANSI colors.
pub fn replay<S: NameSource>(session: &mut BattleLogSession<S>, steps: &[ScriptStep], plain: bool) -> String {
    let mut out = String::new();

    for step in steps {
        match step {
            ScriptStep::Text(text) => session.add_text(text),
            ScriptStep::Event(event) => session.handle(*event),
            ScriptStep::Render => draw(session, plain, &mut out),
        }
    }
    draw(session, plain, &mut out);

    out
}

fn draw<S: NameSource>(session: &mut BattleLogSession<S>, plain: bool, out: &mut String) {
    let capacity = session.log().capacity();
    session.refresh(|lines| out.push_str(&render_frame(lines, capacity, plain)));
}

/// Text rendering of the log window, oldest line at the top
pub fn render_frame(lines: &[&LogLine], capacity: usize, plain: bool) -> String {
    let mut frame = format!("== battle log {}/{} ==\n", lines.len(), capacity);
    for line in lines {
        let text = if plain {
            markup::strip(line.as_str())
        } else {
            markup::to_ansi(line.as_str())
        };
        frame.push_str(&text);
        frame.push('\n');
    }
    frame
}
