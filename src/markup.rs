//! The host's inline color markup: `\c[N]` switches the text color to
//! palette entry `N`, and `\c[0]` switches back to the normal color.

use regex::Regex;
use std::sync::LazyLock;

/// Escape that restores the normal text color
pub const COLOR_RESET: &str = r"\c[0]";

// Matches \c[N] (the host also accepts an upper-case C)
static COLOR_ESCAPE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\[cC]\[(\d+)\]").unwrap());

/// Approximation of the host's default 32-entry window text palette.
const TEXT_PALETTE: [(u8, u8, u8); 32] = [
    (0xff, 0xff, 0xff),
    (0x20, 0xa0, 0xd6),
    (0xff, 0x78, 0x4c),
    (0x66, 0xcc, 0x40),
    (0x99, 0xcc, 0xff),
    (0xcc, 0xc0, 0xff),
    (0xff, 0xff, 0xa0),
    (0x80, 0x80, 0x80),
    (0xc0, 0xc0, 0xc0),
    (0x20, 0x80, 0xcc),
    (0xff, 0x38, 0x10),
    (0x00, 0xa0, 0x10),
    (0x3e, 0x9a, 0xde),
    (0xa0, 0x98, 0xff),
    (0xff, 0xcc, 0x20),
    (0x00, 0x00, 0x00),
    (0x84, 0xaa, 0xff),
    (0xff, 0xff, 0x40),
    (0xff, 0x20, 0x20),
    (0x20, 0x20, 0x40),
    (0xe0, 0x80, 0x40),
    (0xf0, 0xc0, 0x40),
    (0x40, 0x80, 0xc0),
    (0x40, 0xc0, 0xf0),
    (0x80, 0xff, 0x80),
    (0xc0, 0x80, 0x80),
    (0x80, 0x80, 0xff),
    (0xff, 0x80, 0xff),
    (0x00, 0xa0, 0x40),
    (0x00, 0xe0, 0x60),
    (0xa0, 0x60, 0xe0),
    (0xc0, 0x80, 0xff),
];

/// A run of text drawn in one palette color
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub color: u32,
    pub text: String,
}

/// Opening escape for a palette color
pub fn color_escape(color: u32) -> String {
    format!(r"\c[{}]", color)
}

/// Wrap `text` so the host draws it in `color` and then returns to normal.
pub fn wrap(text: &str, color: u32) -> String {
    let mut out = color_escape(color);
    out.push_str(text);
    out.push_str(COLOR_RESET);
    out
}

/// Split marked-up text into color runs.
///
/// Escapes whose index does not fit a `u32` are left in the text verbatim,
/// as are unterminated ones. Empty runs are dropped.
pub fn parse(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut color = 0;
    let mut current = String::new();
    let mut last_end = 0;

    for caps in COLOR_ESCAPE_REGEX.captures_iter(text) {
        let (Some(whole), Ok(next_color)) = (caps.get(0), caps[1].parse::<u32>()) else {
            continue;
        };

        current.push_str(&text[last_end..whole.start()]);
        if !current.is_empty() {
            segments.push(Segment {
                color,
                text: std::mem::take(&mut current),
            });
        }
        color = next_color;
        last_end = whole.end();
    }

    current.push_str(&text[last_end..]);
    if !current.is_empty() {
        segments.push(Segment { color, text: current });
    }

    segments
}

/// Remove all color escapes, leaving the displayed characters
pub fn strip(text: &str) -> String {
    parse(text).into_iter().map(|s| s.text).collect()
}

/// Render marked-up text with 24-bit ANSI colors for terminal preview.
/// Color 0 and indices outside the palette are drawn uncolored.
pub fn to_ansi(text: &str) -> String {
    let reset = "\x1b[0m";
    let mut out = String::with_capacity(text.len());

    for segment in parse(text) {
        match palette_rgb(segment.color) {
            Some((r, g, b)) if segment.color != 0 => {
                out.push_str(&format!("\x1b[38;2;{};{};{}m", r, g, b));
                out.push_str(&segment.text);
                out.push_str(reset);
            }
            _ => out.push_str(&segment.text),
        }
    }

    out
}

/// RGB value of a palette entry, if the index exists
pub fn palette_rgb(color: u32) -> Option<(u8, u8, u8)> {
    TEXT_PALETTE.get(color as usize).copied()
}
