use std::fmt;

pub mod buffer;

// Re-export commonly used types
pub use buffer::LogBuffer;

/// A formatted battle-log line, possibly carrying `\c[N]` color markers
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogLine(String);

impl LogLine {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Text with the color markers removed
    pub fn plain_text(&self) -> String {
        crate::markup::strip(&self.0)
    }
}

impl From<String> for LogLine {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for LogLine {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl AsRef<str> for LogLine {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
