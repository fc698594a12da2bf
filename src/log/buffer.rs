use super::LogLine;
use std::collections::VecDeque;

/// Bounded scrollback of battle-log lines, oldest first.
///
/// Appending past `capacity` drops lines from the front. Every mutation
/// marks the buffer dirty until the renderer calls [`LogBuffer::consume_dirty`].
#[derive(Debug, Clone)]
pub struct LogBuffer {
    logs: VecDeque<LogLine>,
    capacity: usize,
    dirty: bool,
}

impl LogBuffer {
    /// Create a new log buffer holding at most `capacity` lines
    pub fn new(capacity: usize) -> Self {
        Self {
            logs: VecDeque::with_capacity(capacity),
            capacity,
            dirty: false,
        }
    }

    /// Create a new log buffer with the default scrollback of 8 lines
    pub fn new_default() -> Self {
        Self::new(8)
    }

    /// Add a line as the newest entry.
    /// Oldest lines are evicted until the buffer fits its capacity again.
    pub fn append(&mut self, line: LogLine) {
        self.logs.push_back(line);
        while self.logs.len() > self.capacity {
            self.logs.pop_front();
        }
        self.dirty = true;
    }

    /// Remove every line
    pub fn clear(&mut self) {
        self.logs.clear();
        self.dirty = true;
        tracing::debug!("battle log cleared");
    }

    /// All lines, oldest to newest
    pub fn snapshot(&self) -> Vec<&LogLine> {
        self.logs.iter().collect()
    }

    /// Number of rows a display should reserve for this buffer
    pub fn visible_count(&self) -> usize {
        self.logs.len().min(self.capacity)
    }

    /// Returns whether a render is pending and resets the flag
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(buffer: &LogBuffer) -> Vec<&str> {
        buffer.snapshot().into_iter().map(|l| l.as_str()).collect()
    }

    #[test]
    fn test_buffer_append() {
        let mut buffer = LogBuffer::new(3);

        buffer.append("line1".into());
        buffer.append("line2".into());
        buffer.append("line3".into());

        assert_eq!(buffer.len(), 3);
        assert_eq!(texts(&buffer), vec!["line1", "line2", "line3"]);
    }

    #[test]
    fn test_buffer_evicts_oldest() {
        let mut buffer = LogBuffer::new(3);

        for line in ["a", "b", "c", "d"] {
            buffer.append(line.into());
        }

        // "a" should be dropped
        assert_eq!(texts(&buffer), vec!["b", "c", "d"]);
    }

    #[test]
    fn test_buffer_keeps_last_capacity_lines() {
        let mut buffer = LogBuffer::new(5);

        for i in 0..23 {
            buffer.append(LogLine::new(format!("line{}", i)));
            assert!(buffer.len() <= buffer.capacity());
        }

        let expected: Vec<String> = (18..23).map(|i| format!("line{}", i)).collect();
        assert_eq!(texts(&buffer), expected);
    }

    #[test]
    fn test_zero_capacity_stays_empty() {
        let mut buffer = LogBuffer::new(0);

        buffer.append("lost".into());

        assert!(buffer.is_empty());
        assert_eq!(buffer.visible_count(), 0);
        assert!(buffer.consume_dirty());
    }

    #[test]
    fn test_empty_line_is_counted() {
        let mut buffer = LogBuffer::new(2);
        buffer.append("".into());
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_clear_empties_and_marks_dirty() {
        let mut buffer = LogBuffer::new(4);
        buffer.append("x".into());
        buffer.consume_dirty();

        buffer.clear();

        assert!(buffer.snapshot().is_empty());
        assert!(buffer.is_dirty());
    }

    #[test]
    fn test_dirty_flag_lifecycle() {
        let mut buffer = LogBuffer::new(4);
        assert!(!buffer.consume_dirty());

        buffer.append("x".into());
        let _ = buffer.snapshot();
        assert!(buffer.is_dirty());

        assert!(buffer.consume_dirty());
        assert!(!buffer.consume_dirty());
    }

    #[test]
    fn test_visible_count_tracks_length() {
        let mut buffer = LogBuffer::new(2);
        assert_eq!(buffer.visible_count(), 0);
        buffer.append("a".into());
        assert_eq!(buffer.visible_count(), 1);
        buffer.append("b".into());
        buffer.append("c".into());
        assert_eq!(buffer.visible_count(), 2);
    }
}
