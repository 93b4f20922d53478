use std::collections::VecDeque;

use super::OutputCategory;

/// Receives output events for one category.
///
/// Delivery is synchronous. An implementation must not call back into the
/// engine that is delivering to it.
pub trait OutputSink: Send {
    /// Accept one event.
    fn deliver(&mut self, category: OutputCategory, content: &str);
}

/// Push delivery: forwards each event to a closure as it is emitted.
pub struct CallbackSink<F> {
    callback: F,
}

impl<F> CallbackSink<F>
where
    F: FnMut(OutputCategory, &str) + Send,
{
    /// Wrap a closure.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> OutputSink for CallbackSink<F>
where
    F: FnMut(OutputCategory, &str) + Send,
{
    fn deliver(&mut self, category: OutputCategory, content: &str) {
        (self.callback)(category, content);
    }
}

/// Pull delivery: keeps events until the host drains them.
#[derive(Debug, Clone, Default)]
pub struct BufferSink {
    entries: VecDeque<String>,
    limit: usize,
}

impl BufferSink {
    /// Create a buffer holding at most `limit` entries (0 = unlimited).
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            limit,
        }
    }

    /// Number of buffered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Buffered entries, oldest first, without consuming them.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Take every entry, joined with newlines. Returns `None` if empty.
    pub fn drain(&mut self) -> Option<String> {
        if self.entries.is_empty() {
            return None;
        }
        let joined = self.entries.drain(..).collect::<Vec<_>>().join("\n");
        Some(joined)
    }

    /// Discard every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl OutputSink for BufferSink {
    fn deliver(&mut self, _category: OutputCategory, content: &str) {
        self.entries.push_back(content.to_string());
        if self.limit > 0 {
            while self.entries.len() > self.limit {
                self.entries.pop_front();
            }
        }
    }
}
