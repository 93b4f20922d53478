use std::array;
use std::fmt;

use ratamud_core::StringBox;

use super::{BufferSink, CallbackSink, OutputCategory, OutputSink};

/// Routes output events per category to a pushed callback or a pull buffer.
///
/// Each category is independent: a host can register callbacks for some
/// categories and poll the rest. Registering or unregistering never touches
/// what is already buffered.
pub struct OutputRouter {
    buffers: [BufferSink; 4],
    callbacks: [Option<Box<dyn OutputSink>>; 4],
}

impl Default for OutputRouter {
    fn default() -> Self {
        Self::new(0)
    }
}

impl fmt::Debug for OutputRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registered: Vec<_> = OutputCategory::ALL
            .into_iter()
            .filter(|c| self.is_registered(*c))
            .collect();
        f.debug_struct("OutputRouter")
            .field("buffers", &self.buffers)
            .field("registered", &registered)
            .finish()
    }
}

impl OutputRouter {
    /// Create a router whose buffers keep at most `buffer_limit` entries per
    /// category (0 = unlimited).
    pub fn new(buffer_limit: usize) -> Self {
        Self {
            buffers: array::from_fn(|_| BufferSink::new(buffer_limit)),
            callbacks: Default::default(),
        }
    }

    /// Install a sink for a category, returning the one it replaces.
    pub fn register(
        &mut self,
        category: OutputCategory,
        sink: Box<dyn OutputSink>,
    ) -> Option<Box<dyn OutputSink>> {
        self.callbacks[category.index()].replace(sink)
    }

    /// Install a closure for a category.
    pub fn register_fn<F>(&mut self, category: OutputCategory, callback: F)
    where
        F: FnMut(OutputCategory, &str) + Send + 'static,
    {
        self.register(category, Box::new(CallbackSink::new(callback)));
    }

    /// Remove a category's sink so later events are buffered again. Returns
    /// whether one was installed.
    pub fn unregister(&mut self, category: OutputCategory) -> bool {
        self.callbacks[category.index()].take().is_some()
    }

    /// Remove every sink.
    pub fn unregister_all(&mut self) {
        for slot in &mut self.callbacks {
            *slot = None;
        }
    }

    /// Whether a sink is installed for a category.
    pub fn is_registered(&self, category: OutputCategory) -> bool {
        self.callbacks[category.index()].is_some()
    }

    /// Deliver an event: to the category's sink if one is installed,
    /// otherwise into its buffer.
    pub fn emit(&mut self, category: OutputCategory, content: &str) {
        let index = category.index();
        match self.callbacks[index].as_mut() {
            Some(sink) => sink.deliver(category, content),
            None => self.buffers[index].deliver(category, content),
        }
    }

    /// Number of events waiting in a category's buffer.
    pub fn pending(&self, category: OutputCategory) -> usize {
        self.buffers[category.index()].len()
    }

    /// Take a category's buffered events, newline-joined in emission order.
    /// Returns `None` when nothing is buffered.
    pub fn drain(&mut self, category: OutputCategory) -> Option<StringBox> {
        self.buffers[category.index()].drain().map(StringBox::Owned)
    }

    /// Take every buffered event in MAIN, LOG, STATUS, SIDE order. Categories
    /// with nothing buffered contribute nothing; the result may be empty.
    pub fn drain_all(&mut self) -> StringBox {
        let chunks: Vec<String> = self
            .buffers
            .iter_mut()
            .filter_map(BufferSink::drain)
            .collect();
        StringBox::Owned(chunks.join("\n"))
    }

    /// Discard a category's buffered events.
    pub fn clear(&mut self, category: OutputCategory) {
        self.buffers[category.index()].clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl FnMut(OutputCategory, &str) + Send) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let store = Arc::clone(&seen);
        (seen, move |_: OutputCategory, text: &str| {
            store.lock().unwrap().push(text.to_string());
        })
    }

    #[test]
    fn buffers_without_callback() {
        let mut router = OutputRouter::default();
        router.emit(OutputCategory::Main, "a");
        router.emit(OutputCategory::Main, "b");
        assert_eq!(router.pending(OutputCategory::Main), 2);
        assert_eq!(router.drain(OutputCategory::Main).unwrap(), "a\nb");
        assert!(router.drain(OutputCategory::Main).is_none());
    }

    #[test]
    fn callback_bypasses_buffer() {
        let mut router = OutputRouter::default();
        let (seen, callback) = recorder();
        router.register_fn(OutputCategory::Main, callback);

        router.emit(OutputCategory::Main, "pushed");
        assert_eq!(router.pending(OutputCategory::Main), 0);
        assert_eq!(*seen.lock().unwrap(), vec!["pushed"]);

        assert!(router.unregister(OutputCategory::Main));
        router.emit(OutputCategory::Main, "buffered");
        assert_eq!(router.drain(OutputCategory::Main).unwrap(), "buffered");
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn registering_keeps_existing_buffer() {
        let mut router = OutputRouter::default();
        router.emit(OutputCategory::Log, "early");
        let (_seen, callback) = recorder();
        router.register_fn(OutputCategory::Log, callback);
        router.emit(OutputCategory::Log, "late");
        assert_eq!(router.drain(OutputCategory::Log).unwrap(), "early");
    }

    #[test]
    fn register_replaces_previous() {
        let mut router = OutputRouter::default();
        let (first_seen, first) = recorder();
        let (second_seen, second) = recorder();
        router.register_fn(OutputCategory::Side, first);
        router.register_fn(OutputCategory::Side, second);
        router.emit(OutputCategory::Side, "x");
        assert!(first_seen.lock().unwrap().is_empty());
        assert_eq!(*second_seen.lock().unwrap(), vec!["x"]);
    }

    #[test]
    fn mixed_mode_per_category() {
        let mut router = OutputRouter::default();
        let (seen, callback) = recorder();
        router.register_fn(OutputCategory::Status, callback);

        router.emit(OutputCategory::Main, "main");
        router.emit(OutputCategory::Status, "status");
        router.emit(OutputCategory::Side, "side");

        assert_eq!(*seen.lock().unwrap(), vec!["status"]);
        assert_eq!(router.drain_all(), "main\nside");
    }

    #[test]
    fn drain_all_order_and_clearing() {
        let mut router = OutputRouter::default();
        router.emit(OutputCategory::Side, "4");
        router.emit(OutputCategory::Status, "3");
        router.emit(OutputCategory::Log, "2");
        router.emit(OutputCategory::Main, "1");
        assert_eq!(router.drain_all(), "1\n2\n3\n4");
        assert_eq!(router.drain_all(), "");
    }

    #[test]
    fn unregister_all_restores_buffering() {
        let mut router = OutputRouter::default();
        for category in OutputCategory::ALL {
            let (_seen, callback) = recorder();
            router.register_fn(category, callback);
        }
        router.unregister_all();
        assert!(!router.unregister(OutputCategory::Main));
        router.emit(OutputCategory::Main, "m");
        assert_eq!(router.pending(OutputCategory::Main), 1);
    }
}
