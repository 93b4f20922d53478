//! Output categories, sinks and the router.

mod router;
mod sink;

use std::fmt;

pub use router::OutputRouter;
pub use sink::{BufferSink, CallbackSink, OutputSink};

/// The display channel an output event is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputCategory {
    /// Narration: room descriptions, action results.
    Main,
    /// Diagnostics about what the engine did.
    Log,
    /// Short status-bar lines.
    Status,
    /// Side-panel content: inventory, map details.
    Side,
}

impl OutputCategory {
    /// Every category, in drain order.
    pub const ALL: [Self; 4] = [Self::Main, Self::Log, Self::Status, Self::Side];

    /// Upper-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Main => "MAIN",
            Self::Log => "LOG",
            Self::Status => "STATUS",
            Self::Side => "SIDE",
        }
    }

    /// Position in [`Self::ALL`]; also the integer hosts pass across the C ABI.
    pub fn index(self) -> usize {
        match self {
            Self::Main => 0,
            Self::Log => 1,
            Self::Status => 2,
            Self::Side => 3,
        }
    }

    /// Inverse of [`Self::index`].
    pub fn from_index(index: i64) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i))
            .copied()
    }

    /// Parse an upper- or lower-case name.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for OutputCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert_eq!(OutputCategory::Main.as_str(), "MAIN");
        assert_eq!(OutputCategory::Log.as_str(), "LOG");
        assert_eq!(OutputCategory::Status.as_str(), "STATUS");
        assert_eq!(OutputCategory::Side.as_str(), "SIDE");
        assert_eq!(OutputCategory::parse("side"), Some(OutputCategory::Side));
        assert_eq!(OutputCategory::parse("menu"), None);
    }

    #[test]
    fn index_round_trip() {
        for category in OutputCategory::ALL {
            assert_eq!(
                OutputCategory::from_index(category.index() as i64),
                Some(category)
            );
        }
        assert_eq!(OutputCategory::from_index(-1), None);
        assert_eq!(OutputCategory::from_index(4), None);
    }
}
