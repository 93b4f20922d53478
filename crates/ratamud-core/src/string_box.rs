use std::fmt;

/// Text produced by the engine for a host.
///
/// The variant records who is responsible for the memory once the value is
/// flattened to a raw pointer: [`StringBox::Owned`] text is transferred to the
/// caller, who must release it exactly once through the engine's release call;
/// [`StringBox::Static`] text lives for the whole process and must never be
/// released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringBox {
    /// Heap text whose ownership moves to the receiver.
    Owned(String),
    /// Process-lifetime text that is only ever borrowed.
    Static(&'static str),
}

impl StringBox {
    /// Wrap heap text.
    pub fn owned(text: impl Into<String>) -> Self {
        Self::Owned(text.into())
    }

    /// Borrow the text.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Owned(s) => s,
            Self::Static(s) => s,
        }
    }

    /// Whether the receiver takes on a release obligation.
    pub fn requires_release(&self) -> bool {
        matches!(self, Self::Owned(_))
    }

    /// Consume the box and return its text as an owned string.
    pub fn into_string(self) -> String {
        match self {
            Self::Owned(s) => s,
            Self::Static(s) => s.to_string(),
        }
    }
}

impl fmt::Display for StringBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for StringBox {
    fn from(value: String) -> Self {
        Self::Owned(value)
    }
}

impl PartialEq<str> for StringBox {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for StringBox {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owned_requires_release() {
        let s = StringBox::owned("hero");
        assert!(s.requires_release());
        assert_eq!(s, "hero");
        assert_eq!(s.into_string(), "hero");
    }

    #[test]
    fn static_is_borrowed() {
        let s = StringBox::Static("v1");
        assert!(!s.requires_release());
        assert_eq!(s.to_string(), "v1");
    }
}
