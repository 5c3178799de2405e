//! Names and literal text carried by tree nodes.

use std::fmt;

/// Text payload of a node, tagged with who owns it.
///
/// Identifiers and string literals read from source are [`Text::Owned`].
/// Names the front end synthesizes from fixed strings (runtime routine
/// names, placeholder labels) are [`Text::Static`] and are never counted
/// as owned data when a tree is released.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Text {
    Owned(String),
    Static(&'static str),
}

impl Text {
    #[inline]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Owned(s) => s,
            Self::Static(s) => s,
        }
    }

    #[inline]
    pub fn is_owned(&self) -> bool {
        matches!(self, Self::Owned(_))
    }
}

impl Default for Text {
    fn default() -> Self {
        Self::Static("")
    }
}

impl From<String> for Text {
    fn from(s: String) -> Self {
        Self::Owned(s)
    }
}

impl From<&'static str> for Text {
    fn from(s: &'static str) -> Self {
        Self::Static(s)
    }
}

impl AsRef<str> for Text {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<str> for Text {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Text {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
