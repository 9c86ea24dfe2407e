use std::borrow::Borrow;
use std::fmt::Display;

/// Key of a location; also the URL fragment that selects it.
///
/// Kept exactly as published: no trimming and no character checks, so the
/// link target and the lookup key always agree with the document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct LocationName(String);

impl LocationName {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for LocationName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for LocationName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Keys of `LocationLookup` are looked up with plain fragment strings.
impl Borrow<str> for LocationName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Display for LocationName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
