/// The part of a page address after `#`, selecting a location by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment(String);

impl Fragment {
    /// Parse a fragment-change notification.
    ///
    /// Surrounding whitespace and one leading `#` are dropped, so both
    /// `#alpha` and `alpha` select the location named `alpha`.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        Self(trimmed.strip_prefix('#').unwrap_or(trimmed).to_string())
    }

    /// Extract the fragment of a full page address.
    ///
    /// An address without `#` has an empty fragment.
    pub fn of_address(address: &str) -> Self {
        match address.split_once('#') {
            Some((_, fragment)) => Self(fragment.to_string()),
            None => Self::default(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for Fragment {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fragment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
