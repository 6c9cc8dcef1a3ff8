//! Source locations and the [`Spanned`] wrapper.
//!
//! The upstream parser annotates every AST node with a [`SourceLocation`]
//! so diagnostics can point back into the document. Locations are
//! line/column based because GFL documents are block-structured and the
//! grammar lives in a separate crate.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// A position in a GFL source document.
///
/// Lines and columns are 1-based. `length` is the number of characters
/// the node occupies on its starting line; a length of zero means the
/// extent is unknown.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SourceLocation {
    line: u32,
    column: u32,
    file: Option<PathBuf>,
    length: u32,
}

impl SourceLocation {
    /// Create a location at the given 1-based line and column.
    pub fn new(line: u32, column: u32) -> Self {
        Self {
            line,
            column,
            file: None,
            length: 0,
        }
    }

    /// The location used when the producer did not track positions.
    pub fn start() -> Self {
        Self::new(1, 1)
    }

    /// Attach the source file path.
    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Attach the span length in characters.
    pub fn with_length(mut self, length: u32) -> Self {
        self.length = length;
        self
    }

    /// The 1-based line number.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// The 1-based column number.
    pub fn column(&self) -> u32 {
        self.column
    }

    /// The source file, if known.
    pub fn file(&self) -> Option<&PathBuf> {
        self.file.as_ref()
    }

    /// The span length in characters (zero when unknown).
    pub fn length(&self) -> u32 {
        self.length
    }
}

impl Default for SourceLocation {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(path) => write!(f, "{}:{}:{}", path.display(), self.line, self.column),
            None => write!(f, "line {}, column {}", self.line, self.column),
        }
    }
}

/// A value paired with the [`SourceLocation`] it came from.
///
/// `Spanned<T>` lets validation code report precise positions without
/// every rule threading location arguments around. `Deref` makes the
/// wrapper transparent at call sites.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Spanned<T> {
    value: T,
    location: SourceLocation,
}

impl<T> Spanned<T> {
    /// Wrap a value with its source location.
    pub fn new(value: T, location: SourceLocation) -> Self {
        Self { value, location }
    }

    /// Wrap a value with no known location.
    pub fn detached(value: T) -> Self {
        Self {
            value,
            location: SourceLocation::start(),
        }
    }

    /// Get a reference to the wrapped value.
    pub fn inner(&self) -> &T {
        &self.value
    }

    /// Consume the wrapper and return the value.
    pub fn into_inner(self) -> T {
        self.value
    }

    /// The location of the wrapped value.
    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    /// Transform the value while keeping the location.
    pub fn map<F, U>(&self, f: F) -> Spanned<U>
    where
        F: FnOnce(&T) -> U,
    {
        Spanned {
            value: f(&self.value),
            location: self.location.clone(),
        }
    }
}

impl<T> std::ops::Deref for Spanned<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<T: fmt::Display> fmt::Display for Spanned<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display_without_file() {
        let loc = SourceLocation::new(4, 7);
        assert_eq!(loc.to_string(), "line 4, column 7");
    }

    #[test]
    fn test_location_display_with_file() {
        let loc = SourceLocation::new(12, 3).with_file("crispr.gfl");
        assert_eq!(loc.to_string(), "crispr.gfl:12:3");
    }

    #[test]
    fn test_location_with_length() {
        let loc = SourceLocation::new(1, 1).with_length(8);
        assert_eq!(loc.length(), 8);
    }

    #[test]
    fn test_spanned_preserves_location_through_map() {
        let spanned = Spanned::new(21u32, SourceLocation::new(3, 5));
        let doubled = spanned.map(|v| v * 2);
        assert_eq!(*doubled.inner(), 42);
        assert_eq!(doubled.location().line(), 3);
        assert_eq!(doubled.location().column(), 5);
    }

    #[test]
    fn test_spanned_deref() {
        let spanned = Spanned::detached(String::from("experiment"));
        assert_eq!(spanned.len(), 10);
    }
}
