//! Context types for rule execution.

use std::path::Path;

use crate::token::{Token, TokenStream};
use crate::types::Location;

/// Context provided to rules for one file.
///
/// Pairs the host-supplied path with the file's validated token stream.
#[derive(Debug, Clone, Copy)]
pub struct FileContext<'a> {
    /// Path of the file, used only for reporting.
    pub path: &'a Path,
    /// The file's token stream.
    pub tokens: &'a TokenStream,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(path: &'a Path, tokens: &'a TokenStream) -> Self {
        Self { path, tokens }
    }

    /// Returns the token at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range; rules only receive indices that
    /// come from the stream itself.
    #[must_use]
    pub fn token(&self, index: usize) -> &'a Token {
        &self.tokens[index]
    }

    /// Builds the location of the token at `index`, including its byte span.
    #[must_use]
    pub fn location(&self, index: usize) -> Location {
        let token = &self.tokens[index];
        Location::new(self.path.to_path_buf(), token.line, token.column, index)
            .with_span(self.tokens.offset_of(index), token.text.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::tokenize;

    #[test]
    fn location_includes_line_column_and_span() {
        let stream = tokenize("$a = 1;\n  die;").expect("tokenize");
        let ctx = FileContext::new(Path::new("index.php"), &stream);
        let die = stream
            .iter()
            .position(|t| t.text == "die")
            .expect("die token");

        let location = ctx.location(die);
        assert_eq!(location.file, Path::new("index.php"));
        assert_eq!((location.line, location.column), (2, 3));
        assert_eq!(location.token, die);
        assert_eq!((location.offset, location.length), (10, 3));
    }
}
