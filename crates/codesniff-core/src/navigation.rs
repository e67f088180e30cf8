//! Stream queries shared by rule implementations.
//!
//! All functions are pure scans over the immutable stream. "Not found" is
//! `None`, never a sentinel index.

use crate::token::{TokenKind, TokenStream};

/// Declared visibility of a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// `public`
    Public,
    /// `protected`
    Protected,
    /// `private`
    Private,
}

/// Modifiers and shape of a `function` declaration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MethodProperties {
    /// Explicit visibility, if any.
    pub visibility: Option<Visibility>,
    /// Declared `abstract`.
    pub is_abstract: bool,
    /// Declared `final`.
    pub is_final: bool,
    /// Declared `static`.
    pub is_static: bool,
    /// Anonymous function (no declared name).
    pub is_closure: bool,
}

impl TokenStream {
    /// Scans backward from `from` (inclusive) for a token whose kind is in
    /// `kinds`, or not in `kinds` when `exclude` is set.
    ///
    /// `boundary` is the last index examined. An out-of-range `from` starts
    /// at the last token.
    #[must_use]
    pub fn find_previous(
        &self,
        kinds: &[TokenKind],
        from: usize,
        boundary: Option<usize>,
        exclude: bool,
    ) -> Option<usize> {
        let last = self.len().checked_sub(1)?;
        let start = from.min(last);
        let stop = boundary.unwrap_or(0);
        if stop > start {
            return None;
        }
        (stop..=start)
            .rev()
            .find(|&i| kinds.contains(&self[i].kind) != exclude)
    }

    /// Scans forward from `from` (inclusive) for a token whose kind is in
    /// `kinds`, or not in `kinds` when `exclude` is set.
    ///
    /// `boundary` is the last index examined.
    #[must_use]
    pub fn find_next(
        &self,
        kinds: &[TokenKind],
        from: usize,
        boundary: Option<usize>,
        exclude: bool,
    ) -> Option<usize> {
        let last = self.len().checked_sub(1)?;
        let stop = boundary.map_or(last, |b| b.min(last));
        if from > stop {
            return None;
        }
        (from..=stop).find(|&i| kinds.contains(&self[i].kind) != exclude)
    }

    /// Concatenates the raw text of tokens `start..=end`.
    #[must_use]
    pub fn flatten_range(&self, start: usize, end: usize) -> String {
        let Some(last) = self.len().checked_sub(1) else {
            return String::new();
        };
        let end = end.min(last);
        if start > end {
            return String::new();
        }
        self.as_slice()[start..=end]
            .iter()
            .map(|t| t.text.as_str())
            .collect()
    }

    /// First token at or after `from` that is not whitespace or a comment.
    #[must_use]
    pub fn next_significant(&self, from: usize) -> Option<usize> {
        self.find_next(TokenKind::EMPTY, from, None, true)
    }

    /// Last token at or before `from` that is not whitespace or a comment.
    #[must_use]
    pub fn previous_significant(&self, from: usize) -> Option<usize> {
        self.find_previous(TokenKind::EMPTY, from, None, true)
    }

    /// First significant token on the source line that contains `index`.
    ///
    /// Walks back to the nearest whitespace or comment token carrying a line
    /// break, then forward to the first significant token.
    #[must_use]
    pub fn line_start(&self, index: usize) -> Option<usize> {
        if index >= self.len() {
            return None;
        }
        let mut cursor = index;
        let boundary = loop {
            let prev = cursor
                .checked_sub(1)
                .and_then(|c| self.find_previous(TokenKind::EMPTY, c, None, false));
            match prev {
                Some(p) if self[p].text.contains('\n') => break p,
                Some(p) => cursor = p,
                None => break 0,
            }
        };
        self.find_next(TokenKind::EMPTY, boundary, Some(index), true)
    }

    /// Returns true if `index` sits inside a block owned by a `kind` token,
    /// at any nesting depth.
    #[must_use]
    pub fn has_condition(&self, index: usize, kind: TokenKind) -> bool {
        let mut cursor = index;
        while let Some(open) = cursor.checked_sub(1).and_then(|c| {
            self.find_previous(&[TokenKind::OpenCurlyBracket], c, None, false)
        }) {
            let encloses = self[open].scope_closer.is_some_and(|close| close > index);
            let owned = self[open]
                .scope_condition
                .is_some_and(|owner| self[owner].kind == kind);
            if encloses && owned {
                return true;
            }
            cursor = open;
        }
        false
    }

    /// Declared name of a `function`, `class` or `interface` token.
    ///
    /// Returns `None` for anonymous functions and other token kinds.
    #[must_use]
    pub fn declaration_name(&self, index: usize) -> Option<&str> {
        match self.get(index)?.kind {
            TokenKind::Function | TokenKind::Class | TokenKind::Interface => {}
            _ => return None,
        }
        let mut next = self.next_significant(index + 1)?;
        if self[next].kind == TokenKind::Ampersand {
            next = self.next_significant(next + 1)?;
        }
        (self[next].kind == TokenKind::Identifier).then(|| self[next].text.as_str())
    }

    /// Collects the modifiers written before a `function` token.
    #[must_use]
    pub fn method_properties(&self, index: usize) -> MethodProperties {
        let mut props = MethodProperties::default();
        let mut cursor = index;
        while let Some(prev) = cursor
            .checked_sub(1)
            .and_then(|c| self.previous_significant(c))
        {
            match self[prev].kind {
                TokenKind::Abstract => props.is_abstract = true,
                TokenKind::Final => props.is_final = true,
                TokenKind::Static => props.is_static = true,
                TokenKind::Public => props.visibility = Some(Visibility::Public),
                TokenKind::Protected => props.visibility = Some(Visibility::Protected),
                TokenKind::Private => props.visibility = Some(Visibility::Private),
                _ => break,
            }
            cursor = prev;
        }
        props.is_closure = self.declaration_name(index).is_none();
        props
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::tokenize;

    fn position(stream: &TokenStream, text: &str) -> usize {
        stream
            .iter()
            .position(|t| t.text == text)
            .expect("token present")
    }

    #[test]
    fn find_previous_is_inclusive_of_start() {
        let stream = tokenize("$a = 1;").expect("tokenize");
        assert_eq!(stream.find_previous(&[TokenKind::Semicolon], 5, None, false), Some(5));
        assert_eq!(stream.find_previous(&[TokenKind::Variable], 5, None, false), Some(0));
    }

    #[test]
    fn find_previous_respects_boundary() {
        let stream = tokenize("$a = 1;").expect("tokenize");
        assert_eq!(stream.find_previous(&[TokenKind::Variable], 5, Some(1), false), None);
        assert_eq!(stream.find_previous(&[TokenKind::Variable], 5, Some(0), false), Some(0));
    }

    #[test]
    fn find_previous_exclude_skips_listed_kinds() {
        let stream = tokenize("foo(  )").expect("tokenize");
        let close = position(&stream, ")");
        let found = stream.find_previous(TokenKind::EMPTY, close - 1, None, true);
        assert_eq!(found, Some(position(&stream, "(")));
    }

    #[test]
    fn find_next_reports_none_when_exhausted() {
        let stream = tokenize("$a = 1;").expect("tokenize");
        assert_eq!(stream.find_next(&[TokenKind::Comma], 0, None, false), None);
        assert_eq!(stream.find_next(&[TokenKind::Semicolon], 99, None, false), None);
    }

    #[test]
    fn find_next_respects_boundary() {
        let stream = tokenize("$a = 1;").expect("tokenize");
        assert_eq!(stream.find_next(&[TokenKind::Semicolon], 0, Some(4), false), None);
        assert_eq!(stream.find_next(&[TokenKind::Semicolon], 0, Some(5), false), Some(5));
    }

    #[test]
    fn empty_stream_scans_find_nothing() {
        let stream = TokenStream::default();
        assert_eq!(stream.find_previous(TokenKind::EMPTY, 0, None, true), None);
        assert_eq!(stream.find_next(TokenKind::EMPTY, 0, None, true), None);
        assert_eq!(stream.flatten_range(0, 3), "");
    }

    #[test]
    fn flatten_range_preserves_spacing() {
        let stream = tokenize("$foo  [ 'a' ]").expect("tokenize");
        let open = position(&stream, "[");
        assert_eq!(stream.flatten_range(0, open), "$foo  [");
        assert_eq!(stream.flatten_range(open, 999), "[ 'a' ]");
        assert_eq!(stream.flatten_range(3, 1), "");
    }

    #[test]
    fn line_start_finds_leading_token() {
        let stream = tokenize("$a = 1;\n    } else {\n}").expect("tokenize");
        let else_kw = position(&stream, "else");
        let start = stream.line_start(else_kw).expect("line start");
        assert_eq!(stream[start].text, "}");
        assert_eq!(stream[start].column, 5);
    }

    #[test]
    fn line_start_on_first_line() {
        let stream = tokenize("public function foo()\n{\n}").expect("tokenize");
        let function = position(&stream, "function");
        assert_eq!(stream.line_start(function), Some(0));
    }

    #[test]
    fn has_condition_sees_enclosing_owner() {
        let stream = tokenize(
            "interface Shape\n{\n    public function area();\n}\nfunction free()\n{\n}",
        )
        .expect("tokenize");
        let area = position(&stream, "area") - 2;
        assert_eq!(stream[area].kind, TokenKind::Function);
        assert!(stream.has_condition(area, TokenKind::Interface));

        let free = position(&stream, "free") - 2;
        assert!(!stream.has_condition(free, TokenKind::Interface));
    }

    #[test]
    fn declaration_name_handles_reference_and_closure() {
        let stream = tokenize("function &byRef() {}\n$f = function () {};").expect("tokenize");
        assert_eq!(stream.declaration_name(0), Some("byRef"));
        let closure = stream
            .iter()
            .rposition(|t| t.kind == TokenKind::Function)
            .expect("closure");
        assert_eq!(stream.declaration_name(closure), None);
    }

    #[test]
    fn method_properties_collects_modifiers() {
        let stream =
            tokenize("abstract protected static function build();").expect("tokenize");
        let function = position(&stream, "function");
        let props = stream.method_properties(function);
        assert!(props.is_abstract);
        assert!(props.is_static);
        assert!(!props.is_final);
        assert!(!props.is_closure);
        assert_eq!(props.visibility, Some(Visibility::Protected));
    }
}
