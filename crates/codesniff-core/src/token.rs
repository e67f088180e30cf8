//! Token stream model consumed by rules.
//!
//! A [`TokenStream`] is produced once per file by an external tokenizer and
//! scope matcher. It is validated on construction and read-only afterwards.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lexical category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Spaces, tabs and line breaks.
    Whitespace,
    /// `//`, `#` or `/* */` comment.
    Comment,
    /// `/** */` comment.
    DocComment,
    /// `function`
    Function,
    /// `class`
    Class,
    /// `interface`
    Interface,
    /// `abstract`
    Abstract,
    /// `final`
    Final,
    /// `public`
    Public,
    /// `protected`
    Protected,
    /// `private`
    Private,
    /// `static`
    Static,
    /// `if`
    If,
    /// `else`
    Else,
    /// `elseif`
    ElseIf,
    /// `for`
    For,
    /// `foreach`
    Foreach,
    /// `while`
    While,
    /// `do`
    Do,
    /// `switch`
    Switch,
    /// `exit` or `die`
    Exit,
    /// `return`
    Return,
    /// `new`
    New,
    /// Bare identifier (function, class or constant name).
    Identifier,
    /// `$name`
    Variable,
    /// Quoted string literal.
    StringLiteral,
    /// Numeric literal.
    Number,
    /// `{`
    OpenCurlyBracket,
    /// `}`
    CloseCurlyBracket,
    /// `(`
    OpenParenthesis,
    /// `)`
    CloseParenthesis,
    /// `[`
    OpenSquareBracket,
    /// `]`
    CloseSquareBracket,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `=`
    Equal,
    /// `&`
    Ampersand,
    /// `->`
    ObjectOperator,
    /// `::`
    DoubleColon,
    /// `=>`
    DoubleArrow,
    /// `\`
    NsSeparator,
    /// Anything else (operators, casts, open tags).
    Other,
}

impl TokenKind {
    /// Whitespace and comments: tokens that carry no syntax.
    pub const EMPTY: &'static [Self] = &[Self::Whitespace, Self::Comment, Self::DocComment];

    /// Keywords that open a control-structure block.
    pub const CONTROL_STRUCTURES: &'static [Self] = &[
        Self::If,
        Self::Else,
        Self::ElseIf,
        Self::For,
        Self::Foreach,
        Self::While,
        Self::Do,
        Self::Switch,
    ];

    /// Modifiers that may precede a `function` keyword.
    pub const METHOD_MODIFIERS: &'static [Self] = &[
        Self::Abstract,
        Self::Final,
        Self::Public,
        Self::Protected,
        Self::Private,
        Self::Static,
    ];

    /// Returns true for whitespace and comments.
    #[must_use]
    pub fn is_empty(self) -> bool {
        Self::EMPTY.contains(&self)
    }

    /// Returns true for control-structure keywords.
    #[must_use]
    pub fn is_control_structure(self) -> bool {
        Self::CONTROL_STRUCTURES.contains(&self)
    }
}

/// One lexical unit with its position and structural links.
///
/// Links are indices into the owning [`TokenStream`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Lexical category.
    pub kind: TokenKind,
    /// Raw lexeme.
    pub text: String,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Opening brace of the block this token owns or delimits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_opener: Option<usize>,
    /// Closing brace of the block this token owns or delimits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_closer: Option<usize>,
    /// Keyword owning the block, set on brace tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_condition: Option<usize>,
    /// Opening parenthesis or bracket of the associated group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grouping_opener: Option<usize>,
    /// Closing parenthesis or bracket of the associated group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grouping_closer: Option<usize>,
}

impl Token {
    /// Creates an unlinked token.
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            column,
            scope_opener: None,
            scope_closer: None,
            scope_condition: None,
            grouping_opener: None,
            grouping_closer: None,
        }
    }

    /// Sets the scope brace pair.
    #[must_use]
    pub fn with_scope(mut self, opener: usize, closer: usize) -> Self {
        self.scope_opener = Some(opener);
        self.scope_closer = Some(closer);
        self
    }

    /// Sets the owning keyword of a brace token.
    #[must_use]
    pub fn with_condition(mut self, owner: usize) -> Self {
        self.scope_condition = Some(owner);
        self
    }

    /// Sets the grouping pair.
    #[must_use]
    pub fn with_grouping(mut self, opener: usize, closer: usize) -> Self {
        self.grouping_opener = Some(opener);
        self.grouping_closer = Some(closer);
        self
    }

    /// Returns true if this token is whitespace or a comment.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kind.is_empty()
    }
}

/// Structural inconsistencies rejected when building a [`TokenStream`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StreamError {
    /// A link points past the end of the stream.
    #[error("token {index}: {field} link {target} is out of range (stream has {len} tokens)")]
    LinkOutOfRange {
        /// Token carrying the link.
        index: usize,
        /// Name of the link field.
        field: &'static str,
        /// Linked index.
        target: usize,
        /// Stream length.
        len: usize,
    },

    /// Only one half of an opener/closer pair is set.
    #[error("token {index}: {field} is set without its counterpart")]
    UnpairedLink {
        /// Token carrying the link.
        index: usize,
        /// Name of the link that is set.
        field: &'static str,
    },

    /// A scope link names a token of the wrong kind.
    #[error("token {index}: {field} {target} is a {found:?}, expected {expected:?}")]
    WrongKind {
        /// Token carrying the link.
        index: usize,
        /// Name of the link field.
        field: &'static str,
        /// Linked index.
        target: usize,
        /// Kind found at the target.
        found: TokenKind,
        /// Kind required at the target.
        expected: TokenKind,
    },

    /// The opening brace does not point back to the same closer.
    #[error("token {index}: scope opener {opener} closes at {found:?}, expected {expected}")]
    ScopeMismatch {
        /// Token carrying the link.
        index: usize,
        /// Opening brace index.
        opener: usize,
        /// Closer recorded on the opening brace.
        found: Option<usize>,
        /// Closer recorded on the owner.
        expected: usize,
    },

    /// A grouping opener does not come before its closer.
    #[error("token {index}: grouping opener {opener} is not before closer {closer}")]
    GroupingOrder {
        /// Token carrying the link.
        index: usize,
        /// Opener index.
        opener: usize,
        /// Closer index.
        closer: usize,
    },

    /// A token has a zero line or column; positions are 1-based.
    #[error("token {index} has a zero line or column")]
    ZeroPosition {
        /// Offending token.
        index: usize,
    },
}

/// Immutable, validated token sequence for one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Token>", into = "Vec<Token>")]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Validates structural links and wraps the tokens.
    ///
    /// # Errors
    ///
    /// Returns a [`StreamError`] describing the first broken link.
    pub fn new(tokens: Vec<Token>) -> Result<Self, StreamError> {
        validate(&tokens)?;
        Ok(Self { tokens })
    }

    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if the stream has no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Returns the token at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// Iterates over the tokens in source order.
    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Returns the tokens as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    /// Byte offset of the token at `index`, counted over the concatenated
    /// token texts. Out-of-range indices yield the total length.
    #[must_use]
    pub fn offset_of(&self, index: usize) -> usize {
        self.tokens
            .iter()
            .take(index)
            .map(|t| t.text.len())
            .sum()
    }
}

impl std::ops::Index<usize> for TokenStream {
    type Output = Token;

    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

impl TryFrom<Vec<Token>> for TokenStream {
    type Error = StreamError;

    fn try_from(tokens: Vec<Token>) -> Result<Self, Self::Error> {
        Self::new(tokens)
    }
}

impl From<TokenStream> for Vec<Token> {
    fn from(stream: TokenStream) -> Self {
        stream.tokens
    }
}

fn validate(tokens: &[Token]) -> Result<(), StreamError> {
    let len = tokens.len();
    let in_range = |index: usize, field: &'static str, target: Option<usize>| match target {
        Some(t) if t >= len => Err(StreamError::LinkOutOfRange {
            index,
            field,
            target: t,
            len,
        }),
        _ => Ok(()),
    };

    for (index, token) in tokens.iter().enumerate() {
        if token.line == 0 || token.column == 0 {
            return Err(StreamError::ZeroPosition { index });
        }
        in_range(index, "scope_opener", token.scope_opener)?;
        in_range(index, "scope_closer", token.scope_closer)?;
        in_range(index, "scope_condition", token.scope_condition)?;
        in_range(index, "grouping_opener", token.grouping_opener)?;
        in_range(index, "grouping_closer", token.grouping_closer)?;

        match (token.scope_opener, token.scope_closer) {
            (Some(opener), Some(closer)) => {
                let open = &tokens[opener];
                if open.kind != TokenKind::OpenCurlyBracket {
                    return Err(StreamError::WrongKind {
                        index,
                        field: "scope_opener",
                        target: opener,
                        found: open.kind,
                        expected: TokenKind::OpenCurlyBracket,
                    });
                }
                if open.scope_closer != Some(closer) {
                    return Err(StreamError::ScopeMismatch {
                        index,
                        opener,
                        found: open.scope_closer,
                        expected: closer,
                    });
                }
                let close = &tokens[closer];
                if close.kind != TokenKind::CloseCurlyBracket {
                    return Err(StreamError::WrongKind {
                        index,
                        field: "scope_closer",
                        target: closer,
                        found: close.kind,
                        expected: TokenKind::CloseCurlyBracket,
                    });
                }
            }
            (Some(_), None) => {
                return Err(StreamError::UnpairedLink {
                    index,
                    field: "scope_opener",
                })
            }
            (None, Some(_)) => {
                return Err(StreamError::UnpairedLink {
                    index,
                    field: "scope_closer",
                })
            }
            (None, None) => {}
        }

        match (token.grouping_opener, token.grouping_closer) {
            (Some(opener), Some(closer)) if opener >= closer => {
                return Err(StreamError::GroupingOrder {
                    index,
                    opener,
                    closer,
                })
            }
            (Some(_), None) => {
                return Err(StreamError::UnpairedLink {
                    index,
                    field: "grouping_opener",
                })
            }
            (None, Some(_)) => {
                return Err(StreamError::UnpairedLink {
                    index,
                    field: "grouping_closer",
                })
            }
            _ => {}
        }
    }

    Ok(())
}
