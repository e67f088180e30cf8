//! PHP-subset tokenizer for tests.
//!
//! Enabled with the `fixtures` feature. Produces a linked [`TokenStream`] the
//! way an upstream tokenizer and scope matcher would, so rule tests can be
//! written as source snippets. It understands just enough PHP for that:
//! keywords, identifiers, variables, literals, comments, punctuation, and
//! brace/parenthesis/bracket matching. Whitespace tokens end after each line
//! break.

use crate::token::{StreamError, Token, TokenKind, TokenStream};

/// Tokenizes `source` and links scopes and groups.
///
/// # Errors
///
/// Returns a [`StreamError`] if the produced links fail validation.
pub fn tokenize(source: &str) -> Result<TokenStream, StreamError> {
    let mut tokens = Lexer::new(source).run();
    link_groups(&mut tokens);
    link_scopes(&mut tokens);
    TokenStream::new(tokens)
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
}

impl Lexer {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
        }
    }

    fn peek(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.pos + ahead).copied()
    }

    fn run(mut self) -> Vec<Token> {
        while let Some(c) = self.peek(0) {
            let start = self.pos;
            let kind = if c.is_whitespace() {
                self.whitespace()
            } else if c == '#' || (c == '/' && self.peek(1) == Some('/')) {
                self.take_while(|ch| ch != '\n');
                TokenKind::Comment
            } else if c == '/' && self.peek(1) == Some('*') {
                self.block_comment()
            } else if c == '$' && self.peek(1).is_some_and(is_ident_start) {
                self.pos += 1;
                self.take_while(is_ident_char);
                TokenKind::Variable
            } else if is_ident_start(c) {
                self.take_while(is_ident_char);
                keyword(&self.chars[start..self.pos].iter().collect::<String>())
            } else if c.is_ascii_digit() {
                self.take_while(|ch| ch.is_ascii_alphanumeric() || ch == '.');
                TokenKind::Number
            } else if c == '\'' || c == '"' {
                self.string(c);
                TokenKind::StringLiteral
            } else {
                self.punctuation(c)
            };
            let text: String = self.chars[start..self.pos].iter().collect();
            self.push(kind, text);
        }
        self.tokens
    }

    fn push(&mut self, kind: TokenKind, text: String) {
        let token = Token::new(kind, text, self.line, self.column);
        for ch in token.text.chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.tokens.push(token);
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek(0).is_some_and(&pred) {
            self.pos += 1;
        }
    }

    fn whitespace(&mut self) -> TokenKind {
        while let Some(ch) = self.peek(0) {
            if !ch.is_whitespace() {
                break;
            }
            self.pos += 1;
            if ch == '\n' {
                break;
            }
        }
        TokenKind::Whitespace
    }

    fn block_comment(&mut self) -> TokenKind {
        let kind = if self.peek(2) == Some('*') && self.peek(3) != Some('/') {
            TokenKind::DocComment
        } else {
            TokenKind::Comment
        };
        self.pos += 2;
        while let Some(ch) = self.peek(0) {
            self.pos += 1;
            if ch == '*' && self.peek(0) == Some('/') {
                self.pos += 1;
                break;
            }
        }
        kind
    }

    fn string(&mut self, quote: char) {
        self.pos += 1;
        while let Some(ch) = self.peek(0) {
            self.pos += 1;
            if ch == '\\' {
                self.pos += 1;
            } else if ch == quote {
                break;
            }
        }
        self.pos = self.pos.min(self.chars.len());
    }

    fn punctuation(&mut self, c: char) -> TokenKind {
        let next = self.peek(1);
        let (kind, width) = match (c, next) {
            ('-', Some('>')) => (TokenKind::ObjectOperator, 2),
            (':', Some(':')) => (TokenKind::DoubleColon, 2),
            ('=', Some('>')) => (TokenKind::DoubleArrow, 2),
            ('=', Some('=')) | ('!', Some('=')) | ('<', Some('=')) | ('>', Some('=')) => {
                (TokenKind::Other, 2)
            }
            ('{', _) => (TokenKind::OpenCurlyBracket, 1),
            ('}', _) => (TokenKind::CloseCurlyBracket, 1),
            ('(', _) => (TokenKind::OpenParenthesis, 1),
            (')', _) => (TokenKind::CloseParenthesis, 1),
            ('[', _) => (TokenKind::OpenSquareBracket, 1),
            (']', _) => (TokenKind::CloseSquareBracket, 1),
            (':', _) => (TokenKind::Colon, 1),
            (';', _) => (TokenKind::Semicolon, 1),
            (',', _) => (TokenKind::Comma, 1),
            ('=', _) => (TokenKind::Equal, 1),
            ('&', _) => (TokenKind::Ampersand, 1),
            ('\\', _) => (TokenKind::NsSeparator, 1),
            _ => (TokenKind::Other, 1),
        };
        self.pos += width;
        kind
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn keyword(word: &str) -> TokenKind {
    match word.to_ascii_lowercase().as_str() {
        "function" => TokenKind::Function,
        "class" => TokenKind::Class,
        "interface" => TokenKind::Interface,
        "abstract" => TokenKind::Abstract,
        "final" => TokenKind::Final,
        "public" => TokenKind::Public,
        "protected" => TokenKind::Protected,
        "private" => TokenKind::Private,
        "static" => TokenKind::Static,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "elseif" => TokenKind::ElseIf,
        "for" => TokenKind::For,
        "foreach" => TokenKind::Foreach,
        "while" => TokenKind::While,
        "do" => TokenKind::Do,
        "switch" => TokenKind::Switch,
        "exit" | "die" => TokenKind::Exit,
        "return" => TokenKind::Return,
        "new" => TokenKind::New,
        _ => TokenKind::Identifier,
    }
}

/// Pairs parentheses and square brackets with a stack per bracket type.
fn link_groups(tokens: &mut [Token]) {
    let mut parens = Vec::new();
    let mut brackets = Vec::new();
    for i in 0..tokens.len() {
        let stack = match tokens[i].kind {
            TokenKind::OpenParenthesis => {
                parens.push(i);
                continue;
            }
            TokenKind::OpenSquareBracket => {
                brackets.push(i);
                continue;
            }
            TokenKind::CloseParenthesis => &mut parens,
            TokenKind::CloseSquareBracket => &mut brackets,
            _ => continue,
        };
        if let Some(open) = stack.pop() {
            tokens[open].grouping_opener = Some(open);
            tokens[open].grouping_closer = Some(i);
            tokens[i].grouping_opener = Some(open);
            tokens[i].grouping_closer = Some(i);
        }
    }
}

/// Pairs braces, then assigns each block keyword its parenthesis group and
/// brace pair. Keywords followed by anything but a brace own no scope.
fn link_scopes(tokens: &mut [Token]) {
    let mut stack = Vec::new();
    for i in 0..tokens.len() {
        match tokens[i].kind {
            TokenKind::OpenCurlyBracket => stack.push(i),
            TokenKind::CloseCurlyBracket => {
                if let Some(open) = stack.pop() {
                    for at in [open, i] {
                        tokens[at].scope_opener = Some(open);
                        tokens[at].scope_closer = Some(i);
                    }
                }
            }
            _ => {}
        }
    }

    for owner in 0..tokens.len() {
        let kind = tokens[owner].kind;
        let declaration = matches!(
            kind,
            TokenKind::Function | TokenKind::Class | TokenKind::Interface
        );
        if !declaration && !kind.is_control_structure() {
            continue;
        }

        let mut anchor = owner;
        if matches!(
            kind,
            TokenKind::If
                | TokenKind::ElseIf
                | TokenKind::For
                | TokenKind::Foreach
                | TokenKind::While
                | TokenKind::Switch
                | TokenKind::Function
        ) {
            if let Some(open) = find_group_opener(tokens, owner) {
                if let Some(close) = tokens[open].grouping_closer {
                    tokens[owner].grouping_opener = Some(open);
                    tokens[owner].grouping_closer = Some(close);
                    anchor = close;
                }
            }
        }

        let brace = if declaration {
            tokens[anchor + 1..]
                .iter()
                .position(|t| {
                    matches!(
                        t.kind,
                        TokenKind::OpenCurlyBracket | TokenKind::Semicolon
                    )
                })
                .map(|offset| anchor + 1 + offset)
        } else {
            next_significant(tokens, anchor + 1)
        };

        if let Some(brace) = brace.filter(|&b| tokens[b].kind == TokenKind::OpenCurlyBracket) {
            if let Some(close) = tokens[brace].scope_closer {
                tokens[owner].scope_opener = Some(brace);
                tokens[owner].scope_closer = Some(close);
                tokens[brace].scope_condition = Some(owner);
                tokens[close].scope_condition = Some(owner);
            }
        }
    }
}

fn next_significant(tokens: &[Token], from: usize) -> Option<usize> {
    (from..tokens.len()).find(|&i| !tokens[i].is_empty())
}

/// Finds the `(` that follows a keyword, skipping a function's `&` and name.
fn find_group_opener(tokens: &[Token], owner: usize) -> Option<usize> {
    let mut next = next_significant(tokens, owner + 1)?;
    if tokens[owner].kind == TokenKind::Function {
        if tokens[next].kind == TokenKind::Ampersand {
            next = next_significant(tokens, next + 1)?;
        }
        if tokens[next].kind == TokenKind::Identifier {
            next = next_significant(tokens, next + 1)?;
        }
    }
    (tokens[next].kind == TokenKind::OpenParenthesis).then_some(next)
}
