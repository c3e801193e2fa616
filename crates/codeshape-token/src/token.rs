use std::cell::Cell;

use once_cell::unsync::OnceCell;
use serde::Serialize;

use crate::kind::{TokenClass, TokenKind};

/// Position of a token in its stream. Doubles as identity and ordering key.
pub type TokenId = usize;

/// Output of the raw lexer, before ids and kinds are settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawToken {
    /// `(kind_code, text, line)` triple. A line of 0 means "unknown".
    Typed { code: u16, text: String, line: u32 },
    /// Punctuation the lexer does not distinguish; resolved through the
    /// custom-kind table.
    Bare(String),
}

impl RawToken {
    pub fn typed(kind: TokenKind, text: impl Into<String>, line: u32) -> Self {
        RawToken::Typed {
            code: kind.code(),
            text: text.into(),
            line,
        }
    }

    pub fn bare(text: impl Into<String>) -> Self {
        RawToken::Bare(text.into())
    }

    pub fn text(&self) -> &str {
        match self {
            RawToken::Typed { text, .. } => text,
            RawToken::Bare(text) => text,
        }
    }
}

/// A single lexical unit of a loaded stream.
///
/// Kind, text and line never change after loading. The two cells hold
/// resolver state: the memoized scope end and the "bound to a `do`" flag
/// on `while` terminators. Both are written at most once.
#[derive(Debug, Clone, Serialize)]
pub struct Token {
    id: TokenId,
    kind: TokenKind,
    text: String,
    line: u32,
    #[serde(skip)]
    pub(crate) end: OnceCell<Option<TokenId>>,
    #[serde(skip)]
    pub(crate) claimed: Cell<bool>,
}

impl Token {
    pub(crate) fn new(id: TokenId, kind: TokenKind, text: String, line: u32) -> Self {
        Self {
            id,
            kind,
            text,
            line,
            end: OnceCell::new(),
            claimed: Cell::new(false),
        }
    }

    pub fn id(&self) -> TokenId {
        self.id
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn class(&self) -> TokenClass {
        self.kind.class()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// 1-based line the token starts on.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Line the token's text ends on (multi-line comments, strings, whitespace).
    pub fn last_line(&self) -> u32 {
        self.line.saturating_add(newlines(&self.text))
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn is_trivia(&self) -> bool {
        self.kind.is_trivia()
    }

    /// Comment whose text starts with the `/**` marker.
    pub fn is_doc_comment(&self) -> bool {
        self.class() == TokenClass::Comment
            && self.text.starts_with("/**")
            && !self.text.starts_with("/**/")
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

pub(crate) fn newlines(text: &str) -> u32 {
    let count = text.bytes().filter(|b| *b == b'\n').count();
    u32::try_from(count).unwrap_or(u32::MAX)
}
