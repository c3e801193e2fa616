use once_cell::unsync::OnceCell;
use thiserror::Error;
use tracing::{debug, warn};

use crate::kind::TokenKind;
use crate::lexer;
use crate::token::{newlines, RawToken, Token, TokenId};

/// Errors from turning source bytes into a token stream.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The source is not valid UTF-8 and cannot be tokenized.
    #[error("source is not valid UTF-8: {0}")]
    Decode(#[from] std::str::Utf8Error),
}

/// Ordered tokens of one source file. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Assign ids and kinds to raw lexer output.
    ///
    /// Unrecognized bare strings and unknown kind codes become
    /// [`TokenKind::Other`]; a diagnostic is logged and loading continues.
    pub fn from_raw<I>(raw: I) -> Self
    where
        I: IntoIterator<Item = RawToken>,
    {
        let mut tokens = Vec::new();
        let mut line = 1;

        for (id, raw) in raw.into_iter().enumerate() {
            let (kind, text, at) = match raw {
                RawToken::Typed {
                    code,
                    text,
                    line: given,
                } => {
                    let kind = TokenKind::from_code(code).unwrap_or_else(|| {
                        warn!(id, code, text = %text, "unknown token kind code");
                        TokenKind::Other
                    });
                    let at = if given == 0 { line } else { given };
                    (kind, text, at)
                }
                RawToken::Bare(text) => {
                    let kind = TokenKind::from_literal(&text).unwrap_or_else(|| {
                        warn!(id, line, text = %text, "unrecognized token");
                        TokenKind::Other
                    });
                    (kind, text, line)
                }
            };
            line = at.saturating_add(newlines(&text));
            tokens.push(Token::new(id, kind, text, at));
        }

        Self { tokens }
    }

    /// Tokenize source text with the bundled lexer.
    pub fn from_source(src: &str) -> Self {
        Self::from_raw(lexer::tokenize(src))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LoadError> {
        let src = std::str::from_utf8(bytes)?;
        Ok(Self::from_source(src))
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, id: TokenId) -> Option<&Token> {
        self.tokens.get(id)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Last line touched by any token; 1 for an empty stream.
    pub fn last_line(&self) -> u32 {
        self.tokens.last().map_or(1, Token::last_line)
    }

    /// First non-trivia token after `id`.
    pub fn next_significant(&self, id: TokenId) -> Option<&Token> {
        self.tokens.get(id + 1..)?.iter().find(|t| !t.is_trivia())
    }

    /// Closest non-trivia token before `id`.
    pub fn prev_significant(&self, id: TokenId) -> Option<&Token> {
        self.tokens
            .get(..id.min(self.tokens.len()))?
            .iter()
            .rev()
            .find(|t| !t.is_trivia())
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

/// Source bytes paired with the token stream built from them on first use.
#[derive(Debug)]
pub struct CachedStream {
    bytes: Vec<u8>,
    stream: OnceCell<TokenStream>,
}

impl CachedStream {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            stream: OnceCell::new(),
        }
    }

    /// Build the stream if it has not been built yet. Idempotent.
    pub fn load(&self) -> Result<(), LoadError> {
        self.get().map(|_| ())
    }

    /// The cached stream, loading it first if necessary.
    pub fn get(&self) -> Result<&TokenStream, LoadError> {
        self.stream.get_or_try_init(|| {
            let stream = TokenStream::from_bytes(&self.bytes)?;
            debug!(tokens = stream.len(), "token stream loaded");
            Ok(stream)
        })
    }

    pub fn is_loaded(&self) -> bool {
        self.stream.get().is_some()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}
