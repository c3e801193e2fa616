//! Scope-boundary resolution.
//!
//! `end_id` answers "which token closes the scope this token opens".
//! Answers are memoized on the opening token, so a stream of a few
//! hundred thousand tokens is scanned once per opener at most.

use tracing::warn;

use crate::kind::TokenKind;
use crate::stream::TokenStream;
use crate::token::TokenId;

impl TokenStream {
    /// Id of the token closing the scope opened at `id`.
    ///
    /// Tokens that open no scope resolve to themselves. `None` means the
    /// stream ended before the scope was closed (or `id` is out of range).
    pub fn end_id(&self, id: TokenId) -> Option<TokenId> {
        let token = self.get(id)?;
        *token.end.get_or_init(|| self.resolve(id))
    }

    /// True once a `do` has claimed this `while` as its trailing condition.
    pub fn is_bound(&self, id: TokenId) -> bool {
        self.get(id).is_some_and(|t| t.claimed.get())
    }

    /// Whether the token at `id` opens a scope in context.
    ///
    /// `Foo::class` is a class-name constant, not a class declaration.
    pub fn opens_scope(&self, id: TokenId) -> bool {
        let Some(token) = self.get(id) else {
            return false;
        };
        if !token.kind().opens_scope() {
            return false;
        }
        if token.is(TokenKind::Class) {
            let after_colons = self
                .prev_significant(id)
                .is_some_and(|prev| prev.is(TokenKind::DoubleColon));
            return !after_colons;
        }
        true
    }

    fn resolve(&self, id: TokenId) -> Option<TokenId> {
        if !self.opens_scope(id) {
            return Some(id);
        }
        let kind = self.get(id)?.kind();
        let end = match kind {
            TokenKind::Do => self.resolve_do(id),
            _ => self.scan_block(id, kind.ends_at_statement()),
        };
        if end.is_none() {
            let line = self.get(id).map_or(0, |t| t.line());
            warn!(id, line, kind = %kind, "scope has no closing token");
        }
        end
    }

    /// Forward scan counting brace depth from the opener.
    ///
    /// With `statement_ends` set, a `;` outside any brace or parenthesis
    /// also closes the scope (abstract methods, brace-less bodies).
    fn scan_block(&self, id: TokenId, statement_ends: bool) -> Option<TokenId> {
        let mut braces = 0usize;
        let mut parens = 0usize;

        for token in &self.tokens()[id..] {
            match token.kind() {
                TokenKind::CurlyOpen => braces += 1,
                TokenKind::CurlyClose => {
                    braces = braces.saturating_sub(1);
                    if braces == 0 {
                        return Some(token.id());
                    }
                }
                TokenKind::ParenOpen => parens += 1,
                TokenKind::ParenClose => parens = parens.saturating_sub(1),
                TokenKind::Semicolon if statement_ends && braces == 0 && parens == 0 => {
                    return Some(token.id());
                }
                _ => {}
            }
        }
        None
    }

    /// `do { ... } while (cond);` closes after its condition, not its body.
    ///
    /// The body is resolved first; the first unclaimed `while` from there on
    /// is claimed as the terminator and its end becomes this opener's end.
    /// Deeply nested do-whiles bind to the first match found.
    fn resolve_do(&self, id: TokenId) -> Option<TokenId> {
        let body_end = self.scan_block(id, true)?;

        let terminator = self.tokens()[body_end..]
            .iter()
            .find(|t| t.is(TokenKind::While) && !t.claimed.get())?;
        terminator.claimed.set(true);
        self.end_id(terminator.id())
    }
}
