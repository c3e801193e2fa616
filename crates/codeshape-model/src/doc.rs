//! Backward scans from a declaration keyword.

use codeshape_token::{Token, TokenId, TokenKind, TokenStream};

use crate::decl::{Modifiers, Visibility};

/// The doc comment closest to `keyword`, or an empty string.
///
/// Whitespace, plain comments, modifier keywords and `<<...>>` attributes
/// may sit in between; anything else stops the scan. At most `lookback`
/// tokens are inspected.
pub(crate) fn doc_comment(stream: &TokenStream, keyword: TokenId, lookback: usize) -> String {
    let Some(before) = stream.tokens().get(..keyword) else {
        return String::new();
    };
    let floor = before.len().saturating_sub(lookback);
    let mut i = before.len();
    while i > floor {
        i -= 1;
        let token = &before[i];
        if token.is_doc_comment() {
            return token.text().to_string();
        }
        if token.is(TokenKind::Gt) {
            match attribute_start(before, i) {
                Some(start) => {
                    i = start;
                    continue;
                }
                None => break,
            }
        }
        if !token.is_trivia() && !token.kind().is_modifier() {
            break;
        }
    }
    String::new()
}

/// Index of the `<<` opening the attribute whose closing `>>` ends at `end`.
fn attribute_start(tokens: &[Token], end: usize) -> Option<usize> {
    if end == 0 || !tokens[end - 1].is(TokenKind::Gt) {
        return None;
    }
    let mut i = end - 1;
    while i >= 1 {
        if tokens[i].is(TokenKind::Lt) && tokens[i - 1].is(TokenKind::Lt) {
            return Some(i - 1);
        }
        if matches!(
            tokens[i].kind(),
            TokenKind::Semicolon | TokenKind::CurlyOpen | TokenKind::CurlyClose
        ) {
            return None;
        }
        i -= 1;
    }
    None
}

/// Modifier keywords directly in front of `keyword`.
pub(crate) fn modifiers(stream: &TokenStream, keyword: TokenId) -> Modifiers {
    let mut out = Modifiers::default();
    let Some(before) = stream.tokens().get(..keyword) else {
        return out;
    };
    for token in before.iter().rev().filter(|t| !t.is_trivia()) {
        match token.kind() {
            TokenKind::Public => out.visibility = Some(Visibility::Public),
            TokenKind::Protected => out.visibility = Some(Visibility::Protected),
            TokenKind::Private => out.visibility = Some(Visibility::Private),
            TokenKind::Static => out.is_static = true,
            TokenKind::Abstract => out.is_abstract = true,
            TokenKind::Final => out.is_final = true,
            TokenKind::Async => {}
            _ => break,
        }
    }
    out
}
