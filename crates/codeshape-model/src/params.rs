//! Parameter lists and canonical signature text.

use tracing::warn;

use codeshape_token::{Token, TokenId, TokenKind, TokenStream};

use crate::decl::{Parameter, Parameters};

// ======= canonical text =======

/// Render tokens independently of source layout.
///
/// Comments are dropped. A space follows `,` and surrounds `=` / `=>`;
/// nothing is placed after `(` / `[`, before `)` / `]` / `,`, or before an
/// opening `(` / `[`. Anywhere else one space is kept where the source had
/// whitespace.
pub(crate) fn normalize(tokens: &[Token]) -> String {
    let mut out = String::new();
    let mut prev: Option<TokenKind> = None;
    let mut gap = false;

    for token in tokens {
        if token.is_trivia() {
            gap = true;
            continue;
        }
        if let Some(prev) = prev {
            if needs_space(prev, token.kind(), gap) {
                out.push(' ');
            }
        }
        out.push_str(token.text());
        prev = Some(token.kind());
        gap = false;
    }
    out
}

fn needs_space(prev: TokenKind, next: TokenKind, gap: bool) -> bool {
    use TokenKind::*;
    match (prev, next) {
        (_, Comma | ParenClose | BracketClose) => false,
        (ParenOpen | BracketOpen, _) => false,
        (Comma, _) => true,
        (Equal | DoubleArrow, _) | (_, Equal | DoubleArrow) => true,
        (_, ParenOpen | BracketOpen) => false,
        _ => gap,
    }
}

// ======= parameter lists =======

/// Partner of the `(` at `open`.
pub(crate) fn matching_paren(stream: &TokenStream, open: TokenId) -> Option<TokenId> {
    let mut depth = 0usize;
    for token in stream.tokens().get(open..)? {
        match token.kind() {
            TokenKind::ParenOpen => depth += 1,
            TokenKind::ParenClose => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(token.id());
                }
            }
            _ => {}
        }
    }
    None
}

/// Parameters declared between the parentheses at `open` and `close`.
pub(crate) fn parse(stream: &TokenStream, open: TokenId, close: TokenId) -> Parameters {
    let mut params = Parameters::default();
    let Some(inner) = stream.tokens().get(open + 1..close) else {
        return params;
    };
    for segment in split_top_level(inner) {
        if segment.iter().all(Token::is_trivia) {
            continue;
        }
        params.push(parameter(segment));
    }
    params
}

/// Split at commas outside nested `()`, `[]`, `{}` and, before the
/// variable, `<>` generic arguments.
fn split_top_level(tokens: &[Token]) -> Vec<&[Token]> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut angle = 0usize;
    let mut seen_variable = false;
    let mut start = 0;

    for (i, token) in tokens.iter().enumerate() {
        match token.kind() {
            TokenKind::ParenOpen | TokenKind::BracketOpen | TokenKind::CurlyOpen => depth += 1,
            TokenKind::ParenClose | TokenKind::BracketClose | TokenKind::CurlyClose => {
                depth = depth.saturating_sub(1)
            }
            TokenKind::Lt if !seen_variable => angle += 1,
            TokenKind::Gt if !seen_variable => angle = angle.saturating_sub(1),
            TokenKind::Variable => seen_variable = true,
            TokenKind::Comma if depth == 0 && angle == 0 => {
                segments.push(&tokens[start..i]);
                start = i + 1;
                seen_variable = false;
            }
            _ => {}
        }
    }
    segments.push(&tokens[start..]);
    segments
}

fn parameter(segment: &[Token]) -> Parameter {
    let Some(var) = segment.iter().position(|t| t.is(TokenKind::Variable)) else {
        warn!(
            line = segment.first().map_or(0, Token::line),
            text = %normalize(segment),
            "parameter without a variable"
        );
        return Parameter::default();
    };

    let prefix = &segment[..var];
    let type_start = prefix
        .iter()
        .position(|t| !t.is_trivia() && !t.kind().is_modifier())
        .unwrap_or(prefix.len());
    let type_end = prefix
        .iter()
        .position(|t| matches!(t.kind(), TokenKind::Ampersand | TokenKind::Ellipsis))
        .unwrap_or(prefix.len())
        .max(type_start);
    let ty = normalize(&prefix[type_start..type_end]);

    let rest = &segment[var + 1..];
    let default = rest
        .iter()
        .position(|t| !t.is_trivia())
        .filter(|&i| rest[i].is(TokenKind::Equal))
        .map(|i| normalize(&rest[i + 1..]))
        .filter(|text| !text.is_empty());

    Parameter {
        name: segment[var].text().trim_start_matches('$').to_string(),
        ty: (!ty.is_empty()).then_some(ty),
        default,
        by_ref: prefix.iter().any(|t| t.is(TokenKind::Ampersand)),
        variadic: prefix.iter().any(|t| t.is(TokenKind::Ellipsis)),
    }
}
