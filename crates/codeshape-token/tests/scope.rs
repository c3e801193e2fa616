//! Tests for scope-boundary resolution, including the do-while rule.

use codeshape_token::{RawToken, TokenKind, TokenStream};
use proptest::prelude::*;

fn ids_of(stream: &TokenStream, kind: TokenKind) -> Vec<usize> {
    stream
        .iter()
        .filter(|t| t.is(kind))
        .map(|t| t.id())
        .collect()
}

fn text_at(stream: &TokenStream, id: Option<usize>) -> Option<&str> {
    id.and_then(|id| stream.get(id)).map(|t| t.text())
}

// ============ Brace blocks ============

#[test]
fn function_ends_at_matching_brace() {
    let src = "<?php\nfunction f() {\n  if ($a) {\n    { }\n  }\n}\n$x = 1;";
    let stream = TokenStream::from_source(src);
    let f = ids_of(&stream, TokenKind::Function)[0];
    let end = stream.end_id(f).expect("resolved");
    assert_eq!(text_at(&stream, Some(end)), Some("}"));
    assert_eq!(stream.get(end).map(|t| t.line()), Some(6));
}

#[test]
fn curly_open_resolves_to_its_partner() {
    let stream = TokenStream::from_source("<?php { { } }");
    let opens = ids_of(&stream, TokenKind::CurlyOpen);
    let closes = ids_of(&stream, TokenKind::CurlyClose);
    assert_eq!(stream.end_id(opens[0]), Some(closes[1]));
    assert_eq!(stream.end_id(opens[1]), Some(closes[0]));
}

#[test]
fn abstract_method_ends_at_semicolon() {
    let src = "<?php interface I { public function m($a); public function n(); }";
    let stream = TokenStream::from_source(src);
    let functions = ids_of(&stream, TokenKind::Function);
    let semis = ids_of(&stream, TokenKind::Semicolon);
    assert_eq!(stream.end_id(functions[0]), Some(semis[0]));
    assert_eq!(stream.end_id(functions[1]), Some(semis[1]));

    let interface = ids_of(&stream, TokenKind::Interface)[0];
    let last_close = *ids_of(&stream, TokenKind::CurlyClose).last().unwrap();
    assert_eq!(stream.end_id(interface), Some(last_close));
}

#[test]
fn for_header_semicolons_do_not_close_the_loop() {
    let src = "<?php for ($i = 0; $i < 3; $i++) { f($i); }";
    let stream = TokenStream::from_source(src);
    let for_id = ids_of(&stream, TokenKind::For)[0];
    let close = ids_of(&stream, TokenKind::CurlyClose)[0];
    assert_eq!(stream.end_id(for_id), Some(close));
}

#[test]
fn braceless_if_ends_at_its_statement() {
    let src = "<?php if ($a) return 1; while ($b) { g(); }";
    let stream = TokenStream::from_source(src);
    let if_id = ids_of(&stream, TokenKind::If)[0];
    let first_semi = ids_of(&stream, TokenKind::Semicolon)[0];
    assert_eq!(stream.end_id(if_id), Some(first_semi));
}

#[test]
fn unclosed_scope_is_unresolved() {
    let stream = TokenStream::from_source("<?php function f() { if ($a) {");
    let f = ids_of(&stream, TokenKind::Function)[0];
    assert_eq!(stream.end_id(f), None);
    // stays unresolved on the second call as well
    assert_eq!(stream.end_id(f), None);
}

#[test]
fn out_of_range_id_is_unresolved() {
    let stream = TokenStream::from_source("<?php ;");
    assert_eq!(stream.end_id(99), None);
}

// ============ Do-while ============

#[test]
fn do_adopts_the_end_of_its_while() {
    let src = "<?php do {\n  $i++;\n} while ($i < 3);\necho $i;";
    let stream = TokenStream::from_source(src);
    let do_id = ids_of(&stream, TokenKind::Do)[0];
    let while_id = ids_of(&stream, TokenKind::While)[0];

    assert!(!stream.is_bound(while_id));
    let end = stream.end_id(do_id);
    assert!(stream.is_bound(while_id));
    assert_eq!(end, stream.end_id(while_id));
    assert_eq!(text_at(&stream, end), Some(";"));
    assert_eq!(end.and_then(|e| stream.get(e)).map(|t| t.line()), Some(3));
}

#[test]
fn while_resolved_first_agrees_with_do() {
    let src = "<?php do { f(); } while ($x);";
    let stream = TokenStream::from_source(src);
    let do_id = ids_of(&stream, TokenKind::Do)[0];
    let while_id = ids_of(&stream, TokenKind::While)[0];
    let while_end = stream.end_id(while_id);
    assert_eq!(stream.end_id(do_id), while_end);
}

#[test]
fn sequential_do_whiles_bind_their_own_terminators() {
    let src = "<?php do { a(); } while ($x); do { b(); } while ($y);";
    let stream = TokenStream::from_source(src);
    let dos = ids_of(&stream, TokenKind::Do);
    let whiles = ids_of(&stream, TokenKind::While);
    assert_eq!(stream.end_id(dos[1]), stream.end_id(whiles[1]));
    assert_eq!(stream.end_id(dos[0]), stream.end_id(whiles[0]));
    assert!(whiles.iter().all(|w| stream.is_bound(*w)));
}

#[test]
fn nested_do_whiles() {
    let src = "<?php do { do { a(); } while ($x); } while ($y);";
    let stream = TokenStream::from_source(src);
    let dos = ids_of(&stream, TokenKind::Do);
    let whiles = ids_of(&stream, TokenKind::While);
    let semis = ids_of(&stream, TokenKind::Semicolon);

    assert_eq!(stream.end_id(dos[0]), Some(*semis.last().unwrap()));
    assert_eq!(stream.end_id(dos[1]), stream.end_id(whiles[0]));
    assert!(stream.is_bound(whiles[0]));
    assert!(stream.is_bound(whiles[1]));
}

#[test]
fn braceless_do_body() {
    let src = "<?php do $i++; while ($i < 3);";
    let stream = TokenStream::from_source(src);
    let do_id = ids_of(&stream, TokenKind::Do)[0];
    let semis = ids_of(&stream, TokenKind::Semicolon);
    assert_eq!(stream.end_id(do_id), Some(semis[1]));
}

#[test]
fn do_without_while_is_unresolved() {
    let stream = TokenStream::from_source("<?php do { a(); }");
    let do_id = ids_of(&stream, TokenKind::Do)[0];
    assert_eq!(stream.end_id(do_id), None);
}

// ============ Properties ============

fn raw_piece() -> impl Strategy<Value = RawToken> {
    prop_oneof![
        Just(RawToken::bare("{")),
        Just(RawToken::bare("}")),
        Just(RawToken::bare("(")),
        Just(RawToken::bare(")")),
        Just(RawToken::bare(";")),
        Just(RawToken::typed(TokenKind::Function, "function", 0)),
        Just(RawToken::typed(TokenKind::Class, "class", 0)),
        Just(RawToken::typed(TokenKind::If, "if", 0)),
        Just(RawToken::typed(TokenKind::Do, "do", 0)),
        Just(RawToken::typed(TokenKind::While, "while", 0)),
        Just(RawToken::typed(TokenKind::Variable, "$a", 0)),
        Just(RawToken::typed(TokenKind::Whitespace, "\n", 0)),
    ]
}

proptest! {
    #[test]
    fn end_never_precedes_opener_and_is_stable(raw in prop::collection::vec(raw_piece(), 0..64)) {
        let stream = TokenStream::from_raw(raw);
        for token in stream.iter() {
            let first = stream.end_id(token.id());
            if let Some(end) = first {
                prop_assert!(end >= token.id());
                prop_assert!(end < stream.len());
            }
            prop_assert_eq!(stream.end_id(token.id()), first);
        }
    }
}
