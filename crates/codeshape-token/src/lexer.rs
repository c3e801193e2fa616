//! Raw lexer for PHP/Hack flavoured source.
//!
//! Produces the untyped/typed raw token sequence the stream loader
//! consumes: most tokens come out as `(kind_code, text, line)` triples,
//! single-character punctuation comes out as bare strings.

use crate::kind::TokenKind;
use crate::token::{newlines, RawToken};

/// Longest operators first so `===` wins over `==`.
const OPERATORS: &[(&str, TokenKind)] = &[
    ("===", TokenKind::IsIdentical),
    ("!==", TokenKind::IsNotIdentical),
    ("<=>", TokenKind::Spaceship),
    ("...", TokenKind::Ellipsis),
    ("?->", TokenKind::NullsafeObjectOperator),
    ("&&", TokenKind::BooleanAnd),
    ("||", TokenKind::BooleanOr),
    ("??", TokenKind::Coalesce),
    ("->", TokenKind::ObjectOperator),
    ("=>", TokenKind::DoubleArrow),
    ("::", TokenKind::DoubleColon),
    ("==", TokenKind::IsEqual),
    ("!=", TokenKind::IsNotEqual),
    ("<=", TokenKind::IsSmallerOrEqual),
    (">=", TokenKind::IsGreaterOrEqual),
    ("++", TokenKind::Inc),
    ("--", TokenKind::Dec),
    ("+=", TokenKind::PlusEqual),
    ("-=", TokenKind::MinusEqual),
    ("*=", TokenKind::MulEqual),
    ("/=", TokenKind::DivEqual),
    (".=", TokenKind::ConcatEqual),
];

const OPEN_TAGS: &[&str] = &["<?php", "<?hh", "<?=", "<?"];

pub fn tokenize(src: &str) -> Vec<RawToken> {
    Lexer::new(src).run()
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: u32,
    in_code: bool,
    out: Vec<RawToken>,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            in_code: false,
            out: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<RawToken> {
        while self.pos < self.src.len() {
            if self.in_code {
                self.lex_code();
            } else {
                self.lex_markup();
            }
        }
        self.out
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.as_bytes().get(self.pos + offset).copied()
    }

    /// Emit `len` bytes from the current position as a typed token.
    fn emit(&mut self, kind: TokenKind, len: usize) {
        let text = &self.src[self.pos..self.pos + len];
        self.out.push(RawToken::typed(kind, text, self.line));
        self.line = self.line.saturating_add(newlines(text));
        self.pos += len;
    }

    // ======= markup outside of code =======

    fn lex_markup(&mut self) {
        let rest = self.rest();
        match rest.find("<?") {
            Some(0) => {
                let tag = OPEN_TAGS
                    .iter()
                    .find(|tag| starts_with_ignore_case(rest, tag))
                    .map_or(2, |tag| tag.len());
                self.emit(TokenKind::OpenTag, tag);
                self.in_code = true;
            }
            Some(at) => self.emit(TokenKind::InlineHtml, at),
            None => self.emit(TokenKind::InlineHtml, rest.len()),
        }
    }

    // ======= code =======

    fn lex_code(&mut self) {
        let rest = self.rest();
        let Some(b) = self.peek() else {
            return;
        };

        if b.is_ascii_whitespace() {
            let len = rest
                .bytes()
                .take_while(|b| b.is_ascii_whitespace())
                .count();
            self.emit(TokenKind::Whitespace, len);
            return;
        }

        if rest.starts_with("?>") {
            // the close tag swallows a single trailing newline
            let len = if rest[2..].starts_with('\n') { 3 } else { 2 };
            self.emit(TokenKind::CloseTag, len);
            self.in_code = false;
            return;
        }

        if b == b'#' || rest.starts_with("//") {
            self.emit(TokenKind::Comment, line_comment_len(rest));
            return;
        }

        if rest.starts_with("/*") {
            let len = rest[2..].find("*/").map_or(rest.len(), |at| at + 4);
            let text = &rest[..len];
            let kind = if text.starts_with("/**") && !text.starts_with("/**/") {
                TokenKind::DocComment
            } else {
                TokenKind::Comment
            };
            self.emit(kind, len);
            return;
        }

        if b == b'$' && self.peek_at(1).is_some_and(is_ident_start) {
            let len = 1 + ident_len(&rest[1..]);
            self.emit(TokenKind::Variable, len);
            return;
        }

        if is_ident_start(b) {
            let len = ident_len(rest);
            let kind = TokenKind::keyword(&rest[..len]).unwrap_or(TokenKind::Identifier);
            self.emit(kind, len);
            return;
        }

        if b.is_ascii_digit() || (b == b'.' && self.peek_at(1).is_some_and(|d| d.is_ascii_digit()))
        {
            let (len, is_float) = number_len(rest);
            let kind = if is_float {
                TokenKind::FloatLiteral
            } else {
                TokenKind::IntegerLiteral
            };
            self.emit(kind, len);
            return;
        }

        if b == b'\'' || b == b'"' {
            self.emit(TokenKind::StringLiteral, quoted_len(rest, b));
            return;
        }

        if let Some(len) = heredoc_len(rest) {
            self.emit(TokenKind::StringLiteral, len);
            return;
        }

        if let Some((op, kind)) = OPERATORS.iter().find(|(op, _)| rest.starts_with(op)) {
            self.emit(*kind, op.len());
            return;
        }

        // single character, typed later through the custom-kind table
        let len = rest.chars().next().map_or(1, char::len_utf8);
        self.out.push(RawToken::bare(&rest[..len]));
        self.pos += len;
    }
}

fn starts_with_ignore_case(haystack: &str, prefix: &str) -> bool {
    haystack
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

fn ident_len(s: &str) -> usize {
    s.bytes().take_while(|b| is_ident_char(*b)).count()
}

/// A line comment ends before the newline or before a `?>` close tag.
fn line_comment_len(s: &str) -> usize {
    let newline = s.find('\n').unwrap_or(s.len());
    match s[..newline].find("?>") {
        Some(at) => at,
        None => newline,
    }
}

fn number_len(s: &str) -> (usize, bool) {
    let bytes = s.as_bytes();
    if bytes.len() > 2 && bytes[0] == b'0' && matches!(bytes[1], b'x' | b'X' | b'b' | b'B') {
        let digits = s[2..]
            .bytes()
            .take_while(|b| b.is_ascii_hexdigit() || *b == b'_')
            .count();
        return (2 + digits, false);
    }

    let mut len = 0;
    let mut is_float = false;
    while let Some(&b) = bytes.get(len) {
        if b.is_ascii_digit() || b == b'_' {
            len += 1;
        } else if b == b'.' && !is_float && bytes.get(len + 1).is_some_and(u8::is_ascii_digit) {
            is_float = true;
            len += 1;
        } else if matches!(b, b'e' | b'E')
            && bytes
                .get(len + 1)
                .is_some_and(|n| n.is_ascii_digit() || matches!(n, b'+' | b'-'))
        {
            is_float = true;
            len += 2;
        } else {
            break;
        }
    }
    (len, is_float)
}

/// Length of a heredoc or nowdoc (`<<<ID`, `<<<"ID"`, `<<<'ID'`) up to and
/// including the closing identifier, which may be indented. Unterminated
/// bodies run to the end of input; anything that is not a heredoc header
/// yields `None`.
fn heredoc_len(s: &str) -> Option<usize> {
    let head = s.strip_prefix("<<<")?;
    let spaces = head.bytes().take_while(|b| matches!(b, b' ' | b'\t')).count();
    let head = &head[spaces..];
    let quote = head.bytes().next().filter(|b| matches!(b, b'\'' | b'"'));
    let name_start = usize::from(quote.is_some());
    let name_len = ident_len(&head[name_start..]);
    if !head.as_bytes().get(name_start).is_some_and(|b| is_ident_start(*b)) {
        return None;
    }
    let name = &head[name_start..name_start + name_len];

    let mut header = 3 + spaces + name_start + name_len;
    if let Some(quote) = quote {
        if s.as_bytes().get(header) != Some(&quote) {
            return None;
        }
        header += 1;
    }
    let after = &s[header..];
    if !(after.starts_with('\n') || after.starts_with("\r\n")) {
        return None;
    }

    let mut line_start = header + after.find('\n')? + 1;
    loop {
        let line_end = s[line_start..]
            .find('\n')
            .map_or(s.len(), |at| line_start + at);
        let line = &s[line_start..line_end];
        let indent = line.len() - line.trim_start_matches([' ', '\t']).len();
        let body = &line[indent..];
        let closes = body.starts_with(name)
            && !body.as_bytes().get(name.len()).is_some_and(|b| is_ident_char(*b));
        if closes {
            return Some(line_start + indent + name.len());
        }
        if line_end >= s.len() {
            return Some(s.len());
        }
        line_start = line_end + 1;
    }
}

/// Length of a quoted string including both quotes; unterminated strings
/// run to the end of input.
fn quoted_len(s: &str, quote: u8) -> usize {
    let bytes = s.as_bytes();
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<(Option<TokenKind>, String)> {
        tokenize(src)
            .into_iter()
            .map(|raw| match raw {
                RawToken::Typed { code, text, .. } => (TokenKind::from_code(code), text),
                RawToken::Bare(text) => (None, text),
            })
            .collect()
    }

    #[test]
    fn markup_before_open_tag_is_inline_html() {
        let toks = kinds("<b>hi</b><?php echo 1; ?>\ntail");
        assert_eq!(toks[0], (Some(TokenKind::InlineHtml), "<b>hi</b>".into()));
        assert_eq!(toks[1], (Some(TokenKind::OpenTag), "<?php".into()));
        assert!(toks.contains(&(Some(TokenKind::CloseTag), "?>\n".into())));
        assert_eq!(
            toks.last(),
            Some(&(Some(TokenKind::InlineHtml), "tail".into()))
        );
    }

    #[test]
    fn punctuation_is_bare() {
        let toks = kinds("<?php f($a);");
        assert!(toks.contains(&(None, "(".into())));
        assert!(toks.contains(&(None, ")".into())));
        assert!(toks.contains(&(None, ";".into())));
        assert!(toks.contains(&(Some(TokenKind::Variable), "$a".into())));
    }

    #[test]
    fn doc_comments_are_distinguished() {
        let toks = kinds("<?php /** doc */ /* plain */ /**/ // line\n# hash");
        let comments: Vec<_> = toks
            .iter()
            .filter(|(k, _)| matches!(k, Some(TokenKind::Comment | TokenKind::DocComment)))
            .collect();
        assert_eq!(comments.len(), 5);
        assert_eq!(comments[0].0, Some(TokenKind::DocComment));
        assert_eq!(comments[1].0, Some(TokenKind::Comment));
        assert_eq!(comments[2].0, Some(TokenKind::Comment));
        assert_eq!(comments[3].1, "// line");
        assert_eq!(comments[4].1, "# hash");
    }

    #[test]
    fn multi_char_operators_are_typed() {
        let toks = kinds("<?php $a && $b || $c ?? $d === $e ... $f?->g");
        for kind in [
            TokenKind::BooleanAnd,
            TokenKind::BooleanOr,
            TokenKind::Coalesce,
            TokenKind::IsIdentical,
            TokenKind::Ellipsis,
            TokenKind::NullsafeObjectOperator,
        ] {
            assert!(toks.iter().any(|(k, _)| *k == Some(kind)), "{kind:?}");
        }
    }

    #[test]
    fn lines_follow_newlines_in_text() {
        let raw = tokenize("<?php\n/**\n * x\n */\nfunction f() {}");
        let function = raw
            .iter()
            .find(|r| r.text() == "function")
            .expect("function token");
        let RawToken::Typed { line, .. } = function else {
            panic!("function should be typed");
        };
        assert_eq!(*line, 5);
    }

    #[test]
    fn numbers_and_strings() {
        let toks = kinds(r#"<?php 42 3.14 0x1F 'it\'s' "a\"b""#);
        assert!(toks.contains(&(Some(TokenKind::IntegerLiteral), "42".into())));
        assert!(toks.contains(&(Some(TokenKind::FloatLiteral), "3.14".into())));
        assert!(toks.contains(&(Some(TokenKind::IntegerLiteral), "0x1F".into())));
        assert!(toks.contains(&(Some(TokenKind::StringLiteral), r"'it\'s'".into())));
        assert!(toks.contains(&(Some(TokenKind::StringLiteral), r#""a\"b""#.into())));
    }

    #[test]
    fn heredoc_is_one_string_literal() {
        let toks = kinds("<?php $s = <<<EOT\nIt's { \"x\"\nEOT;\n$t = 1;");
        assert!(toks.contains(&(
            Some(TokenKind::StringLiteral),
            "<<<EOT\nIt's { \"x\"\nEOT".into()
        )));
        assert!(toks.contains(&(Some(TokenKind::Variable), "$t".into())));
        assert!(!toks.contains(&(None, "{".into())));
    }

    #[test]
    fn nowdoc_and_indented_closer() {
        let toks = kinds("<?php f(<<<'SQL'\n    SELECT '{'\n    SQL, 1);");
        assert!(toks.contains(&(
            Some(TokenKind::StringLiteral),
            "<<<'SQL'\n    SELECT '{'\n    SQL".into()
        )));
        assert!(toks.contains(&(Some(TokenKind::IntegerLiteral), "1".into())));
    }

    #[test]
    fn closer_must_not_continue_the_name() {
        let toks = kinds("<?php <<<EOT\nEOTX\nEOT;");
        assert!(toks.contains(&(
            Some(TokenKind::StringLiteral),
            "<<<EOT\nEOTX\nEOT".into()
        )));
    }

    #[test]
    fn lines_after_heredoc_are_counted() {
        let raw = tokenize("<?php\n$s = <<<EOT\na\nb\nEOT;\nfunction f() {}");
        let function = raw
            .iter()
            .find(|r| r.text() == "function")
            .expect("function token");
        let RawToken::Typed { line, .. } = function else {
            panic!("function should be typed");
        };
        assert_eq!(*line, 6);
    }

    #[test]
    fn shift_operators_are_not_heredocs() {
        let toks = kinds("<?php $a <<< 1; $b << 2;");
        assert!(!toks
            .iter()
            .any(|(k, _)| *k == Some(TokenKind::StringLiteral)));
        assert_eq!(toks.iter().filter(|(_, t)| t == "<").count(), 5);
    }
}
