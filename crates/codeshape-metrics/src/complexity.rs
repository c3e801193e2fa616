//! Cyclomatic complexity over a token range.

use serde::Serialize;

use codeshape_token::{TokenId, TokenKind, TokenStream};

/// Decision points found in a token range, by category.
///
/// CCN = 1 + every counted decision point. Nesting depth does not matter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Complexity {
    /// `if`, `elseif`
    pub branches: u32,
    /// `for`, `foreach`, `while`
    pub loops: u32,
    /// `case` labels
    pub cases: u32,
    /// `catch` clauses
    pub exception_handlers: u32,
    /// `&&`, `||`, `and`, `or`
    pub logical_operators: u32,
    /// `?` of a ternary; nullable type markers are not counted
    pub ternaries: u32,
}

impl Complexity {
    /// Count decision points in `[start, end]`. The range is clamped to the
    /// stream; an empty range yields no decision points.
    pub fn measure(stream: &TokenStream, start: TokenId, end: TokenId) -> Self {
        let mut complexity = Complexity::default();
        let Some(tokens) = stream.tokens().get(start..=end.min(stream.len().saturating_sub(1)))
        else {
            return complexity;
        };
        for token in tokens {
            if token.is(TokenKind::QuestionMark) && is_nullable_marker(stream, token.id()) {
                continue;
            }
            complexity.record(token.kind());
        }
        complexity
    }

    fn record(&mut self, kind: TokenKind) {
        if !kind.is_decision_point() {
            return;
        }
        let slot = match kind {
            TokenKind::If | TokenKind::ElseIf => &mut self.branches,
            TokenKind::For | TokenKind::Foreach | TokenKind::While => &mut self.loops,
            TokenKind::Case => &mut self.cases,
            TokenKind::Catch => &mut self.exception_handlers,
            TokenKind::QuestionMark => &mut self.ternaries,
            _ => &mut self.logical_operators,
        };
        *slot += 1;
    }

    pub fn decision_points(&self) -> u32 {
        self.branches
            + self.loops
            + self.cases
            + self.exception_handlers
            + self.logical_operators
            + self.ternaries
    }

    pub fn cyclomatic(&self) -> u32 {
        1 + self.decision_points()
    }
}

/// `?int $x`, `): ?string`, `private ?Foo $p` and `Vector<?int>` mark a
/// nullable type. A ternary `?` always follows an operand, never one of these.
fn is_nullable_marker(stream: &TokenStream, id: TokenId) -> bool {
    stream.prev_significant(id).is_some_and(|prev| {
        matches!(
            prev.kind(),
            TokenKind::ParenOpen | TokenKind::Comma | TokenKind::Colon | TokenKind::Lt
        ) || prev.kind().is_modifier()
    })
}

/// CCN of the tokens in `[start, end]`.
pub fn cyclomatic_complexity(stream: &TokenStream, start: TokenId, end: TokenId) -> u32 {
    Complexity::measure(stream, start, end).cyclomatic()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_is_one() {
        let stream = TokenStream::from_source("<?php function f() { return 1; }");
        assert_eq!(cyclomatic_complexity(&stream, 0, stream.len() - 1), 1);
    }

    #[test]
    fn inverted_range_counts_nothing() {
        let stream = TokenStream::from_source("<?php if ($a) {}");
        assert_eq!(cyclomatic_complexity(&stream, 5, 1), 1);
    }

    #[test]
    fn range_past_end_is_clamped() {
        let stream = TokenStream::from_source("<?php if ($a && $b) {}");
        assert_eq!(cyclomatic_complexity(&stream, 0, 10_000), 3);
    }

    #[test]
    fn categories_add_up() {
        let src = "<?php
            foreach ($xs as $x) {
                switch ($x) { case 1: break; case 2: break; }
                try { f($x ? 1 : 2); } catch (E $e) {}
                while ($a or $b) {}
            }";
        let stream = TokenStream::from_source(src);
        let c = Complexity::measure(&stream, 0, stream.len() - 1);
        assert_eq!(c.loops, 2);
        assert_eq!(c.cases, 2);
        assert_eq!(c.ternaries, 1);
        assert_eq!(c.exception_handlers, 1);
        assert_eq!(c.logical_operators, 1);
        assert_eq!(c.branches, 0);
        assert_eq!(c.cyclomatic(), 8);
    }

    #[test]
    fn nullable_types_are_not_ternaries() {
        let src = "<?php function f(?int $a, Vector<?int> $v): ?string {
            return $a ? 'x' : null;
        }";
        let stream = TokenStream::from_source(src);
        let c = Complexity::measure(&stream, 0, stream.len() - 1);
        assert_eq!(c.ternaries, 1);
        assert_eq!(c.cyclomatic(), 2);
    }

    #[test]
    fn short_ternary_counts() {
        let stream = TokenStream::from_source("<?php $a = $b ?: $c;");
        assert_eq!(cyclomatic_complexity(&stream, 0, stream.len() - 1), 2);
    }
}
