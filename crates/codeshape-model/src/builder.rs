use tracing::{debug, warn};

use codeshape_token::{Token, TokenId, TokenKind, TokenStream};

use crate::decl::{DeclKind, Declaration};
use crate::{doc, params};

/// Knobs for [`build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// How many tokens to look back from a keyword for its doc comment.
    pub doc_lookback: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self { doc_lookback: 32 }
    }
}

/// Build the declaration tree of one file.
///
/// The returned `File` declaration spans the whole stream; classes,
/// interfaces, traits and top-level functions are its children.
pub fn build(name: &str, stream: &TokenStream, options: &BuildOptions) -> Declaration {
    let builder = Builder { stream, options };
    let file = builder.file(name);
    debug!(
        file = name,
        declarations = file.walk().len(),
        "built declaration tree"
    );
    file
}

struct Builder<'s> {
    stream: &'s TokenStream,
    options: &'s BuildOptions,
}

impl<'s> Builder<'s> {
    fn token(&self, id: TokenId) -> Option<&'s Token> {
        self.stream.get(id)
    }

    fn last_id(&self) -> TokenId {
        self.stream.len().saturating_sub(1)
    }

    fn line(&self, id: TokenId) -> u32 {
        self.token(id).map_or(1, Token::line)
    }

    /// Resolved end of the scope opened at `id`; falls back to the last
    /// token and reports the declaration as incomplete.
    fn end_of(&self, id: TokenId) -> (TokenId, bool) {
        match self.stream.end_id(id) {
            Some(end) => (end, false),
            None => {
                warn!(
                    line = self.line(id),
                    "declaration never closes, extending it to the end of the file"
                );
                (self.last_id(), true)
            }
        }
    }

    /// First `{` or `;` at or after `from` outside parentheses.
    fn definition_end(&self, from: TokenId, until: TokenId) -> Option<TokenId> {
        let mut depth = 0usize;
        for token in self.stream.tokens().get(from..=until)? {
            match token.kind() {
                TokenKind::ParenOpen => depth += 1,
                TokenKind::ParenClose => depth = depth.saturating_sub(1),
                TokenKind::CurlyOpen | TokenKind::Semicolon if depth == 0 => {
                    return Some(token.id())
                }
                _ => {}
            }
        }
        None
    }

    // ======= file =======

    fn file(&self, name: &str) -> Declaration {
        let mut file = Declaration::new(DeclKind::File, name);
        file.end_id = self.last_id();
        file.end_line = self.stream.last_line();
        file.definition_end_line = 1;

        let mut id = 0;
        while let Some(token) = self.token(id) {
            // `new class { ... }` is an expression and enums are not modelled;
            // neither body contributes declarations
            let opaque = (token.is(TokenKind::Class) && self.is_anonymous_class(id))
                || (token.is(TokenKind::Enum) && self.is_named(id));
            if opaque {
                id = self.stream.end_id(id).unwrap_or(id) + 1;
                continue;
            }
            let decl = match token.kind() {
                TokenKind::Class | TokenKind::Interface | TokenKind::Trait => self.type_decl(id),
                TokenKind::Function => self.function(id, DeclKind::Function),
                _ => None,
            };
            match decl {
                Some(decl) => {
                    id = decl.end_id + 1;
                    file.add_child(decl);
                }
                None => id += 1,
            }
        }
        file
    }

    // ======= classes, interfaces, traits =======

    fn is_anonymous_class(&self, id: TokenId) -> bool {
        self.stream
            .prev_significant(id)
            .is_some_and(|t| t.is(TokenKind::New))
    }

    fn is_named(&self, id: TokenId) -> bool {
        self.stream
            .next_significant(id)
            .is_some_and(|t| t.is(TokenKind::Identifier))
    }

    fn type_decl(&self, id: TokenId) -> Option<Declaration> {
        if !self.stream.opens_scope(id) || self.is_anonymous_class(id) || !self.is_named(id) {
            return None;
        }
        let name = self.stream.next_significant(id)?;

        let kind = match self.token(id)?.kind() {
            TokenKind::Interface => DeclKind::Interface,
            TokenKind::Trait => DeclKind::Trait,
            _ => DeclKind::Class,
        };
        let (end, incomplete) = self.end_of(id);

        let mut decl = Declaration::new(kind, name.text());
        decl.start_id = id;
        decl.end_id = end;
        decl.incomplete = incomplete;
        decl.start_line = self.line(id);
        decl.end_line = self.line(end);
        decl.definition_end_line = self
            .definition_end(id, end)
            .map_or(decl.start_line, |t| self.line(t));
        decl.modifiers = doc::modifiers(self.stream, id);
        decl.doc_comment = doc::doc_comment(self.stream, id, self.options.doc_lookback);

        let mut member = id + 1;
        while member < end {
            let method = self
                .token(member)
                .filter(|t| t.is(TokenKind::Function))
                .and_then(|_| self.function(member, DeclKind::Method));
            match method {
                Some(method) => {
                    member = method.end_id + 1;
                    decl.add_child(method);
                }
                None => member += 1,
            }
        }
        Some(decl)
    }

    // ======= functions, methods =======

    fn function(&self, id: TokenId, kind: DeclKind) -> Option<Declaration> {
        // `use function Foo\bar;` imports a name
        if self
            .stream
            .prev_significant(id)
            .is_some_and(|t| t.is(TokenKind::Use))
        {
            return None;
        }
        let mut name = self.stream.next_significant(id)?;
        if name.is(TokenKind::Ampersand) {
            name = self.stream.next_significant(name.id())?;
        }
        // `function (` is a closure
        if name.is(TokenKind::ParenOpen) {
            return None;
        }

        let (end, incomplete) = self.end_of(id);
        let mut decl = Declaration::new(kind, name.text());
        decl.start_id = id;
        decl.end_id = end;
        decl.incomplete = incomplete;
        decl.start_line = self.line(id);
        decl.end_line = self.line(end);
        decl.modifiers = doc::modifiers(self.stream, id);
        decl.doc_comment = doc::doc_comment(self.stream, id, self.options.doc_lookback);

        let open = self
            .stream
            .tokens()
            .get(name.id()..=end)
            .and_then(|ts| ts.iter().find(|t| t.is(TokenKind::ParenOpen)))
            .map(Token::id);
        let Some((open, close)) = open.and_then(|open| {
            params::matching_paren(self.stream, open).map(|close| (open, close))
        }) else {
            warn!(
                function = %decl.name,
                line = decl.start_line,
                "parameter list not found"
            );
            decl.definition_end_line = decl.start_line;
            return Some(decl);
        };

        decl.parameters = params::parse(self.stream, open, close);
        decl.signature = format!(
            "{}{}",
            decl.name,
            params::normalize(&self.stream.tokens()[open..=close])
        );

        let body = self.definition_end(close + 1, end);
        decl.definition_end_line = body.map_or(self.line(close), |t| self.line(t));
        decl.return_type = self.return_type(close, body.unwrap_or(end));
        Some(decl)
    }

    /// Text between `):` and the body or `;`.
    fn return_type(&self, close: TokenId, body: TokenId) -> Option<String> {
        let colon = self
            .stream
            .next_significant(close)
            .filter(|t| t.is(TokenKind::Colon))?;
        let text = params::normalize(self.stream.tokens().get(colon.id() + 1..body)?);
        (!text.is_empty()).then_some(text)
    }
}
