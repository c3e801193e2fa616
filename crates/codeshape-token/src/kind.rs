// crates/codeshape-token/src/kind.rs
// Closed set of token kinds plus the behaviour tables hung off them.

use serde::Serialize;

/// Coarse classification of a token, independent of its exact kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenClass {
    Keyword,
    Operator,
    Constant,
    ScopeOpen,
    ScopeClose,
    Comment,
    Whitespace,
    Other,
}

macro_rules! token_kinds {
    ($($variant:ident => $name:literal,)+) => {
        /// Every kind a token can have.
        ///
        /// The discriminant doubles as the numeric kind code carried by
        /// typed raw tokens, so variants must only ever be appended.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        #[repr(u16)]
        pub enum TokenKind {
            $($variant,)+
        }

        impl TokenKind {
            /// All kinds, indexed by kind code.
            pub const ALL: &'static [TokenKind] = &[$(TokenKind::$variant,)+];

            /// Short display name, e.g. `Curly_Open`.
            pub fn name(self) -> &'static str {
                match self {
                    $(TokenKind::$variant => $name,)+
                }
            }
        }
    };
}

token_kinds! {
    // unrecognized input
    Other => "Other",
    // trivia / markup
    OpenTag => "Open_Tag",
    CloseTag => "Close_Tag",
    InlineHtml => "Inline_Html",
    Whitespace => "Whitespace",
    Comment => "Comment",
    DocComment => "Doc_Comment",
    // names and literals
    Variable => "Variable",
    Identifier => "String",
    StringLiteral => "Constant_Encapsed_String",
    IntegerLiteral => "Lnumber",
    FloatLiteral => "Dnumber",
    // keywords
    Abstract => "Abstract",
    And => "Logical_And",
    Array => "Array",
    As => "As",
    Async => "Async",
    Await => "Await",
    Break => "Break",
    Callable => "Callable",
    Case => "Case",
    Catch => "Catch",
    Class => "Class",
    Clone => "Clone",
    Const => "Const",
    Continue => "Continue",
    Default => "Default",
    Do => "Do",
    Echo => "Echo",
    Else => "Else",
    ElseIf => "Elseif",
    Enum => "Enum",
    Extends => "Extends",
    Final => "Final",
    Finally => "Finally",
    For => "For",
    Foreach => "Foreach",
    Function => "Function",
    Global => "Global",
    If => "If",
    Implements => "Implements",
    Include => "Include",
    Instanceof => "Instanceof",
    Insteadof => "Insteadof",
    Interface => "Interface",
    List => "List",
    Namespace => "Namespace",
    New => "New",
    Or => "Logical_Or",
    Print => "Print",
    Private => "Private",
    Protected => "Protected",
    Public => "Public",
    Require => "Require",
    Return => "Return",
    Static => "Static",
    Switch => "Switch",
    Throw => "Throw",
    Trait => "Trait",
    Try => "Try",
    Use => "Use",
    Var => "Var",
    While => "While",
    Xor => "Logical_Xor",
    Yield => "Yield",
    // multi-character operators (typed by the lexer)
    BooleanAnd => "Boolean_And",
    BooleanOr => "Boolean_Or",
    Coalesce => "Coalesce",
    ObjectOperator => "Object_Operator",
    NullsafeObjectOperator => "Nullsafe_Object_Operator",
    DoubleArrow => "Double_Arrow",
    DoubleColon => "Double_Colon",
    IsEqual => "Is_Equal",
    IsIdentical => "Is_Identical",
    IsNotEqual => "Is_Not_Equal",
    IsNotIdentical => "Is_Not_Identical",
    IsSmallerOrEqual => "Is_Smaller_Or_Equal",
    IsGreaterOrEqual => "Is_Greater_Or_Equal",
    Spaceship => "Spaceship",
    Inc => "Inc",
    Dec => "Dec",
    PlusEqual => "Plus_Equal",
    MinusEqual => "Minus_Equal",
    MulEqual => "Mul_Equal",
    DivEqual => "Div_Equal",
    ConcatEqual => "Concat_Equal",
    Ellipsis => "Ellipsis",
    // single-character punctuation (bare strings from the lexer)
    CurlyOpen => "Curly_Open",
    CurlyClose => "Curly_Close",
    ParenOpen => "Open_Bracket",
    ParenClose => "Close_Bracket",
    BracketOpen => "Open_Square",
    BracketClose => "Close_Square",
    Semicolon => "Semicolon",
    Comma => "Comma",
    Colon => "Colon",
    QuestionMark => "Question_Mark",
    Equal => "Equal",
    Lt => "Lt",
    Gt => "Gt",
    Plus => "Plus",
    Minus => "Minus",
    Mult => "Mult",
    Div => "Div",
    Mod => "Mod",
    Dot => "Dot",
    Exclamation => "Exclamation_Mark",
    Ampersand => "Ampersand",
    Pipe => "Pipe",
    Caret => "Caret",
    Tilde => "Tilde",
    At => "At",
    Dollar => "Dollar",
    Backtick => "Backtick",
    DoubleQuote => "Double_Quotes",
    Backslash => "Backslash",
}

/// Literal text → kind for tokens the raw lexer hands over untyped.
const CUSTOM_KINDS: &[(&str, TokenKind)] = &[
    ("{", TokenKind::CurlyOpen),
    ("}", TokenKind::CurlyClose),
    ("(", TokenKind::ParenOpen),
    (")", TokenKind::ParenClose),
    ("[", TokenKind::BracketOpen),
    ("]", TokenKind::BracketClose),
    (";", TokenKind::Semicolon),
    (",", TokenKind::Comma),
    (":", TokenKind::Colon),
    ("?", TokenKind::QuestionMark),
    ("=", TokenKind::Equal),
    ("<", TokenKind::Lt),
    (">", TokenKind::Gt),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Mult),
    ("/", TokenKind::Div),
    ("%", TokenKind::Mod),
    (".", TokenKind::Dot),
    ("!", TokenKind::Exclamation),
    ("&", TokenKind::Ampersand),
    ("|", TokenKind::Pipe),
    ("^", TokenKind::Caret),
    ("~", TokenKind::Tilde),
    ("@", TokenKind::At),
    ("$", TokenKind::Dollar),
    ("`", TokenKind::Backtick),
    ("\"", TokenKind::DoubleQuote),
    ("\\", TokenKind::Backslash),
];

impl TokenKind {
    /// Numeric kind code used by typed raw tokens.
    pub fn code(self) -> u16 {
        self as u16
    }

    pub fn from_code(code: u16) -> Option<TokenKind> {
        Self::ALL.get(usize::from(code)).copied()
    }

    /// Look up a bare punctuation string in the custom-kind table.
    pub fn from_literal(text: &str) -> Option<TokenKind> {
        CUSTOM_KINDS
            .iter()
            .find(|(lit, _)| *lit == text)
            .map(|(_, kind)| *kind)
    }

    /// Keywords are matched case-insensitively.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word.to_ascii_lowercase().as_str() {
            "abstract" => TokenKind::Abstract,
            "and" => TokenKind::And,
            "array" => TokenKind::Array,
            "as" => TokenKind::As,
            "async" => TokenKind::Async,
            "await" => TokenKind::Await,
            "break" => TokenKind::Break,
            "callable" => TokenKind::Callable,
            "case" => TokenKind::Case,
            "catch" => TokenKind::Catch,
            "class" => TokenKind::Class,
            "clone" => TokenKind::Clone,
            "const" => TokenKind::Const,
            "continue" => TokenKind::Continue,
            "default" => TokenKind::Default,
            "do" => TokenKind::Do,
            "echo" => TokenKind::Echo,
            "else" => TokenKind::Else,
            "elseif" => TokenKind::ElseIf,
            "enum" => TokenKind::Enum,
            "extends" => TokenKind::Extends,
            "final" => TokenKind::Final,
            "finally" => TokenKind::Finally,
            "for" => TokenKind::For,
            "foreach" => TokenKind::Foreach,
            "function" => TokenKind::Function,
            "global" => TokenKind::Global,
            "if" => TokenKind::If,
            "implements" => TokenKind::Implements,
            "include" | "include_once" => TokenKind::Include,
            "instanceof" => TokenKind::Instanceof,
            "insteadof" => TokenKind::Insteadof,
            "interface" => TokenKind::Interface,
            "list" => TokenKind::List,
            "namespace" => TokenKind::Namespace,
            "new" => TokenKind::New,
            "or" => TokenKind::Or,
            "print" => TokenKind::Print,
            "private" => TokenKind::Private,
            "protected" => TokenKind::Protected,
            "public" => TokenKind::Public,
            "require" | "require_once" => TokenKind::Require,
            "return" => TokenKind::Return,
            "static" => TokenKind::Static,
            "switch" => TokenKind::Switch,
            "throw" => TokenKind::Throw,
            "trait" => TokenKind::Trait,
            "try" => TokenKind::Try,
            "use" => TokenKind::Use,
            "var" => TokenKind::Var,
            "while" => TokenKind::While,
            "xor" => TokenKind::Xor,
            "yield" => TokenKind::Yield,
            _ => return None,
        };
        Some(kind)
    }

    pub fn class(self) -> TokenClass {
        use TokenKind::*;
        match self {
            Whitespace => TokenClass::Whitespace,
            Comment | DocComment => TokenClass::Comment,
            CurlyOpen => TokenClass::ScopeOpen,
            CurlyClose => TokenClass::ScopeClose,
            StringLiteral | IntegerLiteral | FloatLiteral | Const => TokenClass::Constant,
            Abstract | And | Array | As | Async | Await | Break | Callable | Case | Catch
            | Class | Clone | Continue | Default | Do | Echo | Else | ElseIf | Enum | Extends
            | Final | Finally | For | Foreach | Function | Global | If | Implements | Include
            | Instanceof | Insteadof | Interface | List | Namespace | New | Or | Print
            | Private | Protected | Public | Require | Return | Static | Switch | Throw
            | Trait | Try | Use | Var | While | Xor | Yield => TokenClass::Keyword,
            BooleanAnd | BooleanOr | Coalesce | ObjectOperator | NullsafeObjectOperator
            | DoubleArrow | DoubleColon | IsEqual | IsIdentical | IsNotEqual | IsNotIdentical
            | IsSmallerOrEqual | IsGreaterOrEqual | Spaceship | Inc | Dec | PlusEqual
            | MinusEqual | MulEqual | DivEqual | ConcatEqual | Ellipsis | QuestionMark | Equal
            | Lt | Gt | Plus | Minus | Mult | Div | Mod | Dot | Exclamation | Ampersand | Pipe
            | Caret | Tilde | At => TokenClass::Operator,
            Other | OpenTag | CloseTag | InlineHtml | Variable | Identifier | ParenOpen
            | ParenClose | BracketOpen | BracketClose | Semicolon | Comma | Colon | Dollar
            | Backtick | DoubleQuote | Backslash => TokenClass::Other,
        }
    }

    /// Kinds that open a scope the resolver can find the end of.
    pub fn opens_scope(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Class
                | Interface
                | Trait
                | Enum
                | Function
                | Namespace
                | If
                | ElseIf
                | Else
                | For
                | Foreach
                | While
                | Do
                | Switch
                | Try
                | Catch
                | Finally
                | CurlyOpen
        )
    }

    /// Kinds whose scope may be closed by a bare statement terminator
    /// instead of a brace block.
    pub fn ends_at_statement(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Function | Namespace | If | ElseIf | Else | For | Foreach | While | Do
        )
    }

    /// Tokens that add one path to the cyclomatic complexity.
    pub fn is_decision_point(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            If | ElseIf
                | For
                | Foreach
                | While
                | Case
                | Catch
                | BooleanAnd
                | BooleanOr
                | And
                | Or
                | QuestionMark
        )
    }

    pub fn is_trivia(self) -> bool {
        matches!(self.class(), TokenClass::Whitespace | TokenClass::Comment)
    }

    /// Keywords that may precede a declaration keyword.
    pub fn is_modifier(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Abstract | Final | Public | Protected | Private | Static | Async
        )
    }

    pub fn is_declaration(self) -> bool {
        use TokenKind::*;
        matches!(self, Class | Interface | Trait | Function)
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
