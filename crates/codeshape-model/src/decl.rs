use std::cell::Cell;

use once_cell::unsync::OnceCell;
use serde::Serialize;
use tracing::warn;

use codeshape_metrics::{clamp_coverage, crap_index, cyclomatic_complexity};
use codeshape_token::{TokenId, TokenStream};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DeclKind {
    File,
    Class,
    Interface,
    Trait,
    Function,
    Method,
}

impl DeclKind {
    /// Classes, interfaces and traits.
    pub fn is_type(self) -> bool {
        matches!(self, DeclKind::Class | DeclKind::Interface | DeclKind::Trait)
    }

    pub fn is_callable(self) -> bool {
        matches!(self, DeclKind::Function | DeclKind::Method)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

/// Keywords written in front of a declaration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Modifiers {
    pub visibility: Option<Visibility>,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_final: bool,
}

/// One entry of a parameter list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Parameter {
    /// Variable name without the leading `$`. Empty when the segment
    /// could not be parsed.
    pub name: String,
    /// Declared type; `None` means untyped.
    pub ty: Option<String>,
    pub default: Option<String>,
    pub by_ref: bool,
    pub variadic: bool,
}

/// Parameters in declaration order, looked up by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Parameters(Vec<Parameter>);

impl Parameters {
    pub(crate) fn push(&mut self, param: Parameter) {
        self.0.push(param);
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.0.iter().find(|p| p.name == name)
    }

    /// `Some(None)` for an untyped parameter, `None` for an unknown name.
    pub fn type_of(&self, name: &str) -> Option<Option<&str>> {
        self.get(name).map(|p| p.ty.as_deref())
    }

    /// `(name, type)` pairs in declaration order.
    pub fn pairs(&self) -> Vec<(&str, Option<&str>)> {
        self.0
            .iter()
            .map(|p| (p.name.as_str(), p.ty.as_deref()))
            .collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Parameter> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A named construct: the file itself, a class-like type, or a callable.
///
/// Everything except `coverage` is fixed once the builder returns. CCN is
/// computed on first request and cached; CRAP is derived from CCN and the
/// current coverage on every call.
#[derive(Debug, Clone, Serialize)]
pub struct Declaration {
    pub kind: DeclKind,
    pub name: String,
    pub start_line: u32,
    /// Line of the `{` or `;` that ends the signature.
    pub definition_end_line: u32,
    pub end_line: u32,
    pub start_id: TokenId,
    pub end_id: TokenId,
    /// The scope never closed; `end_*` fall back to the end of the stream.
    pub incomplete: bool,
    pub modifiers: Modifiers,
    pub parameters: Parameters,
    pub return_type: Option<String>,
    pub signature: String,
    pub doc_comment: String,
    children: Vec<Declaration>,
    coverage: Cell<f64>,
    #[serde(skip)]
    ccn: OnceCell<u32>,
}

impl Declaration {
    pub(crate) fn new(kind: DeclKind, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            kind,
            signature: name.clone(),
            name,
            start_line: 1,
            definition_end_line: 1,
            end_line: 1,
            start_id: 0,
            end_id: 0,
            incomplete: false,
            modifiers: Modifiers::default(),
            parameters: Parameters::default(),
            return_type: None,
            doc_comment: String::new(),
            children: Vec::new(),
            coverage: Cell::new(0.0),
            ccn: OnceCell::new(),
        }
    }

    /// Adds `child` unless a sibling already uses its name; the first
    /// declaration of a name wins.
    pub(crate) fn add_child(&mut self, child: Declaration) -> bool {
        if self.child(&child.name).is_some() {
            warn!(
                parent = %self.name,
                child = %child.name,
                line = child.start_line,
                "duplicate declaration name, keeping the first"
            );
            return false;
        }
        self.children.push(child);
        true
    }

    pub fn children(&self) -> &[Declaration] {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&Declaration> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Top-level functions (for a file).
    pub fn functions(&self) -> impl Iterator<Item = &Declaration> {
        self.of_kind(DeclKind::Function)
    }

    pub fn classes(&self) -> impl Iterator<Item = &Declaration> {
        self.of_kind(DeclKind::Class)
    }

    pub fn interfaces(&self) -> impl Iterator<Item = &Declaration> {
        self.of_kind(DeclKind::Interface)
    }

    pub fn traits(&self) -> impl Iterator<Item = &Declaration> {
        self.of_kind(DeclKind::Trait)
    }

    fn of_kind(&self, kind: DeclKind) -> impl Iterator<Item = &Declaration> {
        self.children.iter().filter(move |c| c.kind == kind)
    }

    pub fn methods(&self) -> impl Iterator<Item = &Declaration> {
        self.of_kind(DeclKind::Method)
    }

    /// Every declaration below this one, depth first.
    pub fn walk(&self) -> Vec<&Declaration> {
        let mut out = Vec::new();
        for child in &self.children {
            out.push(child);
            out.extend(child.walk());
        }
        out
    }

    pub fn coverage(&self) -> f64 {
        self.coverage.get()
    }

    /// Set the externally measured line coverage, in percent.
    pub fn set_coverage(&self, percent: f64) {
        self.coverage.set(clamp_coverage(percent));
    }

    /// Cyclomatic complexity, computed against `stream` on first call.
    ///
    /// `stream` must be the stream this declaration was built from.
    /// Callables count decision points over their token range; types and
    /// files sum their children (1 when they have none).
    pub fn ccn(&self, stream: &TokenStream) -> u32 {
        *self.ccn.get_or_init(|| {
            if self.kind.is_callable() {
                cyclomatic_complexity(stream, self.start_id, self.end_id)
            } else if self.children.is_empty() {
                1
            } else {
                self.children.iter().map(|c| c.ccn(stream)).sum()
            }
        })
    }

    pub fn crap(&self, stream: &TokenStream) -> f64 {
        crap_index(self.ccn(stream), self.coverage())
    }
}
