//! Plain-data records for renderers.

use std::collections::BTreeMap;

use serde::Serialize;

use codeshape_token::TokenStream;

use crate::decl::{DeclKind, Declaration, Parameters};

/// One declaration with its metrics evaluated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeclarationReport {
    pub kind: DeclKind,
    pub name: String,
    pub start_line: u32,
    pub end_line: u32,
    pub signature: String,
    pub doc_comment: String,
    pub parameters: Parameters,
    pub ccn: u32,
    pub coverage: f64,
    pub crap: f64,
    pub incomplete: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DeclarationReport>,
}

impl DeclarationReport {
    pub fn new(decl: &Declaration, stream: &TokenStream) -> Self {
        Self {
            kind: decl.kind,
            name: decl.name.clone(),
            start_line: decl.start_line,
            end_line: decl.end_line,
            signature: decl.signature.clone(),
            doc_comment: decl.doc_comment.clone(),
            parameters: decl.parameters.clone(),
            ccn: decl.ccn(stream),
            coverage: decl.coverage(),
            crap: decl.crap(stream),
            incomplete: decl.incomplete,
            children: decl
                .children()
                .iter()
                .map(|c| Self::new(c, stream))
                .collect(),
        }
    }
}

/// Coverage percentages keyed `Class::method`, `function` or `Class`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoverageMap {
    default: f64,
    entries: BTreeMap<String, f64>,
}

impl CoverageMap {
    pub fn new(default: f64) -> Self {
        Self {
            default,
            entries: BTreeMap::new(),
        }
    }

    pub fn with_entries(mut self, entries: impl IntoIterator<Item = (String, f64)>) -> Self {
        self.entries.extend(entries);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, percent: f64) {
        self.entries.insert(key.into(), percent);
    }

    pub fn get(&self, key: &str) -> f64 {
        self.entries.get(key).copied().unwrap_or(self.default)
    }

    /// Set coverage on `file` and everything below it.
    pub fn apply(&self, file: &Declaration) {
        file.set_coverage(self.get(&file.name));
        self.apply_children(file, None);
    }

    fn apply_children(&self, parent: &Declaration, owner: Option<&str>) {
        for child in parent.children() {
            let key = match owner {
                Some(owner) => format!("{owner}::{}", child.name),
                None => child.name.clone(),
            };
            child.set_coverage(self.get(&key));
            if child.kind.is_type() {
                self.apply_children(child, Some(&child.name));
            }
        }
    }
}
